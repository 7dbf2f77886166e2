//! The netlist query facade.
//!
//! A [`Netlist`] owns the loaded graph, the type registry, the file table,
//! the behavioral options and the diagnostics produced while loading. It
//! is constructed once (load, mark aliases, split registers, check
//! invariants) and queried read-only afterwards; all queries are pure
//! functions of the graph.

use crate::error::QueryError;
use crate::matcher::NameMatcher;
use crate::waypoints::Waypoints;
use netpath_common::Options;
use netpath_diagnostics::{Diagnostic, DiagnosticSink};
use netpath_netlist::{
    loader, traverse, AvoidSet, DTypeDb, Graph, LoadedNetlist, Vertex, VertexId, VertexKind,
};
use netpath_source::FileTable;
use std::fmt::Write as _;
use std::fs::File;
use std::io;
use std::path::Path;

/// An elaborated netlist, canonicalized and ready for path queries.
pub struct Netlist {
    graph: Graph,
    dtypes: DTypeDb,
    files: FileTable,
    options: Options,
    sink: DiagnosticSink,
}

impl Netlist {
    /// Loads a netlist from a Verilator XML file and canonicalizes it.
    pub fn from_xml_file(path: impl AsRef<Path>, options: Options) -> Result<Self, QueryError> {
        let sink = DiagnosticSink::new();
        let loaded = loader::parse_file(path, &options, &sink)?;
        Ok(Self::canonicalize(loaded, options, sink))
    }

    /// Loads a netlist from an in-memory Verilator XML document and
    /// canonicalizes it.
    pub fn from_xml_str(xml: &str, options: Options) -> Result<Self, QueryError> {
        let sink = DiagnosticSink::new();
        let loaded = loader::parse_str(xml, &options, &sink)?;
        Ok(Self::canonicalize(loaded, options, sink))
    }

    fn canonicalize(loaded: LoadedNetlist, options: Options, sink: DiagnosticSink) -> Self {
        let LoadedNetlist {
            mut graph,
            dtypes,
            files,
        } = loaded;
        graph.mark_alias_registers();
        graph.split_reg_vertices();
        graph.update_var_aliases(&sink);
        graph.check(&sink);
        log::debug!(
            "canonicalized netlist: {} vertices, {} edges, {} types",
            graph.num_vertices(),
            graph.num_edges(),
            dtypes.len()
        );
        Self {
            graph,
            dtypes,
            files,
            options,
            sink,
        }
    }

    /// Returns the options in force.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replaces the options. Only call between queries.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Returns the diagnostics accumulated while loading and checking.
    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.sink.diagnostics()
    }

    /// Returns the underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the data-type registry.
    pub fn dtypes(&self) -> &DTypeDb {
        &self.dtypes
    }

    /// Returns the source-file table.
    pub fn files(&self) -> &FileTable {
        &self.files
    }

    /// Returns `true` when the graph is empty, as happens for a non-flat
    /// netlist. Every path and existence query on an empty netlist returns
    /// its falsey value without failing.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    /// Returns the number of edges.
    pub fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    /// Returns the vertex with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID did not come from this netlist.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        self.graph.vertex(id)
    }

    //===------------------------------------------------------------------===//
    // Name resolution.
    //===------------------------------------------------------------------===//

    /// Returns every vertex of the given kind whose name matches the
    /// pattern, in vertex-ID order.
    pub fn matching_vertices(
        &self,
        pattern: &str,
        kind: VertexKind,
    ) -> Result<Vec<VertexId>, QueryError> {
        let matcher = NameMatcher::compile(pattern, &self.options)?;
        Ok(self
            .graph
            .iter_vertices()
            .filter(|(_, vertex)| vertex.matches_kind(kind))
            .filter(|(_, vertex)| vertex.name().is_some_and(|name| matcher.matches(name)))
            .map(|(id, _)| id)
            .collect())
    }

    fn report_multiple_matches(
        &self,
        candidates: &[VertexId],
        pattern: &str,
        what: &str,
    ) -> String {
        let mut message = format!("multiple vertices matching {what} pattern '{pattern}':");
        for &id in candidates {
            let vertex = self.graph.vertex(id);
            let _ = write!(
                message,
                "\n  {} {}",
                vertex.name().unwrap_or(""),
                vertex.ast_type_str()
            );
        }
        message
    }

    fn resolve_single(
        &self,
        pattern: &str,
        kind: VertexKind,
        match_any: bool,
        what: &str,
    ) -> Result<Option<VertexId>, QueryError> {
        let candidates = self.matching_vertices(pattern, kind)?;
        if candidates.len() > 1 && !match_any {
            return Err(QueryError::AmbiguousName(self.report_multiple_matches(
                &candidates,
                pattern,
                what,
            )));
        }
        Ok(candidates.into_iter().next())
    }

    fn start_vertex(&self, pattern: &str, match_any: bool) -> Result<Option<VertexId>, QueryError> {
        self.resolve_single(pattern, VertexKind::StartPoint, match_any, "start point")
    }

    fn end_vertex(&self, pattern: &str, match_any: bool) -> Result<Option<VertexId>, QueryError> {
        self.resolve_single(pattern, VertexKind::EndPoint, match_any, "end point")
    }

    fn mid_vertex(&self, pattern: &str, match_any: bool) -> Result<Option<VertexId>, QueryError> {
        self.resolve_single(pattern, VertexKind::MidPoint, match_any, "mid point")
    }

    fn reg_vertex(&self, pattern: &str, match_any: bool) -> Result<Option<VertexId>, QueryError> {
        let candidates: Vec<VertexId> = self
            .matching_vertices(pattern, VertexKind::Reg)?
            .into_iter()
            .filter(|&id| self.graph.vertex(id).is_dst_reg())
            .collect();
        if candidates.len() > 1 && !match_any {
            return Err(QueryError::AmbiguousName(self.report_multiple_matches(
                &candidates,
                pattern,
                "register",
            )));
        }
        Ok(candidates.into_iter().next())
    }

    fn reg_alias_vertex(
        &self,
        pattern: &str,
        match_any: bool,
    ) -> Result<Option<VertexId>, QueryError> {
        let candidates: Vec<VertexId> = self
            .matching_vertices(pattern, VertexKind::Reg)?
            .into_iter()
            .filter(|&id| self.graph.vertex(id).is_reg_alias())
            .collect();
        if candidates.len() > 1 && !match_any {
            return Err(QueryError::AmbiguousName(self.report_multiple_matches(
                &candidates,
                pattern,
                "register alias",
            )));
        }
        Ok(candidates.into_iter().next())
    }

    fn read_waypoints(&self, waypoints: &Waypoints) -> Result<Vec<VertexId>, QueryError> {
        let names = waypoints.point_names()?;
        let match_any = self.options.match_any_vertex;
        let mut ids = Vec::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            let vertex = if position == 0 {
                self.start_vertex(name, match_any)?.ok_or_else(|| {
                    QueryError::UnknownName(format!(
                        "could not find start point matching '{name}'"
                    ))
                })?
            } else if position + 1 == names.len() {
                self.end_vertex(name, match_any)?.ok_or_else(|| {
                    QueryError::UnknownName(format!("could not find end point matching '{name}'"))
                })?
            } else {
                self.mid_vertex(name, match_any)?.ok_or_else(|| {
                    QueryError::UnknownName(format!(
                        "could not find through point matching '{name}'"
                    ))
                })?
            };
            if self.options.debug_mode {
                log::debug!(
                    "waypoint '{name}' resolved to {}",
                    self.graph.vertex(vertex).name().unwrap_or("")
                );
            }
            ids.push(vertex);
        }
        Ok(ids)
    }

    fn read_avoid_points(&self, waypoints: &Waypoints) -> Result<AvoidSet, QueryError> {
        let match_any = self.options.match_any_vertex;
        let mut ids = Vec::new();
        for name in waypoints.avoid_names() {
            let vertex = self.mid_vertex(name, match_any)?.ok_or_else(|| {
                QueryError::UnknownName(format!("could not find avoid point matching '{name}'"))
            })?;
            ids.push(vertex);
        }
        Ok(AvoidSet::new(ids))
    }

    //===------------------------------------------------------------------===//
    // Path queries.
    //===------------------------------------------------------------------===//

    /// Returns `true` if a path exists through the waypoint sequence that
    /// avoids the avoid points.
    pub fn path_exists(&self, waypoints: &Waypoints) -> Result<bool, QueryError> {
        if self.is_empty() {
            return Ok(false);
        }
        let ids = self.read_waypoints(waypoints)?;
        let avoid = self.read_avoid_points(waypoints)?;
        Ok(!traverse::any_point_to_point(&self.graph, &ids, &avoid).is_empty())
    }

    /// Returns a single path through the waypoint sequence, or an empty
    /// sequence when none exists.
    pub fn any_path(&self, waypoints: &Waypoints) -> Result<Vec<VertexId>, QueryError> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self.read_waypoints(waypoints)?;
        let avoid = self.read_avoid_points(waypoints)?;
        Ok(traverse::any_point_to_point(&self.graph, &ids, &avoid))
    }

    /// Returns every simple path through the waypoint sequence.
    ///
    /// With more than two waypoints the per-stage path lists are joined as
    /// a cartesian product; any unconnected stage empties the result. The
    /// enumeration is exponential in the worst case; bound the search with
    /// through-points on large designs.
    pub fn all_paths(&self, waypoints: &Waypoints) -> Result<Vec<Vec<VertexId>>, QueryError> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self.read_waypoints(waypoints)?;
        let avoid = self.read_avoid_points(waypoints)?;
        Ok(traverse::all_point_to_point(&self.graph, &ids, &avoid))
    }

    /// Returns a path from the named start point to every end point in its
    /// fan-out cone.
    pub fn all_fan_out(&self, start: &str) -> Result<Vec<Vec<VertexId>>, QueryError> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let vertex = self
            .start_vertex(start, self.options.match_any_vertex)?
            .ok_or_else(|| {
                QueryError::UnknownName(format!("could not find start point matching '{start}'"))
            })?;
        Ok(traverse::all_fan_out(&self.graph, vertex))
    }

    /// Returns a path from every start point in the fan-in cone of the
    /// named end point.
    pub fn all_fan_in(&self, finish: &str) -> Result<Vec<Vec<VertexId>>, QueryError> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let vertex = self
            .end_vertex(finish, self.options.match_any_vertex)?
            .ok_or_else(|| {
                QueryError::UnknownName(format!("could not find end point matching '{finish}'"))
            })?;
        Ok(traverse::all_fan_in(&self.graph, vertex))
    }

    //===------------------------------------------------------------------===//
    // Existence checks.
    //===------------------------------------------------------------------===//

    /// Returns `true` if exactly one start point matches the name; several
    /// matches are an ambiguity error.
    pub fn startpoint_exists(&self, name: &str) -> Result<bool, QueryError> {
        Ok(self.start_vertex(name, false)?.is_some())
    }

    /// Returns `true` if exactly one end point matches the name; several
    /// matches are an ambiguity error.
    pub fn endpoint_exists(&self, name: &str) -> Result<bool, QueryError> {
        Ok(self.end_vertex(name, false)?.is_some())
    }

    /// Returns `true` if exactly one register, or exactly one register
    /// alias, matches the name.
    pub fn reg_exists(&self, name: &str) -> Result<bool, QueryError> {
        Ok(self.reg_vertex(name, false)?.is_some()
            || self.reg_alias_vertex(name, false)?.is_some())
    }

    /// Returns `true` if any start point matches the name.
    pub fn any_startpoint_exists(&self, name: &str) -> Result<bool, QueryError> {
        Ok(self.start_vertex(name, true)?.is_some())
    }

    /// Returns `true` if any end point matches the name.
    pub fn any_endpoint_exists(&self, name: &str) -> Result<bool, QueryError> {
        Ok(self.end_vertex(name, true)?.is_some())
    }

    /// Returns `true` if any register or register alias matches the name.
    pub fn any_reg_exists(&self, name: &str) -> Result<bool, QueryError> {
        Ok(!self.matching_vertices(name, VertexKind::Reg)?.is_empty())
    }

    //===------------------------------------------------------------------===//
    // Names and types.
    //===------------------------------------------------------------------===//

    /// Returns every named vertex matching the pattern, ordered by name and
    /// kind. An empty pattern lists the whole netlist.
    pub fn named_vertices(&self, pattern: &str) -> Result<Vec<VertexId>, QueryError> {
        let mut ids = self.matching_vertices(pattern, VertexKind::Named)?;
        ids.sort_by(|&a, &b| {
            let va = self.graph.vertex(a);
            let vb = self.graph.vertex(b);
            va.name()
                .cmp(&vb.name())
                .then_with(|| va.ast_type_str().cmp(vb.ast_type_str()))
        });
        Ok(ids)
    }

    /// Renders the data type registered under the given type name.
    pub fn dtype_str(&self, name: &str) -> Result<String, QueryError> {
        self.dtypes
            .find_by_name(name)
            .map(|id| self.dtypes.dtype_str(id))
            .ok_or_else(|| QueryError::UnknownName(format!("could not find dtype '{name}'")))
    }

    /// Returns the width of the data type registered under the given type
    /// name.
    pub fn dtype_width(&self, name: &str) -> Result<u64, QueryError> {
        self.dtypes
            .width_of_name(name)
            .ok_or_else(|| QueryError::UnknownName(format!("could not find dtype '{name}'")))
    }

    /// Renders the data type of the single vertex matching the pattern.
    pub fn vertex_dtype_str(&self, pattern: &str, kind: VertexKind) -> Result<String, QueryError> {
        let id = self.single_vertex(pattern, kind)?;
        let var = self.graph.vertex(id).as_var().ok_or_else(|| {
            QueryError::UnknownName(format!("could not find vertex matching '{pattern}'"))
        })?;
        Ok(self.dtypes.dtype_str(var.dtype))
    }

    /// Returns the data-type width of the single vertex matching the
    /// pattern.
    pub fn vertex_dtype_width(&self, pattern: &str, kind: VertexKind) -> Result<u64, QueryError> {
        let id = self.single_vertex(pattern, kind)?;
        let var = self.graph.vertex(id).as_var().ok_or_else(|| {
            QueryError::UnknownName(format!("could not find vertex matching '{pattern}'"))
        })?;
        Ok(self.dtypes.width(var.dtype))
    }

    fn single_vertex(&self, pattern: &str, kind: VertexKind) -> Result<VertexId, QueryError> {
        self.resolve_single(pattern, kind, false, "vertex")?
            .ok_or_else(|| {
                QueryError::UnknownName(format!("could not find vertex matching '{pattern}'"))
            })
    }

    //===------------------------------------------------------------------===//
    // Reports.
    //===------------------------------------------------------------------===//

    /// Writes a Graphviz dot file of the graph to the given path.
    pub fn dump_dot(&self, path: impl AsRef<Path>) -> Result<(), QueryError> {
        let mut file = File::create(path)?;
        self.graph.write_dot(&mut file)?;
        Ok(())
    }

    /// Writes an aligned table of the named vertices matching the pattern:
    /// name, kind, data type, width, direction and location.
    pub fn dump_names<W: io::Write>(&self, out: &mut W, pattern: &str) -> Result<(), QueryError> {
        let ids = self.named_vertices(pattern)?;
        let mut rows = vec![[
            "Name".to_string(),
            "Type".to_string(),
            "DType".to_string(),
            "Width".to_string(),
            "Dir".to_string(),
            "Location".to_string(),
        ]];
        for id in ids {
            let vertex = self.graph.vertex(id);
            let Some(var) = vertex.as_var() else { continue };
            let location = vertex.location();
            rows.push([
                var.name.clone(),
                vertex.ast_type_str().to_string(),
                self.dtypes.dtype_str(var.dtype),
                self.dtypes.width(var.dtype).to_string(),
                var.direction.to_string(),
                format!("{}:{}", self.files.filename(location.file), location),
            ]);
        }
        let mut widths = [0usize; 6];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }
        for row in &rows {
            let mut line = String::new();
            for (width, cell) in widths.iter().zip(row.iter()) {
                let _ = write!(line, "{cell:width$}  ");
            }
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
