//! The netlist graph store and its canonicalization passes.
//!
//! A labeled directed multigraph over [`Vertex`] values with stable integer
//! IDs and insertion-ordered adjacency, so traversals are deterministic for
//! a given input. A reverse adjacency is maintained alongside the forward
//! one, making fan-in traversals as cheap as fan-out.
//!
//! After loading, three passes run in fixed order: alias-register marking,
//! register splitting, and alias/invariant checking. Register splitting is
//! the transformation the whole query engine rests on: every variable
//! written by a delayed assignment is divided into a destination half
//! (in-edges only) and a source twin (out-edges only), so any walk that
//! does not cross a twin pair follows a combinational timing path.

use crate::ids::VertexId;
use crate::vertex::{LogicKind, VarRole, Vertex};
use netpath_diagnostics::{code, Diagnostic, DiagnosticSink};
use serde::{Deserialize, Serialize};
use std::io;

/// A directed multigraph of netlist vertices.
///
/// Vertex IDs are never reassigned; callers may cache them. Duplicate edges
/// between the same pair of vertices are preserved (an assignment may
/// reference the same variable twice).
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct Graph {
    vertices: Vec<Vertex>,
    succs: Vec<Vec<VertexId>>,
    preds: Vec<Vec<VertexId>>,
    edge_count: usize,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex and returns its ID.
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId::from_raw(self.vertices.len() as u32);
        self.vertices.push(vertex);
        self.succs.push(Vec::new());
        self.preds.push(Vec::new());
        id
    }

    /// Adds a directed edge. Duplicate edges are preserved.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is out of range.
    pub fn add_edge(&mut self, src: VertexId, dst: VertexId) {
        assert!(src.index() < self.vertices.len(), "edge source out of range");
        assert!(dst.index() < self.vertices.len(), "edge target out of range");
        self.succs[src.index()].push(dst);
        self.preds[dst.index()].push(src);
        self.edge_count += 1;
    }

    /// Removes one occurrence of the edge `src -> dst`, returning `true` if
    /// an edge was removed.
    pub fn remove_edge(&mut self, src: VertexId, dst: VertexId) -> bool {
        let Some(out_pos) = self.succs[src.index()].iter().position(|&v| v == dst) else {
            return false;
        };
        self.succs[src.index()].remove(out_pos);
        let in_pos = self.preds[dst.index()]
            .iter()
            .position(|&v| v == src)
            .expect("forward and reverse adjacency out of sync");
        self.preds[dst.index()].remove(in_pos);
        self.edge_count -= 1;
        true
    }

    /// Returns the vertex with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of range.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Returns a mutable reference to the vertex with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of range.
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Returns the successors of a vertex, in edge-insertion order.
    pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
        &self.succs[id.index()]
    }

    /// Returns the predecessors of a vertex, in edge-insertion order.
    pub fn in_neighbors(&self, id: VertexId) -> &[VertexId] {
        &self.preds[id.index()]
    }

    /// Returns the out-degree of a vertex.
    pub fn out_degree(&self, id: VertexId) -> usize {
        self.succs[id.index()].len()
    }

    /// Returns the in-degree of a vertex.
    pub fn in_degree(&self, id: VertexId) -> usize {
        self.preds[id.index()].len()
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges, counting duplicates.
    pub fn num_edges(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over `(VertexId, &Vertex)` pairs in ID order.
    pub fn iter_vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::from_raw(i as u32), v))
    }

    /// Iterates over all edges as `(src, dst)` pairs, grouped by source in
    /// ID order and per source in insertion order.
    pub fn iter_edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.succs.iter().enumerate().flat_map(|(i, outs)| {
            let src = VertexId::from_raw(i as u32);
            outs.iter().map(move |&dst| (src, dst))
        })
    }

    /// Marks alias registers.
    ///
    /// A variable whose only write site is an alias assignment reading a
    /// register keeps the designer-visible name of that register; it is
    /// given the [`VarRole::RegAlias`] role with `alias_of` recording the
    /// register, so register lookups can match either spelling.
    pub fn mark_alias_registers(&mut self) {
        let mut marks: Vec<(VertexId, VertexId)> = Vec::new();
        for (vid, vertex) in self.iter_vertices() {
            let Some(var) = vertex.as_var() else { continue };
            if var.role != VarRole::Var {
                continue;
            }
            let mut writers = self
                .in_neighbors(vid)
                .iter()
                .copied()
                .filter(|&p| self.vertex(p).is_logic());
            let (Some(writer), None) = (writers.next(), writers.next()) else {
                continue;
            };
            let is_alias_assign = self
                .vertex(writer)
                .as_logic()
                .is_some_and(|l| l.kind == LogicKind::AssignAlias);
            if !is_alias_assign {
                continue;
            }
            let source = self
                .in_neighbors(writer)
                .iter()
                .copied()
                .find(|&p| self.vertex(p).is_dst_reg());
            if let Some(source) = source {
                marks.push((vid, source));
            }
        }
        for (vid, source) in marks {
            if let Some(var) = self.vertex_mut(vid).as_var_mut() {
                log::debug!("marking {} as alias register", var.name);
                var.role = VarRole::RegAlias;
                var.alias_of = Some(source);
            }
        }
    }

    /// Splits every register vertex into a destination half and a source
    /// twin.
    ///
    /// The original vertex keeps its in-edges and the [`VarRole::DstReg`]
    /// role; a newly added twin with role [`VarRole::SrcReg`] receives all
    /// the out-edges. After this pass, graph connectivity follows
    /// combinational paths only.
    pub fn split_reg_vertices(&mut self) {
        let count = self.vertices.len();
        for index in 0..count {
            let vid = VertexId::from_raw(index as u32);
            let twin = match &self.vertices[index] {
                Vertex::Var(v) if v.role == VarRole::DstReg => {
                    let mut twin = v.clone();
                    twin.role = VarRole::SrcReg;
                    twin
                }
                _ => continue,
            };
            let adjacent: Vec<VertexId> = self.succs[index].clone();
            let twin_id = self.add_vertex(Vertex::Var(twin));
            for &adj in &adjacent {
                self.remove_edge(vid, adj);
                self.add_edge(twin_id, adj);
            }
        }
    }

    /// Re-points register aliases at their canonical register, flattening
    /// alias-of-alias chains. Aliases that do not resolve to a destination
    /// register are reported as warnings and unlinked.
    pub fn update_var_aliases(&mut self, sink: &DiagnosticSink) {
        let count = self.vertices.len();
        for index in 0..count {
            let (mut target, name, location) = match self.vertices[index].as_var() {
                Some(v) if v.role == VarRole::RegAlias => (v.alias_of, v.name.clone(), v.location),
                _ => continue,
            };
            let mut hops = 0;
            while let Some(t) = target {
                if self.vertex(t).is_reg_alias() && hops < count {
                    target = self.vertex(t).as_var().and_then(|v| v.alias_of);
                    hops += 1;
                } else {
                    break;
                }
            }
            let resolved = target.filter(|&t| self.vertex(t).is_dst_reg());
            if resolved.is_none() {
                sink.emit(Diagnostic::warning(
                    code::DANGLING_REG_ALIAS,
                    format!("register alias {name} does not resolve to a register"),
                    location,
                ));
            }
            if let Some(var) = self.vertices[index].as_var_mut() {
                var.alias_of = resolved;
            }
        }
    }

    /// Checks the post-canonicalization invariants, reporting violations as
    /// warnings: source registers must have no in-edges, destination
    /// registers no out-edges, and no elaborator-internal bound-marker
    /// variables should be present.
    pub fn check(&self, sink: &DiagnosticSink) {
        for (vid, vertex) in self.iter_vertices() {
            if let Some(name) = vertex.name() {
                if name.contains("__Vlvbound") {
                    sink.emit(Diagnostic::warning(
                        code::INTERNAL_MARKER_NAME,
                        format!("internal marker variable {name} present in netlist"),
                        vertex.location(),
                    ));
                }
                if vertex.is_src_reg() && self.in_degree(vid) > 0 {
                    sink.emit(Diagnostic::warning(
                        code::SRC_REG_HAS_IN_EDGES,
                        format!("source reg {name} has in edges"),
                        vertex.location(),
                    ));
                }
                if vertex.is_dst_reg() && self.out_degree(vid) > 0 {
                    sink.emit(Diagnostic::warning(
                        code::DST_REG_HAS_OUT_EDGES,
                        format!("destination reg {name} has out edges"),
                        vertex.location(),
                    ));
                }
            }
        }
    }

    /// Writes the graph as a Graphviz dot file for visualisation.
    pub fn write_dot<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "digraph netlist {{")?;
        for (id, vertex) in self.iter_vertices() {
            writeln!(
                out,
                "  {} [label=\"{}\", type=\"{}\"]",
                id.as_raw(),
                vertex.name().unwrap_or(""),
                vertex.dot_type_str()
            )?;
        }
        for (src, dst) in self.iter_edges() {
            writeln!(out, "  {} -> {};", src.as_raw(), dst.as_raw())?;
        }
        writeln!(out, "}}")
    }
}
