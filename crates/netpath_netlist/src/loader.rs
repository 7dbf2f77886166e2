//! Reader for the elaborator's XML netlist dump.
//!
//! The document is produced by Verilator invoked with flags requesting a
//! flattened, XML-dumped, non-optimized elaboration. Loading is a recursive
//! descent that dispatches on node names: the `files` section populates the
//! file table, the `typetable` is walked twice (type children may be
//! declared after the types that reference them), and the single top
//! module's scopes, variables and statements become graph vertices and
//! edges.
//!
//! If the netlist contains more than one module, or any interface, the
//! design could not be flattened; the loader then reports a warning and
//! returns a usable empty graph.

use crate::dtype::{DType, DTypeDb, EnumItem, Member};
use crate::error::NetlistError;
use crate::graph::Graph;
use crate::ids::VertexId;
use crate::vertex::{LogicKind, LogicVertex, VarRole, VarVertex, Vertex, VertexDirection};
use log::debug;
use netpath_common::Options;
use netpath_diagnostics::{code, Diagnostic, DiagnosticSink};
use netpath_source::{FileId, FileTable, Location};
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::path::Path;

/// The product of loading: the graph, the type registry and the file table.
///
/// The graph still needs canonicalization (alias marking, register
/// splitting, invariant checks) before it answers path queries correctly.
#[derive(Debug)]
pub struct LoadedNetlist {
    /// The netlist graph.
    pub graph: Graph,
    /// The data-type registry.
    pub dtypes: DTypeDb,
    /// The source files named by the netlist.
    pub files: FileTable,
}

/// Reads and parses a Verilator XML file from disk.
pub fn parse_file(
    path: impl AsRef<Path>,
    options: &Options,
    sink: &DiagnosticSink,
) -> Result<LoadedNetlist, NetlistError> {
    let text = std::fs::read_to_string(path)?;
    parse_str(&text, options, sink)
}

/// Parses a Verilator XML document from a string.
pub fn parse_str(
    xml: &str,
    options: &Options,
    sink: &DiagnosticSink,
) -> Result<LoadedNetlist, NetlistError> {
    let doc = Document::parse(xml).map_err(|e| NetlistError::Xml(e.to_string()))?;
    Loader::new(options, sink).run(&doc)
}

/// Which of the two typetable passes is running.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Pass {
    /// Create a shell entry per type id.
    Shells,
    /// Attach resolved child references to the shells.
    Resolve,
}

struct Loader<'a> {
    graph: Graph,
    dtypes: DTypeDb,
    files: FileTable,
    file_ids: HashMap<String, FileId>,
    vars: HashMap<String, VertexId>,
    top_name: String,
    scope_depth: usize,
    logic_stack: Vec<VertexId>,
    is_lvalue: bool,
    in_delayed_assign: bool,
    options: &'a Options,
    sink: &'a DiagnosticSink,
}

fn attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, NetlistError> {
    node.attribute(name).ok_or_else(|| {
        NetlistError::malformed(format!(
            "missing attribute '{name}' on <{}>",
            node.tag_name().name()
        ))
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|c| c.is_element())
}

fn parse_u32(text: &str) -> Result<u32, NetlistError> {
    text.parse::<u32>()
        .map_err(|_| NetlistError::malformed(format!("expected a number, found '{text}'")))
}

fn parse_direction(text: &str) -> VertexDirection {
    match text {
        "input" => VertexDirection::Input,
        "output" => VertexDirection::Output,
        "inout" => VertexDirection::Inout,
        _ => VertexDirection::None,
    }
}

impl<'a> Loader<'a> {
    fn new(options: &'a Options, sink: &'a DiagnosticSink) -> Self {
        Self {
            graph: Graph::new(),
            dtypes: DTypeDb::new(),
            files: FileTable::new(),
            file_ids: HashMap::new(),
            vars: HashMap::new(),
            top_name: String::new(),
            scope_depth: 0,
            logic_stack: Vec::new(),
            is_lvalue: false,
            in_delayed_assign: false,
            options,
            sink,
        }
    }

    fn run(mut self, doc: &Document) -> Result<LoadedNetlist, NetlistError> {
        let root = doc.root_element();
        if root.tag_name().name() != "verilator_xml" {
            return Err(NetlistError::malformed(
                "document root is not <verilator_xml>",
            ));
        }

        let files_node = child_element(root, "files")
            .ok_or_else(|| NetlistError::malformed("missing <files> section"))?;
        for file in elements(files_node).filter(|n| n.tag_name().name() == "file") {
            let id = attr(file, "id")?;
            let filename = attr(file, "filename")?;
            let language = attr(file, "language")?;
            let file_id = self.files.add(filename, language);
            self.file_ids.insert(id.to_string(), file_id);
        }

        let netlist_node = child_element(root, "netlist")
            .ok_or_else(|| NetlistError::malformed("missing <netlist> section"))?;

        let mut module_count = 0usize;
        let mut iface_count = 0usize;
        let mut package_count = 0usize;
        for child in elements(netlist_node) {
            match child.tag_name().name() {
                "module" => module_count += 1,
                "iface" => iface_count += 1,
                "package" => package_count += 1,
                _ => {}
            }
        }
        debug!(
            "netlist has {module_count} modules, {iface_count} interfaces, \
             {package_count} packages"
        );

        let typetable = child_element(netlist_node, "typetable")
            .ok_or_else(|| NetlistError::malformed("missing <typetable> section"))?;
        self.visit_type_table(typetable, Pass::Shells)?;
        self.visit_type_table(typetable, Pass::Resolve)?;
        debug!("type table contains {} entries", self.dtypes.len());

        if module_count == 1 && iface_count == 0 {
            let module = child_element(netlist_node, "module")
                .ok_or_else(|| NetlistError::malformed("missing <module> section"))?;
            let name = attr(module, "name")?;
            if name != "TOP" {
                return Err(NetlistError::malformed(format!(
                    "unexpected top module name '{name}'"
                )));
            }
            self.iterate_children(module)?;
            debug!(
                "netlist contains {} vertices and {} edges",
                self.graph.num_vertices(),
                self.graph.num_edges()
            );
        } else {
            self.sink.emit(Diagnostic::warning(
                code::NON_FLAT_NETLIST,
                "netlist is not flat, producing an empty graph",
                Location::DUMMY,
            ));
        }

        Ok(LoadedNetlist {
            graph: self.graph,
            dtypes: self.dtypes,
            files: self.files,
        })
    }

    fn parse_location(&self, loc: &str) -> Result<Location, NetlistError> {
        let tokens: Vec<&str> = loc.split(',').collect();
        if tokens.len() != 5 {
            return Err(NetlistError::malformed(format!(
                "malformed location '{loc}'"
            )));
        }
        let file = self
            .file_ids
            .get(tokens[0])
            .copied()
            .unwrap_or(FileId::DUMMY);
        Ok(Location::new(
            file,
            parse_u32(tokens[1])?,
            parse_u32(tokens[2])?,
            parse_u32(tokens[3])?,
            parse_u32(tokens[4])?,
        ))
    }

    fn location_of(&self, node: Node) -> Result<Location, NetlistError> {
        self.parse_location(attr(node, "loc")?)
    }

    //===------------------------------------------------------------------===//
    // Typetable.
    //===------------------------------------------------------------------===//

    fn visit_type_table(&mut self, node: Node, pass: Pass) -> Result<(), NetlistError> {
        for child in elements(node) {
            self.dispatch_dtype(child, pass)?;
        }
        Ok(())
    }

    fn dispatch_dtype(&mut self, node: Node, pass: Pass) -> Result<(), NetlistError> {
        match node.tag_name().name() {
            "basicdtype" => self.visit_basic_dtype(node, pass),
            "refdtype" => self.visit_ref_dtype(node, pass),
            "packarraydtype" => self.visit_array_dtype(node, pass, true),
            "unpackarraydtype" => self.visit_array_dtype(node, pass, false),
            "structdtype" => self.visit_aggregate_dtype(node, pass, false),
            "uniondtype" => self.visit_aggregate_dtype(node, pass, true),
            "enumdtype" => self.visit_enum_dtype(node, pass),
            "ifacerefdtype" => self.visit_iface_ref_dtype(node, pass),
            other => {
                debug!("unrecognised typetable node <{other}>");
                for child in elements(node) {
                    self.dispatch_dtype(child, pass)?;
                }
                Ok(())
            }
        }
    }

    fn visit_basic_dtype(&mut self, node: Node, pass: Pass) -> Result<(), NetlistError> {
        if pass != Pass::Shells {
            return Ok(());
        }
        let id = attr(node, "id")?;
        if self.dtypes.lookup_xml_id(id).is_some() {
            return Ok(());
        }
        let name = attr(node, "name")?;
        let location = self.location_of(node)?;
        let range = match (node.attribute("left"), node.attribute("right")) {
            (Some(left), Some(right)) => Some((parse_u32(left)?, parse_u32(right)?)),
            _ => None,
        };
        self.dtypes.insert(
            id,
            DType::Basic {
                name: name.to_string(),
                location,
                range,
            },
        );
        Ok(())
    }

    fn visit_ref_dtype(&mut self, node: Node, pass: Pass) -> Result<(), NetlistError> {
        let id = attr(node, "id")?;
        match pass {
            Pass::Shells => {
                if self.dtypes.lookup_xml_id(id).is_none() {
                    let name = attr(node, "name")?;
                    let location = self.location_of(node)?;
                    self.dtypes.insert(
                        id,
                        DType::Ref {
                            name: name.to_string(),
                            location,
                            target: None,
                        },
                    );
                }
            }
            Pass::Resolve => {
                let sub_id = attr(node, "sub_dtype_id")?;
                let target = self.dtypes.lookup_xml_id(sub_id).ok_or_else(|| {
                    NetlistError::malformed(format!("could not find ref sub dtype id {sub_id}"))
                })?;
                let slot = self
                    .dtypes
                    .lookup_xml_id(id)
                    .ok_or_else(|| NetlistError::malformed(format!("unknown dtype id {id}")))?;
                if let DType::Ref { target: t, .. } = self.dtypes.get_mut(slot) {
                    *t = Some(target);
                }
            }
        }
        Ok(())
    }

    fn visit_array_dtype(
        &mut self,
        node: Node,
        pass: Pass,
        packed: bool,
    ) -> Result<(), NetlistError> {
        let id = attr(node, "id")?;
        match pass {
            Pass::Shells => {
                if self.dtypes.lookup_xml_id(id).is_none() {
                    let location = self.location_of(node)?;
                    let range = elements(node)
                        .find(|c| c.tag_name().name() == "range")
                        .ok_or_else(|| {
                            NetlistError::malformed("array dtype expects one range child")
                        })?;
                    let (high, low) = self.visit_range(range)?;
                    self.dtypes.insert(
                        id,
                        DType::Array {
                            location,
                            high,
                            low,
                            packed,
                            element: None,
                        },
                    );
                }
            }
            Pass::Resolve => {
                let sub_id = attr(node, "sub_dtype_id")?;
                let element = self.dtypes.lookup_xml_id(sub_id).ok_or_else(|| {
                    NetlistError::malformed(format!("could not find array sub dtype id {sub_id}"))
                })?;
                let slot = self
                    .dtypes
                    .lookup_xml_id(id)
                    .ok_or_else(|| NetlistError::malformed(format!("unknown dtype id {id}")))?;
                if let DType::Array { element: e, .. } = self.dtypes.get_mut(slot) {
                    *e = Some(element);
                }
            }
        }
        Ok(())
    }

    fn visit_aggregate_dtype(
        &mut self,
        node: Node,
        pass: Pass,
        is_union: bool,
    ) -> Result<(), NetlistError> {
        let id = attr(node, "id")?;
        match pass {
            Pass::Shells => {
                if self.dtypes.lookup_xml_id(id).is_none() {
                    let location = self.location_of(node)?;
                    let name = node.attribute("name").map(str::to_string);
                    let dtype = if is_union {
                        DType::Union {
                            name,
                            location,
                            members: Vec::new(),
                        }
                    } else {
                        DType::Struct {
                            name,
                            location,
                            members: Vec::new(),
                        }
                    };
                    self.dtypes.insert(id, dtype);
                }
            }
            Pass::Resolve => {
                let mut resolved = Vec::new();
                for child in elements(node) {
                    if child.tag_name().name() != "memberdtype" {
                        return Err(NetlistError::malformed(
                            "aggregate dtype expects memberdtype children",
                        ));
                    }
                    resolved.push(self.visit_member_dtype(child)?);
                }
                let slot = self
                    .dtypes
                    .lookup_xml_id(id)
                    .ok_or_else(|| NetlistError::malformed(format!("unknown dtype id {id}")))?;
                match self.dtypes.get_mut(slot) {
                    DType::Struct { members, .. } | DType::Union { members, .. } => {
                        *members = resolved;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn visit_member_dtype(&self, node: Node) -> Result<Member, NetlistError> {
        let name = attr(node, "name")?;
        let location = self.location_of(node)?;
        let sub_id = attr(node, "sub_dtype_id")?;
        let dtype = self.dtypes.lookup_xml_id(sub_id).ok_or_else(|| {
            NetlistError::malformed(format!("could not find member sub dtype id {sub_id}"))
        })?;
        Ok(Member {
            name: name.to_string(),
            location,
            dtype,
        })
    }

    fn visit_enum_dtype(&mut self, node: Node, pass: Pass) -> Result<(), NetlistError> {
        let id = attr(node, "id")?;
        match pass {
            Pass::Shells => {
                if self.dtypes.lookup_xml_id(id).is_none() {
                    let name = attr(node, "name")?;
                    let location = self.location_of(node)?;
                    let mut items = Vec::new();
                    for child in elements(node) {
                        if child.tag_name().name() != "enumitem" {
                            return Err(NetlistError::malformed(
                                "enum dtype expects enumitem children",
                            ));
                        }
                        items.push(self.visit_enum_item(child)?);
                    }
                    self.dtypes.insert(
                        id,
                        DType::Enum {
                            name: name.to_string(),
                            location,
                            underlying: None,
                            items,
                        },
                    );
                }
            }
            Pass::Resolve => {
                let sub_id = attr(node, "sub_dtype_id")?;
                let underlying = self.dtypes.lookup_xml_id(sub_id).ok_or_else(|| {
                    NetlistError::malformed(format!("could not find enum sub dtype id {sub_id}"))
                })?;
                let slot = self
                    .dtypes
                    .lookup_xml_id(id)
                    .ok_or_else(|| NetlistError::malformed(format!("unknown dtype id {id}")))?;
                if let DType::Enum { underlying: u, .. } = self.dtypes.get_mut(slot) {
                    *u = Some(underlying);
                }
            }
        }
        Ok(())
    }

    fn visit_enum_item(&self, node: Node) -> Result<EnumItem, NetlistError> {
        let name = attr(node, "name")?;
        let konst = elements(node)
            .next()
            .filter(|c| c.tag_name().name() == "const")
            .ok_or_else(|| NetlistError::malformed("enum item expects a const child"))?;
        Ok(EnumItem {
            name: name.to_string(),
            value: visit_const(konst)?,
        })
    }

    fn visit_range(&self, node: Node) -> Result<(u64, u64), NetlistError> {
        let consts: Vec<Node> = elements(node).collect();
        if consts.len() != 2 {
            return Err(NetlistError::malformed("range expects two const children"));
        }
        // Positional order mirrors the XML convention: high bound first.
        let high = visit_const(consts[0])?;
        let low = visit_const(consts[1])?;
        Ok((high, low))
    }

    fn visit_iface_ref_dtype(&mut self, node: Node, pass: Pass) -> Result<(), NetlistError> {
        if pass != Pass::Shells {
            return Ok(());
        }
        let id = attr(node, "id")?;
        if self.dtypes.lookup_xml_id(id).is_none() {
            let location = match node.attribute("loc") {
                Some(loc) => self.parse_location(loc)?,
                None => Location::DUMMY,
            };
            self.dtypes.insert(
                id,
                DType::InterfaceRef {
                    name: node.attribute("name").map(str::to_string),
                    location,
                },
            );
        }
        Ok(())
    }

    //===------------------------------------------------------------------===//
    // Module walk.
    //===------------------------------------------------------------------===//

    fn iterate_children(&mut self, node: Node) -> Result<(), NetlistError> {
        for child in elements(node) {
            self.dispatch(child)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, node: Node) -> Result<(), NetlistError> {
        match node.tag_name().name() {
            "scope" | "topscope" => self.new_scope(node),
            "var" => self.new_var(node),
            "varscope" => self.new_var_scope(node),
            "varref" => self.new_var_ref(node),
            "assign" | "contassign" => self.new_statement(node, LogicKind::Assign),
            "assignw" => self.new_statement(node, LogicKind::AssignW),
            "assigndly" => {
                self.in_delayed_assign = true;
                let result = self.new_statement(node, LogicKind::AssignDly);
                self.in_delayed_assign = false;
                result
            }
            "assignalias" => self.new_statement(node, LogicKind::AssignAlias),
            "always" => self.new_statement(node, LogicKind::Always),
            "alwayspublic" => self.new_statement(node, LogicKind::AlwaysPublic),
            "initial" => self.new_statement(node, LogicKind::Initial),
            "instance" => self.new_statement(node, LogicKind::Instance),
            "sengate" => self.new_statement(node, LogicKind::SenGate),
            "senitem" => self.visit_sen_item(node),
            "cfunc" => self.new_statement(node, LogicKind::CFunc),
            // Interface references are already resolved by flattening.
            "intfref" => self.iterate_children(node),
            other => {
                if self.options.debug_mode {
                    debug!("unrecognised node <{other}>");
                }
                self.iterate_children(node)
            }
        }
    }

    fn new_scope(&mut self, node: Node) -> Result<(), NetlistError> {
        if self.options.debug_mode {
            debug!("new scope");
        }
        self.scope_depth += 1;
        let result = self.iterate_children(node);
        self.scope_depth -= 1;
        result
    }

    /// Canonicalise a name by adding the top prefix when it is known and
    /// not already present.
    fn add_top_prefix(&self, name: &str) -> String {
        if !self.top_name.is_empty() && !name.starts_with(self.top_name.as_str()) {
            format!("{}.{name}", self.top_name)
        } else {
            name.to_string()
        }
    }

    fn lookup_var_vertex(&self, name: &str) -> Option<VertexId> {
        if let Some(&vertex) = self.vars.get(name) {
            return Some(vertex);
        }
        self.vars.get(&self.add_top_prefix(name)).copied()
    }

    fn new_var(&mut self, node: Node) -> Result<(), NetlistError> {
        let name = attr(node, "name")?;
        let location = self.location_of(node)?;
        let dtype_xml_id = attr(node, "dtype_id")?;
        let dtype = self.dtypes.lookup_xml_id(dtype_xml_id).ok_or_else(|| {
            NetlistError::malformed(format!("unknown dtype id {dtype_xml_id} for var {name}"))
        })?;
        let direction = node
            .attribute("dir")
            .map_or(VertexDirection::None, parse_direction);
        let mut is_param = false;
        let mut param_value = None;
        if node.attribute("param").is_some() {
            let konst = elements(node)
                .next()
                .filter(|c| c.tag_name().name() == "const")
                .ok_or_else(|| {
                    NetlistError::malformed(format!("expected const child under parameter {name}"))
                })?;
            is_param = true;
            param_value = Some(attr(konst, "name")?.to_string());
        }
        let is_public = node.attribute("public").is_some();

        // The top name is inferred from the prefixes of dotted names at
        // module level; the netlist XML does not state it directly.
        if self.scope_depth == 0 && !name.starts_with("__V") {
            if let Some(pos) = name.find('.') {
                let prefix = &name[..pos];
                if self.top_name.is_empty() {
                    self.top_name = prefix.to_string();
                    if self.options.debug_mode {
                        debug!("got top name {}", self.top_name);
                    }
                } else if self.top_name != prefix {
                    return Err(NetlistError::malformed(format!(
                        "conflicting top-level name prefixes '{}' and '{prefix}'",
                        self.top_name
                    )));
                }
            }
        }

        let canonical = self.add_top_prefix(name);
        let vertex = self.graph.add_vertex(Vertex::Var(VarVertex {
            name: canonical.clone(),
            dtype,
            direction,
            location,
            is_param,
            param_value,
            is_public,
            role: VarRole::Var,
            alias_of: None,
        }));
        if self.vars.contains_key(&canonical) {
            if self.options.debug_mode {
                debug!("var {name} (canonical {canonical}) already exists");
            }
        } else {
            self.vars.insert(canonical, vertex);
        }

        // Stitch the flattened port halves together: a var that declares an
        // origName equal to an already-declared port gets edges in both
        // directions to that port and inherits its direction.
        if let Some(orig_name) = node.attribute("origName") {
            if let Some(&port_vertex) = self.vars.get(orig_name) {
                if port_vertex != vertex && self.graph.vertex(port_vertex).is_port() && !is_param {
                    self.graph.add_edge(port_vertex, vertex);
                    self.graph.add_edge(vertex, port_vertex);
                    let port_direction = self
                        .graph
                        .vertex(port_vertex)
                        .as_var()
                        .map(|v| v.direction);
                    if let (Some(dir), Some(var)) =
                        (port_direction, self.graph.vertex_mut(vertex).as_var_mut())
                    {
                        var.direction = dir;
                    }
                }
            }
        }
        Ok(())
    }

    fn new_var_scope(&mut self, node: Node) -> Result<(), NetlistError> {
        let name = attr(node, "name")?;
        // The elaborator reintroduces some vars inside scopes; only names
        // not yet registered become new vertices.
        if self.lookup_var_vertex(name).is_some() {
            Ok(())
        } else {
            self.new_var(node)
        }
    }

    fn new_statement(&mut self, node: Node, kind: LogicKind) -> Result<(), NetlistError> {
        // A statement must have a scope for variable references to occur in.
        if self.scope_depth == 0 {
            return Ok(());
        }
        let location = self.location_of(node)?;
        let vertex = self
            .graph
            .add_vertex(Vertex::Logic(LogicVertex { kind, location }));
        if let Some(&parent) = self.logic_stack.last() {
            self.graph.add_edge(parent, vertex);
        }
        self.logic_stack.push(vertex);
        let result = if kind.is_assignment() {
            self.visit_assignment_children(node)
        } else {
            self.iterate_children(node)
        };
        self.logic_stack.pop();
        result
    }

    /// Assignments have two children, interpreted positionally as the
    /// right-hand side then the left-hand side.
    fn visit_assignment_children(&mut self, node: Node) -> Result<(), NetlistError> {
        let children: Vec<Node> = elements(node).collect();
        if children.len() != 2 {
            return Err(NetlistError::malformed(
                "assignment statement expects two children",
            ));
        }
        self.dispatch(children[0])?;
        self.is_lvalue = true;
        let result = self.dispatch(children[1]);
        self.is_lvalue = false;
        result
    }

    fn new_var_ref(&mut self, node: Node) -> Result<(), NetlistError> {
        if self.scope_depth == 0 {
            return Ok(());
        }
        let name = attr(node, "name")?;
        let Some(&logic) = self.logic_stack.last() else {
            return Err(NetlistError::malformed(format!(
                "var {name} is not under a logic block"
            )));
        };
        let var = self.lookup_var_vertex(name).ok_or_else(|| {
            NetlistError::malformed(format!("var {name} does not have a declaration"))
        })?;
        if self.is_lvalue {
            self.graph.add_edge(logic, var);
            if self.in_delayed_assign {
                // A delayed-assignment target is sequential state.
                if let Some(v) = self.graph.vertex_mut(var).as_var_mut() {
                    v.role = VarRole::DstReg;
                }
            }
        } else {
            self.graph.add_edge(var, logic);
        }
        self.iterate_children(node)
    }

    fn visit_sen_item(&mut self, node: Node) -> Result<(), NetlistError> {
        if self.logic_stack.is_empty() {
            self.new_statement(node, LogicKind::SenItem)
        } else {
            self.iterate_children(node)
        }
    }
}

/// Parses an elaborator constant literal: a bare decimal, or a prefixed
/// form whose prefix is `'sh` (signed hex) or `'h` (hex).
fn visit_const(node: Node) -> Result<u64, NetlistError> {
    let value = attr(node, "name")?;
    if let Some(pos) = value.rfind("'sh") {
        let parsed = i64::from_str_radix(&value[pos + 3..], 16).map_err(|_| {
            NetlistError::malformed(format!("malformed signed hex constant '{value}'"))
        })?;
        return Ok(parsed as u64);
    }
    if let Some(pos) = value.rfind("'h") {
        return u64::from_str_radix(&value[pos + 2..], 16)
            .map_err(|_| NetlistError::malformed(format!("malformed hex constant '{value}'")));
    }
    if value.contains('\'') {
        return Err(NetlistError::malformed(format!(
            "unexpected constant prefix in '{value}'"
        )));
    }
    value
        .parse::<u64>()
        .map_err(|_| NetlistError::malformed(format!("malformed constant '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::VertexKind;

    fn load(xml: &str) -> (LoadedNetlist, DiagnosticSink) {
        let options = Options::default();
        let sink = DiagnosticSink::new();
        let loaded = parse_str(xml, &options, &sink).expect("load should succeed");
        (loaded, sink)
    }

    fn load_err(xml: &str) -> NetlistError {
        let options = Options::default();
        let sink = DiagnosticSink::new();
        parse_str(xml, &options, &sink).expect_err("load should fail")
    }

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<verilator_xml>
  <files>
    <file id="a" filename="wire.sv" language="1800-2017"/>
  </files>
  <netlist>
    <module name="TOP" loc="a,1,1,5,10">
      <var name="in" loc="a,2,3,2,5" dtype_id="1" dir="input"/>
      <var name="out" loc="a,3,3,3,6" dtype_id="1" dir="output"/>
      <topscope loc="a,1,1,5,10">
        <scope loc="a,1,1,5,10" name="TOP">
          <contassign loc="a,4,3,4,18" dtype_id="1">
            <varref name="in" loc="a,4,16,4,18" dtype_id="1"/>
            <varref name="out" loc="a,4,10,4,13" dtype_id="1"/>
          </contassign>
        </scope>
      </topscope>
    </module>
    <typetable loc="a,1,1,1,1">
      <basicdtype id="1" name="logic" loc="a,2,3,2,5"/>
    </typetable>
  </netlist>
</verilator_xml>
"#;

    #[test]
    fn minimal_netlist_loads() {
        let (loaded, sink) = load(MINIMAL);
        assert!(sink.is_empty());
        assert_eq!(loaded.files.len(), 1);
        assert_eq!(loaded.dtypes.len(), 1);
        // in, out and one assign statement
        assert_eq!(loaded.graph.num_vertices(), 3);
        assert_eq!(loaded.graph.num_edges(), 2);
        assert!(loaded.dtypes.fully_resolved());
    }

    #[test]
    fn edges_follow_read_write_direction() {
        let (loaded, _) = load(MINIMAL);
        let graph = &loaded.graph;
        let in_id = graph
            .iter_vertices()
            .find(|(_, v)| v.name() == Some("in"))
            .map(|(id, _)| id)
            .unwrap();
        let out_id = graph
            .iter_vertices()
            .find(|(_, v)| v.name() == Some("out"))
            .map(|(id, _)| id)
            .unwrap();
        assert_eq!(graph.out_degree(in_id), 1);
        assert_eq!(graph.in_degree(in_id), 0);
        assert_eq!(graph.in_degree(out_id), 1);
        assert_eq!(graph.out_degree(out_id), 0);
    }

    #[test]
    fn ports_get_directions() {
        let (loaded, _) = load(MINIMAL);
        let (_, in_vertex) = loaded
            .graph
            .iter_vertices()
            .find(|(_, v)| v.name() == Some("in"))
            .unwrap();
        assert!(in_vertex.matches_kind(VertexKind::StartPoint));
        assert!(in_vertex.matches_kind(VertexKind::Port));
    }

    #[test]
    fn locations_resolve_file_ids() {
        let (loaded, _) = load(MINIMAL);
        let (_, in_vertex) = loaded
            .graph
            .iter_vertices()
            .find(|(_, v)| v.name() == Some("in"))
            .unwrap();
        let location = in_vertex.location();
        assert_eq!(loaded.files.filename(location.file), "wire.sv");
        assert_eq!(location.start_line, 2);
        assert_eq!(location.start_col, 3);
    }

    #[test]
    fn unparseable_document_is_an_xml_error() {
        let err = load_err("<verilator_xml><unclosed>");
        assert!(matches!(err, NetlistError::Xml(_)));
    }

    #[test]
    fn missing_files_section_is_malformed() {
        let err = load_err("<verilator_xml><netlist/></verilator_xml>");
        assert!(matches!(err, NetlistError::MalformedInput(_)));
        assert!(format!("{err}").contains("files"));
    }

    #[test]
    fn non_top_module_name_is_malformed() {
        let xml = MINIMAL.replace("module name=\"TOP\"", "module name=\"other\"");
        let err = load_err(&xml);
        assert!(format!("{err}").contains("unexpected top module name"));
    }

    #[test]
    fn assignment_with_one_child_is_malformed() {
        let xml = MINIMAL.replace(
            "<varref name=\"in\" loc=\"a,4,16,4,18\" dtype_id=\"1\"/>",
            "",
        );
        let err = load_err(&xml);
        assert!(format!("{err}").contains("assignment statement expects two children"));
    }

    #[test]
    fn varref_outside_logic_is_malformed() {
        let xml = MINIMAL.replace(
            "<contassign loc=\"a,4,3,4,18\" dtype_id=\"1\">",
            "<varref name=\"in\" loc=\"a,4,16,4,18\" dtype_id=\"1\"/><contassign loc=\"a,4,3,4,18\" dtype_id=\"1\">",
        );
        let err = load_err(&xml);
        assert!(format!("{err}").contains("not under a logic block"));
    }

    #[test]
    fn unknown_varref_is_malformed() {
        let xml = MINIMAL.replace("varref name=\"in\"", "varref name=\"missing\"");
        let err = load_err(&xml);
        assert!(format!("{err}").contains("does not have a declaration"));
    }

    #[test]
    fn unresolved_sub_dtype_is_malformed() {
        let xml = MINIMAL.replace(
            "<basicdtype id=\"1\" name=\"logic\" loc=\"a,2,3,2,5\"/>",
            "<basicdtype id=\"1\" name=\"logic\" loc=\"a,2,3,2,5\"/>\
             <refdtype id=\"2\" name=\"t\" loc=\"a,2,3,2,5\" sub_dtype_id=\"9\"/>",
        );
        let err = load_err(&xml);
        assert!(format!("{err}").contains("could not find ref sub dtype id 9"));
    }

    #[test]
    fn non_flat_netlist_returns_empty_graph() {
        let xml = r#"<verilator_xml>
  <files>
    <file id="a" filename="a.sv" language="1800-2017"/>
  </files>
  <netlist>
    <module name="TOP" loc="a,1,1,1,1"/>
    <module name="sub" loc="a,2,1,2,1"/>
    <typetable loc="a,1,1,1,1"/>
  </netlist>
</verilator_xml>
"#;
        let (loaded, sink) = load(xml);
        assert!(loaded.graph.is_empty());
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("not flat"));
    }

    #[test]
    fn iface_makes_netlist_non_flat() {
        let xml = r#"<verilator_xml>
  <files>
    <file id="a" filename="a.sv" language="1800-2017"/>
  </files>
  <netlist>
    <module name="TOP" loc="a,1,1,1,1"/>
    <iface name="bus_if" loc="a,2,1,2,1"/>
    <typetable loc="a,1,1,1,1"/>
  </netlist>
</verilator_xml>
"#;
        let (loaded, sink) = load(xml);
        assert!(loaded.graph.is_empty());
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn delayed_assign_marks_register() {
        let xml = r#"<verilator_xml>
  <files>
    <file id="a" filename="ff.sv" language="1800-2017"/>
  </files>
  <netlist>
    <module name="TOP" loc="a,1,1,9,10">
      <var name="in" loc="a,2,3,2,5" dtype_id="1" dir="input"/>
      <var name="ff.q" loc="a,3,3,3,4" dtype_id="1"/>
      <topscope loc="a,1,1,9,10">
        <scope loc="a,1,1,9,10" name="TOP">
          <always loc="a,5,3,7,6">
            <assigndly loc="a,6,5,6,15" dtype_id="1">
              <varref name="in" loc="a,6,13,6,15" dtype_id="1"/>
              <varref name="ff.q" loc="a,6,5,6,6" dtype_id="1"/>
            </assigndly>
          </always>
        </scope>
      </topscope>
    </module>
    <typetable loc="a,1,1,1,1">
      <basicdtype id="1" name="logic" loc="a,2,3,2,5"/>
    </typetable>
  </netlist>
</verilator_xml>
"#;
        let (loaded, _) = load(xml);
        let (_, q) = loaded
            .graph
            .iter_vertices()
            .find(|(_, v)| v.name() == Some("ff.q"))
            .unwrap();
        assert!(q.is_dst_reg());
        // always -> assigndly parent edge exists
        let kinds: Vec<&str> = loaded
            .graph
            .iter_vertices()
            .filter(|(_, v)| v.is_logic())
            .map(|(_, v)| v.ast_type_str())
            .collect();
        assert_eq!(kinds, vec!["ALWAYS", "ASSIGN_DLY"]);
    }

    #[test]
    fn top_prefix_applied_to_bare_names_after_detection() {
        let xml = r#"<verilator_xml>
  <files>
    <file id="a" filename="chain.sv" language="1800-2017"/>
  </files>
  <netlist>
    <module name="TOP" loc="a,1,1,9,10">
      <var name="in" loc="a,2,3,2,5" dtype_id="1" dir="input"/>
      <var name="chain.a" loc="a,3,3,3,4" dtype_id="1"/>
      <var name="b" loc="a,4,3,4,4" dtype_id="1"/>
      <topscope loc="a,1,1,9,10">
        <scope loc="a,1,1,9,10" name="TOP"/>
      </topscope>
    </module>
    <typetable loc="a,1,1,1,1">
      <basicdtype id="1" name="logic" loc="a,2,3,2,5"/>
    </typetable>
  </netlist>
</verilator_xml>
"#;
        let (loaded, _) = load(xml);
        let names: Vec<&str> = loaded
            .graph
            .iter_vertices()
            .filter_map(|(_, v)| v.name())
            .collect();
        // "in" was declared before the top name was known and stays bare;
        // "b" was declared after and gets the prefix.
        assert_eq!(names, vec!["in", "chain.a", "chain.b"]);
    }

    #[test]
    fn conflicting_top_prefixes_are_malformed() {
        let xml = r#"<verilator_xml>
  <files>
    <file id="a" filename="bad.sv" language="1800-2017"/>
  </files>
  <netlist>
    <module name="TOP" loc="a,1,1,9,10">
      <var name="chain.a" loc="a,3,3,3,4" dtype_id="1"/>
      <var name="other.b" loc="a,4,3,4,4" dtype_id="1"/>
      <topscope loc="a,1,1,9,10">
        <scope loc="a,1,1,9,10" name="TOP"/>
      </topscope>
    </module>
    <typetable loc="a,1,1,1,1">
      <basicdtype id="1" name="logic" loc="a,2,3,2,5"/>
    </typetable>
  </netlist>
</verilator_xml>
"#;
        let err = load_err(xml);
        assert!(format!("{err}").contains("conflicting top-level name prefixes"));
    }

    #[test]
    fn orig_name_stitches_port_halves() {
        let xml = r#"<verilator_xml>
  <files>
    <file id="a" filename="adder.sv" language="1800-2017"/>
  </files>
  <netlist>
    <module name="TOP" loc="a,1,1,9,10">
      <var name="i_a" loc="a,2,3,2,5" dtype_id="1" dir="input"/>
      <var name="adder.i_a" loc="a,2,3,2,5" dtype_id="1" origName="i_a"/>
      <topscope loc="a,1,1,9,10">
        <scope loc="a,1,1,9,10" name="TOP"/>
      </topscope>
    </module>
    <typetable loc="a,1,1,1,1">
      <basicdtype id="1" name="logic" loc="a,2,3,2,5"/>
    </typetable>
  </netlist>
</verilator_xml>
"#;
        let (loaded, _) = load(xml);
        let graph = &loaded.graph;
        let top = graph
            .iter_vertices()
            .find(|(_, v)| v.name() == Some("i_a"))
            .map(|(id, _)| id)
            .unwrap();
        let (inner, inner_vertex) = graph
            .iter_vertices()
            .find(|(_, v)| v.name() == Some("adder.i_a"))
            .unwrap();
        assert_eq!(graph.neighbors(top), &[inner]);
        assert_eq!(graph.neighbors(inner), &[top]);
        // Direction copied from the port half.
        assert!(inner_vertex.matches_kind(VertexKind::StartPoint));
    }

    #[test]
    fn varscope_for_known_name_is_ignored() {
        let xml = MINIMAL.replace(
            "<scope loc=\"a,1,1,5,10\" name=\"TOP\">",
            "<scope loc=\"a,1,1,5,10\" name=\"TOP\">\
             <varscope name=\"in\" loc=\"a,2,3,2,5\" dtype_id=\"1\"/>",
        );
        let (loaded, _) = load(&xml);
        let count = loaded
            .graph
            .iter_vertices()
            .filter(|(_, v)| v.name() == Some("in"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn param_value_is_recorded() {
        let xml = MINIMAL.replace(
            "<var name=\"in\" loc=\"a,2,3,2,5\" dtype_id=\"1\" dir=\"input\"/>",
            "<var name=\"in\" loc=\"a,2,3,2,5\" dtype_id=\"1\" dir=\"input\"/>\
             <var name=\"WIDTH\" loc=\"a,1,9,1,14\" dtype_id=\"1\" param=\"true\">\
             <const name=\"32&apos;sh20\" loc=\"a,1,17,1,19\" dtype_id=\"1\"/></var>",
        );
        let (loaded, _) = load(&xml);
        let (_, width) = loaded
            .graph
            .iter_vertices()
            .find(|(_, v)| v.name() == Some("WIDTH"))
            .unwrap();
        let var = width.as_var().unwrap();
        assert!(var.is_param);
        assert_eq!(var.param_value.as_deref(), Some("32'sh20"));
        assert!(!width.matches_kind(VertexKind::Net));
    }

    #[test]
    fn const_literal_forms() {
        let options = Options::default();
        let sink = DiagnosticSink::new();
        let xml = r#"<verilator_xml>
  <files>
    <file id="a" filename="enum.sv" language="1800-2017"/>
  </files>
  <netlist>
    <module name="TOP" loc="a,1,1,1,1">
      <topscope loc="a,1,1,1,1">
        <scope loc="a,1,1,1,1" name="TOP"/>
      </topscope>
    </module>
    <typetable loc="a,1,1,1,1">
      <basicdtype id="1" name="logic" left="1" right="0" loc="a,1,1,1,1"/>
      <enumdtype id="2" name="state_t" sub_dtype_id="1" loc="a,1,1,1,1">
        <enumitem name="IDLE"><const name="0" loc="a,1,1,1,1"/></enumitem>
        <enumitem name="BUSY"><const name="2'h2" loc="a,1,1,1,1"/></enumitem>
        <enumitem name="DONE"><const name="2'sh3" loc="a,1,1,1,1"/></enumitem>
      </enumdtype>
    </typetable>
  </netlist>
</verilator_xml>
"#;
        let loaded = parse_str(xml, &options, &sink).unwrap();
        let id = loaded.dtypes.find_by_name("state_t").unwrap();
        match loaded.dtypes.get(id) {
            DType::Enum { items, .. } => {
                let values: Vec<u64> = items.iter().map(|i| i.value).collect();
                assert_eq!(values, vec![0, 2, 3]);
            }
            other => panic!("expected enum, found {other:?}"),
        }
        assert_eq!(loaded.dtypes.width(id), 2);
    }
}
