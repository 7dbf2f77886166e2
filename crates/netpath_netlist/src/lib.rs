//! Netlist graph model for combinational timing-path analysis.
//!
//! This crate turns a flattened, Verilator-elaborated netlist (as dumped by
//! `verilator --xml-only`) into a directed graph whose connectivity follows
//! combinational signal flow:
//!
//! - [`dtype`] — the registry of hardware data types referenced by variables
//! - [`graph`] — the vertex/edge store, register splitting and invariant checks
//! - [`loader`] — the XML reader that populates the registry and the graph
//! - [`traverse`] — depth-first traversals, path recovery and enumeration
//!
//! Sequential elements are split into a source twin (fan-out only) and a
//! destination twin (fan-in only), so that every walk which does not cross
//! a twin pair corresponds to a combinational timing path. Querying by name
//! lives one layer up, in `netpath_paths`.

#![warn(missing_docs)]

pub mod dtype;
pub mod error;
pub mod graph;
pub mod ids;
pub mod loader;
pub mod traverse;
pub mod vertex;

pub use dtype::{DType, DTypeDb, EnumItem, Member};
pub use error::NetlistError;
pub use graph::Graph;
pub use ids::{DTypeId, VertexId};
pub use loader::{parse_file, parse_str, LoadedNetlist};
pub use traverse::AvoidSet;
pub use vertex::{LogicKind, LogicVertex, VarRole, VarVertex, Vertex, VertexDirection, VertexKind};
