//! Graph vertices: variables and logic statements.
//!
//! A vertex is exactly one of two kinds. Variable vertices carry the
//! canonicalized name, a type handle, a direction and a role; logic
//! vertices carry only the statement kind. Roles are assigned during
//! loading (destination registers) and canonicalization (source-register
//! twins, register aliases) and are immutable afterwards.

use crate::ids::{DTypeId, VertexId};
use netpath_source::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The port direction of a variable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum VertexDirection {
    /// Not a port.
    None,
    /// An input port.
    Input,
    /// An output port.
    Output,
    /// A bidirectional port.
    Inout,
}

impl fmt::Display for VertexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexDirection::None => write!(f, "none"),
            VertexDirection::Input => write!(f, "input"),
            VertexDirection::Output => write!(f, "output"),
            VertexDirection::Inout => write!(f, "inout"),
        }
    }
}

/// The role a variable plays in the canonicalized graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum VarRole {
    /// An ordinary wire or net.
    Var,
    /// The fan-out half of a split register: out-edges only.
    SrcReg,
    /// The fan-in half of a split register: in-edges only.
    DstReg,
    /// An alias whose only writer is an alias assignment from a register.
    RegAlias,
    /// A vertex removed from consideration without compacting the store.
    Deleted,
}

/// The statement kind of a logic vertex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum LogicKind {
    /// A blocking or continuous assignment.
    Assign,
    /// An alias assignment introduced by the elaborator.
    AssignAlias,
    /// A delayed (non-blocking) assignment; its targets are registers.
    AssignDly,
    /// A wire assignment introduced by the elaborator.
    AssignW,
    /// An `always` block.
    Always,
    /// A public `always` block.
    AlwaysPublic,
    /// An `initial` block.
    Initial,
    /// A module instantiation remnant.
    Instance,
    /// A sensitivity gate.
    SenGate,
    /// A sensitivity item outside any process.
    SenItem,
    /// A support function emitted by the elaborator.
    CFunc,
}

impl LogicKind {
    /// Returns `true` for the assignment kinds, whose two children are
    /// interpreted positionally as right-hand side then left-hand side.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            LogicKind::Assign | LogicKind::AssignAlias | LogicKind::AssignDly | LogicKind::AssignW
        )
    }
}

/// The target kind of a name lookup.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum VertexKind {
    /// Any non-deleted vertex.
    Any,
    /// A register: the destination half of a split pair, or its aliases.
    Reg,
    /// A vertex that may originate a combinational path: an input or inout
    /// port, or a source-register twin.
    StartPoint,
    /// A vertex that may terminate a combinational path: an output or inout
    /// port, or a destination register.
    EndPoint,
    /// Any non-deleted variable.
    MidPoint,
    /// Any non-deleted variable, for listings.
    Named,
    /// A port of any direction.
    Port,
    /// A non-parameter variable.
    Net,
}

/// A variable vertex.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct VarVertex {
    /// The canonicalized hierarchical name.
    pub name: String,
    /// The variable's data type.
    pub dtype: DTypeId,
    /// The port direction, or `None` for internal variables.
    pub direction: VertexDirection,
    /// Where the variable is declared.
    pub location: Location,
    /// `true` for parameters.
    pub is_param: bool,
    /// The parameter's literal value, when `is_param` is set.
    pub param_value: Option<String>,
    /// `true` for variables marked public in the source.
    pub is_public: bool,
    /// The role assigned during loading and canonicalization.
    pub role: VarRole,
    /// The register this variable aliases, for [`VarRole::RegAlias`].
    pub alias_of: Option<VertexId>,
}

/// A logic-statement vertex.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LogicVertex {
    /// The statement kind.
    pub kind: LogicKind,
    /// Where the statement occurs.
    pub location: Location,
}

/// A vertex in the netlist graph: a variable or a logic statement.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Vertex {
    /// A variable vertex.
    Var(VarVertex),
    /// A logic-statement vertex.
    Logic(LogicVertex),
}

impl Vertex {
    /// Returns `true` for logic-statement vertices.
    pub fn is_logic(&self) -> bool {
        matches!(self, Vertex::Logic(_))
    }

    /// Returns the variable payload, if this is a variable vertex.
    pub fn as_var(&self) -> Option<&VarVertex> {
        match self {
            Vertex::Var(v) => Some(v),
            Vertex::Logic(_) => None,
        }
    }

    /// Returns the mutable variable payload, if this is a variable vertex.
    pub fn as_var_mut(&mut self) -> Option<&mut VarVertex> {
        match self {
            Vertex::Var(v) => Some(v),
            Vertex::Logic(_) => None,
        }
    }

    /// Returns the logic payload, if this is a logic vertex.
    pub fn as_logic(&self) -> Option<&LogicVertex> {
        match self {
            Vertex::Logic(l) => Some(l),
            Vertex::Var(_) => None,
        }
    }

    /// Returns the canonical name; logic vertices have none.
    pub fn name(&self) -> Option<&str> {
        self.as_var().map(|v| v.name.as_str())
    }

    /// Returns where the vertex originates in the source.
    pub fn location(&self) -> Location {
        match self {
            Vertex::Var(v) => v.location,
            Vertex::Logic(l) => l.location,
        }
    }

    /// Returns the upper-case kind string used in path reports: the role
    /// for variables, the statement kind for logic.
    pub fn ast_type_str(&self) -> &'static str {
        match self {
            Vertex::Var(v) => match v.role {
                VarRole::Var => "VAR",
                VarRole::SrcReg => "SRC_REG",
                VarRole::DstReg => "DST_REG",
                VarRole::RegAlias => "REG_ALIAS",
                VarRole::Deleted => "DELETED",
            },
            Vertex::Logic(l) => match l.kind {
                LogicKind::Assign => "ASSIGN",
                LogicKind::AssignAlias => "ASSIGN_ALIAS",
                LogicKind::AssignDly => "ASSIGN_DLY",
                LogicKind::AssignW => "ASSIGN_W",
                LogicKind::Always => "ALWAYS",
                LogicKind::AlwaysPublic => "ALWAYS_PUBLIC",
                LogicKind::Initial => "INITIAL",
                LogicKind::Instance => "INSTANCE",
                LogicKind::SenGate => "SEN_GATE",
                LogicKind::SenItem => "SEN_ITEM",
                LogicKind::CFunc => "C_FUNC",
            },
        }
    }

    /// Returns the kind string used in Graphviz output: lower-case
    /// statement names for logic, role strings for variables.
    pub fn dot_type_str(&self) -> &'static str {
        match self {
            Vertex::Var(_) => self.ast_type_str(),
            Vertex::Logic(l) => match l.kind {
                LogicKind::Assign => "assign",
                LogicKind::AssignAlias => "assign_alias",
                LogicKind::AssignDly => "assign_dly",
                LogicKind::AssignW => "assign_w",
                LogicKind::Always => "always",
                LogicKind::AlwaysPublic => "always_public",
                LogicKind::Initial => "initial",
                LogicKind::Instance => "instance",
                LogicKind::SenGate => "sen_gate",
                LogicKind::SenItem => "sen_item",
                LogicKind::CFunc => "c_func",
            },
        }
    }

    /// Returns `true` if this variable is a port of any direction.
    pub fn is_port(&self) -> bool {
        self.as_var()
            .is_some_and(|v| v.direction != VertexDirection::None)
    }

    /// Returns `true` if this vertex has been marked deleted.
    pub fn is_deleted(&self) -> bool {
        self.as_var().is_some_and(|v| v.role == VarRole::Deleted)
    }

    /// Returns `true` for the destination half of a split register.
    pub fn is_dst_reg(&self) -> bool {
        self.as_var().is_some_and(|v| v.role == VarRole::DstReg)
    }

    /// Returns `true` for the source half of a split register.
    pub fn is_src_reg(&self) -> bool {
        self.as_var().is_some_and(|v| v.role == VarRole::SrcReg)
    }

    /// Returns `true` for register aliases.
    pub fn is_reg_alias(&self) -> bool {
        self.as_var().is_some_and(|v| v.role == VarRole::RegAlias)
    }

    /// Returns `true` if this vertex may originate a combinational path.
    pub fn is_start_point(&self) -> bool {
        self.as_var().is_some_and(|v| {
            v.role != VarRole::Deleted
                && (matches!(
                    v.direction,
                    VertexDirection::Input | VertexDirection::Inout
                ) || v.role == VarRole::SrcReg)
        })
    }

    /// Returns `true` if this vertex may terminate a combinational path.
    pub fn is_end_point(&self) -> bool {
        self.as_var().is_some_and(|v| {
            v.role != VarRole::Deleted
                && (matches!(
                    v.direction,
                    VertexDirection::Output | VertexDirection::Inout
                ) || v.role == VarRole::DstReg)
        })
    }

    /// Returns `true` if the vertex matches the given lookup kind.
    pub fn matches_kind(&self, kind: VertexKind) -> bool {
        match kind {
            VertexKind::Any => !self.is_deleted(),
            VertexKind::Reg => self.is_dst_reg() || self.is_reg_alias(),
            VertexKind::StartPoint => self.is_start_point(),
            VertexKind::EndPoint => self.is_end_point(),
            VertexKind::MidPoint | VertexKind::Named => {
                self.as_var().is_some_and(|v| v.role != VarRole::Deleted)
            }
            VertexKind::Port => self.is_port() && !self.is_deleted(),
            VertexKind::Net => self
                .as_var()
                .is_some_and(|v| !v.is_param && v.role != VarRole::Deleted),
        }
    }
}
