//! Stable codes identifying each kind of diagnostic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Warning findings, prefixed with `W`.
    Warning,
    /// Informational findings, prefixed with `N`.
    Note,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Warning => 'W',
            Category::Note => 'N',
        }
    }
}

/// A structured diagnostic code: a category prefix and a number, displayed
/// as e.g. `W101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// The netlist is not flat, so an empty graph was produced.
pub const NON_FLAT_NETLIST: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 101,
};

/// An elaborator-internal bound-marker variable is present.
pub const INTERNAL_MARKER_NAME: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 102,
};

/// A source register has in-edges after canonicalization.
pub const SRC_REG_HAS_IN_EDGES: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 103,
};

/// A destination register has out-edges after canonicalization.
pub const DST_REG_HAS_OUT_EDGES: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 104,
};

/// A register alias does not resolve to a register.
pub const DANGLING_REG_ALIAS: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 105,
};
