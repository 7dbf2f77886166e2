//! Diagnostic severity levels.
//!
//! Netlist analysis never accumulates errors: anything fatal is returned
//! through the loader and query result types. What the sink collects are
//! the warn-and-proceed findings, so the scale stops at [`Severity::Warning`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity of an accumulated diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Context worth surfacing but not a problem, such as a summary of a
    /// degraded loading mode.
    Note,
    /// A finding the designer should review — an invariant violation, an
    /// elaborator artifact — that does not invalidate query results.
    Warning,
}

impl Severity {
    /// Returns `true` for [`Severity::Warning`].
    pub fn is_warning(self) -> bool {
        self == Severity::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_sort_below_warnings() {
        assert!(Severity::Note < Severity::Warning);
    }

    #[test]
    fn warning_predicate() {
        assert!(Severity::Warning.is_warning());
        assert!(!Severity::Note.is_warning());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Severity::Warning), "warning");
        assert_eq!(format!("{}", Severity::Note), "note");
    }
}
