//! Structured diagnostic messages with severity, codes and locations.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use netpath_source::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured diagnostic message.
///
/// Diagnostics are the mechanism for reporting non-fatal findings to the
/// user. Each diagnostic includes a severity level, a unique code, the main
/// message, and the source location the finding refers to (which may be the
/// dummy location for whole-netlist findings).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The source location the finding refers to.
    pub location: Location,
}

impl Diagnostic {
    /// Creates a new warning diagnostic with the given code, message, and
    /// location.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            location,
        }
    }

    /// Creates a new note diagnostic with the given code, message, and
    /// location.
    pub fn note(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity: Severity::Note,
            code,
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_dummy() {
            write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
        } else {
            write!(
                f,
                "{}[{}]: {} at {}",
                self.severity, self.code, self.message, self.location
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code;
    use netpath_source::FileId;

    #[test]
    fn create_warning() {
        let diag = Diagnostic::warning(
            code::NON_FLAT_NETLIST,
            "netlist is not flat",
            Location::DUMMY,
        );
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.message, "netlist is not flat");
        assert_eq!(format!("{}", diag.code), "W101");
    }

    #[test]
    fn display_without_location() {
        let diag = Diagnostic::warning(
            code::NON_FLAT_NETLIST,
            "netlist is not flat",
            Location::DUMMY,
        );
        assert_eq!(format!("{diag}"), "warning[W101]: netlist is not flat");
    }

    #[test]
    fn display_with_location() {
        let loc = Location::new(FileId::from_raw(0), 4, 2, 4, 9);
        let diag = Diagnostic::warning(code::SRC_REG_HAS_IN_EDGES, "source reg has in edges", loc);
        assert_eq!(
            format!("{diag}"),
            "warning[W103]: source reg has in edges at 4:2"
        );
    }

    #[test]
    fn note_severity() {
        let diag = Diagnostic::note(code::INTERNAL_MARKER_NAME, "marker", Location::DUMMY);
        assert_eq!(diag.severity, Severity::Note);
    }
}
