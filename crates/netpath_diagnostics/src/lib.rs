//! Structured diagnostics for netpath.
//!
//! Netlist loading and canonicalization report non-fatal findings — a
//! non-flat netlist, invariant violations, elaborator-internal marker names
//! — as [`Diagnostic`] values accumulated in a [`DiagnosticSink`]. Queries
//! proceed regardless; it is up to the caller to surface the warnings.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use severity::Severity;
pub use sink::DiagnosticSink;
