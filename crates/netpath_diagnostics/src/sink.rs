//! Accumulation of diagnostics during loading and canonicalization.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A thread-safe accumulator for warn-and-proceed findings.
///
/// The loader and the canonicalization passes push findings here and carry
/// on; the owning netlist exposes the collected list once construction is
/// done. The warning count is kept in an atomic so `has_warnings` does not
/// need to take the lock.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    collected: Mutex<Vec<Diagnostic>>,
    warning_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic to the sink.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity == Severity::Warning {
            self.warning_count.fetch_add(1, Ordering::Relaxed);
        }
        self.collected.lock().unwrap().push(diag);
    }

    /// Returns `true` if any warning-severity diagnostics were emitted.
    pub fn has_warnings(&self) -> bool {
        self.warning_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of warning-severity diagnostics emitted so far.
    pub fn warning_count(&self) -> usize {
        self.warning_count.load(Ordering::Relaxed)
    }

    /// Returns the number of diagnostics of any severity emitted so far.
    pub fn len(&self) -> usize {
        self.collected.lock().unwrap().len()
    }

    /// Returns `true` if no diagnostics were emitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.collected.lock().unwrap())
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collected.lock().unwrap().clone()
    }
}
