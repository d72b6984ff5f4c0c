//! Collection point for diagnostics raised while routing.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Gathers the diagnostics of one routing run.
///
/// Shared by reference; `emit` takes `&self`, so the sink can be handed to
/// the router and read back afterwards without a mutable borrow.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        // A panicking emitter cannot leave the vector half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.entries().push(diag);
    }

    /// Number of error diagnostics recorded so far.
    pub fn error_count(&self) -> usize {
        self.entries().iter().filter(|d| d.severity.is_error()).count()
    }

    /// `true` once any error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.entries().iter().any(|d| d.severity.is_error())
    }

    /// Number of recorded diagnostics with the given code.
    pub fn count_code(&self, code: DiagnosticCode) -> usize {
        self.entries().iter().filter(|d| d.code == code).count()
    }

    /// Copy of everything recorded, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries().clone()
    }
}
