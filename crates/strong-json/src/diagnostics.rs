//! Non-fatal advisories raised while encoding.
//!
//! Diagnostics flow through an injected [`DiagnosticSink`] instead of a
//! global warning channel, so callers can collect and assert on them.

use std::fmt;

/// An advisory event. Encoding continues after any diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A record was dumped whose type is not in the registry; the output
    /// cannot be decoded back with that registry.
    UnregisteredType { type_name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnregisteredType { type_name } => write!(
                f,
                "{type_name} is not registered; its envelope cannot be decoded"
            ),
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UnregisteredType { type_name } => {
                tracing::warn!(type_name = %type_name, "{diagnostic}");
            }
        }
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
