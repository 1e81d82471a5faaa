//! Non-fatal problems met while resolving a configuration
//!
//! Resolution never fails because of bad stored data. Instead each problem is
//! reported to a [`DiagnosticSink`]; the default sink logs it.

use std::fmt;

use parking_lot::Mutex;
use tracing::warn;

use crate::tier::TierKind;

/// A problem reported during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A stored value could not be interpreted and was treated as absent
    InvalidValue {
        tier: TierKind,
        tier_id: String,
        property: String,
        message: String,
    },
    /// A tier's store failed; the whole resolution fell back to defaults
    TierUnavailable {
        tier: TierKind,
        tier_id: String,
        message: String,
    },
}

impl Diagnostic {
    pub fn tier(&self) -> TierKind {
        match self {
            Diagnostic::InvalidValue { tier, .. } | Diagnostic::TierUnavailable { tier, .. } => *tier,
        }
    }

    pub fn tier_id(&self) -> &str {
        match self {
            Diagnostic::InvalidValue { tier_id, .. }
            | Diagnostic::TierUnavailable { tier_id, .. } => tier_id,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidValue {
                tier,
                tier_id,
                property,
                message,
            } => write!(
                f,
                "ignoring invalid value of '{}' in {} configuration {}: {}",
                property, tier, tier_id, message
            ),
            Diagnostic::TierUnavailable {
                tier,
                tier_id,
                message,
            } => write!(
                f,
                "{} configuration {} is unavailable, using defaults: {}",
                tier, tier_id, message
            ),
        }
    }
}

/// Receiver of resolution diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that writes every diagnostic to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl DiagnosticSink for LogDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::InvalidValue {
                tier,
                tier_id,
                property,
                message,
            } => warn!(
                tier = %tier,
                tier_id = %tier_id,
                property = %property,
                error = %message,
                "Ignoring invalid configuration value"
            ),
            Diagnostic::TierUnavailable {
                tier,
                tier_id,
                message,
            } => warn!(
                tier = %tier,
                tier_id = %tier_id,
                error = %message,
                "Configuration tier unavailable, falling back to defaults"
            ),
        }
    }
}

/// Sink that keeps diagnostics in memory for later inspection
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every collected diagnostic, leaving the sink empty
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectedDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }
}
