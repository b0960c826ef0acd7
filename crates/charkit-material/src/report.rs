//! Build reports: structured warning accumulation.

use charkit_spec::{ValidationWarning, WarningCode};

/// Accumulates the non-fatal misses of one build pass.
///
/// Libraries never print; the CLI decides how to render these.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Warnings, in occurrence order.
    pub warnings: Vec<ValidationWarning>,
    /// Number of materials (or controls) processed.
    pub processed: usize,
}

impl BuildReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn warn(&mut self, code: WarningCode, message: impl Into<String>) {
        self.warnings.push(ValidationWarning::new(code, message));
    }

    /// Absorbs a fallible socket/link operation, recording a warning on
    /// failure. Returns whether the operation succeeded.
    pub fn absorb<E: std::fmt::Display>(&mut self, result: Result<(), E>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.warn(WarningCode::SocketAccessFailed, e.to_string());
                false
            }
        }
    }

    /// Merges another report into this one.
    pub fn merge(&mut self, other: BuildReport) {
        self.warnings.extend(other.warnings);
        self.processed += other.processed;
    }

    /// True if nothing went wrong.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
