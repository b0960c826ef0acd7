//! Rig build reports: structured warning accumulation.

use charkit_spec::{ValidationWarning, WarningCode};

/// Accumulates the non-fatal misses of one rig build.
///
/// Libraries never print; the CLI decides how to render these.
#[derive(Debug, Clone, Default)]
pub struct RigReport {
    /// Warnings, in occurrence order.
    pub warnings: Vec<ValidationWarning>,
    /// Number of controls built.
    pub processed: usize,
    /// Number of drivers emitted.
    pub drivers: usize,
}

impl RigReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn warn(&mut self, code: WarningCode, message: impl Into<String>) {
        self.warnings.push(ValidationWarning::new(code, message));
    }

    /// Merges another report into this one.
    pub fn merge(&mut self, other: RigReport) {
        self.warnings.extend(other.warnings);
        self.processed += other.processed;
        self.drivers += other.drivers;
    }

    /// True if nothing went wrong.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
