//! Error and warning types for configuration validation.

use thiserror::Error;

/// Error codes for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Parameter errors (C001-C009)
    /// C001: A tunable is outside its documented range
    ParamOutOfRange,
    /// C002: A tiling factor is zero or negative
    InvalidTiling,
    /// C003: A subsurface falloff channel is negative
    InvalidFalloff,

    // Facial control errors (C010-C019)
    /// C010: Control name is empty or duplicated
    InvalidControlName,
    /// C011: Slider range is empty (min == max)
    EmptyControlRange,
    /// C012: Control references no blend shape and no bone channel
    ControlHasNoTargets,
    /// C013: Rect control missing a second axis range
    RectMissingAxis,
    /// C014: Parent control does not exist in the config
    UnknownParentControl,
    /// C015: Widget vertex indices out of template-mesh bounds
    WidgetIndexOutOfBounds,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "C001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::ParamOutOfRange => "C001",
            ErrorCode::InvalidTiling => "C002",
            ErrorCode::InvalidFalloff => "C003",
            ErrorCode::InvalidControlName => "C010",
            ErrorCode::EmptyControlRange => "C011",
            ErrorCode::ControlHasNoTargets => "C012",
            ErrorCode::RectMissingAxis => "C013",
            ErrorCode::UnknownParentControl => "C014",
            ErrorCode::WidgetIndexOutOfBounds => "C015",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Control skipped (missing target bone or blend shape)
    ControlSkipped,
    /// W002: Texture map not found for a suffix family
    TextureNotFound,
    /// W003: Socket or node access failed; wire omitted
    SocketAccessFailed,
    /// W004: Driver contribution dropped (missing source)
    ContributionDropped,
    /// W005: Duplicate parameter key would cause live-update cross-talk
    DuplicateParamKey,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::ControlSkipped => "W001",
            WarningCode::TextureNotFound => "W002",
            WarningCode::SocketAccessFailed => "W003",
            WarningCode::ContributionDropped => "W004",
            WarningCode::DuplicateParamKey => "W005",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional config path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Path to the problematic field (e.g., "controls\[3\].range").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a field path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional config path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a field path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config validation failed with one or more errors.
    #[error("config validation failed with {0} error(s)")]
    ValidationFailed(usize),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of configuration validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates an empty (passing) validation result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors (warnings allowed).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Merges another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ErrorCode::ParamOutOfRange.code(), "C001");
        assert_eq!(ErrorCode::InvalidControlName.code(), "C010");
        assert_eq!(ErrorCode::WidgetIndexOutOfBounds.code(), "C015");
        assert_eq!(WarningCode::ControlSkipped.code(), "W001");
        assert_eq!(WarningCode::DuplicateParamKey.code(), "W005");
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError::with_path(
            ErrorCode::EmptyControlRange,
            "range min equals max",
            "controls[2].range",
        );
        assert_eq!(
            err.to_string(),
            "C011: range min equals max (at controls[2].range)"
        );
    }

    #[test]
    fn validation_result_tracks_errors() {
        let mut result = ValidationResult::new();
        assert!(result.is_ok());
        result.add_warning(ValidationWarning::new(WarningCode::TextureNotFound, "x"));
        assert!(result.is_ok());
        result.add_error(ValidationError::new(ErrorCode::InvalidTiling, "zero"));
        assert!(!result.is_ok());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }
}
