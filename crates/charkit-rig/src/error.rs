//! Rig compiler and motion importer errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the rig compiler.
///
/// Only [`RigError::WidgetLibraryMissing`] aborts a build outright; the
/// compiler cannot derive track geometry without the packaged template
/// mesh. Invalid or unresolvable controls are skipped with a warning.
#[derive(Debug, Error)]
pub enum RigError {
    /// The packaged widget-shape asset was found in neither the document
    /// directory nor the install directory. Fatal.
    #[error("widget shape asset not found (searched {searched:?})")]
    WidgetLibraryMissing {
        /// The paths that were probed, in order.
        searched: Vec<PathBuf>,
    },

    /// The widget asset exists but failed to parse or lacks the shared
    /// template mesh.
    #[error("widget shape asset is malformed: {0}")]
    WidgetLibraryMalformed(String),

    /// The document holds no armature to build the rig into.
    #[error("document has no armature object")]
    NoArmature,

    /// Scene access failed at a point the compiler cannot absorb.
    #[error(transparent)]
    Scene(#[from] charkit_scene::SceneError),

    /// I/O error reading assets.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the motion-curve CSV importer. Any row the parser cannot
/// read fails the whole import; partial clips are worse than no clip.
#[derive(Debug, Error)]
pub enum MotionError {
    /// The file has no usable header row.
    #[error("motion file has no header row")]
    MissingHeader,

    /// A data row has a different column count than the header.
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnMismatch {
        /// 1-based line number.
        line: usize,
        /// Header column count.
        expected: usize,
        /// Row column count.
        found: usize,
    },

    /// A timecode field is not `HH:MM:SS:FF`.
    #[error("line {line}: bad timecode '{value}'")]
    BadTimecode {
        /// 1-based line number.
        line: usize,
        /// The offending field.
        value: String,
    },

    /// A frame or channel field failed to parse as a number.
    #[error("line {line}: bad value '{value}'")]
    BadValue {
        /// 1-based line number.
        line: usize,
        /// The offending field.
        value: String,
    },

    /// I/O error reading the motion file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
