//! Material pipeline errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the material pipeline.
///
/// Only [`MaterialError::LibraryAssetMissing`] aborts a build outright; the
/// pipeline cannot synthesize node-group interfaces it does not have.
/// Everything else is absorbed into the build report at the call site.
#[derive(Debug, Error)]
pub enum MaterialError {
    /// The packaged node-group library asset was found in neither the
    /// document directory nor the install directory. Fatal.
    #[error("node group library asset not found (searched {searched:?})")]
    LibraryAssetMissing {
        /// The paths that were probed, in order.
        searched: Vec<PathBuf>,
    },

    /// The library asset exists but failed to parse.
    #[error("node group library asset is malformed: {0}")]
    LibraryAssetMalformed(String),

    /// A logical group name is not defined by the library asset.
    #[error("node group '{0}' is not defined by the library")]
    UnknownNodeGroup(String),

    /// The material to build does not exist in the document.
    #[error(transparent)]
    Scene(#[from] charkit_scene::SceneError),

    /// Parameter document failed validation.
    #[error("invalid material parameters: {0} error(s)")]
    InvalidParams(usize),

    /// I/O error reading assets or scanning texture directories.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
