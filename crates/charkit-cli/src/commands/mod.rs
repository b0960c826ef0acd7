//! Subcommand implementations. Each module exposes a `run` that returns
//! the process exit code; rendering happens here, never in the library
//! crates.

pub mod build_facerig;
pub mod build_materials;
pub mod import;
pub mod import_motion;
pub mod link;
pub mod quickset;
pub mod retarget;
