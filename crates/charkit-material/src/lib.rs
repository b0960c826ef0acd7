//! CharKit Material Pipeline
//!
//! Builds per-role shader node graphs for imported characters:
//!
//! 1. [`classify`] maps each (object, material) pair to a semantic
//!    [`charkit_spec::MaterialRole`] by name-matching heuristics.
//! 2. [`textures`] indexes candidate texture files once per import and
//!    resolves a material+role to the best file for each suffix family.
//! 3. [`params`] resolves every tunable to its stored value plus the stable
//!    parameter key the live-update pass re-targets later.
//! 4. [`library`] lazily instantiates the reusable parametric node-groups
//!    from the packaged library asset, memoized by (name, version).
//! 5. [`assembler`] wires it all together per material, laying nodes out
//!    with a per-build [`layout::LayoutCursor`].
//! 6. [`refresh`] pushes current parameter values back into already-built
//!    graphs without rebuilding them.
//!
//! Everything short of a missing library asset degrades to warnings in a
//! [`report::BuildReport`]; one broken wire never fails a build.

pub mod alpha;
pub mod assembler;
pub mod classify;
pub mod context;
pub mod error;
pub mod layout;
pub mod library;
pub mod params;
pub mod quickset;
pub mod refresh;
pub mod report;
pub mod textures;

pub use alpha::{apply_alpha_policy, material_uses_alpha, resolve_policy, AlphaPolicy};
pub use assembler::build_material;
pub use classify::{classify, scan_for_hair_object};
pub use context::{BuildContext, Character};
pub use error::MaterialError;
pub use layout::LayoutCursor;
pub use library::NodeGroupLibrary;
pub use params::resolve_param;
pub use quickset::{quickset, QuickSetMode};
pub use refresh::{refresh_all, refresh_material};
pub use report::BuildReport;
pub use textures::{find_material_image, TextureIndex};
