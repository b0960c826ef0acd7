//! CharKit Rig Compiler
//!
//! Turns declarative facial-control configs into live rigs:
//!
//! 1. [`widgets`] loads the packaged widget-shape templates and derives
//!    each control's track geometry and nub travel bounds.
//! 2. [`compile`] builds proxy bones plus one scripted driver per driven
//!    target, combining every control's weighted contribution.
//! 3. [`retarget`] rewires the compiled rig to follow a foreign capture
//!    performance, with hierarchical parent subtraction and the optional
//!    ARKit remap from [`arkit`].
//! 4. [`motion`] imports capture CSV clips with low-pass filtering,
//!    seeded amplitude variance, and frame resampling.
//!
//! Everything short of a missing widget asset (or a document without an
//! armature) degrades to warnings in a [`report::RigReport`].

pub mod arkit;
pub mod compile;
pub mod error;
pub mod motion;
pub mod report;
pub mod retarget;
pub mod widgets;

pub use arkit::{remap_excluded, remap_from_props, RemapSession};
pub use compile::{compile_facerig, nub_bone_name, track_bone_name, DRIVER_OWNER, RIG_COLLECTION};
pub use error::{MotionError, RigError};
pub use motion::{load_csv, parse_csv, process, ImportOptions, MotionChannel, MotionClip};
pub use report::RigReport;
pub use retarget::{retarget, RetargetSource, SourceKind, RETARGET_OWNER};
pub use widgets::{TrackGeometry, WidgetLibrary, WIDGET_FILE};
