//! Declarative facial-control definitions.
//!
//! A facial rig is described as a list of named controls, each a 1-axis
//! slider or a 2-axis rect widget. A control maps its live transform value
//! onto weighted blend-shape deltas and/or bone-channel deltas; the rig
//! compiler turns the whole list into proxy bones plus scripted drivers.
//! Validation happens once at load time, not defensively at every
//! consumption site.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ValidationError, ValidationResult};

/// The blend-shape naming convention a character mesh uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacialProfile {
    /// Standard CC3 viseme/expression set.
    #[default]
    Standard,
    /// Extended expression set.
    Extended,
    /// Traditional (legacy) set.
    Traditional,
    /// 52-channel ARKit naming.
    Arkit,
}

/// One transform channel of a bone, in the bone's local space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformChannel {
    LocX,
    LocY,
    LocZ,
    RotX,
    RotY,
    RotZ,
    ScaleX,
    ScaleY,
    ScaleZ,
}

impl TransformChannel {
    /// The property name / array index pair this channel addresses on a
    /// pose bone ("location"/"rotation_euler"/"scale", 0..=2).
    pub fn property(&self) -> (&'static str, usize) {
        match self {
            TransformChannel::LocX => ("location", 0),
            TransformChannel::LocY => ("location", 1),
            TransformChannel::LocZ => ("location", 2),
            TransformChannel::RotX => ("rotation_euler", 0),
            TransformChannel::RotY => ("rotation_euler", 1),
            TransformChannel::RotZ => ("rotation_euler", 2),
            TransformChannel::ScaleX => ("scale", 0),
            TransformChannel::ScaleY => ("scale", 1),
            TransformChannel::ScaleZ => ("scale", 2),
        }
    }
}

/// Maps a control's value onto one bone transform channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoneChannelMap {
    /// Target bone name.
    pub bone: String,
    /// Target transform channel.
    pub channel: TransformChannel,
    /// Added to the scaled control value.
    #[serde(default)]
    pub offset: f64,
    /// Multiplies the control value.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

/// Widget geometry of one control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ControlWidget {
    /// 1-axis slider with a numeric range.
    Slider {
        /// Value range [min, max] the slider travel maps onto.
        range: [f64; 2],
    },
    /// 2-axis rect with independent horizontal and vertical ranges.
    Rect {
        /// Horizontal value range [min, max].
        x_range: [f64; 2],
        /// Vertical value range [min, max].
        y_range: [f64; 2],
    },
}

impl ControlWidget {
    /// Fraction of the travel at which the control value crosses zero,
    /// by inverse-lerp of the primary (vertical for rects) range.
    /// A range that does not span zero clamps to [0, 1].
    pub fn zero_fraction(&self) -> f64 {
        let [lo, hi] = self.primary_range();
        if (hi - lo).abs() < f64::EPSILON {
            return 0.0;
        }
        ((0.0 - lo) / (hi - lo)).clamp(0.0, 1.0)
    }

    /// The primary range: a slider's range, or a rect's vertical range.
    pub fn primary_range(&self) -> [f64; 2] {
        match self {
            ControlWidget::Slider { range } => *range,
            ControlWidget::Rect { y_range, .. } => *y_range,
        }
    }

    /// The secondary (horizontal) range for rects.
    pub fn secondary_range(&self) -> Option<[f64; 2]> {
        match self {
            ControlWidget::Slider { .. } => None,
            ControlWidget::Rect { x_range, .. } => Some(*x_range),
        }
    }
}

/// One named facial control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlDef {
    /// Unique control name (e.g. "Jaw_Open", "Eye_L_Look").
    pub name: String,
    /// Widget geometry and value range(s).
    pub widget: ControlWidget,
    /// Blend-shape name -> signed weight, driven by the primary axis.
    pub shape_weights: BTreeMap<String, f64>,
    /// Blend-shape name -> signed weight, driven by a rect's horizontal
    /// axis. Ignored for sliders.
    pub shape_weights_x: BTreeMap<String, f64>,
    /// Bone transform channels driven by the primary axis.
    pub bone_channels: Vec<BoneChannelMap>,
    /// Parent control whose contribution is subtracted out during
    /// retargeting (hierarchical decomposition).
    pub parent: Option<String>,
    /// When several controls target the same shape and each is a
    /// mutually-exclusive positive contribution, combine with max instead
    /// of sum.
    pub mutually_exclusive: bool,
    /// Vertex indices into the shared "lines" widget template mesh from
    /// which the track geometry is derived.
    pub widget_indices: Vec<usize>,
}

impl Default for ControlDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            widget: ControlWidget::Slider { range: [0.0, 1.0] },
            shape_weights: BTreeMap::new(),
            shape_weights_x: BTreeMap::new(),
            bone_channels: Vec::new(),
            parent: None,
            mutually_exclusive: false,
            widget_indices: Vec::new(),
        }
    }
}

impl ControlDef {
    /// Creates a slider control.
    pub fn slider(name: impl Into<String>, range: [f64; 2]) -> Self {
        Self {
            name: name.into(),
            widget: ControlWidget::Slider { range },
            ..Self::default()
        }
    }

    /// Creates a rect control.
    pub fn rect(name: impl Into<String>, x_range: [f64; 2], y_range: [f64; 2]) -> Self {
        Self {
            name: name.into(),
            widget: ControlWidget::Rect { x_range, y_range },
            ..Self::default()
        }
    }

    /// Adds a weighted blend-shape target on the primary axis.
    pub fn with_shape(mut self, shape: impl Into<String>, weight: f64) -> Self {
        self.shape_weights.insert(shape.into(), weight);
        self
    }

    /// Adds a weighted blend-shape target on the horizontal axis.
    pub fn with_shape_x(mut self, shape: impl Into<String>, weight: f64) -> Self {
        self.shape_weights_x.insert(shape.into(), weight);
        self
    }

    /// Adds a bone channel target.
    pub fn with_bone(mut self, map: BoneChannelMap) -> Self {
        self.bone_channels.push(map);
        self
    }

    /// Sets the parent control.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Marks the control as mutually exclusive (max-combined).
    pub fn exclusive(mut self) -> Self {
        self.mutually_exclusive = true;
        self
    }

    /// Sets the widget template vertex indices.
    pub fn with_widget_indices(mut self, indices: Vec<usize>) -> Self {
        self.widget_indices = indices;
        self
    }

    /// True if any declared weight is negative (the emitted driver then
    /// clamps symmetrically instead of one-sided).
    pub fn has_negative_weights(&self) -> bool {
        self.shape_weights
            .values()
            .chain(self.shape_weights_x.values())
            .any(|w| *w < 0.0)
    }
}

/// The full facial-control configuration for one character.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaceRigConfig {
    /// Blend-shape naming convention of the target meshes.
    pub profile: FacialProfile,
    /// All controls, in build order.
    pub controls: Vec<ControlDef>,
}

impl FaceRigConfig {
    /// Looks up a control by name.
    pub fn control(&self, name: &str) -> Option<&ControlDef> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// Validates the whole configuration against the widget template mesh.
    ///
    /// `template_vertex_count` is the vertex count of the shared "lines"
    /// mesh the widget indices point into.
    pub fn validate(&self, template_vertex_count: usize) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut seen = std::collections::HashSet::new();

        for (i, control) in self.controls.iter().enumerate() {
            let at = |field: &str| format!("controls[{i}].{field}");

            if control.name.is_empty() {
                result.add_error(ValidationError::with_path(
                    ErrorCode::InvalidControlName,
                    "control name is empty",
                    at("name"),
                ));
            } else if !seen.insert(control.name.as_str()) {
                result.add_error(ValidationError::with_path(
                    ErrorCode::InvalidControlName,
                    format!("duplicate control name '{}'", control.name),
                    at("name"),
                ));
            }

            let [lo, hi] = control.widget.primary_range();
            if (hi - lo).abs() < f64::EPSILON {
                result.add_error(ValidationError::with_path(
                    ErrorCode::EmptyControlRange,
                    format!("range [{lo}, {hi}] is empty"),
                    at("widget"),
                ));
            }
            if let Some([xlo, xhi]) = control.widget.secondary_range() {
                if (xhi - xlo).abs() < f64::EPSILON {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::RectMissingAxis,
                        "rect horizontal range is empty",
                        at("widget.x_range"),
                    ));
                }
            }

            if control.shape_weights.is_empty()
                && control.shape_weights_x.is_empty()
                && control.bone_channels.is_empty()
            {
                result.add_error(ValidationError::with_path(
                    ErrorCode::ControlHasNoTargets,
                    "control drives no blend shape and no bone channel",
                    at("shape_weights"),
                ));
            }

            if let Some(parent) = &control.parent {
                if self.control(parent).is_none() {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::UnknownParentControl,
                        format!("parent control '{parent}' not found"),
                        at("parent"),
                    ));
                }
            }

            for index in &control.widget_indices {
                if *index >= template_vertex_count {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::WidgetIndexOutOfBounds,
                        format!(
                            "vertex index {index} out of bounds (template has {template_vertex_count})"
                        ),
                        at("widget_indices"),
                    ));
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jaw() -> ControlDef {
        ControlDef::slider("Jaw_Open", [0.0, 1.0]).with_shape("Mouth_Open", 1.0)
    }

    #[test]
    fn zero_fraction_inverse_lerp() {
        let w = ControlWidget::Slider { range: [-1.0, 1.0] };
        assert!((w.zero_fraction() - 0.5).abs() < 1e-9);

        let w = ControlWidget::Slider { range: [0.0, 1.0] };
        assert_eq!(w.zero_fraction(), 0.0);

        let w = ControlWidget::Slider { range: [-0.25, 0.75] };
        assert!((w.zero_fraction() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn zero_fraction_clamps_off_range() {
        // Range entirely positive: zero sits below the travel.
        let w = ControlWidget::Slider { range: [0.2, 1.0] };
        assert_eq!(w.zero_fraction(), 0.0);
    }

    #[test]
    fn valid_config_passes() {
        let config = FaceRigConfig {
            profile: FacialProfile::Standard,
            controls: vec![jaw()],
        };
        let result = config.validate(64);
        assert!(result.is_ok(), "errors: {:?}", result.errors);
    }

    #[test]
    fn duplicate_names_rejected() {
        let config = FaceRigConfig {
            profile: FacialProfile::Standard,
            controls: vec![jaw(), jaw()],
        };
        let result = config.validate(64);
        assert!(!result.is_ok());
        assert!(result
            .errors
            .iter()
            .any(|e| e.code == ErrorCode::InvalidControlName));
    }

    #[test]
    fn targetless_control_rejected() {
        let config = FaceRigConfig {
            profile: FacialProfile::Standard,
            controls: vec![ControlDef::slider("Empty", [0.0, 1.0])],
        };
        let result = config.validate(64);
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].code, ErrorCode::ControlHasNoTargets);
    }

    #[test]
    fn unknown_parent_rejected() {
        let config = FaceRigConfig {
            profile: FacialProfile::Standard,
            controls: vec![jaw().with_parent("Missing")],
        };
        let result = config.validate(64);
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].code, ErrorCode::UnknownParentControl);
    }

    #[test]
    fn widget_index_bounds_checked() {
        let config = FaceRigConfig {
            profile: FacialProfile::Standard,
            controls: vec![jaw().with_widget_indices(vec![0, 100])],
        };
        let result = config.validate(64);
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].code, ErrorCode::WidgetIndexOutOfBounds);
    }

    #[test]
    fn negative_weight_detection() {
        let c = ControlDef::rect("Mouth_L", [-1.0, 1.0], [-1.0, 1.0])
            .with_shape("Smile", 0.8)
            .with_shape_x("Frown", -0.4);
        assert!(c.has_negative_weights());
        assert!(!jaw().has_negative_weights());
    }

    #[test]
    fn config_round_trips_json() {
        let config = FaceRigConfig {
            profile: FacialProfile::Extended,
            controls: vec![jaw().with_widget_indices(vec![4, 5, 6, 7])],
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: FaceRigConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
