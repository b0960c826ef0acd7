//! The packaged widget-shape library.
//!
//! Control widgets are drawn with bones whose custom shapes come from a
//! small set of template meshes shipped as a JSON asset next to the
//! binary; the document directory is probed first so a project can pin
//! its own copy. Every control's track geometry is derived from vertex
//! indices into the shared `"lines"` template, so a missing asset is
//! fatal: there is nothing to derive from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use charkit_spec::ControlDef;
use serde::Deserialize;

use crate::error::RigError;

/// File name of the widget asset, looked up under an `assets/` directory.
pub const WIDGET_FILE: &str = "widget_shapes.json";

/// Name of the shared template mesh track geometry is derived from.
pub const TEMPLATE_SHAPE: &str = "lines";

/// Name of the nub (handle) display shape.
pub const NUB_SHAPE: &str = "nub";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct WidgetFile {
    version: String,
    shapes: Vec<ShapeDef>,
}

/// One template mesh from the widget asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeDef {
    /// Shape name, referenced by bone custom shapes.
    pub name: String,
    /// Vertex table.
    pub vertices: Vec<[f64; 3]>,
}

/// Track geometry of one control, derived from the template mesh.
///
/// The nub travels along the track's local axes; `min`/`max` bounds are
/// placed so the bone's rest position coincides with the control's zero
/// value (inverse-lerp of the numeric range over the track length).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    /// Rest-position origin of the track, from the template vertices.
    pub origin: [f32; 3],
    /// Track length along the primary (vertical) axis.
    pub length: f64,
    /// Lowest allowed nub Y, relative to the origin.
    pub min_y: f64,
    /// Highest allowed nub Y, relative to the origin.
    pub max_y: f64,
    /// Lowest allowed nub X (rect controls only, else 0).
    pub min_x: f64,
    /// Highest allowed nub X (rect controls only, else 0).
    pub max_x: f64,
}

impl TrackGeometry {
    /// Travel distance on the primary axis that maps to one unit of
    /// control value on the driven side.
    pub fn primary_distance(&self) -> f64 {
        self.max_y.max(-self.min_y)
    }

    /// Travel distance on the secondary axis, 0 for sliders.
    pub fn secondary_distance(&self) -> f64 {
        self.max_x.max(-self.min_x)
    }
}

/// The loaded widget library: template meshes keyed by name.
#[derive(Debug, Clone)]
pub struct WidgetLibrary {
    version: String,
    fingerprint: String,
    shapes: BTreeMap<String, ShapeDef>,
}

impl WidgetLibrary {
    /// Loads the asset, probing `<document dir>/assets/` then
    /// `<install dir>/assets/`. Fatal if neither exists.
    pub fn load(document_dir: Option<&Path>, install_dir: &Path) -> Result<Self, RigError> {
        let mut searched: Vec<PathBuf> = Vec::new();
        let candidates = document_dir
            .map(|d| d.join("assets").join(WIDGET_FILE))
            .into_iter()
            .chain(std::iter::once(install_dir.join("assets").join(WIDGET_FILE)));
        for path in candidates {
            if path.is_file() {
                return Self::from_path(&path);
            }
            searched.push(path);
        }
        Err(RigError::WidgetLibraryMissing { searched })
    }

    /// Loads the asset from an explicit path.
    pub fn from_path(path: &Path) -> Result<Self, RigError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parses the asset from raw bytes. The shared `"lines"` template is
    /// required; an asset without it is malformed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RigError> {
        let file: WidgetFile = serde_json::from_slice(bytes)
            .map_err(|e| RigError::WidgetLibraryMalformed(e.to_string()))?;
        let fingerprint = blake3::hash(bytes).to_hex().to_string();
        let mut shapes = BTreeMap::new();
        for def in file.shapes {
            let name = def.name.clone();
            if shapes.insert(name.clone(), def).is_some() {
                return Err(RigError::WidgetLibraryMalformed(format!(
                    "duplicate shape '{name}'"
                )));
            }
        }
        if !shapes.contains_key(TEMPLATE_SHAPE) {
            return Err(RigError::WidgetLibraryMalformed(format!(
                "missing required template shape '{TEMPLATE_SHAPE}'"
            )));
        }
        Ok(Self {
            version: file.version,
            fingerprint,
            shapes,
        })
    }

    /// The asset version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Content fingerprint of the loaded asset.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Looks up a template shape by name.
    pub fn shape(&self, name: &str) -> Option<&ShapeDef> {
        self.shapes.get(name)
    }

    /// Vertex count of the shared `"lines"` template, the bound widget
    /// indices are validated against.
    pub fn template_vertex_count(&self) -> usize {
        self.shapes[TEMPLATE_SHAPE].vertices.len()
    }

    /// Derives a control's track geometry from its template vertex
    /// indices. Out-of-bounds indices are ignored (validation reports
    /// them); a control with no usable vertices gets a unit track at the
    /// origin.
    pub fn track_geometry(&self, control: &ControlDef) -> TrackGeometry {
        let template = &self.shapes[TEMPLATE_SHAPE];
        let selected: Vec<[f64; 3]> = control
            .widget_indices
            .iter()
            .filter_map(|i| template.vertices.get(*i).copied())
            .collect();

        let (origin, length, width) = if selected.is_empty() {
            ([0.0f32; 3], 1.0, 1.0)
        } else {
            let origin = [
                selected[0][0] as f32,
                selected[0][1] as f32,
                selected[0][2] as f32,
            ];
            (origin, extent(&selected, 1), extent(&selected, 0))
        };

        let zero = control.widget.zero_fraction();
        let (min_x, max_x) = match control.widget.secondary_range() {
            Some(range) => {
                let w = if width > f64::EPSILON { width } else { length };
                let zero_x = zero_fraction_of(range);
                (-w * zero_x, w * (1.0 - zero_x))
            }
            None => (0.0, 0.0),
        };

        TrackGeometry {
            origin,
            length,
            min_y: -length * zero,
            max_y: length * (1.0 - zero),
            min_x,
            max_x,
        }
    }
}

/// Extent of the selected vertices along one axis, falling back to a unit
/// track when the selection is degenerate.
fn extent(vertices: &[[f64; 3]], axis: usize) -> f64 {
    let lo = vertices
        .iter()
        .map(|v| v[axis])
        .fold(f64::INFINITY, f64::min);
    let hi = vertices
        .iter()
        .map(|v| v[axis])
        .fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    if span > f64::EPSILON {
        span
    } else {
        1.0
    }
}

/// Inverse-lerp of zero over a numeric range, clamped to [0, 1].
fn zero_fraction_of([lo, hi]: [f64; 2]) -> f64 {
    if (hi - lo).abs() < f64::EPSILON {
        return 0.0;
    }
    ((0.0 - lo) / (hi - lo)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use charkit_spec::ControlDef;
    use pretty_assertions::assert_eq;

    fn asset() -> String {
        r#"{
            "version": "1.0.0",
            "shapes": [
                {
                    "name": "lines",
                    "vertices": [
                        [0.0, 0.0, 0.0],
                        [0.0, 10.0, 0.0],
                        [-5.0, 0.0, 0.0],
                        [5.0, 10.0, 0.0]
                    ]
                },
                {
                    "name": "nub",
                    "vertices": [[0.0, 0.0, 0.0], [0.0, 0.5, 0.0]]
                }
            ]
        }"#
        .to_string()
    }

    fn library() -> WidgetLibrary {
        WidgetLibrary::from_bytes(asset().as_bytes()).unwrap()
    }

    #[test]
    fn missing_asset_reports_probed_paths() {
        let dir = tempfile::tempdir().unwrap();
        let err = WidgetLibrary::load(Some(dir.path()), dir.path()).unwrap_err();
        match err {
            RigError::WidgetLibraryMissing { searched } => assert_eq!(searched.len(), 2),
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn asset_without_template_is_malformed() {
        let err = WidgetLibrary::from_bytes(
            br#"{"version": "1.0.0", "shapes": [{"name": "nub", "vertices": []}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RigError::WidgetLibraryMalformed(_)));
    }

    #[test]
    fn one_sided_slider_travels_up_only() {
        let control =
            ControlDef::slider("Jaw_Open", [0.0, 1.0]).with_widget_indices(vec![0, 1]);
        let g = library().track_geometry(&control);
        assert_eq!(g.length, 10.0);
        assert_eq!(g.min_y, 0.0);
        assert_eq!(g.max_y, 10.0);
        assert_eq!(g.primary_distance(), 10.0);
    }

    #[test]
    fn symmetric_slider_centers_the_zero() {
        let control =
            ControlDef::slider("Brow_Raise", [-1.0, 1.0]).with_widget_indices(vec![0, 1]);
        let g = library().track_geometry(&control);
        assert_eq!(g.min_y, -5.0);
        assert_eq!(g.max_y, 5.0);
        assert_eq!(g.primary_distance(), 5.0);
    }

    #[test]
    fn rect_gets_a_secondary_axis() {
        let control = ControlDef::rect("Eye_L_Look", [-1.0, 1.0], [-1.0, 1.0])
            .with_widget_indices(vec![2, 3]);
        let g = library().track_geometry(&control);
        assert_eq!(g.min_x, -5.0);
        assert_eq!(g.max_x, 5.0);
        assert_eq!(g.secondary_distance(), 5.0);
    }

    #[test]
    fn missing_indices_fall_back_to_unit_track() {
        let control = ControlDef::slider("Jaw_Open", [0.0, 1.0]);
        let g = library().track_geometry(&control);
        assert_eq!(g.length, 1.0);
        assert_eq!(g.max_y, 1.0);
    }

    #[test]
    fn template_vertex_count_matches_asset() {
        assert_eq!(library().template_vertex_count(), 4);
    }
}
