//! Eye, occlusion-shell and tearline builders.
//!
//! The advanced eye build centers on the iris mask group: one procedural
//! mask node whose outputs feed both the color chain and the subsurface
//! chain. It is placed with the texture column first and then moved as a
//! block to sit between the two consumers, so the shared fan-out stays
//! readable on the canvas.

use charkit_spec::MixerKind;

use crate::layout::{LayoutCursor, COLUMN_WIDTH};
use crate::textures::suffix;

use super::GraphBuilder;

pub(super) fn build_eye_advanced(b: &mut GraphBuilder) {
    let shader = b.shader;
    let families: &[&[&str]] = &[
        suffix::SCLERA,
        suffix::BASE_COLOR,
        suffix::BLEND,
        suffix::SCLERA_NORMAL,
        suffix::NORMAL,
    ];
    let count = families.iter().filter(|f| b.has_image(f)).count();
    let mut maps_cursor = LayoutCursor::maps(count);

    let sclera = b.required_image(suffix::SCLERA, false, &mut maps_cursor);
    let iris = b.image(suffix::BASE_COLOR, false, &mut maps_cursor);
    let blend = b.image(suffix::BLEND, false, &mut maps_cursor);
    let sclera_normal = b.image(suffix::SCLERA_NORMAL, true, &mut maps_cursor);
    let normal = b.image(suffix::NORMAL, true, &mut maps_cursor);

    // Built in the map column first, relocated once both consumers exist.
    let iris_mask = b.mixer(
        MixerKind::IrisMask,
        "iris_mask",
        [-2.0 * COLUMN_WIDTH, 2.0 * COLUMN_WIDTH],
    );

    let mut mixers = LayoutCursor::column(-1);

    if let Some(color) = b.mixer(MixerKind::Color, "color_eye_mixer", mixers.place()) {
        if let Some(map) = sclera {
            b.link(map, "Color", color, "Sclera Map");
        }
        if let Some(map) = iris {
            b.link(map, "Color", color, "Iris Map");
        }
        if let Some(map) = blend {
            b.link(map, "Color", color, "Blend Map");
        }
        if let Some(mask) = iris_mask {
            b.link(mask, "Iris Mask", color, "Iris Mask");
            b.link(mask, "Limbus Mask", color, "Limbus Mask");
        }
        b.link(color, "Color", shader, "Base Color");
        b.link(color, "Color", shader, "Subsurface Color");
    }

    if let Some(sss) = b.mixer(MixerKind::Subsurface, "sss_mixer", mixers.place()) {
        if let Some(mask) = iris_mask {
            // The same mask scopes scattering to the sclera.
            b.link(mask, "Iris Mask", sss, "Mask");
        }
        b.link(sss, "Subsurface", shader, "Subsurface");
        b.link(sss, "Radius", shader, "Subsurface Radius");
    }

    if let Some(msr) = b.mixer(MixerKind::Msr, "msr_mixer", mixers.place()) {
        b.link(msr, "Metallic", shader, "Metallic");
        b.link(msr, "Specular", shader, "Specular");
        b.link(msr, "Roughness", shader, "Roughness");
    }

    if let Some(nrm) = b.mixer(MixerKind::Normal, "normal_mixer", mixers.place()) {
        if let Some(map) = normal {
            b.link(map, "Color", nrm, "Normal Map");
        }
        if let Some(map) = sclera_normal {
            b.link(map, "Color", nrm, "Micro Normal");
        }
        b.link(nrm, "Normal", shader, "Normal");
    }

    // Slot the mask block between its two consumers: one column left of
    // the mixers, level with the gap between color and subsurface.
    if let Some(mask) = iris_mask {
        if let Ok(node) = b.tree.node(mask) {
            let (x, y) = node.location;
            let target = [-1.5 * COLUMN_WIDTH, 0.5 * COLUMN_WIDTH];
            let block = [mask];
            b.tree.translate(&block, target[0] - x, target[1] - y);
        }
    }
}

/// Flat eye: color map straight in, glassy roughness preset, flattened
/// normals.
pub(super) fn build_eye_basic(b: &mut GraphBuilder) {
    let shader = b.shader;
    let families: &[&[&str]] = &[suffix::SCLERA, suffix::BASE_COLOR, suffix::NORMAL];
    let count = families.iter().filter(|f| b.has_image(f)).count();
    let mut cursor = LayoutCursor::maps(count);

    let sclera = b.image(suffix::SCLERA, false, &mut cursor);
    let diffuse = b.image(suffix::BASE_COLOR, false, &mut cursor);
    if let Some(map) = diffuse.or(sclera) {
        b.link(map, "Color", shader, "Base Color");
    } else {
        b.report.warn(
            charkit_spec::WarningCode::TextureNotFound,
            format!("no eye color texture for material '{}'", b.stripped),
        );
    }
    if let Some(map) = b.image(suffix::NORMAL, true, &mut cursor) {
        let mut node = charkit_scene::Node::new("Normal Map", charkit_scene::NodeKind::NormalMap);
        node.location = (-COLUMN_WIDTH, -COLUMN_WIDTH);
        let decoder = b.tree.add(node);
        // Eye normals are mostly flattened out on the basic path.
        b.set(decoder, "Strength", b.ctx.params.eye.basic_normal);
        b.link(map, "Color", decoder, "Color");
        b.link(decoder, "Normal", shader, "Normal");
    }
    b.set(shader, "Specular", b.ctx.params.eye.specular);
    b.set(shader, "Roughness", b.ctx.params.eye.basic_roughness);
}

/// The occlusion shadow shell: a procedural mask group driving alpha over
/// a constant tint. No textures.
pub(super) fn build_occlusion(b: &mut GraphBuilder) {
    let shader = b.shader;
    if let Some(mask) = b.mixer(
        MixerKind::Alpha,
        "occlusion_mask",
        LayoutCursor::column(-1).peek(),
    ) {
        b.link(mask, "Color", shader, "Base Color");
        b.link(mask, "Alpha", shader, "Alpha");
    }
    b.set(shader, "Specular", 0.0f32);
    b.set(shader, "Roughness", 1.0f32);
}

/// The tearline wet layer: pure shader parameters, alpha carried by a
/// tagged value node so live update can reach it.
pub(super) fn build_tearline(b: &mut GraphBuilder) {
    let shader = b.shader;
    let alpha = b.value_node(
        MixerKind::Alpha,
        b.ctx.params.eye.tearline_alpha,
        LayoutCursor::column(-1).peek(),
    );
    b.link(alpha, "Value", shader, "Alpha");
    b.set(shader, "Base Color", [1.0f32, 1.0, 1.0, 1.0]);
    b.set(shader, "Specular", 1.0f32);
    b.set(shader, "Roughness", b.ctx.params.eye.tearline_roughness);
}
