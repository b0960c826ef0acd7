//! Teeth and tongue builders.
//!
//! Both mouth builds hinge on the interior gradient: a mask-driven
//! front-to-back darkening that separates gums from teeth (or shades the
//! tongue). When the masks that drive it are missing, the build falls back
//! to the advanced generic path silently; a clothing-style graph is the
//! correct degraded result for a mouth mesh without mouth maps.

use charkit_spec::MixerKind;

use crate::layout::{LayoutCursor, COLUMN_WIDTH};
use crate::textures::suffix;

use super::{generic, GraphBuilder};

pub(super) fn build_teeth(b: &mut GraphBuilder) {
    if !b.has_image(suffix::GUMS_MASK) || !b.has_image(suffix::GRADIENT_AO) {
        generic::build_advanced(b);
        return;
    }
    let shader = b.shader;
    let families: &[&[&str]] = &[
        suffix::BASE_COLOR,
        suffix::GUMS_MASK,
        suffix::GRADIENT_AO,
        suffix::NORMAL,
        suffix::MICRO_NORMAL,
    ];
    let count = families.iter().filter(|f| b.has_image(f)).count();
    let mut cursor = LayoutCursor::maps(count);

    let diffuse = b.required_image(suffix::BASE_COLOR, false, &mut cursor);
    let gums_mask = b.image(suffix::GUMS_MASK, true, &mut cursor);
    let gradient_ao = b.image(suffix::GRADIENT_AO, true, &mut cursor);
    let normal = b.image(suffix::NORMAL, true, &mut cursor);
    let micro = b.image(suffix::MICRO_NORMAL, true, &mut cursor);

    let mut mixers = LayoutCursor::column(-1);

    let gradient = b.mixer(MixerKind::TeethGradient, "teeth_gradient", mixers.place());
    if let Some(grad) = gradient {
        if let Some(map) = gums_mask {
            b.link(map, "Color", grad, "Gums Mask Map");
        }
        if let Some(map) = gradient_ao {
            b.link(map, "Color", grad, "Gradient AO Map");
        }
    }

    if let Some(color) = b.mixer(MixerKind::Color, "color_teeth_mixer", mixers.place()) {
        if let Some(map) = diffuse {
            b.link(map, "Color", color, "Diffuse Map");
        }
        if let Some(grad) = gradient {
            b.link(grad, "Gradient", color, "Gradient");
        }
        b.link(color, "Color", shader, "Base Color");
        b.link(color, "Color", shader, "Subsurface Color");
    }

    if let Some(sss) = b.mixer(MixerKind::Subsurface, "sss_mixer", mixers.place()) {
        if let Some(grad) = gradient {
            // Gums and teeth scatter differently; the gradient scopes it.
            b.link(grad, "Gradient", sss, "Mask");
        }
        b.link(sss, "Subsurface", shader, "Subsurface");
        b.link(sss, "Radius", shader, "Subsurface Radius");
    }

    build_mouth_msr_and_normal(b, normal, micro, &mut mixers);
}

pub(super) fn build_tongue(b: &mut GraphBuilder) {
    if !b.has_image(suffix::GRADIENT_AO) {
        generic::build_advanced(b);
        return;
    }
    let shader = b.shader;
    let families: &[&[&str]] = &[
        suffix::BASE_COLOR,
        suffix::GRADIENT_AO,
        suffix::NORMAL,
        suffix::MICRO_NORMAL,
    ];
    let count = families.iter().filter(|f| b.has_image(f)).count();
    let mut cursor = LayoutCursor::maps(count);

    let diffuse = b.required_image(suffix::BASE_COLOR, false, &mut cursor);
    let gradient_ao = b.image(suffix::GRADIENT_AO, true, &mut cursor);
    let normal = b.image(suffix::NORMAL, true, &mut cursor);
    let micro = b.image(suffix::MICRO_NORMAL, true, &mut cursor);

    let mut mixers = LayoutCursor::column(-1);

    let gradient = b.mixer(MixerKind::TongueGradient, "tongue_gradient", mixers.place());
    if let (Some(grad), Some(map)) = (gradient, gradient_ao) {
        b.link(map, "Color", grad, "Gradient AO Map");
    }

    if let Some(color) = b.mixer(MixerKind::Color, "color_tongue_mixer", mixers.place()) {
        if let Some(map) = diffuse {
            b.link(map, "Color", color, "Diffuse Map");
        }
        if let Some(grad) = gradient {
            b.link(grad, "Gradient", color, "Gradient");
        }
        b.link(color, "Color", shader, "Base Color");
        b.link(color, "Color", shader, "Subsurface Color");
    }

    if let Some(sss) = b.mixer(MixerKind::Subsurface, "sss_mixer", mixers.place()) {
        b.link(sss, "Subsurface", shader, "Subsurface");
        b.link(sss, "Radius", shader, "Subsurface Radius");
    }

    build_mouth_msr_and_normal(b, normal, micro, &mut mixers);
}

fn build_mouth_msr_and_normal(
    b: &mut GraphBuilder,
    normal: Option<charkit_scene::NodeId>,
    micro: Option<charkit_scene::NodeId>,
    mixers: &mut LayoutCursor,
) {
    let shader = b.shader;
    if let Some(msr) = b.mixer(MixerKind::Msr, "msr_mixer", mixers.place()) {
        b.link(msr, "Metallic", shader, "Metallic");
        b.link(msr, "Specular", shader, "Specular");
        b.link(msr, "Roughness", shader, "Roughness");
    }
    if let Some(nrm) = b.mixer(MixerKind::Normal, "normal_mixer", mixers.place()) {
        if let Some(map) = normal {
            b.link(map, "Color", nrm, "Normal Map");
        }
        if let Some(map) = micro {
            b.link(map, "Color", nrm, "Micro Normal");
            let at = b
                .tree
                .node(map)
                .map(|n| [n.location.0 - COLUMN_WIDTH, n.location.1])
                .unwrap_or([-3.0 * COLUMN_WIDTH, 0.0]);
            if let Some(tiling) = b.mixer(MixerKind::Tiling, "tiling_mapping", at) {
                b.link(tiling, "Vector", map, "Vector");
            }
        }
        b.link(nrm, "Normal", shader, "Normal");
    }
}
