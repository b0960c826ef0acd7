//! Basic and advanced builders for skin, hair, nails and unrecognized
//! materials.

use charkit_scene::{Node, NodeId, NodeKind};
use charkit_spec::{MaterialRole, MixerKind, NodeTag};

use crate::layout::{LayoutCursor, COLUMN_WIDTH};
use crate::params;
use crate::textures::suffix;

use super::GraphBuilder;

/// Resolved image nodes for the advanced generic map set.
#[derive(Default)]
struct Maps {
    diffuse: Option<NodeId>,
    ao: Option<NodeId>,
    blend: Option<NodeId>,
    sss: Option<NodeId>,
    metallic: Option<NodeId>,
    specular: Option<NodeId>,
    specular_mask: Option<NodeId>,
    roughness: Option<NodeId>,
    emission: Option<NodeId>,
    alpha: Option<NodeId>,
    normal: Option<NodeId>,
    normal_blend: Option<NodeId>,
    micro_normal: Option<NodeId>,
    micro_normal_mask: Option<NodeId>,
    bump: Option<NodeId>,
    root: Option<NodeId>,
    id: Option<NodeId>,
}

fn resolve_maps(b: &mut GraphBuilder) -> Maps {
    let hairlike = matches!(b.role, MaterialRole::Hair | MaterialRole::Scalp);
    let families: &[&[&str]] = &[
        suffix::BASE_COLOR,
        suffix::AO,
        suffix::BLEND,
        suffix::SUBSURFACE,
        suffix::METALLIC,
        suffix::SPECULAR,
        suffix::SPECULAR_MASK,
        suffix::ROUGHNESS,
        suffix::EMISSION,
        suffix::ALPHA,
        suffix::NORMAL,
        suffix::NORMAL_BLEND,
        suffix::MICRO_NORMAL,
        suffix::MICRO_NORMAL_MASK,
        suffix::BUMP,
    ];
    let mut count = families.iter().filter(|f| b.has_image(f)).count();
    if hairlike {
        count += [suffix::HAIR_ROOT, suffix::HAIR_ID]
            .iter()
            .filter(|f| b.has_image(f))
            .count();
    }
    let mut cursor = LayoutCursor::maps(count);

    let mut maps = Maps {
        diffuse: b.required_image(suffix::BASE_COLOR, false, &mut cursor),
        ao: b.image(suffix::AO, true, &mut cursor),
        blend: b.image(suffix::BLEND, false, &mut cursor),
        sss: b.image(suffix::SUBSURFACE, true, &mut cursor),
        metallic: b.image(suffix::METALLIC, true, &mut cursor),
        specular: b.image(suffix::SPECULAR, true, &mut cursor),
        specular_mask: b.image(suffix::SPECULAR_MASK, true, &mut cursor),
        roughness: b.image(suffix::ROUGHNESS, true, &mut cursor),
        emission: b.image(suffix::EMISSION, false, &mut cursor),
        alpha: b.image(suffix::ALPHA, true, &mut cursor),
        normal: b.image(suffix::NORMAL, true, &mut cursor),
        normal_blend: b.image(suffix::NORMAL_BLEND, true, &mut cursor),
        micro_normal: b.image(suffix::MICRO_NORMAL, true, &mut cursor),
        micro_normal_mask: b.image(suffix::MICRO_NORMAL_MASK, true, &mut cursor),
        bump: b.image(suffix::BUMP, true, &mut cursor),
        ..Default::default()
    };
    if hairlike {
        maps.root = b.image(suffix::HAIR_ROOT, true, &mut cursor);
        maps.id = b.image(suffix::HAIR_ID, true, &mut cursor);
    }
    maps
}

/// The full parametric chain: color, subsurface, MSR and normal mixers
/// between the texture column and the shader.
pub(super) fn build_advanced(b: &mut GraphBuilder) {
    let maps = resolve_maps(b);
    let shader = b.shader;
    let mut mixers = LayoutCursor::column(-1);

    // Color chain. Teeth and tongue reach here on their mask-less
    // fallback, so the mapping is role-driven rather than hardcoded.
    let color_logical = super::group_logical(MixerKind::Color, b.role)
        .unwrap_or("color_blend_mixer");
    if let Some(color) = b.mixer(MixerKind::Color, color_logical, mixers.place()) {
        if let Some(diffuse) = maps.diffuse {
            b.link(diffuse, "Color", color, "Diffuse Map");
        }
        if let Some(ao) = maps.ao {
            b.link(ao, "Color", color, "AO Map");
        }
        if let Some(blend) = maps.blend {
            b.link(blend, "Color", color, "Blend Map");
        }
        if let Some(root) = maps.root {
            b.link(root, "Color", color, "Root Map");
        }
        if let Some(id_map) = maps.id {
            b.link(id_map, "Color", color, "ID Map");
        }
        b.link(color, "Color", shader, "Base Color");
        b.link(color, "Color", shader, "Subsurface Color");
    }

    // Subsurface chain.
    if let Some(sss) = b.mixer(MixerKind::Subsurface, "sss_mixer", mixers.place()) {
        if let Some(map) = maps.sss {
            b.link(map, "Color", sss, "SSS Map");
        }
        b.link(sss, "Subsurface", shader, "Subsurface");
        b.link(sss, "Radius", shader, "Subsurface Radius");
    }

    // Metallic / specular / roughness chain.
    if let Some(msr) = b.mixer(MixerKind::Msr, "msr_mixer", mixers.place()) {
        if let Some(map) = maps.metallic {
            b.link(map, "Color", msr, "Metallic Map");
        }
        if let Some(map) = maps.specular {
            b.link(map, "Color", msr, "Specular Map");
        }
        if let Some(map) = maps.specular_mask {
            b.link(map, "Color", msr, "Specular Mask");
        }
        if let Some(map) = maps.roughness {
            b.link(map, "Color", msr, "Roughness Map");
        }
        b.link(msr, "Metallic", shader, "Metallic");
        b.link(msr, "Specular", shader, "Specular");
        b.link(msr, "Roughness", shader, "Roughness");
    }

    // Normal chain with micro-normal tiling.
    if let Some(normal) = b.mixer(MixerKind::Normal, "normal_mixer", mixers.place()) {
        if let Some(map) = maps.normal {
            b.link(map, "Color", normal, "Normal Map");
        }
        if let Some(map) = maps.normal_blend {
            b.link(map, "Color", normal, "Normal Blend Map");
        }
        if let Some(micro) = maps.micro_normal {
            b.link(micro, "Color", normal, "Micro Normal");
            let at = b
                .tree
                .node(micro)
                .map(|n| [n.location.0 - COLUMN_WIDTH, n.location.1])
                .unwrap_or([-3.0 * COLUMN_WIDTH, 0.0]);
            if let Some(tiling) = b.mixer(MixerKind::Tiling, "tiling_mapping", at) {
                b.link(tiling, "Vector", micro, "Vector");
            }
        }
        if let Some(mask) = maps.micro_normal_mask {
            b.link(mask, "Color", normal, "Micro Normal Mask");
        }
        b.link(normal, "Normal", shader, "Normal");
    }

    // Bump only stands in when there is no tangent normal map.
    if maps.normal.is_none() {
        if let Some(map) = maps.bump {
            build_bump(b, map);
        }
    }

    if let Some(map) = maps.emission {
        b.link(map, "Color", shader, "Emission");
    }
    if let Some(map) = maps.alpha {
        b.link(map, "Color", shader, "Alpha");
    }
}

fn build_bump(b: &mut GraphBuilder, height_map: NodeId) {
    let shader = b.shader;
    let (_, strength) = params::bump_strength(&b.ctx.params, b.role);
    let at = LayoutCursor::column(-1).offset(0.0, -4.0 * COLUMN_WIDTH).peek();
    let mut node = Node::new("Bump", NodeKind::Bump);
    node.location = (at[0], at[1]);
    node.tag = Some(NodeTag::new(
        MixerKind::Bump,
        b.role,
        params::resolve_param(MixerKind::Bump, b.role),
    ));
    let bump = b.tree.add(node);
    b.set(bump, "Strength", strength);
    // Height maps encode millimeter-scale detail.
    b.set(bump, "Distance", 0.001f32);
    b.link(height_map, "Color", bump, "Height");
    b.link(bump, "Normal", shader, "Normal");
}

/// The flat builder: maps wired straight into the shader, parameters as
/// socket defaults, no parametric groups.
pub(super) fn build_basic(b: &mut GraphBuilder) {
    let shader = b.shader;
    let families: &[&[&str]] = &[
        suffix::BASE_COLOR,
        suffix::ALPHA,
        suffix::EMISSION,
        suffix::NORMAL,
    ];
    let count = families.iter().filter(|f| b.has_image(f)).count();
    let mut cursor = LayoutCursor::maps(count);

    if let Some(diffuse) = b.required_image(suffix::BASE_COLOR, false, &mut cursor) {
        b.link(diffuse, "Color", shader, "Base Color");
    }
    if let Some(alpha) = b.image(suffix::ALPHA, true, &mut cursor) {
        b.link(alpha, "Color", shader, "Alpha");
    }
    if let Some(emission) = b.image(suffix::EMISSION, false, &mut cursor) {
        b.link(emission, "Color", shader, "Emission");
    }
    if let Some(normal) = b.image(suffix::NORMAL, true, &mut cursor) {
        let mut node = Node::new("Normal Map", NodeKind::NormalMap);
        node.location = (-COLUMN_WIDTH, -2.0 * COLUMN_WIDTH);
        let decoder = b.tree.add(node);
        b.link(normal, "Color", decoder, "Color");
        b.link(decoder, "Normal", shader, "Normal");
    }

    // Basic path writes the shader sockets directly; skin has dedicated
    // basic presets, everything else reuses the advanced dispatch with
    // the current socket defaults as fallback.
    let (specular, roughness) = if b.role.is_skin() {
        (b.ctx.params.skin.basic_specular, b.ctx.params.skin.basic_roughness)
    } else {
        let spec_default = b
            .tree
            .input_default(shader, "Specular")
            .ok()
            .and_then(|v| v.as_scalar())
            .unwrap_or(0.5);
        let rough_default = b
            .tree
            .input_default(shader, "Roughness")
            .ok()
            .and_then(|v| v.as_scalar())
            .unwrap_or(0.5);
        (
            params::specular_strength(&b.ctx.params, b.role, spec_default).1,
            params::roughness_remap(&b.ctx.params, b.role, rough_default).1,
        )
    };
    b.set(shader, "Specular", specular);
    b.set(shader, "Roughness", roughness);
}
