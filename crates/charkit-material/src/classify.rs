//! Material/object classification heuristics.
//!
//! Pure substring matching on lowercased names, checked in a fixed
//! priority order; first match wins. The only state is the canonical
//! hair-object memoization performed by [`scan_for_hair_object`] during a
//! full-character pass: the first hair-bearing object found becomes *the*
//! hair object for the session, and subsequent per-pair calls consult it.

use charkit_scene::{Document, ObjectData};
use charkit_spec::{MaterialRole, Prefs};

use crate::context::Character;

/// Classifies one (object, material) pair into a role.
///
/// `hair_object` is the canonical hair object, if one has been scanned;
/// pass `None` for a cold single-pair call (object-hint matching still
/// applies, only the canonical short-circuit is skipped).
pub fn classify(
    object_name: &str,
    material_name: &str,
    prefs: &Prefs,
    hair_object: Option<&str>,
) -> MaterialRole {
    let obj = object_name.to_lowercase();
    let mat = material_name.to_lowercase();

    // Skin sub-parts before generic skin.
    if mat.contains("std_skin_head") {
        return MaterialRole::SkinHead;
    }
    if mat.contains("std_skin_body") {
        return MaterialRole::SkinBody;
    }
    if mat.contains("std_skin_arm") {
        return MaterialRole::SkinArm;
    }
    if mat.contains("std_skin_leg") {
        return MaterialRole::SkinLeg;
    }
    if mat.contains("skin") {
        return MaterialRole::Skin;
    }

    if mat.contains("std_nails") || mat.contains("fingernail") || mat.contains("toenail") {
        return MaterialRole::Nails;
    }

    // Eyelashes beat the hair short-circuit so lashes parented to a hair
    // object still get their hard-hashed treatment.
    if mat.contains("eyelash") {
        return MaterialRole::Eyelash;
    }

    // Hair object short-circuit: on a hair-bearing object, scalp-hinted
    // materials are scalp and everything else is hair, before any eye
    // checks run.
    let object_is_hair = hair_object.map(|h| h.eq_ignore_ascii_case(object_name)).unwrap_or(false)
        || matches_any(&obj, &prefs.hair_hints());
    if object_is_hair {
        if matches_any(&mat, &prefs.scalp_hints()) {
            return MaterialRole::Scalp;
        }
        return MaterialRole::Hair;
    }
    if matches_any(&mat, &prefs.hair_hints()) {
        return MaterialRole::Hair;
    }

    // Occlusion and tearline before the bare "eye" substring.
    if mat.contains("occlusion") {
        return MaterialRole::EyeOcclusion;
    }
    if mat.contains("tearline") {
        return MaterialRole::Tearline;
    }

    if mat.contains("upper_teeth") || mat.contains("teeth_upper") {
        return MaterialRole::TeethUpper;
    }
    if mat.contains("lower_teeth") || mat.contains("teeth_lower") {
        return MaterialRole::TeethLower;
    }
    if mat.contains("tongue") {
        return MaterialRole::Tongue;
    }

    if mat.contains("cornea") || mat.contains("eye") {
        return MaterialRole::Eye;
    }

    MaterialRole::Default
}

fn matches_any(name: &str, hints: &[String]) -> bool {
    hints.iter().any(|h| name.contains(h.as_str()))
}

/// Scans the whole character for the first hair-bearing object and
/// memoizes it as the canonical hair object.
///
/// An object qualifies when its own name, or any of its material names,
/// matches the hair hint list. The scan is a no-op once a hair object is
/// set; re-importing clears the character state and re-scans.
pub fn scan_for_hair_object(doc: &Document, character: &mut Character, prefs: &Prefs) {
    if character.hair_object.is_some() {
        return;
    }
    let hints = prefs.hair_hints();
    for object in &doc.objects {
        let mesh = match &object.data {
            ObjectData::Mesh(m) => m,
            _ => continue,
        };
        let obj_lower = object.name.to_lowercase();
        let object_matches = matches_any(&obj_lower, &hints);
        let material_matches = mesh.material_slots.iter().any(|slot| {
            doc.materials
                .get(*slot)
                .map(|m| matches_any(&m.name.to_lowercase(), &hints))
                .unwrap_or(false)
        });
        if object_matches || material_matches {
            character.hair_object = Some(object.name.clone());
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charkit_scene::{Material, MeshData, Object};
    use charkit_spec::ImportType;

    fn prefs() -> Prefs {
        Prefs::default()
    }

    #[test]
    fn skin_subparts_before_generic_skin() {
        let p = prefs();
        assert_eq!(
            classify("Body", "Std_Skin_Head", &p, None),
            MaterialRole::SkinHead
        );
        assert_eq!(
            classify("Body", "Std_Skin_Body", &p, None),
            MaterialRole::SkinBody
        );
        assert_eq!(
            classify("Body", "Std_Skin_Arm.001", &p, None),
            MaterialRole::SkinArm
        );
        assert_eq!(
            classify("Body", "Std_Skin_Leg", &p, None),
            MaterialRole::SkinLeg
        );
        assert_eq!(
            classify("Body", "GA_Skin_Custom", &p, None),
            MaterialRole::Skin
        );
    }

    #[test]
    fn occlusion_and_tearline_beat_eye() {
        let p = prefs();
        assert_eq!(
            classify("Eyes", "Std_Eye_Occlusion_L", &p, None),
            MaterialRole::EyeOcclusion
        );
        assert_eq!(
            classify("Eyes", "Std_Tearline_R", &p, None),
            MaterialRole::Tearline
        );
        assert_eq!(classify("Eyes", "Std_Eye_L", &p, None), MaterialRole::Eye);
        assert_eq!(
            classify("Eyes", "Std_Cornea_R", &p, None),
            MaterialRole::Eye
        );
    }

    #[test]
    fn teeth_and_tongue() {
        let p = prefs();
        assert_eq!(
            classify("Teeth", "Std_Upper_Teeth", &p, None),
            MaterialRole::TeethUpper
        );
        assert_eq!(
            classify("Teeth", "Std_Lower_Teeth", &p, None),
            MaterialRole::TeethLower
        );
        assert_eq!(
            classify("Tongue", "Std_Tongue", &p, None),
            MaterialRole::Tongue
        );
    }

    #[test]
    fn hair_object_short_circuits_eye_checks() {
        let p = prefs();
        // A material with "eye" in the name on the canonical hair object is
        // still hair.
        assert_eq!(
            classify("Bangs", "Eyecatcher_Strands", &p, Some("Bangs")),
            MaterialRole::Hair
        );
        // Scalp hint on the hair object.
        assert_eq!(
            classify("Bangs", "Base_Scalp", &p, Some("Bangs")),
            MaterialRole::Scalp
        );
    }

    #[test]
    fn eyelash_beats_hair_object() {
        let p = prefs();
        assert_eq!(
            classify("Bangs", "Std_Eyelash", &p, Some("Bangs")),
            MaterialRole::Eyelash
        );
    }

    #[test]
    fn unmatched_is_default() {
        let p = prefs();
        assert_eq!(
            classify("Shirt", "Cotton_Fabric", &p, None),
            MaterialRole::Default
        );
    }

    #[test]
    fn classification_is_total() {
        let p = prefs();
        // Any input produces exactly one role; no panic on odd names.
        for name in ["", ".", "std_", "EYE", "Skin Head", "党派"] {
            let _ = classify(name, name, &p, None);
        }
    }

    fn doc_with(objects: Vec<(&str, Vec<&str>)>) -> Document {
        let mut doc = Document::new();
        for (obj_name, mats) in objects {
            let mut slots = Vec::new();
            for m in mats {
                slots.push(doc.materials.len());
                doc.materials.push(Material::new(m));
            }
            doc.objects.push(Object::mesh(
                obj_name,
                MeshData {
                    data_name: format!("{obj_name}_mesh"),
                    material_slots: slots,
                    shape_keys: Vec::new(),
                },
            ));
        }
        doc
    }

    #[test]
    fn first_hair_bearing_object_wins() {
        let doc = doc_with(vec![
            ("Body", vec!["Std_Skin_Head"]),
            ("Bangs", vec!["Hair_Strands"]),
            ("Ponytail", vec!["Hair_Tail"]),
        ]);
        let mut character = Character::new("c.fbx", ImportType::Fbx, "C");
        scan_for_hair_object(&doc, &mut character, &prefs());
        assert_eq!(character.hair_object.as_deref(), Some("Bangs"));

        // Rescanning never reassigns.
        scan_for_hair_object(&doc, &mut character, &prefs());
        assert_eq!(character.hair_object.as_deref(), Some("Bangs"));
    }

    #[test]
    fn object_name_alone_can_qualify() {
        let doc = doc_with(vec![("Beard", vec!["Generic_Mat"])]);
        let mut character = Character::new("c.fbx", ImportType::Fbx, "C");
        scan_for_hair_object(&doc, &mut character, &prefs());
        assert_eq!(character.hair_object.as_deref(), Some("Beard"));
    }
}
