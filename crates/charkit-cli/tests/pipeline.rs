//! End-to-end command tests running against documents on disk.

use std::fs;

use charkit_cli::commands;
use charkit_rig::motion::MotionClip;
use charkit_rig::{nub_bone_name, DRIVER_OWNER};
use charkit_scene::{Armature, Bone, Document, MeshData, Object, ShapeKey};
use charkit_spec::{ControlDef, FaceRigConfig};

/// A 10-unit widget template so travel bounds come out round.
const WIDGETS: &str = r#"{
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
        {"name": "nub", "vertices": [[0.0, 0.0, 0.0]]}
    ]
}"#;

fn scene() -> Document {
    let mut doc = Document::new();
    doc.objects.push(Object::mesh(
        "Head",
        MeshData {
            data_name: "HeadMesh".to_string(),
            material_slots: Vec::new(),
            shape_keys: vec![ShapeKey::new("Mouth_Open")],
        },
    ));
    let mut armature = Armature::default();
    armature
        .bones
        .push(Bone::new("JawRoot", [0.0; 3], [0.0, 0.2, 0.0]));
    doc.objects.push(Object::armature("FaceRig", armature));
    doc
}

fn jaw_config() -> FaceRigConfig {
    FaceRigConfig {
        profile: Default::default(),
        controls: vec![ControlDef::slider("Jaw_Open", [0.0, 1.0])
            .with_shape("Mouth_Open", 1.0)
            .with_widget_indices(vec![0, 1])],
    }
}

#[test]
fn build_facerig_command_compiles_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets").join("widget_shapes.json"), WIDGETS).unwrap();

    let doc_path = dir.path().join("scene.json");
    scene().save(&doc_path).unwrap();
    let config_path = dir.path().join("facerig.json");
    fs::write(
        &config_path,
        serde_json::to_string_pretty(&jaw_config()).unwrap(),
    )
    .unwrap();

    commands::build_facerig::run(&doc_path, &config_path, None).unwrap();

    let doc = Document::load(&doc_path).unwrap();
    assert!(doc.drivers.iter().any(|d| d.owner == DRIVER_OWNER));
    let armature = doc.first_armature().unwrap().as_armature().unwrap();
    assert!(armature.bone(&nub_bone_name("Jaw_Open")).is_some());
}

#[test]
fn invalid_facerig_config_leaves_the_document_alone() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets").join("widget_shapes.json"), WIDGETS).unwrap();

    let doc_path = dir.path().join("scene.json");
    scene().save(&doc_path).unwrap();

    // Widget index 99 points past the 4-vertex template.
    let mut config = jaw_config();
    config.controls[0].widget_indices = vec![99];
    let config_path = dir.path().join("facerig.json");
    fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

    commands::build_facerig::run(&doc_path, &config_path, None).unwrap();

    let doc = Document::load(&doc_path).unwrap();
    assert!(doc.drivers.is_empty());
}

#[test]
fn output_path_keeps_the_input_untouched() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets").join("widget_shapes.json"), WIDGETS).unwrap();

    let doc_path = dir.path().join("scene.json");
    scene().save(&doc_path).unwrap();
    let config_path = dir.path().join("facerig.json");
    fs::write(&config_path, serde_json::to_string(&jaw_config()).unwrap()).unwrap();
    let out_path = dir.path().join("compiled.json");

    commands::build_facerig::run(&doc_path, &config_path, Some(&out_path)).unwrap();

    assert!(Document::load(&doc_path).unwrap().drivers.is_empty());
    assert!(!Document::load(&out_path).unwrap().drivers.is_empty());
}

#[test]
fn import_motion_command_writes_a_clip() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("take.csv");
    fs::write(
        &csv_path,
        "Timecode,Frame,Brow_Raise_L\n\
         00:00:00:00,0,0.0\n\
         00:00:01:00,30,1.0\n",
    )
    .unwrap();

    commands::import_motion::run(&csv_path, None, 0.0, 0.0, 0, &[]).unwrap();

    let json = fs::read_to_string(dir.path().join("take.json")).unwrap();
    let clip: MotionClip = serde_json::from_str(&json).unwrap();
    assert_eq!(clip.fps, 30);
    assert_eq!(clip.channels.len(), 1);
    assert_eq!(clip.times.len(), 31);
    // Linear resampling puts the midpoint frame halfway up the ramp.
    let values = &clip.channels[0].values;
    assert!((values[15] - 0.5).abs() < 1e-9);
    assert!((values[30] - 1.0).abs() < 1e-9);
}
