//! Integration tests for forge_assets

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use forge_assets::*;
use forge_doc::Node;
use forge_observe::{ObservableDictionary, ObservableList, ObservableValue, Uniform};

const WOOD: &str = "\
renderQueue: Transparent
depthBias: 0.25
bEnableZWrite: false
cullMode: Back
shaderUid: shader-7
samplers:
  albedo: tex-1
uniformsVec4:
  tint: [1, 0.5, 0.25, 1]
uniformsFloat:
  intensity: 2.5
defines:
  - USE_FOG
  - USE_SHADOWS
";

fn write_asset(dir: &Path, name: &str, body: &str, id: &str) -> AssetPaths {
    let paths = AssetPaths::new(dir.join(name), DEFAULT_INFO_EXTENSION);
    fs::write(paths.asset(), body).unwrap();
    fs::write(paths.info(), format!("fileId: {}\nimporter: default\n", id)).unwrap();
    paths
}

fn loaded_material(dir: &Path) -> MaterialAsset {
    let paths = write_asset(dir, "wood.mat", WOOD, "mat-1");
    let mut material = MaterialAsset::new(paths);
    material.load().unwrap();
    material
}

#[test]
fn test_material_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut material = loaded_material(dir.path());

    material.set_fill_mode("Wireframe");
    material.save().unwrap();

    let mut reread = MaterialAsset::new(material.core().paths().clone());
    reread.load().unwrap();

    assert_eq!(reread.render_queue(), "Transparent");
    assert!((reread.depth_bias() - 0.25).abs() < f32::EPSILON);
    assert!(!reread.enable_z_write());
    assert!(reread.enable_depth_test());
    assert_eq!(reread.cull_mode(), "Back");
    assert_eq!(reread.fill_mode(), "Wireframe");
    assert_eq!(reread.shader(), &FileId::from("shader-7"));
    assert_eq!(reread.samplers().get_uniform("albedo"), Some(&FileId::from("tex-1")));
    assert_eq!(
        reread.uniforms_vec4().get_uniform("tint"),
        Some(&Vec4::new(1.0, 0.5, 0.25, 1.0))
    );
    assert_eq!(reread.uniforms_float().get_uniform("intensity"), Some(&2.5));

    let defines: Vec<String> = reread.defines().iter().map(|d| d.get().clone()).collect();
    assert_eq!(defines, vec!["USE_FOG", "USE_SHADOWS"]);
    assert_eq!(reread.file_id(), &FileId::from("mat-1"));
}

#[test]
fn test_dirty_propagation() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_asset(dir.path(), "wood.mat", WOOD, "mat-1");

    let mut material = MaterialAsset::new(paths);
    assert!(!material.is_dirty());

    material.load().unwrap();
    assert!(!material.is_dirty());
    assert_eq!(material.state(), AssetState::Loaded);

    material.uniforms_float_mut().set_uniform("intensity", 3.0);
    assert!(material.is_dirty());
    material.save().unwrap();
    assert!(!material.is_dirty());

    material.set_enable_depth_test(false);
    assert!(material.is_dirty());
    material.revert().unwrap();
    assert!(!material.is_dirty());
    assert!(material.enable_depth_test());
    assert_eq!(material.uniforms_float().get_uniform("intensity"), Some(&3.0));
}

#[test]
fn test_display_name_does_not_dirty() {
    let dir = tempfile::tempdir().unwrap();
    let mut material = loaded_material(dir.path());

    material.core_mut().set_display_name("Wood (renamed)");
    assert!(!material.is_dirty());

    material.core_mut().set_property("importer", forge_doc::Node::plain("custom"));
    assert!(material.is_dirty());
}

#[test]
fn test_revert_reattaches_listeners() {
    let dir = tempfile::tempdir().unwrap();
    let mut material = loaded_material(dir.path());

    material.defines_mut().push(forge_observe::ObservableValue::new("USE_RAIN".to_string()));
    material.revert().unwrap();
    assert!(!material.is_dirty());
    assert_eq!(material.defines().len(), 2);

    material
        .samplers_mut()
        .update(0, |sampler| sampler.set_value(FileId::from("tex-2")));
    assert!(material.is_dirty());
}

#[test]
fn test_revert_failure_reports_in_display_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut material = loaded_material(dir.path());
    material.set_cull_mode("Front");

    fs::write(material.core().paths().asset(), "uniformsFloat: [1, 2\n").unwrap();
    let result = material.revert();

    assert!(matches!(result, Err(AssetError::Decode { .. })));
    assert!(!material.is_dirty());
    assert_eq!(material.state(), AssetState::Loaded);
    assert!(material.display_name().starts_with("cannot decode"));
}

#[test]
fn test_save_requires_loaded_asset() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_asset(dir.path(), "wood.mat", WOOD, "mat-1");
    let mut material = MaterialAsset::new(paths);

    assert!(matches!(
        material.save(),
        Err(AssetError::InvalidState { operation: "save", state: AssetState::Unloaded })
    ));

    material.load().unwrap();
    assert!(matches!(material.load(), Err(AssetError::InvalidState { .. })));
}

#[test]
fn test_update_metadata_writes_info_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut material = loaded_material(dir.path());
    let primary = fs::read_to_string(material.core().paths().asset()).unwrap();

    material.core_mut().set_property("importer", forge_doc::Node::plain("custom"));
    material.update_metadata().unwrap();
    assert!(!material.is_dirty());

    let info = fs::read_to_string(material.core().paths().info()).unwrap();
    assert_eq!(info, "fileId: mat-1\nimporter: custom\n");
    assert_eq!(fs::read_to_string(material.core().paths().asset()).unwrap(), primary);
}

#[test]
fn test_generic_asset_saves_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_asset(dir.path(), "albedo.png", "", "tex-1");

    let asset = open_asset(paths.clone());
    let mut asset = asset.lock();
    asset.load().unwrap();
    assert_eq!(asset.kind(), AssetKind::Generic);

    asset.core_mut().set_property("srgb", forge_doc::Node::plain("true"));
    asset.save().unwrap();
    assert!(!asset.is_dirty());
    assert!(fs::read_to_string(paths.info()).unwrap().contains("srgb: true\n"));
}

#[test]
fn test_listener_hygiene_after_replace() {
    let mut objects: ObservableList<GameObject> = ObservableList::new();
    objects.push(GameObject::new("E"));

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let _sub = objects.item_changed().subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut old = objects.replace(0, GameObject::new("F")).unwrap();
    old.set_name("E2");
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    objects.update(0, |object| object.set_name("F2"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_uniform_equality_is_key_only() {
    assert_eq!(Uniform::new("intensity", 1.0_f32), Uniform::new("intensity", 2.0_f32));
    assert_ne!(Uniform::new("intensity", 1.0_f32), Uniform::new("scale", 1.0_f32));
}

#[test]
fn test_empty_uniform_set_is_a_mapping() {
    let data: MaterialData = forge_doc::from_str("renderQueue: Opaque\n").unwrap();
    let text = forge_doc::to_string(&data);
    assert!(text.contains("samplers: {}\n"));
    assert!(text.contains("uniformsVec4: {}\n"));
    assert!(text.contains("uniformsFloat: {}\n"));
}

#[test]
fn test_collection_shapes_are_never_swapped() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_asset(
        dir.path(),
        "fog.mat",
        "uniformsFloat: { intensity: 2.5 }\ndefines: [USE_FOG]\n",
        "mat-2",
    );

    let mut material = MaterialAsset::new(paths.clone());
    material.load().unwrap();
    material.save().unwrap();

    let text = fs::read_to_string(paths.asset()).unwrap();
    assert!(text.contains("uniformsFloat:\n  intensity: 2.5\n"));
    assert!(text.contains("defines:\n  - USE_FOG\n"));
}

#[test]
fn test_unknown_fields_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_asset(
        dir.path(),
        "legacy.mat",
        "legacyFlags: { a: [1, 2] }\nrenderQueue: Overlay\n",
        "mat-3",
    );

    let mut material = MaterialAsset::new(paths);
    material.load().unwrap();
    assert_eq!(material.render_queue(), "Overlay");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_preload_with_one_failure() {
    let dir = tempfile::tempdir().unwrap();
    let root = write_asset(
        dir.path(),
        "wood.mat",
        "samplers:\n  albedo: tex-1\n  normal: tex-2\n  detail: tex-3\n",
        "mat-1",
    );
    let good_a = write_asset(dir.path(), "albedo.png", "", "tex-1");
    let good_b = write_asset(dir.path(), "normal.png", "", "tex-3");
    let bad = AssetPaths::new(dir.path().join("broken.mat"), DEFAULT_INFO_EXTENSION);
    fs::write(bad.asset(), "samplers: [\n").unwrap();
    fs::write(bad.info(), "fileId: tex-2\n").unwrap();

    let index = Arc::new(AssetIndex::new());
    let material = index.open(root).unwrap();
    index.insert(FileId::from("tex-1"), open_asset(good_a));
    index.insert(FileId::from("tex-2"), open_asset(bad));
    index.insert(FileId::from("tex-3"), open_asset(good_b));

    let preloader = Preloader::new(index.clone(), 2);
    let report = preloader.preload(material.clone(), false).await;

    assert_eq!(report.resolved.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(
        &report.failed[0],
        AssetError::DependentResource { file_id, .. } if file_id == &FileId::from("tex-2")
    ));
    assert!(material.lock().core().is_preloaded());

    let failed = index.get(&FileId::from("tex-2")).unwrap();
    assert!(failed.lock().display_name().starts_with("cannot decode"));
    assert_eq!(failed.lock().state(), AssetState::Unloaded);

    for id in ["tex-1", "tex-3"] {
        let asset = index.get(&FileId::from(id)).unwrap();
        let asset = asset.lock();
        assert_eq!(asset.state(), AssetState::Loaded);
        assert!(asset.display_name().ends_with(".png"));
    }
    assert_eq!(material.lock().display_name(), "wood.mat");
}

#[test]
fn test_selection_follows_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_asset(dir.path(), "wood.mat", WOOD, "mat-1");
    let index = AssetIndex::new();
    let material = index.open(paths).unwrap();

    let mut selection = Selection::new();
    selection.select(&*material.lock());
    assert!(selection.is_selected(&FileId::from("mat-1")));
    assert!(Arc::ptr_eq(&selection.resolve(&index).unwrap(), &material));
}

fn assert_same_material(a: &MaterialData, b: &MaterialData) {
    assert_eq!(a.render_queue, b.render_queue);
    assert_eq!(a.depth_bias, b.depth_bias);
    assert_eq!(a.support_multisampling, b.support_multisampling);
    assert_eq!(a.custom_depth_shader, b.custom_depth_shader);
    assert_eq!(a.enable_depth_test, b.enable_depth_test);
    assert_eq!(a.enable_z_write, b.enable_z_write);
    assert_eq!(a.cull_mode, b.cull_mode);
    assert_eq!(a.blend_mode, b.blend_mode);
    assert_eq!(a.fill_mode, b.fill_mode);
    assert_eq!(a.shader, b.shader);

    let samplers = |m: &MaterialData| -> Vec<(String, FileId)> {
        m.samplers.iter().map(|u| (u.key().to_string(), u.value().clone())).collect()
    };
    let vectors = |m: &MaterialData| -> Vec<(String, Vec4)> {
        m.uniforms_vec4.iter().map(|u| (u.key().to_string(), *u.value())).collect()
    };
    let floats = |m: &MaterialData| -> Vec<(String, f32)> {
        m.uniforms_float.iter().map(|u| (u.key().to_string(), *u.value())).collect()
    };
    let defines = |m: &MaterialData| -> Vec<String> {
        m.defines.iter().map(|d| d.get().clone()).collect()
    };
    assert_eq!(samplers(a), samplers(b));
    assert_eq!(vectors(a), vectors(b));
    assert_eq!(floats(a), floats(b));
    assert_eq!(defines(a), defines(b));
}

fn material_round_trip(data: &MaterialData) -> MaterialData {
    let text = forge_doc::to_string(data);
    let again: MaterialData = forge_doc::from_str(&text).unwrap();
    assert_eq!(forge_doc::to_string(&again), text);
    again
}

#[test]
fn test_default_material_round_trip() {
    let data = MaterialData::default();
    assert_same_material(&material_round_trip(&data), &data);
}

#[test]
fn test_empty_strings_round_trip() {
    let data = MaterialData {
        render_queue: String::new(),
        cull_mode: String::new(),
        blend_mode: "Additive".to_string(),
        fill_mode: String::new(),
        shader: FileId::none(),
        ..MaterialData::default()
    };
    assert_same_material(&material_round_trip(&data), &data);

    let dir = tempfile::tempdir().unwrap();
    let mut material = loaded_material(dir.path());
    material.set_render_queue("");
    material.set_shader(FileId::none());
    material.save().unwrap();

    let mut reread = MaterialAsset::new(material.core().paths().clone());
    reread.load().unwrap();
    assert_eq!(reread.render_queue(), "");
    assert!(reread.shader().is_none());
}

#[test]
fn test_populated_material_round_trip() {
    let mut data: MaterialData = forge_doc::from_str(WOOD).unwrap();
    data.uniforms_float.set_uniform("true", 1.5);
    data.defines.push(ObservableValue::new("A: B".to_string()));
    assert_same_material(&material_round_trip(&data), &data);
}

#[test]
fn test_renamed_uniform_cannot_shadow_another() {
    let mut data = MaterialData::default();
    data.uniforms_float.set_uniform("a", 1.0);
    data.uniforms_float.set_uniform("b", 2.0);

    assert!(data.uniforms_float.rename_uniform("b", "a").is_err());
    let again = material_round_trip(&data);
    assert_eq!(again.uniforms_float.len(), 2);
    assert_eq!(again.uniforms_float.get_uniform("b"), Some(&2.0));
}

#[test]
fn test_populated_prefab_round_trip() {
    let mut data = PrefabData::default();

    let mut root = GameObject::new("Root");
    root.set_position(Vec4::new(1.0, 2.0, 3.0, 1.0));
    root.set_scale(Vec4::ONE);
    root.set_instance_id("root-1");
    root.set_components(vec![0, 1]);
    data.game_objects.push(root);

    let mut leaf = GameObject::new("Leaf: 2");
    leaf.set_parent_index(0);
    leaf.set_rotation(Vec4::new(0.0, 0.5, 0.0, 1.0));
    data.game_objects.push(leaf);

    let mut renderer = Component::new("MeshRenderer");
    renderer.set_instance_id("mesh-1");
    let overrides = renderer.override_properties_mut();
    overrides.insert("castShadows".to_string(), Node::plain("true"));
    overrides.insert("label".to_string(), Node::string("true"));
    overrides.insert(
        "materials".to_string(),
        Node::Sequence(vec![Node::string("mat-1"), Node::null()]),
    );
    data.components.push(renderer);
    data.components.push(Component::new("Collider"));

    let text = forge_doc::to_string(&data);
    let again: PrefabData = forge_doc::from_str(&text).unwrap();
    assert_eq!(forge_doc::to_string(&again), text);

    assert_eq!(again.game_objects.len(), 2);
    for (a, b) in data.game_objects.iter().zip(again.game_objects.iter()) {
        assert_eq!(a.name(), b.name());
        assert_eq!(a.position(), b.position());
        assert_eq!(a.rotation(), b.rotation());
        assert_eq!(a.scale(), b.scale());
        assert_eq!(a.parent_index(), b.parent_index());
        assert_eq!(a.instance_id(), b.instance_id());
        assert_eq!(a.components(), b.components());
    }

    assert_eq!(again.components.len(), 2);
    for (a, b) in data.components.iter().zip(again.components.iter()) {
        assert_eq!(a.typename(), b.typename());
        assert_eq!(a.instance_id(), b.instance_id());
        let entries = |c: &Component| -> Vec<(String, Node)> {
            c.override_properties()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };
        assert_eq!(entries(a).len(), entries(b).len());
        for ((ka, va), (kb, vb)) in entries(a).iter().zip(entries(b).iter()) {
            assert_eq!(ka, kb);
            assert_eq!(va.as_str(), vb.as_str());
            assert_eq!(va.is_null(), vb.is_null());
            assert_eq!(
                va.as_sequence().map(|s| s.len()),
                vb.as_sequence().map(|s| s.len())
            );
        }
        assert!(!b.is_dirty());
    }
}

#[test]
fn test_listener_hygiene_after_dictionary_replace() {
    let mut objects: ObservableDictionary<String, GameObject> = ObservableDictionary::new();
    objects.insert("tree".to_string(), GameObject::new("Tree"));

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let _sub = objects.item_changed().subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut old = objects
        .insert("tree".to_string(), GameObject::new("Pine"))
        .unwrap();
    old.set_name("Stale");
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    objects.update(&"tree".to_string(), |object| object.set_name("Fir"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(objects.len(), 1);
}
