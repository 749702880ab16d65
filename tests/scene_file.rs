use std::fs;

use approx::assert_abs_diff_eq;
use glam::Vec3;
use portalpath::scene_file::{PlaneDescription, PortalConnection};
use portalpath::{Error, RenderMode, Scene, SceneDescription};

#[test]
fn saved_scene_loads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("room.json");

    let mut scene = SceneDescription::default();
    scene.planes.push(PlaneDescription {
        name: "Doorway".into(),
        position: Vec3::new(0.0, 1.0, -4.0),
        yz_rotation: 1.0,
        front_portal: PortalConnection {
            other_index: Some(0),
            flip: false,
        },
        ..PlaneDescription::default()
    });
    scene.render_settings.render_type = RenderMode::Lit;
    scene.save(&path).expect("save");

    let loaded = SceneDescription::load(&path).expect("load");
    assert_eq!(loaded, scene);

    let planes = loaded.to_planes();
    let kernel_scene = Scene::validated(&planes).expect("valid scene");
    assert_eq!(kernel_scene.planes().len(), 2);
    assert_eq!(planes[1].front_portal.target, Some(0));
}

#[test]
fn hand_written_scene_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("minimal.json");
    fs::write(
        &path,
        r#"{
            "camera": { "position": [0.0, 2.0, 0.0] },
            "sun_intensity": 10.0,
            "planes": [
                { "name": "a", "width": 2.0, "height": 2.0, "back_portal": { "other_index": 1 } },
                { "name": "b", "position": [5.0, 0.0, 0.0], "width": 2.0, "height": 2.0 }
            ]
        }"#,
    )
    .expect("write");

    let scene = SceneDescription::load(&path).expect("load");
    let camera = scene.camera();
    assert_abs_diff_eq!(camera.motor.translation_part().y, 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(camera.sun_color.x, 10.0, epsilon = 1e-6);
    assert_eq!(camera.max_bounces, 3);

    let planes = scene.to_planes();
    assert_eq!(planes[0].back_portal.target, Some(1));
    assert_abs_diff_eq!(planes[1].motor.translation_part().x, 5.0, epsilon = 1e-6);
}

#[test]
fn dangling_portal_is_reported() {
    let mut scene = SceneDescription::default();
    scene.planes[0].front_portal.other_index = Some(3);
    let planes = scene.to_planes();
    assert!(matches!(
        Scene::validated(&planes),
        Err(Error::PortalOutOfRange { target: 3, .. })
    ));
}

#[test]
fn load_errors_are_typed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.json");
    assert!(matches!(SceneDescription::load(&missing), Err(Error::Io(_))));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ \"planes\": [ 1, 2 ").expect("write");
    assert!(matches!(SceneDescription::load(&broken), Err(Error::Json(_))));
}
