use std::f32::consts::FRAC_PI_2;

use glam::{UVec2, Vec3A};
use portalpath::accumulator::pixel_to_color;
use portalpath::layout::{decode_planes, encode_planes, GpuFrame};
use portalpath::material::{CheckerMaterial, Color};
use portalpath::{
    render_frame, render_pixel, AccumulationImage, Camera, FrameControl, Motor, Plane, PortalLink,
    RenderMode, Rotor, Scene,
};

fn looking_down_from(position: Vec3A) -> Camera {
    Camera {
        motor: Motor::from_rotor(Rotor::rotation_xy(-FRAC_PI_2)).then(Motor::translation(position)),
        sun_size: 0.0,
        ..Camera::default()
    }
}

fn centre_pixel(frame: &FrameControl, scene: &Scene<'_>) -> Color {
    let mut cell = Color::ZERO;
    render_pixel(UVec2::ZERO, UVec2::ONE, frame, scene, &mut cell);
    cell
}

#[test]
fn unlit_plane_under_camera() {
    let planes = [Plane {
        width: 10.0,
        height: 10.0,
        checker_count_x: 9,
        checker_count_z: 9,
        material: CheckerMaterial {
            color: Color::new(0.1, 0.2, 0.3),
            emissive_color: Color::new(0.5, 0.0, 0.0),
            ..CheckerMaterial::default()
        },
        ..Plane::default()
    }];
    let scene = Scene::validated(&planes).expect("valid scene");
    let frame = FrameControl {
        camera: looking_down_from(Vec3A::new(0.0, 3.0, 0.0)),
        antialiasing: false,
        ..FrameControl::default()
    };
    let color = centre_pixel(&frame, &scene);
    assert!(color.abs_diff_eq(Color::new(0.6, 0.2, 0.3), 1e-6));
}

/// Entry plane whose front face leads to an exit plane ten units along X,
/// with an emissive floor two units below the exit.
fn portal_scene() -> Vec<Plane> {
    let square = |position: Vec3A| Plane {
        motor: Motor::translation(position),
        width: 4.0,
        height: 4.0,
        ..Plane::default()
    };
    let mut entry = square(Vec3A::ZERO);
    entry.front_portal = PortalLink::to(1);
    entry.material.color = Color::ZERO;
    let mut exit = square(Vec3A::new(10.0, 0.0, 0.0));
    exit.back_portal = PortalLink::to(0);
    let mut floor = square(Vec3A::new(10.0, -2.0, 0.0));
    floor.material = CheckerMaterial {
        color: Color::ZERO,
        emissive_color: Color::ONE,
        ..CheckerMaterial::default()
    };
    vec![entry, exit, floor]
}

#[test]
fn lit_ray_is_remapped_through_portal_once() {
    let planes = portal_scene();
    let scene = Scene::validated(&planes).expect("valid scene");
    let mut frame = FrameControl {
        camera: Camera {
            max_bounces: 1,
            max_portal_traversals: 1,
            ..looking_down_from(Vec3A::new(0.0, 5.0, 0.0))
        },
        render_mode: RenderMode::Lit,
        antialiasing: false,
        ..FrameControl::default()
    };
    let through = centre_pixel(&frame, &scene);
    assert!(through.abs_diff_eq(Color::ONE, 1e-6));

    frame.camera.max_portal_traversals = 0;
    let blocked = centre_pixel(&frame, &scene);
    assert_eq!(blocked, Color::ZERO);
}

#[test]
fn portal_cycle_render_terminates() {
    // two planes facing each other with both faces linked: every ray cycles
    let mut lower = Plane {
        width: 100.0,
        height: 100.0,
        ..Plane::default()
    };
    lower.front_portal = PortalLink::to(1);
    lower.back_portal = PortalLink::to(1);
    let mut upper = lower;
    upper.motor = Motor::translation(Vec3A::new(0.0, 2.0, 0.0));
    upper.front_portal = PortalLink::to(0);
    upper.back_portal = PortalLink::to(0);
    let planes = [lower, upper];
    let scene = Scene::validated(&planes).expect("valid scene");

    let frame = FrameControl {
        camera: Camera {
            max_portal_traversals: 64,
            ..looking_down_from(Vec3A::new(0.0, 1.0, 0.0))
        },
        render_mode: RenderMode::Lit,
        samples_per_pixel: 2,
        ..FrameControl::default()
    };
    let mut image = AccumulationImage::new(8, 8);
    render_frame(&frame, &scene, image.image_mut());
    assert!(image.image().pixels().all(|p| p.0.iter().all(|v| v.is_finite())));
}

#[test]
fn progressive_frames_converge_to_mean() {
    let planes = portal_scene();
    let scene = Scene::new(&planes);
    let camera = Camera {
        max_bounces: 3,
        ..looking_down_from(Vec3A::new(3.0, 5.0, 3.0))
    };
    let mut image = AccumulationImage::new(4, 4);
    let mut per_frame = Vec::new();

    for seed in 0..6 {
        let frame = FrameControl {
            camera,
            accumulated_frames: image.accumulated_frames(),
            random_seed: seed,
            render_mode: RenderMode::Lit,
            ..FrameControl::default()
        };
        let mut single = AccumulationImage::new(4, 4);
        let fresh = FrameControl {
            accumulated_frames: 0,
            ..frame
        };
        render_frame(&fresh, &scene, single.image_mut());
        per_frame.push(pixel_to_color(single.image().get_pixel(1, 2)));

        render_frame(&frame, &scene, image.image_mut());
        image.finish_frame();
    }

    let expected = per_frame.iter().copied().sum::<Color>() / per_frame.len() as f32;
    let actual = image.color(1, 2);
    assert!(actual.abs_diff_eq(expected, 1e-4 * expected.max_element().max(1.0)));
}

#[test]
fn scene_survives_binary_records() {
    let planes = portal_scene();
    let decoded = decode_planes(&encode_planes(&planes)).expect("valid records");
    assert_eq!(decoded, planes);

    let frame = FrameControl {
        render_mode: RenderMode::Lit,
        ..FrameControl::default()
    };
    let record = GpuFrame::new(&frame, planes.len() as u32);
    assert_eq!(record.to_frame_control().expect("valid frame"), frame);
    let records = encode_planes(&planes);
    assert_eq!(record.decode_planes(&records).expect("valid records"), planes);
}
