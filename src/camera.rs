//! Camera for primary ray generation and sky lookup.
//!
//! The camera looks along its local +X axis with +Y up and +Z to the right;
//! its motor places that frame in the world.

use glam::{UVec2, Vec2, Vec3A};

use crate::material::Color;
use crate::motor::Motor;
use crate::ray::Ray;
use crate::scene::Scene;

/// Camera-local viewing direction.
pub const FORWARD: Vec3A = Vec3A::X;
/// Camera-local up direction.
pub const UP: Vec3A = Vec3A::Y;
/// Camera-local right direction.
pub const RIGHT: Vec3A = Vec3A::Z;

/// Camera and environment of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera-to-world rigid motion
    pub motor: Motor,
    /// Sky radiance straight up
    pub up_sky_color: Color,
    /// Sky radiance straight down
    pub down_sky_color: Color,
    /// Flat radiance inside the sun disc
    pub sun_color: Color,
    /// Unit direction towards the sun
    pub sun_direction: Vec3A,
    /// Angular radius of the sun disc in radians
    pub sun_size: f32,
    /// Path length limit for lit rendering
    pub max_bounces: u32,
    /// Portal crossings allowed per traced segment
    pub max_portal_traversals: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            motor: Motor::IDENTITY,
            up_sky_color: Color::new(0.4, 0.5, 0.8),
            down_sky_color: Color::new(0.4, 0.4, 0.4),
            sun_color: Color::splat(100.0),
            sun_direction: Vec3A::new(0.4, 1.0, 0.2).normalize(),
            sun_size: 6.0f32.to_radians(),
            max_bounces: 3,
            max_portal_traversals: 10,
        }
    }
}

impl Camera {
    /// World-space ray through `pixel` of an image of `dimensions`.
    ///
    /// `offset` is the sample position inside the pixel, (0.5, 0.5) being
    /// its centre. `aspect` stretches the horizontal field of view.
    pub fn primary_ray(&self, pixel: UVec2, dimensions: UVec2, aspect: f32, offset: Vec2) -> Ray {
        let uv = (pixel.as_vec2() + offset) / dimensions.as_vec2();
        let ndc = Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0);
        let direction = FORWARD + UP * ndc.y + RIGHT * (ndc.x * aspect);
        Ray::new(Vec3A::ZERO, direction)
            .transformed(self.motor)
            .normalised()
    }

    /// Radiance arriving from the environment along `direction`.
    ///
    /// A vertical gradient between the down and up colours, replaced by the
    /// flat sun colour inside the sun's angular radius.
    pub fn sky_color(&self, direction: Vec3A) -> Color {
        let direction = direction.normalize_or_zero();
        let angle_to_sun = direction.dot(self.sun_direction).clamp(-1.0, 1.0).acos();
        if angle_to_sun < self.sun_size {
            return self.sun_color;
        }
        let t = direction.y * 0.5 + 0.5;
        self.down_sky_color.lerp(self.up_sky_color, t)
    }

    /// Move the camera to `target`, carrying it through a portal if the
    /// straight path from the current position crosses a linked face.
    ///
    /// Returns true when the camera changed, meaning accumulated frames no
    /// longer match the view.
    pub fn move_through_portals(&mut self, target: Motor, scene: &Scene<'_>) -> bool {
        let from = self.motor.translation_part();
        let travel = target.translation_part() - from;
        let moved = self.motor != target;
        self.motor = target;

        let length = travel.length();
        if length <= 0.0 {
            return moved;
        }
        let Some(hit) = scene.closest_hit(&Ray::new(from, travel / length)) else {
            return moved;
        };
        if hit.distance >= length {
            return moved;
        }
        let Some(plane) = hit.surface.and_then(|index| scene.planes().get(index)) else {
            return moved;
        };
        let Some(other) = plane
            .portal_for(hit.front)
            .target
            .and_then(|index| scene.planes().get(index))
        else {
            return moved;
        };

        let relative = other.motor.after(plane.motor.inverse());
        self.motor = relative.after(target).normalised();
        log::debug!("camera crossed portal into {:?}", self.motor.translation_part());
        true
    }
}
