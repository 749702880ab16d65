//! Ray representation for 3D ray tracing.
//!
//! A ray is defined as r(t) = origin + t * direction. Rays are traced with
//! unit-length directions so that `t` is a world-space distance.

use glam::Vec3A;

use crate::motor::Motor;

/// Ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    pub origin: Vec3A,

    /// Direction vector of the ray.
    ///
    /// Callers may pass any non-zero length; [`Ray::normalised`] is applied
    /// before intersection.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// Compute a point at parameter t along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// Same ray with a unit-length direction. A zero direction stays zero.
    pub fn normalised(self) -> Self {
        Self {
            origin: self.origin,
            direction: self.direction.normalize_or_zero(),
        }
    }

    /// Ray expressed through a rigid motion: origin as a point, direction
    /// through the rotation part only.
    pub fn transformed(self, motor: Motor) -> Self {
        Self {
            origin: motor.transform_point(self.origin),
            direction: motor.rotor_part().rotate(self.direction),
        }
    }
}
