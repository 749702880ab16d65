//! Finite rectangular plane primitive with portal links.
//!
//! In its local frame a plane lies in the XZ plane with its front face
//! towards +Y; it spans `width` along X and `height` along Z, centred on the
//! origin. The plane's motor places that frame in the world.

use glam::Vec3A;

use crate::error::{Error, Result};
use crate::hittable::{Hit, Hittable};
use crate::interval::Interval;
use crate::material::{checker_cell, CheckerMaterial};
use crate::motor::Motor;
use crate::ray::Ray;

/// Directions closer than this to the plane (in local Y) count as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-3;

/// Link from one face of a plane to another plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortalLink {
    /// Index of the connected plane, `None` for no connection
    pub target: Option<usize>,
    /// Mirror the ray when crossing. Stored for scene round-trips but not
    /// applied by the traversal yet.
    pub flip: bool,
}

impl PortalLink {
    /// Link to `target`.
    pub fn to(target: usize) -> Self {
        Self {
            target: Some(target),
            flip: false,
        }
    }
}

/// Finite checkered plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Local-to-world rigid motion
    pub motor: Motor,
    /// Extent along local X, > 0
    pub width: f32,
    /// Extent along local Z, > 0
    pub height: f32,
    /// Checker tiles along local X, >= 1
    pub checker_count_x: u32,
    /// Checker tiles along local Z, >= 1
    pub checker_count_z: u32,
    /// Surface and emissive shading
    pub material: CheckerMaterial,
    /// Link taken by rays hitting the front face
    pub front_portal: PortalLink,
    /// Link taken by rays hitting the back face
    pub back_portal: PortalLink,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            motor: Motor::IDENTITY,
            width: 1.0,
            height: 1.0,
            checker_count_x: 1,
            checker_count_z: 1,
            material: CheckerMaterial::default(),
            front_portal: PortalLink::default(),
            back_portal: PortalLink::default(),
        }
    }
}

impl Plane {
    /// Link for the face the hit landed on.
    pub fn portal_for(&self, front: bool) -> PortalLink {
        if front {
            self.front_portal
        } else {
            self.back_portal
        }
    }

    /// Check the size and tiling invariants. `index` is used for reporting.
    pub fn validate(&self, index: usize) -> Result<()> {
        let reason = if !(self.width > 0.0) {
            Some("width must be positive")
        } else if !(self.height > 0.0) {
            Some("height must be positive")
        } else if self.checker_count_x == 0 || self.checker_count_z == 0 {
            Some("checker counts must be at least 1")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(Error::InvalidPlane {
                plane: index,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Intersect a world-space ray with the plane.
    ///
    /// Returns `None` when the ray runs (nearly) parallel to the plane,
    /// points away from it, or meets it outside the rectangle.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let ray = ray.normalised();
        let local = ray.transformed(self.motor.inverse());
        let (origin, direction) = (local.origin, local.direction);

        if origin.y.signum() == direction.y.signum() || direction.y.abs() < PARALLEL_EPSILON {
            return None;
        }

        let distance = (origin.y / direction.y).abs();
        let local_position = origin + direction * distance;

        let x_extent = Interval::centered(self.width);
        let z_extent = Interval::centered(self.height);
        if !x_extent.contains(local_position.x) || !z_extent.contains(local_position.z) {
            return None;
        }

        let front = direction.y < 0.0;
        let local_normal = if front { Vec3A::Y } else { Vec3A::NEG_Y };
        let normal = self.motor.rotor_part().rotate(local_normal).normalize();

        let cell = checker_cell(
            x_extent.fraction(local_position.x),
            z_extent.fraction(local_position.z),
            self.checker_count_x,
            self.checker_count_z,
        );
        let (color, emissive_color) = self.material.shade(cell);

        Some(Hit {
            distance,
            position: ray.at(distance),
            normal,
            color,
            emissive_color,
            front,
            surface: None,
        })
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray) -> Option<Hit> {
        self.intersect(ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;
    use crate::rotor::Rotor;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    fn checkered(count: u32) -> Plane {
        Plane {
            width: 10.0,
            height: 10.0,
            checker_count_x: count,
            checker_count_z: count,
            material: CheckerMaterial {
                color: Color::new(1.0, 0.0, 0.0),
                checker_darkness: 0.5,
                emissive_color: Color::new(0.0, 0.0, 2.0),
                emissive_checker_darkness: 0.25,
            },
            ..Plane::default()
        }
    }

    #[test]
    fn straight_down_hits_front_face() {
        let plane = checkered(10);
        let hit = plane
            .intersect(&Ray::new(Vec3A::new(0.0, 3.0, 0.0), Vec3A::NEG_Y))
            .expect("hit");
        assert_abs_diff_eq!(hit.distance, 3.0, epsilon = 1e-5);
        assert!(hit.front);
        assert_eq!(hit.normal, Vec3A::Y);
        assert_eq!(hit.color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(hit.surface, None);
    }

    #[test]
    fn from_below_hits_back_face() {
        let plane = checkered(1);
        let hit = plane
            .intersect(&Ray::new(Vec3A::new(1.0, -2.0, 1.0), Vec3A::Y))
            .expect("hit");
        assert!(!hit.front);
        assert_eq!(hit.normal, Vec3A::NEG_Y);
        assert_abs_diff_eq!(hit.position.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn unnormalised_direction_gives_world_distance() {
        let plane = checkered(1);
        let hit = plane
            .intersect(&Ray::new(Vec3A::new(0.0, 4.0, 0.0), Vec3A::new(0.0, -10.0, 0.0)))
            .expect("hit");
        assert_abs_diff_eq!(hit.distance, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn parallel_ray_misses() {
        let plane = checkered(1);
        assert!(plane
            .intersect(&Ray::new(Vec3A::new(0.0, 1.0, 0.0), Vec3A::X))
            .is_none());
        // nearly parallel, below the epsilon
        assert!(plane
            .intersect(&Ray::new(
                Vec3A::new(0.0, 0.001, 0.0),
                Vec3A::new(1.0, -0.0005, 0.0)
            ))
            .is_none());
    }

    #[test]
    fn ray_pointing_away_misses() {
        let plane = checkered(1);
        assert!(plane
            .intersect(&Ray::new(Vec3A::new(0.0, 1.0, 0.0), Vec3A::Y))
            .is_none());
        assert!(plane
            .intersect(&Ray::new(Vec3A::new(0.0, -1.0, 0.0), Vec3A::NEG_Y))
            .is_none());
    }

    #[test]
    fn outside_rectangle_misses() {
        let plane = checkered(1);
        assert!(plane
            .intersect(&Ray::new(Vec3A::new(5.5, 1.0, 0.0), Vec3A::NEG_Y))
            .is_none());
        assert!(plane
            .intersect(&Ray::new(Vec3A::new(0.0, 1.0, -5.5), Vec3A::NEG_Y))
            .is_none());
        assert!(plane
            .intersect(&Ray::new(Vec3A::new(4.9, 1.0, 4.9), Vec3A::NEG_Y))
            .is_some());
    }

    #[test]
    fn odd_cells_are_darkened() {
        let plane = checkered(10);
        // cell (5, 5) at the centre is even, cell (6, 5) one tile over is odd
        let even = plane
            .intersect(&Ray::new(Vec3A::new(0.5, 1.0, 0.5), Vec3A::NEG_Y))
            .expect("hit");
        let odd = plane
            .intersect(&Ray::new(Vec3A::new(1.5, 1.0, 0.5), Vec3A::NEG_Y))
            .expect("hit");
        assert_eq!(even.color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(odd.color, Color::new(0.5, 0.0, 0.0));
        assert_eq!(odd.emissive_color, Color::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn single_tile_plane_is_uniform_up_to_its_edges() {
        let plane = checkered(1);
        let down_at = |x: f32, z: f32| {
            plane
                .intersect(&Ray::new(Vec3A::new(x, 1.0, z), Vec3A::NEG_Y))
                .expect("hit")
        };
        let inner = down_at(4.0, 0.0);
        for (x, z) in [(5.0, 0.0), (0.0, 5.0), (5.0, 5.0), (-5.0, -5.0)] {
            let edge = down_at(x, z);
            assert_eq!(edge.color, inner.color);
            assert_eq!(edge.emissive_color, inner.emissive_color);
        }
        assert_eq!(inner.color, Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn moved_and_rotated_plane() {
        // a wall facing -X, standing at x = 4
        let plane = Plane {
            motor: Motor::from_rotor(Rotor::rotation_xy(FRAC_PI_2))
                .then(Motor::translation(Vec3A::new(4.0, 0.0, 0.0))),
            ..checkered(1)
        };
        let hit = plane
            .intersect(&Ray::new(Vec3A::new(0.0, 1.0, 0.0), Vec3A::X))
            .expect("hit");
        assert_abs_diff_eq!(hit.distance, 4.0, epsilon = 1e-4);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.position.x, 4.0, epsilon = 1e-4);
        assert!(hit.front);
    }

    #[test]
    fn validate_rejects_degenerate_planes() {
        assert!(checkered(1).validate(0).is_ok());
        let flat = Plane {
            width: 0.0,
            ..Plane::default()
        };
        assert!(matches!(
            flat.validate(3),
            Err(Error::InvalidPlane { plane: 3, .. })
        ));
        let untiled = Plane {
            checker_count_z: 0,
            ..Plane::default()
        };
        assert!(untiled.validate(0).is_err());
    }
}
