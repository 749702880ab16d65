//! Scene intersection and portal traversal.
//!
//! Scenes are small flat arrays of planes, so the nearest hit is found by a
//! linear scan. A ray that lands on a face with a portal link is moved into
//! the linked plane's frame and traced again, a bounded number of times.

use crate::error::{Error, Result};
use crate::hittable::{Hit, Hittable};
use crate::plane::Plane;
use crate::ray::Ray;

/// Distance a ray origin is pushed off a surface before re-tracing.
pub const SURFACE_EPSILON: f32 = 1e-3;

/// Read-only view of the planes of one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    planes: &'a [Plane],
}

/// Result of tracing a ray through portals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalTrace {
    /// Final hit after the last portal crossing, if any
    pub hit: Option<Hit>,
    /// Number of portals the ray crossed
    pub portals_crossed: u32,
}

impl<'a> Scene<'a> {
    /// Wrap a plane slice without checking it.
    pub fn new(planes: &'a [Plane]) -> Self {
        Self { planes }
    }

    /// Wrap a plane slice after checking every plane and portal link.
    pub fn validated(planes: &'a [Plane]) -> Result<Self> {
        for (index, plane) in planes.iter().enumerate() {
            plane.validate(index)?;
            for link in [plane.front_portal, plane.back_portal] {
                if let Some(target) = link.target {
                    if target >= planes.len() {
                        return Err(Error::PortalOutOfRange {
                            plane: index,
                            target,
                            count: planes.len(),
                        });
                    }
                }
            }
        }
        log::debug!("validated scene with {} planes", planes.len());
        Ok(Self { planes })
    }

    /// Planes in index order.
    pub fn planes(&self) -> &'a [Plane] {
        self.planes
    }

    /// Nearest hit over all planes, stamped with the plane index.
    ///
    /// Only a strictly closer hit replaces the current one, so ties keep
    /// the lowest index.
    pub fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        for (index, plane) in self.planes.iter().enumerate() {
            if let Some(hit) = plane.hit(ray) {
                if closest.map_or(true, |best| hit.distance < best.distance) {
                    closest = Some(Hit {
                        surface: Some(index),
                        ..hit
                    });
                }
            }
        }
        closest
    }

    /// Trace `ray`, following portal links up to `max_portal_traversals`
    /// times. The ray is updated in place to the last re-traced segment.
    pub fn trace(&self, ray: &mut Ray, max_portal_traversals: u32) -> PortalTrace {
        *ray = ray.normalised();
        let mut hit = self.closest_hit(ray);
        let mut portals_crossed = 0;

        while portals_crossed < max_portal_traversals {
            let Some(current) = hit else { break };
            let Some(index) = current.surface else { break };
            let Some(plane) = self.planes.get(index) else { break };
            let link = plane.portal_for(current.front);
            let Some(other) = link.target.and_then(|target| self.planes.get(target)) else {
                break;
            };

            // `link.flip` (mirrored crossing) is not applied
            let relative = other.motor.after(plane.motor.inverse());
            // the normal faces the incoming ray, so this steps through the surface
            let through = Ray::new(current.position - current.normal * SURFACE_EPSILON, ray.direction);
            *ray = through.transformed(relative).normalised();

            hit = self.closest_hit(ray);
            portals_crossed += 1;
        }

        PortalTrace {
            hit,
            portals_crossed,
        }
    }
}

impl Hittable for Scene<'_> {
    fn hit(&self, ray: &Ray) -> Option<Hit> {
        self.closest_hit(ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{CheckerMaterial, Color};
    use crate::motor::Motor;
    use crate::plane::PortalLink;
    use approx::assert_abs_diff_eq;
    use glam::Vec3A;

    fn plane_at(position: Vec3A) -> Plane {
        Plane {
            motor: Motor::translation(position),
            width: 4.0,
            height: 4.0,
            ..Plane::default()
        }
    }

    fn down_from(origin: Vec3A) -> Ray {
        Ray::new(origin, Vec3A::NEG_Y)
    }

    #[test]
    fn closest_hit_picks_nearest_plane() {
        let planes = [
            plane_at(Vec3A::new(0.0, -3.0, 0.0)),
            plane_at(Vec3A::new(0.0, -1.0, 0.0)),
        ];
        let hit = Scene::new(&planes)
            .closest_hit(&down_from(Vec3A::ZERO))
            .expect("hit");
        assert_eq!(hit.surface, Some(1));
        assert_abs_diff_eq!(hit.distance, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn ties_keep_lowest_index() {
        let planes = [plane_at(Vec3A::NEG_Y), plane_at(Vec3A::NEG_Y)];
        let hit = Scene::new(&planes)
            .closest_hit(&down_from(Vec3A::ZERO))
            .expect("hit");
        assert_eq!(hit.surface, Some(0));
    }

    #[test]
    fn empty_scene_misses() {
        assert!(Scene::new(&[]).closest_hit(&down_from(Vec3A::ZERO)).is_none());
    }

    #[test]
    fn scene_is_hittable() {
        let planes = [plane_at(Vec3A::NEG_Y)];
        let scene = Scene::new(&planes);
        let world: &dyn Hittable = &scene;
        let ray = down_from(Vec3A::ZERO);
        assert_eq!(world.hit(&ray), scene.closest_hit(&ray));
    }

    #[test]
    fn portal_moves_ray_to_linked_plane() {
        let mut entry = plane_at(Vec3A::ZERO);
        entry.front_portal = PortalLink::to(1);
        let exit = plane_at(Vec3A::new(10.0, 0.0, 0.0));
        let mut floor = plane_at(Vec3A::new(10.0, -2.0, 0.0));
        floor.material = CheckerMaterial {
            emissive_color: Color::ONE,
            ..CheckerMaterial::default()
        };
        let planes = [entry, exit, floor];
        let scene = Scene::new(&planes);

        let mut ray = down_from(Vec3A::new(0.0, 5.0, 0.0));
        let traced = scene.trace(&mut ray, 1);
        assert_eq!(traced.portals_crossed, 1);
        let hit = traced.hit.expect("hit");
        assert_eq!(hit.surface, Some(2));
        assert_abs_diff_eq!(hit.position.x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(hit.position.y, -2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(ray.origin.x, 10.0, epsilon = 1e-4);

        let mut ray = down_from(Vec3A::new(0.0, 5.0, 0.0));
        let traced = scene.trace(&mut ray, 0);
        assert_eq!(traced.portals_crossed, 0);
        assert_eq!(traced.hit.and_then(|hit| hit.surface), Some(0));
    }

    #[test]
    fn unlinked_face_stops_traversal() {
        let mut plane = plane_at(Vec3A::ZERO);
        plane.back_portal = PortalLink::to(0);
        let planes = [plane];
        let mut ray = down_from(Vec3A::new(0.0, 1.0, 0.0));
        let traced = Scene::new(&planes).trace(&mut ray, 8);
        assert_eq!(traced.portals_crossed, 0);
        assert!(traced.hit.expect("hit").front);
    }

    #[test]
    fn portal_cycle_is_bounded() {
        // the front of the lower plane leads to the upper plane, which puts
        // the ray right back above the lower plane again
        let mut lower = plane_at(Vec3A::ZERO);
        lower.front_portal = PortalLink::to(1);
        let upper = plane_at(Vec3A::new(0.0, 2.0, 0.0));
        let planes = [lower, upper];
        let scene = Scene::new(&planes);

        for bound in [1, 2, 7, 50] {
            let mut ray = down_from(Vec3A::new(0.0, 1.0, 0.0));
            let traced = scene.trace(&mut ray, bound);
            assert_eq!(traced.portals_crossed, bound);
            assert_eq!(traced.hit.and_then(|hit| hit.surface), Some(0));
        }
    }

    #[test]
    fn validated_rejects_dangling_portal() {
        let mut plane = plane_at(Vec3A::ZERO);
        plane.front_portal = PortalLink::to(4);
        let planes = [plane];
        assert!(matches!(
            Scene::validated(&planes),
            Err(Error::PortalOutOfRange {
                plane: 0,
                target: 4,
                count: 1
            })
        ));
    }
}
