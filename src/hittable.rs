//! Ray-surface intersection results.
//!
//! Defines the [`Hittable`] trait for primitives and the [`Hit`] record they
//! produce. Misses are `None`; there is no sentinel record.

use glam::Vec3A;

use crate::material::Color;
use crate::ray::Ray;

/// Ray-surface intersection information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the (unit direction) ray to the intersection point
    pub distance: f32,
    /// Point where the ray meets the surface
    pub position: Vec3A,
    /// Unit surface normal, facing back towards the incoming ray
    pub normal: Vec3A,
    /// Shaded surface colour at the hit point
    pub color: Color,
    /// Shaded emissive colour at the hit point
    pub emissive_color: Color,
    /// True if the ray hit the front (+normal side) face
    pub front: bool,
    /// Index of the hit surface in the scene, stamped by the scene scan
    pub surface: Option<usize>,
}

/// Trait for objects that can be intersected by rays.
///
/// Must be thread-safe (Sync + Send) because every pixel of a frame reads
/// the same scene concurrently.
pub trait Hittable: Sync + Send {
    /// First intersection with a positive distance, if any.
    fn hit(&self, ray: &Ray) -> Option<Hit>;
}
