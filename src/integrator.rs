//! Light transport: one radiance sample per camera ray.

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::material::Color;
use crate::random::Sampler;
use crate::ray::Ray;
use crate::scene::{Scene, SURFACE_EPSILON};

/// Raw selector for [`RenderMode::Unlit`].
pub const RENDER_TYPE_UNLIT: u32 = 0;
/// Raw selector for [`RenderMode::Lit`].
pub const RENDER_TYPE_LIT: u32 = 1;

/// Light transport strategy of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Surface colour plus emission of the first hit, or the sky.
    #[default]
    Unlit,
    /// Multi-bounce diffuse path tracing.
    Lit,
}

impl RenderMode {
    /// Raw selector value used in frame records.
    pub const fn raw(self) -> u32 {
        match self {
            RenderMode::Unlit => RENDER_TYPE_UNLIT,
            RenderMode::Lit => RENDER_TYPE_LIT,
        }
    }
}

impl TryFrom<u32> for RenderMode {
    type Error = Error;

    fn try_from(raw: u32) -> Result<Self> {
        match raw {
            RENDER_TYPE_UNLIT => Ok(RenderMode::Unlit),
            RENDER_TYPE_LIT => Ok(RenderMode::Lit),
            other => Err(Error::UnknownRenderType(other)),
        }
    }
}

/// Radiance arriving along `ray` under `mode`.
pub fn radiance(
    mode: RenderMode,
    ray: Ray,
    camera: &Camera,
    scene: &Scene<'_>,
    sampler: &mut Sampler,
) -> Color {
    match mode {
        RenderMode::Unlit => unlit(ray, camera, scene),
        RenderMode::Lit => lit(ray, camera, scene, sampler),
    }
}

/// First surface seen through any portals, shaded without lighting.
pub fn unlit(mut ray: Ray, camera: &Camera, scene: &Scene<'_>) -> Color {
    match scene.trace(&mut ray, camera.max_portal_traversals).hit {
        Some(hit) => hit.color + hit.emissive_color,
        None => camera.sky_color(ray.direction),
    }
}

/// Path traced estimate with up to `camera.max_bounces` segments.
///
/// Each segment follows portals on its own; a miss adds the sky and ends
/// the path.
pub fn lit(mut ray: Ray, camera: &Camera, scene: &Scene<'_>, sampler: &mut Sampler) -> Color {
    let mut result = Color::ZERO;
    let mut throughput = Color::ONE;

    for _ in 0..camera.max_bounces {
        let Some(hit) = scene.trace(&mut ray, camera.max_portal_traversals).hit else {
            result += camera.sky_color(ray.direction) * throughput;
            break;
        };

        result += hit.emissive_color * throughput;
        throughput *= hit.color;

        let bounce = hit.normal + sampler.random_hemisphere_direction(hit.normal);
        ray = Ray::new(
            hit.position + hit.normal * SURFACE_EPSILON,
            bounce.normalize_or(hit.normal),
        );
    }

    result
}
