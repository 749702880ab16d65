//! Per-pixel kernel driver and the CPU frame dispatcher.
//!
//! [`render_pixel`] is one invocation of the kernel: camera ray, samples,
//! running mean. [`render_frame`] runs it for every pixel of an image in
//! parallel; pixels share nothing but read-only inputs.

use glam::{UVec2, Vec2};
use rayon::prelude::*;

use crate::accumulator::{accumulate, color_to_pixel, pixel_to_color, HdrImage};
use crate::camera::Camera;
use crate::integrator::{radiance, RenderMode};
use crate::material::Color;
use crate::random::Sampler;
use crate::scene::Scene;

/// Per-frame inputs shared by every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameControl {
    /// Camera and environment
    pub camera: Camera,
    /// Width over height of the output image
    pub aspect_ratio: f32,
    /// Frames already averaged into the target image
    pub accumulated_frames: u32,
    /// Seed for this frame's samplers
    pub random_seed: u32,
    /// Light transport strategy
    pub render_mode: RenderMode,
    /// Samples averaged per pixel in this frame; 0 counts as 1
    pub samples_per_pixel: u32,
    /// Jitter sample positions inside the pixel
    pub antialiasing: bool,
}

impl Default for FrameControl {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            aspect_ratio: 1.0,
            accumulated_frames: 0,
            random_seed: 0,
            render_mode: RenderMode::Unlit,
            samples_per_pixel: 1,
            antialiasing: true,
        }
    }
}

/// Mean radiance of one frame's samples at `pixel`.
pub fn sample_pixel(pixel: UVec2, dimensions: UVec2, frame: &FrameControl, scene: &Scene<'_>) -> Color {
    let mut sampler = Sampler::new(frame.random_seed, pixel.x, pixel.y);
    let samples = frame.samples_per_pixel.max(1);

    let mut total = Color::ZERO;
    for _ in 0..samples {
        let offset = if frame.antialiasing {
            Vec2::new(sampler.next_uniform(), sampler.next_uniform())
        } else {
            Vec2::splat(0.5)
        };
        let ray = frame
            .camera
            .primary_ray(pixel, dimensions, frame.aspect_ratio, offset);
        total += radiance(frame.render_mode, ray, &frame.camera, scene, &mut sampler);
    }
    total / samples as f32
}

/// One kernel invocation: sample `pixel` and fold the result into `cell`.
///
/// Pixels outside `dimensions` are left untouched.
pub fn render_pixel(
    pixel: UVec2,
    dimensions: UVec2,
    frame: &FrameControl,
    scene: &Scene<'_>,
    cell: &mut Color,
) {
    if pixel.x >= dimensions.x || pixel.y >= dimensions.y {
        return;
    }
    let sample = sample_pixel(pixel, dimensions, frame, scene);
    *cell = accumulate(*cell, sample, frame.accumulated_frames);
}

/// Run the kernel for every pixel of `image` in parallel.
///
/// The caller owns the frame counter: `frame.accumulated_frames` must be the
/// number of frames already in `image`.
pub fn render_frame(frame: &FrameControl, scene: &Scene<'_>, image: &mut HdrImage) {
    let (width, height) = image.dimensions();
    let dimensions = UVec2::new(width, height);
    log::trace!(
        "dispatching frame {} ({}x{}, {:?})",
        frame.accumulated_frames,
        width,
        height,
        frame.render_mode
    );

    image.enumerate_pixels_mut().par_bridge().for_each(|(x, y, pixel)| {
        let mut cell = pixel_to_color(pixel);
        render_pixel(UVec2::new(x, y), dimensions, frame, scene, &mut cell);
        *pixel = color_to_pixel(cell);
    });
}
