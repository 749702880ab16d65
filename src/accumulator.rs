//! Progressive accumulation of radiance samples.
//!
//! Every pixel holds the running mean of all samples combined into it since
//! the last reset. The frame counter is the only thing that orders frames.

use glam::UVec2;
use image::{ImageBuffer, Rgb};

use crate::material::Color;

/// Linear HDR image with one RGB f32 triple per pixel.
pub type HdrImage = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Fold `sample` into the running mean `previous`.
///
/// `accumulated_frames` is the number of samples already in `previous`;
/// when it is 0 the old value is discarded.
#[inline]
pub fn accumulate(previous: Color, sample: Color, accumulated_frames: u32) -> Color {
    if accumulated_frames == 0 {
        return sample;
    }
    previous + (sample - previous) / (accumulated_frames as f32 + 1.0)
}

/// Convert an image pixel to a colour.
#[inline]
pub fn pixel_to_color(pixel: &Rgb<f32>) -> Color {
    Color::new(pixel[0], pixel[1], pixel[2])
}

/// Convert a colour to an image pixel.
#[inline]
pub fn color_to_pixel(color: Color) -> Rgb<f32> {
    Rgb([color.x, color.y, color.z])
}

/// Persistent per-pixel running mean plus its frame counter.
#[derive(Debug, Clone)]
pub struct AccumulationImage {
    image: HdrImage,
    accumulated_frames: u32,
}

impl AccumulationImage {
    /// Black image with no accumulated frames.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: ImageBuffer::new(width, height),
            accumulated_frames: 0,
        }
    }

    /// Image size in pixels.
    pub fn dimensions(&self) -> UVec2 {
        let (width, height) = self.image.dimensions();
        UVec2::new(width, height)
    }

    /// Number of frames combined since the last reset.
    pub fn accumulated_frames(&self) -> u32 {
        self.accumulated_frames
    }

    /// Restart accumulation. The next frame overwrites every pixel.
    pub fn reset(&mut self) {
        log::debug!("accumulation reset after {} frames", self.accumulated_frames);
        self.accumulated_frames = 0;
    }

    /// Mark a frame as fully combined into the image.
    pub fn finish_frame(&mut self) {
        self.accumulated_frames = self.accumulated_frames.saturating_add(1);
    }

    /// Running mean at a pixel.
    pub fn color(&self, x: u32, y: u32) -> Color {
        pixel_to_color(self.image.get_pixel(x, y))
    }

    /// Current mean image.
    pub fn image(&self) -> &HdrImage {
        &self.image
    }

    /// Mutable access for a frame dispatch.
    pub fn image_mut(&mut self) -> &mut HdrImage {
        &mut self.image
    }
}
