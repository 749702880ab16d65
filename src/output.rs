//! # Output Module
//!
//! Getting the accumulation image out of the renderer:
//! - Live preview in TEV (The EXR Viewer), refreshed after every frame
//! - PNG export with sRGB encoding
//! - EXR export with linear HDR values
//!
//! ## TEV Integration
//!
//! The viewer keeps one open connection for the whole run. The image is
//! created once and then updated in place, so TEV shows the running mean
//! converging frame by frame. TEV expects planar channel data, so the
//! interleaved buffer is split into R, G and B runs before sending.
//!
//! Failures here are logged and never abort a render.

use std::net::TcpStream;
use std::path::Path;

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, Rgb};
use log::{debug, info, warn};
use portalpath::HdrImage;
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

const TEV_IMAGE_NAME: &str = "portalpath";
const TEV_DEFAULT_PORT: u16 = 14158;
const CHANNELS: [&str; 3] = ["R", "G", "B"];

/// Supported output file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 8-bit sRGB PNG
    Png,
    /// 32-bit float linear EXR
    Exr,
}

impl OutputFormat {
    /// Format for `path`, or `None` for an unsupported extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let extension = Path::new(path).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "exr" => Some(Self::Exr),
            _ => None,
        }
    }
}

/// Open connection to a TEV viewer.
pub struct TevViewer {
    client: TevClient,
    address: String,
    created: bool,
}

impl TevViewer {
    /// Connect to TEV at `address` (IP:port, or just IP for the default port).
    ///
    /// Returns `None` and logs a warning if the viewer is not reachable.
    pub fn connect(address: &str) -> Option<Self> {
        let address = if address.contains(':') {
            address.to_string()
        } else {
            format!("{}:{}", address, TEV_DEFAULT_PORT)
        };

        debug!("Attempting to connect to TEV at {}", address);
        let stream = match TcpStream::connect(&address) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to connect to TEV on {}: {}", address, e);
                return None;
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY: {}", e);
        }

        Some(Self {
            client: TevClient::wrap(stream),
            address,
            created: false,
        })
    }

    /// Show the current state of `image`, creating the TEV image on first use.
    pub fn show(&mut self, image: &HdrImage) {
        let (width, height) = image.dimensions();

        if !self.created {
            let create_packet = PacketCreateImage {
                image_name: TEV_IMAGE_NAME,
                width,
                height,
                channel_names: &CHANNELS,
                grab_focus: true,
            };
            if let Err(e) = self.client.send(create_packet) {
                warn!("Failed to create image in TEV: {}", e);
                return;
            }
            self.created = true;
        }

        let data = planar_channels(image);
        let pixel_count = u64::from(width) * u64::from(height);
        let update_packet = PacketUpdateImage {
            image_name: TEV_IMAGE_NAME,
            grab_focus: false,
            channel_names: &CHANNELS,
            x: 0,
            y: 0,
            width,
            height,
            channel_offsets: &[0, pixel_count, 2 * pixel_count],
            channel_strides: &[1, 1, 1],
            data: &data,
        };

        let start_time = std::time::Instant::now();
        match self.client.send(update_packet) {
            Ok(_) => debug!(
                "Sent {:.1} MB to TEV at {} in {:.2?}",
                data.len() as f32 * 4.0 / 1_000_000.0,
                self.address,
                start_time.elapsed()
            ),
            Err(e) => warn!("Failed to send image data to TEV: {}", e),
        }
    }
}

/// Interleaved RGB to planar R..., G..., B...
fn planar_channels(image: &HdrImage) -> Vec<f32> {
    let mut data = Vec::with_capacity(image.as_raw().len());
    for channel in 0..3 {
        data.extend(image.pixels().map(|pixel| pixel[channel]));
    }
    data
}

/// sRGB transfer function for a linear value in [0, 1].
fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert the HDR image to 8-bit sRGB, clamping to [0, 1] first.
fn to_srgb8(image: &HdrImage) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    let (width, height) = image.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        let pixel = image.get_pixel(x, y);
        let encode = |value: f32| (linear_to_srgb(value.clamp(0.0, 1.0)) * 255.0).round() as u8;
        Rgb([encode(pixel[0]), encode(pixel[1]), encode(pixel[2])])
    })
}

/// Save the image as an 8-bit PNG with sRGB encoding.
///
/// Values above 1.0 are clipped, so bright emitters and the sun saturate
/// to white. Errors are logged, not returned.
pub fn save_image_as_png(image: &HdrImage, output_path: &str) {
    match to_srgb8(image).save(output_path) {
        Ok(_) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

/// Save the image as a 32-bit float EXR with linear values.
///
/// No tone mapping is applied; errors are logged, not returned.
pub fn save_image_as_exr(image: &HdrImage, output_path: &str) {
    let (width, height) = image.dimensions();
    let result = write_rgb_file(output_path, width as usize, height as usize, |x, y| {
        let pixel = image.get_pixel(x as u32, y as u32);
        (pixel[0], pixel[1], pixel[2])
    });

    match result {
        Ok(_) => info!("HDR image saved as EXR: {}", output_path),
        Err(e) => warn!("Failed to save EXR image: {}", e),
    }
}

/// Save `image` in the format matching the extension of `output_path`.
///
/// Returns false for an unsupported extension.
pub fn save_image(image: &HdrImage, output_path: &str) -> bool {
    match OutputFormat::from_path(output_path) {
        Some(OutputFormat::Png) => save_image_as_png(image, output_path),
        Some(OutputFormat::Exr) => save_image_as_exr(image, output_path),
        None => return false,
    }
    true
}
