//! Fixed binary records exchanged with a host.
//!
//! These structs mirror the buffer layout a host binds for the kernel:
//! - `#[repr(C)]` with only 4-byte scalar fields, so there is no implicit padding
//! - Plane and camera fields appear in the same order as the in-memory types
//! - Portal links use `u32::MAX` for "no connection" and a `u32` flag for flip
//!
//! Decoding is the translation boundary: sentinels become `Option`, raw
//! selectors become enums, and anything out of range is an [`Error`].

use bytemuck::{Pod, Zeroable};
use glam::Vec3A;

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::integrator::RenderMode;
use crate::kernel::FrameControl;
use crate::material::{CheckerMaterial, Color};
use crate::motor::Motor;
use crate::plane::{Plane, PortalLink};

/// Raw portal target meaning "no connection".
pub const NO_CONNECTION: u32 = u32::MAX;

/// Raw portal link.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct GpuPortalConnection {
    /// Target plane index, or [`NO_CONNECTION`]
    pub other_index: u32,
    /// Non-zero to mirror the ray when crossing
    pub flip: u32,
}

impl Default for GpuPortalConnection {
    fn default() -> Self {
        Self {
            other_index: NO_CONNECTION,
            flip: 0,
        }
    }
}

impl From<PortalLink> for GpuPortalConnection {
    fn from(link: PortalLink) -> Self {
        Self {
            // indices past u32::MAX cannot be represented and read back as unlinked
            other_index: link
                .target
                .and_then(|target| u32::try_from(target).ok())
                .unwrap_or(NO_CONNECTION),
            flip: link.flip as u32,
        }
    }
}

impl GpuPortalConnection {
    /// Decode, checking the target against `plane_count`.
    pub fn to_link(self, plane: usize, plane_count: usize) -> Result<PortalLink> {
        let target = match self.other_index {
            NO_CONNECTION => None,
            raw => {
                let target = raw as usize;
                if target >= plane_count {
                    return Err(Error::PortalOutOfRange {
                        plane,
                        target,
                        count: plane_count,
                    });
                }
                Some(target)
            }
        };
        Ok(PortalLink {
            target,
            flip: self.flip != 0,
        })
    }
}

/// Raw plane record.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuPlane {
    /// Local-to-world motor
    pub motor: Motor,
    /// Extent along local X
    pub width: f32,
    /// Extent along local Z
    pub height: f32,
    /// Checker tiles along local X
    pub checker_count_x: u32,
    /// Checker tiles along local Z
    pub checker_count_z: u32,
    /// Base colour
    pub color: [f32; 3],
    /// Odd-cell factor for `color`
    pub checker_darkness: f32,
    /// Emitted radiance
    pub emissive_color: [f32; 3],
    /// Odd-cell factor for `emissive_color`
    pub emissive_checker_darkness: f32,
    /// Link of the front face
    pub front_portal: GpuPortalConnection,
    /// Link of the back face
    pub back_portal: GpuPortalConnection,
}

impl From<&Plane> for GpuPlane {
    fn from(plane: &Plane) -> Self {
        Self {
            motor: plane.motor,
            width: plane.width,
            height: plane.height,
            checker_count_x: plane.checker_count_x,
            checker_count_z: plane.checker_count_z,
            color: plane.material.color.to_array(),
            checker_darkness: plane.material.checker_darkness,
            emissive_color: plane.material.emissive_color.to_array(),
            emissive_checker_darkness: plane.material.emissive_checker_darkness,
            front_portal: plane.front_portal.into(),
            back_portal: plane.back_portal.into(),
        }
    }
}

impl GpuPlane {
    /// Decode plane `index` of a scene with `plane_count` planes.
    pub fn to_plane(&self, index: usize, plane_count: usize) -> Result<Plane> {
        let plane = Plane {
            motor: self.motor,
            width: self.width,
            height: self.height,
            checker_count_x: self.checker_count_x,
            checker_count_z: self.checker_count_z,
            material: CheckerMaterial {
                color: Color::from_array(self.color),
                checker_darkness: self.checker_darkness,
                emissive_color: Color::from_array(self.emissive_color),
                emissive_checker_darkness: self.emissive_checker_darkness,
            },
            front_portal: self.front_portal.to_link(index, plane_count)?,
            back_portal: self.back_portal.to_link(index, plane_count)?,
        };
        plane.validate(index)?;
        Ok(plane)
    }
}

/// Encode a plane array.
pub fn encode_planes(planes: &[Plane]) -> Vec<GpuPlane> {
    planes.iter().map(GpuPlane::from).collect()
}

/// Decode and validate a plane array. Every record is a plane; use
/// [`GpuFrame::decode_planes`] when the frame declares the count.
pub fn decode_planes(records: &[GpuPlane]) -> Result<Vec<Plane>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| record.to_plane(index, records.len()))
        .collect()
}

/// Raw camera record.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuCamera {
    /// Camera-to-world motor
    pub motor: Motor,
    /// Sky colour straight up
    pub up_sky_color: [f32; 3],
    /// Sky colour straight down
    pub down_sky_color: [f32; 3],
    /// Sun disc colour
    pub sun_color: [f32; 3],
    /// Direction towards the sun
    pub sun_direction: [f32; 3],
    /// Sun angular radius in radians
    pub sun_size: f32,
    /// Path length limit
    pub max_bounces: u32,
    /// Portal crossings per segment
    pub max_portal_traversals: u32,
}

impl From<&Camera> for GpuCamera {
    fn from(camera: &Camera) -> Self {
        Self {
            motor: camera.motor,
            up_sky_color: camera.up_sky_color.to_array(),
            down_sky_color: camera.down_sky_color.to_array(),
            sun_color: camera.sun_color.to_array(),
            sun_direction: camera.sun_direction.to_array(),
            sun_size: camera.sun_size,
            max_bounces: camera.max_bounces,
            max_portal_traversals: camera.max_portal_traversals,
        }
    }
}

impl From<&GpuCamera> for Camera {
    fn from(record: &GpuCamera) -> Self {
        Self {
            motor: record.motor,
            up_sky_color: Color::from_array(record.up_sky_color),
            down_sky_color: Color::from_array(record.down_sky_color),
            sun_color: Color::from_array(record.sun_color),
            sun_direction: Vec3A::from_array(record.sun_direction),
            sun_size: record.sun_size,
            max_bounces: record.max_bounces,
            max_portal_traversals: record.max_portal_traversals,
        }
    }
}

/// Raw frame-control record.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuFrame {
    /// Camera and environment
    pub camera: GpuCamera,
    /// Width over height
    pub aspect_ratio: f32,
    /// Frames already in the accumulation image
    pub accumulated_frames: u32,
    /// Frame seed
    pub random_seed: u32,
    /// 0 = unlit, 1 = lit
    pub render_type: u32,
    /// Samples per pixel
    pub samples_per_pixel: u32,
    /// Non-zero to jitter samples
    pub antialiasing: u32,
    /// Number of live records at the start of the plane buffer
    pub plane_count: u32,
}

impl GpuFrame {
    /// Encode `frame` for a scene of `plane_count` planes.
    pub fn new(frame: &FrameControl, plane_count: u32) -> Self {
        Self {
            camera: GpuCamera::from(&frame.camera),
            aspect_ratio: frame.aspect_ratio,
            accumulated_frames: frame.accumulated_frames,
            random_seed: frame.random_seed,
            render_type: frame.render_mode.raw(),
            samples_per_pixel: frame.samples_per_pixel,
            antialiasing: frame.antialiasing as u32,
            plane_count,
        }
    }

    /// Decode the frame controls; fails on an unknown render type.
    pub fn to_frame_control(&self) -> Result<FrameControl> {
        Ok(FrameControl {
            camera: Camera::from(&self.camera),
            aspect_ratio: self.aspect_ratio,
            accumulated_frames: self.accumulated_frames,
            random_seed: self.random_seed,
            render_mode: RenderMode::try_from(self.render_type)?,
            samples_per_pixel: self.samples_per_pixel,
            antialiasing: self.antialiasing != 0,
        })
    }

    /// Decode the first `plane_count` records of a plane buffer.
    ///
    /// Records past the declared count are ignored; a buffer shorter than
    /// it is rejected.
    pub fn decode_planes(&self, records: &[GpuPlane]) -> Result<Vec<Plane>> {
        let declared = self.plane_count as usize;
        let live = records.get(..declared).ok_or(Error::PlaneBufferTooShort {
            declared,
            available: records.len(),
        })?;
        decode_planes(live)
    }
}
