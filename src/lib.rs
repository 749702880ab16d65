//! PortalPath progressive path tracer
//!
//! Renders scenes made of finite checkered planes whose faces can be linked
//! as portals. Rigid motions use a compact rotor/motor algebra; each pixel
//! is an independent kernel invocation that folds its samples into a
//! running-mean accumulation image.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod accumulator;
pub mod camera;
pub mod error;
pub mod hittable;
pub mod integrator;
pub mod interval;
pub mod kernel;
pub mod layout;
pub mod material;
pub mod motor;
pub mod plane;
pub mod random;
pub mod ray;
pub mod rotor;
pub mod scene;
pub mod scene_file;

pub use accumulator::{accumulate, AccumulationImage, HdrImage};
pub use camera::Camera;
pub use error::{Error, Result};
pub use integrator::RenderMode;
pub use kernel::{render_frame, render_pixel, FrameControl};
pub use motor::Motor;
pub use plane::{Plane, PortalLink};
pub use rotor::Rotor;
pub use scene::Scene;
pub use scene_file::SceneDescription;
