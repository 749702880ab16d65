//! Errors raised at the host-facing boundary.
//!
//! The per-pixel core never fails; these come from decoding raw records and
//! loading scene descriptions.

use thiserror::Error;

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or loading a scene.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a scene file failed.
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    /// A scene file was not valid JSON for the scene schema.
    #[error("failed to parse scene description: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame record selected a render mode other than unlit (0) or lit (1).
    #[error("unknown render type {0}")]
    UnknownRenderType(u32),

    /// A portal names a plane that does not exist.
    #[error("plane {plane} links to plane {target}, but the scene has {count} planes")]
    PortalOutOfRange {
        /// Plane carrying the link
        plane: usize,
        /// Raw link target
        target: usize,
        /// Number of planes in the scene
        count: usize,
    },

    /// The plane buffer holds fewer records than the frame declares.
    #[error("frame declares {declared} planes, but the buffer holds {available}")]
    PlaneBufferTooShort {
        /// `plane_count` from the frame record
        declared: usize,
        /// Records actually supplied
        available: usize,
    },

    /// A plane violates its size or tiling invariants.
    #[error("plane {plane} is invalid: {reason}")]
    InvalidPlane {
        /// Offending plane index
        plane: usize,
        /// What is wrong with it
        reason: &'static str,
    },
}
