//! Interval arithmetic for bounds checking.
//!
//! Provides closed intervals [min, max] used for the plane rectangle test.

/// Closed interval [min, max] for range checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Interval of the given width centred on zero
    pub fn centered(width: f32) -> Self {
        Self::new(width * -0.5, width * 0.5)
    }

    /// Calculate the size (width) of the interval
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Check if the interval contains the given value (inclusive bounds)
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Position of `x` relative to the interval, 0.0 at `min` and 1.0 at `max`
    pub fn fraction(&self, x: f32) -> f32 {
        (x - self.min) / self.size()
    }
}
