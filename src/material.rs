//! Checkerboard surface shading.
//!
//! Planes carry a base colour and an emissive colour. Both are split into
//! tiles; tiles whose integer cell coordinates sum to an odd number are
//! darkened by their own factor.

use glam::Vec3A;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Checkerboard material of a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerMaterial {
    /// Base surface colour (throughput multiplier when lit)
    pub color: Color,
    /// Factor applied to `color` on odd cells
    pub checker_darkness: f32,
    /// Emitted radiance
    pub emissive_color: Color,
    /// Factor applied to `emissive_color` on odd cells
    pub emissive_checker_darkness: f32,
}

impl Default for CheckerMaterial {
    fn default() -> Self {
        Self {
            color: Color::ONE,
            checker_darkness: 0.5,
            emissive_color: Color::ZERO,
            emissive_checker_darkness: 0.5,
        }
    }
}

/// Integer checker cell of a point given as fractions of the plane extent.
///
/// `fraction_x` and `fraction_z` run from 0.0 at one edge to 1.0 at the
/// other; each axis is split into `count` equal tiles. A fraction of
/// exactly 1.0 lies on the far edge and belongs to the last tile.
#[inline]
pub fn checker_cell(fraction_x: f32, fraction_z: f32, count_x: u32, count_z: u32) -> (i32, i32) {
    (tile_index(fraction_x, count_x), tile_index(fraction_z, count_z))
}

#[inline]
fn tile_index(fraction: f32, count: u32) -> i32 {
    let last = count.saturating_sub(1) as i32;
    ((fraction * count as f32).floor() as i32).min(last)
}

/// True for cells whose coordinate sum is odd.
#[inline]
pub fn is_odd_cell((cell_x, cell_z): (i32, i32)) -> bool {
    (cell_x + cell_z).rem_euclid(2) == 1
}

impl CheckerMaterial {
    /// Surface and emissive colour for a cell.
    pub fn shade(&self, cell: (i32, i32)) -> (Color, Color) {
        if is_odd_cell(cell) {
            (
                self.color * self.checker_darkness,
                self.emissive_color * self.emissive_checker_darkness,
            )
        } else {
            (self.color, self.emissive_color)
        }
    }
}
