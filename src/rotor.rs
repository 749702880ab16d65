//! Rotors: unit even-graded elements encoding pure 3D rotations.
//!
//! A rotor `s + e12·B12 + e13·B13 + e23·B23` acts on vectors through the
//! sandwich product `R v R̃`. It is the same algebra as a unit quaternion
//! with `w = s`, `x = -e23`, `y = e13`, `z = -e12`.

use std::ops::{Add, Mul};

use bytemuck::{Pod, Zeroable};
use glam::Vec3A;
use serde::{Deserialize, Serialize};

/// Rotation as a four-coefficient rotor.
///
/// Valid rotations have unit norm: `s² + e12² + e13² + e23² = 1`.
/// Operations assume this and never renormalise implicitly; call
/// [`Rotor::normalised`] after building one from raw data.
#[derive(Debug, Clone, Copy, PartialEq, Zeroable, Pod, Serialize, Deserialize)]
#[repr(C)]
pub struct Rotor {
    /// Scalar coefficient
    pub s: f32,
    /// Coefficient of the e1e2 bivector (rotation from X towards Y)
    pub e12: f32,
    /// Coefficient of the e1e3 bivector (rotation from X towards Z)
    pub e13: f32,
    /// Coefficient of the e2e3 bivector (rotation from Y towards Z)
    pub e23: f32,
}

impl Default for Rotor {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rotor {
    /// The rotor that leaves every vector unchanged.
    pub const IDENTITY: Self = Self {
        s: 1.0,
        e12: 0.0,
        e13: 0.0,
        e23: 0.0,
    };

    /// Rotation turning +X towards +Y by `angle` radians.
    pub fn rotation_xy(angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self {
            s: cos,
            e12: -sin,
            e13: 0.0,
            e23: 0.0,
        }
    }

    /// Rotation turning +X towards +Z by `angle` radians.
    pub fn rotation_xz(angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self {
            s: cos,
            e12: 0.0,
            e13: -sin,
            e23: 0.0,
        }
    }

    /// Rotation turning +Y towards +Z by `angle` radians.
    pub fn rotation_yz(angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self {
            s: cos,
            e12: 0.0,
            e13: 0.0,
            e23: -sin,
        }
    }

    /// Squared norm over all four coefficients.
    #[inline]
    pub fn sqr_magnitude(self) -> f32 {
        self.s * self.s + self.e12 * self.e12 + self.e13 * self.e13 + self.e23 * self.e23
    }

    /// Norm over all four coefficients.
    #[inline]
    pub fn magnitude(self) -> f32 {
        self.sqr_magnitude().sqrt()
    }

    /// Rescales to unit norm. A degenerate rotor becomes the identity.
    pub fn normalised(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude > 1e-6 {
            self * magnitude.recip()
        } else {
            Self::IDENTITY
        }
    }

    /// Reverse of the rotor. Equal to the inverse for unit rotors.
    #[inline]
    pub const fn inverse(self) -> Self {
        Self {
            s: self.s,
            e12: -self.e12,
            e13: -self.e13,
            e23: -self.e23,
        }
    }

    /// `self` applied after `other`, i.e. the geometric product `self · other`.
    #[inline]
    pub fn after(self, other: Self) -> Self {
        let a = self;
        let b = other;
        Self {
            s: a.s * b.s - a.e12 * b.e12 - a.e13 * b.e13 - a.e23 * b.e23,
            e12: a.s * b.e12 + a.e12 * b.s - a.e13 * b.e23 + a.e23 * b.e13,
            e13: a.s * b.e13 + a.e13 * b.s + a.e12 * b.e23 - a.e23 * b.e12,
            e23: a.s * b.e23 + a.e23 * b.s - a.e12 * b.e13 + a.e13 * b.e12,
        }
    }

    /// `self` followed by `other`. Same as `other.after(self)`.
    #[inline]
    pub fn then(self, other: Self) -> Self {
        other.after(self)
    }

    /// Applies the rotation to a vector (sandwich product `R v R̃`).
    pub fn rotate(self, v: Vec3A) -> Vec3A {
        let axis = self.vector_part();
        let t = 2.0 * axis.cross(v);
        v + self.s * t + axis.cross(t)
    }

    /// Bivector coefficients expressed as the equivalent quaternion axis.
    #[inline]
    pub(crate) fn vector_part(self) -> Vec3A {
        Vec3A::new(-self.e23, self.e13, -self.e12)
    }

    /// Pure bivector whose quaternion axis equals `v`.
    #[inline]
    pub(crate) fn from_vector_part(v: Vec3A) -> Self {
        Self {
            s: 0.0,
            e12: -v.z,
            e13: v.y,
            e23: -v.x,
        }
    }
}

impl Add<Rotor> for Rotor {
    type Output = Rotor;

    #[inline]
    fn add(self, rhs: Rotor) -> Self::Output {
        Self {
            s: self.s + rhs.s,
            e12: self.e12 + rhs.e12,
            e13: self.e13 + rhs.e13,
            e23: self.e23 + rhs.e23,
        }
    }
}

impl Mul<Rotor> for Rotor {
    type Output = Rotor;

    #[inline]
    fn mul(self, rhs: Rotor) -> Self::Output {
        self.after(rhs)
    }
}

impl Mul<f32> for Rotor {
    type Output = Rotor;

    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            s: self.s * rhs,
            e12: self.e12 * rhs,
            e13: self.e13 * rhs,
            e23: self.e23 * rhs,
        }
    }
}
