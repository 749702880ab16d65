//! Motors: rigid motions (rotation plus translation) in projective
//! geometric algebra.
//!
//! A motor is a rotor extended by the degenerate-basis coefficients
//! `e01, e02, e03, e0123`. Writing it as `R + e0123·W`, where `R` is the
//! rotor part and `W` a second rotor-shaped element, the product of two
//! motors is `(Ra·Rb) + e0123·(Ra·Wb + Wa·Rb)`, which is how the closed
//! forms below are organised.

use bytemuck::{Pod, Zeroable};
use glam::Vec3A;
use serde::{Deserialize, Serialize};

use crate::rotor::Rotor;

/// Rigid motion as an eight-coefficient motor.
///
/// A motor is normalised when its rotor part has unit norm and
/// `M · reverse(M) = 1`. Use [`Motor::normalised`] to enforce that on data
/// coming from outside.
#[derive(Debug, Clone, Copy, PartialEq, Zeroable, Pod, Serialize, Deserialize)]
#[repr(C)]
pub struct Motor {
    /// Scalar coefficient
    pub s: f32,
    /// e1e2 rotation coefficient
    pub e12: f32,
    /// e1e3 rotation coefficient
    pub e13: f32,
    /// e2e3 rotation coefficient
    pub e23: f32,
    /// e0e1 translation coefficient
    pub e01: f32,
    /// e0e2 translation coefficient
    pub e02: f32,
    /// e0e3 translation coefficient
    pub e03: f32,
    /// Pseudoscalar coefficient
    pub e0123: f32,
}

impl Default for Motor {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Motor {
    /// The motor that leaves every point unchanged.
    pub const IDENTITY: Self = Self {
        s: 1.0,
        e12: 0.0,
        e13: 0.0,
        e23: 0.0,
        e01: 0.0,
        e02: 0.0,
        e03: 0.0,
        e0123: 0.0,
    };

    /// Pure rotation.
    pub const fn from_rotor(rotor: Rotor) -> Self {
        let Rotor { s, e12, e13, e23 } = rotor;
        Self {
            s,
            e12,
            e13,
            e23,
            e01: 0.0,
            e02: 0.0,
            e03: 0.0,
            e0123: 0.0,
        }
    }

    /// Pure translation by `offset`.
    pub fn translation(offset: Vec3A) -> Self {
        Self {
            e01: offset.x * 0.5,
            e02: offset.y * 0.5,
            e03: offset.z * 0.5,
            ..Self::IDENTITY
        }
    }

    /// Rotation-only sub-element.
    pub const fn rotor_part(self) -> Rotor {
        let Self {
            s,
            e12,
            e13,
            e23,
            e01: _,
            e02: _,
            e03: _,
            e0123: _,
        } = self;
        Rotor { s, e12, e13, e23 }
    }

    fn dual_part(self) -> Rotor {
        Rotor {
            s: self.e0123,
            e12: -self.e03,
            e13: self.e02,
            e23: -self.e01,
        }
    }

    fn from_parts(real: Rotor, dual: Rotor) -> Self {
        Self {
            s: real.s,
            e12: real.e12,
            e13: real.e13,
            e23: real.e23,
            e01: -dual.e23,
            e02: dual.e13,
            e03: -dual.e12,
            e0123: dual.s,
        }
    }

    /// Reverse of the motor: every bivector coefficient negated, scalar
    /// and pseudoscalar kept. Equal to the inverse for normalised motors.
    #[inline]
    pub const fn inverse(self) -> Self {
        Self {
            s: self.s,
            e12: -self.e12,
            e13: -self.e13,
            e23: -self.e23,
            e01: -self.e01,
            e02: -self.e02,
            e03: -self.e03,
            e0123: self.e0123,
        }
    }

    /// `self` applied after `other`, i.e. the geometric product `self · other`.
    pub fn after(self, other: Self) -> Self {
        let (ra, wa) = (self.rotor_part(), self.dual_part());
        let (rb, wb) = (other.rotor_part(), other.dual_part());
        Self::from_parts(ra * rb, ra * wb + wa * rb)
    }

    /// `self` followed by `other`. Same as `other.after(self)`.
    #[inline]
    pub fn then(self, other: Self) -> Self {
        other.after(self)
    }

    /// Translation applied after the rotation part.
    pub fn translation_part(self) -> Vec3A {
        (self.dual_part() * self.rotor_part().inverse()).vector_part() * 2.0
    }

    /// Applies the rigid motion to a point.
    pub fn transform_point(self, point: Vec3A) -> Vec3A {
        self.rotor_part().rotate(point) + self.translation_part()
    }

    /// Rescales the rotor part to unit norm and removes the component of
    /// the translation part that would break `M · reverse(M) = 1`.
    pub fn normalised(self) -> Self {
        let magnitude = self.rotor_part().magnitude();
        if magnitude <= 1e-6 {
            return Self::translation(self.translation_part());
        }
        let scale = magnitude.recip();
        let real = self.rotor_part() * scale;
        let dual = self.dual_part() * scale;
        let drift = (real.inverse() * dual).s;
        Self::from_parts(real, dual + real * -drift)
    }
}

impl From<Rotor> for Motor {
    fn from(rotor: Rotor) -> Self {
        Self::from_rotor(rotor)
    }
}
