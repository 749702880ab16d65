//! Deterministic random number generation for path tracing.
//!
//! Each kernel invocation owns a [`Sampler`] seeded from the frame seed and
//! its pixel coordinates, so a frame can be replayed exactly. The state is
//! advanced with a PCG-style multiply/xorshift/multiply hash, which is
//! cheap enough to run once per draw on every pixel in parallel.

use glam::Vec3A;
use std::f32::consts::TAU;

const MULTIPLIER: u32 = 747796405;
const INCREMENT: u32 = 2891336453;
const WORD_MULTIPLIER: u32 = 277803737;

/// One round of the PCG output hash.
#[inline]
pub fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(WORD_MULTIPLIER);
    (word >> 22) ^ word
}

/// Per-invocation random state.
///
/// Passed by `&mut` through the integrator; there is no shared or global
/// generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    state: u32,
}

impl Sampler {
    /// Seed a sampler for one pixel of one frame.
    pub fn new(seed: u32, x: u32, y: u32) -> Self {
        let state = pcg_hash(pcg_hash(pcg_hash(seed) ^ x) ^ y);
        Self { state }
    }

    /// Uniform f32 in [0.0, 1.0).
    #[inline]
    pub fn next_uniform(&mut self) -> f32 {
        self.state = pcg_hash(self.state);
        // 24 bits fit the f32 mantissa exactly, so the result never rounds up to 1.0
        (self.state >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Standard normal draw via the Box–Muller transform.
    pub fn next_gaussian(&mut self) -> f32 {
        let u1 = 1.0 - self.next_uniform();
        let u2 = self.next_uniform();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    /// Direction distributed uniformly on the unit sphere.
    ///
    /// Three independent Gaussians are rotationally symmetric, so
    /// normalising them gives a uniform direction.
    pub fn random_unit_direction(&mut self) -> Vec3A {
        let v = Vec3A::new(
            self.next_gaussian(),
            self.next_gaussian(),
            self.next_gaussian(),
        );
        v.try_normalize().unwrap_or(Vec3A::Y)
    }

    /// Unit direction in the closed hemisphere around `normal`.
    ///
    /// Directions on the boundary (dot product exactly zero) are returned
    /// unchanged rather than zeroed.
    pub fn random_hemisphere_direction(&mut self, normal: Vec3A) -> Vec3A {
        let direction = self.random_unit_direction();
        flip_into_hemisphere(direction, normal)
    }
}

/// Flips `direction` when it points away from `normal`.
#[inline]
pub fn flip_into_hemisphere(direction: Vec3A, normal: Vec3A) -> Vec3A {
    if direction.dot(normal) < 0.0 {
        -direction
    } else {
        direction
    }
}
