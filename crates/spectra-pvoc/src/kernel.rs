//! Interpolation and perturbation kernels used by the primitives.
//!
//! Both are closed sets of tagged variants so primitives stay pure and can
//! dispatch per cell without boxing.

use core::f32::consts::{PI, TAU};

use rand::Rng;
use rand_distr::StandardNormal;

use crate::spectral::Bin;

/// Wrap phase to [-PI, PI]
///
/// Values already in range are returned bit-for-bit.
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    if (-PI..=PI).contains(&phase) {
        phase
    } else {
        (phase + PI).rem_euclid(TAU) - PI
    }
}

/// How two neighbouring cells are combined at a fractional position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Take whichever neighbour is closer.
    Nearest,
    /// Blend magnitudes linearly and phases along the shortest arc.
    #[default]
    Linear,
}

impl Interpolation {
    /// Combine `a` (at fraction 0) and `b` (at fraction 1).
    #[inline]
    pub fn blend(&self, a: Bin, b: Bin, frac: f32) -> Bin {
        match self {
            Interpolation::Nearest => {
                if frac < 0.5 {
                    a
                } else {
                    b
                }
            }
            Interpolation::Linear => Bin {
                magnitude: a.magnitude + (b.magnitude - a.magnitude) * frac,
                phase: wrap_phase(a.phase + wrap_phase(b.phase - a.phase) * frac),
            },
        }
    }

    /// Combine two magnitudes only.
    #[inline]
    pub fn blend_magnitude(&self, a: f32, b: f32, frac: f32) -> f32 {
        match self {
            Interpolation::Nearest => {
                if frac < 0.5 {
                    a
                } else {
                    b
                }
            }
            Interpolation::Linear => a + (b - a) * frac,
        }
    }
}

/// Random offset distribution for [`perturb`](crate::SpectralBuffer::perturb).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    /// Always 0.
    Identity,
    /// Zero-mean, unit-variance Gaussian.
    #[default]
    Normal,
}

impl Distribution {
    /// Draw one unscaled offset.
    #[inline]
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        match self {
            Distribution::Identity => 0.0,
            Distribution::Normal => rng.sample(StandardNormal),
        }
    }
}
