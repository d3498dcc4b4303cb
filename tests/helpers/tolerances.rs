//! Tolerance constants for spectral processing tests.
//!
//! Analysis and resynthesis run in f32 through forward and inverse FFTs, so
//! transparent paths are exact only up to accumulated rounding.

/// Floating point rounding errors (copies, exact gains).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Analysis followed by resynthesis with no transform in between.
pub const ROUND_TRIP_EPSILON: f32 = 1e-4;

/// A transform that should change the sound must move at least one sample
/// by more than this.
pub const AUDIBLE_CHANGE: f32 = 0.01;

/// 16-bit quantization step size.
pub const INT16_EPSILON: f32 = 1.0 / 32767.0;

/// 24-bit quantization step size.
pub const INT24_EPSILON: f32 = 1.0 / 8388607.0;
