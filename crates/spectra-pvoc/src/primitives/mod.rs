//! The three spectral primitives every named transform is built from.
//!
//! - [`desample`](crate::SpectralBuffer::desample) - remap the frame and bin axes
//!   through warp functions
//! - [`perturb`](crate::SpectralBuffer::perturb) - seeded per-bin phase drift
//! - [`cross_synthesize`](crate::SpectralBuffer::cross_synthesize) - borrow another
//!   buffer's magnitudes
//!
//! All three are pure: control values are evaluated and validated up front,
//! then output rows are filled in parallel from the read-only source.

mod cross;
mod desample;
mod perturb;

pub use perturb::Channels;

use spectra_core::{ControlFunction, Error, Result};

/// Fractional positions within this distance of an integer snap to it, so
/// identity warps land exactly on source cells despite time/frame round trips.
const SNAP_EPSILON: f64 = 1e-9;

/// Evaluate `control` at each input and reject non-finite results.
pub(crate) fn evaluate(
    control: &dyn ControlFunction,
    inputs: impl Iterator<Item = f64>,
    what: &str,
) -> Result<Vec<f64>> {
    inputs
        .map(|input| {
            let value = control.eval(input);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(Error::InvalidControl(format!(
                    "{} returned {} at {}",
                    what, value, input
                )))
            }
        })
        .collect()
}

/// Snap near-integers and clamp into `[0, len - 1]`.
#[inline]
pub(crate) fn clamp_position(position: f64, len: usize) -> f64 {
    let rounded = position.round();
    let position = if (position - rounded).abs() < SNAP_EPSILON {
        rounded
    } else {
        position
    };
    position.clamp(0.0, len.saturating_sub(1) as f64)
}

/// Split a clamped position into its two neighbouring indices and the
/// fraction between them.
#[inline]
pub(crate) fn neighbours(position: f64, len: usize) -> (usize, usize, f32) {
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(len.saturating_sub(1));
    (lower, upper, (position - lower as f64) as f32)
}
