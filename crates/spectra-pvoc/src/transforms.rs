//! Named effects composed from the primitives.

use spectra_core::{ControlFunction, Error, Identity, Result};

use crate::kernel::{Distribution, Interpolation};
use crate::primitives::Channels;
use crate::spectral::SpectralBuffer;

/// Frames kept by blur's decimating pass, in ascending order.
///
/// The first anchor is frame 0 and the last is always the final frame. Each
/// step advances by `max(1, width)` frames, where `width` is the blur control
/// evaluated at the previous anchor.
#[derive(Debug, Clone, PartialEq)]
struct Anchors {
    frames: Vec<f64>,
    frame_duration: f64,
}

impl Anchors {
    fn build(buffer: &SpectralBuffer, width: &dyn ControlFunction) -> Result<Self> {
        let last = buffer.num_frames().saturating_sub(1) as f64;
        let mut frames = vec![0.0];
        let mut anchor = 0.0;
        while anchor < last {
            let time = buffer.frame_to_time(anchor);
            let step = width.eval(time);
            if !step.is_finite() {
                return Err(Error::InvalidControl(format!(
                    "blur width returned {} at {}",
                    step, time
                )));
            }
            anchor = (anchor + step.max(1.0)).min(last);
            frames.push(anchor);
        }
        Ok(Self {
            frames,
            frame_duration: buffer.format().frame_duration(),
        })
    }

    fn len(&self) -> usize {
        self.frames.len()
    }

    /// Output frame `k` reads anchor `k`; frames past the last anchor hold it.
    fn decimate(&self, time: f64) -> f64 {
        let k = (time / self.frame_duration).round().max(0.0) as usize;
        self.frames[k.min(self.len() - 1)] * self.frame_duration
    }

    /// Source time in the decimated buffer for output time `time`: the
    /// fractional index between the two anchors that bracket it.
    fn expand(&self, time: f64) -> f64 {
        let position = time / self.frame_duration;
        let rounded = position.round();
        let position = if (position - rounded).abs() < 1e-9 { rounded } else { position };

        let next = self.frames.partition_point(|&a| a <= position);
        if next == 0 {
            return 0.0;
        }
        if next >= self.len() {
            return (self.len() - 1) as f64 * self.frame_duration;
        }
        let (low, high) = (self.frames[next - 1], self.frames[next]);
        let frac = (position - low) / (high - low);
        ((next - 1) as f64 + frac) * self.frame_duration
    }
}

impl SpectralBuffer {
    /// Smear the spectrum over time.
    ///
    /// `width(t)` is the blur width in analysis frames around time `t`; values
    /// of 1 or less leave that region untouched. Frames are sampled every
    /// `width` frames and the gaps are refilled by interpolating between the
    /// kept frames.
    ///
    /// Only time is smeared. Both passes use the identity warp on the
    /// frequency axis, so every bin stays at its own frequency.
    pub fn blur(&self, width: &dyn ControlFunction) -> Result<SpectralBuffer> {
        if self.num_frames() < 2 {
            return Ok(self.clone());
        }
        let anchors = Anchors::build(self, width)?;
        tracing::debug!(
            "Blurring {} frames through {} anchors",
            self.num_frames(),
            anchors.len()
        );

        let decimate = |t: f64| anchors.decimate(t);
        let expand = |t: f64| anchors.expand(t);
        self.desample(&decimate, &Identity, Interpolation::Linear)?
            .desample(&expand, &Identity, Interpolation::Linear)
    }

    /// Detune every bin by a seeded Gaussian phase offset scaled by `spread(t)`.
    pub fn chorus(&self, spread: &dyn ControlFunction, seed: u64) -> Result<SpectralBuffer> {
        self.perturb(Channels::All, spread, Distribution::Normal, seed)
    }

    /// Impose `amp_source`'s magnitudes on this buffer by `amount(t)`.
    pub fn cross(
        &self,
        amp_source: &SpectralBuffer,
        amount: &dyn ControlFunction,
    ) -> Result<SpectralBuffer> {
        self.cross_synthesize(amp_source, amount)
    }
}
