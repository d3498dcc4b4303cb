//! Amplitude cross-synthesis.

use rayon::prelude::*;
use spectra_core::{ControlFunction, Error, Result};

use super::{clamp_position, evaluate, neighbours};
use crate::kernel::Interpolation;
use crate::spectral::SpectralBuffer;

impl SpectralBuffer {
    /// Blend magnitudes toward `amp_source` while keeping this buffer's phases.
    ///
    /// `amount(t)` is clamped to [0, 1]: 0 keeps the original magnitudes and 1
    /// takes the source's. When frame counts differ, the source is stretched
    /// over this buffer's length and read with linear interpolation.
    pub fn cross_synthesize(
        &self,
        amp_source: &SpectralBuffer,
        amount: &dyn ControlFunction,
    ) -> Result<SpectralBuffer> {
        if amp_source.num_channels() != self.num_channels() {
            return Err(Error::ShapeMismatch {
                what: "channel count",
                expected: self.num_channels(),
                found: amp_source.num_channels(),
            });
        }
        if amp_source.num_bins() != self.num_bins() {
            return Err(Error::ShapeMismatch {
                what: "bin count",
                expected: self.num_bins(),
                found: amp_source.num_bins(),
            });
        }
        if amp_source.is_empty() && !self.is_empty() {
            return Err(Error::ShapeMismatch {
                what: "amplitude source frames",
                expected: self.num_frames(),
                found: 0,
            });
        }

        let num_frames = self.num_frames();
        let source_frames = amp_source.num_frames();
        let amounts: Vec<f32> = evaluate(
            amount,
            (0..num_frames).map(|f| self.frame_to_time(f as f64)),
            "amount",
        )?
        .into_iter()
        .map(|a| a.clamp(0.0, 1.0) as f32)
        .collect();

        let stretch = if num_frames > 1 {
            source_frames.saturating_sub(1) as f64 / (num_frames - 1) as f64
        } else {
            0.0
        };

        let mut output = self.clone();
        if output.is_empty() {
            return Ok(output);
        }

        output
            .bins_mut()
            .par_chunks_mut(self.num_bins())
            .enumerate()
            .for_each(|(row, bins)| {
                let channel = row / num_frames;
                let frame = row % num_frames;
                let amount = amounts[frame];
                if amount == 0.0 {
                    return;
                }

                let position = clamp_position(frame as f64 * stretch, source_frames);
                let (f0, f1, frac) = neighbours(position, source_frames);
                let early = amp_source.frame(channel, f0);
                let late = amp_source.frame(channel, f1);

                for (b, bin) in bins.iter_mut().enumerate() {
                    let source = Interpolation::Linear.blend_magnitude(
                        early[b].magnitude,
                        late[b].magnitude,
                        frac,
                    );
                    bin.magnitude = if amount == 1.0 {
                        source
                    } else {
                        (1.0 - amount) * bin.magnitude + amount * source
                    };
                }
            });

        tracing::debug!(
            "Cross-synthesised {} frames from {} source frames",
            num_frames,
            source_frames
        );
        Ok(output)
    }
}
