//! Time/frequency resampling through warp functions.

use rayon::prelude::*;
use spectra_core::{ControlFunction, Result};

use super::{clamp_position, evaluate, neighbours};
use crate::kernel::Interpolation;
use crate::spectral::{Bin, SpectralBuffer};

impl SpectralBuffer {
    /// Resample the frame and bin axes through warp functions.
    ///
    /// For output frame `i` at time `t = frame_to_time(i)`, `time_warp(t)` is the
    /// source time to read from. For output bin `b` at normalized position
    /// `p = b / (num_bins - 1)`, `axis_warp(p)` is the normalized source bin
    /// position. Source positions outside the buffer clamp to the edge, and the
    /// neighbouring source cells are combined with `interpolation` along both
    /// axes.
    ///
    /// [`Identity`](spectra_core::Identity) for both warps with
    /// [`Interpolation::Linear`] returns a copy of the input.
    ///
    /// Fails with `InvalidControl` if either warp returns a non-finite value.
    pub fn desample(
        &self,
        time_warp: &dyn ControlFunction,
        axis_warp: &dyn ControlFunction,
        interpolation: Interpolation,
    ) -> Result<SpectralBuffer> {
        let format = self.format();
        let num_frames = format.num_frames;
        let num_bins = format.num_bins;
        let top_bin = num_bins.saturating_sub(1).max(1) as f64;

        let frame_positions: Vec<f64> = evaluate(
            time_warp,
            (0..num_frames).map(|i| self.frame_to_time(i as f64)),
            "time warp",
        )?
        .into_iter()
        .map(|source_time| clamp_position(self.time_to_frame(source_time), num_frames))
        .collect();

        let bin_positions: Vec<f64> = evaluate(
            axis_warp,
            (0..num_bins).map(|b| b as f64 / top_bin),
            "axis warp",
        )?
        .into_iter()
        .map(|position| clamp_position(position * top_bin, num_bins))
        .collect();

        let mut bins = vec![Bin::default(); format.len()];
        if bins.is_empty() {
            return Ok(Self::from_parts(format, bins));
        }

        bins.par_chunks_mut(num_bins)
            .enumerate()
            .for_each(|(row, out)| {
                let channel = row / num_frames;
                let frame_position = frame_positions[row % num_frames];
                let (f0, f1, frame_frac) = neighbours(frame_position, num_frames);
                let early = self.frame(channel, f0);
                let late = self.frame(channel, f1);

                for (bin, &position) in out.iter_mut().zip(&bin_positions) {
                    let (b0, b1, bin_frac) = neighbours(position, num_bins);
                    let low = interpolation.blend(early[b0], late[b0], frame_frac);
                    *bin = if b0 == b1 || bin_frac == 0.0 {
                        low
                    } else {
                        let high = interpolation.blend(early[b1], late[b1], frame_frac);
                        interpolation.blend(low, high, bin_frac)
                    };
                }
            });

        tracing::debug!(
            "Desampled {} channels x {} frames ({:?})",
            format.num_channels,
            num_frames,
            interpolation
        );
        Ok(Self::from_parts(format, bins))
    }
}
