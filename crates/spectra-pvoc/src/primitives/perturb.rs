//! Seeded per-bin phase perturbation.

use std::f64::consts::TAU;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use spectra_core::{ControlFunction, Error, Result};

use super::evaluate;
use crate::kernel::{wrap_phase, Distribution};
use crate::spectral::SpectralBuffer;

/// Which channels a perturbation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channels {
    #[default]
    All,
    Only(usize),
}

impl Channels {
    #[inline]
    fn contains(&self, channel: usize) -> bool {
        match self {
            Channels::All => true,
            Channels::Only(selected) => *selected == channel,
        }
    }
}

impl SpectralBuffer {
    /// Add random offsets to the phase of every bin in the selected channels.
    ///
    /// The offset for a bin in frame `f` is `distribution.sample() * spread(t_f)`.
    /// Magnitudes are never touched. Each `(channel, frame)` row draws from its
    /// own ChaCha stream derived from `seed`, so output is reproducible no matter
    /// how rows are scheduled across threads.
    pub fn perturb(
        &self,
        channels: Channels,
        spread: &dyn ControlFunction,
        distribution: Distribution,
        seed: u64,
    ) -> Result<SpectralBuffer> {
        if let Channels::Only(channel) = channels {
            if channel >= self.num_channels() {
                return Err(Error::OutOfRange(format!(
                    "channel {} of {}",
                    channel,
                    self.num_channels()
                )));
            }
        }
        if distribution == Distribution::Identity {
            return Ok(self.clone());
        }

        let format = self.format();
        let num_frames = format.num_frames;
        let spreads = evaluate(
            spread,
            (0..num_frames).map(|f| self.frame_to_time(f as f64)),
            "spread",
        )?
        .into_iter()
        .map(|value| {
            // Offsets are applied in f32; a finite f64 can still overflow it
            let narrowed = value as f32;
            if narrowed.is_finite() {
                Ok(narrowed)
            } else {
                Err(Error::InvalidControl(format!(
                    "spread {} exceeds the f32 range",
                    value
                )))
            }
        })
        .collect::<Result<Vec<f32>>>()?;

        let mut output = self.clone();
        if output.is_empty() {
            return Ok(output);
        }

        output
            .bins_mut()
            .par_chunks_mut(format.num_bins)
            .enumerate()
            .filter(|(row, _)| channels.contains(row / num_frames))
            .for_each(|(row, bins)| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(row as u64);
                let spread = spreads[row % num_frames];
                for bin in bins.iter_mut() {
                    // Reduce in f64 so a draw times a spread near f32::MAX stays finite
                    let offset = distribution.sample(&mut rng) as f64 * spread as f64;
                    let offset = offset.rem_euclid(TAU);
                    bin.phase = wrap_phase(bin.phase + offset as f32);
                }
            });

        tracing::debug!(
            "Perturbed {:?} of {} channels ({:?}, seed {})",
            channels,
            format.num_channels,
            distribution,
            seed
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::{Bin, SpectralFormat};
    use spectra_core::{Constant, Identity};

    fn buffer() -> SpectralBuffer {
        let format = SpectralFormat {
            source_sample_rate: 8000,
            num_channels: 2,
            window_size: 16,
            hop_size: 4,
            num_frames: 10,
            num_bins: 9,
            source_frames: 36,
        };
        let bins = (0..format.len())
            .map(|i| Bin::new(0.1 + (i % 7) as f32, ((i % 11) as f32 - 5.0) * 0.5))
            .collect();
        SpectralBuffer::from_bins(format, bins).unwrap()
    }

    #[test]
    fn test_identity_distribution_is_noop() {
        let input = buffer();
        let nan_spread = |_t: f64| f64::NAN;
        let output = input
            .perturb(Channels::All, &nan_spread, Distribution::Identity, 1)
            .unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let input = buffer();
        let a = input.perturb(Channels::All, &Constant(0.8), Distribution::Normal, 99).unwrap();
        let b = input.perturb(Channels::All, &Constant(0.8), Distribution::Normal, 99).unwrap();
        let c = input.perturb(Channels::All, &Constant(0.8), Distribution::Normal, 100).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_magnitudes_unchanged_and_phases_wrapped() {
        let input = buffer();
        let output = input
            .perturb(Channels::All, &Constant(10.0), Distribution::Normal, 5)
            .unwrap();
        let mut moved = 0;
        for (a, b) in output.bins().iter().zip(input.bins()) {
            assert_eq!(a.magnitude, b.magnitude);
            assert!(a.phase.abs() <= core::f32::consts::PI);
            if a.phase != b.phase {
                moved += 1;
            }
        }
        assert!(moved > input.bins().len() / 2);
    }

    #[test]
    fn test_zero_spread_is_noop() {
        let input = buffer();
        let output = input.perturb(Channels::All, &Constant(0.0), Distribution::Normal, 3).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_only_selected_channel_changes() {
        let input = buffer();
        let output = input.perturb(Channels::Only(1), &Identity, Distribution::Normal, 11).unwrap();
        for frame in 0..input.num_frames() {
            assert_eq!(output.frame(0, frame), input.frame(0, frame));
        }
        // Spread is zero at t = 0, so compare a later frame
        assert_ne!(output.frame(1, 5), input.frame(1, 5));
    }

    #[test]
    fn test_channel_out_of_range() {
        let input = buffer();
        let result = input.perturb(Channels::Only(2), &Constant(1.0), Distribution::Normal, 0);
        assert!(matches!(result, Err(Error::OutOfRange(_))));
    }

    #[test]
    fn test_spread_beyond_f32_range_rejected() {
        let input = buffer();
        for huge in [1e300, -1e300] {
            let result = input.perturb(Channels::All, &Constant(huge), Distribution::Normal, 1);
            assert!(matches!(result, Err(Error::InvalidControl(_))));
        }

        let edge = input
            .perturb(Channels::All, &Constant(f32::MAX as f64), Distribution::Normal, 1)
            .unwrap();
        assert!(edge.bins().iter().all(|b| b.phase.is_finite()));
    }

    #[test]
    fn test_non_finite_spread_rejected() {
        let input = buffer();
        let result = input.perturb(Channels::All, &|_t: f64| f64::NAN, Distribution::Normal, 0);
        assert!(matches!(result, Err(Error::InvalidControl(_))));
    }
}
