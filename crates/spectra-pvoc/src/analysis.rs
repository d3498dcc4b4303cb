//! STFT analysis and overlap-add resynthesis.
//!
//! ## Algorithm Overview
//!
//! 1. **Analysis**: frame `f` is centred on sample `f * hop`; samples outside the
//!    source read as zero. Each frame is Hann-windowed and transformed with a
//!    forward FFT, keeping the `window / 2 + 1` non-negative-frequency bins.
//! 2. **Resynthesis**: each frame's Hermitian spectrum is rebuilt, inverse
//!    transformed, windowed again and overlap-added. Every output sample is then
//!    divided by the sum of squared window weights that landed on it, which
//!    undoes the overlap gain exactly for any valid hop, including the edges.
//!
//! Frames are independent, so both directions run in parallel across
//! `(channel, frame)` rows.

use std::f32::consts::PI;

use rayon::prelude::*;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use spectra_core::{Format, Result, SampleBuffer};

use crate::config::PvocConfig;
use crate::spectral::{Bin, SpectralBuffer, SpectralFormat};

/// Overlap sums below this are treated as uncovered samples.
const MIN_WINDOW_SUM: f32 = 1e-6;

/// Create a periodic Hann window of the specified size
pub(crate) fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / size as f32).cos()))
        .collect()
}

impl SpectralBuffer {
    /// Analyse every channel of `source` into short-time spectra.
    pub fn analyze(source: &SampleBuffer, config: &PvocConfig) -> Result<Self> {
        config.validate()?;

        let window_size = config.window_size;
        let hop_size = config.hop_size;
        let format = SpectralFormat {
            source_sample_rate: source.sample_rate(),
            num_channels: source.num_channels(),
            window_size,
            hop_size,
            num_frames: SpectralFormat::frames_for(source.num_frames(), hop_size),
            num_bins: config.num_bins(),
            source_frames: source.num_frames(),
        };

        let mut bins = vec![Bin::default(); format.len()];
        if bins.is_empty() {
            return Ok(Self::from_parts(format, bins));
        }

        let window = hann_window(window_size);
        let fft = FftPlanner::<f32>::new().plan_fft_forward(window_size);
        let scratch_len = fft.get_inplace_scratch_len();
        let half = (window_size / 2) as isize;

        bins.par_chunks_mut(format.num_bins)
            .enumerate()
            .for_each_init(
                || {
                    (
                        vec![Complex::new(0.0, 0.0); window_size],
                        vec![Complex::new(0.0, 0.0); scratch_len],
                    )
                },
                |(buffer, scratch), (row, out)| {
                    let samples = source.channel(row / format.num_frames);
                    let start = ((row % format.num_frames) * hop_size) as isize - half;

                    for (j, slot) in buffer.iter_mut().enumerate() {
                        let index = start + j as isize;
                        let sample = if index >= 0 && (index as usize) < samples.len() {
                            samples[index as usize]
                        } else {
                            0.0
                        };
                        *slot = Complex::new(sample * window[j], 0.0);
                    }

                    fft.process_with_scratch(buffer, scratch);

                    for (bin, value) in out.iter_mut().zip(buffer.iter()) {
                        *bin = Bin::from(*value);
                    }
                },
            );

        tracing::debug!(
            "Analysed {} channels x {} frames x {} bins (window {}, hop {})",
            format.num_channels,
            format.num_frames,
            format.num_bins,
            window_size,
            hop_size
        );
        Ok(Self::from_parts(format, bins))
    }

    /// Rebuild time-domain samples by windowed overlap-add.
    ///
    /// The result has the source's sample rate, channel count and length.
    pub fn resynthesize(&self) -> Result<SampleBuffer> {
        let format = self.format();
        let mut output = SampleBuffer::new(Format::new(
            format.source_sample_rate,
            format.num_channels,
            format.source_frames,
        )?);
        if output.is_empty() || format.num_frames == 0 {
            return Ok(output);
        }

        let window_size = format.window_size;
        let window = hann_window(window_size);
        let ifft = FftPlanner::<f32>::new().plan_fft_inverse(window_size);
        let scale = 1.0 / window_size as f32;
        let half = (window_size / 2) as isize;
        let length = format.source_frames;

        output
            .as_mut_slice()
            .par_chunks_mut(length)
            .enumerate()
            .for_each(|(channel, out)| {
                let mut buffer = vec![Complex::new(0.0, 0.0); window_size];
                let mut scratch = vec![Complex::new(0.0, 0.0); ifft.get_inplace_scratch_len()];
                let mut weight = vec![0.0_f32; length];

                for frame in 0..format.num_frames {
                    let bins = self.frame(channel, frame);
                    for (slot, bin) in buffer.iter_mut().zip(bins) {
                        *slot = bin.to_complex();
                    }
                    // Mirror for real-valued output (conjugate symmetry)
                    for k in format.num_bins..window_size {
                        buffer[k] = buffer[window_size - k].conj();
                    }

                    ifft.process_with_scratch(&mut buffer, &mut scratch);

                    let start = (frame * format.hop_size) as isize - half;
                    for (j, value) in buffer.iter().enumerate() {
                        let index = start + j as isize;
                        if index < 0 || index as usize >= length {
                            continue;
                        }
                        let index = index as usize;
                        out[index] += value.re * scale * window[j];
                        weight[index] += window[j] * window[j];
                    }
                }

                for (sample, w) in out.iter_mut().zip(&weight) {
                    *sample = if *w > MIN_WINDOW_SUM { *sample / w } else { 0.0 };
                }
            });

        tracing::debug!(
            "Resynthesised {} channels x {} frames from {} spectral frames",
            format.num_channels,
            length,
            format.num_frames
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FftSize;
    use approx::assert_abs_diff_eq;

    fn sine(frequency: f32, sample_rate: u32, frames: usize) -> SampleBuffer {
        let samples = (0..frames)
            .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect();
        SampleBuffer::from_channels(sample_rate, vec![samples]).unwrap()
    }

    #[test]
    fn test_hann_window() {
        let window = hann_window(1024);
        assert_eq!(window.len(), 1024);

        assert!(window[0] < 0.001);
        assert!((window[512] - 1.0).abs() < 0.001);
        // Periodic: symmetric around the centre, not around the last sample
        assert_abs_diff_eq!(window[1], window[1023], epsilon = 1e-6);
    }

    #[test]
    fn test_analysis_shape() {
        let source = sine(440.0, 44100, 4410);
        let spectrum = SpectralBuffer::analyze(&source, &PvocConfig::from(FftSize::Small)).unwrap();
        let format = spectrum.format();
        assert_eq!(format.num_bins, 513);
        assert_eq!(format.num_frames, 4410_usize.div_ceil(256) + 1);
        assert_eq!(format.source_frames, 4410);
        assert_eq!(spectrum.bins().len(), format.len());
    }

    #[test]
    fn test_peak_bin_matches_frequency() {
        let sample_rate = 44100;
        let config = PvocConfig::from(FftSize::Medium);
        // Centre the tone on bin 40
        let frequency = 40.0 * sample_rate as f32 / config.window_size as f32;
        let input = sine(frequency, sample_rate, 16384);
        let spectrum = SpectralBuffer::analyze(&input, &config).unwrap();

        let frame = spectrum.frame(0, spectrum.num_frames() / 2);
        let (peak, _) = frame
            .iter()
            .enumerate()
            .fold((0, 0.0_f32), |best, (i, b)| {
                if b.magnitude > best.1 {
                    (i, b.magnitude)
                } else {
                    best
                }
            });
        assert_eq!(peak, 40);
    }

    #[test]
    fn test_round_trip_reconstructs_input() {
        let source = sine(523.25, 44100, 10000);
        let spectrum = SpectralBuffer::analyze(&source, &PvocConfig::from(FftSize::Small)).unwrap();
        let output = spectrum.resynthesize().unwrap();

        assert_eq!(output.format(), source.format());
        for (a, b) in output.as_slice().iter().zip(source.as_slice()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_round_trip_half_overlap_and_odd_length() {
        let samples: Vec<f32> = (0..777).map(|i| ((i * 37 % 101) as f32 / 50.0) - 1.0).collect();
        let source = SampleBuffer::from_channels(22050, vec![samples.clone(), samples]).unwrap();
        let spectrum = SpectralBuffer::analyze(&source, &PvocConfig::new(64, 32).unwrap()).unwrap();
        let output = spectrum.resynthesize().unwrap();

        for (a, b) in output.as_slice().iter().zip(source.as_slice()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_empty_source() {
        let source = SampleBuffer::new(Format::new(44100, 2, 0).unwrap());
        let spectrum = SpectralBuffer::analyze(&source, &PvocConfig::default()).unwrap();
        assert!(spectrum.is_empty());
        assert_eq!(spectrum.num_frames(), 0);

        let output = spectrum.resynthesize().unwrap();
        assert_eq!(output.num_channels(), 2);
        assert_eq!(output.num_frames(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let source = sine(440.0, 44100, 100);
        let config = PvocConfig {
            window_size: 1024,
            hop_size: 0,
        };
        assert!(SpectralBuffer::analyze(&source, &config).is_err());
    }

    #[test]
    fn test_source_shorter_than_window() {
        let source = sine(1000.0, 44100, 100);
        let spectrum = SpectralBuffer::analyze(&source, &PvocConfig::default()).unwrap();
        let output = spectrum.resynthesize().unwrap();
        for (a, b) in output.as_slice().iter().zip(source.as_slice()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-4);
        }
    }
}
