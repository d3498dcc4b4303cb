//! Signal generators and comparison helpers shared by the integration tests.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (copies, identity transforms in the spectral domain)
//! - `ROUND_TRIP_EPSILON` (1e-4): Analysis followed by resynthesis
//! - `INT16_EPSILON` / `INT24_EPSILON`: One quantization step of the WAV codec

#![allow(dead_code)]

pub mod tolerances;

use spectra::prelude::*;

/// Default test sample rate
pub const TEST_SAMPLE_RATE: u32 = 44100;

/// Generate a sine wave at the given frequency and amplitude.
pub fn generate_sine(
    frequency: f64,
    sample_rate: u32,
    num_samples: usize,
    amplitude: f32,
) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32 * amplitude
        })
        .collect()
}

/// Generate white noise (random samples in -1..1).
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" noise
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Generate a linear chirp sweeping from `start_hz` to `end_hz`.
pub fn generate_chirp(
    start_hz: f64,
    end_hz: f64,
    sample_rate: u32,
    num_samples: usize,
) -> Vec<f32> {
    let duration = num_samples as f64 / sample_rate as f64;
    let rate = (end_hz - start_hz) / duration;
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let phase = 2.0 * std::f64::consts::PI * (start_hz * t + 0.5 * rate * t * t);
            phase.sin() as f32 * 0.5
        })
        .collect()
}

/// One second of a mono 440 Hz sine at half scale.
pub fn mono_sine() -> SampleBuffer {
    let samples = generate_sine(440.0, TEST_SAMPLE_RATE, TEST_SAMPLE_RATE as usize, 0.5);
    SampleBuffer::from_channels(TEST_SAMPLE_RATE, vec![samples]).unwrap()
}

/// A stereo buffer with a different signal in each channel.
pub fn stereo_noise(num_samples: usize) -> SampleBuffer {
    SampleBuffer::from_channels(
        TEST_SAMPLE_RATE,
        vec![
            generate_noise(num_samples, 1).iter().map(|s| s * 0.5).collect(),
            generate_sine(1000.0, TEST_SAMPLE_RATE, num_samples, 0.25),
        ],
    )
    .unwrap()
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Largest absolute sample difference between two signals of equal length.
pub fn max_difference(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "signals differ in length");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0_f32, f32::max)
}

/// Assert two buffers share a format and agree sample-for-sample within `tolerance`.
pub fn assert_buffers_close(actual: &SampleBuffer, expected: &SampleBuffer, tolerance: f32) {
    assert_eq!(actual.format(), expected.format(), "formats differ");
    let diff = max_difference(actual.as_slice(), expected.as_slice());
    assert!(
        diff <= tolerance,
        "Expected buffers within {}, but max difference was {}",
        tolerance,
        diff
    );
}
