//! Sample-buffer format metadata.

use crate::{Error, Result};

/// Sample rate used by [`Format::default`].
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Shape and rate of a [`SampleBuffer`](crate::SampleBuffer).
///
/// Fields are private so a format can only be built through [`Format::new`],
/// which rejects a zero sample rate. Everything derived from a format
/// (durations, frame/time conversions) can therefore divide by the rate freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    sample_rate: u32,
    num_channels: usize,
    num_frames: usize,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            num_channels: 0,
            num_frames: 0,
        }
    }
}

impl Format {
    /// Create a validated format.
    ///
    /// Fails with [`Error::InvalidFormat`] when `sample_rate` is zero or when
    /// `num_channels * num_frames` does not fit in memory addressing.
    pub fn new(sample_rate: u32, num_channels: usize, num_frames: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidFormat("sample rate must be non-zero".into()));
        }
        if num_channels.checked_mul(num_frames).is_none() {
            return Err(Error::InvalidFormat(format!(
                "{} channels x {} frames overflows the sample storage",
                num_channels, num_frames
            )));
        }
        Ok(Self {
            sample_rate,
            num_channels,
            num_frames,
        })
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Total number of samples (`num_channels * num_frames`).
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_channels * self.num_frames
    }

    /// Whether the format holds no samples at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    /// Length in seconds.
    #[inline]
    pub fn duration_seconds(&self) -> f64 {
        self.num_frames as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format() {
        let format = Format::default();
        assert_eq!(format.sample_rate(), 44100);
        assert!(format.is_empty());
        assert_eq!(format.duration_seconds(), 0.0);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let result = Format::new(0, 2, 100);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let result = Format::new(48000, usize::MAX, 2);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_duration() {
        let format = Format::new(48000, 2, 24000).unwrap();
        assert_eq!(format.num_samples(), 48000);
        assert!((format.duration_seconds() - 0.5).abs() < 1e-12);
    }
}
