//! Phase-vocoder spectral buffer: `(channel, frame, bin)` polar data.

use core::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use spectra_core::{Error, Result};

/// One frequency bin of one analysis frame, in polar form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bin {
    pub magnitude: f32,
    /// Radians in [-π, π].
    pub phase: f32,
}

impl Bin {
    #[inline]
    pub fn new(magnitude: f32, phase: f32) -> Self {
        Self { magnitude, phase }
    }

    #[inline]
    pub fn to_complex(self) -> Complex<f32> {
        Complex::from_polar(self.magnitude, self.phase)
    }
}

impl From<Complex<f32>> for Bin {
    #[inline]
    fn from(value: Complex<f32>) -> Self {
        Self {
            magnitude: value.norm(),
            phase: value.arg(),
        }
    }
}

/// Shape and timing of a [`SpectralBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralFormat {
    /// Sample rate of the analysed sound.
    pub source_sample_rate: u32,
    pub num_channels: usize,
    pub window_size: usize,
    pub hop_size: usize,
    pub num_frames: usize,
    /// Always `window_size / 2 + 1`.
    pub num_bins: usize,
    /// Length of the analysed sound in sample frames; resynthesis restores it.
    pub source_frames: usize,
}

impl SpectralFormat {
    /// Frame count for a source of `source_frames` samples: one frame centred
    /// on every hop, plus one past the end so the tail is fully covered.
    pub fn frames_for(source_frames: usize, hop_size: usize) -> usize {
        if source_frames == 0 {
            0
        } else {
            source_frames.div_ceil(hop_size) + 1
        }
    }

    /// Total number of bins across all channels and frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_channels * self.num_frames * self.num_bins
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seconds between successive frames.
    #[inline]
    pub fn frame_duration(&self) -> f64 {
        self.hop_size as f64 / self.source_sample_rate as f64
    }

    fn validate(&self) -> Result<()> {
        if self.source_sample_rate == 0 {
            return Err(Error::InvalidFormat("sample rate must be non-zero".into()));
        }
        if self.hop_size == 0 {
            return Err(Error::InvalidFormat("hop size must be non-zero".into()));
        }
        if self.num_bins != self.window_size / 2 + 1 {
            return Err(Error::ShapeMismatch {
                what: "bin count",
                expected: self.window_size / 2 + 1,
                found: self.num_bins,
            });
        }
        Ok(())
    }
}

/// Short-time spectra of a multichannel sound.
///
/// Bins are stored channel-major, then frame, then bin:
/// `index(c, f, b) = (c * num_frames + f) * num_bins + b`. Frame `f` is centred
/// on source sample `f * hop_size`, so frame 0 sits at time 0.
///
/// Every transform returns a new buffer and leaves `self` untouched. `Clone` is a
/// deep copy; use [`into_shared`](Self::into_shared) for a cheap immutable snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralBuffer {
    format: SpectralFormat,
    bins: Vec<Bin>,
}

impl SpectralBuffer {
    /// Assemble a buffer from raw bins laid out as described on the type.
    pub fn from_bins(format: SpectralFormat, bins: Vec<Bin>) -> Result<Self> {
        format.validate()?;
        if bins.len() != format.len() {
            return Err(Error::ShapeMismatch {
                what: "bin storage",
                expected: format.len(),
                found: bins.len(),
            });
        }
        Ok(Self { format, bins })
    }

    pub(crate) fn from_parts(format: SpectralFormat, bins: Vec<Bin>) -> Self {
        debug_assert_eq!(bins.len(), format.len());
        Self { format, bins }
    }

    #[inline]
    pub fn format(&self) -> SpectralFormat {
        self.format
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.format.num_channels
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.format.num_frames
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.format.num_bins
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    #[inline]
    fn index(&self, channel: usize, frame: usize, bin: usize) -> usize {
        assert!(
            channel < self.num_channels() && frame < self.num_frames() && bin < self.num_bins(),
            "bin ({}, {}, {}) out of range for {} x {} x {}",
            channel,
            frame,
            bin,
            self.num_channels(),
            self.num_frames(),
            self.num_bins()
        );
        (channel * self.num_frames() + frame) * self.num_bins() + bin
    }

    /// Read one bin.
    ///
    /// # Panics
    ///
    /// Panics when any index is out of range.
    #[inline]
    pub fn get(&self, channel: usize, frame: usize, bin: usize) -> Bin {
        self.bins[self.index(channel, frame, bin)]
    }

    /// All bins of one frame.
    ///
    /// # Panics
    ///
    /// Panics when `channel` or `frame` is out of range.
    #[inline]
    pub fn frame(&self, channel: usize, frame: usize) -> &[Bin] {
        let start = self.index(channel, frame, 0);
        &self.bins[start..start + self.num_bins()]
    }

    /// Raw storage in `(channel, frame, bin)` order.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub(crate) fn bins_mut(&mut self) -> &mut [Bin] {
        &mut self.bins
    }

    /// Time in seconds of a (possibly fractional) frame position.
    #[inline]
    pub fn frame_to_time(&self, frame: f64) -> f64 {
        frame * self.format.hop_size as f64 / self.format.source_sample_rate as f64
    }

    /// Fractional frame position of a time in seconds.
    #[inline]
    pub fn time_to_frame(&self, seconds: f64) -> f64 {
        seconds * self.format.source_sample_rate as f64 / self.format.hop_size as f64
    }

    /// Length of the analysed sound in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.format.source_frames as f64 / self.format.source_sample_rate as f64
    }

    /// Largest bin magnitude, or 0 for an empty buffer.
    pub fn max_magnitude(&self) -> f32 {
        self.bins.iter().fold(0.0_f32, |peak, b| peak.max(b.magnitude))
    }

    /// Publish as an immutable, reference-counted snapshot.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Display for SpectralBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = self.format;
        writeln!(f, "========================= Spectral Info ==========================")?;
        writeln!(f, "Channels:\t{}", format.num_channels)?;
        writeln!(f, "Frames:\t\t{}", format.num_frames)?;
        writeln!(f, "Bins:\t\t{}", format.num_bins)?;
        writeln!(f, "Window:\t\t{} (hop {})", format.window_size, format.hop_size)?;
        writeln!(f, "Sample Rate:\t{}", format.source_sample_rate)?;
        writeln!(f, "Duration:\t{:.3} s", self.duration_seconds())?;
        write!(f, "==================================================================")
    }
}
