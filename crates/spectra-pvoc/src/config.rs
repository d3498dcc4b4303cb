//! Analysis configuration.

use spectra_core::{Error, Result};

/// FFT size presets for the time/frequency resolution trade-off
///
/// Larger windows resolve frequency more finely but smear transients:
///
/// - **Small (1024)**: percussive material (~23ms @ 44.1kHz)
/// - **Medium (2048)**: Default, balanced (~46ms @ 44.1kHz)
/// - **Large (4096)**: sustained tones and drones (~93ms @ 44.1kHz)
/// - **XLarge (8192)**: extreme blurs (~186ms @ 44.1kHz)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FftSize {
    /// 1024-point FFT
    Small = 1024,

    /// 2048-point FFT - Default
    #[default]
    Medium = 2048,

    /// 4096-point FFT
    Large = 4096,

    /// 8192-point FFT
    XLarge = 8192,
}

impl FftSize {
    /// Get the FFT size as usize
    pub fn size(&self) -> usize {
        *self as usize
    }

    /// Get the default hop size (FFT size / 4 = 75% overlap)
    pub fn hop_size(&self) -> usize {
        self.size() / 4
    }

    /// Window length in seconds at a given sample rate
    pub fn window_seconds(&self, sample_rate: f64) -> f64 {
        self.size() as f64 / sample_rate
    }
}

/// Phase-vocoder analysis settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvocConfig {
    /// Samples per analysis window.
    pub window_size: usize,
    /// Samples between successive frames.
    pub hop_size: usize,
}

impl Default for PvocConfig {
    fn default() -> Self {
        FftSize::default().into()
    }
}

impl From<FftSize> for PvocConfig {
    fn from(size: FftSize) -> Self {
        Self {
            window_size: size.size(),
            hop_size: size.hop_size(),
        }
    }
}

impl PvocConfig {
    pub fn new(window_size: usize, hop_size: usize) -> Result<Self> {
        let config = Self {
            window_size,
            hop_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Number of frequency bins per frame.
    pub fn num_bins(&self) -> usize {
        self.window_size / 2 + 1
    }

    /// The window must be even, and frames must overlap by at least half a
    /// window so every sample lands inside some window's non-zero region.
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 4 || self.window_size % 2 != 0 {
            return Err(Error::InvalidConfig(format!(
                "window_size {} must be even and at least 4",
                self.window_size
            )));
        }
        if self.hop_size == 0 || self.hop_size > self.window_size / 2 {
            return Err(Error::InvalidConfig(format!(
                "hop_size {} out of range (1-{})",
                self.hop_size,
                self.window_size / 2
            )));
        }
        Ok(())
    }
}
