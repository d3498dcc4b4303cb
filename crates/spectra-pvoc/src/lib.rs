//! Phase-vocoder analysis, resynthesis, and spectral transforms.
//!
//! A [`SampleBuffer`](spectra_core::SampleBuffer) is analysed into a
//! [`SpectralBuffer`] of polar bins, reshaped by one or more transforms, and
//! resynthesised back into samples. Every transform is pure: it reads its input
//! and returns a new buffer.
//!
//! # Primitives
//!
//! - [`SpectralBuffer::desample`]: warp the time and frequency axes
//! - [`SpectralBuffer::perturb`]: seeded random phase offsets
//! - [`SpectralBuffer::cross_synthesize`]: borrow magnitudes from another buffer
//!
//! # Named transforms
//!
//! - [`SpectralBuffer::blur`], [`SpectralBuffer::chorus`], [`SpectralBuffer::cross`]
//!
//! # Example
//!
//! ```ignore
//! use spectra_core::{Constant, SampleBuffer};
//! use spectra_pvoc::{FftSize, PvocConfig, SpectralBuffer};
//!
//! let voice = SampleBuffer::decode("voice.wav")?;
//! let spectrum = SpectralBuffer::analyze(&voice, &PvocConfig::from(FftSize::Large))?;
//! let smeared = spectrum.blur(&|t: f64| 1.0 + 20.0 * t)?;
//! let detuned = smeared.chorus(&Constant(0.4), 7)?;
//! let output = detuned.resynthesize()?;
//! ```

// Analysis settings
mod config;
pub use config::{FftSize, PvocConfig};

// Spectral data
mod spectral;
pub use spectral::{Bin, SpectralBuffer, SpectralFormat};

mod analysis;

// Kernels
pub mod kernel;
pub use kernel::{wrap_phase, Distribution, Interpolation};

// Primitives and the transforms built on them
mod primitives;
pub use primitives::Channels;

mod transforms;

pub use spectra_core::{ControlFunction, Error, Result};
