//! # Spectra - Offline Phase-Vocoder Sound Transformation
//!
//! Load a sound, reshape its short-time spectrum, write it back out.
//!
//! ## Architecture
//!
//! Spectra is an umbrella crate over:
//! - **spectra-core** - Sample buffers, formats, control functions, WAV codec
//! - **spectra-pvoc** - Analysis/resynthesis and spectral transforms (blur, chorus, cross)
//!
//! ## Quick Start
//!
//! ```ignore
//! use spectra::prelude::*;
//!
//! Job::load("voice.wav")
//!     .blur(Breakpoints::new(vec![(0.0, 0.0), (4.0, 40.0)])?)
//!     .chorus(Constant(0.25), 1)
//!     .save("voice-blurred.wav", BitDepth::Float32)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `wav` (default) - WAV decode/encode via hound, file-based jobs

/// Re-export of spectra-core for direct access
pub use spectra_core as core;

/// Re-export of spectra-pvoc for direct access
pub use spectra_pvoc as pvoc;

pub use spectra_core::{
    Breakpoints, Constant, ControlFunction, Format, Identity, SampleBuffer, DEFAULT_SAMPLE_RATE,
};

#[cfg(feature = "wav")]
pub use spectra_core::BitDepth;

pub use spectra_pvoc::{
    wrap_phase, Bin, Channels, Distribution, FftSize, Interpolation, PvocConfig, SpectralBuffer,
    SpectralFormat,
};

mod error;
pub use error::{Error, Result};

mod builder;
pub use builder::Job;

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::{
        Breakpoints, Channels, Constant, ControlFunction, Distribution, FftSize, Format, Identity,
        Interpolation, Job, PvocConfig, SampleBuffer, SpectralBuffer,
    };

    #[cfg(feature = "wav")]
    pub use crate::BitDepth;

    pub use crate::{Error, Result};
}
