//! Sample buffers, formats, and control functions for offline sound transformation.
//!
//! # Primary API
//!
//! - [`Format`]: validated sample rate / channel / frame metadata
//! - [`SampleBuffer`]: channel-major multichannel samples
//! - [`ControlFunction`]: pure scalar curves that drive transforms
//!
//! # Feature-gated APIs
//!
//! - `"wav"` (default): [`SampleBuffer::decode`], [`SampleBuffer::encode`], [`BitDepth`]
//!
//! # Example
//!
//! ```ignore
//! use spectra_core::{BitDepth, SampleBuffer};
//!
//! let mut buffer = SampleBuffer::decode("voice.wav")?;
//! buffer.normalize_peak(0.9);
//! println!("{}", buffer);
//! buffer.encode("voice-normalized.wav", BitDepth::Int24)?;
//! ```

pub mod error;
pub use error::{Error, Result};

mod format;
pub use format::{Format, DEFAULT_SAMPLE_RATE};

mod buffer;
pub use buffer::SampleBuffer;

pub mod control;
pub use control::{Breakpoints, Constant, ControlFunction, Identity};

#[cfg(feature = "wav")]
mod codec;
#[cfg(feature = "wav")]
pub use codec::BitDepth;
