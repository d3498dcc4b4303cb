//! Error type for the spectra umbrella crate.
//!
//! Both subsystem crates share `spectra_core::Error`, so `?` propagates across
//! crate boundaries with a single conversion.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] spectra_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
