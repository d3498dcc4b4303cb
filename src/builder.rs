//! Fluent builder for offline spectral processing jobs.

#[cfg(feature = "wav")]
use std::path::{Path, PathBuf};

use spectra_core::{ControlFunction, SampleBuffer};
use spectra_pvoc::{PvocConfig, SpectralBuffer};

#[cfg(feature = "wav")]
use spectra_core::BitDepth;

use crate::Result;

/// Where a job (or a cross-synthesis source) gets its samples.
enum Input {
    Buffer(SampleBuffer),
    #[cfg(feature = "wav")]
    File(PathBuf),
}

impl Input {
    fn resolve(self) -> Result<SampleBuffer> {
        match self {
            Input::Buffer(buffer) => Ok(buffer),
            #[cfg(feature = "wav")]
            Input::File(path) => Ok(SampleBuffer::decode(path)?),
        }
    }
}

enum Step {
    Blur(Box<dyn ControlFunction>),
    Chorus {
        spread: Box<dyn ControlFunction>,
        seed: u64,
    },
    Cross {
        source: Input,
        amount: Box<dyn ControlFunction>,
    },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Blur(_) => "blur",
            Step::Chorus { .. } => "chorus",
            Step::Cross { .. } => "cross",
        }
    }
}

/// Analyse a sound, apply transforms in order, and resynthesise.
///
/// Nothing is read or computed until [`render`](Self::render) or
/// [`save`](Self::save), so input and cross-source decode errors surface there.
///
/// # Example
///
/// ```ignore
/// use spectra::prelude::*;
///
/// Job::load("voice.wav")
///     .config(PvocConfig::from(FftSize::Large))
///     .blur(|t: f64| 1.0 + 10.0 * t)
///     .chorus(Constant(0.3), 42)
///     .cross_with_file("drone.wav", Constant(0.5))
///     .save("voice-processed.wav", BitDepth::Int24)?;
/// ```
pub struct Job {
    input: Input,
    config: PvocConfig,
    steps: Vec<Step>,
}

impl Job {
    /// Process an in-memory buffer.
    pub fn from_buffer(buffer: SampleBuffer) -> Self {
        Self::new(Input::Buffer(buffer))
    }

    /// Process a WAV file, decoded when the job runs.
    #[cfg(feature = "wav")]
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::new(Input::File(path.as_ref().to_path_buf()))
    }

    fn new(input: Input) -> Self {
        Self {
            input,
            config: PvocConfig::default(),
            steps: Vec::new(),
        }
    }

    /// Default: [`FftSize::Medium`](spectra_pvoc::FftSize::Medium)
    pub fn config(mut self, config: PvocConfig) -> Self {
        self.config = config;
        self
    }

    pub fn blur(mut self, width: impl ControlFunction + 'static) -> Self {
        self.steps.push(Step::Blur(Box::new(width)));
        self
    }

    pub fn chorus(mut self, spread: impl ControlFunction + 'static, seed: u64) -> Self {
        self.steps.push(Step::Chorus {
            spread: Box::new(spread),
            seed,
        });
        self
    }

    /// Cross-synthesise with magnitudes from `source`, analysed with this job's config.
    pub fn cross_with(
        mut self,
        source: SampleBuffer,
        amount: impl ControlFunction + 'static,
    ) -> Self {
        self.steps.push(Step::Cross {
            source: Input::Buffer(source),
            amount: Box::new(amount),
        });
        self
    }

    #[cfg(feature = "wav")]
    pub fn cross_with_file(
        mut self,
        path: impl AsRef<Path>,
        amount: impl ControlFunction + 'static,
    ) -> Self {
        self.steps.push(Step::Cross {
            source: Input::File(path.as_ref().to_path_buf()),
            amount: Box::new(amount),
        });
        self
    }

    /// Run every step and return the resynthesised sound.
    pub fn render(self) -> Result<SampleBuffer> {
        self.config.validate()?;
        let source = self.input.resolve()?;
        let mut spectrum = SpectralBuffer::analyze(&source, &self.config)?;

        for step in self.steps {
            tracing::debug!("Applying {}", step.name());
            spectrum = match step {
                Step::Blur(width) => spectrum.blur(width.as_ref())?,
                Step::Chorus { spread, seed } => spectrum.chorus(spread.as_ref(), seed)?,
                Step::Cross { source: input, amount } => {
                    let modulator = input.resolve()?;
                    if modulator.sample_rate() != source.sample_rate() {
                        tracing::warn!(
                            "Cross source is {} Hz but input is {} Hz; \
                             frames are matched by position",
                            modulator.sample_rate(),
                            source.sample_rate()
                        );
                    }
                    let modulator = SpectralBuffer::analyze(&modulator, &self.config)?;
                    spectrum.cross(&modulator, amount.as_ref())?
                }
            };
        }

        Ok(spectrum.resynthesize()?)
    }

    /// Render and write the result as WAV.
    #[cfg(feature = "wav")]
    pub fn save(self, path: impl AsRef<Path>, bit_depth: BitDepth) -> Result<()> {
        let output = self.render()?;
        output.encode(path, bit_depth)?;
        Ok(())
    }
}
