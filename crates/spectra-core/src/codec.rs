//! WAV decode/encode using hound
//!
//! Supports 16-bit and 24-bit integer PCM and 32-bit float WAV files, in any
//! channel count. Samples are clipped to [-1.0, 1.0] on the way out.

use std::io::{Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::{Error, Format, Result, SampleBuffer};

/// Output bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    Int16,
    #[default]
    Int24,
    Float32,
}

impl BitDepth {
    /// Bits per sample.
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Float32 => 32,
        }
    }

    /// Worst-case absolute error of a quantize/dequantize round trip for
    /// samples in [-1.0, 1.0].
    pub fn quantization_step(&self) -> f32 {
        match self {
            BitDepth::Int16 => 1.0 / 32767.0,
            BitDepth::Int24 => 1.0 / 8388607.0,
            BitDepth::Float32 => 0.0,
        }
    }

    fn sample_format(&self) -> SampleFormat {
        match self {
            BitDepth::Float32 => SampleFormat::Float,
            _ => SampleFormat::Int,
        }
    }
}

impl SampleBuffer {
    /// Decode a WAV file into a new buffer.
    pub fn decode(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path).map_err(|e| Error::decode(path, e))?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| Error::decode(path, e))?,
            (SampleFormat::Int, bits @ 8..=32) => {
                // Mirrors the encoder's full-scale value so round trips are symmetric
                let scale = 1.0 / ((1_i64 << (bits - 1)) - 1) as f64;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| (v as f64 * scale) as f32))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| Error::decode(path, e))?
            }
            (format, bits) => {
                return Err(Error::decode(
                    path,
                    format!("unsupported sample format {:?} at {} bits", format, bits),
                ))
            }
        };

        if spec.sample_rate == 0 {
            return Err(Error::decode(path, "header declares a zero sample rate"));
        }
        let buffer = SampleBuffer::from_interleaved(
            spec.sample_rate,
            spec.channels as usize,
            &interleaved,
        )
        .map_err(|e| Error::decode(path, e))?;

        tracing::info!(
            "Decoded {}: {} channels, {} frames at {} Hz",
            path.display(),
            buffer.num_channels(),
            buffer.num_frames(),
            buffer.sample_rate()
        );
        Ok(buffer)
    }

    /// Replace this buffer with the contents of a WAV file.
    ///
    /// On failure the buffer keeps its previous contents.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        *self = Self::decode(path)?;
        Ok(())
    }

    /// Encode the buffer to a WAV file at the given bit depth.
    ///
    /// Every sample is clipped to [-1.0, 1.0] before writing.
    pub fn encode(&self, path: impl AsRef<Path>, bit_depth: BitDepth) -> Result<()> {
        let path = path.as_ref();
        let spec =
            wav_spec(self.format(), bit_depth).map_err(|reason| Error::encode(path, reason))?;

        let mut writer = WavWriter::create(path, spec).map_err(|e| Error::encode(path, e))?;
        let clipped =
            write_samples(&mut writer, self, bit_depth).map_err(|e| Error::encode(path, e))?;

        // A short write surfaces here as a length mismatch from the header
        let expected = self.num_frames() as u32;
        if writer.duration() != expected {
            return Err(Error::encode(
                path,
                format!("wrote {} of {} frames", writer.duration(), expected),
            ));
        }
        writer.finalize().map_err(|e| Error::encode(path, e))?;

        if clipped > 0 {
            tracing::warn!(
                "Clipped {} samples to [-1, 1] while writing {}",
                clipped,
                path.display()
            );
        }
        tracing::info!(
            "Encoded {}: {} channels, {} frames, {}-bit",
            path.display(),
            self.num_channels(),
            self.num_frames(),
            bit_depth.bits()
        );
        Ok(())
    }

    /// Encode the buffer to an in-memory WAV image.
    pub fn encode_to_vec(&self, bit_depth: BitDepth) -> Result<Vec<u8>> {
        let spec =
            wav_spec(self.format(), bit_depth).map_err(|reason| Error::encode("<memory>", reason))?;

        let mut bytes = Vec::new();
        {
            let cursor = std::io::Cursor::new(&mut bytes);
            let mut writer =
                WavWriter::new(cursor, spec).map_err(|e| Error::encode("<memory>", e))?;
            write_samples(&mut writer, self, bit_depth).map_err(|e| Error::encode("<memory>", e))?;
            writer.finalize().map_err(|e| Error::encode("<memory>", e))?;
        }
        Ok(bytes)
    }
}

/// Validate a buffer format against what a WAV container can hold.
fn wav_spec(format: Format, bit_depth: BitDepth) -> std::result::Result<WavSpec, String> {
    if format.num_channels() == 0 {
        return Err("cannot write a file with zero channels".into());
    }
    let channels = u16::try_from(format.num_channels())
        .map_err(|_| format!("{} channels exceeds the WAV limit", format.num_channels()))?;
    if u32::try_from(format.num_samples()).is_err() {
        return Err(format!(
            "{} samples exceeds the WAV size limit",
            format.num_samples()
        ));
    }

    Ok(WavSpec {
        channels,
        sample_rate: format.sample_rate(),
        bits_per_sample: bit_depth.bits(),
        sample_format: bit_depth.sample_format(),
    })
}

/// Write the buffer interleaved, clipping as it goes. Returns the clip count.
fn write_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    buffer: &SampleBuffer,
    bit_depth: BitDepth,
) -> std::result::Result<usize, hound::Error> {
    let mut clipped = 0;
    for sample in buffer.to_interleaved() {
        let clamped = sample.clamp(-1.0, 1.0);
        if clamped != sample {
            clipped += 1;
        }
        match bit_depth {
            BitDepth::Int16 => writer.write_sample(float_to_i16(clamped))?,
            BitDepth::Int24 => writer.write_sample(float_to_i24(clamped))?,
            BitDepth::Float32 => writer.write_sample(clamped)?,
        }
    }
    Ok(clipped)
}

#[inline]
fn float_to_i16(sample: f32) -> i16 {
    (f64::from(sample) * 32767.0).round() as i16
}

#[inline]
fn float_to_i24(sample: f32) -> i32 {
    (f64::from(sample) * 8388607.0).round() as i32
}
