//! Channel-major multichannel sample storage.

use core::fmt;

use crate::{Error, Format, Result};

/// Owned multichannel sample buffer.
///
/// Samples are stored channel-major: every frame of channel 0, then every
/// frame of channel 1, and so on. `Clone` is a full deep copy; wrap the buffer
/// in an `Arc` when an immutable shared snapshot is wanted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBuffer {
    format: Format,
    samples: Vec<f32>,
}

impl SampleBuffer {
    /// Allocate a zero-filled buffer for `format`.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            samples: vec![0.0; format.num_samples()],
        }
    }

    /// Build a buffer from one sample vector per channel.
    ///
    /// All channels must have the same length.
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        let num_frames = channels.first().map_or(0, Vec::len);
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != num_frames)
        {
            return Err(Error::InvalidFormat(format!(
                "channel {} has {} frames, expected {}",
                index,
                channel.len(),
                num_frames
            )));
        }

        let format = Format::new(sample_rate, channels.len(), num_frames)?;
        let samples = channels.into_iter().flatten().collect();
        Ok(Self { format, samples })
    }

    /// Build a buffer from an interleaved stream (`frame * channels + channel`).
    pub fn from_interleaved(
        sample_rate: u32,
        num_channels: usize,
        interleaved: &[f32],
    ) -> Result<Self> {
        if num_channels == 0 {
            if !interleaved.is_empty() {
                return Err(Error::InvalidFormat(
                    "interleaved samples supplied for zero channels".into(),
                ));
            }
            return Ok(Self::new(Format::new(sample_rate, 0, 0)?));
        }
        if interleaved.len() % num_channels != 0 {
            return Err(Error::InvalidFormat(format!(
                "{} interleaved samples do not divide into {} channels",
                interleaved.len(),
                num_channels
            )));
        }

        let num_frames = interleaved.len() / num_channels;
        let mut buffer = Self::new(Format::new(sample_rate, num_channels, num_frames)?);
        for (frame, chunk) in interleaved.chunks_exact(num_channels).enumerate() {
            for (channel, &sample) in chunk.iter().enumerate() {
                buffer.samples[channel * num_frames + frame] = sample;
            }
        }
        Ok(buffer)
    }

    /// Copy the samples out in interleaved order.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let channels = self.num_channels();
        let frames = self.num_frames();
        let mut interleaved = vec![0.0; self.samples.len()];
        for channel in 0..channels {
            for frame in 0..frames {
                interleaved[frame * channels + channel] = self.samples[channel * frames + frame];
            }
        }
        interleaved
    }

    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate()
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.format.num_channels()
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.format.num_frames()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Storage position of `(channel, frame)`, or `None` when out of range.
    #[inline]
    pub fn index(&self, channel: usize, frame: usize) -> Option<usize> {
        (channel < self.num_channels() && frame < self.num_frames())
            .then(|| channel * self.num_frames() + frame)
    }

    #[inline]
    fn position(&self, channel: usize, frame: usize) -> usize {
        match self.index(channel, frame) {
            Some(index) => index,
            None => panic!(
                "sample ({}, {}) out of range for {} channels x {} frames",
                channel,
                frame,
                self.num_channels(),
                self.num_frames()
            ),
        }
    }

    /// Read one sample.
    ///
    /// # Panics
    ///
    /// Panics when `channel` or `frame` is out of range. Use [`try_get`](Self::try_get)
    /// for a checked read.
    #[inline]
    pub fn get(&self, channel: usize, frame: usize) -> f32 {
        self.samples[self.position(channel, frame)]
    }

    /// Write one sample.
    ///
    /// # Panics
    ///
    /// Panics when `channel` or `frame` is out of range.
    #[inline]
    pub fn set(&mut self, channel: usize, frame: usize, value: f32) {
        let index = self.position(channel, frame);
        self.samples[index] = value;
    }

    pub fn try_get(&self, channel: usize, frame: usize) -> Result<f32> {
        self.index(channel, frame)
            .map(|index| self.samples[index])
            .ok_or_else(|| self.out_of_range(channel, frame))
    }

    pub fn try_set(&mut self, channel: usize, frame: usize, value: f32) -> Result<()> {
        let index = self
            .index(channel, frame)
            .ok_or_else(|| self.out_of_range(channel, frame))?;
        self.samples[index] = value;
        Ok(())
    }

    fn out_of_range(&self, channel: usize, frame: usize) -> Error {
        Error::OutOfRange(format!(
            "sample ({}, {}) for {} channels x {} frames",
            channel,
            frame,
            self.num_channels(),
            self.num_frames()
        ))
    }

    /// All frames of one channel.
    ///
    /// # Panics
    ///
    /// Panics when `channel` is out of range.
    pub fn channel(&self, channel: usize) -> &[f32] {
        assert!(
            channel < self.num_channels(),
            "channel {} out of range for {} channels",
            channel,
            self.num_channels()
        );
        let frames = self.num_frames();
        &self.samples[channel * frames..(channel + 1) * frames]
    }

    /// Mutable view of one channel.
    ///
    /// # Panics
    ///
    /// Panics when `channel` is out of range.
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        assert!(
            channel < self.num_channels(),
            "channel {} out of range for {} channels",
            channel,
            self.num_channels()
        );
        let frames = self.num_frames();
        &mut self.samples[channel * frames..(channel + 1) * frames]
    }

    /// Iterate over channels as slices.
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.num_channels()).map(move |channel| self.channel(channel))
    }

    /// Mutable channel-major storage, for bulk writers inside the workspace.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Channel-major storage.
    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Largest sample magnitude, or 0 for an empty buffer.
    pub fn max_abs_sample(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()))
    }

    /// Length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.format.duration_seconds()
    }

    #[inline]
    pub fn frame_to_time(&self, frame: f64) -> f64 {
        frame / self.sample_rate() as f64
    }

    #[inline]
    pub fn time_to_frame(&self, seconds: f64) -> f64 {
        seconds * self.sample_rate() as f64
    }

    /// Zero every sample.
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
    }

    /// Scale the buffer so its peak magnitude equals `target`.
    ///
    /// Returns the applied gain. Silent buffers are left unchanged (gain 1).
    pub fn normalize_peak(&mut self, target: f32) -> f32 {
        let peak = self.max_abs_sample();
        if peak <= f32::EPSILON {
            return 1.0;
        }
        let gain = target / peak;
        for sample in &mut self.samples {
            *sample *= gain;
        }
        gain
    }
}

impl fmt::Display for SampleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=========================== Audio Info ===========================")?;
        writeln!(f, "Channels:\t{}", self.num_channels())?;
        writeln!(f, "Frames:\t\t{}", self.num_frames())?;
        writeln!(f, "Sample Rate:\t{}", self.sample_rate())?;
        writeln!(f, "Duration:\t{:.3} s", self.duration_seconds())?;
        writeln!(f, "Peak:\t\t{:.6}", self.max_abs_sample())?;
        write!(f, "==================================================================")
    }
}
