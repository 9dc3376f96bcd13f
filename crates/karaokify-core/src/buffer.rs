//! In-memory PCM audio buffers.
//!
//! An [`AudioBuffer`] holds interleaved samples together with the sample rate
//! and channel count. Integer PCM of any supported bit depth is stored in
//! `i32`, float PCM in `f32`; the bit depth travels with the samples so the
//! format and the data can never disagree.

use crate::error::{KaraokeError, KaraokeResult};

/// Bit depths accepted for integer PCM.
pub const SUPPORTED_INT_BITS: [u16; 4] = [8, 16, 24, 32];

/// Sample format of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed integer PCM with the given bit depth.
    Int { bits: u16 },
    /// 32-bit IEEE float PCM.
    Float,
}

impl SampleFormat {
    /// Bits per sample.
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            SampleFormat::Int { bits } => *bits,
            SampleFormat::Float => 32,
        }
    }

    /// Returns true for floating point formats.
    pub fn is_float(&self) -> bool {
        matches!(self, SampleFormat::Float)
    }
}

/// Inclusive `(min, max)` range of a signed integer sample with `bits` bits.
///
/// # Errors
/// Returns [`KaraokeError::UnsupportedFormat`] unless `bits` is one of
/// [`SUPPORTED_INT_BITS`].
pub fn int_range(bits: u16) -> KaraokeResult<(i32, i32)> {
    if !SUPPORTED_INT_BITS.contains(&bits) {
        return Err(KaraokeError::UnsupportedFormat { bits, float: false });
    }
    let half = 1i64 << (bits - 1);
    Ok((-half as i32, (half - 1) as i32))
}

/// Interleaved or single-channel sample data.
#[derive(Debug, Clone, PartialEq)]
pub enum PcmData {
    /// Signed integer samples of the given bit depth.
    Int { bits: u16, samples: Vec<i32> },
    /// Float samples, nominally in [-1.0, 1.0].
    Float(Vec<f32>),
}

impl PcmData {
    /// Number of samples (not frames).
    pub fn len(&self) -> usize {
        match self {
            PcmData::Int { samples, .. } => samples.len(),
            PcmData::Float(samples) => samples.len(),
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sample format of this data.
    pub fn format(&self) -> SampleFormat {
        match self {
            PcmData::Int { bits, .. } => SampleFormat::Int { bits: *bits },
            PcmData::Float(_) => SampleFormat::Float,
        }
    }

    fn validate(&self) -> KaraokeResult<()> {
        if let PcmData::Int { bits, samples } = self {
            let (min, max) = int_range(*bits)?;
            if let Some(&value) = samples.iter().find(|&&s| s < min || s > max) {
                return Err(KaraokeError::SampleOutOfRange { value, bits: *bits });
            }
        }
        Ok(())
    }
}

/// A decoded audio buffer with interleaved samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: u16,
    data: PcmData,
}

impl AudioBuffer {
    /// Creates a buffer from interleaved samples.
    ///
    /// Fails if the sample count is not a multiple of `channels`, if the bit
    /// depth is unsupported, or if an integer sample exceeds its bit depth.
    pub fn new(data: PcmData, channels: u16, sample_rate: u32) -> KaraokeResult<Self> {
        if channels == 0 || data.len() % channels as usize != 0 {
            return Err(KaraokeError::MisalignedSamples {
                samples: data.len(),
                channels,
            });
        }
        data.validate()?;

        Ok(Self {
            sample_rate,
            channels,
            data,
        })
    }

    /// Creates a buffer from interleaved 16-bit samples.
    pub fn from_i16(samples: &[i16], channels: u16, sample_rate: u32) -> KaraokeResult<Self> {
        let samples = samples.iter().map(|&s| i32::from(s)).collect();
        Self::new(PcmData::Int { bits: 16, samples }, channels, sample_rate)
    }

    /// Creates a buffer from interleaved float samples.
    pub fn from_f32(samples: Vec<f32>, channels: u16, sample_rate: u32) -> KaraokeResult<Self> {
        Self::new(PcmData::Float(samples), channels, sample_rate)
    }

    /// Interleaves equal-length channel arrays into one buffer.
    ///
    /// All channels must share the same sample format and length.
    pub fn from_channels(channels: &[PcmData], sample_rate: u32) -> KaraokeResult<Self> {
        let count = channels.len() as u16;
        let Some(first) = channels.first() else {
            return Err(KaraokeError::MisalignedSamples {
                samples: 0,
                channels: 0,
            });
        };
        let frames = first.len();
        let format = first.format();

        if let Some(bad) = channels
            .iter()
            .find(|c| c.len() != frames || c.format() != format)
        {
            if bad.format() != format {
                return Err(KaraokeError::UnsupportedFormat {
                    bits: bad.format().bits_per_sample(),
                    float: bad.format().is_float(),
                });
            }
            return Err(KaraokeError::MisalignedSamples {
                samples: channels.iter().map(PcmData::len).sum(),
                channels: count,
            });
        }

        let data = match format {
            SampleFormat::Int { bits } => {
                let mut samples = Vec::with_capacity(frames * channels.len());
                for i in 0..frames {
                    for channel in channels {
                        if let PcmData::Int { samples: s, .. } = channel {
                            samples.push(s[i]);
                        }
                    }
                }
                PcmData::Int { bits, samples }
            }
            SampleFormat::Float => {
                let mut samples = Vec::with_capacity(frames * channels.len());
                for i in 0..frames {
                    for channel in channels {
                        if let PcmData::Float(s) = channel {
                            samples.push(s[i]);
                        }
                    }
                }
                PcmData::Float(samples)
            }
        };

        Self::new(data, count, sample_rate)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample format.
    pub fn format(&self) -> SampleFormat {
        self.data.format()
    }

    /// Interleaved sample data.
    pub fn data(&self) -> &PcmData {
        &self.data
    }

    /// Consumes the buffer and returns its sample data.
    pub fn into_data(self) -> PcmData {
        self.data
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.data.len() / self.channels as usize
    }

    /// Returns true if this is a two-channel buffer.
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Splits the buffer into one array per channel, aligned by frame index.
    pub fn split_channels(&self) -> Vec<PcmData> {
        let channels = self.channels as usize;
        match &self.data {
            PcmData::Int { bits, samples } => (0..channels)
                .map(|ch| PcmData::Int {
                    bits: *bits,
                    samples: samples.iter().skip(ch).step_by(channels).copied().collect(),
                })
                .collect(),
            PcmData::Float(samples) => (0..channels)
                .map(|ch| {
                    PcmData::Float(samples.iter().skip(ch).step_by(channels).copied().collect())
                })
                .collect(),
        }
    }
}
