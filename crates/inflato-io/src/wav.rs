//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        }
    }
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format: spec.sample_format.into(),
    })
}

/// WAV file specification.
///
/// A 32-bit depth is written as IEEE float, 16 and 24 bits as PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file as one buffer per channel.
///
/// Integer PCM is scaled to ±1.0; float files are returned as stored.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);
    let channels = usize::from(spec.channels.max(1));
    let frames = reader.duration() as usize;

    let interleaved: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mut buffers = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (buffer, &sample) in buffers.iter_mut().zip(frame) {
            buffer.push(sample);
        }
    }

    Ok((buffers, spec))
}

/// Write one buffer per channel to a WAV file.
///
/// `channels.len()` must equal `spec.channels` and every buffer must have
/// the same length. PCM samples are clamped to the integer range.
pub fn write_wav<P: AsRef<Path>>(path: P, channels: &[Vec<f32>], spec: WavSpec) -> Result<()> {
    if !matches!(spec.bits_per_sample, 16 | 24 | 32) {
        return Err(Error::UnsupportedFormat(format!(
            "{}-bit output (expected 16, 24 or 32)",
            spec.bits_per_sample
        )));
    }
    if channels.is_empty() || channels.len() != usize::from(spec.channels) {
        return Err(Error::ChannelMismatch(format!(
            "spec has {} channels, got {} buffers",
            spec.channels,
            channels.len()
        )));
    }
    let frames = channels[0].len();
    if channels.iter().any(|c| c.len() != frames) {
        return Err(Error::ChannelMismatch(
            "channel buffers have different lengths".to_string(),
        ));
    }

    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if spec.bits_per_sample == 32 {
        for n in 0..frames {
            for channel in channels {
                writer.write_sample(channel[n])?;
            }
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for n in 0..frames {
            for channel in channels {
                let int_sample = (channel[n] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}
