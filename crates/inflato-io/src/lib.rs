//! WAV file I/O for the inflato processor.
//!
//! Audio is exchanged as one `Vec<f32>` per channel, the layout the
//! processor consumes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use inflato_io::{read_wav, write_wav};
//!
//! let (channels, spec) = read_wav("input.wav")?;
//! // ... process ...
//! write_wav("output.wav", &channels, spec)?;
//! ```

mod wav;

pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Channel buffers disagree with the spec or with each other.
    #[error("Channel layout mismatch: {0}")]
    ChannelMismatch(String),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
