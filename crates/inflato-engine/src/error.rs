//! Error types for stream setup and state restore.
//!
//! Processing itself never fails; everything that can go wrong is reported
//! by [`Inflator::prepare`](crate::Inflator::prepare) or
//! [`InflatorState::from_bytes`](crate::InflatorState::from_bytes).

use inflato_core::ResamplerConstructionError;
use thiserror::Error;

/// Stream configuration rejected by [`Inflator::prepare`](crate::Inflator::prepare).
///
/// On error the processor keeps its previous configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Only mono and stereo streams are supported.
    #[error("unsupported channel count {0} (expected 1 or 2)")]
    UnsupportedChannels(usize),

    /// Sample rate is zero, negative or not finite.
    #[error("invalid sample rate {0}")]
    InvalidSampleRate(f64),

    /// Maximum block size is zero.
    #[error("maximum block size must be at least one frame")]
    InvalidBlockSize,

    /// A linear-phase resampler could not be built for this rate.
    #[error("failed to build resampler: {0}")]
    Resampler(#[from] ResamplerConstructionError),
}

/// Persisted state that cannot be restored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// The blob ends inside the leading block of floating-point fields.
    #[error("state truncated: {got} bytes, need at least {needed}")]
    Truncated {
        /// Minimum length for a usable blob.
        needed: usize,
        /// Length actually supplied.
        got: usize,
    },
}
