//! Level metering published once per processed block.
//!
//! The audio thread `try_send`s a [`MeterRecord`] to a bounded
//! `crossbeam_channel`; when the consumer falls behind, records are dropped
//! rather than blocking the callback.

use crossbeam_channel::{Receiver, Sender, bounded};

/// Meter decay time in seconds.
pub const METER_DECAY_SECONDS: f64 = 0.3;

/// Snapshot of the meters after one block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeterRecord {
    /// Base sample rate in Hz.
    pub sample_rate: f64,
    /// Frames in the block.
    pub num_samples: u32,
    /// Input level, left (linear RMS).
    pub in_l: f32,
    /// Input level, right (equals left for mono).
    pub in_r: f32,
    /// Output level, left (linear RMS).
    pub out_l: f32,
    /// Output level, right (equals left for mono).
    pub out_r: f32,
    /// Shaped-to-dry energy ratio over the block, in dB.
    pub gain_reduction: f32,
}

/// Create a bounded meter channel holding up to `capacity` records.
///
/// ```rust
/// use inflato_engine::meter_channel;
///
/// let (tx, rx) = meter_channel(4);
/// assert!(rx.try_recv().is_err());
/// drop(tx);
/// ```
pub fn meter_channel(capacity: usize) -> (Sender<MeterRecord>, Receiver<MeterRecord>) {
    bounded(capacity.max(1))
}

/// Per-block energy of the shaped and dry paths.
///
/// The gain-reduction figure is `10·log10(Σ shaped² / Σ dry²)`: zero when the
/// shaper leaves the level unchanged, negative when it compresses and
/// falling further as compression increases.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BlockEnergy {
    dry: f64,
    shaped: f64,
}

impl BlockEnergy {
    /// Below this block energy the ratio is meaningless and reported as 0 dB.
    const SILENCE: f64 = 1e-20;

    #[inline]
    pub(crate) fn accumulate(&mut self, dry: f64, shaped: f64) {
        self.dry += dry * dry;
        self.shaped += shaped * shaped;
    }

    pub(crate) fn gain_reduction_db(&self) -> f64 {
        if self.dry < Self::SILENCE || self.shaped < Self::SILENCE {
            0.0
        } else {
            10.0 * (self.shaped / self.dry).log10()
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
