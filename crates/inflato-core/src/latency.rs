//! Delay compensation between the dry and oversampled paths.

#[cfg(not(feature = "std"))]
use alloc::{collections::VecDeque, vec::Vec};
#[cfg(feature = "std")]
use std::collections::VecDeque;

/// Per-channel FIFO that delays the dry signal by the active algorithmic
/// latency so it lines up with the wet signal for mixing and metering.
///
/// Every queue holds exactly `latency` samples between calls to
/// [`process`](Self::process). Capacity for the largest latency is reserved
/// up front; resizing within it never allocates.
///
/// # Example
///
/// ```rust
/// use inflato_core::LatencyAligner;
///
/// let mut aligner = LatencyAligner::new(1, 16);
/// aligner.set_latency(2);
/// assert_eq!(aligner.process(0, 1.0), 0.0);
/// assert_eq!(aligner.process(0, 2.0), 0.0);
/// assert_eq!(aligner.process(0, 3.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct LatencyAligner {
    queues: Vec<VecDeque<f64>>,
    latency: usize,
    max_latency: usize,
}

impl LatencyAligner {
    /// Allocate queues for `channels` channels and latencies up to `max_latency`.
    pub fn new(channels: usize, max_latency: usize) -> Self {
        Self {
            queues: (0..channels)
                .map(|_| VecDeque::with_capacity(max_latency + 1))
                .collect(),
            latency: 0,
            max_latency,
        }
    }

    /// Current latency in samples.
    pub fn latency(&self) -> usize {
        self.latency
    }

    /// Largest latency the queues were sized for.
    pub fn max_latency(&self) -> usize {
        self.max_latency
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.queues.len()
    }

    /// Samples currently queued for `channel`.
    pub fn len(&self, channel: usize) -> usize {
        self.queues.get(channel).map_or(0, VecDeque::len)
    }

    /// Whether `channel` has nothing queued.
    pub fn is_empty(&self, channel: usize) -> bool {
        self.len(channel) == 0
    }

    /// Resize every queue to the new latency (clamped to the maximum).
    ///
    /// Growing appends zeros at the tail; shrinking discards the oldest
    /// samples at the head.
    pub fn set_latency(&mut self, latency: usize) {
        let latency = latency.min(self.max_latency);
        for queue in &mut self.queues {
            while queue.len() < latency {
                queue.push_back(0.0);
            }
            while queue.len() > latency {
                queue.pop_front();
            }
        }
        self.latency = latency;
    }

    /// Push a dry sample and return the one queued `latency` samples ago.
    #[inline]
    pub fn process(&mut self, channel: usize, dry: f64) -> f64 {
        let queue = &mut self.queues[channel];
        queue.push_back(dry);
        queue.pop_front().unwrap_or(dry)
    }

    /// Blend the processed sample with the delay-compensated dry sample.
    #[inline]
    pub fn mix(wet: f64, processed: f64, delayed: f64) -> f64 {
        wet * processed + (1.0 - wet) * delayed
    }

    /// Zero the queued samples, keeping the current length.
    pub fn clear(&mut self) {
        for queue in &mut self.queues {
            queue.iter_mut().for_each(|s| *s = 0.0);
        }
    }
}
