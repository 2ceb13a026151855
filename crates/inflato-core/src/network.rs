//! Per-channel oversampling network and the mode latency table.
//!
//! An [`OversamplingNetwork`] bundles the half-band cascade with one
//! linear-phase resampler pair per non-trivial factor, all built up front, so
//! that switching factor or phase mode between blocks never allocates.

use crate::oversample::{HalfBandCascade, OversampleFactor, PhaseMode};
use crate::resampler::{LinearPhasePair, ResamplerConstructionError, ResamplerQuality};

/// Algorithmic latency for every (factor, phase) combination.
///
/// Computed from the designed cascade and the constructed resamplers rather
/// than hard-coded, so it can never drift from the actual filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyTable {
    samples: [[usize; 2]; 4],
}

impl LatencyTable {
    /// Latency in base-rate samples.
    pub fn get(&self, factor: OversampleFactor, phase: PhaseMode) -> usize {
        if factor == OversampleFactor::X1 {
            return 0;
        }
        self.samples[factor.index()][phase.index()]
    }

    /// Largest entry, used to size delay compensation.
    pub fn max(&self) -> usize {
        self.samples.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Iterate over `(factor, phase, latency)` for every combination.
    pub fn iter(&self) -> impl Iterator<Item = (OversampleFactor, PhaseMode, usize)> + '_ {
        OversampleFactor::ALL.into_iter().flat_map(move |f| {
            [PhaseMode::Minimum, PhaseMode::Linear]
                .into_iter()
                .map(move |p| (f, p, self.get(f, p)))
        })
    }
}

/// Up/down conversion for one channel, across all factors and both phase modes.
///
/// # Example
///
/// ```rust
/// use inflato_core::{OversampleFactor, OversamplingNetwork, PhaseMode, ResamplerQuality};
///
/// let mut net = OversamplingNetwork::new(48000.0, ResamplerQuality::Low).unwrap();
/// let (factor, phase) = (OversampleFactor::X2, PhaseMode::Minimum);
/// let mut buf = [0.0; 2];
/// net.upsample(0.25, factor, phase, &mut buf);
/// let y = net.downsample(&mut buf, factor, phase);
/// assert!(y.is_finite());
/// assert!(net.latency_table().get(factor, phase) > 0);
/// ```
#[derive(Debug)]
pub struct OversamplingNetwork {
    cascade: HalfBandCascade,
    /// Indexed by `factor.index() - 1`.
    linear: [LinearPhasePair; 3],
    table: LatencyTable,
}

impl OversamplingNetwork {
    /// Build the network for a base sample rate. Allocates every filter and
    /// resampler buffer.
    pub fn new(
        sample_rate: f64,
        quality: ResamplerQuality,
    ) -> Result<Self, ResamplerConstructionError> {
        let cascade = HalfBandCascade::new(sample_rate);
        let linear = [
            LinearPhasePair::new(OversampleFactor::X2, quality)?,
            LinearPhasePair::new(OversampleFactor::X4, quality)?,
            LinearPhasePair::new(OversampleFactor::X8, quality)?,
        ];
        let mut table = LatencyTable::default();
        for factor in OversampleFactor::ALL {
            let i = factor.index();
            table.samples[i][PhaseMode::Minimum.index()] = cascade.latency(factor);
            if i > 0 {
                table.samples[i][PhaseMode::Linear.index()] = linear[i - 1].latency();
            }
        }
        Ok(Self {
            cascade,
            linear,
            table,
        })
    }

    /// The latency of every mode for this network.
    pub fn latency_table(&self) -> &LatencyTable {
        &self.table
    }

    /// Interpolate one base-rate sample into `out` (`out.len() == factor.ratio()`).
    #[inline]
    pub fn upsample(
        &mut self,
        x: f64,
        factor: OversampleFactor,
        phase: PhaseMode,
        out: &mut [f64],
    ) {
        match (factor, phase) {
            (OversampleFactor::X1, _) => out[0] = x,
            (_, PhaseMode::Minimum) => self.cascade.upsample(x, factor, out),
            (_, PhaseMode::Linear) => self.linear[factor.index() - 1].upsample(x, out),
        }
    }

    /// Decimate `buf` (`buf.len() == factor.ratio()`) to one base-rate sample.
    #[inline]
    pub fn downsample(
        &mut self,
        buf: &mut [f64],
        factor: OversampleFactor,
        phase: PhaseMode,
    ) -> f64 {
        match (factor, phase) {
            (OversampleFactor::X1, _) => buf[0],
            (_, PhaseMode::Minimum) => self.cascade.downsample(buf, factor),
            (_, PhaseMode::Linear) => self.linear[factor.index() - 1].downsample(buf),
        }
    }

    /// Clear every filter and resampler.
    pub fn reset(&mut self) {
        self.cascade.reset();
        self.linear.iter_mut().for_each(LinearPhasePair::reset);
    }
}
