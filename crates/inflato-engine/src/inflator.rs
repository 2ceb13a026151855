//! The soft-inflation processor.
//!
//! # Signal Flow
//!
//! Per frame and channel:
//!
//! ```text
//! x ─▶ input gain ─▶ clip? ─▶ anti-denormal ─┬─▶ up ─▶ (split ─▶) shape ─▶ down ─▶ processed
//!                                             │                                        │
//!                                             └─▶ latency aligner ──── delayed ───▶ mix(effect)
//!                                                                                      │
//!                                                              bypass? delayed ◀───────┤
//!                                                                                      ▼
//!                                                                                output gain
//! ```
//!
//! Input and output levels are followed per channel and a [`MeterRecord`]
//! is published once per [`Inflator::process`] call, covering the whole
//! host block.
//!
//! # Real-Time Contract
//!
//! [`Inflator::prepare`] allocates every filter, resampler and queue for all
//! oversampling factors and both phase modes. [`Inflator::process`] never
//! allocates, never blocks and never fails. Factor and phase changes take
//! effect at the start of the next block; if they change the latency,
//! [`Inflator::take_latency_changed`] reports it once.

use crossbeam_channel::Sender;
use inflato_core::{
    AntiDenormal, BandSplitter, DEFAULT_HIGH_HZ, DEFAULT_LOW_HZ, DetectionMode, EnvelopeFollower,
    LatencyAligner, LatencyTable, MAX_OVERSAMPLE_FACTOR, OversampleFactor, OversamplingNetwork,
    ParamDescriptor, ParameterInfo, PhaseMode, ResamplerQuality, SmoothedParam, Waveshaper,
    db_to_linear,
};

use crate::error::SetupError;
use crate::meter::{BlockEnergy, METER_DECAY_SECONDS, MeterRecord};
use crate::params::{self, PARAM_COUNT, ParamEvent};
use crate::sample::Sample;
use crate::state::InflatorState;

/// Smoothing time for gain and mix changes.
pub const SMOOTHING_MS: f64 = 10.0;

/// Stream configuration negotiated with the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamSetup {
    /// Base sample rate in Hz.
    pub sample_rate: f64,
    /// Channel count (1 or 2).
    pub channels: usize,
    /// Largest block passed to one processing call. Longer blocks are
    /// processed in pieces of this size.
    pub max_block_size: usize,
}

impl StreamSetup {
    /// Create a setup.
    pub fn new(sample_rate: f64, channels: usize, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            channels,
            max_block_size,
        }
    }

    fn validate(&self) -> Result<(), SetupError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(SetupError::InvalidSampleRate(self.sample_rate));
        }
        if !(1..=2).contains(&self.channels) {
            return Err(SetupError::UnsupportedChannels(self.channels));
        }
        if self.max_block_size == 0 {
            return Err(SetupError::InvalidBlockSize);
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Channel {
    network: OversamplingNetwork,
    splitter: BandSplitter,
    input_meter: EnvelopeFollower,
    output_meter: EnvelopeFollower,
}

/// Everything sized by [`Inflator::prepare`].
#[derive(Debug)]
struct Prepared {
    setup: StreamSetup,
    channels: Vec<Channel>,
    aligner: LatencyAligner,
    table: LatencyTable,
    factor: OversampleFactor,
    phase: PhaseMode,
}

/// Soft-inflation waveshaper with oversampling and delay-compensated mix.
///
/// # Example
///
/// ```rust
/// use inflato_core::OversampleFactor;
/// use inflato_engine::{Inflator, StreamSetup};
///
/// let mut inflator = Inflator::new();
/// inflator.set_oversampling(OversampleFactor::X2);
/// inflator.prepare(StreamSetup::new(48000.0, 2, 256)).unwrap();
///
/// let left = vec![0.25f32; 256];
/// let right = vec![-0.25f32; 256];
/// let mut out_l = vec![0.0f32; 256];
/// let mut out_r = vec![0.0f32; 256];
/// inflator.process(&[&left[..], &right[..]], &mut [&mut out_l[..], &mut out_r[..]], &[]);
///
/// assert!(inflator.latency() > 0);
/// assert!(out_l.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug)]
pub struct Inflator {
    state: InflatorState,
    quality: ResamplerQuality,
    crossover: (f64, f64),
    shaper: Waveshaper,
    input_gain: SmoothedParam,
    output_gain: SmoothedParam,
    effect: SmoothedParam,
    denormal: AntiDenormal,
    prepared: Option<Prepared>,
    latency_changed: bool,
    meter_tx: Option<Sender<MeterRecord>>,
    energy: BlockEnergy,
}

impl Default for Inflator {
    fn default() -> Self {
        Self::new()
    }
}

impl Inflator {
    /// Create an unprepared processor with default settings and the
    /// default linear-phase resampler quality.
    pub fn new() -> Self {
        Self::with_quality(ResamplerQuality::default())
    }

    /// Create an unprepared processor with a specific linear-phase quality.
    pub fn with_quality(quality: ResamplerQuality) -> Self {
        let state = InflatorState::default();
        Self {
            state,
            quality,
            crossover: (DEFAULT_LOW_HZ, DEFAULT_HIGH_HZ),
            shaper: Waveshaper::new(state.curve),
            input_gain: SmoothedParam::new(db_to_linear(state.input_gain_db)),
            output_gain: SmoothedParam::new(db_to_linear(state.output_gain_db)),
            effect: SmoothedParam::new(state.effect / 100.0),
            denormal: AntiDenormal::default(),
            prepared: None,
            latency_changed: false,
            meter_tx: None,
            energy: BlockEnergy::default(),
        }
    }

    /// Allocate and configure everything for a stream.
    ///
    /// Must not run concurrently with [`process`](Self::process). On error
    /// the previous configuration is kept.
    pub fn prepare(&mut self, setup: StreamSetup) -> Result<(), SetupError> {
        if let Err(err) = setup.validate() {
            tracing::warn!(?setup, error = %err, "rejected stream setup");
            return Err(err);
        }

        let factor = self.state.oversampling;
        let phase = self.state.phase;
        let working_rate = setup.sample_rate * factor.ratio() as f64;
        let (low_hz, high_hz) = self.crossover;

        let mut channels = Vec::with_capacity(setup.channels);
        for _ in 0..setup.channels {
            let network = OversamplingNetwork::new(setup.sample_rate, self.quality).map_err(|err| {
                tracing::warn!(?setup, error = %err, "failed to build resampler");
                SetupError::from(err)
            })?;
            channels.push(Channel {
                network,
                splitter: BandSplitter::new(working_rate, low_hz, high_hz),
                input_meter: EnvelopeFollower::new(
                    setup.sample_rate,
                    METER_DECAY_SECONDS,
                    DetectionMode::Rms,
                ),
                output_meter: EnvelopeFollower::new(
                    setup.sample_rate,
                    METER_DECAY_SECONDS,
                    DetectionMode::Rms,
                ),
            });
        }

        let table = channels
            .first()
            .map(|c| *c.network.latency_table())
            .unwrap_or_default();
        let mut aligner = LatencyAligner::new(setup.channels, table.max());
        aligner.set_latency(table.get(factor, phase));

        for param in [&mut self.input_gain, &mut self.output_gain, &mut self.effect] {
            param.set_sample_rate(setup.sample_rate);
            param.set_smoothing_time_ms(SMOOTHING_MS);
            param.snap_to_target();
        }

        tracing::debug!(
            sample_rate = setup.sample_rate,
            channels = setup.channels,
            max_block_size = setup.max_block_size,
            latency = aligner.latency(),
            max_latency = table.max(),
            "prepared inflator"
        );

        self.prepared = Some(Prepared {
            setup,
            channels,
            aligner,
            table,
            factor,
            phase,
        });
        self.latency_changed = false;
        Ok(())
    }

    /// The active stream setup, if prepared.
    pub fn setup(&self) -> Option<StreamSetup> {
        self.prepared.as_ref().map(|p| p.setup)
    }

    /// Whether [`prepare`](Self::prepare) has succeeded.
    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Latency of every mode at the prepared rate.
    pub fn latency_table(&self) -> Option<&LatencyTable> {
        self.prepared.as_ref().map(|p| &p.table)
    }

    /// Algorithmic latency of the active mode in base-rate samples.
    pub fn latency(&self) -> usize {
        self.prepared
            .as_ref()
            .map_or(0, |p| p.table.get(p.factor, p.phase))
    }

    /// Returns `true` once after a mode switch changed the latency.
    pub fn take_latency_changed(&mut self) -> bool {
        core::mem::take(&mut self.latency_changed)
    }

    /// Publish a [`MeterRecord`] after each block to `sender`.
    pub fn set_meter_sender(&mut self, sender: Option<Sender<MeterRecord>>) {
        self.meter_tx = sender;
    }

    /// Set the crossover corners used in band-split mode (at the
    /// oversampled rate).
    pub fn set_crossover(&mut self, low_hz: f64, high_hz: f64) {
        self.crossover = (low_hz, high_hz);
        if let Some(p) = self.prepared.as_mut() {
            for channel in &mut p.channels {
                channel.splitter.set_frequencies(low_hz, high_hz);
            }
        }
    }

    /// Current `(input, output)` meter levels for `channel` (linear RMS).
    pub fn levels(&self, channel: usize) -> Option<(f64, f64)> {
        let p = self.prepared.as_ref()?;
        let c = p.channels.get(channel)?;
        Some((c.input_meter.level(), c.output_meter.level()))
    }

    /// Current settings.
    pub fn state(&self) -> InflatorState {
        self.state
    }

    /// Apply a complete set of settings. Factor and phase take effect at the
    /// next block.
    pub fn set_state(&mut self, state: InflatorState) {
        let state = state.sanitized();
        self.state = state;
        self.shaper.set_curve(state.curve);
        self.effect.set_target(state.effect / 100.0);
        self.output_gain.set_target(db_to_linear(state.output_gain_db));
        self.update_input_gain();
    }

    /// Input gain in dB (-6..=12).
    pub fn set_input_gain_db(&mut self, db: f64) {
        self.state.input_gain_db = params::clamp_value(0, db);
        self.update_input_gain();
    }

    /// Wet/dry mix in percent (0..=100).
    pub fn set_effect(&mut self, percent: f64) {
        self.state.effect = params::clamp_value(1, percent);
        self.effect.set_target(self.state.effect / 100.0);
    }

    /// Transfer-curve shape (-50..=50).
    pub fn set_curve(&mut self, curve: f64) {
        self.state.curve = params::clamp_value(2, curve);
        self.shaper.set_curve(self.state.curve);
    }

    /// Hard clip to ±1 before shaping.
    pub fn set_clip(&mut self, clip: bool) {
        self.state.clip = clip;
    }

    /// Shape low, mid and high bands independently.
    pub fn set_split(&mut self, split: bool) {
        self.state.split = split;
    }

    /// Oversampling factor, applied at the next block.
    pub fn set_oversampling(&mut self, factor: OversampleFactor) {
        self.state.oversampling = factor;
    }

    /// Phase mode, applied at the next block.
    pub fn set_phase_mode(&mut self, phase: PhaseMode) {
        self.state.phase = phase;
    }

    /// Output gain in dB (-12..=0).
    pub fn set_output_gain_db(&mut self, db: f64) {
        self.state.output_gain_db = params::clamp_value(7, db);
        self.output_gain.set_target(db_to_linear(self.state.output_gain_db));
    }

    /// Emit the latency-aligned dry signal instead of the processed one.
    pub fn set_bypass(&mut self, bypass: bool) {
        self.state.bypass = bypass;
    }

    /// Apply or ignore the input gain.
    pub fn set_input_enable(&mut self, enable: bool) {
        self.state.input_enable = enable;
        self.update_input_gain();
    }

    /// Clear all filter, queue and meter state, keeping the configuration.
    pub fn reset(&mut self) {
        if let Some(p) = self.prepared.as_mut() {
            for channel in &mut p.channels {
                channel.network.reset();
                channel.splitter.reset();
                channel.input_meter.reset();
                channel.output_meter.reset();
            }
            p.aligner.clear();
        }
        for param in [&mut self.input_gain, &mut self.output_gain, &mut self.effect] {
            param.snap_to_target();
        }
    }

    /// Process one block.
    ///
    /// `inputs` and `outputs` hold one slice per channel. The block length is
    /// the shortest output slice; missing input samples read as silence and
    /// output channels beyond the prepared count are zeroed. Before
    /// [`prepare`](Self::prepare) the input is copied through unchanged.
    ///
    /// `events` are applied before any audio is processed.
    pub fn process<S: Sample>(
        &mut self,
        inputs: &[&[S]],
        outputs: &mut [&mut [S]],
        events: &[ParamEvent],
    ) {
        for (i, event) in events.iter().enumerate() {
            if !params::is_superseded(events, i) {
                self.apply_event(event);
            }
        }
        self.sync_mode();

        let frames = outputs.iter().map(|o| o.len()).min().unwrap_or(0);
        let Some(max_block) = self.prepared.as_ref().map(|p| p.setup.max_block_size) else {
            copy_through(inputs, outputs, frames);
            return;
        };

        self.energy.clear();
        let mut start = 0;
        while start < frames {
            let end = (start + max_block).min(frames);
            self.process_block(inputs, outputs, start, end);
            start = end;
        }
        self.publish_meters(frames);
    }

    fn process_block<S: Sample>(
        &mut self,
        inputs: &[&[S]],
        outputs: &mut [&mut [S]],
        start: usize,
        end: usize,
    ) {
        let Self {
            prepared: Some(p),
            state,
            shaper,
            input_gain,
            output_gain,
            effect,
            denormal,
            energy,
            ..
        } = self
        else {
            return;
        };

        let (factor, phase) = (p.factor, p.phase);
        let ratio = factor.ratio();
        let mut scratch = [0.0; MAX_OVERSAMPLE_FACTOR];

        for n in start..end {
            let in_gain = input_gain.advance();
            let out_gain = output_gain.advance();
            let wet = effect.advance();

            for (ch, channel) in p.channels.iter_mut().enumerate() {
                let mut x = inputs.get(ch).and_then(|b| b.get(n)).map_or(0.0, |s| s.to_f64());
                x *= in_gain;
                if state.clip {
                    x = x.clamp(-1.0, 1.0);
                }
                x = denormal.apply(x);
                channel.input_meter.process(x);

                let delayed = p.aligner.process(ch, x);

                let buf = &mut scratch[..ratio];
                channel.network.upsample(x, factor, phase, buf);
                for s in buf.iter_mut() {
                    *s = if state.split {
                        channel.splitter.process_with(*s, |v| shaper.shape(v))
                    } else {
                        shaper.shape(*s)
                    };
                }
                let processed = channel.network.downsample(buf, factor, phase);

                let mixed = if state.bypass {
                    delayed
                } else {
                    energy.accumulate(delayed, processed);
                    LatencyAligner::mix(wet, processed, delayed)
                };
                let y = mixed * out_gain;
                channel.output_meter.process(y);

                if let Some(out) = outputs.get_mut(ch).and_then(|b| b.get_mut(n)) {
                    *out = S::from_f64(y);
                }
            }
        }

        for extra in outputs.iter_mut().skip(p.channels.len()) {
            extra[start..end].fill(S::from_f64(0.0));
        }
    }

    /// Send the meter state after a host block. A full channel drops the
    /// record.
    fn publish_meters(&self, frames: usize) {
        let (Some(p), Some(tx)) = (self.prepared.as_ref(), self.meter_tx.as_ref()) else {
            return;
        };
        if frames == 0 {
            return;
        }
        let level = |ch: usize, input: bool| {
            p.channels
                .get(ch)
                .or_else(|| p.channels.first())
                .map_or(0.0, |c| {
                    if input {
                        c.input_meter.level()
                    } else {
                        c.output_meter.level()
                    }
                }) as f32
        };
        let _ = tx.try_send(MeterRecord {
            sample_rate: p.setup.sample_rate,
            num_samples: frames as u32,
            in_l: level(0, true),
            in_r: level(1, true),
            out_l: level(0, false),
            out_r: level(1, false),
            gain_reduction: self.energy.gain_reduction_db() as f32,
        });
    }

    fn apply_event(&mut self, event: &ParamEvent) {
        self.set_param(event.id.0 as usize, event.value);
    }

    /// Switch to the requested factor and phase if they differ from the
    /// active ones.
    fn sync_mode(&mut self) {
        let Some(p) = self.prepared.as_mut() else {
            return;
        };
        let (factor, phase) = (self.state.oversampling, self.state.phase);
        if factor == p.factor && phase == p.phase {
            return;
        }

        let before = p.table.get(p.factor, p.phase);
        let after = p.table.get(factor, phase);
        let working_rate = p.setup.sample_rate * factor.ratio() as f64;
        for channel in &mut p.channels {
            channel.network.reset();
            channel.splitter.set_sample_rate(working_rate);
            channel.splitter.reset();
        }
        p.aligner.set_latency(after);
        p.factor = factor;
        p.phase = phase;
        if before != after {
            self.latency_changed = true;
        }
        tracing::debug!(
            ratio = factor.ratio(),
            ?phase,
            latency = after,
            "oversampling mode changed"
        );
    }

    fn update_input_gain(&mut self) {
        let gain = if self.state.input_enable {
            db_to_linear(self.state.input_gain_db)
        } else {
            1.0
        };
        self.input_gain.set_target(gain);
    }
}

fn copy_through<S: Sample>(inputs: &[&[S]], outputs: &mut [&mut [S]], frames: usize) {
    for (ch, out) in outputs.iter_mut().enumerate() {
        for (n, sample) in out[..frames].iter_mut().enumerate() {
            *sample = inputs
                .get(ch)
                .and_then(|b| b.get(n))
                .copied()
                .unwrap_or_else(|| S::from_f64(0.0));
        }
    }
}

impl ParameterInfo for Inflator {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        params::descriptor(index)
    }

    fn get_param(&self, index: usize) -> f32 {
        let s = &self.state;
        let value = match index {
            0 => s.input_gain_db,
            1 => s.effect,
            2 => s.curve,
            3 => f64::from(u8::from(s.clip)),
            4 => f64::from(u8::from(s.split)),
            5 => s.oversampling.index() as f64,
            6 => s.phase.index() as f64,
            7 => s.output_gain_db,
            8 => f64::from(u8::from(s.bypass)),
            9 => f64::from(u8::from(s.input_enable)),
            _ => 0.0,
        };
        value as f32
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = params::descriptor(index) else {
            return;
        };
        let value = f64::from(desc.clamp(value));
        let on = value >= 0.5;
        match index {
            0 => self.set_input_gain_db(value),
            1 => self.set_effect(value),
            2 => self.set_curve(value),
            3 => self.set_clip(on),
            4 => self.set_split(on),
            5 => self.set_oversampling(OversampleFactor::from_index(value as usize)),
            6 => self.set_phase_mode(PhaseMode::from_index(value as usize)),
            7 => self.set_output_gain_db(value),
            8 => self.set_bypass(on),
            9 => self.set_input_enable(on),
            _ => {}
        }
    }
}
