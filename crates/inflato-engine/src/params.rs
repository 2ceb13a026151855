//! Parameter ids, descriptors and timestamped parameter events.
//!
//! | Index | Id | String id | Range | Default |
//! |-------|----|-----------|-------|---------|
//! | 0 | 0 | `input_gain` | -6..12 dB | 0 dB |
//! | 1 | 1 | `effect` | 0..100 % | 100 % |
//! | 2 | 2 | `curve` | -50..50 | 0 |
//! | 3 | 3 | `clip` | off/on | off |
//! | 4 | 4 | `split` | off/on | off |
//! | 5 | 5 | `oversampling` | 1x/2x/4x/8x | 1x |
//! | 6 | 6 | `phase` | minimum/linear | minimum |
//! | 7 | 7 | `output_gain` | -12..0 dB | 0 dB |
//! | 8 | 8 | `bypass` | off/on | off |
//! | 9 | 9 | `input_enable` | off/on | on |
//!
//! Ids equal indices and never change.

use inflato_core::{ParamDescriptor, ParamFlags, ParamId, ParamUnit};

/// Input gain in dB.
pub const INPUT_GAIN: ParamId = ParamId(0);
/// Wet/dry mix in percent.
pub const EFFECT: ParamId = ParamId(1);
/// Transfer-curve shape.
pub const CURVE: ParamId = ParamId(2);
/// Hard clip to ±1 before shaping.
pub const CLIP: ParamId = ParamId(3);
/// Three-band shaping.
pub const SPLIT: ParamId = ParamId(4);
/// Oversampling factor index.
pub const OVERSAMPLING: ParamId = ParamId(5);
/// Phase mode index.
pub const PHASE: ParamId = ParamId(6);
/// Output gain in dB.
pub const OUTPUT_GAIN: ParamId = ParamId(7);
/// Bypass switch.
pub const BYPASS: ParamId = ParamId(8);
/// Input gain enable.
pub const INPUT_ENABLE: ParamId = ParamId(9);

/// Number of parameters.
pub const PARAM_COUNT: usize = 10;

/// Labels for the oversampling choice.
pub const OVERSAMPLING_LABELS: &[&str] = &["1x", "2x", "4x", "8x"];

/// Labels for the phase choice.
pub const PHASE_LABELS: &[&str] = &["Minimum", "Linear"];

/// Descriptor for the parameter at `index`.
pub fn descriptor(index: usize) -> Option<ParamDescriptor> {
    let desc = match index {
        0 => ParamDescriptor::gain_db("Input Gain", "Input", -6.0, 12.0, 0.0)
            .with_id(INPUT_GAIN, "input_gain"),
        1 => ParamDescriptor::custom("Effect", "Effect", ParamUnit::Percent, 0.0, 100.0, 100.0)
            .with_id(EFFECT, "effect"),
        2 => ParamDescriptor::custom("Curve", "Curve", ParamUnit::None, -50.0, 50.0, 0.0)
            .with_id(CURVE, "curve"),
        3 => ParamDescriptor::toggle("Clip", "Clip", false).with_id(CLIP, "clip"),
        4 => ParamDescriptor::toggle("Band Split", "Split", false).with_id(SPLIT, "split"),
        5 => ParamDescriptor::choice("Oversampling", "OS", OVERSAMPLING_LABELS, 0)
            .with_id(OVERSAMPLING, "oversampling"),
        6 => ParamDescriptor::choice("Phase", "Phase", PHASE_LABELS, 0).with_id(PHASE, "phase"),
        7 => ParamDescriptor::gain_db("Output Gain", "Output", -12.0, 0.0, 0.0)
            .with_id(OUTPUT_GAIN, "output_gain"),
        8 => ParamDescriptor::toggle("Bypass", "Bypass", false)
            .with_id(BYPASS, "bypass")
            .with_flags(
                ParamFlags::AUTOMATABLE
                    .union(ParamFlags::STEPPED)
                    .union(ParamFlags::BYPASS),
            ),
        9 => ParamDescriptor::toggle("Input Enable", "In On", true)
            .with_id(INPUT_ENABLE, "input_enable"),
        _ => return None,
    };
    Some(desc)
}

/// Descriptor for a parameter id.
pub fn descriptor_by_id(id: ParamId) -> Option<ParamDescriptor> {
    descriptor(id.0 as usize)
}

/// Clamp `value` into the range of the parameter at `index`; non-finite
/// values become the default.
pub(crate) fn clamp_value(index: usize, value: f64) -> f64 {
    descriptor(index).map_or(value, |desc| {
        if value.is_finite() {
            value.clamp(f64::from(desc.min), f64::from(desc.max))
        } else {
            f64::from(desc.default)
        }
    })
}

/// A parameter change timestamped within a processing block.
///
/// Changes take effect at block granularity: when several events in one
/// block address the same parameter, the one with the greatest `offset`
/// wins, and among equal offsets the one that appears last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamEvent {
    /// Frame offset within the block.
    pub offset: u32,
    /// Target parameter.
    pub id: ParamId,
    /// New plain value (clamped to the descriptor range when applied).
    pub value: f32,
}

impl ParamEvent {
    /// Event at the start of the block.
    pub fn new(id: ParamId, value: f32) -> Self {
        Self {
            offset: 0,
            id,
            value,
        }
    }

    /// Event at `offset` frames into the block.
    pub fn at(offset: u32, id: ParamId, value: f32) -> Self {
        Self { offset, id, value }
    }
}

/// Whether `events[index]` is overridden by a later event for the same
/// parameter.
pub(crate) fn is_superseded(events: &[ParamEvent], index: usize) -> bool {
    let event = &events[index];
    events.iter().enumerate().any(|(j, other)| {
        j != index
            && other.id == event.id
            && (other.offset > event.offset || (other.offset == event.offset && j > index))
    })
}
