//! Inflato Engine - the real-time soft-inflation processor
//!
//! Wires the primitives from [`inflato_core`] into one processor:
//!
//! - [`Inflator`] - stream setup, block processing, mode switching, metering
//! - [`InflatorState`] - every control, with the fixed binary state layout
//! - [`ParamEvent`] and [`params`] - timestamped parameter changes by stable id
//! - [`MeterRecord`] - per-block levels published over a bounded channel
//!
//! # Example
//!
//! ```rust
//! use inflato_engine::{Inflator, ParamEvent, StreamSetup, meter_channel, params};
//!
//! let mut inflator = Inflator::new();
//! let (tx, rx) = meter_channel(8);
//! inflator.set_meter_sender(Some(tx));
//! inflator.prepare(StreamSetup::new(44100.0, 1, 512)).unwrap();
//!
//! let input: Vec<f64> = (0..512).map(|i| 0.3 * (i as f64 * 0.02).sin()).collect();
//! let mut output = vec![0.0; 512];
//! let events = [ParamEvent::new(params::CURVE, 25.0)];
//! inflator.process(&[&input[..]], &mut [&mut output[..]], &events);
//!
//! let record = rx.try_recv().unwrap();
//! assert_eq!(record.num_samples, 512);
//! ```

pub mod error;
pub mod inflator;
pub mod meter;
pub mod params;
pub mod sample;
pub mod state;

pub use error::{SetupError, StateError};
pub use inflator::{Inflator, SMOOTHING_MS, StreamSetup};
pub use meter::{METER_DECAY_SECONDS, MeterRecord, meter_channel};
pub use params::{PARAM_COUNT, ParamEvent};
pub use sample::Sample;
pub use state::{FLOAT_BLOCK_LEN, InflatorState, STATE_LEN};
