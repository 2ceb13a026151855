//! Inflato Core - DSP primitives for the inflato waveshaper
//!
//! This crate provides the building blocks of a soft-inflation processor:
//! filter design, oversampling, band splitting, the transfer curve itself,
//! delay compensation and level metering. Nothing here allocates once
//! constructed.
//!
//! # Building Blocks
//!
//! ## Filter Design
//!
//! - [`kaiser_design`] - Kaiser-window band-pass FIR design
//! - [`HalfBandSpec`] - Half-band specialisation with polyphase metadata
//!
//! ## Oversampling
//!
//! - [`HalfBandStage`] - One 2× polyphase interpolate/decimate stage
//! - [`HalfBandCascade`] - 1×/2×/4×/8× cascade of pre-designed stages
//! - [`LinearPhasePair`] - Sinc resampler path for the linear-phase mode (`std`)
//! - [`OversamplingNetwork`] - Both paths for one channel plus the [`LatencyTable`] (`std`)
//!
//! ## Shaping
//!
//! - [`BandSplitter`] - Three-band complementary TPT crossover
//! - [`Waveshaper`] - The inflation transfer curve
//!
//! ## Alignment & Metering
//!
//! - [`LatencyAligner`] - Dry-path delay compensation
//! - [`EnvelopeFollower`] - Peak/RMS level follower in the dB domain
//!
//! ## Parameters
//!
//! - [`ParameterInfo`] - Index-based parameter discovery
//! - [`SmoothedParam`] - One-pole parameter smoothing
//!
//! # no_std Support
//!
//! Everything except the linear-phase path works without `std` (it needs
//! `alloc`). Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! inflato-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use inflato_core::{BandSplitter, HalfBandCascade, OversampleFactor, Waveshaper};
//!
//! let factor = OversampleFactor::X2;
//! let mut cascade = HalfBandCascade::new(48000.0);
//! let mut split = BandSplitter::new(96000.0, 240.0, 2400.0);
//! let shaper = Waveshaper::new(0.0);
//!
//! let mut buf = [0.0; 2];
//! let mut out = Vec::new();
//! for i in 0..256 {
//!     let x = 0.5 * (i as f64 * 0.05).sin();
//!     cascade.upsample(x, factor, &mut buf);
//!     for s in &mut buf {
//!         *s = split.process_with(*s, |band| shaper.shape(band));
//!     }
//!     out.push(cascade.downsample(&mut buf, factor));
//! }
//! assert!(out.iter().all(|y| y.is_finite()));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod crossover;
pub mod design;
pub mod envelope;
pub mod halfband;
pub mod latency;
pub mod math;
#[cfg(feature = "std")]
pub mod network;
pub mod oversample;
pub mod param;
pub mod param_info;
#[cfg(feature = "std")]
pub mod resampler;
pub mod waveshaper;

// Re-export main types at crate root
pub use crossover::{BandSplitter, Bands, DEFAULT_HIGH_HZ, DEFAULT_LOW_HZ};
pub use design::{
    HalfBandParity, HalfBandSpec, bessel_i0, estimate_taps, kaiser_beta, kaiser_design,
};
pub use envelope::{DetectionMode, EnvelopeFollower};
pub use halfband::HalfBandStage;
pub use latency::LatencyAligner;
pub use math::{ANTI_DENORMAL_LEVEL, AntiDenormal, db_to_linear, flush_denormal, linear_to_db};
#[cfg(feature = "std")]
pub use network::{LatencyTable, OversamplingNetwork};
pub use oversample::{HalfBandCascade, MAX_OVERSAMPLE_FACTOR, OversampleFactor, PhaseMode};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
#[cfg(feature = "std")]
pub use resampler::{LinearPhasePair, ResamplerConstructionError, ResamplerQuality, SincResampler};
pub use waveshaper::{CURVE_MAX, CURVE_MIN, Waveshaper};
