//! CLI command implementations.

pub mod common;
pub mod info;
pub mod latency;
pub mod presets;
pub mod process;
