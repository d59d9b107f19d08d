//! Signal generation and sensor sampling.
//!
//! Architecture:
//! - Generator: float phase accumulator per LED channel, sine mapped into
//!   the LED-safe output band
//! - Sampler: forwards one raw input reading per frame, keeps the latest

pub mod generator;
pub mod sampler;

pub use generator::{led_output, ChannelState, Led, LedChannels, AMPLITUDE_RANGE, MINIMUM_AMPLITUDE};
pub use sampler::SensorSampler;
