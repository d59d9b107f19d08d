//! Platform collaborators.
//!
//! The core only sees [`AnalogBlock`](crate::io::AnalogBlock) and
//! [`Transport`](crate::transport::Transport). This module supplies the
//! host-side pieces that stand in for the real-time framework: a fixed-rate
//! block clock and a simulated pressure sensor.

pub mod host;

pub use host::{BlockClock, HostRunner, SimulatedSensor};
