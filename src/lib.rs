//! # AnalogOscBridge
//!
//! LED modulation and pressure sensing driven over OSC.
//!
//! ## Architecture
//!
//! One fixed-rate render callback owns all session state:
//! - Handshake runs once in [`Session::setup`] (the only blocking wait)
//! - [`Session::render`] drains inbound messages, modulates both LEDs,
//!   samples the pressure input and emits at most one status message
//! - No threads, no locks, no allocation-heavy work in the render path
//!
//! Host platform and message transport are collaborators behind the
//! [`AnalogBlock`] and [`Transport`] traits, so the core runs unchanged
//! against real sockets or the in-memory [`LoopbackTransport`].

pub mod config;
pub mod console;
pub mod handshake;
pub mod health;
pub mod io;
pub mod log_sink;
pub mod logging;
pub mod mapping;
pub mod osc;
pub mod peer;
pub mod platform;
pub mod router;
pub mod session;
pub mod signal;
pub mod transport;

pub use config::BridgeConfig;
pub use handshake::perform_handshake;
pub use health::{FaultCode, LinkHealth};
pub use io::{AnalogBlock, BlockBuffer};
pub use logging::{LogStream, BG_LOG_STREAM, RT_LOG_STREAM};
pub use osc::{ArgType, OscArg, OscMessage};
pub use router::{Emitter, Router};
pub use session::Session;
pub use signal::{ChannelState, SensorSampler};
pub use transport::{LoopbackTransport, Transport, TransportError, UdpTransport};
