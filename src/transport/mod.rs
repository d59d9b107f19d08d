//! Message transport.
//!
//! The core only needs four things from a transport: send a message, take
//! one already-received message without blocking, and (during setup only)
//! wait a bounded time for something to arrive. Endpoints are fixed when the
//! transport is built (`listen(port)` + `connect(port, host)`).
//!
//! - [`UdpTransport`]: OSC over non-blocking UDP (mio)
//! - [`LoopbackTransport`]: in-memory, for tests and offline runs

pub mod loopback;
pub mod udp;

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::osc::OscMessage;

pub use loopback::LoopbackTransport;
pub use udp::UdpTransport;

/// Bound on messages buffered between polls. Extra messages are discarded.
pub const INBOUND_QUEUE_CAPACITY: usize = 64;

/// Transport-level failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    #[error("could not resolve {host}:{port}")]
    Resolve { host: String, port: u16 },

    #[error("no remote endpoint (call connect first)")]
    NotConnected,

    #[error("socket not ready for writing, message dropped")]
    WouldBlock,
}

/// Message transport used by the session.
pub trait Transport {
    /// Send one message to the remote peer.
    fn send(&mut self, msg: &OscMessage) -> Result<(), TransportError>;

    /// Take one received message, if any. Never blocks.
    fn poll_incoming(&mut self) -> Option<OscMessage>;

    /// Block up to `timeout` until at least one message is available.
    ///
    /// Returns `Ok(true)` if a message is ready for
    /// [`poll_incoming`](Self::poll_incoming), `Ok(false)` on timeout.
    /// Only called during setup.
    fn wait_incoming(&mut self, timeout: Duration) -> Result<bool, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, msg: &OscMessage) -> Result<(), TransportError> {
        (**self).send(msg)
    }

    fn poll_incoming(&mut self) -> Option<OscMessage> {
        (**self).poll_incoming()
    }

    fn wait_incoming(&mut self, timeout: Duration) -> Result<bool, TransportError> {
        (**self).wait_incoming(timeout)
    }
}
