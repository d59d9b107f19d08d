//! Startup readiness check with the remote peer.
//!
//! ```text
//! bridge                       peer
//!   │ ── /setup ─────────────▶  │
//!   │ ◀──────────── /setup-reply│   (within timeout)
//! ```
//!
//! Runs once, before the first render block; this is the only place the
//! bridge blocks. Failure is logged and latched in [`LinkHealth`] but never
//! stops startup: the render loop runs with or without a peer.

use std::time::Duration;

use crate::health::{FaultCode, LinkHealth};
use crate::logging::LogStream;
use crate::osc::OscMessage;
use crate::router::{SETUP_PATH, SETUP_REPLY_PATH};
use crate::transport::Transport;
use crate::{rt_info, rt_warn};

/// Send `/setup` and wait up to `timeout` for `/setup-reply`.
///
/// Once anything has arrived, every queued message is drained and the
/// result is the OR over all of them: a reply counts no matter how many
/// unrelated messages came before or after it. Non-reply messages are
/// consumed and discarded.
///
/// Logged at stream time 0 since no frame has been rendered yet.
pub fn perform_handshake<T: Transport + ?Sized>(
    transport: &mut T,
    timeout: Duration,
    log: &LogStream,
    health: &LinkHealth,
) -> bool {
    if let Err(e) = transport.send(&OscMessage::new(SETUP_PATH)) {
        rt_warn!(log, 0, "handshake: could not send {}: {}", SETUP_PATH, e);
        health.set(FaultCode::SendFailed, 0);
    } else {
        health.record_sent();
    }

    let arrived = match transport.wait_incoming(timeout) {
        Ok(arrived) => arrived,
        Err(e) => {
            rt_warn!(log, 0, "handshake: wait failed: {}", e);
            false
        }
    };

    let mut handshake_received = false;
    if arrived {
        while let Some(msg) = transport.poll_incoming() {
            health.record_received();
            handshake_received |= msg.address() == SETUP_REPLY_PATH;
        }
    }

    health.set_handshake_ok(handshake_received);
    if handshake_received {
        rt_info!(log, 0, "handshake received!");
    } else {
        rt_warn!(log, 0, "timeout! no {} within {} ms", SETUP_REPLY_PATH, timeout.as_millis());
        health.set(FaultCode::HandshakeTimeout, timeout.as_millis().min(u32::MAX as u128) as u32);
    }
    handshake_received
}
