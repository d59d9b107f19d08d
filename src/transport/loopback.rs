//! In-memory transport.
//!
//! Messages "received" are whatever the test injected; messages "sent" are
//! kept for inspection. An optional responder plays the remote peer: it sees
//! every sent message and its replies become inbound traffic.

use std::collections::VecDeque;
use std::time::Duration;

use super::{Transport, TransportError};
use crate::osc::OscMessage;

type Responder = Box<dyn FnMut(&OscMessage) -> Vec<OscMessage>>;

/// Transport backed by two in-process queues.
#[derive(Default)]
pub struct LoopbackTransport {
    inbound: VecDeque<OscMessage>,
    delayed: VecDeque<OscMessage>,
    sent: Vec<OscMessage>,
    responder: Option<Responder>,
    fail_sends: bool,
    waits: Vec<Duration>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to every sent message with whatever `responder` returns.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: FnMut(&OscMessage) -> Vec<OscMessage> + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Make the next messages available to `poll_incoming` immediately.
    pub fn inject(&mut self, msg: OscMessage) {
        self.inbound.push_back(msg);
    }

    /// Deliver `msg` only once someone waits, as if it arrived mid-timeout.
    pub fn inject_during_wait(&mut self, msg: OscMessage) {
        self.delayed.push_back(msg);
    }

    /// Make every `send` fail, as an unreachable network would.
    pub fn set_fail_sends(&mut self, fail: bool) {
        self.fail_sends = fail;
    }

    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> &[OscMessage] {
        &self.sent
    }

    pub fn take_sent(&mut self) -> Vec<OscMessage> {
        std::mem::take(&mut self.sent)
    }

    /// Messages waiting to be polled.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Timeouts passed to `wait_incoming`, in call order.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl Transport for LoopbackTransport {
    fn send(&mut self, msg: &OscMessage) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::WouldBlock);
        }
        self.sent.push(msg.clone());
        if let Some(responder) = self.responder.as_mut() {
            self.inbound.extend(responder(msg));
        }
        Ok(())
    }

    fn poll_incoming(&mut self) -> Option<OscMessage> {
        self.inbound.pop_front()
    }

    fn wait_incoming(&mut self, timeout: Duration) -> Result<bool, TransportError> {
        self.waits.push(timeout);
        self.inbound.extend(self.delayed.drain(..));
        Ok(!self.inbound.is_empty())
    }
}
