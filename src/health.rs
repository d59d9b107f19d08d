//! Link health: fault state and message counters.
//!
//! Nothing here ever stops the render loop. A handshake timeout or a failed
//! send degrades the link and is recorded; the LEDs keep running on the last
//! parameters received.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes indicating why the link is degraded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// No `/setup-reply` arrived within the handshake timeout.
    HandshakeTimeout = 1,

    /// An outgoing datagram could not be sent.
    SendFailed = 2,

    /// An incoming datagram was not a valid OSC packet.
    MalformedPacket = 3,

    /// The inbound queue was full and a message was discarded.
    InboundOverflow = 4,

    /// Reading the socket failed with an unexpected error (data: OS errno).
    SocketError = 5,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::HandshakeTimeout,
            2 => FaultCode::SendFailed,
            3 => FaultCode::MalformedPacket,
            4 => FaultCode::InboundOverflow,
            5 => FaultCode::SocketError,
            _ => FaultCode::None,
        }
    }

    /// Short label for console output.
    pub fn as_str(self) -> &'static str {
        match self {
            FaultCode::None => "none",
            FaultCode::HandshakeTimeout => "handshake-timeout",
            FaultCode::SendFailed => "send-failed",
            FaultCode::MalformedPacket => "malformed-packet",
            FaultCode::InboundOverflow => "inbound-overflow",
            FaultCode::SocketError => "socket-error",
        }
    }
}

/// Thread-safe link health.
///
/// Shared by the transport (decode/overflow faults), the handshake and the
/// session (routing and send counters).
pub struct LinkHealth {
    /// True if a fault is latched.
    active: AtomicBool,
    /// Most recent fault code.
    code: AtomicU8,
    /// Fault detail (e.g. dropped byte count, timeout in ms).
    data: AtomicU32,
    /// Total faults since start (never cleared).
    count: AtomicU32,

    handshake_ok: AtomicBool,
    received: AtomicU32,
    applied: AtomicU32,
    ignored: AtomicU32,
    sent: AtomicU32,
}

impl LinkHealth {
    /// Create a healthy link.
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
            handshake_ok: AtomicBool::new(false),
            received: AtomicU32::new(0),
            applied: AtomicU32::new(0),
            ignored: AtomicU32::new(0),
            sent: AtomicU32::new(0),
        }
    }

    /// Latch a fault and bump the fault counter.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Most recent fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Total faults since start.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear the latched fault. The counter is kept for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    #[inline]
    pub fn set_handshake_ok(&self, ok: bool) {
        self.handshake_ok.store(ok, Ordering::Release);
    }

    #[inline]
    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_applied(&self) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the current link state.
    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            faults: self.count(),
            handshake_ok: self.handshake_ok.load(Ordering::Acquire),
            received: self.received.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
        }
    }
}

impl Default for LinkHealth {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of link health at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub faults: u32,
    pub handshake_ok: bool,
    pub received: u32,
    pub applied: u32,
    pub ignored: u32,
    pub sent: u32,
}
