//! OSC over UDP.
//!
//! The socket is non-blocking and registered with a mio [`Poll`], which is
//! only ever waited on by [`Transport::wait_incoming`] (setup). During
//! steady state, [`Transport::poll_incoming`] reads whatever the kernel has
//! queued and returns immediately.
//!
//! Every readable datagram is decoded as it is read. Invalid datagrams are
//! dropped whole and recorded in [`LinkHealth`]; valid ones (bundles
//! flattened) go into a bounded queue.

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mio::net::UdpSocket;
use mio::{Events, Interest, Poll, Token};

use super::{Transport, TransportError, INBOUND_QUEUE_CAPACITY};
use crate::health::{FaultCode, LinkHealth};
use crate::osc::{self, OscMessage};

const SOCKET: Token = Token(0);

/// Largest UDP payload over IPv4.
const MAX_DATAGRAM: usize = 65_507;

/// Non-blocking UDP transport.
pub struct UdpTransport {
    socket: UdpSocket,
    poll: Poll,
    events: Events,
    remote: Option<SocketAddr>,
    pending: VecDeque<OscMessage>,
    capacity: usize,
    recv_buf: Vec<u8>,
    send_buf: Vec<u8>,
    health: Arc<LinkHealth>,
}

impl UdpTransport {
    /// Listen on `port` on all IPv4 interfaces.
    pub fn listen(port: u16) -> Result<Self, TransportError> {
        Self::bind(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port)))
    }

    /// Listen on an explicit local address (port 0 picks a free one).
    pub fn bind(local: SocketAddr) -> Result<Self, TransportError> {
        let mut socket = UdpSocket::bind(local)?;
        let poll = Poll::new()?;
        poll.registry()
            .register(&mut socket, SOCKET, Interest::READABLE)?;

        Ok(Self {
            socket,
            poll,
            events: Events::with_capacity(8),
            remote: None,
            pending: VecDeque::with_capacity(INBOUND_QUEUE_CAPACITY),
            capacity: INBOUND_QUEUE_CAPACITY,
            recv_buf: vec![0u8; MAX_DATAGRAM],
            send_buf: Vec::with_capacity(256),
            health: Arc::new(LinkHealth::new()),
        })
    }

    /// Record faults into a shared health block instead of a private one.
    pub fn with_health(mut self, health: Arc<LinkHealth>) -> Self {
        self.health = health;
        self
    }

    /// Change the inbound queue bound (minimum 1).
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Resolve `host` and send all further messages to `host:port`.
    ///
    /// IPv4 results are preferred since the socket is bound on IPv4.
    pub fn connect(&mut self, port: u16, host: &str) -> Result<(), TransportError> {
        let resolve_err = || TransportError::Resolve {
            host: host.to_string(),
            port,
        };
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|_| resolve_err())?
            .collect();
        let addr = addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(resolve_err)?;

        self.remote = Some(addr);
        Ok(())
    }

    /// Send to an already-resolved address.
    pub fn set_remote(&mut self, remote: SocketAddr) {
        self.remote = Some(remote);
    }

    pub fn remote(&self) -> Option<SocketAddr> {
        self.remote
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }

    pub fn health(&self) -> &Arc<LinkHealth> {
        &self.health
    }

    /// Messages decoded but not yet polled.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Read every datagram the kernel has queued. Never blocks.
    ///
    /// Returns the number of datagrams read.
    fn read_available(&mut self) -> usize {
        let mut datagrams = 0;
        loop {
            match self.socket.recv_from(&mut self.recv_buf) {
                Ok((len, _from)) => {
                    datagrams += 1;
                    self.accept(len);
                }
                Err(e) => {
                    if !self.keep_reading(&e) {
                        break;
                    }
                }
            }
        }
        datagrams
    }

    /// Classify a receive error: `true` to keep draining, `false` to stop.
    ///
    /// Unexpected errors are latched as [`FaultCode::SocketError`] with the
    /// OS errno (0 if none) so a stalled socket shows up in the counters.
    fn keep_reading(&self, e: &std::io::Error) -> bool {
        match e.kind() {
            ErrorKind::WouldBlock => false,
            ErrorKind::Interrupted => true,
            // ICMP port-unreachable from an earlier send; not our data.
            ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset => true,
            _ => {
                let errno = e.raw_os_error().unwrap_or(0);
                self.health.set(FaultCode::SocketError, errno.unsigned_abs());
                false
            }
        }
    }

    fn accept(&mut self, len: usize) {
        match osc::decode_packet(&self.recv_buf[..len]) {
            Ok(messages) => {
                for msg in messages {
                    if self.pending.len() >= self.capacity {
                        self.health.set(FaultCode::InboundOverflow, self.capacity as u32);
                        continue;
                    }
                    self.pending.push_back(msg);
                }
            }
            Err(_) => self.health.set(FaultCode::MalformedPacket, len as u32),
        }
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, msg: &OscMessage) -> Result<(), TransportError> {
        let remote = self.remote.ok_or(TransportError::NotConnected)?;

        self.send_buf.clear();
        osc::encode_into(msg, &mut self.send_buf);

        match self.socket.send_to(&self.send_buf, remote) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Err(TransportError::WouldBlock),
            Err(e) => Err(e.into()),
        }
    }

    fn poll_incoming(&mut self) -> Option<OscMessage> {
        if self.pending.is_empty() {
            self.read_available();
        }
        self.pending.pop_front()
    }

    fn wait_incoming(&mut self, timeout: Duration) -> Result<bool, TransportError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.pending.is_empty() {
                self.read_available();
            }
            if !self.pending.is_empty() {
                return Ok(true);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }

            // Edge-triggered: the socket was drained to WouldBlock above.
            match self.poll.poll(&mut self.events, Some(remaining)) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}
