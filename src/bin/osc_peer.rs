//! osc-peer - remote side of the bridge protocol
//!
//! Answers `/setup` with `/setup-reply`, logs pressure readings, and can
//! sweep both LEDs with a moving-point pattern.

use std::time::{Duration, Instant};

use clap::Parser;
use log::{debug, info, warn};

use analog_osc_bridge::log_sink;
use analog_osc_bridge::peer::{PeerAction, PeerResponder, SweepPattern};
use analog_osc_bridge::{Transport, UdpTransport};

/// Remote peer for analog-io
#[derive(Parser, Debug)]
#[command(name = "osc-peer", version, long_about = None)]
struct Args {
    /// Local UDP port to listen on
    #[arg(long, default_value_t = 7563)]
    local_port: u16,

    /// Bridge host name or address
    #[arg(long, default_value = "bela.local")]
    remote_host: String,

    /// Bridge UDP port
    #[arg(long, default_value_t = 7562)]
    remote_port: u16,

    /// Prefix for the analog paths (e.g. "/bela")
    #[arg(long, default_value = "")]
    address_prefix: String,

    /// Sensor input index to listen for
    #[arg(long, default_value_t = 0)]
    pressure_input: usize,

    /// Send a sweep update every N milliseconds (0 = no sweep)
    #[arg(long, default_value_t = 0)]
    sweep_ms: u64,

    /// Stop after this many seconds (0 = run until killed)
    #[arg(long, default_value_t = 0)]
    duration_s: u64,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

const IDLE_WAIT: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filters = std::env::var("RUST_LOG").ok();
    log_sink::host_logger(filters.as_deref(), args.verbose).init();

    let mut transport = UdpTransport::listen(args.local_port)?;
    transport.connect(args.remote_port, &args.remote_host)?;
    info!(
        "osc-peer on {}, bridge {}:{}",
        transport.local_addr()?,
        args.remote_host,
        args.remote_port
    );

    let mut responder = PeerResponder::new(&args.address_prefix, args.pressure_input);
    let mut sweep = (args.sweep_ms > 0).then(|| SweepPattern::new(&args.address_prefix, 0.02));
    let sweep_period = Duration::from_millis(args.sweep_ms);
    let started = Instant::now();
    let mut next_sweep = started;

    loop {
        if args.duration_s > 0 && started.elapsed() >= Duration::from_secs(args.duration_s) {
            break;
        }

        let wait = match sweep {
            Some(_) => next_sweep.saturating_duration_since(Instant::now()).min(IDLE_WAIT),
            None => IDLE_WAIT,
        };
        transport.wait_incoming(wait)?;

        while let Some(msg) = transport.poll_incoming() {
            match responder.handle(msg) {
                PeerAction::Reply(reply) => {
                    info!("handshake from bridge, replying {}", reply.address());
                    if let Err(e) = transport.send(&reply) {
                        warn!("reply failed: {}", e);
                    }
                }
                PeerAction::Reading(value) => info!("pressure {:.4}", value),
                PeerAction::Forward(other) => {
                    debug!("unhandled {} {:?}", other.address(), other.args())
                }
            }
        }

        if let Some(pattern) = sweep.as_mut() {
            if Instant::now() >= next_sweep {
                for msg in pattern.advance() {
                    if let Err(e) = transport.send(&msg) {
                        warn!("sweep send failed: {}", e);
                    }
                }
                next_sweep += sweep_period;
            }
        }
    }

    info!("received {} readings, last {:?}", responder.readings(), responder.latest());
    Ok(())
}
