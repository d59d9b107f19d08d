//! AnalogOscBridge - device-side entry point
//!
//! 1. Load configuration (file → environment → CLI)
//! 2. Open the UDP endpoint and run the handshake (setup callback)
//! 3. Drive the render callback at the block rate
//! 4. Between blocks: drain RT logs, run console commands

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};

use analog_osc_bridge::config::{self, BridgeConfig};
use analog_osc_bridge::platform::HostRunner;
use analog_osc_bridge::{console, log_sink, LinkHealth, Session, UdpTransport, RT_LOG_STREAM};

/// LED modulation and pressure sensing over OSC
#[derive(Parser, Debug)]
#[command(name = "analog-io", version, long_about = None)]
struct Args {
    /// TOML config file (default: $ANALOG_OSC_CONFIG_PATH, else built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local UDP port to listen on
    #[arg(long)]
    local_port: Option<u16>,

    /// Peer host name or address
    #[arg(long)]
    remote_host: Option<String>,

    /// Peer UDP port
    #[arg(long)]
    remote_port: Option<u16>,

    /// Handshake timeout in milliseconds
    #[arg(long)]
    handshake_timeout_ms: Option<u64>,

    /// Analog sample rate in Hz
    #[arg(long)]
    sample_rate: Option<f32>,

    /// Frames per render block
    #[arg(long)]
    frames_per_block: Option<usize>,

    /// Sensor message interval in milliseconds
    #[arg(long)]
    send_interval_ms: Option<f32>,

    /// Prefix for the analog paths (e.g. "/bela")
    #[arg(long)]
    address_prefix: Option<String>,

    /// Stop after this many blocks (0 = run until killed)
    #[arg(long, default_value_t = 0)]
    blocks: u64,

    /// Do not read console commands from stdin
    #[arg(long, default_value_t = false)]
    no_console: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn apply_to(&self, config: &mut BridgeConfig) {
        if let Some(port) = self.local_port {
            config.network.local_port = port;
        }
        if let Some(host) = &self.remote_host {
            config.network.remote_host = host.clone();
        }
        if let Some(port) = self.remote_port {
            config.network.remote_port = port;
        }
        if let Some(ms) = self.handshake_timeout_ms {
            config.network.handshake_timeout_ms = ms;
        }
        if let Some(rate) = self.sample_rate {
            config.analog.sample_rate = rate;
        }
        if let Some(frames) = self.frames_per_block {
            config.analog.frames_per_block = frames;
        }
        if let Some(ms) = self.send_interval_ms {
            config.osc.send_interval_ms = ms;
        }
        if let Some(prefix) = &self.address_prefix {
            config.osc.address_prefix = prefix.clone();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logger(args.verbose);
    log_sink::sync_levels_with_facade();

    info!("{}", env!("VERSION_STRING"));

    let mut config = config::load_config(args.config.as_deref())?;
    args.apply_to(&mut config);
    config.validate()?;

    let net = &config.network;
    let health = Arc::new(LinkHealth::new());
    let mut transport = UdpTransport::listen(net.local_port)?.with_health(Arc::clone(&health));
    transport.connect(net.remote_port, &net.remote_host)?;
    info!(
        "listening on {}, peer {}:{}",
        transport.local_addr()?,
        net.remote_host,
        net.remote_port
    );

    let mut session = Session::setup(&config, &mut transport, &RT_LOG_STREAM, &health);
    log_sink::forward();
    if !session.handshake_ok() {
        warn!("continuing without peer");
    }

    let mut commands = if args.no_console { None } else { Some(spawn_console_reader()) };
    let mut runner = HostRunner::new(&config);
    let mut output = String::new();

    while args.blocks == 0 || runner.blocks() < args.blocks {
        runner.tick(&mut session, &mut transport);

        let closed = commands
            .as_ref()
            .is_some_and(|rx| !run_pending_commands(rx, &mut session, &mut output));
        if closed {
            info!("stdin closed, console disabled");
            commands = None;
        }
        log_sink::forward();
    }

    log_sink::forward();
    let h = health.snapshot();
    info!(
        "stopped after {} blocks: received={} applied={} ignored={} sent={} faults={} overruns={}",
        runner.blocks(),
        h.received,
        h.applied,
        h.ignored,
        h.sent,
        h.faults,
        runner.clock().overruns()
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
fn init_logger(_verbose: bool) {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
}

#[cfg(not(target_os = "espidf"))]
fn init_logger(verbose: bool) {
    let filters = std::env::var("RUST_LOG").ok();
    log_sink::host_logger(filters.as_deref(), verbose).init();
}

/// Read stdin lines on a helper thread. Commands run on the render thread.
fn spawn_console_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run every queued command. Returns `false` once stdin has closed.
fn run_pending_commands(rx: &Receiver<String>, session: &mut Session<'_>, output: &mut String) -> bool {
    loop {
        match rx.try_recv() {
            Ok(line) => {
                output.clear();
                // Errors are already written to `output` with their code.
                let _ = console::execute_line(&line, session, output);
                print!("{}", output);
            }
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}
