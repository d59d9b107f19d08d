//! Session state and the two platform callbacks.
//!
//! All mutable state lives in [`Session`], owned by whatever drives the
//! render callback. There are no globals and no locks: setup completes
//! before the first render, and every render runs on the same thread.
//!
//! Per block, in order:
//!
//! ```text
//! 1. ingest   poll transport (≤ max_messages_per_block) → router
//! 2. frames   for each frame: write red/green, advance phases, read sensor
//! 3. emit     emission counter → at most one sensor message
//! ```

use std::time::Duration;

use crate::config::BridgeConfig;
use crate::handshake::perform_handshake;
use crate::health::{FaultCode, LinkHealth};
use crate::io::AnalogBlock;
use crate::logging::LogStream;
use crate::osc::OscMessage;
use crate::router::{analog_input_path, DispatchOutcome, Emitter, RouteContext, Router};
use crate::signal::{LedChannels, SensorSampler};
use crate::transport::Transport;
use crate::{rt_info, rt_warn};

/// What one render block did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockReport {
    /// Messages taken from the transport this block.
    pub received: usize,
    /// Whether a sensor message was handed to the transport.
    pub emitted: bool,
}

/// Explicit session state shared by setup and render.
pub struct Session<'a> {
    config: BridgeConfig,
    leds: LedChannels,
    sampler: SensorSampler,
    router: Router,
    emitter: Emitter,
    inverse_sample_rate: f32,
    frames_elapsed: u64,
    handshake_ok: bool,
    log: &'a LogStream,
    health: &'a LinkHealth,
}

impl<'a> Session<'a> {
    /// Build session state from a validated config, without any network I/O.
    pub fn new(config: &BridgeConfig, log: &'a LogStream, health: &'a LinkHealth) -> Self {
        let analog = &config.analog;
        let prefix = config.osc.address_prefix.as_str();

        Self {
            config: config.clone(),
            leds: LedChannels::new(config.led.default_frequency_hz, config.led.default_amplitude),
            sampler: SensorSampler::new(analog.pressure_input),
            router: Router::with_default_routes(prefix),
            emitter: Emitter::from_interval(
                analog_input_path(prefix, analog.pressure_input),
                config.osc.send_interval_ms,
                analog.sample_rate,
                analog.frames_per_block,
            ),
            inverse_sample_rate: 1.0 / analog.sample_rate,
            frames_elapsed: 0,
            handshake_ok: false,
            log,
            health,
        }
    }

    /// Setup callback: build state, then run the handshake once.
    ///
    /// A failed handshake is logged and the session is returned anyway.
    pub fn setup<T: Transport + ?Sized>(
        config: &BridgeConfig,
        transport: &mut T,
        log: &'a LogStream,
        health: &'a LinkHealth,
    ) -> Self {
        let mut session = Self::new(config, log, health);
        let timeout = Duration::from_millis(config.network.handshake_timeout_ms);
        session.handshake_ok = perform_handshake(transport, timeout, log, health);

        rt_info!(
            log,
            0,
            "OSC send rate: every {} blocks ({} frames/block, {} Hz)",
            session.emitter.threshold(),
            config.analog.frames_per_block,
            config.analog.sample_rate
        );
        session
    }

    /// Render callback. Never blocks.
    pub fn render<B, T>(&mut self, block: &mut B, transport: &mut T) -> BlockReport
    where
        B: AnalogBlock + ?Sized,
        T: Transport + ?Sized,
    {
        let mut report = BlockReport::default();

        while report.received < self.config.osc.max_messages_per_block {
            let Some(msg) = transport.poll_incoming() else {
                break;
            };
            report.received += 1;
            self.health.record_received();
            self.route(&msg);
        }

        let red_pin = self.config.analog.red_output;
        let green_pin = self.config.analog.green_output;
        for frame in 0..block.frames() {
            let red = self.leds.red.advance(self.inverse_sample_rate);
            let green = self.leds.green.advance(self.inverse_sample_rate);
            block.analog_write(frame, red_pin, red);
            block.analog_write(frame, green_pin, green);
            self.sampler.sample(&*block, frame);
        }
        self.frames_elapsed += block.frames() as u64;

        if let Some(msg) = self.emitter.emit_if_due(self.sampler.last()) {
            match transport.send(&msg) {
                Ok(()) => {
                    self.health.record_sent();
                    report.emitted = true;
                }
                Err(e) => {
                    self.health.set(FaultCode::SendFailed, 0);
                    rt_warn!(self.log, self.timestamp_us(), "send {} failed: {}", msg.address(), e);
                }
            }
        }

        report
    }

    /// Route one message through the dispatch table.
    ///
    /// Used by render for network traffic and by the console for local
    /// commands, so both obey the same argument contract.
    pub fn route(&mut self, msg: &OscMessage) -> DispatchOutcome {
        let mut ctx = RouteContext {
            leds: &mut self.leds,
            log: self.log,
            timestamp_us: frames_to_us(self.frames_elapsed, self.config.analog.sample_rate),
            sample_rate: self.config.analog.sample_rate,
        };
        let outcome = self.router.dispatch(msg, &mut ctx);
        if outcome.applied > 0 {
            self.health.record_applied();
        } else {
            self.health.record_ignored();
        }
        outcome
    }

    /// Stream time of the next frame, in microseconds.
    pub fn timestamp_us(&self) -> i64 {
        frames_to_us(self.frames_elapsed, self.config.analog.sample_rate)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn leds(&self) -> &LedChannels {
        &self.leds
    }

    pub fn sampler(&self) -> &SensorSampler {
        &self.sampler
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn frames_elapsed(&self) -> u64 {
        self.frames_elapsed
    }

    pub fn inverse_sample_rate(&self) -> f32 {
        self.inverse_sample_rate
    }

    pub fn handshake_ok(&self) -> bool {
        self.handshake_ok
    }

    pub fn log(&self) -> &'a LogStream {
        self.log
    }

    pub fn health(&self) -> &'a LinkHealth {
        self.health
    }
}

fn frames_to_us(frames: u64, sample_rate: f32) -> i64 {
    (frames as f64 * 1_000_000.0 / sample_rate as f64) as i64
}
