//! Host-side stand-in for the real-time framework.
//!
//! ```text
//! loop {
//!     fill inputs (sensor)  →  session.render(block)  →  wait for next tick
//! }
//! ```
//!
//! The block period is `frames_per_block / sample_rate`. Deadlines are
//! absolute, so a late block does not shift every later one; if the host
//! falls more than one block behind, the clock skips ahead instead of
//! bursting to catch up.

use std::time::{Duration, Instant};

use core::f32::consts::TAU;

use crate::config::BridgeConfig;
use crate::io::BlockBuffer;
use crate::session::{BlockReport, Session};
use crate::transport::Transport;

/// Fixed-rate tick clock.
#[derive(Debug, Clone)]
pub struct BlockClock {
    period: Duration,
    next: Instant,
    overruns: u64,
}

impl BlockClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
            overruns: 0,
        }
    }

    /// Clock for `frames_per_block` frames at `sample_rate`.
    pub fn for_blocks(sample_rate: f32, frames_per_block: usize) -> Self {
        let secs = frames_per_block as f64 / sample_rate as f64;
        Self::new(Duration::from_secs_f64(secs.max(0.0)))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Blocks whose deadline had already passed when they finished.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Sleep until the next deadline, then advance it by one period.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next {
            std::thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            self.overruns += 1;
            self.next = now + self.period;
        }
    }
}

/// Slow pressure sweep in [0, 1], standing in for the analog input.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSensor {
    phase: f32,
    increment: f32,
}

impl SimulatedSensor {
    /// Sensor cycling once every `period_s` seconds at `sample_rate`.
    pub fn new(period_s: f32, sample_rate: f32) -> Self {
        let increment = if period_s > 0.0 && sample_rate > 0.0 {
            TAU / (period_s * sample_rate)
        } else {
            0.0
        };
        Self { phase: 0.0, increment }
    }

    /// Next reading.
    pub fn next_value(&mut self) -> f32 {
        let value = 0.5 * (1.0 - self.phase.cos());
        self.phase = (self.phase + self.increment) % TAU;
        value
    }
}

/// Drives a session at the configured block rate against a host block.
pub struct HostRunner {
    block: BlockBuffer,
    clock: BlockClock,
    sensor: SimulatedSensor,
    pressure_input: usize,
    blocks: u64,
}

impl HostRunner {
    pub fn new(config: &BridgeConfig) -> Self {
        let analog = &config.analog;
        Self {
            block: BlockBuffer::new(
                analog.frames_per_block,
                analog.input_channels,
                analog.output_channels,
            ),
            clock: BlockClock::for_blocks(analog.sample_rate, analog.frames_per_block),
            sensor: SimulatedSensor::new(4.0, analog.sample_rate),
            pressure_input: analog.pressure_input,
            blocks: 0,
        }
    }

    /// Fill inputs and render one block, without waiting.
    pub fn step<T: Transport + ?Sized>(
        &mut self,
        session: &mut Session<'_>,
        transport: &mut T,
    ) -> BlockReport {
        let sensor = &mut self.sensor;
        self.block
            .fill_input(self.pressure_input, |_| sensor.next_value());
        self.blocks += 1;
        session.render(&mut self.block, transport)
    }

    /// Render one block, then wait for the next tick.
    pub fn tick<T: Transport + ?Sized>(
        &mut self,
        session: &mut Session<'_>,
        transport: &mut T,
    ) -> BlockReport {
        let report = self.step(session, transport);
        self.clock.wait();
        report
    }

    /// The block as left by the last render.
    pub fn block(&self) -> &BlockBuffer {
        &self.block
    }

    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    pub fn clock(&self) -> &BlockClock {
        &self.clock
    }
}
