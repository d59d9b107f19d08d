//! Remote-peer side of the protocol.
//!
//! - [`PeerResponder`]: answers `/setup`, records sensor readings, hands
//!   everything else back to the caller
//! - [`SweepPattern`]: walks a point around the unit square and turns its
//!   position into `/analogOutputs/0` and `/analogOutputs/1` updates
//!
//! Used by the `osc-peer` binary and by tests that need a live counterpart.

use core::f32::consts::TAU;

use crate::mapping::linlin;
use crate::osc::{ArgType, OscArg, OscMessage};
use crate::router::{analog_input_path, analog_output_path, SETUP_PATH, SETUP_REPLY_PATH};

/// What the responder did with one message.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerAction {
    /// Send this back to the bridge.
    Reply(OscMessage),
    /// A sensor reading was recorded.
    Reading(f32),
    /// Not handled here.
    Forward(OscMessage),
}

/// Answers the handshake and tracks the latest pressure reading.
#[derive(Debug, Clone)]
pub struct PeerResponder {
    sensor_path: String,
    latest: Option<f32>,
    readings: u64,
}

impl PeerResponder {
    /// Responder expecting readings on `<prefix>/analogInputs/<input>`.
    pub fn new(prefix: &str, input: usize) -> Self {
        Self {
            sensor_path: analog_input_path(prefix, input),
            latest: None,
            readings: 0,
        }
    }

    pub fn handle(&mut self, msg: OscMessage) -> PeerAction {
        if msg.address() == SETUP_PATH {
            return PeerAction::Reply(OscMessage::new(SETUP_REPLY_PATH));
        }
        if msg.address() == self.sensor_path && msg.has_signature(&[ArgType::Float32]) {
            if let [OscArg::Float(value)] = msg.args() {
                self.latest = Some(*value);
                self.readings += 1;
                return PeerAction::Reading(*value);
            }
        }
        PeerAction::Forward(msg)
    }

    /// Replies owed for `msg`, for use as a loopback responder.
    pub fn replies(&mut self, msg: &OscMessage) -> Vec<OscMessage> {
        match self.handle(msg.clone()) {
            PeerAction::Reply(reply) => vec![reply],
            _ => Vec::new(),
        }
    }

    pub fn latest(&self) -> Option<f32> {
        self.latest
    }

    pub fn readings(&self) -> u64 {
        self.readings
    }

    pub fn sensor_path(&self) -> &str {
        &self.sensor_path
    }
}

/// Highest LED frequency the sweep asks for (top edge of the square).
pub const SWEEP_MAX_FREQUENCY: f32 = 30.0;
/// Lowest LED frequency the sweep asks for (bottom edge).
pub const SWEEP_MIN_FREQUENCY: f32 = 1.0;

/// Point moving over the unit square on a slow Lissajous path.
#[derive(Debug, Clone)]
pub struct SweepPattern {
    red_path: String,
    green_path: String,
    t: f32,
    step: f32,
}

impl SweepPattern {
    /// `step` is the path parameter advance per [`advance`](Self::advance) call.
    pub fn new(prefix: &str, step: f32) -> Self {
        Self {
            red_path: analog_output_path(prefix, 0),
            green_path: analog_output_path(prefix, 1),
            t: 0.0,
            step,
        }
    }

    /// Current point, both coordinates in [0, 1].
    pub fn position(&self) -> (f32, f32) {
        let x = 0.5 * (1.0 + (self.t).sin());
        let y = 0.5 * (1.0 + (self.t * 0.5).cos());
        (x, y)
    }

    /// Messages for a point at `(x, y)`.
    ///
    /// Red amplitude follows x, green the opposite; both frequencies follow
    /// y from 30 Hz at y = 0 down to 1 Hz at y = 1.
    pub fn messages_at(&self, x: f32, y: f32) -> [OscMessage; 2] {
        let freq = linlin(y, 0.0, 1.0, SWEEP_MAX_FREQUENCY, SWEEP_MIN_FREQUENCY, true);
        [
            OscMessage::new(self.red_path.as_str())
                .with_float(linlin(x, 0.0, 1.0, 0.0, 1.0, true))
                .with_float(freq),
            OscMessage::new(self.green_path.as_str())
                .with_float(linlin(x, 0.0, 1.0, 1.0, 0.0, true))
                .with_float(freq),
        ]
    }

    /// Messages for the current point, then advance.
    pub fn advance(&mut self) -> [OscMessage; 2] {
        let (x, y) = self.position();
        self.t = (self.t + self.step) % (2.0 * TAU);
        self.messages_at(x, y)
    }
}
