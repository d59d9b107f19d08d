//! Inbound dispatch table.
//!
//! Each route is `(path, signature, handler)`. For every incoming message:
//!
//! 1. Match the message's address (which may be an OSC pattern) against
//!    each route path.
//! 2. On a path match, require the exact signature: same arity, same types.
//! 3. Only then run the handler. A failed check applies nothing.
//!
//! Several routes can fire for one message if its address pattern covers
//! them (e.g. `/analogOutputs/*`).

use crate::logging::LogStream;
use crate::osc::{self, ArgType, OscArg, OscMessage};
use crate::signal::{Led, LedChannels};
use crate::{rt_debug, rt_info, rt_warn};

use super::{analog_output_path, TEST_PATH};

/// Everything a handler may touch.
pub struct RouteContext<'a> {
    pub leds: &'a mut LedChannels,
    pub log: &'a LogStream,
    pub timestamp_us: i64,
    pub sample_rate: f32,
}

/// Route handler. Receives arguments already checked against the signature.
pub type Handler = Box<dyn Fn(&mut RouteContext<'_>, &[OscArg])>;

/// One entry of the dispatch table.
pub struct Route {
    path: String,
    signature: &'static [ArgType],
    handler: Handler,
}

impl Route {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn signature(&self) -> &'static [ArgType] {
        self.signature
    }
}

/// Result of dispatching one message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Routes whose path and signature matched; handler ran.
    pub applied: usize,
    /// Routes whose path matched but signature did not; nothing applied.
    pub rejected: usize,
}

impl DispatchOutcome {
    /// No route path matched at all.
    pub fn is_unmatched(&self) -> bool {
        self.applied == 0 && self.rejected == 0
    }
}

const LED_SIGNATURE: &[ArgType] = &[ArgType::Float32, ArgType::Float32];
const TEST_SIGNATURE: &[ArgType] = &[ArgType::Int32, ArgType::Float32];

/// Path → (signature, handler) table.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Empty table; every message is ignored.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// The bridge's routes: both LED outputs plus the test path.
    ///
    /// `prefix` is prepended to the LED paths (empty for `/analogOutputs/n`,
    /// `/bela` for peers using `/bela/analogOutputs/n`).
    pub fn with_default_routes(prefix: &str) -> Self {
        let mut router = Self::new();
        for led in Led::ALL {
            router.add(
                analog_output_path(prefix, led.index()),
                LED_SIGNATURE,
                move |ctx, args| set_led(ctx, led, args),
            );
        }
        router.add(TEST_PATH, TEST_SIGNATURE, log_test_message);
        router
    }

    /// Register a route.
    pub fn add<F>(&mut self, path: impl Into<String>, signature: &'static [ArgType], handler: F)
    where
        F: Fn(&mut RouteContext<'_>, &[OscArg]) + 'static,
    {
        self.routes.push(Route {
            path: path.into(),
            signature,
            handler: Box::new(handler),
        });
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Dispatch one message to every matching route.
    pub fn dispatch(&self, msg: &OscMessage, ctx: &mut RouteContext<'_>) -> DispatchOutcome {
        rt_debug!(ctx.log, ctx.timestamp_us, "received message to: {}", msg.address());

        let mut outcome = DispatchOutcome::default();
        for route in &self.routes {
            if !osc::matches(msg.address(), &route.path) {
                continue;
            }
            if msg.has_signature(route.signature) {
                (route.handler)(ctx, msg.args());
                outcome.applied += 1;
            } else {
                rt_debug!(
                    ctx.log,
                    ctx.timestamp_us,
                    "{}: argument mismatch ({} args), ignored",
                    route.path,
                    msg.args().len()
                );
                outcome.rejected += 1;
            }
        }
        outcome
    }
}

fn set_led(ctx: &mut RouteContext<'_>, led: Led, args: &[OscArg]) {
    let [OscArg::Float(amplitude), OscArg::Float(frequency)] = args else {
        return;
    };
    let (amplitude, frequency) = (*amplitude, *frequency);

    // Values are applied as sent; out-of-band ones are only flagged.
    if !amplitude.is_finite() || !(0.0..=1.0).contains(&amplitude) {
        rt_warn!(
            ctx.log,
            ctx.timestamp_us,
            "{} amplitude {} outside [0, 1], output leaves LED band",
            led.name(),
            amplitude
        );
    }
    if !frequency.is_finite() || frequency < 0.0 || frequency >= ctx.sample_rate * 0.5 {
        rt_warn!(
            ctx.log,
            ctx.timestamp_us,
            "{} frequency {} Hz outside [0, {}) Hz",
            led.name(),
            frequency,
            ctx.sample_rate * 0.5
        );
    }

    ctx.leds.get_mut(led).set(amplitude, frequency);
}

fn log_test_message(ctx: &mut RouteContext<'_>, args: &[OscArg]) {
    if let [OscArg::Int(i), OscArg::Float(f)] = args {
        rt_info!(ctx.log, ctx.timestamp_us, "received int {} and float {}", i, f);
    }
}
