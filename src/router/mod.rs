//! Control-message router.
//!
//! - Inbound: a dispatch table from OSC path to argument signature and
//!   handler. A route fires only on an exact signature match; anything else
//!   is dropped without touching state.
//! - Outbound: an emission counter that turns the latest pressure reading
//!   into one status message every N render blocks.

pub mod dispatch;
pub mod emitter;

pub use dispatch::{DispatchOutcome, Handler, Route, RouteContext, Router};
pub use emitter::Emitter;

/// Sent once at startup to ask the peer whether it is ready.
pub const SETUP_PATH: &str = "/setup";

/// Peer's answer to [`SETUP_PATH`].
pub const SETUP_REPLY_PATH: &str = "/setup-reply";

/// Diagnostic path carrying `(int32, float32)`; logged, never applied.
pub const TEST_PATH: &str = "/osc-test";

/// Address controlling analog output `index`, e.g. `/analogOutputs/0`.
pub fn analog_output_path(prefix: &str, index: usize) -> String {
    format!("{}/analogOutputs/{}", prefix, index)
}

/// Address carrying analog input `index`, e.g. `/analogInputs/0`.
pub fn analog_input_path(prefix: &str, index: usize) -> String {
    format!("{}/analogInputs/{}", prefix, index)
}
