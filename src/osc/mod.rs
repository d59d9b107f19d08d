//! OSC 1.0 messages: model, binary codec and address-pattern matching.
//!
//! Only what the bridge needs: messages with typed positional arguments,
//! bundles flattened on decode, and receiver-side pattern matching.

pub mod codec;
pub mod message;
pub mod pattern;

pub use codec::{decode_message, decode_packet, encode, encode_bundle, encode_into, OscError};
pub use message::{ArgType, OscArg, OscMessage};
pub use pattern::{is_pattern, matches};
