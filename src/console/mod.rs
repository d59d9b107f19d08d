//! Diagnostic console
//!
//! Line-oriented commands against the live [`Session`](crate::Session).
//! Lines are read off the render thread; commands execute on it, between
//! two render blocks, so they never race the callback.

pub mod commands;
pub mod error;
pub mod parser;

pub use commands::{execute, execute_line, COMMANDS};
pub use error::ConsoleError;
pub use parser::{parse_line, ParsedCommand};
