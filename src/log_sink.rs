//! Drain of the RT log rings into the `log` facade.
//!
//! Runs on the main loop between render blocks (or at any point outside the
//! render callback). On the host the facade is backed by `env_logger`; on
//! ESP-IDF by `EspLogger`.
//!
//! ```text
//! RT_LOG_STREAM ──┐
//!                 ├──▶ forward() ──▶ log::log!(target: "rt" | "bg", ...)
//! BG_LOG_STREAM ──┘
//! ```

use core::fmt::Write;

use crate::logging::{
    BufWriter, LogEntry, LogLevel, LogStream, BG_LOG_STREAM, MAX_MSG_LEN, RT_LOG_STREAM,
};

/// Log target used for entries from [`RT_LOG_STREAM`].
pub const RT_TARGET: &str = "rt";

/// Log target used for entries from [`BG_LOG_STREAM`].
pub const BG_TARGET: &str = "bg";

/// Map an RT log level onto the facade's level.
pub fn facade_level(level: LogLevel) -> log::Level {
    match level {
        LogLevel::Error => log::Level::Error,
        LogLevel::Warn => log::Level::Warn,
        LogLevel::Info => log::Level::Info,
        LogLevel::Debug => log::Level::Debug,
        LogLevel::Trace => log::Level::Trace,
    }
}

/// Room for the timestamp prefix plus the longest message.
const LINE_LEN: usize = MAX_MSG_LEN + 32;

/// Format log entry as a single line.
///
/// Format: `[timestamp_us] message`. The level travels separately as the
/// facade record's level.
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = write!(writer, "[{:>10}us] {}", entry.timestamp_us, entry.message());
    writer.pos
}

/// Drain every published entry of `stream` into the facade under `target`.
///
/// Returns the number of entries forwarded.
pub fn forward_stream<const N: usize>(stream: &LogStream<N>, target: &str) -> usize {
    let mut forwarded = 0;
    let mut line = [0u8; LINE_LEN];
    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut line);
        log::log!(
            target: target,
            facade_level(entry.level),
            "{}",
            String::from_utf8_lossy(&line[..len])
        );
        forwarded += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        log::warn!(target: target, "dropped {} log entries (ring full)", dropped);
        stream.reset_dropped();
    }

    forwarded
}

/// Drain both global streams, RT first.
pub fn forward() -> usize {
    forward_stream(&RT_LOG_STREAM, RT_TARGET) + forward_stream(&BG_LOG_STREAM, BG_TARGET)
}

/// Host logger: `filters` (usually `RUST_LOG`) decides verbosity, `info`
/// when unset. `verbose` forces debug on top.
pub fn host_logger(filters: Option<&str>, verbose: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(filters.unwrap_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
}

/// Align both global streams' filters with the facade's maximum level.
///
/// Call once after the logger is installed so `rt_debug!` and friends are
/// skipped before formatting when the facade would discard them anyway.
pub fn sync_levels_with_facade() {
    let level = match log::max_level() {
        log::LevelFilter::Off | log::LevelFilter::Error => LogLevel::Error,
        log::LevelFilter::Warn => LogLevel::Warn,
        log::LevelFilter::Info => LogLevel::Info,
        log::LevelFilter::Debug => LogLevel::Debug,
        log::LevelFilter::Trace => LogLevel::Trace,
    };
    RT_LOG_STREAM.set_max_level(level);
    BG_LOG_STREAM.set_max_level(level);
}
