//! Command handlers

use core::fmt::Write;

use super::parser::{parse_line, ParsedCommand};
use super::ConsoleError;
use crate::logging::{LogLevel, BG_LOG_STREAM};
use crate::osc::OscMessage;
use crate::router::analog_output_path;
use crate::session::Session;
use crate::signal::Led;

/// Command handler signature
pub type CommandHandler =
    fn(&ParsedCommand<'_>, &mut Session<'_>, &mut dyn Write) -> Result<(), ConsoleError>;

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub usage: &'static str,
    pub brief: &'static str,
    pub handler: CommandHandler,
}

/// All available commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", usage: "help [cmd]", brief: "List commands", handler: cmd_help },
    CommandDescriptor { name: "status", usage: "status", brief: "Channel and sensor state", handler: cmd_status },
    CommandDescriptor { name: "set", usage: "set <red|green> <amp> <freq>", brief: "Route an LED update", handler: cmd_set },
    CommandDescriptor { name: "stats", usage: "stats", brief: "Link and log counters", handler: cmd_stats },
    CommandDescriptor { name: "debug", usage: "debug [level]", brief: "Show or set RT log level", handler: cmd_debug },
    CommandDescriptor { name: "version", usage: "version", brief: "Build version", handler: cmd_version },
];

/// Execute a parsed command
pub fn execute(
    cmd: &ParsedCommand<'_>,
    session: &mut Session<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if cmd.command.is_empty() {
        return Ok(()); // Empty line, do nothing
    }

    let handler = COMMANDS
        .iter()
        .find(|c| c.name == cmd.command)
        .ok_or(ConsoleError::UnknownCommand)?;

    (handler.handler)(cmd, session, out)
}

/// Parse and execute one line, writing the error (if any) to `out` as well.
pub fn execute_line(
    line: &str,
    session: &mut Session<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let result = execute(&parse_line(line), session, out);
    if let Err(e) = result {
        let _ = writeln!(out, "{}", e);
    }
    result
}

// --- Command Implementations ---

fn cmd_help(
    cmd: &ParsedCommand<'_>,
    _session: &mut Session<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if let Some(name) = cmd.arg(0) {
        let c = COMMANDS
            .iter()
            .find(|c| c.name == name)
            .ok_or(ConsoleError::UnknownCommand)?;
        let _ = writeln!(out, "{}: {}", c.usage, c.brief);
    } else {
        for c in COMMANDS {
            let _ = writeln!(out, "  {:<30} {}", c.usage, c.brief);
        }
    }
    Ok(())
}

fn cmd_status(
    _cmd: &ParsedCommand<'_>,
    session: &mut Session<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    for led in Led::ALL {
        let ch = session.leds().get(led);
        let _ = writeln!(
            out,
            "{:<6} amp={:.3} freq={:.3}Hz phase={:+.3}",
            led.name(),
            ch.amplitude,
            ch.frequency,
            ch.phase()
        );
    }
    let _ = writeln!(out, "pressure={:.4}", session.sampler().last());
    let emitter = session.emitter();
    let _ = writeln!(
        out,
        "emit {} {}/{} blocks",
        emitter.path(),
        emitter.counter(),
        emitter.threshold()
    );
    let _ = writeln!(
        out,
        "frames={} handshake={}",
        session.frames_elapsed(),
        if session.handshake_ok() { "ok" } else { "timeout" }
    );
    Ok(())
}

fn cmd_set(
    cmd: &ParsedCommand<'_>,
    session: &mut Session<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let channel = cmd.arg(0).ok_or(ConsoleError::MissingArg)?;
    let amp = cmd.arg(1).ok_or(ConsoleError::MissingArg)?;
    let freq = cmd.arg(2).ok_or(ConsoleError::MissingArg)?;

    let led = Led::from_name(channel).ok_or(ConsoleError::UnknownChannel)?;
    let amp: f32 = amp.parse().map_err(|_| ConsoleError::InvalidValue)?;
    let freq: f32 = freq.parse().map_err(|_| ConsoleError::InvalidValue)?;

    let path = analog_output_path(&session.config().osc.address_prefix, led.index());
    let msg = OscMessage::new(path).with_float(amp).with_float(freq);
    if session.route(&msg).applied == 0 {
        return Err(ConsoleError::Rejected);
    }

    let _ = writeln!(out, "{} amp={} freq={}", led.name(), amp, freq);
    Ok(())
}

fn cmd_stats(
    _cmd: &ParsedCommand<'_>,
    session: &mut Session<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let h = session.health().snapshot();
    let _ = writeln!(
        out,
        "messages: received={} applied={} ignored={} sent={}",
        h.received, h.applied, h.ignored, h.sent
    );
    let _ = writeln!(
        out,
        "faults: total={} latched={} last={} ({})",
        h.faults,
        h.active,
        h.code.as_str(),
        h.data
    );
    let _ = writeln!(
        out,
        "log: pending={} dropped={}",
        session.log().pending(),
        session.log().dropped()
    );
    Ok(())
}

fn cmd_debug(
    cmd: &ParsedCommand<'_>,
    session: &mut Session<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if let Some(name) = cmd.arg(0) {
        let level = match name {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => return Err(ConsoleError::InvalidValue),
        };
        session.log().set_max_level(level);
        BG_LOG_STREAM.set_max_level(level);
    }
    let _ = writeln!(out, "log level: {}", session.log().max_level().as_str());
    Ok(())
}

fn cmd_version(
    _cmd: &ParsedCommand<'_>,
    _session: &mut Session<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let _ = writeln!(out, "{}", env!("VERSION_STRING"));
    Ok(())
}
