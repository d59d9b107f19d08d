//! Command line parser
//!
//! Split on whitespace, max 3 arguments. Anything after `#` is a comment,
//! so scripted input piped into stdin can be annotated.

/// Parsed command with up to 3 arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// The command name (first token)
    pub command: &'a str,
    /// Up to 3 arguments
    pub args: [Option<&'a str>; 3],
}

impl<'a> ParsedCommand<'a> {
    pub const fn empty() -> Self {
        Self {
            command: "",
            args: [None, None, None],
        }
    }

    /// Get argument by index (0-based)
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.args.get(idx).copied().flatten()
    }

    /// Number of arguments present.
    pub fn arg_count(&self) -> usize {
        self.args.iter().filter(|a| a.is_some()).count()
    }
}

/// Parse a command line into command and arguments
pub fn parse_line(line: &str) -> ParsedCommand<'_> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let mut parts = line.split_whitespace();

    let command = parts.next().unwrap_or("");

    let mut args = [None, None, None];
    for (slot, arg) in args.iter_mut().zip(parts) {
        *slot = Some(arg);
    }

    ParsedCommand { command, args }
}
