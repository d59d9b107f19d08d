//! OSC message model.

/// One positional OSC argument.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    /// `i`: 32-bit big-endian integer.
    Int(i32),
    /// `f`: 32-bit IEEE float.
    Float(f32),
    /// `s`: NUL-terminated ASCII string.
    Str(String),
    /// `b`: size-prefixed byte blob.
    Blob(Vec<u8>),
    /// `h`: 64-bit integer.
    Long(i64),
    /// `d`: 64-bit IEEE float.
    Double(f64),
    /// `T` / `F`: boolean carried in the type tag only.
    Bool(bool),
}

/// Argument type as it appears in a route signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Int32,
    Float32,
    Str,
    Blob,
    Int64,
    Float64,
    Bool,
}

impl OscArg {
    pub fn arg_type(&self) -> ArgType {
        match self {
            OscArg::Int(_) => ArgType::Int32,
            OscArg::Float(_) => ArgType::Float32,
            OscArg::Str(_) => ArgType::Str,
            OscArg::Blob(_) => ArgType::Blob,
            OscArg::Long(_) => ArgType::Int64,
            OscArg::Double(_) => ArgType::Float64,
            OscArg::Bool(_) => ArgType::Bool,
        }
    }

    /// Type tag character written in the `,...` tag string.
    pub fn type_tag(&self) -> u8 {
        match self {
            OscArg::Int(_) => b'i',
            OscArg::Float(_) => b'f',
            OscArg::Str(_) => b's',
            OscArg::Blob(_) => b'b',
            OscArg::Long(_) => b'h',
            OscArg::Double(_) => b'd',
            OscArg::Bool(true) => b'T',
            OscArg::Bool(false) => b'F',
        }
    }
}

/// An OSC message: address (or address pattern) plus arguments.
///
/// Built fluently:
///
/// ```
/// use analog_osc_bridge::osc::OscMessage;
///
/// let msg = OscMessage::new("/analogOutputs/0").with_float(0.5).with_float(2.0);
/// assert_eq!(msg.args().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    address: String,
    args: Vec<OscArg>,
}

impl OscMessage {
    /// Create a message without arguments.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            args: Vec::new(),
        }
    }

    /// Create a message from parts.
    pub fn with_args(address: impl Into<String>, args: Vec<OscArg>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    pub fn with_int(mut self, value: i32) -> Self {
        self.args.push(OscArg::Int(value));
        self
    }

    pub fn with_float(mut self, value: f32) -> Self {
        self.args.push(OscArg::Float(value));
        self
    }

    /// Append an argument.
    pub fn push(&mut self, arg: OscArg) {
        self.args.push(arg);
    }

    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[inline]
    pub fn args(&self) -> &[OscArg] {
        &self.args
    }

    /// Strict signature check: same arity and same type at every position.
    ///
    /// Extra or missing arguments fail the check, as does any type mismatch.
    pub fn has_signature(&self, signature: &[ArgType]) -> bool {
        self.args.len() == signature.len()
            && self
                .args
                .iter()
                .zip(signature)
                .all(|(arg, expected)| arg.arg_type() == *expected)
    }
}
