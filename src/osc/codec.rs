//! OSC 1.0 binary codec.
//!
//! Wire layout:
//!
//! ```text
//! message: [address\0 pad4][,tags\0 pad4][arg0][arg1]...
//! bundle:  [#bundle\0][timetag:8][size:4][element]...
//! ```
//!
//! All numbers big-endian. Bundles are flattened on decode and their time
//! tags ignored (everything is delivered immediately).

use thiserror::Error;

use super::message::{OscArg, OscMessage};

const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// Time tag meaning "immediately".
const IMMEDIATE: u64 = 1;

/// Bundles nested deeper than this are rejected.
pub const MAX_BUNDLE_DEPTH: usize = 8;

/// Errors decoding an OSC packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OscError {
    #[error("packet truncated at byte {0}")]
    Truncated(usize),

    #[error("packet size {0} is not a multiple of 4")]
    Misaligned(usize),

    #[error("string at byte {0} has no terminator")]
    UnterminatedString(usize),

    #[error("string at byte {0} is not valid UTF-8")]
    InvalidUtf8(usize),

    #[error("address must start with '/', got {0:?}")]
    InvalidAddress(String),

    #[error("type tag string must start with ','")]
    InvalidTypeTags,

    #[error("unsupported argument type '{0}'")]
    UnsupportedType(char),

    #[error("bundle element size {0} is invalid")]
    InvalidElementSize(i32),

    #[error("bundles nested too deeply")]
    BundleTooDeep,

    #[error("{0} unread bytes after last argument")]
    TrailingBytes(usize),
}

/// Encode one message into a fresh buffer.
pub fn encode(msg: &OscMessage) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len_hint(msg));
    encode_into(msg, &mut out);
    out
}

/// Encode one message, appending to `out`.
pub fn encode_into(msg: &OscMessage, out: &mut Vec<u8>) {
    write_str(out, msg.address());

    let mut tags = String::with_capacity(msg.args().len() + 1);
    tags.push(',');
    for arg in msg.args() {
        tags.push(arg.type_tag() as char);
    }
    write_str(out, &tags);

    for arg in msg.args() {
        match arg {
            OscArg::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
            OscArg::Float(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
            OscArg::Str(s) => write_str(out, s),
            OscArg::Blob(b) => {
                out.extend_from_slice(&(b.len() as i32).to_be_bytes());
                out.extend_from_slice(b);
                pad(out);
            }
            OscArg::Long(v) => out.extend_from_slice(&v.to_be_bytes()),
            OscArg::Double(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
            OscArg::Bool(_) => {}
        }
    }
}

/// Encode messages as one bundle with the "immediately" time tag.
pub fn encode_bundle(messages: &[OscMessage]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(BUNDLE_TAG);
    out.extend_from_slice(&IMMEDIATE.to_be_bytes());
    for msg in messages {
        let element = encode(msg);
        out.extend_from_slice(&(element.len() as i32).to_be_bytes());
        out.extend_from_slice(&element);
    }
    out
}

/// Decode a datagram (message or bundle) into its messages, in order.
pub fn decode_packet(bytes: &[u8]) -> Result<Vec<OscMessage>, OscError> {
    let mut messages = Vec::new();
    decode_element(bytes, 0, &mut messages)?;
    Ok(messages)
}

/// Decode a datagram that must be a single message.
pub fn decode_message(bytes: &[u8]) -> Result<OscMessage, OscError> {
    if bytes.len() % 4 != 0 {
        return Err(OscError::Misaligned(bytes.len()));
    }

    let mut reader = Reader::new(bytes);
    let address = reader.read_str()?;
    if !address.starts_with('/') {
        return Err(OscError::InvalidAddress(address.to_string()));
    }
    let mut msg = OscMessage::new(address);

    // Pre-1.0 senders may omit the tag string entirely.
    if reader.remaining() == 0 {
        return Ok(msg);
    }

    let tags = reader.read_str()?;
    let tags = tags.strip_prefix(',').ok_or(OscError::InvalidTypeTags)?;

    for tag in tags.bytes() {
        let arg = match tag {
            b'i' => OscArg::Int(reader.read_i32()?),
            b'f' => OscArg::Float(f32::from_bits(reader.read_i32()? as u32)),
            b's' => OscArg::Str(reader.read_str()?.to_string()),
            b'b' => OscArg::Blob(reader.read_blob()?.to_vec()),
            b'h' => OscArg::Long(reader.read_i64()?),
            b'd' => OscArg::Double(f64::from_bits(reader.read_i64()? as u64)),
            b'T' => OscArg::Bool(true),
            b'F' => OscArg::Bool(false),
            other => return Err(OscError::UnsupportedType(other as char)),
        };
        msg.push(arg);
    }

    if reader.remaining() != 0 {
        return Err(OscError::TrailingBytes(reader.remaining()));
    }

    Ok(msg)
}

fn decode_element(bytes: &[u8], depth: usize, out: &mut Vec<OscMessage>) -> Result<(), OscError> {
    if !bytes.starts_with(BUNDLE_TAG) {
        out.push(decode_message(bytes)?);
        return Ok(());
    }

    if depth >= MAX_BUNDLE_DEPTH {
        return Err(OscError::BundleTooDeep);
    }
    if bytes.len() % 4 != 0 {
        return Err(OscError::Misaligned(bytes.len()));
    }

    let mut reader = Reader::new(bytes);
    reader.take(BUNDLE_TAG.len())?;
    reader.read_i64()?; // time tag, ignored

    while reader.remaining() > 0 {
        let size = reader.read_i32()?;
        if size <= 0 || size % 4 != 0 {
            return Err(OscError::InvalidElementSize(size));
        }
        let element = reader.take(size as usize)?;
        decode_element(element, depth + 1, out)?;
    }

    Ok(())
}

fn write_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
    pad(out);
}

fn pad(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

#[inline]
fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn encoded_len_hint(msg: &OscMessage) -> usize {
    padded(msg.address().len() + 1) + padded(msg.args().len() + 2) + msg.args().len() * 8
}

/// Cursor over a 4-byte aligned packet.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], OscError> {
        if self.remaining() < n {
            return Err(OscError::Truncated(self.bytes.len()));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_i32(&mut self) -> Result<i32, OscError> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i64(&mut self) -> Result<i64, OscError> {
        let b = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(i64::from_be_bytes(raw))
    }

    fn read_str(&mut self) -> Result<&'a str, OscError> {
        let start = self.pos;
        let rest = &self.bytes[start..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(OscError::UnterminatedString(start))?;
        let text = core::str::from_utf8(&rest[..nul]).map_err(|_| OscError::InvalidUtf8(start))?;
        self.take(padded(nul + 1))?;
        Ok(text)
    }

    fn read_blob(&mut self) -> Result<&'a [u8], OscError> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(OscError::Truncated(self.pos));
        }
        let len = len as usize;
        let data = self.take(len)?;
        self.take(padded(len) - len)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_padding() {
        let mut out = Vec::new();
        write_str(&mut out, "/abc");
        assert_eq!(out, b"/abc\0\0\0\0");

        out.clear();
        write_str(&mut out, "/ab");
        assert_eq!(out, b"/ab\0");
    }

    #[test]
    fn test_reader_rejects_truncated_int() {
        let mut reader = Reader::new(&[0, 0]);
        assert_eq!(reader.read_i32(), Err(OscError::Truncated(2)));
    }

    #[test]
    fn test_len_hint_covers_float_message() {
        let msg = OscMessage::new("/analogInputs/0").with_float(0.25);
        assert!(encoded_len_hint(&msg) >= encode(&msg).len());
    }
}
