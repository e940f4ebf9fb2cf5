//! Frame separator and its command-line escape syntax.
//!
//! The separator is written the way it would appear inside a Python bytes
//! literal, so `\n`, `\r\n`, `\x00\x00` and `\x7e` all work from a shell
//! without fighting the shell's own quoting.

use crate::config::{ConfigError, ConfigResult};
use std::fmt;
use std::str::FromStr;

/// Escape string used when no separator is configured.
pub const DEFAULT_SEPARATOR: &str = "\\n";

/// Non-empty byte sequence that terminates a frame.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Separator(Vec<u8>);

impl Separator {
    /// Wrap raw bytes. Fails when `bytes` is empty.
    pub fn new(bytes: impl Into<Vec<u8>>) -> ConfigResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ConfigError::separator("", "separator must be at least one byte"));
        }
        Ok(Self(bytes))
    }

    /// Decode an escaped string such as `\r\n` or `\x00`.
    pub fn decode(escaped: &str) -> ConfigResult<Self> {
        let bytes = decode_escapes(escaped)?;
        if bytes.is_empty() {
            return Err(ConfigError::separator(
                escaped,
                "separator must be at least one byte",
            ));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self(vec![b'\n'])
    }
}

impl FromStr for Separator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Debug for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Separator(b\"{}\")", self.0.escape_ascii())
    }
}

/// Decode the body of a bytes literal.
///
/// Recognised escapes: `\\ \' \" \a \b \f \n \r \t \v`, `\xhh` (exactly two
/// hex digits), `\ooo` (one to three octal digits, value masked to a byte)
/// and backslash-newline as a line continuation. Any other escape is kept
/// verbatim, backslash included. Only ASCII is allowed. A bare `'` would
/// terminate the literal and a bare line break would end it early, so both
/// are rejected.
fn decode_escapes(input: &str) -> ConfigResult<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.bytes().peekable();

    while let Some(b) = bytes.next() {
        if !b.is_ascii() {
            return Err(ConfigError::separator(
                input,
                "only ASCII characters are allowed",
            ));
        }
        match b {
            b'\'' => {
                return Err(ConfigError::separator(
                    input,
                    "unescaped single quote; write \\' instead",
                ))
            }
            b'\n' | b'\r' => {
                return Err(ConfigError::separator(
                    input,
                    "unescaped line break; write \\n or \\r instead",
                ))
            }
            b'\\' => {}
            _ => {
                out.push(b);
                continue;
            }
        }

        let Some(esc) = bytes.next() else {
            return Err(ConfigError::separator(input, "trailing backslash"));
        };
        match esc {
            b'\n' => {}
            b'\\' => out.push(b'\\'),
            b'\'' => out.push(b'\''),
            b'"' => out.push(b'"'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0b),
            b'x' => {
                let hi = bytes.next().and_then(hex_value);
                let lo = bytes.next().and_then(hex_value);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                    _ => {
                        return Err(ConfigError::separator(
                            input,
                            "\\x must be followed by two hex digits",
                        ))
                    }
                }
            }
            b'0'..=b'7' => {
                let mut value = u32::from(esc - b'0');
                for _ in 0..2 {
                    match bytes.peek() {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            bytes.next();
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xff) as u8);
            }
            other if other.is_ascii() => {
                out.push(b'\\');
                out.push(other);
            }
            _ => {
                return Err(ConfigError::separator(
                    input,
                    "only ASCII characters are allowed",
                ))
            }
        }
    }

    Ok(out)
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
