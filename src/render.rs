//! Frame rendering.
//!
//! A completed frame goes through two independent steps: the output style
//! turns bytes into text, and the optional color wraps the finished line in
//! an ANSI SGR sequence. Lines are then handed to a [`FrameSink`] which must
//! write each one in a single piece, since both channels print concurrently.

use crate::config::{ConfigError, ConfigResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// How frame bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Decode as UTF-8 text.
    Utf8,
    /// Lowercase hex pairs separated by spaces.
    Bytes,
    /// Python `bytes` repr without the `b'...'` wrapper.
    #[default]
    PyBytes,
}

impl OutputStyle {
    /// Every accepted name, in the order they are listed to the operator.
    pub const NAMES: [&'static str; 3] = ["utf8", "bytes", "pybytes"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Bytes => "bytes",
            Self::PyBytes => "pybytes",
        }
    }

    /// Render a frame in this style.
    ///
    /// The result depends only on `frame`. Invalid UTF-8 in the `utf8` style
    /// is replaced with U+FFFD rather than failing.
    pub fn encode<'a>(&self, frame: &'a [u8]) -> Cow<'a, str> {
        match self {
            Self::Utf8 => String::from_utf8_lossy(frame),
            Self::Bytes => Cow::Owned(hex_pairs(frame)),
            Self::PyBytes => Cow::Owned(py_bytes_repr(frame)),
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "utf8" => Ok(Self::Utf8),
            "bytes" => Ok(Self::Bytes),
            "pybytes" => Ok(Self::PyBytes),
            other => Err(ConfigError::InvalidOutputStyle {
                given: other.to_string(),
                expected: Self::NAMES.join(", "),
            }),
        }
    }
}

fn hex_pairs(frame: &[u8]) -> String {
    frame
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn py_bytes_repr(frame: &[u8]) -> String {
    // repr() switches to double quotes only when that avoids escaping.
    let quote = if frame.contains(&b'\'') && !frame.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };

    let mut out = String::with_capacity(frame.len());
    for &b in frame {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            q if q == quote => {
                out.push('\\');
                out.push(q as char);
            }
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out
}

/// ANSI foreground colors used to tag a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl Color {
    /// SGR parameter for this foreground color.
    pub fn code(&self) -> u8 {
        match self {
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
        }
    }
}

/// Formats frames for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRenderer {
    label: String,
    style: OutputStyle,
    color: Option<Color>,
}

impl FrameRenderer {
    pub fn new(label: impl Into<String>, style: OutputStyle, color: Option<Color>) -> Self {
        Self {
            label: label.into(),
            style,
            color,
        }
    }

    /// Build the full console line for `frame`, trailing newline included.
    pub fn render_line(&self, frame: &[u8]) -> String {
        if self.style == OutputStyle::Utf8 && std::str::from_utf8(frame).is_err() {
            warn!(
                channel = %self.label,
                len = frame.len(),
                "frame is not valid UTF-8, substituting replacement characters"
            );
        }
        let text = self.style.encode(frame);
        match self.color {
            Some(color) => format!("\x1b[{}m{}: {}\x1b[0m\n", color.code(), self.label, text),
            None => format!("{}: {}\n", self.label, text),
        }
    }
}

/// Destination for rendered lines.
///
/// Implementations must write each line atomically with respect to other
/// callers and flush before returning.
pub trait FrameSink: Send + Sync + fmt::Debug {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Writes to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl FrameSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(line.as_bytes())?;
        out.flush()
    }
}

/// Collects lines in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl FrameSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hello_scenario() {
        let frame = [0x48, 0x65, 0x6c, 0x6c, 0x6f];
        assert_eq!(OutputStyle::Bytes.encode(&frame), "48 65 6c 6c 6f");
        assert_eq!(OutputStyle::Utf8.encode(&frame), "Hello");
        assert_eq!(OutputStyle::PyBytes.encode(&frame), "Hello");
    }

    #[test]
    fn test_bytes_style_edges() {
        assert_eq!(OutputStyle::Bytes.encode(&[]), "");
        assert_eq!(OutputStyle::Bytes.encode(&[0x01]), "01");
        assert_eq!(OutputStyle::Bytes.encode(&[0x00, 0xff, 0xab]), "00 ff ab");
    }

    #[test]
    fn test_bytes_style_round_trips() {
        let frame: Vec<u8> = (0..=255).collect();
        let text = OutputStyle::Bytes.encode(&frame);
        let decoded: Vec<u8> = text
            .split(' ')
            .map(|pair| u8::from_str_radix(pair, 16).unwrap())
            .collect();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_pybytes_escapes() {
        assert_eq!(
            OutputStyle::PyBytes.encode(b"a\tb\r\n\\\x00\x7f\xff"),
            "a\\tb\\r\\n\\\\\\x00\\x7f\\xff"
        );
    }

    #[test]
    fn test_pybytes_quote_selection() {
        // Only single quotes: repr uses double quotes, nothing escaped.
        assert_eq!(OutputStyle::PyBytes.encode(b"it's"), "it's");
        // Both kinds: single-quote delimiter, so ' is escaped.
        assert_eq!(OutputStyle::PyBytes.encode(b"'\""), "\\'\"");
        // Only double quotes pass through.
        assert_eq!(OutputStyle::PyBytes.encode(b"\"hi\""), "\"hi\"");
    }

    #[test]
    fn test_utf8_invalid_is_substituted() {
        assert_eq!(OutputStyle::Utf8.encode(b"ok\xff"), "ok\u{fffd}");
    }

    #[test]
    fn test_style_names() {
        for name in OutputStyle::NAMES {
            let style: OutputStyle = name.parse().unwrap();
            assert_eq!(style.as_str(), name);
        }
        let err = "xml".parse::<OutputStyle>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "output style should be one of: utf8, bytes, pybytes"
        );
        assert_eq!(OutputStyle::default(), OutputStyle::PyBytes);
    }

    #[test]
    fn test_render_line_with_color() {
        let renderer = FrameRenderer::new("tx", OutputStyle::Bytes, Some(Color::Green));
        assert_eq!(renderer.render_line(&[0x01]), "\x1b[32mtx: 01\x1b[0m\n");
    }

    #[test]
    fn test_render_line_without_color() {
        let renderer = FrameRenderer::new("rx", OutputStyle::Utf8, None);
        assert_eq!(renderer.render_line(b"Hello"), "rx: Hello\n");
    }

    #[test]
    fn test_render_is_pure() {
        let renderer = FrameRenderer::new("rx", OutputStyle::PyBytes, Some(Color::Yellow));
        let frame = b"\x02payload\x03";
        assert_eq!(renderer.render_line(frame), renderer.render_line(frame));
    }

    #[test]
    fn test_memory_sink_collects() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.write_line("a\n").unwrap();
        clone.write_line("b\n").unwrap();
        assert_eq!(sink.lines(), vec!["a\n".to_string(), "b\n".to_string()]);
        assert_eq!(sink.len(), 2);
    }
}
