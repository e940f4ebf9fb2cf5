//! Separator-delimited framing.

use crate::separator::Separator;

/// Accumulates bytes until the buffer ends with the separator.
///
/// Bytes are pushed one at a time and the trailing window is compared after
/// every push, so a frame is produced exactly once per separator occurrence
/// and no byte of the following frame is ever consumed early.
#[derive(Debug, Clone)]
pub struct Framer {
    separator: Separator,
    buffer: Vec<u8>,
}

impl Framer {
    pub fn new(separator: Separator) -> Self {
        Self {
            separator,
            buffer: Vec::with_capacity(256),
        }
    }

    /// Append one byte. Returns the completed frame, separator stripped, when
    /// this byte finishes one; the internal buffer is then empty.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        self.buffer.push(byte);

        let sep = self.separator.as_bytes();
        if self.buffer.len() < sep.len() || !self.buffer.ends_with(sep) {
            return None;
        }

        let body_len = self.buffer.len() - sep.len();
        self.buffer.truncate(body_len);
        Some(std::mem::take(&mut self.buffer))
    }

    /// Bytes received since the last completed frame.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Drop any partial frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
