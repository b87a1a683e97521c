//! Bounded byte stream over a caller-supplied buffer.

use crate::SerializeError;

/// Direction in which a [`ByteStream`] fills its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bytes are appended from the start of the buffer towards the end.
    Forward,
    /// Bytes are prepended from the end of the buffer towards the start.
    /// Each write lands in front of everything written before it.
    Backward,
}

/// A write-only cursor over a fixed buffer.
///
/// The stream never grows or reallocates. A write that does not fit fails
/// without touching the buffer or moving the cursor.
#[derive(Debug)]
pub struct ByteStream<'a> {
    buffer: &'a mut [u8],
    written: usize,
    direction: Direction,
}

impl<'a> ByteStream<'a> {
    /// Creates a stream over `buffer` filling in `direction`.
    #[must_use]
    pub fn new(buffer: &'a mut [u8], direction: Direction) -> Self {
        Self {
            buffer,
            written: 0,
            direction,
        }
    }

    /// Creates a forward stream over `buffer`.
    #[must_use]
    pub fn forward(buffer: &'a mut [u8]) -> Self {
        Self::new(buffer, Direction::Forward)
    }

    /// Copies `bytes` into the buffer and advances the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if fewer than
    /// `bytes.len()` bytes remain.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        if bytes.len() > self.remaining() {
            return Err(SerializeError::BufferTooSmall);
        }
        let start = match self.direction {
            Direction::Forward => self.written,
            Direction::Backward => self.buffer.len() - self.written - bytes.len(),
        };
        self.buffer[start..start + bytes.len()].copy_from_slice(bytes);
        self.written += bytes.len();
        Ok(())
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the stream is full.
    pub fn write_u8(&mut self, byte: u8) -> Result<(), SerializeError> {
        self.write(&[byte])
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Number of bytes that can still be written.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.written
    }

    /// Total buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// The bytes written so far, in buffer order.
    #[must_use]
    pub fn as_written(&self) -> &[u8] {
        match self.direction {
            Direction::Forward => &self.buffer[..self.written],
            Direction::Backward => &self.buffer[self.buffer.len() - self.written..],
        }
    }
}
