use crate::tcp::errors::StreamError;
use std::collections::VecDeque;
use std::io::{self, Error, ErrorKind, Read, Write};

/// A capacity-bounded in-order byte stream.
///
/// The `Write` impl together with `close`/`set_error` forms the writer half;
/// the `Read` impl together with `peek`/`pop` forms the reader half.
#[derive(Debug)]
pub struct ByteStream {
    buffer: VecDeque<u8>,
    capacity: usize,
    bytes_pushed: usize,
    bytes_popped: usize,
    closed: bool,
    error: bool,
}

impl ByteStream {
    /// New `ByteStream` holding at most `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        ByteStream {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            bytes_pushed: 0,
            bytes_popped: 0,
            closed: false, // Only the producer ever closes the stream
            error: false,
        }
    }

    /// Append as much of `data` as fits and return the number of bytes taken.
    /// No-op once the stream is closed or in error state.
    pub fn push(&mut self, data: &[u8]) -> usize {
        if self.closed || self.error {
            return 0;
        }
        let to_push = data.len().min(self.remaining_capacity());
        self.buffer.extend(&data[..to_push]);
        self.bytes_pushed += to_push;
        to_push
    }

    /// Remove up to `len` bytes and return the number actually removed
    pub fn pop(&mut self, len: usize) -> usize {
        let to_pop = len.min(self.buffer.len());
        self.buffer.drain(..to_pop);
        self.bytes_popped += to_pop;
        to_pop
    }

    /// Copy out up to `len` bytes without consuming them
    pub fn peek(&self, len: usize) -> Vec<u8> {
        let to_peek = len.min(self.buffer.len());
        self.buffer.iter().take(to_peek).cloned().collect()
    }

    /// Room left before the buffer hits capacity
    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.buffer.len())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes pushed but not yet popped
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Signal that no more bytes will be pushed
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closed and fully drained
    pub fn is_finished(&self) -> bool {
        self.closed && self.buffer.is_empty()
    }

    /// Put the stream into its sticky error state
    pub fn set_error(&mut self) {
        if !self.error {
            tracing::debug!("byte stream poisoned");
        }
        self.error = true;
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Total bytes ever accepted by the writer half
    pub fn bytes_pushed(&self) -> usize {
        self.bytes_pushed
    }

    /// Total bytes ever consumed by the reader half
    pub fn bytes_popped(&self) -> usize {
        self.bytes_popped
    }
}

impl Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.error {
            return Err(Error::new(ErrorKind::BrokenPipe, StreamError::Poisoned));
        }
        let to_read = buf.len().min(self.buffer.len());
        if to_read == 0 {
            return Ok(0);
        }

        // The ring buffer may wrap; straighten it before the copy
        let contiguous = self.buffer.make_contiguous();
        buf[..to_read].copy_from_slice(&contiguous[..to_read]);
        self.buffer.drain(..to_read);
        self.bytes_popped += to_read;
        Ok(to_read)
    }
}

impl Write for ByteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.error {
            return Err(Error::new(ErrorKind::BrokenPipe, StreamError::Poisoned));
        }
        if self.closed {
            return Err(Error::new(ErrorKind::Other, StreamError::Closed));
        }
        Ok(self.push(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(()) // nothing buffered outside the stream itself
    }
}

// -- Unit tests --
