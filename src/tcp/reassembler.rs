use crate::tcp::byte_stream::ByteStream;
use std::collections::BTreeMap;
use std::io::{self, Read};

/// Bytes parked above the next expected index, keyed by start index.
/// `last` records that the range's right edge ends the stream.
#[derive(Debug)]
struct Pending {
    data: Vec<u8>,
    last: bool,
}

/// Accepts byte ranges at arbitrary absolute indices and feeds the longest
/// contiguous prefix into its output `ByteStream`.
#[derive(Debug)]
pub struct Reassembler {
    pending: BTreeMap<u64, Pending>,
    output: ByteStream,
    next_index: u64,
    bytes_pending: u64,
}

impl Reassembler {
    /// New `Reassembler` writing into `output`
    pub fn new(output: ByteStream) -> Self {
        Reassembler {
            pending: BTreeMap::new(),
            output,
            next_index: 0,
            bytes_pending: 0,
        }
    }

    /// Offer the range `[first_index, first_index + data.len())`.
    ///
    /// Bytes below the next expected index or outside the acceptance window
    /// are dropped; `is_last` survives unless right-truncation discards the
    /// range's tail. Never fails.
    pub fn insert(&mut self, first_index: u64, data: &[u8], mut is_last: bool) {
        if data.is_empty() && !is_last {
            return;
        }

        let available = self.output.remaining_capacity() as u64;
        let window_end = self.next_index + available;
        if self.output.is_closed() || self.output.has_error() || available == 0 {
            return;
        }
        if first_index >= window_end {
            tracing::trace!(first_index, window_end, "range beyond acceptance window");
            return;
        }

        let mut data = data;
        if first_index + data.len() as u64 > window_end {
            // The tail falls off the window, and the end-of-stream mark
            // falls off with it
            data = &data[..(window_end - first_index) as usize];
            is_last = false;
        }

        if first_index > self.next_index {
            self.cache_range(first_index, data.to_vec(), is_last);
        } else {
            self.push_range(first_index, data, is_last);
        }
        self.flush_pending();
    }

    /// Total bytes parked out of order
    pub fn bytes_pending(&self) -> u64 {
        self.bytes_pending
    }

    /// Absolute index of the next byte the output stream is waiting for
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// The assembled output stream
    pub fn output(&self) -> &ByteStream {
        &self.output
    }

    pub(crate) fn output_mut(&mut self) -> &mut ByteStream {
        &mut self.output
    }

    /// Deliver a range starting at or before `next_index`, skipping the
    /// already-delivered prefix
    fn push_range(&mut self, first_index: u64, data: &[u8], is_last: bool) {
        let skip = ((self.next_index - first_index) as usize).min(data.len());
        self.next_index += self.output.push(&data[skip..]) as u64;

        if is_last {
            self.output.close();
            self.pending.clear();
            self.bytes_pending = 0;
        }
    }

    /// Park a range that is not yet deliverable, coalescing it with every
    /// stored range it overlaps or touches
    fn cache_range(&mut self, first_index: u64, data: Vec<u8>, mut last: bool) {
        let mut start = first_index;
        let mut end = first_index + data.len() as u64;

        // A stored range that already covers the newcomer keeps its bytes;
        // only the end-of-stream mark needs to be carried over
        if let Some((&left, entry)) = self.pending.range_mut(..=start).next_back() {
            if left + entry.data.len() as u64 >= end {
                entry.last |= last;
                return;
            }
        }

        let absorbed: Vec<u64> = self
            .pending
            .range(..=end)
            .filter(|(s, p)| **s + p.data.len() as u64 >= start)
            .map(|(&s, _)| s)
            .collect();

        let mut merged = data;
        for s in absorbed {
            if let Some(p) = self.pending.remove(&s) {
                self.bytes_pending -= p.data.len() as u64;
                last |= p.last;
                let p_end = s + p.data.len() as u64;
                if s < start {
                    // Stored range sticks out to the left: keep its prefix
                    let mut head = p.data;
                    head.truncate((start - s) as usize);
                    head.extend_from_slice(&merged);
                    merged = head;
                    start = s;
                } else if p_end > end {
                    // Sticks out to the right: keep its suffix
                    let from = p.data.len() - (p_end - end) as usize;
                    merged.extend_from_slice(&p.data[from..]);
                    end = p_end;
                }
            }
        }

        self.bytes_pending += merged.len() as u64;
        self.pending.insert(start, Pending { data: merged, last });
    }

    /// Drain every parked range the output stream has caught up with
    fn flush_pending(&mut self) {
        while let Some(entry) = self.pending.first_entry() {
            if *entry.key() > self.next_index {
                break;
            }
            let (start, pending) = entry.remove_entry();
            self.bytes_pending -= pending.data.len() as u64;
            self.push_range(start, &pending.data, pending.last);
        }
    }
}

impl Read for Reassembler {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.output.read(buf)
    }
}

// -- Unit tests --
