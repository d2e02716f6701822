use crate::tcp::byte_stream::ByteStream;
use crate::tcp::config::MAX_WINDOW_SIZE;
use crate::tcp::reassembler::Reassembler;
use crate::tcp::segment::{TcpAck, TcpSegment};
use crate::tcp::tcp_flags::TcpFlags;
use crate::tcp::wrap32::Wrap32;
use std::io::{self, Read};

/// The receiving half of an endpoint: turns inbound segments into absolute
/// stream indices for the reassembler and produces acknowledgements plus
/// window advertisements.
#[derive(Debug)]
pub struct TcpReceiver {
    reassembler: Reassembler,
    zero_point: Option<Wrap32>, // Set by the first SYN
}

impl TcpReceiver {
    pub fn new(reassembler: Reassembler) -> Self {
        TcpReceiver {
            reassembler,
            zero_point: None,
        }
    }

    /// Process one inbound segment
    pub fn receive(&mut self, segment: &TcpSegment) {
        if segment.rst() {
            tracing::debug!("RST received, poisoning inbound stream");
            self.reassembler.output_mut().set_error();
            return;
        }
        if self.reassembler.output().has_error() {
            return; // connection is dead, ignore everything after the RST
        }

        if segment.syn() {
            tracing::trace!(seq_no = %segment.seq_no, "SYN received");
            self.zero_point = Some(segment.seq_no);
        }
        let Some(zero_point) = self.zero_point else {
            return; // nothing but a SYN opens the connection
        };

        let checkpoint = self.reassembler.output().bytes_pushed() as u64;
        let abs_seqno = segment.seq_no.unwrap(zero_point, checkpoint);
        if abs_seqno == 0 && !segment.syn() {
            return; // only a SYN may claim the zero point's sequence number
        }

        // The SYN occupies sequence number zero, so the first payload byte
        // of a SYN-carrying segment sits at stream index zero as well
        let stream_index = abs_seqno + segment.syn() as u64 - 1;
        self.reassembler
            .insert(stream_index, &segment.payload, segment.fin());
    }

    /// The acknowledgement the peer's sender should see
    pub fn send(&self) -> TcpAck {
        let output = self.reassembler.output();

        // One sequence number for the SYN, and one more for the FIN once
        // the stream has actually closed
        let ack_no = self.zero_point.map(|zero_point| {
            let ack = output.bytes_pushed() as u64 + 1 + output.is_closed() as u64;
            Wrap32::wrap(ack, zero_point)
        });

        let mut flags = TcpFlags::empty();
        if ack_no.is_some() {
            flags |= TcpFlags::ACK;
        }
        if output.has_error() {
            flags |= TcpFlags::RST;
        }

        TcpAck {
            ack_no,
            window: output.remaining_capacity().min(MAX_WINDOW_SIZE) as u16,
            flags,
        }
    }

    /// Bytes buffered out of order, waiting for their predecessors
    pub fn bytes_pending(&self) -> u64 {
        self.reassembler.bytes_pending()
    }

    /// The assembled inbound stream
    pub fn stream(&self) -> &ByteStream {
        self.reassembler.output()
    }
}

impl Read for TcpReceiver {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reassembler.read(buf)
    }
}

// -- Unit tests --
