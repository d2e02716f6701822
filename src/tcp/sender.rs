use crate::tcp::byte_stream::ByteStream;
use crate::tcp::config::MAX_PAYLOAD_SIZE;
use crate::tcp::segment::{TcpAck, TcpSegment};
use crate::tcp::tcp_flags::TcpFlags;
use crate::tcp::timer::RetransmissionTimer;
use crate::tcp::wrap32::Wrap32;
use std::collections::VecDeque;
use std::io::{self, Write};

/// The sending half of an endpoint: drains its outbound stream into
/// segments sized to the peer's window, keeps them until acknowledged and
/// retransmits under an exponentially backed-off timer.
#[derive(Debug)]
pub struct TcpSender {
    stream: ByteStream,
    isn: Wrap32,
    initial_rto_ms: u64,

    next_seqno: u64,  // Absolute sequence number of the next byte to emit
    acked_seqno: u64, // Start of the oldest outstanding segment
    wnd_size: u16,

    syn_sent: bool,
    fin_sent: bool,

    outstanding: VecDeque<TcpSegment>,
    bytes_in_flight: u64,

    timer: RetransmissionTimer,
    retransmission_count: u64,
}

impl TcpSender {
    pub fn new(stream: ByteStream, isn: Wrap32, initial_rto_ms: u64) -> Self {
        TcpSender {
            stream,
            isn,
            initial_rto_ms,
            next_seqno: 0,
            acked_seqno: 0,
            wnd_size: 1, // Assume one byte of room until the peer says otherwise
            syn_sent: false,
            fin_sent: false,
            outstanding: VecDeque::new(),
            bytes_in_flight: 0,
            timer: RetransmissionTimer::new(initial_rto_ms),
            retransmission_count: 0,
        }
    }

    /// Emit as many segments as the peer's window and the stream allow
    pub fn push(&mut self, mut transmit: impl FnMut(&TcpSegment)) {
        // A zero window is treated as one byte of room so the probe keeps
        // the conversation alive
        let window = (self.wnd_size as u64).max(1);

        while !self.fin_sent && self.bytes_in_flight < window {
            let syn = !self.syn_sent;

            // A still-unsent SYN takes one sequence number out of the window
            let budget = ((window - self.bytes_in_flight) as usize)
                .saturating_sub(syn as usize)
                .min(MAX_PAYLOAD_SIZE);
            let payload = self.stream.peek(budget);
            self.stream.pop(payload.len());

            let finished = self.stream.is_finished();
            if self.syn_sent && payload.is_empty() && !finished {
                break; // nothing to say
            }

            let mut flags = TcpFlags::empty();
            if syn {
                flags |= TcpFlags::SYN;
            }
            if self.stream.has_error() {
                flags |= TcpFlags::RST;
            }

            let mut sequence_length = payload.len() + syn as usize;
            if finished && (sequence_length as u64) < window - self.bytes_in_flight {
                flags |= TcpFlags::FIN;
                sequence_length += 1;
            }
            if sequence_length == 0 {
                break; // the FIN did not fit; try again after the next ack
            }

            let segment = TcpSegment {
                seq_no: Wrap32::wrap(self.next_seqno, self.isn),
                flags,
                payload,
            };
            transmit(&segment);

            self.next_seqno += sequence_length as u64;
            self.bytes_in_flight += sequence_length as u64;
            self.syn_sent = true;
            self.fin_sent |= segment.fin();
            self.timer.activate();
            self.outstanding.push_back(segment);
        }
    }

    /// A zero-length segment at the current sequence number, for ack-only
    /// replies. Never tracked for retransmission.
    pub fn make_empty_message(&self) -> TcpSegment {
        let mut flags = TcpFlags::empty();
        if self.stream.has_error() {
            flags |= TcpFlags::RST;
        }
        TcpSegment {
            seq_no: Wrap32::wrap(self.next_seqno, self.isn),
            flags,
            payload: Vec::new(),
        }
    }

    /// Process an acknowledgement from the peer's receiver
    pub fn receive(&mut self, ack: &TcpAck) {
        self.wnd_size = ack.window;

        let Some(ack_no) = ack.ack_no else {
            if ack.window == 0 {
                // The peer rejected the connection outright
                tracing::debug!("no ackno and zero window, poisoning outbound stream");
                self.stream.set_error();
            }
            return;
        };

        let abs_ack = ack_no.unwrap(self.isn, self.next_seqno);
        if abs_ack > self.next_seqno {
            tracing::trace!(%ack_no, "ignoring ack for bytes never sent");
            return;
        }

        let mut acked = false;
        while let Some(head) = self.outstanding.front() {
            let head_end = self.acked_seqno + head.sequence_length() as u64;
            if abs_ack < head_end {
                break; // cumulative acks only retire whole segments
            }
            self.bytes_in_flight -= head.sequence_length() as u64;
            self.acked_seqno = head_end;
            self.outstanding.pop_front();
            acked = true;
        }

        if acked {
            // Fresh progress: back to the initial RTO, restart the clock
            self.timer = RetransmissionTimer::new(self.initial_rto_ms);
            if !self.outstanding.is_empty() {
                self.timer.activate();
            }
            self.retransmission_count = 0;
        }
    }

    /// Advance time; retransmit the oldest outstanding segment on expiry
    pub fn tick(&mut self, ms_since_last_tick: u64, mut transmit: impl FnMut(&TcpSegment)) {
        self.timer.tick(ms_since_last_tick);
        if !self.timer.is_expired() {
            return;
        }
        let Some(head) = self.outstanding.front() else {
            return;
        };

        tracing::debug!(seq_no = %head.seq_no, rto_ms = self.timer.rto_ms(), "retransmitting");
        transmit(head);

        if self.wnd_size != 0 {
            self.timer.backoff();
        }
        // Zero-window probes retry at the same pace, without backing off
        self.timer.reset();
        self.retransmission_count += 1;
    }

    /// Close the outbound stream; a FIN follows once everything drained
    pub fn close(&mut self) {
        self.stream.close();
    }

    /// The outbound stream, read-only
    pub fn stream(&self) -> &ByteStream {
        &self.stream
    }

    /// Sequence numbers sent but not yet cumulatively acknowledged
    pub fn sequence_numbers_in_flight(&self) -> u64 {
        self.bytes_in_flight
    }

    /// Retransmissions fired since the last new cumulative ack
    pub fn consecutive_retransmissions(&self) -> u64 {
        self.retransmission_count
    }
}

impl Write for TcpSender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

// -- Unit tests --
