use crate::tcp::tcp_flags::TcpFlags;
use crate::tcp::wrap32::Wrap32;

/// An in-memory segment travelling from a sender to the peer's receiver.
///
/// Checksums, ports and wire framing live below this layer; only the fields
/// the endpoint core reasons about are carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpSegment {
    pub seq_no: Wrap32,
    pub flags: TcpFlags,
    pub payload: Vec<u8>,
}

impl TcpSegment {
    /// Number of sequence numbers the segment occupies.
    /// SYN and FIN each consume one, the payload consumes its length.
    pub fn sequence_length(&self) -> usize {
        self.payload.len() + self.syn() as usize + self.fin() as usize
    }

    pub fn syn(&self) -> bool {
        self.flags.contains(TcpFlags::SYN)
    }

    pub fn fin(&self) -> bool {
        self.flags.contains(TcpFlags::FIN)
    }

    pub fn rst(&self) -> bool {
        self.flags.contains(TcpFlags::RST)
    }
}

/// Acknowledgement and window advertisement from a receiver to the peer's
/// sender. `ack_no` stays empty until the receiver has seen a SYN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpAck {
    pub ack_no: Option<Wrap32>,
    pub window: u16,
    pub flags: TcpFlags,
}

impl TcpAck {
    pub fn rst(&self) -> bool {
        self.flags.contains(TcpFlags::RST)
    }
}

// -- Unit tests --

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_length_counts_flags() {
        let mut segment = TcpSegment {
            seq_no: Wrap32::new(0),
            flags: TcpFlags::empty(),
            payload: vec![],
        };
        assert_eq!(segment.sequence_length(), 0);

        segment.flags = TcpFlags::SYN;
        assert_eq!(segment.sequence_length(), 1);

        segment.payload = b"abcde".to_vec();
        assert_eq!(segment.sequence_length(), 6);

        segment.flags = TcpFlags::SYN | TcpFlags::FIN;
        assert_eq!(segment.sequence_length(), 7);

        // RST occupies no sequence space
        segment.flags = TcpFlags::RST;
        assert_eq!(segment.sequence_length(), 5);
        assert!(segment.rst());
    }

    #[test]
    fn test_ack_rst_flag() {
        let ack = TcpAck {
            ack_no: None,
            window: 0,
            flags: TcpFlags::RST,
        };
        assert!(ack.rst());
        assert!(ack.ack_no.is_none());
    }
}
