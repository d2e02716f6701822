use crate::tcp::wrap32::Wrap32;

/// Largest payload carried by a single segment
pub const MAX_PAYLOAD_SIZE: usize = 1452;

/// Largest window a receiver can advertise in its 16-bit field
pub const MAX_WINDOW_SIZE: usize = u16::MAX as usize;

/// Default byte stream capacity
pub const DEFAULT_CAPACITY: usize = 64000;

/// Default initial retransmission timeout
pub const DEFAULT_RTO_MS: u64 = 1000;

/// Host-facing knobs for building an endpoint
#[derive(Debug, Clone)]
pub struct TcpConfig {
    pub capacity: usize,
    pub isn: Wrap32,
    pub initial_rto_ms: u64,
}

impl Default for TcpConfig {
    fn default() -> Self {
        TcpConfig {
            capacity: DEFAULT_CAPACITY,
            isn: Wrap32::random(),
            initial_rto_ms: DEFAULT_RTO_MS,
        }
    }
}

// -- Unit tests --
