use bitflags::bitflags;

bitflags! {
    // Control bits at their wire positions [ ACK, RST, SYN, FIN ]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TcpFlags: u8 {
        const ACK = 1 << 4;
        const RST = 1 << 2;
        const SYN = 1 << 1;
        const FIN = 1 << 0;
    }
}

// -- Unit tests --
