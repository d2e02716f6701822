pub mod byte_stream;
pub mod config;
pub mod errors;
pub mod reassembler;
pub mod receiver;
pub mod segment;
pub mod sender;
pub mod tcp_flags;
pub mod timer;
pub mod wrap32;

// -- Re-export public structs --

pub use byte_stream::ByteStream;
pub use reassembler::Reassembler;
pub use receiver::TcpReceiver;
pub use segment::{TcpAck, TcpSegment};
pub use sender::TcpSender;
pub use tcp_flags::TcpFlags;
pub use wrap32::Wrap32;
