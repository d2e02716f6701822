use thiserror::Error;

/// States in which a `ByteStream` refuses io traffic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    #[error("byte stream is closed for writing")]
    Closed,

    #[error("byte stream is in error state")]
    Poisoned,
}
