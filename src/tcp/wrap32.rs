use rand::Rng;
use std::fmt;

/// A 32-bit sequence number that wraps around an initial sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrap32 {
    value: u32,
}

impl Wrap32 {
    const WRAP_SIZE: u64 = 1 << 32;
    const HALF_WRAP: u64 = 1 << 31;

    pub fn new(value: u32) -> Self {
        Wrap32 { value }
    }

    /// A random initial sequence number
    pub fn random() -> Self {
        Wrap32::new(rand::thread_rng().gen())
    }

    /// The raw 32-bit value
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Wrap an absolute sequence number `n` around the `isn`
    pub fn wrap(n: u64, isn: Wrap32) -> Self {
        Wrap32::new(isn.value.wrapping_add(n as u32))
    }

    /// Unwrap to the absolute sequence number closest to `checkpoint`.
    ///
    /// Ties between two equidistant candidates resolve to the higher one,
    /// and the result is never below the raw offset from the isn.
    pub fn unwrap(&self, isn: Wrap32, checkpoint: u64) -> u64 {
        let offset = self.value.wrapping_sub(isn.value) as u64;

        // Number of full wraps that lands the candidate inside the
        // half-wrap window around the checkpoint
        let wraps = (checkpoint + Self::HALF_WRAP).saturating_sub(offset) / Self::WRAP_SIZE;

        offset + wraps * Self::WRAP_SIZE
    }
}

impl fmt::Display for Wrap32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

// -- Unit tests --
