//! Error type shared across the encoder.

use core::fmt;

/// Errors surfaced by the encoder. Any failure aborts the current image;
/// the session becomes unusable until the next [`write_header`] call.
///
/// [`write_header`]: crate::Encoder::write_header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// Invalid dimensions, comment too long, or MCU slice of the wrong size.
    Config(&'static str),
    /// Output would exceed the fixed staging buffer capacity.
    BufferOverflow,
    /// Pull contract violated, or the push callback reported failure.
    Io(&'static str),
    /// Session driven out of order (MCU/footer without a prior header),
    /// or the bit accumulator left in an invalid state.
    State(&'static str),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "jpeg: invalid configuration: {msg}"),
            Self::BufferOverflow => write!(f, "jpeg: staging buffer overflow"),
            Self::Io(msg) => write!(f, "jpeg: I/O callback failed: {msg}"),
            Self::State(msg) => write!(f, "jpeg: invalid session state: {msg}"),
        }
    }
}

impl core::error::Error for EncodeError {}

pub type Result<T> = core::result::Result<T, EncodeError>;
