//! Driver error

use core::fmt;

/// The only way a display operation can fail: the bus write did not complete.
///
/// The operation that hit the error is abandoned where it stood, so any
/// tracked cursor position may no longer match the hardware. Re-sync with
/// [`Lcd::set_cursor_pos`](crate::lcd::Lcd::set_cursor_pos) before relying on it.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// Error returned by the underlying I2C implementation
    Bus(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "I2C bus write failed: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Bus(_e) => defmt::write!(fmt, "I2C bus write failed"),
        }
    }
}
