//! Transaction errors
//!
//! None of these are retried by the bus; the caller owns retry policy.
//! A clock-stretch timeout is not an error: the wait gives up and the
//! transfer carries on.

use core::fmt;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

/// Numeric status of a successful transaction
pub const STATUS_SUCCESS: u8 = 0;

/// I2C transaction failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Target did not acknowledge its address (absent device, wrong address)
    AddressNack,
    /// Target rejected a data byte; the rest of the buffer was not sent
    DataNack,
    /// SDA stayed low when released, so no start condition could be made
    BusBusy,
}

impl Error {
    /// Numeric status code (2, 3 or 4)
    pub const fn code(self) -> u8 {
        match self {
            Error::AddressNack => 2,
            Error::DataNack => 3,
            Error::BusBusy => 4,
        }
    }
}

/// Numeric status of a transaction result (0 on success)
pub fn status_code(result: &Result<(), Error>) -> u8 {
    match result {
        Ok(()) => STATUS_SUCCESS,
        Err(e) => e.code(),
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AddressNack => f.write_str("address not acknowledged"),
            Error::DataNack => f.write_str("data not acknowledged"),
            Error::BusBusy => f.write_str("bus busy"),
        }
    }
}

impl core::error::Error for Error {}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::AddressNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Error::DataNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            Error::BusBusy => ErrorKind::Bus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::Error as _;

    #[test]
    fn test_status_codes() {
        assert_eq!(status_code(&Ok(())), 0);
        assert_eq!(status_code(&Err(Error::AddressNack)), 2);
        assert_eq!(status_code(&Err(Error::DataNack)), 3);
        assert_eq!(status_code(&Err(Error::BusBusy)), 4);
    }

    #[test]
    fn test_embedded_hal_kinds() {
        assert_eq!(
            Error::AddressNack.kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );
        assert_eq!(
            Error::DataNack.kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
        );
        assert_eq!(Error::BusBusy.kind(), ErrorKind::Bus);
    }
}
