//! I2C master interface
//!
//! The byte-level contract board code and drivers see. The bit-banged
//! bus in `bitwire-core` is the implementation; a chip's hardware I2C
//! block could sit behind the same trait.

/// I2C bus master
///
/// Each call claims the bus with a start condition and hands it back
/// with a stop, unless it fails. Addresses are 7 bits; the read/write
/// bit is appended by the bus and anything above bit 6 is ignored.
///
/// A NACK or a busy bus ends the call at once with no stop and no retry.
/// The next start condition recovers the bus.
pub trait I2cBus {
    /// Failure reported by a transfer
    type Error;

    /// Address `address` for writing and send `data`
    ///
    /// An empty `data` only checks that the device answers its address.
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Address `address` for reading and fill `buf`
    ///
    /// Every byte, the last one included, is ACKed. A device that keeps
    /// sending can then hold SDA low through the stop, so the bus clocks
    /// SCL afterwards until SDA is free again.
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send `write_data`, then read into `read_buf` after a repeated start
    ///
    /// No stop is sent between the two halves, so the device keeps its
    /// register pointer. The last byte of `read_buf` is NACKed before the
    /// final stop.
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Create a config for an arbitrary clock frequency
    pub const fn with_frequency(frequency: u32) -> Self {
        Self { frequency }
    }
}
