//! Electrical primitives
//!
//! Start, stop and single-bit transfers. SDA only changes while SCL is
//! low, except for the start (SDA falls with SCL high) and stop (SDA
//! rises with SCL high) edges. Every SCL release is followed by a
//! bounded clock-stretch wait.

use bitwire_hal::OpenDrainPin;

use crate::bus::SoftI2c;
use crate::error::Error;

impl<SDA: OpenDrainPin, SCL: OpenDrainPin> SoftI2c<SDA, SCL> {
    /// Generate a start condition
    ///
    /// Fails with [`Error::BusBusy`] if SDA is still low after both lines
    /// were released; nothing else is toggled in that case.
    pub(crate) fn start(&mut self) -> Result<(), Error> {
        self.scl.release();
        self.sda.release();
        if self.sda.is_low() {
            #[cfg(feature = "defmt")]
            defmt::warn!("i2c start: SDA held low, bus busy");
            return Err(Error::BusBusy);
        }

        self.bit_delay();
        self.sda.drive_low();
        self.bit_delay();
        Ok(())
    }

    /// Generate a repeated start after a transfer that ended without stop
    ///
    /// The previous ACK clock is still high at this point, so SCL is
    /// brought low first to let the target release SDA.
    pub(crate) fn restart(&mut self) -> Result<(), Error> {
        self.scl.drive_low();
        self.sda.release();
        self.bit_delay();
        self.start()
    }

    /// Generate a stop condition
    ///
    /// A clock held low past the stretch limit is tolerated.
    pub(crate) fn stop(&mut self) {
        self.scl.drive_low();
        self.sda.drive_low();
        self.bit_delay();
        self.scl.release();
        self.wait_scl_high();
        self.bit_delay();
        self.sda.release();
        self.bit_delay();
    }

    /// Clock out one bit
    pub(crate) fn write_bit(&mut self, bit: bool) {
        self.scl.drive_low();
        if bit {
            self.sda.release();
        } else {
            self.sda.drive_low();
        }
        self.extended_delay();
        self.scl.release();
        self.wait_scl_high();
        self.extended_delay();
    }

    /// Clock in one bit
    pub(crate) fn read_bit(&mut self) -> bool {
        self.scl.drive_low();
        self.sda.release();
        self.extended_delay();
        self.scl.release();
        self.wait_scl_high();
        let bit = self.sda.is_high();
        self.bit_delay();
        bit
    }
}
