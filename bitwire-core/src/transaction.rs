//! Transaction primitives
//!
//! One call is one I2C transaction: start, address byte with the R/W
//! bit, data bytes, and an optional stop. Failures are returned as soon
//! as they happen and the bus is left where it stopped, without a stop
//! condition; the next start condition recovers it.

use bitwire_hal::{I2cBus, OpenDrainPin};
use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

use crate::bus::SoftI2c;
use crate::error::Error;

/// Clock pulses spent nudging a target that still holds SDA after stop
const SDA_RECOVERY_PULSES: u8 = 10;

impl<SDA: OpenDrainPin, SCL: OpenDrainPin> SoftI2c<SDA, SCL> {
    /// Write `data` to the device at 7-bit `address`
    ///
    /// Stops at the first NACKed byte with [`Error::DataNack`]; how many
    /// bytes made it is not reported. An empty `data` still sends start,
    /// address and (if requested) stop.
    pub fn write_to(&mut self, address: u8, data: &[u8], send_stop: bool) -> Result<(), Error> {
        self.start()?;
        self.send_address(address, false)?;
        self.send_data(data)?;
        if send_stop {
            self.stop();
        }
        Ok(())
    }

    /// Read `buf.len()` bytes from the device at 7-bit `address`
    ///
    /// Every byte is ACKed, including the last one.
    pub fn read_from(&mut self, address: u8, buf: &mut [u8], send_stop: bool) -> Result<(), Error> {
        self.start()?;
        self.send_address(address, true)?;
        self.receive_data(buf, false);
        if send_stop {
            self.stop();
            self.recover_sda();
        }
        Ok(())
    }

    /// Write then read with a repeated start in between, then stop
    ///
    /// The last read byte is NACKed so the target lets go of SDA before
    /// the stop.
    pub fn write_then_read(
        &mut self,
        address: u8,
        data: &[u8],
        buf: &mut [u8],
    ) -> Result<(), Error> {
        self.write_to(address, data, false)?;
        self.restart()?;
        self.send_address(address, true)?;
        self.receive_data(buf, true);
        self.stop();
        self.recover_sda();
        Ok(())
    }

    fn send_address(&mut self, address: u8, read: bool) -> Result<(), Error> {
        let byte = ((address & 0x7F) << 1) | u8::from(read);
        if !self.write_byte(byte) {
            #[cfg(feature = "defmt")]
            defmt::debug!("i2c addr 0x{:02x}: NACK", address);
            return Err(Error::AddressNack);
        }
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Error> {
        #[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
        for (index, &byte) in data.iter().enumerate() {
            if !self.write_byte(byte) {
                #[cfg(feature = "defmt")]
                defmt::debug!("i2c data byte {}: NACK", index);
                return Err(Error::DataNack);
            }
        }
        Ok(())
    }

    /// Fill `buf`, NACKing the final byte only if `nack_last` is set
    fn receive_data(&mut self, buf: &mut [u8], nack_last: bool) {
        let last = buf.len().saturating_sub(1);
        for (index, slot) in buf.iter_mut().enumerate() {
            *slot = self.read_byte(nack_last && index == last);
        }
    }

    /// Pulse SCL while a target still holds SDA low after a read
    fn recover_sda(&mut self) {
        let mut pulses = 0u8;
        while self.sda.is_low() && pulses < SDA_RECOVERY_PULSES {
            pulses += 1;
            self.scl.drive_low();
            self.bit_delay();
            self.scl.release();
            self.bit_delay();
        }

        #[cfg(feature = "defmt")]
        if pulses > 0 {
            defmt::debug!("i2c: {} recovery pulses after read", pulses);
        }
    }
}

impl<SDA: OpenDrainPin, SCL: OpenDrainPin> I2cBus for SoftI2c<SDA, SCL> {
    type Error = Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.write_to(address, data, true)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.read_from(address, buf, true)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.write_then_read(address, write_data, read_buf)
    }
}

impl<SDA: OpenDrainPin, SCL: OpenDrainPin> ErrorType for SoftI2c<SDA, SCL> {
    type Error = Error;
}

impl<SDA: OpenDrainPin, SCL: OpenDrainPin> I2c<SevenBitAddress> for SoftI2c<SDA, SCL> {
    /// Run a sequence of operations as one transaction
    ///
    /// Adjacent operations in the same direction share one addressed
    /// segment; a direction change sends a repeated start. A read segment
    /// NACKs its last byte unless another read continues it, so the target
    /// lets go of SDA before the repeated start or the stop.
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut previous: Option<bool> = None;

        for index in 0..operations.len() {
            let is_read = matches!(operations[index], Operation::Read(_));
            let nack_last = !matches!(operations.get(index + 1), Some(Operation::Read(_)));

            if previous != Some(is_read) {
                match previous {
                    None => self.start()?,
                    Some(_) => self.restart()?,
                }
                self.send_address(address, is_read)?;
            }

            match &mut operations[index] {
                Operation::Write(data) => self.send_data(data)?,
                Operation::Read(buf) => self.receive_data(buf, nack_last),
            }
            previous = Some(is_read);
        }

        if let Some(was_read) = previous {
            self.stop();
            if was_read {
                self.recover_sda();
            }
        }
        Ok(())
    }
}
