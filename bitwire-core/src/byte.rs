//! Byte primitives
//!
//! Eight bits MSB first, then one acknowledge bit driven by the receiver.

use bitwire_hal::OpenDrainPin;

use crate::bus::SoftI2c;

impl<SDA: OpenDrainPin, SCL: OpenDrainPin> SoftI2c<SDA, SCL> {
    /// Send one byte, returning `true` if the target ACKed it
    ///
    /// A NACK is a normal protocol outcome, not a bus fault.
    pub(crate) fn write_byte(&mut self, byte: u8) -> bool {
        for shift in (0..8).rev() {
            self.write_bit(byte & (1 << shift) != 0);
        }
        // ACK is the target pulling SDA low
        !self.read_bit()
    }

    /// Receive one byte, then send `nack` as the acknowledge bit
    ///
    /// `nack = false` ACKs the byte (more wanted), `true` NACKs it.
    pub(crate) fn read_byte(&mut self, nack: bool) -> u8 {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | u8::from(self.read_bit());
        }
        self.write_bit(nack);
        byte
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::{ScriptedTarget, SimBus};
    use crate::timing::CpuClass;
    use crate::SoftI2c;

    #[test]
    fn test_write_byte_reports_ack() {
        let sim = SimBus::new(ScriptedTarget::new(0x20));
        let mut i2c = SoftI2c::new(sim.sda(), sim.scl(), CpuClass::Mhz80);

        i2c.start().unwrap();
        assert!(i2c.write_byte(0x20 << 1));
        assert!(i2c.write_byte(0xA5));
        i2c.stop();

        let target = sim.target();
        assert_eq!(target.written(), &[0xA5]);
    }

    #[test]
    fn test_write_byte_reports_nack_for_wrong_address() {
        let sim = SimBus::new(ScriptedTarget::new(0x20));
        let mut i2c = SoftI2c::new(sim.sda(), sim.scl(), CpuClass::Mhz80);

        i2c.start().unwrap();
        assert!(!i2c.write_byte(0x21 << 1));
        i2c.stop();
    }

    #[test]
    fn test_read_byte_msb_first() {
        let sim = SimBus::new(ScriptedTarget::new(0x20).with_read_data(&[0b1000_0001, 0x7E]));
        let mut i2c = SoftI2c::new(sim.sda(), sim.scl(), CpuClass::Mhz80);

        i2c.start().unwrap();
        assert!(i2c.write_byte((0x20 << 1) | 1));
        assert_eq!(i2c.read_byte(false), 0b1000_0001);
        assert_eq!(i2c.read_byte(true), 0x7E);
        i2c.stop();

        assert_eq!(sim.stats().master_nacks, 1);
    }
}
