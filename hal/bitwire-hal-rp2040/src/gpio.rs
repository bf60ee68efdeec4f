//! Open-drain GPIO on RP2040
//!
//! The output latch is set low once; after that only the output enable
//! moves, so the pin is either pulling low or released. It is never
//! driven high.

use bitwire_hal::{OpenDrainPin, PinMode};
use embassy_rp::gpio::{Flex, Pin, Pull};
use embassy_rp::Peri;

/// RP2040 pin used as an open-drain I2C line
pub struct OpenDrain<'d> {
    pin: Flex<'d>,
}

impl<'d> OpenDrain<'d> {
    /// Take a pin, released with the internal pull-up on
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_low();
        pin.set_pull(Pull::Up);
        pin.set_as_input();
        Self { pin }
    }
}

impl OpenDrainPin for OpenDrain<'_> {
    fn set_mode(&mut self, mode: PinMode) {
        let pull = match mode {
            PinMode::Input => Pull::None,
            PinMode::InputPullUp => Pull::Up,
        };
        self.pin.set_pull(pull);
        self.pin.set_as_input();
    }

    fn drive_low(&mut self) {
        self.pin.set_as_output();
    }

    fn release(&mut self) {
        self.pin.set_as_input();
    }

    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
