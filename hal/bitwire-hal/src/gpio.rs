//! GPIO pin abstractions
//!
//! I2C lines are open-drain: a device either pulls the line low or lets
//! go of it, and an external (or internal) pull-up brings it high. The
//! trait below exposes exactly that, so a bus implementation can never
//! drive a line high by accident.

/// Input configuration of a released pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Plain input, no pull resistor (pin floats)
    Input,
    /// Input with the internal pull-up enabled
    InputPullUp,
}

/// Open-drain capable GPIO pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip. `drive_low` and `release` are called on every
/// bit, so they should be cheap.
pub trait OpenDrainPin {
    /// Configure the pin's input mode
    ///
    /// Used when the bus is brought up or torn down, never mid-transfer.
    fn set_mode(&mut self, mode: PinMode);

    /// Actively pull the line low (output, level 0)
    fn drive_low(&mut self);

    /// Stop driving the line and let the pull-up take it high
    fn release(&mut self);

    /// Check if the line currently reads high
    fn is_high(&self) -> bool;

    /// Check if the line currently reads low
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
