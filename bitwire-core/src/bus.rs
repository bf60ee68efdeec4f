//! Software I2C bus object
//!
//! One [`SoftI2c`] owns one SDA/SCL pin pair and its timing. Transfers
//! take `&mut self`, so only one transaction can be in flight per bus.
//! Nothing here is interrupt safe: calling into the same bus from an
//! interrupt while a transfer is running corrupts the bus protocol.

use bitwire_hal::{I2cConfig, OpenDrainPin, PinMode};

use crate::config::BusSettings;
use crate::timing::{CpuClass, Timing};

/// Bit-banged I2C master
pub struct SoftI2c<SDA, SCL> {
    pub(crate) sda: SDA,
    pub(crate) scl: SCL,
    pub(crate) timing: Timing,
}

impl<SDA: OpenDrainPin, SCL: OpenDrainPin> SoftI2c<SDA, SCL> {
    /// Take over two pins and idle the bus at 100 kHz
    ///
    /// Both lines are released with their pull-ups enabled, so the bus
    /// reads high until a target or the first start condition pulls it.
    pub fn new(mut sda: SDA, mut scl: SCL, cpu_class: CpuClass) -> Self {
        sda.set_mode(PinMode::InputPullUp);
        scl.set_mode(PinMode::InputPullUp);

        let timing = Timing::new(cpu_class);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "soft i2c up: class={} delay={}",
            timing.cpu_class(),
            timing.delay_count()
        );

        Self { sda, scl, timing }
    }

    /// Take over two pins with an explicit bus configuration
    pub fn with_config(sda: SDA, scl: SCL, cpu_class: CpuClass, config: I2cConfig) -> Self {
        let mut bus = Self::new(sda, scl, cpu_class);
        bus.apply(config);
        bus
    }

    /// Take over two pins as described by [`BusSettings`]
    ///
    /// Pin numbers in the settings are for the board code that picked
    /// `sda` and `scl`; they are not checked here.
    pub fn from_settings(sda: SDA, scl: SCL, settings: &BusSettings) -> Self {
        Self::with_config(sda, scl, settings.cpu_class(), settings.i2c_config())
    }

    /// Change the SCL frequency (approximate)
    pub fn set_clock(&mut self, freq_hz: u32) {
        self.timing.set_clock(freq_hz);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "soft i2c clock {} Hz -> delay {}",
            freq_hz,
            self.timing.delay_count()
        );
    }

    /// Apply an [`I2cConfig`]
    pub fn apply(&mut self, config: I2cConfig) {
        self.set_clock(config.frequency);
    }

    /// Current timing parameters
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Last requested SCL frequency in Hz
    pub fn frequency(&self) -> u32 {
        self.timing.frequency_hz()
    }

    /// Tear the bus down and hand the pins back
    ///
    /// Both pins end up as plain inputs with no pull-up.
    pub fn release(mut self) -> (SDA, SCL) {
        self.sda.release();
        self.scl.release();
        self.sda.set_mode(PinMode::Input);
        self.scl.set_mode(PinMode::Input);
        (self.sda, self.scl)
    }

    /// Spin for `count` GPIO input reads
    ///
    /// The delay tables are calibrated in units of one input read.
    pub(crate) fn delay(&self, count: u16) {
        for _ in 0..count {
            let _ = self.sda.is_high();
        }
    }

    /// One bit-delay
    pub(crate) fn bit_delay(&self) {
        self.delay(u16::from(self.timing.delay_count()));
    }

    /// Bit-delay plus one read, used around data setup
    pub(crate) fn extended_delay(&self) {
        self.delay(self.timing.extended_delay());
    }

    /// Wait for a released SCL to actually read high
    ///
    /// Gives up after the stretch limit and lets the caller continue.
    pub(crate) fn wait_scl_high(&self) {
        let limit = self.timing.stretch_limit();
        let mut polls = 0u16;
        while self.scl.is_low() && polls < limit {
            polls += 1;
        }

        #[cfg(feature = "defmt")]
        if polls >= limit {
            defmt::trace!("SCL still low after {} polls", polls);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Pin with one driver and a pull-up, counting reads
    struct MockPin {
        low: bool,
        mode: Option<PinMode>,
        reads: Cell<u32>,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                low: false,
                mode: None,
                reads: Cell::new(0),
            }
        }
    }

    impl OpenDrainPin for MockPin {
        fn set_mode(&mut self, mode: PinMode) {
            self.mode = Some(mode);
        }

        fn drive_low(&mut self) {
            self.low = true;
        }

        fn release(&mut self) {
            self.low = false;
        }

        fn is_high(&self) -> bool {
            self.reads.set(self.reads.get() + 1);
            !self.low
        }
    }

    #[test]
    fn test_new_idles_with_pullups() {
        let bus = SoftI2c::new(MockPin::new(), MockPin::new(), CpuClass::Mhz80);
        assert_eq!(bus.sda.mode, Some(PinMode::InputPullUp));
        assert_eq!(bus.scl.mode, Some(PinMode::InputPullUp));
        assert!(!bus.sda.low);
        assert!(!bus.scl.low);
        assert_eq!(bus.frequency(), 100_000);
        assert_eq!(bus.timing().delay_count(), 18);
    }

    #[test]
    fn test_release_returns_plain_inputs() {
        let mut bus = SoftI2c::new(MockPin::new(), MockPin::new(), CpuClass::Mhz80);
        bus.sda.drive_low();
        let (sda, scl) = bus.release();
        assert_eq!(sda.mode, Some(PinMode::Input));
        assert_eq!(scl.mode, Some(PinMode::Input));
        assert!(!sda.low);
    }

    #[test]
    fn test_set_clock_and_apply() {
        let mut bus = SoftI2c::new(MockPin::new(), MockPin::new(), CpuClass::Mhz160);
        bus.set_clock(400_000);
        assert_eq!(bus.timing().delay_count(), 4);
        bus.apply(I2cConfig::STANDARD);
        assert_eq!(bus.timing().delay_count(), 32);

        let bus = SoftI2c::with_config(
            MockPin::new(),
            MockPin::new(),
            CpuClass::Mhz80,
            I2cConfig::FAST,
        );
        assert_eq!(bus.frequency(), 400_000);
    }

    #[test]
    fn test_from_settings() {
        let settings = BusSettings {
            frequency_hz: 200_000,
            cpu_hz: 160_000_000,
            ..BusSettings::default()
        };
        let bus = SoftI2c::from_settings(MockPin::new(), MockPin::new(), &settings);
        assert_eq!(bus.timing().cpu_class(), CpuClass::Mhz160);
        assert_eq!(bus.timing().delay_count(), 16);
        assert_eq!(bus.timing().stretch_limit(), 400);
    }

    #[test]
    fn test_delay_counts_reads() {
        let bus = SoftI2c::new(MockPin::new(), MockPin::new(), CpuClass::Mhz80);
        bus.bit_delay();
        assert_eq!(bus.sda.reads.get(), 18);
        bus.extended_delay();
        assert_eq!(bus.sda.reads.get(), 18 + 19);
    }

    #[test]
    fn test_stretch_wait_is_bounded() {
        let mut bus = SoftI2c::new(MockPin::new(), MockPin::new(), CpuClass::Mhz80);
        bus.scl.drive_low();
        bus.wait_scl_high();
        // Limit polls plus the final failing check
        assert_eq!(bus.scl.reads.get(), 201);
    }
}
