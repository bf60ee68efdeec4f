//! Bit timing calibration
//!
//! There is no hardware timer behind the bus: every delay is a loop of
//! GPIO input reads, and the clock-stretch timeout is a poll count. Both
//! were measured per CPU speed class, so the achievable SCL frequency is
//! only approximate.
//!
//! | Requested      | 80 MHz class | 160 MHz class | Actual (approx.) |
//! |----------------|--------------|---------------|------------------|
//! | ≤ 100 kHz      | 18           | 32            | 100 kHz          |
//! | ≤ 200 kHz      | 8            | 16            | 200 kHz          |
//! | ≤ 300 kHz      | 4            | 8             | 300 kHz          |
//! | ≤ 400 kHz      | 2            | 4             | 370 kHz          |
//! | faster         | 1            | 2             | 450 kHz          |

use bitwire_hal::I2cConfig;

/// Frequency assumed when a bus is first configured
pub const DEFAULT_FREQUENCY_HZ: u32 = 100_000;

/// Upper edge of each frequency band, fastest band excluded
const BAND_LIMITS_HZ: [u32; 4] = [100_000, 200_000, 300_000, 400_000];

/// Delay counts per band for the 80 MHz class (last entry = fastest)
const DELAYS_80MHZ: [u8; 5] = [18, 8, 4, 2, 1];

/// Delay counts per band for the 160 MHz class (last entry = fastest)
const DELAYS_160MHZ: [u8; 5] = [32, 16, 8, 4, 2];

/// CPU speed class the delay tables were calibrated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CpuClass {
    /// Cores clocked at or below 80 MHz
    #[default]
    Mhz80,
    /// Anything faster
    Mhz160,
}

impl CpuClass {
    /// Pick the class for a core clock in Hz
    pub const fn from_hz(cpu_hz: u32) -> Self {
        if cpu_hz <= 80_000_000 {
            CpuClass::Mhz80
        } else {
            CpuClass::Mhz160
        }
    }

    /// Clock-stretch poll limit, roughly 100 µs of SCL reads
    pub const fn stretch_limit(self) -> u16 {
        match self {
            CpuClass::Mhz80 => 200,
            CpuClass::Mhz160 => 400,
        }
    }

    const fn delay_table(self) -> &'static [u8; 5] {
        match self {
            CpuClass::Mhz80 => &DELAYS_80MHZ,
            CpuClass::Mhz160 => &DELAYS_160MHZ,
        }
    }
}

/// Per-bit delay count for a requested SCL frequency
pub fn delay_count(class: CpuClass, freq_hz: u32) -> u8 {
    let table = class.delay_table();
    let band = BAND_LIMITS_HZ
        .iter()
        .position(|&limit| freq_hz <= limit)
        .unwrap_or(BAND_LIMITS_HZ.len());
    table[band]
}

/// Timing half of the bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    cpu_class: CpuClass,
    frequency_hz: u32,
    delay_count: u8,
    stretch_limit: u16,
}

impl Timing {
    /// Standard-mode timing for the given CPU class
    pub fn new(cpu_class: CpuClass) -> Self {
        let mut timing = Self {
            cpu_class,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            delay_count: 0,
            stretch_limit: cpu_class.stretch_limit(),
        };
        timing.set_clock(DEFAULT_FREQUENCY_HZ);
        timing
    }

    /// Recompute the delay count for a new target frequency
    pub fn set_clock(&mut self, freq_hz: u32) {
        self.frequency_hz = freq_hz;
        self.delay_count = delay_count(self.cpu_class, freq_hz);
    }

    /// CPU class the tables are read from
    pub fn cpu_class(&self) -> CpuClass {
        self.cpu_class
    }

    /// Last requested frequency (not the achieved one)
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Input reads per bit-delay
    pub fn delay_count(&self) -> u8 {
        self.delay_count
    }

    /// Input reads before the data setup/hold edge is taken
    pub fn extended_delay(&self) -> u16 {
        u16::from(self.delay_count) + 1
    }

    /// Maximum SCL polls while a target stretches the clock
    pub fn stretch_limit(&self) -> u16 {
        self.stretch_limit
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(CpuClass::default())
    }
}

impl From<(CpuClass, I2cConfig)> for Timing {
    fn from((class, config): (CpuClass, I2cConfig)) -> Self {
        let mut timing = Self::new(class);
        timing.set_clock(config.frequency);
        timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_standard_mode() {
        let timing = Timing::new(CpuClass::Mhz80);
        assert_eq!(timing.frequency_hz(), 100_000);
        assert_eq!(timing.delay_count(), 18);
        assert_eq!(timing.stretch_limit(), 200);

        let timing = Timing::new(CpuClass::Mhz160);
        assert_eq!(timing.delay_count(), 32);
        assert_eq!(timing.stretch_limit(), 400);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(delay_count(CpuClass::Mhz80, 100_000), 18);
        assert_eq!(delay_count(CpuClass::Mhz80, 100_001), 8);
        assert_eq!(delay_count(CpuClass::Mhz80, 300_000), 4);
        assert_eq!(delay_count(CpuClass::Mhz80, 400_000), 2);
        assert_eq!(delay_count(CpuClass::Mhz80, 1_000_000), 1);

        assert_eq!(delay_count(CpuClass::Mhz160, 0), 32);
        assert_eq!(delay_count(CpuClass::Mhz160, 200_000), 16);
        assert_eq!(delay_count(CpuClass::Mhz160, 250_000), 8);
        assert_eq!(delay_count(CpuClass::Mhz160, 400_000), 4);
        assert_eq!(delay_count(CpuClass::Mhz160, u32::MAX), 2);
    }

    #[test]
    fn test_cpu_class_from_hz() {
        assert_eq!(CpuClass::from_hz(80_000_000), CpuClass::Mhz80);
        assert_eq!(CpuClass::from_hz(48_000_000), CpuClass::Mhz80);
        assert_eq!(CpuClass::from_hz(125_000_000), CpuClass::Mhz160);
        assert_eq!(CpuClass::from_hz(160_000_000), CpuClass::Mhz160);
    }

    #[test]
    fn test_set_clock_keeps_stretch_limit() {
        let mut timing = Timing::new(CpuClass::Mhz80);
        timing.set_clock(400_000);
        assert_eq!(timing.delay_count(), 2);
        assert_eq!(timing.extended_delay(), 3);
        assert_eq!(timing.stretch_limit(), 200);
        assert_eq!(timing.frequency_hz(), 400_000);
    }

    #[test]
    fn test_from_i2c_config() {
        let timing = Timing::from((CpuClass::Mhz160, I2cConfig::FAST));
        assert_eq!(timing.delay_count(), 4);
    }

    proptest! {
        #[test]
        fn prop_faster_clock_never_longer_delay(a in any::<u32>(), b in any::<u32>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for class in [CpuClass::Mhz80, CpuClass::Mhz160] {
                prop_assert!(delay_count(class, hi) <= delay_count(class, lo));
            }
        }

        #[test]
        fn prop_delay_always_positive(freq in any::<u32>()) {
            prop_assert!(delay_count(CpuClass::Mhz80, freq) >= 1);
            prop_assert!(delay_count(CpuClass::Mhz160, freq) >= 1);
        }
    }
}
