//! Bus settings
//!
//! Describes one software I2C bus as data: which pins, how fast, and the
//! core clock the delay tables should assume. Boards build this from
//! constants, or from the `[i2c]` table of a TOML file with the `toml`
//! feature:
//!
//! ```toml
//! [i2c]
//! sda_pin = 4
//! scl_pin = 5
//! frequency_hz = 400000
//! cpu_hz = 160000000
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use bitwire_hal::I2cConfig;

use crate::timing::{CpuClass, DEFAULT_FREQUENCY_HZ};

/// Settings for one software I2C bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BusSettings {
    /// GPIO number of the data line
    pub sda_pin: u8,
    /// GPIO number of the clock line
    pub scl_pin: u8,
    /// Target SCL frequency in Hz
    pub frequency_hz: u32,
    /// Core clock in Hz, selects the delay table
    pub cpu_hz: u32,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            sda_pin: 4,
            scl_pin: 5,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            cpu_hz: 80_000_000,
        }
    }
}

/// Settings rejected by [`BusSettings::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// SDA and SCL name the same GPIO
    SamePin,
    /// Frequency of 0 Hz
    ZeroFrequency,
    /// Core clock of 0 Hz
    ZeroCpuClock,
    /// Malformed TOML or wrong value types
    Parse,
}

impl BusSettings {
    /// Check the settings can describe a working bus
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sda_pin == self.scl_pin {
            return Err(ConfigError::SamePin);
        }
        if self.frequency_hz == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if self.cpu_hz == 0 {
            return Err(ConfigError::ZeroCpuClock);
        }
        Ok(())
    }

    /// Delay table class for the configured core clock
    pub fn cpu_class(&self) -> CpuClass {
        CpuClass::from_hz(self.cpu_hz)
    }

    /// Bus clock as an [`I2cConfig`]
    pub fn i2c_config(&self) -> I2cConfig {
        I2cConfig::with_frequency(self.frequency_hz)
    }
}

/// Parse and validate the `[i2c]` table of a TOML document
///
/// Missing keys fall back to [`BusSettings::default`]; a document without
/// an `[i2c]` table yields the defaults.
#[cfg(feature = "toml")]
pub fn from_toml(input: &str) -> Result<BusSettings, ConfigError> {
    #[derive(Deserialize)]
    struct Document {
        #[serde(default)]
        i2c: BusSettings,
    }

    let doc: Document = toml::from_str(input).map_err(|_| ConfigError::Parse)?;
    doc.i2c.validate()?;
    Ok(doc.i2c)
}
