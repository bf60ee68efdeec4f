//! RP2040 backend for the software I2C master
//!
//! This crate implements the `bitwire-hal` pin trait on top of
//! `embassy-rp` GPIOs, so any two pins can carry an I2C bus:
//!
//! - Open-drain emulation on a [`embassy_rp::gpio::Flex`] pin
//! - Bus construction with the delay table picked from `clk_sys`

#![no_std]

pub mod gpio;

pub use gpio::OpenDrain;

use bitwire_core::{CpuClass, SoftI2c};
use bitwire_hal::I2cConfig;
use embassy_rp::gpio::Pin;
use embassy_rp::Peri;

/// Software I2C bus on two RP2040 GPIOs
pub type Rp2040I2c<'d> = SoftI2c<OpenDrain<'d>, OpenDrain<'d>>;

/// Delay table class for the current system clock
pub fn cpu_class() -> CpuClass {
    CpuClass::from_hz(embassy_rp::clocks::clk_sys_freq())
}

/// Bring up a software I2C bus on `sda` and `scl`
///
/// Call after clocks are initialized; the delay table is chosen from the
/// system clock at this point and not revisited.
pub fn new_bus<'d>(
    sda: Peri<'d, impl Pin>,
    scl: Peri<'d, impl Pin>,
    config: I2cConfig,
) -> Rp2040I2c<'d> {
    let class = cpu_class();

    #[cfg(feature = "defmt")]
    defmt::info!("soft i2c on rp2040: {} Hz, class {}", config.frequency, class);

    SoftI2c::with_config(OpenDrain::new(sda), OpenDrain::new(scl), class, config)
}
