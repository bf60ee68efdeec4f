//! Bit-banged I2C bus master
//!
//! Drives SCL and SDA as two open-drain GPIOs to run the I2C protocol
//! in software, for boards where no hardware controller is free or the
//! pins cannot be routed to one. Always the single master on its bus.
//!
//! Layers, each built only on the one below:
//!
//! - Configuration and timing ([`timing`], [`config`], [`bus`])
//! - Electrical primitives: start, stop, bit write, bit read
//! - Byte primitives: 8 bits plus ACK/NACK
//! - Transactions: [`SoftI2c::write_to`] and [`SoftI2c::read_from`]
//!
//! Timing comes from delay loops of GPIO reads, not a hardware timer, so
//! bus frequencies are approximate. Everything runs to completion on the
//! caller; the only waits are bounded polling loops.
//!
//! The `sim` feature exposes the simulated bus and targets used by the
//! tests, for exercising device drivers on the host.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
mod byte;
pub mod config;
mod electrical;
pub mod error;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod timing;
mod transaction;

pub use bus::SoftI2c;
pub use config::{BusSettings, ConfigError};
pub use error::{status_code, Error, STATUS_SUCCESS};
pub use timing::{CpuClass, Timing};

#[cfg(feature = "toml")]
pub use config::from_toml;
