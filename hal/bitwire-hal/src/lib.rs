//! Bitwire Hardware Abstraction Layer
//!
//! This crate defines the traits the software I2C engine needs from the
//! hardware. Chip-specific crates implement them, so the same protocol
//! code runs on any target that can flip a GPIO between "pulled low" and
//! "released".
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Device drivers / application           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bitwire-core (protocol engine)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bitwire-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ bitwire-hal-  │       │  simulated    │
//! │    rp2040     │       │  pins (tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OpenDrainPin`] - Open-drain line control
//! - [`i2c::I2cBus`] - I2C bus master operations

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::{OpenDrainPin, PinMode};
pub use i2c::{I2cBus, I2cConfig};
