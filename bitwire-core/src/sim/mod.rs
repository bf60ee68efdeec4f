//! Simulated I2C bus
//!
//! Two wired-AND lines with pull-ups, shared by the master under test
//! (through [`SimPin`] handles) and one simulated target. Time advances
//! one tick per pin read, which is also the unit of the bus delay loops,
//! so clock stretching can be expressed in the same currency as the
//! stretch limit.
//!
//! ```ignore
//! let sim = SimBus::new(LoopbackTarget::new(0x50));
//! let mut i2c = SoftI2c::new(sim.sda(), sim.scl(), CpuClass::Mhz80);
//! i2c.write_to(0x50, &[1, 2, 3], true)?;
//! ```

mod decoder;
mod targets;

use core::cell::{Ref, RefCell, RefMut};

use bitwire_hal::{OpenDrainPin, PinMode};

use decoder::Wire;

pub use targets::{LoopbackTarget, ScriptedTarget, StuckSdaTarget, TARGET_BUFFER};

/// How long a target holds SCL low after the master releases it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stretch {
    /// Let the clock rise immediately
    #[default]
    None,
    /// Hold for this many ticks (pin reads)
    Ticks(u32),
    /// Never let go
    Forever,
}

/// Behaviour of the device on the simulated bus
pub trait SimTarget {
    /// 7-bit address the target answers to
    fn address(&self) -> u8;

    /// Start or repeated start seen
    fn on_start(&mut self) {}

    /// Stop seen
    fn on_stop(&mut self) {}

    /// Master wrote a data byte; return `true` to ACK it
    fn on_write(&mut self, byte: u8) -> bool;

    /// Master wants the next byte
    fn on_read(&mut self) -> u8;

    /// Called whenever the master releases SCL
    fn stretch(&mut self) -> Stretch {
        Stretch::None
    }

    /// A target that shorts SDA to ground regardless of protocol state
    fn holds_sda(&self) -> bool {
        false
    }
}

/// Counters collected while the bus runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimStats {
    /// Pin reads by the master
    pub ticks: u64,
    /// `drive_low`/`release` calls by the master
    pub master_ops: u32,
    /// SCL rising edges
    pub scl_pulses: u32,
    /// Start and repeated start conditions
    pub starts: u32,
    /// Stop conditions
    pub stops: u32,
    /// Complete bytes clocked into the target, address bytes included
    pub bytes_received: u32,
    /// Complete bytes clocked out of the target
    pub bytes_sent: u32,
    /// Bytes the master ACKed
    pub master_acks: u32,
    /// Bytes the master NACKed
    pub master_nacks: u32,
}

/// Which line a [`SimPin`] drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Data line
    Sda,
    /// Clock line
    Scl,
}

/// Simulated two-wire bus with one target attached
pub struct SimBus<T> {
    wire: RefCell<Wire<T>>,
}

impl<T: SimTarget> SimBus<T> {
    /// Idle bus (both lines high) with `target` attached
    pub fn new(target: T) -> Self {
        Self {
            wire: RefCell::new(Wire::new(target)),
        }
    }

    /// Master-side SDA handle
    pub fn sda(&self) -> SimPin<'_, T> {
        SimPin {
            bus: self,
            line: Line::Sda,
        }
    }

    /// Master-side SCL handle
    pub fn scl(&self) -> SimPin<'_, T> {
        SimPin {
            bus: self,
            line: Line::Scl,
        }
    }

    /// The attached target
    pub fn target(&self) -> Ref<'_, T> {
        Ref::map(self.wire.borrow(), |w| &w.target)
    }

    /// The attached target, mutably
    pub fn target_mut(&self) -> RefMut<'_, T> {
        RefMut::map(self.wire.borrow_mut(), |w| &mut w.target)
    }

    /// Counters so far
    pub fn stats(&self) -> SimStats {
        self.wire.borrow().stats
    }

    /// Zero the counters
    pub fn reset_stats(&self) {
        self.wire.borrow_mut().stats = SimStats::default();
    }

    /// SDA level, without advancing time
    pub fn sda_is_high(&self) -> bool {
        self.wire.borrow().sda_level()
    }

    /// SCL level, without advancing time
    pub fn scl_is_high(&self) -> bool {
        self.wire.borrow().scl_level()
    }

    /// Last mode the master configured on a line
    pub fn mode(&self, line: Line) -> Option<PinMode> {
        let wire = self.wire.borrow();
        match line {
            Line::Sda => wire.sda_mode,
            Line::Scl => wire.scl_mode,
        }
    }
}

/// Master-side handle to one simulated line
pub struct SimPin<'a, T> {
    bus: &'a SimBus<T>,
    line: Line,
}

impl<T> SimPin<'_, T> {
    /// Line this handle drives
    pub fn line(&self) -> Line {
        self.line
    }
}

impl<T: SimTarget> OpenDrainPin for SimPin<'_, T> {
    fn set_mode(&mut self, mode: PinMode) {
        let mut wire = self.bus.wire.borrow_mut();
        match self.line {
            Line::Sda => wire.sda_mode = Some(mode),
            Line::Scl => wire.scl_mode = Some(mode),
        }
    }

    fn drive_low(&mut self) {
        self.bus.wire.borrow_mut().master_drive(self.line, true);
    }

    fn release(&mut self) {
        self.bus.wire.borrow_mut().master_drive(self.line, false);
    }

    fn is_high(&self) -> bool {
        let mut wire = self.bus.wire.borrow_mut();
        wire.tick();
        match self.line {
            Line::Sda => wire.sda_level(),
            Line::Scl => wire.scl_level(),
        }
    }
}
