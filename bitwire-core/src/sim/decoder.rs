//! Line state and target-side protocol decoder

use bitwire_hal::PinMode;

use super::{Line, SimStats, SimTarget, Stretch};

/// What follows an acknowledge bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Receive,
    Transmit,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Not addressed; waiting for a start
    Idle,
    /// Shifting in a byte on SCL rising edges
    Receive { address: bool, bits: u8, value: u8 },
    /// Byte complete; ACK goes out on the next falling edge
    AckPending { ack: bool, then: Next },
    /// ACK/NACK on SDA until the ACK clock has been high
    Ack { then: Next, clocked: bool },
    /// Shifting out `value`, bit `bit` (0 = MSB) currently on SDA
    Transmit { value: u8, bit: u8 },
    /// Master drives ACK/NACK; `None` until sampled
    MasterAck { ack: Option<bool> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hold {
    Released,
    Ticks(u32),
    Forever,
}

pub(super) struct Wire<T> {
    pub(super) target: T,
    pub(super) stats: SimStats,
    pub(super) sda_mode: Option<PinMode>,
    pub(super) scl_mode: Option<PinMode>,
    phase: Phase,
    master_sda_low: bool,
    master_scl_low: bool,
    target_sda_low: bool,
    hold: Hold,
    sda: bool,
    scl: bool,
}

impl<T: SimTarget> Wire<T> {
    pub(super) fn new(target: T) -> Self {
        let mut wire = Self {
            target,
            stats: SimStats::default(),
            sda_mode: None,
            scl_mode: None,
            phase: Phase::Idle,
            master_sda_low: false,
            master_scl_low: false,
            target_sda_low: false,
            hold: Hold::Released,
            sda: true,
            scl: true,
        };
        wire.sda = wire.sda_level();
        wire.scl = wire.scl_level();
        wire
    }

    pub(super) fn sda_level(&self) -> bool {
        !(self.master_sda_low || self.target_sda_low || self.target.holds_sda())
    }

    pub(super) fn scl_level(&self) -> bool {
        !(self.master_scl_low || self.hold != Hold::Released)
    }

    pub(super) fn master_drive(&mut self, line: Line, low: bool) {
        self.stats.master_ops += 1;
        match line {
            Line::Sda => self.master_sda_low = low,
            Line::Scl => {
                let was_low = self.master_scl_low;
                self.master_scl_low = low;
                if was_low && !low {
                    self.hold = match self.target.stretch() {
                        Stretch::None | Stretch::Ticks(0) => Hold::Released,
                        Stretch::Ticks(n) => Hold::Ticks(n),
                        Stretch::Forever => Hold::Forever,
                    };
                }
            }
        }
        self.settle();
    }

    /// One master read; a stretching target counts down here
    pub(super) fn tick(&mut self) {
        self.stats.ticks += 1;
        if let Hold::Ticks(n) = self.hold {
            self.hold = if n > 1 { Hold::Ticks(n - 1) } else { Hold::Released };
            self.settle();
        }
    }

    /// Propagate level changes to the decoder until the lines are stable
    fn settle(&mut self) {
        loop {
            let sda = self.sda_level();
            let scl = self.scl_level();
            if sda == self.sda && scl == self.scl {
                return;
            }

            let was_scl = self.scl;
            self.sda = sda;
            self.scl = scl;

            match (was_scl, scl) {
                (true, true) if !sda => self.on_start(),
                (true, true) => self.on_stop(),
                (false, true) => self.on_rising(sda),
                (true, false) => self.on_falling(),
                // SDA moving under a low clock is a setup change
                (false, false) => {}
            }
        }
    }

    fn on_start(&mut self) {
        self.stats.starts += 1;
        self.target_sda_low = false;
        self.target.on_start();
        self.phase = Phase::Receive {
            address: true,
            bits: 0,
            value: 0,
        };
    }

    fn on_stop(&mut self) {
        self.stats.stops += 1;
        self.target_sda_low = false;
        self.target.on_stop();
        self.phase = Phase::Idle;
    }

    fn on_rising(&mut self, sda: bool) {
        self.stats.scl_pulses += 1;
        match self.phase {
            Phase::Receive {
                address,
                bits,
                value,
            } => {
                let value = (value << 1) | u8::from(sda);
                let bits = bits + 1;
                self.phase = if bits < 8 {
                    Phase::Receive {
                        address,
                        bits,
                        value,
                    }
                } else {
                    self.stats.bytes_received += 1;
                    self.byte_received(address, value)
                };
            }
            Phase::Ack { then, .. } => {
                self.phase = Phase::Ack {
                    then,
                    clocked: true,
                };
            }
            Phase::MasterAck { ack: None } => {
                if sda {
                    self.stats.master_nacks += 1;
                } else {
                    self.stats.master_acks += 1;
                }
                self.phase = Phase::MasterAck { ack: Some(!sda) };
            }
            _ => {}
        }
    }

    fn byte_received(&mut self, address: bool, value: u8) -> Phase {
        if address {
            if value >> 1 != self.target.address() {
                return Phase::AckPending {
                    ack: false,
                    then: Next::Ignore,
                };
            }
            let then = if value & 1 == 1 {
                Next::Transmit
            } else {
                Next::Receive
            };
            Phase::AckPending { ack: true, then }
        } else {
            let ack = self.target.on_write(value);
            Phase::AckPending {
                ack,
                then: Next::Receive,
            }
        }
    }

    fn on_falling(&mut self) {
        match self.phase {
            Phase::AckPending { ack, then } => {
                self.target_sda_low = ack;
                self.phase = Phase::Ack {
                    then,
                    clocked: false,
                };
            }
            Phase::Ack {
                then,
                clocked: true,
            } => {
                self.target_sda_low = false;
                match then {
                    Next::Receive => {
                        self.phase = Phase::Receive {
                            address: false,
                            bits: 0,
                            value: 0,
                        }
                    }
                    Next::Transmit => self.load_next_byte(),
                    Next::Ignore => self.phase = Phase::Idle,
                }
            }
            Phase::Transmit { value, bit } => {
                let bit = bit + 1;
                if bit < 8 {
                    self.target_sda_low = (value << bit) & 0x80 == 0;
                    self.phase = Phase::Transmit { value, bit };
                } else {
                    self.target_sda_low = false;
                    self.stats.bytes_sent += 1;
                    self.phase = Phase::MasterAck { ack: None };
                }
            }
            Phase::MasterAck { ack: Some(true) } => self.load_next_byte(),
            Phase::MasterAck { ack: Some(false) } => {
                self.target_sda_low = false;
                self.phase = Phase::Idle;
            }
            _ => {}
        }
    }

    fn load_next_byte(&mut self) {
        let value = self.target.on_read();
        self.target_sda_low = value & 0x80 == 0;
        self.phase = Phase::Transmit { value, bit: 0 };
    }
}
