//! Ready-made simulated targets

use heapless::Vec;

use super::{SimTarget, Stretch};

/// Capacity of target-side byte buffers
pub const TARGET_BUFFER: usize = 64;

/// Byte value a target sends once it has nothing left (released SDA)
const IDLE_BYTE: u8 = 0xFF;

/// Target that records writes and replays a fixed read script
#[derive(Debug, Clone, Default)]
pub struct ScriptedTarget {
    address: u8,
    read_data: Vec<u8, TARGET_BUFFER>,
    read_pos: usize,
    written: Vec<u8, TARGET_BUFFER>,
    nack_at: Option<usize>,
    stretch: Stretch,
}

impl ScriptedTarget {
    /// ACK everything, read back 0xFF
    pub fn new(address: u8) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    /// Bytes served to reads, in order; truncated to [`TARGET_BUFFER`]
    pub fn with_read_data(mut self, data: &[u8]) -> Self {
        self.read_data.clear();
        let len = data.len().min(TARGET_BUFFER);
        let _ = self.read_data.extend_from_slice(&data[..len]);
        self
    }

    /// NACK the data byte at `index` (0 = first byte after the address)
    pub fn nack_data_at(mut self, index: usize) -> Self {
        self.nack_at = Some(index);
        self
    }

    /// Stretch the clock on every SCL release
    pub fn with_stretch(mut self, stretch: Stretch) -> Self {
        self.stretch = stretch;
        self
    }

    /// Data bytes ACKed so far
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Number of bytes handed out to the master, including prefetch
    pub fn reads_served(&self) -> usize {
        self.read_pos
    }
}

impl SimTarget for ScriptedTarget {
    fn address(&self) -> u8 {
        self.address
    }

    fn on_write(&mut self, byte: u8) -> bool {
        if self.nack_at == Some(self.written.len()) {
            return false;
        }
        self.written.push(byte).is_ok()
    }

    fn on_read(&mut self) -> u8 {
        let byte = self.read_data.get(self.read_pos).copied().unwrap_or(IDLE_BYTE);
        self.read_pos += 1;
        byte
    }

    fn stretch(&mut self) -> Stretch {
        self.stretch
    }
}

/// Memory that reads back the bytes of its last write transaction
#[derive(Debug, Clone, Default)]
pub struct LoopbackTarget {
    address: u8,
    memory: Vec<u8, TARGET_BUFFER>,
    read_pos: usize,
    fresh: bool,
}

impl LoopbackTarget {
    /// Empty memory; reads return 0xFF until something is written
    pub fn new(address: u8) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    /// Bytes of the last write
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }
}

impl SimTarget for LoopbackTarget {
    fn address(&self) -> u8 {
        self.address
    }

    fn on_start(&mut self) {
        self.fresh = true;
        self.read_pos = 0;
    }

    fn on_write(&mut self, byte: u8) -> bool {
        if self.fresh {
            self.memory.clear();
            self.fresh = false;
        }
        self.memory.push(byte).is_ok()
    }

    fn on_read(&mut self) -> u8 {
        let byte = self.memory.get(self.read_pos).copied().unwrap_or(IDLE_BYTE);
        self.read_pos += 1;
        byte
    }
}

/// Faulty device holding SDA low permanently
#[derive(Debug, Clone, Copy, Default)]
pub struct StuckSdaTarget;

impl SimTarget for StuckSdaTarget {
    fn address(&self) -> u8 {
        0
    }

    fn on_write(&mut self, _byte: u8) -> bool {
        false
    }

    fn on_read(&mut self) -> u8 {
        0
    }

    fn holds_sda(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_nack_index() {
        let mut target = ScriptedTarget::new(0x20).nack_data_at(1);
        assert!(target.on_write(0x01));
        assert!(!target.on_write(0x02));
        assert_eq!(target.written(), &[0x01]);
    }

    #[test]
    fn test_scripted_reads_then_idle() {
        let mut target = ScriptedTarget::new(0x20).with_read_data(&[0x11]);
        assert_eq!(target.on_read(), 0x11);
        assert_eq!(target.on_read(), 0xFF);
        assert_eq!(target.reads_served(), 2);
    }

    #[test]
    fn test_loopback_replaces_memory_per_transaction() {
        let mut target = LoopbackTarget::new(0x50);
        target.on_start();
        target.on_write(1);
        target.on_write(2);
        target.on_start();
        assert_eq!(target.on_read(), 1);
        target.on_start();
        target.on_write(9);
        assert_eq!(target.memory(), &[9]);
    }
}
