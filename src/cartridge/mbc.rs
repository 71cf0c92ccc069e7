//! Memory bank controller interface.
//!
//! The only behavior this core implements is the no-banking pass-through
//! required by spec.md §4.6. `MbcKind` still classifies every cartridge
//! type byte so the loader can log what it saw; an unsupported type
//! degrades to [`NoMbc`] with a warning rather than refusing to load, per
//! spec.md §7.

use log::warn;

/// Classification of the cartridge type byte (ROM[0x147]), for diagnostics
/// only. Banking behavior beyond plain ROM+RAM is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbcKind {
    NoMbc,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
    Unknown(u8),
}

impl MbcKind {
    pub fn from_cartridge_type(cartridge_type: u8) -> Self {
        match cartridge_type {
            0x00 | 0x08 | 0x09 => MbcKind::NoMbc,
            0x01..=0x03 => MbcKind::Mbc1,
            0x05 | 0x06 => MbcKind::Mbc2,
            0x0F..=0x13 => MbcKind::Mbc3,
            0x19..=0x1E => MbcKind::Mbc5,
            other => MbcKind::Unknown(other),
        }
    }
}

/// The bus-facing surface every cartridge backing implements: ROM reads,
/// ROM-area writes (bank-select registers on a real MBC, ignored here),
/// and external-RAM reads/writes.
pub trait Mbc {
    fn rom_read(&self, rom: &[u8], addr: u16) -> u8;
    fn cart_write(&mut self, addr: u16, value: u8);
    fn ram_read(&self, addr: u16) -> u8;
    fn ram_write(&mut self, addr: u16, value: u8);
}

/// No-banking pass-through: ROM reads index the image directly, writes to
/// the ROM area are ignored. External RAM is backed only when the header
/// declares a nonzero size; a cartridge with no declared RAM has none —
/// reads return 0xFF and writes are dropped, the same as an out-of-range
/// ROM read, rather than silently behaving as if 8 KiB always exists.
pub struct NoMbc {
    ram: Vec<u8>,
}

impl NoMbc {
    pub fn new(ram_size_bytes: usize) -> Self {
        Self {
            ram: vec![0; ram_size_bytes],
        }
    }

    /// Builds a [`NoMbc`] backing, logging a warning first if `kind` isn't
    /// actually [`MbcKind::NoMbc`] — the degrade-gracefully path for
    /// unsupported cartridge types. `ram_size_bytes` comes from the header's
    /// RAM-size code regardless of `kind`.
    pub fn degrading_from(kind: MbcKind, ram_size_bytes: usize) -> Self {
        match kind {
            MbcKind::NoMbc => {}
            MbcKind::Unknown(code) => {
                warn!(
                    "cartridge type {:#04X} is not recognized; treating as no-MBC",
                    code
                );
            }
            other => {
                warn!(
                    "cartridge requires banking ({:?}) which this core does not implement; \
                     treating as no-MBC",
                    other
                );
            }
        }
        Self::new(ram_size_bytes)
    }
}

impl Default for NoMbc {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Mbc for NoMbc {
    fn rom_read(&self, rom: &[u8], addr: u16) -> u8 {
        rom.get(addr as usize).copied().unwrap_or(0xFF)
    }

    fn cart_write(&mut self, _addr: u16, _value: u8) {
        // No bank-select registers to update; ROM is fixed.
    }

    fn ram_read(&self, addr: u16) -> u8 {
        self.ram.get(addr as usize).copied().unwrap_or(0xFF)
    }

    fn ram_write(&mut self, addr: u16, value: u8) {
        if let Some(slot) = self.ram.get_mut(addr as usize) {
            *slot = value;
        }
    }
}
