//! Cartridge image loading and the bus-facing read/write surface.

pub mod header;
pub mod mbc;

use crate::error::EmulatorError;
use header::{CartridgeHeader, HEADER_MIN_LEN};
use mbc::{Mbc, MbcKind, NoMbc};

pub struct Cartridge {
    rom: Vec<u8>,
    header: CartridgeHeader,
    mbc: Box<dyn Mbc>,
}

impl Cartridge {
    /// Validates `data` against its own declared ROM size (spec.md §6) and
    /// builds the backing MBC, degrading unsupported cartridge types to a
    /// no-banking pass-through with a logged warning.
    pub fn from_bytes(data: &[u8]) -> Result<Self, EmulatorError> {
        if data.len() < HEADER_MIN_LEN {
            return Err(EmulatorError::CartridgeTooSmall { actual: data.len() });
        }

        let header = CartridgeHeader::parse(data);
        let expected = header.rom_size_bytes();
        if data.len() != expected {
            return Err(EmulatorError::CartridgeSizeMismatch {
                expected,
                actual: data.len(),
                rom_size_code: header.rom_size_code,
            });
        }

        let kind = MbcKind::from_cartridge_type(header.cartridge_type);
        let ram_size = header.ram_size_bytes();
        let mbc: Box<dyn Mbc> = Box::new(NoMbc::degrading_from(kind, ram_size));

        Ok(Self {
            rom: data.to_vec(),
            header,
            mbc,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn rom_read(&self, addr: u16) -> u8 {
        self.mbc.rom_read(&self.rom, addr)
    }

    pub fn cart_write(&mut self, addr: u16, value: u8) {
        self.mbc.cart_write(addr, value);
    }

    pub fn ram_read(&self, addr: u16) -> u8 {
        self.mbc.ram_read(addr)
    }

    pub fn ram_write(&mut self, addr: u16, value: u8) {
        self.mbc.ram_write(addr, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_of_size(size: usize, rom_size_code: u8) -> Vec<u8> {
        let mut data = vec![0u8; size];
        data[0x148] = rom_size_code;
        data
    }

    #[test]
    fn rejects_image_smaller_than_header() {
        let err = Cartridge::from_bytes(&[0u8; 0x10]).unwrap_err();
        assert!(matches!(err, EmulatorError::CartridgeTooSmall { actual: 0x10 }));
    }

    #[test]
    fn rejects_size_mismatch_against_declared_rom_size() {
        let data = rom_of_size(0x8000, 0x01); // declares 0x10000, is 0x8000
        let err = Cartridge::from_bytes(&data).unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::CartridgeSizeMismatch {
                expected: 0x10000,
                actual: 0x8000,
                ..
            }
        ));
    }

    #[test]
    fn accepts_matching_size_and_reads_rom() {
        let mut data = rom_of_size(0x8000, 0x00);
        data[0x100] = 0x77;
        let cart = Cartridge::from_bytes(&data).unwrap();
        assert_eq!(cart.rom_read(0x100), 0x77);
    }

    #[test]
    fn unsupported_mbc_type_degrades_instead_of_failing() {
        let mut data = rom_of_size(0x8000, 0x00);
        data[0x147] = 0x01; // MBC1, unsupported -> degrades to NoMbc
        let cart = Cartridge::from_bytes(&data).unwrap();
        assert_eq!(cart.rom_read(0), 0);
    }

    #[test]
    fn external_ram_round_trips_when_header_declares_ram() {
        let mut data = rom_of_size(0x8000, 0x00);
        data[0x149] = 0x02; // 8 KiB RAM
        let mut cart = Cartridge::from_bytes(&data).unwrap();
        cart.ram_write(0x05, 0x99);
        assert_eq!(cart.ram_read(0x05), 0x99);
    }

    #[test]
    fn external_ram_absent_when_header_declares_none() {
        let data = rom_of_size(0x8000, 0x00); // ram_size_code defaults to 0x00
        let mut cart = Cartridge::from_bytes(&data).unwrap();
        cart.ram_write(0x05, 0x99);
        assert_eq!(cart.ram_read(0x05), 0xFF);
    }
}
