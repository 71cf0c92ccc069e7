//! Dispatch for every CB-prefixed opcode.
//!
//! All 256 CB opcodes share one shape: an operation selector in the high 5
//! bits and an operand register in the low 3, so unlike the primary grid
//! this one dispatches generically off [`DecodedOpcode`] rather than a
//! per-opcode match.

use super::alu;
use super::registers::REG_HL_INDIRECT;
use super::Cpu;
use crate::bus::Bus;
use crate::decode::DecodedOpcode;

pub fn execute(cpu: &mut Cpu, bus: &mut Bus, decoded: DecodedOpcode) -> u16 {
    let reg = decoded.column3;
    let is_hl = reg == REG_HL_INDIRECT;

    match decoded.row5 {
        0..=7 => {
            let value = cpu.read_operand(bus, reg);
            let result = alu::apply_shift(decoded.row5, &mut cpu.regs, value);
            cpu.write_operand(bus, reg, result);
            if is_hl {
                16
            } else {
                8
            }
        }
        8..=15 => {
            let bit_n = decoded.row5 - 8;
            let value = cpu.read_operand(bus, reg);
            alu::bit(&mut cpu.regs, bit_n, value);
            if is_hl {
                12
            } else {
                8
            }
        }
        16..=23 => {
            let bit_n = decoded.row5 - 16;
            let value = cpu.read_operand(bus, reg);
            let result = alu::res(bit_n, value);
            cpu.write_operand(bus, reg, result);
            if is_hl {
                16
            } else {
                8
            }
        }
        _ => {
            let bit_n = decoded.row5 - 24;
            let value = cpu.read_operand(bus, reg);
            let result = alu::set(bit_n, value);
            cpu.write_operand(bus, reg, result);
            if is_hl {
                16
            } else {
                8
            }
        }
    }
}
