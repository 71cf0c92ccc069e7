//! Dispatch for the primary opcode grid outside the generic LD r,r'/ALU A,r
//! block (which [`crate::cpu::Cpu::step`] routes straight to [`execute_high_block`]).
//!
//! Everything else — 16-bit loads, INC/DEC, branches, stack ops, and the
//! handful of misc single-byte opcodes — is still irregular enough in the
//! SM83 encoding that table-driven generalization would cost more clarity
//! than it saves, so it's matched explicitly here, the way the teacher's
//! `ops_control.rs` did.

use super::alu;
use super::registers::{REG_HL_INDIRECT, REG_HL_INDIRECT as HL_IDX};
use super::{Cpu, CpuResult};
use crate::bus::Bus;
use crate::decode::DecodedOpcode;

/// Resolves the `row` field (bits 4-5) to one of BC/DE/HL/SP, used by the
/// `LD rr,d16` / `INC rr` / `DEC rr` / `ADD HL,rr` quartet.
fn read_pair(cpu: &Cpu, row: u8) -> u16 {
    match row {
        0 => cpu.regs.bc(),
        1 => cpu.regs.de(),
        2 => cpu.regs.hl(),
        _ => cpu.regs.sp,
    }
}

fn write_pair(cpu: &mut Cpu, row: u8, value: u16) {
    match row {
        0 => cpu.regs.set_bc(value),
        1 => cpu.regs.set_de(value),
        2 => cpu.regs.set_hl(value),
        _ => cpu.regs.sp = value,
    }
}

/// Same selector, but PUSH/POP use AF instead of SP at row 3.
fn read_stack_pair(cpu: &Cpu, row: u8) -> u16 {
    if row == 3 {
        cpu.regs.af()
    } else {
        read_pair(cpu, row)
    }
}

fn write_stack_pair(cpu: &mut Cpu, row: u8, value: u16) {
    if row == 3 {
        cpu.regs.set_af(value);
    } else {
        write_pair(cpu, row, value);
    }
}

fn condition_met(cpu: &Cpu, cc: u8) -> bool {
    match cc {
        0 => !cpu.regs.zero(),
        1 => cpu.regs.zero(),
        2 => !cpu.regs.carry(),
        _ => cpu.regs.carry(),
    }
}

pub fn execute_high_block(cpu: &mut Cpu, bus: &mut Bus, decoded: DecodedOpcode) -> u16 {
    if decoded.row5 < 16 {
        if decoded.byte == 0x76 {
            cpu.halted = true;
            return 4;
        }
        let dest = decoded.ld_dest_reg();
        let src = decoded.column3;
        let value = cpu.read_operand(bus, src);
        cpu.write_operand(bus, dest, value);
        if dest == REG_HL_INDIRECT || src == REG_HL_INDIRECT {
            8
        } else {
            4
        }
    } else {
        let op = decoded.alu_op_index();
        let operand = decoded.column3;
        let value = cpu.read_operand(bus, operand);
        alu::apply(op, &mut cpu.regs, value);
        if operand == REG_HL_INDIRECT {
            8
        } else {
            4
        }
    }
}

pub fn execute_other(cpu: &mut Cpu, bus: &mut Bus, decoded: DecodedOpcode) -> CpuResult<u16> {
    let row = decoded.row;
    let byte = decoded.byte;

    let cycles = match byte {
        0x00 => 4, // NOP

        // --- 16-bit immediate loads / register-pair INC/DEC/ADD ---
        0x01 | 0x11 | 0x21 | 0x31 => {
            let value = cpu.fetch_u16(bus);
            write_pair(cpu, row, value);
            12
        }
        0x03 | 0x13 | 0x23 | 0x33 => {
            write_pair(cpu, row, read_pair(cpu, row).wrapping_add(1));
            8
        }
        0x0B | 0x1B | 0x2B | 0x3B => {
            write_pair(cpu, row, read_pair(cpu, row).wrapping_sub(1));
            8
        }
        0x09 | 0x19 | 0x29 | 0x39 => {
            alu::add16_hl(&mut cpu.regs, read_pair(cpu, row));
            8
        }

        // --- indirect loads through BC/DE and HL+/HL- ---
        0x02 => {
            bus.write(cpu.regs.bc(), cpu.regs.a);
            8
        }
        0x12 => {
            bus.write(cpu.regs.de(), cpu.regs.a);
            8
        }
        0x22 => {
            let addr = cpu.regs.hl();
            bus.write(addr, cpu.regs.a);
            cpu.regs.set_hl(addr.wrapping_add(1));
            8
        }
        0x32 => {
            let addr = cpu.regs.hl();
            bus.write(addr, cpu.regs.a);
            cpu.regs.set_hl(addr.wrapping_sub(1));
            8
        }
        0x0A => {
            cpu.regs.a = bus.read(cpu.regs.bc());
            8
        }
        0x1A => {
            cpu.regs.a = bus.read(cpu.regs.de());
            8
        }
        0x2A => {
            let addr = cpu.regs.hl();
            cpu.regs.a = bus.read(addr);
            cpu.regs.set_hl(addr.wrapping_add(1));
            8
        }
        0x3A => {
            let addr = cpu.regs.hl();
            cpu.regs.a = bus.read(addr);
            cpu.regs.set_hl(addr.wrapping_sub(1));
            8
        }

        0x08 => {
            let addr = cpu.fetch_u16(bus);
            bus.write_word(addr, cpu.regs.sp);
            20
        }

        // --- 8-bit INC/DEC/LD d8 on B,C,D,E,H,L,(HL),A ---
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            let reg = ((byte >> 3) & 0x07) as u8;
            let value = cpu.read_operand(bus, reg);
            let result = alu::inc8(&mut cpu.regs, value);
            cpu.write_operand(bus, reg, result);
            if reg == HL_IDX {
                12
            } else {
                4
            }
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            let reg = ((byte >> 3) & 0x07) as u8;
            let value = cpu.read_operand(bus, reg);
            let result = alu::dec8(&mut cpu.regs, value);
            cpu.write_operand(bus, reg, result);
            if reg == HL_IDX {
                12
            } else {
                4
            }
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            let reg = ((byte >> 3) & 0x07) as u8;
            let value = cpu.fetch_u8(bus);
            cpu.write_operand(bus, reg, value);
            if reg == HL_IDX {
                12
            } else {
                8
            }
        }

        0x07 => {
            let result = alu::rlc(&mut cpu.regs, cpu.regs.a);
            cpu.regs.a = result;
            cpu.regs.set_flag(super::constants::FLAG_Z, false);
            4
        }
        0x0F => {
            let result = alu::rrc(&mut cpu.regs, cpu.regs.a);
            cpu.regs.a = result;
            cpu.regs.set_flag(super::constants::FLAG_Z, false);
            4
        }
        0x17 => {
            let result = alu::rl(&mut cpu.regs, cpu.regs.a);
            cpu.regs.a = result;
            cpu.regs.set_flag(super::constants::FLAG_Z, false);
            4
        }
        0x1F => {
            let result = alu::rr(&mut cpu.regs, cpu.regs.a);
            cpu.regs.a = result;
            cpu.regs.set_flag(super::constants::FLAG_Z, false);
            4
        }

        0x10 => {
            let _ = cpu.fetch_u8(bus); // STOP's mandatory second byte, ignored
            cpu.stopped = true;
            4
        }

        0x18 => {
            let offset = cpu.fetch_u8(bus) as i8;
            cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as i16 as u16);
            12
        }
        0x20 | 0x28 | 0x30 | 0x38 => {
            let cc = decoded.condition_code();
            let offset = cpu.fetch_u8(bus) as i8;
            if condition_met(cpu, cc) {
                cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as i16 as u16);
                12
            } else {
                8
            }
        }

        0x27 => {
            alu::daa(&mut cpu.regs);
            4
        }
        0x2F => {
            alu::cpl(&mut cpu.regs);
            4
        }
        0x37 => {
            alu::scf(&mut cpu.regs);
            4
        }
        0x3F => {
            alu::ccf(&mut cpu.regs);
            4
        }

        // --- ALU A,d8 ---
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            let op_index = (byte - 0xC6) / 8;
            let value = cpu.fetch_u8(bus);
            alu::apply(op_index, &mut cpu.regs, value);
            8
        }

        // --- stack ops ---
        0xC1 | 0xD1 | 0xE1 | 0xF1 => {
            let value = cpu.pop_word(bus);
            write_stack_pair(cpu, row, value);
            12
        }
        0xC5 | 0xD5 | 0xE5 | 0xF5 => {
            let value = read_stack_pair(cpu, row);
            cpu.push_word(bus, value);
            16
        }

        // --- RST ---
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            let vector = (byte & 0x38) as u16;
            let pc = cpu.regs.pc;
            cpu.push_word(bus, pc);
            cpu.regs.pc = vector;
            16
        }

        // --- jumps/calls/returns ---
        0xC3 => {
            cpu.regs.pc = cpu.fetch_u16(bus);
            16
        }
        0xC2 | 0xCA | 0xD2 | 0xDA => {
            let cc = decoded.condition_code();
            let target = cpu.fetch_u16(bus);
            if condition_met(cpu, cc) {
                cpu.regs.pc = target;
                16
            } else {
                12
            }
        }
        0xE9 => {
            cpu.regs.pc = cpu.regs.hl();
            4
        }
        0xCD => {
            let target = cpu.fetch_u16(bus);
            let pc = cpu.regs.pc;
            cpu.push_word(bus, pc);
            cpu.regs.pc = target;
            24
        }
        0xC4 | 0xCC | 0xD4 | 0xDC => {
            let cc = decoded.condition_code();
            let target = cpu.fetch_u16(bus);
            if condition_met(cpu, cc) {
                let pc = cpu.regs.pc;
                cpu.push_word(bus, pc);
                cpu.regs.pc = target;
                24
            } else {
                12
            }
        }
        0xC9 => {
            cpu.regs.pc = cpu.pop_word(bus);
            16
        }
        0xC0 | 0xC8 | 0xD0 | 0xD8 => {
            let cc = decoded.condition_code();
            if condition_met(cpu, cc) {
                cpu.regs.pc = cpu.pop_word(bus);
                20
            } else {
                8
            }
        }
        0xD9 => {
            cpu.regs.pc = cpu.pop_word(bus);
            cpu.ime = true;
            cpu.ime_scheduled = false;
            16
        }

        // --- LDH / high-C / direct 16-bit A loads ---
        0xE0 => {
            let offset = cpu.fetch_u8(bus);
            bus.write(0xFF00 + offset as u16, cpu.regs.a);
            12
        }
        0xF0 => {
            let offset = cpu.fetch_u8(bus);
            cpu.regs.a = bus.read(0xFF00 + offset as u16);
            12
        }
        0xE2 => {
            bus.write(0xFF00 + cpu.regs.c as u16, cpu.regs.a);
            8
        }
        0xF2 => {
            cpu.regs.a = bus.read(0xFF00 + cpu.regs.c as u16);
            8
        }
        0xEA => {
            let addr = cpu.fetch_u16(bus);
            bus.write(addr, cpu.regs.a);
            16
        }
        0xFA => {
            let addr = cpu.fetch_u16(bus);
            cpu.regs.a = bus.read(addr);
            16
        }

        // --- SP/HL interplay ---
        0xE8 => {
            let offset = cpu.fetch_u8(bus) as i8;
            cpu.regs.sp = alu::add_sp_e8(&mut cpu.regs, offset);
            16
        }
        0xF8 => {
            let offset = cpu.fetch_u8(bus) as i8;
            let result = alu::add_sp_e8(&mut cpu.regs, offset);
            cpu.regs.set_hl(result);
            12
        }
        0xF9 => {
            cpu.regs.sp = cpu.regs.hl();
            8
        }

        0xF3 => {
            cpu.ime = false;
            cpu.ime_scheduled = false;
            4
        }
        0xFB => {
            cpu.ime_scheduled = true;
            4
        }

        0xD3 | 0xDB | 0xDD | 0xE3 | 0xE4 | 0xEB | 0xEC | 0xED | 0xF4 | 0xFC | 0xFD => {
            return Err(format!("opcode {:#04X} is not assigned on the SM83", byte));
        }

        other => return Err(format!("opcode {:#04X} is not handled", other)),
    };

    Ok(cycles)
}
