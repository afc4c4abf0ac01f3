//! # Shift and Rotate Instructions
//!
//! This module implements shift and rotate operations:
//! - ASL: Arithmetic Shift Left
//! - LSR: Logical Shift Right
//! - ROL: Rotate Left through carry
//! - ROR: Rotate Right through carry
//!
//! All work on the accumulator or memory (read-modify-write) and set C from the
//! bit shifted out, Z and N from the result.

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::MemoryBus;

/// Executes the ASL (Arithmetic Shift Left) instruction.
///
/// Bit 7 goes to carry, bit 0 becomes 0.
pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.modify_operand(operand, |cpu, value| {
        cpu.flag_c = (value & 0x80) != 0;
        value << 1
    });
    cpu.set_nz(result);
}

/// Executes the LSR (Logical Shift Right) instruction.
///
/// Bit 0 goes to carry, bit 7 becomes 0 (so N is always cleared).
pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.modify_operand(operand, |cpu, value| {
        cpu.flag_c = (value & 0x01) != 0;
        value >> 1
    });
    cpu.set_nz(result);
}

/// Executes the ROL (Rotate Left) instruction.
///
/// Carry goes into bit 0, bit 7 goes to carry.
pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.modify_operand(operand, |cpu, value| {
        let carry_in = cpu.flag_c as u8;
        cpu.flag_c = (value & 0x80) != 0;
        (value << 1) | carry_in
    });
    cpu.set_nz(result);
}

/// Executes the ROR (Rotate Right) instruction.
///
/// Carry goes into bit 7, bit 0 goes to carry.
pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.modify_operand(operand, |cpu, value| {
        let carry_in = (cpu.flag_c as u8) << 7;
        cpu.flag_c = (value & 0x01) != 0;
        (value >> 1) | carry_in
    });
    cpu.set_nz(result);
}
