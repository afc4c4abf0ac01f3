//! # Increment and Decrement Instructions
//!
//! This module implements increment and decrement operations:
//! - INC / DEC: Memory or, on the 65C02, the accumulator
//! - INX / INY / DEX / DEY: Index registers
//!
//! All wrap modulo 256 and update Z and N. Carry and overflow are untouched.

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::MemoryBus;

/// Executes the INC (Increment) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.modify_operand(operand, |_, value| value.wrapping_add(1));
    cpu.set_nz(result);
}

/// Executes the DEC (Decrement) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.modify_operand(operand, |_, value| value.wrapping_sub(1));
    cpu.set_nz(result);
}

/// Executes the INX (Increment X) instruction.
pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.set_nz(cpu.x);
}

/// Executes the INY (Increment Y) instruction.
pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.set_nz(cpu.y);
}

/// Executes the DEX (Decrement X) instruction.
pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.set_nz(cpu.x);
}

/// Executes the DEY (Decrement Y) instruction.
pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.set_nz(cpu.y);
}
