//! # Load and Store Instructions
//!
//! This module implements load and store operations:
//! - LDA: Load Accumulator
//! - LDX: Load X Register
//! - LDY: Load Y Register
//! - STA: Store Accumulator
//! - STX: Store X Register
//! - STY: Store Y Register
//! - STZ: Store Zero (65C02)

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::MemoryBus;

/// Executes the LDA (Load Accumulator) instruction.
///
/// # Flag Behavior
///
/// - Zero (Z): Set if A = 0
/// - Negative (N): Set if bit 7 of A is set
/// - Other flags: Not affected
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    cpu.a = value;
    cpu.set_nz(value);
}

/// Executes the LDX (Load X Register) instruction.
///
/// Flags as LDA, from X.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    cpu.x = value;
    cpu.set_nz(value);
}

/// Executes the LDY (Load Y Register) instruction.
///
/// Flags as LDA, from Y.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    cpu.y = value;
    cpu.set_nz(value);
}

/// Executes the STA (Store Accumulator) instruction.
///
/// No flags are affected. Indexed stores never pay the page penalty.
pub(crate) fn execute_sta<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.a;
    cpu.write_operand(operand, value);
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.x;
    cpu.write_operand(operand, value);
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.y;
    cpu.write_operand(operand, value);
}

/// Executes the STZ (Store Zero) instruction.
pub(crate) fn execute_stz<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.write_operand(operand, 0x00);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    #[test]
    fn test_lda_flags() {
        let mut cpu = Cpu::new(FlatMemory::new());
        cpu.memory_mut().poke(0x10, 0x80);

        execute_lda(&mut cpu, Operand::Address(0x10));
        assert_eq!(cpu.a(), 0x80);
        assert!(cpu.flag_n());
        assert!(!cpu.flag_z());
    }

    #[test]
    fn test_stz_clears_memory() {
        let mut cpu = Cpu::new(FlatMemory::new());
        cpu.memory_mut().poke(0x10, 0x55);
        let status = cpu.status();

        execute_stz(&mut cpu, Operand::Address(0x10));
        assert_eq!(cpu.memory_mut().peek(0x10), 0x00);
        assert_eq!(cpu.status(), status);
    }
}
