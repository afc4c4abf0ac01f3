//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC: Add with Carry
//! - SBC: Subtract with Carry
//! - AND, ORA, EOR: Bitwise logic on the accumulator
//! - CMP, CPX, CPY: Register comparison
//! - BIT: Bit test
//!
//! ADC and SBC switch to decimal arithmetic when D is set; see [`crate::bcd`]
//! for the flag convention.

use crate::addressing::{AddressingMode, Operand};
use crate::bcd;
use crate::cpu::{Cpu, Variant};
use crate::{MemoryBus, OPCODE_TABLE};

/// Extra cycle decimal ADC/SBC take on the 65C02.
fn decimal_penalty<M: MemoryBus>(cpu: &Cpu<M>) -> u32 {
    (cpu.flag_d && cpu.config.variant == Variant::Cmos65C02) as u32
}

/// Executes the ADC (Add with Carry) instruction.
///
/// Adds the operand plus the carry flag to the accumulator.
///
/// # Flag Behavior
///
/// - Carry (C): Set on unsigned (or decimal) carry out
/// - Zero (Z), Negative (N): From the final result
/// - Overflow (V): Set if the signed result does not fit in 8 bits
///
/// Returns the decimal-mode cycle penalty.
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) -> u32 {
    let value = cpu.read_operand(operand);
    let a = cpu.a;

    if cpu.flag_d {
        let result = bcd::add(a, value, cpu.flag_c);
        cpu.a = result.value;
        cpu.flag_c = result.carry;
        cpu.flag_v = result.overflow;
        cpu.set_nz(result.value);
        return decimal_penalty(cpu);
    }

    let result16 = a as u16 + value as u16 + cpu.flag_c as u16;
    let result = result16 as u8;

    cpu.flag_c = result16 > 0xFF;
    // Both operands share a sign the result does not have
    cpu.flag_v = ((a ^ result) & (value ^ result) & 0x80) != 0;
    cpu.a = result;
    cpu.set_nz(result);
    0
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// Subtracts the operand and the inverted carry (borrow) from the accumulator.
///
/// # Flag Behavior
///
/// - Carry (C): Set if no borrow occurred
/// - Zero (Z), Negative (N): From the final result
/// - Overflow (V): Set if the signed result does not fit in 8 bits
///
/// Returns the decimal-mode cycle penalty.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) -> u32 {
    let value = cpu.read_operand(operand);
    let a = cpu.a;

    if cpu.flag_d {
        let result = bcd::subtract(a, value, cpu.flag_c);
        cpu.a = result.value;
        cpu.flag_c = result.carry;
        cpu.flag_v = result.overflow;
        cpu.set_nz(result.value);
        return decimal_penalty(cpu);
    }

    // A - M - !C == A + !M + C
    let inverted = !value;
    let result16 = a as u16 + inverted as u16 + cpu.flag_c as u16;
    let result = result16 as u8;

    cpu.flag_c = result16 > 0xFF;
    cpu.flag_v = ((a ^ result) & (inverted ^ result) & 0x80) != 0;
    cpu.a = result;
    cpu.set_nz(result);
    0
}

/// Executes the AND (Logical AND) instruction.
///
/// Updates Z and N.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.a & cpu.read_operand(operand);
    cpu.a = result;
    cpu.set_nz(result);
}

/// Executes the ORA (Logical Inclusive OR) instruction.
///
/// Updates Z and N.
pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.a | cpu.read_operand(operand);
    cpu.a = result;
    cpu.set_nz(result);
}

/// Executes the EOR (Exclusive OR) instruction.
///
/// Updates Z and N.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.a ^ cpu.read_operand(operand);
    cpu.a = result;
    cpu.set_nz(result);
}

/// Shared comparison: `register - value` without storing the difference.
///
/// # Flag Behavior
///
/// - Carry (C): Set if register >= value (unsigned)
/// - Zero (Z): Set if register == value
/// - Negative (N): Bit 7 of the difference
fn compare<M: MemoryBus>(cpu: &mut Cpu<M>, register: u8, operand: Operand) {
    let value = cpu.read_operand(operand);
    cpu.flag_c = register >= value;
    cpu.set_nz(register.wrapping_sub(value));
}

/// Executes the CMP (Compare Accumulator) instruction.
pub(crate) fn execute_cmp<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let register = cpu.a;
    compare(cpu, register, operand);
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let register = cpu.x;
    compare(cpu, register, operand);
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let register = cpu.y;
    compare(cpu, register, operand);
}

/// Executes the BIT (Bit Test) instruction.
///
/// # Flag Behavior
///
/// - Zero (Z): Set if A & M == 0
/// - Negative (N), Overflow (V): Copied from bits 7 and 6 of M, except in
///   immediate mode (65C02), which only affects Z
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    cpu.flag_z = (cpu.a & value) == 0;

    let mode = OPCODE_TABLE[cpu.opcode as usize].addressing_mode;
    if mode != AddressingMode::Immediate {
        cpu.flag_n = (value & 0x80) != 0;
        cpu.flag_v = (value & 0x40) != 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn setup_cpu() -> Cpu<FlatMemory> {
        let mut mem = FlatMemory::new();
        mem.poke(0xFFFD, 0x02);
        Cpu::new(mem)
    }

    #[test]
    fn test_adc_binary_overflow() {
        let mut cpu = setup_cpu();
        cpu.a = 0x50;
        cpu.memory_mut().poke(0x10, 0x50);

        assert_eq!(execute_adc(&mut cpu, Operand::Address(0x10)), 0);
        assert_eq!(cpu.a(), 0xA0);
        assert!(cpu.flag_v());
        assert!(cpu.flag_n());
        assert!(!cpu.flag_c());
    }

    #[test]
    fn test_sbc_borrow() {
        let mut cpu = setup_cpu();
        cpu.a = 0x00;
        cpu.flag_c = true;
        cpu.memory_mut().poke(0x10, 0x01);

        execute_sbc(&mut cpu, Operand::Address(0x10));
        assert_eq!(cpu.a(), 0xFF);
        assert!(!cpu.flag_c());
        assert!(cpu.flag_n());
        assert!(!cpu.flag_v());
    }

    #[test]
    fn test_decimal_penalty_by_variant() {
        let mut cpu = setup_cpu();
        cpu.flag_d = true;
        cpu.memory_mut().poke(0x10, 0x01);
        assert_eq!(execute_adc(&mut cpu, Operand::Address(0x10)), 1);

        cpu.config.variant = Variant::Nmos6502;
        assert_eq!(execute_adc(&mut cpu, Operand::Address(0x10)), 0);
    }

    #[test]
    fn test_compare_flags() {
        let mut cpu = setup_cpu();
        cpu.x = 0x40;
        cpu.memory_mut().poke(0x10, 0x40);

        execute_cpx(&mut cpu, Operand::Address(0x10));
        assert!(cpu.flag_z());
        assert!(cpu.flag_c());
        assert!(!cpu.flag_n());
    }

    #[test]
    fn test_bit_immediate_only_sets_z() {
        let mut cpu = setup_cpu();
        cpu.opcode = 0x89;
        cpu.a = 0x01;
        cpu.memory_mut().poke(0x0201, 0xC0);

        execute_bit(&mut cpu, Operand::Address(0x0201));
        assert!(cpu.flag_z());
        assert!(!cpu.flag_n());
        assert!(!cpu.flag_v());
    }
}
