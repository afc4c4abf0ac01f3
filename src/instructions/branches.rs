//! # Branch Instructions
//!
//! This module implements the relative branches:
//! - BCC, BCS: Branch on carry clear / set
//! - BEQ, BNE: Branch on zero set / clear
//! - BMI, BPL: Branch on negative set / clear
//! - BVC, BVS: Branch on overflow clear / set
//! - BRA: Branch always (65C02)
//!
//! All branch instructions use relative addressing with a signed 8-bit offset.
//! Cycle timing varies based on whether the branch is taken and whether a page boundary is crossed.

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::opcodes::Operation;
use crate::MemoryBus;

/// Executes a relative branch.
///
/// Cycle timing:
/// - base cycles if branch not taken
/// - +1 if branch taken to same page
/// - +2 if branch taken to different page
///
/// No flags are affected. Returns the extra cycles.
pub(crate) fn execute_branch<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    operation: Operation,
    operand: Operand,
    page_crossed: bool,
) -> u32 {
    let taken = match operation {
        Operation::Bcc => !cpu.flag_c,
        Operation::Bcs => cpu.flag_c,
        Operation::Beq => cpu.flag_z,
        Operation::Bne => !cpu.flag_z,
        Operation::Bmi => cpu.flag_n,
        Operation::Bpl => !cpu.flag_n,
        Operation::Bvc => !cpu.flag_v,
        Operation::Bvs => cpu.flag_v,
        Operation::Bra => true,
        _ => unreachable!("{} is not a relative branch", operation.mnemonic()),
    };

    match operand {
        Operand::Branch(target) => take_branch(cpu, taken, target, page_crossed),
        _ => unreachable!("opcode table pairs branches with relative mode"),
    }
}

/// Moves PC to `target` when `taken`, returning the cycles it costs.
///
/// `page_crossed` compares the target with the next instruction's address.
pub(crate) fn take_branch<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    taken: bool,
    target: u16,
    page_crossed: bool,
) -> u32 {
    if !taken {
        return 0;
    }

    cpu.pc = target;
    1 + page_crossed as u32
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
    fn test_branch_not_taken() {
        let mut cpu = setup_cpu();
        cpu.flag_c = true;

        let extra = execute_branch(&mut cpu, Operation::Bcc, Operand::Branch(0x0210), false);
        assert_eq!(extra, 0);
        assert_eq!(cpu.pc(), 0x0200);
    }

    #[test]
    fn test_branch_taken_across_page() {
        let mut cpu = setup_cpu();
        cpu.flag_z = true;

        let extra = execute_branch(&mut cpu, Operation::Beq, Operand::Branch(0x0310), true);
        assert_eq!(extra, 2);
        assert_eq!(cpu.pc(), 0x0310);
    }

    #[test]
    fn test_bra_always_taken() {
        let mut cpu = setup_cpu();

        let extra = execute_branch(&mut cpu, Operation::Bra, Operand::Branch(0x0220), false);
        assert_eq!(extra, 1);
        assert_eq!(cpu.pc(), 0x0220);
    }
}
