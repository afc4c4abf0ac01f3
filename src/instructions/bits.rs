//! # Bit Manipulation Instructions
//!
//! The 65C02 additions that work on single bits of memory:
//! - TSB, TRB: Test and set / reset bits selected by A
//! - RMB0-7, SMB0-7: Reset / set one bit of a zero page byte
//! - BBR0-7, BBS0-7: Branch on one bit of a zero page byte

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::instructions::branches::take_branch;
use crate::MemoryBus;

/// Executes the TSB (Test and Set Bits) instruction.
///
/// Z is set from `A & M`, then the bits of A are set in M. N and V are not
/// affected.
pub(crate) fn execute_tsb<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.modify_operand(operand, |cpu, value| {
        cpu.flag_z = (cpu.a & value) == 0;
        value | cpu.a
    });
}

/// Executes the TRB (Test and Reset Bits) instruction.
///
/// Z is set from `A & M`, then the bits of A are cleared in M.
pub(crate) fn execute_trb<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.modify_operand(operand, |cpu, value| {
        cpu.flag_z = (cpu.a & value) == 0;
        value & !cpu.a
    });
}

/// Executes RMBn: clears bit `bit` of a zero page byte. No flags are affected.
pub(crate) fn execute_rmb<M: MemoryBus>(cpu: &mut Cpu<M>, bit: u8, operand: Operand) {
    cpu.modify_operand(operand, |_, value| value & !(1 << bit));
}

/// Executes SMBn: sets bit `bit` of a zero page byte. No flags are affected.
pub(crate) fn execute_smb<M: MemoryBus>(cpu: &mut Cpu<M>, bit: u8, operand: Operand) {
    cpu.modify_operand(operand, |_, value| value | (1 << bit));
}

/// Executes BBRn: branches if bit `bit` of the zero page byte is clear.
///
/// Returns the extra cycles, timed like any other branch.
pub(crate) fn execute_bbr<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    bit: u8,
    operand: Operand,
    page_crossed: bool,
) -> u32 {
    test_and_branch(cpu, bit, false, operand, page_crossed)
}

/// Executes BBSn: branches if bit `bit` of the zero page byte is set.
pub(crate) fn execute_bbs<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    bit: u8,
    operand: Operand,
    page_crossed: bool,
) -> u32 {
    test_and_branch(cpu, bit, true, operand, page_crossed)
}

fn test_and_branch<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    bit: u8,
    branch_if_set: bool,
    operand: Operand,
    page_crossed: bool,
) -> u32 {
    match operand {
        Operand::TestAndBranch { address, target } => {
            let set = (cpu.read(address) & (1 << bit)) != 0;
            take_branch(cpu, set == branch_if_set, target, page_crossed)
        }
        _ => unreachable!("opcode table pairs BBR/BBS with zero page relative mode"),
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
    fn test_tsb_sets_bits_and_z() {
        let mut cpu = setup_cpu();
        cpu.a = 0x0F;
        cpu.memory_mut().poke(0x40, 0xF0);

        execute_tsb(&mut cpu, Operand::Address(0x40));
        assert_eq!(cpu.memory_mut().peek(0x40), 0xFF);
        assert!(cpu.flag_z());
    }

    #[test]
    fn test_trb_clears_bits() {
        let mut cpu = setup_cpu();
        cpu.a = 0x0F;
        cpu.memory_mut().poke(0x40, 0xFF);

        execute_trb(&mut cpu, Operand::Address(0x40));
        assert_eq!(cpu.memory_mut().peek(0x40), 0xF0);
        assert!(!cpu.flag_z());
    }

    #[test]
    fn test_rmb_smb() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().poke(0x40, 0x00);

        execute_smb(&mut cpu, 7, Operand::Address(0x40));
        execute_smb(&mut cpu, 0, Operand::Address(0x40));
        assert_eq!(cpu.memory_mut().peek(0x40), 0x81);

        execute_rmb(&mut cpu, 7, Operand::Address(0x40));
        assert_eq!(cpu.memory_mut().peek(0x40), 0x01);
    }

    #[test]
    fn test_bbr_bbs() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().poke(0x40, 0b0000_1000);
        let operand = Operand::TestAndBranch {
            address: 0x40,
            target: 0x0250,
        };

        assert_eq!(execute_bbr(&mut cpu, 3, operand, false), 0);
        assert_eq!(cpu.pc(), 0x0200);

        assert_eq!(execute_bbs(&mut cpu, 3, operand, false), 1);
        assert_eq!(cpu.pc(), 0x0250);
    }
}
