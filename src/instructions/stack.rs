//! # Stack Instructions
//!
//! This module implements stack operations:
//! - PHA / PLA: Push / pull accumulator
//! - PHX / PLX, PHY / PLY: Push / pull index registers (65C02)
//! - PHP / PLP: Push / pull processor status
//!
//! The stack lives in page 1 (0x0100-0x01FF) and grows downward; SP wraps
//! within the page.

use crate::cpu::Cpu;
use crate::MemoryBus;

/// Executes the PHA (Push Accumulator) instruction.
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push(cpu.a);
}

/// Executes the PHX (Push X Register) instruction.
pub(crate) fn execute_phx<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push(cpu.x);
}

/// Executes the PHY (Push Y Register) instruction.
pub(crate) fn execute_phy<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push(cpu.y);
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed copy has B and bit 5 set, as on hardware.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push_status(true);
}

/// Executes the PLA (Pull Accumulator) instruction. Updates Z and N.
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = cpu.pop();
    cpu.set_nz(cpu.a);
}

/// Executes the PLX (Pull X Register) instruction. Updates Z and N.
pub(crate) fn execute_plx<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.pop();
    cpu.set_nz(cpu.x);
}

/// Executes the PLY (Pull Y Register) instruction. Updates Z and N.
pub(crate) fn execute_ply<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.pop();
    cpu.set_nz(cpu.y);
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// B and bit 5 of the pulled byte are ignored.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let status = cpu.pop();
    cpu.set_status(status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    #[test]
    fn test_php_plp_roundtrip() {
        let mut cpu = Cpu::new(FlatMemory::new());
        cpu.set_status(0xC3);

        execute_php(&mut cpu);
        assert_eq!(cpu.memory_mut().peek(0x01FF), 0xF3);

        cpu.set_status(0x00);
        execute_plp(&mut cpu);
        assert_eq!(cpu.status(), 0xE3);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_phx_ply() {
        let mut cpu = Cpu::new(FlatMemory::new());
        cpu.x = 0x00;
        cpu.y = 0x55;

        execute_phx(&mut cpu);
        execute_ply(&mut cpu);
        assert_eq!(cpu.y(), 0x00);
        assert!(cpu.flag_z());
    }
}
