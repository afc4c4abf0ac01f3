//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - JMP: Jump (absolute, indirect, absolute indexed indirect)
//! - JSR / RTS: Jump to subroutine and return
//! - BRK / RTI: Software interrupt and return from interrupt
//! - WAI: Wait for interrupt (65C02)
//! - STP: Stop the clock until reset (65C02)

use log::debug;

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::instructions::effective_address;
use crate::interrupts::IRQ_VECTOR;
use crate::MemoryBus;

/// Executes the JMP (Jump) instruction.
///
/// The resolver has already dereferenced the indirect forms, so the operand
/// is the destination. No flags are affected.
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.pc = effective_address(operand);
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last byte of the JSR (return address - 1),
/// high byte first, then jumps. No flags are affected.
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let return_addr = cpu.pc.wrapping_sub(1);
    cpu.push_word(return_addr);
    cpu.pc = effective_address(operand);
}

/// Executes the RTS (Return from Subroutine) instruction.
///
/// Pops the address JSR pushed and resumes at the byte after it.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.pc = cpu.pop_word().wrapping_add(1);
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pops the status byte (B and bit 5 are ignored), then PC. Unlike RTS the
/// popped PC is used as is.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let status = cpu.pop();
    cpu.set_status(status);
    cpu.pc = cpu.pop_word();
}

/// Executes the BRK (Force Interrupt) instruction.
///
/// BRK is followed by a signature byte that is skipped: the pushed return
/// address is the BRK address + 2. The pushed status has B set, which is how
/// a handler tells BRK from IRQ; both go through the IRQ vector. I is set and,
/// on the 65C02, D is cleared.
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let return_addr = cpu.pc.wrapping_add(1);
    debug!("BRK at 0x{:04X}", cpu.pc.wrapping_sub(1));
    cpu.enter_interrupt(IRQ_VECTOR, return_addr, true);
}

/// Executes the WAI (Wait for Interrupt) instruction.
///
/// The CPU stops fetching until NMI or IRQ is asserted. PC already points at
/// the next instruction, which is where a masked IRQ resumes.
pub(crate) fn execute_wai<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.waiting = true;
}

/// Executes the STP (Stop) instruction.
///
/// The CPU does nothing until the next reset.
pub(crate) fn execute_stp<M: MemoryBus>(cpu: &mut Cpu<M>) {
    debug!("STP at 0x{:04X}", cpu.pc.wrapping_sub(1));
    cpu.stopped = true;
}
