//! # Status Flag Instructions
//!
//! This module implements the flag set/clear operations:
//! - CLC / SEC: Clear / set carry
//! - CLI / SEI: Clear / set interrupt disable
//! - CLD / SED: Clear / set decimal mode
//! - CLV: Clear overflow
//!
//! All are implied-mode, 2 cycles, and touch only their own flag.

use crate::cpu::Cpu;
use crate::MemoryBus;

/// Executes the CLC (Clear Carry Flag) instruction.
pub(crate) fn execute_clc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_c = false;
}

/// Executes the SEC (Set Carry Flag) instruction.
pub(crate) fn execute_sec<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_c = true;
}

/// Executes the CLI (Clear Interrupt Disable) instruction.
///
/// An asserted IRQ line is serviced at the end of this same `advance`.
pub(crate) fn execute_cli<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_i = false;
}

/// Executes the SEI (Set Interrupt Disable) instruction.
pub(crate) fn execute_sei<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_i = true;
}

/// Executes the CLD (Clear Decimal Mode) instruction.
pub(crate) fn execute_cld<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_d = false;
}

/// Executes the SED (Set Decimal Mode) instruction.
pub(crate) fn execute_sed<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_d = true;
}

/// Executes the CLV (Clear Overflow Flag) instruction.
pub(crate) fn execute_clv<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_v = false;
}
