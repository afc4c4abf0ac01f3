//! # Register Transfer Instructions
//!
//! This module implements register transfer operations:
//! - TAX: Transfer Accumulator to X
//! - TAY: Transfer Accumulator to Y
//! - TXA: Transfer X to Accumulator
//! - TYA: Transfer Y to Accumulator
//! - TSX: Transfer Stack Pointer to X
//! - TXS: Transfer X to Stack Pointer
//!
//! All update Z and N from the value copied, except TXS, which affects no flags.

use crate::cpu::Cpu;
use crate::MemoryBus;

/// Executes the TAX (Transfer Accumulator to X) instruction.
pub(crate) fn execute_tax<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.a;
    cpu.set_nz(cpu.x);
}

/// Executes the TAY (Transfer Accumulator to Y) instruction.
pub(crate) fn execute_tay<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.a;
    cpu.set_nz(cpu.y);
}

/// Executes the TXA (Transfer X to Accumulator) instruction.
pub(crate) fn execute_txa<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = cpu.x;
    cpu.set_nz(cpu.a);
}

/// Executes the TYA (Transfer Y to Accumulator) instruction.
pub(crate) fn execute_tya<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = cpu.y;
    cpu.set_nz(cpu.a);
}

/// Executes the TSX (Transfer Stack Pointer to X) instruction.
pub(crate) fn execute_tsx<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.sp;
    cpu.set_nz(cpu.x);
}

/// Executes the TXS (Transfer X to Stack Pointer) instruction.
///
/// No flags are affected.
pub(crate) fn execute_txs<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.sp = cpu.x;
}
