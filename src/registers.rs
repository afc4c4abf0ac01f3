//! # Register Snapshot
//!
//! A plain copy of the architectural state, used by debuggers and by
//! system-level save-state wrappers to inspect or replace the CPU's registers
//! in one call.

/// Snapshot of every register, the packed status byte and the interrupt latches.
///
/// # Examples
///
/// ```
/// use lib65c02::{Cpu, FlatMemory};
///
/// let mut cpu = Cpu::new(FlatMemory::new());
///
/// let mut regs = cpu.registers();
/// regs.a = 0x42;
/// regs.pc = 0x1234;
/// cpu.set_registers(&regs);
///
/// assert_eq!(cpu.a(), 0x42);
/// assert_eq!(cpu.pc(), 0x1234);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    /// Packed status byte (NV1BDIZC, B always clear).
    pub status: u8,
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (stack lives at 0x0100-0x01FF).
    pub sp: u8,
    /// Last fetched opcode.
    pub opcode: u8,
    /// Last resolved operand address, or branch target.
    pub operand: u16,
    /// Program counter.
    pub pc: u16,
    /// An NMI edge is latched and not yet serviced.
    pub nmi_pending: bool,
    /// The IRQ line is asserted.
    pub irq_pending: bool,
    /// The CPU is parked in WAI.
    pub waiting: bool,
}
