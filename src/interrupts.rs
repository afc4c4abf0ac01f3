//! # Interrupt Handling
//!
//! The 65C02 has two interrupt inputs:
//!
//! - **NMI** is edge-triggered. [`Cpu::request_nmi`] latches an edge and the
//!   latch is cleared when the interrupt is serviced. NMI cannot be masked.
//! - **IRQ** is level-triggered. [`Cpu::request_irq`] drives the line; while
//!   it stays asserted and I is clear, the CPU re-enters the handler at every
//!   instruction boundary.
//!
//! Both are checked at the end of every [`Cpu::advance`], NMI first. Servicing
//! pushes PC and the status byte (with B clear), sets I, clears D on the 65C02
//! and jumps through the vector. It costs 7 cycles, which `advance` adds to the
//! instruction's own.
//!
//! A CPU parked in WAI wakes as soon as either line is asserted, even when I
//! masks the IRQ; in that case it resumes at the instruction after WAI
//! without entering the handler.
//!
//! Reset is not an interrupt here: [`Cpu::reset`] loads [`BOOT_VECTOR`] and
//! pushes nothing.

use log::debug;

use crate::cpu::{Cpu, Variant};
use crate::MemoryBus;

/// NMI handler address is read from here.
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Reset handler address is read from here.
pub const BOOT_VECTOR: u16 = 0xFFFC;

/// IRQ and BRK handler address is read from here.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles spent entering an interrupt handler.
pub(crate) const INTERRUPT_CYCLES: u32 = 7;

/// Interrupt controller state, as seen between two `advance` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptState {
    /// Nothing will be serviced at the next boundary.
    Idle,
    /// An NMI edge is latched.
    NmiPending,
    /// The IRQ line is asserted and I is clear.
    IrqPending,
}

impl<M: MemoryBus> Cpu<M> {
    /// Latches an NMI edge.
    ///
    /// Requests made before the next boundary collapse into one.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{Cpu, FlatMemory, InterruptState, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.poke(0xFFFA, 0x00);
    /// mem.poke(0xFFFB, 0x90); // NMI handler at 0x9000
    /// mem.poke(0xFFFD, 0x02); // boot at 0x0200, NOP
    /// mem.poke(0x0200, 0xEA);
    ///
    /// let mut cpu = Cpu::new(mem);
    /// cpu.request_nmi();
    /// assert_eq!(cpu.interrupt_state(), InterruptState::NmiPending);
    ///
    /// // NOP (2) + NMI entry (7)
    /// assert_eq!(cpu.advance(), Ok(9));
    /// assert_eq!(cpu.pc(), 0x9000);
    /// assert_eq!(cpu.interrupt_state(), InterruptState::Idle);
    /// ```
    pub fn request_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Drives the IRQ line. `true` asserts it, `false` releases it.
    pub fn request_irq(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    /// Returns what will be serviced at the next boundary.
    pub fn interrupt_state(&self) -> InterruptState {
        if self.nmi_pending {
            InterruptState::NmiPending
        } else if self.irq_line && !self.flag_i {
            InterruptState::IrqPending
        } else {
            InterruptState::Idle
        }
    }

    /// True while an NMI edge is latched.
    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    /// True while the IRQ line is asserted, masked or not.
    pub fn irq_asserted(&self) -> bool {
        self.irq_line
    }

    /// Services the highest-priority pending interrupt.
    ///
    /// Returns the cycles spent, 0 when nothing was serviced.
    pub(crate) fn poll_interrupts(&mut self) -> u32 {
        if self.stopped {
            return 0;
        }

        if self.waiting && (self.nmi_pending || self.irq_line) {
            debug!("Waking from WAI at 0x{:04X}", self.pc);
            self.waiting = false;
        }

        if self.nmi_pending {
            self.nmi_pending = false;
            debug!("Servicing NMI, return to 0x{:04X}", self.pc);
            self.enter_interrupt(NMI_VECTOR, self.pc, false);
            INTERRUPT_CYCLES
        } else if self.irq_line && !self.flag_i {
            debug!("Servicing IRQ, return to 0x{:04X}", self.pc);
            self.enter_interrupt(IRQ_VECTOR, self.pc, false);
            INTERRUPT_CYCLES
        } else {
            0
        }
    }

    /// Pushes `return_addr` and the status byte, masks IRQs and jumps through
    /// `vector`. Shared by NMI, IRQ and BRK.
    pub(crate) fn enter_interrupt(&mut self, vector: u16, return_addr: u16, force_break: bool) {
        self.push_word(return_addr);
        self.push_status(force_break);
        self.flag_i = true;
        if self.config.variant == Variant::Cmos65C02 {
            self.flag_d = false;
        }
        self.pc = self.read_word(vector);
    }
}
