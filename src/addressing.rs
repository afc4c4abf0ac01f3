//! # Addressing Modes
//!
//! This module defines the 16 addressing modes of the 65C02 and the resolver
//! that turns a mode into an effective operand.
//!
//! The resolver runs right after the opcode fetch. It consumes the operand
//! bytes at PC through the CPU's bus adapter and leaves PC pointing at the next
//! instruction. It never decides cycle penalties on its own: it reports whether
//! indexing crossed a page and how many cycles the mode itself adds, and the
//! dispatcher charges the penalty only for instructions that pay it.

use crate::cpu::{Cpu, Variant};
use crate::MemoryBus;

/// 65C02 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative,
///   IndexedIndirect, IndirectIndexed, Indirect
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, AbsoluteIndexedIndirect,
///   IndirectAbsolute, ZeroPageRelative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// Operates directly on the accumulator register.
    ///
    /// Examples: ASL A, INC A
    Accumulator,

    /// 8-bit constant operand in the instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// Full 16-bit address.
    ///
    /// Example: LDA $1234
    Absolute,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X, wrapping within zero page.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y, wrapping within zero page.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// 16-bit address indexed by X. May cost a cycle on a page crossing.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y. May cost a cycle on a page crossing.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Pointer at a 16-bit address plus X. Only used by JMP.
    ///
    /// Example: JMP ($1234,X)
    AbsoluteIndexedIndirect,

    /// No operand, operation implied by the instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implied,

    /// Signed 8-bit branch offset, relative to the next instruction.
    ///
    /// Example: BEQ label
    Relative,

    /// Zero page test address followed by a signed branch offset.
    ///
    /// Example: BBR3 $12,label
    ZeroPageRelative,

    /// (ZP + X) then dereference, both pointer bytes in zero page.
    ///
    /// Example: LDA ($40,X)
    IndexedIndirect,

    /// ZP dereference then + Y. May cost a cycle on a page crossing.
    ///
    /// Example: LDA ($40),Y
    IndirectIndexed,

    /// Jump through a 16-bit pointer. Only used by JMP.
    ///
    /// Example: JMP ($FFFC)
    IndirectAbsolute,

    /// Zero page dereference without indexing.
    ///
    /// Example: LDA ($40)
    Indirect,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Accumulator | AddressingMode::Implied => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndexedIndirect
            | AddressingMode::IndirectIndexed
            | AddressingMode::Indirect => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::AbsoluteIndexedIndirect
            | AddressingMode::IndirectAbsolute
            | AddressingMode::ZeroPageRelative => 2,
        }
    }

    /// True for the modes whose index can carry into the high byte.
    pub const fn is_page_indexed(self) -> bool {
        matches!(
            self,
            AddressingMode::AbsoluteX | AddressingMode::AbsoluteY | AddressingMode::IndirectIndexed
        )
    }
}

/// The effective operand of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// No operand.
    Implied,
    /// The accumulator.
    Accumulator,
    /// A memory address (immediate operands resolve to their own address).
    Address(u16),
    /// A branch target.
    Branch(u16),
    /// A zero page byte to test, and a branch target.
    TestAndBranch { address: u16, target: u16 },
}

/// Resolver output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub operand: Operand,

    /// Indexing (or a branch target) left the page of the base address.
    pub page_crossed: bool,

    /// Cycles the mode adds regardless of the instruction.
    pub extra_cycles: u32,
}

impl Resolved {
    fn new(operand: Operand) -> Self {
        Self {
            operand,
            page_crossed: false,
            extra_cycles: 0,
        }
    }

    fn crossing(operand: Operand, page_crossed: bool) -> Self {
        Self {
            operand,
            page_crossed,
            extra_cycles: 0,
        }
    }
}

fn crosses_page(base: u16, effective: u16) -> bool {
    (base & 0xFF00) != (effective & 0xFF00)
}

impl<M: MemoryBus> Cpu<M> {
    /// Resolves `mode` for the instruction whose opcode was just fetched.
    ///
    /// Consumes the operand bytes, stores the operand in the operand latch and
    /// leaves PC at the following instruction.
    pub(crate) fn resolve(&mut self, mode: AddressingMode) -> Resolved {
        let resolved = match mode {
            AddressingMode::Implied => Resolved::new(Operand::Implied),
            AddressingMode::Accumulator => Resolved::new(Operand::Accumulator),
            AddressingMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                Resolved::new(Operand::Address(addr))
            }
            AddressingMode::ZeroPage => {
                let zp = self.fetch_byte();
                Resolved::new(Operand::Address(zp as u16))
            }
            AddressingMode::ZeroPageX => {
                let zp = self.fetch_byte().wrapping_add(self.x);
                Resolved::new(Operand::Address(zp as u16))
            }
            AddressingMode::ZeroPageY => {
                let zp = self.fetch_byte().wrapping_add(self.y);
                Resolved::new(Operand::Address(zp as u16))
            }
            AddressingMode::Absolute => {
                let addr = self.fetch_word();
                Resolved::new(Operand::Address(addr))
            }
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word();
                let addr = base.wrapping_add(self.x as u16);
                Resolved::crossing(Operand::Address(addr), crosses_page(base, addr))
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word();
                let addr = base.wrapping_add(self.y as u16);
                Resolved::crossing(Operand::Address(addr), crosses_page(base, addr))
            }
            AddressingMode::IndexedIndirect => {
                let ptr = self.fetch_byte().wrapping_add(self.x);
                let addr = self.read_zero_page_word(ptr);
                Resolved::new(Operand::Address(addr))
            }
            AddressingMode::IndirectIndexed => {
                let ptr = self.fetch_byte();
                let base = self.read_zero_page_word(ptr);
                let addr = base.wrapping_add(self.y as u16);
                Resolved::crossing(Operand::Address(addr), crosses_page(base, addr))
            }
            AddressingMode::Indirect => {
                let ptr = self.fetch_byte();
                let addr = self.read_zero_page_word(ptr);
                Resolved::new(Operand::Address(addr))
            }
            AddressingMode::IndirectAbsolute => {
                let ptr = self.fetch_word();
                let lo = self.read(ptr) as u16;
                match self.config.variant {
                    Variant::Nmos6502 => {
                        // The high byte never leaves the pointer's page
                        let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
                        let hi = self.read(hi_addr) as u16;
                        Resolved::new(Operand::Address((hi << 8) | lo))
                    }
                    Variant::Cmos65C02 => {
                        let hi = self.read(ptr.wrapping_add(1)) as u16;
                        Resolved {
                            operand: Operand::Address((hi << 8) | lo),
                            page_crossed: false,
                            extra_cycles: 1,
                        }
                    }
                }
            }
            AddressingMode::AbsoluteIndexedIndirect => {
                let ptr = self.fetch_word().wrapping_add(self.x as u16);
                let addr = self.read_word(ptr);
                Resolved::new(Operand::Address(addr))
            }
            AddressingMode::Relative => {
                let offset = self.fetch_byte() as i8;
                let target = self.pc.wrapping_add_signed(offset as i16);
                Resolved::crossing(Operand::Branch(target), crosses_page(self.pc, target))
            }
            AddressingMode::ZeroPageRelative => {
                let zp = self.fetch_byte();
                let offset = self.fetch_byte() as i8;
                let target = self.pc.wrapping_add_signed(offset as i16);
                Resolved::crossing(
                    Operand::TestAndBranch {
                        address: zp as u16,
                        target,
                    },
                    crosses_page(self.pc, target),
                )
            }
        };

        self.operand = match resolved.operand {
            Operand::Address(addr) | Operand::Branch(addr) => addr,
            Operand::TestAndBranch { target, .. } => target,
            Operand::Implied | Operand::Accumulator => 0,
        };

        resolved
    }

    /// Reads a pointer from zero page; the high byte wraps within page zero.
    fn read_zero_page_word(&mut self, ptr: u8) -> u16 {
        let lo = self.read(ptr as u16) as u16;
        let hi = self.read(ptr.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }
}
