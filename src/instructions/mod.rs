//! # 65C02 Instruction Implementations
//!
//! This module contains the implementations of all 65C02 instructions, organized by category.
//! Each instruction is implemented as a standalone function that takes a mutable reference
//! to the CPU and the operand the resolver produced. Functions whose cost depends on what
//! they do (branches, decimal arithmetic) return the cycles they add to the table's base cost.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **bits**: Bit manipulation (TSB, TRB, RMB, SMB, BBR, BBS)
//! - **branches**: Relative branches (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS, BRA)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY, STZ)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK, NOP, WAI, STP)
//! - **stack**: Stack operations (PHA, PHP, PHX, PHY, PLA, PLP, PLX, PLY)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub mod alu;
pub mod bits;
pub mod branches;
pub mod control;
pub mod flags;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::opcodes::Operation;
use crate::MemoryBus;

impl<M: MemoryBus> Cpu<M> {
    /// Executes `operation` on a resolved operand.
    ///
    /// Returns the cycles the instruction adds on top of its base cost.
    pub(crate) fn dispatch(&mut self, operation: Operation, operand: Operand, page_crossed: bool) -> u32 {
        match operation {
            // Variable cost
            Operation::Adc => return alu::execute_adc(self, operand),
            Operation::Sbc => return alu::execute_sbc(self, operand),
            Operation::Bcc
            | Operation::Bcs
            | Operation::Beq
            | Operation::Bne
            | Operation::Bmi
            | Operation::Bpl
            | Operation::Bvc
            | Operation::Bvs
            | Operation::Bra => return branches::execute_branch(self, operation, operand, page_crossed),
            Operation::Bbr(bit) => return bits::execute_bbr(self, bit, operand, page_crossed),
            Operation::Bbs(bit) => return bits::execute_bbs(self, bit, operand, page_crossed),

            // ALU
            Operation::And => alu::execute_and(self, operand),
            Operation::Ora => alu::execute_ora(self, operand),
            Operation::Eor => alu::execute_eor(self, operand),
            Operation::Cmp => alu::execute_cmp(self, operand),
            Operation::Cpx => alu::execute_cpx(self, operand),
            Operation::Cpy => alu::execute_cpy(self, operand),
            Operation::Bit => alu::execute_bit(self, operand),

            // Bit manipulation
            Operation::Tsb => bits::execute_tsb(self, operand),
            Operation::Trb => bits::execute_trb(self, operand),
            Operation::Rmb(bit) => bits::execute_rmb(self, bit, operand),
            Operation::Smb(bit) => bits::execute_smb(self, bit, operand),

            // Shifts
            Operation::Asl => shifts::execute_asl(self, operand),
            Operation::Lsr => shifts::execute_lsr(self, operand),
            Operation::Rol => shifts::execute_rol(self, operand),
            Operation::Ror => shifts::execute_ror(self, operand),

            // Loads and stores
            Operation::Lda => load_store::execute_lda(self, operand),
            Operation::Ldx => load_store::execute_ldx(self, operand),
            Operation::Ldy => load_store::execute_ldy(self, operand),
            Operation::Sta => load_store::execute_sta(self, operand),
            Operation::Stx => load_store::execute_stx(self, operand),
            Operation::Sty => load_store::execute_sty(self, operand),
            Operation::Stz => load_store::execute_stz(self, operand),

            // Increments and decrements
            Operation::Inc => inc_dec::execute_inc(self, operand),
            Operation::Dec => inc_dec::execute_dec(self, operand),
            Operation::Inx => inc_dec::execute_inx(self),
            Operation::Iny => inc_dec::execute_iny(self),
            Operation::Dex => inc_dec::execute_dex(self),
            Operation::Dey => inc_dec::execute_dey(self),

            // Control flow
            Operation::Jmp => control::execute_jmp(self, operand),
            Operation::Jsr => control::execute_jsr(self, operand),
            Operation::Rts => control::execute_rts(self),
            Operation::Rti => control::execute_rti(self),
            Operation::Brk => control::execute_brk(self),
            Operation::Wai => control::execute_wai(self),
            Operation::Stp => control::execute_stp(self),
            Operation::Nop | Operation::Illegal => {}

            // Stack
            Operation::Pha => stack::execute_pha(self),
            Operation::Php => stack::execute_php(self),
            Operation::Phx => stack::execute_phx(self),
            Operation::Phy => stack::execute_phy(self),
            Operation::Pla => stack::execute_pla(self),
            Operation::Plp => stack::execute_plp(self),
            Operation::Plx => stack::execute_plx(self),
            Operation::Ply => stack::execute_ply(self),

            // Flags
            Operation::Clc => flags::execute_clc(self),
            Operation::Sec => flags::execute_sec(self),
            Operation::Cli => flags::execute_cli(self),
            Operation::Sei => flags::execute_sei(self),
            Operation::Cld => flags::execute_cld(self),
            Operation::Sed => flags::execute_sed(self),
            Operation::Clv => flags::execute_clv(self),

            // Transfers
            Operation::Tax => transfer::execute_tax(self),
            Operation::Tay => transfer::execute_tay(self),
            Operation::Txa => transfer::execute_txa(self),
            Operation::Tya => transfer::execute_tya(self),
            Operation::Tsx => transfer::execute_tsx(self),
            Operation::Txs => transfer::execute_txs(self),
        }

        0
    }

    /// Reads the data operand: the accumulator or a byte of memory.
    pub(crate) fn read_operand(&mut self, operand: Operand) -> u8 {
        match operand {
            Operand::Accumulator => self.a,
            Operand::Address(addr) => self.read(addr),
            Operand::Implied | Operand::Branch(_) | Operand::TestAndBranch { .. } => {
                unreachable!("opcode table pairs data operations with data modes")
            }
        }
    }

    /// Writes the data operand: the accumulator or a byte of memory.
    pub(crate) fn write_operand(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Accumulator => self.a = value,
            Operand::Address(addr) => self.write(addr, value),
            Operand::Implied | Operand::Branch(_) | Operand::TestAndBranch { .. } => {
                unreachable!("opcode table pairs data operations with data modes")
            }
        }
    }

    /// Reads, transforms and writes back the data operand.
    ///
    /// Returns the value written.
    pub(crate) fn modify_operand(&mut self, operand: Operand, f: impl FnOnce(&mut Self, u8) -> u8) -> u8 {
        let value = self.read_operand(operand);
        let result = f(self, value);
        self.write_operand(operand, result);
        result
    }
}

/// The effective address of a memory operand.
pub(crate) fn effective_address(operand: Operand) -> u16 {
    match operand {
        Operand::Address(addr) => addr,
        Operand::Implied | Operand::Accumulator | Operand::Branch(_) | Operand::TestAndBranch { .. } => {
            unreachable!("opcode table pairs jumps with address modes")
        }
    }
}
