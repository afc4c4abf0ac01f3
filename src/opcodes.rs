//! # Opcode Metadata Table
//!
//! This module contains the 256-entry opcode table that drives the dispatcher.
//!
//! The table covers the WDC 65C02 instruction set:
//! - **All NMOS 6502 documented instructions**
//! - **CMOS additions** - BRA, PHX/PHY/PLX/PLY, STZ, TSB/TRB, INC A/DEC A,
//!   the `(zp)` indirect forms, extra BIT modes and JMP `(abs,X)`
//! - **Bit manipulation** - RMB/SMB and BBR/BBS for all eight bits
//! - **Low power** - WAI and STP
//! - **Undefined slots** - marked [`Operation::Illegal`]; their mode and cycle
//!   count describe the NOP the chip executes in their place
//!
//! Each entry carries the operation, the addressing mode, the base cycle cost
//! (before page-crossing, branch and decimal penalties) and the instruction
//! size in bytes.

use crate::addressing::AddressingMode;
use crate::ConfigError;

use crate::addressing::AddressingMode::{
    Absolute as Abs, AbsoluteIndexedIndirect as Aix, AbsoluteX as Abx, AbsoluteY as Aby,
    Accumulator as Acc, Immediate as Imm, Implied as Imp, IndexedIndirect as Izx,
    Indirect as Izp, IndirectAbsolute as Ind, IndirectIndexed as Izy, Relative as Rel,
    ZeroPage as Zp, ZeroPageRelative as Zpr, ZeroPageX as Zpx, ZeroPageY as Zpy,
};

/// The operation an opcode performs, independent of its addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Adc,
    And,
    Asl,
    /// Branch if the given bit of a zero page byte is clear.
    Bbr(u8),
    /// Branch if the given bit of a zero page byte is set.
    Bbs(u8),
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Phx,
    Phy,
    Pla,
    Plp,
    Plx,
    Ply,
    /// Reset the given bit of a zero page byte.
    Rmb(u8),
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    /// Set the given bit of a zero page byte.
    Smb(u8),
    Sta,
    Stp,
    Stx,
    Sty,
    Stz,
    Tax,
    Tay,
    Trb,
    Tsb,
    Tsx,
    Txa,
    Txs,
    Tya,
    Wai,
    /// Undefined opcode, routed to the bus's illegal-opcode hook.
    Illegal,
}

impl Operation {
    /// Assembler mnemonic, e.g. `"LDA"` or `"BBR3"`.
    pub const fn mnemonic(self) -> &'static str {
        const BBR: [&str; 8] = ["BBR0", "BBR1", "BBR2", "BBR3", "BBR4", "BBR5", "BBR6", "BBR7"];
        const BBS: [&str; 8] = ["BBS0", "BBS1", "BBS2", "BBS3", "BBS4", "BBS5", "BBS6", "BBS7"];
        const RMB: [&str; 8] = ["RMB0", "RMB1", "RMB2", "RMB3", "RMB4", "RMB5", "RMB6", "RMB7"];
        const SMB: [&str; 8] = ["SMB0", "SMB1", "SMB2", "SMB3", "SMB4", "SMB5", "SMB6", "SMB7"];

        match self {
            Operation::Adc => "ADC",
            Operation::And => "AND",
            Operation::Asl => "ASL",
            Operation::Bbr(bit) => BBR[(bit & 7) as usize],
            Operation::Bbs(bit) => BBS[(bit & 7) as usize],
            Operation::Bcc => "BCC",
            Operation::Bcs => "BCS",
            Operation::Beq => "BEQ",
            Operation::Bit => "BIT",
            Operation::Bmi => "BMI",
            Operation::Bne => "BNE",
            Operation::Bpl => "BPL",
            Operation::Bra => "BRA",
            Operation::Brk => "BRK",
            Operation::Bvc => "BVC",
            Operation::Bvs => "BVS",
            Operation::Clc => "CLC",
            Operation::Cld => "CLD",
            Operation::Cli => "CLI",
            Operation::Clv => "CLV",
            Operation::Cmp => "CMP",
            Operation::Cpx => "CPX",
            Operation::Cpy => "CPY",
            Operation::Dec => "DEC",
            Operation::Dex => "DEX",
            Operation::Dey => "DEY",
            Operation::Eor => "EOR",
            Operation::Inc => "INC",
            Operation::Inx => "INX",
            Operation::Iny => "INY",
            Operation::Jmp => "JMP",
            Operation::Jsr => "JSR",
            Operation::Lda => "LDA",
            Operation::Ldx => "LDX",
            Operation::Ldy => "LDY",
            Operation::Lsr => "LSR",
            Operation::Nop => "NOP",
            Operation::Ora => "ORA",
            Operation::Pha => "PHA",
            Operation::Php => "PHP",
            Operation::Phx => "PHX",
            Operation::Phy => "PHY",
            Operation::Pla => "PLA",
            Operation::Plp => "PLP",
            Operation::Plx => "PLX",
            Operation::Ply => "PLY",
            Operation::Rmb(bit) => RMB[(bit & 7) as usize],
            Operation::Rol => "ROL",
            Operation::Ror => "ROR",
            Operation::Rti => "RTI",
            Operation::Rts => "RTS",
            Operation::Sbc => "SBC",
            Operation::Sec => "SEC",
            Operation::Sed => "SED",
            Operation::Sei => "SEI",
            Operation::Smb(bit) => SMB[(bit & 7) as usize],
            Operation::Sta => "STA",
            Operation::Stp => "STP",
            Operation::Stx => "STX",
            Operation::Sty => "STY",
            Operation::Stz => "STZ",
            Operation::Tax => "TAX",
            Operation::Tay => "TAY",
            Operation::Trb => "TRB",
            Operation::Tsb => "TSB",
            Operation::Tsx => "TSX",
            Operation::Txa => "TXA",
            Operation::Txs => "TXS",
            Operation::Tya => "TYA",
            Operation::Wai => "WAI",
            Operation::Illegal => "???",
        }
    }

    /// True if an indexed page crossing costs this operation a cycle.
    ///
    /// Reads pay it. On the 65C02 the shifts and rotates pay it too; stores,
    /// INC and DEC have a fixed cost.
    pub const fn pays_page_penalty(self) -> bool {
        matches!(
            self,
            Operation::Adc
                | Operation::And
                | Operation::Bit
                | Operation::Cmp
                | Operation::Eor
                | Operation::Lda
                | Operation::Ldx
                | Operation::Ldy
                | Operation::Ora
                | Operation::Sbc
                | Operation::Asl
                | Operation::Lsr
                | Operation::Rol
                | Operation::Ror
        )
    }

    /// True if the addressing mode is one this operation can execute with.
    pub const fn accepts(self, mode: AddressingMode) -> bool {
        match self {
            Operation::Adc
            | Operation::And
            | Operation::Cmp
            | Operation::Eor
            | Operation::Lda
            | Operation::Ora
            | Operation::Sbc => matches!(
                mode,
                Imm | Zp | Zpx | Abs | Abx | Aby | Izx | Izy | Izp
            ),
            Operation::Sta => matches!(mode, Zp | Zpx | Abs | Abx | Aby | Izx | Izy | Izp),
            Operation::Asl
            | Operation::Lsr
            | Operation::Rol
            | Operation::Ror
            | Operation::Inc
            | Operation::Dec => matches!(mode, Acc | Zp | Zpx | Abs | Abx),
            Operation::Bit => matches!(mode, Imm | Zp | Zpx | Abs | Abx),
            Operation::Cpx | Operation::Cpy => matches!(mode, Imm | Zp | Abs),
            Operation::Ldx => matches!(mode, Imm | Zp | Zpy | Abs | Aby),
            Operation::Ldy => matches!(mode, Imm | Zp | Zpx | Abs | Abx),
            Operation::Stx => matches!(mode, Zp | Zpy | Abs),
            Operation::Sty => matches!(mode, Zp | Zpx | Abs),
            Operation::Stz => matches!(mode, Zp | Zpx | Abs | Abx),
            Operation::Tsb | Operation::Trb => matches!(mode, Zp | Abs),
            Operation::Rmb(bit) | Operation::Smb(bit) => bit < 8 && matches!(mode, Zp),
            Operation::Bbr(bit) | Operation::Bbs(bit) => bit < 8 && matches!(mode, Zpr),
            Operation::Bcc
            | Operation::Bcs
            | Operation::Beq
            | Operation::Bmi
            | Operation::Bne
            | Operation::Bpl
            | Operation::Bra
            | Operation::Bvc
            | Operation::Bvs => matches!(mode, Rel),
            Operation::Jmp => matches!(mode, Abs | Ind | Aix),
            Operation::Jsr => matches!(mode, Abs),
            // Undefined slots skip their operand bytes without using them
            Operation::Illegal => !matches!(mode, Acc | Rel | Zpr),
            Operation::Brk
            | Operation::Clc
            | Operation::Cld
            | Operation::Cli
            | Operation::Clv
            | Operation::Dex
            | Operation::Dey
            | Operation::Inx
            | Operation::Iny
            | Operation::Nop
            | Operation::Pha
            | Operation::Php
            | Operation::Phx
            | Operation::Phy
            | Operation::Pla
            | Operation::Plp
            | Operation::Plx
            | Operation::Ply
            | Operation::Rti
            | Operation::Rts
            | Operation::Sec
            | Operation::Sed
            | Operation::Sei
            | Operation::Stp
            | Operation::Tax
            | Operation::Tay
            | Operation::Tsx
            | Operation::Txa
            | Operation::Txs
            | Operation::Tya
            | Operation::Wai => matches!(mode, Imp),
        }
    }
}

/// Metadata for a single opcode.
///
/// # Examples
///
/// ```
/// use lib65c02::{AddressingMode, Operation, OPCODE_TABLE};
///
/// // Look up LDA immediate (opcode 0xA9)
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.operation, Operation::Lda);
/// assert_eq!(lda_imm.mnemonic(), "LDA");
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_cycles, 2);
/// assert_eq!(lda_imm.size_bytes, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// What the instruction does.
    pub operation: Operation,

    /// How the instruction finds its operand.
    pub addressing_mode: AddressingMode,

    /// Base cycle cost, before page-crossing, branch and decimal penalties.
    pub base_cycles: u8,

    /// Total instruction size in bytes (opcode + operands).
    pub size_bytes: u8,
}

impl OpcodeMetadata {
    /// Assembler mnemonic of the operation.
    pub const fn mnemonic(&self) -> &'static str {
        self.operation.mnemonic()
    }
}

const fn op(operation: Operation, addressing_mode: AddressingMode, base_cycles: u8) -> OpcodeMetadata {
    OpcodeMetadata {
        operation,
        addressing_mode,
        base_cycles,
        size_bytes: 1 + addressing_mode.operand_bytes(),
    }
}

use self::Operation::*;

/// Complete 256-entry opcode table indexed by opcode byte value.
///
/// Timings are the WDC 65C02's. `JMP (abs)` is listed at the NMOS cost of 5;
/// the resolver adds the 65C02's extra cycle when the CPU is configured as one.
///
/// # Examples
///
/// ```
/// use lib65c02::{Operation, OPCODE_TABLE};
///
/// let brk = &OPCODE_TABLE[0x00];
/// assert_eq!(brk.mnemonic(), "BRK");
/// assert_eq!(brk.base_cycles, 7);
///
/// // Undefined slots still have a width and a cost
/// let undefined = &OPCODE_TABLE[0x02];
/// assert_eq!(undefined.operation, Operation::Illegal);
/// assert_eq!(undefined.size_bytes, 2);
/// ```
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = [
    // 0x00
    op(Brk, Imp, 7), op(Ora, Izx, 6), op(Illegal, Imm, 2), op(Illegal, Imp, 1),
    op(Tsb, Zp, 5), op(Ora, Zp, 3), op(Asl, Zp, 5), op(Rmb(0), Zp, 5),
    op(Php, Imp, 3), op(Ora, Imm, 2), op(Asl, Acc, 2), op(Illegal, Imp, 1),
    op(Tsb, Abs, 6), op(Ora, Abs, 4), op(Asl, Abs, 6), op(Bbr(0), Zpr, 5),
    // 0x10
    op(Bpl, Rel, 2), op(Ora, Izy, 5), op(Ora, Izp, 5), op(Illegal, Imp, 1),
    op(Trb, Zp, 5), op(Ora, Zpx, 4), op(Asl, Zpx, 6), op(Rmb(1), Zp, 5),
    op(Clc, Imp, 2), op(Ora, Aby, 4), op(Inc, Acc, 2), op(Illegal, Imp, 1),
    op(Trb, Abs, 6), op(Ora, Abx, 4), op(Asl, Abx, 6), op(Bbr(1), Zpr, 5),
    // 0x20
    op(Jsr, Abs, 6), op(And, Izx, 6), op(Illegal, Imm, 2), op(Illegal, Imp, 1),
    op(Bit, Zp, 3), op(And, Zp, 3), op(Rol, Zp, 5), op(Rmb(2), Zp, 5),
    op(Plp, Imp, 4), op(And, Imm, 2), op(Rol, Acc, 2), op(Illegal, Imp, 1),
    op(Bit, Abs, 4), op(And, Abs, 4), op(Rol, Abs, 6), op(Bbr(2), Zpr, 5),
    // 0x30
    op(Bmi, Rel, 2), op(And, Izy, 5), op(And, Izp, 5), op(Illegal, Imp, 1),
    op(Bit, Zpx, 4), op(And, Zpx, 4), op(Rol, Zpx, 6), op(Rmb(3), Zp, 5),
    op(Sec, Imp, 2), op(And, Aby, 4), op(Dec, Acc, 2), op(Illegal, Imp, 1),
    op(Bit, Abx, 4), op(And, Abx, 4), op(Rol, Abx, 6), op(Bbr(3), Zpr, 5),
    // 0x40
    op(Rti, Imp, 6), op(Eor, Izx, 6), op(Illegal, Imm, 2), op(Illegal, Imp, 1),
    op(Illegal, Zp, 3), op(Eor, Zp, 3), op(Lsr, Zp, 5), op(Rmb(4), Zp, 5),
    op(Pha, Imp, 3), op(Eor, Imm, 2), op(Lsr, Acc, 2), op(Illegal, Imp, 1),
    op(Jmp, Abs, 3), op(Eor, Abs, 4), op(Lsr, Abs, 6), op(Bbr(4), Zpr, 5),
    // 0x50
    op(Bvc, Rel, 2), op(Eor, Izy, 5), op(Eor, Izp, 5), op(Illegal, Imp, 1),
    op(Illegal, Zpx, 4), op(Eor, Zpx, 4), op(Lsr, Zpx, 6), op(Rmb(5), Zp, 5),
    op(Cli, Imp, 2), op(Eor, Aby, 4), op(Phy, Imp, 3), op(Illegal, Imp, 1),
    op(Illegal, Abs, 8), op(Eor, Abx, 4), op(Lsr, Abx, 6), op(Bbr(5), Zpr, 5),
    // 0x60
    op(Rts, Imp, 6), op(Adc, Izx, 6), op(Illegal, Imm, 2), op(Illegal, Imp, 1),
    op(Stz, Zp, 3), op(Adc, Zp, 3), op(Ror, Zp, 5), op(Rmb(6), Zp, 5),
    op(Pla, Imp, 4), op(Adc, Imm, 2), op(Ror, Acc, 2), op(Illegal, Imp, 1),
    op(Jmp, Ind, 5), op(Adc, Abs, 4), op(Ror, Abs, 6), op(Bbr(6), Zpr, 5),
    // 0x70
    op(Bvs, Rel, 2), op(Adc, Izy, 5), op(Adc, Izp, 5), op(Illegal, Imp, 1),
    op(Stz, Zpx, 4), op(Adc, Zpx, 4), op(Ror, Zpx, 6), op(Rmb(7), Zp, 5),
    op(Sei, Imp, 2), op(Adc, Aby, 4), op(Ply, Imp, 4), op(Illegal, Imp, 1),
    op(Jmp, Aix, 6), op(Adc, Abx, 4), op(Ror, Abx, 6), op(Bbr(7), Zpr, 5),
    // 0x80
    op(Bra, Rel, 2), op(Sta, Izx, 6), op(Illegal, Imm, 2), op(Illegal, Imp, 1),
    op(Sty, Zp, 3), op(Sta, Zp, 3), op(Stx, Zp, 3), op(Smb(0), Zp, 5),
    op(Dey, Imp, 2), op(Bit, Imm, 2), op(Txa, Imp, 2), op(Illegal, Imp, 1),
    op(Sty, Abs, 4), op(Sta, Abs, 4), op(Stx, Abs, 4), op(Bbs(0), Zpr, 5),
    // 0x90
    op(Bcc, Rel, 2), op(Sta, Izy, 6), op(Sta, Izp, 5), op(Illegal, Imp, 1),
    op(Sty, Zpx, 4), op(Sta, Zpx, 4), op(Stx, Zpy, 4), op(Smb(1), Zp, 5),
    op(Tya, Imp, 2), op(Sta, Aby, 5), op(Txs, Imp, 2), op(Illegal, Imp, 1),
    op(Stz, Abs, 4), op(Sta, Abx, 5), op(Stz, Abx, 5), op(Bbs(1), Zpr, 5),
    // 0xA0
    op(Ldy, Imm, 2), op(Lda, Izx, 6), op(Ldx, Imm, 2), op(Illegal, Imp, 1),
    op(Ldy, Zp, 3), op(Lda, Zp, 3), op(Ldx, Zp, 3), op(Smb(2), Zp, 5),
    op(Tay, Imp, 2), op(Lda, Imm, 2), op(Tax, Imp, 2), op(Illegal, Imp, 1),
    op(Ldy, Abs, 4), op(Lda, Abs, 4), op(Ldx, Abs, 4), op(Bbs(2), Zpr, 5),
    // 0xB0
    op(Bcs, Rel, 2), op(Lda, Izy, 5), op(Lda, Izp, 5), op(Illegal, Imp, 1),
    op(Ldy, Zpx, 4), op(Lda, Zpx, 4), op(Ldx, Zpy, 4), op(Smb(3), Zp, 5),
    op(Clv, Imp, 2), op(Lda, Aby, 4), op(Tsx, Imp, 2), op(Illegal, Imp, 1),
    op(Ldy, Abx, 4), op(Lda, Abx, 4), op(Ldx, Aby, 4), op(Bbs(3), Zpr, 5),
    // 0xC0
    op(Cpy, Imm, 2), op(Cmp, Izx, 6), op(Illegal, Imm, 2), op(Illegal, Imp, 1),
    op(Cpy, Zp, 3), op(Cmp, Zp, 3), op(Dec, Zp, 5), op(Smb(4), Zp, 5),
    op(Iny, Imp, 2), op(Cmp, Imm, 2), op(Dex, Imp, 2), op(Wai, Imp, 3),
    op(Cpy, Abs, 4), op(Cmp, Abs, 4), op(Dec, Abs, 6), op(Bbs(4), Zpr, 5),
    // 0xD0
    op(Bne, Rel, 2), op(Cmp, Izy, 5), op(Cmp, Izp, 5), op(Illegal, Imp, 1),
    op(Illegal, Zpx, 4), op(Cmp, Zpx, 4), op(Dec, Zpx, 6), op(Smb(5), Zp, 5),
    op(Cld, Imp, 2), op(Cmp, Aby, 4), op(Phx, Imp, 3), op(Stp, Imp, 3),
    op(Illegal, Abs, 4), op(Cmp, Abx, 4), op(Dec, Abx, 7), op(Bbs(5), Zpr, 5),
    // 0xE0
    op(Cpx, Imm, 2), op(Sbc, Izx, 6), op(Illegal, Imm, 2), op(Illegal, Imp, 1),
    op(Cpx, Zp, 3), op(Sbc, Zp, 3), op(Inc, Zp, 5), op(Smb(6), Zp, 5),
    op(Inx, Imp, 2), op(Sbc, Imm, 2), op(Nop, Imp, 2), op(Illegal, Imp, 1),
    op(Cpx, Abs, 4), op(Sbc, Abs, 4), op(Inc, Abs, 6), op(Bbs(6), Zpr, 5),
    // 0xF0
    op(Beq, Rel, 2), op(Sbc, Izy, 5), op(Sbc, Izp, 5), op(Illegal, Imp, 1),
    op(Illegal, Zpx, 4), op(Sbc, Zpx, 4), op(Inc, Zpx, 6), op(Smb(7), Zp, 5),
    op(Sed, Imp, 2), op(Sbc, Aby, 4), op(Plx, Imp, 4), op(Illegal, Imp, 1),
    op(Illegal, Abs, 4), op(Sbc, Abx, 4), op(Inc, Abx, 7), op(Bbs(7), Zpr, 5),
];

/// Checks every table entry for consistency.
///
/// A failure here means the dispatcher would meet an operand form it cannot
/// execute. The table is static, so this is a build-time property; it is
/// exposed so systems can verify it at startup.
pub fn validate_table() -> Result<(), ConfigError> {
    for (opcode, metadata) in OPCODE_TABLE.iter().enumerate() {
        let opcode = opcode as u8;

        if !metadata.operation.accepts(metadata.addressing_mode) {
            return Err(ConfigError::InvalidMode {
                opcode,
                mnemonic: metadata.mnemonic(),
                mode: metadata.addressing_mode,
            });
        }

        if metadata.base_cycles == 0 {
            return Err(ConfigError::ZeroCycles { opcode });
        }

        if metadata.size_bytes != 1 + metadata.addressing_mode.operand_bytes() {
            return Err(ConfigError::SizeMismatch {
                opcode,
                size: metadata.size_bytes,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_valid() {
        assert_eq!(validate_table(), Ok(()));
    }

    #[test]
    fn test_bit_instructions_are_numbered() {
        for bit in 0..8u8 {
            let row = (bit as usize) << 4;
            assert_eq!(OPCODE_TABLE[row | 0x07].operation, Rmb(bit));
            assert_eq!(OPCODE_TABLE[row | 0x0F].operation, Bbr(bit));
            assert_eq!(OPCODE_TABLE[0x80 | row | 0x07].operation, Smb(bit));
            assert_eq!(OPCODE_TABLE[0x80 | row | 0x0F].operation, Bbs(bit));
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(OPCODE_TABLE[0x4F].mnemonic(), "BBR4");
        assert_eq!(OPCODE_TABLE[0xDB].mnemonic(), "STP");
        assert_eq!(OPCODE_TABLE[0x03].mnemonic(), "???");
    }

    #[test]
    fn test_every_defined_slot_counted() {
        let illegal = OPCODE_TABLE
            .iter()
            .filter(|m| m.operation == Operation::Illegal)
            .count();
        assert_eq!(illegal, 44);
    }
}
