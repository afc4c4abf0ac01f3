//! Opcode table validation tests
//!
//! Verifies that the OPCODE_TABLE is consistent and matches the 65C02
//! reference timings.

use lib65c02::{validate_table, AddressingMode, ConfigError, Operation, OPCODE_TABLE};

#[test]
fn test_table_validates() {
    assert_eq!(validate_table(), Ok(()));
}

#[test]
fn test_opcode_table_size() {
    assert_eq!(OPCODE_TABLE.len(), 256);
}

#[test]
fn test_size_matches_mode() {
    for (opcode, metadata) in OPCODE_TABLE.iter().enumerate() {
        assert_eq!(
            metadata.size_bytes,
            1 + metadata.addressing_mode.operand_bytes(),
            "Opcode 0x{:02X} has inconsistent size",
            opcode
        );
    }
}

#[test]
fn test_every_opcode_has_cycles() {
    for (opcode, metadata) in OPCODE_TABLE.iter().enumerate() {
        assert!(
            metadata.base_cycles > 0,
            "Opcode 0x{:02X} should have a cycle cost",
            opcode
        );
    }
}

#[test]
fn test_reference_timings() {
    let expected = [
        (0x00, "BRK", 7),
        (0x20, "JSR", 6),
        (0x40, "RTI", 6),
        (0x60, "RTS", 6),
        (0x6C, "JMP", 5),
        (0x7C, "JMP", 6),
        (0x80, "BRA", 2),
        (0x89, "BIT", 2),
        (0x91, "STA", 6),
        (0x9C, "STZ", 4),
        (0xB2, "LDA", 5),
        (0xCB, "WAI", 3),
        (0xDB, "STP", 3),
        (0xEA, "NOP", 2),
        (0xFE, "INC", 7),
        (0x1A, "INC", 2),
        (0x3A, "DEC", 2),
        (0x5A, "PHY", 3),
        (0xFA, "PLX", 4),
    ];

    for (opcode, mnemonic, cycles) in expected {
        let metadata = &OPCODE_TABLE[opcode];
        assert_eq!(metadata.mnemonic(), mnemonic, "Opcode 0x{:02X}", opcode);
        assert_eq!(metadata.base_cycles, cycles, "Opcode 0x{:02X}", opcode);
    }
}

#[test]
fn test_cmos_modes() {
    assert_eq!(OPCODE_TABLE[0x1A].addressing_mode, AddressingMode::Accumulator);
    assert_eq!(OPCODE_TABLE[0x12].addressing_mode, AddressingMode::Indirect);
    assert_eq!(
        OPCODE_TABLE[0x7C].addressing_mode,
        AddressingMode::AbsoluteIndexedIndirect
    );
    assert_eq!(
        OPCODE_TABLE[0x0F].addressing_mode,
        AddressingMode::ZeroPageRelative
    );
    assert_eq!(OPCODE_TABLE[0x0F].size_bytes, 3);
}

#[test]
fn test_undefined_slots_are_nops_of_known_width() {
    // 0x02 family: two-byte immediate NOPs
    for opcode in [0x02, 0x22, 0x42, 0x62, 0x82, 0xC2, 0xE2] {
        assert_eq!(OPCODE_TABLE[opcode].operation, Operation::Illegal);
        assert_eq!(OPCODE_TABLE[opcode].size_bytes, 2);
    }

    // The x3 column is single-byte, single-cycle
    for row in 0..16usize {
        let x3 = &OPCODE_TABLE[row << 4 | 0x03];
        assert_eq!(x3.operation, Operation::Illegal);
        assert_eq!((x3.size_bytes, x3.base_cycles), (1, 1));
    }

    assert_eq!(OPCODE_TABLE[0x5C].size_bytes, 3);
    assert_eq!(OPCODE_TABLE[0x5C].base_cycles, 8);
}

#[test]
fn test_page_penalty_operations() {
    assert!(Operation::Lda.pays_page_penalty());
    assert!(Operation::Asl.pays_page_penalty());
    assert!(!Operation::Sta.pays_page_penalty());
    assert!(!Operation::Inc.pays_page_penalty());
    assert!(!Operation::Stz.pays_page_penalty());
}

#[test]
fn test_accepts_rejects_bad_pairs() {
    assert!(!Operation::Sta.accepts(AddressingMode::Immediate));
    assert!(!Operation::Jmp.accepts(AddressingMode::ZeroPage));
    assert!(!Operation::Rmb(8).accepts(AddressingMode::ZeroPage));
    assert!(Operation::Rmb(7).accepts(AddressingMode::ZeroPage));
}

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidMode {
        opcode: 0x8D,
        mnemonic: "STA",
        mode: AddressingMode::Immediate,
    };
    assert_eq!(
        err.to_string(),
        "Opcode 0x8D (STA) cannot use addressing mode Immediate"
    );
}
