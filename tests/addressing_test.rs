//! Addressing mode and cycle timing tests
//!
//! Each test runs a single instruction through `advance` and checks where
//! the operand came from and what it cost.

use lib65c02::{Cpu, CpuConfig, FlatMemory, MemoryBus, Variant};

/// Helper function to create a CPU with boot vector at 0x8000
fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.poke(0xFFFC, 0x00);
    memory.poke(0xFFFD, 0x80);
    Cpu::new(memory)
}

fn setup_nmos() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.poke(0xFFFD, 0x80);
    Cpu::with_config(
        memory,
        CpuConfig {
            variant: Variant::Nmos6502,
        },
    )
}

// ========== Zero Page ==========

#[test]
fn test_zero_page_x_wraps_without_penalty() {
    let mut cpu = setup_cpu();

    // LDA $FF,X with X = 1 reads 0x0000
    cpu.memory_mut().load(0x8000, &[0xB5, 0xFF]);
    cpu.memory_mut().poke(0x0000, 0x5A);
    cpu.memory_mut().poke(0x0100, 0xA5);
    cpu.set_x(0x01);

    assert_eq!(cpu.advance(), Ok(4));
    assert_eq!(cpu.a(), 0x5A);
}

#[test]
fn test_zero_page_y_wraps() {
    let mut cpu = setup_cpu();

    // LDX $F0,Y with Y = 0x20 reads 0x0010
    cpu.memory_mut().load(0x8000, &[0xB6, 0xF0]);
    cpu.memory_mut().poke(0x0010, 0x77);
    cpu.set_y(0x20);

    assert_eq!(cpu.advance(), Ok(4));
    assert_eq!(cpu.x(), 0x77);
}

#[test]
fn test_indexed_indirect_pointer_wraps() {
    let mut cpu = setup_cpu();

    // LDA ($FE,X) with X = 1: pointer at 0x00FF/0x0000
    cpu.memory_mut().load(0x8000, &[0xA1, 0xFE]);
    cpu.memory_mut().poke(0x00FF, 0x00);
    cpu.memory_mut().poke(0x0000, 0x40);
    cpu.memory_mut().poke(0x4000, 0x99);
    cpu.set_x(0x01);

    assert_eq!(cpu.advance(), Ok(6));
    assert_eq!(cpu.a(), 0x99);
}

// ========== Absolute Indexed ==========

#[test]
fn test_absolute_x_no_cross() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().load(0x8000, &[0xBD, 0x00, 0x20]);
    cpu.memory_mut().poke(0x2010, 0x01);
    cpu.set_x(0x10);

    assert_eq!(cpu.advance(), Ok(4));
    assert_eq!(cpu.a(), 0x01);
}

#[test]
fn test_absolute_x_page_cross_penalty() {
    let mut cpu = setup_cpu();

    // LDA $00FF,X with X = 1 reads 0x0100
    cpu.memory_mut().load(0x8000, &[0xBD, 0xFF, 0x00]);
    cpu.memory_mut().poke(0x0100, 0x42);
    cpu.set_x(0x01);

    assert_eq!(cpu.advance(), Ok(5));
    assert_eq!(cpu.a(), 0x42);
}

#[test]
fn test_store_never_pays_penalty() {
    let mut cpu = setup_cpu();

    // STA $00FF,X with X = 1
    cpu.memory_mut().load(0x8000, &[0x9D, 0xFF, 0x00]);
    cpu.set_a(0x33);
    cpu.set_x(0x01);

    assert_eq!(cpu.advance(), Ok(5));
    assert_eq!(cpu.memory_mut().peek(0x0100), 0x33);
}

#[test]
fn test_indirect_indexed_page_cross() {
    let mut cpu = setup_cpu();

    // LDA ($40),Y with pointer 0x20FF and Y = 1
    cpu.memory_mut().load(0x8000, &[0xB1, 0x40]);
    cpu.memory_mut().load(0x0040, &[0xFF, 0x20]);
    cpu.memory_mut().poke(0x2100, 0x66);
    cpu.set_y(0x01);

    assert_eq!(cpu.advance(), Ok(6));
    assert_eq!(cpu.a(), 0x66);
}

#[test]
fn test_shift_absolute_x_penalty_by_variant() {
    // ASL $2000,X with no crossing
    let mut cmos = setup_cpu();
    cmos.memory_mut().load(0x8000, &[0x1E, 0x00, 0x20]);
    assert_eq!(cmos.advance(), Ok(6));

    let mut nmos = setup_nmos();
    nmos.memory_mut().load(0x8000, &[0x1E, 0x00, 0x20]);
    assert_eq!(nmos.advance(), Ok(7));
}

#[test]
fn test_inc_absolute_x_fixed_cost() {
    let mut cpu = setup_cpu();

    // INC $20FF,X with X = 1
    cpu.memory_mut().load(0x8000, &[0xFE, 0xFF, 0x20]);
    cpu.set_x(0x01);

    assert_eq!(cpu.advance(), Ok(7));
    assert_eq!(cpu.memory_mut().peek(0x2100), 0x01);
}

// ========== Indirect Jumps ==========

#[test]
fn test_jmp_indirect_cmos_reads_across_page() {
    let mut cpu = setup_cpu();

    // JMP ($30FF)
    cpu.memory_mut().load(0x8000, &[0x6C, 0xFF, 0x30]);
    cpu.memory_mut().poke(0x30FF, 0x34);
    cpu.memory_mut().poke(0x3100, 0x12);
    cpu.memory_mut().poke(0x3000, 0x56);

    assert_eq!(cpu.advance(), Ok(6));
    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_jmp_indirect_nmos_page_wrap_bug() {
    let mut cpu = setup_nmos();

    cpu.memory_mut().load(0x8000, &[0x6C, 0xFF, 0x30]);
    cpu.memory_mut().poke(0x30FF, 0x34);
    cpu.memory_mut().poke(0x3100, 0x12);
    cpu.memory_mut().poke(0x3000, 0x56);

    assert_eq!(cpu.advance(), Ok(5));
    assert_eq!(cpu.pc(), 0x5634);
}

#[test]
fn test_jmp_absolute_indexed_indirect() {
    let mut cpu = setup_cpu();

    // JMP ($4000,X) with X = 4
    cpu.memory_mut().load(0x8000, &[0x7C, 0x00, 0x40]);
    cpu.memory_mut().load(0x4004, &[0xCD, 0xAB]);
    cpu.set_x(0x04);

    assert_eq!(cpu.advance(), Ok(6));
    assert_eq!(cpu.pc(), 0xABCD);
}

// ========== Relative ==========

#[test]
fn test_branch_not_taken() {
    let mut cpu = setup_cpu();

    // BEQ +$10 with Z clear
    cpu.memory_mut().load(0x8000, &[0xF0, 0x10]);

    assert_eq!(cpu.advance(), Ok(2));
    assert_eq!(cpu.pc(), 0x8002);
}

#[test]
fn test_branch_taken_same_page() {
    let mut cpu = setup_cpu();

    // BNE +$10 with Z clear
    cpu.memory_mut().load(0x8000, &[0xD0, 0x10]);

    assert_eq!(cpu.advance(), Ok(3));
    assert_eq!(cpu.pc(), 0x8012);
}

#[test]
fn test_branch_taken_backwards_across_page() {
    let mut cpu = setup_cpu();

    // BRA -4 from 0x8000: target 0x7FFE
    cpu.memory_mut().load(0x8000, &[0x80, 0xFC]);

    assert_eq!(cpu.advance(), Ok(4));
    assert_eq!(cpu.pc(), 0x7FFE);
}

#[test]
fn test_branch_crossing_measured_from_next_instruction() {
    let mut cpu = setup_cpu();

    // BCC at 0x80FD: next instruction 0x80FF, +1 lands on 0x8100
    cpu.set_pc(0x80FD);
    cpu.memory_mut().load(0x80FD, &[0x90, 0x01]);

    assert_eq!(cpu.advance(), Ok(4));
    assert_eq!(cpu.pc(), 0x8100);
}

#[test]
fn test_operand_latch_records_effective_address() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().load(0x8000, &[0xAD, 0x78, 0x56]);
    cpu.advance().unwrap();

    assert_eq!(cpu.opcode(), 0xAD);
    assert_eq!(cpu.operand(), 0x5678);
}
