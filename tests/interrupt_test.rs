//! Integration tests for CPU interrupt support.
//!
//! These tests verify the interrupt sequencing including:
//! - NMI edge latching and priority over IRQ
//! - IRQ level semantics and I flag masking
//! - 7-cycle interrupt service sequence and the pushed frame
//! - WAI wake-up, masked or not

use lib65c02::{Cpu, FlatMemory, InterruptState, MemoryBus, IRQ_VECTOR, NMI_VECTOR};

/// CPU booting at 0x8000 with NMI handler at 0x9000 and IRQ handler at 0xA000.
fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.poke(0xFFFC, 0x00);
    memory.poke(0xFFFD, 0x80);
    memory.poke(NMI_VECTOR, 0x00);
    memory.poke(NMI_VECTOR + 1, 0x90);
    memory.poke(IRQ_VECTOR, 0x00);
    memory.poke(IRQ_VECTOR + 1, 0xA0);

    // NOPs everywhere the tests run
    for addr in 0x8000..0x8010 {
        memory.poke(addr, 0xEA);
    }
    for addr in 0x9000..0x9010 {
        memory.poke(addr, 0xEA);
    }
    for addr in 0xA000..0xA010 {
        memory.poke(addr, 0xEA);
    }

    Cpu::new(memory)
}

#[test]
fn test_irq_masked_by_default() {
    let mut cpu = setup_cpu();
    cpu.request_irq(true);

    assert_eq!(cpu.advance(), Ok(2));
    assert_eq!(cpu.pc(), 0x8001);
    assert_eq!(cpu.interrupt_state(), InterruptState::Idle);
}

#[test]
fn test_irq_serviced_when_enabled() {
    let mut cpu = setup_cpu();
    cpu.set_flag_i(false);
    cpu.set_flag_c(true);
    cpu.request_irq(true);
    assert_eq!(cpu.interrupt_state(), InterruptState::IrqPending);

    // NOP (2) + IRQ entry (7)
    assert_eq!(cpu.advance(), Ok(9));
    assert_eq!(cpu.pc(), 0xA000);
    assert!(cpu.flag_i());
    assert_eq!(cpu.sp(), 0xFC);

    // Return address is the instruction after the NOP, status has B clear
    assert_eq!(cpu.memory_mut().peek(0x01FF), 0x80);
    assert_eq!(cpu.memory_mut().peek(0x01FE), 0x01);
    assert_eq!(cpu.memory_mut().peek(0x01FD), 0x21);
}

#[test]
fn test_cli_takes_irq_at_same_boundary() {
    let mut cpu = setup_cpu();
    // CLI
    cpu.memory_mut().poke(0x8000, 0x58);
    cpu.request_irq(true);

    assert_eq!(cpu.advance(), Ok(9));
    assert_eq!(cpu.pc(), 0xA000);
}

#[test]
fn test_irq_level_reenters_after_rti() {
    let mut cpu = setup_cpu();
    // RTI at the IRQ handler
    cpu.memory_mut().poke(0xA000, 0x40);
    cpu.set_flag_i(false);
    cpu.request_irq(true);

    cpu.advance().unwrap();
    assert_eq!(cpu.pc(), 0xA000);

    // RTI restores I = 0 and the line is still asserted
    assert_eq!(cpu.advance(), Ok(6 + 7));
    assert_eq!(cpu.pc(), 0xA000);

    cpu.request_irq(false);
    assert_eq!(cpu.advance(), Ok(6));
    assert_eq!(cpu.pc(), 0x8001);
}

#[test]
fn test_nmi_ignores_i_flag() {
    let mut cpu = setup_cpu();
    assert!(cpu.flag_i());
    cpu.request_nmi();

    assert_eq!(cpu.advance(), Ok(9));
    assert_eq!(cpu.pc(), 0x9000);
    assert!(!cpu.nmi_pending());
}

#[test]
fn test_nmi_has_priority_over_irq() {
    let mut cpu = setup_cpu();
    cpu.set_flag_i(false);
    cpu.request_irq(true);
    cpu.request_nmi();
    assert_eq!(cpu.interrupt_state(), InterruptState::NmiPending);

    cpu.advance().unwrap();
    assert_eq!(cpu.pc(), 0x9000);

    // The handler runs with I set, so the IRQ waits
    cpu.advance().unwrap();
    assert_eq!(cpu.pc(), 0x9001);
}

#[test]
fn test_nmi_is_edge_latched_once() {
    let mut cpu = setup_cpu();
    cpu.request_nmi();
    cpu.request_nmi();

    cpu.advance().unwrap();
    assert_eq!(cpu.pc(), 0x9000);

    assert_eq!(cpu.advance(), Ok(2));
    assert_eq!(cpu.pc(), 0x9001);
}

#[test]
fn test_interrupt_clears_decimal_flag() {
    let mut cpu = setup_cpu();
    cpu.set_flag_d(true);
    cpu.request_nmi();

    cpu.advance().unwrap();
    assert!(!cpu.flag_d());
    // Pushed status still carries D
    assert_eq!(cpu.memory_mut().peek(0x01FD) & 0x08, 0x08);
}

#[test]
fn test_wai_idles_until_interrupt() {
    let mut cpu = setup_cpu();
    // WAI
    cpu.memory_mut().poke(0x8000, 0xCB);

    assert_eq!(cpu.advance(), Ok(3));
    assert!(cpu.is_waiting());

    for _ in 0..5 {
        assert_eq!(cpu.advance(), Ok(1));
        assert_eq!(cpu.pc(), 0x8001);
    }

    cpu.set_flag_i(false);
    cpu.request_irq(true);
    assert_eq!(cpu.advance(), Ok(1 + 7));
    assert!(!cpu.is_waiting());
    assert_eq!(cpu.pc(), 0xA000);
    // Handler returns to the instruction after WAI
    assert_eq!(cpu.memory_mut().peek(0x01FE), 0x01);
}

#[test]
fn test_wai_wakes_on_masked_irq_without_servicing() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().poke(0x8000, 0xCB);

    cpu.advance().unwrap();
    assert!(cpu.is_waiting());

    cpu.request_irq(true);
    assert_eq!(cpu.advance(), Ok(1));
    assert!(!cpu.is_waiting());
    assert_eq!(cpu.pc(), 0x8001);
    assert_eq!(cpu.sp(), 0xFF);

    // Execution resumes after WAI
    assert_eq!(cpu.advance(), Ok(2));
    assert_eq!(cpu.pc(), 0x8002);
}

#[test]
fn test_stp_ignores_interrupts() {
    let mut cpu = setup_cpu();
    // STP
    cpu.memory_mut().poke(0x8000, 0xDB);

    cpu.advance().unwrap();
    cpu.request_nmi();

    for _ in 0..3 {
        assert_eq!(cpu.advance(), Ok(1));
    }
    assert!(cpu.is_stopped());
    assert_eq!(cpu.pc(), 0x8001);
}
