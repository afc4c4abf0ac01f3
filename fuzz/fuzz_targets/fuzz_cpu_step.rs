//! Fuzz target for CPU execution.
//!
//! Builds an arbitrary CPU state and memory image, then runs a handful of
//! instructions with interrupt lines toggled between them. Every advance must
//! return, and the cycle accounting must stay consistent.

#![no_main]

use arbitrary::Arbitrary;
use lib65c02::{Cpu, CpuConfig, FlatMemory, Variant, OPCODE_TABLE};
use libfuzzer_sys::fuzz_target;

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
    nmos: bool,
}

/// Memory regions the first instructions are likely to touch
#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Code at the boot address
    code: [u8; 16],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    /// Data at 0x4000 for absolute addressing
    main_memory: [u8; 256],
}

/// Interrupt activity before one advance
#[derive(Debug, Arbitrary)]
struct FuzzStep {
    nmi: bool,
    irq: Option<bool>,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
    steps: Vec<FuzzStep>,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();

    // Boot at 0x8000, handlers at 0x9000 (NMI) and 0xA000 (IRQ/BRK)
    memory.load(0xFFFA, &[0x00, 0x90, 0x00, 0x80, 0x00, 0xA0]);
    memory.load(0x8000, &input.memory.code);
    memory.load(0x0000, &input.memory.zero_page);
    memory.load(0x0100, &input.memory.stack_page);
    memory.load(0x4000, &input.memory.main_memory);

    let variant = if input.cpu_state.nmos {
        Variant::Nmos6502
    } else {
        Variant::Cmos65C02
    };
    let mut cpu = Cpu::with_config(memory, CpuConfig { variant });

    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_status(input.cpu_state.status);

    for step in input.steps.iter().take(64) {
        if step.nmi {
            cpu.request_nmi();
        }
        if let Some(level) = step.irq {
            cpu.request_irq(level);
        }

        let before = cpu.cycles();
        let was_idle = cpu.is_stopped() || cpu.is_waiting();
        let cycles = cpu.advance().expect("default bus never traps");

        assert_eq!(cpu.cycles(), before + cycles as u64);
        assert!(cycles >= 1);
        if !was_idle {
            // Fetched instruction plus at most an interrupt entry
            let base = OPCODE_TABLE[cpu.opcode() as usize].base_cycles as u32;
            assert!(cycles >= base);
        }
        assert_eq!(cpu.status() & 0x30, 0x20);
    }
});
