//! # 65C02 CPU Core
//!
//! A cycle-counted 65C02 CPU emulator designed to be driven by a larger system
//! emulator (the Atari Lynx in particular).
//!
//! This crate provides the processor only: registers and flags, the 16 addressing
//! modes, the full 65C02 instruction set including its BCD arithmetic and
//! bit-manipulation extensions, interrupt sequencing, breakpoints and save-state
//! serialization. Memory, video, audio and everything else belong to the
//! surrounding system, which plugs in through the [`MemoryBus`] trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use lib65c02::{Cpu, FlatMemory, MemoryBus};
//!
//! // 64KB memory with the Lynx-sized fast RAM window
//! let mut memory = FlatMemory::new();
//!
//! // Boot vector points at 0x0200
//! memory.poke(0xFFFC, 0x00);
//! memory.poke(0xFFFD, 0x02);
//!
//! // LDA #$42
//! memory.poke(0x0200, 0xA9);
//! memory.poke(0x0201, 0x42);
//!
//! let mut cpu = Cpu::new(memory);
//! assert_eq!(cpu.pc(), 0x0200);
//!
//! let cycles = cpu.advance().unwrap();
//! assert_eq!(cycles, 2);
//! assert_eq!(cpu.a(), 0x42);
//! ```
//!
//! ## Architecture
//!
//! - **Table-Driven Design**: every opcode maps to an operation, an addressing
//!   mode and a base cycle cost in [`OPCODE_TABLE`]
//! - **Explicit Timing**: [`Cpu::advance`] returns the cycles it consumed, and the
//!   caller drives the rest of the system with that count
//! - **Fast Path**: addresses inside the bus's RAM window are served from a slice,
//!   everything else goes through `peek`/`poke`
//! - **Reversible State**: [`CpuState`] captures everything needed to resume
//!
//! ## Modules
//!
//! - `cpu` - CPU state, bus adapter and the execution loop
//! - `addressing` - Addressing modes and operand resolution
//! - `opcodes` - Opcode metadata table
//! - `bcd` - Decimal mode arithmetic tables
//! - `interrupts` - NMI/IRQ latching and servicing
//! - `savestate` - Save-state blob format
//! - `breakpoints` - Program counter watch list

pub mod addressing;
pub mod bcd;
pub mod breakpoints;
pub mod cpu;
pub mod interrupts;
pub mod memory;
pub mod opcodes;
pub mod registers;
pub mod savestate;
pub mod status;

// Internal instruction implementations (not part of public API)
mod instructions;

use std::fmt;
use std::io;

// Re-export public API
pub use addressing::AddressingMode;
pub use breakpoints::{Breakpoints, MAX_BREAKPOINTS};
pub use cpu::{Cpu, CpuConfig, Variant};
pub use interrupts::{InterruptState, BOOT_VECTOR, IRQ_VECTOR, NMI_VECTOR};
pub use memory::{FlatMemory, IllegalOpcodeAction, MemoryBus, DEFAULT_RAM_WINDOW};
pub use opcodes::{validate_table, OpcodeMetadata, Operation, OPCODE_TABLE};
pub use registers::Registers;
pub use savestate::{CpuState, STATE_MAGIC, STATE_SIZE, STATE_VERSION};
pub use status::StatusFlags;

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// The bus asked for illegal opcodes to trap.
    ///
    /// The program counter has been left pointing at the offending opcode.
    IllegalOpcode {
        /// The undefined opcode byte.
        opcode: u8,
        /// Address the opcode was fetched from.
        address: u16,
    },
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecutionError::IllegalOpcode { opcode, address } => {
                write!(f, "Illegal opcode 0x{:02X} at 0x{:04X}", opcode, address)
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

/// Inconsistencies found in the opcode table.
///
/// These are fatal: a table that fails validation cannot drive the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An opcode's operation cannot be used with its addressing mode.
    InvalidMode {
        /// Opcode byte of the bad entry.
        opcode: u8,
        /// Mnemonic of the bad entry.
        mnemonic: &'static str,
        /// The addressing mode the entry declares.
        mode: AddressingMode,
    },

    /// An opcode has no cycle cost.
    ZeroCycles {
        /// Opcode byte of the bad entry.
        opcode: u8,
    },

    /// An entry's size does not match the operand bytes of its mode.
    SizeMismatch {
        /// Opcode byte of the bad entry.
        opcode: u8,
        /// Declared instruction size.
        size: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidMode {
                opcode,
                mnemonic,
                mode,
            } => write!(
                f,
                "Opcode 0x{:02X} ({}) cannot use addressing mode {:?}",
                opcode, mnemonic, mode
            ),
            ConfigError::ZeroCycles { opcode } => {
                write!(f, "Opcode 0x{:02X} has no cycle cost", opcode)
            }
            ConfigError::SizeMismatch { opcode, size } => {
                write!(f, "Opcode 0x{:02X} declares an invalid size of {}", opcode, size)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while saving or restoring CPU state.
///
/// A failed load never modifies the CPU.
#[derive(Debug)]
pub enum StateError {
    /// The sink or source failed; the underlying error is passed through as-is.
    Io(io::Error),

    /// The blob is not the size this version of the format requires.
    Length {
        /// Size the format requires.
        expected: usize,
        /// Size that was supplied.
        actual: usize,
    },

    /// The blob does not start with the state magic number.
    Magic([u8; 4]),

    /// The blob was written by an unsupported format version.
    Version(u32),

    /// The blob claims more breakpoints than the table can hold.
    Breakpoints(u8),

    /// A field holds a value `save_state` never writes: a latch other than 0
    /// or 1, a status byte with B set or bit 5 clear, a repeated breakpoint,
    /// or a non-zero unused breakpoint slot.
    Malformed {
        /// Byte offset of the bad field within the blob.
        offset: usize,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StateError::Io(err) => write!(f, "State I/O failed: {}", err),
            StateError::Length { expected, actual } => write!(
                f,
                "State blob is {} bytes, expected {}",
                actual, expected
            ),
            StateError::Magic(magic) => write!(f, "Bad state magic {:02X?}", magic),
            StateError::Version(version) => {
                write!(f, "Unsupported state version {}", version)
            }
            StateError::Breakpoints(count) => write!(
                f,
                "State holds {} breakpoints, capacity is {}",
                count, MAX_BREAKPOINTS
            ),
            StateError::Malformed { offset } => {
                write!(f, "Malformed state field at offset {}", offset)
            }
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StateError {
    fn from(err: io::Error) -> Self {
        StateError::Io(err)
    }
}

/// Errors from the breakpoint table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakpointError {
    /// Every slot is in use.
    CapacityExceeded {
        /// Number of slots in the table.
        capacity: usize,
    },
}

impl fmt::Display for BreakpointError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BreakpointError::CapacityExceeded { capacity } => {
                write!(f, "All {} breakpoint slots are in use", capacity)
            }
        }
    }
}

impl std::error::Error for BreakpointError {}
