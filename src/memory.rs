//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that connects the CPU to the
//! surrounding system. The system owns all memory; the CPU only borrows it one
//! access at a time.
//!
//! ## Fast Path
//!
//! On the Lynx, everything below `$FC00` is plain RAM while the top 1KB is
//! overlaid by the custom chips, the boot ROM and the vectors. The bus exposes
//! the plain RAM as a slice through [`MemoryBus::fast_ram`], and the CPU reads
//! and writes it directly. Any address the slice does not cover goes through
//! [`MemoryBus::peek`] and [`MemoryBus::poke`], which may have side effects
//! (memory-mapped I/O).
//!
//! ## Design Principles
//!
//! - No bus errors: reads and writes always succeed
//! - Reads take `&mut self`, since I/O registers may change when read
//! - The fast window is a slice, so its bounds are checked rather than trusted

/// What the CPU should do after fetching an undefined opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IllegalOpcodeAction {
    /// Run it as the 65C02 does: a NOP of the slot's width and timing.
    #[default]
    Nop,

    /// Stop before executing it and report `ExecutionError::IllegalOpcode`.
    Trap,

    /// Lock the CPU up until the next reset, as STP does.
    Halt,
}

/// System bus trait for CPU memory accesses.
///
/// Implementations of this trait are the surrounding system: they decode
/// addresses, own the RAM and decide what undefined opcodes mean.
///
/// # Examples
///
/// ```
/// use lib65c02::{MemoryBus, FlatMemory};
///
/// let mut mem = FlatMemory::new();
///
/// // Write a value
/// mem.poke(0x1234, 0x42);
///
/// // Read it back
/// assert_eq!(mem.peek(0x1234), 0x42);
/// ```
///
/// ## Implementing Custom Memory
///
/// ```
/// use lib65c02::MemoryBus;
///
/// struct Console {
///     ram: Vec<u8>,       // 0x0000-0xFBFF
///     rom: [u8; 0x400],   // 0xFC00-0xFFFF
/// }
///
/// impl MemoryBus for Console {
///     fn peek(&mut self, addr: u16) -> u8 {
///         match self.ram.get(addr as usize) {
///             Some(&value) => value,
///             None => self.rom[(addr - 0xFC00) as usize],
///         }
///     }
///
///     fn poke(&mut self, addr: u16, value: u8) {
///         if let Some(cell) = self.ram.get_mut(addr as usize) {
///             *cell = value;
///         }
///         // Writes to ROM are ignored
///     }
///
///     fn fast_ram(&mut self) -> &mut [u8] {
///         &mut self.ram
///     }
/// }
/// ```
pub trait MemoryBus {
    /// Reads a byte from an address outside the fast RAM window.
    ///
    /// This method must never panic. Unmapped addresses may return anything.
    fn peek(&mut self, addr: u16) -> u8;

    /// Writes a byte to an address outside the fast RAM window.
    ///
    /// This method must never panic. Writes to ROM or unmapped space may be
    /// ignored.
    fn poke(&mut self, addr: u16, value: u8);

    /// Reads a little-endian word. Used for vectors.
    ///
    /// The high byte comes from `addr + 1`, wrapping at the top of memory.
    fn peek_word(&mut self, addr: u16) -> u16 {
        let lo = self.peek(addr) as u16;
        let hi = self.peek(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// The contiguous RAM window starting at address 0.
    ///
    /// The CPU serves every address below `fast_ram().len()` from this slice
    /// and never calls `peek`/`poke` for them. The default has no window, so
    /// every access goes through the bus.
    fn fast_ram(&mut self) -> &mut [u8] {
        &mut []
    }

    /// Called when the CPU fetches an undefined opcode.
    ///
    /// `address` is where the opcode was fetched from. The default treats the
    /// opcode as the hardware does.
    fn illegal_opcode(&mut self, _opcode: u8, _address: u16) -> IllegalOpcodeAction {
        IllegalOpcodeAction::Nop
    }
}

/// Size of the Lynx RAM window: RAM below `$FC00` is never overlaid.
pub const DEFAULT_RAM_WINDOW: usize = 0xFC00;

/// Simple 64KB flat memory implementation.
///
/// All 65536 addresses are backed by one array. The first `ram_window` bytes
/// are handed to the CPU as its fast path; the rest is reached through
/// `peek`/`poke`, but is still plain memory.
///
/// Useful for:
/// - Testing and development
/// - Running bare CPU test programs
///
/// # Examples
///
/// ```
/// use lib65c02::{Cpu, FlatMemory, MemoryBus};
///
/// // Create memory and set up the boot vector
/// let mut memory = FlatMemory::new();
/// memory.poke(0xFFFC, 0x00); // Boot vector low byte
/// memory.poke(0xFFFD, 0x80); // Boot vector high byte (PC = 0x8000)
///
/// // Load a NOP at 0x8000
/// memory.poke(0x8000, 0xEA);
///
/// let cpu = Cpu::new(memory);
/// assert_eq!(cpu.pc(), 0x8000);
/// ```
pub struct FlatMemory {
    /// 64KB contiguous memory array
    data: Box<[u8; 65536]>,

    /// Number of bytes exposed as the fast RAM window
    ram_window: usize,
}

impl FlatMemory {
    /// Creates zeroed memory with the Lynx-sized RAM window.
    pub fn new() -> Self {
        Self::with_ram_window(DEFAULT_RAM_WINDOW)
    }

    /// Creates zeroed memory exposing the first `ram_window` bytes as fast RAM.
    ///
    /// Windows larger than 64KB are clamped.
    pub fn with_ram_window(ram_window: usize) -> Self {
        Self {
            data: Box::new([0; 65536]),
            ram_window: ram_window.min(65536),
        }
    }

    /// Size of the fast RAM window in bytes.
    pub fn ram_window(&self) -> usize {
        self.ram_window
    }

    /// Copies `bytes` into memory starting at `start`, wrapping at the top.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        let mut addr = start;
        for &byte in bytes {
            self.data[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn peek(&mut self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn poke(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    fn fast_ram(&mut self) -> &mut [u8] {
        &mut self.data[..self.ram_window]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_memory_peek_poke() {
        let mut mem = FlatMemory::new();

        // Initially all zeros
        assert_eq!(mem.peek(0x0000), 0x00);
        assert_eq!(mem.peek(0xFFFF), 0x00);

        mem.poke(0x1234, 0x42);
        assert_eq!(mem.peek(0x1234), 0x42);

        // Neighbours untouched
        assert_eq!(mem.peek(0x1233), 0x00);
        assert_eq!(mem.peek(0x1235), 0x00);
    }

    #[test]
    fn test_fast_ram_is_the_same_storage() {
        let mut mem = FlatMemory::new();
        mem.fast_ram()[0x0200] = 0x99;
        assert_eq!(mem.peek(0x0200), 0x99);
        assert_eq!(mem.fast_ram().len(), DEFAULT_RAM_WINDOW);
    }

    #[test]
    fn test_window_is_clamped() {
        let mut mem = FlatMemory::with_ram_window(0x20000);
        assert_eq!(mem.ram_window(), 0x10000);
        assert_eq!(mem.fast_ram().len(), 0x10000);
    }

    #[test]
    fn test_peek_word_wraps() {
        let mut mem = FlatMemory::new();
        mem.poke(0xFFFF, 0x34);
        mem.poke(0x0000, 0x12);
        assert_eq!(mem.peek_word(0xFFFF), 0x1234);
    }

    #[test]
    fn test_load_wraps() {
        let mut mem = FlatMemory::new();
        mem.load(0xFFFE, &[1, 2, 3]);
        assert_eq!(mem.peek(0xFFFE), 1);
        assert_eq!(mem.peek(0xFFFF), 2);
        assert_eq!(mem.peek(0x0000), 3);
    }
}
