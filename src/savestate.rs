//! Save state serialization for the CPU.
//!
//! This module provides the `CpuState` struct and the routines that capture,
//! serialize and restore everything needed to resume execution exactly where
//! it stopped. Memory is not included: the bus belongs to the surrounding
//! system, which saves it alongside.
//!
//! ## Binary Format
//!
//! Fixed order, fixed size ([`STATE_SIZE`] bytes), little-endian:
//! - 4 bytes: Magic number "L65C"
//! - 4 bytes: Version (u32)
//! - 4 bytes: A, X, Y, SP
//! - 2 bytes: PC
//! - 1 byte: Opcode latch
//! - 2 bytes: Operand latch
//! - 1 byte: Status (NV1BDIZC)
//! - 4 bytes: NMI pending, IRQ line, WAI, STP (0 or 1)
//! - 8 bytes: Cycle counter (u64)
//! - 1 byte: Breakpoint count
//! - 16 bytes: Eight breakpoint slots (u16 each, distinct, unused slots are 0)
//!
//! ## Usage
//!
//! ```rust
//! use lib65c02::{Cpu, FlatMemory};
//!
//! let mut cpu = Cpu::new(FlatMemory::new());
//! cpu.set_a(0x42);
//!
//! let mut blob = Vec::new();
//! cpu.save_state(&mut blob).unwrap();
//!
//! cpu.set_a(0x00);
//! cpu.load_state(&mut blob.as_slice()).unwrap();
//! assert_eq!(cpu.a(), 0x42);
//! ```

use std::io::{Read, Write};

use log::debug;

use crate::breakpoints::{Breakpoints, MAX_BREAKPOINTS};
use crate::cpu::Cpu;
use crate::status::StatusFlags;
use crate::{MemoryBus, StateError};

/// Magic number for save states ("L65C" in ASCII).
pub const STATE_MAGIC: [u8; 4] = *b"L65C";

/// Current save state format version.
///
/// Increment this when making breaking changes to the format.
pub const STATE_VERSION: u32 = 1;

/// Size of a serialized state in bytes.
pub const STATE_SIZE: usize = 4 + 4 + 4 + 2 + 1 + 2 + 1 + 4 + 8 + 1 + MAX_BREAKPOINTS * 2;

/// Complete CPU save state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer.
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Opcode latch.
    pub opcode: u8,
    /// Operand latch.
    pub operand: u16,
    /// Status flags (packed byte: NV1BDIZC).
    pub status: u8,
    /// NMI edge latch.
    pub nmi_pending: bool,
    /// IRQ line level.
    pub irq_line: bool,
    /// Parked in WAI.
    pub waiting: bool,
    /// Stopped by STP.
    pub stopped: bool,
    /// Total cycle count.
    pub cycles: u64,
    /// Breakpoint table.
    pub breakpoints: Breakpoints,
}

impl CpuState {
    /// Capture the current state of a CPU.
    pub fn capture<M: MemoryBus>(cpu: &Cpu<M>) -> Self {
        Self {
            a: cpu.a,
            x: cpu.x,
            y: cpu.y,
            sp: cpu.sp,
            pc: cpu.pc,
            opcode: cpu.opcode,
            operand: cpu.operand,
            status: cpu.status(),
            nmi_pending: cpu.nmi_pending,
            irq_line: cpu.irq_line,
            waiting: cpu.waiting,
            stopped: cpu.stopped,
            cycles: cpu.cycles,
            breakpoints: cpu.breakpoints,
        }
    }

    /// Restore this state into a CPU.
    ///
    /// The breakpoint hit from the last `advance` is cleared.
    pub fn restore<M: MemoryBus>(&self, cpu: &mut Cpu<M>) {
        cpu.a = self.a;
        cpu.x = self.x;
        cpu.y = self.y;
        cpu.sp = self.sp;
        cpu.pc = self.pc;
        cpu.opcode = self.opcode;
        cpu.operand = self.operand;
        cpu.set_status(self.status);
        cpu.nmi_pending = self.nmi_pending;
        cpu.irq_line = self.irq_line;
        cpu.waiting = self.waiting;
        cpu.stopped = self.stopped;
        cpu.cycles = self.cycles;
        cpu.breakpoints = self.breakpoints;
        cpu.breakpoint_hit = None;
    }

    /// Serialize the state to bytes.
    pub fn to_bytes(&self) -> [u8; STATE_SIZE] {
        let mut bytes = [0u8; STATE_SIZE];
        let mut writer = Writer {
            data: &mut bytes,
            pos: 0,
        };

        // Header
        writer.put(&STATE_MAGIC);
        writer.put(&STATE_VERSION.to_le_bytes());

        // Registers
        writer.put(&[self.a, self.x, self.y, self.sp]);
        writer.put(&self.pc.to_le_bytes());
        writer.put(&[self.opcode]);
        writer.put(&self.operand.to_le_bytes());
        writer.put(&[self.status]);

        // Latches
        writer.put(&[
            self.nmi_pending as u8,
            self.irq_line as u8,
            self.waiting as u8,
            self.stopped as u8,
        ]);

        writer.put(&self.cycles.to_le_bytes());

        // Breakpoints, unused slots stay zero
        writer.put(&[self.breakpoints.len() as u8]);
        for addr in self.breakpoints.iter() {
            writer.put(&addr.to_le_bytes());
        }

        bytes
    }

    /// Deserialize a state from bytes.
    ///
    /// Accepts exactly the blobs [`CpuState::to_bytes`] produces: the length,
    /// magic, version and breakpoint count are checked, and so is every field
    /// that has only some valid values.
    pub fn from_bytes(data: &[u8]) -> Result<Self, StateError> {
        if data.len() != STATE_SIZE {
            return Err(StateError::Length {
                expected: STATE_SIZE,
                actual: data.len(),
            });
        }

        let mut reader = Reader { data, pos: 0 };

        let magic = reader.take::<4>();
        if magic != STATE_MAGIC {
            return Err(StateError::Magic(magic));
        }

        let version = reader.u32();
        if version != STATE_VERSION {
            return Err(StateError::Version(version));
        }

        let a = reader.u8();
        let x = reader.u8();
        let y = reader.u8();
        let sp = reader.u8();
        let pc = reader.u16();
        let opcode = reader.u8();
        let operand = reader.u16();

        let status_offset = reader.pos;
        let status = reader.u8();
        if StatusFlags::from_bits_retain(status).intersection(StatusFlags::PHANTOM) != StatusFlags::U {
            return Err(StateError::Malformed {
                offset: status_offset,
            });
        }

        let nmi_pending = reader.bool()?;
        let irq_line = reader.bool()?;
        let waiting = reader.bool()?;
        let stopped = reader.bool()?;

        let cycles = reader.u64();

        let count = reader.u8();
        if count as usize > MAX_BREAKPOINTS {
            return Err(StateError::Breakpoints(count));
        }
        let mut breakpoints = Breakpoints::new();
        for index in 0..MAX_BREAKPOINTS {
            let offset = reader.pos;
            let addr = reader.u16();
            let used = index < count as usize;
            if (used && breakpoints.contains(addr)) || (!used && addr != 0) {
                return Err(StateError::Malformed { offset });
            }
            if used {
                breakpoints
                    .insert(addr)
                    .map_err(|_| StateError::Breakpoints(count))?;
            }
        }

        Ok(Self {
            a,
            x,
            y,
            sp,
            pc,
            opcode,
            operand,
            status,
            nmi_pending,
            irq_line,
            waiting,
            stopped,
            cycles,
            breakpoints,
        })
    }
}

/// Cursor over the fixed-size output blob.
struct Writer<'a> {
    data: &'a mut [u8; STATE_SIZE],
    pos: usize,
}

impl Writer<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.data[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }
}

/// Cursor over a blob whose length has already been checked.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        bytes
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    /// A latch byte, which must be 0 or 1.
    fn bool(&mut self) -> Result<bool, StateError> {
        let offset = self.pos;
        match self.u8() {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(StateError::Malformed { offset }),
        }
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take())
    }
}

impl<M: MemoryBus> Cpu<M> {
    /// Writes the CPU state to `sink`.
    ///
    /// Errors from the sink are returned unchanged inside [`StateError::Io`].
    pub fn save_state<W: Write>(&self, sink: &mut W) -> Result<(), StateError> {
        let bytes = CpuState::capture(self).to_bytes();
        sink.write_all(&bytes)?;
        debug!("Saved CPU state at PC=0x{:04X}, cycle {}", self.pc, self.cycles);
        Ok(())
    }

    /// Reads a CPU state from `source` and applies it.
    ///
    /// Exactly [`STATE_SIZE`] bytes are consumed, so the CPU block can sit in
    /// a stream shared with other components. The blob is validated in full
    /// first; on any error the CPU is left exactly as it was.
    pub fn load_state<R: Read>(&mut self, source: &mut R) -> Result<(), StateError> {
        let mut data = Vec::with_capacity(STATE_SIZE);
        source.by_ref().take(STATE_SIZE as u64).read_to_end(&mut data)?;

        let state = CpuState::from_bytes(&data)?;
        state.restore(self);
        debug!("Loaded CPU state at PC=0x{:04X}, cycle {}", self.pc, self.cycles);
        Ok(())
    }
}
