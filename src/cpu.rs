//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 65C02 processor state,
//! the bus adapter every memory access goes through, and the
//! fetch-resolve-dispatch loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): 8-bit offset into stack page (0x0100-0x01FF)
//! - **Status flags**: N, V, D, I, Z, C (individual bool fields; B only exists
//!   on the stack)
//! - **Latches**: last opcode, last operand, NMI edge, IRQ level, WAI and STP
//! - **Cycle counter**: u64 monotonically increasing cycle count
//!
//! ## Execution Model
//!
//! The CPU executes instructions via:
//! - `advance()`: Execute one instruction (or one idle cycle), then service a
//!   pending interrupt
//! - `run_for_cycles()`: Execute until cycle budget exhausted

use log::{debug, log_enabled, trace, warn, Level};

use crate::addressing::AddressingMode;
use crate::breakpoints::Breakpoints;
use crate::interrupts::BOOT_VECTOR;
use crate::opcodes::{validate_table, Operation};
use crate::registers::Registers;
use crate::status::StatusFlags;
use crate::{BreakpointError, ExecutionError, IllegalOpcodeAction, MemoryBus, OPCODE_TABLE};

/// Processor variant.
///
/// The Lynx uses a 65C02. The NMOS variant keeps the quirks the CMOS part
/// fixed, for software that was written against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// NMOS 6502 timing and quirks.
    ///
    /// - `JMP ($xxFF)` reads the pointer's high byte from `$xx00` (5 cycles)
    /// - Decimal ADC/SBC take no extra cycle
    /// - BRK and interrupts leave D unchanged
    /// - Shifts and rotates with `abs,X` always take the page penalty
    Nmos6502,

    /// WDC/Rockwell 65C02, as found in the Lynx.
    #[default]
    Cmos65C02,
}

/// CPU configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuConfig {
    /// Which processor to emulate.
    pub variant: Variant,
}

/// 65C02 CPU state and execution context.
///
/// The CPU struct contains all processor state including registers, flags,
/// interrupt latches, program counter, stack pointer and cycle counter. It is
/// generic over the system bus via the `MemoryBus` trait and owns the bus for
/// its lifetime; use [`Cpu::memory`] and [`Cpu::memory_mut`] to reach it.
///
/// # Type Parameters
///
/// * `M` - Memory bus implementation (must implement `MemoryBus` trait)
///
/// # Examples
///
/// ```
/// use lib65c02::{Cpu, FlatMemory, MemoryBus};
///
/// // Create memory and set the boot vector
/// let mut memory = FlatMemory::new();
/// memory.poke(0xFFFC, 0x00); // Low byte
/// memory.poke(0xFFFD, 0x80); // High byte (PC = 0x8000)
///
/// // Initialize CPU - loads PC from the boot vector
/// let cpu = Cpu::new(memory);
///
/// // Inspect initial state
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.sp(), 0xFF);
/// assert_eq!(cpu.flag_i(), true); // Interrupt disable set on reset
/// assert_eq!(cpu.cycles(), 0);
/// ```
pub struct Cpu<M: MemoryBus> {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Program counter (address of next instruction)
    pub(crate) pc: u16,

    /// Stack pointer (0x0100 + sp gives full stack address)
    pub(crate) sp: u8,

    /// Last fetched opcode
    pub(crate) opcode: u8,

    /// Last resolved operand address or branch target
    pub(crate) operand: u16,

    /// Negative flag (set if bit 7 of result is 1)
    pub(crate) flag_n: bool,

    /// Overflow flag (set on signed overflow)
    pub(crate) flag_v: bool,

    /// Decimal mode flag (enables BCD arithmetic)
    pub(crate) flag_d: bool,

    /// Interrupt disable flag (blocks IRQ when set)
    pub(crate) flag_i: bool,

    /// Zero flag (set if result is zero)
    pub(crate) flag_z: bool,

    /// Carry flag (set on unsigned overflow/underflow)
    pub(crate) flag_c: bool,

    /// NMI edge latch, cleared when serviced
    pub(crate) nmi_pending: bool,

    /// IRQ line level
    pub(crate) irq_line: bool,

    /// WAI executed, idling until an interrupt line is asserted
    pub(crate) waiting: bool,

    /// STP executed, only reset recovers
    pub(crate) stopped: bool,

    /// Total CPU cycles executed
    pub(crate) cycles: u64,

    pub(crate) config: CpuConfig,

    pub(crate) breakpoints: Breakpoints,

    /// Address of the breakpoint hit during the last `advance`
    pub(crate) breakpoint_hit: Option<u16>,

    /// Memory bus implementation
    pub(crate) memory: M,
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates a new 65C02 with the given memory bus and resets it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.poke(0xFFFC, 0x00);
    /// mem.poke(0xFFFD, 0x80);
    ///
    /// let cpu = Cpu::new(mem);
    /// assert_eq!(cpu.pc(), 0x8000);
    /// ```
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, CpuConfig::default())
    }

    /// Creates a CPU of the configured variant and resets it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{Cpu, CpuConfig, FlatMemory, Variant};
    ///
    /// let config = CpuConfig { variant: Variant::Nmos6502 };
    /// let cpu = Cpu::with_config(FlatMemory::new(), config);
    /// assert_eq!(cpu.config().variant, Variant::Nmos6502);
    /// ```
    pub fn with_config(memory: M, config: CpuConfig) -> Self {
        debug_assert!(validate_table().is_ok(), "opcode table failed validation");

        let mut cpu = Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            pc: 0x0000,
            sp: 0xFF,
            opcode: 0x00,
            operand: 0x0000,
            flag_n: false,
            flag_v: false,
            flag_d: false,
            flag_i: true,
            flag_z: false,
            flag_c: false,
            nmi_pending: false,
            irq_line: false,
            waiting: false,
            stopped: false,
            cycles: 0,
            config,
            breakpoints: Breakpoints::new(),
            breakpoint_hit: None,
            memory,
        };
        cpu.reset();
        cpu
    }

    /// Puts the CPU in its power-on state.
    ///
    /// - Program counter (PC) is loaded from the boot vector at 0xFFFC/0xFFFD
    /// - Stack pointer (SP) is set to 0xFF
    /// - Interrupt Disable is set, every other flag is cleared
    /// - A, X, Y and the opcode/operand latches are zeroed
    /// - Pending NMI, the IRQ line, WAI and STP are cleared
    ///
    /// Nothing is pushed. The cycle counter and breakpoints are kept.
    pub fn reset(&mut self) {
        self.a = 0x00;
        self.x = 0x00;
        self.y = 0x00;
        self.sp = 0xFF;
        self.opcode = 0x00;
        self.operand = 0x0000;
        self.set_status(StatusFlags::I.bits());
        self.nmi_pending = false;
        self.irq_line = false;
        self.waiting = false;
        self.stopped = false;
        self.breakpoint_hit = None;
        self.pc = self.read_word(BOOT_VECTOR);

        debug!("CPU reset, PC=0x{:04X}", self.pc);
    }

    /// Executes one instruction and services a pending interrupt.
    ///
    /// Performs:
    /// 1. Breakpoint check at the current PC
    /// 2. Opcode fetch and table lookup
    /// 3. Operand resolution
    /// 4. Dispatch, including flag updates
    /// 5. Interrupt check: a pending NMI, or an asserted IRQ with I clear, is
    ///    serviced before returning
    ///
    /// While the CPU is parked in WAI or STP no instruction is fetched and the
    /// call consumes a single cycle.
    ///
    /// # Returns
    ///
    /// - `Ok(cycles)`: cycles consumed, including any penalties and interrupt
    ///   service
    /// - `Err(ExecutionError::IllegalOpcode)` only when the bus asks undefined
    ///   opcodes to trap; PC is left on the opcode and no cycles are counted
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.poke(0xFFFC, 0x00);
    /// mem.poke(0xFFFD, 0x80);
    /// mem.poke(0x8000, 0xEA); // NOP
    ///
    /// let mut cpu = Cpu::new(mem);
    /// assert_eq!(cpu.advance(), Ok(2));
    /// assert_eq!(cpu.pc(), 0x8001);
    /// ```
    pub fn advance(&mut self) -> Result<u32, ExecutionError> {
        self.breakpoint_hit = None;

        let mut cycles = if self.stopped || self.waiting {
            1
        } else {
            self.execute()?
        };
        cycles += self.poll_interrupts();

        self.cycles = self.cycles.wrapping_add(cycles as u64);
        Ok(cycles)
    }

    fn execute(&mut self) -> Result<u32, ExecutionError> {
        let address = self.pc;
        if self.check_breakpoint() {
            self.breakpoint_hit = Some(address);
            debug!("Breakpoint hit at 0x{:04X}", address);
        }

        let opcode = self.fetch_byte();
        self.opcode = opcode;
        let metadata = OPCODE_TABLE[opcode as usize];

        if log_enabled!(Level::Trace) {
            trace!(
                "{:04X}  {:02X}  {:<4} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
                address,
                opcode,
                metadata.mnemonic(),
                self.a,
                self.x,
                self.y,
                self.status(),
                self.sp,
                self.cycles
            );
        }

        if metadata.operation == Operation::Illegal {
            match self.memory.illegal_opcode(opcode, address) {
                IllegalOpcodeAction::Nop => {
                    warn!("Illegal opcode 0x{:02X} at 0x{:04X}, executing as NOP", opcode, address);
                }
                IllegalOpcodeAction::Trap => {
                    warn!("Illegal opcode 0x{:02X} at 0x{:04X}, trapping", opcode, address);
                    self.pc = address;
                    return Err(ExecutionError::IllegalOpcode { opcode, address });
                }
                IllegalOpcodeAction::Halt => {
                    warn!("Illegal opcode 0x{:02X} at 0x{:04X}, halting", opcode, address);
                    self.stopped = true;
                    return Ok(metadata.base_cycles as u32);
                }
            }
        }

        let resolved = self.resolve(metadata.addressing_mode);
        let extra = self.dispatch(metadata.operation, resolved.operand, resolved.page_crossed);

        let page_penalty = match self.config.variant {
            Variant::Nmos6502
                if metadata.addressing_mode == AddressingMode::AbsoluteX
                    && matches!(
                        metadata.operation,
                        Operation::Asl | Operation::Lsr | Operation::Rol | Operation::Ror
                    ) =>
            {
                1
            }
            _ => (resolved.page_crossed && metadata.operation.pays_page_penalty()) as u32,
        };

        Ok(metadata.base_cycles as u32 + resolved.extra_cycles + page_penalty + extra)
    }

    /// Runs the CPU for a specified number of cycles.
    ///
    /// Executes instructions until the cycle budget is exhausted or an error occurs.
    /// Returns the actual number of cycles consumed (may be slightly more than budget
    /// due to instruction granularity). Any budget is accepted; the count is kept
    /// apart from [`Cpu::cycles`], so a counter near its limit does not matter.
    ///
    /// This is useful for frame-locked execution models where the CPU must run for
    /// an exact number of cycles per frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.poke(0xFFFC, 0x00);
    /// mem.poke(0xFFFD, 0x80);
    /// for addr in 0x8000..0x8010 {
    ///     mem.poke(addr, 0xEA); // NOP
    /// }
    ///
    /// let mut cpu = Cpu::new(mem);
    /// assert_eq!(cpu.run_for_cycles(10), Ok(10));
    /// assert_eq!(cpu.pc(), 0x8005);
    /// ```
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<u64, ExecutionError> {
        let mut consumed: u64 = 0;

        while consumed < cycle_budget {
            consumed = consumed.saturating_add(self.advance()? as u64);
        }

        Ok(consumed)
    }

    // ========== Bus Adapter ==========

    /// Reads a byte, from the fast RAM window when it covers `addr`.
    #[inline]
    pub(crate) fn read(&mut self, addr: u16) -> u8 {
        match self.memory.fast_ram().get(addr as usize) {
            Some(&value) => value,
            None => self.memory.peek(addr),
        }
    }

    /// Writes a byte, to the fast RAM window when it covers `addr`.
    #[inline]
    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match self.memory.fast_ram().get_mut(addr as usize) {
            Some(cell) => *cell = value,
            None => self.memory.poke(addr, value),
        }
    }

    /// Reads a little-endian word; the high byte address wraps at 0xFFFF.
    pub(crate) fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let value = self.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    pub(crate) fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    // ========== Stack ==========

    pub(crate) fn push(&mut self, value: u8) {
        self.write(0x0100 | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.read(0x0100 | self.sp as u16)
    }

    pub(crate) fn push_word(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push(value as u8);
    }

    pub(crate) fn pop_word(&mut self) -> u16 {
        let lo = self.pop() as u16;
        let hi = self.pop() as u16;
        (hi << 8) | lo
    }

    /// Pushes the status byte; B is set only when `force_break` is.
    pub(crate) fn push_status(&mut self, force_break: bool) {
        let mut status = StatusFlags::from_bits_retain(self.status());
        status.set(StatusFlags::B, force_break);
        self.push(status.bits());
    }

    /// Sets Z and N from a result byte.
    #[inline]
    pub(crate) fn set_nz(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = (value & 0x80) != 0;
    }

    // ========== Configuration and Bus Access ==========

    /// Returns the configuration the CPU was built with.
    pub fn config(&self) -> CpuConfig {
        self.config
    }

    /// Borrows the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutably borrows the memory bus.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut cpu = Cpu::new(FlatMemory::new());
    /// cpu.memory_mut().poke(0x1234, 0x42);
    /// assert_eq!(cpu.memory_mut().peek(0x1234), 0x42);
    /// ```
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Consumes the CPU and returns the memory bus.
    pub fn into_memory(self) -> M {
        self.memory
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value.
    ///
    /// Note: The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns the last fetched opcode.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Returns the last resolved operand: an address, a branch target, or 0
    /// for implied and accumulator instructions.
    pub fn operand(&self) -> u16 {
        self.operand
    }

    /// Returns the status register as a packed byte.
    ///
    /// Bit layout (NV1BDIZC). Bit 5 always reads as 1 and B always reads as
    /// 0; B only exists in copies pushed to the stack.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{Cpu, FlatMemory};
    ///
    /// let cpu = Cpu::new(FlatMemory::new());
    ///
    /// // I flag set (bit 2), bit 5 always 1
    /// assert_eq!(cpu.status(), 0b0010_0100);
    /// ```
    pub fn status(&self) -> u8 {
        let mut status = StatusFlags::U;
        status.set(StatusFlags::N, self.flag_n);
        status.set(StatusFlags::V, self.flag_v);
        status.set(StatusFlags::D, self.flag_d);
        status.set(StatusFlags::I, self.flag_i);
        status.set(StatusFlags::Z, self.flag_z);
        status.set(StatusFlags::C, self.flag_c);
        status.bits()
    }

    /// Returns the total number of CPU cycles executed since construction.
    ///
    /// The counter wraps at `u64::MAX`.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// True while the CPU is parked in WAI.
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// True once STP (or a halting illegal opcode) has stopped the CPU.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    // ========== Register Setters ==========

    /// Sets the accumulator.
    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    /// Sets the X index register.
    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    /// Sets the Y index register.
    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Sets the stack pointer.
    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Unpacks a status byte into the flags. Bits 4 (B) and 5 are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{Cpu, FlatMemory};
    ///
    /// let mut cpu = Cpu::new(FlatMemory::new());
    /// cpu.set_status(0xFF);
    /// assert_eq!(cpu.status(), 0xEF);
    /// ```
    pub fn set_status(&mut self, value: u8) {
        let status = StatusFlags::from_bits_retain(value).difference(StatusFlags::PHANTOM);
        self.flag_n = status.contains(StatusFlags::N);
        self.flag_v = status.contains(StatusFlags::V);
        self.flag_d = status.contains(StatusFlags::D);
        self.flag_i = status.contains(StatusFlags::I);
        self.flag_z = status.contains(StatusFlags::Z);
        self.flag_c = status.contains(StatusFlags::C);
    }

    /// Copies out every register and latch.
    pub fn registers(&self) -> Registers {
        Registers {
            status: self.status(),
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            opcode: self.opcode,
            operand: self.operand,
            pc: self.pc,
            nmi_pending: self.nmi_pending,
            irq_pending: self.irq_line,
            waiting: self.waiting,
        }
    }

    /// Replaces every register and latch.
    pub fn set_registers(&mut self, registers: &Registers) {
        self.set_status(registers.status);
        self.a = registers.a;
        self.x = registers.x;
        self.y = registers.y;
        self.sp = registers.sp;
        self.opcode = registers.opcode;
        self.operand = registers.operand;
        self.pc = registers.pc;
        self.nmi_pending = registers.nmi_pending;
        self.irq_line = registers.irq_pending;
        self.waiting = registers.waiting;
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.flag_n
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.flag_v
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.flag_d
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.flag_i
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    // ========== Status Flag Setters ==========

    /// Sets or clears the Negative flag.
    pub fn set_flag_n(&mut self, value: bool) {
        self.flag_n = value;
    }

    /// Sets or clears the Overflow flag.
    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }

    /// Sets or clears the Decimal mode flag.
    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }

    /// Sets or clears the Interrupt Disable flag.
    pub fn set_flag_i(&mut self, value: bool) {
        self.flag_i = value;
    }

    /// Sets or clears the Zero flag.
    pub fn set_flag_z(&mut self, value: bool) {
        self.flag_z = value;
    }

    /// Sets or clears the Carry flag.
    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }

    // ========== Breakpoints ==========

    /// Watches `addr`. The CPU records a hit when it fetches an opcode there.
    ///
    /// Fails when all [`MAX_BREAKPOINTS`](crate::MAX_BREAKPOINTS) slots are in
    /// use; setting an address twice is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use lib65c02::{Cpu, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.poke(0xFFFD, 0x02); // PC = 0x0200, NOPs follow
    /// mem.load(0x0200, &[0xEA, 0xEA]);
    ///
    /// let mut cpu = Cpu::new(mem);
    /// cpu.set_breakpoint(0x0201).unwrap();
    ///
    /// cpu.advance().unwrap();
    /// assert_eq!(cpu.breakpoint_hit(), None);
    /// assert!(cpu.check_breakpoint());
    ///
    /// cpu.advance().unwrap();
    /// assert_eq!(cpu.breakpoint_hit(), Some(0x0201));
    /// ```
    pub fn set_breakpoint(&mut self, addr: u16) -> Result<(), BreakpointError> {
        self.breakpoints.insert(addr)
    }

    /// Stops watching `addr`. Returns false if it was not watched.
    pub fn clear_breakpoint(&mut self, addr: u16) -> bool {
        self.breakpoints.remove(addr)
    }

    /// Stops watching every address.
    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    /// True if the current PC is watched.
    pub fn check_breakpoint(&self) -> bool {
        self.breakpoints.contains(self.pc)
    }

    /// The watched address fetched during the last `advance`, if any.
    pub fn breakpoint_hit(&self) -> Option<u16> {
        self.breakpoint_hit
    }

    /// The breakpoint table.
    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }
}
