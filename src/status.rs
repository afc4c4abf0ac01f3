//! # Processor Status Byte
//!
//! Bit positions of the packed status register (NV-BDIZC).
//!
//! The CPU keeps each flag in its own field and only builds the packed byte
//! when something asks for it (PHP, interrupts, inspection, save-states).
//! Bit 5 has no storage and always reads as 1. The Break bit has no storage
//! either: it only exists in status bytes pushed to the stack.

use bitflags::bitflags;

bitflags! {
    /// Status register bit layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// Negative: bit 7 of the last result.
        const N = 0b1000_0000;
        /// Overflow: signed overflow on ADC/SBC, bit 6 of the operand on BIT.
        const V = 0b0100_0000;
        /// Unused, always reads as 1.
        const U = 0b0010_0000;
        /// Break, only present in pushed status bytes.
        const B = 0b0001_0000;
        /// Decimal mode for ADC/SBC.
        const D = 0b0000_1000;
        /// Interrupt disable, masks IRQ.
        const I = 0b0000_0100;
        /// Zero: the last result was zero.
        const Z = 0b0000_0010;
        /// Carry out of bit 7, or inverted borrow.
        const C = 0b0000_0001;
    }
}

impl StatusFlags {
    /// Bits that have no backing storage in the CPU.
    pub const PHANTOM: StatusFlags = StatusFlags::U.union(StatusFlags::B);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_positions() {
        assert_eq!(StatusFlags::all().bits(), 0xFF);
        assert_eq!(StatusFlags::PHANTOM.bits(), 0x30);
        assert_eq!((StatusFlags::N | StatusFlags::C).bits(), 0x81);
    }
}
