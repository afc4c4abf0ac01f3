//! # Decimal Mode Arithmetic
//!
//! ADC and SBC switch to packed BCD when the D flag is set. This module holds
//! the lookup tables and the two decimal operations the ALU calls.
//!
//! ## Flag Convention
//!
//! Decimal flags follow the 65C02, not the NMOS 6502:
//!
//! - **C** is the decimal carry (ADC) or inverted decimal borrow (SBC)
//! - **N** and **Z** reflect the final, corrected result
//! - **V** on ADC comes from the signed sum of the high digits and the
//!   corrected low digit, before the high digit is corrected; on SBC it is the
//!   binary overflow of the same subtraction
//!
//! Inputs that are not valid BCD are accepted and produce the same bytes the
//! 65C02 produces, since both tables are defined for every nibble value.

/// Correction applied to the low digit sum of an addition.
///
/// Indexed by `(a & 0x0F) + (b & 0x0F) + carry` (0..=31). Sums of 10 or more
/// are folded back into a digit with the decimal carry in bit 4.
pub const ADD_LOW: [u8; 32] = build_add_low();

/// Correction subtracted from a binary difference.
///
/// Indexed by `high_borrow << 1 | low_borrow`.
pub const SUB_ADJUST: [u16; 4] = [0x00, 0x06, 0x60, 0x66];

const fn build_add_low() -> [u8; 32] {
    let mut table = [0u8; 32];
    let mut sum = 0;
    while sum < 32 {
        table[sum] = if sum >= 0x0A {
            (((sum + 0x06) & 0x0F) + 0x10) as u8
        } else {
            sum as u8
        };
        sum += 1;
    }
    table
}

/// Outcome of a decimal ADC or SBC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalResult {
    /// Corrected accumulator value.
    pub value: u8,
    /// Carry out (ADC) or no-borrow (SBC).
    pub carry: bool,
    /// Overflow flag.
    pub overflow: bool,
}

/// Decimal `a + b + carry`.
///
/// # Examples
///
/// ```
/// use lib65c02::bcd;
///
/// let result = bcd::add(0x58, 0x46, false);
/// assert_eq!(result.value, 0x04);
/// assert!(result.carry);
/// ```
pub fn add(a: u8, b: u8, carry: bool) -> DecimalResult {
    let low = ADD_LOW[((a & 0x0F) + (b & 0x0F) + carry as u8) as usize];

    let sum = (a & 0xF0) as u16 + (b & 0xF0) as u16 + low as u16;
    let signed = (a & 0xF0) as i8 as i16 + (b & 0xF0) as i8 as i16 + low as i16;
    let sum = if sum >= 0xA0 { sum + 0x60 } else { sum };

    DecimalResult {
        value: sum as u8,
        carry: sum > 0xFF,
        overflow: !(-128..=127).contains(&signed),
    }
}

/// Decimal `a - b - !carry`.
///
/// # Examples
///
/// ```
/// use lib65c02::bcd;
///
/// let result = bcd::subtract(0x40, 0x13, true);
/// assert_eq!(result.value, 0x27);
/// assert!(result.carry);
/// ```
pub fn subtract(a: u8, b: u8, carry: bool) -> DecimalResult {
    let borrow_in = !carry as i16;
    let low = (a & 0x0F) as i16 - (b & 0x0F) as i16 - borrow_in;
    let binary = a as i16 - b as i16 - borrow_in;

    let index = ((binary < 0) as usize) << 1 | (low < 0) as usize;
    let corrected = binary - SUB_ADJUST[index] as i16;

    let binary_value = binary as u8;
    DecimalResult {
        value: (corrected & 0xFF) as u8,
        carry: binary >= 0,
        overflow: ((a ^ b) & (a ^ binary_value) & 0x80) != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_low_table() {
        assert_eq!(ADD_LOW[0x09], 0x09);
        assert_eq!(ADD_LOW[0x0A], 0x10);
        assert_eq!(ADD_LOW[0x0E], 0x14);
        assert_eq!(ADD_LOW[0x1F], 0x15);
    }

    #[test]
    fn test_add_valid_digits() {
        for a in 0..100u8 {
            for b in 0..100u8 {
                for carry in [false, true] {
                    let result = add(to_bcd(a), to_bcd(b), carry);
                    let expected = a as u16 + b as u16 + carry as u16;
                    assert_eq!(result.value, to_bcd((expected % 100) as u8));
                    assert_eq!(result.carry, expected >= 100);
                }
            }
        }
    }

    #[test]
    fn test_subtract_valid_digits() {
        for a in 0..100u8 {
            for b in 0..100u8 {
                for carry in [false, true] {
                    let result = subtract(to_bcd(a), to_bcd(b), carry);
                    let expected = a as i16 - b as i16 - !carry as i16;
                    assert_eq!(result.value, to_bcd(expected.rem_euclid(100) as u8));
                    assert_eq!(result.carry, expected >= 0);
                }
            }
        }
    }

    #[test]
    fn test_add_overflow() {
        // 0x58 + 0x46: signed high digits 0x50 + 0x40 + 0x14 overflow
        assert!(add(0x58, 0x46, false).overflow);
        assert!(!add(0x15, 0x27, false).overflow);
    }

    fn to_bcd(value: u8) -> u8 {
        ((value / 10) << 4) | (value % 10)
    }
}
