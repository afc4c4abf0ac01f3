//! # Breakpoint Table
//!
//! A small fixed-capacity set of program counter values. The CPU checks the
//! table once per opcode fetch and records a hit; whether execution stops is
//! up to the caller.

use crate::BreakpointError;

/// Number of breakpoint slots.
pub const MAX_BREAKPOINTS: usize = 8;

/// Ordered set of watched program counter values.
///
/// # Examples
///
/// ```
/// use lib65c02::{Breakpoints, BreakpointError, MAX_BREAKPOINTS};
///
/// let mut breakpoints = Breakpoints::new();
/// for addr in 0..MAX_BREAKPOINTS as u16 {
///     breakpoints.insert(0x8000 + addr).unwrap();
/// }
///
/// assert_eq!(
///     breakpoints.insert(0x9000),
///     Err(BreakpointError::CapacityExceeded { capacity: MAX_BREAKPOINTS })
/// );
/// assert!(breakpoints.contains(0x8003));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Breakpoints {
    slots: [u16; MAX_BREAKPOINTS],
    len: usize,
}

impl Breakpoints {
    /// Creates an empty table.
    pub const fn new() -> Self {
        Self {
            slots: [0; MAX_BREAKPOINTS],
            len: 0,
        }
    }

    /// Adds `addr` to the table.
    ///
    /// Inserting an address that is already watched does nothing. Fails
    /// without changing the table when every slot is taken.
    pub fn insert(&mut self, addr: u16) -> Result<(), BreakpointError> {
        if self.contains(addr) {
            return Ok(());
        }
        if self.len == MAX_BREAKPOINTS {
            return Err(BreakpointError::CapacityExceeded {
                capacity: MAX_BREAKPOINTS,
            });
        }

        self.slots[self.len] = addr;
        self.len += 1;
        Ok(())
    }

    /// Removes `addr`, keeping the remaining entries in order.
    ///
    /// Returns false if it was not watched.
    pub fn remove(&mut self, addr: u16) -> bool {
        match self.as_slice().iter().position(|&slot| slot == addr) {
            Some(index) => {
                self.slots.copy_within(index + 1..self.len, index);
                self.len -= 1;
                self.slots[self.len] = 0;
                true
            }
            None => false,
        }
    }

    /// True if `addr` is watched.
    #[inline]
    pub fn contains(&self, addr: u16) -> bool {
        self.as_slice().contains(&addr)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Number of watched addresses.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Watched addresses in insertion order.
    pub fn as_slice(&self) -> &[u16] {
        &self.slots[..self.len]
    }

    /// Iterates over watched addresses in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.as_slice().iter().copied()
    }
}
