//! Bit-level tools for working with raw digitized interconnect words

use bit_iter::BitIter;
use num_traits::{FromPrimitive, PrimInt, Unsigned};
use std::ops::{BitAndAssign, BitOrAssign};

/// Convert bit positions into a bitmask
pub fn bits_to_mask(bits: &[u8]) -> u16 {
    let mut m = 0;
    for b in bits {
        m |= 1 << b;
    }
    return m;
}

/// Returns all bit positions set in mask, lowest first
pub fn mask_to_bits(m: u16) -> Vec<u8> {
    BitIter::from(m).map(|b| b as u8).collect()
}

/// Bitwise set/clear/check operations and stimulus code extraction for raw words
pub trait BitOps:
    PrimInt
    + BitAndAssign
    + BitOrAssign
    + FromPrimitive
    + Unsigned
{
    fn set(&mut self, b: usize);
    fn clear(&mut self, b: usize);
    fn check(self, b: usize) -> bool;

    /// Stimulus code carried in bits 8-15 of the word
    #[inline]
    fn stim_code(self) -> u8 {
        (self >> 8).to_u64().map_or(0, |v| (v & 0xFF) as u8)
    }
}

impl BitOps for u16 {
    #[inline]
    fn set(&mut self, b: usize) {
        *self |= 1 << b;
    }

    #[inline]
    fn clear(&mut self, b: usize) {
        *self &= !(1 << b);
    }

    #[inline]
    fn check(self, b: usize) -> bool {
        return self >> b & 1 == 1;
    }
}

impl BitOps for u32 {
    #[inline]
    fn set(&mut self, b: usize) {
        *self |= 1 << b;
    }

    #[inline]
    fn clear(&mut self, b: usize) {
        *self &= !(1 << b);
    }

    #[inline]
    fn check(self, b: usize) -> bool {
        return self >> b & 1 == 1;
    }
}

/// Extract one bit of every word as a 0/1 signal, optionally inverted
pub fn bit_signal<W: BitOps>(words: &[W], b: u8, invert: bool) -> Vec<bool> {
    words.iter().map(|&w| w.check(b as usize) ^ invert).collect()
}

/// Indices of the first sample after each 0 -> 1 transition.
///
/// The first sample has no predecessor and is never a crossing.
pub fn rising_edges(signal: &[bool]) -> Vec<usize> {
    signal
        .windows(2)
        .enumerate()
        .filter(|(_, w)| !w[0] && w[1])
        .map(|(i, _)| i + 1)
        .collect()
}
