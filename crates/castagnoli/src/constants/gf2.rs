//! GF(2) polynomial arithmetic for CRC constant generation.
//!
//! Used at compile time to derive folding coefficients and the Barrett
//! reduction constant for carryless-multiply kernels.

/// Reflect (bit-reverse) the lower `width` bits of `value`.
///
/// For example, `reflect_bits(0b1010, 4)` returns `0b0101`.
#[inline]
pub const fn reflect_bits(value: u64, width: u32) -> u64 {
  let mut result = 0u64;
  let mut i = 0u32;
  while i < width {
    if (value >> i) & 1 != 0 {
      result |= 1 << (width - 1 - i);
    }
    i += 1;
  }
  result
}

/// `x^n mod P(x)` for a 32-bit CRC.
///
/// `poly_full` is the 33-bit polynomial with its explicit `x^32` term
/// (`0x1_1EDC_6F41` for CRC-32C).
#[inline]
pub const fn xpow_mod_32(n: u32, poly_full: u64) -> u32 {
  let mut r: u64 = 1;
  let mut i = 0u32;
  while i < n {
    r <<= 1;
    if r & (1 << 32) != 0 {
      r ^= poly_full;
    }
    i += 1;
  }
  r as u32
}

/// `floor(x^64 / P(x))` for a 32-bit CRC: the Barrett constant before reflection.
#[inline]
pub const fn barrett_quotient_32(poly_full: u64) -> u64 {
  // Work in 128 bits so x^64 itself is representable.
  let divisor = poly_full as u128;
  let mut rem: u128 = 1 << 64;
  let mut q: u64 = 0;
  let mut bit = 64u32;
  while bit >= 32 {
    if (rem >> bit) & 1 != 0 {
      rem ^= divisor << (bit - 32);
      q |= 1 << (bit - 32);
    }
    bit -= 1;
  }
  q
}

#[cfg(test)]
mod tests {
  use super::*;

  const POLY: u64 = 0x1_1EDC_6F41;

  #[test]
  fn reflect_small() {
    assert_eq!(reflect_bits(0b1010, 4), 0b0101);
    assert_eq!(reflect_bits(1, 32), 1 << 31);
    assert_eq!(reflect_bits(0x1EDC_6F41, 32), 0x82F6_3B78);
  }

  #[test]
  fn xpow_low_degrees_are_monomials() {
    assert_eq!(xpow_mod_32(0, POLY), 1);
    assert_eq!(xpow_mod_32(31, POLY), 1 << 31);
    // x^32 = P(x) - x^32.
    assert_eq!(xpow_mod_32(32, POLY), 0x1EDC_6F41);
  }

  #[test]
  fn barrett_quotient() {
    assert_eq!(barrett_quotient_32(POLY), 0x1_1F91_CAF6);
    assert_eq!(reflect_bits(barrett_quotient_32(POLY), 33), 0xDEA7_13F1);
  }
}
