//! Bit-at-a-time CRC-32C over the reflected Castagnoli polynomial.

use crate::constants::crc32c::POLYNOMIAL;

/// Run the register over `data` one bit at a time.
///
/// `crc` is the raw register: no pre- or post-inversion happens here.
#[must_use]
pub fn compute(crc: u32, data: &[u8]) -> u32 {
  data.iter().fold(crc, |crc, &byte| compute_byte(crc, byte))
}

/// Shift one byte through the register. Usable in `const` context.
#[inline]
#[must_use]
pub const fn compute_byte(crc: u32, byte: u8) -> u32 {
  let mut reg = crc ^ byte as u32;
  let mut remaining = 8;
  while remaining > 0 {
    // All ones when the low bit is set.
    let take = 0u32.wrapping_sub(reg & 1);
    reg = (reg >> 1) ^ (POLYNOMIAL & take);
    remaining -= 1;
  }
  reg
}
