//! Portable CRC-32C using slicing-by-8.
//!
//! Each 8-byte chunk is XORed with the register and resolved through eight
//! table lookups that do not depend on each other, which hides most of the
//! load latency. Table `t` gives the contribution of a byte sitting `t`
//! positions before the end of the chunk, so the first byte of the chunk
//! indexes table 7. Trailing bytes use table 0, one at a time.

// Table indices are masked to a byte; the tables have 256 entries.
#![allow(clippy::indexing_slicing)]

use crate::constants::crc32c::TABLES;

/// Slicing-by-8 over `data`.
///
/// `crc` is the raw register; the caller owns pre- and post-inversion.
#[inline]
#[must_use]
pub fn compute(mut crc: u32, data: &[u8]) -> u32 {
  let tables = &TABLES.0;
  let (chunks, tail) = data.as_chunks::<8>();

  for chunk in chunks {
    let d = u64::from_le_bytes(*chunk);
    let lo = crc ^ d as u32;
    let hi = (d >> 32) as u32;

    crc = tables[7][(lo & 0xFF) as usize]
      ^ tables[6][((lo >> 8) & 0xFF) as usize]
      ^ tables[5][((lo >> 16) & 0xFF) as usize]
      ^ tables[4][(lo >> 24) as usize]
      ^ tables[3][(hi & 0xFF) as usize]
      ^ tables[2][((hi >> 8) & 0xFF) as usize]
      ^ tables[1][((hi >> 16) & 0xFF) as usize]
      ^ tables[0][(hi >> 24) as usize];
  }

  for &byte in tail {
    crc = compute_byte(crc, byte);
  }

  crc
}

/// One byte through table 0.
#[inline]
#[must_use]
pub fn compute_byte(crc: u32, byte: u8) -> u32 {
  (crc >> 8) ^ TABLES.0[0][((crc as u8) ^ byte) as usize]
}
