//! Slicing-by-8 lookup table generation.
//!
//! Table 0 holds the CRC contribution of each byte value; table `t` holds the
//! contribution of a byte `t` positions earlier in the stream. Eight tables of
//! 256 `u32` entries come to 8 KiB.

// Every index is a loop counter below the array length or a masked byte.
#![allow(clippy::indexing_slicing)]

/// Base lookup table (table 0) for a reflected 32-bit polynomial.
pub const fn generate_table_0_32(poly: u32) -> [u32; 256] {
  let mut table = [0u32; 256];
  let mut i = 0usize;

  while i < 256 {
    let mut crc = i as u32;
    let mut j = 0;
    while j < 8 {
      if crc & 1 != 0 {
        crc = (crc >> 1) ^ poly;
      } else {
        crc >>= 1;
      }
      j += 1;
    }
    table[i] = crc;
    i += 1;
  }

  table
}

/// All 8 slicing-by-8 tables for a reflected 32-bit polynomial.
pub const fn generate_slicing_tables_32(poly: u32) -> [[u32; 256]; 8] {
  let mut tables = [[0u32; 256]; 8];
  tables[0] = generate_table_0_32(poly);

  let mut t = 1;
  while t < 8 {
    let mut i = 0;
    while i < 256 {
      let prev = tables[t - 1][i];
      tables[t][i] = (prev >> 8) ^ tables[0][(prev & 0xFF) as usize];
      i += 1;
    }
    t += 1;
  }

  tables
}
