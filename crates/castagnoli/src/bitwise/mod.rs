//! Table-less CRC-32C using branchless bitwise reduction.
//!
//! For each bit a mask is built with `0u32.wrapping_sub(crc & 1)`, which is
//! all ones when the low bit is set, and the polynomial is XORed in through
//! it. There are no tables and no branches, so this is the slowest kernel and
//! the easiest to trust. It backs the `reference/bitwise` candidate, which the
//! test suites compare every other kernel against.

pub mod crc32c;
