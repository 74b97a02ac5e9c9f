//! Precomputed CRC-32C constants.
//!
//! Lookup tables and folding keys are computed at compile time from the
//! polynomial; nothing here is a hand-copied magic number.
//!
//! Lookup tables are 64-byte (cache line) aligned through [`Aligned64`] so a
//! table row never straddles two lines.

pub mod crc32c;
pub mod gf2;
pub mod tables;

/// Wrapper type to force 64-byte (cache line) alignment.
#[repr(align(64))]
pub struct Aligned64<T>(pub T);
