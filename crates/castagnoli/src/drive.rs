//! Benchmark and diagnostic harness.
//!
//! [`drive`] checksums one pseudo-random buffer `count` times from scratch.
//! [`drive_streaming`] runs a single checksum across `count` passes over a
//! buffer whose first bytes change each pass. Both return the last CRC and
//! exist for timing and for pinning a regression value, not for correctness
//! beyond calling the API as a user would.
//!
//! The buffer generator is seeded, so results are reproducible everywhere:
//!
//! ```
//! assert_eq!(castagnoli::drive::drive(1, 1024), 0x1085_8FB0);
//! ```

use std::vec::Vec;

use backend::Crc32cFn;

use crate::crc32c::{Accumulator, accumulate, finalize, init};

/// Seed of the reference buffer.
pub const DEFAULT_SEED: u64 = 42;

/// Bytes per pass that [`drive_streaming`] rewrites.
const STREAMING_PREFIX: usize = 16;

/// xoroshiro128** seeded through splitmix64.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xoroshiro128StarStar {
  s0: u64,
  s1: u64,
}

impl Xoroshiro128StarStar {
  #[must_use]
  pub fn new(seed: u64) -> Self {
    let mut state = seed;
    let s0 = splitmix64(&mut state);
    let s1 = splitmix64(&mut state);
    // An all-zero state would only ever produce zeros.
    if s0 == 0 && s1 == 0 {
      return Self { s0: 1 << 63, s1: 1 };
    }
    Self { s0, s1 }
  }

  pub fn next_u64(&mut self) -> u64 {
    let s0 = self.s0;
    let sx = self.s1 ^ s0;
    let value = s0.wrapping_mul(5).rotate_left(7).wrapping_mul(9);
    self.s0 = s0.rotate_left(24) ^ sx ^ (sx << 16);
    self.s1 = sx.rotate_left(37);
    value
  }

  /// The upper half of [`next_u64`](Self::next_u64).
  pub fn next_u32(&mut self) -> u32 {
    (self.next_u64() >> 32) as u32
  }
}

fn splitmix64(state: &mut u64) -> u64 {
  *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
  let mut z = *state;
  z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  z ^ (z >> 31)
}

/// `len` bytes, each `next_u32() % 255`, so `0xFF` never occurs.
#[must_use]
pub fn fill_buffer(seed: u64, len: usize) -> Vec<u8> {
  let mut rng = Xoroshiro128StarStar::new(seed);
  (0..len).map(|_| (rng.next_u32() % 255) as u8).collect()
}

/// Adapt a raw kernel to the accumulator interface, bypassing dispatch.
pub fn with_kernel(kernel: Crc32cFn) -> impl Fn(Accumulator, &[u8]) -> Accumulator {
  move |acc: Accumulator, data: &[u8]| Accumulator::resume(kernel(finalize(acc) ^ 0xFFFF_FFFF, data) ^ 0xFFFF_FFFF)
}

/// Checksum the seeded `size`-byte buffer `count` times; return the last CRC.
///
/// `count == 0` runs nothing and returns the CRC of no data, `0`.
#[must_use]
pub fn drive(count: u64, size: usize) -> u32 {
  drive_with(count, size, accumulate)
}

/// [`drive`] with a caller-chosen accumulate step.
pub fn drive_with(count: u64, size: usize, step: impl Fn(Accumulator, &[u8]) -> Accumulator) -> u32 {
  let data = fill_buffer(DEFAULT_SEED, size);
  let mut crc = finalize(init());
  for _ in 0..count {
    crc = finalize(step(init(), &data));
  }
  crc
}

/// One checksum over `count` passes of a zeroed `size`-byte buffer.
///
/// Before each pass the first `min(16, size)` bytes are set to the low byte
/// of the passes still remaining after it (`count - 1` down to `0`).
#[must_use]
pub fn drive_streaming(count: u64, size: usize) -> u32 {
  drive_streaming_with(count, size, accumulate)
}

/// [`drive_streaming`] with a caller-chosen accumulate step.
pub fn drive_streaming_with(count: u64, size: usize, step: impl Fn(Accumulator, &[u8]) -> Accumulator) -> u32 {
  let mut data = std::vec![0u8; size];
  let prefix = size.min(STREAMING_PREFIX);
  let mut acc = init();
  for remaining in (0..count).rev() {
    if let Some(head) = data.get_mut(..prefix) {
      head.fill(remaining as u8);
    }
    acc = step(acc, &data);
  }
  finalize(acc)
}
