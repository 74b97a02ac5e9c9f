//! Streaming and kernel-agreement invariants under arbitrary input.
//!
//! Splitting the input, resuming from a finalized CRC, feeding it in ragged
//! chunks and running any available kernel must all give the one-shot value.

#![no_main]

use arbitrary::Arbitrary;
use castagnoli::{Accumulator, Checksum, Crc32c, accumulate, finalize, init, kernels};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  split_point: usize,
  chunk: u8,
}

fuzz_target!(|input: Input| {
  let data = &input.data;
  let split = input.split_point % (data.len() + 1);

  // One-shot computation
  let oneshot = Crc32c::checksum(data);

  // Incremental computation
  let (a, b) = data.split_at(split);
  let mut hasher = Crc32c::new();
  hasher.update(a);
  hasher.update(b);
  assert_eq!(oneshot, hasher.finalize(), "incremental mismatch");

  // Arbitrary chunking through the accumulator API
  let mut acc = init();
  for part in data.chunks(usize::from(input.chunk) + 1) {
    acc = accumulate(acc, part);
  }
  assert_eq!(oneshot, finalize(acc), "chunked mismatch");
  assert_eq!(accumulate(acc, &[]), acc, "empty input changed the accumulator");

  // Resume computation
  let crc_a = Crc32c::checksum(a);
  let mut resumed = Crc32c::resume(crc_a);
  resumed.update(b);
  assert_eq!(oneshot, resumed.finalize(), "resume mismatch");
  assert_eq!(Accumulator::resume(oneshot), acc, "resume does not invert finalize");

  for kernel in kernels::available() {
    let crc = (kernel.func)(0xFFFF_FFFF, data) ^ 0xFFFF_FFFF;
    assert_eq!(oneshot, crc, "{} mismatch", kernel.name);
  }
});
