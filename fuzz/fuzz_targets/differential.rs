//! Differential fuzzing against the `crc32c` crate.

#![no_main]

use castagnoli::{Checksum, Crc32c};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let ours = castagnoli::checksum(data);
  let reference = crc32c::crc32c(data);

  assert_eq!(
    ours,
    reference,
    "CRC-32C differential mismatch: ours={ours:#010x}, reference={reference:#010x}, len={}",
    data.len()
  );

  // Self-consistency check: streaming should match one-shot
  let mut hasher = Crc32c::new();
  hasher.update(data);
  assert_eq!(hasher.finalize(), ours, "CRC-32C self-consistency mismatch");
});
