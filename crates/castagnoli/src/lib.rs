//! CRC-32C (Castagnoli) checksums with runtime CPU-adaptive dispatch.
//!
//! The polynomial is `0x1EDC6F41` (reflected `0x82F63B78`), as used by iSCSI,
//! SCTP, ext4 and Btrfs. Callers never pick an implementation: the first
//! checksum probes the CPU once and every later call goes straight to the
//! fastest kernel that runs on it. Every kernel produces identical output.
//!
//! # Kernels
//!
//! | Kernel | Requires | Tier |
//! |--------|----------|------|
//! | `x86_64/vpclmul` | AVX-512 VPCLMULQDQ + SSE4.2 | Wide |
//! | `x86_64/pclmul+sse4.2` | PCLMULQDQ + SSSE3 + SSE4.2 | Folding |
//! | `x86_64/pclmul` | PCLMULQDQ + SSSE3 | Folding |
//! | `x86_64/sse4.2` | SSE4.2 | HwCrc |
//! | `aarch64/crc` | ARMv8 CRC | HwCrc |
//! | `portable/slicing-by-8` | nothing | Portable |
//!
//! # Example
//!
//! ```rust
//! use castagnoli::{accumulate, finalize, init};
//!
//! let acc = accumulate(init(), b"1234");
//! let acc = accumulate(acc, b"56789");
//! assert_eq!(finalize(acc), 0xE306_9283);
//!
//! // Streaming through the `Checksum` trait.
//! use castagnoli::{Checksum, Crc32c};
//!
//! let mut hasher = Crc32c::new();
//! hasher.update(b"123456789");
//! assert_eq!(hasher.finalize(), 0xE306_9283);
//! ```
//!
//! # Features
//!
//! - `std` (default): runtime probing on aarch64, the `CASTAGNOLI_FORCE`
//!   override and `std::io::Write` for [`Crc32c`].
//! - `runtime-dispatch` (default): probe the CPU on first use. Disable it to
//!   select among compile-time enabled kernels only (`-C target-cpu=native`).
//! - `cli`: the `drive-crc32c` diagnostic binary.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

// Hardware CRC exists on this target but nothing can detect it: no `std` to
// ask the OS, and the build does not enable it statically.
#[cfg(all(
  feature = "runtime-dispatch",
  target_arch = "aarch64",
  not(feature = "std"),
  not(target_feature = "crc")
))]
compile_error!(
  "castagnoli: `runtime-dispatch` on aarch64 needs the `std` feature to probe for CRC instructions. \
   Enable `std`, build with `-C target-feature=+crc`, or disable `runtime-dispatch`."
);

mod bitwise;
mod constants;
pub mod crc32c;
#[cfg(feature = "std")]
pub mod drive;
mod simd;

pub use backend::{CellState, KernelTier};
pub use crc32c::{
  Accumulator, Crc32c, accumulate, checksum, config, dispatch_state, equals, finalize, init, kernels, selected_backend,
};
pub use traits::{Checksum, ChecksumMismatch};
