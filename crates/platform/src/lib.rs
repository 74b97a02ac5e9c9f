//! CPU capability detection for the castagnoli workspace.
//!
//! This crate is the single place where the running CPU is inspected.
//! Kernels declare requirements as [`Caps`] masks; dispatch compares them with
//! the result of [`caps()`].
//!
//! # Main Entry Points
//!
//! - [`caps_static()`]: features guaranteed by the compile-time target (`const`)
//! - [`caps()`]: runtime-detected features, cached after the first call
//! - [`detect_uncached()`]: a fresh probe, for diagnostics and tests
//!
//! ```
//! use platform::caps::x86;
//!
//! let caps = platform::caps();
//! if caps.has(x86::CRC32C_READY) {
//!   // SSE4.2 `crc32` is usable.
//! }
//! ```
//!
//! Runtime probing needs no OS support on x86_64. On aarch64 it requires the
//! `std` feature; without it the compile-time features are all that is known.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::Caps;
pub use detect::{caps, caps_static, detect_uncached};

/// Whether this build can probe the CPU at runtime.
///
/// `false` means [`caps()`] can never report more than [`caps_static()`].
#[must_use]
pub const fn can_probe() -> bool {
  cfg!(all(not(miri), any(target_arch = "x86_64", all(target_arch = "aarch64", feature = "std"))))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn without_probe_only_static_caps() {
    if !can_probe() {
      assert_eq!(caps(), caps_static());
    }
  }

  #[test]
  #[cfg(all(target_arch = "x86_64", not(miri)))]
  fn x86_64_always_probes() {
    assert!(can_probe());
  }
}
