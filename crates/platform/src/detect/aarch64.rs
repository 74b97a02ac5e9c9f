//! aarch64 runtime detection.
//!
//! Feature registers are not readable from EL0 on every OS, so the probe goes
//! through `std`'s detector. Without `std` only compile-time features are known.

use crate::caps::{Caps, aarch64};

#[cfg(feature = "std")]
pub(crate) fn runtime() -> Caps {
  let mut caps = aarch64::NEON;
  if std::arch::is_aarch64_feature_detected!("crc") {
    caps |= aarch64::CRC;
  }
  if std::arch::is_aarch64_feature_detected!("pmull") {
    caps |= aarch64::PMULL;
  }
  caps
}

#[cfg(not(feature = "std"))]
pub(crate) const fn runtime() -> Caps {
  aarch64::NEON
}
