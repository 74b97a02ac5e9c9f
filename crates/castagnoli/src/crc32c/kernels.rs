//! CRC-32C kernel registry.
//!
//! Every kernel compiled for this target, as data. Dispatch walks
//! [`KERNELS`] best-first; the bitwise [`REFERENCE`] kernel sits outside the
//! table so it is never auto-selected but stays reachable for verification.
//!
//! # Kernel Tiers
//!
//! - Tier 0 (Reference): bitwise
//! - Tier 1 (Portable): slicing-by-8
//! - Tier 2 (HW CRC): SSE4.2 `crc32` (x86_64), ARMv8 CRC extension (aarch64)
//! - Tier 3 (Folding): PCLMULQDQ (x86_64)
//! - Tier 4 (Wide): VPCLMULQDQ (x86_64)

use backend::{Candidate, Crc32cFn, KernelTable, KernelTier};
use platform::Caps;

#[cfg(target_arch = "x86_64")]
use platform::caps::x86;

#[cfg(target_arch = "x86_64")]
use super::x86_64 as arch;
use super::portable;
use crate::bitwise;

/// Portable fallback kernel name.
pub const PORTABLE: &str = "portable/slicing-by-8";
/// Reference (bitwise) kernel name.
pub const REFERENCE_NAME: &str = "reference/bitwise";

/// Bitwise reference kernel. Never auto-selected.
pub static REFERENCE: Candidate<Crc32cFn> =
  Candidate::new(REFERENCE_NAME, KernelTier::Reference, Caps::NONE, bitwise::crc32c::compute);

#[cfg(target_arch = "x86_64")]
const ACCELERATED: &[Candidate<Crc32cFn>] = &[
  Candidate::new(
    "x86_64/vpclmul",
    KernelTier::Wide,
    x86::VPCLMUL_READY.union(x86::CRC32C_READY),
    arch::compute_vpclmul,
  ),
  Candidate::new(
    "x86_64/pclmul+sse4.2",
    KernelTier::Folding,
    x86::PCLMUL_READY.union(x86::CRC32C_READY),
    arch::compute_pclmul_sse42,
  ),
  Candidate::new("x86_64/pclmul", KernelTier::Folding, x86::PCLMUL_READY, arch::compute_pclmul),
  Candidate::new("x86_64/sse4.2", KernelTier::HwCrc, x86::CRC32C_READY, arch::compute_sse42),
];

#[cfg(target_arch = "aarch64")]
const ACCELERATED: &[Candidate<Crc32cFn>] = &[Candidate::new(
  "aarch64/crc",
  KernelTier::HwCrc,
  platform::caps::aarch64::CRC_READY,
  super::aarch64::compute_crc,
)];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const ACCELERATED: &[Candidate<Crc32cFn>] = &[];

/// Accelerated kernels for this target, best first, with the portable fallback.
pub static KERNELS: KernelTable<Crc32cFn> = KernelTable::new(
  ACCELERATED,
  Candidate::new(PORTABLE, KernelTier::Portable, Caps::NONE, portable::compute),
);

/// Every kernel compiled for this target, runnable here or not.
pub fn all() -> impl Iterator<Item = &'static Candidate<Crc32cFn>> {
  core::iter::once(&REFERENCE).chain(KERNELS.iter())
}

/// Every kernel this CPU can run, reference included.
pub fn available() -> impl Iterator<Item = &'static Candidate<Crc32cFn>> {
  let caps = platform::caps();
  all().filter(move |c| caps.has(c.requires))
}

/// Look up a kernel this CPU can run by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Candidate<Crc32cFn>> {
  available().find(|c| c.name == name)
}

/// Chooser for the runtime dispatch cell.
///
/// With no force in effect and compile-time features that already satisfy
/// the best kernel, the CPU is never probed.
#[cfg(feature = "runtime-dispatch")]
pub(crate) fn choose() -> &'static Candidate<Crc32cFn> {
  use super::config::{self, Crc32cConfig, Force};

  let requested = config::requested_force();
  if requested == Force::Auto
    && let Some(chosen) = backend::resolve_static(&KERNELS, platform::caps_static())
  {
    tracing::debug!(kernel = chosen.name, "compile-time features satisfy the best kernel; not probing");
    return chosen;
  }

  let caps = platform::caps();
  let config = Crc32cConfig::resolve(requested, caps);
  tracing::debug!(
    requested = %config.requested,
    effective = %config.effective,
    %caps,
    "probed CPU for CRC-32C kernels"
  );
  backend::select(caps, &KERNELS, config.effective.max_tier())
}
