//! Capability detection and caching.
//!
//! - Compile-time detection via `cfg!(target_feature = "...")` ([`caps_static`])
//! - Runtime probing: CPUID on x86_64, `std`'s detector on aarch64
//! - Caching: `OnceLock` with `std`, a single atomic word without
//!
//! Detection is a pure function of the CPU, so concurrent first callers all
//! compute and publish the same value.

mod compile_time;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "x86_64")]
mod x86;

pub use compile_time::caps_static;

use crate::caps::Caps;

/// Probe the CPU without consulting the cache.
///
/// The result always includes [`caps_static`]. Under Miri only the compile-time
/// set is reported, since CPUID cannot be interpreted.
#[must_use]
pub fn detect_uncached() -> Caps {
  caps_static().union(runtime())
}

#[cfg(all(target_arch = "x86_64", not(miri)))]
#[inline]
fn runtime() -> Caps {
  x86::runtime()
}

#[cfg(all(target_arch = "aarch64", not(miri)))]
#[inline]
fn runtime() -> Caps {
  aarch64::runtime()
}

#[cfg(any(miri, not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
#[inline]
fn runtime() -> Caps {
  Caps::NONE
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "std")]
mod cache {
  use std::sync::OnceLock;

  use super::Caps;

  static CAPS: OnceLock<Caps> = OnceLock::new();

  #[inline]
  pub fn get_or_init(f: fn() -> Caps) -> Caps {
    *CAPS.get_or_init(f)
  }
}

#[cfg(not(feature = "std"))]
mod cache {
  use core::sync::atomic::{AtomicU64, Ordering};

  use super::Caps;

  /// Set once the cached word holds a detection result. Feature bits stop at 34,
  /// so the top bit is free.
  const READY: u64 = 1 << 63;

  static CAPS: AtomicU64 = AtomicU64::new(0);

  #[inline]
  pub fn get_or_init(f: fn() -> Caps) -> Caps {
    let word = CAPS.load(Ordering::Acquire);
    if word & READY != 0 {
      return Caps(word & !READY);
    }
    let caps = f();
    CAPS.store(caps.0 | READY, Ordering::Release);
    caps
  }
}

/// Cached CPU capabilities.
///
/// The first call probes; later calls return the stored result.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  cache::get_or_init(|| {
    let caps = detect_uncached();
    tracing::trace!(%caps, "detected cpu capabilities");
    caps
  })
}
