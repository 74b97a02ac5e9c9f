use crate::caps::Caps;

/// `(enabled at compile time, capability)` for every bit a kernel can require.
const TARGET_FEATURES: &[(bool, Caps)] = &[
  #[cfg(target_arch = "x86_64")]
  (cfg!(target_feature = "sse2"), crate::caps::x86::SSE2),
  #[cfg(target_arch = "x86_64")]
  (cfg!(target_feature = "ssse3"), crate::caps::x86::SSSE3),
  #[cfg(target_arch = "x86_64")]
  (cfg!(target_feature = "sse4.2"), crate::caps::x86::SSE42),
  #[cfg(target_arch = "x86_64")]
  (cfg!(target_feature = "pclmulqdq"), crate::caps::x86::PCLMULQDQ),
  #[cfg(target_arch = "x86_64")]
  (cfg!(target_feature = "avx512f"), crate::caps::x86::AVX512F),
  #[cfg(target_arch = "x86_64")]
  (cfg!(target_feature = "avx512vl"), crate::caps::x86::AVX512VL),
  #[cfg(target_arch = "x86_64")]
  (cfg!(target_feature = "avx512bw"), crate::caps::x86::AVX512BW),
  #[cfg(target_arch = "x86_64")]
  (cfg!(target_feature = "vpclmulqdq"), crate::caps::x86::VPCLMULQDQ),
  #[cfg(target_arch = "aarch64")]
  (cfg!(target_feature = "neon"), crate::caps::aarch64::NEON),
  #[cfg(target_arch = "aarch64")]
  (cfg!(target_feature = "crc"), crate::caps::aarch64::CRC),
  #[cfg(target_arch = "aarch64")]
  (cfg!(target_feature = "aes"), crate::caps::aarch64::PMULL),
];

/// Capabilities the build target guarantees.
///
/// Only `-C target-feature=...` and `-C target-cpu=...` contribute, so the
/// value is a constant and a kernel it satisfies needs no probe.
///
/// ```
/// const CAPS: platform::Caps = platform::caps_static();
///
/// #[cfg(target_arch = "x86_64")]
/// assert!(CAPS.has(platform::caps::x86::SSE2));
/// #[cfg(target_arch = "aarch64")]
/// assert!(CAPS.has(platform::caps::aarch64::NEON));
/// ```
#[inline(always)]
#[must_use]
pub const fn caps_static() -> Caps {
  let mut caps = Caps::NONE;
  let mut i = 0;
  while i < TARGET_FEATURES.len() {
    let (enabled, bit) = TARGET_FEATURES[i];
    if enabled {
      caps = caps.union(bit);
    }
    i += 1;
  }
  caps
}
