//! CPU capability bitset.
//!
//! [`Caps`] records which instruction families the running CPU (or the build's
//! compile-time target) supports. Kernels declare their requirements as a
//! `Caps` mask and dispatch checks them with [`Caps::has`].
//!
//! Bits are grouped by architecture: x86_64 features occupy bits 0-31 and
//! aarch64 features bits 32-63. Sets from different architectures never mix on
//! a real machine, but the layout keeps every constant available on every host
//! so selection policies can be tested anywhere.

use core::fmt;

/// CPU capabilities: a 64-bit feature bitset.
///
/// # Example
///
/// ```
/// use platform::caps::{Caps, x86};
///
/// let caps = x86::SSE42 | x86::PCLMULQDQ;
/// assert!(caps.has(x86::SSE42));
/// assert!(!caps.has(x86::VPCLMUL_READY));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u64);

impl Caps {
  /// Empty capability set.
  pub const NONE: Self = Self(0);

  /// A capability set from a raw mask, for property tests.
  #[cfg(test)]
  const fn from_raw(bits: u64) -> Self {
    Self(bits)
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0 & required.0) == required.0
  }

  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  /// Features in `self` that are not in `other`.
  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self(self.0 & !other.0)
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// A capability set with a single bit set.
  ///
  /// # Panics
  ///
  /// Panics (at compile time when used in a constant) if `bit >= 64`.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    assert!(bit < 64, "capability bit out of range");
    Self(1u64 << bit)
  }

  /// Iterate over the names of the features present in this set.
  pub fn names(self) -> impl Iterator<Item = &'static str> {
    NAMES.iter().filter(move |(caps, _)| self.has(*caps)).map(|(_, name)| *name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    self.0 |= rhs.0;
  }
}

impl fmt::Debug for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.names()).finish()
  }
}

impl fmt::Display for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      return f.write_str("none");
    }
    for (i, name) in self.names().enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      f.write_str(name)?;
    }
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86 / x86_64
// ─────────────────────────────────────────────────────────────────────────────

/// x86_64 feature bits.
pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const SSSE3: Caps = Caps::bit(1);
  pub const SSE42: Caps = Caps::bit(2);
  pub const PCLMULQDQ: Caps = Caps::bit(3);
  pub const AVX512F: Caps = Caps::bit(4);
  pub const AVX512VL: Caps = Caps::bit(5);
  pub const AVX512BW: Caps = Caps::bit(6);
  pub const VPCLMULQDQ: Caps = Caps::bit(7);

  /// SSE4.2 `crc32` instruction (CRC-32C polynomial only).
  pub const CRC32C_READY: Caps = SSE42;

  /// 128-bit carryless multiply folding.
  pub const PCLMUL_READY: Caps = PCLMULQDQ.union(SSSE3);

  /// 512-bit carryless multiply folding.
  ///
  /// AVX-512 bits are only ever reported when the OS saves ZMM state.
  pub const VPCLMUL_READY: Caps = VPCLMULQDQ.union(AVX512F).union(AVX512VL).union(AVX512BW).union(PCLMUL_READY);

  /// Every AVX-512 related bit.
  pub const AVX512_ALL: Caps = AVX512F.union(AVX512VL).union(AVX512BW).union(VPCLMULQDQ);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 feature bits.
pub mod aarch64 {
  use super::Caps;

  /// Baseline on AArch64.
  pub const NEON: Caps = Caps::bit(32);
  /// ARMv8 CRC32 extension (`crc32c*` instructions).
  pub const CRC: Caps = Caps::bit(33);
  pub const PMULL: Caps = Caps::bit(34);

  pub const CRC_READY: Caps = CRC;
}

const NAMES: &[(Caps, &str)] = &[
  (x86::SSE2, "sse2"),
  (x86::SSSE3, "ssse3"),
  (x86::SSE42, "sse4.2"),
  (x86::PCLMULQDQ, "pclmulqdq"),
  (x86::AVX512F, "avx512f"),
  (x86::AVX512VL, "avx512vl"),
  (x86::AVX512BW, "avx512bw"),
  (x86::VPCLMULQDQ, "vpclmulqdq"),
  (aarch64::NEON, "neon"),
  (aarch64::CRC, "crc"),
  (aarch64::PMULL, "pmull"),
];

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, string::ToString, vec::Vec};

  use proptest::prelude::*;

  use super::*;

  #[test]
  fn none_has_nothing_but_none() {
    assert!(Caps::NONE.has(Caps::NONE));
    assert!(!Caps::NONE.has(x86::SSE42));
    assert!(Caps::NONE.is_empty());
  }

  #[test]
  fn composite_masks() {
    assert!(x86::VPCLMUL_READY.has(x86::PCLMUL_READY));
    assert!(!x86::PCLMUL_READY.has(x86::VPCLMUL_READY));
    assert_eq!(x86::PCLMUL_READY.count(), 2);
    assert_eq!(x86::VPCLMUL_READY.count(), 6);
  }

  #[test]
  fn bits_are_distinct() {
    let all: Vec<Caps> = NAMES.iter().map(|(c, _)| *c).collect();
    for (i, a) in all.iter().enumerate() {
      assert_eq!(a.count(), 1);
      for b in &all[i + 1..] {
        assert!(a.intersection(*b).is_empty());
      }
    }
  }

  #[test]
  fn difference_clears_bits() {
    let caps = x86::VPCLMUL_READY | x86::SSE42;
    let cleared = caps.difference(x86::AVX512_ALL);
    assert!(cleared.has(x86::PCLMUL_READY));
    assert!(cleared.has(x86::SSE42));
    assert!(!cleared.has(x86::AVX512F));
  }

  #[test]
  fn debug_and_display_list_names() {
    let caps = x86::SSE42 | x86::PCLMULQDQ;
    assert_eq!(format!("{caps:?}"), "{\"sse4.2\", \"pclmulqdq\"}");
    assert_eq!(caps.to_string(), "sse4.2 pclmulqdq");
    assert_eq!(Caps::NONE.to_string(), "none");
  }

  proptest! {
    #[test]
    fn union_is_superset(a in any::<u64>(), b in any::<u64>()) {
      let (a, b) = (Caps::from_raw(a), Caps::from_raw(b));
      prop_assert!(a.union(b).has(a));
      prop_assert!(a.union(b).has(b));
    }

    #[test]
    fn has_matches_intersection(a in any::<u64>(), b in any::<u64>()) {
      let (a, b) = (Caps::from_raw(a), Caps::from_raw(b));
      prop_assert_eq!(a.has(b), a.intersection(b) == b);
    }
  }
}
