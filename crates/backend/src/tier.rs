//! Kernel acceleration tiers.
//!
//! Tiers represent levels of hardware acceleration, from the bitwise reference
//! up to wide SIMD folding. Higher tiers are faster and have stricter hardware
//! requirements.
//!
//! | Tier | Name | Throughput | Description |
//! |------|------|------------|-------------|
//! | 0 | Reference | ~200 MB/s | Bitwise, table-free; verification only |
//! | 1 | Portable | 1-3 GB/s | Slicing-by-8; the universal fallback |
//! | 2 | HwCrc | 8-12 GB/s | SSE4.2 `crc32`, ARMv8 CRC extension |
//! | 3 | Folding | 15-25 GB/s | PCLMULQDQ carryless multiply |
//! | 4 | Wide | 20-40 GB/s | VPCLMULQDQ on 512-bit registers |

use core::fmt;

/// Kernel acceleration tier.
///
/// Tiers implement `Ord` with higher tiers being greater, so a tier ceiling
/// is a plain comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum KernelTier {
  /// Bitwise reference implementation. Never auto-selected.
  #[default]
  Reference = 0,

  /// Table-based slicing-by-8. Always available.
  Portable = 1,

  /// Dedicated CRC instructions.
  ///
  /// - x86_64: SSE4.2 `crc32` (CRC-32C only, poly-locked)
  /// - aarch64: CRC extension
  HwCrc = 2,

  /// 128-bit carryless multiply folding (PCLMULQDQ).
  Folding = 3,

  /// 512-bit carryless multiply folding (VPCLMULQDQ + AVX-512).
  Wide = 4,
}

impl KernelTier {
  /// All tiers in ascending order.
  pub const ALL: [Self; 5] = [Self::Reference, Self::Portable, Self::HwCrc, Self::Folding, Self::Wide];

  #[inline]
  #[must_use]
  pub const fn as_u8(self) -> u8 {
    self as u8
  }

  /// `self <= ceiling`, usable in `const` contexts.
  #[inline]
  #[must_use]
  pub const fn within(self, ceiling: Self) -> bool {
    self.as_u8() <= ceiling.as_u8()
  }

  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Reference => "reference",
      Self::Portable => "portable",
      Self::HwCrc => "hwcrc",
      Self::Folding => "folding",
      Self::Wide => "wide",
    }
  }

  /// Whether kernels of this tier need a capability check before running.
  #[inline]
  #[must_use]
  pub const fn requires_detection(self) -> bool {
    matches!(self, Self::HwCrc | Self::Folding | Self::Wide)
  }
}

impl fmt::Display for KernelTier {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
