//! CRC-32C runtime configuration.
//!
//! One knob: `CASTAGNOLI_FORCE` caps the kernel tier dispatch may pick. It is
//! read once, on first use. Forced modes are always clamped to detected CPU
//! capabilities, so a force can make dispatch slower but never unsafe.
//!
//! | Value | Aliases | Ceiling |
//! |-------|---------|---------|
//! | `auto` | | widest available |
//! | `portable` | `scalar`, `table`, `sb8` | slicing-by-8 |
//! | `hwcrc` | `crc`, `sse42`, `sse4.2`, `armv8` | hardware `crc32` |
//! | `fold` | `pclmul`, `clmul`, `folding` | 128-bit folding |
//! | `wide` | `vpclmul`, `avx512` | 512-bit folding |

use core::{fmt, str::FromStr};

use backend::KernelTier;
use platform::{
  Caps,
  caps::{aarch64, x86},
};

/// Environment variable holding the [`Force`] override.
pub const FORCE_ENV: &str = "CASTAGNOLI_FORCE";

/// Forced backend selection for CRC-32C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub enum Force {
  /// Use the default auto selector.
  #[default]
  Auto,
  /// Force the portable table-based implementation.
  Portable,
  /// At most hardware CRC instructions.
  ///
  /// - x86_64: SSE4.2 `crc32`
  /// - aarch64: ARMv8 CRC extension
  HwCrc,
  /// At most 128-bit carryless-multiply folding.
  Fold,
  /// At most 512-bit carryless-multiply folding.
  Wide,
}

impl Force {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
      Self::HwCrc => "hwcrc",
      Self::Fold => "fold",
      Self::Wide => "wide",
    }
  }

  /// The tier ceiling handed to selection.
  #[must_use]
  pub const fn max_tier(self) -> KernelTier {
    match self {
      Self::Auto | Self::Wide => KernelTier::Wide,
      Self::Portable => KernelTier::Portable,
      Self::HwCrc => KernelTier::HwCrc,
      Self::Fold => KernelTier::Folding,
    }
  }

  /// Whether `caps` can run a kernel of exactly this tier.
  #[must_use]
  pub const fn supported(self, caps: Caps) -> bool {
    match self {
      Self::Auto | Self::Portable => true,
      Self::HwCrc => caps.has(x86::CRC32C_READY) || caps.has(aarch64::CRC_READY),
      Self::Fold => caps.has(x86::PCLMUL_READY),
      Self::Wide => caps.has(x86::VPCLMUL_READY),
    }
  }

  /// Step down to the highest tier at or below `self` that `caps` can run.
  #[must_use]
  pub const fn clamp(self, caps: Caps) -> Self {
    let mut force = self;
    while !force.supported(caps) {
      force = match force {
        Self::Wide => Self::Fold,
        Self::Fold => Self::HwCrc,
        Self::HwCrc | Self::Portable | Self::Auto => Self::Portable,
      };
    }
    force
  }
}

impl fmt::Display for Force {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Error returned when a [`Force`] value cannot be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseForceError {
  #[error("empty kernel force")]
  Empty,
  #[error("unknown kernel force (expected auto, portable, hwcrc, fold or wide)")]
  Unknown,
}

impl FromStr for Force {
  type Err = ParseForceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    const NAMES: &[(&str, Force)] = &[
      ("auto", Force::Auto),
      ("portable", Force::Portable),
      ("scalar", Force::Portable),
      ("table", Force::Portable),
      ("sb8", Force::Portable),
      ("hwcrc", Force::HwCrc),
      ("crc", Force::HwCrc),
      ("sse42", Force::HwCrc),
      ("sse4.2", Force::HwCrc),
      ("armv8", Force::HwCrc),
      ("fold", Force::Fold),
      ("pclmul", Force::Fold),
      ("clmul", Force::Fold),
      ("folding", Force::Fold),
      ("wide", Force::Wide),
      ("vpclmul", Force::Wide),
      ("avx512", Force::Wide),
    ];

    let s = s.trim();
    if s.is_empty() {
      return Err(ParseForceError::Empty);
    }
    NAMES
      .iter()
      .find(|(name, _)| s.eq_ignore_ascii_case(name))
      .map(|&(_, force)| force)
      .ok_or(ParseForceError::Unknown)
  }
}

/// Full CRC-32C runtime configuration (after applying overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Crc32cConfig {
  /// Requested force mode (env).
  pub requested: Force,
  /// Force mode clamped to detected CPU capabilities.
  pub effective: Force,
}

impl Crc32cConfig {
  /// Clamp `requested` against `caps`.
  #[must_use]
  pub const fn resolve(requested: Force, caps: Caps) -> Self {
    Self { requested, effective: requested.clamp(caps) }
  }
}

#[cfg(feature = "std")]
fn read_env_force() -> Force {
  let Ok(raw) = std::env::var(FORCE_ENV) else {
    return Force::Auto;
  };
  match raw.parse() {
    Ok(force) => force,
    Err(ParseForceError::Empty) => Force::Auto,
    Err(error) => {
      tracing::warn!(value = %raw, %error, "ignoring {FORCE_ENV}");
      Force::Auto
    }
  }
}

#[cfg(feature = "std")]
pub(crate) fn requested_force() -> Force {
  use std::sync::OnceLock;
  static FORCE: OnceLock<Force> = OnceLock::new();
  *FORCE.get_or_init(read_env_force)
}

#[cfg(not(feature = "std"))]
pub(crate) fn requested_force() -> Force {
  Force::Auto
}

/// Get the effective CRC-32C configuration for the current platform.
#[inline]
#[must_use]
pub fn get() -> Crc32cConfig {
  Crc32cConfig::resolve(requested_force(), platform::caps())
}
