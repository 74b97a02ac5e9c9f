//! x86_64 runtime detection via CPUID.
//!
//! CPUID and XGETBV live in `core::arch`, so this probe works without `std`.

#![allow(unsafe_code)]

use core::arch::x86_64::{__cpuid, __cpuid_count, _xgetbv};

use crate::caps::{Caps, x86};

// XCR0 bits 1-2: XMM + YMM state.
const XCR0_AVX_MASK: u64 = 0x6;
// XCR0 bits 5-7: opmask + ZMM_Hi256 + Hi16_ZMM state.
const XCR0_AVX512_MASK: u64 = 0xE0;

/// Raw register values the feature decoder reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CpuidWords {
  pub leaf1_ecx: u32,
  pub leaf7_ebx: u32,
  pub leaf7_ecx: u32,
  pub xcr0: u64,
}

/// Issue the CPUID/XGETBV queries.
pub(crate) fn read_cpuid() -> CpuidWords {
  // SAFETY: CPUID is available on every x86_64 processor. Newer toolchains
  // mark it safe, hence the `unused_unsafe` allowance.
  #[allow(unused_unsafe)]
  let max_leaf = unsafe { __cpuid(0) }.eax;
  // SAFETY: as above.
  #[allow(unused_unsafe)]
  let leaf1 = unsafe { __cpuid(1) };

  let (leaf7_ebx, leaf7_ecx) = if max_leaf >= 7 {
    // SAFETY: leaf 7 is in range.
    #[allow(unused_unsafe)]
    let leaf7 = unsafe { __cpuid_count(7, 0) };
    (leaf7.ebx, leaf7.ecx)
  } else {
    (0, 0)
  };

  let osxsave = leaf1.ecx & (1 << 27) != 0;
  let xcr0 = if osxsave {
    // SAFETY: OSXSAVE set means the OS enabled XGETBV.
    unsafe { _xgetbv(0) }
  } else {
    0
  };

  CpuidWords { leaf1_ecx: leaf1.ecx, leaf7_ebx, leaf7_ecx, xcr0 }
}

/// Decode CPUID words into capabilities.
///
/// AVX-512 bits are reported only when the OS saves the extended register
/// state; CPUID alone says what the silicon has, not what is usable.
#[must_use]
pub(crate) const fn decode(words: CpuidWords) -> Caps {
  let mut caps = x86::SSE2;

  if words.leaf1_ecx & (1 << 9) != 0 {
    caps = caps.union(x86::SSSE3);
  }
  if words.leaf1_ecx & (1 << 20) != 0 {
    caps = caps.union(x86::SSE42);
  }
  if words.leaf1_ecx & (1 << 1) != 0 {
    caps = caps.union(x86::PCLMULQDQ);
  }

  let osxsave = words.leaf1_ecx & (1 << 27) != 0;
  let os_avx = osxsave && (words.xcr0 & XCR0_AVX_MASK) == XCR0_AVX_MASK;
  let os_avx512 = os_avx && (words.xcr0 & XCR0_AVX512_MASK) == XCR0_AVX512_MASK;

  if os_avx512 {
    if words.leaf7_ebx & (1 << 16) != 0 {
      caps = caps.union(x86::AVX512F);
    }
    if words.leaf7_ebx & (1 << 30) != 0 {
      caps = caps.union(x86::AVX512BW);
    }
    if words.leaf7_ebx & (1 << 31) != 0 {
      caps = caps.union(x86::AVX512VL);
    }
    if words.leaf7_ecx & (1 << 10) != 0 {
      caps = caps.union(x86::VPCLMULQDQ);
    }
  }

  caps
}

#[inline]
pub(crate) fn runtime() -> Caps {
  decode(read_cpuid())
}

#[cfg(test)]
mod tests {
  extern crate std;

  use super::*;

  const ICELAKE: CpuidWords = CpuidWords {
    leaf1_ecx: (1 << 1) | (1 << 9) | (1 << 20) | (1 << 27),
    leaf7_ebx: (1 << 16) | (1 << 30) | (1 << 31),
    leaf7_ecx: 1 << 10,
    xcr0: 0xE7,
  };

  #[test]
  fn decodes_full_feature_set() {
    let caps = decode(ICELAKE);
    assert!(caps.has(x86::VPCLMUL_READY));
    assert!(caps.has(x86::CRC32C_READY));
  }

  #[test]
  fn avx512_requires_os_state() {
    let words = CpuidWords { xcr0: 0x7, ..ICELAKE };
    let caps = decode(words);
    assert!(caps.has(x86::PCLMUL_READY));
    assert!(caps.has(x86::SSE42));
    assert!(!caps.has(x86::AVX512F));
    assert!(!caps.has(x86::VPCLMULQDQ));
  }

  #[test]
  fn avx512_requires_osxsave() {
    let words = CpuidWords { leaf1_ecx: ICELAKE.leaf1_ecx & !(1 << 27), ..ICELAKE };
    assert!(decode(words).intersection(x86::AVX512_ALL).is_empty());
  }

  #[test]
  fn bare_cpu_is_sse2_only() {
    assert_eq!(decode(CpuidWords::default()), x86::SSE2);
  }

  #[test]
  fn sse42_without_clmul() {
    let words = CpuidWords { leaf1_ecx: 1 << 20, ..CpuidWords::default() };
    let caps = decode(words);
    assert!(caps.has(x86::CRC32C_READY));
    assert!(!caps.has(x86::PCLMUL_READY));
  }

  #[test]
  #[cfg_attr(miri, ignore)]
  fn runtime_agrees_with_std() {
    let caps = runtime();
    assert_eq!(caps.has(x86::SSE42), std::arch::is_x86_feature_detected!("sse4.2"));
    assert_eq!(caps.has(x86::PCLMULQDQ), std::arch::is_x86_feature_detected!("pclmulqdq"));
    assert_eq!(caps.has(x86::SSSE3), std::arch::is_x86_feature_detected!("ssse3"));
    if caps.has(x86::AVX512F) {
      assert!(std::arch::is_x86_feature_detected!("avx512f"));
    }
  }
}
