//! aarch64 CRC-32C using the ARMv8 CRC32 extension (`crc32c*` instructions).
#![allow(unsafe_code)]

use core::arch::aarch64::{__crc32cb, __crc32cd, __crc32cw};

/// # Safety
///
/// Caller must ensure the CPU supports the `crc` target feature.
#[target_feature(enable = "crc")]
pub(crate) unsafe fn compute_crc_unchecked(crc: u32, data: &[u8]) -> u32 {
  let mut crc = crc;
  let (words, rest) = data.as_chunks::<8>();
  for word in words {
    crc = __crc32cd(crc, u64::from_le_bytes(*word));
  }

  let (dwords, tail) = rest.as_chunks::<4>();
  for dword in dwords {
    crc = __crc32cw(crc, u32::from_le_bytes(*dword));
  }
  for &byte in tail {
    crc = __crc32cb(crc, byte);
  }
  crc
}

#[inline]
pub(crate) fn compute_crc(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only installed through a candidate requiring `aarch64::CRC_READY`.
  unsafe { compute_crc_unchecked(crc, data) }
}
