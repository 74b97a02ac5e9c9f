//! x86_64 CRC-32C kernels.
//!
//! - SSE4.2 `crc32`: the CRC-32C polynomial in hardware, 8 bytes per instruction
//! - PCLMULQDQ / VPCLMULQDQ folding over whole blocks, finished by SSE4.2 or
//!   by slicing-by-8 when SSE4.2 is absent
//!
//! Each kernel has an `unsafe` body with its `#[target_feature]` set and a safe
//! wrapper with the `Crc32cFn` signature. The wrappers are only reachable
//! through candidates whose `requires` mask covers those features, and the
//! dispatcher never installs a candidate the CPU does not satisfy.
#![allow(unsafe_code)]

use core::arch::x86_64::{_mm_crc32_u8, _mm_crc32_u32, _mm_crc32_u64};

use super::portable;
use crate::simd::x86_64::{pclmul, vpclmul};

/// CRC-32C using SSE4.2 `crc32` instructions.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE4.2.
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn compute_sse42_unchecked(crc: u32, data: &[u8]) -> u32 {
  let (words, rest) = data.as_chunks::<8>();
  let mut wide = u64::from(crc);
  for word in words {
    wide = _mm_crc32_u64(wide, u64::from_le_bytes(*word));
  }

  let mut crc = wide as u32;
  let (dwords, tail) = rest.as_chunks::<4>();
  for dword in dwords {
    crc = _mm_crc32_u32(crc, u32::from_le_bytes(*dword));
  }
  for &byte in tail {
    crc = _mm_crc32_u8(crc, byte);
  }
  crc
}

/// PCLMULQDQ folding; the sub-block tail goes through slicing-by-8.
///
/// # Safety
///
/// Caller must ensure the CPU supports PCLMULQDQ.
#[target_feature(enable = "pclmulqdq")]
unsafe fn compute_pclmul_unchecked(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: caller guarantees PCLMULQDQ.
  let (crc, tail) = unsafe { pclmul::fold_blocks(crc, data) };
  portable::compute(crc, tail)
}

/// PCLMULQDQ folding with an SSE4.2 tail.
///
/// # Safety
///
/// Caller must ensure the CPU supports PCLMULQDQ and SSE4.2.
#[target_feature(enable = "pclmulqdq", enable = "sse4.2")]
unsafe fn compute_pclmul_sse42_unchecked(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: caller guarantees PCLMULQDQ.
  let (crc, tail) = unsafe { pclmul::fold_blocks(crc, data) };
  // SAFETY: caller guarantees SSE4.2.
  unsafe { compute_sse42_unchecked(crc, tail) }
}

/// AVX-512 VPCLMULQDQ folding with an SSE4.2 tail.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX-512F/VL/BW, VPCLMULQDQ,
/// PCLMULQDQ and SSE4.2, with ZMM state enabled by the OS.
#[target_feature(
  enable = "avx512f",
  enable = "avx512vl",
  enable = "avx512bw",
  enable = "vpclmulqdq",
  enable = "pclmulqdq",
  enable = "sse4.2"
)]
unsafe fn compute_vpclmul_unchecked(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: caller guarantees the AVX-512 folding features.
  let (crc, tail) = unsafe { vpclmul::fold_blocks(crc, data) };
  // SAFETY: caller guarantees SSE4.2.
  unsafe { compute_sse42_unchecked(crc, tail) }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch entry points
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub(crate) fn compute_sse42(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only installed through a candidate requiring `x86::CRC32C_READY`.
  unsafe { compute_sse42_unchecked(crc, data) }
}

#[inline]
pub(crate) fn compute_pclmul(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only installed through a candidate requiring `x86::PCLMUL_READY`.
  unsafe { compute_pclmul_unchecked(crc, data) }
}

#[inline]
pub(crate) fn compute_pclmul_sse42(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only installed through a candidate requiring `PCLMUL_READY | CRC32C_READY`.
  unsafe { compute_pclmul_sse42_unchecked(crc, data) }
}

#[inline]
pub(crate) fn compute_vpclmul(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only installed through a candidate requiring `VPCLMUL_READY | CRC32C_READY`.
  unsafe { compute_vpclmul_unchecked(crc, data) }
}
