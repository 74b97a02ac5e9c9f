//! 128-bit PCLMULQDQ folding for CRC-32C.
//!
//! Four 16-byte accumulators advance 64 bytes per iteration. They are then
//! folded into one, single 16-byte blocks are folded in, and the 128-bit
//! remainder is reduced to 64 bits, then 32, then to the CRC with a Barrett
//! reduction.
//!
//! Reference: Intel, "Fast CRC Computation for Generic Polynomials Using
//! PCLMULQDQ Instruction".
//!
//! # Safety
//!
//! Uses `unsafe` for x86 SIMD intrinsics. Callers must ensure PCLMULQDQ is
//! available (the dispatcher does this).
#![allow(unsafe_code)]
// This module is intrinsics-heavy; keep unsafe blocks readable.
#![allow(unsafe_op_in_unsafe_fn)]

use core::{
  arch::x86_64::*,
  ops::{BitXor, BitXorAssign},
};

use crate::constants::crc32c::fold::{BARRETT, FOLD_16, FOLD_64, REDUCE_64};

#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
pub(crate) struct Simd(pub(crate) __m128i);

impl BitXor for Simd {
  type Output = Self;

  #[inline]
  fn bitxor(self, other: Self) -> Self {
    // SAFETY: `_mm_xor_si128` is available on all x86_64 (SSE2 baseline).
    unsafe { Self(_mm_xor_si128(self.0, other.0)) }
  }
}

impl BitXorAssign for Simd {
  #[inline]
  fn bitxor_assign(&mut self, other: Self) {
    *self = *self ^ other;
  }
}

impl Simd {
  #[inline]
  #[target_feature(enable = "sse2")]
  pub(crate) unsafe fn new(high: u64, low: u64) -> Self {
    Self(_mm_set_epi64x(high as i64, low as i64))
  }

  #[inline]
  #[target_feature(enable = "sse2")]
  pub(crate) unsafe fn load(block: &[u8; 16]) -> Self {
    Self(_mm_loadu_si128(block.as_ptr().cast()))
  }

  #[inline]
  #[target_feature(enable = "sse2")]
  unsafe fn load4(group: &[u8; 64]) -> [Self; 4] {
    let p = group.as_ptr().cast::<__m128i>();
    [
      Self(_mm_loadu_si128(p)),
      Self(_mm_loadu_si128(p.add(1))),
      Self(_mm_loadu_si128(p.add(2))),
      Self(_mm_loadu_si128(p.add(3))),
    ]
  }

  /// Fold `self` forward onto `next`: `next ⊕ (lo ⊗ coeff.lo) ⊕ (hi ⊗ coeff.hi)`.
  #[inline]
  #[target_feature(enable = "sse2", enable = "pclmulqdq")]
  pub(crate) unsafe fn fold_into(self, next: Self, coeff: Self) -> Self {
    let l = _mm_clmulepi64_si128::<0x00>(self.0, coeff.0);
    let h = _mm_clmulepi64_si128::<0x11>(self.0, coeff.0);
    next ^ Self(l) ^ Self(h)
  }

  /// Reduce the 128-bit remainder to the 32-bit register.
  #[inline]
  #[target_feature(enable = "sse2", enable = "pclmulqdq")]
  pub(crate) unsafe fn reduce(self) -> u32 {
    let fold16 = Self::new(FOLD_16.1, FOLD_16.0);
    let low32 = _mm_set_epi32(0, 0, 0, -1);

    // 128 -> 64: low qword times x^128, against the high qword.
    let x = _mm_xor_si128(_mm_clmulepi64_si128::<0x10>(self.0, fold16.0), _mm_srli_si128::<8>(self.0));

    // 64 -> 32.
    let k = Self::new(0, REDUCE_64);
    let x = _mm_xor_si128(
      _mm_clmulepi64_si128::<0x00>(_mm_and_si128(x, low32), k.0),
      _mm_srli_si128::<4>(x),
    );

    // Barrett: quotient estimate through μ, then subtract quotient × P.
    let pu = Self::new(BARRETT.1, BARRETT.0);
    let t1 = _mm_clmulepi64_si128::<0x10>(_mm_and_si128(x, low32), pu.0);
    let t2 = _mm_clmulepi64_si128::<0x00>(_mm_and_si128(t1, low32), pu.0);

    // Extract bits 32..64 without requiring SSE4.1.
    _mm_cvtsi128_si32(_mm_srli_si128::<4>(_mm_xor_si128(x, t2))) as u32
  }
}

/// Fold single 16-byte blocks into `x`, then reduce.
///
/// Returns the register and the bytes after the last whole block.
#[inline]
#[target_feature(enable = "sse2", enable = "pclmulqdq")]
pub(crate) unsafe fn finish(mut x: Simd, rest: &[u8]) -> (u32, &[u8]) {
  let fold16 = Simd::new(FOLD_16.1, FOLD_16.0);
  let (blocks, tail) = rest.as_chunks::<16>();
  for block in blocks {
    x = x.fold_into(Simd::load(block), fold16);
  }
  (x.reduce(), tail)
}

/// Fold every whole 16-byte block of `data` into `crc`.
///
/// Returns the updated register and the unprocessed tail, shorter than 16
/// bytes. Inputs below 64 bytes are returned untouched.
///
/// # Safety
///
/// Caller must ensure the CPU supports PCLMULQDQ.
#[target_feature(enable = "sse2", enable = "pclmulqdq")]
pub unsafe fn fold_blocks(crc: u32, data: &[u8]) -> (u32, &[u8]) {
  let (groups, rest) = data.as_chunks::<64>();
  let Some((first, groups)) = groups.split_first() else {
    return (crc, data);
  };

  let [mut x3, mut x2, mut x1, mut x0] = Simd::load4(first);
  x3 ^= Simd(_mm_cvtsi32_si128(crc as i32));

  let fold64 = Simd::new(FOLD_64.1, FOLD_64.0);
  for group in groups {
    let [n3, n2, n1, n0] = Simd::load4(group);
    x3 = x3.fold_into(n3, fold64);
    x2 = x2.fold_into(n2, fold64);
    x1 = x1.fold_into(n1, fold64);
    x0 = x0.fold_into(n0, fold64);
  }

  let fold16 = Simd::new(FOLD_16.1, FOLD_16.0);
  let x = x3.fold_into(x2, fold16);
  let x = x.fold_into(x1, fold16);
  let x = x.fold_into(x0, fold16);

  finish(x, rest)
}
