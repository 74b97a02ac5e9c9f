//! 512-bit VPCLMULQDQ folding for CRC-32C.
//!
//! Four ZMM accumulators cover 256 bytes per iteration, four 128-bit lanes
//! each. After the main loop they collapse into one ZMM, absorb remaining
//! 64-byte blocks, and the four lanes hand over to the 128-bit path.
//!
//! # Safety
//!
//! Uses `unsafe` for x86 SIMD intrinsics. Callers must ensure AVX-512F/VL/BW
//! and VPCLMULQDQ are available and that the OS saves ZMM state (the
//! dispatcher does this).
#![allow(unsafe_code)]
// This module is intrinsics-heavy; keep unsafe blocks readable.
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use super::pclmul::{self, Simd};
use crate::constants::crc32c::fold::{FOLD_16, FOLD_64, FOLD_256};

/// One coefficient pair repeated in all four lanes.
#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn broadcast(pair: (u64, u64)) -> __m512i {
  _mm512_broadcast_i32x4(_mm_set_epi64x(pair.1 as i64, pair.0 as i64))
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn load(block: &[u8; 64]) -> __m512i {
  _mm512_loadu_si512(block.as_ptr().cast())
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn load4(group: &[u8; 256]) -> [__m512i; 4] {
  let p = group.as_ptr();
  [
    _mm512_loadu_si512(p.cast()),
    _mm512_loadu_si512(p.add(64).cast()),
    _mm512_loadu_si512(p.add(128).cast()),
    _mm512_loadu_si512(p.add(192).cast()),
  ]
}

/// Lane-wise fold of `x` onto `next`.
#[inline]
#[target_feature(enable = "avx512f", enable = "vpclmulqdq")]
unsafe fn fold_into(x: __m512i, next: __m512i, coeff: __m512i) -> __m512i {
  let l = _mm512_clmulepi64_epi128::<0x00>(x, coeff);
  let h = _mm512_clmulepi64_epi128::<0x11>(x, coeff);
  _mm512_xor_si512(next, _mm512_xor_si512(l, h))
}

/// Fold every whole 16-byte block of `data` into `crc`, 256 bytes at a time
/// while possible.
///
/// Returns the updated register and the unprocessed tail, shorter than 16
/// bytes. Inputs below 256 bytes go through [`pclmul::fold_blocks`].
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX-512F, AVX-512VL, AVX-512BW,
/// VPCLMULQDQ and PCLMULQDQ.
#[target_feature(
  enable = "avx512f",
  enable = "avx512vl",
  enable = "avx512bw",
  enable = "vpclmulqdq",
  enable = "pclmulqdq"
)]
pub unsafe fn fold_blocks(crc: u32, data: &[u8]) -> (u32, &[u8]) {
  let (groups, rest) = data.as_chunks::<256>();
  let Some((first, groups)) = groups.split_first() else {
    return pclmul::fold_blocks(crc, data);
  };

  let [mut z0, mut z1, mut z2, mut z3] = load4(first);
  z0 = _mm512_xor_si512(z0, _mm512_zextsi128_si512(_mm_cvtsi32_si128(crc as i32)));

  let fold256 = broadcast(FOLD_256);
  for group in groups {
    let [n0, n1, n2, n3] = load4(group);
    z0 = fold_into(z0, n0, fold256);
    z1 = fold_into(z1, n1, fold256);
    z2 = fold_into(z2, n2, fold256);
    z3 = fold_into(z3, n3, fold256);
  }

  let fold64 = broadcast(FOLD_64);
  let mut acc = fold_into(z0, z1, fold64);
  acc = fold_into(acc, z2, fold64);
  acc = fold_into(acc, z3, fold64);

  let (blocks, rest) = rest.as_chunks::<64>();
  for block in blocks {
    acc = fold_into(acc, load(block), fold64);
  }

  // Lane 0 holds the earliest bytes.
  let fold16 = Simd::new(FOLD_16.1, FOLD_16.0);
  let x = Simd(_mm512_extracti32x4_epi32::<0>(acc));
  let x = x.fold_into(Simd(_mm512_extracti32x4_epi32::<1>(acc)), fold16);
  let x = x.fold_into(Simd(_mm512_extracti32x4_epi32::<2>(acc)), fold16);
  let x = x.fold_into(Simd(_mm512_extracti32x4_epi32::<3>(acc)), fold16);

  pclmul::finish(x, rest)
}
