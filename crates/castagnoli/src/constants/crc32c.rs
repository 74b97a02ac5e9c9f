//! CRC-32C (Castagnoli) constants.
//!
//! Polynomial: 0x1EDC6F41 (reflected: 0x82F63B78)
//! Used by: iSCSI, SCTP, Btrfs, ext4, RocksDB, LevelDB

/// CRC-32C polynomial in reflected (bit-reversed) form.
pub const POLYNOMIAL: u32 = 0x82F6_3B78;

/// Slicing-by-8 lookup tables, 8 KiB, cache-line aligned.
pub static TABLES: super::Aligned64<[[u32; 256]; 8]> =
  super::Aligned64(super::tables::generate_slicing_tables_32(POLYNOMIAL));

/// Carryless-multiply folding constants.
///
/// A 128-bit lane holds data in reflected order: the low qword is the earlier
/// half. Folding a lane forward by `D` bits multiplies its low qword by
/// `x^(D+32)` and its high qword by `x^(D-32)` (mod P, reflected, shifted
/// left by one for the carryless-multiply bit alignment). Pairs below are
/// `(low-qword key, high-qword key)`.
///
/// Reference: Intel, "Fast CRC Computation for Generic Polynomials Using
/// PCLMULQDQ Instruction".
pub mod fold {
  use super::super::gf2;

  /// Normal form with the explicit `x^32` term.
  const POLY_FULL: u64 = 0x1_1EDC_6F41;

  /// `(x^(bits-32) mod P)' << 1`: the multiplier that moves a 32-bit-aligned
  /// reflected value `bits` positions forward.
  pub const fn key(bits: u32) -> u64 {
    (gf2::reflect_bits(gf2::xpow_mod_32(bits - 32, POLY_FULL) as u64, 32)) << 1
  }

  /// Keys for folding a 128-bit lane forward by `distance_bytes`.
  pub const fn fold_pair(distance_bytes: u32) -> (u64, u64) {
    let bits = distance_bytes * 8;
    (key(bits + 64), key(bits))
  }

  /// Fold one lane over the next (16 bytes).
  pub const FOLD_16: (u64, u64) = fold_pair(16);

  /// Fold across four 128-bit accumulators (64 bytes), or one 512-bit register.
  pub const FOLD_64: (u64, u64) = fold_pair(64);

  /// Fold across four 512-bit accumulators (256 bytes).
  pub const FOLD_256: (u64, u64) = fold_pair(256);

  /// 64 → 32 bit step of the final reduction.
  pub const REDUCE_64: u64 = key(96);

  /// Barrett reduction: `(P', μ')` with `μ = floor(x^64 / P)`, both reflected
  /// over 33 bits.
  pub const BARRETT: (u64, u64) = (
    gf2::reflect_bits(POLY_FULL, 33),
    gf2::reflect_bits(gf2::barrett_quotient_32(POLY_FULL), 33),
  );
}
