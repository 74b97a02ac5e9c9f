//! Non-cryptographic checksum trait.
//!
//! - **Performance**: inline-friendly, no allocation
//! - **Streaming**: incremental updates over any number of buffers

use core::fmt::{Debug, LowerHex};

use crate::error::ChecksumMismatch;

/// Non-cryptographic checksum algorithm.
///
/// # Usage
///
/// ```rust,ignore
/// use castagnoli::{Checksum, Crc32c};
///
/// // One-shot
/// let crc = Crc32c::checksum(b"hello world");
///
/// // Streaming
/// let mut hasher = Crc32c::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), crc);
/// ```
///
/// # Implementor Requirements
///
/// - `new()` must return the same state as `Default::default()`
/// - `finalize()` must be idempotent
/// - `reset()` must restore the state the hasher was created with
pub trait Checksum: Clone + Default {
  /// Output size in bytes.
  const OUTPUT_SIZE: usize;

  type Output: Copy + Eq + Debug + LowerHex + Default;

  /// Create a new hasher with the default initial value.
  #[must_use]
  fn new() -> Self;

  /// Create a hasher that continues from a previously finalized value.
  #[must_use]
  fn with_initial(initial: Self::Output) -> Self;

  /// Feed more data.
  fn update(&mut self, data: &[u8]);

  /// Feed several non-contiguous buffers, in order.
  #[inline]
  fn update_vectored(&mut self, bufs: &[&[u8]]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// The checksum of everything fed so far. Does not consume the hasher.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  fn reset(&mut self);

  /// Compute the checksum of data in one shot.
  #[inline]
  #[must_use]
  fn checksum(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }

  #[inline]
  #[must_use]
  fn checksum_vectored(bufs: &[&[u8]]) -> Self::Output {
    let mut h = Self::new();
    h.update_vectored(bufs);
    h.finalize()
  }

  /// Check `data` against a stored checksum.
  ///
  /// # Errors
  ///
  /// Returns [`ChecksumMismatch`] carrying both values when they differ.
  #[inline]
  fn verify(data: &[u8], expected: Self::Output) -> Result<(), ChecksumMismatch<Self::Output>> {
    let computed = Self::checksum(data);
    if computed == expected {
      Ok(())
    } else {
      Err(ChecksumMismatch::new(expected, computed))
    }
  }
}
