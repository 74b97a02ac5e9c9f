//! Error types.
//!
//! Individual crates may define additional errors as needed.

use core::fmt;

/// A computed checksum did not match the stored one.
///
/// # Examples
///
/// ```
/// use traits::ChecksumMismatch;
///
/// let err = ChecksumMismatch::new(0xE306_9283u32, 0);
/// assert_eq!(err.to_string(), "checksum mismatch: expected 0xe3069283, computed 0x00000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChecksumMismatch<T> {
  expected: T,
  computed: T,
}

impl<T: Copy> ChecksumMismatch<T> {
  #[inline]
  #[must_use]
  pub const fn new(expected: T, computed: T) -> Self {
    Self { expected, computed }
  }

  /// The value the caller supplied.
  #[inline]
  #[must_use]
  pub const fn expected(&self) -> T {
    self.expected
  }

  /// The value computed from the data.
  #[inline]
  #[must_use]
  pub const fn computed(&self) -> T {
    self.computed
  }
}

impl<T: fmt::LowerHex> fmt::Display for ChecksumMismatch<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let width = 2 + 2 * core::mem::size_of::<T>();
    write!(
      f,
      "checksum mismatch: expected {:#0width$x}, computed {:#0width$x}",
      self.expected, self.computed
    )
  }
}

impl<T: fmt::Debug + fmt::LowerHex> core::error::Error for ChecksumMismatch<T> {}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, string::ToString};

  use super::*;

  #[test]
  fn display_message() {
    let err = ChecksumMismatch::new(0x1u32, 0xABCD_EF01u32);
    assert_eq!(err.to_string(), "checksum mismatch: expected 0x00000001, computed 0xabcdef01");
  }

  #[test]
  fn display_pads_to_width() {
    let err = ChecksumMismatch::new(0x1u16, 0x2u16);
    assert_eq!(err.to_string(), "checksum mismatch: expected 0x0001, computed 0x0002");
  }

  #[test]
  fn accessors() {
    let err = ChecksumMismatch::new(7u32, 9u32);
    assert_eq!(err.expected(), 7);
    assert_eq!(err.computed(), 9);
  }

  #[test]
  fn debug_impl() {
    let dbg = format!("{:?}", ChecksumMismatch::new(1u32, 2u32));
    assert_eq!(dbg, "ChecksumMismatch { expected: 1, computed: 2 }");
  }

  #[test]
  fn is_error() {
    fn takes_error<E: core::error::Error>(_: &E) {}
    takes_error(&ChecksumMismatch::new(1u32, 2u32));
  }
}
