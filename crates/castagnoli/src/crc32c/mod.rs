//! CRC-32C checksum API.
//!
//! Two surfaces over the same dispatch cell:
//!
//! - free functions over an [`Accumulator`]: [`init`], [`accumulate`],
//!   [`finalize`], [`equals`]
//! - the streaming [`Crc32c`] hasher, implementing [`Checksum`]
//!
//! # Dispatch
//!
//! With `runtime-dispatch` the cell starts unresolved. The first non-empty
//! [`accumulate`] picks a kernel (see [`kernels`]), installs it and runs it;
//! every later call is one atomic load and an indirect call. Without
//! `runtime-dispatch` the cell is resolved at compile time from the enabled
//! target features and the `CASTAGNOLI_FORCE` override is not consulted.

use core::fmt;

use backend::{CellState, Crc32cFn, KernelCell};
use traits::Checksum;

#[cfg(target_arch = "aarch64")]
mod aarch64;
pub mod config;
pub mod kernels;
mod portable;
#[cfg(target_arch = "x86_64")]
mod x86_64;

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch cell
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "runtime-dispatch")]
static DISPATCH: KernelCell<Crc32cFn> = KernelCell::new(kernels::choose);

#[cfg(not(feature = "runtime-dispatch"))]
static DISPATCH: KernelCell<Crc32cFn> = KernelCell::resolved(backend::select(
  platform::caps_static(),
  &kernels::KERNELS,
  backend::KernelTier::Wide,
));

/// Name of the kernel the dispatch cell runs, resolving it if needed.
///
/// Returns names like `"x86_64/pclmul+sse4.2"` or `"portable/slicing-by-8"`.
#[must_use]
pub fn selected_backend() -> &'static str {
  DISPATCH.get().name
}

/// Current state of the dispatch cell. Does not resolve it.
#[must_use]
pub fn dispatch_state() -> CellState {
  DISPATCH.state()
}

// ─────────────────────────────────────────────────────────────────────────────
// Accumulator API
// ─────────────────────────────────────────────────────────────────────────────

/// An in-progress CRC-32C.
///
/// Holds the bit-complemented running register in little-endian byte order,
/// whatever the host. Only [`finalize`] turns it into a checksum; the two
/// phases are different types so they cannot be confused.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Accumulator(u32);

impl Accumulator {
  /// The state before any data: all register bits set.
  pub const INIT: Self = Self(0xFFFF_FFFF);

  /// Continue from a finalized CRC, as if the bytes it covers had just been
  /// accumulated.
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self::from_register(crc ^ 0xFFFF_FFFF)
  }

  /// The stored bytes, for persisting an in-progress checksum.
  #[inline]
  #[must_use]
  pub const fn to_le_bytes(self) -> [u8; 4] {
    self.0.to_ne_bytes()
  }

  #[inline]
  #[must_use]
  pub const fn from_le_bytes(bytes: [u8; 4]) -> Self {
    Self(u32::from_ne_bytes(bytes))
  }

  /// The register in host order, as kernels take it.
  #[inline]
  const fn register(self) -> u32 {
    u32::from_le(self.0)
  }

  #[inline]
  const fn from_register(register: u32) -> Self {
    Self(register.to_le())
  }
}

impl Default for Accumulator {
  #[inline]
  fn default() -> Self {
    Self::INIT
  }
}

impl fmt::Debug for Accumulator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Accumulator({:#010x})", self.register())
  }
}

/// Start a new checksum.
#[inline]
#[must_use]
pub const fn init() -> Accumulator {
  Accumulator::INIT
}

/// Feed `data` into `acc`.
///
/// Empty input returns `acc` unchanged without touching the dispatch cell.
/// Splitting input across calls never changes the result:
///
/// ```
/// use castagnoli::{accumulate, finalize, init};
///
/// let whole = accumulate(init(), b"hello world");
/// let split = accumulate(accumulate(init(), b"hello "), b"world");
/// assert_eq!(whole, split);
/// assert_eq!(finalize(whole), 0xC994_65AA);
/// ```
#[inline]
#[must_use]
pub fn accumulate(acc: Accumulator, data: &[u8]) -> Accumulator {
  if data.is_empty() {
    return acc;
  }
  Accumulator::from_register(DISPATCH.call(acc.register(), data))
}

/// The checksum of everything accumulated: the register, complemented, in
/// host byte order.
#[inline]
#[must_use]
pub const fn finalize(acc: Accumulator) -> u32 {
  acc.register() ^ 0xFFFF_FFFF
}

/// Whether two finalized checksums are equal.
#[inline]
#[must_use]
pub const fn equals(a: u32, b: u32) -> bool {
  a == b
}

/// One-shot CRC-32C.
#[inline]
#[must_use]
pub fn checksum(data: &[u8]) -> u32 {
  finalize(accumulate(init(), data))
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming hasher
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming CRC-32C (Castagnoli).
///
/// # Example
///
/// ```
/// use castagnoli::{Checksum, Crc32c};
///
/// let crc = Crc32c::checksum(b"123456789");
/// assert_eq!(crc, 0xE306_9283);
///
/// let mut hasher = Crc32c::resume(Crc32c::checksum(b"1234"));
/// hasher.update(b"56789");
/// assert_eq!(hasher.finalize(), crc);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crc32c {
  state: Accumulator,
  initial: Accumulator,
}

impl Crc32c {
  /// Create a hasher to resume from a previous CRC value.
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    let state = Accumulator::resume(crc);
    Self { state, initial: state }
  }

  /// Create a hasher from an in-progress accumulator.
  #[inline]
  #[must_use]
  pub const fn from_accumulator(state: Accumulator) -> Self {
    Self { state, initial: state }
  }

  /// The in-progress accumulator.
  #[inline]
  #[must_use]
  pub const fn state(&self) -> Accumulator {
    self.state
  }
}

impl Checksum for Crc32c {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Self::from_accumulator(init())
  }

  #[inline]
  fn with_initial(initial: u32) -> Self {
    Self::resume(initial)
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.state = accumulate(self.state, data);
  }

  #[inline]
  fn finalize(&self) -> u32 {
    finalize(self.state)
  }

  #[inline]
  fn reset(&mut self) {
    self.state = self.initial;
  }
}

#[cfg(feature = "std")]
impl std::io::Write for Crc32c {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.update(buf);
    Ok(buf.len())
  }

  #[inline]
  fn write_vectored(&mut self, bufs: &[std::io::IoSlice<'_>]) -> std::io::Result<usize> {
    let mut written = 0;
    for buf in bufs {
      self.update(buf);
      written += buf.len();
    }
    Ok(written)
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
