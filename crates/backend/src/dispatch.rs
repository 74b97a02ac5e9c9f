//! Kernel dispatch: selection and the lazily resolved dispatch cell.
//!
//! - [`Candidate`]: a kernel with a tier and capability requirements
//! - [`KernelTable`]: ordered accelerated candidates plus a guaranteed fallback
//! - [`select`]: pick the best candidate for a capability set (`const`)
//! - [`resolve_static`]: skip probing when compile-time features already
//!   satisfy the best candidate
//! - [`KernelCell`]: the process-wide slot that starts unresolved and is
//!   rewired to the chosen kernel on first use
//!
//! # Usage
//!
//! ```
//! use backend::dispatch::{Candidate, Crc32cFn, KernelCell, KernelTable, select};
//! use backend::KernelTier;
//! use platform::Caps;
//!
//! fn portable(crc: u32, _data: &[u8]) -> u32 {
//!   crc
//! }
//!
//! static TABLE: KernelTable<Crc32cFn> =
//!   KernelTable::new(&[], Candidate::new("portable", KernelTier::Portable, Caps::NONE, portable));
//!
//! fn choose() -> &'static Candidate<Crc32cFn> {
//!   select(platform::caps(), &TABLE, KernelTier::Wide)
//! }
//!
//! static DISPATCH: KernelCell<Crc32cFn> = KernelCell::new(choose);
//!
//! assert_eq!(DISPATCH.call(7, b"abc"), 7);
//! assert_eq!(DISPATCH.state().name(), Some("portable"));
//! ```

use core::{
  fmt,
  ptr,
  sync::atomic::{AtomicPtr, Ordering},
};

use platform::Caps;

use crate::tier::KernelTier;

/// Signature shared by every CRC-32C kernel: `fn(register, data) -> register`.
///
/// The register is the running, bit-complemented CRC in host byte order.
pub type Crc32cFn = fn(u32, &[u8]) -> u32;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with capability requirements.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g., "x86_64/pclmul").
  pub name: &'static str,
  pub tier: KernelTier,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  pub func: F,
}

impl<F> Candidate<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, tier: KernelTier, requires: Caps, func: F) -> Self {
    Self { name, tier, requires, func }
  }
}

/// The kernels one algorithm can dispatch to.
///
/// `accelerated` is ordered best-first. `fallback` requires nothing and is
/// returned when no accelerated candidate qualifies, so selection is total.
#[derive(Debug)]
pub struct KernelTable<F: 'static> {
  pub accelerated: &'static [Candidate<F>],
  pub fallback: Candidate<F>,
}

impl<F> KernelTable<F> {
  #[must_use]
  pub const fn new(accelerated: &'static [Candidate<F>], fallback: Candidate<F>) -> Self {
    Self { accelerated, fallback }
  }

  /// Every candidate, best first, fallback last.
  pub fn iter(&self) -> impl Iterator<Item = &Candidate<F>> {
    self.accelerated.iter().chain(core::iter::once(&self.fallback))
  }

  /// Look a candidate up by name.
  #[must_use]
  pub fn find(&self, name: &str) -> Option<&Candidate<F>> {
    self.iter().find(|c| c.name == name)
  }
}

/// Select the best kernel for `caps`.
///
/// Returns the first accelerated candidate whose requirements are met and whose
/// tier does not exceed `max_tier`; otherwise the fallback. A candidate whose
/// features are missing is never returned, whatever the ceiling.
#[inline]
#[must_use]
pub const fn select<F>(caps: Caps, table: &KernelTable<F>, max_tier: KernelTier) -> &Candidate<F> {
  let mut rest = table.accelerated;
  while let [candidate, tail @ ..] = rest {
    if candidate.tier.within(max_tier) && caps.has(candidate.requires) {
      return candidate;
    }
    rest = tail;
  }
  &table.fallback
}

/// Resolve without probing when that gives the same answer as probing.
///
/// If the compile-time features already satisfy the best candidate, no runtime
/// probe can find anything better. A table with no accelerated candidates has
/// nothing to probe for.
#[inline]
#[must_use]
pub const fn resolve_static<F>(table: &KernelTable<F>, caps_static: Caps) -> Option<&Candidate<F>> {
  match table.accelerated {
    [] => Some(&table.fallback),
    [best, ..] if caps_static.has(best.requires) => Some(best),
    _ => None,
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch Cell
// ─────────────────────────────────────────────────────────────────────────────

/// Observable state of a [`KernelCell`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
  /// No call has installed a kernel yet.
  Unresolved,
  /// A kernel is installed. Terminal.
  Resolved { name: &'static str, tier: KernelTier },
}

impl CellState {
  #[must_use]
  pub const fn name(self) -> Option<&'static str> {
    match self {
      Self::Unresolved => None,
      Self::Resolved { name, .. } => Some(name),
    }
  }

  #[must_use]
  pub const fn is_resolved(self) -> bool {
    matches!(self, Self::Resolved { .. })
  }
}

impl fmt::Display for CellState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Unresolved => f.write_str("unresolved"),
      Self::Resolved { name, tier } => write!(f, "{name} ({tier})"),
    }
  }
}

/// Process-wide dispatch slot.
///
/// Starts unresolved. The first call runs the chooser, publishes the result
/// with a single release store and runs the chosen kernel itself. Later calls
/// are one acquire load plus an indirect call.
///
/// Concurrent first calls may each run the chooser. That is fine: the chooser
/// is a pure function of CPU state and once-read configuration, so every
/// writer stores the same pointer, and every caller runs the kernel it chose
/// rather than whatever the slot holds.
pub struct KernelCell<F: 'static> {
  /// Null while unresolved. Otherwise derived from a `&'static Candidate<F>`
  /// and never written through.
  slot: AtomicPtr<Candidate<F>>,
  chooser: fn() -> &'static Candidate<F>,
}

impl<F: 'static> KernelCell<F> {
  #[must_use]
  pub const fn new(chooser: fn() -> &'static Candidate<F>) -> Self {
    Self { slot: AtomicPtr::new(ptr::null_mut()), chooser }
  }

  /// A cell resolved at compile time. The chooser never runs.
  #[must_use]
  pub const fn resolved(candidate: &'static Candidate<F>) -> Self {
    const fn unreachable_chooser<F: 'static>() -> &'static Candidate<F> {
      panic!("resolved cell has no chooser")
    }

    Self { slot: AtomicPtr::new(ptr::from_ref(candidate).cast_mut()), chooser: unreachable_chooser::<F> }
  }

  #[inline]
  fn load(&self) -> Option<&'static Candidate<F>> {
    let ptr = self.slot.load(Ordering::Acquire);
    // SAFETY: the only non-null values ever stored come from `&'static
    // Candidate<F>` in `install` or `resolved`, and nothing writes through them.
    unsafe { ptr.as_ref() }
  }

  #[must_use]
  pub fn state(&self) -> CellState {
    match self.load() {
      None => CellState::Unresolved,
      Some(c) => CellState::Resolved { name: c.name, tier: c.tier },
    }
  }

  /// The installed candidate, resolving it first if needed.
  #[inline]
  #[must_use]
  pub fn get(&self) -> &'static Candidate<F> {
    match self.load() {
      Some(c) => c,
      None => self.install(),
    }
  }

  #[cold]
  #[inline(never)]
  fn install(&self) -> &'static Candidate<F> {
    let chosen = (self.chooser)();
    self.slot.store(ptr::from_ref(chosen).cast_mut(), Ordering::Release);
    tracing::debug!(kernel = chosen.name, tier = %chosen.tier, "dispatch resolved");
    chosen
  }
}

impl KernelCell<Crc32cFn> {
  /// Run the installed kernel, resolving on first use.
  #[inline]
  pub fn call(&self, crc: u32, data: &[u8]) -> u32 {
    match self.load() {
      Some(c) => (c.func)(crc, data),
      None => self.choose_and_run(crc, data),
    }
  }

  /// Chooser stub: pick, install, then run the pick directly.
  ///
  /// The slot is not re-read, so the result is correct even while another
  /// thread is installing.
  #[cold]
  #[inline(never)]
  fn choose_and_run(&self, crc: u32, data: &[u8]) -> u32 {
    let chosen = self.install();
    (chosen.func)(crc, data)
  }
}

impl<F: 'static> fmt::Debug for KernelCell<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("KernelCell").field("state", &self.state()).finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  extern crate std;

  use core::sync::atomic::AtomicUsize;
  use std::{sync::Barrier, thread, vec::Vec};

  use platform::caps::x86;

  use super::*;

  fn portable_crc(_crc: u32, _data: &[u8]) -> u32 {
    0xDEAD_BEEF
  }

  fn fast_crc(_crc: u32, _data: &[u8]) -> u32 {
    0xCAFE_BABE
  }

  fn hw_crc(_crc: u32, _data: &[u8]) -> u32 {
    0x0BAD_F00D
  }

  static TABLE: KernelTable<Crc32cFn> = KernelTable::new(
    &[
      Candidate::new("wide", KernelTier::Wide, x86::VPCLMUL_READY, fast_crc),
      Candidate::new("fold", KernelTier::Folding, x86::PCLMUL_READY, fast_crc),
      Candidate::new("hw", KernelTier::HwCrc, x86::CRC32C_READY, hw_crc),
    ],
    Candidate::new("portable", KernelTier::Portable, Caps::NONE, portable_crc),
  );

  #[test]
  fn test_candidate_creation() {
    let c: Candidate<Crc32cFn> = Candidate::new("test", KernelTier::Portable, Caps::NONE, portable_crc);
    assert_eq!(c.name, "test");
    assert_eq!(c.requires, Caps::NONE);
  }

  #[test]
  fn test_select_portable_fallback() {
    let selected = select(Caps::NONE, &TABLE, KernelTier::Wide);
    assert_eq!(selected.name, "portable");
    assert_eq!((selected.func)(0, &[]), 0xDEAD_BEEF);
  }

  #[test]
  fn test_select_best_match() {
    let caps = x86::VPCLMUL_READY | x86::SSE42;
    assert_eq!(select(caps, &TABLE, KernelTier::Wide).name, "wide");
  }

  #[test]
  fn test_select_skips_unavailable() {
    let caps = x86::SSE42 | x86::PCLMULQDQ;
    // PCLMUL_READY also needs SSSE3.
    assert_eq!(select(caps, &TABLE, KernelTier::Wide).name, "hw");
    assert_eq!(select(caps | x86::SSSE3, &TABLE, KernelTier::Wide).name, "fold");
  }

  #[test]
  fn test_tier_ceiling() {
    let caps = x86::VPCLMUL_READY | x86::SSE42;
    assert_eq!(select(caps, &TABLE, KernelTier::Folding).name, "fold");
    assert_eq!(select(caps, &TABLE, KernelTier::HwCrc).name, "hw");
    assert_eq!(select(caps, &TABLE, KernelTier::Portable).name, "portable");
    assert_eq!(select(caps, &TABLE, KernelTier::Reference).name, "portable");
  }

  #[test]
  fn test_ceiling_never_exceeds_caps() {
    // Asking for wide on a CPU with only SSE4.2 lands on the best real option.
    assert_eq!(select(x86::SSE42, &TABLE, KernelTier::Wide).name, "hw");
  }

  #[test]
  fn test_select_is_const() {
    const PICK: &Candidate<Crc32cFn> = select(x86::CRC32C_READY, &TABLE, KernelTier::Wide);
    assert_eq!(PICK.name, "hw");
  }

  #[test]
  fn test_resolve_static() {
    assert!(resolve_static(&TABLE, x86::PCLMUL_READY | x86::SSE42).is_none());
    assert_eq!(resolve_static(&TABLE, x86::VPCLMUL_READY).map(|c| c.name), Some("wide"));

    static EMPTY: KernelTable<Crc32cFn> =
      KernelTable::new(&[], Candidate::new("portable", KernelTier::Portable, Caps::NONE, portable_crc));
    assert_eq!(resolve_static(&EMPTY, Caps::NONE).map(|c| c.name), Some("portable"));
  }

  #[test]
  fn test_table_lookup() {
    assert_eq!(TABLE.iter().count(), 4);
    assert_eq!(TABLE.iter().last().map(|c| c.name), Some("portable"));
    assert!(TABLE.find("fold").is_some());
    assert!(TABLE.find("nope").is_none());
  }

  fn hw_chooser() -> &'static Candidate<Crc32cFn> {
    select(x86::CRC32C_READY, &TABLE, KernelTier::Wide)
  }

  #[test]
  fn test_cell_resolves_once() {
    static CELL: KernelCell<Crc32cFn> = KernelCell::new(hw_chooser);

    assert_eq!(CELL.state(), CellState::Unresolved);
    assert_eq!(CELL.call(0, b"x"), 0x0BAD_F00D);
    assert_eq!(CELL.state(), CellState::Resolved { name: "hw", tier: KernelTier::HwCrc });
    assert_eq!(CELL.get().name, "hw");
    assert_eq!(CELL.call(0, b"x"), 0x0BAD_F00D);
  }

  #[test]
  fn test_cell_resolved_at_compile_time() {
    static CELL: KernelCell<Crc32cFn> = KernelCell::resolved(select(x86::CRC32C_READY, &TABLE, KernelTier::Wide));
    assert_eq!(CELL.state().name(), Some("hw"));
    assert_eq!(CELL.call(0, b""), 0x0BAD_F00D);
  }

  #[test]
  fn test_get_resolves() {
    static CELL: KernelCell<Crc32cFn> = KernelCell::new(hw_chooser);
    assert_eq!(CELL.get().name, "hw");
    assert!(CELL.state().is_resolved());
  }

  // ─── Concurrent first use ───

  static CHOOSER_RUNS: AtomicUsize = AtomicUsize::new(0);
  static CHOSEN_CALLS: AtomicUsize = AtomicUsize::new(0);
  static OTHER_CALLS: AtomicUsize = AtomicUsize::new(0);

  fn xor_len(crc: u32, data: &[u8]) -> u32 {
    crc ^ data.len() as u32
  }

  fn counted_chosen(crc: u32, data: &[u8]) -> u32 {
    CHOSEN_CALLS.fetch_add(1, Ordering::Relaxed);
    xor_len(crc, data)
  }

  fn counted_other(crc: u32, data: &[u8]) -> u32 {
    OTHER_CALLS.fetch_add(1, Ordering::Relaxed);
    xor_len(crc, data)
  }

  static COUNTED: KernelTable<Crc32cFn> = KernelTable::new(
    &[Candidate::new("chosen", KernelTier::HwCrc, Caps::NONE, counted_chosen)],
    Candidate::new("other", KernelTier::Portable, Caps::NONE, counted_other),
  );

  fn counting_chooser() -> &'static Candidate<Crc32cFn> {
    CHOOSER_RUNS.fetch_add(1, Ordering::Relaxed);
    // Widen the window in which other threads still see the slot empty.
    thread::yield_now();
    select(Caps::NONE, &COUNTED, KernelTier::Wide)
  }

  #[test]
  fn test_concurrent_first_use() {
    const THREADS: usize = 16;
    const CALLS: usize = 100;
    static CELL: KernelCell<Crc32cFn> = KernelCell::new(counting_chooser);

    let barrier = Barrier::new(THREADS);
    thread::scope(|s| {
      let handles: Vec<_> = (0..THREADS)
        .map(|t| {
          let barrier = &barrier;
          s.spawn(move || {
            barrier.wait();
            for i in 0..CALLS {
              let data = [0u8; 64];
              let len = (t + i) % data.len();
              let crc = (t * CALLS + i) as u32;
              assert_eq!(CELL.call(crc, &data[..len]), crc ^ len as u32);
            }
          })
        })
        .collect();
      for h in handles {
        h.join().unwrap();
      }
    });

    let runs = CHOOSER_RUNS.load(Ordering::Relaxed);
    assert!((1..=THREADS).contains(&runs), "chooser ran {runs} times");
    assert_eq!(CHOSEN_CALLS.load(Ordering::Relaxed), THREADS * CALLS);
    assert_eq!(OTHER_CALLS.load(Ordering::Relaxed), 0);
    assert_eq!(CELL.state().name(), Some("chosen"));
  }
}
