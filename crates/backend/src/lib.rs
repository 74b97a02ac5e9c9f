//! Backend crate: kernel selection and dispatch for castagnoli.
//!
//! Two paths lead to a kernel:
//!
//! 1. **Compile-time selection**: when target features are known at compile time
//!    (`-C target-feature=...`), [`resolve_static`](dispatch::resolve_static)
//!    returns the best candidate without probing.
//!
//! 2. **Runtime selection**: for generic binaries a [`KernelCell`] probes once
//!    on first use and then calls the installed kernel directly.
//!
//! Algorithm crates describe their kernels as a [`KernelTable`]: an ordered list
//! of [`Candidate`]s plus a fallback. Selection is ordinary data-driven code, so
//! the policy is testable with synthetic capability sets on any host.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;
pub mod tier;

pub use dispatch::{Candidate, CellState, Crc32cFn, KernelCell, KernelTable, resolve_static, select};
// Re-export platform types for convenience.
pub use platform;
pub use platform::Caps;
pub use tier::KernelTier;
