//! Carryless-multiply folding kernels.
//!
//! These fold whole blocks and leave the unprocessed tail to the caller, so
//! one folding core pairs with whichever byte-wise kernel finishes best on
//! the same CPU.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;
