//! x86_64 PCLMULQDQ (128-bit) and VPCLMULQDQ (512-bit) folding.

pub mod pclmul;
pub mod vpclmul;
