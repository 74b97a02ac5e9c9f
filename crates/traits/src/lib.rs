//! Core traits for the castagnoli workspace.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Checksum`] | Streaming, non-cryptographic checksum |
//! | [`ChecksumMismatch`] | Error returned by [`Checksum::verify`] |
//!
//! This crate is `no_std` and has no dependencies.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod checksum;
pub mod error;

pub use checksum::Checksum;
pub use error::ChecksumMismatch;
