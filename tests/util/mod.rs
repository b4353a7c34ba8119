//! Shared helpers for integration tests.

pub mod test_utils;

pub use test_utils::TestSetupExt;
