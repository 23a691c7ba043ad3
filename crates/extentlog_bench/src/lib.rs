//! Shared helpers for the extentlog benchmarks.

pub mod utils;
