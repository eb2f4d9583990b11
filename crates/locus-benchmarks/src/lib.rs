//! Locus benchmarking suite
//!
//! Benchmarks for route resolution, response cache lookups and locus.toml
//! parsing.

pub mod common;

pub use common::*;
