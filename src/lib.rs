//! Shared fixtures for the Payload Inspector benchmarks and end-to-end tests.

pub mod bench_support;
