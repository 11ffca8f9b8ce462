#![allow(dead_code)]

mod harness;
pub use harness::*;

mod binary_tests;
mod feed_pipeline_tests;
