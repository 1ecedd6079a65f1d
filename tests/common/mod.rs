#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from roicut for tests
pub use roicut::{BoxSet, MergeConfig, MergeError, OverlapMerger, Rectangle};
