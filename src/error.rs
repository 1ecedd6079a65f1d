use thiserror::Error;

use crate::models::Rectangle;

/// Errors raised by the box merging engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("invalid rectangle at index {index}: {rect:?} (origin and size must be non-negative)")]
    InvalidRectangle { index: usize, rect: Rectangle },
}
