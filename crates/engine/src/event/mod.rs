//! Event boundary resolution — which contiguous run of physical lines is
//! one logical log event.

pub mod boundary;

pub use boundary::{BoundaryCache, EventBoundaryResolver, EventRange};
