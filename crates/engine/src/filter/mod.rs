/// Two-tier annotation filtering.
///
/// - `traits.rs`: the filter plugin capability and its error kind
/// - `model.rs`: annotations addressed by absolute buffer offsets
/// - `scheduler.rs`: offset-deduplicated cheap/heavy scheduling
/// - `worker.rs`: coalescing single-slot background task register
///
/// Cheap filters run per line on the calling context; heavy filters run on
/// the background worker over an ephemeral line-addressable copy of the
/// chunk. Nothing in this module is fatal: filter failures skip one unit of
/// work and a torn-down surface silently drops the rest of a call.
pub mod model;
pub mod scheduler;
pub mod traits;
pub mod worker;

pub use model::Annotation;
pub use scheduler::{FilterScheduler, ProcessedOffsets};
pub use traits::{AnnotationFilter, FilterError, FilterResult};
pub use worker::{CoalescingWorker, HeavyRequest};
