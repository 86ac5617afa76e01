//! Per-buffer side tables: detected-format cache and boundary cache.

use parking_lot::Mutex;

use crate::event::BoundaryCache;
use crate::format::DetectedFormat;

/// Explicit per-buffer context object.
///
/// One instance per buffer, created alongside it and destroyed with it,
/// passed by handle to the detector and resolver — never ambient state.
/// Each table sits behind its own narrow mutex; a lock is held for one
/// lookup-or-scan, never across I/O.
#[derive(Debug, Default)]
pub struct BufferContext {
    format: Mutex<Option<DetectedFormat>>,
    bounds: Mutex<BoundaryCache>,
}

impl BufferContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cached_format(&self) -> Option<DetectedFormat> {
        self.format.lock().clone()
    }

    pub(crate) fn store_format(&self, format: DetectedFormat) {
        *self.format.lock() = Some(format);
    }

    pub(crate) fn with_bounds<R>(&self, f: impl FnOnce(&mut BoundaryCache) -> R) -> R {
        f(&mut self.bounds.lock())
    }

    /// Drop everything derived from the buffer's content.
    ///
    /// The host must call this on a content reset (file reload) or any edit
    /// that can move line boundaries. The next query re-detects the format
    /// and re-scans boundaries from scratch.
    pub fn clear(&self) {
        *self.format.lock() = None;
        self.bounds.lock().clear();
    }
}
