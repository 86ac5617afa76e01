use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::buffer::{LineIndexedText, TextBuffer};
use crate::render::{RenderSurface, SurfaceId};

use super::model::Annotation;
use super::traits::AnnotationFilter;
use super::worker::{CoalescingWorker, HeavyRequest};

/// Per-surface set of chunk offsets already submitted for filtering.
///
/// Monotonically grows; an offset is inserted before its filters run, which
/// makes enqueuing at-most-once even under concurrent submission. Each view
/// over a buffer keeps its own independent set.
#[derive(Debug, Default)]
pub struct ProcessedOffsets {
    inner: Mutex<HashSet<usize>>,
}

impl ProcessedOffsets {
    /// Record `offset` as submitted. Returns false if it was already there.
    pub fn mark(&self, offset: usize) -> bool {
        self.inner.lock().insert(offset)
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.inner.lock().contains(&offset)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[derive(Debug, Default)]
struct SchedulerStats {
    chunks_submitted: AtomicU64,
    chunks_deduplicated: AtomicU64,
    annotations_applied: AtomicU64,
    heavy_runs: AtomicU64,
}

struct SchedulerInner {
    filters: Vec<Arc<dyn AnnotationFilter>>,
    processed: DashMap<SurfaceId, Arc<ProcessedOffsets>>,
    stats: SchedulerStats,
    heavy_enabled: bool,
}

/// Applies registered filters to incoming text chunks in two tiers.
///
/// Cheap filters run per line on the calling context; heavy filters run on
/// a coalescing background worker over an ephemeral copy of the chunk.
/// Submission is deduplicated per surface by the chunk's starting offset —
/// re-submitting an identical chunk is a safe no-op. It is the caller's
/// contract never to submit two different chunks sharing a starting offset.
///
/// All annotation application is marshaled through the surface's
/// serialized update mechanism with a liveness re-check directly before it;
/// a torn-down surface silently ends the remaining work of a call.
pub struct FilterScheduler {
    inner: Arc<SchedulerInner>,
    worker: CoalescingWorker,
}

impl FilterScheduler {
    /// Build a scheduler closed over a fixed, ordered filter list. The
    /// composition root decides the list once; it never changes afterwards.
    pub fn new(filters: Vec<Arc<dyn AnnotationFilter>>, heavy_enabled: bool) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                filters,
                processed: DashMap::new(),
                stats: SchedulerStats::default(),
                heavy_enabled,
            }),
            worker: CoalescingWorker::new(),
        }
    }

    /// Spawn the heavy-pass drain loop on the current tokio runtime.
    /// Hosts driving their own scheduling skip this and call
    /// [`FilterScheduler::run_pending_heavy`] instead.
    pub fn start(&self) {
        let inner = Arc::clone(&self.inner);
        self.worker.start(move |request| process_heavy(&inner, request));
    }

    /// Drain and process the pending heavy batch on the calling thread.
    pub fn run_pending_heavy(&self) {
        for request in self.worker.take_pending() {
            process_heavy(&self.inner, request);
        }
    }

    /// Feed one chunk of new text, anchored at its absolute buffer offset,
    /// through both filter tiers for `surface`.
    pub fn submit(&self, surface: &Arc<dyn RenderSurface>, text_offset: usize, chunk: &str) {
        let stats = &self.inner.stats;
        stats.chunks_submitted.fetch_add(1, Ordering::Relaxed);

        if !surface.is_live() {
            return;
        }

        let offsets = self
            .inner
            .processed
            .entry(surface.id())
            .or_default()
            .clone();
        if !offsets.mark(text_offset) {
            stats.chunks_deduplicated.fetch_add(1, Ordering::Relaxed);
            trace!(offset = text_offset, "chunk already processed, skipping");
            return;
        }

        // Cheap pass: per line, on the calling context. The running offset
        // advances by line length plus one newline.
        let mut annotations = Vec::new();
        let mut running = 0usize;
        for line in chunk.split('\n') {
            for filter in &self.inner.filters {
                match filter.apply_line(line) {
                    Ok(results) => {
                        for result in results {
                            annotations.push(Annotation::from_result(result, text_offset + running));
                        }
                    }
                    Err(e) => warn!(
                        filter = filter.name(),
                        offset = text_offset + running,
                        error = %e,
                        "cheap filter failed, skipping its result for this line"
                    ),
                }
            }
            running += line.len() + 1;
        }
        apply_batch(&self.inner, surface, annotations);

        // Heavy pass: enqueue after the cheap annotations were handed to the
        // surface's update mechanism.
        if self.inner.heavy_enabled {
            self.worker.schedule(HeavyRequest {
                surface: Arc::clone(surface),
                base_offset: text_offset,
                chunk: LineIndexedText::new(chunk.to_string()),
            });
        }
    }

    /// Drop the dedup state of a torn-down surface.
    pub fn release_surface(&self, id: SurfaceId) {
        self.inner.processed.remove(&id);
    }

    /// (submitted, deduplicated, annotations applied, heavy runs)
    pub fn stats(&self) -> (u64, u64, u64, u64) {
        let stats = &self.inner.stats;
        (
            stats.chunks_submitted.load(Ordering::Relaxed),
            stats.chunks_deduplicated.load(Ordering::Relaxed),
            stats.annotations_applied.load(Ordering::Relaxed),
            stats.heavy_runs.load(Ordering::Relaxed),
        )
    }
}

/// Run the heavy filter chain over one queued chunk copy and hand the
/// rebased annotations to the surface.
fn process_heavy(inner: &Arc<SchedulerInner>, request: HeavyRequest) {
    if !request.surface.is_live() {
        trace!(offset = request.base_offset, "surface gone, dropping heavy pass");
        return;
    }

    // Capability check before any expensive work.
    let heavy: Vec<&Arc<dyn AnnotationFilter>> = inner
        .filters
        .iter()
        .filter(|f| f.should_run_heavy())
        .collect();
    if heavy.is_empty() {
        return;
    }

    inner.stats.heavy_runs.fetch_add(1, Ordering::Relaxed);

    let mut annotations = Vec::new();
    for line in 0..request.chunk.line_count() {
        for filter in &heavy {
            match filter.apply_heavy(&request.chunk, line) {
                Ok(Some(result)) => {
                    annotations.push(Annotation::from_result(result, request.base_offset));
                }
                Ok(None) => {}
                Err(e) => warn!(
                    filter = filter.name(),
                    line,
                    offset = request.base_offset,
                    error = %e,
                    "heavy filter failed, skipping its result for this line"
                ),
            }
        }
    }
    apply_batch(inner, &request.surface, annotations);
}

/// Marshal a batch of annotations onto the surface's serialized update
/// mechanism, re-checking liveness immediately before applying.
fn apply_batch(
    inner: &Arc<SchedulerInner>,
    surface: &Arc<dyn RenderSurface>,
    annotations: Vec<Annotation>,
) {
    if annotations.is_empty() || !surface.is_live() {
        return;
    }
    let target = Arc::clone(surface);
    let stats_owner = Arc::clone(inner);
    surface.run_serialized(Box::new(move || {
        if !target.is_live() {
            return;
        }
        let applied = annotations.len() as u64;
        for annotation in annotations {
            annotation.apply(&*target);
        }
        stats_owner
            .stats
            .annotations_applied
            .fetch_add(applied, Ordering::Relaxed);
    }));
}
