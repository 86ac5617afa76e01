use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::trace;

use crate::buffer::LineIndexedText;
use crate::render::RenderSurface;

/// One chunk queued for the heavy filter pass.
pub struct HeavyRequest {
    pub surface: Arc<dyn RenderSurface>,
    /// Absolute buffer offset of the chunk's first byte.
    pub base_offset: usize,
    /// Ephemeral line-addressable copy of the chunk; heavy filters never
    /// touch the live buffer.
    pub chunk: LineIndexedText,
}

/// Single-slot pending-batch register for deferred work.
///
/// `schedule` merges a request into whatever batch is still waiting to be
/// picked up, so submissions in quick succession coalesce into one task
/// while every request still runs at least once. At most one heavy task is
/// outstanding at a time; there is no unbounded task queue.
#[derive(Clone)]
pub struct CoalescingWorker {
    inner: Arc<WorkerInner>,
}

struct WorkerInner {
    pending: Mutex<Vec<HeavyRequest>>,
    notify: Notify,
}

impl CoalescingWorker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(WorkerInner {
                pending: Mutex::new(Vec::new()),
                notify: Notify::new(),
            }),
        }
    }

    /// Merge `request` into the pending batch and wake the drain loop.
    pub fn schedule(&self, request: HeavyRequest) {
        let queued = {
            let mut pending = self.inner.pending.lock();
            pending.push(request);
            pending.len()
        };
        trace!(queued, "heavy pass request scheduled");
        self.inner.notify.notify_one();
    }

    /// Take the whole pending batch, leaving the slot empty.
    pub fn take_pending(&self) -> Vec<HeavyRequest> {
        std::mem::take(&mut *self.inner.pending.lock())
    }

    /// Spawn the drain loop on the current tokio runtime. Call once.
    ///
    /// Requests scheduled while a batch is being processed are picked up by
    /// the inner drain before the loop goes back to sleep.
    pub fn start<F>(&self, process: F)
    where
        F: Fn(HeavyRequest) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            loop {
                inner.notify.notified().await;
                loop {
                    let batch = std::mem::take(&mut *inner.pending.lock());
                    if batch.is_empty() {
                        break;
                    }
                    for request in batch {
                        process(request);
                    }
                }
            }
        });
    }
}

impl Default for CoalescingWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HighlightLayer, LinkTarget, SurfaceId, TextAttributes};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct DummySurface;
    impl RenderSurface for DummySurface {
        fn id(&self) -> SurfaceId {
            SurfaceId(0)
        }
        fn is_live(&self) -> bool {
            true
        }
        fn add_highlight(
            &self,
            _start: usize,
            _end: usize,
            _attributes: Option<TextAttributes>,
            _layer: HighlightLayer,
        ) {
        }
        fn add_hyperlink(
            &self,
            _start: usize,
            _end: usize,
            _attributes: Option<TextAttributes>,
            _target: Arc<dyn LinkTarget>,
        ) {
        }
        fn run_serialized(&self, task: Box<dyn FnOnce() + Send + 'static>) {
            task();
        }
    }

    fn request(base_offset: usize) -> HeavyRequest {
        HeavyRequest {
            surface: Arc::new(DummySurface),
            base_offset,
            chunk: LineIndexedText::new("x\n".to_string()),
        }
    }

    #[test]
    fn test_schedule_coalesces_into_one_batch() {
        let worker = CoalescingWorker::new();
        worker.schedule(request(0));
        worker.schedule(request(10));
        worker.schedule(request(20));

        let batch = worker.take_pending();
        assert_eq!(batch.len(), 3);
        let offsets: Vec<usize> = batch.iter().map(|r| r.base_offset).collect();
        assert_eq!(offsets, vec![0, 10, 20]);

        assert!(worker.take_pending().is_empty());
    }

    #[tokio::test]
    async fn test_drain_loop_processes_all_requests() {
        let worker = CoalescingWorker::new();
        let processed = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&processed);
        worker.start(move |_request| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        worker.schedule(request(0));
        worker.schedule(request(10));

        for _ in 0..100 {
            if processed.load(Ordering::SeqCst) == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(processed.load(Ordering::SeqCst), 2);
    }
}
