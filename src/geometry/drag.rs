//! Rectangle-drag tracking for the signature preview.
//!
//! While the pointer is held down a tokio task samples the pointer position on
//! a fixed interval and republishes it as the rectangle's current end point.
//! Releasing the pointer cancels the task; once `release` returns no further
//! samples are taken.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use super::transform::ViewPoint;
use crate::collaborators::PointerSource;

/// Default pointer sampling interval
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Cancellation signal shared between a task and its owner
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal cancellation; later calls are no-ops
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            let cancelled = *rx.borrow_and_update();
            if cancelled {
                return;
            }
            // The sender lives in `self`, so the channel cannot close underneath us
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-progress drag on the preview surface
pub struct DragTracker {
    origin: ViewPoint,
    cancel: CancelToken,
    end_rx: watch::Receiver<ViewPoint>,
    task: Option<JoinHandle<()>>,
}

impl DragTracker {
    /// Start tracking a drag that began at `origin`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(origin: ViewPoint, pointer: Arc<dyn PointerSource>, interval: Duration) -> Self {
        let cancel = CancelToken::new();
        let (end_tx, end_rx) = watch::channel(origin);

        debug!(?origin, ?interval, "drag started");
        let task = tokio::spawn(sample_pointer(pointer, interval, cancel.clone(), end_tx));

        Self {
            origin,
            cancel,
            end_rx,
            task: Some(task),
        }
    }

    pub fn origin(&self) -> ViewPoint {
        self.origin
    }

    /// Most recently sampled end point
    pub fn current_end(&self) -> ViewPoint {
        *self.end_rx.borrow()
    }

    /// Receiver notified on every new end point, for repainting
    pub fn subscribe(&self) -> watch::Receiver<ViewPoint> {
        self.end_rx.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Pointer released: stop sampling and return `(origin, end)`
    pub async fn release(mut self) -> (ViewPoint, ViewPoint) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("drag sampling task ended abnormally: {}", e);
            }
        }
        let end = *self.end_rx.borrow();
        debug!(origin = ?self.origin, ?end, "drag released");
        (self.origin, end)
    }
}

impl Drop for DragTracker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn sample_pointer(
    pointer: Arc<dyn PointerSource>,
    interval: Duration,
    cancel: CancelToken,
    end_tx: watch::Sender<ViewPoint>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // First tick completes immediately; the first sample comes one interval in
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if cancel.is_cancelled() {
                    break;
                }
                if let Some(point) = pointer.position() {
                    trace!(?point, "pointer sampled");
                    end_tx.send_replace(point);
                }
            }
        }
    }
}
