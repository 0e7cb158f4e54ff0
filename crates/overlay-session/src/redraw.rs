//! Latest-wins redraw scheduling.
//!
//! Each call to [`RedrawScheduler::submit`] starts one pipeline run:
//!
//! ```text
//! submit(request)
//!      │
//!      ├─► validate parameters ─► reject (nothing cancelled)
//!      │
//!      ├─► cancel previous token, bump latest id
//!      │
//!      └─► spawn task
//!             │
//!             ├─► acquire base + intensity (async)
//!             │         └─► stage check: superseded? ─► discard
//!             │
//!             ├─► composite on a blocking thread
//!             │         (polls the token at its own stage boundaries)
//!             │
//!             └─► commit if still latest ─► watch channel
//! ```
//!
//! Cancellation is cooperative: a superseded run finishes whatever stage it
//! is in, then notices the cancelled token and drops its result. The commit
//! check runs inside the watch channel's lock, so a stale run can never
//! overwrite a newer frame.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use compositor::{composite_cancellable, CompositeRequest, CompositeResult};
use overlay_common::{Color, OverlayError, OverlayParams, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::loader::{acquire_pair, SourceLoader, SourcePair};

/// Monotonically increasing identity of a redraw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything that triggers a redraw when it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RedrawRequest {
    pub base: String,
    pub intensity: String,
    pub params: OverlayParams,
}

impl RedrawRequest {
    pub fn new(base: impl Into<String>, intensity: impl Into<String>, params: OverlayParams) -> Self {
        Self {
            base: base.into(),
            intensity: intensity.into(),
            params,
        }
    }
}

/// A composite that was committed for display.
#[derive(Debug, Clone)]
pub struct DeliveredFrame {
    pub id: RequestId,
    pub request: RedrawRequest,
    pub result: CompositeResult,
}

/// How a redraw run ended, when it did not fail.
#[derive(Debug, Clone)]
pub enum RedrawOutcome {
    /// The result was committed as the latest frame.
    Delivered(Arc<DeliveredFrame>),
    /// A newer request replaced this one; its result was dropped.
    Superseded,
}

impl RedrawOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    pub fn frame(&self) -> Option<&Arc<DeliveredFrame>> {
        match self {
            Self::Delivered(frame) => Some(frame),
            Self::Superseded => None,
        }
    }
}

/// Handle to one in-flight redraw.
#[derive(Debug)]
pub struct RedrawHandle {
    id: RequestId,
    token: CancellationToken,
    task: JoinHandle<Result<RedrawOutcome>>,
}

impl RedrawHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Mark this run as superseded. It is dropped at its next stage check.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the run to end.
    pub async fn wait(self) -> Result<RedrawOutcome> {
        self.task
            .await
            .map_err(|e| OverlayError::Internal(format!("redraw task {} failed: {}", self.id, e)))?
    }
}

struct Inner<L> {
    loader: L,
    highlight: Color,
    latest: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
    frames: watch::Sender<Option<Arc<DeliveredFrame>>>,
}

impl<L> Inner<L> {
    /// Publish `frame` if its request is still the latest and not cancelled.
    ///
    /// The check runs under the watch channel's lock.
    fn commit(&self, frame: &Arc<DeliveredFrame>, token: &CancellationToken) -> bool {
        self.frames.send_if_modified(|slot| {
            let still_latest =
                self.latest.load(Ordering::SeqCst) == frame.id.0 && !token.is_cancelled();
            if still_latest {
                *slot = Some(frame.clone());
            }
            still_latest
        })
    }
}

/// Runs one compositing pipeline per redraw request and publishes only the
/// newest request's result.
pub struct RedrawScheduler<L> {
    inner: Arc<Inner<L>>,
}

impl<L> Clone for RedrawScheduler<L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<L: SourceLoader + 'static> RedrawScheduler<L> {
    pub fn new(loader: L) -> Self {
        Self::with_highlight(loader, Color::HIGHLIGHT)
    }

    pub fn with_highlight(loader: L, highlight: Color) -> Self {
        let (frames, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                loader,
                highlight,
                latest: AtomicU64::new(0),
                current: Mutex::new(None),
                frames,
            }),
        }
    }

    /// Receiver that observes every committed frame.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DeliveredFrame>>> {
        self.inner.frames.subscribe()
    }

    /// The most recently committed frame, if any.
    pub fn latest_frame(&self) -> Option<Arc<DeliveredFrame>> {
        self.inner.frames.borrow().clone()
    }

    /// Id of the newest submitted request.
    pub fn latest_id(&self) -> RequestId {
        RequestId(self.inner.latest.load(Ordering::SeqCst))
    }

    /// Start a redraw, superseding any request still in flight.
    ///
    /// Parameters are validated first; an invalid request fails here and
    /// leaves the in-flight request untouched. Must be called from within a
    /// Tokio runtime.
    pub fn submit(&self, request: RedrawRequest) -> Result<RedrawHandle> {
        if let Err(err) = request.params.validate() {
            warn!(
                base = %request.base,
                intensity = %request.intensity,
                error = %err,
                "Rejected redraw request"
            );
            return Err(err);
        }

        let token = CancellationToken::new();
        let id = {
            let mut current = self
                .inner
                .current
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = current.replace(token.clone()) {
                previous.cancel();
            }
            RequestId(self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1)
        };

        info!(
            request_id = id.0,
            base = %request.base,
            intensity = %request.intensity,
            threshold = request.params.threshold,
            opacity = request.params.opacity,
            "Redraw requested"
        );

        let inner = self.inner.clone();
        let task_token = token.clone();
        let task = tokio::spawn(async move { run(inner, id, request, task_token).await });

        Ok(RedrawHandle { id, token, task })
    }

    /// Cancel whatever request is currently in flight.
    pub fn cancel_current(&self) {
        let current = self
            .inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = current.as_ref() {
            token.cancel();
        }
    }
}

async fn run<L: SourceLoader>(
    inner: Arc<Inner<L>>,
    id: RequestId,
    request: RedrawRequest,
    token: CancellationToken,
) -> Result<RedrawOutcome> {
    let start = Instant::now();

    let sources = match acquire_pair(&inner.loader, &request.base, &request.intensity).await {
        Ok(sources) => sources,
        Err(err) => {
            if token.is_cancelled() {
                debug!(request_id = id.0, error = %err, "Stale redraw failed acquisition");
            } else {
                warn!(request_id = id.0, error = %err, "Redraw acquisition failed");
            }
            return Err(err);
        }
    };

    if token.is_cancelled() {
        debug!(request_id = id.0, "Redraw superseded after acquisition");
        return Ok(RedrawOutcome::Superseded);
    }

    let result = match composite_stage(sources, request.params, inner.highlight, &token).await {
        Ok(Some(result)) => result,
        Ok(None) => {
            debug!(request_id = id.0, "Redraw superseded during compositing");
            return Ok(RedrawOutcome::Superseded);
        }
        Err(err) => {
            warn!(request_id = id.0, error = %err, "Redraw compositing failed");
            return Err(err);
        }
    };

    let frame = Arc::new(DeliveredFrame {
        id,
        request,
        result,
    });

    if !inner.commit(&frame, &token) {
        debug!(request_id = id.0, "Redraw superseded before commit");
        return Ok(RedrawOutcome::Superseded);
    }

    info!(
        request_id = id.0,
        width = frame.result.width(),
        height = frame.result.height(),
        anomalous_pixels = frame.result.anomalous_pixels(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Redraw delivered"
    );
    Ok(RedrawOutcome::Delivered(frame))
}

/// Composite `sources` on a blocking thread. `None` means the token was
/// cancelled at one of the pipeline's stage checks.
async fn composite_stage(
    sources: SourcePair,
    params: OverlayParams,
    highlight: Color,
    token: &CancellationToken,
) -> Result<Option<CompositeResult>> {
    let check = token.clone();
    let composited = tokio::task::spawn_blocking(move || {
        let SourcePair { base, intensity } = sources;
        let request = CompositeRequest::new(&base, &intensity, params).with_highlight(highlight);
        composite_cancellable(&request, || check.is_cancelled())
    })
    .await
    .map_err(|e| OverlayError::Internal(format!("compositing task failed: {}", e)))?;

    match composited {
        Ok(result) => Ok(Some(result)),
        Err(OverlayError::Cancelled) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use compositor::composite;
    use test_utils::{uniform_intensity, uniform_rgb};

    fn sample_pair() -> SourcePair {
        SourcePair {
            base: uniform_rgb(4, 4, [100, 100, 100]),
            intensity: uniform_intensity(4, 4, 200),
        }
    }

    fn frame(id: u64) -> Arc<DeliveredFrame> {
        let pair = sample_pair();
        let params = OverlayParams::new(0.5, 0.5);
        let result = composite(&CompositeRequest::new(&pair.base, &pair.intensity, params)).unwrap();
        Arc::new(DeliveredFrame {
            id: RequestId(id),
            request: RedrawRequest::new("base", "intensity", params),
            result,
        })
    }

    #[tokio::test]
    async fn test_composite_stage_stops_on_cancelled_token() {
        let token = CancellationToken::new();
        token.cancel();

        let outcome = composite_stage(sample_pair(), OverlayParams::new(0.5, 0.5), Color::HIGHLIGHT, &token)
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_composite_stage_returns_result() {
        let token = CancellationToken::new();

        let result = composite_stage(sample_pair(), OverlayParams::new(0.5, 0.5), Color::HIGHLIGHT, &token)
            .await
            .unwrap()
            .expect("composite result");
        assert_eq!(result.raster().pixel(0), &[178, 50, 50]);
    }

    #[test]
    fn test_commit_rejects_stale_id() {
        let scheduler = RedrawScheduler::new(MemoryLoader::new());
        scheduler.inner.latest.store(2, Ordering::SeqCst);

        let token = CancellationToken::new();
        assert!(!scheduler.inner.commit(&frame(1), &token));
        assert!(scheduler.latest_frame().is_none());

        assert!(scheduler.inner.commit(&frame(2), &token));
        assert_eq!(scheduler.latest_frame().unwrap().id, RequestId(2));
    }

    #[test]
    fn test_commit_rejects_cancelled_token() {
        let scheduler = RedrawScheduler::new(MemoryLoader::new());
        scheduler.inner.latest.store(1, Ordering::SeqCst);

        let token = CancellationToken::new();
        token.cancel();
        assert!(!scheduler.inner.commit(&frame(1), &token));
        assert!(scheduler.latest_frame().is_none());
    }

    #[test]
    fn test_stale_commit_keeps_newer_frame() {
        let scheduler = RedrawScheduler::new(MemoryLoader::new());
        let token = CancellationToken::new();

        scheduler.inner.latest.store(3, Ordering::SeqCst);
        assert!(scheduler.inner.commit(&frame(3), &token));

        assert!(!scheduler.inner.commit(&frame(2), &token));
        assert_eq!(scheduler.latest_frame().unwrap().id, RequestId(3));
    }
}
