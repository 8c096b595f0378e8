//! Loading gate implementation

use pin_project_lite::pin_project;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::watch;
use tracing::trace;

/// Owner of an externally observable loading flag
pub trait LoadingOwner: Send + Sync {
    /// Raise or lower the loading flag
    fn set_loading(&self, loading: bool);
}

/// Observable loading flag
///
/// Cloning yields a handle to the same flag.
#[derive(Clone)]
pub struct LoadingState {
    tx: Arc<watch::Sender<bool>>,
}

impl LoadingState {
    /// Create a lowered flag
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Current flag value
    pub fn is_loading(&self) -> bool {
        *self.tx.borrow()
    }

    /// Subscribe to flag changes
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingOwner for LoadingState {
    fn set_loading(&self, loading: bool) {
        self.tx.send_replace(loading);
    }
}

impl fmt::Debug for LoadingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingState")
            .field("loading", &self.is_loading())
            .finish()
    }
}

/// Decorator that ties a loading flag to the lifetime of a future
///
/// Several gates may share one owner; the flag then reflects whichever
/// gated future finished last.
#[derive(Clone)]
pub struct LoadingGate {
    owner: Arc<dyn LoadingOwner>,
}

impl LoadingGate {
    /// Create a gate for the given owner
    pub fn new(owner: Arc<dyn LoadingOwner>) -> Self {
        Self { owner }
    }

    /// Wrap a future
    ///
    /// The flag goes up on the first poll and comes down exactly once when
    /// the future completes or the wrapper is dropped. A wrapper dropped
    /// before its first poll never touches the flag.
    pub fn run<F: Future>(&self, future: F) -> Gated<F> {
        Gated {
            inner: future,
            owner: Arc::clone(&self.owner),
            phase: Phase::Idle,
        }
    }
}

impl fmt::Debug for LoadingGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingGate").finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Finished,
}

pin_project! {
    /// Future returned by [`LoadingGate::run`]
    pub struct Gated<F> {
        #[pin]
        inner: F,
        owner: Arc<dyn LoadingOwner>,
        phase: Phase,
    }

    impl<F> PinnedDrop for Gated<F> {
        fn drop(this: Pin<&mut Self>) {
            let this = this.project();
            if *this.phase == Phase::Running {
                trace!("gated work dropped before completion");
                this.owner.set_loading(false);
            }
        }
    }
}

impl<F: Future> Future for Gated<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        if *this.phase == Phase::Idle {
            trace!("loading started");
            this.owner.set_loading(true);
            *this.phase = Phase::Running;
        }

        match this.inner.poll(cx) {
            Poll::Ready(output) => {
                if *this.phase == Phase::Running {
                    trace!("loading finished");
                    this.owner.set_loading(false);
                    *this.phase = Phase::Finished;
                }
                Poll::Ready(output)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
