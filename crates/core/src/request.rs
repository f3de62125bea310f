//! Cancelable request envelopes.
//!
//! A `RequestEnvelope` owns at most one logically-current async request.
//! Starting a new request supersedes (cancels) the previous one from the same
//! envelope, and a canceled request can never hand its result back to the
//! caller, so stale responses are structurally unable to reach shared state.

use std::future::Future;
use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::watch;

/// Marker error for a superseded or explicitly aborted request.
///
/// Callers are expected to swallow this silently; it is not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request canceled")]
pub struct Canceled;

/// Cooperative cancellation signal handed to request factories.
///
/// The envelope already races the request future against this signal and
/// drops it on cancellation (which aborts an in-flight reqwest transfer), so
/// checking the signal is optional; it exists for factories that want to bail
/// out early between suspension points.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Whether cancellation has been requested.
    pub fn is_canceled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is requested.
    pub async fn canceled(&mut self) {
        if *self.rx.borrow() {
            return;
        }
        // A closed channel means the envelope moved on, which also counts
        // as cancellation.
        let _ = self.rx.wait_for(|canceled| *canceled).await;
    }

    /// A signal that never fires. Useful for tests and direct client calls.
    pub fn never() -> Self {
        static NEVER: once_cell::sync::Lazy<watch::Sender<bool>> =
            once_cell::sync::Lazy::new(|| watch::channel(false).0);
        Self {
            rx: NEVER.subscribe(),
        }
    }
}

struct Current {
    generation: u64,
    cancel: Option<watch::Sender<bool>>,
}

/// Owner of the most recent request of one kind.
///
/// At most one request per envelope is current; `start` cancels the previous
/// request before launching the new one, and `cancel` aborts without
/// replacement.
pub struct RequestEnvelope {
    current: Mutex<Current>,
}

impl Default for RequestEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestEnvelope {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Current {
                generation: 0,
                cancel: None,
            }),
        }
    }

    /// Run a request, canceling any previous request from this envelope.
    ///
    /// The factory receives a [`CancelSignal`] and returns the request
    /// future. If this request is superseded by a newer `start` or aborted
    /// via [`cancel`](Self::cancel) before completion, the future is dropped
    /// and `Err(Canceled)` is returned; the factory's output is otherwise
    /// passed through untouched.
    pub async fn start<F, Fut, T>(&self, factory: F) -> Result<T, Canceled>
    where
        F: FnOnce(CancelSignal) -> Fut,
        Fut: Future<Output = T>,
    {
        let (tx, rx) = watch::channel(false);
        let my_generation = {
            let mut current = self.current.lock().unwrap();
            if let Some(previous) = current.cancel.replace(tx) {
                let _ = previous.send(true);
            }
            current.generation += 1;
            current.generation
        };

        let mut signal = CancelSignal { rx: rx.clone() };
        let fut = factory(CancelSignal { rx });

        // Biased so that a cancellation arriving in the same poll cycle as
        // the response still discards the response.
        let result = tokio::select! {
            biased;
            _ = signal.canceled() => Err(Canceled),
            output = fut => Ok(output),
        };

        // Clear our token only if a newer request hasn't replaced it.
        let mut current = self.current.lock().unwrap();
        if current.generation == my_generation {
            current.cancel = None;
        }

        result
    }

    /// Cancel the current request, if any, without starting a new one.
    pub fn cancel(&self) {
        let mut current = self.current.lock().unwrap();
        if let Some(token) = current.cancel.take() {
            let _ = token.send(true);
        }
    }

    /// Whether a request is currently in flight.
    pub fn is_pending(&self) -> bool {
        self.current.lock().unwrap().cancel.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::oneshot;
    use tokio_test::assert_ok;

    use super::*;

    #[tokio::test]
    async fn test_completed_request_returns_output() {
        let envelope = RequestEnvelope::new();
        let result = envelope.start(|_signal| async { 7u32 }).await;
        tokio_test::assert_ok!(result);
        assert_eq!(result, Ok(7));
        assert!(!envelope.is_pending());
    }

    #[tokio::test]
    async fn test_new_start_cancels_previous() {
        let envelope = Arc::new(RequestEnvelope::new());
        let (unblock_tx, unblock_rx) = oneshot::channel::<()>();

        let first = {
            let envelope = Arc::clone(&envelope);
            tokio::spawn(async move {
                envelope
                    .start(|_signal| async move {
                        let _ = unblock_rx.await;
                        1u32
                    })
                    .await
            })
        };

        // Let the first request get in flight before superseding it.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = envelope.start(|_signal| async { 2u32 }).await;
        assert_eq!(second, Ok(2));

        // Unblocking the first is irrelevant: it was already canceled.
        let _ = unblock_tx.send(());
        assert_eq!(first.await.unwrap(), Err(Canceled));
    }

    #[tokio::test]
    async fn test_explicit_cancel() {
        let envelope = Arc::new(RequestEnvelope::new());

        let pending = {
            let envelope = Arc::clone(&envelope);
            tokio::spawn(async move {
                envelope
                    .start(|_signal| async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        1u32
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(envelope.is_pending());
        envelope.cancel();

        assert_eq!(pending.await.unwrap(), Err(Canceled));
        assert!(!envelope.is_pending());
    }

    #[tokio::test]
    async fn test_cancel_without_pending_request_is_noop() {
        let envelope = RequestEnvelope::new();
        envelope.cancel();
        assert!(!envelope.is_pending());

        let result = envelope.start(|_signal| async { 3u32 }).await;
        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_canceled_factory_output_is_discarded() {
        let envelope = Arc::new(RequestEnvelope::new());

        let pending = {
            let envelope = Arc::clone(&envelope);
            tokio::spawn(async move {
                envelope
                    .start(|mut signal| async move {
                        signal.canceled().await;
                        signal.is_canceled()
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        envelope.cancel();

        // Even though the factory resolves once canceled, the envelope wins
        // the (biased) race and discards the output.
        assert_eq!(pending.await.unwrap(), Err(Canceled));
    }

    #[tokio::test]
    async fn test_envelope_pending_until_completion() {
        let envelope = Arc::new(RequestEnvelope::new());
        let (unblock_tx, unblock_rx) = oneshot::channel::<()>();

        let request = {
            let envelope = Arc::clone(&envelope);
            tokio::spawn(async move {
                envelope
                    .start(|_signal| async move {
                        let _ = unblock_rx.await;
                        2u32
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(envelope.is_pending());

        let _ = unblock_tx.send(());
        assert_eq!(request.await.unwrap(), Ok(2));
        assert!(!envelope.is_pending());
    }

    #[test]
    fn test_never_signal_is_not_canceled() {
        let signal = CancelSignal::never();
        assert!(!signal.is_canceled());
    }
}
