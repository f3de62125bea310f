//! Quiet-period debouncing for rapidly-changing input values.
//!
//! A burst of updates collapses to a single delivery of the final value once
//! the input has been stable for the configured delay. Used by the search
//! controller to turn keystroke-rate query updates into request-rate triggers.

use std::time::Duration;

use tokio::sync::mpsc;

/// Feeding side of a debouncer. Cheap to clone.
#[derive(Clone)]
pub struct DebounceInput<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> DebounceInput<T> {
    /// Push a new value, restarting the quiet-period timer.
    ///
    /// Returns `false` if the debouncer has been shut down.
    pub fn send(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Receiving side of a debouncer: yields only settled values.
pub struct DebounceOutput<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> DebounceOutput<T> {
    /// Wait for the next settled value. `None` once the input is dropped.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

/// Create a debouncer with the given quiet period.
///
/// Values fed into the input are held until no newer value arrives for
/// `delay`; only then is the latest value delivered on the output. Dropping
/// the input tears the debouncer down: a pending value is discarded rather
/// than flushed, so nothing fires after teardown.
pub fn debounce<T: Send + 'static>(delay: Duration) -> (DebounceInput<T>, DebounceOutput<T>) {
    let (in_tx, mut in_rx) = mpsc::unbounded_channel::<T>();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<T>();

    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            match pending.take() {
                None => match in_rx.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                },
                Some(value) => {
                    tokio::select! {
                        next = in_rx.recv() => match next {
                            // A newer value supersedes the held one; timer restarts.
                            Some(next) => pending = Some(next),
                            None => break,
                        },
                        _ = tokio::time::sleep(delay) => {
                            if out_tx.send(value).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }
    });

    (DebounceInput { tx: in_tx }, DebounceOutput { rx: out_rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_single_value_settles_after_delay() {
        let (input, mut output) = debounce::<String>(DELAY);
        input.send("dune".to_string());

        let settled = output.recv().await;
        assert_eq!(settled.as_deref(), Some("dune"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let (input, mut output) = debounce::<String>(DELAY);

        for q in ["d", "du", "dun", "dune"] {
            input.send(q.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let settled = output.recv().await;
        assert_eq!(settled.as_deref(), Some("dune"));

        // Nothing else is delivered for the burst.
        tokio::time::sleep(DELAY * 2).await;
        let extra = tokio::time::timeout(Duration::from_millis(10), output.recv()).await;
        assert!(extra.is_err(), "burst must produce exactly one delivery");
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_settle() {
        let (input, mut output) = debounce::<u32>(DELAY);

        input.send(1);
        assert_eq!(output.recv().await, Some(1));

        input.send(2);
        input.send(3);
        assert_eq!(output.recv().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_input_discards_pending_value() {
        let (input, mut output) = debounce::<u32>(DELAY);

        input.send(42);
        drop(input);

        // The pending value must not be flushed on teardown.
        assert_eq!(output.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_after_teardown_reports_closed() {
        let (input, output) = debounce::<u32>(DELAY);
        drop(output);

        input.send(1);
        // Give the task a chance to observe the closed output.
        tokio::time::sleep(DELAY * 2).await;
        assert!(!input.send(2));
    }
}
