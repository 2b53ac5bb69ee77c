//! Deadline wrapper for outbound calls.
//!
//! [`TimeoutManager`] races a call against a deadline. When the deadline wins,
//! the abort handle registered for the call is signalled exactly once and the
//! call fails with [`GymError::Timeout`], which callers treat like any other
//! network failure. There is no automatic retry.
//!
//! The manager is an explicit shared object. [`TimeoutManager::teardown`]
//! aborts everything still in flight and must run on logout and shutdown so
//! no timer outlives the screen that started it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{GymError, Result};

/// Default deadline for remote calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Something that can cancel an underlying request.
pub trait Abort: Send + Sync {
    fn abort(&self);
}

impl Abort for CancellationToken {
    fn abort(&self) {
        self.cancel();
    }
}

impl Abort for tokio::task::AbortHandle {
    fn abort(&self) {
        tokio::task::AbortHandle::abort(self);
    }
}

struct InFlight {
    label: String,
    abort: Option<Arc<dyn Abort>>,
}

pub struct TimeoutManager {
    in_flight: Mutex<HashMap<Uuid, InFlight>>,
    shutdown: Mutex<CancellationToken>,
    default_timeout: Duration,
}

impl TimeoutManager {
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
            shutdown: Mutex::new(CancellationToken::new()),
            default_timeout,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<Uuid, InFlight>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn shutdown_token(&self) -> CancellationToken {
        self.shutdown
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of calls currently waiting on a deadline.
    pub fn pending(&self) -> usize {
        self.registry().len()
    }

    /// Runs `call` with the default deadline.
    pub async fn run<F, T>(&self, label: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.run_with(label, self.default_timeout, None, call).await
    }

    /// Runs `call` with an explicit deadline and optional abort handle.
    ///
    /// `abort` is signalled exactly once if the deadline passes or the
    /// manager is torn down first; it is never signalled for a call that
    /// completes in time.
    pub async fn run_with<F, T>(
        &self,
        label: &str,
        timeout: Duration,
        abort: Option<Arc<dyn Abort>>,
        call: F,
    ) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let id = Uuid::new_v4();
        let shutdown = self.shutdown_token();
        self.registry().insert(
            id,
            InFlight {
                label: label.to_string(),
                abort,
            },
        );

        let outcome = tokio::select! {
            result = tokio::time::timeout(timeout, call) => Some(result),
            _ = shutdown.cancelled() => None,
        };

        // Teardown drains the registry itself, so a missing entry means the
        // abort has already been signalled.
        let registered = self.registry().remove(&id);

        match outcome {
            Some(Ok(result)) => result,
            Some(Err(_elapsed)) => {
                let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(label, after_ms, "request timed out");
                if let Some(abort) = registered.and_then(|entry| entry.abort) {
                    abort.abort();
                }
                Err(GymError::timeout(after_ms))
            }
            None => Err(GymError::Cancelled(label.to_string())),
        }
    }

    /// Aborts every in-flight call and fails their pending waits.
    ///
    /// The manager stays usable: calls started afterwards get a fresh
    /// shutdown signal.
    pub fn teardown(&self) {
        let previous = {
            let mut shutdown = self
                .shutdown
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::replace(&mut *shutdown, CancellationToken::new())
        };

        let drained: Vec<InFlight> = self.registry().drain().map(|(_, entry)| entry).collect();
        if !drained.is_empty() {
            tracing::info!(count = drained.len(), "aborting in-flight requests");
        }
        for entry in drained {
            tracing::debug!(label = %entry.label, "aborting request on teardown");
            if let Some(abort) = entry.abort {
                abort.abort();
            }
        }
        previous.cancel();
    }
}

impl Default for TimeoutManager {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingAbort {
        calls: AtomicUsize,
    }

    impl Abort for CountingAbort {
        fn abort(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_resolving_call_times_out() {
        let manager = TimeoutManager::default();
        let abort = Arc::new(CountingAbort::default());
        let started = tokio::time::Instant::now();

        let result: Result<()> = manager
            .run_with(
                "students.list",
                Duration::from_millis(100),
                Some(abort.clone()),
                std::future::pending(),
            )
            .await;

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert!(err.is_network());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(110));
        assert_eq!(abort.calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_call_is_not_aborted() {
        let manager = TimeoutManager::default();
        let abort = Arc::new(CountingAbort::default());

        let value = manager
            .run_with("exercises.list", Duration::from_millis(100), Some(abort.clone()), async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(42)
            })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(abort.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inner_error_passes_through() {
        let manager = TimeoutManager::default();
        let result: Result<()> = manager
            .run("students.get", async { Err(GymError::not_found("student", "s-1")) })
            .await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_aborts_in_flight_calls_once() {
        let manager = Arc::new(TimeoutManager::default());
        let abort = Arc::new(CountingAbort::default());

        let task = {
            let manager = manager.clone();
            let abort: Arc<dyn Abort> = abort.clone();
            tokio::spawn(async move {
                manager
                    .run_with(
                        "workouts.list",
                        Duration::from_secs(30),
                        Some(abort),
                        std::future::pending::<Result<()>>(),
                    )
                    .await
            })
        };

        tokio::task::yield_now().await;
        assert_eq!(manager.pending(), 1);

        manager.teardown();
        let result = task.await.unwrap();

        assert!(matches!(result, Err(GymError::Cancelled(_))));
        assert_eq!(abort.calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.pending(), 0);

        // still usable after teardown
        let value = manager.run("after", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }
}
