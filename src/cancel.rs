//! Cooperative cancellation signal
//!
//! A [`CancellationSignal`] is owned by the caller for the duration of one
//! search execution. The orchestrator only reads it (`is_cancelled`) and
//! subscribes to it (`on_cancel`); it never cancels the signal itself.
//!
//! One signal must back at most one in-flight
//! [`execute_job_result`](crate::SearchOrchestrator::execute_job_result)
//! call at a time. Sharing a signal across two concurrent executions is a
//! caller error and is not defended against here.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type Listener = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct SignalState {
    cancelled: AtomicBool,
    next_id: AtomicU64,
    listeners: Mutex<HashMap<u64, Listener>>,
}

/// Shared cancellation token. Cheap to clone; all clones observe the same
/// cancellation. Fires each registered listener at most once.
#[derive(Clone, Default)]
pub struct CancellationSignal {
    state: Arc<SignalState>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `cancel` has been requested. Idempotent to re-check.
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Request cancellation. Safe to call more than once; listeners
    /// registered at the time of the first call fire exactly once.
    pub fn cancel(&self) {
        if self.state.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        let listeners = {
            let mut map = self
                .state
                .listeners
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::take(&mut *map)
        };
        for (_, listener) in listeners {
            listener();
        }
    }

    /// Register a listener to run when the signal is cancelled.
    ///
    /// If the signal is already cancelled the listener runs immediately, so
    /// a cancellation landing between an `is_cancelled` check and this
    /// registration is never lost. Dropping the returned subscription
    /// unregisters the listener.
    pub fn on_cancel<F>(&self, listener: F) -> CancelSubscription
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.state.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut map = self
                .state
                .listeners
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            // Checked under the lock: `cancel` drains the map while holding it,
            // so either the insert lands before the drain or we observe the flag.
            if !self.state.cancelled.load(Ordering::SeqCst) {
                map.insert(id, Box::new(listener));
                return CancelSubscription {
                    state: Arc::clone(&self.state),
                    id,
                };
            }
        }
        listener();
        CancelSubscription {
            state: Arc::clone(&self.state),
            id,
        }
    }

    /// Number of currently registered listeners. Diagnostic; lets tests
    /// verify that repeated executions do not accumulate listeners.
    pub fn listener_count(&self) -> usize {
        self.state
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl std::fmt::Debug for CancellationSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationSignal")
            .field("cancelled", &self.is_cancelled())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// RAII guard for a registered cancellation listener. Dropping it removes
/// the listener, which is how the orchestrator guarantees unregistration on
/// every exit path.
pub struct CancelSubscription {
    state: Arc<SignalState>,
    id: u64,
}

impl CancelSubscription {
    /// Explicitly remove the listener. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl Drop for CancelSubscription {
    fn drop(&mut self) {
        self.state
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.id);
    }
}

impl std::fmt::Debug for CancelSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelSubscription").field("id", &self.id).finish()
    }
}
