//! Search orchestration - the public entry point of the crate
//!
//! [`SearchOrchestrator`] ties the pieces together: build an execution state
//! for a view, start the job over the transport, track it to completion
//! (cancellable or not), and wrap the raw job in a [`ResultEnvelope`].

use std::sync::Arc;

use tokio::sync::Notify;

use crate::cancel::CancellationSignal;
use crate::client::JobClient;
use crate::error::{Result, SearchJobsError};
use crate::execution::{SearchExecutionState, build_execution_state};
use crate::job::JobHandle;
use crate::result::{ResultEnvelope, SearchResult};
use crate::tracker::{poll_job, track_job_status};
use crate::view::View;

/// Orchestrates one search execution at a time over a shared transport.
///
/// The orchestrator itself is stateless; all per-execution state lives in
/// the futures it returns, so one instance can serve any number of
/// independent executions concurrently.
#[derive(Clone)]
pub struct SearchOrchestrator {
    client: Arc<dyn JobClient>,
}

impl SearchOrchestrator {
    pub fn new(client: Arc<dyn JobClient>) -> Self {
        Self { client }
    }

    /// Build the execution state for `view` and start a search job.
    ///
    /// Returns the handle used for all subsequent poll/cancel calls. The
    /// base `execution_state` is never mutated.
    pub async fn start_job(
        &self,
        view: &View,
        widget_ids: Option<&[String]>,
        execution_state: &SearchExecutionState,
        keep_queries: &[String],
    ) -> Result<JobHandle> {
        let state = build_execution_state(execution_state, view, widget_ids, keep_queries);
        let response = self.client.start(&view.search, &state).await?;
        tracing::debug!(
            job_id = %response.id,
            executing_node = %response.executing_node,
            "search job started"
        );
        Ok(response.into())
    }

    /// Poll a started job to completion, honoring the caller's cancellation
    /// signal, and wrap the final payload.
    ///
    /// Settles exactly once, with the first of {poll success, poll error,
    /// cancellation}. When cancellation wins while a fetch is in flight the
    /// fetch is not waited for; its result is discarded. The signal
    /// subscription is released on every exit path, so repeated calls with
    /// fresh signals never accumulate listeners.
    ///
    /// A signal that is already cancelled fails the call up front, with no
    /// transport call issued.
    pub async fn execute_job_result(
        &self,
        handle: &JobHandle,
        view: &View,
        signal: &CancellationSignal,
    ) -> Result<ResultEnvelope> {
        if signal.is_cancelled() {
            return Err(SearchJobsError::Cancelled);
        }

        let cancelled = Arc::new(Notify::new());
        let notify = Arc::clone(&cancelled);
        // If the signal fires between the check above and this registration,
        // the listener runs immediately and the permit is already stored by
        // the time the race below starts.
        let subscription = signal.on_cancel(move || notify.notify_one());

        let outcome = tokio::select! {
            biased;
            _ = cancelled.notified() => {
                tracing::debug!(job_id = %handle.job_id, "search execution cancelled");
                Err(SearchJobsError::Cancelled)
            }
            polled = poll_job(self.client.as_ref(), handle, None, signal) => {
                polled.map(|job| ResultEnvelope {
                    widget_mapping: view.widget_mapping.clone(),
                    result: SearchResult::new(job),
                })
            }
        };

        subscription.unsubscribe();
        outcome
    }

    /// Run a search end to end without cancellation support: start plus
    /// first fetch in one call, then track status to completion.
    pub async fn execute_search(
        &self,
        view: &View,
        widget_ids: Option<&[String]>,
        execution_state: &SearchExecutionState,
        keep_queries: &[String],
    ) -> Result<ResultEnvelope> {
        let state = build_execution_state(execution_state, view, widget_ids, keep_queries);
        let job = self.client.run(&view.search, &state).await?;
        tracing::debug!(job_id = %job.id, "search job running");
        let job = track_job_status(self.client.as_ref(), job).await?;
        Ok(ResultEnvelope {
            widget_mapping: view.widget_mapping.clone(),
            result: SearchResult::new(job),
        })
    }

    /// Ask the backend to cancel a job. Pure passthrough; there is no local
    /// tracking state to reconcile, so this works for any handle regardless
    /// of where it came from.
    pub async fn cancel_job(&self, handle: &JobHandle) -> Result<()> {
        self.client.cancel(handle).await
    }
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator").finish_non_exhaustive()
    }
}
