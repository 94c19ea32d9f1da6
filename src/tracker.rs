//! Poll loops for tracking a running job
//!
//! Two deliberately separate loops with different completion predicates and
//! intervals:
//!
//! - [`track_job_status`] backs the non-cancellable path. It re-fetches the
//!   job status every 250ms and stops as soon as the job is done OR has
//!   completed exceptionally.
//! - [`poll_job`] backs the cancellable path. It fetches the partial result
//!   every 2000ms, stops only on `done` (an exceptionally completed job is
//!   still polled), and checks the cancellation signal after each wait,
//!   before issuing the next fetch.
//!
//! The predicate and interval differences are observable behavior, not an
//! accident, so the loops stay separate rather than being unified.
//!
//! Neither loop bounds its attempts; termination comes from the backend
//! eventually marking the job done, or from cancellation. Transport errors
//! propagate immediately — there is no retry-on-error, only retry-on-not-done.
//! Exactly one fetch is in flight at a time per tracked job.

use std::time::Duration;

use tokio::time::sleep;

use crate::cancel::CancellationSignal;
use crate::client::JobClient;
use crate::error::{Result, SearchJobsError};
use crate::job::{JobHandle, SearchJob};

/// Interval between status fetches on the non-cancellable path.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Interval between result fetches on the cancellable path.
pub const RESULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Follow `job` until the backend reports it done or exceptionally completed,
/// re-fetching its status every [`STATUS_POLL_INTERVAL`].
pub async fn track_job_status(client: &dyn JobClient, job: SearchJob) -> Result<SearchJob> {
    let mut job = job;
    let mut attempts: u32 = 0;
    loop {
        if job.execution.done || job.execution.completed_exceptionally {
            tracing::debug!(job_id = %job.id, attempts, "job tracking finished");
            return Ok(job);
        }
        sleep(STATUS_POLL_INTERVAL).await;
        attempts += 1;
        tracing::trace!(job_id = %job.id, attempts, "fetching job status");
        job = client.status(&job.id).await?;
    }
}

/// Follow the job behind `handle` until it is done, fetching its partial
/// result every [`RESULT_POLL_INTERVAL`].
///
/// `last` is the most recent result already in hand, if any; with `None` the
/// loop waits one interval before its first fetch. The signal is checked
/// after each wait: once it is cancelled no further fetch is issued and the
/// loop fails with [`SearchJobsError::Cancelled`].
pub async fn poll_job(
    client: &dyn JobClient,
    handle: &JobHandle,
    last: Option<SearchJob>,
    signal: &CancellationSignal,
) -> Result<SearchJob> {
    let mut current = last;
    let mut attempts: u32 = 0;
    loop {
        current = match current {
            Some(job) if job.execution.done => {
                tracing::debug!(job_id = %handle.job_id, attempts, "job polling finished");
                return Ok(job);
            }
            other => other,
        };
        sleep(RESULT_POLL_INTERVAL).await;
        if signal.is_cancelled() {
            tracing::debug!(job_id = %handle.job_id, attempts, "job polling cancelled");
            return Err(SearchJobsError::Cancelled);
        }
        attempts += 1;
        tracing::trace!(job_id = %handle.job_id, attempts, "polling job result");
        current = Some(client.poll(handle).await?);
    }
}
