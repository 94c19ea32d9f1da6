//! Transport layer for the search-job protocol
//!
//! This module provides:
//! - The [`JobClient`] trait, the network boundary the orchestrator and the
//!   poll loops are written against
//! - [`HttpJobClient`], the reqwest implementation for the backend REST API
//! - [`MockJobClient`], a scripted implementation for tests

pub mod http;

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Result, SearchJobsError};
use crate::execution::SearchExecutionState;
use crate::job::{JobHandle, SearchJob, StartJobResponse};
use crate::view::SearchDefinition;

pub use http::{HttpJobClient, HttpJobClientConfig};

/// Stateless transport calls for the search-job protocol. Each call is
/// independent; the client holds no per-job state.
#[async_trait]
pub trait JobClient: Send + Sync {
    /// Start a job asynchronously.
    async fn start(
        &self,
        search: &SearchDefinition,
        execution_state: &SearchExecutionState,
    ) -> Result<StartJobResponse>;

    /// Fetch the current status of a job by id.
    async fn status(&self, job_id: &str) -> Result<SearchJob>;

    /// Fetch the current (possibly partial) result of a job.
    async fn poll(&self, handle: &JobHandle) -> Result<SearchJob>;

    /// Ask the backend to cancel a job.
    async fn cancel(&self, handle: &JobHandle) -> Result<()>;

    /// Start a job and fetch its first status in one call.
    async fn run(
        &self,
        search: &SearchDefinition,
        execution_state: &SearchExecutionState,
    ) -> Result<SearchJob>;
}

/// Scripted [`JobClient`] for tests. Responses are queued per operation and
/// popped in order; every call is counted.
///
/// `cancel` succeeds when nothing is scripted for it, matching the real
/// backend's fire-and-forget cancel endpoint. The other operations fail with
/// [`SearchJobsError::InvalidResponse`] when their queue runs dry, so a test
/// that under-scripts fails loudly instead of hanging in a poll loop.
#[derive(Default)]
pub struct MockJobClient {
    start_responses: Mutex<VecDeque<Result<StartJobResponse>>>,
    status_responses: Mutex<VecDeque<Result<SearchJob>>>,
    poll_responses: Mutex<VecDeque<Result<SearchJob>>>,
    run_responses: Mutex<VecDeque<Result<SearchJob>>>,
    cancel_responses: Mutex<VecDeque<Result<()>>>,

    start_calls: AtomicUsize,
    status_calls: AtomicUsize,
    poll_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
    run_calls: AtomicUsize,

    /// Invoked with the 1-based call number on every `poll`, before the
    /// scripted response is returned. Lets tests trigger side effects (like
    /// cancelling a signal) at an exact point in the loop.
    #[allow(clippy::type_complexity)]
    poll_hook: Mutex<Option<Box<dyn Fn(usize) + Send + Sync>>>,
}

impl MockJobClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_start(&self, response: Result<StartJobResponse>) {
        self.start_responses.lock().unwrap().push_back(response);
    }

    pub fn enqueue_status(&self, response: Result<SearchJob>) {
        self.status_responses.lock().unwrap().push_back(response);
    }

    pub fn enqueue_poll(&self, response: Result<SearchJob>) {
        self.poll_responses.lock().unwrap().push_back(response);
    }

    pub fn enqueue_run(&self, response: Result<SearchJob>) {
        self.run_responses.lock().unwrap().push_back(response);
    }

    pub fn enqueue_cancel(&self, response: Result<()>) {
        self.cancel_responses.lock().unwrap().push_back(response);
    }

    pub fn set_poll_hook<F>(&self, hook: F)
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        *self.poll_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    pub fn run_calls(&self) -> usize {
        self.run_calls.load(Ordering::SeqCst)
    }

    fn pop<T>(queue: &Mutex<VecDeque<Result<T>>>, operation: &str) -> Result<T> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(SearchJobsError::InvalidResponse(format!(
                "mock: no scripted {operation} response left"
            )))
        })
    }
}

#[async_trait]
impl JobClient for MockJobClient {
    async fn start(
        &self,
        _search: &SearchDefinition,
        _execution_state: &SearchExecutionState,
    ) -> Result<StartJobResponse> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.start_responses, "start")
    }

    async fn status(&self, _job_id: &str) -> Result<SearchJob> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.status_responses, "status")
    }

    async fn poll(&self, _handle: &JobHandle) -> Result<SearchJob> {
        let call = self.poll_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(hook) = self.poll_hook.lock().unwrap().as_ref() {
            hook(call);
        }
        Self::pop(&self.poll_responses, "poll")
    }

    async fn cancel(&self, _handle: &JobHandle) -> Result<()> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        self.cancel_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn run(
        &self,
        _search: &SearchDefinition,
        _execution_state: &SearchExecutionState,
    ) -> Result<SearchJob> {
        self.run_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.run_responses, "run")
    }
}

impl std::fmt::Debug for MockJobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockJobClient")
            .field("start_calls", &self.start_calls())
            .field("status_calls", &self.status_calls())
            .field("poll_calls", &self.poll_calls())
            .field("cancel_calls", &self.cancel_calls())
            .field("run_calls", &self.run_calls())
            .finish()
    }
}
