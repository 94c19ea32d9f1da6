//! Wire types for asynchronous search jobs
//!
//! A job document is only ever replaced wholesale with a freshly fetched
//! copy; nothing in this crate mutates one in place.

use serde::{Deserialize, Serialize};

/// Backend-reported execution progress of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobExecution {
    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub cancelled: bool,

    #[serde(default)]
    pub completed_exceptionally: bool,
}

/// One snapshot of a server-side search job, as fetched from the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchJob {
    pub id: String,

    #[serde(default)]
    pub executing_node: String,

    #[serde(default)]
    pub execution: JobExecution,

    /// Everything else the backend puts on the job document (per-query
    /// results, errors, timings). Opaque here; normalized by
    /// [`SearchResult`](crate::result::SearchResult).
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl SearchJob {
    /// A handle for follow-up poll/cancel calls against this job.
    pub fn handle(&self) -> JobHandle {
        JobHandle {
            job_id: self.id.clone(),
            executing_node: self.executing_node.clone(),
        }
    }
}

/// Response to starting a job asynchronously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartJobResponse {
    pub id: String,
    pub executing_node: String,
}

/// Durable identifier for a started job. This is all a caller needs to poll
/// or cancel; the client keeps no server-side state for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
    pub executing_node: String,
}

impl From<StartJobResponse> for JobHandle {
    fn from(response: StartJobResponse) -> Self {
        Self {
            job_id: response.id,
            executing_node: response.executing_node,
        }
    }
}
