//! searchjobs - client-side execution protocol for asynchronous search jobs
//!
//! A search against the log-management backend is a long-running server-side
//! job. This crate implements the client half of that protocol: build an
//! execution state for one run of a view, start the job, poll it until the
//! backend reports completion (with optional cooperative cancellation), and
//! normalize the raw job payload into a consumable result envelope.
//!
//! The transport is abstracted behind the [`client::JobClient`] trait;
//! [`client::HttpJobClient`] talks to the real REST API and
//! [`client::MockJobClient`] scripts responses for tests.

pub mod cancel;
pub mod client;
pub mod error;
pub mod execution;
pub mod job;
pub mod orchestrator;
pub mod result;
pub mod tracker;
pub mod view;

pub use cancel::{CancelSubscription, CancellationSignal};
pub use client::{HttpJobClient, HttpJobClientConfig, JobClient, MockJobClient};
pub use error::{Result, SearchJobsError};
pub use execution::{GlobalOverride, SearchExecutionState, build_execution_state};
pub use job::{JobExecution, JobHandle, SearchJob, StartJobResponse};
pub use orchestrator::SearchOrchestrator;
pub use result::{ResultEnvelope, SearchResult};
pub use view::{SearchDefinition, View, WidgetMapping};
