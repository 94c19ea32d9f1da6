//! Search execution integration tests
//!
//! Drives the public API end to end with the scripted mock transport.

use std::sync::Arc;

use searchjobs::{
    CancellationSignal, JobExecution, JobHandle, MockJobClient, SearchDefinition,
    SearchExecutionState, SearchJob, SearchOrchestrator, StartJobResponse, View, WidgetMapping,
};

fn view() -> View {
    let mapping: WidgetMapping = [
        ("widget-1", vec!["st-1", "st-2"]),
        ("widget-2", vec!["st-3"]),
    ]
    .into_iter()
    .collect();
    View::new(SearchDefinition::new("search-1"), mapping)
}

fn handle() -> JobHandle {
    JobHandle {
        job_id: "job-1".to_string(),
        executing_node: "node-a".to_string(),
    }
}

fn running_job() -> SearchJob {
    SearchJob {
        id: "job-1".to_string(),
        executing_node: "node-a".to_string(),
        ..Default::default()
    }
}

fn done_job() -> SearchJob {
    serde_json::from_value(serde_json::json!({
        "id": "job-1",
        "executing_node": "node-a",
        "execution": {"done": true},
        "results": {"q1": {"search_types": {"st-1": {"total": 7}}}},
        "errors": []
    }))
    .unwrap()
}

/// Integration test: start a job, then poll it to completion with a signal
/// that never fires.
#[tokio::test(start_paused = true)]
async fn test_start_then_execute_job_result() {
    let mock = Arc::new(MockJobClient::new());
    mock.enqueue_start(Ok(StartJobResponse {
        id: "job-1".to_string(),
        executing_node: "node-a".to_string(),
    }));
    mock.enqueue_poll(Ok(running_job()));
    mock.enqueue_poll(Ok(done_job()));

    let orchestrator = SearchOrchestrator::new(Arc::clone(&mock) as Arc<dyn searchjobs::JobClient>);
    let signal = CancellationSignal::new();

    let handle = orchestrator
        .start_job(
            &view(),
            Some(&["widget-1".to_string()]),
            &SearchExecutionState::empty(),
            &["q1".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(handle.job_id, "job-1");

    let envelope = orchestrator
        .execute_job_result(&handle, &view(), &signal)
        .await
        .unwrap();

    assert_eq!(envelope.widget_mapping, view().widget_mapping);
    assert_eq!(
        envelope.result.for_query("q1").unwrap()["search_types"]["st-1"]["total"],
        7
    );
    assert_eq!(mock.start_calls(), 1);
    assert_eq!(mock.poll_calls(), 2);
}

/// Integration test: the non-cancellable path runs start+fetch then tracks
/// status to completion.
#[tokio::test(start_paused = true)]
async fn test_execute_search_end_to_end() {
    let mock = Arc::new(MockJobClient::new());
    mock.enqueue_run(Ok(running_job()));
    mock.enqueue_status(Ok(running_job()));
    mock.enqueue_status(Ok(done_job()));

    let orchestrator = SearchOrchestrator::new(Arc::clone(&mock) as Arc<dyn searchjobs::JobClient>);

    let envelope = orchestrator
        .execute_search(&view(), None, &SearchExecutionState::empty(), &[])
        .await
        .unwrap();

    assert!(envelope.result.job().execution.done);
    assert!(!envelope.result.has_errors());
    assert_eq!(mock.run_calls(), 1);
    assert_eq!(mock.status_calls(), 2);
}

/// Integration test: repeated cancellable executions with independent
/// signals never accumulate listeners on either signal.
#[tokio::test(start_paused = true)]
async fn test_repeated_executions_do_not_leak_listeners() {
    let mock = Arc::new(MockJobClient::new());
    mock.enqueue_poll(Ok(done_job()));
    mock.enqueue_poll(Ok(done_job()));

    let orchestrator = SearchOrchestrator::new(Arc::clone(&mock) as Arc<dyn searchjobs::JobClient>);

    let first_signal = CancellationSignal::new();
    orchestrator
        .execute_job_result(&handle(), &view(), &first_signal)
        .await
        .unwrap();
    assert_eq!(first_signal.listener_count(), 0);

    let second_signal = CancellationSignal::new();
    orchestrator
        .execute_job_result(&handle(), &view(), &second_signal)
        .await
        .unwrap();
    assert_eq!(first_signal.listener_count(), 0);
    assert_eq!(second_signal.listener_count(), 0);

    assert_eq!(mock.poll_calls(), 2);
}

/// Integration test: cancellation while a poll is pending settles the call
/// as cancelled and releases the subscription.
#[tokio::test(start_paused = true)]
async fn test_cancel_mid_execution() {
    let mock = Arc::new(MockJobClient::new());
    let signal = CancellationSignal::new();
    let hook_signal = signal.clone();
    mock.set_poll_hook(move |_| hook_signal.cancel());
    mock.enqueue_poll(Ok(running_job()));

    let orchestrator = SearchOrchestrator::new(Arc::clone(&mock) as Arc<dyn searchjobs::JobClient>);

    let err = orchestrator
        .execute_job_result(&handle(), &view(), &signal)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(mock.poll_calls(), 1);
    assert_eq!(signal.listener_count(), 0);
}

/// Integration test: cancel_job needs no prior start_job on this
/// orchestrator; it is a pure passthrough to the transport.
#[tokio::test]
async fn test_cancel_job_without_prior_start() {
    let mock = Arc::new(MockJobClient::new());
    let orchestrator = SearchOrchestrator::new(Arc::clone(&mock) as Arc<dyn searchjobs::JobClient>);

    orchestrator.cancel_job(&handle()).await.unwrap();

    assert_eq!(mock.cancel_calls(), 1);
}

/// Integration test: a job that completed exceptionally still resolves the
/// non-cancellable path (terminal there), with errors surfaced on the
/// normalized result.
#[tokio::test(start_paused = true)]
async fn test_exceptional_completion_surfaces_errors() {
    let failed: SearchJob = serde_json::from_value(serde_json::json!({
        "id": "job-1",
        "executing_node": "node-a",
        "execution": {"done": false, "completed_exceptionally": true},
        "errors": [{"description": "query parse error", "query_id": "q1"}]
    }))
    .unwrap();
    assert_eq!(
        failed.execution,
        JobExecution {
            done: false,
            cancelled: false,
            completed_exceptionally: true
        }
    );

    let mock = Arc::new(MockJobClient::new());
    mock.enqueue_run(Ok(running_job()));
    mock.enqueue_status(Ok(failed));

    let orchestrator = SearchOrchestrator::new(Arc::clone(&mock) as Arc<dyn searchjobs::JobClient>);

    let envelope = orchestrator
        .execute_search(&view(), None, &SearchExecutionState::empty(), &[])
        .await
        .unwrap();

    assert!(envelope.result.has_errors());
    assert!(envelope.result.job().execution.completed_exceptionally);
}
