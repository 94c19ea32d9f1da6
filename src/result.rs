//! Normalized search results
//!
//! The raw job document carries per-query results and errors in its opaque
//! payload; [`SearchResult`] pulls those out once so UI code can index by
//! query id without re-walking JSON.

use std::collections::HashMap;

use crate::job::SearchJob;
use crate::view::WidgetMapping;

/// Normalized view of a finished (or partial) job payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    job: SearchJob,
    results: HashMap<String, serde_json::Value>,
    errors: Vec<serde_json::Value>,
}

impl SearchResult {
    /// Normalize a job payload. Missing `results`/`errors` fields are
    /// treated as empty, not as failures; partial results are expected
    /// while a job is still running.
    pub fn new(job: SearchJob) -> Self {
        let results = job
            .payload
            .get("results")
            .and_then(|value| value.as_object())
            .map(|object| {
                object
                    .iter()
                    .map(|(query_id, result)| (query_id.clone(), result.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let errors = job
            .payload
            .get("errors")
            .and_then(|value| value.as_array())
            .cloned()
            .unwrap_or_default();

        Self {
            job,
            results,
            errors,
        }
    }

    /// The result document for one query of the search, if present.
    pub fn for_query(&self, query_id: &str) -> Option<&serde_json::Value> {
        self.results.get(query_id)
    }

    /// All per-query results, keyed by query id.
    pub fn results(&self) -> &HashMap<String, serde_json::Value> {
        &self.results
    }

    /// Backend error descriptors attached to the job.
    pub fn errors(&self) -> &[serde_json::Value] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The underlying job snapshot the result was normalized from.
    pub fn job(&self) -> &SearchJob {
        &self.job
    }
}

/// What one successful execution hands back to the caller: the widget
/// mapping of the executed view (unchanged passthrough) and the normalized
/// result. Produced exactly once per execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    pub widget_mapping: WidgetMapping,
    pub result: SearchResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_with_payload(payload: serde_json::Value) -> SearchJob {
        serde_json::from_value(payload).unwrap()
    }

    #[test]
    fn test_normalizes_results_by_query_id() {
        let job = job_with_payload(serde_json::json!({
            "id": "job-1",
            "execution": {"done": true},
            "results": {
                "q1": {"search_types": {"st-1": {"total": 42}}},
                "q2": {"search_types": {}}
            }
        }));

        let result = SearchResult::new(job);

        assert_eq!(result.results().len(), 2);
        assert_eq!(
            result.for_query("q1").unwrap()["search_types"]["st-1"]["total"],
            42
        );
        assert!(result.for_query("q3").is_none());
        assert!(!result.has_errors());
    }

    #[test]
    fn test_missing_results_and_errors_are_empty() {
        let result = SearchResult::new(job_with_payload(serde_json::json!({"id": "job-1"})));

        assert!(result.results().is_empty());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_errors_are_surfaced() {
        let job = job_with_payload(serde_json::json!({
            "id": "job-1",
            "errors": [{"description": "shard failure", "query_id": "q1"}]
        }));

        let result = SearchResult::new(job);

        assert!(result.has_errors());
        assert_eq!(result.errors()[0]["description"], "shard failure");
    }
}
