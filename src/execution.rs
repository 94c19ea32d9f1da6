//! Execution state for one run of a search
//!
//! The execution state is an immutable snapshot layered on top of a view's
//! stored search definition: which queries to keep, which search types to
//! re-execute, plus whatever base fields (time range overrides, parameter
//! bindings) the caller already had. Building a new state never mutates the
//! base, so one base state can be reused across repeated executions.

use serde::{Deserialize, Serialize};

use crate::view::View;

/// Per-execution selection applied on top of the stored search definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalOverride {
    /// Query ids to execute; order is preserved on the wire.
    #[serde(default)]
    pub keep_queries: Vec<String>,

    /// Search-type ids to execute within the kept queries.
    #[serde(default)]
    pub keep_search_types: Vec<String>,

    /// Base override fields carried through unchanged (time range, query
    /// string, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GlobalOverride {
    /// An override that keeps everything (no query or search-type scoping).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the kept-query list verbatim.
    pub fn with_keep_queries(mut self, keep_queries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keep_queries = keep_queries.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the kept-search-type list verbatim.
    pub fn with_keep_search_types(
        mut self,
        keep_search_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.keep_search_types = keep_search_types.into_iter().map(Into::into).collect();
        self
    }
}

/// Immutable snapshot of everything the backend needs to execute a search
/// once. Absence of a global override means "execute the search as stored".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchExecutionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_override: Option<GlobalOverride>,

    /// Base state fields carried through unchanged (parameter bindings, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SearchExecutionState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_global_override(mut self, global_override: GlobalOverride) -> Self {
        self.global_override = Some(global_override);
        self
    }
}

/// Build the execution state for one run of `view`.
///
/// Starting from `base` (a previous state, or [`SearchExecutionState::empty`]):
/// - `keep_queries` replaces the override's kept-query list verbatim;
/// - when `widget_ids` is `Some`, each widget id is resolved through the
///   view's widget mapping and its search-type ids are appended to the
///   override's kept-search-type list, in widget order. Unmapped widget ids
///   contribute nothing; that is a normal partial-refresh situation, not an
///   error. When `widget_ids` is `None` the kept search types are untouched.
///
/// `base` is never mutated; the returned state is a fresh snapshot.
pub fn build_execution_state(
    base: &SearchExecutionState,
    view: &View,
    widget_ids: Option<&[String]>,
    keep_queries: &[String],
) -> SearchExecutionState {
    let global_override = base
        .global_override
        .clone()
        .unwrap_or_else(GlobalOverride::empty)
        .with_keep_queries(keep_queries.iter().cloned());

    let global_override = match widget_ids {
        Some(widget_ids) => {
            let mut keep_search_types = global_override.keep_search_types.clone();
            for widget_id in widget_ids {
                if let Some(search_types) = view.widget_mapping.get(widget_id) {
                    keep_search_types.extend(search_types.iter().cloned());
                }
            }
            global_override.with_keep_search_types(keep_search_types)
        }
        None => global_override,
    };

    base.clone().with_global_override(global_override)
}
