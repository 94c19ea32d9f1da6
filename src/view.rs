//! View-side inputs to a search execution
//!
//! A view is read-only here: it supplies the widget → search-type mapping
//! used to scope a partial re-search, and the search definition that is
//! passed through to the backend opaquely.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maps widget ids to the search-type ids their data comes from.
///
/// A widget id with no entry is not an error; execution-state building skips
/// it silently (the widget simply contributes no search types).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetMapping(HashMap<String, Vec<String>>);

impl WidgetMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a widget with its search-type ids, replacing any previous
    /// association.
    pub fn insert(
        &mut self,
        widget_id: impl Into<String>,
        search_type_ids: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.0.insert(
            widget_id.into(),
            search_type_ids.into_iter().map(Into::into).collect(),
        );
    }

    /// Search-type ids for a widget, or `None` for an unmapped widget.
    pub fn get(&self, widget_id: &str) -> Option<&[String]> {
        self.0.get(widget_id).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V, S> FromIterator<(K, V)> for WidgetMapping
where
    K: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (widget_id, search_types) in iter {
            mapping.insert(widget_id, search_types);
        }
        mapping
    }
}

/// The search definition owned by a view. Only the id matters to this crate;
/// the rest of the document is carried to the backend unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchDefinition {
    pub id: String,

    /// Queries, parameters, and whatever else the backend stores on the
    /// search document. Opaque passthrough.
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl SearchDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: serde_json::Map::new(),
        }
    }
}

/// Read-only view inputs for one search execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub widget_mapping: WidgetMapping,
    pub search: SearchDefinition,
}

impl View {
    pub fn new(search: SearchDefinition, widget_mapping: WidgetMapping) -> Self {
        Self {
            widget_mapping,
            search,
        }
    }
}
