use serde::Serialize;

use super::{Category, ResultItem};

/// User text bound to the sequence number it was submitted under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub text: String,
    pub sequence: u64,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, sequence: u64) -> Self {
        Self {
            text: text.into(),
            sequence,
        }
    }
}

/// Where a result set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrigin {
    Live,
    /// Served from the static catalog; the UI may flag reduced confidence
    Fallback,
}

/// Immutable result set for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResultSet {
    pub query: SearchQuery,
    pub items: Vec<ResultItem>,
    pub origin: ResultOrigin,
}

impl AggregatedResultSet {
    pub fn live(query: SearchQuery, items: Vec<ResultItem>) -> Self {
        Self {
            query,
            items,
            origin: ResultOrigin::Live,
        }
    }

    pub fn fallback(query: SearchQuery, items: Vec<ResultItem>) -> Self {
        Self {
            query,
            items,
            origin: ResultOrigin::Fallback,
        }
    }

    pub fn empty(query: SearchQuery) -> Self {
        Self::live(query, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_degraded(&self) -> bool {
        self.origin == ResultOrigin::Fallback
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &ResultItem> {
        self.items.iter().filter(move |item| item.category() == category)
    }

    /// Categories in the order they appear in the set
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for item in &self.items {
            let category = item.category();
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }
}

/// Aggregator state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    Debouncing,
    Fetching,
    Resolved,
    Fallback,
}

/// What the UI observes after every transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSnapshot {
    pub phase: SearchPhase,
    /// Latest sequence issued when this snapshot was published
    pub sequence: u64,
    /// Visible results; kept while debouncing or fetching, cleared when idle
    pub results: Option<AggregatedResultSet>,
}

impl SearchSnapshot {
    pub fn idle(sequence: u64) -> Self {
        Self {
            phase: SearchPhase::Idle,
            sequence,
            results: None,
        }
    }

    pub fn items(&self) -> &[ResultItem] {
        self.results
            .as_ref()
            .map(|set| set.items.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for SearchSnapshot {
    fn default() -> Self {
        Self::idle(0)
    }
}
