use std::collections::{HashMap, HashSet};

use crate::config::SearchConfig;
use crate::domain::search::{Category, ResultItem};

/// How per-source results are combined into one visible list
#[derive(Debug, Clone)]
pub struct MergePolicy {
    precedence: Vec<Category>,
    caps: HashMap<Category, usize>,
    max_results: usize,
}

impl MergePolicy {
    pub fn new(precedence: Vec<Category>, max_results: usize) -> Self {
        Self {
            precedence,
            caps: HashMap::new(),
            max_results,
        }
    }

    pub fn with_cap(mut self, category: Category, cap: usize) -> Self {
        self.caps.insert(category, cap);
        self
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        for key in config.unknown_cap_keys() {
            tracing::warn!(key, "Ignoring category cap for unknown category");
        }

        let mut policy = Self::new(config.precedence.clone(), config.max_results);
        for category in Category::ALL {
            if let Some(cap) = config.cap_for(category) {
                policy = policy.with_cap(category, cap);
            }
        }
        policy
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Group by category, order by precedence, dedupe ids per category,
    /// apply per-category caps and finally the overall maximum.
    /// Items keep their source's relative order within a category.
    pub fn merge(&self, batches: Vec<Vec<ResultItem>>) -> Vec<ResultItem> {
        let mut grouped: HashMap<Category, Vec<ResultItem>> = HashMap::new();
        for item in batches.into_iter().flatten() {
            grouped.entry(item.category()).or_default().push(item);
        }

        let mut merged = Vec::new();
        let mut placed: HashSet<Category> = HashSet::new();

        for category in &self.precedence {
            if !placed.insert(*category) {
                continue;
            }
            let Some(items) = grouped.remove(category) else {
                continue;
            };

            let cap = self.caps.get(category).copied().unwrap_or(usize::MAX);
            let mut seen_ids = HashSet::new();

            merged.extend(
                items
                    .into_iter()
                    .filter(|item| seen_ids.insert(item.id.clone()))
                    .take(cap),
            );
        }

        merged.truncate(self.max_results);
        merged
    }

    /// Overall maximum applied to an already ordered list
    pub fn truncate(&self, mut items: Vec<ResultItem>) -> Vec<ResultItem> {
        items.truncate(self.max_results);
        items
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}
