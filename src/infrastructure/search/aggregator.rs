//! Debounced multi-source search
//!
//! Every input change is stamped with a new sequence number. Results are only
//! published when their sequence is still the latest one issued, and the
//! comparison and the publication happen under the same watch lock, so a slow
//! response for an old query can never overwrite a newer one.

use futures::future::join_all;
use moka::future::Cache;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::fallback::FallbackDataset;
use super::merge::MergePolicy;
use crate::config::SearchConfig;
use crate::domain::search::{
    AggregatedResultSet, ResultItem, SearchPhase, SearchQuery, SearchSnapshot, SearchSource,
};

pub struct SearchAggregator {
    sources: Vec<Arc<dyn SearchSource>>,
    fallback: FallbackDataset,
    policy: MergePolicy,
    debounce: Duration,
    min_query_len: usize,
    cache: Cache<String, Arc<Vec<ResultItem>>>,
    state: watch::Sender<SearchSnapshot>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for SearchAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sources: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("SearchAggregator")
            .field("sources", &sources)
            .field("policy", &self.policy)
            .field("debounce", &self.debounce)
            .field("min_query_len", &self.min_query_len)
            .finish()
    }
}

impl SearchAggregator {
    pub fn new(
        sources: Vec<Arc<dyn SearchSource>>,
        fallback: FallbackDataset,
        config: &SearchConfig,
    ) -> Self {
        let cache = Cache::builder()
            .time_to_live(config.result_cache_ttl())
            .max_capacity(config.result_cache_capacity)
            .build();
        let (state, _) = watch::channel(SearchSnapshot::default());

        Self {
            sources,
            fallback,
            policy: MergePolicy::from_config(config),
            debounce: config.debounce(),
            min_query_len: config.min_query_len,
            cache,
            state,
            pending: Mutex::new(None),
        }
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Latest sequence issued
    pub fn sequence(&self) -> u64 {
        self.state.borrow().sequence
    }

    /// Feed an input change. Short queries clear the results immediately;
    /// anything else is searched once input has been quiet for the debounce
    /// interval.
    pub fn on_input(self: &Arc<Self>, text: &str) {
        let text = text.trim().to_string();

        if !self.is_searchable(&text) {
            let sequence = self.issue(SearchPhase::Idle);
            self.replace_pending(None);
            tracing::trace!(sequence, "Query below minimum length, cleared results");
            return;
        }

        let sequence = self.issue(SearchPhase::Debouncing);
        let this = Arc::clone(self);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(this.debounce).await;

            if this.sequence() != sequence {
                return;
            }

            let query = SearchQuery::new(text, sequence);
            let fetcher = Arc::clone(&this);
            tokio::spawn(async move {
                fetcher.fetch(query).await;
            });
        });

        self.replace_pending(Some(timer));
    }

    /// Search immediately, bypassing the debounce. Returns the applied set,
    /// or `None` when the query was too short or a newer one superseded it.
    pub async fn search_now(&self, text: &str) -> Option<AggregatedResultSet> {
        let text = text.trim().to_string();
        self.replace_pending(None);

        if !self.is_searchable(&text) {
            self.issue(SearchPhase::Idle);
            return None;
        }

        let sequence = self.issue(SearchPhase::Fetching);
        self.fetch(SearchQuery::new(text, sequence)).await
    }

    fn is_searchable(&self, text: &str) -> bool {
        !text.is_empty() && text.chars().count() >= self.min_query_len
    }

    /// Bump the sequence and publish `phase` in one step
    fn issue(&self, phase: SearchPhase) -> u64 {
        let mut sequence = 0;
        self.state.send_modify(|snapshot| {
            snapshot.sequence += 1;
            snapshot.phase = phase;
            if phase == SearchPhase::Idle {
                snapshot.results = None;
            }
            sequence = snapshot.sequence;
        });
        sequence
    }

    fn replace_pending(&self, timer: Option<JoinHandle<()>>) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = std::mem::replace(&mut *pending, timer) {
            previous.abort();
        }
    }

    async fn fetch(&self, query: SearchQuery) -> Option<AggregatedResultSet> {
        let key = query.text.to_lowercase();

        if let Some(items) = self.cache.get(&key).await {
            tracing::debug!(sequence = query.sequence, query = %query.text, "Search cache hit");
            let set = AggregatedResultSet::live(query, items.as_ref().clone());
            return self.apply(set, SearchPhase::Resolved);
        }

        let sequence = query.sequence;
        let fetching = self.state.send_if_modified(|snapshot| {
            if snapshot.sequence != sequence {
                return false;
            }
            snapshot.phase = SearchPhase::Fetching;
            true
        });
        if !fetching {
            return None;
        }

        let started = Instant::now();
        let outcomes = join_all(self.sources.iter().map(|source| {
            let text = query.text.as_str();
            async move { (source.name(), source.category(), source.search(text).await) }
        }))
        .await;

        let mut batches = Vec::with_capacity(outcomes.len());
        let mut failures = 0;
        for (source, category, outcome) in outcomes {
            match outcome {
                Ok(mut items) => {
                    let answered = items.len();
                    items.retain(|item| item.category() == category);
                    if items.len() < answered {
                        tracing::warn!(
                            sequence,
                            source,
                            %category,
                            dropped = answered - items.len(),
                            "Source returned items outside its category"
                        );
                    }
                    tracing::debug!(sequence, source, count = items.len(), "Source answered");
                    batches.push(items);
                }
                Err(error) => {
                    failures += 1;
                    tracing::warn!(
                        sequence,
                        source,
                        kind = %error.kind(),
                        error = %error,
                        "Search source failed"
                    );
                }
            }
        }

        let merged = self.policy.merge(batches);
        tracing::debug!(
            sequence,
            duration_ms = started.elapsed().as_millis() as u64,
            failures,
            results = merged.len(),
            "Search fan-out settled"
        );

        if !merged.is_empty() {
            self.cache.insert(key, Arc::new(merged.clone())).await;
            return self.apply(AggregatedResultSet::live(query, merged), SearchPhase::Resolved);
        }

        let offline = self.policy.truncate(self.fallback.filter(&query.text));
        if offline.is_empty() {
            return self.apply(AggregatedResultSet::empty(query), SearchPhase::Resolved);
        }

        tracing::info!(
            sequence,
            all_sources_failed = failures == self.sources.len(),
            results = offline.len(),
            "Serving fallback results"
        );
        self.apply(AggregatedResultSet::fallback(query, offline), SearchPhase::Fallback)
    }

    /// Publish `set` only if its sequence is still the latest
    fn apply(&self, set: AggregatedResultSet, phase: SearchPhase) -> Option<AggregatedResultSet> {
        let sequence = set.query.sequence;
        let published = set.clone();

        let applied = self.state.send_if_modified(move |snapshot| {
            if snapshot.sequence != sequence {
                return false;
            }
            *snapshot = SearchSnapshot {
                phase,
                sequence,
                results: Some(published),
            };
            true
        });

        if applied {
            Some(set)
        } else {
            tracing::debug!(
                sequence,
                latest = self.sequence(),
                "Discarding results for superseded query"
            );
            None
        }
    }
}
