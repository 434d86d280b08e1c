use crate::traits::SearchApi;
use crate::{ComparisonResult, Pipeline, Query, ResultSet, TransportError};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

pub const SEARCH_FAILED_MESSAGE: &str = "Search request failed";

/// What the search views render from. `results` and `comparison` are never
/// both populated once a request has settled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: Option<Query>,
    pub results: ResultSet,
    pub comparison: Option<ComparisonResult>,
    pub loading: bool,
    pub error: Option<String>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl SearchState {
    pub fn has_results(&self) -> bool {
        !self.results.is_empty() || self.comparison.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query, nothing was sent.
    Skipped,
    /// The response was written to the state.
    Applied,
    /// A newer submission (or a clear) happened first; the response was dropped.
    Stale,
}

#[derive(Debug, Default)]
struct Inner {
    state: SearchState,
    generation: u64,
}

pub struct SearchCoordinator<A>
where
    A: SearchApi,
{
    api: Arc<A>,
    limit: usize,
    inner: Mutex<Inner>,
}

impl<A> SearchCoordinator<A>
where
    A: SearchApi + Send + Sync,
{
    pub fn new(api: Arc<A>, limit: usize) -> Self {
        Self {
            api,
            limit,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn state(&self) -> SearchState {
        self.lock().state.clone()
    }

    pub fn has_results(&self) -> bool {
        self.lock().state.has_results()
    }

    /// Runs one search. With `compare` set, the ML and BM25 pipelines are
    /// queried concurrently and both must succeed.
    pub async fn run_search(&self, raw_query: &str, compare: bool) -> SearchOutcome {
        let Ok(query) = Query::parse(raw_query) else {
            return SearchOutcome::Skipped;
        };

        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state.loading = true;
            inner.state.error = None;
            inner.state.query = Some(query.clone());
            inner.generation
        };
        info!(query = %query, compare, generation, "search started");

        if compare {
            let outcome = self.compare(&query).await;
            self.settle(generation, outcome, |state, comparison| {
                state.comparison = Some(comparison);
                state.results.clear();
            })
        } else {
            let outcome = self
                .api
                .search(&query, self.limit, Pipeline::Ml.use_baseline())
                .await;
            self.settle(generation, outcome, |state, results| {
                state.results = results;
                state.comparison = None;
            })
        }
    }

    /// Resets to the startup state. Requests still in flight are ignored
    /// when they settle.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = SearchState::default();
    }

    async fn compare(&self, query: &Query) -> Result<ComparisonResult, TransportError> {
        // First failure settles the join and drops the other leg's request.
        let (ml, bm25) = tokio::try_join!(
            self.api.search(query, self.limit, Pipeline::Ml.use_baseline()),
            self.api.search(query, self.limit, Pipeline::Bm25.use_baseline())
        )?;
        Ok(ComparisonResult { ml, bm25 })
    }

    fn settle<T>(
        &self,
        generation: u64,
        outcome: Result<T, TransportError>,
        apply: impl FnOnce(&mut SearchState, T),
    ) -> SearchOutcome {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(
                generation,
                latest = inner.generation,
                "discarding stale search response"
            );
            return SearchOutcome::Stale;
        }

        let state = &mut inner.state;
        match outcome {
            Ok(value) => {
                apply(state, value);
                state.error = None;
                info!(
                    generation,
                    results = state.results.len(),
                    comparison = state.comparison.is_some(),
                    "search settled"
                );
            }
            Err(error) => {
                warn!(generation, %error, "search failed");
                state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                state.results.clear();
                state.comparison = None;
            }
        }
        state.loading = false;
        state.settled_at = Some(Utc::now());
        SearchOutcome::Applied
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
