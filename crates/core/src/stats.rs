use crate::traits::SearchApi;
use crate::StatsSummary;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

pub const STATS_FAILED_MESSAGE: &str = "Could not load statistics";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsState {
    pub summary: Option<StatsSummary>,
    pub loading: bool,
    pub error: Option<String>,
    /// Last successful load.
    pub loaded_at: Option<DateTime<Utc>>,
    /// Last load that finished, successful or not.
    pub settled_at: Option<DateTime<Utc>>,
}

/// Owns the statistics panel data. A failed refresh keeps the last good
/// summary around.
pub struct StatsLoader<A>
where
    A: SearchApi,
{
    api: Arc<A>,
    state: Mutex<StatsState>,
}

impl<A> StatsLoader<A>
where
    A: SearchApi + Send + Sync,
{
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Mutex::new(StatsState::default()),
        }
    }

    pub fn state(&self) -> StatsState {
        self.lock().clone()
    }

    pub async fn load_stats(&self) {
        self.lock().loading = true;

        let outcome = self.api.fetch_stats().await;

        let mut state = self.lock();
        match outcome {
            Ok(summary) => {
                info!(
                    total_articles = summary.total_articles,
                    es_total_docs = summary.es_total_docs,
                    "stats loaded"
                );
                state.summary = Some(summary);
                state.error = None;
                state.loaded_at = Some(Utc::now());
            }
            Err(error) => {
                warn!(%error, "stats request failed");
                state.error = Some(STATS_FAILED_MESSAGE.to_string());
            }
        }
        state.loading = false;
        state.settled_at = Some(Utc::now());
    }

    fn lock(&self) -> MutexGuard<'_, StatsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
