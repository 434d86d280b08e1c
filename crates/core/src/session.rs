use crate::orchestrator::{SearchCoordinator, SearchOutcome, SearchState};
use crate::render::{
    render_comparison, render_empty_state, render_error, render_results, render_stats,
    LOADING_MARKER,
};
use crate::stats::{StatsLoader, StatsState};
use crate::traits::SearchApi;
use crate::view::{select_view, ErrorAlert, View, ViewSelection};
use std::sync::Arc;

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Submit(String),
    SetCompare(bool),
    ToggleCompare,
    RefreshStats,
    DismissError,
    Clear,
}

/// Ties the stats panel, the search form and the result views together.
/// Holds only the comparison toggle and the alert dismissal; everything
/// else lives in the coordinator and the stats loader.
pub struct SearchSession<A>
where
    A: SearchApi,
{
    coordinator: SearchCoordinator<A>,
    stats: StatsLoader<A>,
    alert: ErrorAlert,
    compare: bool,
}

impl<A> SearchSession<A>
where
    A: SearchApi + Send + Sync,
{
    pub fn new(api: Arc<A>, limit: usize) -> Self {
        Self {
            coordinator: SearchCoordinator::new(api.clone(), limit),
            stats: StatsLoader::new(api),
            alert: ErrorAlert::default(),
            compare: false,
        }
    }

    /// Builds the session and performs the startup stats load.
    pub async fn start(api: Arc<A>, limit: usize) -> Self {
        let session = Self::new(api, limit);
        session.stats.load_stats().await;
        session
    }

    pub fn compare(&self) -> bool {
        self.compare
    }

    pub fn search_state(&self) -> SearchState {
        self.coordinator.state()
    }

    pub fn stats_state(&self) -> StatsState {
        self.stats.state()
    }

    pub fn selection(&self) -> ViewSelection {
        select_view(&self.coordinator.state())
    }

    pub fn visible_error(&self) -> Option<String> {
        self.alert
            .visible(&self.coordinator.state(), &self.stats.state())
    }

    /// Returns the search outcome when the intent was a submission.
    pub async fn dispatch(&mut self, intent: Intent) -> Option<SearchOutcome> {
        match intent {
            Intent::Submit(query) => {
                return Some(self.coordinator.run_search(&query, self.compare).await);
            }
            Intent::SetCompare(enabled) => self.compare = enabled,
            Intent::ToggleCompare => self.compare = !self.compare,
            Intent::RefreshStats => self.stats.load_stats().await,
            Intent::DismissError => {
                let search = self.coordinator.state();
                let stats = self.stats.state();
                self.alert.dismiss(&search, &stats);
            }
            Intent::Clear => self.coordinator.clear(),
        }
        None
    }

    /// Full screen: stats panel, error banner, then the active view.
    pub fn render(&self) -> String {
        let search = self.coordinator.state();
        let stats = self.stats.state();
        let mut sections = Vec::new();

        if let (Some(summary), false) = (&stats.summary, stats.loading) {
            sections.push(render_stats(summary));
        }
        if let Some(message) = self.alert.visible(&search, &stats) {
            sections.push(render_error(&message));
        }

        let query = search
            .query
            .as_ref()
            .map(|query| query.as_str())
            .unwrap_or_default();
        let selection = select_view(&search);
        match selection.view {
            View::Comparison => {
                if let Some(comparison) = &search.comparison {
                    sections.push(render_comparison(query, comparison, selection.loading));
                }
            }
            View::SingleResults => {
                sections.push(render_results(query, &search.results, selection.loading));
            }
            View::Empty => sections.push(render_empty_state()),
            View::Loading => sections.push(LOADING_MARKER.to_string()),
            View::Error => {}
        }

        sections.join("\n\n")
    }
}
