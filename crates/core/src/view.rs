use crate::orchestrator::SearchState;
use crate::stats::StatsState;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    Error,
    Comparison,
    SingleResults,
    Empty,
}

/// Active view plus whether a loading marker is drawn over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSelection {
    pub view: View,
    pub loading: bool,
}

/// Comparison wins over a stale single list; the empty state only shows
/// when nothing is pending and nothing failed.
pub fn select_view(state: &SearchState) -> ViewSelection {
    let view = if state.comparison.is_some() {
        View::Comparison
    } else if !state.results.is_empty() {
        View::SingleResults
    } else if !state.loading && state.error.is_none() {
        View::Empty
    } else if state.loading {
        View::Loading
    } else {
        View::Error
    };

    ViewSelection {
        view,
        loading: state.loading,
    }
}

/// Dismissible error banner shown next to whatever view is active. The
/// search error takes precedence over the stats error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorAlert {
    dismissed: Option<AlertKey>,
}

#[derive(Debug, Clone, PartialEq)]
struct AlertKey {
    message: String,
    stamp: Option<DateTime<Utc>>,
}

impl ErrorAlert {
    pub fn visible(&self, search: &SearchState, stats: &StatsState) -> Option<String> {
        let key = current_alert(search, stats)?;
        if self.dismissed.as_ref() == Some(&key) {
            return None;
        }
        Some(key.message)
    }

    /// Hides the message currently on screen. A later failure, even one with
    /// the same text, shows again.
    pub fn dismiss(&mut self, search: &SearchState, stats: &StatsState) {
        self.dismissed = current_alert(search, stats);
    }
}

fn current_alert(search: &SearchState, stats: &StatsState) -> Option<AlertKey> {
    if let Some(message) = &search.error {
        return Some(AlertKey {
            message: message.clone(),
            stamp: search.settled_at,
        });
    }
    stats.error.as_ref().map(|message| AlertKey {
        message: message.clone(),
        stamp: stats.settled_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::tests::article;
    use crate::orchestrator::SEARCH_FAILED_MESSAGE;
    use crate::stats::STATS_FAILED_MESSAGE;
    use crate::ComparisonResult;
    use chrono::Duration;

    #[test]
    fn initial_state_is_empty() {
        let selection = select_view(&SearchState::default());
        assert_eq!(selection.view, View::Empty);
        assert!(!selection.loading);
    }

    #[test]
    fn comparison_takes_precedence_over_stale_results() {
        let state = SearchState {
            results: vec![article(1, "stale", 0.3)],
            comparison: Some(ComparisonResult::default()),
            ..Default::default()
        };
        assert_eq!(select_view(&state).view, View::Comparison);
    }

    #[test]
    fn loading_is_an_overlay_on_existing_comparison() {
        let state = SearchState {
            comparison: Some(ComparisonResult::default()),
            loading: true,
            ..Default::default()
        };
        assert_eq!(
            select_view(&state),
            ViewSelection {
                view: View::Comparison,
                loading: true
            }
        );
    }

    #[test]
    fn results_show_single_list() {
        let state = SearchState {
            results: vec![article(1, "A", 0.9)],
            ..Default::default()
        };
        assert_eq!(select_view(&state).view, View::SingleResults);
    }

    #[test]
    fn first_search_in_flight_shows_loading() {
        let state = SearchState {
            loading: true,
            ..Default::default()
        };
        assert_eq!(select_view(&state).view, View::Loading);
    }

    #[test]
    fn failure_without_results_shows_error() {
        let state = SearchState {
            error: Some(SEARCH_FAILED_MESSAGE.to_string()),
            ..Default::default()
        };
        assert_eq!(select_view(&state).view, View::Error);
    }

    #[test]
    fn alert_prefers_search_error() {
        let search = SearchState {
            error: Some(SEARCH_FAILED_MESSAGE.to_string()),
            ..Default::default()
        };
        let stats = StatsState {
            error: Some(STATS_FAILED_MESSAGE.to_string()),
            ..Default::default()
        };
        let alert = ErrorAlert::default();
        assert_eq!(
            alert.visible(&search, &stats).as_deref(),
            Some(SEARCH_FAILED_MESSAGE)
        );
        assert_eq!(
            alert.visible(&SearchState::default(), &stats).as_deref(),
            Some(STATS_FAILED_MESSAGE)
        );
    }

    #[test]
    fn dismissed_alert_returns_on_next_failure() {
        let settled = Utc::now();
        let mut search = SearchState {
            error: Some(SEARCH_FAILED_MESSAGE.to_string()),
            settled_at: Some(settled),
            ..Default::default()
        };
        let stats = StatsState::default();
        let mut alert = ErrorAlert::default();

        alert.dismiss(&search, &stats);
        assert!(alert.visible(&search, &stats).is_none());
        // Dismissal does not touch the underlying state.
        assert!(search.error.is_some());

        search.settled_at = Some(settled + Duration::seconds(1));
        assert_eq!(
            alert.visible(&search, &stats).as_deref(),
            Some(SEARCH_FAILED_MESSAGE)
        );
    }

    #[test]
    fn dismissed_stats_alert_returns_after_failed_refresh() {
        let search = SearchState::default();
        let first_failure = Utc::now();
        let mut stats = StatsState {
            error: Some(STATS_FAILED_MESSAGE.to_string()),
            settled_at: Some(first_failure),
            ..Default::default()
        };
        let mut alert = ErrorAlert::default();

        alert.dismiss(&search, &stats);
        assert!(alert.visible(&search, &stats).is_none());

        // A refresh that fails again keeps `loaded_at` unchanged but settles anew.
        stats.settled_at = Some(first_failure + Duration::seconds(1));
        assert_eq!(
            alert.visible(&search, &stats).as_deref(),
            Some(STATS_FAILED_MESSAGE)
        );
    }
}
