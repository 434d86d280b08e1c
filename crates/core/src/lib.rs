pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod session;
pub mod stats;
pub mod traits;
pub mod transport;
pub mod view;

pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_RESULT_LIMIT};
pub use error::{QueryError, TransportError};
pub use models::{
    ComparisonResult, HubCount, MlModelStatus, Pipeline, Query, ResultSet, SearchRequest,
    SearchResponse, SearchResult, StatsSummary,
};
pub use orchestrator::{SearchCoordinator, SearchOutcome, SearchState, SEARCH_FAILED_MESSAGE};
pub use session::{Intent, SearchSession};
pub use stats::{StatsLoader, StatsState, STATS_FAILED_MESSAGE};
pub use traits::SearchApi;
pub use transport::HttpSearchClient;
pub use view::{select_view, ErrorAlert, View, ViewSelection};
