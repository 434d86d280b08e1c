use crate::error::Result;
use crate::{MlModelStatus, Query, ResultSet, StatsSummary};
use async_trait::async_trait;

/// Calls the search backend exposes. Orchestration only depends on this
/// trait, so tests and alternative transports can stand in for HTTP.
#[async_trait]
pub trait SearchApi {
    async fn fetch_stats(&self) -> Result<StatsSummary>;

    async fn search(
        &self,
        query: &Query,
        limit: usize,
        use_baseline: bool,
    ) -> Result<ResultSet>;

    async fn ml_status(&self) -> Result<MlModelStatus>;
}
