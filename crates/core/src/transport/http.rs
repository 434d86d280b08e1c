use crate::config::ClientConfig;
use crate::error::Result;
use crate::traits::SearchApi;
use crate::{
    MlModelStatus, Query, ResultSet, SearchRequest, SearchResponse, StatsSummary, TransportError,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

const STATS_PATH: &str = "stats";
const SEARCH_PATH: &str = "search";
const ML_STATUS_PATH: &str = "ml-model/status";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// `SearchApi` over HTTP/JSON. No retries and no caching: each call is
/// exactly one request.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: Client,
    base_url: Url,
}

impl HttpSearchClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: normalize_base_url(&config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let request_id = Uuid::new_v4();
        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|error| {
                warn!(%request_id, endpoint = path, %error, "request failed");
                TransportError::from(error)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%request_id, endpoint = path, status = status.as_u16(), "backend returned error status");
            return Err(TransportError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|error| {
            warn!(%request_id, endpoint = path, %error, "response body did not decode");
            TransportError::Decode {
                endpoint: path.to_string(),
                details: error.to_string(),
            }
        })
    }
}

#[async_trait]
impl SearchApi for HttpSearchClient {
    async fn fetch_stats(&self) -> Result<StatsSummary> {
        let url = self.endpoint(STATS_PATH)?;
        self.send_json(STATS_PATH, self.client.get(url)).await
    }

    async fn search(
        &self,
        query: &Query,
        limit: usize,
        use_baseline: bool,
    ) -> Result<ResultSet> {
        let url = self.endpoint(SEARCH_PATH)?;
        let body = SearchRequest {
            query: query.as_str(),
            top_n: limit,
            compare: use_baseline,
        };

        info!(query = %query, limit, use_baseline, "submitting search");
        let response: SearchResponse = self
            .send_json(SEARCH_PATH, self.client.post(url).json(&body))
            .await?;
        Ok(response.results)
    }

    async fn ml_status(&self) -> Result<MlModelStatus> {
        let url = self.endpoint(ML_STATUS_PATH)?;
        self.send_json(ML_STATUS_PATH, self.client.get(url)).await
    }
}

/// Endpoints are relative paths, so the prefix must end in `/` or `join`
/// would replace its last segment.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }
}
