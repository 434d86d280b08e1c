use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use std::fmt;

/// Trimmed, non-empty search text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One article returned by the backend. Only `id`, `title` and `url` are
/// guaranteed; everything else falls back to zero or empty.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub views: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub comments_count: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub score: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub ml_score: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub bm25_score: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SearchResult {
    /// Score shown on a card: the pipeline score, or the ML score when the
    /// pipeline left it at zero.
    pub fn display_score(&self) -> f64 {
        if self.score != 0.0 {
            self.score
        } else {
            self.ml_score
        }
    }
}

/// Results in the order the ranking pipeline produced them.
pub type ResultSet = Vec<SearchResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pipeline {
    Ml,
    Bm25,
}

impl Pipeline {
    pub fn label(self) -> &'static str {
        match self {
            Pipeline::Ml => "ML",
            Pipeline::Bm25 => "BM25",
        }
    }

    /// Value of the `compare` flag in the request body. The backend reads
    /// `compare: true` as "answer with the BM25 baseline".
    pub fn use_baseline(self) -> bool {
        matches!(self, Pipeline::Bm25)
    }
}

/// Both pipelines' answers for the same query, never merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub ml: ResultSet,
    pub bm25: ResultSet,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubCount {
    pub hub: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub count: u64,
}

/// Aggregate numbers from `GET /stats`. Treated as opaque beyond display.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub total_articles: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub total_views: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub avg_views: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub es_index_size: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub es_total_docs: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub top_hubs: Vec<HubCount>,
    #[serde(default)]
    pub ml_model: serde_json::Value,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MlModelStatus {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub status: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub model_loaded: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub features_count: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub feature_columns: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub tfidf_loaded: bool,
}

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub top_n: usize,
    pub compare: bool,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchResponse {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub query: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub results: ResultSet,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub total_results: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub search_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_is_trimmed() {
        let query = Query::parse("  kubernetes \n").expect("query should parse");
        assert_eq!(query.as_str(), "kubernetes");
    }

    #[test]
    fn blank_query_is_rejected() {
        assert_eq!(Query::parse("   \t"), Err(QueryError::Empty));
        assert_eq!(Query::parse(""), Err(QueryError::Empty));
    }

    #[test]
    fn search_result_fills_missing_fields() -> Result<(), serde_json::Error> {
        let result: SearchResult = serde_json::from_value(json!({
            "id": 1,
            "title": "A",
            "url": "https://habr.com/ru/articles/1/",
            "score": 0.9,
            "views": null
        }))?;

        assert_eq!(result.views, 0);
        assert_eq!(result.comments_count, 0);
        assert_eq!(result.ml_score, 0.0);
        assert!(result.tags.is_empty());
        assert_eq!(result.display_score(), 0.9);
        Ok(())
    }

    #[test]
    fn display_score_falls_back_to_ml_score() {
        let result = SearchResult {
            id: 7,
            title: "B".to_string(),
            url: String::new(),
            views: 0,
            comments_count: 0,
            score: 0.0,
            ml_score: 0.42,
            bm25_score: 3.1,
            tags: Vec::new(),
        };
        assert_eq!(result.display_score(), 0.42);
    }

    #[test]
    fn stats_summary_tolerates_partial_payload() -> Result<(), serde_json::Error> {
        let stats: StatsSummary = serde_json::from_value(json!({
            "total_articles": 100,
            "avg_views": null,
            "top_hubs": [{"hub": "DevOps", "count": 12}]
        }))?;

        assert_eq!(stats.total_articles, 100);
        assert_eq!(stats.total_views, 0);
        assert_eq!(stats.avg_views, 0.0);
        assert_eq!(stats.es_index_size, 0);
        assert_eq!(stats.top_hubs[0].hub, "DevOps");
        Ok(())
    }

    #[test]
    fn search_request_serializes_backend_field_names() -> Result<(), serde_json::Error> {
        let body = SearchRequest {
            query: "rust",
            top_n: 10,
            compare: Pipeline::Bm25.use_baseline(),
        };
        assert_eq!(
            serde_json::to_value(&body)?,
            json!({"query": "rust", "top_n": 10, "compare": true})
        );
        Ok(())
    }

    #[test]
    fn search_response_preserves_order() -> Result<(), serde_json::Error> {
        let response: SearchResponse = serde_json::from_value(json!({
            "results": [
                {"id": 3, "title": "third", "url": "u3", "score": 0.1},
                {"id": 1, "title": "first", "url": "u1", "score": 0.9}
            ]
        }))?;

        let ids: Vec<i64> = response.results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(response.total_results, 0);
        Ok(())
    }
}
