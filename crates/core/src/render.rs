//! Plain-text rendering of the stats panel, result lists and comparison
//! columns. Everything returns a `String` so the CLI decides where it goes.

use crate::{ComparisonResult, MlModelStatus, Pipeline, SearchResult, StatsSummary};

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const COMPACT_TAG_LIMIT: usize = 3;

pub const EMPTY_STATE_TITLE: &str = "Start searching";
pub const NO_RESULTS: &str = "No results";
pub const LOADING_MARKER: &str = "[searching...]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    /// Single result list: all scores and every tag.
    Full,
    /// One column of the comparison view.
    Compact(Pipeline),
}

/// `1234567` -> `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn format_index_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 KB".to_string();
    }
    let mb = bytes as f64 / MIB;
    if mb > 1.0 {
        format!("{mb:.1} MB")
    } else {
        format!("{:.1} KB", bytes as f64 / KIB)
    }
}

pub fn render_stats(stats: &StatsSummary) -> String {
    let average = stats.avg_views.max(0.0).round() as u64;
    [
        format!("Total articles: {}", format_count(stats.total_articles)),
        format!("Total views:    {}", format_count(stats.total_views)),
        format!("Average views:  {}", format_count(average)),
        format!("Index size:     {}", format_index_size(stats.es_index_size)),
    ]
    .join("\n")
}

pub fn render_card(result: &SearchResult, index: usize, style: CardStyle) -> String {
    let position = index + 1;
    let badge = match style {
        CardStyle::Full => format!("#{position}"),
        CardStyle::Compact(pipeline) => format!("{} #{position}", pipeline.label()),
    };
    let score_label = match style {
        CardStyle::Full => "Score",
        CardStyle::Compact(pipeline) => pipeline.label(),
    };

    let mut lines = vec![
        format!("{badge} {}", result.title),
        format!("  {}", result.url),
        format!(
            "  views={} comments={} {score_label}: {:.2}",
            format_count(result.views),
            format_count(result.comments_count),
            result.display_score()
        ),
    ];

    if style == CardStyle::Full {
        lines.push(format!(
            "  ML Score: {:.4}  BM25 Score: {:.4}",
            result.ml_score, result.bm25_score
        ));
    }

    if let Some(tags) = render_tags(&result.tags, style) {
        lines.push(format!("  tags: {tags}"));
    }

    lines.join("\n")
}

fn render_tags(tags: &[String], style: CardStyle) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    if style == CardStyle::Full || tags.len() <= COMPACT_TAG_LIMIT {
        return Some(tags.join(", "));
    }
    Some(format!(
        "{} +{}",
        tags[..COMPACT_TAG_LIMIT].join(", "),
        tags.len() - COMPACT_TAG_LIMIT
    ))
}

pub fn render_results(query: &str, results: &[SearchResult], loading: bool) -> String {
    let mut sections = vec![format!(
        "Results for \"{query}\" ({} found)",
        results.len()
    )];
    if loading {
        sections.push(LOADING_MARKER.to_string());
    }
    sections.extend(
        results
            .iter()
            .enumerate()
            .map(|(index, result)| render_card(result, index, CardStyle::Full)),
    );
    sections.join("\n\n")
}

pub fn render_comparison(query: &str, comparison: &ComparisonResult, loading: bool) -> String {
    let mut sections = vec![format!(
        "Comparison for \"{query}\" (ML: {} | BM25: {})",
        comparison.ml.len(),
        comparison.bm25.len()
    )];
    if loading {
        sections.push(LOADING_MARKER.to_string());
    }
    sections.push(render_column(Pipeline::Ml, &comparison.ml));
    sections.push(render_column(Pipeline::Bm25, &comparison.bm25));
    sections.join("\n\n")
}

fn render_column(pipeline: Pipeline, results: &[SearchResult]) -> String {
    let heading = match pipeline {
        Pipeline::Ml => "== ML ranking ==",
        Pipeline::Bm25 => "== BM25 search ==",
    };
    if results.is_empty() {
        return format!("{heading}\n{NO_RESULTS}");
    }

    let cards = results
        .iter()
        .enumerate()
        .map(|(index, result)| render_card(result, index, CardStyle::Compact(pipeline)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{heading}\n{cards}")
}

pub fn render_empty_state() -> String {
    format!(
        "{EMPTY_STATE_TITLE}\nEnter a query to search Habr articles. Candidates are retrieved with BM25 and re-ranked by an ML model."
    )
}

pub fn render_error(message: &str) -> String {
    format!("error: {message}")
}

pub fn render_ml_status(status: &MlModelStatus) -> String {
    let mut lines = vec![
        format!("status: {}", status.status),
        format!("model_loaded: {}", status.model_loaded),
        format!("tfidf_loaded: {}", status.tfidf_loaded),
        format!("features_count: {}", status.features_count),
    ];
    if !status.feature_columns.is_empty() {
        lines.push(format!("feature_columns: {}", status.feature_columns.join(", ")));
    }
    lines.join("\n")
}
