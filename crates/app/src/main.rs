use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use habr_search_core::render::{
    render_comparison, render_empty_state, render_ml_status, render_results, render_stats,
};
use habr_search_core::{
    ClientConfig, HttpSearchClient, Intent, SearchApi, SearchCoordinator, SearchOutcome,
    SearchSession, DEFAULT_BASE_URL,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "habr-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Search API prefix
    #[arg(long, env = "HABR_SEARCH_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Number of results requested per pipeline.
    #[arg(long, env = "HABR_SEARCH_LIMIT", default_value = "10")]
    limit: usize,

    /// Per-request timeout in seconds. Unset means no client-side timeout.
    #[arg(long, env = "HABR_SEARCH_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Print collection statistics.
    Stats,
    /// Run one search and print the ranked list.
    Search {
        /// Search query
        #[arg(long)]
        query: String,
        /// Also fetch the BM25 baseline and print both rankings side by side.
        #[arg(long, default_value_t = false)]
        compare: bool,
    },
    /// Print the ranking model status.
    MlStatus,
    /// Read queries from stdin; lines starting with ':' are commands.
    Interactive,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url)
            .with_result_limit(self.limit)
            .with_timeout(self.timeout_secs.map(Duration::from_secs))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.client_config();
    let api = Arc::new(
        HttpSearchClient::new(&config)
            .with_context(|| format!("invalid api url {}", config.base_url))?,
    );

    info!(
        version = app_version,
        api_url = %api.base_url(),
        started_at = %Utc::now().to_rfc3339(),
        "habr-search boot"
    );

    match cli.command {
        Command::Stats => {
            let stats = api.fetch_stats().await.context("loading statistics")?;
            println!("{}", render_stats(&stats));
            if !stats.top_hubs.is_empty() {
                println!();
                for hub in stats.top_hubs {
                    println!("  {:<32} {}", hub.hub, hub.count);
                }
            }
        }
        Command::Search { query, compare } => {
            let coordinator = SearchCoordinator::new(api, config.result_limit);
            if coordinator.run_search(&query, compare).await == SearchOutcome::Skipped {
                anyhow::bail!("query is empty");
            }

            let state = coordinator.state();
            if let Some(error) = state.error {
                anyhow::bail!(error);
            }

            let query = state
                .query
                .as_ref()
                .map(|query| query.as_str())
                .unwrap_or_default();
            match &state.comparison {
                Some(comparison) => println!("{}", render_comparison(query, comparison, false)),
                None if state.results.is_empty() => println!("{}", render_empty_state()),
                None => println!("{}", render_results(query, &state.results, false)),
            }
        }
        Command::MlStatus => {
            let status = api.ml_status().await.context("loading ml model status")?;
            println!("{}", render_ml_status(&status));
        }
        Command::Interactive => run_interactive(api, config.result_limit).await?,
    }

    Ok(())
}

enum Line {
    Intent(Intent),
    Help,
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> Option<Line> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(command) = trimmed.strip_prefix(':') else {
        return Some(Line::Intent(Intent::Submit(trimmed.to_string())));
    };

    let mut parts = command.split_whitespace();
    let parsed = match (parts.next(), parts.next()) {
        (Some("compare"), Some("on")) => Line::Intent(Intent::SetCompare(true)),
        (Some("compare"), Some("off")) => Line::Intent(Intent::SetCompare(false)),
        (Some("compare"), None) => Line::Intent(Intent::ToggleCompare),
        (Some("refresh"), None) => Line::Intent(Intent::RefreshStats),
        (Some("dismiss"), None) => Line::Intent(Intent::DismissError),
        (Some("clear"), None) => Line::Intent(Intent::Clear),
        (Some("help"), None) => Line::Help,
        (Some("quit" | "q"), None) => Line::Quit,
        _ => Line::Unknown(trimmed.to_string()),
    };
    Some(parsed)
}

const HELP: &str = "\
<text>          search
:compare        toggle comparison with the BM25 baseline
:compare on|off set comparison mode
:refresh        reload statistics
:dismiss        hide the current error
:clear          reset results
:quit           exit";

async fn run_interactive(api: Arc<HttpSearchClient>, limit: usize) -> anyhow::Result<()> {
    let mut session = SearchSession::start(api, limit).await;
    println!("{}", session.render());
    println!("\n(type :help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            None => continue,
            Some(Line::Quit) => break,
            Some(Line::Help) => {
                println!("{HELP}");
                continue;
            }
            Some(Line::Unknown(raw)) => {
                println!("unknown command: {raw}");
                continue;
            }
            Some(Line::Intent(intent)) => {
                session.dispatch(intent).await;
            }
        }

        let mode = if session.compare() { "compare" } else { "ranked" };
        println!("\n[{mode}]\n{}", session.render());
    }

    Ok(())
}
