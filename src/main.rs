//! git-browse - a read-only web viewer for a tree of git repositories
//!
//! # Usage
//! ```bash
//! git-browse /srv/git                      # serve repositories under /srv/git
//! git-browse /srv/git --port 8080 --open  # custom port, open browser
//! git-browse /srv/git --project-list /etc/git-browse/projects
//! ```

mod config;
mod error;
mod git;
mod models;
mod patch;
mod request;
mod resolve;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use resolve::SuffixPolicy;

/// Browse and clone a tree of git repositories over HTTP
#[derive(Parser)]
#[command(name = "git-browse")]
#[command(about = "A read-only web viewer for a tree of git repositories", long_about = None)]
struct Cli {
    /// Base directory containing the git repositories to serve
    #[arg(value_name = "REPO_BASE_PATH")]
    repo_base_path: PathBuf,

    /// File listing the repository paths to expose on the index page
    #[arg(long, value_name = "FILE")]
    project_list: Option<PathBuf>,

    /// Keep .git suffixes in generated links instead of stripping them
    #[arg(long)]
    keep_suffix: bool,

    /// Unchanged lines shown around each change in diffs
    #[arg(long, default_value = "3")]
    diff_context: usize,

    /// Commits per log page
    #[arg(long, default_value = "20")]
    log_page_size: usize,

    /// Open browser automatically after starting
    #[arg(short, long)]
    open: bool,

    /// Port to run the server on
    #[arg(short, long, default_value = "8012")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let repo_base_path = std::fs::canonicalize(&cli.repo_base_path).with_context(|| {
        format!(
            "cannot open repository base path {}",
            cli.repo_base_path.display()
        )
    })?;

    let config = Arc::new(Config {
        repo_base_path,
        project_list: cli.project_list,
        suffix_policy: if cli.keep_suffix {
            SuffixPolicy::Keep
        } else {
            SuffixPolicy::Strip
        },
        diff_context: cli.diff_context,
        log_page_size: cli.log_page_size,
    });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_router(config.clone())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("127.0.0.1:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    let url = format!("http://{addr}");
    tracing::info!(base = %config.repo_base_path.display(), %url, "serving repositories");

    if cli.open {
        if let Err(err) = open::that(&url) {
            tracing::warn!(error = %err, "could not open browser");
        }
    }

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
        tracing::info!("shutting down");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
