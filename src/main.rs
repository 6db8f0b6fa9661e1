// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `leadr` command-line client.
//!
//! Drives the leaderboard SDK from a shell. Configuration comes from the
//! environment (`LEADR_BASE_URL`, `LEADR_GAME_ID`, ...); credentials persist
//! in a JSON file between runs.

use anyhow::Context;
use clap::{Parser, Subcommand};
use leadr_sdk::models::{BoardQuery, ScoreQuery, SortDirection, SubmitScore};
use leadr_sdk::storage::FileStore;
use leadr_sdk::{ClientConfig, LeadrClient, Page};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "leadr", version, about = "Leaderboard service client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List boards for the configured game
    Boards {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        cursor: Option<String>,
        /// Follow next-page cursors until exhausted
        #[arg(long)]
        all: bool,
    },
    /// Look up a board by slug
    Board {
        #[arg(long)]
        slug: String,
    },
    /// List scores on a board
    Scores {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        limit: Option<u32>,
        /// asc or desc
        #[arg(long)]
        sort: Option<SortDirection>,
        #[arg(long)]
        cursor: Option<String>,
        #[arg(long)]
        around_score_id: Option<String>,
        #[arg(long)]
        around_score_value: Option<f64>,
        #[arg(long)]
        all: bool,
    },
    /// Get a single score
    Score {
        #[arg(long)]
        id: String,
    },
    /// Submit a score
    Submit {
        #[arg(long)]
        board_id: String,
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
        #[arg(long)]
        player_name: String,
        /// Preformatted value, e.g. "1:23.456"
        #[arg(long)]
        display: Option<String>,
        /// JSON object attached to the score
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Show the current session state
    Session,
    /// Forget stored tokens (device fingerprint is kept)
    SignOut,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    let store = FileStore::open(&config.credentials_path).with_context(|| {
        format!(
            "Failed to open credential file {}",
            config.credentials_path.display()
        )
    })?;
    let client = LeadrClient::new(config, Arc::new(store)).context("Failed to create client")?;

    match cli.command {
        Command::Boards { limit, cursor, all } => {
            let page = client.list_boards(BoardQuery { limit, cursor }).await?;
            print_pages(page, all).await?;
        }
        Command::Board { slug } => print_json(&client.get_board(&slug).await?)?,
        Command::Scores {
            board_id,
            limit,
            sort,
            cursor,
            around_score_id,
            around_score_value,
            all,
        } => {
            let query = ScoreQuery {
                board_id,
                limit,
                sort,
                cursor,
                around_score_id,
                around_score_value,
            };
            let page = client.list_scores(query).await?;
            print_pages(page, all).await?;
        }
        Command::Score { id } => print_json(&client.get_score(&id).await?)?,
        Command::Submit {
            board_id,
            value,
            player_name,
            display,
            metadata,
        } => {
            let metadata = metadata
                .map(|raw| serde_json::from_str(&raw))
                .transpose()
                .context("--metadata must be valid JSON")?;
            let submission = SubmitScore {
                board_id,
                value,
                player_name,
                value_display: display,
                metadata,
            };
            print_json(&client.submit_score(submission).await?)?;
        }
        Command::Session => {
            let expires_at = client
                .session()
                .token_expires_at()
                .map(leadr_sdk::time_utils::format_utc_rfc3339);
            print_json(&serde_json::json!({
                "state": format!("{:?}", client.session_state()),
                "expires_at": expires_at,
            }))?;
        }
        Command::SignOut => {
            client.sign_out().await?;
            tracing::info!("Signed out");
        }
    }

    Ok(())
}

/// Print a page, and every following page when `all` is set.
async fn print_pages<T: Serialize + Send + 'static>(first: Page<T>, all: bool) -> anyhow::Result<()> {
    let mut page = first;
    loop {
        for item in &page.items {
            print_json(item)?;
        }
        if !all || !page.has_next {
            if page.has_next {
                if let Some(cursor) = &page.next_cursor {
                    eprintln!("next cursor: {}", cursor);
                }
            }
            return Ok(());
        }
        page = page.next_page().await?;
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logging to stderr (JSON when `LEADR_LOG_JSON` is set).
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("leadr_sdk=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LEADR_LOG_JSON").is_ok() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
