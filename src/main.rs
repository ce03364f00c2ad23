mod classifier;
mod config;
mod db;
mod error;
mod pipeline;
mod source;
mod stats;
mod teams;
mod types;

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::classifier::Classifier;
use crate::config::{Config, CHANNEL_CAPACITY};
use crate::db::{seed_play_descriptions, write_team_games, DbWriter};
use crate::error::Result;
use crate::pipeline::{process_file, FileSummary, Sinks};
use crate::source::{collect_inputs, write_team_games_csv};
use crate::stats::{GameAggregator, StatsAggregator};
use crate::types::ClassifiedPlay;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let inputs = collect_inputs(&cfg.input_paths)?;
    if inputs.is_empty() {
        warn!("No CSV inputs found under INPUT_PATHS={:?}", cfg.input_paths);
        return Ok(());
    }
    info!(
        files = inputs.len(),
        ruleset = %cfg.rules.version,
        home = %cfg.home.code,
        "Classifying play exports"
    );

    // --- Database setup ---
    let (db_tx, db_task, pool) = match &cfg.db_path {
        Some(db_path) => {
            let pool = sqlx::SqlitePool::connect(&format!("sqlite:{db_path}?mode=rwc")).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            seed_play_descriptions(&pool, &cfg.rules).await?;
            info!("Database ready at {db_path}");

            let (tx, rx) = mpsc::channel::<ClassifiedPlay>(CHANNEL_CAPACITY);
            let writer = DbWriter::new(pool.clone(), rx);
            (Some(tx), Some(tokio::spawn(writer.run())), Some(pool))
        }
        None => {
            info!("DB_PATH empty, persistence disabled");
            (None, None, None)
        }
    };

    // --- One blocking task per file ---
    let classifier = Arc::new(Classifier::new(cfg.rules, cfg.home.clone()));
    let stats = StatsAggregator::new();
    let games = GameAggregator::new();
    let tasks = inputs.into_iter().map(|path| {
        let classifier = Arc::clone(&classifier);
        let stats = Arc::clone(&stats);
        let games = Arc::clone(&games);
        let db_tx = db_tx.clone();
        let cleaned_dir = cfg.cleaned_output_dir.clone();
        tokio::task::spawn_blocking(move || {
            let sinks = Sinks {
                cleaned_dir: cleaned_dir.as_deref(),
                stats: &stats,
                games: &games,
                db: db_tx.as_ref(),
            };
            process_file(&path, &classifier, &sinks)
        })
    });
    let results = join_all(tasks).await;
    // Writer stops once the last sender is gone.
    drop(db_tx);

    let mut totals = FileSummary::default();
    let mut failed_files = 0usize;
    for result in results {
        // Aborted files still count what they handled before stopping.
        let (summary, outcome) = result?;
        if let Err(e) = outcome {
            failed_files += 1;
            error!(
                file = %summary.path.display(),
                read = summary.read,
                classified = summary.classified,
                "[BATCH] file aborted: {e}"
            );
        }
        totals.read += summary.read;
        totals.classified += summary.classified;
        totals.rejected_non_scoring += summary.rejected_non_scoring;
        totals.rejected_offensive_rebound += summary.rejected_offensive_rebound;
        totals.failed += summary.failed;
    }

    if let Some(task) = db_task {
        let written = task.await?;
        info!(written, "[DB] plays persisted");
    }

    let game_summaries = games.summaries();
    if let Some(pool) = &pool {
        write_team_games(pool, &game_summaries).await?;
    }
    if let Some(dir) = &cfg.cleaned_output_dir {
        let (scores, plays) = write_team_games_csv(dir, &game_summaries)?;
        info!(games = game_summaries.len(), scores = %scores.display(), plays = %plays.display(), "[OUTPUT] team game summaries written");
    }

    if let Some(report_path) = &cfg.report_path {
        stats.write_report(report_path)?;
    }

    info!(
        read = totals.read,
        classified = totals.classified,
        rejected = totals.rejected(),
        failed_rows = totals.failed,
        failed_files,
        player_buckets = stats.len(),
        games = games.len(),
        "Run complete"
    );
    Ok(())
}
