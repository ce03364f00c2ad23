//! Per-file batch: read, admit, classify, then fan each play out to the
//! cleaned CSV, the aggregator and the database writer. Synchronous; run it
//! under `spawn_blocking`.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::classifier::{Classifier, Rejection, RowOutcome};
use crate::error::{AppError, Result};
use crate::source::{open_reader, CleanedWriter};
use crate::stats::{GameAggregator, StatsAggregator};
use crate::types::{ClassifiedPlay, RawPlayRow};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub read: usize,
    pub classified: usize,
    pub rejected_non_scoring: usize,
    pub rejected_offensive_rebound: usize,
    /// Rows that could not be deserialized or classified at all.
    pub failed: usize,
    pub cleaned_output: Option<PathBuf>,
}

impl FileSummary {
    fn reject(&mut self, reason: Rejection) {
        match reason {
            Rejection::NonScoringResult => self.rejected_non_scoring += 1,
            Rejection::OffensiveRebound => self.rejected_offensive_rebound += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejected_non_scoring + self.rejected_offensive_rebound
    }
}

/// Where classified plays go besides the return value.
pub struct Sinks<'a> {
    pub cleaned_dir: Option<&'a Path>,
    pub stats: &'a StatsAggregator,
    pub games: &'a GameAggregator,
    pub db: Option<&'a mpsc::Sender<ClassifiedPlay>>,
}

/// Process one export. Bad rows are logged and counted; only I/O failures and
/// a closed writer channel end the file early. The summary comes back either
/// way, since rows handled before an abort were already sent on.
pub fn process_file(path: &Path, classifier: &Classifier, sinks: &Sinks<'_>) -> (FileSummary, Result<()>) {
    let mut summary = FileSummary {
        path: path.to_path_buf(),
        ..FileSummary::default()
    };
    let result = process_rows(path, classifier, sinks, &mut summary);
    if result.is_ok() {
        info!(
            file = %path.display(),
            read = summary.read,
            classified = summary.classified,
            rejected_non_scoring = summary.rejected_non_scoring,
            rejected_offensive_rebound = summary.rejected_offensive_rebound,
            failed = summary.failed,
            "[BATCH] file processed"
        );
    }
    (summary, result)
}

fn process_rows(path: &Path, classifier: &Classifier, sinks: &Sinks<'_>, summary: &mut FileSummary) -> Result<()> {
    let mut reader = open_reader(path)?;
    let mut cleaned = sinks
        .cleaned_dir
        .map(|dir| CleanedWriter::create(dir, path))
        .transpose()?;

    for (index, record) in reader.deserialize::<RawPlayRow>().enumerate() {
        let row_no = index as u64 + 1;
        summary.read += 1;

        let row = match record {
            Ok(row) => row,
            Err(e) => {
                summary.failed += 1;
                warn!(file = %path.display(), row = row_no, "[INPUT] skipping unreadable row: {e}");
                continue;
            }
        };
        // Free throws and other rejected rows still count toward the score.
        sinks.games.record_row(&row);

        let play = match classifier.process(row_no, &row) {
            Ok(RowOutcome::Classified(play)) => *play,
            Ok(RowOutcome::Rejected(reason)) => {
                summary.reject(reason);
                continue;
            }
            Err(e) => {
                summary.failed += 1;
                warn!(file = %path.display(), row = row_no, "[CLASSIFY] skipping row: {e}");
                continue;
            }
        };
        summary.classified += 1;

        if let Some(writer) = cleaned.as_mut() {
            writer.write(&play)?;
        }
        sinks.stats.record(&play);
        sinks.games.record_play(&row.game, &play);
        if let Some(tx) = sinks.db {
            tx.blocking_send(play)
                .map_err(|e| AppError::ChannelSend(e.to_string()))?;
        }
    }

    if let Some(writer) = cleaned {
        let (out, rows) = writer.finish()?;
        info!(file = %path.display(), rows, output = %out.display(), "[OUTPUT] cleaned file written");
        summary.cleaned_output = Some(out);
    }
    Ok(())
}
