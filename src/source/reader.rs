use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// Expand the configured inputs into a sorted, de-duplicated list of CSV files.
/// Directories contribute every `*.csv` directly inside them; missing paths
/// are logged and skipped.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in std::fs::read_dir(path)? {
                let candidate = entry?.path();
                if candidate.is_file() && is_csv(&candidate) {
                    files.push(candidate);
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            warn!(path = %path.display(), "[INPUT] path does not exist, skipping");
        }
    }
    files.sort();
    files.dedup();
    debug!(count = files.len(), "[INPUT] resolved input files");
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Header-aware reader over one raw export. Cells are trimmed; rows with a
/// different column count are left for deserialization to reject.
pub fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawPlayRow;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("play-classifier-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn directories_expand_to_sorted_csv_files() {
        let dir = scratch_dir("collect");
        std::fs::write(dir.join("b.csv"), "").unwrap();
        std::fs::write(dir.join("a.CSV"), "").unwrap();
        std::fs::write(dir.join("notes.txt"), "").unwrap();

        let files = collect_inputs(&[dir.clone(), dir.join("b.csv"), dir.join("missing.csv")]).unwrap();
        assert_eq!(files, vec![dir.join("a.CSV"), dir.join("b.csv")]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reader_trims_cells_and_tolerates_blank_sequence() {
        let dir = scratch_dir("reader");
        let path = dir.join("game.csv");
        std::fs::write(
            &path,
            "Game,Team,Result,Synergy String,Date,#\n\
             Bar@RIT , Bard College ,Make 2 Pts,12 Jones ISO > Left,1/12/2024,\n",
        )
        .unwrap();

        let mut reader = open_reader(&path).unwrap();
        let row: RawPlayRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.game, "Bar@RIT");
        assert_eq!(row.team, "Bard College");
        assert_eq!(row.sequence_number, None);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
