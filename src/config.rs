use std::path::PathBuf;

use crate::classifier::rules::{RuleSet, ShotFallback};
use crate::error::{AppError, Result};

/// Delimiter between tags in a play string.
pub const TAG_DELIMITER: &str = " > ";

/// Hand-off marker between the primary and secondary segment. Tested before
/// the generic delimiter split.
pub const BALL_DELIVERED_MARKER: &str = " > Ball Delivered > ";

/// The hand-off tag on its own.
pub const BALL_DELIVERED_TAG: &str = "Ball Delivered";

/// Placeholder for "classified, but no value applies".
pub const NOT_APPLICABLE: &str = "N/A";

/// Placeholder for team codes the lookup tables do not know.
pub const UNKNOWN: &str = "UNKNOWN";

/// Channel capacity between the per-file classifier tasks and the writer.
pub const CHANNEL_CAPACITY: usize = 1024;

pub const DEFAULT_HOME_TEAM_CODE: &str = "RIT";
pub const DEFAULT_HOME_TEAM_NAME: &str = "Rochester Institute of Technology Tigers";

/// The program whose games are being logged. Decides site, opponent and
/// offense/defense for every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeProgram {
    /// Short game code, e.g. `RIT`.
    pub code: String,
    /// Value of the `Team` column on the program's own possessions.
    pub name: String,
}

impl Default for HomeProgram {
    fn default() -> Self {
        Self {
            code: DEFAULT_HOME_TEAM_CODE.to_string(),
            name: DEFAULT_HOME_TEAM_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// CSV files or directories of CSV files (INPUT_PATHS, comma-separated)
    pub input_paths: Vec<PathBuf>,
    /// SQLite file; None disables persistence (DB_PATH="")
    pub db_path: Option<String>,
    /// Where `cleaned_<file>.csv` outputs go (CLEANED_OUTPUT_DIR)
    pub cleaned_output_dir: Option<PathBuf>,
    /// Aggregated JSON report destination (REPORT_PATH)
    pub report_path: Option<PathBuf>,
    pub home: HomeProgram,
    /// RULESET=2023|2024, with SHOT_TYPE_FALLBACK applied on top
    pub rules: RuleSet,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut rules = parse_ruleset(&std::env::var("RULESET").unwrap_or_else(|_| "2024".to_string()))?;
        if let Ok(fallback) = std::env::var("SHOT_TYPE_FALLBACK") {
            rules.shot_fallback = parse_shot_fallback(&fallback)?;
        }

        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            input_paths: std::env::var("INPUT_PATHS")
                .unwrap_or_else(|_| "data/raw".to_string())
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect(),
            db_path: std::env::var("DB_PATH")
                .map(|s| s.trim().to_string())
                .map(|s| if s.is_empty() { None } else { Some(s) })
                .unwrap_or_else(|_| Some("plays.db".to_string())),
            cleaned_output_dir: non_empty_var("CLEANED_OUTPUT_DIR").map(PathBuf::from),
            report_path: non_empty_var("REPORT_PATH").map(PathBuf::from),
            home: HomeProgram {
                code: std::env::var("HOME_TEAM_CODE")
                    .unwrap_or_else(|_| DEFAULT_HOME_TEAM_CODE.to_string()),
                name: std::env::var("HOME_TEAM_NAME")
                    .unwrap_or_else(|_| DEFAULT_HOME_TEAM_NAME.to_string()),
            },
            rules,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn parse_ruleset(value: &str) -> Result<RuleSet> {
    match value.trim() {
        "2023" => Ok(RuleSet::LEGACY_2023),
        "2024" => Ok(RuleSet::CURRENT_2024),
        other => Err(AppError::Config(format!(
            "RULESET must be 2023 or 2024, got {other:?}"
        ))),
    }
}

fn parse_shot_fallback(value: &str) -> Result<ShotFallback> {
    match value.trim() {
        "catch_all" => Ok(ShotFallback::CatchAll),
        "strict" => Ok(ShotFallback::Strict),
        other => Err(AppError::Config(format!(
            "SHOT_TYPE_FALLBACK must be catch_all or strict, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::rules::RuleSetVersion;

    #[test]
    fn ruleset_versions_parse() {
        assert_eq!(parse_ruleset("2023").unwrap().version, RuleSetVersion::Legacy2023);
        assert_eq!(parse_ruleset(" 2024 ").unwrap().version, RuleSetVersion::Current2024);
        assert!(matches!(parse_ruleset("2025"), Err(AppError::Config(_))));
    }

    #[test]
    fn shot_fallback_parses() {
        assert_eq!(parse_shot_fallback("strict").unwrap(), ShotFallback::Strict);
        assert_eq!(parse_shot_fallback("catch_all").unwrap(), ShotFallback::CatchAll);
        assert!(parse_shot_fallback("loose").is_err());
    }
}
