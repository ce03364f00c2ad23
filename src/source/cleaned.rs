//! Flat per-play CSV output, one row per classified possession.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::NOT_APPLICABLE;
use crate::error::Result;
use crate::stats::games::TeamGameSummary;
use crate::types::{ClassifiedPlay, PossessionRole, ShotLevel, Site};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CleanedRow<'a> {
    pub site: Site,
    pub home: &'a str,
    pub away: &'a str,
    pub opponent: &'a str,
    pub offensive_team: &'a str,
    pub possession_role: PossessionRole,
    pub outcome: &'static str,
    pub shot_type: &'static str,
    pub shot_level: ShotLevel,
    pub primary_player: &'a str,
    pub primary_play_type: &'static str,
    pub primary_direction: &'static str,
    pub primary_action: &'static str,
    pub secondary_player: &'a str,
    pub secondary_play_type: &'static str,
    pub secondary_direction: &'static str,
    pub secondary_action: &'static str,
    pub opponent_conference: &'a str,
    pub program_conference: &'a str,
    pub play_number: String,
    pub date: &'a str,
    pub season: String,
}

impl<'a> From<&'a ClassifiedPlay> for CleanedRow<'a> {
    fn from(play: &'a ClassifiedPlay) -> Self {
        let [primary_play_type, primary_direction, primary_action] = play.primary.triple();
        let [secondary_play_type, secondary_direction, secondary_action] = play.secondary.triple();
        Self {
            site: play.site,
            home: &play.home,
            away: &play.away,
            opponent: &play.opponent,
            offensive_team: &play.offensive_team,
            possession_role: play.possession_role,
            outcome: play.outcome_label(),
            shot_type: play.shot_type_label(),
            shot_level: play.shot_level,
            primary_player: &play.primary_player,
            primary_play_type,
            primary_direction,
            primary_action,
            secondary_player: &play.secondary_player,
            secondary_play_type,
            secondary_direction,
            secondary_action,
            opponent_conference: &play.opponent_conference,
            program_conference: &play.program_conference,
            play_number: or_na(play.play_number),
            date: &play.date,
            season: or_na(play.season),
        }
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_APPLICABLE.to_string(), |v| v.to_string())
}

/// `cleaned_<input file name>` inside `dir`.
pub fn cleaned_path(dir: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "plays.csv".to_string());
    dir.join(format!("cleaned_{name}"))
}

pub struct CleanedWriter {
    inner: csv::Writer<File>,
    path: PathBuf,
    rows: u64,
}

impl CleanedWriter {
    pub fn create(dir: &Path, input: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = cleaned_path(dir, input);
        let inner = csv::Writer::from_path(&path)?;
        Ok(Self { inner, path, rows: 0 })
    }

    pub fn write(&mut self, play: &ClassifiedPlay) -> Result<()> {
        self.inner.serialize(CleanedRow::from(play))?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and report where the rows went.
    pub fn finish(mut self) -> Result<(PathBuf, u64)> {
        self.inner.flush()?;
        Ok((self.path, self.rows))
    }
}

// ---------------------------------------------------------------------------
// Per-game team summary
// ---------------------------------------------------------------------------

pub const TEAM_GAMES_FILE: &str = "team_games.csv";
pub const TEAM_GAME_PLAYS_FILE: &str = "team_game_plays.csv";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TeamGameScoreRow<'a> {
    game: &'a str,
    date: &'a str,
    team1: &'a str,
    team2: &'a str,
    team1_pts: u32,
    team2_pts: u32,
    total_pts: u32,
    differential: i64,
}

#[derive(Debug, Serialize)]
struct TeamGamePlayRow<'a> {
    #[serde(rename = "Game")]
    game: &'a str,
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "Team")]
    team: &'a str,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Plays")]
    plays: u32,
    #[serde(rename = "2PA")]
    two_pa: u32,
    #[serde(rename = "2PM")]
    two_pm: u32,
    #[serde(rename = "3PA")]
    three_pa: u32,
    #[serde(rename = "3PM")]
    three_pm: u32,
    #[serde(rename = "MidPA")]
    mid_pa: u32,
    #[serde(rename = "MidPM")]
    mid_pm: u32,
    #[serde(rename = "eFG")]
    effective_fg: f64,
    #[serde(rename = "TO")]
    turnovers: u32,
    #[serde(rename = "Fouls")]
    fouls: u32,
}

/// Write the game scores and the per-team category lines as two CSVs in `dir`.
pub fn write_team_games_csv(dir: &Path, games: &[TeamGameSummary]) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let scores_path = dir.join(TEAM_GAMES_FILE);
    let plays_path = dir.join(TEAM_GAME_PLAYS_FILE);
    let mut scores = csv::Writer::from_path(&scores_path)?;
    let mut plays = csv::Writer::from_path(&plays_path)?;

    for game in games {
        scores.serialize(TeamGameScoreRow {
            game: &game.game,
            date: &game.date,
            team1: &game.team1,
            team2: &game.team2,
            team1_pts: game.team1_points,
            team2_pts: game.team2_points,
            total_pts: game.total_points,
            differential: game.differential,
        })?;
        for line in &game.lines {
            let c = &line.counts;
            plays.serialize(TeamGamePlayRow {
                game: &game.game,
                date: &game.date,
                team: &line.team,
                category: line.category.as_str(),
                plays: c.plays,
                two_pa: c.two_pa,
                two_pm: c.two_pm,
                three_pa: c.three_pa,
                three_pm: c.three_pm,
                mid_pa: c.mid_pa,
                mid_pm: c.mid_pm,
                effective_fg: line.effective_fg_pct,
                turnovers: c.turnovers,
                fouls: c.fouls,
            })?;
        }
    }
    scores.flush()?;
    plays.flush()?;
    Ok((scores_path, plays_path))
}
