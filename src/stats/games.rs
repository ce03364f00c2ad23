//! Per-game team summary: final score from every raw row, plus team shooting
//! per play category from the classified rows.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::warn;

use crate::config::UNKNOWN;
use crate::stats::aggregator::ShotCounts;
use crate::types::{Action, ClassifiedPlay, PlayType, RawPlayRow};

static UNSCORED_ROWS: AtomicU64 = AtomicU64::new(0);

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Coarse play category a possession is credited to in the game summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameCategory {
    Cut,
    Pnr,
    Post,
    RollMan,
    SpotUpShot,
    SpotUpDrive,
    Iso,
    Transition,
    OffScreen,
    HandOff,
}

impl GameCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            GameCategory::Cut => "Cut",
            GameCategory::Pnr => "Pnr",
            GameCategory::Post => "Post",
            GameCategory::RollMan => "Roll",
            GameCategory::SpotUpShot => "SUShot",
            GameCategory::SpotUpDrive => "SUDrive",
            GameCategory::Iso => "Iso",
            GameCategory::Transition => "Transition",
            GameCategory::OffScreen => "Ofsc",
            GameCategory::HandOff => "HaOf",
        }
    }
}

/// The secondary segment decides when it is a finish (cut, spot-up, roll);
/// otherwise the primary segment does. Misc and unclassified plays, and a
/// primary roll man, are not credited.
pub fn game_category(play: &ClassifiedPlay) -> Option<GameCategory> {
    let secondary = match (play.secondary.play_type, play.secondary.action) {
        (Some(PlayType::Cut), _) => Some(GameCategory::Cut),
        (Some(PlayType::SpotUp), Some(Action::Shot)) => Some(GameCategory::SpotUpShot),
        (Some(PlayType::SpotUp), Some(Action::Drive)) => Some(GameCategory::SpotUpDrive),
        (Some(PlayType::PnrRollMan), _) => Some(GameCategory::RollMan),
        _ => None,
    };
    secondary.or(match (play.primary.play_type, play.primary.action) {
        (Some(PlayType::PnrBallHandler), _) => Some(GameCategory::Pnr),
        (Some(PlayType::Iso), _) => Some(GameCategory::Iso),
        (Some(PlayType::PostUp), _) => Some(GameCategory::Post),
        (Some(PlayType::Cut), _) => Some(GameCategory::Cut),
        (Some(PlayType::SpotUp), Some(Action::Shot)) => Some(GameCategory::SpotUpShot),
        (Some(PlayType::SpotUp), Some(Action::Drive)) => Some(GameCategory::SpotUpDrive),
        (Some(PlayType::OffScreen), _) => Some(GameCategory::OffScreen),
        (Some(PlayType::HandOff), _) => Some(GameCategory::HandOff),
        (Some(PlayType::Transition), _) => Some(GameCategory::Transition),
        _ => None,
    })
}

/// Points a raw row put on the board. None when the row scored but its tags
/// are missing, so the amount is unknown.
pub fn points_scored(row: &RawPlayRow) -> Option<u32> {
    match row.result.as_str() {
        "Make 2 Pts" => Some(2),
        "Make 3 Pts" => Some(3),
        "Free Throw" => row.tags.as_deref().map(|tags| u32::from(tags.contains("FTM"))),
        "1 Pts" | "0 Pts" => row.tags.as_deref().map(|tags| {
            if tags.contains("3FGM") {
                3
            } else if tags.contains("2FGM") {
                2
            } else {
                0
            }
        }),
        _ => Some(0),
    }
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TeamCategoryLine {
    pub team: String,
    pub category: GameCategory,
    pub counts: ShotCounts,
    pub two_point_pct: f64,
    pub three_point_pct: f64,
    pub mid_range_pct: f64,
    pub effective_fg_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamGameSummary {
    pub game: String,
    pub date: String,
    pub team1: String,
    pub team2: String,
    pub team1_points: u32,
    pub team2_points: u32,
    pub total_points: u32,
    /// team1 minus team2.
    pub differential: i64,
    /// Scoring rows whose points could not be read from their tags.
    pub unscored_rows: u32,
    pub lines: Vec<TeamCategoryLine>,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct GameTally {
    date: String,
    /// Teams in the order they first had the ball.
    teams: Vec<String>,
    points: HashMap<String, u32>,
    categories: BTreeMap<(String, GameCategory), ShotCounts>,
    unscored_rows: u32,
}

impl GameTally {
    fn see_team(&mut self, team: &str) {
        if !self.teams.iter().any(|t| t == team) {
            self.teams.push(team.to_string());
        }
    }

    fn summarize(&self, game: &str) -> TeamGameSummary {
        if self.teams.len() != 2 {
            warn!(
                event = "MANUAL_REVIEW",
                reason = "team_count",
                game,
                teams = self.teams.len(),
                "[GAMES] expected two teams in {game}, found {:?}",
                self.teams
            );
        }
        let team1 = self.teams.first().cloned().unwrap_or_else(|| UNKNOWN.to_string());
        let team2 = self.teams.get(1).cloned().unwrap_or_else(|| UNKNOWN.to_string());
        let team1_points = self.points.get(&team1).copied().unwrap_or(0);
        let team2_points = self.points.get(&team2).copied().unwrap_or(0);

        let lines = self
            .categories
            .iter()
            .map(|((team, category), counts)| TeamCategoryLine {
                team: team.clone(),
                category: *category,
                counts: *counts,
                two_point_pct: counts.two_point_pct(),
                three_point_pct: counts.three_point_pct(),
                mid_range_pct: counts.mid_range_pct(),
                effective_fg_pct: counts.effective_fg(),
            })
            .collect();

        TeamGameSummary {
            game: game.to_string(),
            date: self.date.clone(),
            team1,
            team2,
            team1_points,
            team2_points,
            total_points: team1_points + team2_points,
            differential: i64::from(team1_points) - i64::from(team2_points),
            unscored_rows: self.unscored_rows,
            lines,
        }
    }
}

/// Concurrent per-game tallies, keyed by the raw game code.
#[derive(Debug, Default)]
pub struct GameAggregator {
    games: DashMap<String, GameTally>,
}

impl GameAggregator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Score bookkeeping. Takes every readable row, admitted or not, since free
    /// throws never reach the classifier.
    pub fn record_row(&self, row: &RawPlayRow) {
        let mut tally = self.games.entry(row.game.trim().to_string()).or_default();
        if tally.date.is_empty() {
            tally.date = row.date.clone();
        }
        tally.see_team(&row.team);
        match points_scored(row) {
            Some(points) => *tally.points.entry(row.team.clone()).or_default() += points,
            None => {
                tally.unscored_rows += 1;
                let count = UNSCORED_ROWS.fetch_add(1, Ordering::Relaxed) + 1;
                if count <= 10 || count % 1000 == 0 {
                    warn!(
                        event = "MANUAL_REVIEW",
                        reason = "missing_scoring_tags",
                        game = %row.game,
                        play = ?row.sequence_number,
                        result = %row.result,
                        count,
                        "[GAMES] scoring row has no tags, points not counted"
                    );
                }
            }
        }
    }

    pub fn record_play(&self, game: &str, play: &ClassifiedPlay) {
        let Some(category) = game_category(play) else {
            return;
        };
        self.games
            .entry(game.trim().to_string())
            .or_default()
            .categories
            .entry((play.offensive_team.clone(), category))
            .or_default()
            .record(play.outcome, play.shot_level);
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// One summary per game, sorted by game code.
    pub fn summaries(&self) -> Vec<TeamGameSummary> {
        let mut out: Vec<TeamGameSummary> = self
            .games
            .iter()
            .map(|r| r.value().summarize(r.key()))
            .collect();
        out.sort_by(|a, b| a.game.cmp(&b.game));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Outcome, PlaySegment, PossessionRole, ShotLevel, ShotType, Site};

    fn raw(team: &str, result: &str, tags: Option<&str>) -> RawPlayRow {
        RawPlayRow {
            game: "Bar@RIT".to_string(),
            team: team.to_string(),
            result: result.to_string(),
            play_string: "1 A > ISO".to_string(),
            date: "1/12/2024".to_string(),
            sequence_number: Some(1),
            tags: tags.map(str::to_string),
        }
    }

    fn play(team: &str, primary: PlaySegment, secondary: PlaySegment, outcome: Outcome) -> ClassifiedPlay {
        ClassifiedPlay {
            site: Site::Home,
            home: "RIT".to_string(),
            away: "Bar".to_string(),
            opponent: "Bard College".to_string(),
            opponent_conference: "Liberty League".to_string(),
            program_conference: "Liberty League".to_string(),
            offensive_team: team.to_string(),
            possession_role: PossessionRole::Defense,
            outcome: Some(outcome),
            shot_type: Some(ShotType::ToBasket),
            shot_level: ShotLevel::Rim,
            primary,
            secondary,
            primary_player: "A".to_string(),
            secondary_player: "N/A".to_string(),
            play_number: None,
            date: "1/12/2024".to_string(),
            season: Some(2024),
        }
    }

    fn segment(play_type: PlayType, action: Option<Action>) -> PlaySegment {
        PlaySegment {
            play_type: Some(play_type),
            direction: None,
            action,
        }
    }

    #[test]
    fn points_come_from_result_and_tags() {
        assert_eq!(points_scored(&raw("X", "Make 2 Pts", None)), Some(2));
        assert_eq!(points_scored(&raw("X", "Make 3 Pts", None)), Some(3));
        assert_eq!(points_scored(&raw("X", "Free Throw", Some("FTM"))), Some(1));
        assert_eq!(points_scored(&raw("X", "Free Throw", Some("FT Miss"))), Some(0));
        assert_eq!(points_scored(&raw("X", "1 Pts", Some("2FGM, FTM"))), Some(2));
        assert_eq!(points_scored(&raw("X", "0 Pts", Some("3FGM"))), Some(3));
        assert_eq!(points_scored(&raw("X", "Free Throw", None)), None);
        assert_eq!(points_scored(&raw("X", "Turnover", None)), Some(0));
    }

    #[test]
    fn score_includes_free_throws_and_differential() {
        let games = GameAggregator::new();
        games.record_row(&raw("Bard College", "Make 3 Pts", None));
        games.record_row(&raw("RIT", "Make 2 Pts", None));
        games.record_row(&raw("RIT", "Free Throw", Some("FTM")));
        games.record_row(&raw("RIT", "No Violation", None));
        games.record_row(&raw("RIT", "Free Throw", None));

        let summary = &games.summaries()[0];
        assert_eq!(summary.team1, "Bard College");
        assert_eq!(summary.team2, "RIT");
        assert_eq!((summary.team1_points, summary.team2_points), (3, 3));
        assert_eq!(summary.total_points, 6);
        assert_eq!(summary.differential, 0);
        assert_eq!(summary.unscored_rows, 1);
        assert_eq!(summary.date, "1/12/2024");
    }

    #[test]
    fn finishing_secondary_segment_takes_credit() {
        let cut = segment(PlayType::Cut, Some(Action::Basket));
        let pnr = segment(PlayType::PnrBallHandler, Some(Action::Off));
        let p = play("RIT", pnr, cut, Outcome::TwoPointMake);
        assert_eq!(game_category(&p), Some(GameCategory::Cut));

        let iso = segment(PlayType::Iso, None);
        let p = play("RIT", pnr, iso, Outcome::TwoPointMake);
        assert_eq!(game_category(&p), Some(GameCategory::Pnr));
    }

    #[test]
    fn spot_ups_split_by_action_and_misc_is_ignored() {
        let shot = segment(PlayType::SpotUp, Some(Action::Shot));
        let drive = PlaySegment {
            direction: Some(Direction::Left),
            ..segment(PlayType::SpotUp, Some(Action::Drive))
        };
        let bare = segment(PlayType::SpotUp, None);
        let none = PlaySegment::UNCLASSIFIED;
        assert_eq!(game_category(&play("RIT", shot, none, Outcome::Foul)), Some(GameCategory::SpotUpShot));
        assert_eq!(game_category(&play("RIT", drive, none, Outcome::Foul)), Some(GameCategory::SpotUpDrive));
        assert_eq!(game_category(&play("RIT", bare, none, Outcome::Foul)), None);
        assert_eq!(game_category(&play("RIT", segment(PlayType::Misc, None), none, Outcome::Foul)), None);
        assert_eq!(game_category(&play("RIT", segment(PlayType::PnrRollMan, None), none, Outcome::Foul)), None);
    }

    #[test]
    fn category_lines_per_team() {
        let games = GameAggregator::new();
        let iso = segment(PlayType::Iso, None);
        let none = PlaySegment::UNCLASSIFIED;
        games.record_row(&raw("RIT", "Make 2 Pts", None));
        games.record_row(&raw("Bard College", "Turnover", None));
        games.record_play("Bar@RIT", &play("RIT", iso, none, Outcome::TwoPointMake));
        games.record_play("Bar@RIT", &play("RIT", iso, none, Outcome::TwoPointMiss));
        games.record_play("Bar@RIT", &play("Bard College", iso, none, Outcome::Turnover));

        let summary = &games.summaries()[0];
        assert_eq!(summary.lines.len(), 2);
        let rit = summary.lines.iter().find(|l| l.team == "RIT").unwrap();
        assert_eq!(rit.category, GameCategory::Iso);
        assert_eq!((rit.counts.plays, rit.counts.two_pa, rit.counts.two_pm), (2, 2, 1));
        assert!((rit.two_point_pct - 0.5).abs() < 1e-9);
        let bard = summary.lines.iter().find(|l| l.team == "Bard College").unwrap();
        assert_eq!(bard.counts.turnovers, 1);
    }

    #[test]
    fn single_team_game_reports_unknown_opponent() {
        let games = GameAggregator::new();
        games.record_row(&raw("RIT", "Make 2 Pts", None));
        let summary = &games.summaries()[0];
        assert_eq!(summary.team2, UNKNOWN);
        assert_eq!(summary.differential, 2);
    }
}
