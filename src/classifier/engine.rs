//! One raw row in, one classified play out.
//!
//! The engine holds nothing but the rule set, the home program and the
//! inline-marker list derived from the rules, so a single `Classifier` can be
//! shared by any number of threads.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::classifier::admission::{admit, Rejection};
use crate::classifier::outcome::map_outcome;
use crate::classifier::router::classify_segment;
use crate::classifier::rules::RuleSet;
use crate::classifier::shot::{classify_shot_level, classify_shot_type};
use crate::classifier::tokenizer::PlayString;
use crate::config::HomeProgram;
use crate::error::{AppError, Result};
use crate::teams::resolve_game;
use crate::types::{ClassifiedPlay, Outcome, PlaySegment, PossessionRole, RawPlayRow};

/// Result of running one row through the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Rejected(Rejection),
    Classified(Box<ClassifiedPlay>),
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
    home: HomeProgram,
    inline_markers: Vec<&'static str>,
}

impl Classifier {
    pub fn new(rules: RuleSet, home: HomeProgram) -> Self {
        let inline_markers = rules.inline_markers();
        Self {
            rules,
            home,
            inline_markers,
        }
    }

    pub fn admit(&self, row: &RawPlayRow) -> std::result::Result<(), Rejection> {
        admit(row, &self.rules)
    }

    /// Admission first, then classification.
    pub fn process(&self, row_no: u64, row: &RawPlayRow) -> Result<RowOutcome> {
        if let Err(reason) = self.admit(row) {
            debug!(row = row_no, %reason, result = %row.result, "[ADMIT] row rejected");
            return Ok(RowOutcome::Rejected(reason));
        }
        self.classify(row_no, row)
            .map(|play| RowOutcome::Classified(Box::new(play)))
    }

    /// Classify an admitted row. Only an empty play string is an error; every
    /// other gap becomes a sentinel plus a manual-review log line.
    pub fn classify(&self, row_no: u64, row: &RawPlayRow) -> Result<ClassifiedPlay> {
        if row.play_string.trim().is_empty() {
            return Err(AppError::MissingField {
                row: row_no,
                field: "Synergy String",
            });
        }

        let play = PlayString::parse(&row.play_string, &self.inline_markers);

        let outcome = map_outcome(&row.result, &self.rules);
        if outcome.is_none() {
            warn!(
                event = "MANUAL_REVIEW",
                reason = "unknown_result",
                row = row_no,
                result = %row.result,
                "[CLASSIFY] result label has no outcome code"
            );
        }

        let shot = classify_shot_type(&play, &self.rules);
        if shot.needs_review {
            if is_field_goal_attempt(outcome) {
                warn!(
                    event = "MANUAL_REVIEW",
                    reason = "no_shot_type",
                    row = row_no,
                    play = %row.play_string,
                    "[CLASSIFY] shot attempt without a shot-type tag"
                );
            } else {
                debug!(row = row_no, play = %row.play_string, "[CLASSIFY] no shot-type tag");
            }
        }
        let shot_level = classify_shot_level(&play, &self.rules);

        let primary = classify_segment(&play.primary, &self.rules);
        if primary.play_type.is_none() {
            warn!(
                event = "MANUAL_REVIEW",
                reason = "no_play_type",
                segment = "primary",
                row = row_no,
                play = %row.play_string,
                "[CLASSIFY] primary segment matched no play type"
            );
        }
        let secondary = match &play.secondary {
            Some(segment) => {
                let classified = classify_segment(segment, &self.rules);
                if classified.play_type.is_none() {
                    warn!(
                        event = "MANUAL_REVIEW",
                        reason = "no_play_type",
                        segment = "secondary",
                        row = row_no,
                        play = %row.play_string,
                        "[CLASSIFY] secondary segment matched no play type"
                    );
                }
                classified
            }
            None => PlaySegment::UNCLASSIFIED,
        };

        let game = resolve_game(&row.game, self.rules.game_code_format, &self.home);
        let possession_role = if row.team.trim() == self.home.name {
            PossessionRole::Offense
        } else {
            PossessionRole::Defense
        };

        let season = season_for(&row.date);
        if season.is_none() {
            warn!(row = row_no, date = %row.date, "[CLASSIFY] unparseable date, season left empty");
        }

        Ok(ClassifiedPlay {
            site: game.site,
            home: game.home_code,
            away: game.away_code,
            opponent: game.opponent,
            opponent_conference: game.opponent_conference,
            program_conference: game.program_conference,
            offensive_team: row.team.clone(),
            possession_role,
            outcome,
            shot_type: shot.shot_type,
            shot_level,
            primary,
            secondary,
            primary_player: play.primary_player(),
            secondary_player: play.secondary_player(),
            play_number: row.sequence_number,
            date: row.date.clone(),
            season,
        })
    }
}

fn is_field_goal_attempt(outcome: Option<Outcome>) -> bool {
    matches!(
        outcome,
        Some(
            Outcome::TwoPointMake
                | Outcome::ThreePointMake
                | Outcome::TwoPointMiss
                | Outcome::ThreePointMiss
                | Outcome::And1
        )
    )
}

/// Season a game date belongs to: games after June count toward the next
/// calendar year's season.
pub fn season_for(date: &str) -> Option<i32> {
    let date = NaiveDate::parse_from_str(date.trim(), "%m/%d/%Y").ok()?;
    Some(if date.month() > 6 { date.year() + 1 } else { date.year() })
}
