use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::classifier::rules::GameCodeFormat;
use crate::config::{HomeProgram, UNKNOWN};
use crate::teams::lookup::{conference, team_name};
use crate::types::Site;

static UNKNOWN_TEAM_CODES: AtomicU64 = AtomicU64::new(0);
static BAD_GAME_CODES: AtomicU64 = AtomicU64::new(0);

/// Who played where, resolved against the home program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameContext {
    pub site: Site,
    pub home_code: String,
    pub away_code: String,
    pub opponent_code: String,
    /// Full opponent name, or "UNKNOWN".
    pub opponent: String,
    pub opponent_conference: String,
    pub program_conference: String,
}

/// Split a game field into `(away, home)` codes.
///
/// `FixedWidth` is the legacy export: a 7-character field is read as 3+1+3,
/// anything else as 2+1+rest. It cannot tell `ABC@DE` from `AB@CDE`, so
/// prefer `Delimited`.
pub fn split_game_code(game: &str, format: GameCodeFormat) -> Option<(&str, &str)> {
    let game = game.trim();
    let (away, home) = match format {
        GameCodeFormat::Delimited => game.split_once('@')?,
        GameCodeFormat::FixedWidth => {
            if game.len() == 7 {
                (game.get(..3)?, game.get(4..)?)
            } else {
                (game.get(..2)?, game.get(3..)?)
            }
        }
    };
    let (away, home) = (away.trim(), home.trim());
    if away.is_empty() || home.is_empty() {
        return None;
    }
    Some((away, home))
}

/// Resolve site, opponent and conferences for one game field. Never fails:
/// anything unresolved becomes "UNKNOWN" and is logged.
pub fn resolve_game(game: &str, format: GameCodeFormat, home: &HomeProgram) -> GameContext {
    if format == GameCodeFormat::FixedWidth && !matches!(game.trim().len(), 6 | 7) {
        report_bad_game_code(game, "ambiguous_fixed_width");
    }

    let Some((away_code, home_code)) = split_game_code(game, format) else {
        report_bad_game_code(game, "unparseable_game_code");
        return GameContext {
            site: Site::Away,
            home_code: UNKNOWN.to_string(),
            away_code: UNKNOWN.to_string(),
            opponent_code: UNKNOWN.to_string(),
            opponent: UNKNOWN.to_string(),
            opponent_conference: UNKNOWN.to_string(),
            program_conference: lookup_conference(&home.code),
        };
    };

    let (site, opponent_code) = if home_code == home.code {
        (Site::Home, away_code)
    } else {
        if away_code != home.code {
            report_bad_game_code(game, "home_program_not_in_game");
        }
        (Site::Away, home_code)
    };

    GameContext {
        site,
        home_code: home_code.to_string(),
        away_code: away_code.to_string(),
        opponent_code: opponent_code.to_string(),
        opponent: lookup_team_name(opponent_code),
        opponent_conference: lookup_conference(opponent_code),
        program_conference: lookup_conference(&home.code),
    }
}

fn lookup_team_name(code: &str) -> String {
    team_name(code).map_or_else(
        || {
            report_unknown_code(code, "team_name");
            UNKNOWN.to_string()
        },
        str::to_string,
    )
}

fn lookup_conference(code: &str) -> String {
    conference(code).map_or_else(
        || {
            report_unknown_code(code, "conference");
            UNKNOWN.to_string()
        },
        str::to_string,
    )
}

fn report_unknown_code(code: &str, table: &'static str) {
    let count = UNKNOWN_TEAM_CODES.fetch_add(1, Ordering::Relaxed) + 1;
    if count <= 10 || count % 1000 == 0 {
        warn!(event = "MANUAL_REVIEW", reason = "unknown_team_code", code, table, count, "[TEAMS] no {table} entry for {code:?}");
    }
}

fn report_bad_game_code(game: &str, reason: &'static str) {
    let count = BAD_GAME_CODES.fetch_add(1, Ordering::Relaxed) + 1;
    if count <= 10 || count % 1000 == 0 {
        warn!(event = "MANUAL_REVIEW", reason, game, count, "[TEAMS] could not place game {game:?}: {reason}");
    }
}
