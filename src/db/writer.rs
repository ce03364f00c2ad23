use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::classifier::rules::RuleSet;
use crate::db::models::PlayDescriptionRow;
use crate::error::Result;
use crate::stats::games::TeamGameSummary;
use crate::types::ClassifiedPlay;

/// Insert every triple the rule set can produce. Existing triples keep their
/// ids, so re-seeding is harmless.
pub async fn seed_play_descriptions(pool: &sqlx::SqlitePool, rules: &RuleSet) -> Result<usize> {
    let triples = rules.play_descriptions();
    let mut tx = pool.begin().await?;
    for [play_type, direction, action] in &triples {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO play_descriptions (play_type, direction, play_action)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(*play_type)
        .bind(*direction)
        .bind(*action)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    info!(count = triples.len(), ruleset = %rules.version, "[DB] play descriptions seeded");
    Ok(triples.len())
}

/// `(PlayType, Direction, Action)` → PlayID, as currently stored.
pub async fn load_play_ids(pool: &sqlx::SqlitePool) -> Result<HashMap<[String; 3], i64>> {
    let rows = sqlx::query_as::<_, PlayDescriptionRow>(
        "SELECT play_id, play_type, direction, play_action FROM play_descriptions",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|r| ([r.play_type, r.direction, r.play_action], r.play_id))
        .collect())
}

/// Replace each game's score and category lines. Runs once after every file
/// task has finished.
pub async fn write_team_games(pool: &sqlx::SqlitePool, games: &[TeamGameSummary]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    for game in games {
        sqlx::query(
            r#"
            DELETE FROM team_game_plays WHERE team_game_id IN
                (SELECT id FROM team_games WHERE game = ? AND game_date = ?)
            "#,
        )
        .bind(&game.game)
        .bind(&game.date)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM team_games WHERE game = ? AND game_date = ?")
            .bind(&game.game)
            .bind(&game.date)
            .execute(&mut *tx)
            .await?;

        let team_game_id = sqlx::query(
            r#"
            INSERT INTO team_games (
                game, game_date, team1, team2,
                team1_points, team2_points, total_points, differential, unscored_rows
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&game.game)
        .bind(&game.date)
        .bind(&game.team1)
        .bind(&game.team2)
        .bind(i64::from(game.team1_points))
        .bind(i64::from(game.team2_points))
        .bind(i64::from(game.total_points))
        .bind(game.differential)
        .bind(i64::from(game.unscored_rows))
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for line in &game.lines {
            let c = &line.counts;
            sqlx::query(
                r#"
                INSERT INTO team_game_plays (
                    team_game_id, team, category, plays,
                    two_pa, two_pm, three_pa, three_pm, mid_pa, mid_pm,
                    turnovers, fouls, effective_fg
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(team_game_id)
            .bind(&line.team)
            .bind(line.category.as_str())
            .bind(i64::from(c.plays))
            .bind(i64::from(c.two_pa))
            .bind(i64::from(c.two_pm))
            .bind(i64::from(c.three_pa))
            .bind(i64::from(c.three_pm))
            .bind(i64::from(c.mid_pa))
            .bind(i64::from(c.mid_pm))
            .bind(i64::from(c.turnovers))
            .bind(i64::from(c.fouls))
            .bind(line.effective_fg_pct)
            .execute(&mut *tx)
            .await?;
        }
    }
    tx.commit().await?;
    info!(games = games.len(), "[DB] team game summaries written");
    Ok(games.len())
}

/// Receives classified plays from the per-file tasks and persists them.
/// Runs until every sender is dropped.
pub struct DbWriter {
    pool: sqlx::SqlitePool,
    play_rx: mpsc::Receiver<ClassifiedPlay>,
    play_ids: HashMap<[String; 3], i64>,
}

impl DbWriter {
    pub fn new(pool: sqlx::SqlitePool, play_rx: mpsc::Receiver<ClassifiedPlay>) -> Self {
        Self {
            pool,
            play_rx,
            play_ids: HashMap::new(),
        }
    }

    /// Returns the number of rows written.
    pub async fn run(mut self) -> u64 {
        match load_play_ids(&self.pool).await {
            Ok(ids) => self.play_ids = ids,
            Err(e) => error!("[DB] could not load play descriptions, PlayIDs will be NULL: {e}"),
        }

        let mut written = 0u64;
        let mut failed = 0u64;
        while let Some(play) = self.play_rx.recv().await {
            match self.write_play(&play).await {
                Ok(()) => written += 1,
                Err(e) => {
                    failed += 1;
                    error!(player = %play.primary_player, "[DB] write error: {e}");
                }
            }
        }
        info!(written, failed, "[DB] writer drained");
        written
    }

    async fn write_play(&self, play: &ClassifiedPlay) -> Result<()> {
        let primary_id = self.lookup(play.primary.triple());
        let secondary_id = self.lookup(play.secondary.triple());
        let play_number = play.play_number.map(i64::from);
        let season = play.season.map(i64::from);
        let shot_level = i64::from(play.shot_level.tier());

        sqlx::query(
            r#"
            INSERT INTO plays (
                site, home, away, opponent, offensive_team, possession_role,
                outcome, shot_type, shot_level,
                play_id, primary_player, secondary_play_id, secondary_player,
                opponent_conference, program_conference,
                play_number, game_date, season
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(play.site.as_str())
        .bind(&play.home)
        .bind(&play.away)
        .bind(&play.opponent)
        .bind(&play.offensive_team)
        .bind(play.possession_role.as_str())
        .bind(play.outcome_label())
        .bind(play.shot_type_label())
        .bind(shot_level)
        .bind(primary_id)
        .bind(&play.primary_player)
        .bind(secondary_id)
        .bind(&play.secondary_player)
        .bind(&play.opponent_conference)
        .bind(&play.program_conference)
        .bind(play_number)
        .bind(&play.date)
        .bind(season)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn lookup(&self, triple: [&'static str; 3]) -> Option<i64> {
        let id = self.play_ids.get(&triple.map(str::to_string)).copied();
        if id.is_none() {
            warn!(
                event = "MANUAL_REVIEW",
                reason = "unknown_play_description",
                play_type = triple[0],
                direction = triple[1],
                action = triple[2],
                "[DB] no PlayID for triple, storing NULL"
            );
        }
        id
    }
}
