/// Row types for the play store.

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PlayDescriptionRow {
    pub play_id: i64,
    pub play_type: String,
    pub direction: String,
    pub play_action: String,
}

/// Read-back shape of `plays`; nothing in the pipeline reads plays back.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PlayRow {
    pub id: i64,
    pub site: String,
    pub home: String,
    pub away: String,
    pub opponent: String,
    pub offensive_team: String,
    pub possession_role: String,
    pub outcome: String,
    pub shot_type: String,
    pub shot_level: i64,
    pub play_id: Option<i64>,
    pub primary_player: String,
    pub secondary_play_id: Option<i64>,
    pub secondary_player: String,
    pub opponent_conference: String,
    pub program_conference: String,
    pub play_number: Option<i64>,
    pub game_date: String,
    pub season: Option<i64>,
}

/// Read-back shape of `team_games`.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TeamGameRow {
    pub id: i64,
    pub game: String,
    pub game_date: String,
    pub team1: String,
    pub team2: String,
    pub team1_points: i64,
    pub team2_points: i64,
    pub total_points: i64,
    pub differential: i64,
    pub unscored_rows: i64,
}
