pub mod models;
pub mod writer;

pub use writer::{seed_play_descriptions, write_team_games, DbWriter};
