pub mod cleaned;
pub mod reader;

pub use cleaned::{write_team_games_csv, CleanedWriter};
pub use reader::{collect_inputs, open_reader};
