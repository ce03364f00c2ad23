pub mod game;
pub mod lookup;

pub use game::resolve_game;
