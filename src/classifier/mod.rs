pub mod admission;
pub mod engine;
pub mod outcome;
pub mod router;
pub mod rules;
pub mod shot;
pub mod tokenizer;

pub use admission::Rejection;
pub use engine::{Classifier, RowOutcome};
