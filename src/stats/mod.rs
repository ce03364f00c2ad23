pub mod aggregator;
pub mod games;

pub use aggregator::StatsAggregator;
pub use games::GameAggregator;
