// Core algorithm exports
pub mod ranker;
pub mod similarity;
pub mod trending;

pub use ranker::RankingEngine;
pub use similarity::{similarity_score, MAX_SIMILARITY_SCORE};
pub use trending::{days_until, trending_score};
