pub mod matcher;
pub mod similarity;

pub use matcher::{find_match, MatchOutcome};
pub use similarity::{similarity, DEFAULT_SIMILARITY_THRESHOLD};
