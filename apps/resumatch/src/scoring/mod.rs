pub mod ats;
pub mod experience;
pub mod fit;
pub mod recommendations;

pub use ats::AtsScorer;
pub use fit::{KeywordMatchScorer, MatchScorer};
pub use recommendations::RecommendationGenerator;
