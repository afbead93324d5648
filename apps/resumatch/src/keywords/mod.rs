pub mod extractor;
pub mod vocabulary;

pub use extractor::{KeywordEntry, KeywordExtractor};
pub use vocabulary::{SkillAlias, SkillVocabulary};
