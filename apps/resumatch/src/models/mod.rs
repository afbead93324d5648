//! Value objects shared by every stage of the pipeline.
//! All of them are created fresh per analysis and never mutated afterwards.

pub mod report;
pub mod resume;
pub mod skill;
pub mod text;

pub use report::{AnalysisReport, AtsIssue, AtsIssueKind, AtsScore, AtsSeverity, BatchEntry, MatchResult};
pub use resume::{
    ContactInfo, DetectedSection, EducationEntry, ExperienceEntry, ResumeRecord, SectionKind,
};
pub use skill::SkillToken;
pub use text::NormalizedText;
