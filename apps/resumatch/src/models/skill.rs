use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical, lowercase skill or keyword.
///
/// Alias resolution ("js" -> "javascript") happens in
/// `keywords::vocabulary::SkillVocabulary::canonicalize`; this type only
/// guarantees the lowercase, trimmed form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillToken(String);

impl SkillToken {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SkillToken {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for SkillToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
