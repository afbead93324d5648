//! Canonical skill vocabulary with alias resolution.
//!
//! The default table covers common languages, frameworks, data stores, cloud
//! tooling and practices. Deployments extend it through
//! `AnalyzerConfig::extra_skills`.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::SkillToken;

/// A canonical skill and the spellings that map to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAlias {
    pub canonical: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

const DEFAULT_SKILLS: &[(&str, &[&str])] = &[
    // languages
    ("python", &["py", "python3", "python 3"]),
    ("java", &["java 8", "java 11", "java 17"]),
    ("javascript", &["js", "ecmascript", "es6", "vanilla js"]),
    ("typescript", &["ts"]),
    ("c++", &["cpp", "c plus plus"]),
    ("c#", &["csharp", "c sharp"]),
    ("c", &["ansi c"]),
    ("go", &["golang"]),
    ("rust", &["rustlang"]),
    ("ruby", &[]),
    ("php", &[]),
    ("swift", &[]),
    ("kotlin", &[]),
    ("scala", &[]),
    ("r", &["rstats"]),
    ("perl", &[]),
    ("haskell", &[]),
    ("elixir", &[]),
    ("erlang", &[]),
    ("clojure", &[]),
    ("dart", &[]),
    ("lua", &[]),
    ("matlab", &[]),
    ("julia", &[]),
    ("objective-c", &["objc", "objective c"]),
    ("bash", &["shell scripting", "shell script", "sh"]),
    ("powershell", &[]),
    ("sql", &["t-sql", "tsql", "pl/sql", "plsql"]),
    ("html", &["html5"]),
    ("css", &["css3"]),
    ("sass", &["scss"]),
    // frameworks and libraries
    ("react", &["react.js", "reactjs"]),
    ("react native", &["react-native"]),
    ("angular", &["angularjs", "angular.js"]),
    ("vue", &["vue.js", "vuejs"]),
    ("svelte", &[]),
    ("next.js", &["nextjs"]),
    ("node.js", &["node", "nodejs", "node js"]),
    ("express", &["express.js", "expressjs"]),
    ("jquery", &[]),
    ("django", &[]),
    ("flask", &[]),
    ("fastapi", &[]),
    ("spring", &["spring framework"]),
    ("spring boot", &["springboot", "spring-boot"]),
    ("rails", &["ruby on rails", "ror"]),
    ("laravel", &[]),
    (".net", &["dotnet", ".net core", "asp.net", "asp.net core"]),
    ("graphql", &[]),
    ("rest", &["rest api", "rest apis", "restful", "restful api", "restful apis"]),
    ("grpc", &[]),
    ("tensorflow", &["tf"]),
    ("pytorch", &["torch"]),
    ("keras", &[]),
    ("scikit-learn", &["sklearn", "scikit learn"]),
    ("pandas", &[]),
    ("numpy", &[]),
    ("opencv", &[]),
    ("spark", &["apache spark", "pyspark"]),
    ("hadoop", &[]),
    ("kafka", &["apache kafka"]),
    ("airflow", &["apache airflow"]),
    ("dbt", &[]),
    ("celery", &[]),
    ("rabbitmq", &["rabbit mq"]),
    ("tableau", &[]),
    ("power bi", &["powerbi"]),
    ("excel", &["microsoft excel", "ms excel"]),
    // data stores
    ("postgresql", &["postgres", "psql"]),
    ("mysql", &[]),
    ("sqlite", &[]),
    ("sql server", &["mssql", "microsoft sql server"]),
    ("oracle", &["oracle db"]),
    ("mongodb", &["mongo"]),
    ("redis", &[]),
    ("elasticsearch", &["elastic search", "elastic"]),
    ("cassandra", &[]),
    ("dynamodb", &["dynamo db"]),
    ("snowflake", &[]),
    ("bigquery", &["big query"]),
    // cloud and infrastructure
    ("aws", &["amazon web services"]),
    ("azure", &["microsoft azure"]),
    ("gcp", &["google cloud", "google cloud platform"]),
    ("docker", &["containers", "containerization"]),
    ("kubernetes", &["k8s"]),
    ("helm", &[]),
    ("terraform", &[]),
    ("ansible", &[]),
    ("jenkins", &[]),
    ("github actions", &[]),
    ("gitlab ci", &["gitlab"]),
    ("ci/cd", &["cicd", "ci cd", "continuous integration", "continuous delivery", "continuous deployment"]),
    ("git", &["github", "version control"]),
    ("linux", &["unix"]),
    ("nginx", &[]),
    ("serverless", &[]),
    ("aws lambda", &["lambda"]),
    ("prometheus", &[]),
    ("grafana", &[]),
    ("microservices", &["microservice", "micro-services", "microservice architecture"]),
    ("distributed systems", &["distributed computing"]),
    // practices and domains
    ("machine learning", &["ml"]),
    ("deep learning", &["dl"]),
    ("nlp", &["natural language processing"]),
    ("computer vision", &[]),
    ("llm", &["llms", "large language models", "large language model"]),
    ("data analysis", &["data analytics"]),
    ("data science", &[]),
    ("data engineering", &[]),
    ("etl", &["elt"]),
    ("statistics", &["statistical analysis"]),
    ("agile", &[]),
    ("scrum", &[]),
    ("kanban", &[]),
    ("jira", &[]),
    ("devops", &[]),
    ("sre", &["site reliability engineering"]),
    ("tdd", &["test driven development", "test-driven development"]),
    ("unit testing", &["unit tests"]),
    ("system design", &[]),
    ("api design", &[]),
    ("oop", &["object oriented programming", "object-oriented programming"]),
    ("security", &["cybersecurity", "information security"]),
    ("networking", &["tcp/ip"]),
    ("embedded systems", &["embedded"]),
    ("figma", &[]),
    ("photoshop", &["adobe photoshop"]),
    ("selenium", &[]),
    ("cypress", &[]),
    ("jest", &[]),
    ("pytest", &[]),
    ("junit", &[]),
    ("webpack", &[]),
    // professional skills
    ("communication", &["communication skills"]),
    ("leadership", &[]),
    ("mentoring", &["mentorship"]),
    ("project management", &[]),
    ("product management", &[]),
    ("stakeholder management", &[]),
];

/// Canonical skills that are also everyday words. In free text they only
/// count when written capitalized ("Go", "R"); skill lists accept any case.
const AMBIGUOUS: &[&str] = &[
    "go", "r", "c", "swift", "spring", "express", "dart", "rust", "ruby", "oracle", "elastic",
    "node", "containers", "embedded", "lambda", "spark", "security", "git",
];

#[derive(Debug, Clone, Default)]
pub struct SkillVocabulary {
    /// canonical -> aliases, ordered for deterministic iteration
    skills: BTreeMap<String, Vec<String>>,
    /// any known spelling -> canonical
    lookup: HashMap<String, String>,
    max_words: usize,
}

impl SkillVocabulary {
    /// An empty vocabulary; `with_defaults` is what the analyzer uses.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut vocab = Self::new();
        for (canonical, aliases) in DEFAULT_SKILLS {
            vocab.insert(canonical, aliases.iter().copied());
        }
        vocab
    }

    pub fn with_extra(mut self, extra: &[SkillAlias]) -> Self {
        for skill in extra {
            self.insert(&skill.canonical, skill.aliases.iter().map(String::as_str));
        }
        self
    }

    /// Adds a canonical skill. An alias that already maps elsewhere is re-pointed.
    pub fn insert<'a>(&mut self, canonical: &str, aliases: impl IntoIterator<Item = &'a str>) {
        let canonical = normalize_key(canonical);
        if canonical.is_empty() {
            return;
        }
        let entry = self.skills.entry(canonical.clone()).or_default();
        self.lookup.insert(canonical.clone(), canonical.clone());
        self.max_words = self.max_words.max(word_count(&canonical));

        for alias in aliases {
            let alias = normalize_key(alias);
            if alias.is_empty() || alias == canonical {
                continue;
            }
            self.max_words = self.max_words.max(word_count(&alias));
            if !entry.contains(&alias) {
                entry.push(alias.clone());
            }
            self.lookup.insert(alias, canonical.clone());
        }
    }

    /// Maps a known spelling to its canonical token.
    pub fn lookup(&self, raw: &str) -> Option<SkillToken> {
        self.lookup
            .get(&normalize_key(raw))
            .map(|c| SkillToken::new(c))
    }

    /// Canonical token for `raw`; unknown spellings are kept, lowercased.
    pub fn canonicalize(&self, raw: &str) -> SkillToken {
        self.lookup(raw)
            .unwrap_or_else(|| SkillToken::new(&normalize_key(raw)))
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.lookup.contains_key(&normalize_key(raw))
    }

    pub fn aliases(&self, token: &SkillToken) -> &[String] {
        self.skills
            .get(token.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a spelling needs capitalization to count in free text.
    pub fn is_ambiguous(&self, key: &str) -> bool {
        AMBIGUOUS.contains(&key)
    }

    /// Longest known phrase, in words.
    pub fn max_words(&self) -> usize {
        self.max_words.max(1)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn word_count(s: &str) -> usize {
    s.split(' ').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_canonical() {
        let vocab = SkillVocabulary::with_defaults();
        assert_eq!(vocab.canonicalize("JS").as_str(), "javascript");
        assert_eq!(vocab.canonicalize("Golang").as_str(), "go");
        assert_eq!(vocab.canonicalize("k8s").as_str(), "kubernetes");
        assert_eq!(vocab.canonicalize("Node JS").as_str(), "node.js");
    }

    #[test]
    fn test_unknown_kept_lowercase() {
        let vocab = SkillVocabulary::with_defaults();
        assert_eq!(vocab.canonicalize("  Bevy  Engine ").as_str(), "bevy engine");
        assert!(vocab.lookup("bevy").is_none());
    }

    #[test]
    fn test_aliases_listed() {
        let vocab = SkillVocabulary::with_defaults();
        let aliases = vocab.aliases(&SkillToken::new("javascript"));
        assert!(aliases.contains(&"js".to_string()));
        assert!(vocab.aliases(&SkillToken::new("not-a-skill")).is_empty());
    }

    #[test]
    fn test_extra_skills_extend_table() {
        let vocab = SkillVocabulary::with_defaults().with_extra(&[SkillAlias {
            canonical: "Bevy".to_string(),
            aliases: vec!["bevy engine".to_string()],
        }]);
        assert_eq!(vocab.canonicalize("Bevy Engine").as_str(), "bevy");
        assert!(vocab.contains("bevy"));
    }

    #[test]
    fn test_max_words_tracks_longest_phrase() {
        let vocab = SkillVocabulary::with_defaults();
        // "microsoft sql server", "natural language processing", ...
        assert!(vocab.max_words() >= 3);
        assert_eq!(SkillVocabulary::new().max_words(), 1);
    }

    #[test]
    fn test_canonical_set_has_no_duplicates() {
        let vocab = SkillVocabulary::with_defaults();
        assert_eq!(vocab.len(), DEFAULT_SKILLS.len());
    }
}
