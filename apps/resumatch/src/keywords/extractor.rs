//! Keyword/Skill Extractor — derives canonical skill tokens from free text.
//!
//! Algorithm, per line and per punctuation-delimited segment:
//! 1. Split on whitespace, strip sentence punctuation but keep `+ # . / -`
//!    inside terms (`c++`, `c#`, `node.js`, `ci/cd`).
//! 2. Greedily match the longest vocabulary phrase (bigrams and longer first).
//! 3. Unmatched single words are kept when they look technical: acronyms
//!    (`SQL`, `EC2`), `X.js`, `X++`, `X#`. Stop-words are discarded. Acronyms
//!    are not trusted inside all-caps runs (`WHAT WE OFFER`), which are
//!    headings rather than terms.
//! 4. Slash-joined words outside the vocabulary are split (`python/django`).
//!
//! Pure and deterministic: no state survives a call.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::keywords::vocabulary::SkillVocabulary;
use crate::models::SkillToken;

static ACRONYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9]{1,5}$").unwrap());
static JS_LIBRARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(\.[a-z0-9]+)*\.js$").unwrap());
static PLUS_PLUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]+\+\+$").unwrap());
static SHARP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]#$").unwrap());

/// Characters that always end a segment; phrases never span them.
const SEGMENT_BREAKS: &[char] = &[
    ',', ';', ':', '|', '(', ')', '[', ']', '{', '}', '•', '·', '!', '?', '"', '“', '”', '—', '–',
];

/// Lines containing these get the requirement boost.
const REQUIREMENT_CUES: &[&str] = &[
    "require",
    "must",
    "qualification",
    "minimum",
    "essential",
    "need",
];

const REQUIREMENT_WEIGHT: f64 = 1.5;

const STOP_WORDS: &[&str] = &[
    "a", "about", "all", "also", "am", "an", "and", "any", "apply", "are", "as", "asap", "at",
    "ba", "be", "bonus", "bs", "bsc", "but", "by", "ceo", "cfo", "coo", "cto", "do", "duties",
    "eeo", "eoe", "est", "etc", "eu", "faq", "for", "from", "gpa", "great", "has", "have",
    "hiring", "how", "hr", "ii", "iii", "in", "inc", "is", "it", "iv", "job", "join", "llc",
    "ltd", "ma", "mba", "ms", "msc", "must", "na", "new", "nice", "no", "not", "of", "offer",
    "ok", "on", "or", "our", "perks", "phd", "plus", "pm", "pst", "remote", "role", "salary",
    "skills", "so", "tbd", "team", "the", "to", "uk", "up", "us", "usa", "vp", "we", "what",
    "who", "why", "will", "with", "you", "your",
];

/// A keyword as it appears in a job description, with importance signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: SkillToken,
    pub frequency: u32,
    /// 1.5 when any occurrence sits on a requirement line, else 1.0
    pub position_weight: f64,
    /// frequency * position_weight
    pub weighted_score: f64,
    /// Index of the first occurrence among all recognized keywords.
    pub first_position: usize,
}

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    vocabulary: Arc<SkillVocabulary>,
}

struct Word<'a> {
    original: &'a str,
    lower: String,
}

impl KeywordExtractor {
    pub fn new(vocabulary: Arc<SkillVocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    /// The set of canonical keywords found in `text`.
    pub fn extract(&self, text: &str) -> BTreeSet<SkillToken> {
        let mut found = BTreeSet::new();
        self.scan(text, |token, _| {
            found.insert(token);
        });
        found
    }

    /// Keywords with frequency and requirement weighting, most important first.
    pub fn keyword_inventory(&self, text: &str) -> Vec<KeywordEntry> {
        let mut entries: BTreeMap<SkillToken, KeywordEntry> = BTreeMap::new();
        let mut position = 0usize;

        self.scan(text, |token, on_requirement_line| {
            let weight = if on_requirement_line {
                REQUIREMENT_WEIGHT
            } else {
                1.0
            };
            let entry = entries.entry(token.clone()).or_insert_with(|| KeywordEntry {
                keyword: token,
                frequency: 0,
                position_weight: 1.0,
                weighted_score: 0.0,
                first_position: position,
            });
            entry.frequency += 1;
            entry.position_weight = entry.position_weight.max(weight);
            entry.weighted_score = entry.frequency as f64 * entry.position_weight;
            position += 1;
        });

        let mut inventory: Vec<KeywordEntry> = entries.into_values().collect();
        inventory.sort_by(|a, b| {
            b.weighted_score
                .partial_cmp(&a.weighted_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.first_position.cmp(&b.first_position))
        });
        inventory
    }

    fn scan<F>(&self, text: &str, mut visit: F)
    where
        F: FnMut(SkillToken, bool),
    {
        for line in text.lines() {
            let line_lower = line.to_lowercase();
            let requirement = REQUIREMENT_CUES.iter().any(|cue| line_lower.contains(cue));

            for piece in line.split(SEGMENT_BREAKS) {
                let mut segment: Vec<Word> = Vec::new();
                for raw in piece.split_whitespace() {
                    let ends_sentence = raw.ends_with('.') && !raw.ends_with("..");
                    let cleaned = clean_word(raw);
                    if !cleaned.is_empty() {
                        segment.push(Word {
                            original: cleaned,
                            lower: cleaned.to_lowercase(),
                        });
                    }
                    if ends_sentence {
                        self.scan_segment(&segment, requirement, &mut visit);
                        segment.clear();
                    }
                }
                self.scan_segment(&segment, requirement, &mut visit);
            }
        }
    }

    fn scan_segment<F>(&self, words: &[Word], requirement: bool, visit: &mut F)
    where
        F: FnMut(SkillToken, bool),
    {
        let max_n = self.vocabulary.max_words();
        let acronyms = !is_shouting(words);
        let mut i = 0;
        'outer: while i < words.len() {
            for n in (2..=max_n.min(words.len() - i)).rev() {
                let phrase = words[i..i + n]
                    .iter()
                    .map(|w| w.lower.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                if let Some(token) = self.vocabulary.lookup(&phrase) {
                    visit(token, requirement);
                    i += n;
                    continue 'outer;
                }
            }

            let word = &words[i];
            match self.classify(word.original, &word.lower, acronyms) {
                Some(token) => visit(token, requirement),
                None if word.lower.contains('/') => {
                    for part in word.original.split('/') {
                        let part = clean_word(part);
                        if let Some(token) = self.classify(part, &part.to_lowercase(), acronyms) {
                            visit(token, requirement);
                        }
                    }
                }
                None => {}
            }
            i += 1;
        }
    }

    /// Single-word decision: vocabulary first, then the technical-term patterns.
    fn classify(&self, original: &str, lower: &str, acronyms: bool) -> Option<SkillToken> {
        if lower.is_empty() {
            return None;
        }
        if let Some(token) = self.vocabulary.lookup(lower) {
            if self.vocabulary.is_ambiguous(lower) && !starts_uppercase(original) {
                return None;
            }
            return Some(token);
        }
        if STOP_WORDS.contains(&lower) {
            return None;
        }
        if (acronyms && ACRONYM.is_match(original))
            || JS_LIBRARY.is_match(lower)
            || PLUS_PLUS.is_match(lower)
            || SHARP.is_match(lower)
        {
            return Some(SkillToken::new(lower));
        }
        None
    }
}

/// Two or more lettered words and none of them with a lowercase letter.
fn is_shouting(words: &[Word]) -> bool {
    let lettered = words
        .iter()
        .filter(|w| w.original.chars().any(char::is_alphabetic))
        .count();
    lettered >= 2
        && words
            .iter()
            .all(|w| !w.original.chars().any(char::is_lowercase))
}

fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

/// Strips surrounding punctuation; keeps a leading `.` before a letter (`.net`)
/// and trailing `+`/`#` (`c++`, `c#`).
fn clean_word(raw: &str) -> &str {
    let mut word = raw.trim_start_matches(|c: char| !c.is_alphanumeric() && c != '.');
    while let Some(rest) = word.strip_prefix('.') {
        if rest.starts_with(|c: char| c.is_alphanumeric()) {
            break;
        }
        word = rest;
    }
    word.trim_end_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(Arc::new(SkillVocabulary::with_defaults()))
    }

    fn tokens(text: &str) -> Vec<String> {
        extractor()
            .extract(text)
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_requirement_sentence() {
        assert_eq!(
            tokens("Requires Python, SQL, 3+ years experience"),
            vec!["python", "sql"]
        );
    }

    #[test]
    fn test_special_spellings() {
        let found = tokens("Experience with C++, C#, Node.js, .NET and CI/CD pipelines.");
        for expected in ["c++", "c#", "node.js", ".net", "ci/cd"] {
            assert!(found.contains(&expected.to_string()), "missing {expected} in {found:?}");
        }
    }

    #[test]
    fn test_bigrams_preferred_over_unigrams() {
        let found = tokens("Built apps in React Native and trained machine learning models");
        assert!(found.contains(&"react native".to_string()));
        assert!(found.contains(&"machine learning".to_string()));
        assert!(!found.contains(&"react".to_string()));
    }

    #[test]
    fn test_phrases_do_not_cross_punctuation() {
        let found = tokens("We use React, Native apps are out");
        assert!(found.contains(&"react".to_string()));
        assert!(!found.contains(&"react native".to_string()));
    }

    #[test]
    fn test_aliases_canonicalized() {
        assert_eq!(tokens("JS and Golang on k8s"), vec!["go", "javascript", "kubernetes"]);
    }

    #[test]
    fn test_ambiguous_words_need_capitals() {
        assert!(tokens("ready to go and swift delivery").is_empty());
        assert_eq!(tokens("Services written in Go"), vec!["go"]);
    }

    #[test]
    fn test_acronyms_and_stop_words() {
        let found = tokens("The CEO wants GraphQL and an ETL job on EC2 in the USA");
        assert!(found.contains(&"ec2".to_string()));
        assert!(found.contains(&"etl".to_string()));
        assert!(found.contains(&"graphql".to_string()));
        assert!(!found.contains(&"ceo".to_string()));
        assert!(!found.contains(&"usa".to_string()));
    }

    #[test]
    fn test_uppercase_headings_are_not_keywords() {
        let jd = "REQUIREMENTS\nPython, SQL\nNICE TO HAVE\nDocker\nWHAT WE OFFER\nGREAT BENEFITS\nPERKS";
        assert_eq!(tokens(jd), vec!["docker", "python", "sql"]);
        // vocabulary terms still count inside an all-caps line
        assert_eq!(tokens("SKILLS PYTHON AND KAFKA"), vec!["kafka", "python"]);
        // a lone acronym on its own line is still a term
        assert_eq!(tokens("Stack\nHPC"), vec!["hpc"]);
    }

    #[test]
    fn test_pattern_terms_outside_vocabulary() {
        let found = tokens("Shipped with Three.js, Zig++ and F# tooling");
        assert!(found.contains(&"three.js".to_string()));
        assert!(found.contains(&"zig++".to_string()));
        assert!(found.contains(&"f#".to_string()));
    }

    #[test]
    fn test_slash_split() {
        assert_eq!(tokens("python/django stack"), vec!["django", "python"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "Senior engineer: Rust, Kafka, AWS, Terraform; nice to have Go.";
        let ex = extractor();
        let first = ex.extract(text);
        for _ in 0..3 {
            assert_eq!(ex.extract("unrelated PHP text"), ex.extract("unrelated PHP text"));
            assert_eq!(ex.extract(text), first);
        }
    }

    #[test]
    fn test_empty_text() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().keyword_inventory("").is_empty());
    }

    #[test]
    fn test_inventory_weights_requirement_lines() {
        let jd = "We build tools in Rust and Kafka.\nRequirements: SQL\nNice: Kafka";
        let inventory = extractor().keyword_inventory(jd);
        let kafka = inventory.iter().find(|e| e.keyword.as_str() == "kafka").unwrap();
        let sql = inventory.iter().find(|e| e.keyword.as_str() == "sql").unwrap();
        assert_eq!(kafka.frequency, 2);
        assert!((kafka.weighted_score - 2.0).abs() < f64::EPSILON);
        assert!((sql.weighted_score - 1.5).abs() < f64::EPSILON);
        // kafka (2.0) > sql (1.5) > rust (1.0)
        let order: Vec<_> = inventory.iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(order, vec!["kafka", "sql", "rust"]);
    }

    #[test]
    fn test_inventory_ties_break_on_first_position() {
        let inventory = extractor().keyword_inventory("Docker then Python then Redis");
        let order: Vec<_> = inventory.iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(order, vec!["docker", "python", "redis"]);
    }

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("(Python),"), "Python");
        assert_eq!(clean_word("node.js."), "node.js");
        assert_eq!(clean_word(".NET"), ".NET");
        assert_eq!(clean_word("C++,"), "C++");
        assert_eq!(clean_word("..."), "");
    }
}
