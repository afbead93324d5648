//! Skills and certifications sections.

use std::collections::BTreeSet;

use crate::keywords::KeywordExtractor;
use crate::models::SkillToken;
use crate::parsing::strip_bullet;

/// Longer items are prose; their skills come from the keyword extractor.
const MAX_ITEM_WORDS: usize = 4;

/// Splits list lines into canonical skill tokens.
///
/// "Languages: Rust, Go" drops the category prefix; "Python (Django, Flask)"
/// yields all three.
pub fn parse_skills(lines: &[String], keywords: &KeywordExtractor) -> BTreeSet<SkillToken> {
    let vocabulary = keywords.vocabulary();
    let mut skills = BTreeSet::new();

    for line in lines {
        let line = strip_bullet(line).unwrap_or(line.as_str());
        let line = drop_category(line);

        for item in line.split(|c: char| matches!(c, ',' | ';' | '|' | '•' | '·' | '(' | ')')) {
            let item = item.trim().trim_matches(|c: char| matches!(c, '.' | ':' | '-' | '*'));
            let item = item.strip_prefix("and ").unwrap_or(item).trim();
            if item.is_empty() {
                continue;
            }
            if item.split_whitespace().count() > MAX_ITEM_WORDS {
                skills.extend(keywords.extract(item));
            } else {
                skills.insert(vocabulary.canonicalize(item));
            }
        }
    }
    skills
}

pub fn parse_certifications(lines: &[String]) -> BTreeSet<String> {
    lines
        .iter()
        .map(|line| strip_bullet(line).unwrap_or(line.as_str()).trim())
        .filter(|line| line.chars().any(char::is_alphabetic))
        .map(str::to_string)
        .collect()
}

/// "Frameworks: React, Vue" → "React, Vue". Only short prefixes count.
fn drop_category(line: &str) -> &str {
    match line.split_once(':') {
        Some((head, rest))
            if !rest.trim().is_empty()
                && head.split_whitespace().count() <= 3
                && !head.contains(',') =>
        {
            rest
        }
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::SkillVocabulary;
    use std::sync::Arc;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(Arc::new(SkillVocabulary::with_defaults()))
    }

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn names(set: &BTreeSet<SkillToken>) -> Vec<&str> {
        set.iter().map(SkillToken::as_str).collect()
    }

    #[test]
    fn test_list_with_categories_and_aliases() {
        let skills = parse_skills(
            &lines("Languages: Python, JS; Golang\nInfra: k8s | Docker\n• PostgreSQL"),
            &extractor(),
        );
        assert_eq!(
            names(&skills),
            vec!["docker", "go", "javascript", "kubernetes", "postgresql", "python"]
        );
    }

    #[test]
    fn test_parenthesized_items() {
        let skills = parse_skills(&lines("Python (Django, Flask)"), &extractor());
        assert_eq!(names(&skills), vec!["django", "flask", "python"]);
    }

    #[test]
    fn test_unknown_skills_kept_lowercase() {
        let skills = parse_skills(&lines("Bevy, Ray Tracing"), &extractor());
        assert_eq!(names(&skills), vec!["bevy", "ray tracing"]);
    }

    #[test]
    fn test_prose_goes_through_extractor() {
        let skills = parse_skills(
            &lines("Comfortable building services with Rust and deploying them on AWS"),
            &extractor(),
        );
        assert_eq!(names(&skills), vec!["aws", "rust"]);
    }

    #[test]
    fn test_certifications() {
        let certs = parse_certifications(&lines(
            "- AWS Certified Solutions Architect (2021)\n• CKA\n---",
        ));
        assert_eq!(certs.len(), 2);
        assert!(certs.contains("CKA"));
        assert!(certs.contains("AWS Certified Solutions Architect (2021)"));
    }
}
