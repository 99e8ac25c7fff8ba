//! Layered wreck-name extraction pipeline (spec §4.6.2, §9 REDESIGN FLAGS).
//!
//! Four separately testable stages, grounded in
//! `original_source/.../web_search.py`'s `filter_valid_wreck_names`:
//! tokenize the page text into line-scale candidate phrases, recognize a
//! multilingual wreck-prefix, apply the proper-name heuristic, and reject
//! anything on the multilingual common-word blacklist.

use regex::Regex;
use std::sync::OnceLock;

/// Multilingual wreck-prefix vocabulary. A name is only considered a
/// candidate if one of its words is a prefix (or the phrase directly
/// follows one in the source text).
const WRECK_PREFIXES: &[&str] = &[
    "relitto", "wreck", "shipwreck", "naufragio", "épave", "naufrage", "pez", "wrack",
    "schiffswrack", "ναυάγιο", "piroscafo", "nave", "ship", "submarine", "sottomarino", "cargo",
    "tanker", "petroliera", "battello", "motonave", "vapore", "steamer",
];

/// Multilingual stop/common-word blacklist: single-word or all-common-word
/// candidates are rejected even if they follow a wreck prefix.
const COMMON_WORDS: &[&str] = &[
    "il", "lo", "la", "i", "gli", "le", "un", "uno", "una", "di", "da", "in", "con", "su", "per",
    "tra", "fra", "the", "a", "an", "of", "in", "on", "for", "with", "and", "or", "le", "la",
    "les", "des", "du", "de", "et", "ou", "el", "los", "las", "un", "una", "y", "o", "der", "die",
    "das", "und", "oder", "home", "contact", "about", "info", "news", "page", "site", "click",
    "here", "more", "read",
];

fn wreck_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternation = WRECK_PREFIXES
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(
            r"(?i)\b(?:{alternation})\s+((?:[\p{{Lu}}][\p{{L}}'-]*\s*){{1,5}})"
        ))
        .expect("wreck prefix regex must compile")
    })
}

/// Stage 1: tokenizes `text` into line-scale candidate phrases by
/// splitting on sentence-ending punctuation and newlines.
#[must_use]
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(['\n', '.', ';'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Stage 2: scans `line` for a wreck-prefix followed by a capitalized
/// run of words, returning the candidate name (prefix excluded).
#[must_use]
pub fn recognize_prefixed_name(line: &str) -> Option<String> {
    wreck_prefix_regex().captures(line).map(|caps| caps[1].trim().to_string())
}

/// Stage 3: the proper-name heuristic (spec §4.6.2 rules A-E):
/// - at least one capitalized alphanumeric word,
/// - single-word names must be at least 4 characters,
/// - no more than 50 characters total,
/// - no URL fragments or stray special characters beyond hyphens
///   (so codes like "U-455" survive).
#[must_use]
pub fn looks_like_proper_name(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > 50 {
        return false;
    }
    if candidate.contains("://") || candidate.contains('@') {
        return false;
    }
    let words: Vec<&str> = candidate.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }
    if words.len() == 1 && words[0].chars().filter(char::is_ascii_alphanumeric).count() < 4 {
        return false;
    }
    let has_capitalized_alnum =
        words.iter().any(|w| w.chars().next().is_some_and(char::is_uppercase));
    if !has_capitalized_alnum {
        return false;
    }
    candidate
        .chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace() || c == '-' || c == '\'')
}

/// Stage 4: rejects a candidate if every one of its words is a common
/// word (i.e. it carries no proper-name content at all).
#[must_use]
pub fn passes_blacklist(candidate: &str) -> bool {
    let words: Vec<String> = candidate.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return false;
    }
    !words.iter().all(|w| COMMON_WORDS.contains(&w.as_str()))
}

/// Runs the full pipeline over `text`, returning validated candidate wreck
/// names in order of appearance, deduplicated by exact (case-insensitive)
/// match.
#[must_use]
pub fn extract_wreck_names(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut names = Vec::new();
    for line in tokenize(text) {
        let Some(candidate) = recognize_prefixed_name(line) else { continue };
        if !looks_like_proper_name(&candidate) || !passes_blacklist(&candidate) {
            continue;
        }
        let key = candidate.to_lowercase();
        if seen.insert(key) {
            names.push(candidate);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn tokenize_splits_on_sentence_boundaries() {
        let lines = tokenize("Il relitto Mohawk Deer.\nUn altro relitto qui.");
        assert_eq!(lines.len(), 2);
    }

    #[rstest]
    #[case("Il relitto Mohawk Deer giace a 32 metri", Some("Mohawk Deer".to_string()))]
    #[case("Nessun relitto qui", None)]
    fn recognizes_prefixed_name(#[case] line: &str, #[case] expected: Option<String>) {
        assert_eq!(recognize_prefixed_name(line), expected);
    }

    #[rstest]
    #[case("Mohawk Deer", true)]
    #[case("U-455", true)]
    #[case("xyz", false)]
    #[case("http://example.com", false)]
    #[case(&"A".repeat(60), false)]
    fn proper_name_heuristic_cases(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(looks_like_proper_name(candidate), expected);
    }

    #[rstest]
    #[case("Mohawk Deer", true)]
    #[case("The Home", false)]
    fn blacklist_cases(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(passes_blacklist(candidate), expected);
    }

    #[test]
    fn full_pipeline_extracts_deduplicated_names() {
        let text = "Il relitto Mohawk Deer è famoso.\nTutti parlano del relitto Mohawk Deer.\nNessun altro relitto qui.";
        let names = extract_wreck_names(text);
        assert_eq!(names, vec!["Mohawk Deer".to_string()]);
    }
}
