//! Static synonym table for query expansion.

/// Domain synonym groups. Lookup returns the other members of the first
/// group containing the word, capped at three.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &["api", "endpoint", "interface", "rest"],
    &["workflow", "flow", "process", "pipeline"],
    &["solution", "resolution", "answer"],
    &["validate", "verify", "check", "confirm"],
    &["create", "add", "insert", "new"],
    &["update", "modify", "edit", "change"],
    &["delete", "remove", "drop"],
    &["search", "query", "find", "lookup"],
    &["error", "failure", "fault", "bug"],
    &["config", "configuration", "settings"],
    &["database", "storage", "persistence"],
    &["service", "component", "module"],
];

/// Maximum synonyms expanded per query word.
pub const MAX_SYNONYMS_PER_WORD: usize = 3;

/// Synonyms for one word, excluding the word itself. Unknown words expand
/// to nothing.
pub fn synonyms_for(word: &str) -> Vec<String> {
    for group in SYNONYM_GROUPS {
        if group.contains(&word) {
            return group
                .iter()
                .filter(|w| **w != word)
                .take(MAX_SYNONYMS_PER_WORD)
                .map(|w| w.to_string())
                .collect();
        }
    }
    Vec::new()
}

/// Expand tokenized query words with their synonyms, preserving the
/// originals first.
pub fn expand(words: &[String]) -> Vec<String> {
    let mut expanded = words.to_vec();
    for word in words {
        for synonym in synonyms_for(word) {
            if !expanded.contains(&synonym) {
                expanded.push(synonym);
            }
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_word_expands_to_at_most_three() {
        let syns = synonyms_for("api");
        assert_eq!(syns.len(), 3);
        assert!(!syns.contains(&"api".to_string()));
    }

    #[test]
    fn unknown_word_expands_to_nothing() {
        assert!(synonyms_for("zzzz").is_empty());
    }

    #[test]
    fn expansion_keeps_originals_and_deduplicates() {
        let words = vec!["validate".to_string(), "verify".to_string()];
        let expanded = expand(&words);
        assert_eq!(&expanded[..2], &words[..]);
        let unique: std::collections::HashSet<&String> = expanded.iter().collect();
        assert_eq!(unique.len(), expanded.len());
    }
}
