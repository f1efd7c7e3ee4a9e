use serde::{Deserialize, Serialize};

/// Candidate technical tokens discovered in free text, bucketed by shape.
///
/// Produced by the requirement analyzer, consumed by keyword discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveredCandidates {
    /// Tokens ending in a known technical suffix (API, Service, DTO, ...).
    pub technical_terms: Vec<String>,
    /// Generic multi-character compounds.
    pub compound_words: Vec<String>,
    /// CamelCase identifiers.
    pub camel_case: Vec<String>,
    /// Hyphenated compounds.
    pub hyphenated: Vec<String>,
}

impl DiscoveredCandidates {
    pub fn is_empty(&self) -> bool {
        self.technical_terms.is_empty()
            && self.compound_words.is_empty()
            && self.camel_case.is_empty()
            && self.hyphenated.is_empty()
    }

    /// Iterate all candidates with their bucket name.
    pub fn iter_with_category(&self) -> impl Iterator<Item = (&str, &str)> {
        self.technical_terms
            .iter()
            .map(|k| (k.as_str(), "technical_terms"))
            .chain(
                self.compound_words
                    .iter()
                    .map(|k| (k.as_str(), "compound_words")),
            )
            .chain(self.camel_case.iter().map(|k| (k.as_str(), "camel_case")))
            .chain(self.hyphenated.iter().map(|k| (k.as_str(), "hyphenated")))
    }
}
