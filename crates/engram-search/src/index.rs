//! The relevance search index.
//!
//! TF-IDF vectors over content and tags, refreshed at most once per rebuild
//! interval, with four matching strategies layered on top: exact, semantic
//! (cosine over the synonym-expanded query), tag overlap, and shared
//! project. Results are merged per item, filtered, boosted, and ranked.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use moka::sync::Cache;
use tracing::debug;

use engram_core::constants::{INDEX_REBUILD_INTERVAL_SECS, SEARCH_CACHE_CAPACITY};
use engram_core::MemoryItem;

use crate::config::{MatchType, SearchConfig, SearchResult, SearchStatistics};
use crate::synonyms;
use crate::tokenizer::tokenize;

/// Minimum word overlap with the query for a non-substring exact match.
const EXACT_OVERLAP_THRESHOLD: f64 = 0.3;
/// Flat score for items sharing the request's project.
const RELATED_PROJECT_SCORE: f64 = 0.3;
const RECENCY_WINDOW_DAYS: i64 = 30;
const SNIPPET_RADIUS: usize = 80;

pub struct RelevanceSearchIndex {
    items: Vec<MemoryItem>,
    /// id → term → tf-idf weight.
    vectors: HashMap<String, HashMap<String, f64>>,
    document_frequency: HashMap<String, usize>,
    last_rebuild: Option<DateTime<Utc>>,
    dirty: bool,
    cache: Cache<String, Vec<SearchResult>>,
}

impl RelevanceSearchIndex {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            vectors: HashMap::new(),
            document_frequency: HashMap::new(),
            last_rebuild: None,
            dirty: false,
            cache: Cache::builder().max_capacity(SEARCH_CACHE_CAPACITY).build(),
        }
    }

    /// Replace the indexed corpus. Vectors refresh immediately on first
    /// index, otherwise at most once per rebuild interval.
    pub fn index_memories(&mut self, items: Vec<MemoryItem>) {
        self.items = items;
        self.dirty = true;
        self.cache.invalidate_all();
        self.maybe_rebuild();
    }

    /// Insert or replace a single item by id.
    pub fn upsert(&mut self, item: MemoryItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.dirty = true;
        self.cache.invalidate_all();
        self.maybe_rebuild();
    }

    pub fn remove(&mut self, memory_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != memory_id);
        let removed = self.items.len() != before;
        if removed {
            self.dirty = true;
            self.cache.invalidate_all();
            self.maybe_rebuild();
        }
        removed
    }

    /// Rebuild TF-IDF vectors now, regardless of the interval.
    pub fn force_rebuild(&mut self) {
        self.rebuild();
    }

    /// Rebuild if the corpus changed and the interval has elapsed (or the
    /// index was never built). Lexical strategies read the item list
    /// directly, so they stay fresh even while vectors wait for a rebuild.
    fn maybe_rebuild(&mut self) {
        if !self.dirty {
            return;
        }
        let due = match self.last_rebuild {
            None => true,
            Some(at) => Utc::now() - at >= Duration::seconds(INDEX_REBUILD_INTERVAL_SECS),
        };
        if due {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let total = self.items.len();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut term_counts: HashMap<String, HashMap<String, usize>> = HashMap::new();

        for item in &self.items {
            let tokens = item_tokens(item);
            let unique: HashSet<&String> = tokens.iter().collect();
            for term in unique {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            let counts = term_counts.entry(item.id.clone()).or_default();
            for term in tokens {
                *counts.entry(term).or_insert(0) += 1;
            }
        }

        self.vectors = term_counts
            .into_iter()
            .map(|(id, counts)| {
                let vector = counts
                    .into_iter()
                    .map(|(term, count)| {
                        let df = document_frequency.get(&term).copied().unwrap_or(1);
                        let idf = (total as f64 / df as f64).ln();
                        (term, count as f64 * idf)
                    })
                    .collect();
                (id, vector)
            })
            .collect();
        self.document_frequency = document_frequency;
        self.last_rebuild = Some(Utc::now());
        self.dirty = false;
        debug!(
            memories = total,
            vocabulary = self.document_frequency.len(),
            "search index rebuilt"
        );
    }

    /// Run a search. Strategy scores are merged per item keeping the
    /// strongest match, then filtered, boosted, ranked, and truncated.
    pub fn search(&mut self, query: &str, config: &SearchConfig) -> Vec<SearchResult> {
        self.maybe_rebuild();

        let cache_key = format!(
            "{query}\u{1f}{}",
            serde_json::to_string(config).unwrap_or_default()
        );
        if let Some(cached) = self.cache.get(&cache_key) {
            return cached;
        }

        let query_words = tokenize(query);
        let expanded = synonyms::expand(&query_words);
        let query_vector = self.query_vector(&expanded);

        // id → (base score × multiplier, match type, matched terms).
        let mut merged: HashMap<&str, (f64, MatchType, Vec<String>)> = HashMap::new();
        for item in self.items.iter().filter(|i| passes_filters(i, config)) {
            for (base, match_type, terms) in
                self.strategy_matches(item, query, &query_words, &expanded, &query_vector, config)
            {
                let score = base * match_type.multiplier();
                match merged.get_mut(item.id.as_str()) {
                    Some(entry) => {
                        if score > entry.0 {
                            entry.0 = score;
                            entry.1 = match_type;
                        }
                        for term in terms {
                            if !entry.2.contains(&term) {
                                entry.2.push(term);
                            }
                        }
                    }
                    None => {
                        merged.insert(item.id.as_str(), (score, match_type, terms));
                    }
                }
            }
        }

        // Walk items in input order so ties rank deterministically.
        let mut results: Vec<SearchResult> = Vec::new();
        for item in &self.items {
            let Some((score, match_type, matched_terms)) = merged.remove(item.id.as_str()) else {
                continue;
            };
            let boosted = score + importance_boost(item) + recency_boost(item);
            if boosted < config.min_relevance {
                continue;
            }
            results.push(SearchResult {
                memory_id: item.id.clone(),
                title: item.title.clone(),
                score: boosted,
                match_type,
                context_snippet: snippet(&item.content, &matched_terms),
                matched_terms,
                project: item.project.clone(),
                tags: item.tags.clone(),
            });
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(config.max_results);

        self.cache.insert(cache_key, results.clone());
        results
    }

    /// All strategy hits for one item.
    fn strategy_matches(
        &self,
        item: &MemoryItem,
        query: &str,
        query_words: &[String],
        expanded: &[String],
        query_vector: &HashMap<String, f64>,
        config: &SearchConfig,
    ) -> Vec<(f64, MatchType, Vec<String>)> {
        let mut matches = Vec::new();

        if let Some((score, terms)) = exact_match(item, query, query_words) {
            matches.push((score, MatchType::Exact, terms));
        }
        if let Some(vector) = self.vectors.get(&item.id) {
            let similarity = cosine(query_vector, vector);
            if similarity > 0.0 {
                let terms = expanded
                    .iter()
                    .filter(|t| vector.contains_key(*t))
                    .cloned()
                    .collect();
                matches.push((similarity, MatchType::Semantic, terms));
            }
        }
        if let Some((score, terms)) = tag_match(item, query_words) {
            matches.push((score, MatchType::Tag, terms));
        }
        if let Some(project) = &config.project {
            if item.project == *project {
                matches.push((RELATED_PROJECT_SCORE, MatchType::Related, Vec::new()));
            }
        }
        matches
    }

    fn query_vector(&self, expanded: &[String]) -> HashMap<String, f64> {
        let total = self.items.len().max(1);
        let mut counts: HashMap<&String, usize> = HashMap::new();
        for term in expanded {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter_map(|(term, count)| {
                let df = self.document_frequency.get(term)?;
                let idf = (total as f64 / *df as f64).ln();
                Some((term.clone(), count as f64 * idf))
            })
            .collect()
    }

    pub fn statistics(&self) -> SearchStatistics {
        let projects: HashSet<&str> = self
            .items
            .iter()
            .map(|i| i.project.as_str())
            .filter(|p| !p.is_empty())
            .collect();
        let tags: HashSet<&str> = self
            .items
            .iter()
            .flat_map(|i| i.tags.iter().map(String::as_str))
            .collect();

        SearchStatistics {
            memory_count: self.items.len(),
            vocabulary_size: self.document_frequency.len(),
            indexed_terms: self.vectors.values().map(HashMap::len).sum(),
            unique_projects: projects.len(),
            unique_tags: tags.len(),
            cached_searches: self.cache.entry_count(),
        }
    }

    #[cfg(test)]
    fn vocabulary_contains(&self, term: &str) -> bool {
        self.document_frequency.contains_key(term)
    }
}

impl Default for RelevanceSearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn item_tokens(item: &MemoryItem) -> Vec<String> {
    let mut tokens = tokenize(&item.title);
    tokens.extend(tokenize(&item.content));
    for tag in &item.tags {
        tokens.extend(tokenize(tag));
    }
    tokens
}

fn passes_filters(item: &MemoryItem, config: &SearchConfig) -> bool {
    if let Some(project) = &config.project {
        if item.project != *project {
            return false;
        }
    }
    if !config.tags.is_empty() {
        let wanted: HashSet<&str> = config.tags.iter().map(String::as_str).collect();
        if !item.tags.iter().any(|t| wanted.contains(t.as_str())) {
            return false;
        }
    }
    if let Some(after) = config.created_after {
        if item.created_at < after {
            return false;
        }
    }
    if let Some(before) = config.created_before {
        if item.created_at > before {
            return false;
        }
    }
    true
}

/// Full-substring match scores 1.0; otherwise word overlap with the query
/// must reach 30%.
fn exact_match(
    item: &MemoryItem,
    query: &str,
    query_words: &[String],
) -> Option<(f64, Vec<String>)> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return None;
    }
    let text_lower = format!("{}\n{}", item.title, item.content).to_lowercase();
    if text_lower.contains(&query_lower) {
        return Some((1.0, vec![query_lower]));
    }

    if query_words.is_empty() {
        return None;
    }
    let matched: Vec<String> = query_words
        .iter()
        .filter(|w| text_lower.contains(w.as_str()))
        .cloned()
        .collect();
    let overlap = matched.len() as f64 / query_words.len() as f64;
    if overlap >= EXACT_OVERLAP_THRESHOLD {
        Some((overlap, matched))
    } else {
        None
    }
}

fn tag_match(item: &MemoryItem, query_words: &[String]) -> Option<(f64, Vec<String>)> {
    if query_words.is_empty() || item.tags.is_empty() {
        return None;
    }
    let item_tags: HashSet<String> = item.tags.iter().map(|t| t.to_lowercase()).collect();
    let matched: Vec<String> = query_words
        .iter()
        .filter(|w| item_tags.contains(w.as_str()))
        .cloned()
        .collect();
    if matched.is_empty() {
        return None;
    }
    let score = (matched.len() as f64 / query_words.len() as f64).min(1.0);
    Some((score, matched))
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, weight)| b.get(term).map(|other| weight * other))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    let norm_a: f64 = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|w| w * w).sum::<f64>().sqrt();
    dot / (norm_a * norm_b)
}

/// Importance 1-5 maps to a 0.0-0.4 additive boost.
fn importance_boost(item: &MemoryItem) -> f64 {
    (item.importance.saturating_sub(1)) as f64 * 0.1
}

/// Linear boost up to 0.2 for items created within the last 30 days.
fn recency_boost(item: &MemoryItem) -> f64 {
    let days = (Utc::now() - item.created_at).num_days();
    if (0..=RECENCY_WINDOW_DAYS).contains(&days) {
        (RECENCY_WINDOW_DAYS - days) as f64 / RECENCY_WINDOW_DAYS as f64 * 0.2
    } else {
        0.0
    }
}

/// Excerpt around the first matched term, or the content head when no term
/// is locatable.
fn snippet(content: &str, matched_terms: &[String]) -> String {
    let content_lower = content.to_lowercase();
    // Byte positions only transfer when lowercasing kept lengths aligned.
    let aligned = content_lower.len() == content.len();

    let position = matched_terms
        .iter()
        .filter_map(|term| content_lower.find(term.as_str()))
        .min()
        .filter(|_| aligned)
        .unwrap_or(0);

    let mut start = position.saturating_sub(SNIPPET_RADIUS);
    let mut end = (position + SNIPPET_RADIUS).min(content.len());
    while start > 0 && !content.is_char_boundary(start) {
        start -= 1;
    }
    while end < content.len() && !content.is_char_boundary(end) {
        end += 1;
    }

    let mut excerpt = String::new();
    if start > 0 {
        excerpt.push_str("...");
    }
    excerpt.push_str(content[start..end].trim());
    if end < content.len() {
        excerpt.push_str("...");
    }
    excerpt
}
