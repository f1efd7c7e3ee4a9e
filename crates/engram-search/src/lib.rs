//! # engram-search
//!
//! Lexical relevance search over memory items: a TF-IDF index with
//! interval-gated rebuilds, synonym-expanded semantic matching, exact and
//! tag and project strategies, filter/boost/rank pipeline, and a bounded
//! result cache.

pub mod config;
pub mod index;
pub mod synonyms;
pub mod tokenizer;

pub use config::{MatchType, SearchConfig, SearchResult, SearchStatistics};
pub use index::RelevanceSearchIndex;
