/// Engram system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Matrix snapshot schema version written on save and checked on strict load.
pub const SNAPSHOT_SCHEMA_VERSION: &str = "3.0.0";

/// Floor for any effective keyword weight.
pub const MIN_EFFECTIVE_WEIGHT: f64 = 0.1;

/// Ceiling for any keyword weight, base or effective.
pub const MAX_KEYWORD_WEIGHT: f64 = 10.0;

/// Learning rate applied to feedback nudges and the stability factor.
pub const DEFAULT_LEARNING_RATE: f64 = 0.05;

/// Usage count after which a keyword is considered mature.
pub const DEFAULT_STABILIZATION_THRESHOLD: u64 = 50;

/// Minimum confidence for a discovered keyword to be admitted.
pub const DEFAULT_DISCOVERY_THRESHOLD: f64 = 0.7;

/// Global multiplicative decay applied during stabilization passes.
pub const DEFAULT_WEIGHT_DECAY: f64 = 0.99;

/// Weight history entries kept per keyword before truncation.
pub const WEIGHT_HISTORY_CAP: usize = 100;

/// Weight history entries retained after truncation.
pub const WEIGHT_HISTORY_KEEP: usize = 50;

/// Maximum keyword discovery recommendations returned per pass.
pub const MAX_DISCOVERY_RECOMMENDATIONS: usize = 10;

/// Worker count for parallel batch scoring.
pub const BATCH_WORKERS: usize = 4;

/// Score cache capacity (entries).
pub const SCORE_CACHE_CAPACITY: u64 = 1000;

/// Score cache entry time-to-live (seconds).
pub const SCORE_CACHE_TTL_SECS: u64 = 3600;

/// Search result cache capacity (entries).
pub const SEARCH_CACHE_CAPACITY: u64 = 100;

/// Minimum seconds between search index rebuilds.
pub const INDEX_REBUILD_INTERVAL_SECS: i64 = 60;
