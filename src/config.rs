//! Search engine configuration

use serde::{Deserialize, Serialize};

/// Search engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEngineConfig {
    /// Maximum results per page
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Default results per page when the caller supplies none
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Maximum Levenshtein distance for fuzzy vocabulary matching
    #[serde(default = "default_fuzzy_distance")]
    pub fuzzy_max_distance: usize,

    /// Words of context on each side of a highlighted match
    #[serde(default = "default_highlight_window")]
    pub highlight_window: usize,

    /// Maximum highlight snippets per field
    #[serde(default = "default_max_snippets")]
    pub max_snippets_per_field: usize,

    /// Score multiplier when the query appears in the title
    #[serde(default = "default_title_boost")]
    pub title_match_boost: f64,

    /// Score multiplier when the query appears in a tag
    #[serde(default = "default_tag_boost")]
    pub tag_match_boost: f64,

    /// Boost weight for content-kind documents
    #[serde(default = "default_content_weight")]
    pub content_kind_weight: f64,

    /// Boost weight for published documents
    #[serde(default = "default_published_weight")]
    pub published_weight: f64,

    /// Boost weight for documents younger than `fresh_days`
    #[serde(default = "default_fresh_weight")]
    pub fresh_weight: f64,

    /// Age threshold for the freshest boost tier (days)
    #[serde(default = "default_fresh_days")]
    pub fresh_days: i64,

    /// Boost weight for documents younger than `recent_days`
    #[serde(default = "default_recent_weight")]
    pub recent_weight: f64,

    /// Age threshold for the second boost tier (days)
    #[serde(default = "default_recent_days")]
    pub recent_days: i64,

    /// TTL for index snapshots in the external cache (seconds)
    #[serde(default = "default_snapshot_ttl")]
    pub snapshot_ttl_secs: u64,

    /// TTL for cached query results (seconds)
    #[serde(default = "default_query_ttl")]
    pub query_cache_ttl_secs: u64,

    /// TTL for cached suggestions (seconds)
    #[serde(default = "default_suggestion_ttl")]
    pub suggestion_cache_ttl_secs: u64,

    /// Key prefix for all cache entries
    #[serde(default = "default_cache_prefix")]
    pub cache_key_prefix: String,

    /// Number of entries in analytics top-N listings
    #[serde(default = "default_top_n")]
    pub analytics_top_n: usize,
}

fn default_max_limit() -> usize {
    100
}
fn default_limit() -> usize {
    20
}
fn default_fuzzy_distance() -> usize {
    2
}
fn default_highlight_window() -> usize {
    5
}
fn default_max_snippets() -> usize {
    3
}
fn default_title_boost() -> f64 {
    2.0
}
fn default_tag_boost() -> f64 {
    1.5
}
fn default_content_weight() -> f64 {
    1.2
}
fn default_published_weight() -> f64 {
    1.5
}
fn default_fresh_weight() -> f64 {
    1.3
}
fn default_fresh_days() -> i64 {
    7
}
fn default_recent_weight() -> f64 {
    1.1
}
fn default_recent_days() -> i64 {
    30
}
fn default_snapshot_ttl() -> u64 {
    3600
}
fn default_query_ttl() -> u64 {
    300
}
fn default_suggestion_ttl() -> u64 {
    900
}
fn default_cache_prefix() -> String {
    "cms-search".to_string()
}
fn default_top_n() -> usize {
    10
}

impl Default for SearchEngineConfig {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
            default_limit: default_limit(),
            fuzzy_max_distance: default_fuzzy_distance(),
            highlight_window: default_highlight_window(),
            max_snippets_per_field: default_max_snippets(),
            title_match_boost: default_title_boost(),
            tag_match_boost: default_tag_boost(),
            content_kind_weight: default_content_weight(),
            published_weight: default_published_weight(),
            fresh_weight: default_fresh_weight(),
            fresh_days: default_fresh_days(),
            recent_weight: default_recent_weight(),
            recent_days: default_recent_days(),
            snapshot_ttl_secs: default_snapshot_ttl(),
            query_cache_ttl_secs: default_query_ttl(),
            suggestion_cache_ttl_secs: default_suggestion_ttl(),
            cache_key_prefix: default_cache_prefix(),
            analytics_top_n: default_top_n(),
        }
    }
}

impl SearchEngineConfig {
    /// Load configuration from file and environment.
    ///
    /// Layering: built-in defaults, then an optional TOML file named by
    /// `CMS_SEARCH_CONFIG`, then `CMS_SEARCH__`-prefixed environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Ok(config_path) = std::env::var("CMS_SEARCH_CONFIG") {
            builder = builder.add_source(config::File::with_name(&config_path).required(false));
        }

        builder
            .add_source(
                config::Environment::with_prefix("CMS_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// Builder for SearchEngineConfig
pub struct SearchEngineConfigBuilder {
    config: SearchEngineConfig,
}

impl SearchEngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchEngineConfig::default(),
        }
    }

    pub fn max_limit(mut self, max: usize) -> Self {
        self.config.max_limit = max;
        self
    }

    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.default_limit = limit;
        self
    }

    pub fn fuzzy_max_distance(mut self, distance: usize) -> Self {
        self.config.fuzzy_max_distance = distance;
        self
    }

    pub fn highlight_window(mut self, words: usize) -> Self {
        self.config.highlight_window = words;
        self
    }

    pub fn query_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.query_cache_ttl_secs = secs;
        self
    }

    pub fn suggestion_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.suggestion_cache_ttl_secs = secs;
        self
    }

    pub fn snapshot_ttl_secs(mut self, secs: u64) -> Self {
        self.config.snapshot_ttl_secs = secs;
        self
    }

    pub fn cache_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.cache_key_prefix = prefix.into();
        self
    }

    pub fn analytics_top_n(mut self, n: usize) -> Self {
        self.config.analytics_top_n = n;
        self
    }

    pub fn build(self) -> SearchEngineConfig {
        self.config
    }
}

impl Default for SearchEngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchEngineConfig::default();
        assert_eq!(config.fuzzy_max_distance, 2);
        assert_eq!(config.highlight_window, 5);
        assert_eq!(config.max_snippets_per_field, 3);
        assert_eq!(config.snapshot_ttl_secs, 3600);
    }

    #[test]
    fn test_config_builder() {
        let config = SearchEngineConfigBuilder::new()
            .max_limit(50)
            .query_cache_ttl_secs(60)
            .cache_key_prefix("test")
            .build();

        assert_eq!(config.max_limit, 50);
        assert_eq!(config.query_cache_ttl_secs, 60);
        assert_eq!(config.cache_key_prefix, "test");
        // untouched fields keep defaults
        assert_eq!(config.fuzzy_max_distance, 2);
    }
}
