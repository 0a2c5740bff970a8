//! Search options, typed filters, and sorting

use crate::config::SearchEngineConfig;
use crate::error::{Result, SearchError};
use crate::models::{ContentStatus, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which document kinds a query covers
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Content,
    Media,
    #[default]
    All,
}

impl SearchScope {
    pub fn matches(&self, kind: DocumentKind) -> bool {
        match self {
            SearchScope::Content => kind == DocumentKind::Content,
            SearchScope::Media => kind == DocumentKind::Media,
            SearchScope::All => true,
        }
    }
}

/// Sort order for search results
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Document field available for custom sorting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
}

/// Sorting criteria
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    #[default]
    Relevance,
    Field {
        field: SortField,
        order: SortOrder,
    },
}

/// A single typed filter. The set is closed and each variant carries a typed
/// payload, validated at the API boundary before reaching the query engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum SearchFilter {
    /// Publication status (content documents)
    Status(ContentStatus),

    /// Exact media type (media documents)
    MediaType(String),

    /// Author/uploader user id
    Author(String),

    /// At least one of these tags must be present
    Tags(Vec<String>),

    /// At least one of these categories must be present
    Categories(Vec<String>),

    /// Inclusive creation-date range; either bound may be open
    CreatedBetween {
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    },
}

impl SearchFilter {
    fn validate(&self) -> Result<()> {
        match self {
            SearchFilter::MediaType(value) if value.is_empty() => Err(SearchError::Validation(
                "media type filter must not be empty".to_string(),
            )),
            SearchFilter::Author(value) if value.is_empty() => Err(SearchError::Validation(
                "author filter must not be empty".to_string(),
            )),
            SearchFilter::Tags(values) if values.is_empty() => Err(SearchError::Validation(
                "tags filter must name at least one tag".to_string(),
            )),
            SearchFilter::Categories(values) if values.is_empty() => {
                Err(SearchError::Validation(
                    "categories filter must name at least one category".to_string(),
                ))
            }
            SearchFilter::CreatedBetween {
                after: Some(after),
                before: Some(before),
            } if after > before => Err(SearchError::Validation(
                "created-date range start is after its end".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Options accompanying a search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Restrict results to one tenant (exact match)
    pub tenant_id: Option<String>,

    /// Document kinds to cover
    #[serde(default)]
    pub scope: SearchScope,

    /// Typed filters, all of which must pass
    #[serde(default)]
    pub filters: Vec<SearchFilter>,

    /// Sorting criteria
    #[serde(default)]
    pub sort: SearchSort,

    /// 1-based page number
    pub page: usize,

    /// Results per page
    pub limit: usize,

    /// Also match vocabulary tokens within edit distance 2.
    /// Costs a linear scan of the indexed vocabulary.
    #[serde(default)]
    pub fuzzy: bool,

    /// Emit highlight snippets for title/body/description
    #[serde(default)]
    pub highlight: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            tenant_id: None,
            scope: SearchScope::All,
            filters: Vec::new(),
            sort: SearchSort::Relevance,
            page: 1,
            limit: 20,
            fuzzy: false,
            highlight: false,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options seeded from engine configuration (page size from
    /// `default_limit`).
    pub fn with_defaults(config: &SearchEngineConfig) -> Self {
        Self {
            limit: config.default_limit,
            ..Self::default()
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: SearchSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Boundary validation run before the query engine sees the options.
    pub fn validate(&self, config: &SearchEngineConfig) -> Result<()> {
        if self.page == 0 {
            return Err(SearchError::Validation("page must be >= 1".to_string()));
        }
        if self.limit == 0 || self.limit > config.max_limit {
            return Err(SearchError::Validation(format!(
                "limit must be between 1 and {}",
                config.max_limit
            )));
        }
        for filter in &self.filters {
            filter.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let options = SearchOptions::new()
            .with_tenant("acme")
            .with_scope(SearchScope::Content)
            .with_filter(SearchFilter::Status(ContentStatus::Published))
            .with_page(2)
            .with_limit(50)
            .with_fuzzy(true);

        assert_eq!(options.tenant_id.as_deref(), Some("acme"));
        assert_eq!(options.filters.len(), 1);
        assert_eq!(options.page, 2);
        assert!(options.fuzzy);
    }

    #[test]
    fn test_with_defaults_takes_configured_limit() {
        let mut config = SearchEngineConfig::default();
        config.default_limit = 42;

        let options = SearchOptions::with_defaults(&config);
        assert_eq!(options.limit, 42);
        assert_eq!(options.page, 1);
        assert!(options.validate(&config).is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_pagination() {
        let config = SearchEngineConfig::default();
        assert!(SearchOptions::new().with_page(0).validate(&config).is_err());
        assert!(SearchOptions::new().with_limit(0).validate(&config).is_err());
        assert!(SearchOptions::new()
            .with_limit(config.max_limit + 1)
            .validate(&config)
            .is_err());
        assert!(SearchOptions::new().validate(&config).is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_filter_payloads() {
        let config = SearchEngineConfig::default();
        assert!(SearchOptions::new()
            .with_filter(SearchFilter::Tags(vec![]))
            .validate(&config)
            .is_err());
        assert!(SearchOptions::new()
            .with_filter(SearchFilter::MediaType(String::new()))
            .validate(&config)
            .is_err());

        let inverted_range = SearchFilter::CreatedBetween {
            after: Some(Utc::now()),
            before: Some(Utc::now() - chrono::Duration::days(1)),
        };
        assert!(SearchOptions::new()
            .with_filter(inverted_range)
            .validate(&config)
            .is_err());
    }

    #[test]
    fn test_scope_matching() {
        assert!(SearchScope::All.matches(DocumentKind::Media));
        assert!(SearchScope::Content.matches(DocumentKind::Content));
        assert!(!SearchScope::Content.matches(DocumentKind::Media));
    }
}
