//! Search usage analytics: query counters, no-result tracking, daily trend
//! buckets, and popular-content estimation.
//!
//! Every figure is derived from observed traffic. Counter maps grow with the
//! number of distinct lowercased query strings over the process lifetime;
//! callers that need a hard bound should recycle the owning service.

use chrono::{Duration, NaiveDate, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for one analytics scope (global or a single tenant)
#[derive(Debug, Default)]
struct ScopeStats {
    total_searches: AtomicU64,
    total_results: AtomicU64,
    query_counts: DashMap<String, u64>,
    no_result_counts: DashMap<String, u64>,
    daily: DashMap<NaiveDate, u64>,
}

impl ScopeStats {
    fn record(&self, query: &str, result_count: usize) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
        self.total_results
            .fetch_add(result_count as u64, Ordering::Relaxed);

        *self.query_counts.entry(query.to_string()).or_insert(0) += 1;
        if result_count == 0 {
            *self.no_result_counts.entry(query.to_string()).or_insert(0) += 1;
        }

        let today = Utc::now().date_naive();
        *self.daily.entry(today).or_insert(0) += 1;
    }

    fn top_n(map: &DashMap<String, u64>, n: usize) -> Vec<QueryCount> {
        let mut entries: Vec<QueryCount> = map
            .iter()
            .map(|entry| QueryCount {
                query: entry.key().clone(),
                count: *entry.value(),
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
        entries.truncate(n);
        entries
    }

    fn trend(&self, days: usize) -> Vec<TrendBucket> {
        let today = Utc::now().date_naive();
        (0..days)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset as i64);
                TrendBucket {
                    date,
                    searches: self.daily.get(&date).map_or(0, |c| *c),
                }
            })
            .collect()
    }
}

/// A query and how often it was seen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCount {
    pub query: String,
    pub count: u64,
}

/// Searches observed on one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendBucket {
    pub date: NaiveDate,
    pub searches: u64,
}

/// A document and how often it appeared on a served result page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularContent {
    pub document_id: String,
    pub impressions: u64,
}

/// Point-in-time analytics view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_searches: u64,
    pub avg_results_per_query: f64,
    pub top_queries: Vec<QueryCount>,
    pub top_no_result_queries: Vec<QueryCount>,
    pub daily_trend: Vec<TrendBucket>,
    pub popular_content: Vec<PopularContent>,
}

/// Fixed width of the trend series
const TREND_DAYS: usize = 7;

/// Collector for search usage statistics, safe for concurrent recording.
#[derive(Debug, Default)]
pub struct SearchAnalytics {
    global: ScopeStats,
    tenants: DashMap<String, Arc<ScopeStats>>,
    content_impressions: DashMap<String, u64>,
}

impl SearchAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one executed (or cache-served) query.
    pub fn record_search(&self, tenant_id: Option<&str>, query: &str, result_count: usize) {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return;
        }

        self.global.record(&normalized, result_count);
        if let Some(tenant) = tenant_id {
            let scope = Arc::clone(
                &self
                    .tenants
                    .entry(tenant.to_string())
                    .or_insert_with(|| Arc::new(ScopeStats::default())),
            );
            scope.record(&normalized, result_count);
        }
    }

    /// Record that these documents appeared on a served result page.
    pub fn record_impressions<'a>(&self, doc_ids: impl IntoIterator<Item = &'a str>) {
        for doc_id in doc_ids {
            *self
                .content_impressions
                .entry(doc_id.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Historical query counts for a scope, used by the suggestion engine.
    pub fn query_history(&self, tenant_id: Option<&str>) -> Vec<QueryCount> {
        let scope = match tenant_id {
            Some(tenant) => match self.tenants.get(tenant) {
                Some(scope) => Arc::clone(&scope),
                None => return Vec::new(),
            },
            None => return ScopeStats::top_n(&self.global.query_counts, usize::MAX),
        };
        ScopeStats::top_n(&scope.query_counts, usize::MAX)
    }

    /// Build a snapshot for the global scope or a single tenant.
    ///
    /// `popular_filter` decides which document ids belong to the requested
    /// scope; the caller owns that mapping (analytics does not track tenancy
    /// of individual documents).
    pub fn snapshot(
        &self,
        tenant_id: Option<&str>,
        top_n: usize,
        mut popular_filter: impl FnMut(&str) -> bool,
    ) -> AnalyticsSnapshot {
        let tenant_scope: Option<Arc<ScopeStats>> = match tenant_id {
            Some(tenant) => Some(
                self.tenants
                    .get(tenant)
                    .map(|s| Arc::clone(&s))
                    .unwrap_or_default(),
            ),
            None => None,
        };
        let stats: &ScopeStats = match &tenant_scope {
            Some(scope) => scope,
            None => &self.global,
        };

        let total_searches = stats.total_searches.load(Ordering::Relaxed);
        let total_results = stats.total_results.load(Ordering::Relaxed);
        let avg_results_per_query = if total_searches == 0 {
            0.0
        } else {
            total_results as f64 / total_searches as f64
        };

        let mut popular: Vec<PopularContent> = self
            .content_impressions
            .iter()
            .filter(|entry| popular_filter(entry.key()))
            .map(|entry| PopularContent {
                document_id: entry.key().clone(),
                impressions: *entry.value(),
            })
            .collect();
        popular.sort_by(|a, b| {
            b.impressions
                .cmp(&a.impressions)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        popular.truncate(top_n);

        AnalyticsSnapshot {
            total_searches,
            avg_results_per_query,
            top_queries: ScopeStats::top_n(&stats.query_counts, top_n),
            top_no_result_queries: ScopeStats::top_n(&stats.no_result_counts, top_n),
            daily_trend: stats.trend(TREND_DAYS),
            popular_content: popular,
        }
    }
}
