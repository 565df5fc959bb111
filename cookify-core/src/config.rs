//! Search configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::http::{RetryPolicy, DEFAULT_TIMEOUT};
use crate::mealdb::DEFAULT_BASE_URL;

/// Candidates enriched with a detail lookup per search.
pub const DEFAULT_DETAIL_LIMIT: usize = 30;

/// Alternate-name queries issued by the first fallback tier.
pub const DEFAULT_ALTERNATE_LIMIT: usize = 10;

/// Recipes taken from the first category that returns any.
pub const DEFAULT_CATEGORY_TAKE: usize = 3;

/// Categories browsed, in order, by the second fallback tier.
pub const BROWSE_CATEGORIES: &[&str] = &["chicken", "pasta", "vegetarian", "dessert", "breakfast"];

pub const INGREDIENT_RETRY: RetryPolicy = RetryPolicy::new(2, 500);
pub const ALTERNATE_RETRY: RetryPolicy = RetryPolicy::new(2, 300);
pub const CATEGORY_RETRY: RetryPolicy = RetryPolicy::new(1, 200);
pub const DETAIL_RETRY: RetryPolicy = RetryPolicy::new(2, 300);

/// A fallback strategy, tried in the configured order when the primary search
/// finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTier {
    AlternateNames,
    CategoryBrowse,
    StaticBackup,
}

pub const DEFAULT_FALLBACK_TIERS: &[FallbackTier] = &[
    FallbackTier::AlternateNames,
    FallbackTier::CategoryBrowse,
    FallbackTier::StaticBackup,
];

/// Business thresholds for classifying a scored candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    /// Most additional ingredients a perfect match may need.
    pub perfect_max_additional: u32,
    /// Candidates needing more additional ingredients than this are dropped.
    pub max_missing: u32,
    /// Minimum share of the user's ingredients a partial match must use.
    pub min_coverage: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            perfect_max_additional: 2,
            max_missing: 15,
            min_coverage: 0.5,
        }
    }
}

/// Retry policies for each kind of remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicies {
    pub ingredient: RetryPolicy,
    pub alternate: RetryPolicy,
    pub category: RetryPolicy,
    pub detail: RetryPolicy,
}

impl Default for RetryPolicies {
    fn default() -> Self {
        Self {
            ingredient: INGREDIENT_RETRY,
            alternate: ALTERNATE_RETRY,
            category: CATEGORY_RETRY,
            detail: DETAIL_RETRY,
        }
    }
}

impl RetryPolicies {
    /// Single attempt, no delay. Used by tests and offline runs.
    pub fn no_retry() -> Self {
        let once = RetryPolicy::new(1, 0);
        Self {
            ingredient: once,
            alternate: once,
            category: once,
            detail: once,
        }
    }
}

/// Configuration for a recipe search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub detail_limit: usize,
    pub alternate_limit: usize,
    pub category_take: usize,
    pub thresholds: MatchThresholds,
    pub retries: RetryPolicies,
    pub fallback_tiers: Vec<FallbackTier>,
    /// Per-request timeout for the HTTP client.
    pub http_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            detail_limit: DEFAULT_DETAIL_LIMIT,
            alternate_limit: DEFAULT_ALTERNATE_LIMIT,
            category_take: DEFAULT_CATEGORY_TAKE,
            thresholds: MatchThresholds::default(),
            retries: RetryPolicies::default(),
            fallback_tiers: DEFAULT_FALLBACK_TIERS.to_vec(),
            http_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SearchConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `COOKIFY_MEALDB_BASE_URL`: API base URL (default: TheMealDB v1 free tier)
    /// - `COOKIFY_DETAIL_LIMIT`: candidates enriched per search (default: 30)
    /// - `COOKIFY_ALTERNATE_LIMIT`: alternate-name queries (default: 10)
    /// - `COOKIFY_CATEGORY_TAKE`: recipes taken from a browsed category (default: 3)
    /// - `COOKIFY_PERFECT_MAX_ADDITIONAL`: (default: 2)
    /// - `COOKIFY_MAX_MISSING`: (default: 15)
    /// - `COOKIFY_MIN_COVERAGE`: fraction between 0 and 1 (default: 0.5)
    /// - `COOKIFY_HTTP_TIMEOUT_SECS`: per-request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let base_url =
            env::var("COOKIFY_MEALDB_BASE_URL").unwrap_or_else(|_| defaults.base_url.clone());

        let min_coverage = parse_var("COOKIFY_MIN_COVERAGE", defaults.thresholds.min_coverage)?;
        if !(0.0..=1.0).contains(&min_coverage) {
            return Err(ConfigError::InvalidEnvVar {
                var: "COOKIFY_MIN_COVERAGE".to_string(),
                value: min_coverage.to_string(),
            });
        }

        Ok(Self {
            base_url,
            detail_limit: parse_var("COOKIFY_DETAIL_LIMIT", defaults.detail_limit)?,
            alternate_limit: parse_var("COOKIFY_ALTERNATE_LIMIT", defaults.alternate_limit)?,
            category_take: parse_var("COOKIFY_CATEGORY_TAKE", defaults.category_take)?,
            thresholds: MatchThresholds {
                perfect_max_additional: parse_var(
                    "COOKIFY_PERFECT_MAX_ADDITIONAL",
                    defaults.thresholds.perfect_max_additional,
                )?,
                max_missing: parse_var("COOKIFY_MAX_MISSING", defaults.thresholds.max_missing)?,
                min_coverage,
            },
            retries: defaults.retries,
            fallback_tiers: defaults.fallback_tiers,
            http_timeout: Duration::from_secs(parse_var(
                "COOKIFY_HTTP_TIMEOUT_SECS",
                defaults.http_timeout.as_secs(),
            )?),
        })
    }
}

fn parse_var<T: FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
