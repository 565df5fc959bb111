//! Degrade path for when the primary search finds nothing.
//!
//! Each strategy maps the normalized ingredients to candidates. The ladder
//! tries them in order and adopts the first non-empty result.

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::alternatives::alternatives_for;
use crate::config::{FallbackTier, SearchConfig, BROWSE_CATEGORIES};
use crate::http::{HttpClient, RetryPolicy};
use crate::mealdb::MealDbClient;
use crate::types::{CandidateSet, CandidateSource, RecipeCandidate};

use super::aggregate::stub_candidate;
use super::builtin::backup_recipes;

#[async_trait]
pub trait FallbackStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn candidates(&self, ingredients: &[String]) -> Vec<RecipeCandidate>;
}

/// Search on alternate names of the user's ingredients.
pub struct AlternateNames<'a, C: HttpClient> {
    pub db: &'a MealDbClient<C>,
    /// Cap on (ingredient, alternate) pairs queried.
    pub limit: usize,
    pub policy: RetryPolicy,
}

impl<C: HttpClient> AlternateNames<'_, C> {
    /// Alternate names to query, in ingredient order, capped at `limit`.
    pub fn terms(&self, ingredients: &[String]) -> Vec<&'static str> {
        ingredients
            .iter()
            .flat_map(|ingredient| alternatives_for(ingredient).iter().copied())
            .take(self.limit)
            .collect()
    }
}

#[async_trait]
impl<'a, C: HttpClient> FallbackStrategy for AlternateNames<'a, C> {
    fn name(&self) -> &'static str {
        "alternate_names"
    }

    async fn candidates(&self, ingredients: &[String]) -> Vec<RecipeCandidate> {
        let terms = self.terms(ingredients);
        let responses = join_all(terms.iter().map(|&term| async move {
            match self.db.filter_by_ingredient(term, self.policy).await {
                Ok(meals) => meals,
                Err(e) => {
                    tracing::debug!(term, error = %e, "alternate name search failed");
                    Vec::new()
                }
            }
        }))
        .await;

        let mut set = CandidateSet::new();
        for stub in responses.into_iter().flatten() {
            set.insert(stub_candidate(stub, CandidateSource::AlternateName).with_counts(1, 0));
        }
        set.into_vec()
    }
}

/// Browse broad categories until one returns anything.
pub struct CategoryBrowse<'a, C: HttpClient> {
    pub db: &'a MealDbClient<C>,
    pub categories: &'a [&'a str],
    pub take: usize,
    pub policy: RetryPolicy,
}

#[async_trait]
impl<'a, C: HttpClient> FallbackStrategy for CategoryBrowse<'a, C> {
    fn name(&self) -> &'static str {
        "category_browse"
    }

    async fn candidates(&self, _ingredients: &[String]) -> Vec<RecipeCandidate> {
        for &category in self.categories {
            let meals = match self.db.search_by_name(category, self.policy).await {
                Ok(meals) => meals,
                Err(e) => {
                    tracing::debug!(category, error = %e, "category browse failed");
                    continue;
                }
            };

            if !meals.is_empty() {
                tracing::debug!(category, found = meals.len(), "category browse hit");
                return meals
                    .into_iter()
                    .take(self.take)
                    .map(|stub| stub_candidate(stub, CandidateSource::CategoryBrowse))
                    .collect();
            }
        }
        Vec::new()
    }
}

/// Built-in generic recipes, ordered by overlap with the user's ingredients.
pub struct StaticBackup;

#[async_trait]
impl FallbackStrategy for StaticBackup {
    fn name(&self) -> &'static str {
        "static_backup"
    }

    async fn candidates(&self, ingredients: &[String]) -> Vec<RecipeCandidate> {
        backup_recipes(ingredients)
    }
}

/// Ordered strategies; the first to produce candidates wins.
pub struct FallbackLadder<'a> {
    tiers: Vec<Box<dyn FallbackStrategy + 'a>>,
}

impl<'a> FallbackLadder<'a> {
    pub fn new(tiers: Vec<Box<dyn FallbackStrategy + 'a>>) -> Self {
        Self { tiers }
    }

    /// Build the ladder described by `config.fallback_tiers`.
    pub fn from_config<C: HttpClient>(db: &'a MealDbClient<C>, config: &SearchConfig) -> Self {
        let tiers = config
            .fallback_tiers
            .iter()
            .map(|tier| -> Box<dyn FallbackStrategy + 'a> {
                match tier {
                    FallbackTier::AlternateNames => Box::new(AlternateNames {
                        db,
                        limit: config.alternate_limit,
                        policy: config.retries.alternate,
                    }),
                    FallbackTier::CategoryBrowse => Box::new(CategoryBrowse {
                        db,
                        categories: BROWSE_CATEGORIES,
                        take: config.category_take,
                        policy: config.retries.category,
                    }),
                    FallbackTier::StaticBackup => Box::new(StaticBackup),
                }
            })
            .collect();
        Self::new(tiers)
    }

    /// Run the tiers in order. Returns the winning tier's name and candidates.
    pub async fn run(&self, ingredients: &[String]) -> Option<(&'static str, Vec<RecipeCandidate>)> {
        for tier in &self.tiers {
            let candidates = tier.candidates(ingredients).await;
            if candidates.is_empty() {
                tracing::debug!(tier = tier.name(), "fallback tier produced nothing");
                continue;
            }
            tracing::info!(tier = tier.name(), candidates = candidates.len(), "fallback tier used");
            return Some((tier.name(), candidates));
        }
        None
    }
}
