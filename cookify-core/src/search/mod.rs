//! The recipe search pipeline.
//!
//! normalize → aggregate (→ fallback ladder if empty) → enrich → classify and rank.
//! Every stage runs inside a `search_stage` span.

pub mod aggregate;
pub mod builtin;
pub mod enrich;
pub mod fallback;
pub mod rank;

use tracing::{info_span, Instrument};

use crate::cache::ResponseCache;
use crate::config::SearchConfig;
use crate::error::{ConfigError, SearchError};
use crate::http::HttpClient;
use crate::mealdb::{MealDbClient, RecipeDetail};
use crate::normalize::normalize_ingredients;
use crate::types::{CandidateSet, RecipeCandidate, SearchResults};

pub use aggregate::aggregate;
pub use builtin::{backup_recipes, popular_recipes};
pub use enrich::enrich;
pub use fallback::{AlternateNames, CategoryBrowse, FallbackLadder, FallbackStrategy, StaticBackup};
pub use rank::{classify, classify_and_rank, compare, rank, score, vegetarian_for, DietFilter, Tiers};

/// Runs searches against one recipe source with one cache.
pub struct RecipeFinder<C: HttpClient> {
    db: MealDbClient<C>,
    cache: ResponseCache,
    config: SearchConfig,
}

impl<C: HttpClient> RecipeFinder<C> {
    pub fn new(http: C, cache: ResponseCache, config: SearchConfig) -> Result<Self, ConfigError> {
        let db = MealDbClient::new(http, &config.base_url)?;
        Ok(Self { db, cache, config })
    }

    pub fn db(&self) -> &MealDbClient<C> {
        &self.db
    }

    /// Full record for one recipe, through the detail cache.
    pub async fn recipe_detail(&self, id: &str) -> Option<RecipeDetail> {
        enrich::recipe_detail(&self.db, &self.cache, id, self.config.retries.detail).await
    }

    /// Search for recipes using `raw_ingredients`.
    ///
    /// `custom` recipes are listed ahead of remote ones and shadow remote
    /// recipes with the same id. Remote failures degrade to fewer or estimated
    /// results; the only error is a search that produced no candidates at all.
    pub async fn search(
        &self,
        raw_ingredients: &[String],
        custom: &[RecipeCandidate],
        diet: DietFilter,
    ) -> Result<SearchResults, SearchError> {
        self.cache.clean_expired();

        let ingredients = normalize_ingredients(raw_ingredients);
        tracing::info!(ingredients = ?ingredients, "starting recipe search");

        let (candidates, fallback) = if ingredients.is_empty() {
            (popular_recipes(), None)
        } else {
            self.gather(&ingredients).await?
        };

        let merged: CandidateSet = custom.iter().cloned().chain(candidates).collect();

        let tiers = async {
            classify_and_rank(
                merged.into_vec(),
                ingredients.len(),
                &self.config.thresholds,
                diet,
            )
        }
        .instrument(info_span!("search_stage", stage = "rank"))
        .await;

        let perfect_match_found = tiers.perfect_match_found();
        if perfect_match_found {
            tracing::info!(count = tiers.perfect.len(), "perfect match found");
        }

        Ok(SearchResults {
            normalized_ingredients: ingredients,
            perfect: tiers.perfect,
            partial: tiers.partial,
            perfect_match_found,
            fallback: fallback.map(str::to_string),
        })
    }

    /// Remote candidates for a non-empty ingredient list, enriched.
    async fn gather(
        &self,
        ingredients: &[String],
    ) -> Result<(Vec<RecipeCandidate>, Option<&'static str>), SearchError> {
        let primary = aggregate(&self.db, &self.cache, ingredients, self.config.retries.ingredient)
            .instrument(info_span!("search_stage", stage = "aggregate"))
            .await;

        let (mut candidates, fallback) = if primary.is_empty() {
            let ladder = FallbackLadder::from_config(&self.db, &self.config);
            let (tier, found) = ladder
                .run(ingredients)
                .instrument(info_span!("search_stage", stage = "fallback"))
                .await
                .ok_or(SearchError::NoCandidates {
                    ingredient_count: ingredients.len(),
                })?;
            (found, Some(tier))
        } else {
            (primary.into_vec(), None)
        };

        enrich(
            &self.db,
            &self.cache,
            &mut candidates,
            self.config.detail_limit,
            self.config.retries.detail,
        )
        .instrument(info_span!("search_stage", stage = "enrich"))
        .await;

        Ok((candidates, fallback))
    }
}
