//! Fill in ingredient totals for remote candidates.
//!
//! The best candidates get a detail lookup; the rest get an estimate so the
//! number of remote calls per search stays bounded.

use futures_util::future::join_all;

use crate::cache::{detail_key, ResponseCache, DETAIL_TTL};
use crate::http::{HttpClient, RetryPolicy};
use crate::mealdb::{MealDbClient, RecipeDetail};
use crate::types::{CandidateSource, RecipeCandidate};

/// Floor for estimated ingredient totals.
const MIN_ESTIMATED_TOTAL: u32 = 5;

/// Extra ingredients assumed for candidates that were not looked up.
const UNFETCHED_MARGIN: u32 = 2;

/// Built-in and custom candidates carry their own totals.
pub fn needs_enrichment(candidate: &RecipeCandidate) -> bool {
    matches!(
        candidate.source,
        CandidateSource::Remote | CandidateSource::AlternateName | CandidateSource::CategoryBrowse
    )
}

/// Indices of the candidates to look up: the `limit` highest match counts,
/// ties in input order.
pub fn select_for_lookup(candidates: &[RecipeCandidate], limit: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..candidates.len())
        .filter(|&i| needs_enrichment(&candidates[i]))
        .collect();
    indices.sort_by(|&a, &b| {
        candidates[b]
            .matched_ingredient_count
            .cmp(&candidates[a].matched_ingredient_count)
    });
    indices.truncate(limit);
    indices
}

/// Total for a candidate whose lookup failed.
pub fn failed_lookup_estimate(matched: u32) -> u32 {
    matched.max(MIN_ESTIMATED_TOTAL)
}

/// Total for a candidate outside the lookup set.
pub fn unfetched_estimate(matched: u32) -> u32 {
    (matched + UNFETCHED_MARGIN).max(MIN_ESTIMATED_TOTAL)
}

/// Detail record from cache or the remote source. Any failure is a `None`.
pub async fn recipe_detail<C: HttpClient>(
    db: &MealDbClient<C>,
    cache: &ResponseCache,
    id: &str,
    policy: RetryPolicy,
) -> Option<RecipeDetail> {
    let key = detail_key(id);
    if let Some(detail) = cache.get::<RecipeDetail>(&key) {
        return Some(detail);
    }

    match db.lookup(id, policy).await {
        Ok(Some(detail)) => {
            cache.put(&key, &detail, DETAIL_TTL);
            Some(detail)
        }
        Ok(None) => {
            tracing::warn!(id, "detail lookup returned no recipe");
            None
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "detail lookup failed");
            None
        }
    }
}

fn apply_detail(candidate: &mut RecipeCandidate, detail: Option<RecipeDetail>) {
    let Some(detail) = detail else {
        candidate.total_ingredient_count = failed_lookup_estimate(candidate.matched_ingredient_count);
        return;
    };

    candidate.total_ingredient_count = detail.total_ingredient_count();
    if detail.category.is_some() {
        candidate.category = detail.category;
    }
    if candidate.title.is_none() {
        candidate.title = detail.title;
    }
    if candidate.image.is_none() {
        candidate.image = detail.thumbnail;
    }
}

/// Set `total_ingredient_count` on every remote candidate.
pub async fn enrich<C: HttpClient>(
    db: &MealDbClient<C>,
    cache: &ResponseCache,
    candidates: &mut [RecipeCandidate],
    limit: usize,
    policy: RetryPolicy,
) {
    let selected = select_for_lookup(candidates, limit);

    let details = join_all(
        selected
            .iter()
            .map(|&i| recipe_detail(db, cache, &candidates[i].id, policy)),
    )
    .await;

    for (&i, detail) in selected.iter().zip(details) {
        apply_detail(&mut candidates[i], detail);
    }

    let mut estimated = 0;
    for (i, candidate) in candidates.iter_mut().enumerate() {
        if needs_enrichment(candidate) && !selected.contains(&i) {
            candidate.total_ingredient_count = unfetched_estimate(candidate.matched_ingredient_count);
            estimated += 1;
        }
    }

    tracing::info!(looked_up = selected.len(), estimated, "enrichment complete");
}
