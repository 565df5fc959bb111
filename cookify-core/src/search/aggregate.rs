//! Primary candidate search: one query per ingredient, merged by recipe id.

use futures_util::future::join_all;

use crate::cache::{ingredient_key, ResponseCache, INGREDIENT_TTL};
use crate::http::{HttpClient, RetryPolicy};
use crate::mealdb::{MealDbClient, MealStub};
use crate::types::{CandidateSet, CandidateSource, RecipeCandidate};

pub(crate) fn stub_candidate(stub: MealStub, source: CandidateSource) -> RecipeCandidate {
    RecipeCandidate {
        id: stub.id,
        title: stub.title,
        image: stub.thumbnail,
        matched_ingredient_count: 0,
        total_ingredient_count: 0,
        category: stub.category.filter(|c| !c.is_empty()),
        source,
    }
}

/// Recipes containing one ingredient, from cache or the remote source.
///
/// A remote failure is logged and treated as no results.
async fn recipes_with<C: HttpClient>(
    db: &MealDbClient<C>,
    cache: &ResponseCache,
    ingredient: &str,
    policy: RetryPolicy,
) -> Vec<MealStub> {
    let key = ingredient_key(ingredient);
    if let Some(meals) = cache.get::<Vec<MealStub>>(&key) {
        return meals;
    }

    match db.filter_by_ingredient(ingredient, policy).await {
        Ok(meals) => {
            cache.put(&key, &meals, INGREDIENT_TTL);
            meals
        }
        Err(e) => {
            tracing::warn!(ingredient, error = %e, "ingredient search failed");
            Vec::new()
        }
    }
}

/// Merge per-ingredient responses. Each response that contains a recipe adds
/// one match point to it.
pub fn merge_responses<I>(responses: I) -> CandidateSet
where
    I: IntoIterator<Item = Vec<MealStub>>,
{
    let mut set = CandidateSet::new();
    for meals in responses {
        for stub in meals {
            set.get_or_insert(stub_candidate(stub, CandidateSource::Remote))
                .record_match();
        }
    }
    set
}

/// Query every ingredient concurrently and merge the results.
pub async fn aggregate<C: HttpClient>(
    db: &MealDbClient<C>,
    cache: &ResponseCache,
    ingredients: &[String],
    policy: RetryPolicy,
) -> CandidateSet {
    let responses = join_all(
        ingredients
            .iter()
            .map(|ingredient| recipes_with(db, cache, ingredient, policy)),
    )
    .await;

    for (ingredient, meals) in ingredients.iter().zip(&responses) {
        tracing::debug!(ingredient = %ingredient, meals = meals.len(), "ingredient search results");
    }

    let set = merge_responses(responses);
    tracing::info!(
        ingredients = ingredients.len(),
        candidates = set.len(),
        "primary search complete"
    );
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;
    use crate::http::MockClient;
    use crate::store::{KeyValueStore, MemoryStore};
    use chrono::TimeDelta;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const BASE: &str = "https://mealdb.test";

    fn stub(id: &str) -> MealStub {
        MealStub {
            id: id.to_string(),
            title: Some(format!("Recipe {id}")),
            thumbnail: None,
            category: None,
        }
    }

    #[test]
    fn test_merge_counts_per_response() {
        let set = merge_responses(vec![vec![stub("R"), stub("A")], vec![stub("R")]]);
        assert_eq!(set.get("R").unwrap().matched_ingredient_count, 2);
        assert_eq!(set.get("A").unwrap().matched_ingredient_count, 1);
        let ids: Vec<_> = set.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["R", "A"]);
    }

    #[tokio::test]
    async fn test_aggregate_uses_cache_and_absorbs_failures() {
        let mock = MockClient::new()
            .with_json(
                "https://mealdb.test/filter.php?i=egg",
                &json!({ "meals": [{ "idMeal": "R", "strMeal": "Custard" }] }),
            )
            .with_status("https://mealdb.test/filter.php?i=milk", 500);
        let db = MealDbClient::new(mock, BASE).unwrap();
        let store = Arc::new(MemoryStore::new());
        let cache = ResponseCache::new(store.clone());
        let ingredients = vec!["egg".to_string(), "milk".to_string()];

        let set = aggregate(&db, &cache, &ingredients, RetryPolicy::new(1, 0)).await;
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("R").unwrap().matched_ingredient_count, 1);

        // Failures are not cached, successes are
        assert!(store.get("ingredient_egg").is_some());
        assert!(store.get("ingredient_milk").is_none());

        aggregate(&db, &cache, &ingredients, RetryPolicy::new(1, 0)).await;
        assert_eq!(db.http().call_count("https://mealdb.test/filter.php?i=egg"), 1);
        assert_eq!(db.http().call_count("https://mealdb.test/filter.php?i=milk"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ingredient_queries_back_off_concurrently() {
        let ingredients: Vec<String> = ["egg", "milk", "flour"].iter().map(|s| s.to_string()).collect();
        let mut mock = MockClient::new();
        for ingredient in &ingredients {
            mock = mock.with_status(&format!("{BASE}/filter.php?i={ingredient}"), 500);
        }
        let db = MealDbClient::new(mock, BASE).unwrap();
        let cache = ResponseCache::new(Arc::new(MemoryStore::new()));

        let start = tokio::time::Instant::now();
        let set = aggregate(&db, &cache, &ingredients, RetryPolicy::new(2, 500)).await;

        assert!(set.is_empty());
        assert_eq!(db.http().total_calls(), 6);
        // One shared backoff, not one per ingredient
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_ingredient_entries_live_one_hour() {
        let mock = MockClient::new().with_json(
            &format!("{BASE}/filter.php?i=egg"),
            &json!({ "meals": [{ "idMeal": "R", "strMeal": "Custard" }] }),
        );
        let db = MealDbClient::new(mock, BASE).unwrap();
        let store = Arc::new(MemoryStore::new());
        let cache = ResponseCache::new(store.clone());

        aggregate(&db, &cache, &["egg".to_string()], RetryPolicy::new(1, 0)).await;

        let raw = store.get("ingredient_egg").unwrap();
        let entry: CacheEntry<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entry.expires_at - entry.created_at, TimeDelta::hours(1));
        assert_eq!(entry.payload[0]["idMeal"], "R");
    }
}
