//! Scenario tests for the search pipeline.
//!
//! Each JSON file in `fixtures/scenarios/` describes the user's ingredients,
//! the canned responses of the recipe source, and the expected result lists.
//! URLs without a canned response fail, like an unreachable source.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cookify_core::{
    CandidateSource, DietFilter, MockClient, RecipeCandidate, RecipeFinder, ResponseCache,
    RetryPolicies, ScoredRecipe, SearchConfig,
};
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://mealdb.test";

#[derive(Debug, Deserialize)]
struct Scenario {
    #[allow(dead_code)]
    description: String,
    ingredients: Vec<String>,
    #[serde(default)]
    diet: DietFilter,
    #[serde(default)]
    custom: Vec<RecipeCandidate>,
    /// Path and query relative to the base URL, mapped to a response.
    responses: HashMap<String, CannedResponse>,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CannedResponse {
    Status { status: u16 },
    Body(Value),
}

#[derive(Debug, Deserialize)]
struct Expected {
    #[serde(default)]
    normalized_ingredients: Option<Vec<String>>,
    perfect: Vec<String>,
    partial: Vec<String>,
    perfect_match_found: bool,
    #[serde(default)]
    fallback: Option<String>,
    /// Expected total ingredient counts by recipe id.
    #[serde(default)]
    totals: HashMap<String, u32>,
}

fn scenario_files() -> Vec<PathBuf> {
    let pattern = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/scenarios/*.json");
    let files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("Invalid fixture pattern")
        .filter_map(Result::ok)
        .collect();
    assert!(!files.is_empty(), "No scenario fixtures found");
    files
}

fn load(path: &Path) -> Scenario {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

fn mock_for(scenario: &Scenario) -> MockClient {
    scenario
        .responses
        .iter()
        .fold(MockClient::new(), |mock, (path, response)| {
            let url = format!("{BASE_URL}/{path}");
            match response {
                CannedResponse::Status { status } => mock.with_status(&url, *status),
                CannedResponse::Body(body) => mock.with_json(&url, body),
            }
        })
}

fn test_config() -> SearchConfig {
    SearchConfig {
        base_url: BASE_URL.to_string(),
        retries: RetryPolicies::no_retry(),
        ..SearchConfig::default()
    }
}

fn ids(recipes: &[ScoredRecipe]) -> Vec<&str> {
    recipes.iter().map(|r| r.candidate.id.as_str()).collect()
}

#[tokio::test]
async fn test_search_scenarios() {
    for path in scenario_files() {
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        println!("Scenario: {}", name);
        let scenario = load(&path);

        let cache = ResponseCache::new(Arc::new(cookify_core::MemoryStore::new()));
        let finder = RecipeFinder::new(mock_for(&scenario), cache, test_config()).unwrap();
        let results = finder
            .search(&scenario.ingredients, &scenario.custom, scenario.diet)
            .await
            .unwrap_or_else(|e| panic!("Search failed for {}: {}", name, e));

        let expected = &scenario.expected;
        if let Some(normalized) = &expected.normalized_ingredients {
            assert_eq!(&results.normalized_ingredients, normalized, "Normalized mismatch for {}", name);
        }
        assert_eq!(ids(&results.perfect), expected.perfect, "Perfect mismatch for {}", name);
        assert_eq!(ids(&results.partial), expected.partial, "Partial mismatch for {}", name);
        assert_eq!(
            results.perfect_match_found, expected.perfect_match_found,
            "Perfect signal mismatch for {}",
            name
        );
        assert_eq!(results.fallback, expected.fallback, "Fallback mismatch for {}", name);

        for (id, total) in &expected.totals {
            let recipe = results
                .perfect
                .iter()
                .chain(&results.partial)
                .find(|r| &r.candidate.id == id)
                .unwrap_or_else(|| panic!("{} missing from results of {}", id, name));
            assert_eq!(recipe.candidate.total_ingredient_count, *total, "Total mismatch for {} in {}", id, name);
        }
    }
}

#[tokio::test]
async fn test_repeat_search_is_served_from_cache() {
    let scenario = load(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/scenarios/egg_flour_milk.json"),
    );
    let cache = ResponseCache::new(Arc::new(cookify_core::MemoryStore::new()));
    let finder = RecipeFinder::new(mock_for(&scenario), cache, test_config()).unwrap();

    let first = finder.search(&scenario.ingredients, &[], DietFilter::All).await.unwrap();
    let calls = finder.db().http().total_calls();
    let second = finder.search(&scenario.ingredients, &[], DietFilter::All).await.unwrap();

    assert_eq!(finder.db().http().total_calls(), calls);
    assert_eq!(ids(&first.perfect), ids(&second.perfect));
}

#[tokio::test]
async fn test_saved_state_feeds_search() {
    let dir = tempfile::tempdir().unwrap();
    let store = cookify_core::FileStore::new(dir.path().to_path_buf());

    cookify_core::local_state::write_ingredients(&store, &["Eggs".to_string()]).unwrap();
    cookify_core::local_state::save_custom_recipe(
        &store,
        RecipeCandidate::new("mine", CandidateSource::Custom)
            .with_title("Boiled Egg")
            .with_counts(1, 1),
    );

    let ingredients = cookify_core::local_state::read_ingredients(&store);
    let custom = cookify_core::local_state::read_custom_recipes(&store);

    let mock = MockClient::new().with_json(
        &format!("{BASE_URL}/filter.php?i=egg"),
        &serde_json::json!({ "meals": null }),
    );
    let cache = ResponseCache::new(Arc::new(cookify_core::MemoryStore::new()));
    let finder = RecipeFinder::new(mock, cache, test_config()).unwrap();
    let results = finder.search(&ingredients, &custom, DietFilter::All).await.unwrap();

    assert_eq!(results.normalized_ingredients, vec!["egg"]);
    assert_eq!(results.perfect[0].candidate.id, "mine");
    assert_eq!(results.fallback.as_deref(), Some("static_backup"));
}
