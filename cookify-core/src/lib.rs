pub mod alternatives;
pub mod cache;
pub mod config;
pub mod details;
pub mod error;
pub mod http;
pub mod local_state;
pub mod mealdb;
pub mod normalize;
pub mod search;
pub mod store;
pub mod types;

pub use alternatives::alternatives_for;
pub use cache::{CacheEntry, ResponseCache, DETAIL_TTL, INGREDIENT_TTL};
pub use config::{FallbackTier, MatchThresholds, RetryPolicies, SearchConfig};
pub use details::{instruction_steps, suggested_additions};
pub use error::{CacheError, ConfigError, FetchError, LocalStateError, SearchError, StoreError};
pub use http::{HttpClient, MockClient, MockResponse, ReqwestClient, RetryPolicy};
pub use mealdb::{MealDbClient, MealStub, ProbeStatus, RecipeDetail, RecipeIngredient};
pub use normalize::{normalize_ingredient, normalize_ingredients};
pub use search::{DietFilter, RecipeFinder};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::{
    CandidateSet, CandidateSource, MatchTier, RecipeCandidate, ScoredRecipe, SearchResults,
};
