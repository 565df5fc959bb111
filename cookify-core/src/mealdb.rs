//! Client for the TheMealDB recipe API.
//!
//! Three read-only endpoints are used: filter by ingredient, lookup by id, and
//! search by name. Responses wrap their results in `{"meals": [...]}` and use
//! `null` (or occasionally a string) when nothing matched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, FetchError};
use crate::http::{fetch_json_with_retry, HttpClient, RetryPolicy};

/// Default TheMealDB base URL (free tier, no API key).
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Number of positional ingredient/measure slots in a full recipe record.
pub const INGREDIENT_SLOTS: usize = 20;

const PROBE_TERM: &str = "chicken";

/// Recipe stub as returned by the filter and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealStub {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal", default)]
    pub title: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
}

/// One populated ingredient slot of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub measure: String,
}

/// Full recipe record from the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: String,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
}

impl RecipeDetail {
    /// Build from a raw meal object. Returns `None` if it has no id.
    pub fn from_record(record: &Map<String, Value>) -> Option<Self> {
        let id = match record.get("idMeal")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        let ingredients = (1..=INGREDIENT_SLOTS)
            .filter_map(|i| {
                let name = text_field(record, &format!("strIngredient{i}"))?;
                let measure = text_field(record, &format!("strMeasure{i}")).unwrap_or_default();
                Some(RecipeIngredient { name, measure })
            })
            .collect();

        Some(Self {
            id,
            title: text_field(record, "strMeal"),
            thumbnail: text_field(record, "strMealThumb"),
            category: text_field(record, "strCategory"),
            area: text_field(record, "strArea"),
            instructions: text_field(record, "strInstructions"),
            ingredients,
        })
    }

    /// Number of populated ingredient slots.
    pub fn total_ingredient_count(&self) -> u32 {
        self.ingredients.len() as u32
    }
}

/// Trimmed non-blank string field.
fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Deserialize)]
struct MealsEnvelope {
    #[serde(default)]
    meals: Value,
}

impl MealsEnvelope {
    fn records(self) -> Vec<Value> {
        match self.meals {
            Value::Array(items) => items,
            _ => Vec::new(),
        }
    }

    fn stubs(self) -> Vec<MealStub> {
        self.records()
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()
    }
}

/// Outcome of the connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum ProbeStatus {
    Working,
    NoResults,
    Failed(String),
}

/// TheMealDB client over an injected HTTP client.
pub struct MealDbClient<C: HttpClient> {
    http: C,
    base_url: String,
}

impl<C: HttpClient> MealDbClient<C> {
    /// Create a client. The base URL must be an absolute http(s) URL.
    pub fn new(http: C, base_url: &str) -> Result<Self, ConfigError> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn filter_url(&self, ingredient: &str) -> String {
        format!(
            "{}/filter.php?i={}",
            self.base_url,
            urlencoding::encode(ingredient)
        )
    }

    pub fn lookup_url(&self, id: &str) -> String {
        format!("{}/lookup.php?i={}", self.base_url, urlencoding::encode(id))
    }

    pub fn search_url(&self, term: &str) -> String {
        format!("{}/search.php?s={}", self.base_url, urlencoding::encode(term))
    }

    /// Recipes containing an ingredient.
    pub async fn filter_by_ingredient(
        &self,
        ingredient: &str,
        policy: RetryPolicy,
    ) -> Result<Vec<MealStub>, FetchError> {
        let envelope: MealsEnvelope =
            fetch_json_with_retry(&self.http, &self.filter_url(ingredient), policy).await?;
        Ok(envelope.stubs())
    }

    /// Recipes whose name matches a term.
    pub async fn search_by_name(
        &self,
        term: &str,
        policy: RetryPolicy,
    ) -> Result<Vec<MealStub>, FetchError> {
        let envelope: MealsEnvelope =
            fetch_json_with_retry(&self.http, &self.search_url(term), policy).await?;
        Ok(envelope.stubs())
    }

    /// Full record for one recipe, or `None` if the id is unknown.
    pub async fn lookup(
        &self,
        id: &str,
        policy: RetryPolicy,
    ) -> Result<Option<RecipeDetail>, FetchError> {
        let envelope: MealsEnvelope =
            fetch_json_with_retry(&self.http, &self.lookup_url(id), policy).await?;
        Ok(envelope
            .records()
            .iter()
            .filter_map(Value::as_object)
            .find_map(RecipeDetail::from_record))
    }

    /// Check that the source answers with data.
    pub async fn probe(&self) -> ProbeStatus {
        match self.search_by_name(PROBE_TERM, RetryPolicy::new(1, 0)).await {
            Ok(meals) if !meals.is_empty() => ProbeStatus::Working,
            Ok(_) => ProbeStatus::NoResults,
            Err(e) => ProbeStatus::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;
    use serde_json::json;

    const BASE: &str = "https://mealdb.test/api";

    fn client(mock: MockClient) -> MealDbClient<MockClient> {
        MealDbClient::new(mock, BASE).unwrap()
    }

    #[test]
    fn test_urls_are_encoded() {
        let db = client(MockClient::new());
        assert_eq!(
            db.filter_url("bell pepper"),
            "https://mealdb.test/api/filter.php?i=bell%20pepper"
        );
        assert_eq!(db.lookup_url("52772"), "https://mealdb.test/api/lookup.php?i=52772");
        assert_eq!(db.search_url("chicken"), "https://mealdb.test/api/search.php?s=chicken");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(MealDbClient::new(MockClient::new(), "not a url").is_err());
        assert!(MealDbClient::new(MockClient::new(), "ftp://mealdb.test").is_err());
    }

    #[tokio::test]
    async fn test_filter_null_meals() {
        let mock = MockClient::new().with_json(
            "https://mealdb.test/api/filter.php?i=unobtainium",
            &json!({ "meals": null }),
        );
        let db = client(mock);
        let meals = db
            .filter_by_ingredient("unobtainium", RetryPolicy::new(1, 0))
            .await
            .unwrap();
        assert!(meals.is_empty());
    }

    #[tokio::test]
    async fn test_filter_parses_stubs() {
        let mock = MockClient::new().with_json(
            "https://mealdb.test/api/filter.php?i=egg",
            &json!({ "meals": [
                { "idMeal": "1", "strMeal": "Omelette", "strMealThumb": "http://img/1.jpg" },
                { "strMeal": "no id" },
            ]}),
        );
        let db = client(mock);
        let meals = db.filter_by_ingredient("egg", RetryPolicy::new(1, 0)).await.unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "1");
        assert_eq!(meals[0].title.as_deref(), Some("Omelette"));
        assert_eq!(meals[0].category, None);
    }

    #[tokio::test]
    async fn test_lookup_counts_populated_slots() {
        let mut meal = json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven.\r\nBake.",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": " water ",
            "strMeasure2": null,
            "strIngredient3": "   ",
            "strIngredient4": null,
            "strIngredient5": "",
        });
        meal["strIngredient20"] = json!("rice");

        let mock = MockClient::new().with_json(
            "https://mealdb.test/api/lookup.php?i=52772",
            &json!({ "meals": [meal] }),
        );
        let db = client(mock);
        let detail = db.lookup("52772", RetryPolicy::new(1, 0)).await.unwrap().unwrap();

        assert_eq!(detail.total_ingredient_count(), 3);
        assert_eq!(detail.category.as_deref(), Some("Chicken"));
        assert_eq!(detail.area.as_deref(), Some("Japanese"));
        assert_eq!(
            detail.ingredients[1],
            RecipeIngredient {
                name: "water".to_string(),
                measure: String::new()
            }
        );
        assert_eq!(detail.ingredients[2].name, "rice");
    }

    #[tokio::test]
    async fn test_lookup_unknown_id() {
        let mock = MockClient::new().with_json(
            "https://mealdb.test/api/lookup.php?i=0",
            &json!({ "meals": "Invalid ID" }),
        );
        let db = client(mock);
        assert_eq!(db.lookup("0", RetryPolicy::new(1, 0)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_probe() {
        let url = "https://mealdb.test/api/search.php?s=chicken";

        let db = client(MockClient::new().with_json(url, &json!({ "meals": [{ "idMeal": "1" }] })));
        assert_eq!(db.probe().await, ProbeStatus::Working);

        let db = client(MockClient::new().with_json(url, &json!({ "meals": null })));
        assert_eq!(db.probe().await, ProbeStatus::NoResults);

        let db = client(MockClient::new().with_status(url, 500));
        assert!(matches!(db.probe().await, ProbeStatus::Failed(_)));
    }
}
