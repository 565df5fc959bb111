//! User state kept in the persistent key-value store: the ingredient list and
//! locally saved custom recipes.
//!
//! Reads never fail. Missing state is empty; malformed state is logged and
//! treated as empty.

use serde_json::Value;

use crate::error::{LocalStateError, StoreError};
use crate::store::KeyValueStore;
use crate::types::{CandidateSource, RecipeCandidate};

pub const INGREDIENTS_KEY: &str = "cookify_ingredients";
pub const CUSTOM_RECIPES_KEY: &str = "cookify_custom_recipes";

fn read_array(store: &dyn KeyValueStore, key: &str) -> Result<Vec<Value>, LocalStateError> {
    let Some(raw) = store.get(key) else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(other) => Err(LocalStateError {
            key: key.to_string(),
            reason: format!("expected a list, found {}", json_kind(&other)),
        }),
        Err(e) => Err(LocalStateError {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Read the user's raw ingredient list. Non-string entries are skipped.
pub fn read_ingredients(store: &dyn KeyValueStore) -> Vec<String> {
    match read_array(store, INGREDIENTS_KEY) {
        Ok(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring stored ingredients");
            Vec::new()
        }
    }
}

pub fn write_ingredients(store: &dyn KeyValueStore, ingredients: &[String]) -> Result<(), StoreError> {
    store.set(INGREDIENTS_KEY, &serde_json::to_string(ingredients)?)
}

pub fn clear_ingredients(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.delete(INGREDIENTS_KEY)
}

/// Read saved custom recipes, newest first. Records that don't parse are skipped.
pub fn read_custom_recipes(store: &dyn KeyValueStore) -> Vec<RecipeCandidate> {
    match read_array(store, CUSTOM_RECIPES_KEY) {
        Ok(items) => items
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<RecipeCandidate>(v) {
                Ok(mut recipe) => {
                    recipe.source = CandidateSource::Custom;
                    Some(recipe)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed custom recipe");
                    None
                }
            })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring stored custom recipes");
            Vec::new()
        }
    }
}

/// Prepend a custom recipe and return the updated list.
///
/// The write is best-effort: on failure the returned list is still the one the
/// caller would have seen had it succeeded.
pub fn save_custom_recipe(store: &dyn KeyValueStore, recipe: RecipeCandidate) -> Vec<RecipeCandidate> {
    let mut recipes = read_custom_recipes(store);
    recipes.insert(
        0,
        RecipeCandidate {
            source: CandidateSource::Custom,
            ..recipe
        },
    );

    let result = serde_json::to_string(&recipes)
        .map_err(StoreError::from)
        .and_then(|json| store.set(CUSTOM_RECIPES_KEY, &json));
    if let Err(e) = result {
        tracing::warn!(error = %e, "failed to save custom recipe");
    }

    recipes
}
