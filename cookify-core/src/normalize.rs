//! Ingredient normalization.
//!
//! Canonicalizes free-text ingredient names so they match the recipe source's
//! vocabulary: lowercase, trimmed, regional names mapped to a common one, and
//! terms too vague to search on dropped.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Regional and plural variants mapped to the name the recipe source indexes.
static ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("capsicum", "bell pepper"),
        ("capsicums", "bell peppers"),
        ("brinjal", "eggplant"),
        ("courgette", "zucchini"),
        ("aubergine", "eggplant"),
        ("corn flour", "cornstarch"),
        ("icing sugar", "powdered sugar"),
        ("castor sugar", "caster sugar"),
        ("biscuits", "cookies"),
        ("tomatoes", "tomato"),
        ("onions", "onion"),
        ("eggs", "egg"),
    ]
    .into_iter()
    .collect()
});

/// Words that match too many recipes to be useful as a search term.
static NOISE: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["sauce", "masala", "spices", "seasoning"].into_iter().collect());

/// Normalize one ingredient. Returns `None` for blank or noise entries.
pub fn normalize_ingredient(raw: &str) -> Option<String> {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    let canonical = ALIASES.get(lower.as_str()).map_or(lower.clone(), |s| (*s).to_string());
    if NOISE.contains(canonical.as_str()) {
        return None;
    }
    Some(canonical)
}

/// Normalize a list of ingredients, keeping input order.
///
/// Repeated entries are kept; blank and noise entries are dropped.
pub fn normalize_ingredients<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .filter_map(|s| normalize_ingredient(s.as_ref()))
        .collect()
}
