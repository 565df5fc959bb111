//! Scoring, classification and ordering of enriched candidates.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::MatchThresholds;
use crate::types::{MatchTier, RecipeCandidate, ScoredRecipe};

const VEGETARIAN_CATEGORIES: &[&str] = &["Vegetarian", "Vegan"];
const MEAT_CATEGORIES: &[&str] = &["Beef", "Chicken", "Pork", "Lamb", "Goat", "Seafood"];

/// Which recipes to show by vegetarian status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietFilter {
    #[default]
    All,
    Vegetarian,
    NonVegetarian,
}

impl DietFilter {
    /// Unknown vegetarian status only passes `All`.
    pub fn allows(self, vegetarian: Option<bool>) -> bool {
        match self {
            DietFilter::All => true,
            DietFilter::Vegetarian => vegetarian == Some(true),
            DietFilter::NonVegetarian => vegetarian == Some(false),
        }
    }
}

impl FromStr for DietFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DietFilter::All),
            "veg" | "vegetarian" => Ok(DietFilter::Vegetarian),
            "non-veg" | "non-vegetarian" | "nonveg" => Ok(DietFilter::NonVegetarian),
            other => Err(format!("unknown diet filter: {other}")),
        }
    }
}

pub fn vegetarian_for(category: Option<&str>) -> Option<bool> {
    let category = category?.trim();
    if VEGETARIAN_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category))
    {
        Some(true)
    } else if MEAT_CATEGORIES.iter().any(|c| c.eq_ignore_ascii_case(category)) {
        Some(false)
    } else {
        None
    }
}

/// Derive match figures for a candidate whose total is known.
pub fn score(candidate: RecipeCandidate, user_ingredient_count: usize) -> ScoredRecipe {
    let matched = candidate.matched_ingredient_count;
    let additional = candidate.total_ingredient_count.saturating_sub(matched);
    let unused = (user_ingredient_count as u32).saturating_sub(matched);
    let vegetarian = vegetarian_for(candidate.category.as_deref());

    ScoredRecipe {
        candidate,
        additional_ingredients_needed: additional,
        unused_user_ingredients: unused,
        match_score: i64::from(matched) - i64::from(additional),
        vegetarian,
    }
}

pub fn classify(
    recipe: &ScoredRecipe,
    user_ingredient_count: usize,
    thresholds: &MatchThresholds,
) -> MatchTier {
    if user_ingredient_count == 0 {
        return MatchTier::Partial;
    }

    let additional = recipe.additional_ingredients_needed;
    if recipe.unused_user_ingredients == 0 && additional <= thresholds.perfect_max_additional {
        return MatchTier::Perfect;
    }

    let coverage = f64::from(recipe.used_ingredient_count()) / user_ingredient_count as f64;
    if additional <= thresholds.max_missing && coverage >= thresholds.min_coverage {
        MatchTier::Partial
    } else {
        MatchTier::Excluded
    }
}

/// Best first: higher score, fewer additional, more used, fewer unused.
pub fn compare(a: &ScoredRecipe, b: &ScoredRecipe) -> Ordering {
    b.match_score
        .cmp(&a.match_score)
        .then(a.additional_ingredients_needed.cmp(&b.additional_ingredients_needed))
        .then(b.used_ingredient_count().cmp(&a.used_ingredient_count()))
        .then(a.unused_user_ingredients.cmp(&b.unused_user_ingredients))
}

/// Stable sort, so full ties keep their input order.
pub fn rank(recipes: &mut [ScoredRecipe]) {
    recipes.sort_by(compare);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tiers {
    pub perfect: Vec<ScoredRecipe>,
    pub partial: Vec<ScoredRecipe>,
}

impl Tiers {
    pub fn perfect_match_found(&self) -> bool {
        !self.perfect.is_empty()
    }
}

/// Score, filter by diet, classify and order every candidate.
pub fn classify_and_rank(
    candidates: Vec<RecipeCandidate>,
    user_ingredient_count: usize,
    thresholds: &MatchThresholds,
    diet: DietFilter,
) -> Tiers {
    let mut tiers = Tiers::default();
    let mut excluded = 0;

    for candidate in candidates {
        let recipe = score(candidate, user_ingredient_count);
        if !diet.allows(recipe.vegetarian) {
            continue;
        }
        match classify(&recipe, user_ingredient_count, thresholds) {
            MatchTier::Perfect => tiers.perfect.push(recipe),
            MatchTier::Partial => tiers.partial.push(recipe),
            MatchTier::Excluded => excluded += 1,
        }
    }

    rank(&mut tiers.perfect);
    rank(&mut tiers.partial);

    tracing::debug!(
        perfect = tiers.perfect.len(),
        partial = tiers.partial.len(),
        excluded,
        "classified candidates"
    );
    tiers
}
