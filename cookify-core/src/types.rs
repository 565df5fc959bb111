use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Primary per-ingredient search
    #[default]
    Remote,
    /// Fallback search on an alternate ingredient name
    AlternateName,
    /// Fallback browse of a broad category
    CategoryBrowse,
    /// Built-in backup recipe
    Backup,
    /// Built-in popular recipe shown when no ingredients were given
    Popular,
    /// Recipe the user saved locally
    Custom,
}

/// A recipe under consideration, carrying accumulated match evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Number of ingredient queries that returned this recipe.
    #[serde(default)]
    pub matched_ingredient_count: u32,
    /// Total ingredients the recipe needs. Zero until enrichment.
    #[serde(default)]
    pub total_ingredient_count: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub source: CandidateSource,
}

impl RecipeCandidate {
    pub fn new(id: impl Into<String>, source: CandidateSource) -> Self {
        Self {
            id: id.into(),
            title: None,
            image: None,
            matched_ingredient_count: 0,
            total_ingredient_count: 0,
            category: None,
            source,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_counts(mut self, matched: u32, total: u32) -> Self {
        self.matched_ingredient_count = matched;
        self.total_ingredient_count = total;
        self
    }

    /// Count one more ingredient query that returned this recipe.
    pub fn record_match(&mut self) {
        self.matched_ingredient_count += 1;
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Recipe")
    }
}

/// Candidates keyed by id, in first-seen order. The first occurrence of an id wins.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<RecipeCandidate>,
    index: HashMap<String, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&RecipeCandidate> {
        self.index.get(id).map(|&i| &self.candidates[i])
    }

    /// Insert `candidate` unless its id is already present, and return the stored entry.
    pub fn get_or_insert(&mut self, candidate: RecipeCandidate) -> &mut RecipeCandidate {
        let idx = match self.index.get(&candidate.id) {
            Some(&i) => i,
            None => {
                let i = self.candidates.len();
                self.index.insert(candidate.id.clone(), i);
                self.candidates.push(candidate);
                i
            }
        };
        &mut self.candidates[idx]
    }

    /// Insert `candidate` unless its id is already present. Returns true if inserted.
    pub fn insert(&mut self, candidate: RecipeCandidate) -> bool {
        if self.contains(&candidate.id) {
            return false;
        }
        self.get_or_insert(candidate);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeCandidate> {
        self.candidates.iter()
    }

    pub fn into_vec(self) -> Vec<RecipeCandidate> {
        self.candidates
    }
}

impl FromIterator<RecipeCandidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = RecipeCandidate>>(iter: I) -> Self {
        let mut set = Self::new();
        for candidate in iter {
            set.insert(candidate);
        }
        set
    }
}

/// Classification of a scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Perfect,
    Partial,
    Excluded,
}

/// A candidate with its derived match figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub candidate: RecipeCandidate,
    pub additional_ingredients_needed: u32,
    pub unused_user_ingredients: u32,
    pub match_score: i64,
    /// `None` when the category says nothing about meat.
    pub vegetarian: Option<bool>,
}

impl ScoredRecipe {
    pub fn used_ingredient_count(&self) -> u32 {
        self.candidate.matched_ingredient_count
    }
}

/// Output of a search, consumed by the presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub normalized_ingredients: Vec<String>,
    pub perfect: Vec<ScoredRecipe>,
    pub partial: Vec<ScoredRecipe>,
    pub perfect_match_found: bool,
    /// Name of the fallback strategy that produced the candidates, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}
