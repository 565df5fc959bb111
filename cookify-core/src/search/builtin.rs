//! Built-in recipes used when the remote source cannot help.

use crate::types::{CandidateSource, RecipeCandidate};

struct BuiltinRecipe {
    id: &'static str,
    title: &'static str,
    image: &'static str,
    category: &'static str,
    total_ingredients: u32,
    /// Ingredients a user might have that this recipe uses, in normalized form.
    key_ingredients: &'static [&'static str],
}

impl BuiltinRecipe {
    fn candidate(&self, matched: u32, source: CandidateSource) -> RecipeCandidate {
        RecipeCandidate::new(self.id, source)
            .with_title(self.title)
            .with_image(self.image)
            .with_category(self.category)
            .with_counts(matched, self.total_ingredients)
    }

    fn overlap(&self, ingredients: &[String]) -> u32 {
        ingredients
            .iter()
            .filter(|i| {
                let name = i.to_lowercase();
                self.key_ingredients.iter().any(|k| *k == name)
            })
            .count() as u32
    }
}

const BACKUP_RECIPES: &[BuiltinRecipe] = &[
    BuiltinRecipe {
        id: "backup_pancakes",
        title: "Fluffy Pancakes",
        image: "https://images.unsplash.com/photo-1506084868230-bb9d95c24759?q=80&w=1200&auto=format&fit=crop",
        category: "Breakfast",
        total_ingredients: 6,
        key_ingredients: &["flour", "milk", "egg", "sugar", "butter"],
    },
    BuiltinRecipe {
        id: "backup_pasta",
        title: "Simple Pasta",
        image: "https://images.unsplash.com/photo-1621996346565-e3dbc353d2e5?q=80&w=1200&auto=format&fit=crop",
        category: "Main Course",
        total_ingredients: 5,
        key_ingredients: &["pasta", "tomato", "garlic", "oil", "cheese"],
    },
    BuiltinRecipe {
        id: "backup_salad",
        title: "Fresh Garden Salad",
        image: "https://images.unsplash.com/photo-1512621776951-a57141f2eefd?q=80&w=1200&auto=format&fit=crop",
        category: "Salad",
        total_ingredients: 4,
        key_ingredients: &["lettuce", "tomato", "cucumber", "onion"],
    },
    BuiltinRecipe {
        id: "backup_stirfry",
        title: "Quick Vegetable Stir Fry",
        image: "https://images.unsplash.com/photo-1512058564366-18510be2db19?q=80&w=1200&auto=format&fit=crop",
        category: "Main Course",
        total_ingredients: 6,
        key_ingredients: &["vegetables", "oil", "garlic", "soy sauce", "rice"],
    },
    BuiltinRecipe {
        id: "backup_soup",
        title: "Hearty Vegetable Soup",
        image: "https://images.unsplash.com/photo-1547592180-85f173990554?q=80&w=1200&auto=format&fit=crop",
        category: "Soup",
        total_ingredients: 7,
        key_ingredients: &["vegetables", "broth", "onion", "carrot", "potato"],
    },
];

const POPULAR_RECIPES: &[BuiltinRecipe] = &[
    BuiltinRecipe {
        id: "default_1",
        title: "Classic Pancakes",
        image: "https://www.themealdb.com/images/media/meals/rwuyqx1511383174.jpg",
        category: "Vegetarian",
        total_ingredients: 5,
        key_ingredients: &[],
    },
    BuiltinRecipe {
        id: "default_2",
        title: "Chicken Teriyaki",
        image: "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
        category: "Chicken",
        total_ingredients: 6,
        key_ingredients: &[],
    },
    BuiltinRecipe {
        id: "default_3",
        title: "Vegetable Stir Fry",
        image: "https://www.themealdb.com/images/media/meals/z7b4f31589769837.jpg",
        category: "Vegetarian",
        total_ingredients: 4,
        key_ingredients: &[],
    },
    BuiltinRecipe {
        id: "default_4",
        title: "Spaghetti Bolognese",
        image: "https://www.themealdb.com/images/media/meals/sutysw1468247559.jpg",
        category: "Beef",
        total_ingredients: 7,
        key_ingredients: &[],
    },
    BuiltinRecipe {
        id: "default_5",
        title: "Caesar Salad",
        image: "https://www.themealdb.com/images/media/meals/x7tdxw1560180315.jpg",
        category: "Vegetarian",
        total_ingredients: 5,
        key_ingredients: &[],
    },
];

/// Generic backup recipes, most overlapping with `ingredients` first.
pub fn backup_recipes(ingredients: &[String]) -> Vec<RecipeCandidate> {
    let mut recipes: Vec<RecipeCandidate> = BACKUP_RECIPES
        .iter()
        .map(|r| r.candidate(r.overlap(ingredients), CandidateSource::Backup))
        .collect();
    recipes.sort_by(|a, b| b.matched_ingredient_count.cmp(&a.matched_ingredient_count));
    recipes
}

/// Popular recipes shown when the user has no ingredients.
pub fn popular_recipes() -> Vec<RecipeCandidate> {
    POPULAR_RECIPES
        .iter()
        .map(|r| r.candidate(0, CandidateSource::Popular))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_ingredients;

    #[test]
    fn test_backup_sorted_by_overlap() {
        let ingredients: Vec<String> = ["onion", "carrot", "potato", "garlic"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let recipes = backup_recipes(&ingredients);

        assert_eq!(recipes.len(), 5);
        assert_eq!(recipes[0].id, "backup_soup");
        assert_eq!(recipes[0].matched_ingredient_count, 3);
        assert_eq!(recipes[0].total_ingredient_count, 7);
        assert!(recipes
            .windows(2)
            .all(|w| w[0].matched_ingredient_count >= w[1].matched_ingredient_count));
    }

    #[test]
    fn test_backup_matches_normalized_names() {
        let recipes = backup_recipes(&normalize_ingredients(&["Eggs", "flour", "milk", "Tomatoes"]));
        assert_eq!(recipes[0].id, "backup_pancakes");
        assert_eq!(recipes[0].matched_ingredient_count, 3);
        assert_eq!(recipes[1].matched_ingredient_count, 1);
    }

    #[test]
    fn test_backup_ties_keep_table_order() {
        let recipes = backup_recipes(&[]);
        let ids: Vec<_> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            ["backup_pancakes", "backup_pasta", "backup_salad", "backup_stirfry", "backup_soup"]
        );
        assert!(recipes.iter().all(|r| r.source == CandidateSource::Backup));
    }

    #[test]
    fn test_popular() {
        let recipes = popular_recipes();
        assert_eq!(recipes.len(), 5);
        assert!(recipes.iter().all(|r| r.matched_ingredient_count == 0));
        assert_eq!(recipes[3].display_title(), "Spaghetti Bolognese");
    }
}
