//! Alternate search terms for ingredients the recipe source may index under a
//! more specific name (e.g. "flour" is usually listed as "plain flour").

use std::collections::HashMap;
use std::sync::LazyLock;

static ALTERNATIVES: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| {
        let table: &[(&str, &[&str])] = &[
            (
                "sugar",
                &["caster sugar", "brown sugar", "granulated sugar", "icing sugar"],
            ),
            (
                "flour",
                &["plain flour", "all-purpose flour", "wheat flour", "self-raising flour"],
            ),
            (
                "milk",
                &["whole milk", "dairy milk", "cow milk", "semi-skimmed milk"],
            ),
            ("butter", &["unsalted butter", "salted butter", "margarine"]),
            ("eggs", &["egg", "chicken eggs", "free-range eggs"]),
            ("egg", &["eggs", "chicken egg", "free-range egg"]),
            ("vanilla", &["vanilla extract", "vanilla essence", "vanilla pod"]),
            ("salt", &["table salt", "sea salt", "kosher salt"]),
            ("pepper", &["black pepper", "ground pepper", "white pepper"]),
            (
                "oil",
                &["vegetable oil", "cooking oil", "olive oil", "sunflower oil"],
            ),
            (
                "cheese",
                &["cheddar cheese", "mozzarella cheese", "parmesan cheese"],
            ),
            (
                "cream",
                &["heavy cream", "whipping cream", "double cream", "single cream"],
            ),
            ("yogurt", &["greek yogurt", "plain yogurt", "natural yogurt"]),
            ("lemon", &["lemon juice", "fresh lemon", "lemon zest"]),
            ("garlic", &["garlic cloves", "fresh garlic", "garlic powder"]),
            (
                "onion",
                &["yellow onion", "white onion", "red onion", "spring onion"],
            ),
            (
                "tomato",
                &["fresh tomato", "ripe tomato", "cherry tomato", "plum tomato"],
            ),
            (
                "potato",
                &["potatoes", "russet potato", "new potato", "sweet potato"],
            ),
            (
                "chicken",
                &["chicken breast", "chicken thighs", "chicken drumsticks"],
            ),
            (
                "beef",
                &["ground beef", "beef mince", "beef steak", "beef chunks"],
            ),
            (
                "rice",
                &["white rice", "long grain rice", "basmati rice", "jasmine rice"],
            ),
            ("pasta", &["spaghetti", "penne pasta", "fusilli", "linguine"]),
            ("herbs", &["fresh herbs", "mixed herbs", "dried herbs"]),
            ("spices", &["mixed spices", "ground spices"]),
            ("bread", &["white bread", "brown bread", "wholemeal bread"]),
            ("fish", &["white fish", "salmon", "cod", "haddock"]),
            (
                "mushrooms",
                &["button mushrooms", "chestnut mushrooms", "portobello mushrooms"],
            ),
        ];
        table.iter().copied().collect()
    });

/// Alternate names for a canonical ingredient. Empty if the ingredient is unknown.
pub fn alternatives_for(ingredient: &str) -> &'static [&'static str] {
    ALTERNATIVES
        .get(ingredient.to_lowercase().as_str())
        .copied()
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ingredient() {
        assert_eq!(
            alternatives_for("butter"),
            &["unsalted butter", "salted butter", "margarine"]
        );
        assert_eq!(alternatives_for("Egg")[0], "eggs");
    }

    #[test]
    fn test_unknown_ingredient() {
        assert!(alternatives_for("dragonfruit").is_empty());
        assert!(alternatives_for("").is_empty());
    }
}
