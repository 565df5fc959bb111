//! Plain-text rendering of search results and recipe details.

use cookify_core::{instruction_steps, suggested_additions, RecipeDetail, ScoredRecipe, SearchResults};

fn diet_label(vegetarian: Option<bool>) -> &'static str {
    match vegetarian {
        Some(true) => " [veg]",
        Some(false) => " [non-veg]",
        None => "",
    }
}

fn print_recipe(recipe: &ScoredRecipe) {
    let c = &recipe.candidate;
    println!(
        "  {:<10} {}{}",
        c.id,
        c.display_title(),
        diet_label(recipe.vegetarian)
    );
    println!(
        "             uses {} of yours, needs {} more, score {}",
        recipe.used_ingredient_count(),
        recipe.additional_ingredients_needed,
        recipe.match_score
    );
}

pub fn print_results(results: &SearchResults) {
    if results.normalized_ingredients.is_empty() {
        println!("No ingredients given. Showing popular recipes.");
    } else {
        println!("Ingredients: {}", results.normalized_ingredients.join(", "));
    }
    if let Some(tier) = &results.fallback {
        println!("No direct matches; showing results from {}.", tier.replace('_', " "));
    }
    if results.perfect_match_found {
        println!("Perfect match found!");
    }

    println!();
    println!("Perfect matches ({})", results.perfect.len());
    results.perfect.iter().for_each(print_recipe);

    println!();
    println!("Partial matches ({})", results.partial.len());
    results.partial.iter().for_each(print_recipe);

    if results.perfect.is_empty() && results.partial.is_empty() {
        println!();
        println!("Nothing close enough. Try adding more ingredients.");
    }
}

pub fn print_detail(detail: &RecipeDetail) {
    println!("{}", detail.title.as_deref().unwrap_or("Recipe"));
    let tags: Vec<&str> = [detail.category.as_deref(), detail.area.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !tags.is_empty() {
        println!("{}", tags.join(" / "));
    }

    println!();
    println!("Ingredients ({})", detail.total_ingredient_count());
    for ingredient in &detail.ingredients {
        if ingredient.measure.is_empty() {
            println!("  - {}", ingredient.name);
        } else {
            println!("  - {} ({})", ingredient.name, ingredient.measure);
        }
    }

    let steps = instruction_steps(detail.instructions.as_deref().unwrap_or_default());
    if !steps.is_empty() {
        println!();
        println!("Steps");
        for (i, step) in steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }

    let title = detail.title.as_deref().unwrap_or_default();
    println!();
    println!("Try adding: {}", suggested_additions(title).join(", "));
}
