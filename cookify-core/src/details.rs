//! Presentation helpers for a single recipe's detail view.

use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid HTML tag regex"));

/// Newlines, or a "3. " style step number.
static STEP_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+|\s*\d+\.\s+").expect("Invalid step break regex"));

/// Split free-text instructions into steps. Tags are stripped and entities decoded.
pub fn instruction_steps(instructions: &str) -> Vec<String> {
    let stripped = HTML_TAG.replace_all(instructions, " ");
    let plain = html_escape::decode_html_entities(&stripped);
    STEP_BREAK
        .split(plain.trim())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A few ingredients worth adding, chosen from the recipe title.
pub fn suggested_additions(title: &str) -> &'static [&'static str] {
    let title = title.to_lowercase();
    if title.contains("pasta") || title.contains("italian") {
        &["fresh basil", "parmesan", "olive oil"]
    } else if title.contains("omelette") || title.contains("egg") {
        &["chives", "cheddar", "black pepper"]
    } else if title.contains("salad") {
        &["lemon juice", "olive oil", "feta"]
    } else {
        &["salt", "black pepper", "lemon juice", "fresh herbs"]
    }
}
