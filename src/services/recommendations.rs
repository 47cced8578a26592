use std::collections::HashSet;

use crate::models::{Category, Recipe, RecipeBook, RecipeId, Restriction};
use crate::services::restrictions;

/// Maximum number of recipes recommended per request
pub const MAX_RECOMMENDATIONS: usize = 2;

/// Maps a requested dessert type to the category keys to search
///
/// Blank or `"all"` means every default category. Known singular nouns map
/// to their category; anything else is pluralized with a trailing `s`.
pub fn normalize_type(user_type: Option<&str>) -> Vec<String> {
    let key = user_type.map(|t| t.trim().to_lowercase()).unwrap_or_default();

    if key.is_empty() || key == "all" {
        return Category::ALL.iter().map(|c| c.as_str().to_string()).collect();
    }

    let plural = match key.as_str() {
        "cookie" => Category::Cookies.as_str().to_string(),
        "cake" => Category::Cakes.as_str().to_string(),
        "bread" => Category::Breads.as_str().to_string(),
        _ if key.ends_with('s') => key,
        _ => format!("{}s", key),
    };

    vec![plural]
}

/// Sort key placing unknown (zero) times after every known time
fn rank_key(minutes: i64) -> (bool, i64) {
    (minutes == 0, minutes)
}

/// Recipes from the given categories ordered by time, encounter order kept on ties
fn ranked<'a, K: AsRef<str>>(book: &'a RecipeBook, keys: &[K]) -> Vec<&'a Recipe> {
    let mut pool: Vec<&'a Recipe> = book.iter_categories(keys).collect();
    pool.sort_by_key(|recipe| rank_key(recipe.minutes()));
    pool
}

/// Selects up to two recipes matching a type, a time budget and restrictions
///
/// Recipes are excluded when a budget is given and their time is unknown or
/// over budget, or when an active restriction keyword occurs in their
/// ingredients. Survivors are ranked fastest first. When fewer than two
/// survive, the list is topped up from the requested categories and then
/// from every default category, ignoring the filters.
pub fn filter_recipes<'a>(
    book: &'a RecipeBook,
    user_type: Option<&str>,
    time_budget: Option<i64>,
    restrictions: &[Restriction],
) -> Vec<&'a Recipe> {
    let categories = normalize_type(user_type);

    let mut matches: Vec<&Recipe> = book
        .iter_categories(&categories)
        .filter(|recipe| {
            let minutes = recipe.minutes();
            match time_budget {
                Some(budget) => minutes != 0 && minutes <= budget,
                None => true,
            }
        })
        .filter(|recipe| restrictions::permits(recipe, restrictions))
        .collect();
    matches.sort_by_key(|recipe| rank_key(recipe.minutes()));

    if matches.len() >= MAX_RECOMMENDATIONS {
        matches.truncate(MAX_RECOMMENDATIONS);
        return matches;
    }

    tracing::debug!(
        strict_matches = matches.len(),
        categories = ?categories,
        "Backfilling recommendations"
    );

    let mut selected = matches;
    let mut seen: HashSet<(Option<&RecipeId>, &str)> =
        selected.iter().map(|&recipe| recipe.identity()).collect();

    let defaults: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    backfill(&mut selected, &mut seen, ranked(book, &categories));
    if selected.len() < MAX_RECOMMENDATIONS {
        backfill(&mut selected, &mut seen, ranked(book, &defaults));
    }

    selected.truncate(MAX_RECOMMENDATIONS);
    selected
}

fn backfill<'a>(
    selected: &mut Vec<&'a Recipe>,
    seen: &mut HashSet<(Option<&'a RecipeId>, &'a str)>,
    pool: Vec<&'a Recipe>,
) {
    for recipe in pool {
        if selected.len() >= MAX_RECOMMENDATIONS {
            break;
        }
        if seen.insert(recipe.identity()) {
            selected.push(recipe);
        }
    }
}
