use std::collections::{BTreeSet, HashSet};

use crate::models::{
    Category, Recipe, RecipeBook, RecipeId, RecipeSelector, RecipeSummary, ShoppingList,
};

/// Number of recipes a shopping list is topped up to
pub const MIN_RECIPES: usize = 2;

/// Finds the recipe a selector points at
///
/// A known category narrows the search; otherwise the default categories are
/// searched in order. The first recipe matching the id or the exact name
/// wins.
pub fn resolve<'a>(
    book: &'a RecipeBook,
    selector: &RecipeSelector,
) -> Option<(Category, &'a Recipe)> {
    let narrowed = selector.category().and_then(Category::from_key);
    let categories: &[Category] = match &narrowed {
        Some(category) => std::slice::from_ref(category),
        None => &Category::ALL,
    };

    let id = selector.id();
    let name = selector.name();

    categories.iter().find_map(|&category| {
        book.recipes_in(category.as_str())
            .iter()
            .find(|recipe| {
                let id_match = id.is_some() && recipe.id.as_ref() == id;
                let name_match = name.is_some_and(|n| recipe.name == n);
                id_match || name_match
            })
            .map(|recipe| (category, recipe))
    })
}

/// Accumulates resolved recipes and their ingredients
#[derive(Default)]
struct ListBuilder<'a> {
    resolved: Vec<(Category, &'a Recipe)>,
    included: HashSet<(Category, Option<&'a RecipeId>)>,
    ingredients: BTreeSet<String>,
}

impl<'a> ListBuilder<'a> {
    fn add(&mut self, category: Category, recipe: &'a Recipe) {
        self.included.insert((category, recipe.id.as_ref()));
        self.ingredients.extend(
            recipe
                .ingredients
                .iter()
                .map(|ingredient| ingredient.trim())
                .filter(|ingredient| !ingredient.is_empty())
                .map(str::to_string),
        );
        self.resolved.push((category, recipe));
    }

    fn contains(&self, category: Category, recipe: &Recipe) -> bool {
        self.included.contains(&(category, recipe.id.as_ref()))
    }

    fn finish(self) -> ShoppingList {
        ShoppingList {
            count: self.resolved.len(),
            recipes: self
                .resolved
                .iter()
                .take(MIN_RECIPES)
                .map(|(category, recipe)| RecipeSummary::new(*category, recipe))
                .collect(),
            shopping_list: self.ingredients.into_iter().collect(),
        }
    }
}

/// Builds a shopping list from user selections
///
/// Unresolvable selectors are skipped. With fewer than two resolved recipes
/// the list is topped up from the default categories, skipping any recipe
/// already included. Ingredients come from every resolved recipe, even past
/// the two reported in `recipes`.
pub fn build_shopping_list(book: &RecipeBook, selectors: &[RecipeSelector]) -> ShoppingList {
    let mut builder = ListBuilder::default();

    for selector in selectors {
        match resolve(book, selector) {
            Some((category, recipe)) => builder.add(category, recipe),
            None => tracing::debug!(selector = ?selector, "Selection did not match any recipe"),
        }
    }

    if builder.resolved.len() < MIN_RECIPES {
        let fallback = Category::ALL.iter().flat_map(|&category| {
            book.recipes_in(category.as_str())
                .iter()
                .map(move |recipe| (category, recipe))
        });

        for (category, recipe) in fallback {
            if builder.resolved.len() >= MIN_RECIPES {
                break;
            }
            if !builder.contains(category, recipe) {
                builder.add(category, recipe);
            }
        }
    }

    builder.finish()
}
