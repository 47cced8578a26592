use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display};

mod recipe;
mod restriction;
mod selector;

pub use recipe::{coerce_minutes, Recipe, RecipeId, TimeRange, TotalTime};
pub use restriction::Restriction;
pub use selector::RecipeSelector;

/// Dessert category a recipe is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cookies,
    Cakes,
    Breads,
}

impl Category {
    /// Default categories, in the order they are scanned
    pub const ALL: [Category; 3] = [Category::Cookies, Category::Cakes, Category::Breads];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cookies => "cookies",
            Category::Cakes => "cakes",
            Category::Breads => "breads",
        }
    }

    /// Looks up a known category by its plural key
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == key)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// The recipe dataset: recipes partitioned under category keys
///
/// Keys are kept as written so that unrecognized categories load without
/// error; they are simply never matched by the default scans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeBook {
    #[serde(default)]
    pub categories: HashMap<String, Vec<Recipe>>,
}

impl RecipeBook {
    /// Recipes filed under a category key (empty if the key is absent)
    pub fn recipes_in(&self, key: &str) -> &[Recipe] {
        self.categories.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates the given category keys in order, then each list in order
    pub fn iter_categories<'a, 'k, K>(
        &'a self,
        keys: &'k [K],
    ) -> impl Iterator<Item = &'a Recipe> + 'k
    where
        K: AsRef<str> + 'k,
        'a: 'k,
    {
        keys.iter().flat_map(move |key| self.recipes_in(key.as_ref()).iter())
    }

    /// Number of recipes across the default categories
    pub fn default_recipe_count(&self) -> usize {
        Category::ALL
            .iter()
            .map(|c| self.recipes_in(c.as_str()).len())
            .sum()
    }
}

// ============================================================================
// Shopping list
// ============================================================================

/// A resolved recipe as reported in a shopping list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipeSummary {
    pub category: Category,
    pub id: Option<RecipeId>,
    pub name: String,
    pub ingredients: Vec<String>,
}

impl RecipeSummary {
    pub fn new(category: Category, recipe: &Recipe) -> Self {
        Self {
            category,
            id: recipe.id.clone(),
            name: recipe.name.clone(),
            ingredients: recipe.ingredients.clone(),
        }
    }
}

/// Aggregated ingredients for a set of selected recipes
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShoppingList {
    /// Number of recipes resolved, including backfilled ones
    pub count: usize,
    /// The first two resolved recipes
    pub recipes: Vec<RecipeSummary>,
    /// Sorted, duplicate-free ingredients of every resolved recipe
    pub shopping_list: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_keys() {
        assert_eq!(Category::from_key("cakes"), Some(Category::Cakes));
        assert_eq!(Category::from_key("pies"), None);
        assert_eq!(serde_json::to_string(&Category::Breads).unwrap(), "\"breads\"");
    }

    #[test]
    fn test_book_tolerates_unknown_categories() {
        let book: RecipeBook = serde_json::from_value(json!({
            "categories": {
                "cookies": [{ "id": 1, "name": "奶油酥餅" }],
                "pies": [{ "id": 2, "name": "蘋果派" }]
            }
        }))
        .unwrap();
        assert_eq!(book.recipes_in("pies").len(), 1);
        assert!(book.recipes_in("breads").is_empty());
        assert_eq!(book.default_recipe_count(), 1);
    }

    #[test]
    fn test_iter_categories_keeps_order() {
        let book: RecipeBook = serde_json::from_value(json!({
            "categories": {
                "cakes": [{ "name": "b" }, { "name": "c" }],
                "cookies": [{ "name": "a" }]
            }
        }))
        .unwrap();
        let names: Vec<&str> = book
            .iter_categories(&["cookies", "cakes"])
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
