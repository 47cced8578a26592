use serde_json::Value;

use super::RecipeId;

/// A user's pointer at a recipe in a shopping-list request
///
/// Requests mix objects (`{"category": "cakes", "id": 3}`) and bare names
/// (`"薑餅人"`); both are normalized here so resolution never sees raw JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeSelector {
    /// Lookup by id and/or name, optionally narrowed to a category
    Reference {
        category: Option<String>,
        id: Option<RecipeId>,
        name: Option<String>,
    },
    /// Lookup by exact recipe name
    Name(String),
}

impl From<&Value> for RecipeSelector {
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(fields) => RecipeSelector::Reference {
                category: fields
                    .get("category")
                    .and_then(Value::as_str)
                    .map(|c| c.trim().to_lowercase())
                    .filter(|c| !c.is_empty()),
                id: fields.get("id").and_then(RecipeId::from_value),
                name: fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
            },
            Value::String(name) => RecipeSelector::Name(name.trim().to_string()),
            Value::Number(n) => RecipeSelector::Name(n.to_string()),
            Value::Bool(b) => RecipeSelector::Name(b.to_string()),
            Value::Null | Value::Array(_) => RecipeSelector::Name(String::new()),
        }
    }
}

impl RecipeSelector {
    /// Category the lookup is narrowed to, if any
    pub fn category(&self) -> Option<&str> {
        match self {
            RecipeSelector::Reference { category, .. } => category.as_deref(),
            RecipeSelector::Name(_) => None,
        }
    }

    pub fn id(&self) -> Option<&RecipeId> {
        match self {
            RecipeSelector::Reference { id, .. } => id.as_ref(),
            RecipeSelector::Name(_) => None,
        }
    }

    /// Non-empty name to match exactly
    pub fn name(&self) -> Option<&str> {
        match self {
            RecipeSelector::Reference { name, .. } => name.as_deref(),
            RecipeSelector::Name(name) if !name.is_empty() => Some(name.as_str()),
            RecipeSelector::Name(_) => None,
        }
    }
}
