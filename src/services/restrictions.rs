use crate::models::{Recipe, Restriction};

/// Parses user-supplied restriction names, dropping blanks and unknown names
pub fn parse_restrictions<S: AsRef<str>>(raw: &[S]) -> Vec<Restriction> {
    raw.iter()
        .map(|r| r.as_ref().trim())
        .filter(|r| !r.is_empty())
        .filter_map(|r| match r.parse::<Restriction>() {
            Ok(restriction) => Some(restriction),
            Err(e) => {
                tracing::debug!(restriction = %r, error = %e, "Ignoring restriction");
                None
            }
        })
        .collect()
}

/// True if any restriction keyword appears in the ingredient text
///
/// Plain substring containment: a keyword embedded in an unrelated word
/// still counts.
pub fn violates(ingredients_text: &str, restrictions: &[Restriction]) -> bool {
    restrictions.iter().any(|restriction| {
        restriction
            .keywords()
            .iter()
            .any(|keyword| ingredients_text.contains(&keyword.to_lowercase()))
    })
}

/// Whether a recipe is acceptable under every restriction
pub fn permits(recipe: &Recipe, restrictions: &[Restriction]) -> bool {
    restrictions.is_empty() || !violates(&recipe.ingredients_text(), restrictions)
}
