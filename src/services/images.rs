use crate::models::Recipe;

/// Route prefix the static file server is mounted under
pub const STATIC_PREFIX: &str = "/static";

/// Builds the public URL of a recipe's image
///
/// Absolute URLs and paths already under `/static/` are used as given. Other
/// image paths are resolved under the static root; recipes without an image
/// point at `images/{id}.png`.
pub fn image_url(recipe: &Recipe, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');

    match recipe.image.as_deref().filter(|image| !image.is_empty()) {
        Some(image)
            if image.starts_with("http://")
                || image.starts_with("https://")
                || image.starts_with("/static/") =>
        {
            image.to_string()
        }
        Some(image) => format!("{}{}/{}", base, STATIC_PREFIX, image.trim_start_matches('/')),
        None => {
            let id = recipe
                .id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown".to_string());
            format!("{}{}/images/{}.png", base, STATIC_PREFIX, id)
        }
    }
}
