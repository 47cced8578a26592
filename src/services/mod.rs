pub mod greeting_card;
pub mod images;
pub mod providers;
pub mod reasons;
pub mod recipe_store;
pub mod recommendations;
pub mod restrictions;
pub mod shopping_list;

pub use greeting_card::{CardGenerator, CardMessage, Tone};
pub use reasons::{ReasonGenerator, RequestContext};
pub use recipe_store::RecipeStore;
pub use recommendations::filter_recipes;
pub use shopping_list::build_shopping_list;
