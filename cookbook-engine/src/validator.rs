//! Result hygiene filter
//!
//! Drops recipes whose title is missing or blank. Drops are silent: this is
//! data cleanup, not a failure path.

use crate::types::Recipe;
use tracing::debug;

pub struct RecipeValidator;

impl RecipeValidator {
    pub fn is_valid(recipe: &Recipe) -> bool {
        !recipe.title.trim().is_empty()
    }

    /// Order-preserving filter keeping only titled recipes
    pub fn filter(recipes: Vec<Recipe>) -> Vec<Recipe> {
        let before = recipes.len();
        let valid: Vec<Recipe> = recipes.into_iter().filter(Self::is_valid).collect();

        if valid.len() < before {
            debug!(dropped = before - valid.len(), "Dropped untitled recipes");
        }
        valid
    }
}
