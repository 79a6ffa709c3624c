//! User-authored recipes

use crate::auth::AuthProvider;
use crate::error::{CookbookError, CookbookResult};
use crate::store::AuthoritativeStore;
use crate::types::{Ingredient, Recipe};
use cookbook_common::Error as CommonError;
use std::sync::Arc;
use tracing::info;

/// Fields the user fills in when creating a recipe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub category: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub image_url: Option<String>,
}

/// Creates and deletes the current user's own recipes
pub struct RecipeAuthor {
    store: Arc<dyn AuthoritativeStore>,
    auth: Arc<dyn AuthProvider>,
}

impl RecipeAuthor {
    pub fn new(store: Arc<dyn AuthoritativeStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    /// Persist a new recipe owned by the current user
    ///
    /// Title, instructions and at least one named ingredient are required.
    /// Returns the stored recipe with its generated id.
    pub async fn create_recipe(&self, draft: RecipeDraft) -> CookbookResult<Recipe> {
        let owner_id = self
            .auth
            .current_user_id()
            .ok_or(CookbookError::Unauthenticated)?;

        if draft.title.trim().is_empty() {
            return Err(invalid("Recipe title is required"));
        }
        if draft.ingredients.is_empty() {
            return Err(invalid("At least one ingredient is required"));
        }
        if draft.ingredients.iter().any(|i| i.name.trim().is_empty()) {
            return Err(invalid("Ingredient names must not be blank"));
        }
        if draft.instructions.trim().is_empty() {
            return Err(invalid("Recipe instructions are required"));
        }

        let mut recipe = Recipe::authored(
            owner_id,
            draft.title.trim(),
            draft.category.trim(),
            draft.ingredients,
            draft.instructions,
        );
        recipe.image_url = draft.image_url;

        let id = self.store.add(&recipe).await?;
        info!(recipe_id = %id, title = %recipe.title, "Recipe created");
        recipe.id = Some(id);
        Ok(recipe)
    }

    /// Delete one of the current user's recipes; other users' rows are untouched
    pub async fn delete_recipe(&self, id: &str) -> CookbookResult<()> {
        let owner_id = self
            .auth
            .current_user_id()
            .ok_or(CookbookError::Unauthenticated)?;
        self.store.delete(&owner_id, id).await?;
        info!(recipe_id = %id, "Recipe deleted");
        Ok(())
    }
}

fn invalid(message: &str) -> CookbookError {
    CommonError::InvalidInput(message.to_string()).into()
}
