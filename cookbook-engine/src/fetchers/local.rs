//! Authoritative store fetcher

use crate::auth::AuthProvider;
use crate::error::{CookbookError, CookbookResult};
use crate::store::{AuthoritativeStore, RecipePredicate};
use crate::types::Recipe;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads the current user's recipes from the authoritative store
#[derive(Clone)]
pub struct LocalStoreFetcher {
    store: Arc<dyn AuthoritativeStore>,
    auth: Arc<dyn AuthProvider>,
}

impl LocalStoreFetcher {
    pub fn new(store: Arc<dyn AuthoritativeStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    /// All of the current user's recipes
    pub async fn by_owner(&self) -> CookbookResult<Vec<Recipe>> {
        self.fetch(RecipePredicate::Owner).await
    }

    /// Recipes whose title falls in `[prefix, prefix + U+F8FF]`
    ///
    /// The prefix is lowercased before the range scan, so mixed-case titles
    /// only match when stored in lowercase. This is a prefix scan, not a
    /// substring search.
    pub async fn by_title_prefix(&self, prefix: &str) -> CookbookResult<Vec<Recipe>> {
        self.fetch(RecipePredicate::TitlePrefix(prefix.trim().to_lowercase()))
            .await
    }

    pub async fn by_category(&self, category: &str) -> CookbookResult<Vec<Recipe>> {
        self.fetch(RecipePredicate::Category(category.to_string()))
            .await
    }

    /// Recipes whose ingredient list contains an ingredient named `name`
    pub async fn by_ingredient(&self, name: &str) -> CookbookResult<Vec<Recipe>> {
        self.fetch(RecipePredicate::Ingredient(name.to_string()))
            .await
    }

    pub async fn favorites(&self) -> CookbookResult<Vec<Recipe>> {
        self.fetch(RecipePredicate::Favorites).await
    }

    async fn fetch(&self, predicate: RecipePredicate) -> CookbookResult<Vec<Recipe>> {
        let owner_id = self
            .auth
            .current_user_id()
            .ok_or(CookbookError::Unauthenticated)?;

        match self.store.query(&owner_id, &predicate).await {
            Ok(recipes) => {
                debug!(
                    owner_id = %owner_id,
                    ?predicate,
                    count = recipes.len(),
                    "Local fetch complete"
                );
                Ok(recipes)
            }
            Err(e) => {
                warn!(owner_id = %owner_id, ?predicate, error = %e, "Local fetch failed");
                Err(e.into())
            }
        }
    }
}
