//! SQLite-backed authoritative store

use super::{AuthoritativeStore, RecipePredicate};
use crate::db::recipes;
use crate::error::StoreError;
use crate::types::Recipe;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// `AuthoritativeStore` over the `recipes` table
#[derive(Clone)]
pub struct SqliteRecipeStore {
    pool: SqlitePool,
}

impl SqliteRecipeStore {
    /// Wrap a pool whose tables are already initialized
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Load one recipe by id
    pub async fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        recipes::load_recipe(&self.pool, id).await
    }
}

#[async_trait]
impl AuthoritativeStore for SqliteRecipeStore {
    async fn query(
        &self,
        owner_id: &str,
        predicate: &RecipePredicate,
    ) -> Result<Vec<Recipe>, StoreError> {
        let rows = recipes::query_recipes(&self.pool, owner_id, predicate).await?;
        debug!(owner_id, ?predicate, count = rows.len(), "Store query complete");
        Ok(rows)
    }

    async fn add(&self, recipe: &Recipe) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        recipes::save_recipe(&self.pool, &id, recipe).await?;
        debug!(recipe_id = %id, title = %recipe.title, "Recipe added");
        Ok(id)
    }

    async fn set(&self, id: &str, recipe: &Recipe) -> Result<(), StoreError> {
        recipes::save_recipe(&self.pool, id, recipe).await
    }

    async fn update_favorite(
        &self,
        owner_id: &str,
        id: &str,
        favorite: bool,
    ) -> Result<(), StoreError> {
        recipes::update_favorite(&self.pool, owner_id, id, favorite).await
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        recipes::delete_recipe(&self.pool, owner_id, id).await
    }
}
