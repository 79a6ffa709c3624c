//! Authoritative recipe store
//!
//! The store is consumed as an abstract predicate-query service. Every read
//! is scoped to one owner. Writes address a single owned document by id and are
//! not wrapped in cross-document transactions (concurrent writes to one
//! recipe are last-write-wins).

pub mod sqlite;

pub use crate::db::recipes::RecipePredicate;
pub use sqlite::SqliteRecipeStore;

use crate::error::StoreError;
use crate::types::Recipe;
use async_trait::async_trait;

/// Durable, user-scoped, writable recipe store
#[async_trait]
pub trait AuthoritativeStore: Send + Sync {
    /// Owner's recipes matching `predicate`, each with its store id set
    async fn query(
        &self,
        owner_id: &str,
        predicate: &RecipePredicate,
    ) -> Result<Vec<Recipe>, StoreError>;

    /// Insert a new row and return its generated id
    async fn add(&self, recipe: &Recipe) -> Result<String, StoreError>;

    /// Write the full recipe under `id`
    async fn set(&self, id: &str, recipe: &Recipe) -> Result<(), StoreError>;

    /// Update the single `favorite` field of `owner_id`'s row `id`
    async fn update_favorite(
        &self,
        owner_id: &str,
        id: &str,
        favorite: bool,
    ) -> Result<(), StoreError>;

    /// Delete `owner_id`'s row `id`; a missing or foreign row is left alone
    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError>;
}
