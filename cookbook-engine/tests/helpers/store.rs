//! Store fakes

use async_trait::async_trait;
use cookbook_engine::db;
use cookbook_engine::error::StoreError;
use cookbook_engine::store::{AuthoritativeStore, RecipePredicate, SqliteRecipeStore};
use cookbook_engine::types::Recipe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Fresh in-memory SQLite store
pub async fn memory_store() -> SqliteRecipeStore {
    let pool = db::init_memory_pool().await.expect("in-memory pool");
    SqliteRecipeStore::new(pool)
}

/// Wraps a real store; each operation can be switched to fail and queries
/// can be slowed down
pub struct FlakyStore<S> {
    pub inner: S,
    pub fail_queries: AtomicBool,
    pub fail_add: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub query_delay: Option<Duration>,
}

impl<S: AuthoritativeStore> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_queries: AtomicBool::new(false),
            fail_add: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            query_delay: None,
        }
    }

    /// Every query sleeps for `delay` before answering
    pub fn with_query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = Some(delay);
        self
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("{} offline", op)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl<S: AuthoritativeStore> AuthoritativeStore for FlakyStore<S> {
    async fn query(
        &self,
        owner_id: &str,
        predicate: &RecipePredicate,
    ) -> Result<Vec<Recipe>, StoreError> {
        if let Some(delay) = self.query_delay {
            tokio::time::sleep(delay).await;
        }
        Self::check(&self.fail_queries, "query")?;
        self.inner.query(owner_id, predicate).await
    }

    async fn add(&self, recipe: &Recipe) -> Result<String, StoreError> {
        Self::check(&self.fail_add, "add")?;
        self.inner.add(recipe).await
    }

    async fn set(&self, id: &str, recipe: &Recipe) -> Result<(), StoreError> {
        self.inner.set(id, recipe).await
    }

    async fn update_favorite(
        &self,
        owner_id: &str,
        id: &str,
        favorite: bool,
    ) -> Result<(), StoreError> {
        Self::check(&self.fail_update, "update")?;
        self.inner.update_favorite(owner_id, id, favorite).await
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        Self::check(&self.fail_delete, "delete")?;
        self.inner.delete(owner_id, id).await
    }
}
