//! Favorite and ownership reconciliation
//!
//! Favorite changes are applied to the caller's recipe immediately and
//! announced on the event bus, then written to the store. A failed write
//! restores the previous in-memory state and announces the rollback.
//!
//! # Paths
//! - **Promotion**: favoriting a catalog-only recipe writes it into the store
//!   as a new row owned by the current user
//! - **Update**: any other change updates the row's favorite field
//! - **Removal**: unfavoriting a catalog-imported recipe then deletes its row
//!   (best-effort; a failed delete keeps the flag change)

use crate::auth::AuthProvider;
use crate::error::{CookbookError, CookbookResult};
use crate::store::AuthoritativeStore;
use crate::types::Recipe;
use cookbook_common::events::{CookbookEvent, EventBus};
use cookbook_common::time;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a successful favorite change did in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteOutcome {
    /// Catalog recipe written as a new row with this id
    Promoted { id: String },
    /// Favorite field of an existing row updated
    Updated,
    /// Unfavorited catalog recipe's row deleted
    Removed,
    /// Flag updated but the follow-up delete failed
    RemovalFailed { reason: String },
}

pub struct FavoriteReconciler {
    store: Arc<dyn AuthoritativeStore>,
    auth: Arc<dyn AuthProvider>,
    events: EventBus,
}

impl FavoriteReconciler {
    pub fn new(
        store: Arc<dyn AuthoritativeStore>,
        auth: Arc<dyn AuthProvider>,
        events: EventBus,
    ) -> Self {
        Self { store, auth, events }
    }

    /// Flip the recipe's current favorite flag
    pub async fn toggle_favorite(&self, recipe: &mut Recipe) -> CookbookResult<FavoriteOutcome> {
        let target = !recipe.favorite;
        self.set_favorite(recipe, target).await
    }

    /// Set the favorite flag, promoting catalog-only recipes as needed
    ///
    /// On error the recipe's favorite and owner fields are exactly what they
    /// were before the call.
    pub async fn set_favorite(
        &self,
        recipe: &mut Recipe,
        favorite: bool,
    ) -> CookbookResult<FavoriteOutcome> {
        let previous_favorite = recipe.favorite;
        let previous_owner = recipe.owner_id.clone();

        recipe.favorite = favorite;
        self.events.emit_lossy(CookbookEvent::FavoriteChanged {
            recipe_key: recipe.key(),
            favorite,
            timestamp: time::now(),
        });

        if favorite && recipe.is_catalog_only() {
            return match self.promote(recipe).await {
                Ok(id) => Ok(FavoriteOutcome::Promoted { id }),
                Err(e) => {
                    recipe.owner_id = previous_owner;
                    self.rollback(recipe, previous_favorite, &e);
                    Err(CookbookError::PromotionFailed(e.to_string()))
                }
            };
        }

        let Some(id) = recipe.id.clone().filter(|id| !id.is_empty()) else {
            let err = CookbookError::MissingRecipeId;
            self.rollback(recipe, previous_favorite, &err);
            return Err(err);
        };

        let Some(owner_id) = self.auth.current_user_id() else {
            let err = CookbookError::Unauthenticated;
            self.rollback(recipe, previous_favorite, &err);
            return Err(err);
        };

        if let Err(e) = self.store.update_favorite(&owner_id, &id, favorite).await {
            let err: CookbookError = e.into();
            self.rollback(recipe, previous_favorite, &err);
            return Err(err);
        }
        debug!(recipe_id = %id, favorite, "Favorite updated");

        if favorite || !recipe.imported_from_catalog {
            return Ok(FavoriteOutcome::Updated);
        }

        match self.store.delete(&owner_id, &id).await {
            Ok(()) => {
                info!(recipe_id = %id, "Removed unfavorited catalog recipe");
                recipe.id = None;
                recipe.owner_id = None;
                self.events.emit_lossy(CookbookEvent::PromotedRecipeRemoved {
                    recipe_id: id,
                    timestamp: time::now(),
                });
                Ok(FavoriteOutcome::Removed)
            }
            Err(e) => {
                warn!(recipe_id = %id, error = %e, "Delete after unfavorite failed, keeping row");
                Ok(FavoriteOutcome::RemovalFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Write a catalog-only recipe as a new owned row; sets `recipe.id`
    async fn promote(&self, recipe: &mut Recipe) -> CookbookResult<String> {
        let owner_id = self
            .auth
            .current_user_id()
            .ok_or(CookbookError::Unauthenticated)?;
        recipe.owner_id = Some(owner_id);

        let id = self.store.add(recipe).await?;
        recipe.id = Some(id.clone());

        info!(recipe_id = %id, catalog_id = ?recipe.catalog_id, "Promoted catalog recipe");
        self.events.emit_lossy(CookbookEvent::RecipePromoted {
            catalog_id: recipe.catalog_id.clone(),
            recipe_id: id.clone(),
            timestamp: time::now(),
        });
        Ok(id)
    }

    fn rollback(&self, recipe: &mut Recipe, favorite: bool, cause: &CookbookError) {
        recipe.favorite = favorite;
        warn!(recipe_key = %recipe.key(), favorite, error = %cause, "Favorite change rolled back");
        self.events.emit_lossy(CookbookEvent::FavoriteRolledBack {
            recipe_key: recipe.key(),
            favorite,
            reason: cause.to_string(),
            timestamp: time::now(),
        });
    }
}
