//! Favorite reconciliation tests
//!
//! Promotion of catalog recipes, rollback on failed writes, and the
//! best-effort delete when a catalog favorite is removed.

mod helpers;

use cookbook_common::events::{CookbookEvent, EventBus};
use cookbook_engine::auth::StaticAuth;
use cookbook_engine::catalog::CatalogRecord;
use cookbook_engine::error::CookbookError;
use cookbook_engine::normalizer::IngredientNormalizer;
use cookbook_engine::reconciler::{FavoriteOutcome, FavoriteReconciler};
use cookbook_engine::store::{AuthoritativeStore, RecipePredicate, SqliteRecipeStore};
use cookbook_engine::types::Recipe;
use helpers::{memory_store, FlakyStore, TEST_USER};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn catalog_recipe() -> Recipe {
    IngredientNormalizer::to_recipe(
        CatalogRecord::new("52772", "Teriyaki Chicken Casserole")
            .with_category("Chicken")
            .with_slot(1, Some("soy sauce"), Some("3/4 cup")),
    )
}

fn reconciler(store: Arc<dyn AuthoritativeStore>, events: EventBus) -> FavoriteReconciler {
    FavoriteReconciler::new(store, Arc::new(StaticAuth::signed_in(TEST_USER)), events)
}

async fn flaky() -> Arc<FlakyStore<SqliteRecipeStore>> {
    Arc::new(FlakyStore::new(memory_store().await))
}

#[tokio::test]
async fn test_favorite_catalog_recipe_promotes_it() {
    let store = Arc::new(memory_store().await);
    let mut recipe = catalog_recipe();

    let outcome = reconciler(store.clone(), EventBus::default())
        .set_favorite(&mut recipe, true)
        .await
        .unwrap();

    let id = recipe.id.clone().expect("promoted recipe has an id");
    assert!(!id.is_empty());
    assert_eq!(outcome, FavoriteOutcome::Promoted { id: id.clone() });
    assert!(recipe.favorite);
    assert_eq!(recipe.owner_id.as_deref(), Some(TEST_USER));
    assert!(recipe.imported_from_catalog);

    let stored = store.get(&id).await.unwrap().expect("row written");
    assert!(stored.favorite);
    assert!(stored.imported_from_catalog);
    assert_eq!(stored.catalog_id.as_deref(), Some("52772"));
    assert_eq!(stored.owner_id.as_deref(), Some(TEST_USER));
    assert_eq!(stored.ingredients, recipe.ingredients);
}

#[tokio::test]
async fn test_failed_promotion_rolls_back() {
    let store = flaky().await;
    store.fail_add.store(true, Ordering::SeqCst);
    let events = EventBus::new(16);
    let mut rx = events.subscribe();
    let mut recipe = catalog_recipe();

    let err = reconciler(store.clone(), events)
        .set_favorite(&mut recipe, true)
        .await
        .unwrap_err();

    assert!(matches!(err, CookbookError::PromotionFailed(_)));
    assert!(!recipe.favorite);
    assert!(recipe.owner_id.is_none());
    assert!(recipe.id.is_none());

    // Optimistic change first, then the rollback
    assert!(matches!(
        rx.recv().await.unwrap(),
        CookbookEvent::FavoriteChanged { favorite: true, .. }
    ));
    match rx.recv().await.unwrap() {
        CookbookEvent::FavoriteRolledBack { recipe_key, favorite, .. } => {
            assert_eq!(recipe_key, "52772");
            assert!(!favorite);
        }
        other => panic!("unexpected event {:?}", other),
    }

    let rows = store.inner.query(TEST_USER, &RecipePredicate::Owner).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_promotion_without_user_fails() {
    let store = Arc::new(memory_store().await);
    let reconciler =
        FavoriteReconciler::new(store, Arc::new(StaticAuth::signed_out()), EventBus::default());
    let mut recipe = catalog_recipe();

    let err = reconciler.set_favorite(&mut recipe, true).await.unwrap_err();

    assert!(matches!(err, CookbookError::PromotionFailed(ref m) if m.contains("authenticated")));
    assert!(!recipe.favorite);
    assert!(recipe.owner_id.is_none());
}

#[tokio::test]
async fn test_favorite_own_recipe_updates_flag() {
    let store = Arc::new(memory_store().await);
    let mut recipe = Recipe::authored(TEST_USER, "Soup", "Starter", vec![], "Boil.");
    recipe.id = Some(store.add(&recipe).await.unwrap());

    let outcome = reconciler(store.clone(), EventBus::default())
        .toggle_favorite(&mut recipe)
        .await
        .unwrap();

    assert_eq!(outcome, FavoriteOutcome::Updated);
    assert!(recipe.favorite);
    let favorites = store.query(TEST_USER, &RecipePredicate::Favorites).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].title, "Soup");
}

#[tokio::test]
async fn test_failed_update_rolls_back_flag() {
    let store = flaky().await;
    let mut recipe = Recipe::authored(TEST_USER, "Soup", "Starter", vec![], "");
    recipe.id = Some(store.add(&recipe).await.unwrap());
    store.fail_update.store(true, Ordering::SeqCst);

    let err = reconciler(store, EventBus::default())
        .set_favorite(&mut recipe, true)
        .await
        .unwrap_err();

    assert!(matches!(err, CookbookError::StoreUnavailable(_)));
    assert!(!recipe.favorite);
}

#[tokio::test]
async fn test_cannot_favorite_another_users_recipe() {
    let store = Arc::new(memory_store().await);
    let mut recipe = Recipe::authored("user-2", "Stew", "Beef", vec![], "Simmer.");
    let id = store.add(&recipe).await.unwrap();
    recipe.id = Some(id.clone());

    let result = reconciler(store.clone(), EventBus::default())
        .set_favorite(&mut recipe, true)
        .await;

    assert!(result.is_err());
    assert!(!recipe.favorite);
    assert!(!store.get(&id).await.unwrap().expect("row kept").favorite);
}

#[tokio::test]
async fn test_update_without_user_rolls_back() {
    let store = Arc::new(memory_store().await);
    let mut recipe = Recipe::authored(TEST_USER, "Soup", "Starter", vec![], "Boil.");
    recipe.id = Some(store.add(&recipe).await.unwrap());
    let reconciler =
        FavoriteReconciler::new(store, Arc::new(StaticAuth::signed_out()), EventBus::default());

    let err = reconciler.set_favorite(&mut recipe, true).await.unwrap_err();

    assert!(matches!(err, CookbookError::Unauthenticated));
    assert!(!recipe.favorite);
}

#[tokio::test]
async fn test_update_without_id_is_missing_recipe_id() {
    let store = Arc::new(memory_store().await);
    let mut recipe = Recipe::authored(TEST_USER, "Draft", "Other", vec![], "");

    let err = reconciler(store, EventBus::default())
        .set_favorite(&mut recipe, true)
        .await
        .unwrap_err();

    assert!(matches!(err, CookbookError::MissingRecipeId));
    assert!(!recipe.favorite);
}

#[tokio::test]
async fn test_unfavorite_promoted_recipe_deletes_row() {
    let store = Arc::new(memory_store().await);
    let events = EventBus::new(16);
    let reconciler = reconciler(store.clone(), events.clone());
    let mut recipe = catalog_recipe();
    reconciler.set_favorite(&mut recipe, true).await.unwrap();
    let id = recipe.id.clone().unwrap();

    let mut rx = events.subscribe();
    let outcome = reconciler.set_favorite(&mut recipe, false).await.unwrap();

    assert_eq!(outcome, FavoriteOutcome::Removed);
    assert!(!recipe.favorite);
    assert!(recipe.id.is_none());
    assert!(recipe.owner_id.is_none());
    assert!(recipe.is_catalog_only());
    assert!(store.get(&id).await.unwrap().is_none());

    assert!(matches!(
        rx.recv().await.unwrap(),
        CookbookEvent::FavoriteChanged { favorite: false, .. }
    ));
    assert!(matches!(
        rx.recv().await.unwrap(),
        CookbookEvent::PromotedRecipeRemoved { ref recipe_id, .. } if *recipe_id == id
    ));

    // Favoriting again promotes a fresh row
    let outcome = reconciler.set_favorite(&mut recipe, true).await.unwrap();
    assert!(matches!(outcome, FavoriteOutcome::Promoted { id: ref new_id } if *new_id != id));
}

#[tokio::test]
async fn test_failed_delete_keeps_unfavorite() {
    let store = flaky().await;
    let reconciler = reconciler(store.clone(), EventBus::default());
    let mut recipe = catalog_recipe();
    reconciler.set_favorite(&mut recipe, true).await.unwrap();
    let id = recipe.id.clone().unwrap();
    store.fail_delete.store(true, Ordering::SeqCst);

    let outcome = reconciler.set_favorite(&mut recipe, false).await.unwrap();

    assert!(matches!(outcome, FavoriteOutcome::RemovalFailed { .. }));
    assert!(!recipe.favorite);
    assert_eq!(recipe.id.as_deref(), Some(id.as_str()));
    let row = store.inner.get(&id).await.unwrap().expect("row kept");
    assert!(!row.favorite);
}

#[tokio::test]
async fn test_unfavorite_own_recipe_keeps_row() {
    let store = Arc::new(memory_store().await);
    let mut recipe = Recipe::authored(TEST_USER, "Soup", "Starter", vec![], "");
    recipe.favorite = true;
    let id = store.add(&recipe).await.unwrap();
    recipe.id = Some(id.clone());

    let outcome = reconciler(store.clone(), EventBus::default())
        .set_favorite(&mut recipe, false)
        .await
        .unwrap();

    assert_eq!(outcome, FavoriteOutcome::Updated);
    assert!(store.get(&id).await.unwrap().is_some());
}
