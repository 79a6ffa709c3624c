//! Test Helper Utilities
//!
//! Fakes for the engine's collaborators: a scriptable catalog, a store
//! wrapper that can be told to fail, and in-memory SQLite setup.

#![allow(dead_code)]

pub mod catalog;
pub mod store;

pub use catalog::{numbered_records, ScriptedCatalog};
pub use store::{memory_store, FlakyStore};

use cookbook_common::events::EventBus;
use cookbook_engine::auth::StaticAuth;
use cookbook_engine::catalog::CatalogClient;
use cookbook_engine::config::EngineSettings;
use cookbook_engine::store::AuthoritativeStore;
use cookbook_engine::CookbookEngine;
use std::sync::Arc;

pub const TEST_USER: &str = "user-1";

/// Engine wired to the given fakes with default settings and `TEST_USER` signed in
pub fn engine_with(
    store: Arc<dyn AuthoritativeStore>,
    catalog: Arc<dyn CatalogClient>,
) -> CookbookEngine {
    CookbookEngine::new(
        store,
        catalog,
        Arc::new(StaticAuth::signed_in(TEST_USER)),
        EventBus::new(64),
        &EngineSettings::default(),
    )
}
