//! cookbook-engine library interface
//!
//! Retrieval and aggregation engine over two recipe sources: the user's
//! authoritative store and a read-only external catalog.
//!
//! # Modules
//! - **types** - canonical `Recipe`, `Ingredient`, `Filter`
//! - **catalog** - catalog client trait, TheMealDB client, filter options
//! - **db** / **store** - SQLite-backed authoritative store
//! - **normalizer** / **validator** - record conversion and result hygiene
//! - **fetchers** - per-source fetchers
//! - **aggregator** - concurrent two-source merge
//! - **reconciler** - optimistic favorites with rollback and promotion
//! - **router** - query/filter state and routing
//! - **authoring** - create/delete user recipes

pub mod aggregator;
pub mod auth;
pub mod authoring;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod fetchers;
pub mod normalizer;
pub mod reconciler;
pub mod router;
pub mod store;
pub mod types;
pub mod validator;

pub use crate::error::{CookbookError, CookbookResult};

use crate::aggregator::ResultAggregator;
use crate::auth::AuthProvider;
use crate::authoring::RecipeAuthor;
use crate::catalog::options::{load_filter_options, FilterOptions};
use crate::catalog::CatalogClient;
use crate::config::EngineSettings;
use crate::fetchers::{LocalStoreFetcher, RemoteCatalogFetcher};
use crate::reconciler::FavoriteReconciler;
use crate::router::QueryRouter;
use crate::store::AuthoritativeStore;
use cookbook_common::events::EventBus;
use std::sync::Arc;

/// Engine components wired to one set of collaborators
///
/// Collaborators are injected; nothing here is process-global.
pub struct CookbookEngine {
    pub local: LocalStoreFetcher,
    pub remote: RemoteCatalogFetcher,
    pub aggregator: ResultAggregator,
    pub reconciler: FavoriteReconciler,
    pub author: RecipeAuthor,
    catalog: Arc<dyn CatalogClient>,
    events: EventBus,
}

impl CookbookEngine {
    pub fn new(
        store: Arc<dyn AuthoritativeStore>,
        catalog: Arc<dyn CatalogClient>,
        auth: Arc<dyn AuthProvider>,
        events: EventBus,
        settings: &EngineSettings,
    ) -> Self {
        let local = LocalStoreFetcher::new(Arc::clone(&store), Arc::clone(&auth));
        let remote =
            RemoteCatalogFetcher::new(Arc::clone(&catalog)).with_limit(settings.result_limit);
        let aggregator = ResultAggregator::new(local.clone(), remote.clone(), events.clone())
            .with_deadline(settings.aggregation_deadline);
        let reconciler =
            FavoriteReconciler::new(Arc::clone(&store), Arc::clone(&auth), events.clone());
        let author = RecipeAuthor::new(store, auth);

        Self {
            local,
            remote,
            aggregator,
            reconciler,
            author,
            catalog,
            events,
        }
    }

    /// Fresh router with empty query and filter
    pub fn router(&self) -> QueryRouter {
        QueryRouter::new(self.local.clone(), self.aggregator.clone())
    }

    /// Categories, areas and ingredient names for a filter picker
    pub async fn filter_options(&self) -> FilterOptions {
        load_filter_options(Arc::clone(&self.catalog)).await
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}
