//! External recipe catalog
//!
//! The catalog is read-only and answers exactly one query dimension per
//! request: free text, category, area, or ingredient. Combined filters are
//! not supported upstream.
//!
//! # Modules
//! - **record** - raw flat meal shape (20 positional ingredient slots)
//! - **mealdb** - HTTP client for TheMealDB JSON API
//! - **options** - concurrent loading of filter picker options

pub mod mealdb;
pub mod options;
pub mod record;

pub use mealdb::MealDbClient;
pub use record::{CatalogRecord, INGREDIENT_SLOTS};

use crate::error::CatalogError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Catalog category entry (`categories.php`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCategory {
    #[serde(rename = "idCategory")]
    pub id: String,
    #[serde(rename = "strCategory")]
    pub name: String,
    #[serde(rename = "strCategoryThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strCategoryDescription", default)]
    pub description: Option<String>,
}

/// Read-only catalog query API
///
/// Each method maps to exactly one upstream endpoint. Implementations return
/// an empty list when the upstream answers successfully with no records.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Client name for provenance in logs
    fn name(&self) -> &'static str;

    async fn search_by_text(&self, query: &str) -> Result<Vec<CatalogRecord>, CatalogError>;

    async fn filter_by_category(&self, category: &str) -> Result<Vec<CatalogRecord>, CatalogError>;

    async fn filter_by_area(&self, area: &str) -> Result<Vec<CatalogRecord>, CatalogError>;

    async fn filter_by_ingredient(&self, ingredient: &str)
        -> Result<Vec<CatalogRecord>, CatalogError>;

    /// Full record for one catalog id
    async fn lookup_by_id(&self, id: &str) -> Result<Vec<CatalogRecord>, CatalogError>;

    async fn random(&self) -> Result<Vec<CatalogRecord>, CatalogError>;

    async fn list_categories(&self) -> Result<Vec<CatalogCategory>, CatalogError>;

    async fn list_areas(&self) -> Result<Vec<String>, CatalogError>;

    async fn list_ingredients(&self) -> Result<Vec<String>, CatalogError>;
}
