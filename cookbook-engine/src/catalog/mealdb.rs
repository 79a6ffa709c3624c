//! TheMealDB client
//!
//! Queries the public TheMealDB JSON API. Every endpoint wraps its payload
//! in an object whose list field is `null` when nothing matched.
//!
//! # API Reference
//! - Search: `search.php?s={text}`
//! - Filter: `filter.php?c={category}` / `?a={area}` / `?i={ingredient}`
//! - Lookup: `lookup.php?i={id}`
//! - Random: `random.php`
//! - Lists: `categories.php`, `list.php?a=list`, `list.php?i=list`

use super::{CatalogCategory, CatalogClient, CatalogRecord};
use crate::error::CatalogError;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Public TheMealDB API base URL (free test key "1")
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Default timeout for catalog requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("cookbook-engine/", env!("CARGO_PKG_VERSION"));

/// HTTP catalog client for TheMealDB
pub struct MealDbClient {
    http_client: Client,
    base_url: String,
}

impl MealDbClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let http_client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, ?query, "Catalog request");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("Catalog request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CatalogError::Api(response.status().as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse catalog response: {}", e)))
    }

    async fn get_meals(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let body: MealsResponse = self.get_json(endpoint, query).await?;
        body.into_records()
    }
}

#[async_trait]
impl CatalogClient for MealDbClient {
    fn name(&self) -> &'static str {
        "TheMealDB"
    }

    async fn search_by_text(&self, query: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.get_meals("search.php", &[("s", query)]).await
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.get_meals("filter.php", &[("c", category)]).await
    }

    async fn filter_by_area(&self, area: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.get_meals("filter.php", &[("a", area)]).await
    }

    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.get_meals("filter.php", &[("i", ingredient)]).await
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.get_meals("lookup.php", &[("i", id)]).await
    }

    async fn random(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.get_meals("random.php", &[]).await
    }

    async fn list_categories(&self) -> Result<Vec<CatalogCategory>, CatalogError> {
        let body: CategoriesResponse = self.get_json("categories.php", &[]).await?;
        Ok(body.categories.unwrap_or_default())
    }

    async fn list_areas(&self) -> Result<Vec<String>, CatalogError> {
        let body: ListResponse<AreaEntry> = self.get_json("list.php", &[("a", "list")]).await?;
        Ok(body
            .meals
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| entry.area)
            .collect())
    }

    async fn list_ingredients(&self) -> Result<Vec<String>, CatalogError> {
        let body: ListResponse<IngredientEntry> =
            self.get_json("list.php", &[("i", "list")]).await?;
        Ok(body
            .meals
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| entry.ingredient)
            .collect())
    }
}

// ============================================================================
// TheMealDB Response Types
// ============================================================================

/// `{"meals": [...]}`, `{"meals": null}` when empty
///
/// Some endpoints answer a bad id with a string instead of a list; anything
/// that is not an array is treated as no matches.
#[derive(Debug, Deserialize)]
struct MealsResponse {
    meals: Option<serde_json::Value>,
}

impl MealsResponse {
    fn into_records(self) -> Result<Vec<CatalogRecord>, CatalogError> {
        match self.meals {
            Some(value @ serde_json::Value::Array(_)) => serde_json::from_value(value)
                .map_err(|e| CatalogError::Parse(format!("Malformed meal record: {}", e))),
            _ => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Option<Vec<CatalogCategory>>,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    meals: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct AreaEntry {
    #[serde(rename = "strArea")]
    area: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IngredientEntry {
    #[serde(rename = "strIngredient")]
    ingredient: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
