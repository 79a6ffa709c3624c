//! External catalog fetcher
//!
//! Every call hits exactly one catalog endpoint. Recipe lists are truncated
//! to at most ten entries and converted through the ingredient normalizer.
//! A successful empty response is an empty list, never an error.

use crate::catalog::{CatalogCategory, CatalogClient, CatalogRecord};
use crate::error::{CatalogError, CookbookResult};
use crate::normalizer::IngredientNormalizer;
use crate::types::{Filter, FilterType, Recipe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Hard cap on catalog recipes returned per fetch
pub const MAX_RESULT_LIMIT: usize = 10;

pub const DEFAULT_RESULT_LIMIT: usize = MAX_RESULT_LIMIT;

#[derive(Clone)]
pub struct RemoteCatalogFetcher {
    client: Arc<dyn CatalogClient>,
    limit: usize,
}

impl RemoteCatalogFetcher {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self {
            client,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    /// Lower the result cap; values are clamped to `1..=MAX_RESULT_LIMIT`
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_RESULT_LIMIT);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn client(&self) -> Arc<dyn CatalogClient> {
        Arc::clone(&self.client)
    }

    pub async fn search_text(&self, query: &str) -> CookbookResult<Vec<Recipe>> {
        let result = self.client.search_by_text(query.trim()).await;
        self.convert("search", query, result)
    }

    pub async fn by_category(&self, category: &str) -> CookbookResult<Vec<Recipe>> {
        let result = self.client.filter_by_category(category).await;
        self.convert("category", category, result)
    }

    pub async fn by_area(&self, area: &str) -> CookbookResult<Vec<Recipe>> {
        let result = self.client.filter_by_area(area).await;
        self.convert("area", area, result)
    }

    pub async fn by_ingredient(&self, ingredient: &str) -> CookbookResult<Vec<Recipe>> {
        let result = self.client.filter_by_ingredient(ingredient).await;
        self.convert("ingredient", ingredient, result)
    }

    /// Query by free text if present, otherwise by the filter's dimension
    ///
    /// The catalog cannot combine dimensions, so non-blank text always wins
    /// and the filter is ignored. With neither, the result is empty.
    pub async fn by_filter_or_query(
        &self,
        query: Option<&str>,
        filter: Option<&Filter>,
    ) -> CookbookResult<Vec<Recipe>> {
        if let Some(text) = query.map(str::trim).filter(|q| !q.is_empty()) {
            return self.search_text(text).await;
        }

        match filter.and_then(|f| f.active_value().map(|v| (f.filter_type, v))) {
            Some((FilterType::Category, value)) => self.by_category(value).await,
            Some((FilterType::Area, value)) => self.by_area(value).await,
            Some((FilterType::Ingredient, value)) => self.by_ingredient(value).await,
            Some((FilterType::FreeText, value)) => self.search_text(value).await,
            None => Ok(Vec::new()),
        }
    }

    /// Full recipe for one catalog id, if the catalog knows it
    pub async fn lookup(&self, catalog_id: &str) -> CookbookResult<Option<Recipe>> {
        let result = self.client.lookup_by_id(catalog_id).await;
        Ok(self.convert("lookup", catalog_id, result)?.into_iter().next())
    }

    pub async fn random(&self) -> CookbookResult<Option<Recipe>> {
        let result = self.client.random().await;
        Ok(self.convert("random", "", result)?.into_iter().next())
    }

    pub async fn list_categories(&self) -> CookbookResult<Vec<CatalogCategory>> {
        Ok(self.client.list_categories().await?)
    }

    pub async fn list_areas(&self) -> CookbookResult<Vec<String>> {
        Ok(self.client.list_areas().await?)
    }

    pub async fn list_ingredients(&self) -> CookbookResult<Vec<String>> {
        Ok(self.client.list_ingredients().await?)
    }

    fn convert(
        &self,
        endpoint: &'static str,
        term: &str,
        result: Result<Vec<CatalogRecord>, CatalogError>,
    ) -> CookbookResult<Vec<Recipe>> {
        let records = result.map_err(|e| {
            warn!(
                client = self.client.name(),
                endpoint,
                term,
                error = %e,
                "Catalog fetch failed"
            );
            e
        })?;

        if records.is_empty() {
            debug!(client = self.client.name(), endpoint, term, "Catalog returned no records");
            return Ok(Vec::new());
        }

        let upstream = records.len();
        let recipes: Vec<Recipe> = records
            .into_iter()
            .take(self.limit)
            .map(IngredientNormalizer::to_recipe)
            .collect();

        debug!(
            client = self.client.name(),
            endpoint,
            term,
            upstream,
            returned = recipes.len(),
            "Catalog fetch complete"
        );
        Ok(recipes)
    }
}
