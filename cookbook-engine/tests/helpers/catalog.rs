//! Scriptable catalog client

use async_trait::async_trait;
use cookbook_engine::catalog::{CatalogCategory, CatalogClient, CatalogRecord};
use cookbook_engine::error::CatalogError;
use std::sync::Mutex;
use std::time::Duration;

/// Catalog fake returning canned records for every recipe endpoint
///
/// Records the `endpoint:term` of every recipe call so tests can assert
/// which single dimension was queried.
#[derive(Default)]
pub struct ScriptedCatalog {
    pub records: Vec<CatalogRecord>,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub categories: Vec<CatalogCategory>,
    pub areas: Vec<String>,
    pub ingredients: Vec<String>,
    pub fail_areas: bool,
    pub areas_delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCatalog {
    pub fn returning(records: Vec<CatalogRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn slow(records: Vec<CatalogRecord>, delay: Duration) -> Self {
        Self {
            records,
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn with_options(
        mut self,
        categories: &[&str],
        areas: &[&str],
        ingredients: &[&str],
    ) -> Self {
        self.categories = categories
            .iter()
            .enumerate()
            .map(|(i, name)| CatalogCategory {
                id: (i + 1).to_string(),
                name: name.to_string(),
                thumbnail: None,
                description: None,
            })
            .collect();
        self.areas = areas.iter().map(|s| s.to_string()).collect();
        self.ingredients = ingredients.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, endpoint: &str, term: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.calls.lock().unwrap().push(format!("{}:{}", endpoint, term));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(CatalogError::Api(503));
        }
        Ok(self.records.clone())
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn search_by_text(&self, query: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.answer("search", query).await
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.answer("category", category).await
    }

    async fn filter_by_area(&self, area: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.answer("area", area).await
    }

    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.answer("ingredient", ingredient).await
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        let records = self.answer("lookup", id).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.id.as_deref() == Some(id))
            .collect())
    }

    async fn random(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        let records = self.answer("random", "").await?;
        Ok(records.into_iter().take(1).collect())
    }

    async fn list_categories(&self) -> Result<Vec<CatalogCategory>, CatalogError> {
        if self.fail {
            return Err(CatalogError::Network("scripted failure".to_string()));
        }
        Ok(self.categories.clone())
    }

    async fn list_areas(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(delay) = self.areas_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail || self.fail_areas {
            return Err(CatalogError::Network("scripted failure".to_string()));
        }
        Ok(self.areas.clone())
    }

    async fn list_ingredients(&self) -> Result<Vec<String>, CatalogError> {
        if self.fail {
            return Err(CatalogError::Network("scripted failure".to_string()));
        }
        Ok(self.ingredients.clone())
    }
}

/// `count` catalog records titled `"{prefix} 1"`, `"{prefix} 2"`, ... with one ingredient each
pub fn numbered_records(prefix: &str, count: usize) -> Vec<CatalogRecord> {
    (1..=count)
        .map(|i| {
            CatalogRecord::new(format!("{}", 52000 + i), format!("{} {}", prefix, i))
                .with_category("Chicken")
                .with_slot(1, Some("Chicken"), Some("500g"))
        })
        .collect()
}
