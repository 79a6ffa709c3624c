//! Filter picker options
//!
//! Loads categories, areas and ingredient names concurrently. A list whose
//! request fails contributes nothing; once the fallback timer fires, whatever
//! has arrived is returned and the remaining requests are dropped.

use super::{CatalogCategory, CatalogClient};
use crate::error::CatalogError;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Fallback timer for the picker
pub const OPTIONS_FALLBACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Categories offered in the picker; everything else the catalog lists is hidden
pub const ALLOWED_CATEGORIES: [&str; 5] = ["Dessert", "Side", "Starter", "Breakfast", "Goat"];

/// Options for the filter picker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub categories: Vec<CatalogCategory>,
    pub areas: Vec<String>,
    pub ingredients: Vec<String>,
    /// True when the fallback timer fired before every list arrived
    pub timed_out: bool,
}

impl FilterOptions {
    /// All three lists arrived non-empty
    pub fn is_complete(&self) -> bool {
        !self.categories.is_empty() && !self.areas.is_empty() && !self.ingredients.is_empty()
    }
}

enum OptionList {
    Categories(Result<Vec<CatalogCategory>, CatalogError>),
    Areas(Result<Vec<String>, CatalogError>),
    Ingredients(Result<Vec<String>, CatalogError>),
}

/// Load picker options with the default fallback timer
pub async fn load_filter_options(client: Arc<dyn CatalogClient>) -> FilterOptions {
    load_filter_options_with_timeout(client, OPTIONS_FALLBACK_TIMEOUT).await
}

/// Load picker options, returning partial lists once `timeout` elapses
pub async fn load_filter_options_with_timeout(
    client: Arc<dyn CatalogClient>,
    timeout: Duration,
) -> FilterOptions {
    let mut pending: FuturesUnordered<BoxFuture<'static, OptionList>> = FuturesUnordered::new();

    let c = Arc::clone(&client);
    pending.push(async move { OptionList::Categories(c.list_categories().await) }.boxed());
    let c = Arc::clone(&client);
    pending.push(async move { OptionList::Areas(c.list_areas().await) }.boxed());
    let c = Arc::clone(&client);
    pending.push(async move { OptionList::Ingredients(c.list_ingredients().await) }.boxed());

    let deadline = Instant::now() + timeout;
    let mut options = FilterOptions::default();

    loop {
        match tokio::time::timeout_at(deadline, pending.next()).await {
            Ok(Some(list)) => apply(&mut options, list),
            Ok(None) => break,
            Err(_) => {
                warn!(
                    pending = pending.len(),
                    "Filter options fallback timer fired, using partial lists"
                );
                options.timed_out = true;
                break;
            }
        }
    }

    debug!(
        categories = options.categories.len(),
        areas = options.areas.len(),
        ingredients = options.ingredients.len(),
        "Filter options loaded"
    );
    options
}

fn apply(options: &mut FilterOptions, list: OptionList) {
    match list {
        OptionList::Categories(Ok(categories)) => {
            options.categories = categories
                .into_iter()
                .filter(|c| ALLOWED_CATEGORIES.contains(&c.name.as_str()))
                .collect();
        }
        OptionList::Areas(Ok(areas)) => options.areas = areas,
        OptionList::Ingredients(Ok(ingredients)) => options.ingredients = ingredients,
        OptionList::Categories(Err(e)) => warn!(error = %e, "Category list failed"),
        OptionList::Areas(Err(e)) => warn!(error = %e, "Area list failed"),
        OptionList::Ingredients(Err(e)) => warn!(error = %e, "Ingredient list failed"),
    }
}
