//! Query routing
//!
//! Holds the current free-text query and filter, and decides whether a
//! request goes to the aggregator or to the user's default view.
//!
//! # Routing
//! - No query text and no active filter → default view (the user's own,
//!   non-imported recipes)
//! - Otherwise → aggregated search; non-blank query text beats the filter on
//!   the catalog side

use crate::aggregator::{AggregatedResults, FetchPlan, ResultAggregator};
use crate::error::CookbookResult;
use crate::fetchers::LocalStoreFetcher;
use crate::types::{Filter, Recipe};
use tracing::debug;

/// Query text must be longer than this before typing triggers a search
pub const MIN_INCREMENTAL_QUERY_CHARS: usize = 2;

/// Where a request is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    DefaultView,
    Aggregate(FetchPlan),
}

/// Results of one routed request
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResults {
    DefaultView(Vec<Recipe>),
    Search(AggregatedResults),
}

impl QueryResults {
    pub fn recipes(&self) -> &[Recipe] {
        match self {
            QueryResults::DefaultView(recipes) => recipes,
            QueryResults::Search(results) => &results.recipes,
        }
    }

    pub fn into_recipes(self) -> Vec<Recipe> {
        match self {
            QueryResults::DefaultView(recipes) => recipes,
            QueryResults::Search(results) => results.recipes,
        }
    }

    pub fn is_default_view(&self) -> bool {
        matches!(self, QueryResults::DefaultView(_))
    }
}

/// Pure routing decision for a query and filter
pub fn plan(query: Option<&str>, filter: Option<&Filter>) -> Route {
    match FetchPlan::build(query, filter) {
        Some(plan) => Route::Aggregate(plan),
        None => Route::DefaultView,
    }
}

/// Stateful entry point for searches
pub struct QueryRouter {
    local: LocalStoreFetcher,
    aggregator: ResultAggregator,
    query: Option<String>,
    filter: Option<Filter>,
}

impl QueryRouter {
    pub fn new(local: LocalStoreFetcher, aggregator: ResultAggregator) -> Self {
        Self {
            local,
            aggregator,
            query: None,
            filter: None,
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Route for the current state
    pub fn route(&self) -> Route {
        plan(self.query.as_deref(), self.filter.as_ref())
    }

    /// Run the current state's route
    pub async fn execute(&self) -> CookbookResult<QueryResults> {
        match self.route() {
            Route::DefaultView => {
                debug!("Routing to default view");
                self.default_view().await.map(QueryResults::DefaultView)
            }
            Route::Aggregate(plan) => self
                .aggregator
                .aggregate(plan)
                .await
                .map(QueryResults::Search),
        }
    }

    /// Replace both inputs and run the resulting route
    pub async fn search(
        &mut self,
        query: Option<&str>,
        filter: Option<Filter>,
    ) -> CookbookResult<QueryResults> {
        self.set_query(query.unwrap_or_default());
        self.filter = filter.filter(Filter::is_active);
        self.execute().await
    }

    /// Explicit submit: always searches
    pub async fn submit_query(&mut self, query: &str) -> CookbookResult<QueryResults> {
        self.set_query(query);
        self.execute().await
    }

    /// Typing update: searches only when the query is empty or long enough
    ///
    /// Returns `Ok(None)` when the change was recorded without searching.
    pub async fn query_changed(&mut self, query: &str) -> CookbookResult<Option<QueryResults>> {
        self.set_query(query);
        let len = query.trim().chars().count();
        if len != 0 && len <= MIN_INCREMENTAL_QUERY_CHARS {
            debug!(len, "Query too short, not searching yet");
            return Ok(None);
        }
        self.execute().await.map(Some)
    }

    pub async fn apply_filter(&mut self, filter: Filter) -> CookbookResult<QueryResults> {
        self.filter = Some(filter).filter(Filter::is_active);
        self.execute().await
    }

    pub async fn clear_filter(&mut self) -> CookbookResult<QueryResults> {
        self.filter = None;
        self.execute().await
    }

    pub async fn clear_query(&mut self) -> CookbookResult<QueryResults> {
        self.query = None;
        self.execute().await
    }

    /// Reset both inputs and return the default view
    pub async fn clear(&mut self) -> CookbookResult<QueryResults> {
        self.query = None;
        self.filter = None;
        self.execute().await
    }

    fn set_query(&mut self, query: &str) {
        let trimmed = query.trim();
        self.query = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    async fn default_view(&self) -> CookbookResult<Vec<Recipe>> {
        let recipes = self.local.by_owner().await?;
        Ok(recipes
            .into_iter()
            .filter(|r| !r.imported_from_catalog)
            .collect())
    }
}
