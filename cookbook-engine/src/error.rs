//! Error types for cookbook-engine
//!
//! Collaborator errors (`StoreError`, `CatalogError`) are mapped onto the
//! engine taxonomy at the fetcher/reconciler boundary. Within an aggregated
//! search, single-source failures degrade to empty contributions instead of
//! surfacing here.

use thiserror::Error;

/// Engine-level error taxonomy
#[derive(Debug, Error)]
pub enum CookbookError {
    /// A store operation needs a signed-in user and none is available
    #[error("No authenticated user")]
    Unauthenticated,

    /// Authoritative store I/O failure
    #[error("Recipe store unavailable: {0}")]
    StoreUnavailable(String),

    /// Catalog transport failure or non-success response
    #[error("Catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Both sources of an aggregated search failed
    #[error("Search failed on both sources (store: {local}; catalog: {remote})")]
    AggregationFailed { local: String, remote: String },

    /// Writing a catalog favorite into the store failed; state was rolled back
    #[error("Could not save favorite: {0}")]
    PromotionFailed(String),

    /// A store update was requested for a recipe that has no store id
    #[error("Recipe has no store id")]
    MissingRecipeId,

    /// Configuration / IO error from cookbook-common
    #[error("Common error: {0}")]
    Common(#[from] cookbook_common::Error),
}

/// Result type for engine operations
pub type CookbookResult<T> = Result<T, CookbookError>;

/// Failure reported by an `AuthoritativeStore` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("No such recipe: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for CookbookError {
    fn from(err: StoreError) -> Self {
        CookbookError::StoreUnavailable(err.to_string())
    }
}

/// Failure reported by a `CatalogClient` implementation
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog API returned error {0}")]
    Api(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<CatalogError> for CookbookError {
    fn from(err: CatalogError) -> Self {
        CookbookError::UpstreamUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_store_unavailable() {
        let err: CookbookError = StoreError::Unavailable("disk full".to_string()).into();
        assert!(matches!(err, CookbookError::StoreUnavailable(ref m) if m.contains("disk full")));
    }

    #[test]
    fn test_catalog_error_maps_to_upstream_unavailable() {
        let err: CookbookError = CatalogError::Api(503).into();
        assert!(matches!(err, CookbookError::UpstreamUnavailable(ref m) if m.contains("503")));
    }

    #[test]
    fn test_aggregation_failed_mentions_both_reasons() {
        let err = CookbookError::AggregationFailed {
            local: "offline".to_string(),
            remote: "timeout".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("offline") && msg.contains("timeout"));
    }
}
