//! Source fetchers
//!
//! # Fetchers
//! 1. **local** - authoritative store, scoped to the current user
//! 2. **remote** - external catalog, one query dimension per call, capped
//!
//! Both return canonical `Recipe` values and map collaborator failures onto
//! `CookbookError`. Neither retries.

pub mod local;
pub mod remote;

pub use local::LocalStoreFetcher;
pub use remote::{RemoteCatalogFetcher, DEFAULT_RESULT_LIMIT, MAX_RESULT_LIMIT};
