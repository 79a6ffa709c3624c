//! # Cookbook Common Library
//!
//! Shared code for the cookbook workspace:
//! - Error type used at crate boundaries
//! - TOML configuration and root folder resolution
//! - Event types (CookbookEvent) and the EventBus
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
