//! Event system for the cookbook engine
//!
//! Provides shared event definitions and the EventBus used as the observer
//! channel for optimistic favorite updates and search completion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Cookbook event types
///
/// Events are broadcast via EventBus and can be serialized for any front end
/// that wants to mirror engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CookbookEvent {
    /// Favorite flag applied to an in-memory recipe (before the write completes)
    ///
    /// Triggers:
    /// - Front end: flip the heart icon immediately
    FavoriteChanged {
        /// Store id, or catalog id for catalog-only recipes
        recipe_key: String,
        favorite: bool,
        timestamp: DateTime<Utc>,
    },

    /// A favorite write failed and the in-memory flag was restored
    ///
    /// Triggers:
    /// - Front end: restore the previous icon state and report the failure
    FavoriteRolledBack {
        recipe_key: String,
        /// Flag value after rollback
        favorite: bool,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A catalog recipe was written into the authoritative store as a favorite
    RecipePromoted {
        catalog_id: Option<String>,
        recipe_id: String,
        timestamp: DateTime<Utc>,
    },

    /// An unfavorited catalog recipe's store row was deleted
    PromotedRecipeRemoved {
        recipe_id: String,
        timestamp: DateTime<Utc>,
    },

    /// An aggregated search finished merging
    SearchCompleted {
        local_count: usize,
        remote_count: usize,
        total: usize,
        /// Sources whose fetch failed and contributed nothing
        degraded_sources: Vec<String>,
        timestamp: DateTime<Utc>,
    },
}

impl CookbookEvent {
    /// Event type name, matching the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            CookbookEvent::FavoriteChanged { .. } => "FavoriteChanged",
            CookbookEvent::FavoriteRolledBack { .. } => "FavoriteRolledBack",
            CookbookEvent::RecipePromoted { .. } => "RecipePromoted",
            CookbookEvent::PromotedRecipeRemoved { .. } => "PromotedRecipeRemoved",
            CookbookEvent::SearchCompleted { .. } => "SearchCompleted",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use cookbook_common::events::{CookbookEvent, EventBus};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(CookbookEvent::PromotedRecipeRemoved {
///     recipe_id: "abc".to_string(),
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CookbookEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<CookbookEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: CookbookEvent,
    ) -> Result<usize, broadcast::error::SendError<CookbookEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: CookbookEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
