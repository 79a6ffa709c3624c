//! Concurrent two-source aggregation
//!
//! Runs the local store fetch and the remote catalog fetch on independent
//! tasks, waits for both outcomes in whatever order they finish, and merges
//! `local ++ remote` before validation.
//!
//! # Failure isolation
//! A failed source contributes an empty list and is reported in the
//! per-source outcome. The aggregation only fails when both launched fetches
//! fail. A skipped local step (Area filter) counts as an empty success.
//!
//! # Deadline
//! No timeout by default. With a deadline, a fetch still running when it
//! passes is treated as failed; its task is detached, not cancelled, and its
//! result is discarded when it arrives.

use crate::error::{CookbookError, CookbookResult};
use crate::fetchers::{LocalStoreFetcher, RemoteCatalogFetcher};
use crate::types::{Filter, FilterType, Recipe};
use crate::validator::RecipeValidator;
use cookbook_common::events::{CookbookEvent, EventBus};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// What the local side runs for one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalPlan {
    /// Contribute an empty list without touching the store
    Skip,
    /// Title prefix scan, optionally narrowed in memory by a category or
    /// ingredient filter
    TitlePrefix {
        prefix: String,
        refine: Option<Filter>,
    },
    Category(String),
    Ingredient(String),
}

/// What the remote side runs for one search (exactly one dimension)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemotePlan {
    Text(String),
    Category(String),
    Area(String),
    Ingredient(String),
}

/// A pair of source queries executed together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub local: LocalPlan,
    pub remote: RemotePlan,
}

impl FetchPlan {
    /// Build the plan for a query and/or active filter
    ///
    /// Returns `None` when neither is present (caller shows its default view).
    /// Non-blank query text takes precedence on the remote side.
    pub fn build(query: Option<&str>, filter: Option<&Filter>) -> Option<Self> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let filter = filter.filter(|f| f.is_active());

        match (query, filter) {
            (Some(text), filter) => {
                let refine = filter
                    .filter(|f| {
                        matches!(f.filter_type, FilterType::Category | FilterType::Ingredient)
                    })
                    .cloned();
                Some(Self {
                    local: LocalPlan::TitlePrefix {
                        prefix: text.to_string(),
                        refine,
                    },
                    remote: RemotePlan::Text(text.to_string()),
                })
            }
            (None, Some(filter)) => {
                let value = filter.active_value()?.to_string();
                let plan = match filter.filter_type {
                    FilterType::Category => Self {
                        local: LocalPlan::Category(value.clone()),
                        remote: RemotePlan::Category(value),
                    },
                    FilterType::Ingredient => Self {
                        local: LocalPlan::Ingredient(value.clone()),
                        remote: RemotePlan::Ingredient(value),
                    },
                    FilterType::Area => Self {
                        local: LocalPlan::Skip,
                        remote: RemotePlan::Area(value),
                    },
                    FilterType::FreeText => Self {
                        local: LocalPlan::TitlePrefix {
                            prefix: value.clone(),
                            refine: None,
                        },
                        remote: RemotePlan::Text(value),
                    },
                };
                Some(plan)
            }
            (None, None) => None,
        }
    }
}

/// How one source contributed to an aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Fetched(usize),
    Skipped,
    Failed(String),
}

impl SourceOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, SourceOutcome::Failed(_))
    }
}

/// Merged, validated results plus per-source outcomes
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedResults {
    pub recipes: Vec<Recipe>,
    pub local: SourceOutcome,
    pub remote: SourceOutcome,
}

impl AggregatedResults {
    /// True when one source failed and the list holds only the other's results
    pub fn is_degraded(&self) -> bool {
        self.local.is_failed() || self.remote.is_failed()
    }
}

/// Runs both fetchers concurrently and merges their output
#[derive(Clone)]
pub struct ResultAggregator {
    local: LocalStoreFetcher,
    remote: RemoteCatalogFetcher,
    events: EventBus,
    deadline: Option<Duration>,
}

impl ResultAggregator {
    pub fn new(local: LocalStoreFetcher, remote: RemoteCatalogFetcher, events: EventBus) -> Self {
        Self {
            local,
            remote,
            events,
            deadline: None,
        }
    }

    /// Treat fetches still running after `deadline` as failed
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Execute `plan` against both sources and merge the results
    pub async fn aggregate(&self, plan: FetchPlan) -> CookbookResult<AggregatedResults> {
        debug!(?plan, "Starting aggregation");
        let deadline = self.deadline.map(|d| Instant::now() + d);

        let local_task = match plan.local {
            LocalPlan::Skip => None,
            local_plan => {
                let fetcher = self.local.clone();
                Some(tokio::spawn(async move { run_local(&fetcher, local_plan).await }))
            }
        };

        let remote_fetcher = self.remote.clone();
        let remote_plan = plan.remote;
        let remote_task =
            tokio::spawn(async move { run_remote(&remote_fetcher, remote_plan).await });

        let (local_result, remote_result) = tokio::join!(
            async {
                match local_task {
                    Some(task) => Some(join_source(task, deadline).await),
                    None => None,
                }
            },
            join_source(remote_task, deadline),
        );

        let (local_recipes, local_outcome) = match local_result {
            None => (Vec::new(), SourceOutcome::Skipped),
            Some(Ok(recipes)) => {
                let own: Vec<Recipe> = recipes
                    .into_iter()
                    .filter(|r| !r.imported_from_catalog)
                    .collect();
                let count = own.len();
                (own, SourceOutcome::Fetched(count))
            }
            Some(Err(reason)) => (Vec::new(), SourceOutcome::Failed(reason)),
        };

        let (remote_recipes, remote_outcome) = match remote_result {
            Ok(recipes) => {
                let count = recipes.len();
                (recipes, SourceOutcome::Fetched(count))
            }
            Err(reason) => (Vec::new(), SourceOutcome::Failed(reason)),
        };

        if let (SourceOutcome::Failed(local), SourceOutcome::Failed(remote)) =
            (&local_outcome, &remote_outcome)
        {
            warn!(local = %local, remote = %remote, "Both sources failed");
            return Err(CookbookError::AggregationFailed {
                local: local.clone(),
                remote: remote.clone(),
            });
        }

        let mut merged = local_recipes;
        merged.extend(remote_recipes);
        let recipes = RecipeValidator::filter(merged);

        let mut degraded_sources = Vec::new();
        if let SourceOutcome::Failed(reason) = &local_outcome {
            warn!(reason = %reason, "Store fetch failed, returning catalog results only");
            degraded_sources.push("store".to_string());
        }
        if let SourceOutcome::Failed(reason) = &remote_outcome {
            warn!(reason = %reason, "Catalog fetch failed, returning store results only");
            degraded_sources.push("catalog".to_string());
        }

        let local_count = count_of(&local_outcome);
        let remote_count = count_of(&remote_outcome);
        info!(
            local = local_count,
            remote = remote_count,
            total = recipes.len(),
            "Aggregation complete"
        );

        self.events.emit_lossy(CookbookEvent::SearchCompleted {
            local_count,
            remote_count,
            total: recipes.len(),
            degraded_sources,
            timestamp: cookbook_common::time::now(),
        });

        Ok(AggregatedResults {
            recipes,
            local: local_outcome,
            remote: remote_outcome,
        })
    }
}

fn count_of(outcome: &SourceOutcome) -> usize {
    match outcome {
        SourceOutcome::Fetched(count) => *count,
        _ => 0,
    }
}

async fn run_local(fetcher: &LocalStoreFetcher, plan: LocalPlan) -> CookbookResult<Vec<Recipe>> {
    match plan {
        LocalPlan::Skip => Ok(Vec::new()),
        LocalPlan::TitlePrefix { prefix, refine } => {
            let recipes = fetcher.by_title_prefix(&prefix).await?;
            Ok(match refine {
                Some(filter) => refine_locally(recipes, &filter),
                None => recipes,
            })
        }
        LocalPlan::Category(category) => fetcher.by_category(&category).await,
        LocalPlan::Ingredient(name) => fetcher.by_ingredient(&name).await,
    }
}

async fn run_remote(
    fetcher: &RemoteCatalogFetcher,
    plan: RemotePlan,
) -> CookbookResult<Vec<Recipe>> {
    match plan {
        RemotePlan::Text(text) => fetcher.search_text(&text).await,
        RemotePlan::Category(category) => fetcher.by_category(&category).await,
        RemotePlan::Area(area) => fetcher.by_area(&area).await,
        RemotePlan::Ingredient(name) => fetcher.by_ingredient(&name).await,
    }
}

/// Narrow prefix results by the structured filter the store query could not apply
fn refine_locally(recipes: Vec<Recipe>, filter: &Filter) -> Vec<Recipe> {
    let Some(value) = filter.active_value() else {
        return recipes;
    };
    recipes
        .into_iter()
        .filter(|r| match filter.filter_type {
            FilterType::Category => r.category == value,
            FilterType::Ingredient => r.ingredients.iter().any(|i| i.name == value),
            FilterType::Area | FilterType::FreeText => true,
        })
        .collect()
}

/// Wait for one source task, mapping panics and deadline expiry to failures
async fn join_source(
    task: JoinHandle<CookbookResult<Vec<Recipe>>>,
    deadline: Option<Instant>,
) -> Result<Vec<Recipe>, String> {
    let joined = match deadline {
        Some(at) => match tokio::time::timeout_at(at, task).await {
            Ok(joined) => joined,
            Err(_) => return Err("deadline elapsed".to_string()),
        },
        None => task.await,
    };

    match joined {
        Ok(Ok(recipes)) => Ok(recipes),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("fetch task aborted: {}", e)),
    }
}
