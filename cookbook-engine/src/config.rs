//! Engine settings resolution
//!
//! Each setting is resolved with ENV → TOML → compiled default priority.
//! A value found in more than one source logs a warning naming the sources.
//! Unparseable environment values are ignored with a warning.

use crate::catalog::mealdb::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::fetchers::{DEFAULT_RESULT_LIMIT, MAX_RESULT_LIMIT};
use cookbook_common::config::TomlConfig;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const CATALOG_URL_ENV: &str = "COOKBOOK_CATALOG_URL";
pub const CATALOG_TIMEOUT_ENV: &str = "COOKBOOK_CATALOG_TIMEOUT_SECS";
pub const RESULT_LIMIT_ENV: &str = "COOKBOOK_RESULT_LIMIT";
pub const AGGREGATION_DEADLINE_ENV: &str = "COOKBOOK_AGGREGATION_DEADLINE_MS";
pub const USER_ID_ENV: &str = "COOKBOOK_USER_ID";
pub const LOG_LEVEL_ENV: &str = "COOKBOOK_LOG_LEVEL";

/// Resolved engine settings
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub catalog_base_url: String,
    pub catalog_timeout: Duration,
    pub result_limit: usize,
    /// `None` means aggregation waits for both sources indefinitely
    pub aggregation_deadline: Option<Duration>,
    pub user_id: Option<String>,
    pub log_level: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_BASE_URL.to_string(),
            catalog_timeout: DEFAULT_TIMEOUT,
            result_limit: DEFAULT_RESULT_LIMIT,
            aggregation_deadline: None,
            user_id: None,
            log_level: "info".to_string(),
        }
    }
}

impl EngineSettings {
    /// Resolve every setting from the environment and `toml_config`
    pub fn resolve(toml_config: &TomlConfig) -> Self {
        let defaults = Self::default();

        let catalog_base_url = resolve_setting(
            "catalog base URL",
            CATALOG_URL_ENV,
            toml_config.catalog.base_url.clone(),
        )
        .unwrap_or(defaults.catalog_base_url);

        let catalog_timeout = resolve_setting::<u64>(
            "catalog timeout",
            CATALOG_TIMEOUT_ENV,
            toml_config.catalog.timeout_secs,
        )
        .map(Duration::from_secs)
        .unwrap_or(defaults.catalog_timeout);

        let result_limit = resolve_setting::<usize>(
            "result limit",
            RESULT_LIMIT_ENV,
            toml_config.catalog.result_limit,
        )
        .filter(|limit| *limit > 0)
        .map(|limit| {
            if limit > MAX_RESULT_LIMIT {
                warn!("Result limit {} exceeds cap, using {}", limit, MAX_RESULT_LIMIT);
            }
            limit.min(MAX_RESULT_LIMIT)
        })
        .unwrap_or(defaults.result_limit);

        let aggregation_deadline = resolve_setting::<u64>(
            "aggregation deadline",
            AGGREGATION_DEADLINE_ENV,
            toml_config.aggregation_deadline_ms,
        )
        .filter(|ms| *ms > 0)
        .map(cookbook_common::time::millis_to_duration);

        let user_id = resolve_setting("user id", USER_ID_ENV, toml_config.user_id.clone());

        let log_level = resolve_setting(
            "log level",
            LOG_LEVEL_ENV,
            Some(toml_config.logging.level.clone()),
        )
        .unwrap_or(defaults.log_level);

        Self {
            catalog_base_url,
            catalog_timeout,
            result_limit,
            aggregation_deadline,
            user_id,
            log_level,
        }
    }
}

/// Resolve one setting: ENV → TOML, `None` if neither holds a usable value
fn resolve_setting<T: FromStr>(name: &str, env_var: &str, toml_value: Option<T>) -> Option<T> {
    let env_value = std::env::var(env_var)
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| match raw.trim().parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring {}={:?}: not a valid {}", env_var, raw, name);
                None
            }
        });

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in multiple sources: environment, TOML. \
             Using environment (highest priority).",
            name
        );
    }

    if env_value.is_some() {
        info!("{} loaded from environment variable {}", name, env_var);
        return env_value;
    }
    toml_value
}
