use std::{str::FromStr, time::Duration};

use thiserror::Error;

use crate::{meeting::SearchPolicy, services::ProviderConfig};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set.")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}.")]
    Invalid { name: &'static str, value: String },
}

/// Everything read from the environment at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub provider: ProviderConfig,
    pub search: SearchPolicy,
}

impl Config {
    /// Reads the process environment, including a `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| dotenv::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let mut provider = ProviderConfig::new(required("GOOGLE_MAPS_TOKEN")?);
        if let Some(secs) = parse_optional::<u64, _>(&lookup, "MEETPOINT_PROVIDER_TIMEOUT_SECS")? {
            provider.timeout = Duration::from_secs(secs);
        }
        if let Some(base_url) = lookup("MEETPOINT_PROVIDER_BASE_URL") {
            provider.base_url = base_url;
        }

        let mut search = SearchPolicy::default();
        if let Some(keyword) = lookup("MEETPOINT_SEARCH_KEYWORD") {
            search.keyword = keyword;
        }
        if let Some(radius) = parse_optional(&lookup, "MEETPOINT_SEARCH_RADIUS_METERS")? {
            search.radius_meters = radius;
        }
        if let Some(step) = parse_optional::<f64, _>(&lookup, "MEETPOINT_GRID_STEP_DEGREES")? {
            if !step.is_finite() || step <= 0.0 {
                return Err(ConfigError::Invalid {
                    name: "MEETPOINT_GRID_STEP_DEGREES",
                    value: step.to_string(),
                });
            }
            search.grid_step = step;
        }

        Ok(Config {
            discord_token: required("DISCORD_TOKEN")?,
            provider,
            search,
        })
    }
}

fn parse_optional<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
