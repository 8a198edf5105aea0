//! Process configuration, read once from the environment.

use chrono::Duration;
use thiserror::Error;

use bizlens_core::UserId;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{set} is set but {missing} is not")]
    Incomplete { set: &'static str, missing: &'static str },
}

/// Which backend the services talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    InMemory,
    Postgrest { url: String, api_key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// `true` when `JWT_SECRET` was missing and the dev secret is in use.
    pub jwt_secret_is_default: bool,
    pub backend: BackendConfig,
    /// `None` disables the assistant routes' upstream calls.
    pub ai: Option<AiConfig>,
    pub cache_max_age: Option<Duration>,
    /// Users whose metrics are synced at startup.
    pub sync_on_start_users: Vec<UserId>,
    /// In-memory backend only: seed demo rows for this user.
    pub seed_demo_user: Option<UserId>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIZLENS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let (jwt_secret, jwt_secret_is_default) = match get("JWT_SECRET") {
            Some(s) => (s, false),
            None => (DEV_JWT_SECRET.to_string(), true),
        };

        let backend = match (get("BACKEND_URL"), get("BACKEND_API_KEY")) {
            (Some(url), Some(api_key)) => BackendConfig::Postgrest {
                url: url.trim_end_matches('/').to_string(),
                api_key,
            },
            (Some(_), None) => {
                return Err(ConfigError::Incomplete {
                    set: "BACKEND_URL",
                    missing: "BACKEND_API_KEY",
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete {
                    set: "BACKEND_API_KEY",
                    missing: "BACKEND_URL",
                });
            }
            (None, None) => BackendConfig::InMemory,
        };

        let ai = get("OPENAI_API_KEY").map(|api_key| AiConfig {
            api_key,
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            base_url: get("OPENAI_BASE_URL"),
        });

        let cache_max_age = match get("CACHE_MAX_AGE_SECS") {
            None => None,
            Some(raw) => {
                let secs: i64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "CACHE_MAX_AGE_SECS",
                    reason: format!("expected whole seconds, got {raw:?}"),
                })?;
                if secs < 0 {
                    return Err(ConfigError::Invalid {
                        var: "CACHE_MAX_AGE_SECS",
                        reason: "must not be negative".to_string(),
                    });
                }
                Some(Duration::seconds(secs))
            }
        };

        let sync_on_start_users = match get("SYNC_ON_START_USERS") {
            None => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<UserId>().map_err(|e| ConfigError::Invalid {
                        var: "SYNC_ON_START_USERS",
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        let seed_demo_user = get("SEED_DEMO_USER")
            .map(|s| {
                s.parse::<UserId>().map_err(|e| ConfigError::Invalid {
                    var: "SEED_DEMO_USER",
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_secret_is_default,
            backend,
            ai,
            cache_max_age,
            sync_on_start_users,
            seed_demo_user,
        })
    }
}
