//! Runtime configuration for the Yahoo transport.
//!
//! Values come from the environment and may be overridden by CLI flags:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `QUOTEFETCH_BASE_URL` | `https://query1.finance.yahoo.com` |
//! | `QUOTEFETCH_TIMEOUT_MS` | `10000` |
//! | `QUOTEFETCH_USER_AGENT` | `quotefetch/<version>` |

use crate::ValidationError;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const ENV_BASE_URL: &str = "QUOTEFETCH_BASE_URL";
const ENV_TIMEOUT_MS: &str = "QUOTEFETCH_TIMEOUT_MS";
const ENV_USER_AGENT: &str = "QUOTEFETCH_USER_AGENT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Query host, without trailing slash.
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: format!("quotefetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup; unset or blank
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(base_url) = read(ENV_BASE_URL) {
            config = config.with_base_url(&base_url)?;
        }
        if let Some(raw) = read(ENV_TIMEOUT_MS) {
            config = config.with_timeout_ms(parse_timeout(&raw)?)?;
        }
        if let Some(user_agent) = read(ENV_USER_AGENT) {
            config.user_agent = user_agent.trim().to_owned();
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ValidationError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ValidationError::InvalidConfig {
                name: ENV_BASE_URL,
                value: base_url.to_owned(),
                reason: "expected an http(s) URL",
            });
        }

        self.base_url = trimmed.to_owned();
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self, ValidationError> {
        if timeout_ms == 0 {
            return Err(ValidationError::InvalidConfig {
                name: ENV_TIMEOUT_MS,
                value: timeout_ms.to_string(),
                reason: "must be greater than zero",
            });
        }

        self.timeout_ms = timeout_ms;
        Ok(self)
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ValidationError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidConfig {
            name: ENV_TIMEOUT_MS,
            value: raw.to_owned(),
            reason: "expected a whole number of milliseconds",
        })
}
