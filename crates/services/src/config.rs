use std::env;
use std::time::Duration;

use url::Url;

use crate::error::QuestionSourceError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/questions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to fetch the question pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionSourceConfig {
    url: Url,
    timeout: Duration,
}

impl QuestionSourceConfig {
    /// Build a config for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::InvalidUrl` if `url` does not parse as an
    /// absolute http(s) URL.
    pub fn new(url: &str) -> Result<Self, QuestionSourceError> {
        let parsed =
            Url::parse(url.trim()).map_err(|_| QuestionSourceError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(QuestionSourceError::InvalidUrl(url.to_string()));
        }
        Ok(Self {
            url: parsed,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Read `EXAM_API_URL` and `EXAM_API_TIMEOUT_SECS`, falling back to
    /// defaults for missing or blank values.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::InvalidUrl` if `EXAM_API_URL` is set but invalid.
    pub fn from_env() -> Result<Self, QuestionSourceError> {
        let url = non_blank_var("EXAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let timeout = non_blank_var("EXAM_API_TIMEOUT_SECS")
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(Self::new(&url)?.with_timeout(Duration::from_secs(timeout)))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
