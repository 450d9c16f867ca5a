//! Application state.

use std::sync::Arc;

use crate::config::Config;
use crate::pr::GitHubClient;
use crate::ratelimit::RateLimiter;
use crate::summary::{OpenAiGenerator, SummaryError, SummaryGenerator};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub github: GitHubClient,
    /// `None` serves the static fallback summary for every request.
    pub generator: Option<Arc<dyn SummaryGenerator>>,
    /// `None` disables quotas.
    pub rate_limiter: Option<RateLimiter>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, SummaryError> {
        let generator = OpenAiGenerator::from_config(&config.llm)?
            .map(|g| Arc::new(g) as Arc<dyn SummaryGenerator>);

        Ok(Self {
            github: GitHubClient::new(&config.github),
            generator,
            rate_limiter: RateLimiter::from_config(&config.rate_limit),
        })
    }
}
