//! HTTP client for the external Dockerfile-rewrite service.
//!
//! The service contract is a single JSON POST: the raw Dockerfile plus the
//! failed findings go out, an optimized Dockerfile comes back. Its output is
//! only ever shown to the user, never fed back into the assessment engine.

use crate::error::{AuditError, Result};
use crate::rules::Finding;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ENDPOINT_ENV: &str = "DOCKER_AUDIT_OPTIMIZER_URL";
const TOKEN_ENV: &str = "DOCKER_AUDIT_OPTIMIZER_TOKEN";

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub max_retries: u8,
}

impl OptimizerConfig {
    /// Read the service location from the environment. `None` when no
    /// endpoint is configured; optimization is strictly opt-in.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var(ENDPOINT_ENV).ok()?;
        Some(Self {
            endpoint,
            token: std::env::var(TOKEN_ENV).ok(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        })
    }
}

#[derive(Debug, Serialize)]
struct OptimizeRequest<'a> {
    dockerfile: &'a str,
    findings: &'a [Finding],
}

#[derive(Debug, Deserialize)]
struct OptimizeResponse {
    optimized_dockerfile: String,
}

pub struct OptimizerClient {
    client: Client,
    config: OptimizerConfig,
}

impl OptimizerClient {
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AuditError::Optimizer(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Request an optimized rewrite. Retries transient failures with
    /// exponential backoff before giving up.
    pub fn suggest(&self, dockerfile: &str, findings: &[Finding]) -> Result<String> {
        let request = OptimizeRequest {
            dockerfile,
            findings,
        };

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1));
                std::thread::sleep(delay);
                tracing::debug!("optimizer retry attempt {} after {:?}", attempt, delay);
            }

            match self.send(&request) {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::debug!("optimizer attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AuditError::Optimizer("request never attempted".to_string())))
    }

    fn send(&self, request: &OptimizeRequest<'_>) -> Result<String> {
        let mut builder = self.client.post(&self.config.endpoint).json(request);
        if let Some(token) = &self.config.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .map_err(|e| AuditError::Optimizer(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AuditError::Optimizer(format!(
                "service returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: OptimizeResponse = response
            .json()
            .map_err(|e| AuditError::Optimizer(format!("invalid response: {e}")))?;

        if parsed.optimized_dockerfile.trim().is_empty() {
            return Err(AuditError::Optimizer(
                "service returned an empty Dockerfile".to_string(),
            ));
        }
        Ok(parsed.optimized_dockerfile)
    }
}
