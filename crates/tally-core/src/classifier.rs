//! Transaction classifier with guaranteed fallback
//!
//! Wraps an optional AI backend and turns its best-effort analysis into a
//! total function: `classify` always returns a usable `AnalysisResult`.
//! Provider errors, timeouts, malformed JSON, and out-of-vocabulary enum
//! values all collapse into the same deterministic default, so a dead LLM
//! degrades classification quality but never availability.

use std::time::Duration;

use rust_decimal::Decimal;
use tracing::warn;

use crate::ai::{AIBackend, AIClient, AnalysisResult};

/// Default upper bound on a single classification call
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the classification timeout (seconds)
pub const AI_TIMEOUT_ENV: &str = "TALLY_AI_TIMEOUT_SECS";

/// Classifier component
///
/// Stateless between invocations; one outbound call per `classify`, no
/// retries.
#[derive(Clone)]
pub struct Classifier {
    ai: Option<AIClient>,
    timeout: Duration,
}

impl Classifier {
    /// Create a classifier over a configured backend
    pub fn new(ai: AIClient) -> Self {
        Self {
            ai: Some(ai),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a classifier with no backend; every call yields the fallback
    pub fn disabled() -> Self {
        Self {
            ai: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create from environment variables
    ///
    /// Backend selection follows `AIClient::from_env`; a missing backend
    /// configuration produces a disabled classifier rather than an error.
    pub fn from_env() -> Self {
        let timeout = std::env::var(AI_TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self {
            ai: AIClient::from_env(),
            timeout,
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a backend is configured
    pub fn enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// The configured backend, if any (for health checks and logging)
    pub fn backend(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    /// Classify a raw transaction
    ///
    /// Never fails outward. Any backend failure is logged and absorbed into
    /// `AnalysisResult::fallback()`.
    pub async fn classify(
        &self,
        amount: Decimal,
        description: Option<&str>,
        merchant: Option<&str>,
        location: Option<&str>,
    ) -> AnalysisResult {
        let Some(ai) = &self.ai else {
            return AnalysisResult::fallback();
        };

        let call = ai.analyze_transaction(amount, description, merchant, location);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(error = %e, model = ai.model(), "AI analysis failed, using fallback");
                AnalysisResult::fallback()
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.timeout.as_secs(),
                    model = ai.model(),
                    "AI analysis timed out, using fallback"
                );
                AnalysisResult::fallback()
            }
        }
    }
}
