//! Decorative copy from an external text-generation service.
//!
//! The [`Narrator`] is the boundary: whatever the collaborator does (fail,
//! hang, answer with nothing, or be absent) callers always receive a
//! non-empty string within the configured timeout.

pub mod enrichment;
pub mod gemini;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::NarrativeConfig;
use crate::domain::Transaction;
use crate::errors::NarrativeError;

pub use enrichment::{EnrichmentScope, NarrativeUpdate};
pub use gemini::GeminiClient;

/// Shown on the forest screen until a summary arrives.
pub const FOREST_PLACEHOLDER: &str = "Consulting the Oracle...";

/// Produces free text for a prompt.
#[async_trait]
pub trait NarrativeCollaborator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, NarrativeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NarrativeKind {
    ForestSummary,
    Impact,
}

impl NarrativeKind {
    /// Text used when no credential is configured.
    pub fn offline_text(&self) -> &'static str {
        match self {
            NarrativeKind::ForestSummary => {
                "Connect your spirit to the network to hear the forest speak."
            }
            NarrativeKind::Impact => "Impact data syncing...",
        }
    }

    /// Text used when the service answers with nothing.
    pub fn empty_text(&self) -> &'static str {
        match self {
            NarrativeKind::ForestSummary => "The roots grow deep where your wealth flows.",
            NarrativeKind::Impact => "Restoring biodiversity and soil health.",
        }
    }

    /// Text used on errors and timeouts.
    pub fn failure_text(&self) -> &'static str {
        match self {
            NarrativeKind::ForestSummary => "Your legacy grows with every transaction.",
            NarrativeKind::Impact => "Capturing carbon, restoring life.",
        }
    }
}

#[derive(Clone)]
pub struct Narrator {
    collaborator: Option<Arc<dyn NarrativeCollaborator>>,
    timeout: Duration,
}

impl Narrator {
    pub fn new(collaborator: Option<Arc<dyn NarrativeCollaborator>>, timeout: Duration) -> Self {
        Self {
            collaborator,
            timeout,
        }
    }

    /// A narrator that never leaves the process.
    pub fn offline() -> Self {
        Self::new(None, Duration::from_millis(NarrativeConfig::default_timeout_ms()))
    }

    /// Wires the HTTP collaborator when a credential is available.
    pub fn from_config(config: &NarrativeConfig) -> Self {
        let collaborator = match GeminiClient::from_config(config) {
            Ok(Some(client)) => Some(Arc::new(client) as Arc<dyn NarrativeCollaborator>),
            Ok(None) => None,
            Err(err) => {
                warn!("failed to build narrative client: {err}");
                None
            }
        };
        Self::new(collaborator, config.timeout())
    }

    pub fn is_online(&self) -> bool {
        self.collaborator.is_some()
    }

    pub async fn summarize_forest(&self, transactions: &[Transaction]) -> String {
        let prompt = prompts::forest_prompt(transactions);
        self.narrate(NarrativeKind::ForestSummary, &prompt).await
    }

    pub async fn describe_impact(&self, transaction: &Transaction) -> String {
        let prompt = prompts::impact_prompt(transaction);
        self.narrate(NarrativeKind::Impact, &prompt).await
    }

    async fn narrate(&self, kind: NarrativeKind, prompt: &str) -> String {
        let Some(collaborator) = &self.collaborator else {
            debug!(?kind, "no narrative credential; short-circuiting");
            return kind.offline_text().to_string();
        };

        let outcome = tokio::time::timeout(self.timeout, collaborator.generate(prompt))
            .await
            .unwrap_or(Err(NarrativeError::Timeout));

        match outcome {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                debug!(?kind, "narrative service returned empty text");
                kind.empty_text().to_string()
            }
            Err(err) => {
                warn!(?kind, "narrative request failed: {err}");
                kind.failure_text().to_string()
            }
        }
    }
}
