//! HTTP collaborator speaking the `generateContent` JSON API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::NarrativeCollaborator;
use crate::config::NarrativeConfig;
use crate::errors::NarrativeError;

pub struct GeminiClient {
    request_client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, NarrativeError> {
        let request_client = Client::builder().build()?;
        Ok(Self {
            request_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Builds a client when the configured credential is present.
    pub fn from_config(config: &NarrativeConfig) -> Result<Option<Self>, NarrativeError> {
        let Some(api_key) = config.resolve_api_key() else {
            warn!(env = %config.api_key_env, "narrative credential missing; using fallback text");
            return Ok(None);
        };
        Self::new(&config.endpoint, &config.model, api_key).map(Some)
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl NarrativeCollaborator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, NarrativeError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        debug!(model = %self.model, "requesting narrative text");
        let response = self
            .request_client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NarrativeError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        parse_response(&text)
    }
}

/// Concatenated text of the first candidate. An empty string is a valid
/// answer; the caller decides what to show instead.
fn parse_response(body: &str) -> Result<String, NarrativeError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|err| NarrativeError::Malformed(err.to_string()))?;
    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| NarrativeError::Malformed("response has no candidates".into()))?;
    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text.trim().to_string())
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
