use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BackendFailure;
use crate::models::GroundingChunk;

pub const GEMINI_MODEL: &str = "gemini-2.5-pro";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Raw output of one generation call: the text payload plus whatever citations
/// the backend attached. Not yet normalized into a draft.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub text: String,
    pub citations: Vec<GroundingChunk>,
}

/// The one effectful dependency of the draft orchestrator. Injected so the
/// orchestrator can be exercised without a live backend.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Execute a single schema-constrained, search-augmented generation
    /// request. One request, one response; no streaming, no retries.
    async fn generate(&self, prompt: &str, schema: &Value)
        -> Result<GenerationOutput, BackendFailure>;
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    tools: Vec<Tool>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: Value,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self> {
        // Generation with search grounding routinely takes tens of seconds.
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, api_key })
    }

    fn build_request(prompt: &str, schema: &Value) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            tools: vec![Tool {
                google_search: serde_json::json!({}),
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema.clone(),
            },
        }
    }

    fn is_timeout_body(status: reqwest::StatusCode, body: &str) -> bool {
        status == reqwest::StatusCode::GATEWAY_TIMEOUT
            || body.contains("DEADLINE_EXCEEDED")
            || body.contains("deadline")
    }
}

#[async_trait::async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<GenerationOutput, BackendFailure> {
        let url = format!("{}/{}:generateContent", GEMINI_ENDPOINT, GEMINI_MODEL);
        let request = Self::build_request(prompt, schema);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendFailure::Timeout(e.to_string())
                } else {
                    BackendFailure::Other(format!("Failed to send request to Gemini API: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            if Self::is_timeout_body(status, &error_text) {
                return Err(BackendFailure::Timeout(format!(
                    "Gemini API timeout: {} - {}",
                    status, error_text
                )));
            }
            return Err(BackendFailure::Other(format!(
                "Gemini API error: {} - {}",
                status, error_text
            )));
        }

        let gemini_response = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                BackendFailure::Other(format!("Failed to parse Gemini API response: {}", e))
            })?;

        let candidate = gemini_response.candidates.into_iter().next();

        let citations = candidate
            .as_ref()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| m.grounding_chunks.clone())
            .unwrap_or_default();

        let text = candidate
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(GenerationOutput { text, citations })
    }
}
