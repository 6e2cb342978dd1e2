//! Gemini `generateContent` client.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::generation::engine::{Attachment, EngineError, GenerationEngine};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// [`GenerationEngine`] backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiEngine {
    http_client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEngine {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let api_key = config
            .gemini_api_key()
            .ok_or_else(|| EngineError::Config("GEMINI_API_KEY not set".into()))?;
        Self::new(api_key, config.gemini_model(), config.gemini_base_url())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn build_request<'a>(prompt: &'a str, attachment: Option<&'a Attachment>) -> GenerateRequest<'a> {
    let mut parts = vec![RequestPart::Text { text: prompt }];
    if let Some(attachment) = attachment {
        parts.push(RequestPart::InlineData {
            inline_data: InlineData {
                mime_type: &attachment.mime_type,
                data: STANDARD.encode(&attachment.bytes),
            },
        });
    }

    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
    }
}

fn response_text(response: GenerateResponse) -> Result<String, EngineError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(EngineError::Parse(format!("empty response: {reason}")));
    }

    Ok(text)
}

#[async_trait]
impl GenerationEngine for GeminiEngine {
    #[instrument(skip_all, fields(model = %self.model, prompt_len = prompt.len(), attachment = attachment.is_some()))]
    async fn invoke(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, EngineError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(prompt, attachment))
            .send()
            .await
            .map_err(EngineError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(EngineError::from_reqwest)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            debug!(%status, "generation request rejected");
            return Err(EngineError::from_status(status.as_u16(), message));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| EngineError::Parse(e.to_string()))?;
        response_text(parsed)
    }
}
