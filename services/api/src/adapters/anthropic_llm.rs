//! services/api/src/adapters/anthropic_llm.rs
//!
//! Adapter for the Anthropic Messages API. Documents are sent as native
//! `document` content blocks, so PDFs reach the model without local extraction.
//! It implements the `GenerationService` port from the `core` crate.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use learnwell_core::ports::{Attachment, AttachmentKind, BackendError, GenerationService};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct AnthropicAdapter {
    client: Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl AnthropicAdapter {
    pub fn new(api_key: String, model: String) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            model,
            api_url: API_URL.to_string(),
        })
    }

    /// Points the adapter at a different endpoint, e.g. a local proxy.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn attachment_block(attachment: &Attachment<'_>) -> Result<Value, BackendError> {
        match attachment.kind {
            AttachmentKind::Document if attachment.media_type.starts_with("text/") => {
                let text = std::str::from_utf8(attachment.bytes).map_err(|_| {
                    BackendError::UnsupportedAttachment("text document is not UTF-8".to_string())
                })?;
                Ok(json!({
                    "type": "document",
                    "source": { "type": "text", "media_type": "text/plain", "data": text }
                }))
            }
            AttachmentKind::Document if attachment.media_type == "application/pdf" => Ok(json!({
                "type": "document",
                "source": {
                    "type": "base64",
                    "media_type": attachment.media_type,
                    "data": BASE64.encode(attachment.bytes)
                }
            })),
            AttachmentKind::Document => Err(BackendError::UnsupportedAttachment(
                attachment.media_type.to_string(),
            )),
        }
    }

    /// Builds the request body: attachments first, then the instructions as text.
    pub fn build_request(
        &self,
        instructions: &str,
        attachments: &[Attachment<'_>],
        max_output_tokens: u32,
    ) -> Result<Value, BackendError> {
        let mut content = attachments
            .iter()
            .map(Self::attachment_block)
            .collect::<Result<Vec<_>, _>>()?;
        content.push(json!({ "type": "text", "text": instructions }));

        Ok(json!({
            "model": self.model,
            "max_tokens": max_output_tokens,
            "messages": [{ "role": "user", "content": content }]
        }))
    }

    /// Concatenates every text block of a Messages API reply.
    pub fn extract_text(body: &Value) -> Result<String, BackendError> {
        let blocks = body["content"].as_array().ok_or_else(|| {
            BackendError::MalformedResponse("response has no content array".to_string())
        })?;
        let text: Vec<&str> = blocks
            .iter()
            .filter(|block| block["type"] == "text")
            .filter_map(|block| block["text"].as_str())
            .collect();
        if text.is_empty() {
            return Err(BackendError::MalformedResponse(
                "response contained no text content".to_string(),
            ));
        }
        Ok(text.join(""))
    }
}

//=========================================================================================
// `GenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerationService for AnthropicAdapter {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(
        &self,
        instructions: &str,
        attachments: &[Attachment<'_>],
        max_output_tokens: u32,
    ) -> Result<String, BackendError> {
        let body = self.build_request(instructions, attachments, max_output_tokens)?;

        let resp = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(BackendError::RateLimited { retry_after_secs });
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Auth(resp.text().await.unwrap_or_default()));
        }
        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        Self::extract_text(&json)
    }
}
