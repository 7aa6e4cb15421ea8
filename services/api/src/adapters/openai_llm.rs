//! services/api/src/adapters/openai_llm.rs
//!
//! This module contains the adapter for an OpenAI-compatible chat model.
//! It implements the `GenerationService` port from the `core` crate.
//!
//! Chat completions take text only, so text documents are inlined into the user
//! message. Any other attachment is refused, which sends the flow to its template.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use learnwell_core::ports::{Attachment, BackendError, GenerationService};

const SYSTEM_PROMPT: &str = "You are a personalized learning assistant for university students. Follow the requested markdown layout exactly, keeping every heading and its order.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiGenerationAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerationAdapter {
    /// Creates a new `OpenAiGenerationAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Renders the user message: each text attachment in a fenced block, then the
    /// instructions.
    pub fn user_message(
        instructions: &str,
        attachments: &[Attachment<'_>],
    ) -> Result<String, BackendError> {
        let mut message = String::new();
        for (i, attachment) in attachments.iter().enumerate() {
            if !attachment.media_type.starts_with("text/") {
                return Err(BackendError::UnsupportedAttachment(
                    attachment.media_type.to_string(),
                ));
            }
            let text = std::str::from_utf8(attachment.bytes).map_err(|_| {
                BackendError::UnsupportedAttachment("text document is not UTF-8".to_string())
            })?;
            message.push_str(&format!(
                "ATTACHED DOCUMENT {}:\n---\n{}\n---\n\n",
                i + 1,
                text
            ));
        }
        message.push_str(instructions);
        Ok(message)
    }
}

fn map_openai_error(e: OpenAIError) -> BackendError {
    match e {
        OpenAIError::Reqwest(e) => BackendError::Transport(e.to_string()),
        OpenAIError::ApiError(api) if api.message.to_lowercase().contains("api key") => {
            BackendError::Auth(api.message)
        }
        OpenAIError::ApiError(api) => BackendError::Api {
            status: 0,
            message: api.message,
        },
        other => BackendError::MalformedResponse(other.to_string()),
    }
}

//=========================================================================================
// `GenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerationService for OpenAiGenerationAdapter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        instructions: &str,
        attachments: &[Attachment<'_>],
        max_output_tokens: u32,
    ) -> Result<String, BackendError> {
        let user_message = Self::user_message(instructions, attachments)?;

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| BackendError::MalformedResponse(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| BackendError::MalformedResponse(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(max_output_tokens)
            .n(1)
            .build()
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        // Extract the text content from the first choice in the response.
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                BackendError::MalformedResponse(
                    "chat completion returned no text content".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_attachments_are_inlined_before_instructions() {
        let message = OpenAiGenerationAdapter::user_message(
            "Write the lesson",
            &[Attachment::document("text/plain", b"Photosynthesis basics")],
        )
        .unwrap();
        let doc = message.find("Photosynthesis basics").unwrap();
        let instructions = message.find("Write the lesson").unwrap();
        assert!(doc < instructions);
    }

    #[test]
    fn pdf_attachments_are_refused() {
        let err = OpenAiGenerationAdapter::user_message(
            "Write the lesson",
            &[Attachment::document("application/pdf", b"%PDF")],
        )
        .unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedAttachment(t) if t == "application/pdf"));
    }
}
