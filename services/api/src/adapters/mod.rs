pub mod anthropic_llm;
pub mod json_store;
pub mod openai_llm;

pub use anthropic_llm::AnthropicAdapter;
pub use json_store::JsonProfileStore;
pub use openai_llm::OpenAiGenerationAdapter;

use crate::config::{usable_credential, Config};
use async_openai::{config::OpenAIConfig, Client};
use learnwell_core::ports::Backend;
use tracing::{info, warn};

/// Chooses the generation backend once at startup.
///
/// Anthropic is preferred when its key is usable, then OpenAI. Without a usable
/// key every flow runs on its templates.
pub fn select_backend(config: &Config) -> Backend {
    if let Some(key) = usable_credential(config.anthropic_api_key.as_deref()) {
        match AnthropicAdapter::new(key.to_string(), config.anthropic_model.clone()) {
            Ok(adapter) => {
                info!(model = %config.anthropic_model, "Using the Anthropic generation backend.");
                return Backend::live(adapter);
            }
            Err(e) => warn!("Could not build the Anthropic client: {}", e),
        }
    }

    if let Some(key) = usable_credential(config.openai_api_key.as_deref()) {
        let client = Client::with_config(OpenAIConfig::new().with_api_key(key));
        info!(model = %config.openai_model, "Using the OpenAI generation backend.");
        return Backend::live(OpenAiGenerationAdapter::new(
            client,
            config.openai_model.clone(),
        ));
    }

    info!("No usable API key configured; content will be generated from templates.");
    Backend::Disabled
}
