//! Groq-hosted chat models through Rig.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::AssistantContent;
use rig::providers::groq;
use tracing::debug;

use crate::config::LlmConfig;
use crate::summarize::error::{SummarizeError, SummarizeResult};
use crate::summarize::model::{ModelProvider, SummaryModel};

/// Builds [`GroqModel`]s from a user credential.
#[derive(Clone, Debug)]
pub struct GroqProvider {
    config: LlmConfig,
}

impl GroqProvider {
    /// Create a provider for the configured model.
    #[must_use]
    pub const fn new(config: LlmConfig) -> Self {
        Self { config }
    }
}

impl ModelProvider for GroqProvider {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn model_for(&self, api_key: &str) -> SummarizeResult<Box<dyn SummaryModel>> {
        if api_key.trim().is_empty() {
            return Err(SummarizeError::MissingApiKey);
        }

        let builder = groq::Client::<ReqwestClient>::builder().api_key(api_key.trim());
        let builder = if let Some(base_url) = &self.config.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build()?;
        let model = client.completion_model(self.config.model.clone());

        Ok(Box::new(GroqModel {
            model,
            name: self.config.model.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }))
    }
}

/// A Groq chat model bound to one credential.
pub struct GroqModel {
    model: groq::CompletionModel,
    name: String,
    temperature: f64,
    max_tokens: Option<u64>,
}

#[async_trait]
impl SummaryModel for GroqModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> SummarizeResult<String> {
        debug!("Sending {} prompt chars to {}", prompt.chars().count(), self.name);

        let request = self
            .model
            .completion_request(prompt.to_string())
            .temperature(self.temperature)
            .max_tokens_opt(self.max_tokens)
            .build();

        let response = self.model.completion(request).await?;
        Ok(extract_text(&response.choice))
    }
}

/// Extract text from assistant response.
fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}
