//! HTTP-backed generation collaborator.
//!
//! Thin JSON wrapper around a chat-completion style endpoint: build a
//! prompt, POST it, and decode the model's reply as the JSON shape each
//! operation expects. Anything that fails to decode is a malformed-payload
//! error, distinct from transport failures.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::domain::{AugmentContext, RawHierarchy};
use crate::infrastructure::traits::{GenerationError, GenerationService};

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

/// Generation client talking JSON to a configured chat endpoint.
pub struct HttpGenerationClient {
    client: reqwest::Client,
    endpoint: String,
    api_key_env: String,
    model: String,
}

impl HttpGenerationClient {
    pub fn new(settings: &Settings) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: settings.generation_endpoint.clone(),
            api_key_env: settings.api_key_env.clone(),
            model: settings.model.clone(),
        })
    }

    // resolved per request, so offline commands never need the key
    fn api_key(&self) -> Result<String, GenerationError> {
        std::env::var(&self.api_key_env)
            .map_err(|_| GenerationError::Network(format!("{} not set", self.api_key_env)))
    }

    #[instrument(skip_all)]
    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, GenerationError> {
        let api_key = self.api_key()?;
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Network(format!("API error {}: {}", status, body)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        chat.content
            .first()
            .map(|block| strip_code_fence(&block.text).to_string())
            .ok_or_else(|| GenerationError::Malformed("empty completion".to_string()))
    }
}

/// Models wrap JSON in markdown fences often enough to handle it here.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn decode<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, GenerationError> {
    serde_json::from_str(text).map_err(|e| GenerationError::Malformed(e.to_string()))
}

#[async_trait]
impl GenerationService for HttpGenerationClient {
    async fn generate_hierarchy(
        &self,
        seed_keywords: &[String],
        instructions: &str,
    ) -> Result<RawHierarchy, GenerationError> {
        let prompt = format!(
            r#"Build a three-level SEO keyword taxonomy for these seed keywords: {seeds}.
Additional instructions: {instructions}

Respond with JSON only, in this shape:
{{"entries":[{{"keyword":"...","category":"Traffic|Comparison|Conversion","page_kind":"...","children":[{{"keyword":"...","stage":"Awareness|Decision|Trust|Action","terms":["..."]}}]}}]}}"#,
            seeds = seed_keywords.join(", "),
        );
        let text = self.complete(prompt, 4000).await?;
        debug!("hierarchy response: {} bytes", text.len());
        decode(&text)
    }

    async fn generate_terms(
        &self,
        context: &AugmentContext,
    ) -> Result<Vec<String>, GenerationError> {
        let prompt = format!(
            r#"Suggest additional LSI terms for the keyword "{kw}" (funnel stage: {stage})
within the topic group "{group}" (category: {cat}).
Seed keywords: {seeds}. Instructions: {instructions}
Do NOT repeat any of these existing terms: {existing}.

Respond with a JSON array of strings only."#,
            kw = context.level2_keyword,
            stage = context.stage.label(),
            group = context.level1_keyword,
            cat = context.category.label(),
            seeds = context.seed_keywords.join(", "),
            instructions = context.instructions,
            existing = context.existing_terms.join(", "),
        );
        let text = self.complete(prompt, 1000).await?;
        decode(&text)
    }

    async fn translate_many(
        &self,
        texts: &[String],
        target_language: &str,
    ) -> Result<BTreeMap<String, String>, GenerationError> {
        let payload = serde_json::to_string(texts)
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;
        let prompt = format!(
            r#"Translate each of these keywords into {target_language}: {payload}
Respond with a JSON object mapping each source text to its translation, nothing else."#,
        );
        let text = self.complete(prompt, 2000).await?;
        decode(&text)
    }
}
