//! Ollama chat provider

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::extractor::RelationExtractor;

pub const DEFAULT_HOST: &str = "http://localhost:11434";

pub struct OllamaProvider {
    client: reqwest::Client,
    host: String,
}

impl OllamaProvider {
    /// `host` wins over `OLLAMA_HOST`, which wins over the local default.
    pub fn new(host: Option<String>) -> Self {
        let host = host
            .or_else(|| std::env::var("OLLAMA_HOST").ok())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        Self {
            client: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Result<Self> {
        self.client = reqwest::Client::builder()
            .timeout(Duration::from_secs(seconds))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(self)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[async_trait::async_trait]
impl RelationExtractor for OllamaProvider {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        tracing::debug!(url = %self.chat_url(), model, "Sending chat request");
        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Ollama")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama API error ({}): {}", status, error_text);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response JSON")?;
        Ok(chat.message.content)
    }

    fn name(&self) -> &str {
        "Ollama"
    }
}
