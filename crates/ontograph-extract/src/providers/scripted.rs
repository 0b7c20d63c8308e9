//! Offline provider replaying canned responses

use std::collections::VecDeque;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::extractor::RelationExtractor;

/// Answers each prompt with the next queued response.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedProvider {
    pub fn new(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// `(model, prompt)` pairs received so far.
    pub async fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl RelationExtractor for ScriptedProvider {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .await
            .push((model.to_string(), prompt.to_string()));
        match self.responses.lock().await.pop_front() {
            Some(response) => Ok(response),
            None => anyhow::bail!("Scripted provider has no responses left"),
        }
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}
