//! Conversational retrieval chain.
//!
//! One chat turn runs three steps against the transcript index:
//! condense the follow-up question into a standalone question using prior
//! history (skipped when there is no history), retrieve the top-k chunks for
//! the standalone question, then generate an answer from chunks + question.

use crate::config::{ChainSettings, Prompts};
use crate::error::{PrataError, Result};
use crate::index::{RetrievedChunk, TranscriptIndex};
use crate::openai::create_client;
use crate::session::ChatTurn;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Trait for answering a question against a transcript index.
///
/// The web layer depends on this seam so tests can substitute a canned
/// implementation for the OpenAI-backed chain.
#[async_trait]
pub trait Chain: Send + Sync {
    /// Answer a question, using prior history for context.
    async fn run(
        &self,
        index: &TranscriptIndex,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String>;
}

/// Orchestrates condense, retrieve, and answer generation for one question.
pub struct ConversationalChain {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    top_k: usize,
    prompts: Prompts,
}

impl ConversationalChain {
    /// Create a new chain from settings.
    pub fn new(settings: &ChainSettings, prompts: Prompts) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            top_k: settings.top_k,
            prompts,
        }
    }

    /// Rewrite a follow-up question into a standalone question.
    async fn condense(&self, question: &str, history: &[ChatTurn]) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("chat_history".to_string(), format_history(history));
        vars.insert("question".to_string(), question.to_string());

        let prompt = Prompts::render(&self.prompts.chain.condense, &vars);
        let standalone = self.complete(prompt).await?;

        debug!("Condensed question: {}", standalone);
        Ok(standalone)
    }

    /// Generate an answer from retrieved chunks plus the question.
    async fn generate(&self, question: &str, chunks: &[RetrievedChunk]) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), format_context(chunks));
        vars.insert("question".to_string(), question.to_string());

        let prompt = Prompts::render(&self.prompts.chain.answer, &vars);
        self.complete(prompt).await
    }

    /// Single chat-completion call with one user message.
    async fn complete(&self, content: String) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PrataError::Chain(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| PrataError::Chain(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PrataError::OpenAI(format!("Chat completion failed: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| PrataError::Chain("Empty response from LLM".to_string()))
    }
}

#[async_trait]
impl Chain for ConversationalChain {
    #[instrument(skip(self, index, history), fields(question = %question))]
    async fn run(
        &self,
        index: &TranscriptIndex,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String> {
        info!("Processing question");

        let standalone = if history.is_empty() {
            question.to_string()
        } else {
            self.condense(question, history).await?
        };

        let retrieved = index.retrieve(&standalone, self.top_k).await?;
        debug!("Retrieved {} chunks", retrieved.len());

        self.generate(&standalone, &retrieved).await
    }
}

/// Format chat history for the condense prompt.
fn format_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.speaker, turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format retrieved chunks for the answer prompt.
fn format_context(chunks: &[RetrievedChunk]) -> String {
    if chunks.is_empty() {
        return "(no relevant transcript excerpts found)".to_string();
    }

    chunks
        .iter()
        .map(|c| c.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
