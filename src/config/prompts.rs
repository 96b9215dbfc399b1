//! Prompt templates for Prata.

use serde::{Deserialize, Serialize};

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub chain: ChainPrompts,
}

/// Prompts for the conversational chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainPrompts {
    /// Rewrites a follow-up question into a standalone question.
    pub condense: String,
    /// Answers a question from retrieved transcript context.
    pub answer: String,
}

impl Default for ChainPrompts {
    fn default() -> Self {
        Self {
            condense: r#"Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question.

Chat History:
{{chat_history}}
Follow Up Input: {{question}}
Standalone question:"#
                .to_string(),

            answer: r#"You are a helpful assistant answering questions about a video based on its transcript.

Use the following pieces of the transcript to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.

{{context}}

Question: {{question}}
Helpful Answer:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}
