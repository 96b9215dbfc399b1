//! Configuration module for Prata.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ChainPrompts, Prompts};
pub use settings::{
    ChainSettings, ChunkingSettings, EmbeddingSettings, ServerSettings, SessionSettings, Settings,
};
