//! Prata - Chat with a YouTube video's transcript
//!
//! A small web application: paste a video URL, and an AI assistant answers
//! questions grounded in that video's transcript.
//!
//! The name "Prata" comes from the Scandinavian word for "chat."
//!
//! # Overview
//!
//! Prata lets you:
//! - Submit a YouTube video URL and fetch its caption transcript
//! - Index the transcript in an in-memory embedding index
//! - Ask questions in the browser and get answers grounded in the transcript,
//!   with follow-up questions condensed against the conversation history
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `transcript` - Transcript fetching (YouTube captions)
//! - `splitter` - Transcript splitting into overlapping chunks
//! - `embedding` - Embedding generation
//! - `index` - In-memory similarity index with a per-video cache
//! - `chain` - Conversational chain (condense, retrieve, answer)
//! - `session` - Signed-cookie session state
//! - `orchestrator` - Pipeline coordination
//! - `web` - HTTP routes and templates
//!
//! # Example
//!
//! ```rust,no_run
//! use prata::config::Settings;
//! use prata::web::{app, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let addr = format!("{}:{}", settings.server.host, settings.server.port);
//!     let state = AppState::new(settings);
//!
//!     let listener = tokio::net::TcpListener::bind(&addr).await?;
//!     axum::serve(listener, app(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod openai;
pub mod orchestrator;
pub mod session;
pub mod splitter;
pub mod transcript;
pub mod web;

pub use error::{PrataError, Result};
