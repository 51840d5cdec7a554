//! Reelsmith - an agent server for narrated short videos
//!
//! A small HTTP server that drives a chat-completion model and an external
//! video render service.
//!
//! # Overview
//!
//! Reelsmith exposes two routes:
//! - `GET /simple` asks the model for an ordered plan toward a fixed objective
//! - `GET /tools` runs a tool-calling agent that can search the web, post a
//!   (stubbed) tweet and render a narrated video, and returns the whole
//!   conversation
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `chat` - Chat model trait, message history, OpenAI implementation
//! - `plan` - Plan prompt and schema-guided parsing
//! - `agent` - Abilities and the model/tools loop
//! - `render` - Render service client and the status polling loop
//! - `search` - Web search provider
//! - `orchestrator` - Wiring of the services into plan and agent runs
//! - `cli` - Commands, including the HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use reelsmith::config::Settings;
//! use reelsmith::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!
//!     let plan = orchestrator.generate_plan().await?;
//!     for step in &plan.steps {
//!         println!("- {}", step);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod plan;
pub mod render;
pub mod search;

#[cfg(test)]
mod testing;

pub use error::{ReelsmithError, Result};
