//! Agent system for task execution with ability calling.
//!
//! Provides an LLM agent that can search the web, post tweets and render
//! narrated videos, looping between the model and its abilities until the
//! model answers without requesting any.

mod runner;
mod tools;

pub use runner::{route_after_model, AgentGraph, AgentRun, Route, DEFAULT_MAX_ITERATIONS};
pub use tools::{ability_definitions, parse_ability_call, AbilityCall, AbilityContext, AbilityOutput};
