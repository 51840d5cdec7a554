//! CLI command implementations.

mod agent;
mod config;
mod doctor;
mod plan;
mod serve;

pub use agent::run_agent;
pub use config::run_config;
pub use doctor::run_doctor;
pub use plan::run_plan;
pub use serve::{router, run_serve, shutdown_signal};
