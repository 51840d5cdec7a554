//! Agent command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{truncate, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the agent command.
pub async fn run_agent(json: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Agent, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'reelsmith doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(&settings)?;

    let spinner = Output::spinner("Agent working...");

    match orchestrator.run_agent().await {
        Ok(run) => {
            spinner.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&run)?);
                return Ok(());
            }

            for message in &run.messages {
                Output::message(message);
            }
            println!();

            let calls = run.ability_calls();
            if !calls.is_empty() {
                Output::header(&format!("Ability calls ({})", calls.len()));
                for call in calls {
                    Output::kv(&call.name, &truncate(&call.arguments, 60));
                }
                println!();
            }

            Output::info(&format!("Completed in {} iteration(s)", run.iterations));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
