//! Plan command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the plan command.
pub async fn run_plan(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Plan, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'reelsmith doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(&settings)?;

    Output::header("Objective");
    println!("  {}", orchestrator.objective());

    let spinner = Output::spinner("Planning...");

    match orchestrator.generate_plan().await {
        Ok(plan) => {
            spinner.finish_and_clear();

            Output::header(&format!("Plan ({} steps)", plan.steps.len()));
            for (i, step) in plan.steps.iter().enumerate() {
                Output::step(i + 1, step);
            }
            println!();
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Planning failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
