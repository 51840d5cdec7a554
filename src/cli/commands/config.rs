//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", render_redacted(&settings)?);
        }

        ConfigAction::Init => {
            let config_path = Settings::default_config_path();

            if config_path.exists() {
                Output::warning(&format!("Config already exists at {}", config_path.display()));
                return Ok(());
            }

            // Credentials stay in the environment.
            let mut settings = settings;
            settings.chat.api_key = None;
            settings.render.api_key = None;
            settings.search.api_key = None;
            settings.save()?;
            Output::success(&format!("Created default config at {}", config_path.display()));
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Serialize settings with credentials replaced.
fn render_redacted(settings: &Settings) -> Result<String> {
    let mut settings = settings.clone();
    for key in [
        &mut settings.chat.api_key,
        &mut settings.render.api_key,
        &mut settings.search.api_key,
    ] {
        if key.is_some() {
            *key = Some("<redacted>".to_string());
        }
    }

    toml::to_string_pretty(&settings)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
}
