//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Reelsmith Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Credentials").bold());
    let credential_checks = vec![
        check_key(
            "OPENAI_API_KEY",
            settings.chat.api_key.as_deref(),
            Some("sk-"),
            true,
        ),
        check_key("RENDER_API_KEY", settings.render.api_key.as_deref(), None, true),
        check_key(
            "TAVILY_API_KEY",
            settings.search.api_key.as_deref(),
            Some("tvly-"),
            false,
        ),
    ];
    for check in &credential_checks {
        check.print();
    }
    checks.extend(credential_checks);

    println!();

    println!("{}", style("Endpoints").bold());
    let endpoint_checks = vec![
        check_url("Render service", &settings.render.base_url),
        check_url("Search API", &settings.search.base_url),
    ];
    for check in &endpoint_checks {
        check.print();
    }
    checks.extend(endpoint_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![check_config_file(), check_poll_bound(settings)];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before serving.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Reelsmith is ready to serve.");
    }

    Ok(())
}

/// Check that an API key is present, masking it in the output.
fn check_key(name: &str, value: Option<&str>, prefix: Option<&str>, required: bool) -> CheckResult {
    let hint = format!("Set with: export {}='...'", name);
    match value.map(str::trim) {
        Some(key) if !key.is_empty() => {
            if prefix.is_some_and(|p| !key.starts_with(p)) {
                return CheckResult::warning(name, "set but format looks unusual", &hint);
            }
            CheckResult::ok(name, &format!("configured ({})", mask(key)))
        }
        _ if required => CheckResult::error(name, "not set", &hint),
        _ => CheckResult::warning(name, "not set (search ability will fail)", &hint),
    }
}

/// Check that an endpoint parses as an http(s) URL.
fn check_url(name: &str, value: &str) -> CheckResult {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => CheckResult::ok(name, value),
        Ok(url) => CheckResult::error(
            name,
            &format!("unsupported scheme '{}'", url.scheme()),
            "Use an http:// or https:// URL",
        ),
        Err(e) => CheckResult::error(name, &format!("invalid URL: {}", e), "Fix the URL in the config file"),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: reelsmith config init",
        )
    }
}

/// Warn when render polling has no upper bound.
fn check_poll_bound(settings: &Settings) -> CheckResult {
    match settings.render.max_poll_attempts {
        0 => CheckResult::warning(
            "Render polling",
            "unbounded (a stuck render blocks its request forever)",
            "Set render.max_poll_attempts to a positive number",
        ),
        n => CheckResult::ok(
            "Render polling",
            &format!("every {}ms, at most {} checks", settings.render.poll_interval_ms, n),
        ),
    }
}

/// Mask a secret, keeping a short prefix and suffix.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
