//! CLI output formatting utilities.

use crate::chat::Message;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a numbered plan step.
    pub fn step(index: usize, msg: &str) {
        println!("  {} {}", style(format!("{}.", index)).cyan().bold(), msg);
    }

    /// Print one message of an agent conversation.
    pub fn message(message: &Message) {
        match message {
            Message::User { content } => {
                println!("\n{} {}", style("user").bold(), content);
            }
            Message::Assistant {
                content,
                tool_calls,
            } => {
                if let Some(text) = content {
                    println!("\n{} {}", style("assistant").green().bold(), text);
                }
                for call in tool_calls {
                    println!(
                        "\n{} {}",
                        style("assistant").green().bold(),
                        style(truncate(&call.to_string(), 120)).dim()
                    );
                }
            }
            Message::Tool { name, content, .. } => {
                println!(
                    "\n{} {}",
                    style(format!("tool:{}", name)).yellow().bold(),
                    truncate(content, 300)
                );
            }
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(template);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis, on a character boundary.
pub fn truncate(content: &str, max_len: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_len {
        content
    } else {
        let cut: String = content.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
