//! CLI theme and styling.

use colored::Colorize;

/// Console styling for operator-facing messages.
pub struct Theme;

impl Theme {
    /// Format a header.
    #[must_use]
    pub fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    #[must_use]
    pub fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    #[must_use]
    pub fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    #[must_use]
    pub fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    #[must_use]
    pub fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    /// Format a dimmed message.
    #[must_use]
    pub fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a key-value pair.
    #[must_use]
    pub fn kv(key: &str, value: &str) -> String {
        format!("  {:<13} {}", format!("{key}:").bold(), value)
    }

    /// Format a separator line.
    #[must_use]
    pub fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }
}
