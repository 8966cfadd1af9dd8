//! Human-readable progress output

use colored::Colorize;
use tracing::info;

/// One-way sink for progress lines. Writing to it never affects control flow.
pub trait StatusSink: Send + Sync {
    /// Replace the current status line
    fn update(&self, message: &str);

    /// Report a completed step
    fn step_ok(&self, message: &str);
}

/// Prints status lines to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalStatus;

impl StatusSink for TerminalStatus {
    fn update(&self, message: &str) {
        info!("{}", message);
        println!("{} {}", "->".cyan(), message);
    }

    fn step_ok(&self, message: &str) {
        info!("{}", message);
        println!("{} {}", "✓".green().bold(), message);
    }
}
