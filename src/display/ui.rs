use anyhow::Result;
use crossterm::style::{Color, Stylize};
use serde::Serialize;

/// Print a success message with green text
pub fn success(message: &str) {
    println!("{} {}", "SUCCESS:".with(Color::Green).bold(), message);
}

/// Print an error message with red text
pub fn error(message: &str) {
    eprintln!("{}   {}", "ERROR:".with(Color::Red).bold(), message);
}

/// Print a warning message with yellow text
pub fn warning(message: &str) {
    println!("{} {}", "WARNING:".with(Color::Yellow).bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{}    {}", "INFO:".with(Color::Blue).bold(), message);
}

/// Per-item diagnostic line on stderr, kept apart from data on stdout.
pub fn diagnostic(message: &str) {
    eprintln!("{}   {}", "DIAG:".with(Color::Magenta), message);
}

/// Print data as JSON
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
