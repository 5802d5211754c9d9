use crossterm::style::{Color, Stylize};

use crate::security::diff::{Change, render_value};

/// Plain `> path: old -> new` line for one change.
pub fn format_change(change: &Change) -> String {
    let path = change.path();
    match change {
        Change::Modified { old, new, .. } => format!(
            "> {}: {} -> {}",
            path,
            render_value(old),
            render_value(new)
        ),
        Change::Added { new, .. } => format!("> {}: {} (added)", path, render_value(new)),
        Change::TypeChanged { new, .. } => {
            format!("> {}: {} (type changed)", path, render_value(new))
        }
    }
}

/// Print the change list with colors, one line per change.
pub fn print_changes(changes: &[Change]) {
    println!("{}", "--- Diff (lines starting with '>' are changed) ---".bold());
    for change in changes {
        let line = format_change(change);
        let colored = match change {
            Change::Modified { .. } => line.with(Color::Yellow),
            Change::Added { .. } => line.with(Color::Green),
            Change::TypeChanged { .. } => line.with(Color::Magenta),
        };
        println!("{}", colored);
    }
}
