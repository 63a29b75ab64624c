// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Terminal color utilities
//!
//! Status lines share one look across commands.

use colored::Colorize;

/// Whether output should be colored
pub fn should_use_colors() -> bool {
    // https://no-color.org
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::env::var("TERM").map_or(false, |term| term != "dumb")
}

/// Print a success check
pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print a warning
pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Print an info item
pub fn print_info(msg: &str) {
    println!("  {} {}", "→".blue(), msg.dimmed());
}
