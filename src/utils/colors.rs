/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Due-state color of a trackable:
/// overdue → red
/// due today → yellow
/// otherwise → reset
pub fn color_for_due(is_overdue: bool, due_today: bool) -> &'static str {
    if is_overdue {
        RED
    } else if due_today {
        YELLOW
    } else {
        RESET
    }
}

/// Balance color: negative → red, positive → green, zero → reset.
pub fn color_for_balance(value: f64) -> &'static str {
    if value < 0.0 {
        RED
    } else if value > 0.0 {
        GREEN
    } else {
        RESET
    }
}

/// Grey out empty placeholders ("" or "--").
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
