//! User-facing status lines. Everything the CLI reports goes through here
//! so colour handling stays in one place.

use std::fmt;
use std::sync::OnceLock;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";
const ICON_SYNC: &str = "🔄";

/// Colours are dropped when `NO_COLOR` is set.
fn colored() -> bool {
    static COLORED: OnceLock<bool> = OnceLock::new();
    *COLORED.get_or_init(|| std::env::var_os("NO_COLOR").is_none())
}

fn paint(color: &str, icon: &str, msg: &dyn fmt::Display) -> String {
    if colored() {
        format!("{}{}{} {}{}", color, BOLD, icon, RESET, msg)
    } else {
        format!("{} {}", icon, msg)
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", paint(FG_BLUE, ICON_INFO, &msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", paint(FG_GREEN, ICON_OK, &msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", paint(FG_YELLOW, ICON_WARN, &msg));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", paint(FG_RED, ICON_ERR, &msg));
}

/// Progress line of a sync step.
pub fn sync_step<T: fmt::Display>(msg: T) {
    println!("{}", paint(FG_BLUE, ICON_SYNC, &msg));
}

/// Secondary, indented detail under a previous message.
pub fn detail<T: fmt::Display>(msg: T) {
    if colored() {
        println!("   {}{}{}", DIM, msg, RESET);
    } else {
        println!("   {}", msg);
    }
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    if colored() {
        println!("{}{}== {} =={}\n", FG_BLUE, BOLD, msg, RESET);
    } else {
        println!("== {} ==\n", msg);
    }
}
