//! ANSI styling helpers for terminal output.

use crossterm::style::Stylize;

/// Black-on-green banner text.
pub fn success(msg: &str) -> String {
    format!("{}", msg.black().on_green())
}

/// Black-on-red banner text.
pub fn fail(msg: &str) -> String {
    format!("{}", msg.black().on_red())
}

pub fn yellow(msg: &str) -> String {
    format!("{}", msg.yellow())
}

pub fn green(msg: &str) -> String {
    format!("{}", msg.green())
}

pub fn red(msg: &str) -> String {
    format!("{}", msg.red())
}
