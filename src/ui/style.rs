//! ANSI palette for the console reporter.

use crate::http::HttpMethod;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const TEXT_MUTED: &str = "\x1b[90m";
pub const PRIMARY: &str = "\x1b[32m";
pub const WARNING: &str = "\x1b[33m";
pub const DANGER: &str = "\x1b[31m";

pub const METHOD_GET: &str = "\x1b[32m";
pub const METHOD_POST: &str = "\x1b[33m";

pub fn method_color(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => METHOD_GET,
        HttpMethod::Post => METHOD_POST,
    }
}

/// Returns a color based on the HTTP status class.
pub fn status_code_color(status: u16) -> &'static str {
    match status {
        200..=299 => PRIMARY,
        300..=399 => WARNING,
        400..=599 => DANGER,
        _ => RESET,
    }
}

/// Wrap `text` in `color` when `enabled`.
pub fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}
