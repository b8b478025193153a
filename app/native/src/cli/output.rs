//! CLI output formatting utilities.
//!
//! - Tables for rectangles and windows
//! - JSON syntax highlighting

use std::fmt::Write as _;

use colored::Colorize;
use serde_json::Value;

use crate::tiling::Rect;

const INDENT: &str = "  ";

/// Prints JSON with syntax highlighting.
///
/// Keys are cyan, strings green, numbers yellow, booleans and null magenta.
pub fn print_highlighted_json(value: &Value) { println!("{}", highlight_json(value)); }

/// Renders JSON with syntax highlighting.
#[must_use]
pub fn highlight_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str(&"null".magenta().to_string()),
        Value::Bool(b) => out.push_str(&b.to_string().magenta().to_string()),
        Value::Number(n) => out.push_str(&n.to_string().yellow().to_string()),
        Value::String(s) => out.push_str(&quote(s).green().to_string()),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str(&"[".white().bold().to_string());
            for (i, item) in items.iter().enumerate() {
                separator(out, i, depth + 1);
                write_value(out, item, depth + 1);
            }
            close(out, "]", depth);
        }
        Value::Object(map) => {
            out.push_str(&"{".white().bold().to_string());
            for (i, (key, item)) in map.iter().enumerate() {
                separator(out, i, depth + 1);
                let _ = write!(out, "{}: ", quote(key).cyan());
                write_value(out, item, depth + 1);
            }
            close(out, "}", depth);
        }
    }
}

fn separator(out: &mut String, index: usize, depth: usize) {
    if index > 0 {
        out.push(',');
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
}

fn close(out: &mut String, bracket: &str, depth: usize) {
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    out.push_str(&bracket.white().bold().to_string());
}

fn quote(s: &str) -> String { Value::String(s.to_string()).to_string() }

/// Formats a rectangle as `left,top widthxheight`.
#[must_use]
pub fn format_rect(rect: &Rect) -> String {
    format!("{},{} {}x{}", rect.left, rect.top, rect.width, rect.height)
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
