//! Error rendering using miette
//!
//! Load errors have no source spans to point at, so a report is the message,
//! the diagnostic code, the cause chain and any help text.

use crate::Error;
use miette::{GraphicalReportHandler, GraphicalTheme};
use std::io::Write;

const REPORT_WIDTH: usize = 120;

/// Render an error with formatting to stderr
pub fn render_error(error: &Error) {
    let rendered = render_with_theme(error, GraphicalTheme::default());
    let _ = std::io::stderr().write_all(rendered.as_bytes());
}

/// Render an error to a String (useful for logs, UIs, etc.)
pub fn render_error_to_string(error: &Error) -> String {
    render_with_theme(error, GraphicalTheme::unicode())
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error) -> String {
    render_with_theme(error, GraphicalTheme::unicode_nocolor())
}

fn render_with_theme(error: &Error, theme: GraphicalTheme) -> String {
    let mut out = String::new();
    if GraphicalReportHandler::new_themed(theme)
        .with_width(REPORT_WIDTH)
        .render_report(&mut out, error)
        .is_err()
    {
        // Fall back to the plain message.
        out = format!("{}\n", error);
    }
    out
}
