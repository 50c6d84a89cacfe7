//! Consent window parsing and display formatting
//!
//! The window comes from a `datetime-local` input, so it carries no zone:
//! its hour is already the student's local hour. Formatting is pluggable via
//! [`WindowFormatter`] so no locale machinery leaks into derivation.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Accepted window shapes, tried in order
const WINDOW_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a raw consent window
///
/// Returns `None` for empty or unparsable input.
#[must_use]
pub fn parse_window(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    WINDOW_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Render a receipt timestamp as RFC 3339 UTC with millisecond precision
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Turns a parsed consent window into a display string
pub trait WindowFormatter {
    /// Format a window for the notify label
    fn format_window(&self, at: &NaiveDateTime) -> String;
}

/// Short weekday and 24-hour time, e.g. `Sun 07:59`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortWeekdayFormatter;

impl WindowFormatter for ShortWeekdayFormatter {
    fn format_window(&self, at: &NaiveDateTime) -> String {
        at.format("%a %H:%M").to_string()
    }
}

/// Formatter driven by a chrono format pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFormatter {
    pattern: String,
}

impl PatternFormatter {
    /// Create from a `strftime`-style pattern
    #[inline]
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// The pattern in use
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl WindowFormatter for PatternFormatter {
    fn format_window(&self, at: &NaiveDateTime) -> String {
        use std::fmt::Write;

        // chrono reports bad specifiers through fmt::Error
        let mut out = String::new();
        if write!(out, "{}", at.format(&self.pattern)).is_err() {
            tracing::warn!("Invalid window pattern: {}", self.pattern);
            return ShortWeekdayFormatter.format_window(at);
        }
        out
    }
}

impl<F: WindowFormatter + ?Sized> WindowFormatter for &F {
    fn format_window(&self, at: &NaiveDateTime) -> String {
        (**self).format_window(at)
    }
}

impl<F: WindowFormatter + ?Sized> WindowFormatter for Box<F> {
    fn format_window(&self, at: &NaiveDateTime) -> String {
        (**self).format_window(at)
    }
}
