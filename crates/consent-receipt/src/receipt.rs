//! Consent receipts
//!
//! A [`Receipt`] is an immutable snapshot of a [`ConsentSelection`] rendered
//! through the label rules, stamped with a random [`ReceiptId`] and the time
//! the caller supplies.
//!
//! Building a receipt is **not** idempotent: every call draws a fresh
//! identifier. All other content is a pure function of the selection and the
//! timestamp.
//!
//! # Example
//!
//! ```rust
//! use consent_receipt::{ConsentSelection, ReceiptDeriver, RngIdSource};
//! use chrono::{TimeZone, Utc};
//!
//! let deriver = ReceiptDeriver::default();
//! let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
//! let receipt = deriver.build_receipt(&ConsentSelection::new(), now, &mut RngIdSource::seeded(1));
//! assert!(receipt.to_text().contains("status: Active (2025-06-01T09:30:00.000Z)"));
//! ```

use crate::config::{DeriverConfig, RECEIPT_VERSION};
use crate::derive::{derive_notify_label, format_notified_line, is_outside_operating_hours, mark};
use crate::error::ConsentError;
use crate::format::{format_timestamp, PatternFormatter, ShortWeekdayFormatter, WindowFormatter};
use crate::id::{ReceiptId, ReceiptIdSource};
use crate::route::Route;
use crate::selection::{ConsentSelection, ExpiryDays};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Title line of every receipt document
pub const RECEIPT_TITLE: &str = "consent_receipt";

/// Screening band shown on the results screen
pub const SCREENING_BAND: &str = "Attention needed";

/// Illustrative screening index shown on the results screen
pub const SCREENING_INDEX: &str = "0.62";

/// Immutable consent receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    id: ReceiptId,
    version: String,
    route: Route,
    expiry_days: ExpiryDays,
    notify: String,
    notified: String,
    acknowledged: bool,
    band: &'static str,
    index: &'static str,
    withdrawn: bool,
    generated_at: DateTime<Utc>,
}

impl Receipt {
    /// Receipt identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> ReceiptId {
        self.id
    }

    /// Format version tag
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Route at generation time
    #[inline]
    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    /// Derived notify label
    #[inline]
    #[must_use]
    pub fn notify_label(&self) -> &str {
        &self.notify
    }

    /// Notified-contacts line
    #[inline]
    #[must_use]
    pub fn notified_line(&self) -> &str {
        &self.notified
    }

    /// Whether the disclaimer was acknowledged
    #[inline]
    #[must_use]
    pub fn acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Whether consent was withdrawn
    #[inline]
    #[must_use]
    pub fn withdrawn(&self) -> bool {
        self.withdrawn
    }

    /// Generation timestamp supplied by the caller
    #[inline]
    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// `Withdrawn (<ts>)` or `Active (<ts>)`
    #[must_use]
    pub fn status_line(&self) -> String {
        let state = if self.withdrawn { "Withdrawn" } else { "Active" };
        format!("{state} ({})", format_timestamp(&self.generated_at))
    }

    /// Everything except the identifier, for comparing two receipts
    #[must_use]
    pub fn body(&self) -> String {
        let text = self.to_text();
        text.lines()
            .filter(|line| !line.starts_with("receipt_id: "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the text document
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// UTF-8 bytes of the text document
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_text().into_bytes()
    }

    /// Structured snapshot as pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, ConsentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Display for Receipt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RECEIPT_TITLE}")?;
        writeln!(f, "receipt_id: {}", self.id)?;
        writeln!(f, "version: {}", self.version)?;
        writeln!(f, "route: {}", self.route)?;
        writeln!(f, "expiry_days: {}", self.expiry_days)?;
        writeln!(f, "notify: {}", self.notify)?;
        writeln!(f, "notified: {}", self.notified)?;
        writeln!(f, "acknowledged: {}", mark(self.acknowledged))?;
        writeln!(f, "band: {}", self.band)?;
        writeln!(f, "index: {}", self.index)?;
        write!(f, "status: {}", self.status_line())
    }
}

/// Build a receipt with the default version tag
///
/// Draws a new identifier from `ids` on every call.
#[must_use]
pub fn build_receipt<S, F>(
    selection: &ConsentSelection,
    now: DateTime<Utc>,
    ids: &mut S,
    formatter: &F,
) -> Receipt
where
    S: ReceiptIdSource + ?Sized,
    F: WindowFormatter + ?Sized,
{
    build_versioned(selection, now, ids, formatter, RECEIPT_VERSION)
}

fn build_versioned<S, F>(
    selection: &ConsentSelection,
    now: DateTime<Utc>,
    ids: &mut S,
    formatter: &F,
    version: &str,
) -> Receipt
where
    S: ReceiptIdSource + ?Sized,
    F: WindowFormatter + ?Sized,
{
    let receipt = Receipt {
        id: ReceiptId::generate(ids),
        version: version.to_string(),
        route: selection.route,
        expiry_days: selection.expiry_days,
        notify: derive_notify_label(selection.notify_timing, &selection.custom_window, formatter),
        notified: format_notified_line(&selection.selected_contacts),
        acknowledged: selection.acknowledged,
        band: SCREENING_BAND,
        index: SCREENING_INDEX,
        withdrawn: selection.withdrawn,
        generated_at: now,
    };
    tracing::debug!("Built receipt {} for route {}", receipt.id, receipt.route);
    receipt
}

/// Derivation bound to a configuration and window formatter
pub struct ReceiptDeriver {
    config: DeriverConfig,
    formatter: Box<dyn WindowFormatter + Send + Sync>,
}

impl ReceiptDeriver {
    /// Create from configuration
    ///
    /// Uses a [`PatternFormatter`] when the config names a window pattern,
    /// otherwise [`ShortWeekdayFormatter`].
    #[must_use]
    pub fn new(config: DeriverConfig) -> Self {
        let formatter: Box<dyn WindowFormatter + Send + Sync> = match &config.window_pattern {
            Some(pattern) => Box::new(PatternFormatter::new(pattern.clone())),
            None => Box::new(ShortWeekdayFormatter),
        };
        Self { config, formatter }
    }

    /// Replace the window formatter
    #[must_use]
    pub fn with_formatter(mut self, formatter: impl WindowFormatter + Send + Sync + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DeriverConfig {
        &self.config
    }

    /// Notify label for a selection
    #[must_use]
    pub fn notify_label(&self, selection: &ConsentSelection) -> String {
        derive_notify_label(
            selection.notify_timing,
            &selection.custom_window,
            &*self.formatter,
        )
    }

    /// Whether a selection's custom window falls outside operating hours
    ///
    /// Always `false` unless timing is custom.
    #[must_use]
    pub fn window_outside_hours(&self, selection: &ConsentSelection) -> bool {
        let hours = self.config.operating_hours;
        selection
            .effective_window()
            .is_some_and(|window| is_outside_operating_hours(window, hours.start_hour, hours.end_hour))
    }

    /// Build a receipt stamped with the configured version tag
    #[must_use]
    pub fn build_receipt<S>(&self, selection: &ConsentSelection, now: DateTime<Utc>, ids: &mut S) -> Receipt
    where
        S: ReceiptIdSource + ?Sized,
    {
        build_versioned(
            selection,
            now,
            ids,
            &*self.formatter,
            &self.config.receipt_version,
        )
    }
}

impl Default for ReceiptDeriver {
    fn default() -> Self {
        Self::new(DeriverConfig::default())
    }
}

impl fmt::Debug for ReceiptDeriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiptDeriver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
