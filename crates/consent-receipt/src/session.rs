//! Interactive consent session
//!
//! [`ConsentSession`] owns the mutable selection for one sitting and exposes
//! each user interaction as an explicit operation. Every operation logs and
//! leaves a status message for the interaction layer to announce.

use crate::error::ConsentError;
use crate::export::ReceiptSink;
use crate::id::ReceiptIdSource;
use crate::receipt::{Receipt, ReceiptDeriver};
use crate::route::Route;
use crate::selection::{ConsentSelection, ContactKind, ExpiryDays, NotifyTiming};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// `when` value for a custom timing with no window yet
pub const TIME_PENDING: &str = "time pending";

/// Snapshot handed over when the student confirms a referral
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferralBundle {
    /// Keys of selected contacts, fixed order
    pub who: Vec<ContactKind>,
    /// Timing key, the raw custom window, or [`TIME_PENDING`]
    pub when: String,
    /// Whether consent was withdrawn
    pub withdrawn: bool,
}

impl ReferralBundle {
    /// Pretty JSON, as shown in the confirmation dialog
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, ConsentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Mutable consent state for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsentSession {
    selection: ConsentSelection,
    status: Option<String>,
}

impl ConsentSession {
    /// Session with default choices
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session resuming from an existing selection
    #[inline]
    #[must_use]
    pub fn from_selection(selection: ConsentSelection) -> Self {
        Self {
            selection,
            status: None,
        }
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &ConsentSelection {
        &self.selection
    }

    /// Owned copy of the current selection
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> ConsentSelection {
        self.selection.clone()
    }

    /// Last status message
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn announce(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("Status: {}", message);
        self.status = Some(message);
    }

    /// Choose a route
    pub fn select_route(&mut self, route: Route) {
        tracing::info!("Route selected: {}", route);
        self.selection.route = route;
        self.announce(format!("Route set to {}.", route.meta().label));
    }

    /// Set expiry, clamped into range; returns the stored value
    pub fn set_expiry(&mut self, requested: i64) -> ExpiryDays {
        let days = ExpiryDays::clamped(requested);
        if i64::from(days.get()) != requested {
            tracing::debug!("Expiry {} clamped to {}", requested, days);
        }
        self.store_expiry(days)
    }

    /// Save a free-text expiry draft
    ///
    /// # Errors
    /// Returns [`ConsentError::InvalidExpiryDraft`] for non-numeric text; the
    /// stored expiry is left unchanged
    pub fn save_expiry_draft(&mut self, draft: &str) -> Result<ExpiryDays, ConsentError> {
        match ExpiryDays::parse_draft(draft) {
            Ok(days) => Ok(self.store_expiry(days)),
            Err(e) => {
                tracing::warn!("Rejected expiry draft '{}'", draft);
                Err(e)
            }
        }
    }

    fn store_expiry(&mut self, days: ExpiryDays) -> ExpiryDays {
        self.selection.expiry_days = days;
        self.announce(format!("Consent expiry updated to {days} days."));
        days
    }

    /// Record whether the disclaimer was acknowledged
    pub fn set_acknowledged(&mut self, acknowledged: bool) {
        self.selection.acknowledged = acknowledged;
        tracing::debug!("Acknowledged: {}", acknowledged);
    }

    /// Flip one contact toggle; returns the new state
    pub fn toggle_contact(&mut self, kind: ContactKind) -> bool {
        let selected = self.selection.selected_contacts.toggle(kind);
        tracing::debug!("Contact {} selected: {}", kind, selected);
        selected
    }

    /// Choose when contacts are notified; the custom window is kept
    pub fn set_notify_timing(&mut self, timing: NotifyTiming) {
        self.selection.notify_timing = timing;
        tracing::debug!("Notify timing: {}", timing);
    }

    /// Set the raw custom window value
    pub fn set_custom_window(&mut self, window: impl Into<String>) {
        self.selection.custom_window = window.into();
        tracing::debug!("Custom window: {}", self.selection.custom_window);
    }

    /// Flip the withdrawal flag; returns the new state
    pub fn toggle_withdrawn(&mut self) -> bool {
        self.selection.withdrawn = !self.selection.withdrawn;
        tracing::info!("Consent withdrawn: {}", self.selection.withdrawn);
        self.announce("Consent withdrawn -- queue & notifications updated.");
        self.selection.withdrawn
    }

    /// Restore every choice to its default
    pub fn reset(&mut self) {
        self.selection = ConsentSelection::default();
        tracing::info!("Session reset to defaults");
        self.announce("State reset to default governance choices.");
    }

    /// Whether the chosen custom window falls outside school hours
    #[must_use]
    pub fn window_outside_hours(&self, deriver: &ReceiptDeriver) -> bool {
        deriver.window_outside_hours(&self.selection)
    }

    /// Snapshot for the referral confirmation
    pub fn referral_bundle(&mut self) -> ReferralBundle {
        let when = match self.selection.notify_timing {
            NotifyTiming::Custom if self.selection.custom_window.is_empty() => TIME_PENDING.to_string(),
            NotifyTiming::Custom => self.selection.custom_window.clone(),
            timing => timing.as_str().to_string(),
        };
        let bundle = ReferralBundle {
            who: self.selection.selected_contacts.iter().collect(),
            when,
            withdrawn: self.selection.withdrawn,
        };
        self.announce("Referral snapshot recorded.");
        bundle
    }

    /// Build a receipt for the current selection without exporting it
    pub fn receipt<S>(&self, deriver: &ReceiptDeriver, now: DateTime<Utc>, ids: &mut S) -> Receipt
    where
        S: ReceiptIdSource + ?Sized,
    {
        deriver.build_receipt(&self.selection, now, ids)
    }

    /// Build a receipt and hand it to `sink` under the configured file name
    ///
    /// # Errors
    /// Returns error if the sink fails; the status message is left unchanged
    pub fn export_receipt<S, K>(
        &mut self,
        deriver: &ReceiptDeriver,
        now: DateTime<Utc>,
        ids: &mut S,
        sink: &mut K,
    ) -> Result<(Receipt, PathBuf), ConsentError>
    where
        S: ReceiptIdSource + ?Sized,
        K: ReceiptSink + ?Sized,
    {
        let receipt = self.receipt(deriver, now, ids);
        let path = sink.save(&deriver.config().receipt_file_name, &receipt.to_bytes())?;
        tracing::info!("Exported receipt {}", receipt.id());
        self.announce("Consent receipt downloaded for your records.");
        Ok((receipt, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::id::RngIdSource;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn starts_with_defaults_and_no_status() {
        let session = ConsentSession::new();
        assert_eq!(session.selection(), &ConsentSelection::default());
        assert!(session.status().is_none());
    }

    #[test]
    fn expiry_is_clamped_and_announced() {
        let mut session = ConsentSession::new();
        assert_eq!(session.set_expiry(0).get(), 1);
        assert_eq!(session.set_expiry(400).get(), 364);
        assert_eq!(session.selection().expiry_days.get(), 364);
        assert_eq!(session.status(), Some("Consent expiry updated to 364 days."));
    }

    #[test]
    fn bad_draft_leaves_expiry_untouched() {
        let mut session = ConsentSession::new();
        session.set_expiry(60);
        assert!(session.save_expiry_draft("two weeks").is_err());
        assert_eq!(session.selection().expiry_days.get(), 60);
        assert_eq!(session.save_expiry_draft("14").unwrap().get(), 14);
    }

    #[test]
    fn withdraw_toggles() {
        let mut session = ConsentSession::new();
        assert!(session.toggle_withdrawn());
        assert!(!session.toggle_withdrawn());
        assert_eq!(
            session.status(),
            Some("Consent withdrawn -- queue & notifications updated.")
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut session = ConsentSession::new();
        session.select_route(Route::Anon);
        session.set_expiry(200);
        session.set_acknowledged(true);
        session.toggle_contact(ContactKind::Parent);
        session.set_notify_timing(NotifyTiming::Custom);
        session.set_custom_window("2025-06-01T10:00");
        session.toggle_withdrawn();

        session.reset();
        assert_eq!(session.selection(), &ConsentSelection::default());
        assert_eq!(session.status(), Some("State reset to default governance choices."));
    }

    #[test]
    fn referral_bundle_when_values() {
        let mut session = ConsentSession::new();
        assert_eq!(session.referral_bundle().when, "end");

        session.set_notify_timing(NotifyTiming::Custom);
        assert_eq!(session.referral_bundle().when, "time pending");

        session.set_custom_window("2025-06-01T10:00");
        assert_eq!(session.referral_bundle().when, "2025-06-01T10:00");
        assert_eq!(session.status(), Some("Referral snapshot recorded."));
    }

    #[test]
    fn referral_bundle_json() {
        let mut session = ConsentSession::new();
        session.toggle_contact(ContactKind::Lead);
        let json = session.referral_bundle().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["who"], serde_json::json!(["counsellor", "lead"]));
        assert_eq!(value["when"], "end");
        assert_eq!(value["withdrawn"], false);
    }

    #[test]
    fn export_saves_under_configured_name() {
        let mut session = ConsentSession::new();
        let mut sink = MemorySink::new();
        let deriver = ReceiptDeriver::default();
        let (receipt, path) = session
            .export_receipt(&deriver, now(), &mut RngIdSource::seeded(3), &mut sink)
            .unwrap();
        assert_eq!(path, PathBuf::from("consent_receipt.txt"));
        assert_eq!(sink.text("consent_receipt.txt"), Some(receipt.to_text().as_str()));
        assert_eq!(
            session.status(),
            Some("Consent receipt downloaded for your records.")
        );
    }
}
