//! Consent selection snapshot
//!
//! [`ConsentSelection`] is the value object every derivation takes. It holds
//! the student's choices and nothing else; all label and receipt logic reads
//! from an explicit snapshot rather than ambient state.

use crate::error::ConsentError;
use crate::route::Route;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How long consent stays valid, always within [`ExpiryDays::MIN`]..=[`ExpiryDays::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u16")]
pub struct ExpiryDays(u16);

impl ExpiryDays {
    /// Shortest allowed expiry
    pub const MIN: u16 = 1;
    /// Longest allowed expiry
    pub const MAX: u16 = 364;
    /// Expiry a new session starts with
    pub const DEFAULT: u16 = 30;

    /// Clamp a requested number of days into range
    #[must_use]
    pub fn clamped(requested: i64) -> Self {
        let days = requested.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        // in range after clamp
        Self(u16::try_from(days).unwrap_or(Self::MAX))
    }

    /// Parse a free-text draft from the expiry editor
    ///
    /// Numeric text (decimals allowed) is clamped and truncated toward zero.
    /// Blank text counts as zero and lands on [`ExpiryDays::MIN`].
    ///
    /// # Errors
    /// Returns [`ConsentError::InvalidExpiryDraft`] for non-numeric text.
    pub fn parse_draft(draft: &str) -> Result<Self, ConsentError> {
        let trimmed = draft.trim();
        if trimmed.is_empty() {
            return Ok(Self::clamped(0));
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| ConsentError::InvalidExpiryDraft(draft.to_string()))?;
        if value.is_nan() {
            return Err(ConsentError::InvalidExpiryDraft(draft.to_string()));
        }
        let bounded = value.clamp(f64::from(Self::MIN), f64::from(Self::MAX));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let days = bounded.trunc() as u16;
        Ok(Self(days))
    }

    /// Number of days
    #[inline]
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl Default for ExpiryDays {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl Display for ExpiryDays {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ExpiryDays {
    fn from(requested: i64) -> Self {
        Self::clamped(requested)
    }
}

impl From<ExpiryDays> for u16 {
    fn from(days: ExpiryDays) -> Self {
        days.0
    }
}

/// Someone who can be notified of a referral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    /// School counsellor
    Counsellor,
    /// Parent or guardian
    Parent,
    /// Year level lead
    Lead,
}

impl ContactKind {
    /// Fixed rendering order
    pub const ALL: [ContactKind; 3] = [
        ContactKind::Counsellor,
        ContactKind::Parent,
        ContactKind::Lead,
    ];

    /// Lowercase key
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Counsellor => "counsellor",
            Self::Parent => "parent",
            Self::Lead => "lead",
        }
    }

    /// Human-readable label
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Counsellor => "Counsellor",
            Self::Parent => "Parent / Guardian",
            Self::Lead => "Year level lead",
        }
    }
}

impl Display for ContactKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactKind {
    type Err = ConsentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "counsellor" => Ok(Self::Counsellor),
            "parent" => Ok(Self::Parent),
            "lead" => Ok(Self::Lead),
            other => Err(ConsentError::UnknownContact(other.to_string())),
        }
    }
}

/// Independently toggled notification targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedContacts {
    counsellor: bool,
    parent: bool,
    lead: bool,
}

impl SelectedContacts {
    /// No one selected
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self {
            counsellor: false,
            parent: false,
            lead: false,
        }
    }

    /// Exactly the given contacts selected
    #[must_use]
    pub fn from_kinds(kinds: &[ContactKind]) -> Self {
        let mut contacts = Self::none();
        for kind in kinds {
            contacts.set(*kind, true);
        }
        contacts
    }

    /// Whether `kind` is selected
    #[inline]
    #[must_use]
    pub const fn contains(&self, kind: ContactKind) -> bool {
        match kind {
            ContactKind::Counsellor => self.counsellor,
            ContactKind::Parent => self.parent,
            ContactKind::Lead => self.lead,
        }
    }

    /// Set one toggle
    #[inline]
    pub fn set(&mut self, kind: ContactKind, selected: bool) {
        match kind {
            ContactKind::Counsellor => self.counsellor = selected,
            ContactKind::Parent => self.parent = selected,
            ContactKind::Lead => self.lead = selected,
        }
    }

    /// Flip one toggle, returning the new state
    #[inline]
    pub fn toggle(&mut self, kind: ContactKind) -> bool {
        let selected = !self.contains(kind);
        self.set(kind, selected);
        selected
    }

    /// Selected contacts in fixed order
    pub fn iter(&self) -> impl Iterator<Item = ContactKind> + '_ {
        ContactKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }

    /// Whether nobody is selected
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.counsellor || self.parent || self.lead)
    }
}

impl Default for SelectedContacts {
    fn default() -> Self {
        Self::from_kinds(&[ContactKind::Counsellor])
    }
}

/// When selected contacts are notified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyTiming {
    /// Straight away
    Now,
    /// At the end of the school day
    End,
    /// At a custom consent window
    Custom,
}

impl NotifyTiming {
    /// All timings in display order
    pub const ALL: [NotifyTiming; 3] = [NotifyTiming::Now, NotifyTiming::End, NotifyTiming::Custom];

    /// Lowercase key
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Now => "now",
            Self::End => "end",
            Self::Custom => "custom",
        }
    }

    /// Choice caption
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Now => "Now",
            Self::End => "End of day",
            Self::Custom => "Choose time",
        }
    }
}

impl Default for NotifyTiming {
    fn default() -> Self {
        Self::End
    }
}

impl Display for NotifyTiming {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotifyTiming {
    type Err = ConsentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "now" => Ok(Self::Now),
            "end" => Ok(Self::End),
            "custom" => Ok(Self::Custom),
            other => Err(ConsentError::UnknownTiming(other.to_string())),
        }
    }
}

/// Snapshot of the student's consent choices
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsentSelection {
    /// Notification urgency tier
    pub route: Route,
    /// How long consent stays valid
    pub expiry_days: ExpiryDays,
    /// Student confirmed that screening is not diagnosis
    pub acknowledged: bool,
    /// Who is notified
    pub selected_contacts: SelectedContacts,
    /// When they are notified
    pub notify_timing: NotifyTiming,
    /// Raw `datetime-local` value; only read when timing is custom
    pub custom_window: String,
    /// Consent has been revoked
    pub withdrawn: bool,
}

impl ConsentSelection {
    /// Session defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With route
    #[inline]
    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    /// With requested expiry, clamped into range
    #[inline]
    #[must_use]
    pub fn with_expiry(mut self, requested: i64) -> Self {
        self.expiry_days = ExpiryDays::clamped(requested);
        self
    }

    /// With acknowledgement flag
    #[inline]
    #[must_use]
    pub fn with_acknowledged(mut self, acknowledged: bool) -> Self {
        self.acknowledged = acknowledged;
        self
    }

    /// With contacts
    #[inline]
    #[must_use]
    pub fn with_contacts(mut self, contacts: SelectedContacts) -> Self {
        self.selected_contacts = contacts;
        self
    }

    /// With timing
    #[inline]
    #[must_use]
    pub fn with_timing(mut self, timing: NotifyTiming) -> Self {
        self.notify_timing = timing;
        self
    }

    /// With custom timing and its window
    #[inline]
    #[must_use]
    pub fn with_custom_window(mut self, window: impl Into<String>) -> Self {
        self.notify_timing = NotifyTiming::Custom;
        self.custom_window = window.into();
        self
    }

    /// With withdrawal flag
    #[inline]
    #[must_use]
    pub fn with_withdrawn(mut self, withdrawn: bool) -> Self {
        self.withdrawn = withdrawn;
        self
    }

    /// Window that applies to the current timing, if any
    #[inline]
    #[must_use]
    pub fn effective_window(&self) -> Option<&str> {
        match self.notify_timing {
            NotifyTiming::Custom => Some(self.custom_window.as_str()),
            NotifyTiming::Now | NotifyTiming::End => None,
        }
    }
}
