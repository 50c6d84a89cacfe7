//! Notification routes and their display catalogue
//!
//! A [`Route`] is the urgency tier the student picks on the consent screen.
//! Each route carries fixed display metadata ([`RouteMeta`]) shown next to
//! the choice and on the results screen.

use crate::error::ConsentError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Notification urgency tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Notify a counsellor immediately
    Now,
    /// Notify at a time the student chooses
    Later,
    /// Screening only, nobody is notified
    Anon,
}

impl Default for Route {
    fn default() -> Self {
        Self::Later
    }
}

/// Queue status shown for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    /// Demand label
    pub label: &'static str,
    /// Expected wait range
    pub wait: &'static str,
}

/// Fixed display metadata for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteMeta {
    /// Choice caption
    pub label: &'static str,
    /// Secondary line under the caption
    pub detail: &'static str,
    /// Queue status
    pub queue: QueueStatus,
    /// Primary action caption
    pub action: &'static str,
}

impl RouteMeta {
    /// `"<queue label> / <wait>"`
    #[must_use]
    pub fn notify_label(&self) -> String {
        format!("{} / {}", self.queue.label, self.queue.wait)
    }
}

const NOW_META: RouteMeta = RouteMeta {
    label: "Notify a counsellor now",
    detail: "Expected callback: 10-20 min",
    queue: QueueStatus {
        label: "high demand",
        wait: "25-40 min",
    },
    action: "Talk now",
};

const LATER_META: RouteMeta = RouteMeta {
    label: "Notify later",
    detail: "You decide the time window",
    queue: QueueStatus {
        label: "moderate",
        wait: "15-25 min",
    },
    action: "Book later",
};

const ANON_META: RouteMeta = RouteMeta {
    label: "Anonymous screening only",
    detail: "No one is notified unless you change this",
    queue: QueueStatus {
        label: "separate",
        wait: "5-10 min",
    },
    action: "Ask anonymously",
};

impl Route {
    /// All routes in display order
    pub const ALL: [Route; 3] = [Route::Now, Route::Later, Route::Anon];

    /// Lowercase key used in receipts and serialized state
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Now => "now",
            Self::Later => "later",
            Self::Anon => "anon",
        }
    }

    /// Display metadata
    #[inline]
    #[must_use]
    pub const fn meta(self) -> &'static RouteMeta {
        match self {
            Self::Now => &NOW_META,
            Self::Later => &LATER_META,
            Self::Anon => &ANON_META,
        }
    }

    /// Whether anyone is told about the screening on this route
    #[inline]
    #[must_use]
    pub const fn notifies_anyone(self) -> bool {
        !matches!(self, Self::Anon)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = ConsentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "now" => Ok(Self::Now),
            "later" => Ok(Self::Later),
            "anon" => Ok(Self::Anon),
            other => Err(ConsentError::UnknownRoute(other.to_string())),
        }
    }
}
