//! Consent Receipt
//!
//! Selection model, label derivation and receipt export for the
//! wellbeing-triage consent flow.
//!
//! # Core Concepts
//!
//! - [`ConsentSelection`]: Snapshot of the student's consent choices
//! - [`derive_notify_label`], [`is_outside_operating_hours`],
//!   [`format_notified_line`]: Total label derivations
//! - [`Receipt`]: Immutable text receipt built by [`build_receipt`] or a
//!   configured [`ReceiptDeriver`]
//! - [`ReceiptIdSource`] / [`WindowFormatter`] / [`ReceiptSink`]: Injectable
//!   randomness, window formatting and file saving
//! - [`ConsentSession`]: Mutable session state with one operation per
//!   interaction
//!
//! # Example
//!
//! ```rust
//! use consent_receipt::{ConsentSession, ContactKind, MemorySink, ReceiptDeriver, RngIdSource};
//! use chrono::Utc;
//!
//! let mut session = ConsentSession::new();
//! session.toggle_contact(ContactKind::Parent);
//! session.set_expiry(400);
//!
//! let mut sink = MemorySink::new();
//! let deriver = ReceiptDeriver::default();
//! let (receipt, _) = session
//!     .export_receipt(&deriver, Utc::now(), &mut RngIdSource::from_entropy(), &mut sink)
//!     .unwrap();
//! assert!(receipt.to_text().contains("expiry_days: 364"));
//! ```

#![warn(unreachable_pub)]

// Core modules
mod config;
mod derive;
mod error;
mod export;
mod format;
mod id;
mod receipt;
mod route;
mod selection;
mod session;

// Re-exports
pub use config::{DeriverConfig, OperatingHours, RECEIPT_FILE_NAME, RECEIPT_VERSION};
pub use derive::{
    derive_notify_label, format_notified_line, is_outside_operating_hours, mark, CHECK, CROSS,
    END_OF_DAY, IMMEDIATE, WINDOW_PENDING,
};
pub use error::ConsentError;
pub use export::{DirectorySink, MemorySink, ReceiptSink};
pub use format::{format_timestamp, parse_window, PatternFormatter, ShortWeekdayFormatter, WindowFormatter};
pub use id::{ReceiptId, ReceiptIdSource, RngIdSource, RECEIPT_ID_PREFIX};
pub use receipt::{
    build_receipt, Receipt, ReceiptDeriver, RECEIPT_TITLE, SCREENING_BAND, SCREENING_INDEX,
};
pub use route::{QueueStatus, Route, RouteMeta};
pub use selection::{ConsentSelection, ContactKind, ExpiryDays, NotifyTiming, SelectedContacts};
pub use session::{ConsentSession, ReferralBundle, TIME_PENDING};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
