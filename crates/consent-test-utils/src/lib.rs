//! Testing utilities for the consent receipt workspace
//!
//! Shared test helpers, fixtures, and deterministic collaborators.

#![allow(missing_docs)]

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use consent_receipt::{
    ConsentSelection, ContactKind, NotifyTiming, ReceiptIdSource, Route, SelectedContacts,
    WindowFormatter,
};
use std::collections::VecDeque;

/// Yields the given receipt numbers in order, then repeats the last one
#[derive(Debug, Clone)]
pub struct SequenceIds {
    queue: VecDeque<u32>,
    last: u32,
}

impl SequenceIds {
    pub fn new(numbers: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: numbers.into_iter().collect(),
            last: 10_000,
        }
    }
}

impl ReceiptIdSource for SequenceIds {
    fn next_receipt_number(&mut self) -> u32 {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Always yields the same receipt number
#[derive(Debug, Clone, Copy)]
pub struct FixedIds(pub u32);

impl ReceiptIdSource for FixedIds {
    fn next_receipt_number(&mut self) -> u32 {
        self.0
    }
}

/// Formats every window as ISO minutes, independent of weekday names
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoMinuteFormatter;

impl WindowFormatter for IsoMinuteFormatter {
    fn format_window(&self, at: &NaiveDateTime) -> String {
        at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Timestamp used across receipt fixtures
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
}

pub fn fixed_now_text() -> &'static str {
    "2025-06-01T09:30:00.000Z"
}

/// Selection with every flag set and a custom window after hours
pub fn create_full_selection() -> ConsentSelection {
    ConsentSelection::new()
        .with_route(Route::Now)
        .with_expiry(90)
        .with_acknowledged(true)
        .with_contacts(SelectedContacts::from_kinds(&ContactKind::ALL))
        .with_custom_window("2025-06-02T17:45")
        .with_withdrawn(true)
}

/// Every combination of route, timing, contacts and flags over one window
pub fn all_selections(custom_window: &str) -> Vec<ConsentSelection> {
    let mut out = Vec::new();
    for route in Route::ALL {
        for timing in NotifyTiming::ALL {
            for mask in 0u8..8 {
                let kinds: Vec<ContactKind> = ContactKind::ALL
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, kind)| kind)
                    .collect();
                for (acknowledged, withdrawn) in [(false, false), (true, false), (false, true), (true, true)] {
                    let mut selection = ConsentSelection::new()
                        .with_route(route)
                        .with_contacts(SelectedContacts::from_kinds(&kinds))
                        .with_acknowledged(acknowledged)
                        .with_withdrawn(withdrawn);
                    selection.notify_timing = timing;
                    selection.custom_window = custom_window.to_string();
                    out.push(selection);
                }
            }
        }
    }
    out
}
