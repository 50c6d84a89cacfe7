//! Label derivation
//!
//! Total functions from selection parts to display strings. Nothing here
//! fails: unparsable windows degrade to [`WINDOW_PENDING`] or `false`.

use crate::format::{parse_window, WindowFormatter};
use crate::selection::{ContactKind, NotifyTiming, SelectedContacts};
use chrono::Timelike;

/// Notify label for [`NotifyTiming::Now`]
pub const IMMEDIATE: &str = "immediate";

/// Notify label for [`NotifyTiming::End`]
pub const END_OF_DAY: &str = "end-of-day";

/// Notify label for a custom timing whose window is missing or unparsable
pub const WINDOW_PENDING: &str = "window pending";

/// Marker for a selected contact or given acknowledgement
pub const CHECK: char = '✓';

/// Marker for an unselected contact or missing acknowledgement
pub const CROSS: char = '×';

/// Derive the notify label for a timing choice
///
/// `custom_window` is only consulted for [`NotifyTiming::Custom`].
#[must_use]
pub fn derive_notify_label<F>(timing: NotifyTiming, custom_window: &str, formatter: &F) -> String
where
    F: WindowFormatter + ?Sized,
{
    match timing {
        NotifyTiming::Now => IMMEDIATE.to_string(),
        NotifyTiming::End => END_OF_DAY.to_string(),
        NotifyTiming::Custom => match parse_window(custom_window) {
            Some(at) => formatter.format_window(&at),
            None => WINDOW_PENDING.to_string(),
        },
    }
}

/// Whether a consent window falls outside `[start_hour, end_hour)`
///
/// Empty or unparsable windows are never outside hours.
#[must_use]
pub fn is_outside_operating_hours(custom_window: &str, start_hour: u32, end_hour: u32) -> bool {
    parse_window(custom_window).is_some_and(|at| {
        let hour = at.hour();
        hour < start_hour || hour >= end_hour
    })
}

/// `✓` or `×`
#[inline]
#[must_use]
pub const fn mark(flag: bool) -> char {
    if flag {
        CHECK
    } else {
        CROSS
    }
}

/// Render every contact kind in fixed order with its selection mark
///
/// Order never depends on which contacts are selected.
#[must_use]
pub fn format_notified_line(contacts: &SelectedContacts) -> String {
    ContactKind::ALL
        .iter()
        .map(|kind| format!("{} ({})", kind.label(), mark(contacts.contains(*kind))))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{PatternFormatter, ShortWeekdayFormatter};

    #[test]
    fn fixed_timings() {
        let f = ShortWeekdayFormatter;
        assert_eq!(derive_notify_label(NotifyTiming::Now, "", &f), "immediate");
        assert_eq!(derive_notify_label(NotifyTiming::End, "", &f), "end-of-day");
    }

    #[test]
    fn fixed_timings_ignore_window() {
        let f = ShortWeekdayFormatter;
        assert_eq!(
            derive_notify_label(NotifyTiming::Now, "2025-06-01T10:00", &f),
            "immediate"
        );
    }

    #[test]
    fn custom_without_window_is_pending() {
        let f = ShortWeekdayFormatter;
        assert_eq!(derive_notify_label(NotifyTiming::Custom, "", &f), "window pending");
        assert_eq!(
            derive_notify_label(NotifyTiming::Custom, "not a date", &f),
            "window pending"
        );
    }

    #[test]
    fn custom_with_window_uses_formatter() {
        assert_eq!(
            derive_notify_label(NotifyTiming::Custom, "2025-06-01T07:59", &ShortWeekdayFormatter),
            "Sun 07:59"
        );
        let pattern = PatternFormatter::new("%H:%M on %d %b");
        assert_eq!(
            derive_notify_label(NotifyTiming::Custom, "2025-06-03T14:30", &pattern),
            "14:30 on 03 Jun"
        );
    }

    #[test]
    fn operating_hours_boundaries() {
        assert!(!is_outside_operating_hours("", 8, 16));
        assert!(is_outside_operating_hours("2025-06-01T07:59", 8, 16));
        assert!(!is_outside_operating_hours("2025-06-01T08:00", 8, 16));
        assert!(!is_outside_operating_hours("2025-06-01T15:59", 8, 16));
        assert!(is_outside_operating_hours("2025-06-01T16:00", 8, 16));
    }

    #[test]
    fn operating_hours_unparsable_is_inside() {
        assert!(!is_outside_operating_hours("16:00", 8, 16));
        assert!(!is_outside_operating_hours("garbage", 8, 16));
    }

    #[test]
    fn notified_line_fixed_order() {
        let contacts = SelectedContacts::from_kinds(&[ContactKind::Counsellor, ContactKind::Lead]);
        assert_eq!(
            format_notified_line(&contacts),
            "Counsellor (✓) Parent / Guardian (×) Year level lead (✓)"
        );
    }

    #[test]
    fn notified_line_nobody() {
        assert_eq!(
            format_notified_line(&SelectedContacts::none()),
            "Counsellor (×) Parent / Guardian (×) Year level lead (×)"
        );
    }
}
