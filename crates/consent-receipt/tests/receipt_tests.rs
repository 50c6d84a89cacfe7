//! Receipt Tests
//!
//! Document layout, non-idempotent identifiers, and deriver configuration.

use consent_receipt::{
    build_receipt, ConsentSelection, DeriverConfig, OperatingHours, ReceiptDeriver, ReceiptId,
    RngIdSource, Route, ShortWeekdayFormatter,
};
use consent_test_utils::{
    all_selections, create_full_selection, fixed_now, fixed_now_text, FixedIds,
    IsoMinuteFormatter, SequenceIds,
};
use pretty_assertions::assert_eq;

#[test]
fn test_full_selection_document() {
    let receipt = build_receipt(
        &create_full_selection(),
        fixed_now(),
        &mut FixedIds(77_001),
        &ShortWeekdayFormatter,
    );

    let expected = [
        "consent_receipt".to_string(),
        "receipt_id: CL-CR-77001".to_string(),
        "version: consent-receipt/1.0".to_string(),
        "route: now".to_string(),
        "expiry_days: 90".to_string(),
        "notify: Mon 17:45".to_string(),
        "notified: Counsellor (✓) Parent / Guardian (✓) Year level lead (✓)".to_string(),
        "acknowledged: ✓".to_string(),
        "band: Attention needed".to_string(),
        "index: 0.62".to_string(),
        format!("status: Withdrawn ({})", fixed_now_text()),
    ]
    .join("\n");

    assert_eq!(receipt.to_text(), expected);
}

#[test]
fn test_receipt_is_not_idempotent() {
    // Identical snapshots differ in exactly one field: the identifier
    let selection = create_full_selection();
    let mut ids = SequenceIds::new([12_345, 54_321]);

    let first = build_receipt(&selection, fixed_now(), &mut ids, &ShortWeekdayFormatter);
    let second = build_receipt(&selection, fixed_now(), &mut ids, &ShortWeekdayFormatter);

    assert_ne!(first.id(), second.id());
    assert_eq!(first.body(), second.body());

    let differing: Vec<_> = first
        .to_text()
        .lines()
        .zip(second.to_text().lines())
        .filter(|(a, b)| a != b)
        .map(|(a, _)| a.to_string())
        .collect();
    assert_eq!(differing, vec!["receipt_id: CL-CR-12345".to_string()]);
}

#[test]
fn test_random_ids_are_well_formed() {
    let mut ids = RngIdSource::from_entropy();
    let selection = ConsentSelection::new();
    for _ in 0..200 {
        let receipt = build_receipt(&selection, fixed_now(), &mut ids, &ShortWeekdayFormatter);
        let text = receipt.id().to_string();
        assert_eq!(text.len(), "CL-CR-#####".len());
        assert_eq!(text.parse::<ReceiptId>().unwrap(), receipt.id());
    }
}

#[test]
fn test_every_selection_renders_eleven_lines() {
    for selection in all_selections("2025-06-01T07:59") {
        let receipt = build_receipt(&selection, fixed_now(), &mut FixedIds(50_000), &IsoMinuteFormatter);
        let text = receipt.to_text();
        assert_eq!(text.lines().count(), 11, "{text}");
        assert!(text.ends_with(')'));
        let expected_route = format!("route: {}", selection.route);
        assert!(text.contains(&expected_route));
    }
}

#[test]
fn test_window_ignored_unless_custom() {
    let selection = ConsentSelection::new().with_custom_window("2025-06-01T07:59");
    let custom = build_receipt(&selection, fixed_now(), &mut FixedIds(50_000), &IsoMinuteFormatter);
    assert_eq!(custom.notify_label(), "2025-06-01 07:59");

    let selection = selection.with_timing(consent_receipt::NotifyTiming::Now);
    let now = build_receipt(&selection, fixed_now(), &mut FixedIds(50_000), &IsoMinuteFormatter);
    assert_eq!(now.notify_label(), "immediate");
}

#[test]
fn test_deriver_from_toml_config() {
    let config = DeriverConfig::from_toml_str(
        r#"
        receipt_version = "pilot-3"
        window_pattern = "%A at %H:%M"

        [operating_hours]
        start_hour = 9
        end_hour = 17
        "#,
    )
    .unwrap();
    assert_eq!(config.operating_hours, OperatingHours::new(9, 17).unwrap());

    let deriver = ReceiptDeriver::new(config);
    let selection = ConsentSelection::new()
        .with_route(Route::Anon)
        .with_custom_window("2025-06-02T16:30");

    assert!(!deriver.window_outside_hours(&selection));
    let receipt = deriver.build_receipt(&selection, fixed_now(), &mut FixedIds(60_000));
    assert_eq!(receipt.version(), "pilot-3");
    assert_eq!(receipt.notify_label(), "Monday at 16:30");
}

#[test]
fn test_deriver_formatter_override() {
    let deriver = ReceiptDeriver::default().with_formatter(IsoMinuteFormatter);
    let selection = ConsentSelection::new().with_custom_window("2025-06-02T16:30");
    assert_eq!(deriver.notify_label(&selection), "2025-06-02 16:30");
}
