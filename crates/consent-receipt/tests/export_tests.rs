//! Export Tests
//!
//! Receipt hand-off through the sink seam.

use consent_receipt::{
    ConsentError, ConsentSession, ContactKind, DeriverConfig, DirectorySink, ReceiptDeriver,
    ReceiptSink,
};
use consent_test_utils::{fixed_now, FixedIds};
use mockall::mock;
use std::path::PathBuf;

mock! {
    pub Sink {}

    impl ReceiptSink for Sink {
        fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ConsentError>;
    }
}

#[test]
fn test_export_writes_receipt_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(tmp.path());
    let mut session = ConsentSession::new();
    session.toggle_contact(ContactKind::Parent);

    let (receipt, path) = session
        .export_receipt(&ReceiptDeriver::default(), fixed_now(), &mut FixedIds(31_337), &mut sink)
        .unwrap();

    assert_eq!(path, tmp.path().join("consent_receipt.txt"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, receipt.to_text());
    assert!(written.contains("receipt_id: CL-CR-31337"));
    assert!(written.contains("Parent / Guardian (✓)"));
}

#[test]
fn test_second_export_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(tmp.path());
    let deriver = ReceiptDeriver::default();
    let mut session = ConsentSession::new();

    session
        .export_receipt(&deriver, fixed_now(), &mut FixedIds(11_111), &mut sink)
        .unwrap();
    session.toggle_withdrawn();
    let (_, path) = session
        .export_receipt(&deriver, fixed_now(), &mut FixedIds(22_222), &mut sink)
        .unwrap();

    let written = std::fs::read_to_string(path).unwrap();
    assert!(written.contains("CL-CR-22222"));
    assert!(written.contains("status: Withdrawn ("));
}

#[test]
fn test_export_uses_configured_file_name() {
    let mut sink = MockSink::new();
    sink.expect_save()
        .withf(|name, bytes| name == "pilot_receipt.txt" && !bytes.is_empty())
        .times(1)
        .returning(|name, _| Ok(PathBuf::from(name)));

    let deriver = ReceiptDeriver::new(DeriverConfig::new().with_file_name("pilot_receipt.txt"));
    let mut session = ConsentSession::new();
    let (_, path) = session
        .export_receipt(&deriver, fixed_now(), &mut FixedIds(40_000), &mut sink)
        .unwrap();
    assert_eq!(path, PathBuf::from("pilot_receipt.txt"));
}

#[test]
fn test_export_refuses_file_name_outside_sink_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let exports = tmp.path().join("exports");
    let mut sink = DirectorySink::new(&exports);
    let deriver = ReceiptDeriver::new(DeriverConfig::new().with_file_name("../escaped.txt"));
    let mut session = ConsentSession::new();

    let result = session.export_receipt(&deriver, fixed_now(), &mut FixedIds(40_000), &mut sink);

    assert!(matches!(result, Err(ConsentError::InvalidFileName(_))));
    assert!(!tmp.path().join("escaped.txt").exists());
    assert!(session.status().is_none());
}

#[test]
fn test_export_refuses_absolute_file_name() {
    let tmp = tempfile::tempdir().unwrap();
    let outside = tmp.path().join("absolute.txt");
    let mut sink = DirectorySink::new(tmp.path().join("exports"));

    let result = sink.save(outside.to_str().unwrap(), b"receipt");

    assert!(matches!(result, Err(ConsentError::InvalidFileName(_))));
    assert!(!outside.exists());
}

#[test]
fn test_failed_export_keeps_previous_status() {
    let mut sink = MockSink::new();
    sink.expect_save().times(1).returning(|name, _| {
        Err(ConsentError::export_error(
            name,
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        ))
    });

    let mut session = ConsentSession::new();
    session.set_expiry(14);
    let result = session.export_receipt(
        &ReceiptDeriver::default(),
        fixed_now(),
        &mut FixedIds(40_000),
        &mut sink,
    );

    assert!(matches!(result, Err(ConsentError::Export { .. })));
    assert_eq!(session.status(), Some("Consent expiry updated to 14 days."));
}
