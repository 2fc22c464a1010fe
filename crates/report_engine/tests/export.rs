use std::fs;

use pretty_assertions::assert_eq;
use report_engine::{export_report, ExportError};

const REPORT: &str = "<h1>Refund report</h1><p>Refunds are issued within 30 days.</p>\
                      <ol><li>policy.pdf</li><li>tickets.csv</li></ol>";

#[test]
fn export_writes_html_and_text_side_by_side() {
    let dir = tempfile::tempdir().unwrap();
    let summary = export_report(dir.path(), "1019261430", REPORT).expect("export ok");

    assert_eq!(summary.html_path, dir.path().join("report1019261430.html"));
    assert_eq!(summary.text_path, dir.path().join("report1019261430.txt"));
    assert_eq!(fs::read_to_string(&summary.html_path).unwrap(), REPORT);
    assert_eq!(
        fs::read_to_string(&summary.text_path).unwrap(),
        "Refund report\nRefunds are issued within 30 days.\n- policy.pdf\n- tickets.csv"
    );
}

#[test]
fn export_again_with_same_stamp_replaces_files() {
    let dir = tempfile::tempdir().unwrap();
    export_report(dir.path(), "0101260000", "<p>first</p>").unwrap();
    let summary = export_report(dir.path(), "0101260000", "<p>second</p>").unwrap();
    assert_eq!(fs::read_to_string(summary.text_path).unwrap(), "second");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn empty_report_is_not_exported() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("reports");
    for html in ["", "   ", "<div><br></div>"] {
        assert!(matches!(
            export_report(&target, "0101260000", html),
            Err(ExportError::EmptyReport)
        ));
    }
    assert!(!target.exists());
}
