use tempfile::TempDir;

use mutreport::broadcast::RunView;
use mutreport::events::{AppliedMutation, PassedTest};
use mutreport::html::HtmlView;
use mutreport::ledger::{self, KilledLedger, SharedLedger};
use mutreport::record::Score;

fn test_ledger(dir: &TempDir) -> SharedLedger {
    ledger::shared(KilledLedger::new(dir.path().join("killed.json")))
}

const ORIGINAL: &str = "def f(): return 1\n\ndef g(): return 2";
const MUTANT: &str = "def f(): return 1\n\ndef g(): return 3";

#[test]
fn creates_report_directory_layout() {
    let dir = TempDir::new().unwrap();
    let report_dir = dir.path().join("html");
    let _view = HtmlView::new(&report_dir, test_ledger(&dir)).unwrap();

    assert!(report_dir.is_dir());
    assert!(report_dir.join("mutants").is_dir());
}

#[test]
fn writes_detail_page_when_mutation_closes() {
    let dir = TempDir::new().unwrap();
    let report_dir = dir.path().join("html");
    let mut view = HtmlView::new(&report_dir, test_ledger(&dir)).unwrap();

    view.initialize(&["m".to_string()], &["t".to_string()]).unwrap();
    view.mutation(
        1,
        &[AppliedMutation {
            operator: "CRP".to_string(),
            line: 3,
        }],
        "m",
        ORIGINAL,
        MUTANT,
    )
    .unwrap();

    // Detail pages appear as mutations close, before end.
    assert!(!report_dir.join("mutants").join("1.html").exists());
    view.killed(0.05, "test_g", "AssertionError", 2).unwrap();

    let detail = std::fs::read_to_string(report_dir.join("mutants").join("1.html")).unwrap();
    assert!(detail.contains("Mutant #1"));
    assert!(detail.contains("killed"));
    assert!(detail.contains("test_g"));
    assert!(detail.contains("CRP at line 3"));
    assert!(detail.contains("def g(): return 3"));
}

#[test]
fn mutant_source_is_html_escaped() {
    let dir = TempDir::new().unwrap();
    let report_dir = dir.path().join("html");
    let mut view = HtmlView::new(&report_dir, test_ledger(&dir)).unwrap();

    let original = "def cmp(a, b): return a < b";
    let mutant = "def cmp(a, b): return a > b";
    view.mutation(
        1,
        &[AppliedMutation {
            operator: "ROR".to_string(),
            line: 1,
        }],
        "m",
        original,
        mutant,
    )
    .unwrap();
    view.survived(0.01, 1).unwrap();

    let detail = std::fs::read_to_string(report_dir.join("mutants").join("1.html")).unwrap();
    assert!(detail.contains("a &gt; b"));
    assert!(!detail.contains("return a > b"));
}

#[test]
fn index_links_every_mutation() {
    let dir = TempDir::new().unwrap();
    let report_dir = dir.path().join("html");
    let mut view = HtmlView::new(&report_dir, test_ledger(&dir)).unwrap();

    view.initialize(&["pkg.module".to_string()], &["test.test_module".to_string()])
        .unwrap();
    view.tests_passed(
        &[PassedTest {
            name: "test_g".to_string(),
            target: None,
            time: 0.002,
        }],
        1,
    )
    .unwrap();

    let edits = [AppliedMutation {
        operator: "AOR".to_string(),
        line: 3,
    }];
    view.mutation(1, &edits, "pkg.module", ORIGINAL, MUTANT).unwrap();
    view.killed(0.1, "test_g", "AssertionError", 1).unwrap();
    view.mutation(2, &edits, "pkg.module", ORIGINAL, MUTANT).unwrap();
    view.survived(0.2, 1).unwrap();

    view.end(&Score::default(), 0.3).unwrap();

    let index = std::fs::read_to_string(report_dir.join("index.html")).unwrap();
    assert!(index.contains("mutants/1.html"));
    assert!(index.contains("mutants/2.html"));
    assert!(index.contains("pkg.module"));
    assert!(index.contains("test_g"));
    assert!(index.contains("50.0%"));
    assert!(index.contains("Generated "));
}
