use tempfile::TempDir;

use mutreport::events::AppliedMutation;
use mutreport::ledger::{KilledLedger, KilledMutation};
use mutreport::record::{MutationRecord, MutationStatus};

fn kill(number: u32, killer: &str) -> KilledMutation {
    KilledMutation {
        number,
        mutations: vec![AppliedMutation {
            operator: "AOR".to_string(),
            line: 3,
        }],
        module: "pkg.module".to_string(),
        status: MutationStatus::Killed,
        function_name: Some("total".to_string()),
        time: 0.01,
        killer: killer.to_string(),
        tests_run: 2,
        failure_output: "AssertionError".to_string(),
    }
}

fn read_entries(ledger: &KilledLedger) -> Vec<KilledMutation> {
    let data = std::fs::read_to_string(ledger.path()).unwrap();
    serde_json::from_str(&data).unwrap()
}

#[test]
fn snapshot_holds_every_kill_in_order() {
    let dir = TempDir::new().unwrap();
    let mut ledger = KilledLedger::new(dir.path().join("killed.json"));

    for i in 1..=4 {
        ledger.append(kill(i, &format!("test_{}", i))).unwrap();
    }

    assert_eq!(ledger.len(), 4);
    let entries = read_entries(&ledger);
    assert_eq!(entries.len(), 4);
    let numbers: Vec<u32> = entries.iter().map(|e| e.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert_eq!(entries[0].killer, "test_1");
}

#[test]
fn append_rewrites_full_snapshot_each_time() {
    let dir = TempDir::new().unwrap();
    let mut ledger = KilledLedger::new(dir.path().join("killed.json"));

    ledger.append(kill(1, "test_a")).unwrap();
    assert_eq!(read_entries(&ledger).len(), 1);

    ledger.append(kill(2, "test_b")).unwrap();
    let entries = read_entries(&ledger);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].killer, "test_b");
}

#[test]
fn reset_clears_entries_and_snapshot() {
    let dir = TempDir::new().unwrap();
    let mut ledger = KilledLedger::new(dir.path().join("killed.json"));

    ledger.append(kill(1, "test_a")).unwrap();
    ledger.reset().unwrap();

    assert!(ledger.is_empty());
    assert!(read_entries(&ledger).is_empty());
}

#[test]
fn flattens_record_fields() {
    let record = MutationRecord {
        number: 7,
        mutations: vec![AppliedMutation {
            operator: "ROR".to_string(),
            line: 12,
        }],
        module: "pkg.module".to_string(),
        function_name: None,
        status: MutationStatus::Killed,
        time: 0.125,
        killer: Some("test_boundary".to_string()),
        tests_run: Some(5),
        failure_output: Some("assert 1 == 2".to_string()),
    };

    let entry = KilledMutation::from_record(&record);
    assert_eq!(entry.number, 7);
    assert_eq!(entry.module, "pkg.module");
    assert_eq!(entry.function_name, None);
    assert_eq!(entry.killer, "test_boundary");
    assert_eq!(entry.tests_run, 5);
    assert_eq!(entry.failure_output, "assert 1 == 2");
    assert_eq!(entry.mutations, record.mutations);
}

#[test]
fn snapshot_replaces_any_stale_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("killed.json");
    std::fs::write(&path, "not json at all").unwrap();

    let mut ledger = KilledLedger::new(&path);
    ledger.append(kill(1, "test_a")).unwrap();

    let entries = read_entries(&ledger);
    assert_eq!(entries.len(), 1);
}
