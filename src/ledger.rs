use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::events::AppliedMutation;
use crate::record::{MutationRecord, MutationStatus};

pub const DEFAULT_LEDGER_FILE: &str = ".mutreport-killed.json";

/// Flattened summary of one killed mutation, as stored in the ledger
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KilledMutation {
    pub number: u32,
    pub mutations: Vec<AppliedMutation>,
    pub module: String,
    pub status: MutationStatus,
    pub function_name: Option<String>,
    pub time: f64,
    pub killer: String,
    pub tests_run: usize,
    pub failure_output: String,
}

impl KilledMutation {
    pub fn from_record(record: &MutationRecord) -> Self {
        KilledMutation {
            number: record.number,
            mutations: record.mutations.clone(),
            module: record.module.clone(),
            status: record.status,
            function_name: record.function_name.clone(),
            time: record.time,
            killer: record.killer.clone().unwrap_or_default(),
            tests_run: record.tests_run.unwrap_or_default(),
            failure_output: record.failure_output.clone().unwrap_or_default(),
        }
    }
}

/// Process-wide accumulator of killed mutations. Entries survive across runs
/// within one process; [`reset`] is the explicit lifecycle boundary.
///
/// [`reset`]: KilledLedger::reset
pub struct KilledLedger {
    path: PathBuf,
    entries: Vec<KilledMutation>,
}

impl KilledLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        KilledLedger {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Ledger backed by [`DEFAULT_LEDGER_FILE`] in the current directory.
    pub fn with_default_path() -> Self {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        KilledLedger::new(dir.join(DEFAULT_LEDGER_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[KilledMutation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends one kill and rewrites the full snapshot on disk.
    pub fn append(&mut self, entry: KilledMutation) -> io::Result<()> {
        self.entries.push(entry);
        self.flush()
    }

    /// Clears all entries and overwrites the snapshot with an empty list.
    pub fn reset(&mut self) -> io::Result<()> {
        self.entries.clear();
        self.flush()
    }

    fn flush(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(io::Error::other)?;
        write_atomic(&self.path, &json)
    }
}

pub type SharedLedger = Rc<RefCell<KilledLedger>>;

pub fn shared(ledger: KilledLedger) -> SharedLedger {
    Rc::new(RefCell::new(ledger))
}

/// Writes `contents` to a temp file in the target directory and renames it
/// into place, so a crash mid-write leaves any previous snapshot intact.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
