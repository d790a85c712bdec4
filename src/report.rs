use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use crate::attribution;
use crate::broadcast::RunView;
use crate::events::{AppliedMutation, PassedTest};
use crate::ledger::{self, KilledMutation, SharedLedger};
use crate::record::{MutationRecord, MutationStatus, RunRecord, Score};

/// Mutation announced by the engine and not yet closed by a terminal event.
struct PendingMutation {
    number: u32,
    mutations: Vec<AppliedMutation>,
    module: String,
    function_name: Option<String>,
    mutant_source: String,
}

/// Finalized mutation handed back to views that emit per-mutation artifacts.
pub struct ClosedMutation {
    pub record: MutationRecord,
    pub mutant_source: String,
}

/// Accumulating state shared by the structured report views: builds the
/// [`RunRecord`] event by event, runs attribution when a mutation opens, and
/// appends kills to the process-wide ledger.
pub struct Accumulator {
    record: RunRecord,
    pending: Option<PendingMutation>,
    ledger: SharedLedger,
}

impl Accumulator {
    pub fn new(ledger: SharedLedger) -> Self {
        Accumulator {
            record: RunRecord::default(),
            pending: None,
            ledger,
        }
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    pub fn initialize(&mut self, targets: &[String], tests: &[String]) {
        self.record.targets = targets.to_vec();
        self.record.tests = tests.to_vec();
    }

    pub fn tests_passed(&mut self, tests: &[PassedTest], number_of_tests: usize) {
        self.record.passed_tests = tests.to_vec();
        self.record.number_of_tests = number_of_tests;
    }

    pub fn open_mutation(
        &mut self,
        number: u32,
        mutations: &[AppliedMutation],
        module: &str,
        original_source: &str,
        mutant_source: &str,
    ) -> io::Result<()> {
        if self.pending.is_some() {
            return Err(state_error(format!(
                "mutation #{} opened while another is still pending",
                number
            )));
        }
        let function_name = attribution::attribute(original_source, mutant_source);
        self.pending = Some(PendingMutation {
            number,
            mutations: mutations.to_vec(),
            module: module.to_string(),
            function_name,
            mutant_source: mutant_source.to_string(),
        });
        Ok(())
    }

    /// Closes the pending mutation with its terminal status, appending the
    /// finalized record to the run and, for kills, to the ledger.
    pub fn close_mutation(
        &mut self,
        status: MutationStatus,
        time: f64,
        killer: Option<&str>,
        tests_run: Option<usize>,
        failure_output: Option<&str>,
    ) -> io::Result<ClosedMutation> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| state_error("terminal event with no pending mutation".to_string()))?;

        let record = MutationRecord {
            number: pending.number,
            mutations: pending.mutations,
            module: pending.module,
            function_name: pending.function_name,
            status,
            time,
            killer: killer.map(str::to_string),
            tests_run,
            failure_output: failure_output.map(str::to_string),
        };

        self.record.score.tally(status);
        *self
            .record
            .time_stats
            .entry(status.as_str().to_string())
            .or_insert(0.0) += time;
        self.record.mutations.push(record.clone());

        if status == MutationStatus::Killed {
            self.ledger
                .borrow_mut()
                .append(KilledMutation::from_record(&record))?;
        }

        Ok(ClosedMutation {
            record,
            mutant_source: pending.mutant_source,
        })
    }

    /// Seals the record. Mutant counters keep the tallied values; node
    /// coverage is only measured by the engine and is taken from its score.
    pub fn end(&mut self, score: &Score, duration: f64) {
        self.record.score.covered_nodes = score.covered_nodes;
        self.record.score.all_nodes = score.all_nodes;
        self.record.total_time = duration;
    }
}

fn state_error(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg)
}

#[derive(Serialize)]
struct YamlReport<'a> {
    targets: &'a [String],
    tests: &'a [PassedTest],
    number_of_tests: usize,
    mutations: &'a [MutationRecord],
    total_time: f64,
    time_stats: &'a BTreeMap<String, f64>,
    mutation_score: f64,
    coverage: Coverage,
}

#[derive(Serialize)]
struct Coverage {
    covered_nodes: usize,
    all_nodes: usize,
}

/// Serializes the finalized run record into a block-style YAML document.
pub struct YamlView {
    acc: Accumulator,
    path: PathBuf,
}

impl YamlView {
    pub fn new(path: impl Into<PathBuf>, ledger: SharedLedger) -> Self {
        YamlView {
            acc: Accumulator::new(ledger),
            path: path.into(),
        }
    }

    pub fn record(&self) -> &RunRecord {
        self.acc.record()
    }

    /// Renders the report document. Stable across repeated calls on the
    /// same finalized record.
    pub fn render(&self) -> io::Result<String> {
        let record = self.acc.record();
        let report = YamlReport {
            targets: &record.targets,
            tests: &record.passed_tests,
            number_of_tests: record.number_of_tests,
            mutations: &record.mutations,
            total_time: record.total_time,
            time_stats: &record.time_stats,
            mutation_score: record.score.count(),
            coverage: Coverage {
                covered_nodes: record.score.covered_nodes,
                all_nodes: record.score.all_nodes,
            },
        };
        serde_yaml::to_string(&report).map_err(io::Error::other)
    }
}

impl RunView for YamlView {
    fn initialize(&mut self, targets: &[String], tests: &[String]) -> io::Result<()> {
        self.acc.initialize(targets, tests);
        Ok(())
    }

    fn tests_passed(&mut self, tests: &[PassedTest], number_of_tests: usize) -> io::Result<()> {
        self.acc.tests_passed(tests, number_of_tests);
        Ok(())
    }

    fn mutation(
        &mut self,
        number: u32,
        mutations: &[AppliedMutation],
        module: &str,
        original_source: &str,
        mutant_source: &str,
    ) -> io::Result<()> {
        self.acc
            .open_mutation(number, mutations, module, original_source, mutant_source)
    }

    fn killed(
        &mut self,
        time: f64,
        killer: &str,
        failure_output: &str,
        tests_run: usize,
    ) -> io::Result<()> {
        self.acc
            .close_mutation(
                MutationStatus::Killed,
                time,
                Some(killer),
                Some(tests_run),
                Some(failure_output),
            )
            .map(|_| ())
    }

    fn survived(&mut self, time: f64, tests_run: usize) -> io::Result<()> {
        self.acc
            .close_mutation(MutationStatus::Survived, time, None, Some(tests_run), None)
            .map(|_| ())
    }

    fn timeout(&mut self, time: f64) -> io::Result<()> {
        self.acc
            .close_mutation(MutationStatus::Timeout, time, None, None, None)
            .map(|_| ())
    }

    fn incompetent(&mut self, time: f64, error: &str, tests_run: usize) -> io::Result<()> {
        self.acc
            .close_mutation(
                MutationStatus::Incompetent,
                time,
                None,
                Some(tests_run),
                Some(error),
            )
            .map(|_| ())
    }

    fn end(&mut self, score: &Score, duration: f64) -> io::Result<()> {
        self.acc.end(score, duration);
        ledger::write_atomic(&self.path, &self.render()?)
    }
}
