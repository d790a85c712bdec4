use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::events::{AppliedMutation, PassedTest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStatus {
    Killed,
    Survived,
    Timeout,
    Incompetent,
}

impl MutationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationStatus::Killed => "killed",
            MutationStatus::Survived => "survived",
            MutationStatus::Timeout => "timeout",
            MutationStatus::Incompetent => "incompetent",
        }
    }
}

/// Finalized outcome of a single mutant. Created when the engine announces
/// the mutation, closed by exactly one terminal event, immutable after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub number: u32,
    pub mutations: Vec<AppliedMutation>,
    pub module: String,
    /// Function the edit landed in; `None` when attribution could not
    /// resolve it.
    pub function_name: Option<String>,
    pub status: MutationStatus,
    pub time: f64,
    pub killer: Option<String>,
    pub tests_run: Option<usize>,
    pub failure_output: Option<String>,
}

/// Mutant counters plus AST-node coverage for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub all_mutants: usize,
    pub killed_mutants: usize,
    pub survived_mutants: usize,
    pub incompetent_mutants: usize,
    pub timeout_mutants: usize,
    pub covered_nodes: usize,
    pub all_nodes: usize,
}

impl Score {
    /// Mutation score percentage: killed over all. Zero for an empty run.
    pub fn count(&self) -> f64 {
        if self.all_mutants == 0 {
            0.0
        } else {
            100.0 * self.killed_mutants as f64 / self.all_mutants as f64
        }
    }

    pub fn tally(&mut self, status: MutationStatus) {
        self.all_mutants += 1;
        match status {
            MutationStatus::Killed => self.killed_mutants += 1,
            MutationStatus::Survived => self.survived_mutants += 1,
            MutationStatus::Timeout => self.timeout_mutants += 1,
            MutationStatus::Incompetent => self.incompetent_mutants += 1,
        }
    }
}

/// Aggregate state of one mutation run, built incrementally by an
/// accumulating view and finalized at `end`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub targets: Vec<String>,
    pub tests: Vec<String>,
    pub passed_tests: Vec<PassedTest>,
    pub number_of_tests: usize,
    pub mutations: Vec<MutationRecord>,
    pub score: Score,
    pub total_time: f64,
    /// Cumulative mutant test-execution time keyed by terminal status.
    pub time_stats: BTreeMap<String, f64>,
}
