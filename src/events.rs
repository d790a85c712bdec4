use serde::{Deserialize, Serialize};

use crate::record::Score;

/// One edit applied by a mutation operator, identified by the operator's
/// short name and the 1-based source line it touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedMutation {
    pub operator: String,
    pub line: usize,
}

/// A test that passed against the unmutated target during the baseline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassedTest {
    pub name: String,
    pub target: Option<String>,
    pub time: f64,
}

/// A failing test from the baseline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFailure {
    pub name: String,
    pub short_message: String,
}

/// Lifecycle event emitted by the mutation engine during one run.
///
/// For a run the engine sends `Initialize`, `Start`, then for every mutant a
/// `MutationGenerated` followed by exactly one terminal event
/// (`Killed`/`Survived`/`Timeout`/`Incompetent`), and finally `End`.
/// `TestsPassed` or `OriginalTestsFailed` may precede `Start`, and
/// `CantLoad` may appear anywhere the engine fails to resolve a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    Initialize {
        targets: Vec<String>,
        tests: Vec<String>,
    },
    Start,
    TestsPassed {
        tests: Vec<PassedTest>,
        number_of_tests: usize,
    },
    OriginalTestsFailed {
        failures: Vec<TestFailure>,
        /// Set when the baseline run itself blew up rather than failing
        /// an assertion.
        #[serde(default)]
        error: Option<String>,
    },
    CantLoad {
        name: String,
        error: String,
    },
    MutationGenerated {
        number: u32,
        mutations: Vec<AppliedMutation>,
        module: String,
        /// Regenerated listing of the unmutated module.
        original_source: String,
        /// Regenerated listing of the mutant.
        mutant_source: String,
    },
    Killed {
        time: f64,
        killer: String,
        failure_output: String,
        tests_run: usize,
    },
    Survived {
        time: f64,
        tests_run: usize,
    },
    Timeout {
        time: f64,
    },
    Incompetent {
        time: f64,
        error: String,
        tests_run: usize,
    },
    End {
        score: Score,
        duration: f64,
    },
}
