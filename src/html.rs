use std::fs;
use std::io;
use std::path::PathBuf;

use time::OffsetDateTime;
use time::macros::format_description;

use crate::broadcast::RunView;
use crate::events::{AppliedMutation, PassedTest};
use crate::ledger::SharedLedger;
use crate::record::{MutationRecord, MutationStatus, Score};
use crate::report::{Accumulator, ClosedMutation};

/// Directory report: one detail page per mutation as it closes, plus an
/// index page written at the end of the run.
pub struct HtmlView {
    acc: Accumulator,
    dir: PathBuf,
}

impl HtmlView {
    pub fn new(dir: impl Into<PathBuf>, ledger: SharedLedger) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(dir.join("mutants"))?;
        Ok(HtmlView {
            acc: Accumulator::new(ledger),
            dir,
        })
    }

    fn write_detail(&self, closed: &ClosedMutation) -> io::Result<()> {
        const TEMPLATE: &str = include_str!("templates/detail.html");

        let record = &closed.record;
        let mutations: String = record
            .mutations
            .iter()
            .map(|m| {
                format!(
                    "<li>{} at line {}</li>",
                    escape_html(&m.operator),
                    m.line
                )
            })
            .collect();

        let page = TEMPLATE
            .replace("{{NUMBER}}", &record.number.to_string())
            .replace("{{MODULE}}", &escape_html(&record.module))
            .replace(
                "{{FUNCTION}}",
                &escape_html(record.function_name.as_deref().unwrap_or("-")),
            )
            .replace("{{STATUS}}", record.status.as_str())
            .replace("{{TIME}}", &format!("{:.5}", record.time))
            .replace(
                "{{KILLER}}",
                &escape_html(record.killer.as_deref().unwrap_or("-")),
            )
            .replace("{{MUTATIONS}}", &mutations)
            .replace("{{MUTANT_CODE}}", &escape_html(&closed.mutant_source));

        fs::write(
            self.dir
                .join("mutants")
                .join(format!("{}.html", record.number)),
            page,
        )
    }

    fn write_index(&self, duration: f64) -> io::Result<()> {
        const TEMPLATE: &str = include_str!("templates/index.html");

        let record = self.acc.record();
        let page = TEMPLATE
            .replace("{{SCORE}}", &format!("{:.1}%", record.score.count()))
            .replace("{{DURATION}}", &format!("{:.5}", duration))
            .replace("{{TARGETS}}", &escape_html(&record.targets.join(", ")))
            .replace(
                "{{NUMBER_OF_TESTS}}",
                &record.number_of_tests.to_string(),
            )
            .replace("{{TEST_ROWS}}", &build_test_rows(&record.passed_tests))
            .replace("{{MUTATION_ROWS}}", &build_mutation_rows(&record.mutations))
            .replace("{{TIMESTAMP}}", &timestamp_utc());

        fs::write(self.dir.join("index.html"), page)
    }
}

impl RunView for HtmlView {
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
        let closed = self.acc.close_mutation(
            MutationStatus::Killed,
            time,
            Some(killer),
            Some(tests_run),
            Some(failure_output),
        )?;
        self.write_detail(&closed)
    }

    fn survived(&mut self, time: f64, tests_run: usize) -> io::Result<()> {
        let closed =
            self.acc
                .close_mutation(MutationStatus::Survived, time, None, Some(tests_run), None)?;
        self.write_detail(&closed)
    }

    fn timeout(&mut self, time: f64) -> io::Result<()> {
        let closed = self
            .acc
            .close_mutation(MutationStatus::Timeout, time, None, None, None)?;
        self.write_detail(&closed)
    }

    fn incompetent(&mut self, time: f64, error: &str, tests_run: usize) -> io::Result<()> {
        let closed = self.acc.close_mutation(
            MutationStatus::Incompetent,
            time,
            None,
            Some(tests_run),
            Some(error),
        )?;
        self.write_detail(&closed)
    }

    fn end(&mut self, score: &Score, duration: f64) -> io::Result<()> {
        self.acc.end(score, duration);
        self.write_index(duration)
    }
}

fn build_test_rows(tests: &[PassedTest]) -> String {
    let mut rows = String::new();
    for test in tests {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{:.5}</td></tr>\n",
            escape_html(&test.name),
            escape_html(test.target.as_deref().unwrap_or("-")),
            test.time,
        ));
    }
    rows
}

fn build_mutation_rows(mutations: &[MutationRecord]) -> String {
    let mut rows = String::new();
    for record in mutations {
        let operators: Vec<String> = record
            .mutations
            .iter()
            .map(|m| format!("{}:{}", escape_html(&m.operator), m.line))
            .collect();
        rows.push_str(&format!(
            "<tr><td class=\"num\"><a href=\"mutants/{number}.html\">#{number}</a></td>\
             <td>{module}</td><td>{function}</td><td>{operators}</td>\
             <td class=\"status-{status}\">{status}</td>\
             <td class=\"num\">{time:.5}</td><td>{killer}</td></tr>\n",
            number = record.number,
            module = escape_html(&record.module),
            function = escape_html(record.function_name.as_deref().unwrap_or("-")),
            operators = operators.join(", "),
            status = record.status.as_str(),
            time = record.time,
            killer = escape_html(record.killer.as_deref().unwrap_or("-")),
        ));
    }
    rows
}

fn timestamp_utc() -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    OffsetDateTime::now_utc()
        .format(&format)
        .unwrap_or_else(|_| "1970-01-01 00:00:00 UTC".to_string())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
