use console::Style;
use std::io::{self, Write};

use crate::attribution;
use crate::broadcast::RunView;
use crate::events::{AppliedMutation, PassedTest, TestFailure};
use crate::record::Score;

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_success(msg: &str) {
    let style = Style::new().green().bold();
    println!("{} {}", style.apply_to("✓"), msg);
}

fn paint(colored: bool, text: &str, style: Style) -> String {
    if colored {
        style.apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

fn time_format(time: Option<f64>) -> String {
    match time {
        None => "[    -    ]".to_string(),
        Some(t) => format!("[{:.5} s]", t),
    }
}

fn level_print(colored: bool, msg: &str, level: u8) {
    println!("{} {}", level_prefix(colored, level), msg);
}

fn level_print_unended(colored: bool, msg: &str, level: u8) {
    print!("{} {}", level_prefix(colored, level), msg);
    let _ = io::stdout().flush();
}

fn level_prefix(colored: bool, level: u8) -> String {
    if level == 1 {
        paint(colored, "[*]", Style::new().blue())
    } else {
        paint(colored, "   -", Style::new().cyan())
    }
}

fn score_line(colored: bool, score: &Score, duration: f64) -> String {
    format!(
        "Mutation score {}: {}",
        time_format(Some(duration)),
        paint(
            colored,
            &format!("{:.1}%", score.count()),
            Style::new().blue().bold(),
        ),
    )
}

/// Prints only the final score line.
pub struct QuietTextView {
    colored: bool,
}

impl QuietTextView {
    pub fn new(colored: bool) -> Self {
        QuietTextView { colored }
    }
}

impl RunView for QuietTextView {
    fn end(&mut self, score: &Score, duration: f64) -> io::Result<()> {
        level_print(self.colored, &score_line(self.colored, score, duration), 1);
        Ok(())
    }
}

/// Line-oriented progress view. Each mutation is announced without a line
/// terminator and its terminal event completes the line.
pub struct TextView {
    colored: bool,
    show_mutants: bool,
}

impl TextView {
    pub fn new(colored: bool, show_mutants: bool) -> Self {
        TextView {
            colored,
            show_mutants,
        }
    }

    fn print_code(&self, original: &str, mutant: &str) {
        let diff = attribution::diff_lines(
            &attribution::add_line_numbers(original),
            &attribution::add_line_numbers(mutant),
        );
        let styled: Vec<String> = diff
            .into_iter()
            .map(|line| {
                if line.starts_with("- ") {
                    paint(self.colored, &line, Style::new().blue())
                } else if line.starts_with("+ ") {
                    paint(self.colored, &line, Style::new().green())
                } else {
                    line
                }
            })
            .collect();
        let rule = "-".repeat(80);
        println!("\n{}\n{}\n{}", rule, styled.join("\n"), rule);
    }
}

impl RunView for TextView {
    fn initialize(&mut self, targets: &[String], tests: &[String]) -> io::Result<()> {
        level_print(self.colored, "Start mutation process:", 1);
        level_print(self.colored, &format!("targets: {}", targets.join(", ")), 2);
        level_print(self.colored, &format!("tests: {}", tests.join(", ")), 2);
        Ok(())
    }

    fn start(&mut self) -> io::Result<()> {
        level_print(self.colored, "Start mutants generation and execution:", 1);
        Ok(())
    }

    fn tests_passed(&mut self, tests: &[PassedTest], number_of_tests: usize) -> io::Result<()> {
        level_print(self.colored, &format!("{} tests passed:", number_of_tests), 1);
        for test in tests {
            let name = match &test.target {
                Some(target) => format!("{}.{}", test.name, target),
                None => test.name.clone(),
            };
            level_print(
                self.colored,
                &format!("{} {}", name, time_format(Some(test.time))),
                2,
            );
        }
        Ok(())
    }

    fn original_tests_failed(
        &mut self,
        failures: &[TestFailure],
        error: Option<&str>,
    ) -> io::Result<()> {
        level_print(
            self.colored,
            &paint(self.colored, "Tests failed:", Style::new().red().bold()),
            1,
        );
        for failure in failures {
            level_print(
                self.colored,
                &format!("fail in {} - {}", failure.name, failure.short_message),
                2,
            );
        }
        if let Some(error) = error {
            level_print(self.colored, error, 2);
        }
        Ok(())
    }

    fn cant_load(&mut self, name: &str, error: &str) -> io::Result<()> {
        level_print(
            self.colored,
            &format!(
                "{}{} ({})",
                paint(self.colored, "Can't load module: ", Style::new().red().bold()),
                name,
                error,
            ),
            1,
        );
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
        for (i, mutation) in mutations.iter().enumerate() {
            level_print_unended(
                self.colored,
                &format!("[#{:>4}] {:<3} {}: ", number, mutation.operator, module),
                2,
            );
            if i + 1 < mutations.len() {
                println!();
            }
        }
        if self.show_mutants {
            self.print_code(original_source, mutant_source);
        }
        Ok(())
    }

    fn killed(
        &mut self,
        time: f64,
        killer: &str,
        _failure_output: &str,
        _tests_run: usize,
    ) -> io::Result<()> {
        println!(
            "{} {} by {}",
            time_format(Some(time)),
            paint(self.colored, "killed", Style::new().green()),
            killer,
        );
        Ok(())
    }

    fn survived(&mut self, time: f64, _tests_run: usize) -> io::Result<()> {
        println!(
            "{} {}",
            time_format(Some(time)),
            paint(self.colored, "survived", Style::new().red()),
        );
        Ok(())
    }

    fn timeout(&mut self, time: f64) -> io::Result<()> {
        println!(
            "{} {}",
            time_format(Some(time)),
            paint(self.colored, "timeout", Style::new().yellow()),
        );
        Ok(())
    }

    fn incompetent(&mut self, time: f64, _error: &str, _tests_run: usize) -> io::Result<()> {
        println!(
            "{} {}",
            time_format(Some(time)),
            paint(self.colored, "incompetent", Style::new().cyan()),
        );
        Ok(())
    }

    fn end(&mut self, score: &Score, duration: f64) -> io::Result<()> {
        level_print(self.colored, &score_line(self.colored, score, duration), 1);
        level_print(self.colored, &format!("all: {}", score.all_mutants), 2);

        if score.all_mutants > 0 {
            let all = score.all_mutants as f64;
            level_print(
                self.colored,
                &format!(
                    "killed: {} ({:.1}%)",
                    score.killed_mutants,
                    100.0 * score.killed_mutants as f64 / all,
                ),
                2,
            );
            level_print(
                self.colored,
                &format!(
                    "survived: {} ({:.1}%)",
                    score.survived_mutants,
                    100.0 * score.survived_mutants as f64 / all,
                ),
                2,
            );
            level_print(
                self.colored,
                &format!(
                    "incompetent: {} ({:.1}%)",
                    score.incompetent_mutants,
                    100.0 * score.incompetent_mutants as f64 / all,
                ),
                2,
            );
            level_print(
                self.colored,
                &format!(
                    "timeout: {} ({:.1}%)",
                    score.timeout_mutants,
                    100.0 * score.timeout_mutants as f64 / all,
                ),
                2,
            );
            if score.all_nodes > 0 {
                level_print(
                    self.colored,
                    &format!(
                        "Coverage: {} of {} AST nodes ({:.1}%)",
                        score.covered_nodes,
                        score.all_nodes,
                        100.0 * score.covered_nodes as f64 / score.all_nodes as f64,
                    ),
                    1,
                );
            }
        }
        Ok(())
    }
}

/// Dumps captured failure output verbatim, for debugging the mutation
/// engine itself.
pub struct DebugView;

impl RunView for DebugView {
    fn killed(
        &mut self,
        _time: f64,
        _killer: &str,
        failure_output: &str,
        _tests_run: usize,
    ) -> io::Result<()> {
        println!("\n{}", failure_output);
        Ok(())
    }

    fn incompetent(&mut self, _time: f64, error: &str, _tests_run: usize) -> io::Result<()> {
        println!("\n{}", error);
        Ok(())
    }
}
