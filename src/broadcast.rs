use std::io;

use crate::events::{AppliedMutation, PassedTest, RunEvent, TestFailure};
use crate::record::Score;

/// Receiver of lifecycle events fanned out by a [`Broadcaster`].
///
/// Every method has a no-op default body, so a view implements only the
/// events it cares about. Returning an error from any handler aborts the
/// whole notification pass; views are not sandboxed from each other.
pub trait RunView {
    fn initialize(&mut self, _targets: &[String], _tests: &[String]) -> io::Result<()> {
        Ok(())
    }

    fn start(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn tests_passed(&mut self, _tests: &[PassedTest], _number_of_tests: usize) -> io::Result<()> {
        Ok(())
    }

    fn original_tests_failed(
        &mut self,
        _failures: &[TestFailure],
        _error: Option<&str>,
    ) -> io::Result<()> {
        Ok(())
    }

    fn cant_load(&mut self, _name: &str, _error: &str) -> io::Result<()> {
        Ok(())
    }

    fn mutation(
        &mut self,
        _number: u32,
        _mutations: &[AppliedMutation],
        _module: &str,
        _original_source: &str,
        _mutant_source: &str,
    ) -> io::Result<()> {
        Ok(())
    }

    fn killed(
        &mut self,
        _time: f64,
        _killer: &str,
        _failure_output: &str,
        _tests_run: usize,
    ) -> io::Result<()> {
        Ok(())
    }

    fn survived(&mut self, _time: f64, _tests_run: usize) -> io::Result<()> {
        Ok(())
    }

    fn timeout(&mut self, _time: f64) -> io::Result<()> {
        Ok(())
    }

    fn incompetent(&mut self, _time: f64, _error: &str, _tests_run: usize) -> io::Result<()> {
        Ok(())
    }

    fn end(&mut self, _score: &Score, _duration: f64) -> io::Result<()> {
        Ok(())
    }
}

/// Stateless fan-out dispatcher. Views are notified synchronously, in
/// registration order.
pub struct Broadcaster {
    views: Vec<(usize, Box<dyn RunView>)>,
    next_id: usize,
}

impl Broadcaster {
    pub fn new() -> Self {
        Broadcaster {
            views: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a view and returns a handle usable with [`unregister`].
    ///
    /// [`unregister`]: Broadcaster::unregister
    pub fn register(&mut self, view: Box<dyn RunView>) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.views.push((id, view));
        id
    }

    pub fn unregister(&mut self, id: usize) -> Option<Box<dyn RunView>> {
        let pos = self.views.iter().position(|(view_id, _)| *view_id == id)?;
        Some(self.views.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Delivers one event to every registered view. Stops at the first view
    /// error and returns it.
    pub fn notify(&mut self, event: &RunEvent) -> io::Result<()> {
        for (_, view) in &mut self.views {
            dispatch(view.as_mut(), event)?;
        }
        Ok(())
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Broadcaster::new()
    }
}

fn dispatch(view: &mut dyn RunView, event: &RunEvent) -> io::Result<()> {
    match event {
        RunEvent::Initialize { targets, tests } => view.initialize(targets, tests),
        RunEvent::Start => view.start(),
        RunEvent::TestsPassed {
            tests,
            number_of_tests,
        } => view.tests_passed(tests, *number_of_tests),
        RunEvent::OriginalTestsFailed { failures, error } => {
            view.original_tests_failed(failures, error.as_deref())
        }
        RunEvent::CantLoad { name, error } => view.cant_load(name, error),
        RunEvent::MutationGenerated {
            number,
            mutations,
            module,
            original_source,
            mutant_source,
        } => view.mutation(*number, mutations, module, original_source, mutant_source),
        RunEvent::Killed {
            time,
            killer,
            failure_output,
            tests_run,
        } => view.killed(*time, killer, failure_output, *tests_run),
        RunEvent::Survived { time, tests_run } => view.survived(*time, *tests_run),
        RunEvent::Timeout { time } => view.timeout(*time),
        RunEvent::Incompetent {
            time,
            error,
            tests_run,
        } => view.incompetent(*time, error, *tests_run),
        RunEvent::End { score, duration } => view.end(score, *duration),
    }
}
