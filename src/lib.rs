//! Reporting core for mutation test runs: a broadcaster fans engine
//! lifecycle events out to independently configured views, which render
//! console progress, accumulate a run record, attribute each mutation to
//! the function it altered, and materialize YAML/HTML report artifacts.

pub mod attribution;
pub mod broadcast;
pub mod events;
pub mod html;
pub mod ledger;
pub mod output;
pub mod record;
pub mod report;
