use mutreport::attribution;
use mutreport::broadcast::Broadcaster;
use mutreport::events::RunEvent;
use mutreport::html::HtmlView;
use mutreport::ledger::{self, KilledLedger};
use mutreport::output::{self, DebugView, QuietTextView, TextView};
use mutreport::report::YamlView;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mutreport", version, about = "Report pipeline for mutation test runs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded engine event stream through the report views
    Replay {
        /// JSON file holding the recorded event sequence
        events: PathBuf,
        /// Write the YAML run report to this file
        #[arg(long)]
        yaml: Option<PathBuf>,
        /// Write the HTML report into this directory
        #[arg(long)]
        html: Option<PathBuf>,
        /// Only print the final score line
        #[arg(short, long)]
        quiet: bool,
        /// Print raw failure output for killed/incompetent mutants
        #[arg(long)]
        debug: bool,
        /// Print a source diff for every generated mutant
        #[arg(long)]
        show_mutants: bool,
        /// Colorize console output
        #[arg(long)]
        color: bool,
        /// Killed-mutation ledger path (default: .mutreport-killed.json)
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// Resolve which function a mutant altered
    Attribute {
        /// Original source file
        #[arg(long)]
        original: PathBuf,
        /// Mutated source file
        #[arg(long)]
        mutant: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Replay {
            events,
            yaml,
            html,
            quiet,
            debug,
            show_mutants,
            color,
            ledger,
        } => cmd_replay(events, yaml, html, quiet, debug, show_mutants, color, ledger),
        Commands::Attribute { original, mutant } => cmd_attribute(original, mutant),
    };

    process::exit(exit_code);
}

fn cmd_replay(
    events_path: PathBuf,
    yaml: Option<PathBuf>,
    html: Option<PathBuf>,
    quiet: bool,
    debug: bool,
    show_mutants: bool,
    color: bool,
    ledger_path: Option<PathBuf>,
) -> i32 {
    let data = match std::fs::read_to_string(&events_path) {
        Ok(d) => d,
        Err(e) => {
            output::print_error(&format!("Failed to read {}: {}", events_path.display(), e));
            return 2;
        }
    };

    let events: Vec<RunEvent> = match serde_json::from_str(&data) {
        Ok(events) => events,
        Err(e) => {
            output::print_error(&format!(
                "Invalid event stream in {}: {}",
                events_path.display(),
                e
            ));
            return 2;
        }
    };

    let shared_ledger = ledger::shared(match ledger_path {
        Some(path) => KilledLedger::new(path),
        None => KilledLedger::with_default_path(),
    });

    let mut broadcaster = Broadcaster::new();
    if quiet {
        broadcaster.register(Box::new(QuietTextView::new(color)));
    } else {
        broadcaster.register(Box::new(TextView::new(color, show_mutants)));
    }
    if debug {
        broadcaster.register(Box::new(DebugView));
    }
    if let Some(path) = yaml {
        broadcaster.register(Box::new(YamlView::new(path, shared_ledger.clone())));
    }
    if let Some(dir) = html {
        match HtmlView::new(dir, shared_ledger.clone()) {
            Ok(view) => {
                broadcaster.register(Box::new(view));
            }
            Err(e) => {
                output::print_error(&format!("Failed to set up HTML report directory: {}", e));
                return 3;
            }
        }
    }

    for event in &events {
        if let Err(e) = broadcaster.notify(event) {
            output::print_error(&format!("Reporting failed: {}", e));
            return 3;
        }
    }

    0
}

fn cmd_attribute(original: PathBuf, mutant: PathBuf) -> i32 {
    let original_src = match std::fs::read_to_string(&original) {
        Ok(s) => s,
        Err(e) => {
            output::print_error(&format!("Failed to read {}: {}", original.display(), e));
            return 2;
        }
    };
    let mutant_src = match std::fs::read_to_string(&mutant) {
        Ok(s) => s,
        Err(e) => {
            output::print_error(&format!("Failed to read {}: {}", mutant.display(), e));
            return 2;
        }
    };

    match attribution::attribute(&original_src, &mutant_src) {
        Some(name) => {
            output::print_success(&name);
            0
        }
        None => {
            output::print_error("Attribution unresolved: no changed line maps to a function.");
            1
        }
    }
}
