mod classify;
mod config;
mod errors;
mod extract;
mod harvest;
mod logger;
mod model;
mod report;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::{
    config::Config,
    model::{Bug, Severity, TestKind},
    report::{bugs, cases},
};

const BANNER: &str = "==================================================";

#[derive(Parser)]
#[command(
    name = "testscribe",
    version,
    about = "Writes markdown test-case and bug reports for a C# xUnit solution."
)]
struct Cli {
    #[arg(long, help = "Path to a testscribe.toml config file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Project root; reports are written here")]
    root: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Print a JSON run summary at the end")]
    json: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone, Copy)]
enum CliCommand {
    /// Run the unit tests and write the bug report
    Bugs,
    /// Write the unit test case report
    Unit,
    /// Write the Selenium UI test case report
    Ui,
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    bug_report: Option<BugSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_test_report: Option<CaseSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ui_test_report: Option<CaseSummary>,
}

#[derive(Debug, Serialize)]
struct BugSummary {
    path: PathBuf,
    total: usize,
    by_severity: Vec<(Severity, Vec<Bug>)>,
}

#[derive(Debug, Serialize)]
struct CaseSummary {
    path: Option<PathBuf>,
    tests: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root_dir = root;
    }

    let summary = match cli.command {
        Some(CliCommand::Bugs) => RunSummary {
            bug_report: Some(run_bug_report(&config)?),
            ..RunSummary::default()
        },
        Some(CliCommand::Unit) => RunSummary {
            unit_test_report: Some(run_case_report(&config, TestKind::Unit)?),
            ..RunSummary::default()
        },
        Some(CliCommand::Ui) => RunSummary {
            ui_test_report: Some(run_case_report(&config, TestKind::Ui)?),
            ..RunSummary::default()
        },
        None => run_all(&config)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn run_all(config: &Config) -> Result<RunSummary, Box<dyn Error>> {
    println!("Generating all reports...");
    println!("{BANNER}");

    let bug = run_bug_report(config)?;
    let unit = run_case_report(config, TestKind::Unit)?;
    let ui = run_case_report(config, TestKind::Ui)?;

    println!("{BANNER}");
    println!("Report generation completed!");
    println!(
        "- Bug report: {} ({} bugs found)",
        config.output.bug_report, bug.total
    );
    println!(
        "- Unit test report: {} ({} tests)",
        config.output.unit_test_report, unit.tests
    );
    println!(
        "- Selenium test report: {} ({} tests)",
        config.output.ui_test_report, ui.tests
    );

    Ok(RunSummary {
        bug_report: Some(bug),
        unit_test_report: Some(unit),
        ui_test_report: Some(ui),
    })
}

fn run_bug_report(config: &Config) -> Result<BugSummary, Box<dyn Error>> {
    let outcome = bugs::generate(config)?;

    Ok(BugSummary {
        path: outcome.path,
        total: outcome.buckets.total(),
        by_severity: outcome
            .buckets
            .iter()
            .map(|(severity, bugs)| (severity, bugs.to_vec()))
            .collect(),
    })
}

fn run_case_report(config: &Config, kind: TestKind) -> Result<CaseSummary, Box<dyn Error>> {
    let summary = match cases::generate(config, kind)? {
        Some((path, tests)) => CaseSummary {
            path: Some(path),
            tests,
        },
        None => CaseSummary {
            path: None,
            tests: 0,
        },
    };

    Ok(summary)
}
