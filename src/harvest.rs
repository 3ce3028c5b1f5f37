// Runs the external test runner and pulls failing test names out of its output.
// The runner's own diagnostics are not parsed; every failure gets FAILURE_TEXT.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::RunnerConfig;
use crate::errors::{ReportError, Result};
use crate::model::Failure;

pub const FAILURE_MARKER: &str = "Failed";
pub const FAILURE_TEXT: &str = "Test execution failed";

const TEST_LIKE: &str = "Test";
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Never fails: runner problems are printed and yield an empty list.
pub fn collect_failures(runner: &RunnerConfig, test_dir: &Path) -> Vec<Failure> {
    if !test_dir.is_dir() {
        warn!(dir = %test_dir.display(), "test directory missing, skipping runner");
        return Vec::new();
    }

    let output = match run_runner(runner, test_dir) {
        Ok(output) => output,
        Err(e) => {
            println!("Error running tests: {e}");
            return Vec::new();
        }
    };

    let failures = parse_failures(&output);

    println!("Debug: Found {} unique test failures", failures.len());
    for failure in &failures {
        println!("  - {}.{}", failure.class, failure.method);
    }

    failures
}

/// Combined stdout + stderr of one runner invocation.
pub fn run_runner(runner: &RunnerConfig, working_dir: &Path) -> Result<String> {
    debug!(program = %runner.program, args = ?runner.args, dir = %working_dir.display(), "starting runner");

    let mut child = Command::new(&runner.program)
        .args(&runner.args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ReportError::Spawn {
            program: runner.program.clone(),
            source,
        })?;

    // Drain both pipes while polling so a chatty runner cannot block on a full buffer.
    let (tx, rx) = mpsc::channel();
    let mut pending = 0;
    if let Some(out) = child.stdout.take() {
        drain(out, Stream::Stdout, tx.clone());
        pending += 1;
    }
    if let Some(err) = child.stderr.take() {
        drain(err, Stream::Stderr, tx.clone());
        pending += 1;
    }
    drop(tx);

    let started = Instant::now();
    let deadline = started + Duration::from_secs(runner.timeout_secs);
    let timed_out = || ReportError::Timeout {
        program: runner.program.clone(),
        secs: runner.timeout_secs,
    };

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(code = ?status.code(), elapsed_ms = started.elapsed().as_millis() as u64, "runner finished");
                break;
            }
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(timed_out());
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                let _ = child.kill();
                return Err(ReportError::Wait {
                    program: runner.program.clone(),
                    source,
                });
            }
        }
    }

    // Grandchildren can inherit the pipes and keep them open after the runner exits.
    let (mut stdout, mut stderr) = (String::new(), String::new());
    while pending > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((Stream::Stdout, text)) => stdout = text,
            Ok((Stream::Stderr, text)) => stderr = text,
            Err(RecvTimeoutError::Timeout) => {
                warn!(program = %runner.program, "runner output still open at deadline");
                return Err(timed_out());
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
        pending -= 1;
    }

    stdout.push_str(&stderr);
    Ok(stdout)
}

/// Unique failures in first-seen order.
pub fn parse_failures(output: &str) -> Vec<Failure> {
    let mut seen = HashSet::new();
    let mut failures = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        if !line.starts_with(FAILURE_MARKER) || !line.contains('.') {
            continue;
        }

        let full_name = line.replace("Failed ", "").trim().to_string();
        if seen.contains(&full_name) {
            continue;
        }

        let Some((class, method)) = split_test_name(&full_name) else {
            continue;
        };

        if !class.contains(TEST_LIKE) && !method.contains(TEST_LIKE) {
            continue;
        }

        failures.push(Failure {
            class: class.to_string(),
            method: method.to_string(),
            error: FAILURE_TEXT.to_string(),
        });
        seen.insert(full_name);
    }

    failures
}

/// Last two dot-separated segments as (class, method).
fn split_test_name(full_name: &str) -> Option<(&str, &str)> {
    let (rest, method) = full_name.rsplit_once('.')?;
    let class = rest.rsplit('.').next().unwrap_or(rest);
    Some((class, method))
}

enum Stream {
    Stdout,
    Stderr,
}

fn drain<R: Read + Send + 'static>(mut reader: R, stream: Stream, tx: Sender<(Stream, String)>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        let _ = tx.send((stream, String::from_utf8_lossy(&buf).into_owned()));
    });
}
