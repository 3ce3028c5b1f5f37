// Markdown test-case reports for the unit and UI suites.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::Config;
use crate::errors::Result;
use crate::extract;
use crate::model::{ExtractedFile, TestKind};
use crate::report::{timestamp, write_lines, RULE};

struct Labels {
    title: &'static str,
    total: &'static str,
    classes: &'static str,
    generated: &'static str,
}

fn labels(kind: TestKind) -> Labels {
    match kind {
        TestKind::Unit => Labels {
            title: "# Unit Test Cases Report",
            total: "Total Unit Test Cases",
            classes: "Unit Test Classes",
            generated: "Unit test report",
        },
        TestKind::Ui => Labels {
            title: "# Selenium UI Test Cases Report",
            total: "Total Selenium Test Cases",
            classes: "UI Test Classes",
            generated: "Selenium test report",
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub markdown: Vec<String>,
    pub total_tests: usize,
    pub classes: usize,
}

/// Files without tests get no section and are not counted as classes.
pub fn render(kind: TestKind, files: &[ExtractedFile], generated_at: &str) -> CaseReport {
    let labels = labels(kind);
    let mut body = Vec::new();
    let mut total_tests = 0usize;
    let mut classes = 0usize;

    for file in files.iter().filter(|f| !f.records.is_empty()) {
        classes += 1;
        body.push(format!("## {}", file.class_name));
        body.push(String::new());

        for record in &file.records {
            total_tests += 1;
            body.push(format!("### Test Case #{total_tests}"));
            body.push(String::new());
            body.push(format!("**Test Case ID/Name:** {}", record.name));
            body.push(String::new());
            body.push(format!("**Description/Objective:** {}", record.description));
            body.push(String::new());
            body.push("**Steps/Procedure:**".to_string());
            body.extend(record.steps.iter().map(|step| format!("   {step}")));
            body.push(String::new());
            body.push(format!("**Expected Result:** {}", record.expected));
            body.push(String::new());
            body.push(RULE.to_string());
            body.push(String::new());
        }
    }

    let mut markdown = vec![
        labels.title.to_string(),
        format!("**Generated on:** {generated_at}"),
        String::new(),
        format!("**{}:** {total_tests}", labels.total),
        format!("**{}:** {classes}", labels.classes),
        String::new(),
        RULE.to_string(),
        String::new(),
    ];
    markdown.extend(body);

    CaseReport {
        markdown,
        total_tests,
        classes,
    }
}

/// Scans the configured test directory and writes the report.
/// Returns `Ok(None)` when the directory is missing (nothing is written).
pub fn generate(config: &Config, kind: TestKind) -> Result<Option<(PathBuf, usize)>> {
    let dir = config.test_dir(kind);
    if !dir.is_dir() {
        println!("{} test directory not found: {}", kind.label(), dir.display());
        return Ok(None);
    }

    let mut files = Vec::new();
    for path in extract::test_files(&dir, config.test_pattern(kind))? {
        let extracted = extract::extract_file(&path, kind)?;
        debug!(
            file = %extracted.file_name,
            class = %extracted.class_name,
            tests = extracted.records.len(),
            "extracted"
        );
        files.push(extracted);
    }

    let report = render(kind, &files, &timestamp());
    let output = config.output_path(config.report_name(kind));
    write_lines(&output, &report.markdown)?;

    let parameterized = files
        .iter()
        .flat_map(|f| &f.records)
        .filter(|r| r.case.is_some())
        .count();
    info!(
        kind = kind.label(),
        files = files.len(),
        classes = report.classes,
        tests = report.total_tests,
        parameterized,
        "case report written"
    );
    println!("{} generated: {}", labels(kind).generated, output.display());

    Ok(Some((output, report.total_tests)))
}
