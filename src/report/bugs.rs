//! Bug report synthesis.
//!
//! Turns bucketed bugs into a markdown report with per-severity tables,
//! runner commands for the failing classes, an impact analysis and a
//! numbered list of recommendations. The impact and recommendation text
//! is assembled from which file categories show up among the bugs.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::classify;
use crate::config::Config;
use crate::errors::Result;
use crate::harvest;
use crate::model::{Bug, BugBuckets, Severity, TestKind};
use crate::report::write_lines;

/* ============================================================
   Categories
   ============================================================ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Auth,
    Controller,
    Data,
    Repository,
    Helper,
    Other,
}

impl Category {
    /// First match wins, in declaration order.
    pub fn of(file: &str) -> Self {
        let file = file.to_lowercase();
        if file.contains("auth") {
            Category::Auth
        } else if file.contains("controller") {
            Category::Controller
        } else if file.contains("data") {
            Category::Data
        } else if file.contains("repository") {
            Category::Repository
        } else if file.contains("helper") || file.contains("paged") {
            Category::Helper
        } else {
            Category::Other
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryTally {
    counts: [usize; 6],
}

impl CategoryTally {
    pub fn of(buckets: &BugBuckets) -> Self {
        let mut tally = Self::default();
        for bug in buckets.all_bugs() {
            tally.counts[Category::of(&bug.file) as usize] += 1;
        }
        tally
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts[category as usize]
    }
}

/* ============================================================
   Rendering
   ============================================================ */

/// Fixed bits of text that depend on the project setup.
#[derive(Debug, Clone)]
pub struct BugReportContext {
    pub project_name: String,
    pub test_dir_name: String,
    pub runner_program: String,
}

impl BugReportContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            project_name: config.project_name.clone(),
            test_dir_name: config.unit_test_dir_name(),
            runner_program: config.runner.program.clone(),
        }
    }
}

pub fn render(buckets: &BugBuckets, ctx: &BugReportContext) -> Vec<String> {
    let total = buckets.total();
    let mut out = vec![
        format!("# Test Bug Report - {}", ctx.project_name),
        String::new(),
        "## Overview".to_string(),
        "This report documents bugs found in the test suite based on actual test execution results."
            .to_string(),
        String::new(),
        "## Bug Summary".to_string(),
        format!("- **Total Bugs**: {total}"),
    ];

    for severity in Severity::ALL {
        out.push(format!(
            "- **{}**: {}",
            severity.label(),
            buckets.count(severity)
        ));
    }
    out.push(String::new());
    out.push("## Bug Details".to_string());
    out.push(String::new());

    for (severity, bugs) in buckets.iter().filter(|(_, bugs)| !bugs.is_empty()) {
        out.extend(bug_table(severity, bugs));
    }

    out.extend([
        "## Test Execution Commands".to_string(),
        String::new(),
        "### Run All Tests".to_string(),
        "```bash".to_string(),
        format!("cd {}", ctx.test_dir_name),
        format!("{} test", ctx.runner_program),
        "```".to_string(),
        String::new(),
    ]);

    out.extend(test_commands(buckets, &ctx.runner_program));
    out.extend(impact_analysis(buckets));
    out.extend(recommendations(buckets));
    out
}

fn bug_table(severity: Severity, bugs: &[Bug]) -> Vec<String> {
    let mut out = vec![
        format!("### {} Severity Bugs ({})", severity.label(), bugs.len()),
        String::new(),
        "| Bug ID | File | Test Method | Description | Priority |".to_string(),
        "|--------|------|-------------|-------------|----------|".to_string(),
    ];

    for bug in bugs {
        out.push(format!(
            "| {} | {} | {} | {} | {} |",
            bug.id, bug.file, bug.method, bug.description, bug.priority
        ));
    }

    out.push(String::new());
    out
}

/// One filter command per distinct failing class, sorted.
pub fn test_commands(buckets: &BugBuckets, program: &str) -> Vec<String> {
    let classes: BTreeSet<&str> = buckets
        .all_bugs()
        .map(|bug| bug.file.strip_suffix(".cs").unwrap_or(&bug.file))
        .collect();

    let mut out = vec!["### Run Specific Test Categories".to_string(), "```bash".to_string()];

    if classes.is_empty() {
        out.push("# No failing tests found".to_string());
        out.push(format!(
            "{program} test --filter \"FullyQualifiedName~YourTestClass\""
        ));
    } else {
        out.push("# Run failing test classes".to_string());
        for class in classes {
            out.push(format!(
                "{program} test --filter \"FullyQualifiedName~{class}\""
            ));
        }
    }

    out.push("```".to_string());
    out.push(String::new());
    out
}

pub fn impact_analysis(buckets: &BugBuckets) -> Vec<String> {
    let tally = CategoryTally::of(buckets);
    let mut out = vec!["## Impact Analysis".to_string(), String::new()];

    let critical = buckets.get(Severity::Critical);
    if !critical.is_empty() {
        let any_file = |needle: &str| critical.iter().any(|b| b.file.to_lowercase().contains(needle));
        let mut impacts = Vec::new();

        if any_file("auth") {
            impacts.push("- **Security**: Authentication system compromised, potential unauthorized access");
        }
        if any_file("data") {
            impacts.push("- **Data Integrity**: Core data operations failing, risk of data corruption");
        }
        if any_file("controller") {
            impacts.push("- **System Functionality**: Critical API endpoints not working");
        }
        if impacts.is_empty() {
            impacts.push("- **System Stability**: Critical functionality broken");
        }

        push_impacts(&mut out, Severity::Critical, &impacts);
    }

    if !buckets.get(Severity::High).is_empty() {
        let mut impacts = Vec::new();

        if tally.get(Category::Controller) > 0 {
            impacts.push("- **API Reliability**: Controller endpoints returning incorrect responses");
        }
        if tally.get(Category::Repository) > 0 {
            impacts.push("- **Data Access**: Repository layer failures affecting data retrieval");
        }
        if tally.get(Category::Auth) > 0 {
            impacts.push("- **User Management**: Authentication and authorization issues");
        }
        if impacts.is_empty() {
            impacts.push("- **Business Logic**: Core application features affected");
        }

        push_impacts(&mut out, Severity::High, &impacts);
    }

    if !buckets.get(Severity::Medium).is_empty() {
        let mut impacts = Vec::new();

        if tally.get(Category::Helper) > 0 {
            impacts.push("- **Utility Functions**: Helper and pagination functions not working correctly");
        }
        if tally.get(Category::Controller) > 0 {
            impacts.push("- **API Responses**: Non-critical endpoint issues");
        }
        if impacts.is_empty() {
            impacts.push("- **User Experience**: Minor functionality issues");
        }

        push_impacts(&mut out, Severity::Medium, &impacts);
    }

    if !buckets.get(Severity::Low).is_empty() {
        push_impacts(
            &mut out,
            Severity::Low,
            &[
                "- **Edge Cases**: Minor scenario handling issues",
                "- **Validation**: Non-critical validation problems",
            ],
        );
    }

    out
}

fn push_impacts(out: &mut Vec<String>, severity: Severity, impacts: &[&str]) {
    out.push(format!("### {} Bugs Impact", severity.label()));
    out.extend(impacts.iter().map(|s| s.to_string()));
    out.push(String::new());
}

/// Numbers are tied to the rule, so gaps are expected when a rule is skipped.
pub fn recommendations(buckets: &BugBuckets) -> Vec<String> {
    let tally = CategoryTally::of(buckets);
    let total = buckets.total();
    let mut out = vec!["## Recommendations".to_string(), String::new()];

    let critical = buckets.count(Severity::Critical);
    if critical > 0 {
        out.push(format!(
            "1. **URGENT**: Fix all {critical} Critical bugs immediately - system security/stability at risk"
        ));
    }

    let high = buckets.count(Severity::High);
    if high > 0 {
        out.push(format!(
            "2. **High Priority**: Address {high} High severity bugs in current sprint"
        ));
    }

    let medium = buckets.count(Severity::Medium);
    if medium > 0 {
        out.push(format!(
            "3. **Medium Priority**: Schedule {medium} Medium severity bugs for next sprint"
        ));
    }

    let low = buckets.count(Severity::Low);
    if low > 0 {
        out.push(format!(
            "4. **Low Priority**: Address {low} Low severity bugs in maintenance cycles"
        ));
    }

    let auth = tally.get(Category::Auth);
    if auth > 0 {
        out.push(format!(
            "5. **Security Focus**: {auth} authentication-related failures require immediate security review"
        ));
    }

    let controller = tally.get(Category::Controller);
    if controller > 0 {
        out.push(format!(
            "6. **API Testing**: {controller} controller failures indicate need for better API testing"
        ));
    }

    let data = tally.get(Category::Data);
    if data > 0 {
        out.push(format!(
            "7. **Data Layer**: {data} data-related failures require database and EF Core review"
        ));
    }

    out.push(
        if total > 15 {
            "8. **Code Quality**: High number of failures indicates need for comprehensive code review"
        } else if total > 5 {
            "8. **Testing Strategy**: Moderate failures suggest improving test coverage and validation"
        } else {
            "8. **Maintenance**: Low failure count indicates good code quality, continue current practices"
        }
        .to_string(),
    );

    out.push(String::new());
    out
}

/* ============================================================
   Generation
   ============================================================ */

#[derive(Debug)]
pub struct BugReportOutcome {
    pub path: PathBuf,
    pub buckets: BugBuckets,
}

/// Runs the suite, classifies failures and writes the bug report.
pub fn generate(config: &Config) -> Result<BugReportOutcome> {
    let failures = harvest::collect_failures(&config.runner, &config.test_dir(TestKind::Unit));
    let buckets = classify::bucket_failures(&failures);

    let lines = render(&buckets, &BugReportContext::from_config(config));
    let path = config.output_path(&config.output.bug_report);
    write_lines(&path, &lines)?;

    println!(
        "Bug report generated: {} ({} bugs found)",
        path.display(),
        buckets.total()
    );

    Ok(BugReportOutcome { path, buckets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Failure;
    use pretty_assertions::assert_eq;

    fn buckets(entries: &[(Severity, &str, &str)]) -> BugBuckets {
        let mut buckets = BugBuckets::default();
        for (severity, class, method) in entries {
            let failure = Failure {
                class: class.to_string(),
                method: method.to_string(),
                error: harvest::FAILURE_TEXT.to_string(),
            };
            buckets.push(*severity, &failure, "desc");
        }
        buckets
    }

    fn ctx() -> BugReportContext {
        BugReportContext {
            project_name: "Arena".into(),
            test_dir_name: "Arena.Tests".into(),
            runner_program: "dotnet".into(),
        }
    }

    #[test]
    fn category_first_match_wins() {
        assert_eq!(Category::of("AuthControllerTests.cs"), Category::Auth);
        assert_eq!(Category::of("ProblemsControllerTests.cs"), Category::Controller);
        assert_eq!(Category::of("DataContextTests.cs"), Category::Data);
        assert_eq!(Category::of("UserRepositoryTests.cs"), Category::Repository);
        assert_eq!(Category::of("PagedResultTests.cs"), Category::Helper);
        assert_eq!(Category::of("MathTests.cs"), Category::Other);
    }

    #[test]
    fn empty_report_has_placeholders() {
        let lines = render(&BugBuckets::default(), &ctx()).join("\n");

        assert!(lines.starts_with("# Test Bug Report - Arena\n"));
        assert!(lines.contains("- **Total Bugs**: 0\n- **Critical**: 0"));
        assert!(!lines.contains("Severity Bugs"));
        assert!(lines.contains("cd Arena.Tests\ndotnet test\n```"));
        assert!(lines.contains("# No failing tests found"));
        assert!(lines.contains("## Impact Analysis\n\n## Recommendations"));
        assert!(lines.ends_with(
            "8. **Maintenance**: Low failure count indicates good code quality, continue current practices\n"
        ));
    }

    #[test]
    fn tables_only_for_non_empty_severities() {
        let b = buckets(&[
            (Severity::High, "UserRepositoryTests", "Exists_Test"),
            (Severity::High, "AuthControllerTests", "Login_Test"),
        ]);
        let lines = render(&b, &ctx());
        let start = lines
            .iter()
            .position(|l| l == "### High Severity Bugs (2)")
            .unwrap();

        assert_eq!(
            &lines[start..start + 7],
            &[
                "### High Severity Bugs (2)",
                "",
                "| Bug ID | File | Test Method | Description | Priority |",
                "|--------|------|-------------|-------------|----------|",
                "| H001 | UserRepositoryTests.cs | Exists_Test | desc | P1 |",
                "| H002 | AuthControllerTests.cs | Login_Test | desc | P1 |",
                "",
            ]
        );
        assert!(!lines.iter().any(|l| l.starts_with("### Critical Severity")));
    }

    #[test]
    fn filter_commands_are_sorted_and_unique() {
        let b = buckets(&[
            (Severity::Low, "ZetaTests", "A"),
            (Severity::Critical, "AlphaTests", "B"),
            (Severity::Low, "ZetaTests", "C"),
        ]);

        assert_eq!(
            test_commands(&b, "dotnet"),
            vec![
                "### Run Specific Test Categories",
                "```bash",
                "# Run failing test classes",
                "dotnet test --filter \"FullyQualifiedName~AlphaTests\"",
                "dotnet test --filter \"FullyQualifiedName~ZetaTests\"",
                "```",
                "",
            ]
        );
    }

    #[test]
    fn impact_analysis_follows_categories() {
        let b = buckets(&[
            (Severity::Critical, "MathTests", "Delete"),
            (Severity::High, "UserRepositoryTests", "Exists"),
            (Severity::Medium, "PagedResultHelperTests", "Page"),
            (Severity::Low, "MathTests", "Add"),
        ]);

        assert_eq!(
            impact_analysis(&b),
            vec![
                "## Impact Analysis",
                "",
                "### Critical Bugs Impact",
                "- **System Stability**: Critical functionality broken",
                "",
                "### High Bugs Impact",
                "- **Data Access**: Repository layer failures affecting data retrieval",
                "",
                "### Medium Bugs Impact",
                "- **Utility Functions**: Helper and pagination functions not working correctly",
                "",
                "### Low Bugs Impact",
                "- **Edge Cases**: Minor scenario handling issues",
                "- **Validation**: Non-critical validation problems",
                "",
            ]
        );
    }

    #[test]
    fn impact_bullets_per_severity() {
        let cases: &[(Severity, &str, &[&str])] = &[
            (
                Severity::Critical,
                "DataContextTests",
                &["- **Data Integrity**: Core data operations failing, risk of data corruption"],
            ),
            (
                Severity::High,
                "ProblemsControllerTests",
                &["- **API Reliability**: Controller endpoints returning incorrect responses"],
            ),
            (
                Severity::High,
                "AuthServiceTests",
                &["- **User Management**: Authentication and authorization issues"],
            ),
            (
                Severity::High,
                "MathTests",
                &["- **Business Logic**: Core application features affected"],
            ),
            (
                Severity::Medium,
                "ProblemsControllerTests",
                &["- **API Responses**: Non-critical endpoint issues"],
            ),
            (
                Severity::Medium,
                "MathTests",
                &["- **User Experience**: Minor functionality issues"],
            ),
        ];

        for (severity, class, bullets) in cases {
            let lines = impact_analysis(&buckets(&[(*severity, *class, "Run")]));
            let mut expected = vec![
                "## Impact Analysis".to_string(),
                String::new(),
                format!("### {} Bugs Impact", severity.label()),
            ];
            expected.extend(bullets.iter().map(|b| b.to_string()));
            expected.push(String::new());

            assert_eq!(lines, expected, "{class} at {severity:?}");
        }
    }

    #[test]
    fn critical_impact_checks_each_file() {
        let b = buckets(&[(Severity::Critical, "AuthControllerTests", "Login")]);
        let lines = impact_analysis(&b);
        assert!(lines.contains(&"- **Security**: Authentication system compromised, potential unauthorized access".to_string()));
        assert!(lines.contains(&"- **System Functionality**: Critical API endpoints not working".to_string()));
    }

    #[test]
    fn recommendations_scale_with_volume() {
        let b = buckets(&[
            (Severity::Critical, "AuthServiceTests", "Login"),
            (Severity::Medium, "ProblemsControllerTests", "List"),
            (Severity::Low, "DataSeedTests", "Seed"),
        ]);

        assert_eq!(
            recommendations(&b),
            vec![
                "## Recommendations",
                "",
                "1. **URGENT**: Fix all 1 Critical bugs immediately - system security/stability at risk",
                "3. **Medium Priority**: Schedule 1 Medium severity bugs for next sprint",
                "4. **Low Priority**: Address 1 Low severity bugs in maintenance cycles",
                "5. **Security Focus**: 1 authentication-related failures require immediate security review",
                "6. **API Testing**: 1 controller failures indicate need for better API testing",
                "7. **Data Layer**: 1 data-related failures require database and EF Core review",
                "8. **Maintenance**: Low failure count indicates good code quality, continue current practices",
                "",
            ]
        );

        let five: Vec<_> = (0..5).map(|_| (Severity::Low, "MathTests", "X")).collect();
        let lines = recommendations(&buckets(&five));
        assert!(lines[lines.len() - 2].starts_with("8. **Maintenance**"));

        let fifteen: Vec<_> = (0..15).map(|_| (Severity::Low, "MathTests", "X")).collect();
        let lines = recommendations(&buckets(&fifteen));
        assert!(lines[lines.len() - 2].starts_with("8. **Testing Strategy**"));

        let many: Vec<_> = (0..6).map(|_| (Severity::Low, "MathTests", "X")).collect();
        let lines = recommendations(&buckets(&many));
        assert!(lines[lines.len() - 2].starts_with("8. **Testing Strategy**"));

        let lots: Vec<_> = (0..16).map(|_| (Severity::Low, "MathTests", "X")).collect();
        let lines = recommendations(&buckets(&lots));
        assert!(lines[lines.len() - 2].starts_with("8. **Code Quality**"));
    }
}
