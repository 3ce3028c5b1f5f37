//! Severity triage for failing tests.
//!
//! Rules are evaluated top to bottom and the first match wins. All checks
//! are case-insensitive substring tests on the class, method and error.

use crate::model::{BugBuckets, Failure, Severity};

struct Signals {
    class: String,
    method: String,
    error: String,
}

impl Signals {
    fn new(class: &str, method: &str, error: &str) -> Self {
        Self {
            class: class.to_lowercase(),
            method: method.to_lowercase(),
            error: error.to_lowercase(),
        }
    }
}

type Rule = (fn(&Signals) -> bool, Severity);

const RULES: &[Rule] = &[
    (security_path, Severity::Critical),
    (destructive_lookup, Severity::Critical),
    (controller_core_action, Severity::High),
    (repository_lookup, Severity::High),
    (pagination_or_controller, Severity::Medium),
];

fn any_in(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn security_path(s: &Signals) -> bool {
    any_in(&s.class, &["auth", "security", "password"])
        && any_in(&s.method, &["password", "login", "verify", "hash"])
}

fn destructive_lookup(s: &Signals) -> bool {
    s.method.contains("delete") && any_in(&s.error, &["null", "notfound"])
}

fn controller_core_action(s: &Signals) -> bool {
    s.class.contains("controller") && any_in(&s.method, &["register", "login", "getproblem"])
}

fn repository_lookup(s: &Signals) -> bool {
    s.class.contains("repository") && any_in(&s.method, &["exists", "getuserrole"])
}

fn pagination_or_controller(s: &Signals) -> bool {
    any_in(&s.class, &["paged", "controller"])
}

pub fn categorize_severity(class: &str, method: &str, error: &str) -> Severity {
    let signals = Signals::new(class, method, error);

    RULES
        .iter()
        .find(|(matches, _)| matches(&signals))
        .map(|(_, severity)| *severity)
        .unwrap_or(Severity::Low)
}

/// One-line summary picked from the raw (case-sensitive) error text.
pub fn describe_failure(error: &str) -> &'static str {
    const TABLE: &[(&[&str], &str)] = &[
        (
            &["Assert.Equal", "Expected:"],
            "Assertion failure - expected and actual values do not match",
        ),
        (
            &["Assert.True", "Assert.False"],
            "Boolean assertion failure - unexpected true/false result",
        ),
        (
            &["Assert.NotNull", "Assert.Null"],
            "Null assertion failure - unexpected null/non-null value",
        ),
        (&["NotFound"], "Resource not found - expected resource does not exist"),
        (&["BadRequest"], "Bad request response - invalid request parameters"),
        (&["Unauthorized"], "Authorization failure - access denied"),
    ];

    TABLE
        .iter()
        .find(|(needles, _)| any_in(error, needles))
        .map(|(_, text)| *text)
        .unwrap_or("Test execution failure - unexpected behavior detected")
}

/// Buckets failures in discovery order.
pub fn bucket_failures(failures: &[Failure]) -> BugBuckets {
    let mut buckets = BugBuckets::default();

    for failure in failures {
        let severity = categorize_severity(&failure.class, &failure.method, &failure.error);
        buckets.push(severity, failure, describe_failure(&failure.error));
    }

    buckets
}
