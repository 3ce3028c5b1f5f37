use serde::Serialize;

/* ---------- extracted tests ---------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestKind {
    Unit,
    Ui,
}

impl TestKind {
    pub fn label(self) -> &'static str {
        match self {
            TestKind::Unit => "Unit",
            TestKind::Ui => "UI",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRecord {
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected: String,
    /// 1-based inline-data case, set only for parameterized unit tests.
    pub case: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedFile {
    pub file_name: String,
    pub class_name: String,
    pub records: Vec<TestRecord>,
}

/* ---------- failures & bugs ---------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub class: String,
    pub method: String,
    pub error: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn priority(self) -> &'static str {
        match self {
            Severity::Critical => "P0",
            Severity::High => "P1",
            Severity::Medium => "P2",
            Severity::Low => "P3",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bug {
    pub id: String,
    pub file: String,
    pub method: String,
    pub description: String,
    pub priority: &'static str,
}

/// Bugs grouped by severity; ids are numbered per bucket.
#[derive(Clone, Debug, Default)]
pub struct BugBuckets {
    buckets: [Vec<Bug>; 4],
}

impl BugBuckets {
    pub fn push(&mut self, severity: Severity, failure: &Failure, description: &str) -> &Bug {
        let bucket = &mut self.buckets[severity.index()];
        let id = format!("{}{:03}", &severity.label()[..1], bucket.len() + 1);

        bucket.push(Bug {
            id,
            file: format!("{}.cs", failure.class),
            method: failure.method.clone(),
            description: description.to_string(),
            priority: severity.priority(),
        });

        &bucket[bucket.len() - 1]
    }

    pub fn get(&self, severity: Severity) -> &[Bug] {
        &self.buckets[severity.index()]
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.get(severity).len()
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Severity, &[Bug])> + '_ {
        Severity::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn all_bugs(&self) -> impl Iterator<Item = &Bug> + '_ {
        self.buckets.iter().flatten()
    }
}
