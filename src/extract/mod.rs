pub mod rules;
pub mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::errors::{ReportError, Result};
use crate::model::{ExtractedFile, TestKind, TestRecord};

use self::scanner::MethodBlock;

/// Class name plus one record per test (per case for parameterized unit tests).
pub fn extract_tests(source: &str, kind: TestKind) -> (String, Vec<TestRecord>) {
    let class_name = scanner::class_name(source);

    let records = scanner::method_blocks(source)
        .iter()
        .flat_map(|block| records_for(block, kind))
        .collect();

    (class_name, records)
}

pub fn extract_file(path: &Path, kind: TestKind) -> Result<ExtractedFile> {
    let source = fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (class_name, records) = extract_tests(&source, kind);

    Ok(ExtractedFile {
        file_name: file_name(path),
        class_name,
        records,
    })
}

/// Matching files directly inside `dir`, sorted by file name.
pub fn test_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern).map_err(|source| ReportError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ReportError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() && pattern.matches(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn records_for(block: &MethodBlock<'_>, kind: TestKind) -> Vec<TestRecord> {
    let description = rules::describe(block.name);
    let steps = rules::steps(kind, block.body);
    let expected = rules::expected(kind, block.name).to_string();

    let cases = match kind {
        TestKind::Ui => 1,
        TestKind::Unit => block.case_count(),
    };

    if cases == 1 {
        return vec![TestRecord {
            name: block.name.to_string(),
            description,
            steps,
            expected,
            case: None,
        }];
    }

    (1..=cases)
        .map(|k| TestRecord {
            name: format!("{} (Case {k})", block.name),
            description: format!("{description} - Test case {k}"),
            steps: steps.clone(),
            expected: expected.clone(),
            case: Some(k),
        })
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
