pub mod bugs;
pub mod cases;

use std::fs;
use std::path::Path;

use chrono::Local;

use crate::errors::{ReportError, Result};

pub const RULE: &str = "---";

pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Overwrites `path` with the lines joined by `\n`.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    fs::write(path, lines.join("\n")).map_err(write_err)
}
