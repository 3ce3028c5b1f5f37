use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ReportError, Result};
use crate::model::TestKind;

pub const LOCAL_CONFIG: &str = "testscribe.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project_name: String,
    pub root_dir: PathBuf,
    pub unit_test_dir: PathBuf,
    pub ui_test_dir: PathBuf,
    pub unit_test_pattern: String,
    pub ui_test_pattern: String,
    pub runner: RunnerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub bug_report: String,
    pub unit_test_report: String,
    pub ui_test_report: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: "Algorithm Battle Arena".into(),
            root_dir: PathBuf::from("."),
            unit_test_dir: PathBuf::from("AlgorithmBattleArena.Tests"),
            ui_test_dir: PathBuf::from("AlgorithmBattleArena.UiTests"),
            unit_test_pattern: "*Test*.cs".into(),
            ui_test_pattern: "*Tests.cs".into(),
            runner: RunnerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: "dotnet".into(),
            args: vec!["test".into(), "--verbosity".into(), "detailed".into()],
            timeout_secs: 120,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bug_report: "bug_report.md".into(),
            unit_test_report: "unit_test_report.md".into(),
            ui_test_report: "selenium_test_report.md".into(),
        }
    }
}

impl Config {
    /// Loads `explicit` when given, otherwise the first config found in the
    /// working directory or the user config dir, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for path in candidate_paths() {
            if path.is_file() {
                return Self::from_file(&path);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ReportError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::parse(&raw).map_err(|source| ReportError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    pub fn test_dir(&self, kind: TestKind) -> PathBuf {
        match kind {
            TestKind::Unit => self.resolve(&self.unit_test_dir),
            TestKind::Ui => self.resolve(&self.ui_test_dir),
        }
    }

    pub fn test_pattern(&self, kind: TestKind) -> &str {
        match kind {
            TestKind::Unit => &self.unit_test_pattern,
            TestKind::Ui => &self.ui_test_pattern,
        }
    }

    pub fn report_name(&self, kind: TestKind) -> &str {
        match kind {
            TestKind::Unit => &self.output.unit_test_report,
            TestKind::Ui => &self.output.ui_test_report,
        }
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Directory name shown in the report's `cd` instruction.
    pub fn unit_test_dir_name(&self) -> String {
        self.unit_test_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.unit_test_dir.display().to_string())
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];

    if let Some(mut dir) = dirs::config_dir() {
        dir.push("testscribe");
        dir.push("config.toml");
        paths.push(dir);
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg.runner.program, "dotnet");
        assert_eq!(cfg.runner.timeout_secs, 120);
        assert_eq!(cfg.output.ui_test_report, "selenium_test_report.md");
        assert_eq!(cfg.unit_test_pattern, "*Test*.cs");
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let cfg = Config::parse(
            r#"
            root_dir = "/srv/arena"

            [runner]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.root_dir, PathBuf::from("/srv/arena"));
        assert_eq!(cfg.runner.timeout_secs, 5);
        assert_eq!(cfg.runner.args, vec!["test", "--verbosity", "detailed"]);
        assert_eq!(
            cfg.test_dir(TestKind::Unit),
            PathBuf::from("/srv/arena/AlgorithmBattleArena.Tests")
        );
    }

    #[test]
    fn absolute_dirs_are_not_rebased() {
        let cfg = Config {
            root_dir: PathBuf::from("/a"),
            ui_test_dir: PathBuf::from("/b/ui"),
            ..Config::default()
        };
        assert_eq!(cfg.test_dir(TestKind::Ui), PathBuf::from("/b/ui"));
        assert_eq!(cfg.output_path("x.md"), PathBuf::from("/a/x.md"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ReportError::ConfigRead { .. }));
    }

    #[test]
    fn unit_dir_name_is_last_component() {
        let cfg = Config {
            unit_test_dir: PathBuf::from("nested/Arena.Tests"),
            ..Config::default()
        };
        assert_eq!(cfg.unit_test_dir_name(), "Arena.Tests");
    }
}
