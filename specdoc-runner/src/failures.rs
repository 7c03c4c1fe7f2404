//! Expected failures tracking via TOML file.

use serde::{Deserialize, Serialize};
use specdoc::Resource;
use std::fs;
use std::path::Path;

/// Documents that are allowed to fail in a suite run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedFailures {
    /// Known failures (won't fix soon).
    #[serde(default)]
    pub known: Vec<FailureEntry>,
    /// Pending failures (awaiting fix).
    #[serde(default)]
    pub pending: Vec<FailureEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    pub resource: Resource,
    #[serde(default)]
    pub reason: Option<String>,
    /// Date added (YYYY-MM-DD).
    #[serde(default)]
    pub added: Option<String>,
    /// Related issue URL.
    #[serde(default)]
    pub issue: Option<String>,
}

/// Failure lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    Known,
    Pending,
    /// Expected to pass, so a failure is a regression.
    Regression,
}

impl ExpectedFailures {
    /// Load from a TOML file; a missing file means nothing is expected to fail.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn is_expected(&self, resource: &Resource) -> FailureState {
        if self.known.iter().any(|e| &e.resource == resource) {
            return FailureState::Known;
        }
        if self.pending.iter().any(|e| &e.resource == resource) {
            return FailureState::Pending;
        }
        FailureState::Regression
    }

    pub fn count(&self) -> usize {
        self.known.len() + self.pending.len()
    }

    pub fn get_entry(&self, resource: &Resource) -> Option<&FailureEntry> {
        self.known
            .iter()
            .chain(self.pending.iter())
            .find(|e| &e.resource == resource)
    }
}

/// Result of running a suite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessResult {
    /// Documents run.
    pub total: usize,
    pub passed: usize,
    /// Failed documents listed as known or pending.
    pub expected_failures: usize,
    /// Unexpected failures.
    pub regressions: usize,
}

impl HarnessResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0 = pass, 1 = regressions.
    pub fn exit_code(&self) -> i32 {
        if self.regressions > 0 {
            1
        } else {
            0
        }
    }

    pub fn success(&self) -> bool {
        self.regressions == 0
    }

    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    pub fn record_failure(&mut self, state: FailureState) {
        self.total += 1;
        match state {
            FailureState::Known | FailureState::Pending => self.expected_failures += 1,
            FailureState::Regression => self.regressions += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry(path: &str) -> FailureEntry {
        FailureEntry {
            resource: Resource::new(path),
            reason: None,
            added: None,
            issue: None,
        }
    }

    #[test]
    fn test_is_expected() {
        let failures = ExpectedFailures {
            known: vec![entry("/spec/Known.html")],
            pending: vec![entry("/spec/Pending.html")],
        };
        assert_eq!(failures.is_expected(&Resource::new("/spec/Known.html")), FailureState::Known);
        assert_eq!(
            failures.is_expected(&Resource::new("spec/Pending.html")),
            FailureState::Pending
        );
        assert_eq!(
            failures.is_expected(&Resource::new("/spec/Other.html")),
            FailureState::Regression
        );
    }

    #[test]
    fn test_harness_result_record() {
        let mut result = HarnessResult::new();
        assert_eq!(result.exit_code(), 0);

        result.record_pass();
        result.record_failure(FailureState::Pending);
        assert!(result.success());

        result.record_failure(FailureState::Regression);
        assert_eq!(
            result,
            HarnessResult {
                total: 3,
                passed: 1,
                expected_failures: 1,
                regressions: 1,
            }
        );
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[pending]]
resource = "/spec/Greeting.html"
reason = "Awaiting implementation"
added = "2026-10-19"

[[known]]
resource = "spec/Legacy.html"
issue = "https://example.com/issues/12"
"#
        )
        .unwrap();

        let failures = ExpectedFailures::load(file.path()).unwrap();
        assert_eq!(failures.count(), 2);
        assert_eq!(
            failures.is_expected(&Resource::new("/spec/Legacy.html")),
            FailureState::Known
        );
        let entry = failures.get_entry(&Resource::new("/spec/Greeting.html")).unwrap();
        assert_eq!(entry.reason.as_deref(), Some("Awaiting implementation"));
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let failures = ExpectedFailures::load(Path::new("/nonexistent/path.toml")).unwrap();
        assert_eq!(failures.count(), 0);
    }
}
