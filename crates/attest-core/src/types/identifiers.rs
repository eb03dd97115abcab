//! Validated identifier newtypes: task references and collection windows.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TASK_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ET-(\d+)$").expect("valid task ref pattern"));

static TASK_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(ET-\d+)_(.+)$").expect("valid task dir pattern"));

/// Window labels: `2025`, `2025-Q4`, `2025-10`, `2025-H1`.
static WINDOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}(-Q[1-4]|-H[1-2]|-(0[1-9]|1[0-2]))?$").expect("valid window pattern")
});

/// A task reference like `ET-0001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRef(String);

impl TaskRef {
    /// Parse a task reference, validating the `ET-<digits>` shape.
    pub fn parse(s: &str) -> Option<Self> {
        TASK_REF_RE.is_match(s).then(|| Self(s.to_string()))
    }

    /// The numeric task id (`ET-0001` -> 1).
    pub fn id(&self) -> u32 {
        TASK_REF_RE
            .captures(&self.0)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the reference from a task directory name (`ET-0001_Access_Reviews`).
    pub fn from_dir_name(name: &str) -> Option<Self> {
        TASK_DIR_RE
            .captures(name)
            .map(|c| Self(c.get(1).expect("group 1").as_str().to_string()))
    }

    /// The directory prefix this reference matches (`ET-0001_`).
    pub fn dir_prefix(&self) -> String {
        format!("{}_", self.0)
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the human-readable task name from a directory name
/// (`ET-0001_Access_Reviews` -> "Access Reviews").
pub fn task_name_from_dir(name: &str) -> Option<String> {
    TASK_DIR_RE
        .captures(name)
        .map(|c| c.get(2).expect("group 2").as_str().replace('_', " "))
}

/// A collection window label like `2025-Q4`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowLabel(String);

impl WindowLabel {
    /// Parse a window label: `YYYY`, `YYYY-Qn`, `YYYY-MM`, or `YYYY-Hn`.
    pub fn parse(s: &str) -> Option<Self> {
        WINDOW_RE.is_match(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_ref_parses_and_extracts_id() {
        let r = TaskRef::parse("ET-0001").unwrap();
        assert_eq!(r.id(), 1);
        assert_eq!(r.as_str(), "ET-0001");
        assert!(TaskRef::parse("ET-").is_none());
        assert!(TaskRef::parse("XX-0001").is_none());
    }

    #[test]
    fn task_ref_from_dir_name() {
        let r = TaskRef::from_dir_name("ET-0042_GitHub_Access_Review").unwrap();
        assert_eq!(r.as_str(), "ET-0042");
        assert_eq!(
            task_name_from_dir("ET-0042_GitHub_Access_Review").unwrap(),
            "GitHub Access Review"
        );
        assert!(TaskRef::from_dir_name("notes").is_none());
    }

    #[test]
    fn window_label_shapes() {
        for ok in ["2025", "2025-Q4", "2025-01", "2025-12", "2025-H1"] {
            assert!(WindowLabel::parse(ok).is_some(), "{ok} should parse");
        }
        for bad in ["2025-Q5", "2025-13", "2025-H3", "25-Q1", "wip"] {
            assert!(WindowLabel::parse(bad).is_none(), "{bad} should not parse");
        }
    }
}
