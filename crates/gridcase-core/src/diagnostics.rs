//! Diagnostics collected while loading and converting a case.
//!
//! The pipeline never aborts on structural oddities; it records them here
//! and applies a documented default (demote extra slack buses, zero a
//! missing reactive series, skip a dangling line). The CLI replays the
//! collection through `tracing` and can dump it as JSON.

use serde::Serialize;

/// Severity level for diagnostic issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Unusual but the run continued with a documented default
    Warning,
    /// An element could not be converted
    Error,
}

/// A single issue encountered during load or conversion
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Grouping key: "topology", "slack", "series", "input", ...
    pub category: String,
    pub message: String,
    /// Element the issue refers to (e.g. a bus or line identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;
        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }
        Ok(())
    }
}

/// Collection of issues for one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub issues: Vec<Issue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, category: &str, message: impl Into<String>) {
        self.issues.push(Issue {
            severity: Severity::Warning,
            category: category.to_string(),
            message: message.into(),
            entity: None,
        });
    }

    pub fn warn_entity(&mut self, category: &str, message: impl Into<String>, entity: &str) {
        self.issues.push(Issue {
            severity: Severity::Warning,
            category: category.to_string(),
            message: message.into(),
            entity: Some(entity.to_string()),
        });
    }

    pub fn error(&mut self, category: &str, message: impl Into<String>) {
        self.issues.push(Issue {
            severity: Severity::Error,
            category: category.to_string(),
            message: message.into(),
            entity: None,
        });
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Fold another collection into this one (loader + pipeline phases
    /// report through a single collection)
    pub fn extend(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut diag = Diagnostics::new();
        diag.warn("slack", "more than one slack bus, extras demoted to PQ");
        diag.warn_entity("topology", "destination bus outside retained island", "line-7");
        diag.error("input", "series row count mismatch");

        assert_eq!(diag.warning_count(), 2);
        assert_eq!(diag.error_count(), 1);
        assert!(!diag.is_empty());
    }

    #[test]
    fn test_display_includes_entity() {
        let mut diag = Diagnostics::new();
        diag.warn_entity("topology", "skipped", "line-3");
        let rendered = diag.issues[0].to_string();
        assert!(rendered.contains("[warning:topology]"));
        assert!(rendered.contains("(line-3)"));
    }

    #[test]
    fn test_serialize_json() {
        let mut diag = Diagnostics::new();
        diag.warn("series", "no reactive demand series, Qd defaulted to 0");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("reactive demand"));
        // entity is omitted when absent
        assert!(!json.contains("entity"));
    }

    #[test]
    fn test_extend() {
        let mut a = Diagnostics::new();
        a.warn("input", "loads file missing");
        let mut b = Diagnostics::new();
        b.warn("slack", "no slack bus found");
        a.extend(b);
        assert_eq!(a.warning_count(), 2);
    }
}
