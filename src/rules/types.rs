use crate::dockerfile::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Result of a single rule check, produced by Finding construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Pass,
    Fail,
    ManualReview,
}

impl RuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleStatus::Pass => "pass",
            RuleStatus::Fail => "fail",
            RuleStatus::ManualReview => "manual_review",
        }
    }
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a rule predicate reports back to the engine. Each variant carries
/// the message that ends up on the Finding, so noteworthy pass conditions
/// (e.g. "no package installs found") are surfaced too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Satisfied(String),
    Violated(String),
    NeedsHuman(String),
}

/// A benchmark rule: static metadata plus a pure predicate over the parsed
/// Document. The catalog holds these in fixed report order.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    /// True for checks that cannot be decided statically; these never score.
    pub manual_review: bool,
    pub remediation: &'static str,
    pub check: fn(&Document) -> RuleOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub title: String,
    pub status: RuleStatus,
    pub severity: Severity,
    pub message: String,
    pub remediation: String,
}

impl Finding {
    pub fn pass(rule: &Rule, message: impl Into<String>) -> Self {
        Self::new(rule, RuleStatus::Pass, message)
    }

    pub fn fail(rule: &Rule, message: impl Into<String>) -> Self {
        Self::new(rule, RuleStatus::Fail, message)
    }

    pub fn manual(rule: &Rule, message: impl Into<String>) -> Self {
        Self::new(rule, RuleStatus::ManualReview, message)
    }

    fn new(rule: &Rule, status: RuleStatus, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule.id.to_string(),
            title: rule.title.to_string(),
            status,
            severity: rule.severity,
            message: message.into(),
            remediation: rule.remediation.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rule() -> Rule {
        Rule {
            id: "9.9",
            title: "Sample rule",
            category: "sample",
            severity: Severity::High,
            manual_review: false,
            remediation: "Do the thing.",
            check: |_| RuleOutcome::Satisfied("ok".to_string()),
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(format!("{}", Severity::Critical), "CRITICAL");
        assert_eq!(format!("{}", Severity::Low), "LOW");
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::Critical);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&RuleStatus::ManualReview).unwrap();
        assert_eq!(json, "\"manual_review\"");
    }

    #[test]
    fn test_finding_constructors() {
        let rule = sample_rule();

        let pass = Finding::pass(&rule, "all good");
        assert_eq!(pass.status, RuleStatus::Pass);
        assert_eq!(pass.rule_id, "9.9");
        assert_eq!(pass.severity, Severity::High);

        let fail = Finding::fail(&rule, "broken at line 3");
        assert_eq!(fail.status, RuleStatus::Fail);
        assert_eq!(fail.message, "broken at line 3");
        assert_eq!(fail.remediation, "Do the thing.");

        let manual = Finding::manual(&rule, "cannot verify statically");
        assert_eq!(manual.status, RuleStatus::ManualReview);
    }
}
