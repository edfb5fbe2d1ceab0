//! Remediation timeline: buckets failed findings into urgency tiers.

use crate::rules::{Finding, RuleStatus, Severity};
use serde::{Deserialize, Serialize};

/// Process-improvement items that apply regardless of what failed.
pub const LONG_TERM_RECOMMENDATIONS: &[&str] = &[
    "Implement automated image scanning in the CI/CD pipeline",
    "Set up a container image signing workflow",
    "Generate and verify SBOMs as part of the build process",
    "Add runtime container security monitoring",
    "Establish a container security policy document",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    Immediate,
    ShortTerm,
    MidTerm,
    LongTerm,
}

impl UrgencyTier {
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyTier::Immediate => "Immediate",
            UrgencyTier::ShortTerm => "Short-term",
            UrgencyTier::MidTerm => "Mid-term",
            UrgencyTier::LongTerm => "Long-term",
        }
    }

    pub fn horizon(&self) -> &'static str {
        match self {
            UrgencyTier::Immediate => "next 24-48 hours",
            UrgencyTier::ShortTerm => "next 1-2 weeks",
            UrgencyTier::MidTerm => "next 2-4 weeks",
            UrgencyTier::LongTerm => "next 1-3 months",
        }
    }

    pub const fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Critical | Severity::High => UrgencyTier::Immediate,
            Severity::Medium => UrgencyTier::ShortTerm,
            Severity::Low => UrgencyTier::MidTerm,
        }
    }
}

/// Failed rule ids bucketed by urgency, catalog order within each tier.
/// The long-term tier carries static recommendations and is always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationTimeline {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub mid_term: Vec<String>,
    pub long_term: Vec<String>,
}

impl RemediationTimeline {
    pub fn plan(findings: &[Finding]) -> Self {
        let mut immediate = Vec::new();
        let mut short_term = Vec::new();
        let mut mid_term = Vec::new();

        for finding in findings.iter().filter(|f| f.status == RuleStatus::Fail) {
            let bucket = match UrgencyTier::for_severity(finding.severity) {
                UrgencyTier::Immediate => &mut immediate,
                UrgencyTier::ShortTerm => &mut short_term,
                UrgencyTier::MidTerm => &mut mid_term,
                UrgencyTier::LongTerm => unreachable!("no severity maps to long-term"),
            };
            bucket.push(finding.rule_id.clone());
        }

        Self {
            immediate,
            short_term,
            mid_term,
            long_term: LONG_TERM_RECOMMENDATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// True when no finding-driven tier has entries.
    pub fn no_urgent_work(&self) -> bool {
        self.immediate.is_empty() && self.short_term.is_empty() && self.mid_term.is_empty()
    }
}
