use crate::rules::{Finding, Rule, RuleStatus, Severity};
use serde::{Deserialize, Serialize};

/// Severity weight table. Kept in one place so the tiers stay tunable
/// without touching any rule.
pub const fn severity_weight(severity: Severity) -> u32 {
    match severity {
        Severity::Critical => 25,
        Severity::High => 15,
        Severity::Medium => 10,
        Severity::Low => 5,
    }
}

pub const MAX_SCORE: u32 = 100;

/// Count of FAIL findings per severity tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityBreakdown {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut breakdown = Self {
            critical: 0,
            high: 0,
            medium: 0,
            low: 0,
        };
        for finding in findings.iter().filter(|f| f.status == RuleStatus::Fail) {
            match finding.severity {
                Severity::Critical => breakdown.critical += 1,
                Severity::High => breakdown.high += 1,
                Severity::Medium => breakdown.medium += 1,
                Severity::Low => breakdown.low += 1,
            }
        }
        breakdown
    }

    pub fn total_failed(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Weighted 0..=100 score.
///
/// The denominator is the weight of every scoreable rule (manual-review
/// rules never count, whatever their outcome); the numerator subtracts the
/// weight of FAIL findings. Fixing any single FAIL therefore never lowers
/// the score, and MANUAL_REVIEW findings are purely informational.
pub fn compute_score(findings: &[Finding], rules: &[Rule]) -> u32 {
    let total: u32 = rules
        .iter()
        .filter(|r| !r.manual_review)
        .map(|r| severity_weight(r.severity))
        .sum();
    if total == 0 {
        return MAX_SCORE;
    }

    let failed: u32 = findings
        .iter()
        .filter(|f| f.status == RuleStatus::Fail)
        .map(|f| severity_weight(f.severity))
        .sum();
    let failed = failed.min(total);

    let score = (f64::from(total - failed) / f64::from(total) * 100.0).round() as u32;
    score.min(MAX_SCORE)
}

/// Visual bar for terminal output, 10 cells wide.
pub fn score_bar(score: u32) -> String {
    let filled = ((score as f32 / MAX_SCORE as f32) * 10.0).round() as usize;
    let filled = filled.min(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
