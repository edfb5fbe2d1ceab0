//! The assessment boundary: one pure entry point from descriptor text to an
//! immutable report, plus read-only catalog introspection for renderers.

use crate::dockerfile::{self, Document};
use crate::error::Result;
use crate::escape::{self, EscapeRisk};
use crate::estimate::{self, SizeEstimate};
use crate::rules::{all_rules, Finding, Rule, RuleEngine};
use crate::scoring::{self, SeverityBreakdown};
use crate::timeline::RemediationTimeline;
use serde::{Deserialize, Serialize};

/// Fully derived assessment: weighted score, one finding per catalog rule in
/// catalog order, severity breakdown of the failures, and the remediation
/// timeline. No hidden state; stable field names for downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub score: u32,
    pub findings: Vec<Finding>,
    pub breakdown: SeverityBreakdown,
    pub timeline: RemediationTimeline,
}

/// Analyze raw Dockerfile text. The sole entry point: parse failures abort
/// with an error and no partial report; anything parseable always yields a
/// complete report.
pub fn analyze(text: &str) -> Result<AssessmentReport> {
    let document = dockerfile::parse(text)?;
    Ok(assess(&document))
}

/// Assess an already-parsed Document.
pub fn assess(document: &Document) -> AssessmentReport {
    let findings = RuleEngine::new().evaluate(document);
    let score = scoring::compute_score(&findings, all_rules());
    let breakdown = SeverityBreakdown::from_findings(&findings);
    let timeline = RemediationTimeline::plan(&findings);
    AssessmentReport {
        score,
        findings,
        breakdown,
        timeline,
    }
}

/// The static rule catalog, for renderers that print rule descriptions
/// independently of any particular Dockerfile.
pub fn rule_catalog() -> &'static [Rule] {
    all_rules()
}

/// Everything a renderer needs for one audit run: the pure assessment plus
/// the advisory extras and run metadata.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRun {
    pub version: String,
    pub generated_at: String,
    pub target: String,
    pub assessment: AssessmentReport,
    pub escape_risks: Vec<EscapeRisk>,
    pub size_estimate: SizeEstimate,
}

impl AuditRun {
    pub fn new(target: impl Into<String>, document: &Document) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            target: target.into(),
            assessment: assess(document),
            escape_risks: escape::analyze_escape_risks(document),
            size_estimate: estimate::estimate_image_size(document),
        }
    }

    /// Gate used for the process exit code: no CRITICAL/HIGH failure and the
    /// score at or above the caller's threshold.
    pub fn passed(&self, fail_under: u32) -> bool {
        self.assessment.breakdown.critical == 0
            && self.assessment.breakdown.high == 0
            && self.assessment.score >= fail_under
    }
}
