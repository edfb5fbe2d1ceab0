//! Markdown assessment report.
//!
//! Produces a standalone document: score, findings grouped by status,
//! escape risks, and the remediation timeline with per-rule fix guidance.

use crate::assessment::AuditRun;
use crate::reporter::Reporter;
use crate::rules::{Finding, RuleStatus};
use crate::timeline::UrgencyTier;

pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn new() -> Self {
        Self
    }

    fn findings_section(
        &self,
        heading: &str,
        findings: &[&Finding],
        with_remediation: bool,
        out: &mut String,
    ) {
        if findings.is_empty() {
            return;
        }
        out.push_str(&format!("### {heading}\n\n"));
        for finding in findings {
            out.push_str(&format!(
                "- **{} {}** ({})\n  - {}\n",
                finding.rule_id, finding.title, finding.severity, finding.message
            ));
            if with_remediation {
                out.push_str(&format!("  - Remediation: {}\n", finding.remediation));
            }
        }
        out.push('\n');
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for MarkdownReporter {
    fn report(&self, run: &AuditRun) -> String {
        let assessment = &run.assessment;
        let mut out = String::new();

        out.push_str("# Dockerfile Security Assessment Report\n\n");
        out.push_str(&format!(
            "- Target: `{}`\n- Generated: {}\n- docker-audit {}\n\n",
            run.target, run.generated_at, run.version
        ));
        out.push_str(&format!("## Security Score: {}/100\n\n", assessment.score));

        let by_status = |status: RuleStatus| -> Vec<&Finding> {
            assessment
                .findings
                .iter()
                .filter(|f| f.status == status)
                .collect()
        };

        out.push_str("## Benchmark Findings\n\n");
        self.findings_section("Failed Checks", &by_status(RuleStatus::Fail), true, &mut out);
        self.findings_section(
            "Manual Review Required",
            &by_status(RuleStatus::ManualReview),
            false,
            &mut out,
        );
        self.findings_section("Passed Checks", &by_status(RuleStatus::Pass), false, &mut out);

        out.push_str("## Container Escape Risks\n\n");
        if run.escape_risks.is_empty() {
            out.push_str("No immediate container escape risks detected.\n\n");
        } else {
            for risk in &run.escape_risks {
                out.push_str(&format!(
                    "- **{}:** {} (line {})\n  - {}\n  - Recommendation: {}\n",
                    risk.severity, risk.title, risk.line, risk.detail, risk.recommendation
                ));
            }
            out.push('\n');
        }

        out.push_str("## Implementation Timeline\n\n");
        let timeline = &assessment.timeline;
        for (tier, ids) in [
            (UrgencyTier::Immediate, &timeline.immediate),
            (UrgencyTier::ShortTerm, &timeline.short_term),
            (UrgencyTier::MidTerm, &timeline.mid_term),
        ] {
            if ids.is_empty() {
                continue;
            }
            out.push_str(&format!("### {} ({})\n\n", tier.label(), tier.horizon()));
            for id in ids {
                if let Some(finding) = assessment.findings.iter().find(|f| &f.rule_id == id) {
                    out.push_str(&format!(
                        "- **{} {}** ({})\n",
                        finding.rule_id, finding.title, finding.severity
                    ));
                }
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "### {} ({})\n\n",
            UrgencyTier::LongTerm.label(),
            UrgencyTier::LongTerm.horizon()
        ));
        for item in &timeline.long_term {
            out.push_str(&format!("- {item}\n"));
        }
        out.push('\n');

        out.push_str(&format!(
            "## Image Size\n\nEstimated {:.2} GB now, roughly {:.2} GB after optimization.\n",
            run.size_estimate.original_gb, run.size_estimate.optimized_gb
        ));

        out
    }
}
