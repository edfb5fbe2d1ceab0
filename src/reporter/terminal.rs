use crate::assessment::AuditRun;
use crate::reporter::Reporter;
use crate::rules::{Finding, RuleStatus, Severity};
use crate::scoring::score_bar;
use crate::timeline::UrgencyTier;
use colored::Colorize;

pub struct TerminalReporter {
    verbose: bool,
}

impl TerminalReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn severity_label(&self, severity: &Severity) -> colored::ColoredString {
        let label = format!("[{}]", severity);
        match severity {
            Severity::Critical => label.red().bold(),
            Severity::High => label.yellow().bold(),
            Severity::Medium => label.cyan(),
            Severity::Low => label.white(),
        }
    }

    fn score_colored(&self, score: u32) -> colored::ColoredString {
        let text = format!("{score}/100");
        if score >= 80 {
            text.green().bold()
        } else if score >= 60 {
            text.yellow().bold()
        } else {
            text.red().bold()
        }
    }

    fn format_finding(&self, finding: &Finding, output: &mut String) {
        let status = match finding.status {
            RuleStatus::Pass => "PASS".green(),
            RuleStatus::Fail => "FAIL".red().bold(),
            RuleStatus::ManualReview => "REVIEW".yellow(),
        };
        output.push_str(&format!(
            "  {:<6} {} {} {}\n",
            status,
            self.severity_label(&finding.severity),
            finding.rule_id.bold(),
            finding.title
        ));
        output.push_str(&format!("         {}\n", finding.message.dimmed()));
        if self.verbose && finding.status != RuleStatus::Pass {
            output.push_str(&format!("         fix: {}\n", finding.remediation.green()));
        }
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, run: &AuditRun) -> String {
        let mut output = String::new();
        let assessment = &run.assessment;

        output.push_str(&format!(
            "\n{} {}\n\n",
            "Dockerfile security assessment:".bold(),
            run.target.cyan()
        ));
        output.push_str(&format!(
            "  Score: {} {}\n\n",
            self.score_colored(assessment.score),
            score_bar(assessment.score)
        ));

        for finding in &assessment.findings {
            self.format_finding(finding, &mut output);
        }

        let b = &assessment.breakdown;
        output.push_str(&format!(
            "\n  {} {} critical, {} high, {} medium, {} low\n",
            "Failed:".bold(),
            b.critical,
            b.high,
            b.medium,
            b.low
        ));

        if !run.escape_risks.is_empty() {
            output.push_str(&format!("\n{}\n", "Container escape risks:".bold()));
            for risk in &run.escape_risks {
                output.push_str(&format!(
                    "  {} {} (line {})\n",
                    self.severity_label(&risk.severity),
                    risk.title,
                    risk.line
                ));
                if self.verbose {
                    output.push_str(&format!("         {}\n", risk.recommendation.dimmed()));
                }
            }
        }

        let timeline = &assessment.timeline;
        if !timeline.no_urgent_work() {
            output.push_str(&format!("\n{}\n", "Remediation plan:".bold()));
            for (tier, ids) in [
                (UrgencyTier::Immediate, &timeline.immediate),
                (UrgencyTier::ShortTerm, &timeline.short_term),
                (UrgencyTier::MidTerm, &timeline.mid_term),
            ] {
                if ids.is_empty() {
                    continue;
                }
                output.push_str(&format!(
                    "  {} ({}): {}\n",
                    tier.label().bold(),
                    tier.horizon(),
                    ids.join(", ")
                ));
            }
        }

        output.push_str(&format!(
            "\n  Estimated image size: {:.2} GB (~{:.2} GB after optimization)\n",
            run.size_estimate.original_gb, run.size_estimate.optimized_gb
        ));

        output
    }
}
