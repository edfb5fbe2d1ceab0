pub mod assessment;
pub mod cli;
pub mod dockerfile;
pub mod dockerignore;
pub mod error;
pub mod escape;
pub mod estimate;
pub mod handlers;
pub mod optimizer;
pub mod reporter;
pub mod rules;
pub mod scoring;
pub mod timeline;

pub use assessment::{analyze, assess, rule_catalog, AssessmentReport, AuditRun};
pub use cli::{Cli, OutputFormat};
pub use dockerfile::{parse, Document, Instruction, Keyword, Stage};
pub use error::{AuditError, Result};
pub use reporter::{
    json::JsonReporter, markdown::MarkdownReporter, terminal::TerminalReporter, Reporter,
};
pub use rules::{Finding, Rule, RuleEngine, RuleStatus, SecretPolicy, Severity};
pub use scoring::SeverityBreakdown;
pub use timeline::{RemediationTimeline, UrgencyTier};
