use crate::dockerfile::Document;
use crate::rules::catalog;
use crate::rules::types::{Finding, Rule, RuleOutcome};
use std::panic::{self, AssertUnwindSafe};
use tracing::{trace, warn};

/// Evaluates the fixed rule catalog against a parsed Document.
///
/// Produces exactly one Finding per rule, in catalog order. Predicates are
/// total by contract; if one panics anyway the rule degrades to a
/// MANUAL_REVIEW finding instead of aborting the run, so the caller always
/// gets a complete report.
pub struct RuleEngine {
    rules: &'static [Rule],
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rules: catalog::all_rules(),
        }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn evaluate(&self, document: &Document) -> Vec<Finding> {
        trace!(
            stages = document.stages.len(),
            rules = self.rules.len(),
            "evaluating rule catalog"
        );
        self.rules
            .iter()
            .map(|rule| Self::evaluate_rule(rule, document))
            .collect()
    }

    fn evaluate_rule(rule: &Rule, document: &Document) -> Finding {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (rule.check)(document)));
        match outcome {
            Ok(RuleOutcome::Satisfied(message)) => Finding::pass(rule, message),
            Ok(RuleOutcome::Violated(message)) => Finding::fail(rule, message),
            Ok(RuleOutcome::NeedsHuman(message)) => Finding::manual(rule, message),
            Err(_) => {
                warn!(rule = rule.id, "rule predicate panicked; degrading to manual review");
                Finding::manual(
                    rule,
                    "rule evaluation failed unexpectedly; flagged for manual review",
                )
            }
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
