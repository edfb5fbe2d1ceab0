pub mod json;
pub mod markdown;
pub mod terminal;

use crate::assessment::AuditRun;

pub trait Reporter {
    fn report(&self, run: &AuditRun) -> String;
}
