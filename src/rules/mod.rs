pub mod catalog;
pub mod engine;
pub mod secrets;
pub mod types;

pub use catalog::all_rules;
pub use engine::RuleEngine;
pub use secrets::SecretPolicy;
pub use types::*;
