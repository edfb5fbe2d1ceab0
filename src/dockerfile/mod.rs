pub mod document;
pub mod parser;

pub use document::{Document, Instruction, Keyword, Stage};
pub use parser::parse;
