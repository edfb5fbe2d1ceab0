//! Parsed representation of a Dockerfile: ordered instructions grouped into
//! build stages. Immutable once built; rule predicates only read it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Keyword {
    From,
    Run,
    Copy,
    Add,
    User,
    Env,
    Arg,
    Expose,
    Healthcheck,
    Workdir,
    Cmd,
    Entrypoint,
    Label,
    Other,
}

impl Keyword {
    /// Keyword matching is case-insensitive; anything unrecognized maps to
    /// `Other` so future instructions do not abort analysis.
    pub fn parse(token: &str) -> Self {
        match token.to_ascii_uppercase().as_str() {
            "FROM" => Keyword::From,
            "RUN" => Keyword::Run,
            "COPY" => Keyword::Copy,
            "ADD" => Keyword::Add,
            "USER" => Keyword::User,
            "ENV" => Keyword::Env,
            "ARG" => Keyword::Arg,
            "EXPOSE" => Keyword::Expose,
            "HEALTHCHECK" => Keyword::Healthcheck,
            "WORKDIR" => Keyword::Workdir,
            "CMD" => Keyword::Cmd,
            "ENTRYPOINT" => Keyword::Entrypoint,
            "LABEL" => Keyword::Label,
            _ => Keyword::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::From => "FROM",
            Keyword::Run => "RUN",
            Keyword::Copy => "COPY",
            Keyword::Add => "ADD",
            Keyword::User => "USER",
            Keyword::Env => "ENV",
            Keyword::Arg => "ARG",
            Keyword::Expose => "EXPOSE",
            Keyword::Healthcheck => "HEALTHCHECK",
            Keyword::Workdir => "WORKDIR",
            Keyword::Cmd => "CMD",
            Keyword::Entrypoint => "ENTRYPOINT",
            Keyword::Label => "LABEL",
            Keyword::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One logical instruction. Line continuations are already resolved; `line`
/// is the first physical line of the instruction, 1-based. `arguments` keeps
/// the raw text verbatim, including `${VAR:-default}` substitution syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub line: usize,
    pub keyword: Keyword,
    pub arguments: String,
    pub stage_index: usize,
}

/// A build stage: everything from one FROM up to the next (or end of file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub index: usize,
    pub base_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub instructions: Vec<Instruction>,
}

impl Stage {
    /// Last instruction of the given keyword within this stage.
    pub fn last_instruction(&self, keyword: Keyword) -> Option<&Instruction> {
        self.instructions
            .iter()
            .rev()
            .find(|i| i.keyword == keyword)
    }

    pub fn has_instruction(&self, keyword: Keyword) -> bool {
        self.instructions.iter().any(|i| i.keyword == keyword)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub stages: Vec<Stage>,
}

impl Document {
    /// The stage that produces the running container. Rules about runtime
    /// behavior (user, healthcheck, exposed ports) evaluate only here.
    pub fn final_stage(&self) -> &Stage {
        self.stages
            .last()
            .expect("Document invariant: at least one stage")
    }

    /// All instructions across all stages, in file order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.stages.iter().flat_map(|s| s.instructions.iter())
    }

    /// True when `name` is the alias of a stage strictly before `index`.
    pub fn is_earlier_alias(&self, name: &str, index: usize) -> bool {
        self.stages[..index.min(self.stages.len())]
            .iter()
            .any(|s| s.alias.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_parse_case_insensitive() {
        assert_eq!(Keyword::parse("from"), Keyword::From);
        assert_eq!(Keyword::parse("FROM"), Keyword::From);
        assert_eq!(Keyword::parse("Run"), Keyword::Run);
        assert_eq!(Keyword::parse("healthcheck"), Keyword::Healthcheck);
    }

    #[test]
    fn test_keyword_parse_unknown_is_other() {
        assert_eq!(Keyword::parse("SHELL"), Keyword::Other);
        assert_eq!(Keyword::parse("ONBUILD"), Keyword::Other);
        assert_eq!(Keyword::parse("MAINTAINER"), Keyword::Other);
    }

    #[test]
    fn test_keyword_display() {
        assert_eq!(format!("{}", Keyword::From), "FROM");
        assert_eq!(format!("{}", Keyword::Healthcheck), "HEALTHCHECK");
    }

    #[test]
    fn test_stage_last_instruction() {
        let stage = Stage {
            index: 0,
            base_image: "alpine".to_string(),
            base_tag: Some("3.19".to_string()),
            alias: None,
            instructions: vec![
                Instruction {
                    line: 1,
                    keyword: Keyword::From,
                    arguments: "alpine:3.19".to_string(),
                    stage_index: 0,
                },
                Instruction {
                    line: 2,
                    keyword: Keyword::User,
                    arguments: "root".to_string(),
                    stage_index: 0,
                },
                Instruction {
                    line: 3,
                    keyword: Keyword::User,
                    arguments: "app".to_string(),
                    stage_index: 0,
                },
            ],
        };

        let last = stage.last_instruction(Keyword::User).unwrap();
        assert_eq!(last.arguments, "app");
        assert_eq!(last.line, 3);
        assert!(stage.last_instruction(Keyword::Healthcheck).is_none());
    }
}
