//! Tolerant Dockerfile parser.
//!
//! Comments and blank lines are stripped, backslash continuations are folded
//! into one logical instruction (keeping the first physical line number), and
//! unknown keywords are retained as [`Keyword::Other`]. Stage references in
//! `COPY --from=` are resolved in a second pass so that forward references
//! are rejected without mutable bookkeeping during the scan.

use super::document::{Document, Instruction, Keyword, Stage};
use crate::error::{AuditError, Result};

/// Parse raw Dockerfile text into a [`Document`].
///
/// Fails on empty input, input with no valid instructions, a missing FROM,
/// or a `COPY --from=` reference that does not name a strictly earlier stage.
pub fn parse(text: &str) -> Result<Document> {
    if text.trim().is_empty() {
        return Err(AuditError::EmptyInput);
    }

    let lines = logical_lines(text);
    if lines.is_empty() {
        return Err(AuditError::NoInstructions);
    }

    let document = build_stages(&lines)?;
    resolve_stage_references(&document)?;
    Ok(document)
}

struct RawInstruction {
    line: usize,
    keyword: Keyword,
    arguments: String,
}

fn logical_lines(text: &str) -> Vec<RawInstruction> {
    let mut out = Vec::new();
    let mut buffer = String::new();
    let mut start_line = 0usize;

    for (idx, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        // Comment and blank lines are dropped even inside a continuation.
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if buffer.is_empty() {
            start_line = idx + 1;
        }

        if let Some(stripped) = trimmed.strip_suffix('\\') {
            buffer.push_str(stripped.trim_end());
            buffer.push(' ');
            continue;
        }

        buffer.push_str(trimmed);
        if let Some(instr) = split_instruction(&buffer, start_line) {
            out.push(instr);
        }
        buffer.clear();
    }

    // A trailing continuation with no final line still forms an instruction.
    if !buffer.is_empty() {
        if let Some(instr) = split_instruction(buffer.trim_end(), start_line) {
            out.push(instr);
        }
    }

    out
}

fn split_instruction(line: &str, number: usize) -> Option<RawInstruction> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let token = parts.next().filter(|t| !t.is_empty())?;
    let arguments = parts.next().unwrap_or("").trim().to_string();
    Some(RawInstruction {
        line: number,
        keyword: Keyword::parse(token),
        arguments,
    })
}

fn build_stages(lines: &[RawInstruction]) -> Result<Document> {
    let mut stages: Vec<Stage> = Vec::new();
    // ARG (and anything else) before the first FROM belongs to stage 0.
    let mut preamble: Vec<Instruction> = Vec::new();

    for raw in lines {
        if raw.keyword == Keyword::From {
            let (base_image, base_tag, alias) = parse_from(&raw.arguments, raw.line)?;
            let index = stages.len();
            let mut instructions = Vec::new();
            if index == 0 {
                instructions.append(&mut preamble);
            }
            instructions.push(Instruction {
                line: raw.line,
                keyword: Keyword::From,
                arguments: raw.arguments.clone(),
                stage_index: index,
            });
            stages.push(Stage {
                index,
                base_image,
                base_tag,
                alias,
                instructions,
            });
        } else {
            let instr = Instruction {
                line: raw.line,
                keyword: raw.keyword,
                arguments: raw.arguments.clone(),
                stage_index: stages.len().saturating_sub(1),
            };
            match stages.last_mut() {
                Some(stage) => stage.instructions.push(instr),
                None => preamble.push(instr),
            }
        }
    }

    if stages.is_empty() {
        let line = lines.first().map(|r| r.line).unwrap_or(1);
        return Err(AuditError::parse(line, "no FROM instruction in Dockerfile"));
    }

    Ok(Document { stages })
}

/// Split a FROM argument list into (image, tag-or-digest, alias).
///
/// Flags such as `--platform=` are skipped. The tag is whatever follows the
/// last `:` after the last `/`, so registry ports are not mistaken for tags;
/// a digest after `@` counts as the tag for pinning purposes.
fn parse_from(arguments: &str, line: usize) -> Result<(String, Option<String>, Option<String>)> {
    let tokens: Vec<&str> = arguments.split_whitespace().collect();

    let image = tokens
        .iter()
        .find(|t| !t.starts_with("--"))
        .copied()
        .ok_or_else(|| AuditError::parse(line, "FROM is missing an image reference"))?;

    let alias = match tokens.iter().position(|t| t.eq_ignore_ascii_case("as")) {
        Some(pos) => Some(
            tokens
                .get(pos + 1)
                .copied()
                .map(str::to_string)
                .ok_or_else(|| AuditError::parse(line, "FROM ... AS is missing a stage name"))?,
        ),
        None => None,
    };

    let (name, tag) = split_image_ref(image);
    Ok((name, tag, alias))
}

fn split_image_ref(image: &str) -> (String, Option<String>) {
    if let Some((name, digest)) = image.split_once('@') {
        return (name.to_string(), Some(digest.to_string()));
    }
    match image.rfind(':') {
        Some(pos) if pos > image.rfind('/').unwrap_or(0) => (
            image[..pos].to_string(),
            Some(image[pos + 1..].to_string()),
        ),
        _ => (image.to_string(), None),
    }
}

fn resolve_stage_references(document: &Document) -> Result<()> {
    for stage in &document.stages {
        for instr in &stage.instructions {
            if instr.keyword != Keyword::Copy {
                continue;
            }
            let Some(reference) = copy_from_reference(&instr.arguments) else {
                continue;
            };
            let resolved = match reference.parse::<usize>() {
                Ok(idx) => idx < stage.index,
                Err(_) => document.is_earlier_alias(&reference, stage.index),
            };
            if !resolved {
                return Err(AuditError::parse(
                    instr.line,
                    format!("COPY --from={reference} does not reference an earlier build stage"),
                ));
            }
        }
    }
    Ok(())
}

fn copy_from_reference(arguments: &str) -> Option<String> {
    arguments.split_whitespace().find_map(|token| {
        token
            .strip_prefix("--from=")
            .map(|r| r.trim_matches('"').to_string())
    })
}
