//! Build-definition parsing utilities

use super::patterns::is_config_source;
use crate::fs::FileSystem;
use std::path::Path;
use tracing::debug;

/// One logical instruction with continuations joined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub keyword: String,
    pub arguments: String,
}

/// Splits a build definition into instructions.
///
/// Backslash continuations are joined. Blank and comment lines are dropped,
/// also when they sit inside a continued instruction.
pub fn parse_instructions(content: &str) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut pending = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match trimmed.strip_suffix('\\') {
            Some(continued) => {
                pending.push_str(continued);
                pending.push(' ');
            }
            None => {
                pending.push_str(trimmed);
                push_instruction(&mut instructions, &pending);
                pending.clear();
            }
        }
    }
    push_instruction(&mut instructions, &pending);

    instructions
}

fn push_instruction(instructions: &mut Vec<Instruction>, raw: &str) {
    let raw = raw.trim();
    if raw.is_empty() {
        return;
    }
    let (keyword, arguments) = raw.split_once(char::is_whitespace).unwrap_or((raw, ""));
    instructions.push(Instruction {
        keyword: keyword.to_uppercase(),
        arguments: arguments.trim().to_string(),
    });
}

/// Sources of a COPY/ADD instruction, or `None` when it copies from another stage
fn copy_sources(arguments: &str) -> Option<Vec<String>> {
    let mut tokens: Vec<String> = Vec::new();
    let mut rest = arguments.trim_start();

    while rest.starts_with("--") {
        let flag_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if rest[..flag_end].starts_with("--from") {
            return None;
        }
        rest = rest[flag_end..].trim_start();
    }

    if rest.starts_with('[') {
        match serde_json::from_str::<Vec<String>>(rest) {
            Ok(list) => tokens.extend(list),
            Err(_) => tokens.extend(rest.split_whitespace().map(str::to_string)),
        }
    } else {
        tokens.extend(rest.split_whitespace().map(str::to_string));
    }

    tokens.pop();
    Some(tokens)
}

/// Whether a COPY/ADD source refers to user code
fn is_code_source(source: &str) -> bool {
    !source.contains("://") && !source.starts_with("<<") && !is_config_source(source)
}

/// Checks whether a build definition copies user code into the image.
///
/// Only COPY/ADD instructions reading from the build context count; sources
/// that are URLs, configuration files or scripts are ignored.
pub fn copies_user_code(content: &str) -> bool {
    parse_instructions(content)
        .iter()
        .filter(|i| i.keyword == "COPY" || i.keyword == "ADD")
        .filter_map(|i| copy_sources(&i.arguments))
        .flatten()
        .any(|source| is_code_source(&source))
}

/// Reads a build definition and checks it for user code; unreadable files copy nothing
pub fn file_copies_user_code<F: FileSystem>(fs: &F, path: &Path) -> bool {
    match fs.read_to_string(path) {
        Ok(content) => copies_user_code(&content),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Could not read build definition");
            false
        }
    }
}
