//! Variable interpolation of manifest values
//!
//! Variables come only from env files next to the manifest, never from the
//! process environment, so the same snapshot always yields the same services.

use super::env_file::EnvVars;
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;
use tracing::warn;

/// Start of a reference: `$$`, `$NAME`, or `${NAME` with an optional modifier.
/// The argument of a braced reference runs to its matching `}`.
fn reference_head() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$(?:(\$)|([A-Za-z_][A-Za-z0-9_]*)|\{([A-Za-z_][A-Za-z0-9_]*)(:?[-+?])?)")
            .expect("valid regex")
    })
}

/// Expands `$VAR` / `${VAR}` references and their modifier forms in `input`.
///
/// Unset variables expand to the empty string. A failing `?` requirement is
/// reported and also expands to the empty string. Modifier arguments may
/// themselves contain references, nested to any depth. Malformed or
/// unterminated references are kept literally.
pub fn interpolate(input: &str, vars: &EnvVars) -> String {
    if !input.contains('$') {
        return input.to_string();
    }

    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(caps) = reference_head().captures(rest) {
        let Some(head) = caps.get(0) else {
            break;
        };
        output.push_str(&rest[..head.start()]);
        let after = &rest[head.end()..];

        if caps.get(1).is_some() {
            output.push('$');
            rest = after;
            continue;
        }
        if let Some(name) = caps.get(2) {
            output.push_str(vars.get(name.as_str()).map(String::as_str).unwrap_or_default());
            rest = after;
            continue;
        }

        let name = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
        let op = caps.get(4).map(|m| m.as_str());
        match closing_brace(after) {
            Some(end) if op.is_some() || end == 0 => {
                output.push_str(&expand(name, op, &after[..end], vars));
                rest = &after[end + 1..];
            }
            _ => {
                output.push_str(head.as_str());
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

/// Byte offset of the `}` closing a reference whose body starts `text`
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(offset),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Interpolates every string scalar inside a manifest document
pub fn interpolate_value(value: &mut Value, vars: &EnvVars) {
    match value {
        Value::String(s) => *s = interpolate(s, vars),
        Value::Sequence(items) => {
            for item in items {
                interpolate_value(item, vars);
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                interpolate_value(item, vars);
            }
        }
        Value::Tagged(tagged) => interpolate_value(&mut tagged.value, vars),
        _ => {}
    }
}

fn expand(name: &str, op: Option<&str>, arg: &str, vars: &EnvVars) -> String {
    let current = vars.get(name);
    let Some(op) = op else {
        return current.cloned().unwrap_or_default();
    };

    let set = current.is_some();
    let non_empty = current.map(|v| !v.is_empty()).unwrap_or(false);

    match op {
        ":-" if non_empty => current.cloned().unwrap_or_default(),
        "-" if set => current.cloned().unwrap_or_default(),
        ":-" | "-" => interpolate(arg, vars),
        ":+" if non_empty => interpolate(arg, vars),
        "+" if set => interpolate(arg, vars),
        ":+" | "+" => String::new(),
        ":?" if non_empty => current.cloned().unwrap_or_default(),
        "?" if set => current.cloned().unwrap_or_default(),
        _ => {
            warn!(variable = name, message = arg, "Required manifest variable is not set");
            String::new()
        }
    }
}
