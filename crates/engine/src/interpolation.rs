//! `${path}` template interpolation over data model trees.
//!
//! A template contains zero or more `${expr}` expressions where `expr` is an
//! absolute (`/a/b`) or relative (`a/b`, `./a/b`) data model path. Occurrences
//! preceded by a backslash are literal text, not expressions. All functions
//! here are stateless between calls: results never depend on call order.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::path::{get_value_by_path, resolve_path};

/// Matches `${expr}`. The `regex` crate has no lookbehind, so the backslash
/// escape rule is enforced separately by inspecting the byte before each
/// match start (safe on UTF-8: `\` never occurs as a continuation byte).
static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("interpolation pattern is valid"));

fn is_escaped(template: &str, match_start: usize) -> bool {
    match_start > 0 && template.as_bytes()[match_start - 1] == b'\\'
}

/// True iff the template contains at least one unescaped `${...}` expression.
pub fn has_interpolation(template: &str) -> bool {
    EXPRESSION
        .find_iter(template)
        .any(|m| !is_escaped(template, m.start()))
}

/// Extracts the trimmed path expressions in left-to-right order of
/// appearance. Escaped occurrences are skipped entirely.
pub fn parse_interpolation(template: &str) -> Vec<String> {
    EXPRESSION
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if is_escaped(template, whole.start()) {
                return None;
            }
            Some(caps[1].trim().to_string())
        })
        .collect()
}

/// Substitutes every unescaped `${expr}` with the value found in `model`.
///
/// Expressions resolve against `base_path` first. Absent or null values
/// become the empty string, objects and arrays their canonical JSON text,
/// and other scalars their plain string form (`true`/`false` for booleans,
/// numbers without added formatting). After substitution every `\${` is
/// unescaped to `${` so literal occurrences survive.
pub fn interpolate(template: &str, model: &Value, base_path: Option<&str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut tail = 0;
    for caps in EXPRESSION.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        if is_escaped(template, whole.start()) {
            continue;
        }
        out.push_str(&template[tail..whole.start()]);
        let path = resolve_path(caps[1].trim(), base_path);
        push_rendered(&mut out, get_value_by_path(model, &path));
        tail = whole.end();
    }
    out.push_str(&template[tail..]);
    out.replace(r"\${", "${")
}

fn push_rendered(out: &mut String, value: Option<&Value>) {
    match value {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => out.push_str(s),
        Some(Value::Bool(b)) => out.push_str(if *b { "true" } else { "false" }),
        Some(Value::Number(n)) => out.push_str(&n.to_string()),
        Some(container) => out.push_str(&container.to_string()),
    }
}

/// Extracts the template's dependency paths, resolved to absolute form.
///
/// This is the reactive-invalidation key set: a component whose template
/// embeds a path must be re-evaluated whenever that absolute path (or an
/// ancestor or descendant of it) changes.
pub fn interpolation_dependencies(template: &str, base_path: Option<&str>) -> Vec<String> {
    parse_interpolation(template)
        .iter()
        .map(|path| resolve_path(path, base_path))
        .collect()
}
