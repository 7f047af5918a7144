//! The emitter proper: a single ordered traversal that writes text, tracks
//! positions, invents names, and lowers syntax as it goes.
//!
//! # Module split
//!
//! - [`context`]: the [`Emitter`](context::Emitter) state — writer, name
//!   generator, scoped save/restore, comment and source-map bracketing
//! - [`expr`]/[`stmt`]: the node-kind dispatch (straight-through emission,
//!   precedence preservation, list layout)
//! - [`lowering`]: the downlevel engine — classes, decorators,
//!   destructuring, `for-of`, templates, parameters, enums, namespaces
//! - [`modules`]: the four module envelopes and the external-module
//!   pre-pass
//! - [`program`]: per-file orchestration, helper injection, output paths

pub mod context;
pub mod expr;
pub mod lowering;
pub mod modules;
pub mod program;
pub mod stmt;

pub use context::Emitter;
pub use program::{emit_files, EmitResult};

/// Quotes and escapes a string value as a JavaScript double-quoted
/// literal. The form used for all generated text (helper keys, enum
/// member names, module specifiers).
pub(crate) fn escape_string(value: &str) -> String {
    quote_string(value, false)
}

/// Quotes and escapes a string value, keeping the source quote style:
/// only the active quote character is escaped, so `'say "hi"'` re-emits
/// exactly as written.
pub(crate) fn quote_string(value: &str, single_quote: bool) -> String {
    let quote = if single_quote { '\'' } else { '"' };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0}' => out.push_str("\\0"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Renders a resolver-provided constant: integral values print without a
/// fraction.
pub(crate) fn format_constant(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Derives an identifier base from a module specifier: the last path
/// segment, extension dropped, non-identifier characters replaced.
pub(crate) fn module_name_to_identifier(module: &str) -> String {
    let last = module
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(module);
    let stem = last.split('.').next().unwrap_or(last);
    let mut out = String::new();
    for (i, c) in stem.chars().enumerate() {
        let valid = c == '_' || c == '$' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit());
        out.push(if valid { c } else { '_' });
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}
