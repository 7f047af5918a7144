//! Emitter diagnostics.
//!
//! The emitter never throws for semantic gaps — a bodyless non-ambient
//! function, a decorator somewhere undecoratable. The offending subtree is
//! skipped (surviving comments still emit) and a [`Diagnostic`] is recorded.
//! Multiple code paths can notice the same gap, so the per-file list is
//! sorted and deduplicated once emission finishes.

use downlevel_base::Span;
use serde::Serialize;

/// Severity of a reported condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Error,
    Warning,
}

/// Diagnostic codes produced by the emitter.
pub mod codes {
    /// Function or method declaration without a body, outside an ambient
    /// context.
    pub const MISSING_BODY: u32 = 2391;
    /// Decorator attached to a member kind that cannot be decorated.
    pub const UNDECORATABLE: u32 = 1206;
    /// The host reported a write failure.
    pub const WRITE_FAILED: u32 = 5033;
}

/// One reported condition, positioned in a source file.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub file_name: String,
    #[serde(skip)]
    pub span: Span,
    pub code: u32,
    pub category: Category,
    pub message: String,
}

impl Diagnostic {
    pub fn error(file_name: &str, span: Span, code: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            file_name: file_name.to_string(),
            span,
            code,
            category: Category::Error,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.span.is_synthesized() {
            write!(f, "{}: DL{}: {}", self.file_name, self.code, self.message)
        } else {
            write!(
                f,
                "{}({}): DL{}: {}",
                self.file_name, self.span.pos, self.code, self.message
            )
        }
    }
}

/// Sorts by file, position, and code, then removes exact duplicates.
///
/// Duplicates arise when the same node is reached from more than one
/// emission path (a class member visited for both its declaration and its
/// decorate call, for instance).
pub fn sort_and_deduplicate(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort_by(|a, b| {
        a.file_name
            .cmp(&b.file_name)
            .then(a.span.pos.cmp(&b.span.pos))
            .then(a.code.cmp(&b.code))
    });
    diagnostics.dedup_by(|a, b| {
        a.file_name == b.file_name && a.span == b.span && a.code == b.code
    });
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_on_same_position_collapse() {
        let a = Diagnostic::error("f.ts", Span::new(10, 20), codes::MISSING_BODY, "no body");
        let diagnostics = sort_and_deduplicate(vec![a.clone(), a]);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn sorted_by_position_within_file() {
        let early = Diagnostic::error("f.ts", Span::new(5, 6), codes::MISSING_BODY, "x");
        let late = Diagnostic::error("f.ts", Span::new(50, 60), codes::UNDECORATABLE, "y");
        let diagnostics = sort_and_deduplicate(vec![late, early]);
        assert_eq!(diagnostics[0].span.pos, 5);
        assert_eq!(diagnostics[1].span.pos, 50);
    }

    #[test]
    fn different_codes_on_same_span_are_kept() {
        let a = Diagnostic::error("f.ts", Span::new(1, 2), codes::MISSING_BODY, "x");
        let b = Diagnostic::error("f.ts", Span::new(1, 2), codes::UNDECORATABLE, "y");
        let diagnostics = sort_and_deduplicate(vec![a, b]);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn display_includes_code() {
        let d = Diagnostic::error("f.ts", Span::new(3, 4), codes::MISSING_BODY, "no body");
        let text = format!("{}", d);
        assert!(text.contains("DL2391"));
        assert!(text.contains("f.ts"));
    }
}
