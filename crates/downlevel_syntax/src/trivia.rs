//! Trivia scanning: whitespace and comment ranges.
//!
//! The emitter re-reads comment text straight out of the source file, so the
//! only trivia machinery it needs is positional: where does real token text
//! begin after a node's `pos`, and which comment ranges sit in the trivia
//! before (or after) a position. Classification into leading/trailing/
//! detached sets happens in the emitter's comment router; this module only
//! finds the ranges.
//!
//! Offsets are bytes. Only ASCII whitespace is treated as blank, which
//! matches the checked sources this crate models.

use downlevel_base::Span;

/// `//` or `/* */`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    SingleLine,
    MultiLine,
}

/// One comment's position, kind, and whether a newline follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange {
    pub span: Span,
    pub kind: CommentKind,
    /// A newline separates this comment from what follows. Comments with a
    /// trailing newline re-emit on their own line; the rest are followed by
    /// a single space.
    pub has_trailing_new_line: bool,
}

fn is_line_break(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == 0x0b || b == 0x0c
}

/// Advances past whitespace and comments, returning the offset of the first
/// real token character at or after `pos` (or `text.len()`).
pub fn skip_trivia(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = pos;
    while i < bytes.len() {
        let b = bytes[i];
        if is_space(b) || is_line_break(b) {
            i += 1;
        } else if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            i += 2;
            while i < bytes.len() && !is_line_break(bytes[i]) {
                i += 1;
            }
        } else if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            i += 2;
            while i < bytes.len() {
                if bytes[i] == b'*' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
                    i += 2;
                    break;
                }
                i += 1;
            }
        } else {
            break;
        }
    }
    i
}

fn scan_comment(bytes: &[u8], start: usize) -> Option<(usize, CommentKind)> {
    if start + 1 >= bytes.len() || bytes[start] != b'/' {
        return None;
    }
    match bytes[start + 1] {
        b'/' => {
            let mut i = start + 2;
            while i < bytes.len() && !is_line_break(bytes[i]) {
                i += 1;
            }
            Some((i, CommentKind::SingleLine))
        }
        b'*' => {
            let mut i = start + 2;
            while i < bytes.len() {
                if bytes[i] == b'*' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
                    return Some((i + 2, CommentKind::MultiLine));
                }
                i += 1;
            }
            Some((bytes.len(), CommentKind::MultiLine))
        }
        _ => None,
    }
}

/// Comment ranges between `pos` and the next token.
///
/// `pos` is a node's full start, i.e. the end of the previous token; every
/// comment in the gap belongs to the returned list, in source order.
pub fn leading_comment_ranges(text: &str, pos: usize) -> Vec<CommentRange> {
    let bytes = text.as_bytes();
    let mut result = Vec::new();
    let mut i = pos;
    while i < bytes.len() {
        let b = bytes[i];
        if is_space(b) || is_line_break(b) {
            i += 1;
            continue;
        }
        match scan_comment(bytes, i) {
            Some((end, kind)) => {
                let has_trailing_new_line = end < bytes.len() && is_line_break(bytes[end]);
                result.push(CommentRange {
                    span: Span::new(i, end),
                    kind,
                    has_trailing_new_line,
                });
                i = end;
            }
            None => break,
        }
    }
    result
}

/// Comment ranges that follow `pos` on the same line.
///
/// Scanning stops at the first line break that is not inside a comment, so
/// only trailing same-line comments are returned.
pub fn trailing_comment_ranges(text: &str, pos: usize) -> Vec<CommentRange> {
    let bytes = text.as_bytes();
    let mut result = Vec::new();
    let mut i = pos;
    while i < bytes.len() {
        let b = bytes[i];
        if is_space(b) {
            i += 1;
            continue;
        }
        if is_line_break(b) {
            break;
        }
        match scan_comment(bytes, i) {
            Some((end, kind)) => {
                let has_trailing_new_line = end < bytes.len() && is_line_break(bytes[end]);
                result.push(CommentRange {
                    span: Span::new(i, end),
                    kind,
                    has_trailing_new_line,
                });
                i = end;
            }
            None => break,
        }
    }
    result
}

impl CommentRange {
    /// A pinned comment (`/*!`) survives comment stripping.
    pub fn is_pinned(&self, text: &str) -> bool {
        let bytes = text.as_bytes();
        self.kind == CommentKind::MultiLine
            && self.span.pos + 2 < bytes.len()
            && bytes[self.span.pos + 2] == b'!'
    }

    /// A triple-slash directive (`/// <reference ...>`, `/// <amd-...>`)
    /// also survives comment stripping.
    pub fn is_triple_slash_directive(&self, text: &str) -> bool {
        if self.kind != CommentKind::SingleLine {
            return false;
        }
        let comment = &text[self.span.pos..self.span.end];
        let Some(rest) = comment.strip_prefix("///") else {
            return false;
        };
        let rest = rest.trim_start();
        rest.starts_with("<reference") || rest.starts_with("<amd-")
    }
}
