//! The comment router: what survives, where it attaches, how it separates.
//!
//! Comments are re-read from the original source text; the router only
//! decides which ranges to emit at a node boundary and with what
//! separators:
//!
//! - **Leading** ranges sit in the trivia before a node. A blank line in
//!   the source between the previous token and the first comment is
//!   reproduced; each comment is followed by a line break if it had one,
//!   otherwise a single space.
//! - **Trailing** ranges follow a node on the same line and are separated
//!   by one space.
//! - **Detached** ranges are a copyright-style header: a comment run at a
//!   file or body start separated from the first real node by at least one
//!   blank line. They are written once and then suppressed from that node's
//!   leading set.
//! - Under `removeComments`, only pinned (`/*!`) and triple-slash
//!   directives survive.

use downlevel_syntax::{skip_trivia, CommentKind, CommentRange, SourceFile};

use crate::writer::TextWriter;

/// Applies the `removeComments` policy to a set of ranges.
pub fn filter_comments(
    ranges: Vec<CommentRange>,
    text: &str,
    remove_comments: bool,
) -> Vec<CommentRange> {
    if !remove_comments {
        return ranges;
    }
    ranges
        .into_iter()
        .filter(|range| range.is_pinned(text) || range.is_triple_slash_directive(text))
        .collect()
}

/// Reproduces a source blank line: if the first comment did not share a
/// line with the token before it, break before emitting it.
pub fn emit_new_line_before_comments(
    writer: &mut TextWriter,
    file: &SourceFile<'_>,
    pos: usize,
    ranges: &[CommentRange],
) {
    if let Some(first) = ranges.first() {
        if pos != first.span.pos && file.line_of_pos(pos) != file.line_of_pos(first.span.pos) {
            writer.write_line();
        }
    }
}

/// Writes each range verbatim with its separator: a line break when the
/// source had one after the comment, a single space otherwise.
pub fn emit_comment_ranges(writer: &mut TextWriter, text: &str, ranges: &[CommentRange]) {
    for range in ranges {
        write_comment(writer, text, range);
        if range.has_trailing_new_line {
            writer.write_line();
        } else {
            writer.write(" ");
        }
    }
}

/// Writes trailing comments, each preceded by a space.
pub fn emit_trailing_comment_ranges(writer: &mut TextWriter, text: &str, ranges: &[CommentRange]) {
    for range in ranges {
        writer.write(" ");
        write_comment(writer, text, range);
    }
}

fn write_comment(writer: &mut TextWriter, text: &str, range: &CommentRange) {
    let slice = &text[range.span.pos..range.span.end];
    match range.kind {
        CommentKind::SingleLine => writer.write(slice),
        CommentKind::MultiLine => writer.write_literal(slice),
    }
}

/// Finds the detached header at `pos`: the longest comment run with no
/// internal blank line, itself separated from the first token by at least
/// one blank line. Returns the ranges and the offset emission should
/// consider consumed.
pub fn compute_detached_comments(
    file: &SourceFile<'_>,
    pos: usize,
) -> Option<(Vec<CommentRange>, usize)> {
    let ranges = downlevel_syntax::leading_comment_ranges(&file.text, pos);
    let mut detached: Vec<CommentRange> = Vec::new();
    for range in ranges {
        if let Some(last) = detached.last() {
            let last_line = file.line_of_pos(last.span.end);
            let line = file.line_of_pos(range.span.pos);
            if line >= last_line + 2 {
                break;
            }
        }
        detached.push(range);
    }
    let last = detached.last()?;
    let last_line = file.line_of_pos(last.span.end);
    let node_line = file.line_of_pos(skip_trivia(&file.text, pos));
    if node_line >= last_line + 2 {
        let end = last.span.end;
        Some((detached, end))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use downlevel_syntax::{leading_comment_ranges, with_factory};

    fn file_for(text: &str) -> (String, Vec<usize>) {
        (
            text.to_string(),
            downlevel_syntax::compute_line_starts(text),
        )
    }

    fn source_file<R>(text: &str, f: impl for<'a> Fn(&SourceFile<'a>) -> R) -> R {
        let owned = text.to_string();
        with_factory(move |fac| {
            let file = fac.source_file("t.ts", &owned, vec![]);
            f(&file)
        })
    }

    #[test]
    fn remove_comments_keeps_pinned_and_directives() {
        let text = "/*! legal */\n// note\n/// <reference path=\"a.ts\" />\nvar x;";
        let (text, _) = file_for(text);
        let ranges = leading_comment_ranges(&text, 0);
        assert_eq!(ranges.len(), 3);
        let kept = filter_comments(ranges, &text, true);
        assert_eq!(kept.len(), 2);
        assert!(kept[0].is_pinned(&text));
        assert!(kept[1].is_triple_slash_directive(&text));
    }

    #[test]
    fn comment_with_trailing_newline_breaks_line() {
        let text = "// note\nvar x;";
        let ranges = leading_comment_ranges(text, 0);
        let mut writer = TextWriter::new("\n");
        emit_comment_ranges(&mut writer, text, &ranges);
        writer.write("var x;");
        assert_eq!(writer.text(), "// note\nvar x;");
    }

    #[test]
    fn inline_comment_is_followed_by_space() {
        let text = "/* c */ var x;";
        let ranges = leading_comment_ranges(text, 0);
        let mut writer = TextWriter::new("\n");
        emit_comment_ranges(&mut writer, text, &ranges);
        writer.write("var x;");
        assert_eq!(writer.text(), "/* c */ var x;");
    }

    #[test]
    fn detached_header_requires_blank_line() {
        source_file("// copyright\n\nvar x;", |file| {
            let detached = compute_detached_comments(file, 0);
            let (ranges, end) = detached.expect("header should detach");
            assert_eq!(ranges.len(), 1);
            assert_eq!(end, "// copyright".len());
        });

        source_file("// plain leading\nvar x;", |file| {
            assert!(compute_detached_comments(file, 0).is_none());
        });
    }

    #[test]
    fn detached_header_stops_at_internal_blank_line() {
        source_file("// a\n// b\n\n// later\n\nvar x;", |file| {
            let (ranges, _) = compute_detached_comments(file, 0).unwrap();
            assert_eq!(ranges.len(), 2);
        });
    }

    #[test]
    fn blank_line_before_comment_is_reproduced() {
        source_file("var a;\n\n// note\nvar x;", |file| {
            let pos = "var a;".len();
            let ranges = leading_comment_ranges(&file.text, pos);
            let mut writer = TextWriter::new("\n");
            writer.write("var a;");
            emit_new_line_before_comments(&mut writer, file, pos, &ranges);
            assert!(writer.text().ends_with('\n') || writer.at_line_start());
        });
    }
}
