//! The indented character sink every emitted byte passes through.
//!
//! The writer tracks the emitted line and column as it goes so the
//! source-map recorder can bracket node emission without re-scanning the
//! buffer. Indentation is applied lazily: [`TextWriter::write_line`] only
//! marks the line start, and the indent string is prepended by the next
//! [`TextWriter::write`], so blank lines never carry trailing spaces.
//!
//! Lines and columns are 1-based, matching what the source-map format
//! records.

const INDENT: &str = "    ";

/// Line-buffered character sink with indentation and position tracking.
pub struct TextWriter {
    output: String,
    new_line: String,
    indent: usize,
    line_count: usize,
    /// Byte offset of the current line's first character.
    line_pos: usize,
    /// At the start of a line; indent not yet applied.
    line_start: bool,
}

impl TextWriter {
    pub fn new(new_line: &str) -> Self {
        TextWriter {
            output: String::new(),
            new_line: new_line.to_string(),
            indent: 0,
            line_count: 0,
            line_pos: 0,
            line_start: true,
        }
    }

    fn begin_text(&mut self) {
        if self.line_start {
            self.line_start = false;
            for _ in 0..self.indent {
                self.output.push_str(INDENT);
            }
        }
    }

    /// Writes text containing no line breaks.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.begin_text();
        self.output.push_str(text);
    }

    /// Starts a new line. Idempotent when the current line is still empty,
    /// so callers may request a break unconditionally.
    pub fn write_line(&mut self) {
        if self.line_start {
            return;
        }
        self.output.push_str(&self.new_line);
        self.line_count += 1;
        self.line_pos = self.output.len();
        self.line_start = true;
    }

    /// Writes text that may contain line breaks, counting them so line and
    /// column stay accurate. Used for verbatim source slices (comments,
    /// multi-line literals); embedded lines are not re-indented.
    pub fn write_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.begin_text();
        let base = self.output.len();
        self.output.push_str(text);
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                        i += 1;
                    }
                    self.line_count += 1;
                    self.line_pos = base + i + 1;
                }
                b'\n' => {
                    self.line_count += 1;
                    self.line_pos = base + i + 1;
                }
                _ => {}
            }
            i += 1;
        }
    }

    pub fn increase_indent(&mut self) {
        self.indent += 1;
    }

    pub fn decrease_indent(&mut self) {
        debug_assert!(self.indent > 0, "indent underflow");
        self.indent = self.indent.saturating_sub(1);
    }

    /// 1-based line of the next character to be written.
    pub fn line(&self) -> usize {
        self.line_count + 1
    }

    /// 1-based column of the next character to be written, accounting for
    /// indentation not yet flushed.
    pub fn column(&self) -> usize {
        if self.line_start {
            self.indent * INDENT.len() + 1
        } else {
            self.output.len() - self.line_pos + 1
        }
    }

    /// Byte offset of the next character.
    pub fn text_pos(&self) -> usize {
        self.output.len()
    }

    /// `true` when nothing has been written on the current line.
    pub fn at_line_start(&self) -> bool {
        self.line_start
    }

    pub fn text(&self) -> &str {
        &self.output
    }

    pub fn into_text(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_appends_text() {
        let mut w = TextWriter::new("\n");
        w.write("var x;");
        assert_eq!(w.text(), "var x;");
    }

    #[test]
    fn indent_is_applied_lazily() {
        let mut w = TextWriter::new("\n");
        w.write("{");
        w.increase_indent();
        w.write_line();
        w.write("a;");
        w.decrease_indent();
        w.write_line();
        w.write("}");
        assert_eq!(w.text(), "{\n    a;\n}");
    }

    #[test]
    fn write_line_is_idempotent_on_empty_line() {
        let mut w = TextWriter::new("\n");
        w.write("a;");
        w.write_line();
        w.write_line();
        w.write("b;");
        assert_eq!(w.text(), "a;\nb;");
    }

    #[test]
    fn leading_write_line_is_a_no_op() {
        let mut w = TextWriter::new("\n");
        w.write_line();
        w.write("a;");
        assert_eq!(w.text(), "a;");
    }

    #[test]
    fn line_and_column_are_one_based() {
        let mut w = TextWriter::new("\n");
        assert_eq!(w.line(), 1);
        assert_eq!(w.column(), 1);
        w.write("var");
        assert_eq!(w.column(), 4);
        w.write_line();
        w.write("x");
        assert_eq!(w.line(), 2);
        assert_eq!(w.column(), 2);
    }

    #[test]
    fn pending_indent_reflected_in_column() {
        let mut w = TextWriter::new("\n");
        w.write("{");
        w.increase_indent();
        w.write_line();
        assert_eq!(w.column(), 5);
    }

    #[test]
    fn write_literal_counts_embedded_lines() {
        let mut w = TextWriter::new("\n");
        w.write_literal("/* a\n   b */");
        assert_eq!(w.line(), 2);
        assert_eq!(w.column(), 8);
    }

    #[test]
    fn crlf_newline_string_is_respected() {
        let mut w = TextWriter::new("\r\n");
        w.write("a;");
        w.write_line();
        w.write("b;");
        assert_eq!(w.text(), "a;\r\nb;");
        assert_eq!(w.line(), 2);
    }
}
