//! Source-map recording and Base64-VLQ encoding.
//!
//! Every node emission is bracketed: a span is recorded at the node's first
//! non-trivia position and again at its end. Records are deduplicated — a
//! new record is kept only when the emitted position moved, or when the
//! source position moved backwards (lowering reorders source) — and the
//! surviving spans are delta-encoded into the `mappings` stream on the next
//! transition.
//!
//! The stream is the standard v3 format: `;` separates emitted lines, `,`
//! separates segments within a line, and each segment is four or five
//! zig-zag Base64-VLQ fields: emitted column, source index, source line,
//! source column, and (when a named scope is active) name index. All deltas
//! are against the previous *encoded* segment, which is what keeps the
//! stream valid across source-file boundaries under `--out` concatenation.

use downlevel_syntax::SourceFile;
use serde::Serialize;

use crate::writer::TextWriter;

const BASE64_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Zig-zag maps signed to unsigned so small magnitudes of either sign stay
/// short: bit 0 is the sign, the rest is the magnitude.
fn zigzag_encode(value: i64) -> u64 {
    if value < 0 {
        (((-value) as u64) << 1) + 1
    } else {
        (value as u64) << 1
    }
}

fn zigzag_decode(value: u64) -> i64 {
    if value & 1 != 0 {
        -((value >> 1) as i64)
    } else {
        (value >> 1) as i64
    }
}

/// Appends one signed value to `out` as Base64 VLQ: 5-bit groups, least
/// significant first, continuation bit on every group but the last.
pub fn base64_vlq_encode(out: &mut String, value: i64) {
    let mut rest = zigzag_encode(value);
    loop {
        let mut group = (rest & 0x1f) as u8;
        rest >>= 5;
        if rest != 0 {
            group |= 0x20;
        }
        out.push(BASE64_CHARS[group as usize] as char);
        if rest == 0 {
            break;
        }
    }
}

/// Decodes one VLQ value starting at `chars[pos]`; returns the value and
/// the index past it. `None` on a malformed stream.
pub fn base64_vlq_decode(chars: &[u8], pos: usize) -> Option<(i64, usize)> {
    let mut shift = 0u32;
    let mut value = 0u64;
    let mut i = pos;
    loop {
        let b = *chars.get(i)?;
        let digit = BASE64_CHARS.iter().position(|&c| c == b)? as u64;
        value |= (digit & 0x1f) << shift;
        shift += 5;
        i += 1;
        if digit & 0x20 == 0 {
            break;
        }
    }
    Some((zigzag_decode(value), i))
}

/// One resolved mapping: emitted position to source position, all 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMapSpan {
    pub emitted_line: usize,
    pub emitted_column: usize,
    pub source_index: usize,
    pub source_line: usize,
    pub source_column: usize,
    /// Index into the names table when a named scope is active.
    pub name_index: Option<usize>,
}

/// The `.js.map` sidecar, serialized with serde.
#[derive(Debug, Clone, Serialize)]
pub struct SourceMapJson {
    pub version: u32,
    pub file: String,
    #[serde(rename = "sourceRoot")]
    pub source_root: String,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

/// Everything the orchestrator reports about one emitted map.
#[derive(Debug, Clone)]
pub struct SourceMapData {
    /// Path of the map file itself.
    pub source_map_file_path: String,
    /// URL written after `sourceMappingURL=` in the `.js`.
    pub js_source_mapping_url: String,
    pub map: SourceMapJson,
}

/// Stateful recorder driven by the emitter.
pub struct SourceMapWriter {
    sources: Vec<String>,
    names: Vec<String>,
    name_index_stack: Vec<usize>,
    current_source_index: usize,
    last_recorded: Option<SourceMapSpan>,
    last_encoded: Option<SourceMapSpan>,
    mappings: String,
    /// Emitted line the encoder has advanced to.
    encoded_line: usize,
}

impl SourceMapWriter {
    pub fn new() -> Self {
        SourceMapWriter {
            sources: Vec::new(),
            names: Vec::new(),
            name_index_stack: Vec::new(),
            current_source_index: 0,
            last_recorded: None,
            last_encoded: None,
            mappings: String::new(),
            encoded_line: 1,
        }
    }

    /// Registers a source file and makes it current. Under `--out`
    /// concatenation this is called once per input file; the encoder's
    /// deltas carry the index change.
    pub fn set_current_source(&mut self, source_path: String) {
        self.sources.push(source_path);
        self.current_source_index = self.sources.len() - 1;
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Records a span mapping the writer's current position to `pos` in
    /// `file`. Dedup rule: keep when the emitted position moved; when it
    /// has not, update in place only if the source position moved
    /// backwards.
    pub fn record_span(&mut self, file: &SourceFile<'_>, pos: usize, writer: &TextWriter) {
        let lc = file.line_and_character_of_pos(pos);
        let span = SourceMapSpan {
            emitted_line: writer.line(),
            emitted_column: writer.column(),
            source_index: self.current_source_index,
            source_line: lc.line + 1,
            source_column: lc.character + 1,
            name_index: self.name_index_stack.last().copied(),
        };
        match self.last_recorded {
            Some(last)
                if last.emitted_line == span.emitted_line
                    && last.emitted_column == span.emitted_column =>
            {
                // Same emitted position: prefer the earliest source position.
                if span.source_index < last.source_index
                    || (span.source_index == last.source_index
                        && (span.source_line, span.source_column)
                            < (last.source_line, last.source_column))
                {
                    self.last_recorded = Some(span);
                }
            }
            Some(_) => {
                self.encode_last_recorded();
                self.last_recorded = Some(span);
            }
            None => self.last_recorded = Some(span),
        }
    }

    fn encode_last_recorded(&mut self) {
        let Some(span) = self.last_recorded.take() else {
            return;
        };
        let prev = self.last_encoded;

        // Line separators; a new line resets the column base.
        while self.encoded_line < span.emitted_line {
            self.mappings.push(';');
            self.encoded_line += 1;
        }

        let same_line = prev.map(|p| p.emitted_line == span.emitted_line).unwrap_or(false);
        if same_line {
            self.mappings.push(',');
        }

        let prev_column = if same_line {
            prev.map(|p| p.emitted_column as i64).unwrap_or(1)
        } else {
            1
        };
        base64_vlq_encode(&mut self.mappings, span.emitted_column as i64 - prev_column);

        let (prev_index, prev_line, prev_col) = prev
            .map(|p| (p.source_index as i64, p.source_line as i64, p.source_column as i64))
            .unwrap_or((0, 1, 1));
        base64_vlq_encode(&mut self.mappings, span.source_index as i64 - prev_index);
        base64_vlq_encode(&mut self.mappings, span.source_line as i64 - prev_line);
        base64_vlq_encode(&mut self.mappings, span.source_column as i64 - prev_col);

        if let Some(name_index) = span.name_index {
            let prev_name = prev.and_then(|p| p.name_index).map(|n| n as i64).unwrap_or(0);
            base64_vlq_encode(&mut self.mappings, name_index as i64 - prev_name);
            self.last_encoded = Some(span);
        } else {
            // Carry the previous name index forward so a later named span
            // deltas against the right base.
            let carried = SourceMapSpan {
                name_index: prev.and_then(|p| p.name_index),
                ..span
            };
            self.last_encoded = Some(carried);
        }
    }

    /// Enters a named scope; subsequent spans carry the interned name.
    /// Nested scopes record qualified `parent.child` names.
    pub fn push_scope(&mut self, name: &str) {
        let qualified = match self.name_index_stack.last() {
            Some(&parent) => format!("{}.{}", self.names[parent], name),
            None => name.to_string(),
        };
        let index = match self.names.iter().position(|n| n == &qualified) {
            Some(index) => index,
            None => {
                self.names.push(qualified);
                self.names.len() - 1
            }
        };
        self.name_index_stack.push(index);
    }

    pub fn pop_scope(&mut self) {
        self.name_index_stack.pop();
    }

    /// Flushes the pending record and assembles the JSON sidecar.
    pub fn finish(mut self, file: String, source_root: String) -> SourceMapJson {
        self.encode_last_recorded();
        SourceMapJson {
            version: 3,
            file,
            source_root,
            sources: self.sources,
            names: self.names,
            mappings: self.mappings,
        }
    }
}

impl Default for SourceMapWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a mappings string back to spans. Test-side inverse of the
/// encoder; 1-based like the recorder.
pub fn decode_mappings(mappings: &str) -> Vec<SourceMapSpan> {
    let bytes = mappings.as_bytes();
    let mut result = Vec::new();
    let mut line = 1usize;
    let mut column = 1i64;
    let mut source_index = 0i64;
    let mut source_line = 1i64;
    let mut source_column = 1i64;
    let mut name_index = 0i64;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b';' => {
                line += 1;
                column = 1;
                i += 1;
            }
            b',' => {
                i += 1;
            }
            _ => {
                let (d_col, next) = base64_vlq_decode(bytes, i).expect("malformed mappings");
                column += d_col;
                i = next;
                let (d_src, next) = base64_vlq_decode(bytes, i).expect("malformed mappings");
                source_index += d_src;
                i = next;
                let (d_line, next) = base64_vlq_decode(bytes, i).expect("malformed mappings");
                source_line += d_line;
                i = next;
                let (d_scol, next) = base64_vlq_decode(bytes, i).expect("malformed mappings");
                source_column += d_scol;
                i = next;
                let mut name = None;
                if i < bytes.len() && bytes[i] != b',' && bytes[i] != b';' {
                    let (d_name, next) = base64_vlq_decode(bytes, i).expect("malformed mappings");
                    name_index += d_name;
                    name = Some(name_index as usize);
                    i = next;
                }
                result.push(SourceMapSpan {
                    emitted_line: line,
                    emitted_column: column as usize,
                    source_index: source_index as usize,
                    source_line: source_line as usize,
                    source_column: source_column as usize,
                    name_index: name,
                });
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vlq_round_trips_small_values() {
        for value in -64i64..=64 {
            let mut s = String::new();
            base64_vlq_encode(&mut s, value);
            let (decoded, used) = base64_vlq_decode(s.as_bytes(), 0).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(used, s.len());
        }
    }

    #[test]
    fn vlq_round_trips_wide_range() {
        let mut value = 1i64;
        while value <= 1 << 30 {
            for v in [value, -value] {
                let mut s = String::new();
                base64_vlq_encode(&mut s, v);
                let (decoded, _) = base64_vlq_decode(s.as_bytes(), 0).unwrap();
                assert_eq!(decoded, v);
            }
            value *= 3;
        }
    }

    #[test]
    fn zigzag_bit_zero_encodes_sign() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-1), 3);
        assert_eq!(zigzag_decode(zigzag_encode(-12345)), -12345);
    }

    #[test]
    fn known_vlq_encodings() {
        // 16 zig-zags to 32 = 0b100000: "gB" in the standard alphabet.
        let mut s = String::new();
        base64_vlq_encode(&mut s, 16);
        assert_eq!(s, "gB");

        let mut s = String::new();
        base64_vlq_encode(&mut s, 0);
        assert_eq!(s, "A");
    }

    #[test]
    fn decode_mappings_tracks_lines() {
        // Two segments on line 1, one on line 2.
        let mut m = String::new();
        base64_vlq_encode(&mut m, 0); // col 1
        base64_vlq_encode(&mut m, 0);
        base64_vlq_encode(&mut m, 0);
        base64_vlq_encode(&mut m, 0);
        m.push(',');
        base64_vlq_encode(&mut m, 4); // col 5
        base64_vlq_encode(&mut m, 0);
        base64_vlq_encode(&mut m, 0);
        base64_vlq_encode(&mut m, 4);
        m.push(';');
        base64_vlq_encode(&mut m, 0); // line 2 col 1
        base64_vlq_encode(&mut m, 0);
        base64_vlq_encode(&mut m, 1);
        base64_vlq_encode(&mut m, -4);
        let spans = decode_mappings(&m);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].emitted_line, 1);
        assert_eq!(spans[1].emitted_column, 5);
        assert_eq!(spans[2].emitted_line, 2);
        assert_eq!(spans[2].source_line, 2);
        assert_eq!(spans[2].source_column, 1);
    }

    #[test]
    fn scope_names_qualify_by_nesting() {
        let mut sm = SourceMapWriter::new();
        sm.push_scope("M");
        sm.push_scope("C");
        sm.push_scope("m");
        let json = sm.finish("a.js".to_string(), String::new());
        assert_eq!(json.names, vec!["M", "M.C", "M.C.m"]);
    }

    #[test]
    fn repeated_scope_names_are_interned_once() {
        let mut sm = SourceMapWriter::new();
        sm.push_scope("f");
        sm.pop_scope();
        sm.push_scope("f");
        sm.pop_scope();
        let json = sm.finish("a.js".to_string(), String::new());
        assert_eq!(json.names.len(), 1);
    }
}
