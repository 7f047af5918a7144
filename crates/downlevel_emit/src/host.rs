//! The host capability: inputs, options, and output writing.
//!
//! The emitter never touches the filesystem. The front end hands it source
//! files and options through this trait and receives output text through
//! `write_file`; path canonicalization is the host's problem too, since
//! only it knows the platform's case rules.

use std::cell::RefCell;
use std::collections::HashMap;

use downlevel_base::{Result, Span, SpannedError};
use downlevel_syntax::SourceFile;

use crate::options::CompilerOptions;

/// What the emitter consumes from its surroundings.
pub trait EmitHost<'a> {
    fn get_source_files(&self) -> &[SourceFile<'a>];

    fn get_compiler_options(&self) -> &CompilerOptions;

    fn get_new_line(&self) -> &str {
        "\n"
    }

    fn get_current_directory(&self) -> String {
        String::new()
    }

    /// The directory common to all inputs; map `sources` entries are
    /// relative to it.
    fn get_common_source_directory(&self) -> String {
        String::new()
    }

    fn get_canonical_file_name(&self, file_name: &str) -> String {
        file_name.to_string()
    }

    /// Writes one output artifact. `write_bom` asks for a UTF-8 BOM prefix.
    fn write_file(&self, file_name: &str, data: &str, write_bom: bool) -> Result<()>;
}

/// A host that keeps outputs in memory — the test and tooling workhorse.
pub struct MemoryHost<'a> {
    pub files: Vec<SourceFile<'a>>,
    pub options: CompilerOptions,
    outputs: RefCell<HashMap<String, String>>,
    new_line: String,
    /// When set, `write_file` fails with this message; exercises the
    /// emitter's I/O failure path.
    pub fail_writes: Option<String>,
}

impl<'a> MemoryHost<'a> {
    pub fn new(files: Vec<SourceFile<'a>>, options: CompilerOptions) -> Self {
        MemoryHost {
            files,
            options,
            outputs: RefCell::new(HashMap::new()),
            new_line: "\n".to_string(),
            fail_writes: None,
        }
    }

    pub fn output(&self, file_name: &str) -> Option<String> {
        self.outputs.borrow().get(file_name).cloned()
    }

    pub fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.outputs.borrow().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<'a> EmitHost<'a> for MemoryHost<'a> {
    fn get_source_files(&self) -> &[SourceFile<'a>] {
        &self.files
    }

    fn get_compiler_options(&self) -> &CompilerOptions {
        &self.options
    }

    fn get_new_line(&self) -> &str {
        &self.new_line
    }

    fn write_file(&self, file_name: &str, data: &str, write_bom: bool) -> Result<()> {
        if let Some(message) = &self.fail_writes {
            return Err(SpannedError::new(message.clone(), Span::SYNTHESIZED));
        }
        let mut text = String::new();
        if write_bom {
            text.push('\u{feff}');
        }
        text.push_str(data);
        self.outputs.borrow_mut().insert(file_name.to_string(), text);
        Ok(())
    }
}
