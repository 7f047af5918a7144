//! Compiler options recognized by the emitter.
//!
//! Options arrive from the host ([`EmitHost::get_compiler_options`]
//! (crate::host::EmitHost::get_compiler_options)); the serde derives let
//! front ends read them straight out of a JSON project file.

use serde::{Deserialize, Serialize};

/// Output language level. Ordering is meaningful: `target < ES6` enables
/// the lowering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ScriptTarget {
    #[default]
    #[serde(rename = "es3")]
    Es3,
    #[serde(rename = "es5")]
    Es5,
    #[serde(rename = "es6")]
    Es6,
}

/// Module envelope placed around an external module's statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ModuleKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "commonjs")]
    CommonJs,
    #[serde(rename = "amd")]
    Amd,
    #[serde(rename = "system")]
    System,
}

/// The emitter's option surface.
///
/// Unknown fields are rejected so a typo in a project file surfaces as an
/// error instead of silently emitting with defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerOptions {
    /// Lowering level; constructs above this level are desugared.
    pub target: ScriptTarget,
    /// Module envelope for external modules.
    pub module: ModuleKind,
    /// Produce a `.js.map` companion and the trailing `sourceMappingURL`
    /// comment.
    pub source_map: bool,
    /// Value of the map's `sourceRoot` field.
    pub source_root: Option<String>,
    /// Directory the map file is served from; affects the URL written into
    /// the `.js` and the source paths written into the map.
    pub map_root: Option<String>,
    /// Concatenate all non-external-module files into this single output.
    pub out: Option<String>,
    /// Prepend a UTF-8 byte-order mark to emitted JavaScript.
    pub emit_bom: bool,
    /// Strip comments, keeping only pinned (`/*!`) and triple-slash
    /// directives.
    pub remove_comments: bool,
    /// Emit const enum bodies instead of erasing them.
    pub preserve_const_enums: bool,
    /// Forbid cross-file const-enum inlining; each file must stand alone.
    pub separate_compilation: bool,
    /// Request `.d.ts` emission from the external declaration emitter.
    pub declaration: bool,
    /// Append `__metadata(...)` design-type entries to decorator calls.
    pub emit_decorator_metadata: bool,
}

impl CompilerOptions {
    /// Lowerings apply below ES6.
    pub fn is_downlevel(&self) -> bool {
        self.target < ScriptTarget::Es6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_es3_no_module() {
        let options = CompilerOptions::default();
        assert_eq!(options.target, ScriptTarget::Es3);
        assert_eq!(options.module, ModuleKind::None);
        assert!(options.is_downlevel());
    }

    #[test]
    fn target_ordering_drives_lowering() {
        assert!(ScriptTarget::Es3 < ScriptTarget::Es6);
        assert!(ScriptTarget::Es5 < ScriptTarget::Es6);
        let es6 = CompilerOptions {
            target: ScriptTarget::Es6,
            ..Default::default()
        };
        assert!(!es6.is_downlevel());
    }

    #[test]
    fn options_deserialize_from_project_json() {
        let options: CompilerOptions = serde_json::from_str(
            r#"{"target": "es5", "module": "commonjs", "sourceMap": true}"#,
        )
        .unwrap();
        assert_eq!(options.target, ScriptTarget::Es5);
        assert_eq!(options.module, ModuleKind::CommonJs);
        assert!(options.source_map);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let result = serde_json::from_str::<CompilerOptions>(r#"{"tragret": "es5"}"#);
        assert!(result.is_err());
    }
}
