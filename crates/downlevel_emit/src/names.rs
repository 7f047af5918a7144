//! Generated names: temporaries, suffixed uniques, and rename bookkeeping.
//!
//! Three name classes come out of here:
//!
//! - **Temporaries** cycle `_a, _b, … _z, _0, _1, …`, skipping the positions
//!   that would produce `_i` and `_n`; those two are reserved and handed out
//!   only on explicit request (the `for-of` index wants `_i`). The counter
//!   lives in the low 28 bits of [`NameGenerator::temp_state`]; the two
//!   reserved-name bits sit above it. Temp names are *not* recorded
//!   permanently — after the enclosing function restores the saved counter,
//!   a sibling body may reuse them.
//! - **Unique suffixed names** (`make_unique_name`) try `base_1`, `base_2`,
//!   … and record the winner for the rest of the file.
//! - **Renames** map a resolver-provided block-scoped variable id to the
//!   replacement identifier chosen when a `let`/`const` collides with an
//!   enclosing value.
//!
//! Every candidate passes the same uniqueness test: not a resolver-visible
//! global, not an identifier occurring in the source file, not a name this
//! generator already handed out.

use std::collections::{HashMap, HashSet};

use downlevel_syntax::{NodeId, SourceFile};

use crate::resolver::EmitResolver;

const COUNT_MASK: u32 = 0x0FFF_FFFF;
const RESERVED_I: u32 = 0x1000_0000;
const RESERVED_N: u32 = 0x2000_0000;

// Counter positions that would spell the reserved names.
const POS_I: u32 = 8;
const POS_N: u32 = 13;

/// What the caller wants from [`NameGenerator::make_temp_variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempHint {
    /// Next free name in the cycle.
    Auto,
    /// `_i` if still free, else the next cycled name.
    LoopCounter,
    /// `_n` if still free, else the next cycled name.
    CountTemp,
}

/// Per-file generated-name state.
pub struct NameGenerator {
    temp_flags: u32,
    generated_names: HashSet<String>,
    node_names: HashMap<NodeId, String>,
    renames: HashMap<u32, String>,
}

impl NameGenerator {
    pub fn new() -> Self {
        NameGenerator {
            temp_flags: 0,
            generated_names: HashSet::new(),
            node_names: HashMap::new(),
            renames: HashMap::new(),
        }
    }

    /// Not a resolver global, not in the file's identifiers, not already
    /// generated.
    pub fn is_unique_name(
        &self,
        name: &str,
        resolver: &dyn EmitResolver,
        file: &SourceFile<'_>,
    ) -> bool {
        !resolver.has_global_name(name)
            && !file.identifiers.contains(name)
            && !self.generated_names.contains(name)
    }

    /// The raw temp counter, saved and restored around lexical scopes.
    pub fn temp_state(&self) -> u32 {
        self.temp_flags
    }

    pub fn set_temp_state(&mut self, state: u32) {
        self.temp_flags = state;
    }

    pub fn make_temp_variable(
        &mut self,
        hint: TempHint,
        resolver: &dyn EmitResolver,
        file: &SourceFile<'_>,
    ) -> String {
        let reserved = match hint {
            TempHint::LoopCounter => Some((RESERVED_I, "_i")),
            TempHint::CountTemp => Some((RESERVED_N, "_n")),
            TempHint::Auto => None,
        };
        if let Some((bit, name)) = reserved {
            if self.temp_flags & bit == 0 && self.is_unique_name(name, resolver, file) {
                self.temp_flags |= bit;
                return name.to_string();
            }
        }
        loop {
            let count = self.temp_flags & COUNT_MASK;
            self.temp_flags = (self.temp_flags & !COUNT_MASK) | ((count + 1) & COUNT_MASK);
            if count == POS_I || count == POS_N {
                continue;
            }
            let name = if count < 26 {
                format!("_{}", (b'a' + count as u8) as char)
            } else {
                format!("_{}", count - 26)
            };
            if self.is_unique_name(&name, resolver, file) {
                return name;
            }
        }
    }

    /// `base_1`, `base_2`, … — first unique wins and is recorded for the
    /// rest of the file, so a second call with the same base returns a
    /// different name.
    pub fn make_unique_name(
        &mut self,
        base: &str,
        resolver: &dyn EmitResolver,
        file: &SourceFile<'_>,
    ) -> String {
        let base = if base.ends_with('_') {
            base.to_string()
        } else {
            format!("{}_", base)
        };
        let mut i = 1u32;
        loop {
            let name = format!("{}{}", base, i);
            if self.is_unique_name(&name, resolver, file) {
                self.generated_names.insert(name.clone());
                return name;
            }
            i += 1;
        }
    }

    /// The name previously generated for a node, if any.
    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.node_names.get(&node).map(String::as_str)
    }

    pub fn set_node_name(&mut self, node: NodeId, name: String) {
        self.node_names.insert(node, name);
    }

    /// Record that a generated name is in use without deriving it here
    /// (module/enum declarations that keep their own identifier).
    pub fn reserve(&mut self, name: &str) {
        self.generated_names.insert(name.to_string());
    }

    /// A name this generator has already handed out or reserved.
    pub fn is_generated(&self, name: &str) -> bool {
        self.generated_names.contains(name)
    }

    pub fn rename_for(&self, variable_id: u32) -> Option<&str> {
        self.renames.get(&variable_id).map(String::as_str)
    }

    pub fn record_rename(&mut self, variable_id: u32, name: String) {
        self.renames.insert(variable_id, name);
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::NullResolver;
    use downlevel_syntax::with_factory;

    fn run<R>(f: impl for<'a> FnOnce(&SourceFile<'a>) -> R, idents: &[&str]) -> R {
        with_factory(|fac| {
            let stmts: Vec<_> = idents
                .iter()
                .map(|name| {
                    let e = fac.ident(name);
                    fac.expr_stmt(e)
                })
                .collect();
            let file = fac.source_file("t.ts", "", stmts);
            f(&file)
        })
    }

    #[test]
    fn temp_names_cycle_and_skip_i_and_n() {
        run(
            |file| {
                let mut names = NameGenerator::new();
                let resolver = NullResolver;
                let mut seen = Vec::new();
                for _ in 0..26 {
                    seen.push(names.make_temp_variable(TempHint::Auto, &resolver, file));
                }
                assert_eq!(seen[0], "_a");
                assert_eq!(seen[7], "_h");
                // _i and _n are skipped by the automatic cycle.
                assert_eq!(seen[8], "_j");
                assert_eq!(seen[11], "_m");
                assert_eq!(seen[12], "_o");
                assert!(!seen.contains(&"_i".to_string()));
                assert!(!seen.contains(&"_n".to_string()));
                // After _z the cycle continues with _0.
                assert_eq!(seen[24], "_0");
            },
            &[],
        );
    }

    #[test]
    fn loop_counter_hint_grants_i_once() {
        run(
            |file| {
                let mut names = NameGenerator::new();
                let resolver = NullResolver;
                let first = names.make_temp_variable(TempHint::LoopCounter, &resolver, file);
                assert_eq!(first, "_i");
                let second = names.make_temp_variable(TempHint::LoopCounter, &resolver, file);
                assert_eq!(second, "_a");
            },
            &[],
        );
    }

    #[test]
    fn temp_names_avoid_file_identifiers() {
        run(
            |file| {
                let mut names = NameGenerator::new();
                let resolver = NullResolver;
                let name = names.make_temp_variable(TempHint::Auto, &resolver, file);
                assert_eq!(name, "_b");
            },
            &["_a"],
        );
    }

    #[test]
    fn temp_state_restore_reuses_names() {
        run(
            |file| {
                let mut names = NameGenerator::new();
                let resolver = NullResolver;
                let saved = names.temp_state();
                assert_eq!(names.make_temp_variable(TempHint::Auto, &resolver, file), "_a");
                names.set_temp_state(saved);
                assert_eq!(names.make_temp_variable(TempHint::Auto, &resolver, file), "_a");
            },
            &[],
        );
    }

    #[test]
    fn unique_names_suffix_from_one() {
        run(
            |file| {
                let mut names = NameGenerator::new();
                let resolver = NullResolver;
                assert_eq!(names.make_unique_name("m", &resolver, file), "m_1");
                assert_eq!(names.make_unique_name("m", &resolver, file), "m_2");
            },
            &[],
        );
    }

    #[test]
    fn unique_names_skip_taken_identifiers() {
        run(
            |file| {
                let mut names = NameGenerator::new();
                let resolver = NullResolver;
                assert_eq!(names.make_unique_name("m", &resolver, file), "m_2");
            },
            &["m_1"],
        );
    }
}
