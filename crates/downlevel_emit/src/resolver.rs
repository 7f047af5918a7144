//! The resolver capability the emitter consults for semantic questions.
//!
//! The emitter performs no symbol resolution of its own: alias liveness,
//! constant values, captured-`this` analysis, and name substitution all come
//! from the checker that produced the tree, behind this trait. Every method
//! is read-only from the emitter's perspective.
//!
//! Methods take the node's id plus, where an implementation would otherwise
//! need its own side table, the identifier text in question.

use downlevel_syntax::NodeId;

/// Per-node analysis facts the checker computed for the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeCheckFlags(u32);

impl NodeCheckFlags {
    pub const NONE: NodeCheckFlags = NodeCheckFlags(0);
    /// A nested function closes over this function's `this`; prefix the
    /// body with `var _this = this;`.
    pub const CAPTURE_THIS: NodeCheckFlags = NodeCheckFlags(1 << 0);
    /// This `this` expression refers to a captured outer `this`; emit
    /// `_this`.
    pub const LEXICAL_THIS: NodeCheckFlags = NodeCheckFlags(1 << 1);

    pub fn contains(self, other: NodeCheckFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: NodeCheckFlags) -> NodeCheckFlags {
        NodeCheckFlags(self.0 | other.0)
    }
}

/// How an identifier reference must be rewritten at its use site.
#[derive(Debug, Clone)]
pub enum Substitution {
    /// Replace with literal text (`exports.x`, `M.x`).
    Text(String),
    /// Replace with `<generated name of the import>.name` — the emitter
    /// manufactures the import's local alias, so the checker cannot return
    /// final text for this case.
    ImportProperty { import: NodeId, name: String },
}

/// Semantic queries the emitter is allowed to ask.
///
/// Defaults answer for trees with no interesting semantics, so test
/// resolvers override only what a scenario exercises.
pub trait EmitResolver {
    /// A value of this name is visible at global scope; generated names
    /// must avoid it.
    fn has_global_name(&self, _name: &str) -> bool {
        false
    }

    /// The constant value of an enum member reference, when the checker
    /// folded one.
    fn get_constant_value(&self, _node: NodeId) -> Option<f64> {
        None
    }

    /// Rewrite for an identifier use site (exported namespace member,
    /// imported binding).
    fn get_expression_name_substitution(&self, _node: NodeId, _name: &str) -> Option<Substitution> {
        None
    }

    /// Identity of the block-scoped variable a declaration or reference
    /// binds to; renames are keyed by this id.
    fn get_block_scoped_variable_id(&self, _node: NodeId, _name: &str) -> Option<u32> {
        None
    }

    /// A value named `name` is visible in the scope enclosing the
    /// declaration — the collision that forces a block-scoped rename.
    fn resolves_to_some_value(&self, _name: &str) -> bool {
        false
    }

    fn get_node_check_flags(&self, _node: NodeId) -> NodeCheckFlags {
        NodeCheckFlags::NONE
    }

    /// An `import x = require(...)` alias is referenced as a value; dead
    /// aliases are dropped from the output.
    fn is_referenced_alias_declaration(&self, _node: NodeId) -> bool {
        true
    }

    /// An export specifier resolves to a value (not a type); only value
    /// aliases re-export.
    fn is_value_alias_declaration(&self, _node: NodeId) -> bool {
        true
    }

    /// Serialized `design:type` for a decorated member.
    fn serialize_type_of_node(&self, _node: NodeId) -> String {
        "Object".to_string()
    }

    /// Serialized `design:paramtypes` entries for a decorated
    /// class/method.
    fn serialize_parameter_types_of_node(&self, _node: NodeId) -> Vec<String> {
        Vec::new()
    }

    /// Serialized `design:returntype` for a decorated method.
    fn serialize_return_type_of_node(&self, _node: NodeId) -> String {
        "void 0".to_string()
    }
}

/// A resolver for trees with no cross-file or scope-collision semantics.
pub struct NullResolver;

impl EmitResolver for NullResolver {}
