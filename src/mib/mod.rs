//! Naming tree adapter.
//!
//! The resolver and formatter only ever read the tree, through the
//! [`NamingTree`] trait. [`MibTree`] is the bundled arena implementation and
//! [`MibTree::standard`] loads the common SNMPv2-MIB / IF-MIB objects.
//!
//! Fuzzy searches record the nodes they have examined in a [`Visited`] set
//! owned by the caller, so the tree itself stays immutable and can be shared
//! between sessions.

mod builtin;
mod pattern;
mod tree;

pub use pattern::Pattern;
pub use tree::MibTree;

use std::collections::HashSet;
use std::num::NonZeroU32;

use crate::oid::Oid;
use crate::types::TypeTag;

/// Arena index of a tree node.
///
/// Using `NonZeroU32` keeps `Option<NodeId>` the size of a `u32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Create from a 0-based index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        let raw = u32::try_from(index).ok()?.checked_add(1)?;
        NonZeroU32::new(raw).map(Self)
    }

    /// Get the 0-based index.
    #[must_use]
    pub const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// A node of the naming tree.
#[derive(Debug, Clone)]
pub struct MibNode {
    /// Descriptor, e.g. `sysDescr`.
    pub label: String,
    /// Sub-identifier relative to the parent.
    pub subid: u32,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Declared syntax, `None` for grouping nodes.
    pub syntax: Option<TypeTag>,
    /// Named numbers of an enumerated INTEGER.
    pub enums: Vec<(i32, String)>,
    /// Defining module, e.g. `SNMPv2-MIB`.
    pub module: Option<String>,
}

impl MibNode {
    pub fn new(label: impl Into<String>, subid: u32, parent: Option<NodeId>) -> Self {
        Self {
            label: label.into(),
            subid,
            parent,
            children: Vec::new(),
            syntax: None,
            enums: Vec::new(),
            module: None,
        }
    }

    /// Label for an enumerated value.
    #[must_use]
    pub fn enum_label(&self, value: i32) -> Option<&str> {
        self.enums
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| label.as_str())
    }

    /// Numeric value for an enumeration label.
    #[must_use]
    pub fn enum_value(&self, label: &str) -> Option<i32> {
        self.enums
            .iter()
            .find(|(_, l)| l == label)
            .map(|(v, _)| *v)
    }

    /// True when the declared syntax is a scalar type with a display name.
    #[must_use]
    pub fn has_scalar_type(&self) -> bool {
        self.syntax.and_then(TypeTag::display_name).is_some()
    }
}

/// Which nodes a fuzzy search may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuzzyScope {
    /// Only nodes with a declared syntax.
    Leaf,
    /// Any node, grouping nodes included.
    Any,
}

/// Nodes already examined by a fuzzy search.
///
/// Owned by the caller of a single resolution. [`Visited::clear`] resets it
/// between independent attempts.
#[derive(Debug, Default)]
pub struct Visited {
    seen: HashSet<NodeId>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a node; returns false if it was already marked.
    pub fn insert(&mut self, id: NodeId) -> bool {
        self.seen.insert(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.seen.contains(&id)
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Read-only view of a loaded naming tree.
///
/// Implement this to plug an external MIB loader into a
/// [`Session`](crate::Session).
pub trait NamingTree: Send + Sync {
    /// Node by arena id.
    fn node(&self, id: NodeId) -> Option<&MibNode>;

    /// Top-level nodes.
    fn roots(&self) -> &[NodeId];

    /// First node whose label equals `name` exactly.
    fn find_leaf_by_name(&self, name: &str) -> Option<NodeId>;

    /// Deepest node along `arcs`, with the number of arcs it consumed.
    fn node_by_oid(&self, arcs: &[u32]) -> Option<(NodeId, usize)>;

    /// Parse a dotted symbolic name, optionally module-qualified
    /// (`SNMPv2-MIB::sysDescr.0`, `.iso.org.dod.internet`, `system.sysName.0`).
    fn parse_full_name(&self, name: &str) -> Option<Oid>;

    /// Best-effort search treating `token` as a pattern, with an optional
    /// trailing numeric instance.
    fn fuzzy_find(&self, token: &str, scope: FuzzyScope, visited: &mut Visited) -> Option<Oid>;

    /// Full numeric path of a node.
    fn oid_of(&self, id: NodeId) -> Oid {
        let mut arcs = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.node(id)) {
            arcs.push(node.subid);
            current = node.parent;
        }
        arcs.reverse();
        Oid::new(arcs)
    }

    /// A node is a leaf if it, or its parent, carries a scalar type.
    fn is_leaf(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if node.has_scalar_type() {
            return true;
        }
        node.parent
            .and_then(|p| self.node(p))
            .is_some_and(MibNode::has_scalar_type)
    }

    /// Declared syntax of the deepest node along `oid`.
    fn syntax_of(&self, oid: &Oid) -> Option<TypeTag> {
        let (id, _) = self.node_by_oid(oid.arcs())?;
        self.node(id)?.syntax
    }
}
