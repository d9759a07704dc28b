//! Arena-backed naming tree.

use std::collections::HashMap;

use super::{FuzzyScope, MibNode, NamingTree, NodeId, Pattern, Visited};
use crate::error::{Error, Result};
use crate::oid::{MAX_OID_LEN, Oid};
use crate::types::TypeTag;

/// The three top-level arcs every tree starts with.
const ROOTS: [(&str, u32); 3] = [("ccitt", 0), ("iso", 1), ("joint-iso-ccitt", 2)];

/// In-memory naming tree.
///
/// Nodes live in a flat arena and refer to each other by [`NodeId`]. A name
/// index maps labels to every node carrying them, in definition order.
///
/// ```
/// use snmpq::mib::{MibTree, NamingTree};
/// use snmpq::{TypeTag, oid};
///
/// let mut tree = MibTree::new();
/// tree.define("ACME-MIB", "acme", "iso", 99).unwrap();
/// let id = tree.define_object("ACME-MIB", "acmeTemp", "acme", 1, TypeTag::Gauge).unwrap();
/// assert_eq!(tree.oid_of(id), oid!(1, 99, 1));
/// assert_eq!(tree.find_leaf_by_name("acmeTemp"), Some(id));
/// ```
#[derive(Debug, Clone)]
pub struct MibTree {
    nodes: Vec<MibNode>,
    roots: Vec<NodeId>,
    by_name: HashMap<String, Vec<NodeId>>,
}

impl Default for MibTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MibTree {
    /// A tree holding only `ccitt(0)`, `iso(1)` and `joint-iso-ccitt(2)`.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            by_name: HashMap::new(),
        };
        for (label, subid) in ROOTS {
            if let Some(id) = tree.push(MibNode::new(label, subid, None)) {
                tree.roots.push(id);
            }
        }
        tree
    }

    fn push(&mut self, node: MibNode) -> Option<NodeId> {
        let id = NodeId::from_index(self.nodes.len())?;
        self.by_name.entry(node.label.clone()).or_default().push(id);
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p.to_index())) {
            parent.children.push(id);
        }
        self.nodes.push(node);
        Some(id)
    }

    /// Add a node under an existing parent.
    ///
    /// Adding a node whose parent already has a child with the same
    /// sub-identifier returns that child when the labels agree.
    pub fn add_node(&mut self, node: MibNode) -> Result<NodeId> {
        let Some(parent) = node.parent else {
            return Err(Error::Config(format!("{} has no parent", node.label).into()).boxed());
        };
        if self.get_node(parent).is_none() {
            return Err(Error::Config(format!("unknown parent for {}", node.label).into()).boxed());
        }
        if let Some(existing) = self.child(parent, node.subid) {
            if self.get_node(existing).is_some_and(|n| n.label == node.label) {
                return Ok(existing);
            }
            return Err(Error::Config(
                format!("{} collides with an existing sub-identifier {}", node.label, node.subid)
                    .into(),
            )
            .boxed());
        }
        self.push(node)
            .ok_or_else(|| Error::Config("naming tree is full".into()).boxed())
    }

    /// Define a grouping node, `label ::= { parent subid }`.
    pub fn define(&mut self, module: &str, label: &str, parent: &str, subid: u32) -> Result<NodeId> {
        let parent_id = self.find_leaf_by_name(parent).ok_or_else(|| {
            Error::Config(format!("parent {} of {} is not defined", parent, label).into()).boxed()
        })?;
        let mut node = MibNode::new(label, subid, Some(parent_id));
        node.module = Some(module.to_string());
        let id = self.add_node(node)?;
        tracing::trace!(target: "snmpq::mib", { snmp.module = module, snmp.label = label }, "defined node");
        Ok(id)
    }

    /// Define an object with a syntax.
    pub fn define_object(
        &mut self,
        module: &str,
        label: &str,
        parent: &str,
        subid: u32,
        syntax: TypeTag,
    ) -> Result<NodeId> {
        let id = self.define(module, label, parent, subid)?;
        if let Some(node) = self.get_node_mut(id) {
            node.syntax = Some(syntax);
        }
        Ok(id)
    }

    /// Attach named numbers to an enumerated object.
    pub fn set_enums(&mut self, id: NodeId, enums: &[(i32, &str)]) {
        if let Some(node) = self.get_node_mut(id) {
            node.enums = enums.iter().map(|(v, l)| (*v, l.to_string())).collect();
        }
    }

    #[must_use]
    pub fn get_node(&self, id: NodeId) -> Option<&MibNode> {
        self.nodes.get(id.to_index())
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut MibNode> {
        self.nodes.get_mut(id.to_index())
    }

    /// All nodes with a given label.
    pub fn nodes_by_name(&self, name: &str) -> &[NodeId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Node by module-qualified name.
    #[must_use]
    pub fn node_by_qualified_name(&self, module: &str, name: &str) -> Option<NodeId> {
        self.nodes_by_name(name).iter().copied().find(|id| {
            self.get_node(*id)
                .and_then(|n| n.module.as_deref())
                .is_some_and(|m| m == module)
        })
    }

    /// Child of `id` with the given sub-identifier.
    #[must_use]
    pub fn child(&self, id: NodeId, subid: u32) -> Option<NodeId> {
        self.get_node(id)?
            .children
            .iter()
            .copied()
            .find(|c| self.get_node(*c).is_some_and(|n| n.subid == subid))
    }

    /// Child of `id` with the given label.
    #[must_use]
    pub fn child_by_label(&self, id: NodeId, label: &str) -> Option<NodeId> {
        self.get_node(id)?
            .children
            .iter()
            .copied()
            .find(|c| self.get_node(*c).is_some_and(|n| n.label == label))
    }

    fn root(&self, component: &str) -> Option<NodeId> {
        let by_number = component.parse::<u32>().ok();
        self.roots.iter().copied().find(|r| {
            self.get_node(*r).is_some_and(|n| match by_number {
                Some(subid) => n.subid == subid,
                None => n.label == component,
            })
        })
    }

    /// Walk the subtree under `start` in pre-order.
    /// Returns false if the visitor stopped the walk.
    pub fn walk<F>(&self, start: NodeId, visitor: &mut F) -> bool
    where
        F: FnMut(NodeId, &MibNode) -> bool,
    {
        let Some(node) = self.get_node(start) else {
            return true;
        };
        if !visitor(start, node) {
            return false;
        }
        for child in &node.children {
            if !self.walk(*child, visitor) {
                return false;
            }
        }
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Split trailing all-digit components off a search token.
fn split_instance(token: &str) -> Option<(&str, Vec<u32>)> {
    let mut rest = token;
    let mut arcs = Vec::new();
    while let Some((head, tail)) = rest.rsplit_once('.') {
        if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
            break;
        }
        arcs.push(tail.parse().ok()?);
        rest = head;
    }
    arcs.reverse();
    Some((rest, arcs))
}

fn with_instance(base: Oid, instance: &[u32]) -> Option<Oid> {
    let mut oid = base;
    oid.extend_from_slice(instance);
    (oid.len() <= MAX_OID_LEN).then_some(oid)
}

impl NamingTree for MibTree {
    fn node(&self, id: NodeId) -> Option<&MibNode> {
        self.get_node(id)
    }

    fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn find_leaf_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes_by_name(name).first().copied()
    }

    fn node_by_oid(&self, arcs: &[u32]) -> Option<(NodeId, usize)> {
        let (first, rest) = arcs.split_first()?;
        let mut current = self
            .roots
            .iter()
            .copied()
            .find(|r| self.get_node(*r).is_some_and(|n| n.subid == *first))?;
        let mut depth = 1;
        for arc in rest {
            match self.child(current, *arc) {
                Some(next) => {
                    current = next;
                    depth += 1;
                }
                None => break,
            }
        }
        Some((current, depth))
    }

    fn parse_full_name(&self, name: &str) -> Option<Oid> {
        let (module, rest) = match name.split_once("::") {
            Some((module, rest)) if !module.is_empty() => (Some(module), rest),
            Some(_) => return None,
            None => (None, name),
        };
        let absolute = rest.starts_with('.');
        let mut parts = rest.split('.').filter(|p| !p.is_empty());
        let first = parts.next()?;

        let mut cursor = match module {
            Some(module) => Some(self.node_by_qualified_name(module, first)?),
            None if absolute || first.bytes().all(|b| b.is_ascii_digit()) => self.root(first),
            None => Some(self.find_leaf_by_name(first)?),
        };
        let mut arcs: Vec<u32> = match cursor {
            Some(id) => self.oid_of(id).arcs().to_vec(),
            None => vec![first.parse().ok()?],
        };

        for part in parts {
            if part.bytes().all(|b| b.is_ascii_digit()) {
                let arc: u32 = part.parse().ok()?;
                arcs.push(arc);
                cursor = cursor.and_then(|c| self.child(c, arc));
            } else {
                let child = self.child_by_label(cursor?, part)?;
                arcs.push(self.get_node(child)?.subid);
                cursor = Some(child);
            }
        }

        (arcs.len() <= MAX_OID_LEN).then(|| Oid::new(arcs))
    }

    fn fuzzy_find(&self, token: &str, scope: FuzzyScope, visited: &mut Visited) -> Option<Oid> {
        let (module, token) = match token.split_once("::") {
            Some((module, rest)) => (Some(module), rest),
            None => (None, token),
        };
        let (label, instance) = split_instance(token)?;
        if label.is_empty() {
            return None;
        }
        let in_scope = |node: &MibNode| match scope {
            FuzzyScope::Leaf => node.syntax.is_some(),
            FuzzyScope::Any => true,
        };
        let in_module = |node: &MibNode| match module {
            Some(m) => node.module.as_deref() == Some(m),
            None => true,
        };

        let exact = self.nodes_by_name(label).iter().copied().find(|id| {
            self.get_node(*id)
                .is_some_and(|n| in_scope(n) && in_module(n))
        });
        if let Some(id) = exact {
            return with_instance(self.oid_of(id), &instance);
        }

        let pattern = Pattern::new(label);
        let mut found = None;
        for root in &self.roots {
            self.walk(*root, &mut |id, node| {
                if !visited.insert(id) {
                    return true;
                }
                if in_scope(node) && in_module(node) && pattern.is_match(&node.label) {
                    found = Some(id);
                    return false;
                }
                true
            });
            if found.is_some() {
                break;
            }
        }

        let id = found?;
        let matched = &self.get_node(id)?.label;
        tracing::debug!(target: "snmpq::mib", { snmp.pattern = label, snmp.label = %matched }, "fuzzy match");
        with_instance(self.oid_of(id), &instance)
    }
}
