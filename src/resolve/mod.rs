//! OID resolution.
//!
//! Forward: a symbolic tag plus an optional instance suffix becomes a numeric
//! [`Oid`]. Reverse: a returned [`Oid`] becomes a label and instance string in
//! the configured [`NameStyle`].
//!
//! # Resolution modes
//!
//! The aggressiveness level ([`BestGuess`]) picks the strategies tried for a
//! tag, in order:
//!
//! | Level | Tag shape | Attempts |
//! |---|---|---|
//! | `Exact` (0) | contains `.` or `:` | `Literal`, then `FullParse` |
//! | `Exact` (0) | bare name | `LeafLookup` |
//! | `Regex` (1) | any | `Literal`, then `FuzzyLeaf` |
//! | `RandomAccess` (2) | any | `Literal`, then `FuzzyAny` |
//!
//! ```
//! use snmpq::mib::MibTree;
//! use snmpq::resolve::{BestGuess, Resolver};
//! use snmpq::{TypeTag, oid};
//!
//! let tree = MibTree::standard();
//! let resolver = Resolver::new(&tree);
//!
//! let r = resolver.resolve("sysDescr", "0", BestGuess::Exact).unwrap();
//! assert_eq!(r.oid, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
//! assert_eq!(r.syntax, Some(TypeTag::OctetStr));
//!
//! assert!(resolver.resolve("sysDescr", "zero", BestGuess::Exact).is_err());
//! ```

use std::fmt::Write as _;

use crate::error::{Error, ResolveErrorKind, Result};
use crate::mib::{FuzzyScope, NamingTree, Visited};
use crate::oid::{MAX_OID_LEN, Oid};
use crate::types::TypeTag;

/// How a tag is looked up in the naming tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Already numeric.
    Literal,
    /// Single symbolic name, exact match.
    LeafLookup,
    /// Dotted or module-qualified name.
    FullParse,
    /// Pattern match against leaf labels.
    FuzzyLeaf,
    /// Pattern match against any label.
    FuzzyAny,
}

/// Resolution aggressiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BestGuess {
    /// Level 0: exact names only.
    #[default]
    Exact,
    /// Level 1: pattern match against leaves.
    Regex,
    /// Level 2: match any node.
    RandomAccess,
}

impl BestGuess {
    /// Level from its numeric form.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Exact),
            1 => Some(Self::Regex),
            2 => Some(Self::RandomAccess),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::Regex => 1,
            Self::RandomAccess => 2,
        }
    }

    /// Strategies to try for `tag`, in order.
    ///
    /// ```
    /// use snmpq::resolve::{BestGuess, ResolutionMode};
    ///
    /// assert_eq!(BestGuess::Exact.modes("sysDescr"), &[ResolutionMode::LeafLookup]);
    /// assert_eq!(
    ///     BestGuess::Exact.modes("IF-MIB::ifDescr"),
    ///     &[ResolutionMode::Literal, ResolutionMode::FullParse]
    /// );
    /// ```
    pub fn modes(self, tag: &str) -> &'static [ResolutionMode] {
        use ResolutionMode::*;
        match self {
            Self::Exact if tag.contains(['.', ':']) => &[Literal, FullParse],
            Self::Exact => &[LeafLookup],
            Self::Regex => &[Literal, FuzzyLeaf],
            Self::RandomAccess => &[Literal, FuzzyAny],
        }
    }
}

/// How returned names are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// Last label plus instance, `sysDescr.0`.
    #[default]
    Suffix,
    /// Every label from the root, `.iso.org.dod...sysDescr.0`.
    Full,
    /// Numbers only, `.1.3.6.1.2.1.1.1.0`.
    Numeric,
}

/// A resolved tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Full path, instance included.
    pub oid: Oid,
    /// Declared syntax of the deepest matching tree node.
    pub syntax: Option<TypeTag>,
    /// Strategy that produced the path.
    pub mode: ResolutionMode,
}

/// A returned name split into label and instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Label {
    pub label: String,
    pub iid: String,
}

/// Parse an instance suffix into arcs.
///
/// A leading `.` is stripped. Alphabetic characters, or any component that
/// is not an unsigned 32-bit number, reject the whole instance.
///
/// ```
/// use snmpq::resolve::parse_instance;
///
/// assert_eq!(parse_instance(".1.2").unwrap(), vec![1, 2]);
/// assert!(parse_instance("").unwrap().is_empty());
/// assert!(parse_instance("1.a").is_err());
/// ```
pub fn parse_instance(instance: &str) -> std::result::Result<Vec<u32>, ResolveErrorKind> {
    let instance = instance.strip_prefix('.').unwrap_or(instance);
    if instance.bytes().any(|b| b.is_ascii_alphabetic()) {
        return Err(ResolveErrorKind::InvalidInstance);
    }
    instance
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| ResolveErrorKind::InvalidInstance)
        })
        .collect()
}

/// Tag resolver over a naming tree.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    tree: &'a dyn NamingTree,
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a dyn NamingTree) -> Self {
        Self { tree }
    }

    /// Resolve `tag` plus `instance` at the given aggressiveness level.
    pub fn resolve(&self, tag: &str, instance: &str, best_guess: BestGuess) -> Result<Resolved> {
        self.resolve_in(tag, instance, best_guess.modes(tag))
    }

    /// Resolve with a single, explicit strategy.
    pub fn resolve_with(&self, tag: &str, instance: &str, mode: ResolutionMode) -> Result<Resolved> {
        self.resolve_in(tag, instance, &[mode])
    }

    fn resolve_in(&self, tag: &str, instance: &str, modes: &[ResolutionMode]) -> Result<Resolved> {
        if tag.is_empty() {
            return Err(Error::unknown_object(tag, ResolveErrorKind::EmptyTag));
        }
        let instance = parse_instance(instance).map_err(|kind| Error::unknown_object(tag, kind))?;

        let (mut oid, mode) = modes
            .iter()
            .find_map(|mode| self.lookup(tag, *mode).map(|oid| (oid, *mode)))
            .ok_or_else(|| Error::unknown_object(tag, ResolveErrorKind::NotFound))?;

        oid.extend_from_slice(&instance);
        if oid.len() > MAX_OID_LEN {
            return Err(Error::unknown_object(tag, ResolveErrorKind::TooLong));
        }

        let syntax = self.tree.syntax_of(&oid);
        tracing::trace!(target: "snmpq::resolve", { snmp.tag = tag, snmp.oid = %oid, snmp.mode = ?mode }, "resolved");
        Ok(Resolved { oid, syntax, mode })
    }

    fn lookup(&self, tag: &str, mode: ResolutionMode) -> Option<Oid> {
        match mode {
            ResolutionMode::Literal => Oid::scan_numeric(tag).filter(|oid| !oid.is_empty()),
            ResolutionMode::LeafLookup => {
                let id = self.tree.find_leaf_by_name(tag)?;
                Some(self.tree.oid_of(id))
            }
            ResolutionMode::FullParse => self.tree.parse_full_name(tag),
            ResolutionMode::FuzzyLeaf => {
                let mut visited = Visited::new();
                self.tree.fuzzy_find(tag, FuzzyScope::Leaf, &mut visited)
            }
            ResolutionMode::FuzzyAny => {
                let mut visited = Visited::new();
                self.tree.fuzzy_find(tag, FuzzyScope::Any, &mut visited)
            }
        }
    }

    /// Render a returned name.
    ///
    /// Arcs past the deepest known node are appended numerically. Names the
    /// tree knows nothing about fall back to the numeric form.
    pub fn render(&self, oid: &Oid, style: NameStyle) -> String {
        let found = match style {
            NameStyle::Numeric => None,
            _ => self.tree.node_by_oid(oid.arcs()),
        };
        let Some((id, depth)) = found else {
            return oid.dotted().to_string();
        };

        let mut out = String::new();
        match style {
            NameStyle::Full => {
                let mut labels = Vec::new();
                let mut current = Some(id);
                while let Some(node) = current.and_then(|id| self.tree.node(id)) {
                    labels.push(node.label.as_str());
                    current = node.parent;
                }
                for label in labels.iter().rev() {
                    out.push('.');
                    out.push_str(label);
                }
            }
            _ => {
                if let Some(node) = self.tree.node(id) {
                    out.push_str(&node.label);
                }
            }
        }
        for arc in &oid.arcs()[depth..] {
            let _ = write!(out, ".{}", arc);
        }
        out
    }

    /// Whether the deepest node along `oid` is a leaf.
    pub fn is_leaf(&self, oid: &Oid) -> bool {
        self.tree
            .node_by_oid(oid.arcs())
            .is_some_and(|(id, _)| self.tree.is_leaf(id))
    }

    /// Render `oid` and split it into label and instance.
    ///
    /// ```
    /// use snmpq::mib::MibTree;
    /// use snmpq::resolve::{NameStyle, Resolver};
    /// use snmpq::oid;
    ///
    /// let tree = MibTree::standard();
    /// let resolver = Resolver::new(&tree);
    /// let oid = oid!(1, 3, 6, 1, 2, 1, 4, 20, 1, 1, 10, 0, 0, 1);
    ///
    /// let l = resolver.label(&oid, NameStyle::Suffix);
    /// assert_eq!((l.label.as_str(), l.iid.as_str()), ("ipAdEntAddr", "10.0.0.1"));
    ///
    /// let l = resolver.label(&oid, NameStyle::Numeric);
    /// assert_eq!(l.label, ".1.3.6.1.2.1.4.20.1.1.10.0.0");
    /// assert_eq!(l.iid, "1");
    /// ```
    pub fn label(&self, oid: &Oid, style: NameStyle) -> Label {
        let name = self.render(oid, style);
        let split = match style {
            NameStyle::Numeric => split_numeric(&name),
            _ if !self.is_leaf(oid) => Some(Label {
                label: substitute_root_alias(&name),
                iid: String::new(),
            }),
            _ => split_after_label(&name),
        };
        split.unwrap_or_else(|| {
            tracing::debug!(target: "snmpq::resolve", { snmp.name = %name }, "name has no label/instance boundary");
            Label {
                label: name,
                iid: String::new(),
            }
        })
    }
}

/// Split a numeric name at its last separator.
fn split_numeric(name: &str) -> Option<Label> {
    let (label, iid) = name.rsplit_once('.')?;
    if label.is_empty() {
        return None;
    }
    Some(Label {
        label: label.to_string(),
        iid: iid.to_string(),
    })
}

/// Split after the last component containing a letter.
fn split_after_label(name: &str) -> Option<Label> {
    let last_alpha = name.rfind(|c: char| c.is_ascii_alphabetic())?;
    let (label, iid) = match name[last_alpha..].find('.') {
        Some(dot) => (&name[..last_alpha + dot], &name[last_alpha + dot + 1..]),
        None => (name, ""),
    };
    Some(Label {
        label: label.to_string(),
        iid: iid.to_string(),
    })
}

/// Rewrite a leading root label to its number when it is the only label in
/// the name, so that `.iso.3.6.1` renders as `.1.3.6.1`.
fn substitute_root_alias(name: &str) -> String {
    const ALIASES: [(&str, &str); 3] = [
        (".ccitt.", ".0."),
        (".iso.", ".1."),
        (".joint-iso-ccitt.", ".2."),
    ];
    for (alias, number) in ALIASES {
        if let Some(rest) = name.strip_prefix(alias)
            && !rest.bytes().any(|b| b.is_ascii_alphabetic())
        {
            return format!("{}{}", number, rest);
        }
    }
    name.to_string()
}
