//! Result records.

use crate::format::ValueFormatter;
use crate::mib::NamingTree;
use crate::resolve::{NameStyle, Resolver};
use crate::types::TypeTag;
use crate::varbind::VarBind;

/// One returned variable, rendered for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultRecord {
    /// The tag as the caller wrote it.
    pub root_oid: String,
    /// Label of the returned name, `sysDescr` or `.1.3.6.1.2.1.1.1`.
    pub oid: String,
    /// Instance part of the returned name, `0`.
    pub oid_index: String,
    /// Type of the returned value.
    pub snmp_type: TypeTag,
    /// Rendered value.
    pub value: String,
}

impl ResultRecord {
    /// Record standing in for an object the agent says is absent. Carries
    /// the requested tag and the exception type, nothing else.
    pub fn placeholder(root: &str, snmp_type: TypeTag) -> Self {
        Self {
            root_oid: root.to_string(),
            oid: root.to_string(),
            oid_index: String::new(),
            snmp_type,
            value: String::new(),
        }
    }

    /// Display name of [`snmp_type`](Self::snmp_type), e.g. `OCTETSTR`.
    pub fn type_name(&self) -> &'static str {
        self.snmp_type.display_name_or_empty()
    }

    /// True when this record stands in for an absent object.
    pub fn is_placeholder(&self) -> bool {
        self.snmp_type.is_exception()
    }
}

impl std::fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.oid_index.is_empty() {
            write!(f, "{} ({}) = {}", self.oid, self.snmp_type, self.value)
        } else {
            write!(
                f,
                "{}.{} ({}) = {}",
                self.oid, self.oid_index, self.snmp_type, self.value
            )
        }
    }
}

/// Turns returned varbinds into records.
pub(crate) struct RecordBuilder<'a> {
    tree: &'a dyn NamingTree,
    formatter: ValueFormatter,
    style: NameStyle,
}

impl<'a> RecordBuilder<'a> {
    pub(crate) fn new(tree: &'a dyn NamingTree, formatter: ValueFormatter, style: NameStyle) -> Self {
        Self {
            tree,
            formatter,
            style,
        }
    }

    pub(crate) fn record(&self, root: &str, varbind: &VarBind) -> ResultRecord {
        let label = Resolver::new(self.tree).label(&varbind.oid, self.style);
        let node = self
            .tree
            .node_by_oid(varbind.oid.arcs())
            .and_then(|(id, _)| self.tree.node(id));
        let record = ResultRecord {
            root_oid: root.to_string(),
            oid: label.label,
            oid_index: label.iid,
            snmp_type: TypeTag::of_value(&varbind.value),
            value: self.formatter.format(&varbind.value, node),
        };
        tracing::trace!(target: "snmpq::session", { snmp.oid = %varbind.oid, snmp.type_tag = ?record.snmp_type }, "read variable");
        record
    }
}
