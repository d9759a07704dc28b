//! Unified type tags.
//!
//! [`TypeTag`] is the single type vocabulary shared by the resolver, the
//! formatter and the marshaller. It is reached from three directions:
//!
//! - wire tags carried by decoded values ([`TypeTag::from_wire_tag`])
//! - textual type specifiers supplied by callers ([`TypeTag::parse_spec`])
//! - MIB syntax declarations attached to tree nodes
//!
//! and rendered back with [`TypeTag::display_name`].

use crate::value::{Value, tag};

/// Unified type of a value or a MIB object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum TypeTag {
    /// A wire tag outside the known set.
    Other,
    ObjectId,
    OctetStr,
    Integer,
    Integer32,
    Unsigned32,
    NetAddr,
    IpAddr,
    Counter,
    Gauge,
    TimeTicks,
    Opaque,
    Null,
    Counter64,
    BitString,
    NsapAddress,
    /// Historic SMIv1 UInteger32.
    UInteger,
    Notification,
    Trap,
    EndOfMibView,
    NoSuchObject,
    NoSuchInstance,
    /// Unrecognized textual specifier.
    Unknown,
}

/// Multi-character specifiers, most specific first, with the number of
/// leading characters that must match.
const SPEC_PREFIXES: &[(&str, usize, TypeTag)] = &[
    ("INTEGER32", 8, TypeTag::Integer32),
    ("INTEGER", 3, TypeTag::Integer),
    ("UNSIGNED32", 3, TypeTag::Unsigned32),
    ("GAUGE", 3, TypeTag::Gauge),
    ("IPADDR", 3, TypeTag::IpAddr),
    ("OCTETSTR", 3, TypeTag::OctetStr),
    ("TICKS", 3, TypeTag::TimeTicks),
    ("OPAQUE", 3, TypeTag::Opaque),
    ("OBJECTID", 3, TypeTag::ObjectId),
    ("NETADDR", 3, TypeTag::NetAddr),
    ("COUNTER64", 3, TypeTag::Counter64),
    ("NULL", 3, TypeTag::Null),
    ("BITS", 3, TypeTag::BitString),
    ("ENDOFMIBVIEW", 3, TypeTag::EndOfMibView),
    ("NOSUCHOBJECT", 7, TypeTag::NoSuchObject),
    ("NOSUCHINSTANCE", 7, TypeTag::NoSuchInstance),
    ("UINTEGER", 3, TypeTag::UInteger),
    ("NOTIF", 3, TypeTag::Notification),
    ("TRAP", 4, TypeTag::Trap),
];

fn prefix_matches(input: &str, name: &str, n: usize) -> bool {
    input.len() >= n && input.as_bytes()[..n].eq_ignore_ascii_case(&name.as_bytes()[..n])
}

impl TypeTag {
    /// Parse a caller-supplied type specifier.
    ///
    /// Single letters use the fixed table `i u s n o t a b`. Longer input is
    /// matched case-insensitively against the long names. Anything else is
    /// [`TypeTag::Unknown`]; this never fails.
    ///
    /// ```
    /// use snmpq::TypeTag;
    ///
    /// assert_eq!(TypeTag::parse_spec("i"), TypeTag::Integer);
    /// assert_eq!(TypeTag::parse_spec("Integer32"), TypeTag::Integer32);
    /// assert_eq!(TypeTag::parse_spec("integer"), TypeTag::Integer);
    /// assert_eq!(TypeTag::parse_spec("octetstring"), TypeTag::OctetStr);
    /// assert_eq!(TypeTag::parse_spec("z"), TypeTag::Unknown);
    /// ```
    pub fn parse_spec(spec: &str) -> TypeTag {
        let spec = spec.trim();
        if spec.len() == 1 {
            return match spec.as_bytes()[0] {
                b'i' => TypeTag::Integer,
                b'u' => TypeTag::Unsigned32,
                b's' => TypeTag::OctetStr,
                b'n' => TypeTag::Null,
                b'o' => TypeTag::ObjectId,
                b't' => TypeTag::TimeTicks,
                b'a' => TypeTag::IpAddr,
                b'b' => TypeTag::BitString,
                _ => TypeTag::Unknown,
            };
        }

        // "COUNTER" must match exactly, otherwise it would shadow COUNTER64.
        if spec.eq_ignore_ascii_case("COUNTER") {
            return TypeTag::Counter;
        }

        SPEC_PREFIXES
            .iter()
            .find(|(name, n, _)| prefix_matches(spec, name, *n))
            .map(|(_, _, tag)| *tag)
            .unwrap_or(TypeTag::Unknown)
    }

    /// Map a wire tag to its type.
    ///
    /// The three exception codes map to their own tags. Unknown wire tags map
    /// to [`TypeTag::Other`] and are logged.
    pub fn from_wire_tag(wire: u8) -> TypeTag {
        match wire {
            tag::INTEGER => TypeTag::Integer,
            tag::OCTET_STRING => TypeTag::OctetStr,
            tag::OPAQUE => TypeTag::Opaque,
            tag::OBJECT_IDENTIFIER => TypeTag::ObjectId,
            tag::TIMETICKS => TypeTag::TimeTicks,
            tag::GAUGE32 => TypeTag::Gauge,
            tag::COUNTER32 => TypeTag::Counter,
            tag::IP_ADDRESS => TypeTag::IpAddr,
            tag::BIT_STRING => TypeTag::BitString,
            tag::NULL => TypeTag::Null,
            tag::UINTEGER32 => TypeTag::UInteger,
            tag::COUNTER64 => TypeTag::Counter64,
            tag::END_OF_MIB_VIEW => TypeTag::EndOfMibView,
            tag::NO_SUCH_OBJECT => TypeTag::NoSuchObject,
            tag::NO_SUCH_INSTANCE => TypeTag::NoSuchInstance,
            other => {
                tracing::warn!(target: "snmpq::types", { snmp.wire_tag = other }, "unrecognized wire type");
                TypeTag::Other
            }
        }
    }

    /// Type of a decoded value.
    pub fn of_value(value: &Value) -> TypeTag {
        TypeTag::from_wire_tag(value.wire_tag())
    }

    /// Canonical display name, or `None` for tags without one
    /// (legacy UInteger, NSAP address, `Other`, `Unknown`).
    ///
    /// ```
    /// use snmpq::TypeTag;
    ///
    /// assert_eq!(TypeTag::OctetStr.display_name(), Some("OCTETSTR"));
    /// assert_eq!(TypeTag::TimeTicks.display_name(), Some("TICKS"));
    /// assert_eq!(TypeTag::UInteger.display_name(), None);
    /// ```
    pub fn display_name(self) -> Option<&'static str> {
        let name = match self {
            TypeTag::ObjectId => "OBJECTID",
            TypeTag::OctetStr => "OCTETSTR",
            TypeTag::Integer => "INTEGER",
            TypeTag::Integer32 => "INTEGER32",
            TypeTag::Unsigned32 => "UNSIGNED32",
            TypeTag::NetAddr => "NETADDR",
            TypeTag::IpAddr => "IPADDR",
            TypeTag::Counter => "COUNTER",
            TypeTag::Gauge => "GAUGE",
            TypeTag::TimeTicks => "TICKS",
            TypeTag::Opaque => "OPAQUE",
            TypeTag::Counter64 => "COUNTER64",
            TypeTag::Null => "NULL",
            TypeTag::EndOfMibView => "ENDOFMIBVIEW",
            TypeTag::NoSuchObject => "NOSUCHOBJECT",
            TypeTag::NoSuchInstance => "NOSUCHINSTANCE",
            TypeTag::Notification => "NOTIF",
            TypeTag::BitString => "BITS",
            TypeTag::Trap => "TRAP",
            TypeTag::UInteger | TypeTag::NsapAddress | TypeTag::Other | TypeTag::Unknown => {
                return None;
            }
        };
        Some(name)
    }

    /// Display name, or an empty string with a warning when there is none.
    pub fn display_name_or_empty(self) -> &'static str {
        self.display_name().unwrap_or_else(|| {
            tracing::warn!(target: "snmpq::types", { snmp.type_tag = ?self }, "no display name for type");
            ""
        })
    }

    /// True for the three "value absent" exception tags.
    pub fn is_exception(self) -> bool {
        matches!(
            self,
            TypeTag::EndOfMibView | TypeTag::NoSuchObject | TypeTag::NoSuchInstance
        )
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.display_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[TypeTag] = &[
        TypeTag::Other,
        TypeTag::ObjectId,
        TypeTag::OctetStr,
        TypeTag::Integer,
        TypeTag::Integer32,
        TypeTag::Unsigned32,
        TypeTag::NetAddr,
        TypeTag::IpAddr,
        TypeTag::Counter,
        TypeTag::Gauge,
        TypeTag::TimeTicks,
        TypeTag::Opaque,
        TypeTag::Null,
        TypeTag::Counter64,
        TypeTag::BitString,
        TypeTag::NsapAddress,
        TypeTag::UInteger,
        TypeTag::Notification,
        TypeTag::Trap,
        TypeTag::EndOfMibView,
        TypeTag::NoSuchObject,
        TypeTag::NoSuchInstance,
        TypeTag::Unknown,
    ];

    #[test]
    fn display_name_parses_back() {
        for tag in ALL {
            if let Some(name) = tag.display_name() {
                assert_eq!(TypeTag::parse_spec(name), *tag, "{}", name);
                assert_eq!(TypeTag::parse_spec(&name.to_lowercase()), *tag, "{}", name);
            }
        }
    }

    #[test]
    fn single_letter_table() {
        let expected = [
            ("i", TypeTag::Integer),
            ("u", TypeTag::Unsigned32),
            ("s", TypeTag::OctetStr),
            ("n", TypeTag::Null),
            ("o", TypeTag::ObjectId),
            ("t", TypeTag::TimeTicks),
            ("a", TypeTag::IpAddr),
            ("b", TypeTag::BitString),
            ("x", TypeTag::Unknown),
            ("I", TypeTag::Unknown),
        ];
        for (spec, tag) in expected {
            assert_eq!(TypeTag::parse_spec(spec), tag, "{}", spec);
        }
    }

    #[test]
    fn prefix_matching() {
        assert_eq!(TypeTag::parse_spec("int"), TypeTag::Integer);
        assert_eq!(TypeTag::parse_spec("INTEGER3"), TypeTag::Integer);
        assert_eq!(TypeTag::parse_spec("gauge32"), TypeTag::Gauge);
        assert_eq!(TypeTag::parse_spec("Counter"), TypeTag::Counter);
        assert_eq!(TypeTag::parse_spec("Counter64"), TypeTag::Counter64);
        assert_eq!(TypeTag::parse_spec("noSuchInst"), TypeTag::NoSuchInstance);
        assert_eq!(TypeTag::parse_spec("nosuch"), TypeTag::Unknown);
        assert_eq!(TypeTag::parse_spec("TRA"), TypeTag::Unknown);
        assert_eq!(TypeTag::parse_spec(""), TypeTag::Unknown);
        assert_eq!(TypeTag::parse_spec("garbage"), TypeTag::Unknown);
    }

    #[test]
    fn wire_tags_map_one_to_one() {
        assert_eq!(TypeTag::from_wire_tag(tag::INTEGER), TypeTag::Integer);
        assert_eq!(TypeTag::from_wire_tag(tag::OCTET_STRING), TypeTag::OctetStr);
        assert_eq!(TypeTag::from_wire_tag(tag::GAUGE32), TypeTag::Gauge);
        assert_eq!(TypeTag::from_wire_tag(tag::UINTEGER32), TypeTag::UInteger);
        assert_eq!(TypeTag::from_wire_tag(tag::COUNTER64), TypeTag::Counter64);
        assert_eq!(TypeTag::from_wire_tag(tag::BIT_STRING), TypeTag::BitString);
    }

    #[test]
    fn exceptions_pass_through() {
        assert_eq!(
            TypeTag::from_wire_tag(tag::END_OF_MIB_VIEW),
            TypeTag::EndOfMibView
        );
        assert_eq!(
            TypeTag::from_wire_tag(tag::NO_SUCH_OBJECT),
            TypeTag::NoSuchObject
        );
        assert_eq!(
            TypeTag::from_wire_tag(tag::NO_SUCH_INSTANCE),
            TypeTag::NoSuchInstance
        );
        assert!(TypeTag::NoSuchObject.is_exception());
        assert!(!TypeTag::Null.is_exception());
    }

    #[test]
    fn unknown_wire_tag_is_other() {
        assert_eq!(TypeTag::from_wire_tag(0x99), TypeTag::Other);
        assert_eq!(TypeTag::from_wire_tag(tag::NSAP_ADDRESS), TypeTag::Other);
    }

    #[test]
    fn of_value() {
        assert_eq!(TypeTag::of_value(&Value::TimeTicks(5)), TypeTag::TimeTicks);
        assert_eq!(TypeTag::of_value(&Value::EndOfMibView), TypeTag::EndOfMibView);
    }

    #[test]
    fn missing_display_names() {
        assert_eq!(TypeTag::NsapAddress.display_name(), None);
        assert_eq!(TypeTag::Other.display_name_or_empty(), "");
        assert_eq!(TypeTag::Counter64.to_string(), "COUNTER64");
        assert_eq!(TypeTag::UInteger.to_string(), "UInteger");
    }
}
