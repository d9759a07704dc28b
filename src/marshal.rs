//! Varbind marshalling for SET requests.
//!
//! [`build`] turns caller text into a typed [`VarBind`]. It never aborts: when
//! the text is missing or unusable it still produces a placeholder varbind
//! (zero, empty string, `0.0.0.0`, empty OID or NULL) and reports a
//! [`MarshalFailure`] alongside it, leaving the decision to the caller.

use bytes::Bytes;

use crate::mib::NamingTree;
use crate::oid::Oid;
use crate::types::TypeTag;
use crate::value::Value;
use crate::varbind::VarBind;

/// Why a varbind carries a placeholder value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MarshalFailure {
    #[error("no value supplied")]
    MissingValue,
    #[error("value could not be parsed")]
    InvalidValue,
    #[error("type {0} cannot be set")]
    UnsupportedType(TypeTag),
}

/// A built varbind and, if any, why its value is a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Marshalled {
    pub varbind: VarBind,
    pub failure: Option<MarshalFailure>,
}

impl Marshalled {
    fn ok(oid: Oid, value: Value) -> Self {
        Self {
            varbind: VarBind::new(oid, value),
            failure: None,
        }
    }

    fn partial(oid: Oid, value: Value, failure: MarshalFailure) -> Self {
        tracing::warn!(target: "snmpq::marshal", { snmp.oid = %oid, error = %failure }, "placeholder value");
        Self {
            varbind: VarBind::new(oid, value),
            failure: Some(failure),
        }
    }

    /// True when the value came from the caller's text.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Build a varbind for `oid` of type `type_tag` from `text`.
///
/// ```
/// use snmpq::marshal::{build, MarshalFailure};
/// use snmpq::mib::MibTree;
/// use snmpq::{TypeTag, Value, oid};
///
/// let tree = MibTree::standard();
/// let oid = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 1);
///
/// let m = build(&tree, oid.clone(), TypeTag::Integer, "0x2");
/// assert_eq!(m.varbind.value, Value::Integer(2));
/// assert!(m.is_complete());
///
/// let m = build(&tree, oid, TypeTag::OctetStr, "");
/// assert_eq!(m.failure, Some(MarshalFailure::MissingValue));
/// ```
pub fn build(tree: &dyn NamingTree, oid: Oid, type_tag: TypeTag, text: &str) -> Marshalled {
    use MarshalFailure::*;

    match type_tag {
        TypeTag::Integer | TypeTag::Integer32 => {
            if text.is_empty() {
                return Marshalled::partial(oid, Value::Integer(0), MissingValue);
            }
            match parse_signed(text) {
                Some(v) => Marshalled::ok(oid, Value::Integer(v)),
                None => Marshalled::partial(oid, Value::Integer(0), InvalidValue),
            }
        }
        TypeTag::Gauge
        | TypeTag::Unsigned32
        | TypeTag::Counter
        | TypeTag::TimeTicks
        | TypeTag::UInteger => {
            let wrap = |v: u32| match type_tag {
                TypeTag::Counter => Value::Counter32(v),
                TypeTag::TimeTicks => Value::TimeTicks(v),
                TypeTag::UInteger => Value::UInteger(v),
                _ => Value::Gauge32(v),
            };
            if text.is_empty() {
                return Marshalled::partial(oid, wrap(0), MissingValue);
            }
            match parse_unsigned(text) {
                Some(v) => Marshalled::ok(oid, wrap(v)),
                None => Marshalled::partial(oid, wrap(0), InvalidValue),
            }
        }
        // BITS and Opaque travel as OCTET STRING
        TypeTag::OctetStr | TypeTag::BitString | TypeTag::Opaque => {
            if text.is_empty() {
                return Marshalled::partial(oid, Value::OctetString(Bytes::new()), MissingValue);
            }
            Marshalled::ok(oid, Value::OctetString(Bytes::copy_from_slice(text.as_bytes())))
        }
        TypeTag::IpAddr => {
            if text.is_empty() {
                return Marshalled::partial(oid, Value::IpAddress([0; 4]), MissingValue);
            }
            match text.trim().parse::<std::net::Ipv4Addr>() {
                Ok(addr) => Marshalled::ok(oid, Value::IpAddress(addr.octets())),
                Err(_) => Marshalled::partial(oid, Value::IpAddress([0; 4]), InvalidValue),
            }
        }
        TypeTag::ObjectId => {
            let empty = Value::ObjectIdentifier(Oid::empty());
            if text.is_empty() {
                return Marshalled::partial(oid, empty, MissingValue);
            }
            let parsed = Oid::scan_numeric(text)
                .filter(|o| !o.is_empty())
                .or_else(|| tree.parse_full_name(text));
            match parsed {
                Some(target) => Marshalled::ok(oid, Value::ObjectIdentifier(target)),
                None => Marshalled::partial(oid, empty, InvalidValue),
            }
        }
        TypeTag::Null => Marshalled::ok(oid, Value::Null),
        other => Marshalled::partial(oid, Value::Null, UnsupportedType(other)),
    }
}

/// Parse like C `strtol(text, NULL, 0)`: leading whitespace, optional sign,
/// `0x` hex or leading-zero octal, trailing junk ignored. Saturates to `i32`.
/// Returns `None` when no digit is consumed.
pub fn parse_signed(text: &str) -> Option<i32> {
    let s = text.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
        && rest.bytes().next().is_some_and(|b| b.is_ascii_hexdigit())
    {
        (16, rest)
    } else if s.starts_with('0') {
        (8, s)
    } else {
        (10, s)
    };

    let magnitude = accumulate(digits, radix)?;
    let value = if negative { -magnitude } else { magnitude };
    Some(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Parse an unsigned decimal, like `sscanf("%lu")` but rejecting a sign.
/// Saturates to `u32`.
pub fn parse_unsigned(text: &str) -> Option<u32> {
    let s = text.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let value = accumulate(s, 10)?;
    Some(value.min(u32::MAX as i64) as u32)
}

fn accumulate(digits: &str, radix: u32) -> Option<i64> {
    let mut value: i64 = 0;
    let mut any = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        any = true;
        value = value.saturating_mul(radix as i64).saturating_add(d as i64);
    }
    any.then_some(value)
}
