//! Value rendering.
//!
//! [`ValueFormatter`] turns a returned [`Value`] into the text stored in a
//! [`ResultRecord`](crate::ResultRecord). Two styles are supported:
//!
//! - plain (default): numbers in decimal, strings as raw bytes, OIDs with a
//!   leading dot, enumeration labels only when `use_enums` is set
//! - sprint (`use_sprint_value`): enumeration labels always, TimeTicks as
//!   `d:hh:mm:ss.cc`, binary strings as spaced uppercase hex
//!
//! Formatting never fails. Unsupported values render as an empty string and
//! oversized strings are truncated, both with a warning.
//!
//! ```
//! use snmpq::format::{FormatOptions, ValueFormatter};
//! use snmpq::Value;
//!
//! let plain = ValueFormatter::new(FormatOptions::default());
//! assert_eq!(plain.format(&Value::TimeTicks(12345), None), "12345");
//!
//! let sprint = ValueFormatter::new(FormatOptions {
//!     use_sprint_value: true,
//!     ..Default::default()
//! });
//! assert_eq!(sprint.format(&Value::TimeTicks(12345), None), "0:0:02:03.45");
//! assert_eq!(sprint.format(&Value::from(&[0x00u8, 0x1a][..]), None), "00 1A");
//! ```

pub mod hex;

use std::fmt;

use crate::mib::MibNode;
use crate::value::Value;

/// Default ceiling for string values.
pub const DEFAULT_MAX_VALUE_SIZE: usize = 65536;

/// Formatter switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Substitute enumeration labels for INTEGER values.
    pub use_enums: bool,
    /// Library-style rich rendering.
    pub use_sprint_value: bool,
    /// Longest string value kept, in bytes.
    pub max_value_size: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            use_enums: false,
            use_sprint_value: false,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
        }
    }
}

/// TimeTicks rendered as `days:hours:minutes:seconds.hundredths`.
///
/// ```
/// use snmpq::format::TimeTicks;
///
/// assert_eq!(TimeTicks(0).to_string(), "0:0:00:00.00");
/// assert_eq!(TimeTicks(9_006_101).to_string(), "1:1:01:01.01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTicks(pub u32);

impl fmt::Display for TimeTicks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let centis = self.0 % 100;
        let secs = self.0 / 100;
        write!(
            f,
            "{}:{}:{:02}:{:02}.{:02}",
            secs / 86400,
            secs % 86400 / 3600,
            secs % 3600 / 60,
            secs % 60,
            centis
        )
    }
}

/// Renders values for result records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueFormatter {
    opts: FormatOptions,
}

impl ValueFormatter {
    pub fn new(opts: FormatOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.opts
    }

    /// Render `value`. `node` is the tree node the value was returned for,
    /// used for enumeration labels.
    pub fn format(&self, value: &Value, node: Option<&MibNode>) -> String {
        if self.opts.use_sprint_value {
            self.sprint(value, node)
        } else {
            self.plain(value, node)
        }
    }

    fn plain(&self, value: &Value, node: Option<&MibNode>) -> String {
        match value {
            Value::Integer(v) => {
                let label = if self.opts.use_enums {
                    node.and_then(|n| n.enum_label(*v))
                } else {
                    None
                };
                label.map_or_else(|| v.to_string(), str::to_string)
            }
            Value::Gauge32(v) | Value::Counter32(v) | Value::TimeTicks(v) | Value::UInteger(v) => {
                v.to_string()
            }
            Value::OctetString(data) | Value::Opaque(data) => latin1(self.truncate(data)),
            Value::IpAddress(ip) => format!("{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]),
            Value::Null => String::new(),
            Value::ObjectIdentifier(oid) => oid.dotted().to_string(),
            Value::EndOfMibView => "ENDOFMIBVIEW".to_string(),
            Value::NoSuchObject => "NOSUCHOBJECT".to_string(),
            Value::NoSuchInstance => "NOSUCHINSTANCE".to_string(),
            Value::Counter64(v) => v.to_string(),
            Value::BitString(data) => render_bits(data, node),
            Value::Unknown { tag, .. } => {
                tracing::warn!(target: "snmpq::format", { snmp.wire_tag = tag }, "value type not handled");
                String::new()
            }
        }
    }

    fn sprint(&self, value: &Value, node: Option<&MibNode>) -> String {
        match value {
            Value::Integer(v) => node
                .and_then(|n| n.enum_label(*v))
                .map_or_else(|| v.to_string(), str::to_string),
            Value::TimeTicks(v) => TimeTicks(*v).to_string(),
            Value::OctetString(data) => {
                let data = self.truncate(data);
                if is_printable(data) {
                    latin1(data)
                } else {
                    hex::encode_spaced(data)
                }
            }
            Value::Opaque(data) => hex::encode_spaced(self.truncate(data)),
            other => self.plain(other, node),
        }
    }

    fn truncate<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        if data.len() > self.opts.max_value_size {
            tracing::warn!(target: "snmpq::format", {
                snmp.value_len = data.len(),
                snmp.max_value_size = self.opts.max_value_size
            }, "truncating oversized value");
            &data[..self.opts.max_value_size]
        } else {
            data
        }
    }
}

/// One char per byte, so binary strings survive intact.
fn latin1(data: &[u8]) -> String {
    data.iter().map(|&b| char::from(b)).collect()
}

fn is_printable(data: &[u8]) -> bool {
    data.iter()
        .all(|b| b.is_ascii_graphic() || matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}

/// Spaced hex of the raw bits, followed by the labels of the set bits the
/// node names.
fn render_bits(data: &[u8], node: Option<&MibNode>) -> String {
    let mut out = hex::encode_spaced(data);
    let Some(node) = node else {
        return out;
    };
    for (bit, label) in &node.enums {
        let Ok(bit) = usize::try_from(*bit) else {
            continue;
        };
        let set = data
            .get(bit / 8)
            .is_some_and(|byte| byte & (0x80 >> (bit % 8)) != 0);
        if set {
            out.push_str(&format!(" {}({})", label, bit));
        }
    }
    out
}
