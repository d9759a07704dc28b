//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for common OIDs.

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32). Uses SmallVec to avoid
/// heap allocation for OIDs with 16 or fewer arcs.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmpq::oid::Oid;
    ///
    /// let oid = Oid::new(vec![1, 3, 6, 1, 2, 1]);
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1]);
    ///
    /// let oid = Oid::new(0..5);
    /// assert_eq!(oid.arcs(), &[0, 1, 2, 3, 4]);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted string notation (e.g., "1.3.6.1.2.1.1.1.0").
    ///
    /// A leading dot is accepted and empty components are skipped, so
    /// `".1.3.6.1"` and `"1.3.6.1"` parse to the same OID.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmpq::oid::Oid;
    ///
    /// let oid = Oid::parse(".1.3.6.1.2.1.1.1.0").unwrap();
    /// assert_eq!(oid.len(), 9);
    ///
    /// assert!(Oid::parse("1.3.six.1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        Self::scan_numeric(s).ok_or_else(|| Error::InvalidOid(s.into()).boxed())
    }

    /// Scan a purely numeric dotted path.
    ///
    /// Returns `None` when any component is not an unsigned decimal number
    /// (in particular when the text contains an alphabetic character), or
    /// when the result would exceed [`MAX_OID_LEN`] arcs.
    ///
    /// ```
    /// use snmpq::oid::Oid;
    ///
    /// assert_eq!(Oid::scan_numeric(".1.3.6").unwrap().arcs(), &[1, 3, 6]);
    /// assert!(Oid::scan_numeric("1.3.dod").is_none());
    /// assert!(Oid::scan_numeric("").unwrap().is_empty());
    /// ```
    pub fn scan_numeric(s: &str) -> Option<Self> {
        let mut arcs = SmallVec::new();
        for part in s.split('.') {
            if part.is_empty() {
                continue;
            }
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            arcs.push(part.parse::<u32>().ok()?);
            if arcs.len() > MAX_OID_LEN {
                return None;
            }
        }
        Some(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with another OID.
    ///
    /// An OID always starts with itself, and any OID starts with an empty OID.
    ///
    /// ```
    /// use snmpq::oid;
    ///
    /// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
    /// assert!(sys_descr.starts_with(&oid!(1, 3, 6, 1, 2, 1, 1)));
    /// assert!(!sys_descr.starts_with(&oid!(1, 3, 6, 1, 2, 1, 2)));
    /// ```
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Get the parent OID (all arcs except the last).
    ///
    /// Returns `None` if the OID is empty.
    pub fn parent(&self) -> Option<Oid> {
        if self.arcs.is_empty() {
            None
        } else {
            Some(Oid {
                arcs: SmallVec::from_slice(&self.arcs[..self.arcs.len() - 1]),
            })
        }
    }

    /// Create a child OID by appending an arc.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Append arcs in place.
    pub fn extend_from_slice(&mut self, arcs: &[u32]) {
        self.arcs.extend_from_slice(arcs);
    }

    /// Validate that the OID doesn't exceed the maximum arc count.
    ///
    /// ```
    /// use snmpq::oid::{Oid, MAX_OID_LEN};
    ///
    /// assert!(Oid::new(0..MAX_OID_LEN as u32).validate_length().is_ok());
    /// assert!(Oid::new(0..150).validate_length().is_err());
    /// ```
    pub fn validate_length(&self) -> Result<()> {
        if self.arcs.len() > MAX_OID_LEN {
            return Err(Error::InvalidOid(
                format!("{} arcs exceeds maximum of {}", self.arcs.len(), MAX_OID_LEN).into(),
            )
            .boxed());
        }
        Ok(())
    }

    /// Lazily render with a leading dot (".1.3.6.1"), the form used for
    /// OID-valued results and numeric labels.
    ///
    /// ```
    /// use snmpq::oid;
    ///
    /// assert_eq!(oid!(1, 3, 6, 1).dotted().to_string(), ".1.3.6.1");
    /// ```
    pub fn dotted(&self) -> Dotted<'_> {
        Dotted(self)
    }
}

/// Leading-dot formatter returned by [`Oid::dotted`].
pub struct Dotted<'a>(&'a Oid);

impl fmt::Display for Dotted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arc in self.0.arcs() {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to create an OID from literal arcs.
///
/// ```
/// use snmpq::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
    }

    #[test]
    fn test_parse_leading_dot() {
        let oid = Oid::parse(".1.3.6.1").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1]);
    }

    #[test]
    fn test_display() {
        let oid = Oid::from_slice(&[1, 3, 6, 1, 2, 1, 1, 1, 0]);
        assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
        assert_eq!(oid.dotted().to_string(), ".1.3.6.1.2.1.1.1.0");
    }

    #[test]
    fn test_dotted_empty() {
        assert_eq!(Oid::empty().dotted().to_string(), "");
    }

    #[test]
    fn test_starts_with() {
        let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
        let prefix = Oid::parse("1.3.6.1").unwrap();
        assert!(oid.starts_with(&prefix));
        assert!(!prefix.starts_with(&oid));
    }

    #[test]
    fn test_scan_numeric_rejects_letters() {
        assert!(Oid::scan_numeric("1.3.6.1.x").is_none());
        assert!(Oid::scan_numeric("sysDescr").is_none());
        assert!(Oid::scan_numeric("1.3.-6").is_none());
    }

    #[test]
    fn test_scan_numeric_rejects_overflowing_arc() {
        assert!(Oid::scan_numeric("1.99999999999").is_none());
    }

    #[test]
    fn test_scan_numeric_enforces_max_len() {
        let at_limit = vec!["1"; MAX_OID_LEN].join(".");
        assert_eq!(Oid::scan_numeric(&at_limit).unwrap().len(), MAX_OID_LEN);

        let over = vec!["1"; MAX_OID_LEN + 1].join(".");
        assert!(Oid::scan_numeric(&over).is_none());
    }

    #[test]
    fn test_macro() {
        let oid = oid!(1, 3, 6, 1);
        assert_eq!(oid.arcs(), &[1, 3, 6, 1]);
    }

    #[test]
    fn test_parent_and_child() {
        let system = oid!(1, 3, 6, 1, 2, 1, 1);
        let sys_descr = system.child(1);
        assert_eq!(sys_descr.parent().unwrap(), system);
        assert!(Oid::empty().parent().is_none());
    }

    #[test]
    fn test_extend() {
        let mut oid = oid!(1, 3, 6, 1, 2, 1, 1, 1);
        oid.extend_from_slice(&[0]);
        assert_eq!(oid, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
    }

    #[test]
    fn test_validate_length_exceeds_limit() {
        let arcs: Vec<u32> = (0..(MAX_OID_LEN + 1) as u32).collect();
        assert!(Oid::new(arcs).validate_length().is_err());
    }

    #[test]
    fn test_oid_fromstr() {
        let oid: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();
        assert_eq!(oid, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));

        let empty: Oid = "".parse().unwrap();
        assert!(empty.is_empty());

        let original = oid!(1, 3, 6, 1, 4, 1, 9, 9, 42);
        let parsed: Oid = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_oid_fromstr_invalid() {
        assert!("1.3.abc.1".parse::<Oid>().is_err());
        assert!("1.3.-6.1".parse::<Oid>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(oid!(1, 3, 6, 1, 2) < oid!(1, 3, 6, 1, 2, 0));
        assert!(oid!(1, 3, 6, 1, 2, 9) < oid!(1, 3, 6, 1, 3));
    }
}
