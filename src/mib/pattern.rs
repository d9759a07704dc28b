//! Minimal label patterns for fuzzy lookups.
//!
//! Supports `^`, `$`, `.` and `*` with unanchored search semantics,
//! compared case-insensitively. Any other byte matches itself.

/// Compiled label pattern.
///
/// ```
/// use snmpq::mib::Pattern;
///
/// let p = Pattern::new("^ifIn.*Octets$");
/// assert!(p.is_match("ifInOctets"));
/// assert!(p.is_match("IFINOCTETS"));
/// assert!(!p.is_match("ifHCInOctets"));
/// assert!(Pattern::new("Descr").is_match("sysDescr"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    src: Box<[u8]>,
}

impl Pattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            src: pattern.bytes().map(|b| b.to_ascii_lowercase()).collect(),
        }
    }

    /// True if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        let text: Vec<u8> = text.bytes().map(|b| b.to_ascii_lowercase()).collect();
        if let Some(rest) = self.src.strip_prefix(b"^") {
            return match_here(rest, &text);
        }
        (0..=text.len()).any(|i| match_here(&self.src, &text[i..]))
    }

    /// True if the pattern uses no metacharacters.
    pub fn is_literal(&self) -> bool {
        !self.src.iter().any(|b| matches!(b, b'^' | b'$' | b'.' | b'*'))
    }
}

fn match_here(re: &[u8], text: &[u8]) -> bool {
    match re {
        [] => true,
        [c, b'*', rest @ ..] => match_star(*c, rest, text),
        [b'$'] => text.is_empty(),
        [c, rest @ ..] => match text.split_first() {
            Some((t, tail)) if *c == b'.' || c == t => match_here(rest, tail),
            _ => false,
        },
    }
}

fn match_star(c: u8, re: &[u8], text: &[u8]) -> bool {
    let mut i = 0;
    loop {
        if match_here(re, &text[i..]) {
            return true;
        }
        if i < text.len() && (c == b'.' || text[i] == c) {
            i += 1;
        } else {
            return false;
        }
    }
}
