//! Error types for snmpq.
//!
//! This module provides:
//!
//! - [`Error`] - The main error type (one variant per failure class)
//! - [`ErrorStatus`] - SNMP protocol errors returned by agents (RFC 3416)
//! - [`ResolveErrorKind`] - Why a tag could not be turned into a numeric path
//!
//! # Error Handling
//!
//! Errors are boxed for efficiency: `Result<T> = Result<T, Box<Error>>`.
//!
//! ```rust
//! use snmpq::{Error, Result};
//!
//! fn handle_error(result: Result<()>) {
//!     match result {
//!         Ok(()) => println!("Success"),
//!         Err(e) => match &*e {
//!             Error::Timeout { diagnostic, .. } => {
//!                 println!("agent unreachable: {}", diagnostic);
//!             }
//!             Error::UnknownObjectId { tag, .. } => {
//!                 println!("no such object in the MIB: {}", tag);
//!             }
//!             _ => println!("Error: {}", e),
//!         }
//!     }
//! }
//! ```

use crate::oid::Oid;

/// Result type alias using the library's boxed Error type.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Reason a tag/instance pair could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorKind {
    /// The tag was empty.
    EmptyTag,
    /// No node matched under the selected resolution mode.
    NotFound,
    /// The instance suffix contained a non-numeric component.
    InvalidInstance,
    /// The resulting path exceeded [`MAX_OID_LEN`](crate::oid::MAX_OID_LEN).
    TooLong,
}

impl std::fmt::Display for ResolveErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTag => write!(f, "empty tag"),
            Self::NotFound => write!(f, "not found"),
            Self::InvalidInstance => write!(f, "invalid instance"),
            Self::TooLong => write!(f, "too many sub-identifiers"),
        }
    }
}

/// The main error type for all snmpq operations.
///
/// Local failures (resolution, typing, configuration) never touch the
/// network. Remote and transport failures carry the peer they came from.
///
/// # Common Patterns
///
/// ```
/// use snmpq::{Error, ErrorStatus};
///
/// fn is_missing_object(error: &Error) -> bool {
///     matches!(error,
///         Error::NoSuchName { .. } |
///         Error::UnknownObjectId { .. }
///     )
/// }
///
/// fn is_write_refused(error: &Error) -> bool {
///     matches!(error,
///         Error::Snmp { status: ErrorStatus::NotWritable | ErrorStatus::ReadOnly, .. }
///     )
/// }
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The tag (or its instance suffix) does not resolve to a numeric path.
    #[error("unknown object id ({tag}): {kind}")]
    UnknownObjectId {
        tag: Box<str>,
        kind: ResolveErrorKind,
    },

    /// Agent reported noSuchName and elision retry was not enabled.
    #[error("no such name error from {target} at index {index}")]
    NoSuchName {
        target: Box<str>,
        index: u32,
        oid: Option<Oid>,
    },

    /// Any other SNMP error status from the agent.
    #[error("SNMP error from {target}: {status} at index {index}")]
    Snmp {
        target: Box<str>,
        status: ErrorStatus,
        index: u32,
        oid: Option<Oid>,
    },

    /// The transport gave up waiting for a response.
    #[error("timed out while connecting to {target}: {diagnostic}")]
    Timeout {
        target: Box<str>,
        diagnostic: Box<str>,
    },

    /// The exchange failed for a reason other than a timeout.
    #[error("exchange with {target} failed: {diagnostic}")]
    Exchange {
        target: Box<str>,
        diagnostic: Box<str>,
    },

    /// No usable session handle.
    #[error("connection error: {reason}")]
    Connection { reason: Box<str> },

    /// SET item whose type could be taken neither from the MIB nor from the caller.
    #[error("a type could not be determined for {tag}")]
    UndeterminedType { tag: Box<str> },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),

    /// Invalid OID format.
    #[error("invalid OID: {0}")]
    InvalidOid(Box<str>),
}

impl Error {
    /// Box this error (convenience for constructing boxed errors).
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub(crate) fn unknown_object(tag: &str, kind: ResolveErrorKind) -> Box<Self> {
        tracing::debug!(target: "snmpq::error", { snmp.tag = tag, snmp.reason = %kind }, "unknown object id");
        Error::UnknownObjectId {
            tag: tag.into(),
            kind,
        }
        .boxed()
    }

    /// The remote error status, if this error came from the agent.
    pub fn status(&self) -> Option<ErrorStatus> {
        match self {
            Error::NoSuchName { .. } => Some(ErrorStatus::NoSuchName),
            Error::Snmp { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// SNMP protocol error status codes (RFC 3416).
///
/// Status 2 (`NoSuchName`) is the only one the session may recover from,
/// by eliding the offending entry and resubmitting.
///
/// # Example
///
/// ```
/// use snmpq::ErrorStatus;
///
/// let status = ErrorStatus::from_i32(2);
/// assert_eq!(status, ErrorStatus::NoSuchName);
/// assert_eq!(status.as_i32(), 2);
/// assert_eq!(status.to_string(), "noSuchName");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    /// Operation completed successfully (status = 0).
    NoError,
    /// Response message would be too large for transport (status = 1).
    TooBig,
    /// Requested OID not found (status = 2).
    NoSuchName,
    /// Invalid value provided in SET request (status = 3).
    BadValue,
    /// Attempted to SET a read-only object (status = 4).
    ReadOnly,
    /// Unspecified error occurred (status = 5).
    GenErr,
    /// Object exists but access is denied (status = 6).
    NoAccess,
    /// SET value has wrong ASN.1 type (status = 7).
    WrongType,
    /// SET value has incorrect length (status = 8).
    WrongLength,
    /// SET value uses wrong encoding (status = 9).
    WrongEncoding,
    /// SET value is out of range or otherwise invalid (status = 10).
    WrongValue,
    /// Object does not support row creation (status = 11).
    NoCreation,
    /// Value is inconsistent with other managed objects (status = 12).
    InconsistentValue,
    /// Resource required for SET is unavailable (status = 13).
    ResourceUnavailable,
    /// SET commit phase failed (status = 14).
    CommitFailed,
    /// SET undo phase failed (status = 15).
    UndoFailed,
    /// Access denied by VACM (status = 16).
    AuthorizationError,
    /// Object does not support modification (status = 17).
    NotWritable,
    /// Named object cannot be created (status = 18).
    InconsistentName,
    /// Unknown or future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => {
                tracing::warn!(target: "snmpq::error", { snmp.error_status = other }, "unknown SNMP error status");
                Self::Unknown(other)
            }
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}
