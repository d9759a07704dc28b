//! SNMP Protocol Data Units (PDUs).
//!
//! PDUs are exchanged with the agent through a [`Transport`](crate::Transport);
//! encoding them on the wire is the transport's business.

use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::varbind::VarBind;

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = 0xA0,
    GetNextRequest = 0xA1,
    Response = 0xA2,
    SetRequest = 0xA3,
    GetBulkRequest = 0xA5,
}

impl PduType {
    /// Create from tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA0 => Some(Self::GetRequest),
            0xA1 => Some(Self::GetNextRequest),
            0xA2 => Some(Self::Response),
            0xA3 => Some(Self::SetRequest),
            0xA5 => Some(Self::GetBulkRequest),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
            Self::SetRequest => write!(f, "SetRequest"),
            Self::GetBulkRequest => write!(f, "GetBulkRequest"),
        }
    }
}

/// Generic PDU structure for request/response operations.
#[derive(Debug, Clone)]
pub struct Pdu {
    /// PDU type
    pub pdu_type: PduType,
    /// Request ID for correlating requests and responses
    pub request_id: i32,
    /// Error status (0 for requests, error code for responses)
    pub error_status: i32,
    /// Error index (1-based index of problematic varbind)
    pub error_index: i32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// Create a new GET request PDU.
    pub fn get_request(request_id: i32, oids: &[Oid]) -> Self {
        Self {
            pdu_type: PduType::GetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        }
    }

    /// Create a new GETNEXT request PDU.
    pub fn get_next_request(request_id: i32, oids: &[Oid]) -> Self {
        Self {
            pdu_type: PduType::GetNextRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        }
    }

    /// Create a new SET request PDU.
    pub fn set_request(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::SetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Create a GETBULK request PDU.
    ///
    /// Note: For GETBULK, error_status holds non_repeaters and error_index holds max_repetitions.
    pub fn get_bulk(
        request_id: i32,
        non_repeaters: i32,
        max_repetitions: i32,
        oids: &[Oid],
    ) -> Self {
        Self {
            pdu_type: PduType::GetBulkRequest,
            request_id,
            error_status: non_repeaters,
            error_index: max_repetitions,
            varbinds: oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        }
    }

    /// Create a successful Response PDU.
    pub fn response(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Create a Response PDU with specific error status, echoing this request's varbinds.
    pub fn to_error_response(&self, error_status: ErrorStatus, error_index: i32) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id: self.request_id,
            error_status: error_status.as_i32(),
            error_index,
            varbinds: self.varbinds.clone(),
        }
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Get the error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    /// OID of the varbind named by a 1-based error index, if in range.
    pub fn oid_at_error_index(&self, error_index: i32) -> Option<&Oid> {
        usize::try_from(error_index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.varbinds.get(i))
            .map(|vb| &vb.oid)
    }

    /// Remove the varbind named by a 1-based error index.
    ///
    /// Returns the removed varbind, or `None` when the index is 0 or out of
    /// range, in which case the request is left untouched and cannot be fixed.
    /// Removing one of a GETBULK request's non-repeaters also lowers its
    /// non-repeaters count.
    ///
    /// ```
    /// use snmpq::oid;
    /// use snmpq::pdu::Pdu;
    ///
    /// let mut pdu = Pdu::get_request(1, &[oid!(1, 3, 1), oid!(1, 3, 2), oid!(1, 3, 3)]);
    /// let removed = pdu.elide(2).unwrap();
    /// assert_eq!(removed.oid, oid!(1, 3, 2));
    /// assert_eq!(pdu.varbinds.len(), 2);
    /// assert!(pdu.elide(0).is_none());
    /// ```
    pub fn elide(&mut self, error_index: i32) -> Option<VarBind> {
        let idx = usize::try_from(error_index).ok()?.checked_sub(1)?;
        if idx >= self.varbinds.len() {
            return None;
        }
        if self.pdu_type == PduType::GetBulkRequest && (idx as i32) < self.error_status {
            self.error_status -= 1;
        }
        Some(self.varbinds.remove(idx))
    }

    /// Requested OIDs in varbind order.
    pub fn oids(&self) -> Vec<Oid> {
        self.varbinds.iter().map(|vb| vb.oid.clone()).collect()
    }
}
