//! Transport layer abstraction.
//!
//! The query engine never encodes or sends bytes itself. It hands a request
//! [`Pdu`] to a [`Transport`] and gets back either the response PDU or an
//! [`ExchangeError`]. Framing, retransmission and timeouts belong to the
//! transport.

#[cfg(any(test, feature = "testing"))]
mod mock;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use std::future::Future;
use std::net::SocketAddr;

use crate::pdu::Pdu;

/// Why an exchange produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// The transport gave up waiting.
    #[error("request timed out")]
    Timeout,
    /// Any other transport failure. Details are in [`Transport::diagnostics`].
    #[error("exchange failed")]
    Failed,
}

/// Last error recorded by a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Operating system error number, 0 if none.
    pub sys_errno: i32,
    /// Protocol library error number, 0 if none.
    pub snmp_errno: i32,
    /// Human-readable description.
    pub text: String,
}

/// Client-side transport abstraction.
///
/// # Clone Requirement
///
/// Sessions are cheap to clone and every clone shares the same transport.
/// Implementations are expected to use `Arc` internally.
pub trait Transport: Send + Sync + Clone {
    /// Send `request` and wait for the matching response.
    fn exchange(
        &self,
        request: Pdu,
    ) -> impl Future<Output = Result<Pdu, ExchangeError>> + Send;

    /// Details of the most recent failure.
    fn diagnostics(&self) -> Diagnostics;

    /// The peer address for this transport.
    fn peer_addr(&self) -> SocketAddr;
}
