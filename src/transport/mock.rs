//! Mock transport for testing.
//!
//! Provides a programmable transport that can simulate various scenarios
//! without needing an agent.

use super::{Diagnostics, ExchangeError, Transport};
use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::value::Value;
use crate::varbind::VarBind;
use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A mock response to return for a request.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this PDU (request_id will be patched to match).
    Pdu(Pdu),
    /// Simulate a timeout.
    Timeout,
    /// Simulate a generic failure with this diagnostic text.
    Failure(String),
}

/// Mock transport state shared between clones.
struct MockTransportInner {
    target: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<Pdu>,
    default_response: Option<MockResponse>,
    diagnostics: Diagnostics,
}

/// Mock transport for testing sessions.
///
/// # Example
///
/// ```rust,ignore
/// use snmpq::transport::{MockTransport, ResponseBuilder};
/// use snmpq::{Value, oid};
///
/// let mut mock = MockTransport::new("127.0.0.1:161".parse().unwrap());
///
/// mock.queue_response(
///     ResponseBuilder::new(1)
///         .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("router1"))
///         .build(),
/// );
///
/// // Or simulate a timeout
/// mock.queue_timeout();
/// ```
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new(target: SocketAddr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                target,
                responses: VecDeque::new(),
                requests: Vec::new(),
                default_response: None,
                diagnostics: Diagnostics::default(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a response PDU.
    pub fn queue_response(&mut self, pdu: Pdu) {
        self.lock().responses.push_back(MockResponse::Pdu(pdu));
    }

    /// Queue a timeout.
    pub fn queue_timeout(&mut self) {
        self.lock().responses.push_back(MockResponse::Timeout);
    }

    /// Queue a generic failure carrying `text` as its diagnostic.
    pub fn queue_failure(&mut self, text: impl Into<String>) {
        self.lock()
            .responses
            .push_back(MockResponse::Failure(text.into()));
    }

    /// Set a default response when the queue is empty.
    pub fn set_default_response(&mut self, response: MockResponse) {
        self.lock().default_response = Some(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<Pdu> {
        self.lock().requests.clone()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Get the number of queued responses remaining.
    pub fn queued_response_count(&self) -> usize {
        self.lock().responses.len()
    }
}

impl Transport for MockTransport {
    fn exchange(&self, request: Pdu) -> impl Future<Output = Result<Pdu, ExchangeError>> + Send {
        let outcome = {
            let mut inner = self.lock();
            let request_id = request.request_id;
            inner.requests.push(request);
            let response = inner
                .responses
                .pop_front()
                .or_else(|| inner.default_response.clone());

            match response {
                Some(MockResponse::Pdu(mut pdu)) => {
                    pdu.request_id = request_id;
                    inner.diagnostics = Diagnostics::default();
                    Ok(pdu)
                }
                Some(MockResponse::Failure(text)) => {
                    inner.diagnostics = Diagnostics {
                        sys_errno: 0,
                        snmp_errno: -1,
                        text,
                    };
                    Err(ExchangeError::Failed)
                }
                Some(MockResponse::Timeout) | None => {
                    inner.diagnostics = Diagnostics {
                        sys_errno: 0,
                        snmp_errno: -24,
                        text: "Timeout".to_string(),
                    };
                    Err(ExchangeError::Timeout)
                }
            }
        };
        async move { outcome }
    }

    fn diagnostics(&self) -> Diagnostics {
        self.lock().diagnostics.clone()
    }

    fn peer_addr(&self) -> SocketAddr {
        self.lock().target
    }
}

/// Builder for response PDUs.
pub struct ResponseBuilder {
    request_id: i32,
    varbinds: Vec<VarBind>,
    error_status: i32,
    error_index: i32,
}

impl ResponseBuilder {
    /// Create a new response builder with the given request ID.
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            varbinds: Vec::new(),
            error_status: 0,
            error_index: 0,
        }
    }

    /// Add a varbind to the response.
    pub fn varbind(mut self, oid: Oid, value: Value) -> Self {
        self.varbinds.push(VarBind::new(oid, value));
        self
    }

    /// Set the error status.
    pub fn error_status(mut self, status: ErrorStatus) -> Self {
        self.error_status = status.as_i32();
        self
    }

    /// Set the error index.
    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    /// Build the response PDU.
    pub fn build(self) -> Pdu {
        let mut pdu = Pdu::response(self.request_id, self.varbinds);
        pdu.error_status = self.error_status;
        pdu.error_index = self.error_index;
        pdu
    }
}
