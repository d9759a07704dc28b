//! In-process test agent.
//!
//! `TestAgent` implements [`Transport`] directly over an ordered OID table,
//! answering GET, GETNEXT, GETBULK and SET the way a real agent would. It
//! can behave like an SNMPv1 agent (noSuchName errors) or an SNMPv2c agent
//! (exception values).

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::ops::Bound;
use std::sync::{Arc, Mutex, PoisonError};

use snmpq::pdu::{Pdu, PduType};
use snmpq::transport::{Diagnostics, ExchangeError, Transport};
use snmpq::{ErrorStatus, Oid, Value, VarBind};

/// Protocol personality of a [`TestAgent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentVersion {
    /// Missing objects are reported as noSuchName errors.
    V1,
    /// Missing objects come back as exception values.
    V2c,
}

#[derive(Debug)]
struct AgentState {
    data: BTreeMap<Oid, Value>,
    requests: Vec<Pdu>,
}

/// In-process SNMP agent for integration tests.
#[derive(Debug, Clone)]
pub struct TestAgent {
    addr: SocketAddr,
    version: AgentVersion,
    state: Arc<Mutex<AgentState>>,
}

impl TestAgent {
    /// SNMPv2c agent serving `data`.
    pub fn new(data: BTreeMap<Oid, Value>) -> Self {
        Self::with_version(data, AgentVersion::V2c)
    }

    /// SNMPv1 agent serving `data`.
    pub fn v1(data: BTreeMap<Oid, Value>) -> Self {
        Self::with_version(data, AgentVersion::V1)
    }

    pub fn with_version(data: BTreeMap<Oid, Value>, version: AgentVersion) -> Self {
        Self {
            addr: "127.0.0.1:16100".parse().unwrap(),
            version,
            state: Arc::new(Mutex::new(AgentState {
                data,
                requests: Vec::new(),
            })),
        }
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<Pdu> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Current value stored at `oid`.
    pub fn value(&self, oid: &Oid) -> Option<Value> {
        self.lock().data.get(oid).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AgentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn answer(&self, request: &Pdu) -> Pdu {
        let mut state = self.lock();
        state.requests.push(request.clone());
        match request.pdu_type {
            PduType::GetRequest => self.get(&state.data, request),
            PduType::GetNextRequest => self.get_next(&state.data, request),
            PduType::GetBulkRequest => self.get_bulk(&state.data, request),
            PduType::SetRequest => self.set(&mut state.data, request),
            PduType::Response => request.to_error_response(ErrorStatus::GenErr, 0),
        }
    }

    fn get(&self, data: &BTreeMap<Oid, Value>, request: &Pdu) -> Pdu {
        let mut varbinds = Vec::with_capacity(request.varbinds.len());
        for (i, vb) in request.varbinds.iter().enumerate() {
            match data.get(&vb.oid) {
                Some(value) => varbinds.push(VarBind::new(vb.oid.clone(), value.clone())),
                None if self.version == AgentVersion::V1 => {
                    return request.to_error_response(ErrorStatus::NoSuchName, i as i32 + 1);
                }
                None => {
                    let parent_known = vb
                        .oid
                        .parent()
                        .is_some_and(|p| data.keys().any(|k| k.starts_with(&p)));
                    let exception = if parent_known {
                        Value::NoSuchInstance
                    } else {
                        Value::NoSuchObject
                    };
                    varbinds.push(VarBind::new(vb.oid.clone(), exception));
                }
            }
        }
        Pdu::response(request.request_id, varbinds)
    }

    fn get_next(&self, data: &BTreeMap<Oid, Value>, request: &Pdu) -> Pdu {
        let mut varbinds = Vec::with_capacity(request.varbinds.len());
        for (i, vb) in request.varbinds.iter().enumerate() {
            match successor(data, &vb.oid) {
                Some(next) => varbinds.push(next),
                None if self.version == AgentVersion::V1 => {
                    return request.to_error_response(ErrorStatus::NoSuchName, i as i32 + 1);
                }
                None => varbinds.push(VarBind::new(vb.oid.clone(), Value::EndOfMibView)),
            }
        }
        Pdu::response(request.request_id, varbinds)
    }

    fn get_bulk(&self, data: &BTreeMap<Oid, Value>, request: &Pdu) -> Pdu {
        let non_repeaters = (request.error_status.max(0) as usize).min(request.varbinds.len());
        let max_repetitions = request.error_index.max(0) as usize;
        let mut varbinds = Vec::new();

        for vb in &request.varbinds[..non_repeaters] {
            varbinds.push(
                successor(data, &vb.oid)
                    .unwrap_or_else(|| VarBind::new(vb.oid.clone(), Value::EndOfMibView)),
            );
        }

        let mut cursors: Vec<Oid> = request.varbinds[non_repeaters..]
            .iter()
            .map(|vb| vb.oid.clone())
            .collect();
        for _ in 0..max_repetitions {
            if cursors.is_empty() {
                break;
            }
            let mut all_done = true;
            for cursor in cursors.iter_mut() {
                match successor(data, cursor) {
                    Some(next) => {
                        *cursor = next.oid.clone();
                        varbinds.push(next);
                        all_done = false;
                    }
                    None => varbinds.push(VarBind::new(cursor.clone(), Value::EndOfMibView)),
                }
            }
            if all_done {
                break;
            }
        }
        Pdu::response(request.request_id, varbinds)
    }

    fn set(&self, data: &mut BTreeMap<Oid, Value>, request: &Pdu) -> Pdu {
        for (i, vb) in request.varbinds.iter().enumerate() {
            let index = i as i32 + 1;
            let Some(current) = data.get(&vb.oid) else {
                let status = match self.version {
                    AgentVersion::V1 => ErrorStatus::NoSuchName,
                    AgentVersion::V2c => ErrorStatus::NotWritable,
                };
                return request.to_error_response(status, index);
            };
            if current.wire_tag() != vb.value.wire_tag() {
                let status = match self.version {
                    AgentVersion::V1 => ErrorStatus::BadValue,
                    AgentVersion::V2c => ErrorStatus::WrongType,
                };
                return request.to_error_response(status, index);
            }
        }
        for vb in &request.varbinds {
            data.insert(vb.oid.clone(), vb.value.clone());
        }
        Pdu::response(request.request_id, request.varbinds.clone())
    }
}

fn successor(data: &BTreeMap<Oid, Value>, oid: &Oid) -> Option<VarBind> {
    data.range((Bound::Excluded(oid.clone()), Bound::Unbounded))
        .next()
        .map(|(oid, value)| VarBind::new(oid.clone(), value.clone()))
}

impl Transport for TestAgent {
    fn exchange(&self, request: Pdu) -> impl Future<Output = Result<Pdu, ExchangeError>> + Send {
        let response = self.answer(&request);
        async move { Ok(response) }
    }

    fn diagnostics(&self) -> Diagnostics {
        Diagnostics::default()
    }

    fn peer_addr(&self) -> SocketAddr {
        self.addr
    }
}
