//! Session behavior over MockTransport: transport failures, last-error
//! bookkeeping and session lifecycle.
//!
//! Run with: `cargo test --test session_mock --features testing`

mod common;

use std::sync::Arc;

use snmpq::transport::{MockResponse, MockTransport, ResponseBuilder};
use snmpq::{
    Error, MibTree, NamingTree, ObjectRef, Session, SessionConfig, SetItem, TypeTag, Value, oid,
};

// ============================================================================
// Helper functions
// ============================================================================

fn mock() -> MockTransport {
    MockTransport::new("192.0.2.10:161".parse().unwrap())
}

fn create_session(mock: &MockTransport) -> Session<MockTransport> {
    common::init_tracing();
    Session::builder(mock.clone()).build().unwrap()
}

fn sys_descr() -> ObjectRef {
    ObjectRef::new("sysDescr", "0")
}

// ============================================================================
// Successful exchanges
// ============================================================================

#[tokio::test]
async fn test_get_through_mock() {
    let mut mock = mock();
    mock.queue_response(
        ResponseBuilder::new(0)
            .varbind(
                oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
                Value::from("Linux core-sw1 5.15.0"),
            )
            .build(),
    );
    let session = create_session(&mock);

    let records = session.get(&[sys_descr()]).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].oid, "sysDescr");
    assert_eq!(records[0].oid_index, "0");
    assert_eq!(records[0].snmp_type, TypeTag::OctetStr);
    assert_eq!(records[0].value, "Linux core-sw1 5.15.0");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].oids(), vec![oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]);
    assert!(requests[0].varbinds.iter().all(|vb| vb.value == Value::Null));
}

#[tokio::test]
async fn test_request_ids_advance_between_calls() {
    let mut mock = mock();
    mock.set_default_response(MockResponse::Pdu(
        ResponseBuilder::new(0)
            .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("x"))
            .build(),
    ));
    let session = create_session(&mock);

    session.get(&[sys_descr()]).await.unwrap();
    session.get(&[sys_descr()]).await.unwrap();

    let ids: Vec<_> = mock.requests().iter().map(|r| r.request_id).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(ids.iter().all(|id| *id >= 0));
}

#[tokio::test]
async fn test_unknown_wire_type_renders_empty() {
    let mut mock = mock();
    mock.queue_response(
        ResponseBuilder::new(0)
            .varbind(
                oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
                Value::Unknown {
                    tag: 0x99,
                    data: bytes::Bytes::from_static(b"\x01\x02"),
                },
            )
            .build(),
    );
    let session = create_session(&mock);

    let records = session.get(&[sys_descr()]).await.unwrap();

    assert_eq!(records[0].snmp_type, TypeTag::Other);
    assert_eq!(records[0].type_name(), "");
}

#[tokio::test]
async fn test_session_is_shareable_across_tasks() {
    let mut mock = mock();
    mock.set_default_response(MockResponse::Pdu(
        ResponseBuilder::new(0)
            .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("shared"))
            .build(),
    ));
    let session = create_session(&mock);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            session.get(&[sys_descr()]).await.unwrap()
        }));
    }
    for handle in handles {
        let records = handle.await.unwrap();
        assert_eq!(records[0].value, "shared");
    }
    assert_eq!(mock.requests().len(), 4);
}

#[tokio::test]
async fn test_walk_leaving_subtree_immediately_yields_nothing() {
    let mut mock = mock();
    mock.queue_response(
        ResponseBuilder::new(0)
            .varbind(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(4))
            .build(),
    );
    let session = create_session(&mock);

    let records = session.walk(&[ObjectRef::new("system", "")]).await.unwrap();

    assert!(records.is_empty());
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_walk_stops_on_non_increasing_oid() {
    let mut mock = mock();
    let looping = ResponseBuilder::new(0)
        .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("again"))
        .build();
    mock.set_default_response(MockResponse::Pdu(looping));
    let session = create_session(&mock);

    let records = session.walk(&[ObjectRef::new("system", "")]).await.unwrap();

    // the repeated name is still reported once more before the walk gives up
    assert_eq!(records.len(), 2);
    assert_eq!(mock.requests().len(), 2);
}

#[tokio::test]
async fn test_walk_placeholder_ends_subtree() {
    let mut mock = mock();
    mock.queue_response(
        ResponseBuilder::new(0)
            .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 9), Value::NoSuchObject)
            .build(),
    );
    let session = create_session(&mock);

    let records = session.walk(&[ObjectRef::new("sysORTable", "")]).await.unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].is_placeholder());
    assert_eq!(records[0].root_oid, "sysORTable");
    assert_eq!(records[0].snmp_type, TypeTag::NoSuchObject);
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_timeout() {
    let mut mock = mock();
    mock.queue_timeout();
    let session = create_session(&mock);

    let err = session.get(&[sys_descr()]).await.unwrap_err();

    match *err {
        Error::Timeout { ref target, .. } => assert_eq!(&**target, "192.0.2.10:161"),
        ref other => panic!("unexpected error: {other}"),
    }
    let last = session.last_error();
    assert_eq!(last.error_string, "Timeout");
    assert_eq!(last.error_index, -24);
}

#[tokio::test]
async fn test_generic_failure_mentioning_timeout_is_a_timeout() {
    let mut mock = mock();
    mock.queue_failure("Timeout while waiting for a reply");
    let session = create_session(&mock);

    let err = session.get(&[sys_descr()]).await.unwrap_err();

    assert!(matches!(*err, Error::Timeout { .. }));
}

#[tokio::test]
async fn test_generic_failure() {
    let mut mock = mock();
    mock.queue_failure("Connection refused");
    let session = create_session(&mock);

    let err = session.get(&[sys_descr()]).await.unwrap_err();

    match *err {
        Error::Exchange { ref diagnostic, .. } => assert_eq!(&**diagnostic, "Connection refused"),
        ref other => panic!("unexpected error: {other}"),
    }
    let last = session.last_error();
    assert_eq!(last.error_string, "Connection refused");
    assert_eq!(last.error_index, -1);
}

#[tokio::test]
async fn test_set_timeout_records_last_error() {
    let mut mock = mock();
    mock.queue_timeout();
    let session = create_session(&mock);

    let err = session
        .set(&[SetItem::new("sysName", "0", "edge-2")])
        .await
        .unwrap_err();

    assert!(matches!(*err, Error::Timeout { .. }));
    assert!(!session.last_error().is_clear());
    let request = &mock.requests()[0];
    assert_eq!(request.varbinds[0].value, Value::from("edge-2"));
}

#[tokio::test]
async fn test_resolution_failure_leaves_last_error_clear() {
    let mut mock = mock();
    mock.queue_timeout();
    let session = create_session(&mock);
    let _ = session.get(&[sys_descr()]).await.unwrap_err();
    assert!(!session.last_error().is_clear());

    let err = session
        .get(&[ObjectRef::new("notAnObject", "0")])
        .await
        .unwrap_err();

    assert!(matches!(*err, Error::UnknownObjectId { .. }));
    assert!(session.last_error().is_clear());
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_closed_session_sends_nothing() {
    let mock = mock();
    let session = create_session(&mock);
    assert!(session.is_open());

    session.close();
    let err = session.walk(&[ObjectRef::new("system", "")]).await.unwrap_err();

    assert!(!session.is_open());
    assert_eq!(session.target(), "<closed>");
    assert!(matches!(*err, Error::Connection { .. }));
    assert_eq!(session.last_error().error_string, "Bad session");
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_detached_session_resolves_but_cannot_send() {
    common::init_tracing();
    let tree: Arc<dyn NamingTree> = Arc::new(MibTree::standard());
    let session: Session<MockTransport> = Session::detached(tree, SessionConfig::default());

    let err = session.get(&[sys_descr()]).await.unwrap_err();
    assert!(matches!(*err, Error::Connection { .. }));

    let err = session
        .get(&[ObjectRef::new("sysDescr", "zero")])
        .await
        .unwrap_err();
    assert!(matches!(*err, Error::UnknownObjectId { .. }));
}

#[tokio::test]
async fn test_clones_share_the_handle() {
    let mock = mock();
    let session = create_session(&mock);
    let other = session.clone();

    other.close();

    assert!(!session.is_open());
}
