//! Standard test fixtures with realistic MIB data.

use snmpq::{Oid, Value, oid};
use std::collections::BTreeMap;

// =============================================================================
// MIB data fixtures (for TestAgent)
// =============================================================================

/// Standard system MIB entries (1.3.6.1.2.1.1).
///
/// Returns OIDs for:
/// - sysDescr.0 (1.3.6.1.2.1.1.1.0)
/// - sysObjectID.0 (1.3.6.1.2.1.1.2.0)
/// - sysUpTime.0 (1.3.6.1.2.1.1.3.0)
/// - sysContact.0 (1.3.6.1.2.1.1.4.0)
/// - sysName.0 (1.3.6.1.2.1.1.5.0)
/// - sysLocation.0 (1.3.6.1.2.1.1.6.0)
/// - sysServices.0 (1.3.6.1.2.1.1.7.0)
pub fn system_mib() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    data.insert(sys_descr(), Value::OctetString("Test SNMP Agent".into()));
    data.insert(
        sys_object_id(),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 99999)),
    );
    data.insert(sys_uptime(), Value::TimeTicks(123456));
    data.insert(sys_contact(), Value::OctetString("admin@test.local".into()));
    data.insert(sys_name(), Value::OctetString("test-agent".into()));
    data.insert(sys_location(), Value::OctetString("Test Lab".into()));
    data.insert(sys_services(), Value::Integer(72));

    data
}

/// Interface table rows (ifIndex, ifDescr, ifType, ifOperStatus, ifInOctets)
/// for `count` interfaces.
///
/// Odd-numbered interfaces are up, even-numbered ones are down.
pub fn interface_table(count: u32) -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    for i in 1..=count {
        data.insert(if_column(1, i), Value::Integer(i as i32));
        data.insert(
            if_column(2, i),
            Value::OctetString(format!("eth{}", i - 1).into()),
        );
        data.insert(if_column(3, i), Value::Integer(6));
        let status = if i % 2 == 1 { 1 } else { 2 };
        data.insert(if_column(8, i), Value::Integer(status));
        data.insert(if_column(10, i), Value::Counter32(i * 1000));
    }

    data
}

/// System group plus `if_count` interface rows, with ifNumber set.
pub fn combined(if_count: u32) -> BTreeMap<Oid, Value> {
    let mut data = system_mib();
    data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(if_count as i32));
    data.extend(interface_table(if_count));
    data
}

// =============================================================================
// OID helpers
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}

pub fn sys_object_id() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)
}

pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}

pub fn sys_contact() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 4, 0)
}

pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}

pub fn sys_location() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 6, 0)
}

pub fn sys_services() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 7, 0)
}

/// ifEntry column `column`, row `index`.
pub fn if_column(column: u32, index: u32) -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1).child(column).child(index)
}

/// An OID no fixture populates.
pub fn nonexistent_oid() -> Oid {
    oid!(1, 3, 6, 1, 99, 99, 99, 0)
}
