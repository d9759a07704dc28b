//! Shared test infrastructure for snmpq.
//!
//! Provides TestAgent (in-process SNMP agent), fixtures, and utilities.

// Allow dead code and unused imports since not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod agent;
pub mod fixtures;

// Re-export MIB data fixtures
pub use fixtures::{combined, interface_table, system_mib};

// Re-export OID helpers
pub use fixtures::{
    if_column, nonexistent_oid, sys_contact, sys_descr, sys_location, sys_name, sys_object_id,
    sys_services, sys_uptime,
};

pub use agent::{AgentVersion, TestAgent};

use snmpq::{Session, SessionBuilder};
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builder for a session talking to `agent`.
pub fn session_builder(agent: &TestAgent) -> SessionBuilder<TestAgent> {
    init_tracing();
    Session::builder(agent.clone())
}

/// Session with default configuration talking to `agent`.
pub fn session(agent: &TestAgent) -> Session<TestAgent> {
    session_builder(agent).build().unwrap()
}
