//! # snmpq
//!
//! SNMP client query engine.
//!
//! `snmpq` turns human-readable object tags into numeric OIDs, drives GET,
//! GETNEXT, GETBULK and SET exchanges through a pluggable [`Transport`],
//! walks subtrees and renders every returned variable as a
//! [`ResultRecord`]. Encoding and sending bytes is the transport's job.
//!
//! ## Features
//!
//! - Tag resolution against a naming tree: exact, module-qualified, numeric
//!   and pattern-matched names
//! - Typed values with text rendering, enumeration labels and sprint-style
//!   output
//! - Batched requests with noSuchName elision and resubmission
//! - GETNEXT and GETBULK subtree walks with subtree-boundary detection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use snmpq::transport::{MockTransport, ResponseBuilder};
//! use snmpq::{ObjectRef, Session, Value, oid};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<snmpq::Error>> {
//!     let mut transport = MockTransport::new("192.0.2.1:161".parse().unwrap());
//!     transport.queue_response(
//!         ResponseBuilder::new(0)
//!             .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw1"))
//!             .build(),
//!     );
//!
//!     let session = Session::builder(transport).build()?;
//!     for record in session.get(&[ObjectRef::new("sysName", "0")]).await? {
//!         println!("{}", record);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod format;
pub mod marshal;
pub mod mib;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod resolve;
pub mod session;
pub mod transport;
pub mod types;
pub mod value;
pub mod varbind;

// Re-exports for convenience
pub use error::{Error, ErrorStatus, ResolveErrorKind, Result};
pub use mib::{MibTree, NamingTree};
pub use oid::Oid;
pub use pdu::{Pdu, PduType};
pub use resolve::{BestGuess, ResolutionMode, Resolver};
pub use session::{
    ElisionStrategy, LastError, ObjectRef, ResultRecord, Session, SessionBuilder, SessionConfig,
    SetItem,
};
pub use transport::Transport;
pub use types::TypeTag;
pub use value::Value;
pub use varbind::VarBind;
