//! Common imports.
//!
//! ```
//! use snmpq::prelude::*;
//! ```

pub use crate::error::{Error, ErrorStatus, Result};
pub use crate::mib::{MibTree, NamingTree};
pub use crate::oid;
pub use crate::oid::Oid;
pub use crate::resolve::BestGuess;
pub use crate::session::{ObjectRef, ResultRecord, Session, SetItem};
pub use crate::transport::Transport;
pub use crate::types::TypeTag;
pub use crate::value::Value;
