//! Session builder.
//!
//! This module provides the [`SessionBuilder`] type, the usual way of
//! constructing a [`Session`] with anything other than the defaults.

use std::sync::Arc;

use crate::error::Result;
use crate::mib::{MibTree, NamingTree};
use crate::resolve::BestGuess;
use crate::transport::Transport;

use super::config::SessionConfig;
use super::retry::ElisionStrategy;
use super::Session;

/// Builder for constructing sessions.
///
/// # Example
///
/// ```rust,ignore
/// use snmpq::transport::MockTransport;
/// use snmpq::resolve::BestGuess;
/// use snmpq::Session;
///
/// let mock = MockTransport::new("192.0.2.1:161".parse().unwrap());
/// let session = Session::builder(mock)
///     .best_guess(BestGuess::Regex)
///     .retry_no_such(true)
///     .use_enums(true)
///     .build()
///     .unwrap();
/// assert!(session.config().retry_no_such);
/// ```
pub struct SessionBuilder<T: Transport> {
    transport: Option<T>,
    tree: Option<Arc<dyn NamingTree>>,
    config: SessionConfig,
}

impl<T: Transport> SessionBuilder<T> {
    /// Create a new session builder.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Some(transport),
            tree: None,
            config: SessionConfig::default(),
        }
    }

    /// A builder for a session without a transport.
    pub fn detached() -> Self {
        Self {
            transport: None,
            tree: None,
            config: SessionConfig::default(),
        }
    }

    /// Naming tree used to resolve tags (default: [`MibTree::standard`]).
    pub fn tree(mut self, tree: Arc<dyn NamingTree>) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Tag resolution aggressiveness (default: `Exact`).
    pub fn best_guess(mut self, best_guess: BestGuess) -> Self {
        self.config.best_guess = best_guess;
        self
    }

    /// Elide noSuchName objects and resubmit (default: false).
    pub fn retry_no_such(mut self, enabled: bool) -> Self {
        self.config.retry_no_such = enabled;
        self
    }

    /// Error index mapping used while eliding (default: `LastIndex`).
    pub fn elision(mut self, strategy: ElisionStrategy) -> Self {
        self.config.elision = strategy;
        self
    }

    /// Full labels from the root (default: false).
    pub fn use_long_names(mut self, enabled: bool) -> Self {
        self.config.use_long_names = enabled;
        self
    }

    /// Numeric labels (default: false).
    pub fn use_numeric(mut self, enabled: bool) -> Self {
        self.config.use_numeric = enabled;
        self
    }

    /// Enumeration labels (default: false).
    pub fn use_enums(mut self, enabled: bool) -> Self {
        self.config.use_enums = enabled;
        self
    }

    /// Library-style value rendering (default: false).
    pub fn use_sprint_value(mut self, enabled: bool) -> Self {
        self.config.use_sprint_value = enabled;
        self
    }

    /// Default GETBULK non-repeaters (default: 0).
    pub fn non_repeaters(mut self, n: u32) -> Self {
        self.config.non_repeaters = n;
        self
    }

    /// Default GETBULK max-repetitions (default: 10).
    pub fn max_repetitions(mut self, n: u32) -> Self {
        self.config.max_repetitions = n;
        self
    }

    /// String value ceiling in bytes (default: 65536).
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    /// Validate the configuration and build the session.
    pub fn build(self) -> Result<Session<T>> {
        self.config.validate()?;
        let tree = self
            .tree
            .unwrap_or_else(|| Arc::new(MibTree::standard()) as Arc<dyn NamingTree>);
        Ok(match self.transport {
            Some(transport) => Session::new(transport, tree, self.config),
            None => Session::detached(tree, self.config),
        })
    }
}
