//! Query sessions.
//!
//! A [`Session`] resolves caller tags against a naming tree, exchanges
//! requests through a [`Transport`] and renders the returned variables as
//! [`ResultRecord`]s.

mod builder;
mod config;
mod fetch;
mod record;
mod retry;
mod walk;

pub use builder::SessionBuilder;
pub use config::{DEFAULT_MAX_REPETITIONS, DEFAULT_NON_REPEATERS, SessionConfig};
pub use record::ResultRecord;
pub use retry::{EligibilityMask, ElisionStrategy};

use std::borrow::Cow;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::instrument;

use crate::error::{Error, Result};
use crate::format::ValueFormatter;
use crate::marshal;
use crate::mib::NamingTree;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::resolve::Resolver;
use crate::transport::Transport;
use crate::types::TypeTag;

use fetch::FetchKind;
use record::RecordBuilder;
use walk::WalkKind;

/// Library error number reported when a call is made without a handle.
pub const ERR_BAD_SESSION: i32 = -4;

/// An object to query: a tag plus an optional instance suffix.
///
/// ```
/// use snmpq::ObjectRef;
///
/// let a = ObjectRef::new("sysDescr", "0");
/// let b: ObjectRef = ("sysDescr", "0").into();
/// assert_eq!(a, b);
/// assert_eq!(ObjectRef::from("ifTable").instance, "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRef {
    pub tag: String,
    pub instance: String,
}

impl ObjectRef {
    pub fn new(tag: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            instance: instance.into(),
        }
    }
}

impl From<&str> for ObjectRef {
    fn from(tag: &str) -> Self {
        Self::new(tag, "")
    }
}

impl From<(&str, &str)> for ObjectRef {
    fn from((tag, instance): (&str, &str)) -> Self {
        Self::new(tag, instance)
    }
}

/// One variable to write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetItem {
    pub tag: String,
    pub instance: String,
    /// Type specifier (`i`, `s`, `INTEGER`, ...), used when the naming tree
    /// has no type for the object. May be empty.
    pub type_spec: String,
    pub value: String,
}

impl SetItem {
    pub fn new(tag: impl Into<String>, instance: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            instance: instance.into(),
            type_spec: String::new(),
            value: value.into(),
        }
    }

    /// Set the fallback type specifier.
    pub fn with_type(mut self, type_spec: impl Into<String>) -> Self {
        self.type_spec = type_spec.into();
        self
    }
}

/// Error details from the most recent call.
///
/// Reset at the start of every call and filled in when it fails remotely or
/// at the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LastError {
    /// Description of the failure.
    pub error_string: String,
    /// Agent error status, or the system errno for transport failures.
    pub error_number: i32,
    /// Agent error index, or the library errno for transport failures.
    pub error_index: i32,
}

impl LastError {
    fn bad_session() -> Self {
        Self {
            error_string: "Bad session".to_string(),
            error_number: 0,
            error_index: ERR_BAD_SESSION,
        }
    }

    /// True when the last call recorded no error.
    pub fn is_clear(&self) -> bool {
        self.error_number == 0 && self.error_index == 0 && self.error_string.is_empty()
    }
}

/// A resolved batch entry.
#[derive(Debug, Clone)]
pub(crate) struct Target {
    /// The tag as the caller wrote it.
    pub(crate) root: String,
    pub(crate) oid: Oid,
}

/// SNMP query session.
///
/// Cheap to clone; clones share the transport, naming tree, configuration
/// and last-error state. Calls on one session are serialized.
///
/// # Example
///
/// ```rust,ignore
/// use snmpq::transport::{MockTransport, ResponseBuilder};
/// use snmpq::{ObjectRef, Session, TypeTag, Value, oid};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> snmpq::Result<()> {
/// let mut mock = MockTransport::new("192.0.2.1:161".parse().unwrap());
/// mock.queue_response(
///     ResponseBuilder::new(0)
///         .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("Linux r1"))
///         .build(),
/// );
///
/// let session = Session::builder(mock).build()?;
/// let records = session.get(&[ObjectRef::new("sysDescr", "0")]).await?;
/// assert_eq!(records[0].snmp_type, TypeTag::OctetStr);
/// assert_eq!(records[0].value, "Linux r1");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session<T: Transport> {
    inner: Arc<SessionInner<T>>,
}

struct SessionInner<T: Transport> {
    handle: RwLock<Option<T>>,
    tree: Arc<dyn NamingTree>,
    config: SessionConfig,
    last_error: RwLock<LastError>,
    request_id: AtomicI32,
    /// Held for the duration of each call.
    gate: tokio::sync::Mutex<()>,
}

impl<T: Transport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("target", &self.target())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Session<T> {
    /// Create a session builder around `transport`.
    pub fn builder(transport: T) -> SessionBuilder<T> {
        SessionBuilder::new(transport)
    }

    /// Create a session with the given transport, tree and config.
    pub fn new(transport: T, tree: Arc<dyn NamingTree>, config: SessionConfig) -> Self {
        Self::with_handle(Some(transport), tree, config)
    }

    /// Create a session without a transport. Every request fails with
    /// [`Error::Connection`] without touching the network.
    pub fn detached(tree: Arc<dyn NamingTree>, config: SessionConfig) -> Self {
        Self::with_handle(None, tree, config)
    }

    fn with_handle(handle: Option<T>, tree: Arc<dyn NamingTree>, config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                handle: RwLock::new(handle),
                tree,
                config,
                last_error: RwLock::new(LastError::default()),
                request_id: AtomicI32::new(1),
                gate: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// The naming tree tags are resolved against.
    pub fn tree(&self) -> &dyn NamingTree {
        self.inner.tree.as_ref()
    }

    /// Peer address, or `<closed>` without a handle.
    pub fn target(&self) -> String {
        self.handle()
            .map_or_else(|| "<closed>".to_string(), |h| h.peer_addr().to_string())
    }

    /// Whether the session still has a transport handle.
    pub fn is_open(&self) -> bool {
        self.inner
            .handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drop the transport handle. Later calls fail with
    /// [`Error::Connection`].
    pub fn close(&self) {
        let handle = self
            .inner
            .handle
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if handle.is_some() {
            tracing::debug!(target: "snmpq::session", "session closed");
        }
    }

    /// Error details from the most recent call.
    pub fn last_error(&self) -> LastError {
        self.inner
            .last_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn handle(&self) -> Option<T> {
        self.inner
            .handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record_error(&self, error: LastError) {
        *self
            .inner
            .last_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = error;
    }

    fn next_request_id(&self) -> i32 {
        self.inner.request_id.fetch_add(1, Ordering::Relaxed) & i32::MAX
    }

    fn record_builder(&self) -> RecordBuilder<'_> {
        let config = &self.inner.config;
        RecordBuilder::new(
            self.tree(),
            ValueFormatter::new(config.format_options()),
            config.name_style(),
        )
    }

    fn resolve_all(&self, objects: &[ObjectRef]) -> Result<Vec<Target>> {
        let resolver = Resolver::new(self.tree());
        objects
            .iter()
            .map(|object| {
                let resolved = resolver.resolve(&object.tag, &object.instance, self.inner.config.best_guess)?;
                Ok(Target {
                    root: object.tag.clone(),
                    oid: resolved.oid,
                })
            })
            .collect()
    }

    /// Resolve, then run `f` with the call gate held and last-error reset.
    async fn call<F, Fut>(&self, objects: &[ObjectRef], f: F) -> Result<Vec<ResultRecord>>
    where
        F: FnOnce(Vec<Target>) -> Fut,
        Fut: Future<Output = Result<Vec<ResultRecord>>>,
    {
        let _gate = self.inner.gate.lock().await;
        self.record_error(LastError::default());
        if objects.is_empty() {
            return Ok(Vec::new());
        }
        let targets = self.resolve_all(objects)?;
        f(targets).await
    }

    /// GET every object in one request.
    ///
    /// Objects the agent reports as `noSuchObject`/`noSuchInstance` yield a
    /// placeholder record.
    #[instrument(skip(self, objects), err, fields(snmp.target = %self.target(), snmp.oid_count = objects.len()))]
    pub async fn get(&self, objects: &[ObjectRef]) -> Result<Vec<ResultRecord>> {
        self.call(objects, |targets| async move {
            self.fetch(FetchKind::Get, &targets).await
        })
        .await
    }

    /// GETNEXT every object in one request.
    #[instrument(skip(self, objects), err, fields(snmp.target = %self.target(), snmp.oid_count = objects.len()))]
    pub async fn get_next(&self, objects: &[ObjectRef]) -> Result<Vec<ResultRecord>> {
        self.call(objects, |targets| async move {
            self.fetch(FetchKind::GetNext, &targets).await
        })
        .await
    }

    /// GETBULK with the configured non-repeaters and max-repetitions.
    pub async fn get_bulk(&self, objects: &[ObjectRef]) -> Result<Vec<ResultRecord>> {
        let config = &self.inner.config;
        self.get_bulk_with(objects, config.non_repeaters, config.max_repetitions)
            .await
    }

    /// GETBULK every object in one request.
    #[instrument(skip(self, objects), err, fields(
        snmp.target = %self.target(),
        snmp.oid_count = objects.len(),
        snmp.non_repeaters = non_repeaters,
        snmp.max_repetitions = max_repetitions
    ))]
    pub async fn get_bulk_with(
        &self,
        objects: &[ObjectRef],
        non_repeaters: u32,
        max_repetitions: u32,
    ) -> Result<Vec<ResultRecord>> {
        let kind = FetchKind::GetBulk {
            non_repeaters,
            max_repetitions,
        };
        self.call(objects, |targets| async move { self.fetch(kind, &targets).await })
            .await
    }

    /// Walk the subtree under each object with GETNEXT.
    #[instrument(skip(self, objects), err, fields(snmp.target = %self.target(), snmp.oid_count = objects.len()))]
    pub async fn walk(&self, objects: &[ObjectRef]) -> Result<Vec<ResultRecord>> {
        self.call(objects, |targets| async move {
            self.walk_all(WalkKind::Next, &targets).await
        })
        .await
    }

    /// Walk with GETBULK using the configured counters.
    pub async fn bulk_walk(&self, objects: &[ObjectRef]) -> Result<Vec<ResultRecord>> {
        let config = &self.inner.config;
        self.bulk_walk_with(objects, config.non_repeaters, config.max_repetitions)
            .await
    }

    /// Walk the subtree under each object with GETBULK.
    #[instrument(skip(self, objects), err, fields(
        snmp.target = %self.target(),
        snmp.oid_count = objects.len(),
        snmp.non_repeaters = non_repeaters,
        snmp.max_repetitions = max_repetitions
    ))]
    pub async fn bulk_walk_with(
        &self,
        objects: &[ObjectRef],
        non_repeaters: u32,
        max_repetitions: u32,
    ) -> Result<Vec<ResultRecord>> {
        let kind = WalkKind::Bulk {
            non_repeaters,
            max_repetitions,
        };
        self.call(objects, |targets| async move { self.walk_all(kind, &targets).await })
            .await
    }

    /// SET every item in one request.
    ///
    /// The type comes from the naming tree, else from the item's type
    /// specifier. With `use_enums`, INTEGER values may be enumeration labels.
    /// Values that can't be encoded are sent as placeholders with a warning.
    /// Agent errors are also left in [`last_error`](Self::last_error).
    #[instrument(skip(self, items), err, fields(snmp.target = %self.target(), snmp.oid_count = items.len()))]
    pub async fn set(&self, items: &[SetItem]) -> Result<()> {
        let _gate = self.inner.gate.lock().await;
        self.record_error(LastError::default());
        if items.is_empty() {
            return Ok(());
        }

        let request = self.build_set(items)?;
        self.send_with_elision(request, false).await?;
        Ok(())
    }

    fn build_set(&self, items: &[SetItem]) -> Result<Pdu> {
        let tree = self.tree();
        let resolver = Resolver::new(tree);
        let mut varbinds = Vec::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            let resolved = resolver.resolve(&item.tag, &item.instance, self.inner.config.best_guess)?;
            let type_tag = match resolved.syntax.filter(|t| *t != TypeTag::Other) {
                Some(t) => t,
                None => match TypeTag::parse_spec(&item.type_spec) {
                    TypeTag::Unknown | TypeTag::Other => {
                        return Err(Error::UndeterminedType {
                            tag: item.tag.as_str().into(),
                        }
                        .boxed());
                    }
                    t => t,
                },
            };

            let enum_value = if self.inner.config.use_enums
                && matches!(type_tag, TypeTag::Integer | TypeTag::Integer32)
            {
                tree.node_by_oid(resolved.oid.arcs())
                    .and_then(|(id, _)| tree.node(id))
                    .and_then(|node| node.enum_value(&item.value))
            } else {
                None
            };
            let text: Cow<'_, str> = match enum_value {
                Some(value) => Cow::Owned(value.to_string()),
                None => Cow::Borrowed(&item.value),
            };

            let built = marshal::build(tree, resolved.oid, type_tag, &text);
            if let Some(failure) = &built.failure {
                tracing::debug!(target: "snmpq::session", {
                    snmp.item = position,
                    snmp.tag = %item.tag,
                    error = %failure
                }, "sending placeholder for item");
            }
            varbinds.push(built.varbind);
        }
        Ok(Pdu::set_request(self.next_request_id(), varbinds))
    }
}
