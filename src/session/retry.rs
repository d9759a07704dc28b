//! Request exchange with noSuchName elision.
//!
//! A batched request that names objects the agent doesn't have fails as a
//! whole with `noSuchName` and the 1-based index of one offending entry. When
//! the session opts in, the offending entry is removed and the shrunken
//! request resubmitted until the agent accepts the rest or nothing is left.
//! Each round strictly shrinks the request, so the loop always terminates.
//!
//! The index reported in each round is relative to the *current* request, so
//! mapping it back to the caller's batch needs bookkeeping; see
//! [`ElisionStrategy`].

use tracing::Span;

use crate::error::{Error, ErrorStatus, Result};
use crate::pdu::Pdu;
use crate::transport::{ExchangeError, Transport};

use super::{LastError, Session};

/// Maps a reported error index back to an entry of the original batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElisionStrategy {
    /// Compare with the previously reported index. A smaller index is taken
    /// as is (agent reports in descending order); otherwise the number of
    /// rounds so far is added (agent reports in ascending order).
    #[default]
    LastIndex,
    /// Take the reported index as a rank among the entries still present.
    /// Exact for any reporting order.
    Rank,
}

/// One bit per original batch entry, set once the entry has been elided.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EligibilityMask {
    words: Vec<u64>,
    len: usize,
}

impl EligibilityMask {
    /// A mask for `len` entries, none elided.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Number of entries covered.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Mark `index` elided, growing the mask if needed. Returns false if it
    /// already was.
    pub fn set(&mut self, index: usize) -> bool {
        if index >= self.len {
            self.len = index + 1;
            self.words.resize(self.len.div_ceil(64), 0);
        }
        let (word, bit) = (index / 64, 1u64 << (index % 64));
        let fresh = self.words[word] & bit == 0;
        self.words[word] |= bit;
        fresh
    }

    /// Whether `index` has been elided.
    pub fn is_set(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|w| w & (1u64 << (index % 64)) != 0)
    }

    /// Number of elided entries.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Indexes of entries still in the request, ascending.
    pub fn remaining(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|i| !self.is_set(*i))
    }

    /// The `rank`-th (0-based) entry still in the request.
    pub fn nth_remaining(&self, rank: usize) -> Option<usize> {
        self.remaining().nth(rank)
    }
}

/// Error index bookkeeping for one call.
#[derive(Debug)]
pub(crate) struct IndexTracker {
    strategy: ElisionStrategy,
    last: u32,
    rounds: usize,
}

impl IndexTracker {
    pub(crate) fn new(strategy: ElisionStrategy) -> Self {
        Self {
            strategy,
            last: 0,
            rounds: 0,
        }
    }

    /// Original batch index for a 1-based `reported` index, or `None` when
    /// it cannot be mapped. Each mapped index counts as one round.
    pub(crate) fn original_index(&mut self, reported: u32, mask: &EligibilityMask) -> Option<usize> {
        let relative = (reported as usize).checked_sub(1)?;
        let index = match self.strategy {
            ElisionStrategy::LastIndex => {
                if self.last == 0 || self.last > reported {
                    relative
                } else {
                    relative + self.rounds
                }
            }
            ElisionStrategy::Rank => mask.nth_remaining(relative)?,
        };
        self.last = reported;
        self.rounds += 1;
        Some(index)
    }
}

/// A response and the batch entries its request still carried.
#[derive(Debug)]
pub(crate) struct Answered {
    pub(crate) response: Pdu,
    /// Original batch index of each varbind in the answered request.
    pub(crate) positions: Vec<usize>,
}

impl<T: Transport> Session<T> {
    /// Exchange `request`, eliding noSuchName entries when enabled.
    ///
    /// Returns `Ok(None)` when every entry was elided. The positions of the
    /// answer follow the varbinds actually removed, whatever the tracker
    /// guessed.
    #[tracing::instrument(
        level = "debug",
        skip(self, request),
        fields(
            snmp.pdu_type = %request.pdu_type,
            snmp.varbind_count = request.varbinds.len(),
            snmp.retry = tracing::field::Empty,
        )
    )]
    pub(crate) async fn send_with_elision(
        &self,
        mut request: Pdu,
        retry_no_such: bool,
    ) -> Result<Option<Answered>> {
        let Some(handle) = self.handle() else {
            self.record_error(LastError::bad_session());
            return Err(Error::Connection {
                reason: "session has no transport handle".into(),
            }
            .boxed());
        };
        let target: Box<str> = handle.peer_addr().to_string().into();
        let mut tracker = IndexTracker::new(self.inner.config.elision);
        let mut mask = EligibilityMask::new(request.varbinds.len());
        let mut positions: Vec<usize> = (0..request.varbinds.len()).collect();

        let mut round = 0usize;
        loop {
            Span::current().record("snmp.retry", round);
            round += 1;
            let response = match handle.exchange(request.clone()).await {
                Ok(response) => response,
                Err(err) => return Err(self.exchange_failure(&handle, &target, err)),
            };

            tracing::debug!(target: "snmpq::session", {
                snmp.pdu_type = %response.pdu_type,
                snmp.varbind_count = response.varbinds.len(),
                snmp.error_status = response.error_status,
                snmp.error_index = response.error_index
            }, "received {} response", response.pdu_type);

            let status = response.error_status_enum();
            let index = response.error_index;
            match status {
                ErrorStatus::NoError => return Ok(Some(Answered { response, positions })),
                ErrorStatus::NoSuchName if retry_no_such => {
                    let reported = u32::try_from(index).unwrap_or(0);
                    match tracker.original_index(reported, &mask) {
                        Some(original) if original < mask.len() && mask.set(original) => {
                            tracing::debug!(target: "snmpq::session", {
                                snmp.error_index = index,
                                snmp.batch_index = original
                            }, "eliding object");
                        }
                        other => {
                            tracing::warn!(target: "snmpq::session", {
                                snmp.error_index = index,
                                snmp.batch_index = ?other
                            }, "error index does not map to a fresh batch entry");
                        }
                    }

                    if request.elide(index).is_none() {
                        tracing::debug!(target: "snmpq::session", { snmp.error_index = index }, "error index outside request");
                        return Err(self.remote_failure(&target, status, index, &request));
                    }
                    positions.remove(reported as usize - 1);
                    if request.varbinds.is_empty() {
                        tracing::debug!(target: "snmpq::session", "every object elided");
                        return Ok(None);
                    }
                    request.request_id = self.next_request_id();
                }
                _ => {
                    tracing::debug!(target: "snmpq::session", {
                        snmp.error_status = %status,
                        snmp.error_index = index
                    }, "agent reported an error");
                    return Err(self.remote_failure(&target, status, index, &request));
                }
            }
        }
    }

    fn remote_failure(&self, target: &str, status: ErrorStatus, index: i32, request: &Pdu) -> Box<Error> {
        self.record_error(LastError {
            error_string: status.to_string(),
            error_number: status.as_i32(),
            error_index: index,
        });
        let oid = request.oid_at_error_index(index).cloned();
        let index = u32::try_from(index).unwrap_or(0);
        let error = if status == ErrorStatus::NoSuchName {
            Error::NoSuchName {
                target: target.into(),
                index,
                oid,
            }
        } else {
            Error::Snmp {
                target: target.into(),
                status,
                index,
                oid,
            }
        };
        error.boxed()
    }

    fn exchange_failure(&self, handle: &T, target: &str, err: ExchangeError) -> Box<Error> {
        let diagnostics = handle.diagnostics();
        // Some transports report a timeout as a generic failure.
        let timed_out = err == ExchangeError::Timeout || diagnostics.text.contains("Timeout");
        tracing::debug!(target: "snmpq::session", {
            snmp.timeout = timed_out,
            snmp.sys_errno = diagnostics.sys_errno,
            snmp.snmp_errno = diagnostics.snmp_errno,
            snmp.diagnostic = %diagnostics.text
        }, "exchange failed");

        let diagnostic: Box<str> = diagnostics.text.as_str().into();
        self.record_error(LastError {
            error_string: diagnostics.text,
            error_number: diagnostics.sys_errno,
            error_index: diagnostics.snmp_errno,
        });
        if timed_out {
            Error::Timeout {
                target: target.into(),
                diagnostic,
            }
            .boxed()
        } else {
            Error::Exchange {
                target: target.into(),
                diagnostic,
            }
            .boxed()
        }
    }
}
