//! Batched GET, GETNEXT and GETBULK.
//!
//! The whole batch goes out in one request. After any elision, the response
//! varbinds answer the entries still in the request, in order; GETBULK
//! responses list the non-repeaters first and then the repeaters
//! round-robin.

use crate::pdu::Pdu;
use crate::transport::Transport;
use crate::types::TypeTag;

use super::record::ResultRecord;
use super::retry::Answered;
use super::walk::clamp_i32;
use super::{Session, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchKind {
    Get,
    GetNext,
    GetBulk {
        non_repeaters: u32,
        max_repetitions: u32,
    },
}

impl FetchKind {
    fn request(self, request_id: i32, targets: &[Target]) -> Pdu {
        let oids: Vec<_> = targets.iter().map(|t| t.oid.clone()).collect();
        match self {
            FetchKind::Get => Pdu::get_request(request_id, &oids),
            FetchKind::GetNext => Pdu::get_next_request(request_id, &oids),
            FetchKind::GetBulk {
                non_repeaters,
                max_repetitions,
            } => Pdu::get_bulk(
                request_id,
                clamp_i32(non_repeaters),
                clamp_i32(max_repetitions),
                &oids,
            ),
        }
    }

    /// Non-repeaters among the entries still in the request.
    fn non_repeaters(self, remaining: &[usize]) -> usize {
        match self {
            FetchKind::GetBulk { non_repeaters, .. } => remaining
                .iter()
                .filter(|i| **i < non_repeaters as usize)
                .count(),
            _ => remaining.len(),
        }
    }
}

/// Batch entry answered by the `position`-th response varbind.
fn owner(position: usize, remaining: &[usize], non_repeaters: usize) -> Option<usize> {
    if position < non_repeaters {
        return remaining.get(position).copied();
    }
    let repeaters = remaining.len().checked_sub(non_repeaters)?;
    if repeaters == 0 {
        return None;
    }
    remaining
        .get(non_repeaters + (position - non_repeaters) % repeaters)
        .copied()
}

impl<T: Transport> Session<T> {
    pub(crate) async fn fetch(&self, kind: FetchKind, targets: &[Target]) -> crate::Result<Vec<ResultRecord>> {
        let request = kind.request(self.next_request_id(), targets);
        let Some(Answered { response, positions: remaining }) = self
            .send_with_elision(request, self.inner.config.retry_no_such)
            .await?
        else {
            return Ok(Vec::new());
        };

        let non_repeaters = kind.non_repeaters(&remaining);
        let builder = self.record_builder();
        let mut out = Vec::with_capacity(response.varbinds.len());

        for (position, vb) in response.varbinds.iter().enumerate() {
            let root = match owner(position, &remaining, non_repeaters) {
                Some(index) => targets[index].root.as_str(),
                None => {
                    tracing::debug!(target: "snmpq::session", { snmp.position = position, snmp.oid = %vb.oid }, "response varbind has no matching request entry");
                    ""
                }
            };
            let snmp_type = TypeTag::of_value(&vb.value);
            match snmp_type {
                TypeTag::EndOfMibView => {}
                TypeTag::NoSuchObject | TypeTag::NoSuchInstance => {
                    out.push(ResultRecord::placeholder(root, snmp_type));
                }
                _ => out.push(builder.record(root, vb)),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_requests_map_one_to_one() {
        let remaining = [0, 2, 3];
        assert_eq!(owner(0, &remaining, 3), Some(0));
        assert_eq!(owner(1, &remaining, 3), Some(2));
        assert_eq!(owner(2, &remaining, 3), Some(3));
        assert_eq!(owner(3, &remaining, 3), None);
    }

    #[test]
    fn bulk_repeaters_cycle() {
        // one non-repeater, two repeaters
        let remaining = [0, 1, 2];
        let owners: Vec<_> = (0..5).map(|p| owner(p, &remaining, 1)).collect();
        assert_eq!(owners, vec![Some(0), Some(1), Some(2), Some(1), Some(2)]);
    }

    #[test]
    fn bulk_without_repeaters() {
        assert_eq!(owner(2, &[0, 1], 2), None);
    }

    #[test]
    fn elided_non_repeaters_shrink_the_count() {
        let kind = FetchKind::GetBulk {
            non_repeaters: 2,
            max_repetitions: 5,
        };
        // entry 0 was a non-repeater and has been elided
        assert_eq!(kind.non_repeaters(&[1, 2, 3]), 1);
        assert_eq!(FetchKind::Get.non_repeaters(&[1, 2, 3]), 3);
    }
}
