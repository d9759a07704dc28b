//! Subtree walks.
//!
//! Each starting object is walked to completion before the next one starts.
//! A round requests the objects following the current frontier (initially
//! the starting OID) and inspects the returned variables in order:
//!
//! - `endOfMibView` ends the subtree and the rest of the response is ignored
//! - `noSuchObject`/`noSuchInstance` emits a placeholder record and ends it
//! - a name outside the starting OID's subtree ends it without a record
//! - anything else becomes a record, and the last one is the next frontier

use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::transport::Transport;
use crate::types::TypeTag;
use crate::varbind::VarBind;

use super::record::{RecordBuilder, ResultRecord};
use super::retry::Answered;
use super::{Session, Target};

/// Request shape used for each walk round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WalkKind {
    /// One GETNEXT per round.
    Next,
    /// One GETBULK per round.
    Bulk {
        non_repeaters: u32,
        max_repetitions: u32,
    },
}

impl WalkKind {
    fn request(self, request_id: i32, frontier: &Oid) -> Pdu {
        let oids = std::slice::from_ref(frontier);
        match self {
            WalkKind::Next => Pdu::get_next_request(request_id, oids),
            WalkKind::Bulk {
                non_repeaters,
                max_repetitions,
            } => Pdu::get_bulk(
                request_id,
                clamp_i32(non_repeaters),
                clamp_i32(max_repetitions),
                oids,
            ),
        }
    }
}

pub(crate) fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Outcome of inspecting one response.
#[derive(Debug, PartialEq)]
enum Step {
    /// Request again from this name.
    Continue(Oid),
    /// The subtree is finished.
    Done,
}

/// Inspect one response for the subtree rooted at `start`, appending
/// records to `out`.
fn inspect(
    root: &str,
    start: &Oid,
    varbinds: &[VarBind],
    builder: &RecordBuilder<'_>,
    out: &mut Vec<ResultRecord>,
) -> Step {
    let mut frontier = None;
    for vb in varbinds {
        let snmp_type = TypeTag::of_value(&vb.value);
        if snmp_type == TypeTag::EndOfMibView {
            tracing::debug!(target: "snmpq::session", { snmp.oid = %vb.oid }, "end of MIB view");
            return Step::Done;
        }
        if snmp_type.is_exception() {
            out.push(ResultRecord::placeholder(root, snmp_type));
            return Step::Done;
        }
        if !vb.oid.starts_with(start) {
            tracing::debug!(target: "snmpq::session", { snmp.oid = %vb.oid, snmp.root = %start }, "left the requested subtree");
            return Step::Done;
        }
        out.push(builder.record(root, vb));
        frontier = Some(&vb.oid);
    }
    match frontier {
        Some(oid) => Step::Continue(oid.clone()),
        None => Step::Done,
    }
}

impl<T: Transport> Session<T> {
    /// Walk every target in order.
    pub(crate) async fn walk_all(&self, kind: WalkKind, targets: &[Target]) -> crate::Result<Vec<ResultRecord>> {
        let builder = self.record_builder();
        let mut out = Vec::new();
        for target in targets {
            self.walk_subtree(kind, target, &builder, &mut out).await?;
        }
        Ok(out)
    }

    async fn walk_subtree(
        &self,
        kind: WalkKind,
        target: &Target,
        builder: &RecordBuilder<'_>,
        out: &mut Vec<ResultRecord>,
    ) -> crate::Result<()> {
        let before = out.len();
        let mut frontier = target.oid.clone();
        loop {
            let request = kind.request(self.next_request_id(), &frontier);
            let Some(Answered { response, .. }) = self
                .send_with_elision(request, self.inner.config.retry_no_such)
                .await?
            else {
                break;
            };

            match inspect(&target.root, &target.oid, &response.varbinds, builder, out) {
                Step::Continue(next) if next > frontier => frontier = next,
                Step::Continue(next) => {
                    tracing::warn!(target: "snmpq::session", {
                        snmp.previous = %frontier,
                        snmp.current = %next
                    }, "agent returned a non-increasing OID, ending walk");
                    break;
                }
                Step::Done => break,
            }
        }
        tracing::debug!(target: "snmpq::session", {
            snmp.root = %target.oid,
            snmp.records = out.len() - before
        }, "subtree done");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ValueFormatter;
    use crate::mib::MibTree;
    use crate::oid;
    use crate::resolve::NameStyle;
    use crate::value::Value;

    fn system() -> Oid {
        oid!(1, 3, 6, 1, 2, 1, 1)
    }

    #[test]
    fn continues_from_last_variable() {
        let tree = MibTree::standard();
        let builder = RecordBuilder::new(&tree, ValueFormatter::default(), NameStyle::Suffix);
        let vbs = [
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("r1")),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(5)),
        ];
        let mut out = Vec::new();
        let step = inspect("system", &system(), &vbs, &builder, &mut out);
        assert_eq!(step, Step::Continue(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].oid, "sysUpTime");
    }

    #[test]
    fn leaving_the_subtree_discards_the_rest() {
        let tree = MibTree::standard();
        let builder = RecordBuilder::new(&tree, ValueFormatter::default(), NameStyle::Suffix);
        let vbs = [
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 9, 1, 2, 1), Value::Integer(1)),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(4)),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 9, 1, 2, 2), Value::Integer(1)),
        ];
        let mut out = Vec::new();
        let step = inspect("system", &system(), &vbs, &builder, &mut out);
        assert_eq!(step, Step::Done);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn shorter_name_is_outside() {
        let tree = MibTree::standard();
        let builder = RecordBuilder::new(&tree, ValueFormatter::default(), NameStyle::Suffix);
        let vbs = [VarBind::new(oid!(1, 3, 6, 1, 2, 1), Value::Null)];
        let mut out = Vec::new();
        assert_eq!(inspect("system", &system(), &vbs, &builder, &mut out), Step::Done);
        assert!(out.is_empty());
    }

    #[test]
    fn exceptions_end_the_subtree() {
        let tree = MibTree::standard();
        let builder = RecordBuilder::new(&tree, ValueFormatter::default(), NameStyle::Suffix);

        let mut out = Vec::new();
        let vbs = [
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("r1")),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 2, 0), Value::EndOfMibView),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(1)),
        ];
        assert_eq!(inspect("system", &system(), &vbs, &builder, &mut out), Step::Done);
        assert_eq!(out.len(), 1);

        let mut out = Vec::new();
        let vbs = [VarBind::new(system(), Value::NoSuchObject)];
        assert_eq!(inspect("system", &system(), &vbs, &builder, &mut out), Step::Done);
        assert_eq!(out, vec![ResultRecord::placeholder("system", TypeTag::NoSuchObject)]);
    }

    #[test]
    fn empty_response_ends_the_walk() {
        let tree = MibTree::standard();
        let builder = RecordBuilder::new(&tree, ValueFormatter::default(), NameStyle::Suffix);
        let mut out = Vec::new();
        assert_eq!(inspect("system", &system(), &[], &builder, &mut out), Step::Done);
    }

    #[test]
    fn bulk_request_carries_counters() {
        let kind = WalkKind::Bulk {
            non_repeaters: 0,
            max_repetitions: u32::MAX,
        };
        let pdu = kind.request(3, &system());
        assert_eq!(pdu.error_status, 0);
        assert_eq!(pdu.error_index, i32::MAX);
        assert_eq!(pdu.oids(), vec![system()]);
    }
}
