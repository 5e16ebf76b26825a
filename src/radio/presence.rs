use std::collections::HashMap;

use parking_lot::Mutex;
use serde::Serialize;

use crate::common::{ListenerId, RadioError, UnixMillis};
use crate::radio::classifier::ListenerCategory;

/// One listener's bookkeeping entry. `joined_at_ms` is immutable after join;
/// only heartbeats move `last_heartbeat_ms`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerRecord {
    pub id: ListenerId,
    pub category: ListenerCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub joined_at_ms: UnixMillis,
    pub last_heartbeat_ms: UnixMillis,
}

/// Live-only aggregate view of the tracker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSnapshot {
    pub total: usize,
    pub agents: usize,
    pub humans: usize,
    pub anonymous: usize,
    pub records: Vec<ListenerRecord>,
}

/// Registry of connected listeners. A single mutex serializes every mutation
/// (join/heartbeat/leave/sweep), so two racing heartbeats cannot lose an
/// update and a snapshot never observes a half-applied operation.
///
/// Per listener: `Joined -> heartbeat* -> Left | Expired`, both terminal.
/// A reconnecting client goes through `join` again and gets a fresh id.
pub struct PresenceTracker {
    records: Mutex<HashMap<ListenerId, ListenerRecord>>,
    timeout_ms: u64,
}

impl PresenceTracker {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            timeout_ms,
        }
    }

    /// Registers a new listener with `joined_at = last_heartbeat = now`.
    pub fn join(
        &self,
        category: ListenerCategory,
        display_name: Option<String>,
        now_ms: UnixMillis,
    ) -> ListenerRecord {
        let record = ListenerRecord {
            id: ListenerId::generate(),
            category,
            display_name,
            joined_at_ms: now_ms,
            last_heartbeat_ms: now_ms,
        };
        self.records
            .lock()
            .insert(record.id.clone(), record.clone());
        record
    }

    /// Advances `last_heartbeat` for a live record. An unknown id, or one
    /// that already outlived the timeout, is `NotFound`; the stale record is
    /// dropped on the spot rather than revived, so `joined_at` semantics
    /// survive (callers re-join for a fresh id).
    pub fn heartbeat(&self, id: &ListenerId, now_ms: UnixMillis) -> Result<(), RadioError> {
        let mut records = self.records.lock();
        match records.get_mut(id) {
            Some(record) if is_live(record, now_ms, self.timeout_ms) => {
                record.last_heartbeat_ms = record.last_heartbeat_ms.max(now_ms);
                Ok(())
            }
            Some(_) => {
                records.remove(id);
                Err(RadioError::NotFound(format!("listener {}", id)))
            }
            None => Err(RadioError::NotFound(format!("listener {}", id))),
        }
    }

    /// Explicit removal. Returns the removed record for event fan-out.
    pub fn leave(&self, id: &ListenerId) -> Result<ListenerRecord, RadioError> {
        self.records
            .lock()
            .remove(id)
            .ok_or_else(|| RadioError::NotFound(format!("listener {}", id)))
    }

    /// Evicts every record without a heartbeat inside the timeout window and
    /// returns what was removed. The only defense against unbounded growth
    /// from silently disconnected clients.
    pub fn sweep_expired(&self, now_ms: UnixMillis) -> Vec<ListenerRecord> {
        let mut records = self.records.lock();
        let expired: Vec<ListenerId> = records
            .values()
            .filter(|r| !is_live(r, now_ms, self.timeout_ms))
            .map(|r| r.id.clone())
            .collect();
        expired
            .iter()
            .filter_map(|id| records.remove(id))
            .collect()
    }

    /// Read-time liveness aggregate. Gives the same answer as running
    /// `sweep_expired` first, without mutating anything.
    pub fn snapshot(&self, now_ms: UnixMillis) -> PresenceSnapshot {
        let records = self.records.lock();
        let mut live: Vec<ListenerRecord> = records
            .values()
            .filter(|r| is_live(r, now_ms, self.timeout_ms))
            .cloned()
            .collect();
        live.sort_by(|a, b| a.joined_at_ms.cmp(&b.joined_at_ms).then(a.id.0.cmp(&b.id.0)));

        let count = |c: ListenerCategory| live.iter().filter(|r| r.category == c).count();
        PresenceSnapshot {
            total: live.len(),
            agents: count(ListenerCategory::Agent),
            humans: count(ListenerCategory::Human),
            anonymous: count(ListenerCategory::Anonymous),
            records: live,
        }
    }
}

/// Live iff the last heartbeat is within the timeout window (inclusive).
fn is_live(record: &ListenerRecord, now_ms: UnixMillis, timeout_ms: u64) -> bool {
    now_ms.saturating_sub(record.last_heartbeat_ms) <= timeout_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: u64 = 60_000;

    fn tracker() -> PresenceTracker {
        PresenceTracker::new(TIMEOUT)
    }

    #[test]
    fn live_at_59s_expired_at_61s() {
        let t = tracker();
        let record = t.join(ListenerCategory::Human, None, 0);

        assert_eq!(t.snapshot(59_000).total, 1);
        assert_eq!(t.snapshot(61_000).total, 0);
        // Still present until swept; the read-time filter just hides it.
        assert_eq!(t.sweep_expired(61_000).len(), 1);
        assert!(t.leave(&record.id).is_err());
    }

    #[test]
    fn heartbeat_extends_liveness() {
        let t = tracker();
        let record = t.join(ListenerCategory::Agent, Some("Deepmind Molt".into()), 0);

        t.heartbeat(&record.id, 50_000).unwrap();
        assert_eq!(t.snapshot(100_000).total, 1);
        assert_eq!(t.snapshot(111_000).total, 0);
    }

    #[test]
    fn heartbeat_never_touches_joined_at() {
        let t = tracker();
        let record = t.join(ListenerCategory::Agent, None, 1_000);

        t.heartbeat(&record.id, 20_000).unwrap();
        t.heartbeat(&record.id, 40_000).unwrap();

        let snap = t.snapshot(40_000);
        assert_eq!(snap.records[0].joined_at_ms, 1_000);
        assert_eq!(snap.records[0].last_heartbeat_ms, 40_000);
    }

    #[test]
    fn out_of_order_heartbeats_keep_latest() {
        // Two heartbeats at t1 < t2 must leave last_heartbeat == t2 whichever
        // order they are applied in.
        let t = tracker();
        let record = t.join(ListenerCategory::Human, None, 0);

        t.heartbeat(&record.id, 30_000).unwrap();
        t.heartbeat(&record.id, 10_000).unwrap();

        assert_eq!(t.snapshot(30_000).records[0].last_heartbeat_ms, 30_000);
    }

    #[test]
    fn concurrent_heartbeats_keep_latest_timestamp() {
        use std::sync::Arc;

        let t = Arc::new(tracker());
        let record = t.join(ListenerCategory::Agent, None, 0);

        let handles: Vec<_> = (1..=8u64)
            .map(|i| {
                let t = t.clone();
                let id = record.id.clone();
                std::thread::spawn(move || t.heartbeat(&id, i * 1_000).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(t.snapshot(8_000).records[0].last_heartbeat_ms, 8_000);
    }

    #[test]
    fn heartbeat_on_unknown_id_is_not_found() {
        let t = tracker();
        let err = t.heartbeat(&ListenerId("nope".into()), 0).unwrap_err();
        assert!(matches!(err, RadioError::NotFound(_)));
    }

    #[test]
    fn heartbeat_on_expired_record_is_not_found_and_drops_it() {
        let t = tracker();
        let record = t.join(ListenerCategory::Anonymous, None, 0);

        let err = t.heartbeat(&record.id, 61_000).unwrap_err();
        assert!(matches!(err, RadioError::NotFound(_)));
        // Record is gone, not revived: a later in-window heartbeat also fails.
        assert!(t.heartbeat(&record.id, 62_000).is_err());
    }

    #[test]
    fn leave_is_terminal() {
        let t = tracker();
        let record = t.join(ListenerCategory::Human, None, 0);

        t.leave(&record.id).unwrap();
        assert!(t.leave(&record.id).is_err());
        assert!(t.heartbeat(&record.id, 1_000).is_err());
        assert_eq!(t.snapshot(1_000).total, 0);
    }

    #[test]
    fn snapshot_counts_by_category() {
        let t = tracker();
        t.join(ListenerCategory::Agent, None, 0);
        t.join(ListenerCategory::Agent, None, 0);
        t.join(ListenerCategory::Human, None, 0);
        t.join(ListenerCategory::Anonymous, None, 0);

        let snap = t.snapshot(0);
        assert_eq!(snap.total, 4);
        assert_eq!(snap.agents, 2);
        assert_eq!(snap.humans, 1);
        assert_eq!(snap.anonymous, 1);
    }

    #[test]
    fn snapshot_agrees_with_sweep() {
        let t = tracker();
        t.join(ListenerCategory::Agent, None, 0);
        let live = t.join(ListenerCategory::Human, None, 0);
        t.heartbeat(&live.id, 40_000).unwrap();

        let before = t.snapshot(70_000);
        let removed = t.sweep_expired(70_000);
        let after = t.snapshot(70_000);

        assert_eq!(removed.len(), 1);
        assert_eq!(before.total, after.total);
        assert_eq!(after.total, 1);
        assert_eq!(after.records[0].id, live.id);
    }

    #[test]
    fn sweep_returns_removed_records() {
        let t = tracker();
        let a = t.join(ListenerCategory::Agent, Some("a".into()), 0);
        let removed = t.sweep_expired(61_000);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, a.id);
        assert_eq!(t.sweep_expired(61_000).len(), 0);
    }

    #[test]
    fn rejoin_gets_a_fresh_id() {
        let t = tracker();
        let first = t.join(ListenerCategory::Human, Some("bob".into()), 0);
        t.leave(&first.id).unwrap();
        let second = t.join(ListenerCategory::Human, Some("bob".into()), 1_000);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn snapshot_orders_by_join_time() {
        let t = tracker();
        t.join(ListenerCategory::Human, Some("late".into()), 5_000);
        t.join(ListenerCategory::Human, Some("early".into()), 1_000);

        let snap = t.snapshot(5_000);
        assert_eq!(snap.records[0].display_name.as_deref(), Some("early"));
        assert_eq!(snap.records[1].display_name.as_deref(), Some("late"));
    }
}
