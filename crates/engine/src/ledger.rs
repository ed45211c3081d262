// Identity ledger: provisional → confirmed id mappings for the session.
//
// Create operations mint a provisional id before the store has said
// anything; once the store confirms, the mapping is recorded here and every
// later operation that receives an id of ambiguous provenance resolves it
// through the ledger. Entries are append-only — provisional ids are never
// reused, so stale entries are harmless.
//
// This component never fails, by design: reconciliation must not be
// blockable by ledger errors.

use std::collections::HashMap;

use chrono::Utc;
use tracing::warn;

use taskdeck_common::id::{TaskId, PROVISIONAL_FLOOR};

/// Session-lifetime mapping from provisional to confirmed task ids.
#[derive(Debug, Default)]
pub struct IdentityLedger {
    map: HashMap<u64, u64>,
    last_minted: u64,
}

impl IdentityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh provisional id: the millisecond clock, bumped past the
    /// previous mint so two creates in the same millisecond stay distinct,
    /// and clamped above the store-id ceiling.
    pub fn mint(&mut self) -> TaskId {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        let next = now_ms.max(self.last_minted + 1).max(PROVISIONAL_FLOOR);
        self.last_minted = next;
        TaskId::Provisional(next)
    }

    /// Resolve an id of ambiguous provenance.
    ///
    /// Confirmed ids pass through unchanged. A provisional id resolves to
    /// its confirmed counterpart if the create has been acknowledged, and
    /// passes through unchanged while still pending.
    pub fn resolve(&self, id: TaskId) -> TaskId {
        match id {
            TaskId::Confirmed(_) => id,
            TaskId::Provisional(p) => match self.map.get(&p) {
                Some(&c) => TaskId::Confirmed(c),
                None => id,
            },
        }
    }

    /// Record a confirmed mapping. Idempotent; re-recording a different
    /// confirmed id for the same provisional id overwrites (last write
    /// wins) with a warning, since it indicates a misbehaving caller.
    pub fn record(&mut self, provisional: u64, confirmed: u64) {
        if let Some(&existing) = self.map.get(&provisional) {
            if existing == confirmed {
                return;
            }
            warn!(provisional, existing, confirmed, "remapping already-confirmed provisional id");
        }
        self.map.insert(provisional, confirmed);
    }

    /// Number of recorded mappings.
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Minting ─────────────────────────────────────────────────────

    #[test]
    fn mint_is_above_the_floor() {
        let mut ledger = IdentityLedger::new();
        let id = ledger.mint();
        assert!(id.is_provisional());
        assert!(id.as_u64() >= PROVISIONAL_FLOOR);
    }

    #[test]
    fn mint_never_repeats() {
        let mut ledger = IdentityLedger::new();
        let a = ledger.mint();
        let b = ledger.mint();
        let c = ledger.mint();
        assert!(a.as_u64() < b.as_u64());
        assert!(b.as_u64() < c.as_u64());
    }

    // ── Resolution ──────────────────────────────────────────────────

    #[test]
    fn confirmed_ids_pass_through() {
        let ledger = IdentityLedger::new();
        assert_eq!(ledger.resolve(TaskId::Confirmed(5)), TaskId::Confirmed(5));
    }

    #[test]
    fn unmapped_provisional_passes_through() {
        let ledger = IdentityLedger::new();
        let p = TaskId::Provisional(PROVISIONAL_FLOOR + 1);
        assert_eq!(ledger.resolve(p), p);
    }

    #[test]
    fn mapped_provisional_resolves_to_confirmed() {
        let mut ledger = IdentityLedger::new();
        let p = ledger.mint();
        ledger.record(p.as_u64(), 42);
        assert_eq!(ledger.resolve(p), TaskId::Confirmed(42));
    }

    // ── Recording ───────────────────────────────────────────────────

    #[test]
    fn record_is_idempotent() {
        let mut ledger = IdentityLedger::new();
        ledger.record(PROVISIONAL_FLOOR + 1, 7);
        ledger.record(PROVISIONAL_FLOOR + 1, 7);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.resolve(TaskId::Provisional(PROVISIONAL_FLOOR + 1)), TaskId::Confirmed(7));
    }

    #[test]
    fn conflicting_record_overwrites() {
        let mut ledger = IdentityLedger::new();
        ledger.record(PROVISIONAL_FLOOR + 1, 7);
        ledger.record(PROVISIONAL_FLOOR + 1, 8);
        assert_eq!(ledger.resolve(TaskId::Provisional(PROVISIONAL_FLOOR + 1)), TaskId::Confirmed(8));
    }
}
