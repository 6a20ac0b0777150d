//! Round History Ledger
//!
//! Append-only bounded log of past round outcomes, most recent first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game::state::RoundResult;

/// Maximum retained results; the oldest entry is evicted beyond this.
pub const HISTORY_CAP: usize = 20;

/// Bounded round history. Serializes as a plain list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    entries: VecDeque<RoundResult>,
}

impl HistoryLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a result, evicting the oldest entry past the cap.
    pub fn push(&mut self, result: RoundResult) {
        self.entries.push_front(result);
        self.entries.truncate(HISTORY_CAP);
    }

    /// Most recent result, if any.
    pub fn latest(&self) -> Option<&RoundResult> {
        self.entries.front()
    }

    /// Iterate most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &RoundResult> {
        self.entries.iter()
    }

    /// Number of retained results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no rounds have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(bet: u64) -> RoundResult {
        RoundResult::loss(bet, 1.5, Utc::now())
    }

    #[test]
    fn most_recent_is_first() {
        let mut ledger = HistoryLedger::new();
        ledger.push(result(10));
        ledger.push(result(20));
        assert_eq!(ledger.latest().unwrap().bet_amount, 20);
        let bets: Vec<u64> = ledger.iter().map(|r| r.bet_amount).collect();
        assert_eq!(bets, vec![20, 10]);
    }

    #[test]
    fn ledger_never_exceeds_cap() {
        let mut ledger = HistoryLedger::new();
        for bet in 0..50 {
            ledger.push(result(bet + 10));
        }
        assert_eq!(ledger.len(), HISTORY_CAP);
        // Newest survives, oldest were evicted
        assert_eq!(ledger.latest().unwrap().bet_amount, 59);
        assert_eq!(ledger.iter().last().unwrap().bet_amount, 40);
    }

    #[test]
    fn serializes_as_a_list() {
        let mut ledger = HistoryLedger::new();
        ledger.push(result(10));
        let json = serde_json::to_string(&ledger).unwrap();
        assert!(json.starts_with('['));
        let back: HistoryLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn absent_blob_defaults_to_empty() {
        let ledger: HistoryLedger = serde_json::from_str("[]").unwrap();
        assert!(ledger.is_empty());
    }
}
