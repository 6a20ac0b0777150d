//! Engine State Definitions
//!
//! Round state is ephemeral and owned by the round machine; the
//! account and stats are long-lived and only mutated by the economy
//! engine at round resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::curve;

/// Starting balance for a fresh account, in credits.
pub const DEFAULT_BALANCE: u64 = 10_000;

/// Default stake for the pending round.
pub const DEFAULT_BET: u64 = 100;

/// Default auto-stop threshold.
pub const DEFAULT_AUTO_STOP: f64 = 2.0;

/// Multiplier the round must reach before manual cash-out unlocks.
pub const CASH_OUT_UNLOCK: f64 = 1.01;

// =============================================================================
// ROUND STATE
// =============================================================================

/// Lifecycle phase of the current round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round in flight.
    #[default]
    Idle,
    /// Multiplier rising, player may cash out.
    Playing,
    /// Terminal action happened this tick; outcome application and
    /// history append are still pending.
    Resolving,
}

/// Per-round state, mutated only through the round machine.
///
/// Invariant: `crash_point` and `start_time` are both present iff the
/// phase is `Playing` or `Resolving`; `current_multiplier >= 1.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// Current lifecycle phase.
    pub phase: RoundPhase,

    /// Last computed display multiplier.
    pub current_multiplier: f64,

    /// Hidden target at which the round crashes. Secret until
    /// resolution.
    pub crash_point: Option<f64>,

    /// Wall-clock start of the current round.
    pub start_time: Option<DateTime<Utc>>,

    /// Stake for the pending/active round, in credits.
    pub bet_amount: u64,

    /// Player-configured automatic cash-out threshold.
    pub auto_stop_multiplier: f64,

    /// True once the multiplier has cleared [`CASH_OUT_UNLOCK`].
    pub can_cash_out: bool,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            phase: RoundPhase::Idle,
            current_multiplier: 1.0,
            crash_point: None,
            start_time: None,
            bet_amount: DEFAULT_BET,
            auto_stop_multiplier: DEFAULT_AUTO_STOP,
            can_cash_out: false,
        }
    }
}

impl RoundState {
    /// Is a round currently in flight?
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    /// Reset to idle defaults, keeping the player's bet and auto-stop
    /// configuration.
    pub(crate) fn reset_to_idle(&mut self) {
        self.phase = RoundPhase::Idle;
        self.current_multiplier = 1.0;
        self.crash_point = None;
        self.start_time = None;
        self.can_cash_out = false;
    }
}

// =============================================================================
// USER ACCOUNT
// =============================================================================

/// Aggregate statistics, recomputed incrementally on every outcome.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    /// Rounds resolved.
    pub total_played: u64,
    /// Rounds won.
    pub total_wins: u64,
    /// Rounds lost.
    pub total_losses: u64,
    /// Derived percentage: wins / played * 100.
    pub win_rate: f64,
    /// Largest single win, in credits.
    pub max_win: u64,
    /// Highest multiplier achieved on a winning round.
    pub max_multiplier: f64,
    /// Signed cumulative profit, in credits.
    pub net_profit: i64,
    /// Total credits wagered.
    pub total_wagered: u64,
}

/// Long-lived player account.
///
/// `balance` is never driven negative: a bet must satisfy
/// `amount <= balance` before a round starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAccount {
    /// Spendable credits.
    pub balance: u64,
    /// Level derived from `total_wagered` (one level per 5000 wagered).
    pub level: u32,
    /// Lifetime credits wagered; monotonically non-decreasing.
    pub total_wagered: u64,
    /// Instant of the last daily-bonus claim (epoch for never).
    pub last_daily_bonus: DateTime<Utc>,
    /// Losses since the last win.
    pub consecutive_losses: u32,
    /// Aggregate statistics.
    pub stats: UserStats,
}

impl Default for UserAccount {
    fn default() -> Self {
        Self {
            balance: DEFAULT_BALANCE,
            level: 1,
            total_wagered: 0,
            last_daily_bonus: DateTime::UNIX_EPOCH,
            consecutive_losses: 0,
            stats: UserStats::default(),
        }
    }
}

// =============================================================================
// ROUND RESULT
// =============================================================================

/// Immutable record of a resolved round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Unique result id.
    pub id: Uuid,
    /// Final multiplier at resolution.
    pub multiplier: f64,
    /// Did the player cash out in time?
    pub is_win: bool,
    /// Stake, in credits.
    pub bet_amount: u64,
    /// Payout on a win; absent on a loss.
    pub win_amount: Option<u64>,
    /// Resolution instant.
    pub timestamp: DateTime<Utc>,
    /// True when the auto-stop threshold triggered the cash-out.
    pub is_auto: bool,
}

impl RoundResult {
    /// Record a winning round; payout is derived from the multiplier.
    pub fn win(bet_amount: u64, multiplier: f64, timestamp: DateTime<Utc>, is_auto: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            multiplier,
            is_win: true,
            bet_amount,
            win_amount: Some(curve::win_amount(bet_amount, multiplier)),
            timestamp,
            is_auto,
        }
    }

    /// Record a crashed round.
    pub fn loss(bet_amount: u64, multiplier: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            multiplier,
            is_win: false,
            bet_amount,
            win_amount: None,
            timestamp,
            is_auto: false,
        }
    }

    /// Signed balance delta this round produced (before bonuses).
    pub fn profit(&self) -> i64 {
        self.win_amount.unwrap_or(0) as i64 - self.bet_amount as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_state_defaults() {
        let state = RoundState::default();
        assert_eq!(state.phase, RoundPhase::Idle);
        assert_eq!(state.current_multiplier, 1.0);
        assert_eq!(state.bet_amount, DEFAULT_BET);
        assert_eq!(state.auto_stop_multiplier, DEFAULT_AUTO_STOP);
        assert!(state.crash_point.is_none());
        assert!(!state.can_cash_out);
    }

    #[test]
    fn reset_keeps_player_configuration() {
        let mut state = RoundState {
            phase: RoundPhase::Resolving,
            current_multiplier: 3.2,
            crash_point: Some(4.0),
            start_time: Some(Utc::now()),
            bet_amount: 250,
            auto_stop_multiplier: 5.0,
            can_cash_out: true,
        };
        state.reset_to_idle();
        assert_eq!(state.phase, RoundPhase::Idle);
        assert_eq!(state.current_multiplier, 1.0);
        assert!(state.crash_point.is_none());
        assert!(state.start_time.is_none());
        assert!(!state.can_cash_out);
        // Player configuration survives the reset
        assert_eq!(state.bet_amount, 250);
        assert_eq!(state.auto_stop_multiplier, 5.0);
    }

    #[test]
    fn account_defaults_match_first_run_contract() {
        let account = UserAccount::default();
        assert_eq!(account.balance, 10_000);
        assert_eq!(account.level, 1);
        assert_eq!(account.consecutive_losses, 0);
        assert_eq!(account.last_daily_bonus, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn account_deserializes_from_empty_blob() {
        // Absent fields fall back to the documented defaults
        let account: UserAccount = serde_json::from_str("{}").unwrap();
        assert_eq!(account, UserAccount::default());
    }

    #[test]
    fn result_profit_is_signed() {
        let now = Utc::now();
        let win = RoundResult::win(200, 3.0, now, true);
        assert_eq!(win.win_amount, Some(600));
        assert_eq!(win.profit(), 400);

        let loss = RoundResult::loss(150, 1.42, now);
        assert_eq!(loss.win_amount, None);
        assert_eq!(loss.profit(), -150);
    }

    #[test]
    fn account_round_trips_through_json() {
        let mut account = UserAccount::default();
        account.balance = 1234;
        account.stats.total_played = 7;
        account.stats.win_rate = 42.857142857142854;

        let json = serde_json::to_string(&account).unwrap();
        let back: UserAccount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }
}
