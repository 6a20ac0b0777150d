//! Economy and Progression Rules
//!
//! Pure functions from round outcomes to account snapshots plus the
//! notifications they trigger. Exactly one bonus branch applies per
//! resolution: level-up is checked first and suppresses insurance.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::game::events::{BigWin, Notification};
use crate::game::state::{RoundResult, UserAccount, UserStats};

/// Credits wagered per level step.
pub const WAGER_PER_LEVEL: u64 = 5_000;

/// Level-up reward is this many credits times the new level.
pub const LEVEL_REWARD_STEP: u64 = 500;

/// Losing-streak length that triggers an insurance refund.
pub const INSURANCE_STREAK: u32 = 10;

/// Fraction of the stake refunded by insurance.
pub const INSURANCE_RATE: f64 = 0.5;

/// Base daily bonus, in credits.
pub const DAILY_BONUS: u64 = 1_000;

/// Local hour (0-23) during which the daily bonus doubles.
pub const LUCKY_HOUR: u32 = 12;

/// Hours between daily-bonus claims.
pub const BONUS_COOLDOWN_HOURS: i64 = 24;

/// A win this many times the stake counts as a big win.
pub const BIG_WIN_MULTIPLE: u64 = 10;

/// A win of this many credits counts as a big win regardless of stake.
pub const BIG_WIN_FLOOR: u64 = 5_000;

/// Level derived deterministically from lifetime wagered credits.
pub fn level_for_wagered(total_wagered: u64) -> u32 {
    (total_wagered / WAGER_PER_LEVEL) as u32 + 1
}

/// Credits awarded for reaching `level`.
pub fn level_reward(level: u32) -> u64 {
    LEVEL_REWARD_STEP * level as u64
}

/// Is an insurance refund due at this losing streak?
pub fn insurance_due(consecutive_losses: u32) -> bool {
    consecutive_losses > 0 && consecutive_losses % INSURANCE_STREAK == 0
}

/// Insurance refund for a given stake, rounded to whole credits.
pub fn insurance_refund(bet_amount: u64) -> u64 {
    (bet_amount as f64 * INSURANCE_RATE).round() as u64
}

/// Does a payout qualify for the big-win sharing signal?
pub fn is_big_win(win_amount: u64, bet_amount: u64) -> bool {
    win_amount >= bet_amount.saturating_mul(BIG_WIN_MULTIPLE) || win_amount >= BIG_WIN_FLOOR
}

/// Result of applying a round outcome to an account.
#[derive(Clone, Debug)]
pub struct OutcomeUpdate {
    /// New account snapshot.
    pub account: UserAccount,
    /// Notifications to dispatch, in emission order.
    pub notifications: Vec<Notification>,
    /// One-shot sharing payload when the win clears the threshold.
    pub big_win: Option<BigWin>,
}

/// Apply a resolved round to an account.
///
/// Pure: no hidden state, no side effects. The caller persists the
/// snapshot and dispatches the notifications.
pub fn apply_outcome(result: &RoundResult, account: &UserAccount) -> OutcomeUpdate {
    let mut next = account.clone();
    next.stats = update_stats(result, &account.stats);

    let win = result.win_amount.unwrap_or(0);
    // bet <= balance was enforced at round start, so this stays >= 0
    next.balance = account.balance + win - result.bet_amount;
    next.total_wagered = account.total_wagered + result.bet_amount;
    next.consecutive_losses = if result.is_win { 0 } else { account.consecutive_losses + 1 };

    let new_level = level_for_wagered(next.total_wagered);
    let leveled_up = new_level > account.level;
    next.level = new_level.max(account.level);

    let mut notifications = Vec::new();
    if result.is_win {
        let auto = if result.is_auto { "Auto " } else { "" };
        notifications.push(Notification::success(format!(
            "{auto}Cash out! Won {win} credits at x{:.2}",
            result.multiplier
        )));
    } else {
        notifications.push(Notification::error(format!(
            "Crashed at x{:.2}! Lost {} credits",
            result.multiplier, result.bet_amount
        )));
    }

    if leveled_up {
        let reward = level_reward(new_level);
        next.balance += reward;
        notifications.push(Notification::success(format!(
            "Level up! You reached level {new_level} and earned {reward} credits!"
        )));
    } else if !result.is_win && insurance_due(next.consecutive_losses) {
        let refund = insurance_refund(result.bet_amount);
        next.balance += refund;
        notifications.push(Notification::info(format!(
            "Insurance activated! You received {refund} credits back."
        )));
    }

    let big_win = if result.is_win && is_big_win(win, result.bet_amount) {
        Some(BigWin {
            win_amount: win,
            multiplier: result.multiplier,
            bet_amount: result.bet_amount,
        })
    } else {
        None
    };

    OutcomeUpdate { account: next, notifications, big_win }
}

fn update_stats(result: &RoundResult, stats: &UserStats) -> UserStats {
    let mut next = stats.clone();
    next.total_played += 1;
    next.total_wagered += result.bet_amount;

    if result.is_win {
        let win = result.win_amount.unwrap_or(0);
        next.total_wins += 1;
        next.net_profit += win as i64 - result.bet_amount as i64;
        if result.multiplier > next.max_multiplier {
            next.max_multiplier = result.multiplier;
        }
        if win > next.max_win {
            next.max_win = win;
        }
    } else {
        next.total_losses += 1;
        next.net_profit -= result.bet_amount as i64;
    }

    next.win_rate = next.total_wins as f64 / next.total_played as f64 * 100.0;
    next
}

// =============================================================================
// DAILY BONUS
// =============================================================================

/// Why a daily-bonus claim was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BonusError {
    /// The 24-hour window has not elapsed.
    #[error("Daily bonus already claimed! Come back tomorrow.")]
    AlreadyClaimed,
}

/// Is the daily bonus claimable at instant `now`?
pub fn can_claim_daily_bonus(account: &UserAccount, now: DateTime<Utc>) -> bool {
    now - account.last_daily_bonus >= Duration::hours(BONUS_COOLDOWN_HOURS)
}

/// Claim the daily bonus.
///
/// Grants [`DAILY_BONUS`] credits, doubled when `local_hour` is the
/// lucky hour. Pure: returns the new snapshot and the notification.
pub fn claim_daily_bonus(
    account: &UserAccount,
    now: DateTime<Utc>,
    local_hour: u32,
) -> Result<(UserAccount, Notification), BonusError> {
    if !can_claim_daily_bonus(account, now) {
        return Err(BonusError::AlreadyClaimed);
    }

    let lucky = local_hour == LUCKY_HOUR;
    let amount = if lucky { DAILY_BONUS * 2 } else { DAILY_BONUS };

    let mut next = account.clone();
    next.balance += amount;
    next.last_daily_bonus = now;

    let notification = if lucky {
        Notification::success(format!("Lucky Hour! Daily bonus doubled: +{amount} credits!"))
    } else {
        Notification::success(format!("Daily bonus claimed: +{amount} credits!"))
    };
    Ok((next, notification))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::Severity;

    fn now() -> DateTime<Utc> {
        DateTime::UNIX_EPOCH + Duration::days(20_000)
    }

    fn win(bet: u64, multiplier: f64) -> RoundResult {
        RoundResult::win(bet, multiplier, now(), false)
    }

    fn loss(bet: u64, multiplier: f64) -> RoundResult {
        RoundResult::loss(bet, multiplier, now())
    }

    #[test]
    fn level_derivation() {
        assert_eq!(level_for_wagered(0), 1);
        assert_eq!(level_for_wagered(4_999), 1);
        assert_eq!(level_for_wagered(5_000), 2);
        assert_eq!(level_for_wagered(12_500), 3);
    }

    #[test]
    fn win_updates_balance_and_resets_streak() {
        let mut account = UserAccount::default();
        account.consecutive_losses = 7;

        let update = apply_outcome(&win(200, 3.0), &account);
        assert_eq!(update.account.balance, 10_000 + 600 - 200);
        assert_eq!(update.account.consecutive_losses, 0);
        assert_eq!(update.account.stats.total_wins, 1);
        assert_eq!(update.account.stats.max_win, 600);
        assert_eq!(update.account.stats.net_profit, 400);
        assert_eq!(update.notifications[0].kind, Severity::Success);
    }

    #[test]
    fn loss_decrements_balance_and_extends_streak() {
        let account = UserAccount::default();
        let update = apply_outcome(&loss(100, 1.5), &account);
        assert_eq!(update.account.balance, 9_900);
        assert_eq!(update.account.consecutive_losses, 1);
        assert_eq!(update.account.stats.total_losses, 1);
        assert_eq!(update.account.stats.net_profit, -100);
        assert_eq!(update.notifications[0].kind, Severity::Error);
        assert!(update.big_win.is_none());
    }

    #[test]
    fn win_rate_matches_rederived_value() {
        let mut account = UserAccount::default();
        for i in 0..9 {
            let result = if i % 3 == 0 { win(100, 2.0) } else { loss(100, 1.2) };
            account = apply_outcome(&result, &account).account;
        }
        let stats = &account.stats;
        let rederived = stats.total_wins as f64 / stats.total_played as f64 * 100.0;
        assert_eq!(stats.win_rate, rederived);
    }

    #[test]
    fn balance_conservation_without_bonuses() {
        let mut account = UserAccount::default();
        let initial = account.balance as i64;
        let mut expected_delta = 0i64;

        // Short sequence; never crosses a level boundary or a
        // 10-loss streak, so no bonus branch fires
        let rounds = [win(100, 1.8), loss(100, 1.1), win(50, 2.4), loss(200, 3.7)];
        for result in &rounds {
            expected_delta += result.profit();
            account = apply_outcome(result, &account).account;
        }
        assert_eq!(account.balance as i64, initial + expected_delta);
    }

    #[test]
    fn insurance_fires_on_every_tenth_loss() {
        let mut account = UserAccount::default();
        account.consecutive_losses = 9;

        let update = apply_outcome(&loss(100, 1.2), &account);
        assert_eq!(update.account.consecutive_losses, 10);
        // -100 stake +50 refund
        assert_eq!(update.account.balance, 10_000 - 100 + 50);
        assert!(update.notifications.iter().any(|n| n.message.contains("Insurance")));
    }

    #[test]
    fn insurance_skips_streaks_that_are_not_multiples_of_ten() {
        let mut account = UserAccount::default();
        account.consecutive_losses = 4;
        let update = apply_outcome(&loss(100, 1.2), &account);
        assert_eq!(update.account.consecutive_losses, 5);
        assert_eq!(update.account.balance, 9_900);
        assert!(!update.notifications.iter().any(|n| n.message.contains("Insurance")));
    }

    #[test]
    fn level_up_awards_reward_and_suppresses_insurance() {
        let mut account = UserAccount::default();
        account.total_wagered = 4_900;
        account.consecutive_losses = 9;

        let update = apply_outcome(&loss(200, 1.3), &account);
        assert_eq!(update.account.level, 2);
        assert_eq!(update.account.consecutive_losses, 10);
        // -200 stake, +1000 level reward, and no 100-credit insurance
        assert_eq!(update.account.balance, 10_000 - 200 + 1_000);
        assert!(update.notifications.iter().any(|n| n.message.contains("Level up")));
        assert!(!update.notifications.iter().any(|n| n.message.contains("Insurance")));
    }

    #[test]
    fn level_crossing_on_a_win() {
        let mut account = UserAccount::default();
        account.total_wagered = 9_950;

        let update = apply_outcome(&win(100, 2.0), &account);
        assert_eq!(update.account.level, 3);
        assert_eq!(update.account.balance, 10_000 + 100 + level_reward(3));
    }

    #[test]
    fn big_win_signal_thresholds() {
        let account = UserAccount::default();

        // 10x the stake qualifies
        let update = apply_outcome(&win(100, 12.0), &account);
        let big = update.big_win.expect("10x should be a big win");
        assert_eq!(big.win_amount, 1_200);
        assert_eq!(big.bet_amount, 100);

        // Modest multiplier does not
        let update = apply_outcome(&win(100, 2.0), &account);
        assert!(update.big_win.is_none());

        // The absolute floor qualifies regardless of multiple
        let mut rich = UserAccount::default();
        rich.balance = 100_000;
        let update = apply_outcome(&win(2_500, 2.1), &rich);
        assert!(update.big_win.is_some());
    }

    #[test]
    fn max_multiplier_only_moves_on_wins() {
        let mut account = UserAccount::default();
        account = apply_outcome(&win(100, 4.0), &account).account;
        account = apply_outcome(&loss(100, 9.0), &account).account;
        assert_eq!(account.stats.max_multiplier, 4.0);
    }

    #[test]
    fn daily_bonus_claim_and_cooldown() {
        let account = UserAccount::default();
        let (claimed, note) = claim_daily_bonus(&account, now(), 9).unwrap();
        assert_eq!(claimed.balance, 11_000);
        assert_eq!(note.kind, Severity::Success);

        // Second claim 1 hour later is rejected with no change
        let err = claim_daily_bonus(&claimed, now() + Duration::hours(1), 9).unwrap_err();
        assert_eq!(err, BonusError::AlreadyClaimed);

        // After 24 hours it can be claimed again
        assert!(can_claim_daily_bonus(&claimed, now() + Duration::hours(24)));
    }

    #[test]
    fn lucky_hour_doubles_the_bonus() {
        let account = UserAccount::default();
        let (claimed, note) = claim_daily_bonus(&account, now(), LUCKY_HOUR).unwrap();
        assert_eq!(claimed.balance, 12_000);
        assert!(note.message.contains("Lucky Hour"));
    }
}
