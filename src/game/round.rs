//! Round State Machine
//!
//! Owns the idle -> playing -> resolving lifecycle of a single round.
//! The machine defends its own invariants: starting while a round is
//! in flight and cashing out while ineligible are no-ops, never
//! panics. Invalid bets are rejected with a typed error.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::core::curve::{self, MAX_MULTIPLIER, MIN_BET, MIN_MULTIPLIER};
use crate::core::rng::RandomSource;
use crate::game::state::{RoundPhase, RoundResult, RoundState, CASH_OUT_UNLOCK};

/// Why a bet or setting was rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BetError {
    /// Stake below the table minimum.
    #[error("invalid bet: {amount} credits is below the {minimum} credit minimum")]
    BelowMinimum {
        /// Requested stake.
        amount: u64,
        /// Table minimum.
        minimum: u64,
    },

    /// Stake exceeds the player's balance.
    #[error("invalid bet: {amount} credits exceeds balance of {balance}")]
    InsufficientBalance {
        /// Requested stake.
        amount: u64,
        /// Current balance.
        balance: u64,
    },

    /// Auto-stop outside the legal multiplier range.
    #[error("auto-stop {value} is outside {MIN_MULTIPLIER}..={MAX_MULTIPLIER}")]
    InvalidAutoStop {
        /// Requested threshold.
        value: f64,
    },
}

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEnd {
    /// Multiplier reached the hidden crash point.
    Crashed,
    /// Player cashed out manually.
    CashedOut,
    /// Auto-stop threshold reached.
    AutoStopped,
}

/// Outcome of one evaluation tick.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Nothing to evaluate (idle or awaiting settlement).
    Noop,
    /// Round continues; carries the new display multiplier.
    Continue(f64),
    /// Round ended this tick.
    Resolved(RoundResult),
}

/// The per-round state machine.
#[derive(Clone, Debug, Default)]
pub struct RoundMachine {
    state: RoundState,
}

impl RoundMachine {
    /// Fresh machine in the idle phase with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the round state.
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Store the stake for the next round. Ignored while a round is
    /// in flight; full validation happens at [`RoundMachine::start`].
    pub fn set_bet(&mut self, amount: u64) {
        if self.state.phase == RoundPhase::Idle {
            self.state.bet_amount = amount;
        }
    }

    /// Configure the auto-stop threshold. Rejected when out of range,
    /// ignored while a round is in flight.
    pub fn set_auto_stop(&mut self, value: f64) -> Result<(), BetError> {
        if !(MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&value) {
            return Err(BetError::InvalidAutoStop { value });
        }
        if self.state.phase == RoundPhase::Idle {
            self.state.auto_stop_multiplier = value;
        }
        Ok(())
    }

    /// Start a round with the configured bet.
    ///
    /// Returns `Ok(true)` when a round started, `Ok(false)` when the
    /// request was ignored because a round is already in flight, and
    /// a [`BetError`] when the bet fails validation (no state change).
    ///
    /// The crash point is drawn exactly once here and stays hidden
    /// until resolution.
    pub fn start(
        &mut self,
        balance: u64,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
    ) -> Result<bool, BetError> {
        if self.state.phase != RoundPhase::Idle {
            return Ok(false);
        }

        let amount = self.state.bet_amount;
        if amount < MIN_BET {
            return Err(BetError::BelowMinimum { amount, minimum: MIN_BET });
        }
        if amount > balance {
            return Err(BetError::InsufficientBalance { amount, balance });
        }

        self.state.phase = RoundPhase::Playing;
        self.state.crash_point = Some(curve::crash_point(rng));
        self.state.start_time = Some(now);
        self.state.current_multiplier = 1.0;
        self.state.can_cash_out = false;

        debug!(bet = amount, "round started");
        Ok(true)
    }

    /// Evaluate one tick at instant `now`.
    ///
    /// Recomputes the multiplier from elapsed wall time, then checks
    /// the crash point before the auto-stop threshold: a tick that
    /// crosses both is a loss.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.state.phase != RoundPhase::Playing {
            return TickOutcome::Noop;
        }
        let (start, crash) = match (self.state.start_time, self.state.crash_point) {
            (Some(start), Some(crash)) => (start, crash),
            // Unreachable while the playing invariant holds
            _ => return TickOutcome::Noop,
        };

        let elapsed_ms = (now - start).num_milliseconds().max(0) as u64;
        let multiplier = curve::multiplier_at(elapsed_ms);
        self.state.current_multiplier = multiplier;
        self.state.can_cash_out = multiplier >= CASH_OUT_UNLOCK;

        if multiplier >= crash {
            return TickOutcome::Resolved(self.resolve(RoundEnd::Crashed, multiplier, now));
        }
        if multiplier >= self.state.auto_stop_multiplier {
            return TickOutcome::Resolved(self.resolve(RoundEnd::AutoStopped, multiplier, now));
        }
        TickOutcome::Continue(multiplier)
    }

    /// Cash out at the current multiplier.
    ///
    /// Legal only while playing and past the unlock threshold;
    /// otherwise a silent no-op (the UI gates the button, the engine
    /// defends the invariant regardless).
    pub fn cash_out(&mut self, now: DateTime<Utc>) -> Option<RoundResult> {
        if self.state.phase != RoundPhase::Playing || !self.state.can_cash_out {
            return None;
        }
        let multiplier = self.state.current_multiplier;
        Some(self.resolve(RoundEnd::CashedOut, multiplier, now))
    }

    /// Return to idle after the caller has applied the outcome and
    /// appended history. No-op unless resolving.
    pub fn finish_resolution(&mut self) {
        if self.state.phase == RoundPhase::Resolving {
            self.state.reset_to_idle();
        }
    }

    /// Cancel an in-flight round without resolution (shutdown path).
    ///
    /// The stake was never deducted, so nothing is owed; the tick
    /// simply stops. No-op when idle.
    pub fn abort(&mut self) {
        if self.state.phase != RoundPhase::Idle {
            debug!("round aborted");
            self.state.reset_to_idle();
        }
    }

    fn resolve(&mut self, end: RoundEnd, multiplier: f64, now: DateTime<Utc>) -> RoundResult {
        self.state.phase = RoundPhase::Resolving;
        let bet = self.state.bet_amount;
        let crash = self.state.crash_point.unwrap_or(multiplier);
        debug!(?end, multiplier, crash_point = crash, "round resolved");

        match end {
            RoundEnd::Crashed => RoundResult::loss(bet, multiplier, now),
            RoundEnd::CashedOut => RoundResult::win(bet, multiplier, now, false),
            RoundEnd::AutoStopped => RoundResult::win(bet, multiplier, now, true),
        }
    }
}
