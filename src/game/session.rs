//! Game Session
//!
//! The single logical actor: wires the round machine, economy,
//! ledger, achievements, customization, persistence, and the event
//! queue. One round may be in flight at a time; outcome application
//! and history append both complete before the machine returns to
//! idle, so a reader observing the idle state never sees a stale
//! account or ledger.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::core::clock::Clock;
use crate::core::rng::RandomSource;
use crate::game::achievements::{self, AchievementBook};
use crate::game::customization::Customization;
use crate::game::economy;
use crate::game::events::{GameEvent, Notification, NotificationSink};
use crate::game::history::HistoryLedger;
use crate::game::round::{RoundMachine, TickOutcome};
use crate::game::state::{RoundResult, RoundState, UserAccount};
use crate::storage::{keys, load_or_default, save, Store};

/// Snapshot the renderer reads each frame. The renderer never
/// mutates engine state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Round in progress?
    pub is_playing: bool,
    /// Last computed display multiplier.
    pub current_multiplier: f64,
    /// Wall-clock start of the current round.
    pub start_time: Option<DateTime<Utc>>,
}

/// A complete game session bound to a store, a randomness source,
/// and a clock.
#[derive(Debug)]
pub struct GameSession<S: Store, R: RandomSource, C: Clock> {
    store: S,
    rng: R,
    clock: C,
    machine: RoundMachine,
    account: UserAccount,
    history: HistoryLedger,
    achievements: AchievementBook,
    customization: Customization,
    win_streak: u64,
    events: Vec<GameEvent>,
}

impl<S: Store, R: RandomSource, C: Clock> GameSession<S, R, C> {
    /// Load persisted state from the store; absent blobs fall back to
    /// first-run defaults.
    pub fn new(store: S, rng: R, clock: C) -> Self {
        let account: UserAccount = load_or_default(&store, keys::ACCOUNT);
        let history: HistoryLedger = load_or_default(&store, keys::HISTORY);
        let achievements: AchievementBook = load_or_default(&store, keys::ACHIEVEMENTS);
        let mut customization: Customization = load_or_default(&store, keys::CUSTOMIZATION);
        // Unlocks derive from level; reconcile silently on load
        customization.sync_with_level(account.level);

        info!(
            balance = account.balance,
            level = account.level,
            rounds_recorded = history.len(),
            "session loaded"
        );

        Self {
            store,
            rng,
            clock,
            machine: RoundMachine::new(),
            account,
            history,
            achievements,
            customization,
            win_streak: 0,
            events: Vec::new(),
        }
    }

    // =========================================================================
    // Read-only views
    // =========================================================================

    /// Player account snapshot.
    pub fn account(&self) -> &UserAccount {
        &self.account
    }

    /// Bounded round history, most recent first.
    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    /// Current round state.
    pub fn round(&self) -> &RoundState {
        self.machine.state()
    }

    /// Achievement progress.
    pub fn achievements(&self) -> &AchievementBook {
        &self.achievements
    }

    /// Cosmetic selections and unlocks.
    pub fn customization(&self) -> &Customization {
        &self.customization
    }

    /// Consecutive wins in this session.
    pub fn win_streak(&self) -> u64 {
        self.win_streak
    }

    /// Per-frame snapshot for the renderer.
    pub fn render_frame(&self) -> RenderFrame {
        let state = self.machine.state();
        RenderFrame {
            is_playing: state.is_playing(),
            current_multiplier: state.current_multiplier,
            start_time: state.start_time,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the stake for the next round (validated at start).
    pub fn set_bet(&mut self, amount: u64) {
        self.machine.set_bet(amount);
    }

    /// Set the auto-stop threshold; an out-of-range value is rejected
    /// with an error notification and no state change.
    pub fn set_auto_stop(&mut self, value: f64) {
        if let Err(error) = self.machine.set_auto_stop(value) {
            self.push_notification(Notification::error(error.to_string()));
        }
    }

    /// Select a skin; persisted when the selection changes.
    pub fn select_skin(&mut self, id: &str) {
        if self.customization.select_skin(id) {
            self.persist_customization();
        }
    }

    /// Select a theme; persisted when the selection changes.
    pub fn select_theme(&mut self, id: &str) {
        if self.customization.select_theme(id) {
            self.persist_customization();
        }
    }

    // =========================================================================
    // Round lifecycle
    // =========================================================================

    /// Start a round with the configured bet.
    ///
    /// Returns true when a round started. An invalid bet queues an
    /// error notification; a start while playing is silently ignored.
    pub fn start_round(&mut self) -> bool {
        let now = self.clock.now();
        match self.machine.start(self.account.balance, &mut self.rng, now) {
            Ok(started) => started,
            Err(error) => {
                self.push_notification(Notification::error(error.to_string()));
                false
            }
        }
    }

    /// Evaluate one tick at the clock's current instant.
    ///
    /// Call this from the host's frame callback. Returns the result
    /// when the round resolved this tick; the settlement (economy,
    /// history, persistence) has already completed by then.
    pub fn tick(&mut self) -> Option<RoundResult> {
        match self.machine.tick(self.clock.now()) {
            TickOutcome::Resolved(result) => {
                self.settle(&result);
                Some(result)
            }
            _ => None,
        }
    }

    /// Cash out at the current multiplier. No-op while not playing or
    /// before the multiplier clears the unlock threshold.
    pub fn cash_out(&mut self) -> Option<RoundResult> {
        let result = self.machine.cash_out(self.clock.now())?;
        self.settle(&result);
        Some(result)
    }

    /// Cancel an in-flight round without resolution (shutdown path).
    /// The stake was never deducted, so the balance is untouched.
    pub fn abort_round(&mut self) {
        self.machine.abort();
    }

    fn settle(&mut self, result: &RoundResult) {
        let update = economy::apply_outcome(result, &self.account);
        self.account = update.account;
        self.win_streak = if result.is_win { self.win_streak + 1 } else { 0 };

        for notification in update.notifications {
            self.push_notification(notification);
        }
        if let Some(big_win) = update.big_win {
            self.events.push(GameEvent::BigWin(big_win));
        }

        let now = self.clock.now();
        let unlocked = achievements::observe_round(
            &mut self.achievements,
            &self.account,
            result,
            self.win_streak,
            now,
        );
        for def in unlocked {
            self.push_notification(Notification::success(format!(
                "Achievement unlocked! {}: {}",
                def.name, def.description
            )));
            self.events.push(GameEvent::AchievementUnlocked {
                id: def.id.to_string(),
                name: def.name.to_string(),
            });
        }
        for name in self.customization.sync_with_level(self.account.level) {
            self.push_notification(Notification::info(format!("New cosmetic unlocked: {name}")));
        }

        // History append and persistence complete before the machine
        // goes back to idle
        self.history.push(result.clone());
        self.persist();
        self.machine.finish_resolution();

        info!(
            win = result.is_win,
            multiplier = result.multiplier,
            balance = self.account.balance,
            "round settled"
        );
    }

    // =========================================================================
    // Daily bonus
    // =========================================================================

    /// Is the daily bonus claimable right now?
    pub fn can_claim_daily_bonus(&self) -> bool {
        economy::can_claim_daily_bonus(&self.account, self.clock.now())
    }

    /// Is the lucky-hour doubling active right now?
    pub fn is_lucky_hour(&self) -> bool {
        self.clock.local_hour() == economy::LUCKY_HOUR
    }

    /// Claim the daily bonus. A premature claim queues an error
    /// notification and changes nothing.
    pub fn claim_daily_bonus(&mut self) -> bool {
        let now = self.clock.now();
        match economy::claim_daily_bonus(&self.account, now, self.clock.local_hour()) {
            Ok((account, notification)) => {
                self.account = account;
                self.push_notification(notification);
                self.persist();
                true
            }
            Err(error) => {
                self.push_notification(Notification::error(error.to_string()));
                false
            }
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Drain queued events without dispatching.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain queued events, pushing notifications into the sink.
    /// Non-notification events (big win, achievements) are returned
    /// for the caller's own handling.
    pub fn dispatch_events(&mut self, sink: &mut dyn NotificationSink) -> Vec<GameEvent> {
        let events = std::mem::take(&mut self.events);
        for event in &events {
            if let GameEvent::Notification(notification) = event {
                sink.notify(notification);
            }
        }
        events
    }

    fn push_notification(&mut self, notification: Notification) {
        self.events.push(GameEvent::Notification(notification));
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Fire-and-forget writes: a failed save is logged, never blocks
    /// play, and never corrupts in-memory state.
    fn persist(&mut self) {
        if let Err(error) = save(&mut self.store, keys::ACCOUNT, &self.account) {
            warn!(%error, "account save failed");
        }
        if let Err(error) = save(&mut self.store, keys::HISTORY, &self.history) {
            warn!(%error, "history save failed");
        }
        if let Err(error) = save(&mut self.store, keys::ACHIEVEMENTS, &self.achievements) {
            warn!(%error, "achievements save failed");
        }
        self.persist_customization();
    }

    fn persist_customization(&mut self) {
        if let Err(error) = save(&mut self.store, keys::CUSTOMIZATION, &self.customization) {
            warn!(%error, "customization save failed");
        }
    }
}
