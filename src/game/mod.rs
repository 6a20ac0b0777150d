//! Game Logic Module
//!
//! Round lifecycle, economy, and progression. Everything here is
//! deterministic given a [`crate::core::rng::RandomSource`] and a
//! [`crate::core::clock::Clock`].
//!
//! ## Module Structure
//!
//! - `state`: Round, account, and result types
//! - `round`: Per-round state machine (start, tick, cash out)
//! - `economy`: Outcome application, leveling, insurance, daily bonus
//! - `history`: Bounded ledger of recent results
//! - `events`: Notifications and one-shot game events
//! - `achievements`: Threshold achievements over lifetime stats
//! - `customization`: Level-gated skins and themes
//! - `session`: The orchestrator tying it all together

pub mod achievements;
pub mod customization;
pub mod economy;
pub mod events;
pub mod history;
pub mod round;
pub mod session;
pub mod state;

// Re-export key types
pub use events::{GameEvent, Notification, NotificationSink, Severity};
pub use history::HistoryLedger;
pub use round::{BetError, RoundEnd, RoundMachine, TickOutcome};
pub use session::{GameSession, RenderFrame};
pub use state::{RoundPhase, RoundResult, RoundState, UserAccount, UserStats};
