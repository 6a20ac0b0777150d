//! # Crashpoint Engine
//!
//! Wagering engine for a crash-style mini game: a multiplier climbs
//! an exponential curve from 1.00x and can crash at any moment at a
//! secret, pre-drawn point. The player stakes virtual credits, rides
//! the curve, and cashes out (manually or at an auto-stop threshold)
//! before the crash, or loses the stake.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CRASHPOINT ENGINE                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── curve.rs    - Multiplier curve and crash-point draw     │
//! │  ├── rng.rs      - Randomness sources (secure and seeded)    │
//! │  └── clock.rs    - Time sources (system and manual)          │
//! │                                                              │
//! │  game/           - Game logic                                │
//! │  ├── state.rs    - Round, account, and result types          │
//! │  ├── round.rs    - Per-round state machine                   │
//! │  ├── economy.rs  - Leveling, insurance, daily bonus          │
//! │  ├── history.rs  - Bounded result ledger                     │
//! │  ├── events.rs   - Notifications and one-shot events         │
//! │  ├── achievements.rs - Threshold achievements                │
//! │  ├── customization.rs - Level-gated cosmetics                │
//! │  └── session.rs  - Orchestrator over all of the above        │
//! │                                                              │
//! │  storage/        - Persistence                               │
//! │  ├── memory.rs   - In-memory store                           │
//! │  └── file.rs     - One JSON file per key                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fairness Guarantee
//!
//! Every round's crash point is drawn from a cryptographically secure
//! source ([`core::rng::SecureRandom`]) before the multiplier starts
//! climbing, and is never revealed until the round resolves. The
//! state machine checks the crash before the auto-stop on every tick,
//! so a threshold past the crash point can never pay out.
//!
//! Given a seeded source and a manual clock, whole sessions replay
//! deterministically, which is how the test suite pins down exact
//! outcomes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod storage;

// Re-export commonly used types
pub use crate::core::clock::{Clock, ManualClock, SystemClock};
pub use crate::core::curve::{crash_point, multiplier_at, win_amount};
pub use crate::core::rng::{RandomSource, ScriptedRandom, SecureRandom, SeededRandom};
pub use crate::game::session::{GameSession, RenderFrame};
pub use crate::game::state::{RoundResult, RoundState, UserAccount};
pub use crate::storage::{FileStore, MemoryStore, Store};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
