//! Core primitives: the crash curve, randomness, and time.
//!
//! Everything here is pure or trivially mockable, so the game layer
//! on top can be driven deterministically in tests.

pub mod clock;
pub mod curve;
pub mod rng;

// Re-export core types
pub use clock::{Clock, ManualClock, SystemClock};
pub use curve::{multiplier_at, HOUSE_EDGE, MAX_MULTIPLIER, MIN_BET, MIN_MULTIPLIER};
pub use rng::{RandomSource, SecureRandom, SeededRandom};
