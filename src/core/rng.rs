//! Randomness Sources
//!
//! Crash points must not be predictable or replayable by an observer
//! inspecting engine state, so the production source draws from the
//! operating system's CSPRNG. A seeded Xorshift128+ source exists for
//! replayable demos and deterministic tests; it is never the default.

use rand::rngs::OsRng;
use rand::RngCore;

/// Source of uniform random fractions in `[0, 1)`.
///
/// Every fraction is derived from a 32-bit draw divided by 2^32.
pub trait RandomSource {
    /// Next uniform fraction in `[0, 1)`.
    fn next_fraction(&mut self) -> f64;
}

/// Cryptographically secure source backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRandom;

impl RandomSource for SecureRandom {
    fn next_fraction(&mut self) -> f64 {
        fraction_from_u32(OsRng.next_u32())
    }
}

/// Deterministic Xorshift128+ source.
///
/// Given the same seed, produces an identical sequence on any
/// platform. Suitable for demos and replay, never for live rounds.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    state: [u64; 2],
}

impl SeededRandom {
    /// Create from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // State must never be all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Next raw 64-bit value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }
}

impl RandomSource for SeededRandom {
    fn next_fraction(&mut self) -> f64 {
        fraction_from_u32(self.next_u64() as u32)
    }
}

/// Source that replays a fixed queue of fractions, for tests.
///
/// Returns 0.5 once the queue is exhausted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    index: usize,
}

impl ScriptedRandom {
    /// Create from a list of fractions to hand out in order.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, index: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_fraction(&mut self) -> f64 {
        let value = self.values.get(self.index).copied().unwrap_or(0.5);
        self.index += 1;
        value
    }
}

#[inline]
fn fraction_from_u32(bits: u32) -> f64 {
    bits as f64 / (u32::MAX as f64 + 1.0)
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_source_is_deterministic() {
        let mut a = SeededRandom::new(12345);
        let mut b = SeededRandom::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededRandom::new(1);
        let mut b = SeededRandom::new(2);
        let same = (0..10).filter(|_| a.next_u64() == b.next_u64()).count();
        assert!(same < 10);
    }

    #[test]
    fn fractions_stay_in_unit_interval() {
        let mut rng = SeededRandom::new(777);
        for _ in 0..10_000 {
            let f = rng.next_fraction();
            assert!((0.0..1.0).contains(&f), "fraction out of range: {f}");
        }
    }

    #[test]
    fn secure_source_stays_in_unit_interval() {
        let mut rng = SecureRandom;
        for _ in 0..1_000 {
            let f = rng.next_fraction();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn scripted_source_replays_then_defaults() {
        let mut rng = ScriptedRandom::new(vec![0.1, 0.9]);
        assert_eq!(rng.next_fraction(), 0.1);
        assert_eq!(rng.next_fraction(), 0.9);
        assert_eq!(rng.next_fraction(), 0.5);
    }

    #[test]
    fn zero_seed_does_not_lock_up() {
        let mut rng = SeededRandom::new(0);
        let first = rng.next_u64();
        let second = rng.next_u64();
        assert_ne!(first, second);
    }
}
