//! Achievements
//!
//! Fixed definition table plus per-player progress. Progress is
//! keyed by achievement id in a BTreeMap so iteration and the
//! persisted blob stay in a stable order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::state::{RoundResult, UserAccount};

/// What an achievement measures, with its unlock target.
///
/// Multiplier targets are in hundredths (1000 = x10.00) so every
/// metric is a plain integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    /// Lifetime round wins.
    Wins(u64),
    /// Lifetime round losses.
    Losses(u64),
    /// Consecutive wins within a session.
    WinStreak(u64),
    /// Credits won in a single round.
    SingleWin(u64),
    /// Credits staked on a single round.
    BetAmount(u64),
    /// Multiplier reached on a winning round, in hundredths.
    Multiplier(u64),
    /// Account level reached.
    Level(u64),
}

impl Requirement {
    /// Unlock target for this requirement.
    pub fn target(self) -> u64 {
        match self {
            Requirement::Wins(n)
            | Requirement::Losses(n)
            | Requirement::WinStreak(n)
            | Requirement::SingleWin(n)
            | Requirement::BetAmount(n)
            | Requirement::Multiplier(n)
            | Requirement::Level(n) => n,
        }
    }
}

/// Static achievement definition.
#[derive(Clone, Copy, Debug)]
pub struct AchievementDef {
    /// Stable id used as the progress key.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Short description shown on unlock.
    pub description: &'static str,
    /// Unlock requirement.
    pub requirement: Requirement,
}

/// The fixed achievement table.
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_flight",
        name: "First Flight",
        description: "Win your first round",
        requirement: Requirement::Wins(1),
    },
    AchievementDef {
        id: "seasoned_pilot",
        name: "Seasoned Pilot",
        description: "Win 50 rounds",
        requirement: Requirement::Wins(50),
    },
    AchievementDef {
        id: "crash_survivor",
        name: "Crash Survivor",
        description: "Lose 50 rounds and keep playing",
        requirement: Requirement::Losses(50),
    },
    AchievementDef {
        id: "hot_streak",
        name: "Hot Streak",
        description: "Win 5 rounds in a row",
        requirement: Requirement::WinStreak(5),
    },
    AchievementDef {
        id: "unstoppable",
        name: "Unstoppable",
        description: "Win 10 rounds in a row",
        requirement: Requirement::WinStreak(10),
    },
    AchievementDef {
        id: "high_roller",
        name: "High Roller",
        description: "Stake 1000 credits on a single round",
        requirement: Requirement::BetAmount(1_000),
    },
    AchievementDef {
        id: "jackpot",
        name: "Jackpot",
        description: "Win 5000 credits in a single round",
        requirement: Requirement::SingleWin(5_000),
    },
    AchievementDef {
        id: "to_the_moon",
        name: "To the Moon",
        description: "Cash out at x10 or higher",
        requirement: Requirement::Multiplier(1_000),
    },
    AchievementDef {
        id: "veteran",
        name: "Veteran",
        description: "Reach level 10",
        requirement: Requirement::Level(10),
    },
];

/// Look up a definition by id.
pub fn definition(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|def| def.id == id)
}

/// Progress toward one achievement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Unlocked yet?
    pub unlocked: bool,
    /// Best value observed so far.
    pub progress: u64,
    /// Instant of unlock.
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Per-player achievement progress, persisted as one blob.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementBook {
    entries: BTreeMap<String, Progress>,
}

impl AchievementBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current value for one achievement's metric.
    ///
    /// Returns the definition when this call unlocked it; already
    /// unlocked achievements never fire twice.
    pub fn record(
        &mut self,
        id: &str,
        value: u64,
        now: DateTime<Utc>,
    ) -> Option<&'static AchievementDef> {
        let def = definition(id)?;
        let entry = self.entries.entry(id.to_string()).or_default();
        if entry.unlocked {
            return None;
        }

        let target = def.requirement.target();
        if value >= target {
            entry.unlocked = true;
            entry.progress = target;
            entry.unlocked_at = Some(now);
            Some(def)
        } else {
            entry.progress = entry.progress.max(value);
            None
        }
    }

    /// Is an achievement unlocked?
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.entries.get(id).is_some_and(|p| p.unlocked)
    }

    /// Current and target value for an achievement.
    pub fn progress(&self, id: &str) -> Option<(u64, u64)> {
        let def = definition(id)?;
        let current = self.entries.get(id).map(|p| p.progress).unwrap_or(0);
        Some((current, def.requirement.target()))
    }

    /// Number of unlocked achievements.
    pub fn unlocked_count(&self) -> usize {
        self.entries.values().filter(|p| p.unlocked).count()
    }
}

/// Feed one resolved round into the book.
///
/// Evaluates every definition against the matching metric and returns
/// the achievements unlocked by this round, in table order.
pub fn observe_round(
    book: &mut AchievementBook,
    account: &UserAccount,
    result: &RoundResult,
    win_streak: u64,
    now: DateTime<Utc>,
) -> Vec<&'static AchievementDef> {
    let mut unlocked = Vec::new();
    for def in ACHIEVEMENTS {
        let value = match def.requirement {
            Requirement::Wins(_) => account.stats.total_wins,
            Requirement::Losses(_) => account.stats.total_losses,
            Requirement::WinStreak(_) => win_streak,
            Requirement::SingleWin(_) => result.win_amount.unwrap_or(0),
            Requirement::BetAmount(_) => result.bet_amount,
            Requirement::Multiplier(_) if result.is_win => {
                (result.multiplier * 100.0).round() as u64
            }
            Requirement::Multiplier(_) => 0,
            Requirement::Level(_) => account.level as u64,
        };
        if let Some(def) = book.record(def.id, value, now) {
            unlocked.push(def);
        }
    }
    unlocked
}
