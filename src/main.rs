//! Crashpoint Demo
//!
//! Plays a batch of seeded rounds through a full game session and
//! logs every notification, so a run shows the whole engine end to
//! end: bonus claim, wins, losses, leveling, achievements.

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crashpoint::{
    core::clock::ManualClock,
    game::{
        events::{GameEvent, TracingSink},
        session::GameSession,
    },
    storage::MemoryStore,
    SeededRandom, VERSION,
};

const DEMO_SEED: u64 = 0xC8A5_4901;
const DEMO_ROUNDS: u32 = 25;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Crashpoint Engine v{}", VERSION);
    info!("Seed: {:#x}, rounds: {}", DEMO_SEED, DEMO_ROUNDS);

    demo_session()
}

/// Run a deterministic auto-play session.
fn demo_session() -> Result<()> {
    let clock = ManualClock::new(Utc::now());
    let mut session = GameSession::new(
        MemoryStore::new(),
        SeededRandom::new(DEMO_SEED),
        clock.clone(),
    );
    let mut sink = TracingSink;

    if session.claim_daily_bonus() {
        session.dispatch_events(&mut sink);
    }

    session.set_bet(100);
    session.set_auto_stop(2.0);

    let mut big_wins = 0u32;
    for round in 1..=DEMO_ROUNDS {
        if !session.start_round() {
            session.dispatch_events(&mut sink);
            break;
        }

        // Drive the clock at 60 Hz until the round resolves
        let result = loop {
            clock.advance_ms(16);
            if let Some(result) = session.tick() {
                break result;
            }
        };

        info!(
            round,
            win = result.is_win,
            multiplier = %format!("{:.2}", result.multiplier),
            balance = session.account().balance,
            "round complete"
        );

        for event in session.dispatch_events(&mut sink) {
            match event {
                GameEvent::BigWin(big) => {
                    big_wins += 1;
                    info!(
                        "BIG WIN: {} credits at x{:.2}",
                        big.win_amount, big.multiplier
                    );
                }
                GameEvent::AchievementUnlocked { name, .. } => {
                    info!("Achievement: {name}");
                }
                GameEvent::Notification(_) => {}
            }
        }

        // Pause between rounds so timestamps stay distinct
        clock.advance_ms(500);
    }

    let account = session.account();
    info!("=== Session Results ===");
    info!(
        "Balance: {} credits (level {}, {} wagered)",
        account.balance, account.level, account.stats.total_wagered
    );
    info!(
        "Record: {} wins / {} losses ({:.1}% win rate)",
        account.stats.total_wins, account.stats.total_losses, account.stats.win_rate
    );
    info!(
        "Big wins: {}, achievements unlocked: {}",
        big_wins,
        session.achievements().unlocked_count()
    );
    info!(
        "History holds the last {} of {} rounds",
        session.history().len(),
        account.stats.total_played
    );

    Ok(())
}
