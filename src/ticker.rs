//! Ambient decoration — the "recent winners" ticker, the online counter,
//! and the slots-left scarcity countdown.
//!
//! All of it is generated noise with no relation to the player's session or
//! reward, and none of it may interact with the sequencer. Each feed runs
//! as its own timer task; [`AmbientFeed::dispose`] cancels all of them.

use std::sync::Mutex;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::{Theme, Timings};

/// Broadcast capacity for ambient events.
const EVENT_CAPACITY: usize = 256;

/// Seed value for the online-player counter.
const ONLINE_SEED: u32 = 1420;

/// Seed value for the slots-left countdown.
const SLOTS_SEED: u32 = 24;

/// The countdown never drops below this.
const SLOTS_FLOOR: u32 = 3;

/// One fabricated winner announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerItem {
    pub user: String,
    pub prize: String,
}

/// Generate a random winner from the theme's name and prize pools.
pub fn generate(theme: &Theme) -> TickerItem {
    let mut rng = rand::thread_rng();
    let prefix = theme
        .ticker_prefixes
        .choose(&mut rng)
        .map(String::as_str)
        .unwrap_or("Lucky");
    let suffix = theme
        .ticker_suffixes
        .choose(&mut rng)
        .map(String::as_str)
        .unwrap_or("777");
    let prize = theme
        .ticker_prizes
        .choose(&mut rng)
        .cloned()
        .unwrap_or_else(|| "JACKPOT".to_string());
    TickerItem {
        user: format!("{prefix}{suffix}"),
        prize,
    }
}

/// Events emitted by the ambient feeds.
#[derive(Debug, Clone)]
pub enum AmbientEvent {
    /// A fresh fabricated winner.
    Winner(TickerItem),
    /// The online-player counter drifted.
    OnlineCount(u32),
    /// The scarcity countdown decremented.
    SlotsLeft(u32),
}

/// Owns the three ambient timer tasks.
pub struct AmbientFeed {
    tx: broadcast::Sender<AmbientEvent>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl AmbientFeed {
    /// Spawn the rotation, online-count, and slots-left tasks.
    pub fn spawn(theme: Theme, timings: &Timings) -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        let mut tasks = Vec::with_capacity(3);

        // Winner rotation.
        {
            let tx = tx.clone();
            let interval = timings.ticker_interval;
            tasks.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await; // immediate first tick
                loop {
                    ticker.tick().await;
                    let _ = tx.send(AmbientEvent::Winner(generate(&theme)));
                }
            }));
        }

        // Online-count fluctuation.
        {
            let tx = tx.clone();
            let interval = timings.online_interval;
            tasks.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await;
                let mut count = ONLINE_SEED;
                loop {
                    ticker.tick().await;
                    count = drift(count, &mut rand::thread_rng());
                    let _ = tx.send(AmbientEvent::OnlineCount(count));
                }
            }));
        }

        // Slots-left countdown.
        {
            let tx = tx.clone();
            let interval = timings.slots_interval;
            tasks.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await;
                let mut slots = SLOTS_SEED;
                loop {
                    ticker.tick().await;
                    if slots > SLOTS_FLOOR {
                        slots -= 1;
                        let _ = tx.send(AmbientEvent::SlotsLeft(slots));
                    }
                }
            }));
        }

        Self {
            tx,
            tasks: Mutex::new(tasks),
        }
    }

    /// Subscribe to ambient events.
    pub fn subscribe(&self) -> broadcast::Receiver<AmbientEvent> {
        self.tx.subscribe()
    }

    /// Cancel all ambient timers. Idempotent; also runs on drop.
    pub fn dispose(&self) {
        let mut tasks = self.tasks.lock().unwrap();
        for handle in tasks.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for AmbientFeed {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// One online-count step: usually a small gain, sometimes a loss of one.
fn drift(count: u32, rng: &mut impl Rng) -> u32 {
    if rng.gen_bool(0.5) {
        count + rng.gen_range(0..3)
    } else {
        count.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_winner_comes_from_pools() {
        let theme = Theme::fire_kirin();
        for _ in 0..50 {
            let item = generate(&theme);
            assert!(
                theme
                    .ticker_prefixes
                    .iter()
                    .any(|p| item.user.starts_with(p.as_str())),
                "unexpected user {}",
                item.user
            );
            assert!(
                theme
                    .ticker_suffixes
                    .iter()
                    .any(|s| item.user.ends_with(s.as_str())),
                "unexpected user {}",
                item.user
            );
            assert!(theme.ticker_prizes.contains(&item.prize));
        }
    }

    #[test]
    fn drift_never_underflows() {
        let mut rng = rand::thread_rng();
        let mut count = 0u32;
        for _ in 0..100 {
            count = drift(count, &mut rng);
        }
        // Sanity: stayed non-negative (u32) and in a plausible band.
        assert!(count < 300);
    }

    #[tokio::test(start_paused = true)]
    async fn feeds_emit_and_slots_respect_floor() {
        let feed = AmbientFeed::spawn(Theme::fire_kirin(), &Timings::fast());
        let mut rx = feed.subscribe();

        let mut winners = 0;
        let mut min_slots = u32::MAX;
        for _ in 0..200 {
            match rx.recv().await.unwrap() {
                AmbientEvent::Winner(item) => {
                    assert!(!item.user.is_empty());
                    winners += 1;
                }
                AmbientEvent::SlotsLeft(n) => min_slots = min_slots.min(n),
                AmbientEvent::OnlineCount(_) => {}
            }
        }
        assert!(winners > 0);
        assert!(min_slots >= SLOTS_FLOOR);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_stops_all_feeds() {
        let feed = AmbientFeed::spawn(Theme::fire_kirin(), &Timings::fast());
        let mut rx = feed.subscribe();
        // Let at least one event through, then tear down.
        rx.recv().await.unwrap();
        feed.dispose();

        let quiet = tokio::time::timeout(std::time::Duration::from_secs(60), async {
            loop {
                if rx.recv().await.is_err() {
                    // Channel stays open (feed owns the sender); only
                    // lagging produces Err here.
                    return;
                }
            }
        })
        .await;
        assert!(quiet.is_err(), "ambient events fired after dispose");
    }
}
