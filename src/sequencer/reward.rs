//! Reward amount — the one-time draw and the counting-up animation.
//!
//! The reward is drawn exactly once, at entry to `Processing`, and never
//! changes. The animated counter interpolates toward it for effect; the
//! values it displays along the way are transient and only the final tick
//! is the real amount.

use std::time::Duration;

use rand::Rng;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::{SequencerEvent, SoundCue};

/// Draw the finalized reward, uniform over `[min, max]`.
pub fn draw(min: u64, max: u64) -> u64 {
    rand::thread_rng().gen_range(min..=max)
}

/// Ease-out cubic interpolation toward `target`.
///
/// `displayed = target * (1 - (1 - t)^3)` with `t = elapsed / duration`
/// clamped to `[0, 1]`. Returns 0 at `t = 0`, exactly `target` once
/// `elapsed >= duration`, and is monotonic in between.
pub fn eased(target: u64, elapsed: Duration, duration: Duration) -> u64 {
    if duration.is_zero() || elapsed >= duration {
        return target;
    }
    let t = (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0);
    let ease = 1.0 - (1.0 - t).powi(3);
    (target as f64 * ease).floor() as u64
}

/// Spawn the counter animation task.
///
/// Emits `CounterTick` at a fixed update interval and a `Coin` sound cue at
/// most once per `coin_gap` (not every frame). The final tick carries
/// exactly `target`, then the task exits. The returned handle must be
/// aborted if the sequencer is torn down early.
pub(super) fn spawn_counter(
    target: u64,
    duration: Duration,
    update_every: Duration,
    coin_gap: Duration,
    tx: broadcast::Sender<SequencerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now();
        let mut interval = tokio::time::interval(update_every.max(Duration::from_millis(1)));
        let mut last_coin: Option<tokio::time::Instant> = None;

        loop {
            interval.tick().await;
            let elapsed = start.elapsed();

            if elapsed >= duration {
                let _ = tx.send(SequencerEvent::CounterTick { displayed: target });
                let _ = tx.send(SequencerEvent::Sound(SoundCue::Coin));
                break;
            }

            let displayed = eased(target, elapsed, duration);
            let _ = tx.send(SequencerEvent::CounterTick { displayed });

            let now = tokio::time::Instant::now();
            let due = match last_coin {
                Some(at) => now.duration_since(at) >= coin_gap,
                None => true,
            };
            if due {
                let _ = tx.send(SequencerEvent::Sound(SoundCue::Coin));
                last_coin = Some(now);
            }
        }
    })
}
