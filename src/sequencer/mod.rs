//! Onboarding sequencer — drives the player from "identity entered" to
//! "lobby entered" through a scripted illusion of backend work.
//!
//! The funnel is a linear, forward-only phase machine ([`phase::Phase`])
//! advanced by timers and two player actions (enter, verify). Observers
//! subscribe to a broadcast stream of [`SequencerEvent`]s; the caller's
//! completion handler fires exactly once, at `Verified`, with the identity
//! that was submitted to `start()`.
//!
//! Every pending timer lives in an owned task list and is cancelled by
//! [`Sequencer::dispose`] (also on drop) — nothing fires after teardown.

pub mod phase;
pub mod reward;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

use crate::config::{LobbyConfig, Timings};
use crate::error::SequencerError;
use crate::player::PlayerIdentity;

pub use phase::Phase;

/// Broadcast channel capacity for sequencer events.
const EVENT_CAPACITY: usize = 1024;

/// Sound cues the funnel emits. Rendering (or ignoring) them is the
/// frontend's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Click,
    Coin,
    Tick,
    Scan,
    Alert,
    Success,
}

/// Events broadcast to sequencer observers.
#[derive(Debug, Clone)]
pub enum SequencerEvent {
    /// The phase machine moved forward.
    PhaseChanged { from: Phase, to: Phase },
    /// A simulated processing step began.
    StepStarted { index: usize, label: String },
    /// A simulated processing step finished.
    StepCompleted { index: usize },
    /// The reward was drawn and will never change again.
    RewardFinalized { amount: u64 },
    /// A transient value of the counting-up animation. Only the final tick
    /// equals the finalized reward.
    CounterTick { displayed: u64 },
    /// A sound cue.
    Sound(SoundCue),
    /// The funnel reached `Verified` and the completion handler fired.
    Completed { identity: PlayerIdentity },
}

/// The slice of configuration the sequencer needs.
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Labels of the simulated processing steps.
    pub steps: Vec<String>,
    /// Inclusive reward bounds.
    pub reward_min: u64,
    pub reward_max: u64,
    pub timings: Timings,
}

impl SequencerConfig {
    /// Extract the sequencer view from the full lobby configuration.
    pub fn from_lobby(config: &LobbyConfig) -> Self {
        Self {
            steps: config.theme.processing_steps.clone(),
            reward_min: config.theme.reward_min,
            reward_max: config.theme.reward_max,
            timings: config.timings.clone(),
        }
    }
}

type CompletionHandler = Box<dyn FnOnce(PlayerIdentity) + Send + 'static>;
type VerificationHook = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Debug, Default)]
struct Inner {
    phase: Phase,
    identity: Option<PlayerIdentity>,
    reward: Option<u64>,
}

/// The onboarding sequencer. One instance drives one run of the funnel and
/// is discarded after `Verified`.
pub struct Sequencer {
    config: SequencerConfig,
    inner: Arc<RwLock<Inner>>,
    events: broadcast::Sender<SequencerEvent>,
    on_complete: Arc<Mutex<Option<CompletionHandler>>>,
    hook: Mutex<Option<VerificationHook>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl Sequencer {
    /// Create a sequencer. `on_complete` is invoked exactly once, when the
    /// player confirms entry after verification.
    pub fn new(
        config: SequencerConfig,
        on_complete: impl FnOnce(PlayerIdentity) + Send + 'static,
    ) -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            inner: Arc::new(RwLock::new(Inner::default())),
            events,
            on_complete: Arc::new(Mutex::new(Some(Box::new(on_complete)))),
            hook: Mutex::new(None),
            tasks: Mutex::new(Vec::new()),
            disposed: AtomicBool::new(false),
        }
    }

    /// Subscribe to sequencer events.
    pub fn subscribe(&self) -> broadcast::Receiver<SequencerEvent> {
        self.events.subscribe()
    }

    /// Register the externally supplied verification hook.
    ///
    /// The hook is invoked on entry to `Verifying`; its outcome is never
    /// observed — the funnel advances on its own timer regardless.
    pub fn set_verification_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Arc::new(hook));
    }

    /// Current phase.
    pub async fn phase(&self) -> Phase {
        self.inner.read().await.phase
    }

    /// The finalized reward, once `Processing` has been entered.
    pub async fn reward(&self) -> Option<u64> {
        self.inner.read().await.reward
    }

    /// The identity submitted to `start()`, if a run is in flight.
    pub async fn identity(&self) -> Option<PlayerIdentity> {
        self.inner.read().await.identity.clone()
    }

    /// Begin the phase sequence.
    ///
    /// Finalizes the reward, kicks off the processing steps and the counter
    /// animation. Rejected unless the sequencer is `Idle` — a second call
    /// while a run is in flight changes nothing and spawns no timers.
    pub async fn start(&self, identity: PlayerIdentity) -> Result<(), SequencerError> {
        self.ensure_live()?;

        let amount;
        {
            let mut inner = self.inner.write().await;
            if inner.phase != Phase::Idle {
                return Err(SequencerError::AlreadyRunning { phase: inner.phase });
            }
            amount = reward::draw(self.config.reward_min, self.config.reward_max);
            inner.phase = Phase::Processing;
            inner.identity = Some(identity.clone());
            inner.reward = Some(amount);
        }

        tracing::info!(
            player = identity.display_name(),
            game = identity.chosen_game(),
            reward = amount,
            "onboarding sequence started"
        );
        self.emit(SequencerEvent::PhaseChanged {
            from: Phase::Idle,
            to: Phase::Processing,
        });
        self.emit(SequencerEvent::Sound(SoundCue::Scan));
        self.emit(SequencerEvent::RewardFinalized { amount });

        let t = &self.config.timings;
        let counter = reward::spawn_counter(
            amount,
            t.counter_duration,
            t.counter_update,
            t.coin_gap,
            self.events.clone(),
        );
        let driver = self.spawn_step_driver();
        self.track(counter);
        self.track(driver);
        Ok(())
    }

    /// The player clicked "enter" on the reward summary.
    ///
    /// Valid only in `PreEntry`. Enters the cosmetic `Scanning` pause, after
    /// which the funnel lands on the security interstitial.
    pub async fn confirm_entry(&self) -> Result<(), SequencerError> {
        self.ensure_live()?;
        {
            let mut inner = self.inner.write().await;
            if inner.phase != Phase::PreEntry {
                return Err(SequencerError::InvalidPhase {
                    expected: Phase::PreEntry,
                    actual: inner.phase,
                });
            }
            inner.phase = Phase::Scanning;
        }
        self.emit(SequencerEvent::Sound(SoundCue::Click));
        self.emit(SequencerEvent::PhaseChanged {
            from: Phase::PreEntry,
            to: Phase::Scanning,
        });
        self.emit(SequencerEvent::Sound(SoundCue::Scan));

        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        let delay = self.config.timings.scan_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            advance(&inner, &events, Phase::SecurityFlagged).await;
            let _ = events.send(SequencerEvent::Sound(SoundCue::Alert));
        });
        self.track(handle);
        Ok(())
    }

    /// The player agreed to verify.
    ///
    /// Valid only in `SecurityFlagged`. Invokes the verification hook if one
    /// is registered (its absence is logged and tolerated), then advances to
    /// `Verified` on a timer no matter what the hook did, firing the
    /// completion handler.
    pub async fn confirm_verification(&self) -> Result<(), SequencerError> {
        self.ensure_live()?;
        {
            let mut inner = self.inner.write().await;
            if inner.phase != Phase::SecurityFlagged {
                return Err(SequencerError::InvalidPhase {
                    expected: Phase::SecurityFlagged,
                    actual: inner.phase,
                });
            }
            inner.phase = Phase::Verifying;
        }
        self.emit(SequencerEvent::Sound(SoundCue::Click));
        self.emit(SequencerEvent::PhaseChanged {
            from: Phase::SecurityFlagged,
            to: Phase::Verifying,
        });

        let hook = self.hook.lock().unwrap().clone();
        let delay = match hook {
            Some(hook) => {
                tracing::info!("verification hook invoked");
                (*hook)();
                self.config.timings.verify_with_hook
            }
            None => {
                tracing::debug!("no verification hook registered, bypassing");
                self.config.timings.verify_fallback
            }
        };

        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        let on_complete = Arc::clone(&self.on_complete);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            advance(&inner, &events, Phase::Verified).await;
            let _ = events.send(SequencerEvent::Sound(SoundCue::Success));

            let identity = inner.read().await.identity.clone();
            if let Some(identity) = identity {
                let handler = on_complete.lock().unwrap().take();
                if let Some(handler) = handler {
                    handler(identity.clone());
                }
                let _ = events.send(SequencerEvent::Completed { identity });
            }
        });
        self.track(handle);
        Ok(())
    }

    /// Cancel every pending timer. Idempotent; also runs on drop. After
    /// disposal no event is emitted and no handler fires.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut tasks = self.tasks.lock().unwrap();
        let cancelled = tasks.len();
        for handle in tasks.drain(..) {
            handle.abort();
        }
        if cancelled > 0 {
            tracing::debug!(cancelled, "sequencer disposed, pending timers cancelled");
        }
    }

    fn ensure_live(&self) -> Result<(), SequencerError> {
        if self.disposed.load(Ordering::SeqCst) {
            Err(SequencerError::Disposed)
        } else {
            Ok(())
        }
    }

    fn emit(&self, event: SequencerEvent) {
        // Ok if no observers are listening.
        let _ = self.events.send(event);
    }

    fn track(&self, handle: JoinHandle<()>) {
        self.tasks.lock().unwrap().push(handle);
    }

    /// Walk the themed processing steps, then land in `PreEntry`.
    fn spawn_step_driver(&self) -> JoinHandle<()> {
        let steps = self.config.steps.clone();
        let timings = self.config.timings.clone();
        // Step durations are drawn up front; the jitter keeps the cadence
        // from feeling mechanical.
        let durations: Vec<Duration> = {
            let mut rng = rand::thread_rng();
            steps
                .iter()
                .map(|_| jittered(timings.step_base, timings.step_jitter, &mut rng))
                .collect()
        };
        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();

        tokio::spawn(async move {
            for (index, (label, duration)) in steps.into_iter().zip(durations).enumerate() {
                let _ = events.send(SequencerEvent::StepStarted { index, label });
                let _ = events.send(SequencerEvent::Sound(SoundCue::Tick));
                tokio::time::sleep(duration).await;
                let _ = events.send(SequencerEvent::StepCompleted { index });
            }
            tokio::time::sleep(timings.post_steps_pause).await;
            let _ = events.send(SequencerEvent::Sound(SoundCue::Success));
            advance(&inner, &events, Phase::PreEntry).await;
        })
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Move the phase machine forward and broadcast the change.
async fn advance(
    inner: &RwLock<Inner>,
    events: &broadcast::Sender<SequencerEvent>,
    to: Phase,
) {
    let from = {
        let mut guard = inner.write().await;
        let from = guard.phase;
        debug_assert!(from.can_transition_to(to), "{from} -> {to}");
        guard.phase = to;
        from
    };
    tracing::debug!(%from, %to, "phase transition");
    let _ = events.send(SequencerEvent::PhaseChanged { from, to });
}

/// `base ± jitter`, never below zero.
fn jittered(base: Duration, jitter: Duration, rng: &mut impl Rng) -> Duration {
    let j = jitter.as_millis() as i64;
    let delta = if j > 0 { rng.gen_range(-j..=j) } else { 0 };
    Duration::from_millis((base.as_millis() as i64 + delta).max(0) as u64)
}
