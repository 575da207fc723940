//! Breathing timer engine: owns the session state and its countdown task

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{BreathingPattern, SessionState};
use crate::{
    error::InvalidPattern,
    services::SessionRecorder,
    tasks::{breathing_session_task, SessionContext},
};

/// Capacity of the ordered snapshot stream
const EVENT_CAPACITY: usize = 256;

/// Tick and inter-cycle gap used by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTiming {
    pub tick: Duration,
    pub cycle_gap: Duration,
}

impl Default for TimerTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            cycle_gap: Duration::from_secs(1),
        }
    }
}

/// Single writer for session snapshots.
///
/// Every mutation happens under one lock and is published to both the watch
/// channel and the broadcast stream before the lock is released, so both
/// channels observe the same order.
#[derive(Debug)]
pub struct SessionPublisher {
    state: Mutex<SessionState>,
    watch_tx: watch::Sender<SessionState>,
    events_tx: broadcast::Sender<SessionState>,
}

impl SessionPublisher {
    fn new() -> Self {
        let (watch_tx, _) = watch::channel(SessionState::idle());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(SessionState::idle()),
            watch_tx,
            events_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `update` and publish the result if it reports a change
    pub fn modify<F>(&self, update: F) -> bool
    where
        F: FnOnce(&mut SessionState) -> bool,
    {
        let mut state = self.lock();
        if !update(&mut state) {
            return false;
        }

        let snapshot = state.clone();
        self.watch_tx.send_replace(snapshot.clone());
        // No subscribers is fine, the engine runs unobserved
        let _ = self.events_tx.send(snapshot);
        true
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// Current snapshot plus a receiver for every later one, taken atomically
    pub fn subscribe_with_snapshot(&self) -> (SessionState, broadcast::Receiver<SessionState>) {
        let state = self.lock();
        (state.clone(), self.events_tx.subscribe())
    }
}

/// Slot for the in-flight session task
#[derive(Debug, Default)]
struct SessionControl {
    task: Option<JoinHandle<()>>,
    generation: u64,
}

/// Drives one breathing session at a time
pub struct BreathingTimer {
    publisher: Arc<SessionPublisher>,
    recorder: Arc<dyn SessionRecorder>,
    timing: TimerTiming,
    control: Mutex<SessionControl>,
}

impl BreathingTimer {
    /// Create an idle timer with one-second ticks and gaps
    pub fn new(recorder: Arc<dyn SessionRecorder>) -> Self {
        Self::with_timing(recorder, TimerTiming::default())
    }

    pub fn with_timing(recorder: Arc<dyn SessionRecorder>, timing: TimerTiming) -> Self {
        Self {
            publisher: Arc::new(SessionPublisher::new()),
            recorder,
            timing,
            control: Mutex::new(SessionControl::default()),
        }
    }

    fn lock_control(&self) -> MutexGuard<'_, SessionControl> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new session, replacing any session already running.
    ///
    /// Returns the id of the new session. Must be called from within a tokio
    /// runtime. An invalid pattern leaves the current state untouched.
    pub fn start(&self, pattern: BreathingPattern) -> Result<u64, InvalidPattern> {
        if let Err(e) = pattern.validate() {
            warn!("Rejected breathing pattern {:?}: {}", pattern, e);
            return Err(e);
        }

        let mut control = self.lock_control();
        if let Some(task) = control.task.take() {
            debug!("Cancelling session {} before restart", control.generation);
            task.abort();
        }

        control.generation += 1;
        let session_id = control.generation;

        self.publisher.modify(|state| {
            *state = SessionState::started(session_id, &pattern);
            true
        });

        info!(
            "Starting breathing session {}: {}/{}/{}s x{}",
            session_id,
            pattern.inhale_seconds,
            pattern.hold_seconds,
            pattern.exhale_seconds,
            pattern.cycles
        );

        let context = SessionContext {
            session_id,
            pattern,
            timing: self.timing,
            publisher: Arc::clone(&self.publisher),
            recorder: Arc::clone(&self.recorder),
        };
        control.task = Some(tokio::spawn(breathing_session_task(context)));

        Ok(session_id)
    }

    /// Freeze the countdown; no-op unless a session is running unpaused
    pub fn pause(&self) {
        let paused = self.publisher.modify(|state| {
            if !state.is_running || state.is_paused {
                return false;
            }
            state.is_paused = true;
            true
        });

        if paused {
            info!("Breathing session paused");
        }
    }

    /// Continue a paused countdown from the frozen value
    pub fn resume(&self) {
        let resumed = self.publisher.modify(|state| {
            if !state.is_running || !state.is_paused {
                return false;
            }
            state.is_paused = false;
            true
        });

        if resumed {
            info!("Breathing session resumed");
        }
    }

    /// Cancel any session and reset to idle; no-op when already idle
    pub fn stop(&self) {
        let mut control = self.lock_control();
        if let Some(task) = control.task.take() {
            task.abort();
        }
        drop(control);

        let reset = self.publisher.modify(|state| {
            if state.is_idle() {
                return false;
            }
            *state = SessionState::idle();
            true
        });

        if reset {
            info!("Breathing session stopped");
        }
    }

    /// Current session snapshot
    pub fn snapshot(&self) -> SessionState {
        self.publisher.snapshot()
    }

    /// Latest-value subscription
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.publisher.watch_tx.subscribe()
    }

    /// Every snapshot, in publication order
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionState> {
        self.publisher.events_tx.subscribe()
    }

    /// Current snapshot and the stream of snapshots published after it
    pub fn subscribe_with_snapshot(&self) -> (SessionState, broadcast::Receiver<SessionState>) {
        self.publisher.subscribe_with_snapshot()
    }
}

impl Drop for BreathingTimer {
    fn drop(&mut self) {
        if let Some(task) = self.lock_control().task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for BreathingTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreathingTimer")
            .field("state", &self.publisher.snapshot())
            .field("timing", &self.timing)
            .finish()
    }
}
