//! Countdown task driving one breathing session

use std::sync::Arc;
use chrono::Utc;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{
    services::{SessionRecorder, SessionSummary},
    state::{BreathingPattern, Phase, SessionPublisher, SessionState, TimerTiming},
};

/// Everything a session task needs, moved into the spawned future
pub struct SessionContext {
    pub session_id: u64,
    pub pattern: BreathingPattern,
    pub timing: TimerTiming,
    pub publisher: Arc<SessionPublisher>,
    pub recorder: Arc<dyn SessionRecorder>,
}

enum Tick {
    Stale,
    Paused,
    Advanced(u32),
}

/// Run every cycle of the pattern, then report the session as finished.
///
/// Returns early, without publishing, as soon as the state no longer belongs
/// to this session.
pub async fn breathing_session_task(ctx: SessionContext) {
    let pattern = ctx.pattern;

    for cycle in 0..pattern.cycles {
        debug!("Session {} cycle {}/{}", ctx.session_id, cycle + 1, pattern.cycles);

        // The first inhale is published by start()
        if cycle > 0 && !enter_phase(&ctx, Phase::Inhale, pattern.inhale_seconds) {
            return;
        }
        if !countdown(&ctx).await {
            return;
        }

        // A zero hold publishes nothing
        if pattern.has_hold()
            && (!enter_phase(&ctx, Phase::Hold, pattern.hold_seconds) || !countdown(&ctx).await)
        {
            return;
        }

        if !enter_phase(&ctx, Phase::Exhale, pattern.exhale_seconds) || !countdown(&ctx).await {
            return;
        }

        let last_cycle = cycle + 1 == pattern.cycles;
        let advanced = ctx.publisher.modify(|state| {
            if !state.is_current(ctx.session_id) {
                return false;
            }
            if last_cycle {
                *state = SessionState::finished(ctx.session_id, pattern.cycles);
            } else {
                state.completed_cycles += 1;
            }
            true
        });
        if !advanced {
            return;
        }

        if !last_cycle {
            sleep(ctx.timing.cycle_gap).await;
        }
    }

    info!("Breathing session {} completed {} cycles", ctx.session_id, pattern.cycles);

    let summary = SessionSummary {
        session_id: ctx.session_id,
        duration_seconds: pattern.session_seconds(),
        cycles_completed: pattern.cycles,
        finished_at: Utc::now(),
    };
    if let Err(e) = ctx.recorder.record_session(&summary) {
        warn!("Failed to record session {}: {}", ctx.session_id, e);
    }
}

/// Switch to `phase` with a full duration, if the session is still current
fn enter_phase(ctx: &SessionContext, phase: Phase, seconds: u32) -> bool {
    let entered = ctx.publisher.modify(|state| {
        if !state.is_current(ctx.session_id) {
            return false;
        }
        state.phase = phase;
        state.remaining_seconds = seconds;
        true
    });

    if entered {
        debug!("Session {} entered {:?} for {}s", ctx.session_id, phase, seconds);
    }
    entered
}

/// Count the current phase down to zero, one decrement per unpaused tick
async fn countdown(ctx: &SessionContext) -> bool {
    let tick = ctx.timing.tick;
    let mut interval = interval_at(Instant::now() + tick, tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let mut outcome = Tick::Stale;
        ctx.publisher.modify(|state| {
            if !state.is_current(ctx.session_id) {
                return false;
            }
            if state.is_paused {
                outcome = Tick::Paused;
                return false;
            }
            state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
            outcome = Tick::Advanced(state.remaining_seconds);
            true
        });

        match outcome {
            Tick::Stale => return false,
            Tick::Paused => continue,
            Tick::Advanced(0) => return true,
            Tick::Advanced(_) => {}
        }
    }
}
