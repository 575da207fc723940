use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::anyhow;
use breath_pacer::{
    services::{PracticeStats, SessionRecorder, SessionSummary},
    state::PresetPattern,
    BreathingPattern, BreathingTimer, InvalidPattern, Phase, SessionState,
};
use tokio::{
    sync::broadcast::{self, error::TryRecvError},
    time::{sleep, Instant},
};

#[derive(Default)]
struct RecordingStats {
    sessions: Mutex<Vec<SessionSummary>>,
}

impl RecordingStats {
    fn sessions(&self) -> Vec<SessionSummary> {
        self.sessions.lock().unwrap().clone()
    }
}

impl SessionRecorder for RecordingStats {
    fn record_session(&self, summary: &SessionSummary) -> anyhow::Result<()> {
        self.sessions.lock().unwrap().push(summary.clone());
        Ok(())
    }
}

struct FailingStats;

impl SessionRecorder for FailingStats {
    fn record_session(&self, _summary: &SessionSummary) -> anyhow::Result<()> {
        Err(anyhow!("stats store unavailable"))
    }
}

fn timer_with_recorder() -> (BreathingTimer, Arc<RecordingStats>) {
    let stats = Arc::new(RecordingStats::default());
    (BreathingTimer::new(stats.clone()), stats)
}

fn pattern(inhale: u32, hold: u32, exhale: u32, cycles: u32) -> BreathingPattern {
    BreathingPattern::new(inhale, hold, exhale, cycles).unwrap()
}

/// Receive snapshots until one reports the session is no longer running
async fn collect_until_stopped(rx: &mut broadcast::Receiver<SessionState>) -> Vec<SessionState> {
    let mut snapshots = Vec::new();
    loop {
        let snapshot = rx.recv().await.expect("snapshot stream closed");
        let done = !snapshot.is_running;
        snapshots.push(snapshot);
        if done {
            return snapshots;
        }
    }
}

fn phases(snapshots: &[SessionState]) -> Vec<(Phase, u32)> {
    snapshots
        .iter()
        .filter(|s| s.is_running)
        .map(|s| (s.phase, s.remaining_seconds))
        .collect()
}

fn countdown(phase: Phase, from: u32) -> Vec<(Phase, u32)> {
    (0..=from).rev().map(|remaining| (phase, remaining)).collect()
}

#[tokio::test(start_paused = true)]
async fn classic_box_single_cycle_emits_every_second() {
    let (timer, stats) = timer_with_recorder();
    let mut rx = timer.subscribe_events();
    let started_at = Instant::now();

    timer.start(pattern(4, 4, 4, 1)).unwrap();
    let snapshots = collect_until_stopped(&mut rx).await;

    let mut expected = countdown(Phase::Inhale, 4);
    expected.extend(countdown(Phase::Hold, 4));
    expected.extend(countdown(Phase::Exhale, 4));
    assert_eq!(phases(&snapshots), expected);

    let last = snapshots.last().unwrap();
    assert_eq!(last.completed_cycles, 1);
    assert!(!last.is_running);
    assert_eq!(last.phase, Phase::Rest);
    assert_eq!(started_at.elapsed(), Duration::from_secs(12));

    sleep(Duration::from_millis(10)).await;
    let sessions = stats.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].duration_seconds, 12);
    assert_eq!(sessions[0].cycles_completed, 1);
}

#[tokio::test(start_paused = true)]
async fn zero_hold_skips_hold_phase() {
    let (timer, _stats) = timer_with_recorder();
    let mut rx = timer.subscribe_events();

    timer.start(pattern(4, 0, 6, 1)).unwrap();
    let snapshots = collect_until_stopped(&mut rx).await;

    let mut expected = countdown(Phase::Inhale, 4);
    expected.extend(countdown(Phase::Exhale, 6));
    assert_eq!(phases(&snapshots), expected);
    assert!(snapshots.iter().all(|s| s.phase != Phase::Hold));
}

#[tokio::test(start_paused = true)]
async fn presets_complete_every_cycle() {
    for preset in breath_pacer::state::presets::catalog() {
        let (timer, stats) = timer_with_recorder();
        let mut rx = timer.subscribe_events();
        let cycles = preset.pattern.cycles;

        timer.start(preset.pattern).unwrap();
        let snapshots = collect_until_stopped(&mut rx).await;

        let increments = snapshots
            .windows(2)
            .filter(|pair| pair[1].completed_cycles != pair[0].completed_cycles)
            .inspect(|pair| assert_eq!(pair[1].completed_cycles, pair[0].completed_cycles + 1))
            .count();
        assert_eq!(increments as u32, cycles, "{}", preset.id);

        let last = snapshots.last().unwrap();
        assert_eq!(last.completed_cycles, cycles);
        assert!(!last.is_running);
        if !preset.pattern.has_hold() {
            assert!(snapshots.iter().all(|s| s.phase != Phase::Hold), "{}", preset.id);
        }

        sleep(Duration::from_millis(10)).await;
        assert_eq!(stats.sessions().len(), 1);
        assert_eq!(stats.sessions()[0].duration_seconds, preset.pattern.session_seconds());
    }
}

#[tokio::test(start_paused = true)]
async fn remaining_seconds_never_increase_within_a_phase() {
    let (timer, _stats) = timer_with_recorder();
    let mut rx = timer.subscribe_events();

    timer.start(PresetPattern::deep_calm().pattern).unwrap();
    let snapshots = collect_until_stopped(&mut rx).await;

    for pair in snapshots.windows(2) {
        if pair[0].phase == pair[1].phase && pair[1].is_running {
            assert!(pair[1].remaining_seconds <= pair[0].remaining_seconds);
        }
        assert!(pair[1].completed_cycles >= pair[0].completed_cycles);
    }
}

#[tokio::test(start_paused = true)]
async fn cycles_are_separated_by_a_gap() {
    let (timer, _stats) = timer_with_recorder();
    let mut rx = timer.subscribe_events();
    let started_at = Instant::now();

    timer.start(pattern(1, 0, 1, 3)).unwrap();
    collect_until_stopped(&mut rx).await;

    // three 2s cycles plus two 1s gaps
    assert_eq!(started_at.elapsed(), Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_hold_and_resume_continues() {
    let (timer, _stats) = timer_with_recorder();
    timer.start(PresetPattern::relax_478().pattern).unwrap();

    sleep(Duration::from_millis(6_500)).await;
    let before = timer.snapshot();
    assert_eq!(before.phase, Phase::Hold);
    assert_eq!(before.remaining_seconds, 5);

    timer.pause();
    sleep(Duration::from_secs(10)).await;
    let frozen = timer.snapshot();
    assert!(frozen.is_paused);
    assert_eq!(frozen.phase, Phase::Hold);
    assert_eq!(frozen.remaining_seconds, 5);

    let mut rx = timer.subscribe_events();
    timer.resume();
    assert!(!timer.snapshot().is_paused);
    assert_eq!(timer.snapshot().remaining_seconds, 5);

    let mut hold = Vec::new();
    loop {
        let snapshot = rx.recv().await.unwrap();
        if snapshot.phase != Phase::Hold {
            assert_eq!((snapshot.phase, snapshot.remaining_seconds), (Phase::Exhale, 8));
            break;
        }
        hold.push(snapshot.remaining_seconds);
    }
    // the resume snapshot itself, then the rest of the countdown
    assert_eq!(hold, vec![5, 4, 3, 2, 1, 0]);
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_are_noops_when_not_applicable() {
    let (timer, _stats) = timer_with_recorder();
    let mut rx = timer.subscribe_events();

    timer.pause();
    timer.resume();
    assert!(timer.snapshot().is_idle());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    timer.start(pattern(4, 0, 4, 1)).unwrap();
    rx.recv().await.unwrap();

    timer.resume();
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    timer.pause();
    timer.pause();
    assert!(rx.recv().await.unwrap().is_paused);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn stop_resets_to_idle_mid_session() {
    let (timer, stats) = timer_with_recorder();
    timer.start(PresetPattern::relax_478().pattern).unwrap();

    sleep(Duration::from_millis(20_500)).await;
    assert!(timer.snapshot().completed_cycles >= 1);

    let mut rx = timer.subscribe_events();
    timer.stop();

    let state = timer.snapshot();
    assert!(!state.is_running);
    assert_eq!(state.completed_cycles, 0);
    assert_eq!(state.remaining_seconds, 0);
    assert_eq!(state, SessionState::idle());
    assert!(rx.recv().await.unwrap().is_idle());

    sleep(Duration::from_secs(120)).await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    assert!(stats.sessions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_while_paused_resets_to_idle() {
    let (timer, _stats) = timer_with_recorder();
    timer.start(pattern(4, 4, 4, 2)).unwrap();
    sleep(Duration::from_millis(2_500)).await;

    timer.pause();
    timer.stop();
    assert_eq!(timer.snapshot(), SessionState::idle());
}

#[tokio::test]
async fn stop_when_idle_is_a_noop() {
    let (timer, _stats) = timer_with_recorder();
    let watch_rx = timer.subscribe();
    let mut rx = timer.subscribe_events();

    timer.stop();

    assert!(!watch_rx.has_changed().unwrap());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    assert!(timer.snapshot().is_idle());
}

#[tokio::test(start_paused = true)]
async fn restart_cancels_previous_session() {
    let (timer, stats) = timer_with_recorder();
    let first = timer.start(PresetPattern::classic_box().pattern).unwrap();
    sleep(Duration::from_millis(2_500)).await;

    let mut rx = timer.subscribe_events();
    let started_at = Instant::now();
    let second = timer.start(pattern(4, 0, 6, 1)).unwrap();
    assert_ne!(first, second);

    let snapshots = collect_until_stopped(&mut rx).await;
    assert!(snapshots.iter().all(|s| s.session_id == second));

    let initial = &snapshots[0];
    assert_eq!((initial.phase, initial.remaining_seconds), (Phase::Inhale, 4));
    assert_eq!(initial.completed_cycles, 0);

    let mut expected = countdown(Phase::Inhale, 4);
    expected.extend(countdown(Phase::Exhale, 6));
    assert_eq!(phases(&snapshots), expected);
    assert_eq!(snapshots.last().unwrap().completed_cycles, 1);
    assert_eq!(started_at.elapsed(), Duration::from_secs(10));

    sleep(Duration::from_secs(60)).await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    let sessions = stats.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_id, second);
}

#[tokio::test]
async fn invalid_pattern_is_rejected_without_mutation() {
    let (timer, _stats) = timer_with_recorder();
    let mut rx = timer.subscribe_events();

    let invalid = BreathingPattern { inhale_seconds: 0, hold_seconds: 0, exhale_seconds: 4, cycles: 1 };
    assert_eq!(timer.start(invalid), Err(InvalidPattern::ZeroInhale));

    assert!(timer.snapshot().is_idle());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn invalid_pattern_leaves_running_session_alone() {
    let (timer, _stats) = timer_with_recorder();
    let id = timer.start(pattern(4, 4, 4, 1)).unwrap();
    sleep(Duration::from_millis(1_500)).await;

    let invalid = BreathingPattern { inhale_seconds: 4, hold_seconds: 0, exhale_seconds: 4, cycles: 0 };
    assert_eq!(timer.start(invalid), Err(InvalidPattern::ZeroCycles));

    let state = timer.snapshot();
    assert!(state.is_current(id));
    assert_eq!(state.remaining_seconds, 3);
}

#[tokio::test(start_paused = true)]
async fn recorder_failure_keeps_session_finished() {
    let timer = BreathingTimer::new(Arc::new(FailingStats));
    let mut rx = timer.subscribe_events();

    timer.start(pattern(1, 0, 1, 2)).unwrap();
    collect_until_stopped(&mut rx).await;
    sleep(Duration::from_millis(10)).await;

    let state = timer.snapshot();
    assert!(state.is_finished());
    assert_eq!(state.completed_cycles, 2);
}

#[tokio::test(start_paused = true)]
async fn completed_sessions_feed_practice_stats() {
    let stats = Arc::new(PracticeStats::new());
    let timer = BreathingTimer::new(stats.clone());
    let mut rx = timer.subscribe_events();

    timer.start(pattern(2, 1, 2, 2)).unwrap();
    collect_until_stopped(&mut rx).await;
    sleep(Duration::from_millis(10)).await;

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.total_sessions, 1);
    assert_eq!(snapshot.total_seconds, 10);
    assert_eq!(snapshot.total_cycles, 2);
    assert_eq!(snapshot.current_streak_days, 1);
}

#[tokio::test(start_paused = true)]
async fn pause_during_cycle_gap_freezes_next_inhale() {
    let (timer, _stats) = timer_with_recorder();
    timer.start(pattern(1, 0, 1, 2)).unwrap();

    sleep(Duration::from_millis(2_500)).await;
    let in_gap = timer.snapshot();
    assert_eq!(in_gap.completed_cycles, 1);
    assert_eq!((in_gap.phase, in_gap.remaining_seconds), (Phase::Exhale, 0));

    timer.pause();
    sleep(Duration::from_secs(8)).await;
    let frozen = timer.snapshot();
    assert!(frozen.is_paused);
    assert_eq!((frozen.phase, frozen.remaining_seconds), (Phase::Inhale, 1));
    assert_eq!(frozen.completed_cycles, 1);

    let mut rx = timer.subscribe_events();
    timer.resume();
    sleep(Duration::from_secs(1)).await;
    let resumed = timer.snapshot();
    assert_eq!((resumed.phase, resumed.remaining_seconds), (Phase::Exhale, 1));

    let snapshots = collect_until_stopped(&mut rx).await;
    assert_eq!(snapshots.last().unwrap().completed_cycles, 2);
}

#[tokio::test(start_paused = true)]
async fn subscribe_with_snapshot_does_not_repeat_current_state() {
    let (timer, _stats) = timer_with_recorder();
    timer.start(pattern(3, 0, 3, 1)).unwrap();
    sleep(Duration::from_millis(1_500)).await;

    let (current, mut rx) = timer.subscribe_with_snapshot();
    assert_eq!((current.phase, current.remaining_seconds), (Phase::Inhale, 2));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    let next = rx.recv().await.unwrap();
    assert_eq!((next.phase, next.remaining_seconds), (Phase::Inhale, 1));
}
