//! Game session controller
//!
//! Owns score, countdown and the state machine. Time only moves through
//! [`Session::advance`], which delivers the 1 Hz tick, the target
//! disappearance and the shake timeout in chronological order.

use std::time::Duration;

use super::lifecycle::{LifecycleEvent, TargetLifecycle};
use super::spawn::{SpawnBounds, SpawnGenerator};
use super::state::{GameEvent, GameState, SessionSnapshot};
use super::target::Target;
use super::timer::{Delay, Interval};
use crate::consts::*;

/// The target currently on screen together with its lifecycle
#[derive(Debug, Clone)]
struct MountedTarget {
    target: Target,
    lifecycle: TargetLifecycle,
}

impl MountedTarget {
    fn new(target: Target) -> Self {
        Self {
            lifecycle: TargetLifecycle::new(target.id()),
            target,
        }
    }
}

impl Drop for MountedTarget {
    fn drop(&mut self) {
        self.lifecycle.teardown();
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    score: u32,
    time_left: f32,
    target: Option<MountedTarget>,
    spawner: SpawnGenerator,
    bounds: SpawnBounds,
    /// Present exactly while `Playing`
    tick_timer: Option<Interval>,
    shake: Option<Delay>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Fresh session on the start screen
    pub fn new(seed: u64) -> Self {
        Self::with_bounds(seed, SpawnBounds::default())
    }

    /// Session drawing targets from custom ranges. Inverted ranges are
    /// put back in order.
    pub fn with_bounds(seed: u64, bounds: SpawnBounds) -> Self {
        let bounds = bounds.normalized();
        Self {
            state: GameState::Ready,
            score: 0,
            time_left: INITIAL_TIME,
            target: None,
            spawner: SpawnGenerator::new(seed),
            bounds,
            tick_timer: None,
            shake: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.target.as_ref().map(|m| &m.target)
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            score: self.score,
            time_left: self.time_left,
            current_target: self.current_target().copied(),
            target_hit: self.target.as_ref().is_some_and(|m| m.lifecycle.is_hit()),
            shaking: self.is_shaking(),
        }
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === State transitions ===

    /// Reset and begin playing. Valid from `Ready` and `GameOver`.
    pub fn start_game(&mut self) {
        if self.state == GameState::Playing {
            log::debug!("start_game ignored: already playing");
            return;
        }

        self.score = 0;
        self.time_left = INITIAL_TIME;
        self.target = None;
        self.shake = None;
        self.state = GameState::Playing;
        self.tick_timer = Some(Interval::new(TICK_PERIOD));
        self.events.push(GameEvent::GameStarted);
        log::info!("Game started ({INITIAL_TIME:.1}s on the clock)");

        self.spawn_target();
    }

    /// One pulse of the countdown. Only delivered while `Playing`.
    pub fn on_tick(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.time_left -= TICK_DECREMENT;
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.end_game();
        }
    }

    /// The mounted target registered its first click
    pub fn on_target_hit(&mut self) {
        if self.state != GameState::Playing {
            log::debug!("Hit ignored outside play");
            return;
        }
        self.score += 1;
        self.time_left += HIT_BONUS;
        self.trigger_feedback();
        self.events.push(GameEvent::TargetHit {
            score: self.score,
            time_left: self.time_left,
        });
    }

    /// Pointer went down on the play area but not on the target.
    ///
    /// Does not end the game even when the clock reaches zero; the next tick
    /// does that.
    pub fn on_background_miss(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.time_left = (self.time_left - MISS_PENALTY).max(0.0);
        self.trigger_feedback();
        self.events.push(GameEvent::Missed {
            time_left: self.time_left,
        });
    }

    /// The hit target finished fading out
    pub fn on_target_disappeared(&mut self) {
        if self.state == GameState::Playing {
            self.spawn_target();
        }
    }

    // === Input routing ===

    /// Pointer-down on the mounted target. A target that is already fading
    /// swallows the click.
    pub fn pointer_down_on_target(&mut self) {
        let Some(mounted) = self.target.as_mut() else {
            return;
        };
        if let Some(event) = mounted.lifecycle.register_click() {
            self.handle_lifecycle(event);
        }
    }

    pub fn pointer_down_on_background(&mut self) {
        if self.state != GameState::Playing {
            log::debug!("Background click ignored in {:?}", self.state);
            return;
        }
        self.on_background_miss();
    }

    // === Clock ===

    /// Move time forward by `dt`, firing every deadline that falls inside it
    pub fn advance(&mut self, mut dt: Duration) {
        loop {
            let step = self.next_deadline().map_or(dt, |d| d.min(dt));
            self.step_timers(step);
            dt -= step;
            if dt.is_zero() {
                break;
            }
        }
    }

    /// Nearest pending deadline across all timers
    fn next_deadline(&self) -> Option<Duration> {
        let tick = self.tick_timer.as_ref().map(Interval::until_next);
        let disappear = self
            .target
            .as_ref()
            .and_then(|m| m.lifecycle.next_deadline());
        let shake = self.shake.as_ref().and_then(Delay::remaining);

        [tick, disappear, shake].into_iter().flatten().min()
    }

    /// Advance every timer by `step`. Simultaneous deadlines resolve as
    /// tick, then disappearance, then shake.
    fn step_timers(&mut self, step: Duration) {
        let pulses = self.tick_timer.as_mut().map_or(0, |t| t.advance(step));
        for _ in 0..pulses {
            self.on_tick();
        }

        let lifecycle_event = self
            .target
            .as_mut()
            .and_then(|m| m.lifecycle.advance(step));
        if let Some(event) = lifecycle_event {
            self.handle_lifecycle(event);
        }

        if self.shake.as_mut().is_some_and(|s| s.advance(step)) {
            self.shake = None;
        }
    }

    // === Internals ===

    fn handle_lifecycle(&mut self, event: LifecycleEvent) {
        let mounted_id = self.target.as_ref().map(|m| m.target.id());
        match event {
            LifecycleEvent::Hit { target_id } if mounted_id == Some(target_id) => {
                self.on_target_hit();
            }
            LifecycleEvent::Disappeared { target_id } if mounted_id == Some(target_id) => {
                self.on_target_disappeared();
            }
            stale => log::debug!("Dropping stale lifecycle event {stale:?}"),
        }
    }

    fn spawn_target(&mut self) {
        let target = self.spawner.generate(&self.bounds);
        self.events.push(GameEvent::TargetSpawned {
            target_id: target.id(),
        });
        self.target = Some(MountedTarget::new(target));
    }

    fn trigger_feedback(&mut self) {
        self.shake = Some(Delay::new(SHAKE_DURATION));
    }

    fn end_game(&mut self) {
        self.state = GameState::GameOver;
        self.target = None;
        self.tick_timer = None;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!("Game over, final score {}", self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn playing(seed: u64) -> Session {
        let mut session = Session::new(seed);
        session.start_game();
        session.drain_events();
        session
    }

    #[test]
    fn test_new_session_is_ready() {
        let session = Session::new(1);
        let snap = session.snapshot();
        assert_eq!(snap.state, GameState::Ready);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.time_left, 10.0);
        assert!(snap.current_target.is_none());
    }

    #[test]
    fn test_start_game() {
        let mut session = Session::new(1);
        session.start_game();

        let snap = session.snapshot();
        assert_eq!(snap.state, GameState::Playing);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.time_left, 10.0);
        assert!(snap.current_target.is_some());

        let events = session.drain_events();
        assert_eq!(events[0], GameEvent::GameStarted);
        assert!(matches!(events[1], GameEvent::TargetSpawned { .. }));
    }

    #[test]
    fn test_ready_ignores_input_and_time() {
        let mut session = Session::new(1);
        session.pointer_down_on_background();
        session.pointer_down_on_target();
        session.advance(Duration::from_secs(30));
        assert_eq!(session.state(), GameState::Ready);
        assert_eq!(session.time_left(), 10.0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_hit_then_respawn() {
        let mut session = playing(5);
        let first = *session.current_target().unwrap();

        session.pointer_down_on_target();
        assert_eq!(session.score(), 1);
        assert_eq!(session.time_left(), 10.5);
        assert!(session.snapshot().target_hit);
        assert!(session.is_shaking());
        // Hit does not spawn on its own
        assert_eq!(session.current_target().unwrap().id(), first.id());

        session.advance(ms(149));
        assert_eq!(session.current_target().unwrap().id(), first.id());

        session.advance(ms(1));
        let second = *session.current_target().unwrap();
        assert_ne!(second.id(), first.id());
        assert!(!session.snapshot().target_hit);
        assert!(!session.is_shaking());
    }

    #[test]
    fn test_double_click_scores_once() {
        let mut session = playing(5);
        session.pointer_down_on_target();
        session.pointer_down_on_target();
        assert_eq!(session.score(), 1);
        assert_eq!(session.time_left(), 10.5);

        session.advance(ms(150));
        let spawns = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::TargetSpawned { .. }))
            .count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn test_miss_penalty_floors_at_zero() {
        let mut session = playing(5);
        session.pointer_down_on_background();
        assert_eq!(session.time_left(), 9.0);

        session.time_left = 0.5;
        session.pointer_down_on_background();
        assert_eq!(session.time_left(), 0.0);
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn test_miss_to_zero_ends_on_next_tick() {
        let mut session = playing(5);
        session.advance(ms(9000));
        assert_eq!(session.time_left(), 1.0);

        session.pointer_down_on_background();
        assert_eq!(session.time_left(), 0.0);
        assert_eq!(session.state(), GameState::Playing);
        assert!(session.current_target().is_some());

        session.advance(ms(1000));
        assert_eq!(session.state(), GameState::GameOver);
        assert!(session.current_target().is_none());
        assert_eq!(session.time_left(), 0.0);
    }

    #[test]
    fn test_countdown_expires() {
        let mut session = playing(5);
        session.advance(ms(9999));
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.time_left(), 1.0);
        session.advance(ms(1));
        assert_eq!(session.state(), GameState::GameOver);
        assert!(
            session
                .drain_events()
                .contains(&GameEvent::GameOver { score: 0 })
        );
    }

    #[test]
    fn test_fractional_time_clamps_at_game_over() {
        let mut session = playing(5);
        session.pointer_down_on_target();
        // 10.5s: ten ticks leave 0.5, the eleventh ends the game
        session.advance(Duration::from_secs(10));
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.time_left(), 0.5);
        session.advance(Duration::from_secs(1));
        assert_eq!(session.state(), GameState::GameOver);
        assert_eq!(session.time_left(), 0.0);
    }

    #[test]
    fn test_no_ticks_after_game_over() {
        let mut session = playing(5);
        session.advance(Duration::from_secs(10));
        assert_eq!(session.state(), GameState::GameOver);
        session.drain_events();

        session.advance(Duration::from_secs(5));
        assert_eq!(session.time_left(), 0.0);
        session.pointer_down_on_background();
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_game_over_cancels_pending_disappearance() {
        let mut session = playing(5);
        session.advance(ms(9900));
        session.time_left = 0.5;
        session.pointer_down_on_target();
        assert_eq!(session.time_left(), 1.0);

        // Tick at +100ms ends the game before the 150ms fade completes
        session.time_left = 0.5;
        session.advance(ms(100));
        assert_eq!(session.state(), GameState::GameOver);
        session.drain_events();

        session.advance(ms(500));
        assert!(session.current_target().is_none());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_tick_and_disappear_same_instant() {
        let mut session = playing(5);
        session.advance(ms(850));
        session.time_left = 1.0;
        session.pointer_down_on_target();
        session.time_left = 1.0;
        // Tick and fade both land at +150ms; tick runs first and ends the game
        session.advance(ms(150));
        assert_eq!(session.state(), GameState::GameOver);
        assert!(session.current_target().is_none());
    }

    #[test]
    fn test_restart_resets_fully() {
        let mut session = playing(5);
        for _ in 0..3 {
            session.pointer_down_on_target();
            session.advance(ms(150));
        }
        assert_eq!(session.score(), 3);
        session.advance(Duration::from_secs(60));
        assert_eq!(session.state(), GameState::GameOver);
        let last_id = session.spawner.clone().generate(&SpawnBounds::default()).id();

        session.start_game();
        let snap = session.snapshot();
        assert_eq!(snap.state, GameState::Playing);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.time_left, 10.0);
        assert!(!snap.target_hit);
        // Ids keep counting across games
        assert!(snap.current_target.unwrap().id() >= last_id);
    }

    #[test]
    fn test_restart_while_fading_drops_old_callback() {
        let mut session = playing(5);
        session.pointer_down_on_target();
        // Clock runs out while the hit target is still fading
        session.time_left = 0.0;
        session.on_tick();
        assert_eq!(session.state(), GameState::GameOver);

        session.start_game();
        let id = session.current_target().unwrap().id();
        session.advance(ms(500));
        assert_eq!(session.current_target().unwrap().id(), id);
    }

    #[test]
    fn test_start_while_playing_is_ignored() {
        let mut session = playing(5);
        session.pointer_down_on_target();
        session.start_game();
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_stale_lifecycle_event_dropped() {
        let mut session = playing(5);
        let id = session.current_target().unwrap().id();
        session.handle_lifecycle(LifecycleEvent::Hit { target_id: id + 100 });
        session.handle_lifecycle(LifecycleEvent::Disappeared { target_id: id + 100 });
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_target().unwrap().id(), id);
    }

    #[test]
    fn test_target_never_auto_expires() {
        let mut session = playing(5);
        let id = session.current_target().unwrap().id();
        session.advance(ms(9999));
        assert_eq!(session.current_target().unwrap().id(), id);
    }

    #[test]
    fn test_inverted_bounds_still_spawn() {
        let bounds = SpawnBounds {
            x_min: 60.0,
            x_max: 40.0,
            y_min: 70.0,
            y_max: 30.0,
            size_min: 50,
            size_max: 45,
        };
        let mut session = Session::with_bounds(8, bounds);
        session.start_game();
        for _ in 0..50 {
            let target = *session.current_target().unwrap();
            assert!((40.0..=60.0).contains(&target.pos().x));
            assert!((30.0..=70.0).contains(&target.pos().y));
            assert!((45..=50).contains(&target.size()));
            session.pointer_down_on_target();
            session.advance(DISAPPEAR_DELAY);
        }
    }

    #[test]
    fn test_shake_clears_after_duration() {
        let mut session = playing(5);
        session.pointer_down_on_background();
        assert!(session.snapshot().shaking);
        session.advance(ms(149));
        assert!(session.is_shaking());
        session.advance(ms(1));
        assert!(!session.is_shaking());
    }

    #[test]
    fn test_events_report_feedback() {
        let mut session = playing(5);
        session.pointer_down_on_target();
        session.pointer_down_on_background();
        let feedback: Vec<_> = session
            .drain_events()
            .into_iter()
            .filter(GameEvent::wants_feedback)
            .collect();
        assert_eq!(
            feedback,
            vec![
                GameEvent::TargetHit {
                    score: 1,
                    time_left: 10.5
                },
                GameEvent::Missed { time_left: 9.5 },
            ]
        );
    }

    #[derive(Debug, Clone, Copy)]
    enum Input {
        Hit,
        Miss,
        Wait(u64),
    }

    fn input_strategy() -> impl Strategy<Value = Input> {
        prop_oneof![
            Just(Input::Hit),
            Just(Input::Miss),
            (1u64..1500).prop_map(Input::Wait),
        ]
    }

    proptest! {
        #[test]
        fn prop_session_invariants(
            seed in any::<u64>(),
            inputs in prop::collection::vec(input_strategy(), 1..200),
        ) {
            let mut session = playing(seed);
            for input in inputs {
                let before = session.snapshot();
                let was_fading = before.target_hit;
                match input {
                    Input::Hit => session.pointer_down_on_target(),
                    Input::Miss => session.pointer_down_on_background(),
                    Input::Wait(n) => session.advance(ms(n)),
                }
                let after = session.snapshot();

                prop_assert!(after.score >= before.score);
                prop_assert!(after.time_left >= 0.0);

                if before.state == GameState::Playing {
                    match input {
                        Input::Hit if !was_fading => {
                            prop_assert_eq!(after.score, before.score + 1);
                            prop_assert_eq!(after.time_left, before.time_left + 0.5);
                        }
                        Input::Hit => {
                            prop_assert_eq!(after.score, before.score);
                        }
                        Input::Miss => {
                            prop_assert_eq!(after.time_left, (before.time_left - 1.0).max(0.0));
                        }
                        Input::Wait(_) => {
                            prop_assert_eq!(after.score, before.score);
                        }
                    }
                }

                if after.state == GameState::Playing {
                    prop_assert!(after.current_target.is_some());
                } else {
                    prop_assert!(after.current_target.is_none());
                }
            }
        }
    }
}
