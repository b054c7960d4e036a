//! Game loop lifecycle, scheduling and tick ordering

use std::cell::RefCell;
use std::rc::Rc;

use flip_runner::core::{
    FrameHandle, FrameQueue, FrameScheduler, GameLoop, GameSnapshot, GameWorld, Obstacle, Player,
    SimConfig, SimEvent, Vec3,
};
use flip_runner::types::{GameState, ObstacleKind, TouchIntent};

fn bound_loop() -> GameLoop {
    let mut game = GameLoop::new(SimConfig::default());
    game.set_player(Player::new());
    game.set_world(GameWorld::new());
    game
}

/// Deliver every pending frame at `now_ms`.
fn pump(game: &mut GameLoop, now_ms: u64) {
    for handle in game.scheduler_mut().take_ready() {
        game.on_frame(handle, now_ms);
    }
}

#[test]
fn test_lifecycle_transitions() {
    let mut game = bound_loop();
    assert_eq!(game.state(), GameState::Menu);
    assert!(!game.pause());
    assert!(!game.resume(0));

    assert!(game.start(0));
    assert_eq!(game.state(), GameState::Playing);
    assert!(game.pause());
    assert_eq!(game.state(), GameState::Paused);
    assert!(game.resume(10));
    assert_eq!(game.state(), GameState::Playing);

    game.stop();
    assert_eq!(game.state(), GameState::GameOver);
    assert!(!game.start(20));
    assert!(!game.pause());
    assert!(!game.resume(20));
}

#[test]
fn test_stop_from_menu_is_allowed() {
    let mut game = bound_loop();
    game.stop();
    assert_eq!(game.state(), GameState::GameOver);
}

#[test]
fn test_tick_computes_dt_in_seconds() {
    let mut game = bound_loop();
    game.start(1_000);
    pump(&mut game, 1_016);
    assert!((game.delta_time() - 0.016).abs() < 1e-6);
    pump(&mut game, 1_066);
    assert!((game.delta_time() - 0.050).abs() < 1e-6);
    assert_eq!(game.frame_count(), 2);
}

#[test]
fn test_paused_time_is_not_simulated() {
    let mut game = bound_loop();
    game.start(0);
    pump(&mut game, 16);
    assert!(game.pause());

    // Nothing runs while paused.
    pump(&mut game, 5_000);
    assert_eq!(game.frame_count(), 1);

    assert!(game.resume(10_000));
    pump(&mut game, 10_016);
    assert!((game.delta_time() - 0.016).abs() < 1e-6);
    assert_eq!(game.frame_count(), 2);
}

#[test]
fn test_pause_and_stop_cancel_pending_tick_synchronously() {
    let mut game = bound_loop();
    game.start(0);
    let handle = game.pending_tick().unwrap();
    assert!(game.scheduler().is_pending(handle));

    game.pause();
    assert!(!game.scheduler().is_pending(handle));
    // A host that delivers a stale handle anyway is ignored.
    assert!(!game.on_frame(handle, 16));
    assert_eq!(game.frame_count(), 0);

    game.resume(20);
    let handle = game.pending_tick().unwrap();
    game.stop();
    assert!(game.scheduler().is_empty());
    assert!(!game.on_frame(handle, 36));
    assert_eq!(game.frame_count(), 0);
}

#[test]
fn test_loop_reschedules_only_while_playing() {
    let mut game = bound_loop();
    game.start(0);
    for i in 1..=10 {
        pump(&mut game, i * 16);
        assert_eq!(game.scheduler().pending().len(), 1);
    }
    game.stop();
    pump(&mut game, 200);
    assert!(game.scheduler().is_empty());
    assert_eq!(game.frame_count(), 10);
}

#[test]
fn test_missing_bindings_skip_simulation() {
    let mut game = GameLoop::new(SimConfig::default());
    game.start(0);
    pump(&mut game, 16);
    assert!(game.player().is_none());
    assert_eq!(game.state(), GameState::Playing);
    // Ticking continues so binding later works.
    game.set_player(Player::new());
    game.set_world(GameWorld::new());
    pump(&mut game, 32);
    assert_eq!(game.frame_count(), 1);
}

#[test]
fn test_snapshot_published_after_physics() {
    let seen: Rc<RefCell<Vec<GameSnapshot>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();

    let mut game = bound_loop();
    game.set_on_snapshot(Box::new(move |s| sink.borrow_mut().push(*s)));
    game.start(0);
    assert!(game.apply_intent(TouchIntent::Jump));
    pump(&mut game, 16);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    let player = seen[0].player.unwrap();
    // The published player already has this tick's gravity and integration.
    assert!((player.velocity.y - (-300.0 + 800.0 * 0.016)).abs() < 1e-3);
    assert!(player.position.y < 168.0);
    assert_eq!(seen[0].frame, 1);
    assert_eq!(seen[0].state, GameState::Playing);
}

#[test]
fn test_gravity_switch_via_double_tap_intent() {
    let mut game = bound_loop();
    game.start(0);
    assert!(game.apply_intent(TouchIntent::DoubleJump));
    let player = game.player().unwrap();
    assert!(!player.is_on_top);
    assert_eq!(player.position.y, 200.0);
    assert_eq!(game.world().unwrap().gravity_direction, Vec3::new(0.0, -1.0, 0.0));

    // Held under the line by the flipped gravity.
    for i in 1..=30 {
        pump(&mut game, i * 16);
    }
    let player = game.player().unwrap();
    assert!(player.is_grounded);
    assert_eq!(player.position.y, 200.0);
}

#[test]
fn test_fatal_obstacles_end_the_game() {
    let mut game = bound_loop();
    let center = game.player().unwrap().position;
    game.start(0);

    // Three distinct saws in a row: 40 + 40 + 40 > 100.
    for id in 1..=3 {
        game.set_obstacles(vec![Obstacle::new(id, center, Vec3::splat(32.0), ObstacleKind::Saw)]);
        pump(&mut game, id as u64 * 16);
    }

    assert_eq!(game.state(), GameState::GameOver);
    assert_eq!(game.player().unwrap().hp, 0);
    assert!(game.scheduler().is_empty());
    let events = game.take_events();
    assert!(events.contains(&SimEvent::GameOver));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SimEvent::ObstacleHit { .. }))
            .count(),
        3
    );
}

/// Scheduler that records what it was asked to do.
#[derive(Default)]
struct RecordingScheduler {
    next: u64,
    requested: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl FrameScheduler for RecordingScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let h = FrameHandle(self.next);
        self.requested.push(h);
        h
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }
}

#[test]
fn test_custom_scheduler_is_used() {
    let mut game = GameLoop::with_scheduler(SimConfig::default(), RecordingScheduler::default());
    game.set_player(Player::new());
    game.set_world(GameWorld::new());
    game.start(0);
    let first = game.scheduler().requested[0];
    assert!(game.on_frame(first, 16));
    assert_eq!(game.scheduler().requested.len(), 2);
    game.pause();
    assert_eq!(game.scheduler().cancelled, vec![FrameHandle(2)]);
}

#[test]
fn test_default_loop_uses_frame_queue() {
    let game: GameLoop<FrameQueue> = GameLoop::default();
    assert!(game.scheduler().is_empty());
}
