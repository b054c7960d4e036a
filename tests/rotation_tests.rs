//! World rotation through the game loop

use std::cell::Cell;
use std::rc::Rc;

use flip_runner::core::{GameLoop, GameWorld, Player, SimConfig, SimEvent, Vec3};
use flip_runner::types::{GroundMode, Orientation, RotationDirection, ROTATION_DURATION_MS};

fn walls_loop() -> GameLoop {
    let mut game = GameLoop::new(SimConfig::default().with_ground_mode(GroundMode::Walls));
    let mut player = Player::at(Vec3::new(100.0, 0.0, 0.0));
    player.is_grounded = true;
    game.set_player(player);
    game.set_world(GameWorld::rotated(Orientation::Deg0));
    game
}

fn pump(game: &mut GameLoop, now_ms: u64) {
    for handle in game.scheduler_mut().take_ready() {
        game.on_frame(handle, now_ms);
    }
}

#[test]
fn test_gravity_reacts_immediately_angle_catches_up() {
    let mut game = walls_loop();
    game.start(0);
    assert!(game.rotate_world(RotationDirection::Clockwise, 0));

    // Physics sees the new gravity before any animation frame.
    let world = game.world().unwrap();
    assert_eq!(world.gravity_direction, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(world.rotation, Orientation::Deg90);
    assert_eq!(world.display_angle, 0.0);

    pump(&mut game, 16);
    let player = game.player().unwrap();
    assert!(player.velocity.x > 0.0, "falls towards the new floor on the first tick");

    pump(&mut game, 500);
    let world = game.world().unwrap();
    assert!(world.display_angle > 0.0 && world.display_angle < 90.0);
    assert!(game.rotator().is_rotating());

    pump(&mut game, ROTATION_DURATION_MS);
    let world = game.world().unwrap();
    assert_eq!(world.display_angle, 90.0);
    assert!(!game.rotator().is_rotating());
    assert!(game
        .take_events()
        .contains(&SimEvent::RotationComplete(Orientation::Deg90)));
}

#[test]
fn test_rotation_refused_while_in_flight() {
    let mut game = walls_loop();
    game.start(0);
    assert!(game.rotate_world(RotationDirection::Clockwise, 0));
    assert!(!game.rotate_world(RotationDirection::Clockwise, 100));
    assert!(!game.enter_section(2, 200));
    assert_eq!(game.world().unwrap().rotation, Orientation::Deg90);

    pump(&mut game, 1_200);
    assert!(game.rotate_world(RotationDirection::CounterClockwise, 1_300));
    assert_eq!(game.world().unwrap().rotation, Orientation::Deg0);
    assert_eq!(game.world().unwrap().gravity_direction, Vec3::new(0.0, -1.0, 0.0));
}

#[test]
fn test_sections_follow_scripted_pattern() {
    let mut game = walls_loop();
    game.start(0);
    let mut now = 0;
    let mut seen = Vec::new();
    for section in 0..4 {
        assert!(game.enter_section(section, now));
        now += ROTATION_DURATION_MS;
        pump(&mut game, now);
        let world = game.world().unwrap();
        assert_eq!(world.current_section, section);
        seen.push(world.rotation);
    }
    // cw, cw, ccw, cw from 0°
    assert_eq!(
        seen,
        vec![
            Orientation::Deg90,
            Orientation::Deg180,
            Orientation::Deg90,
            Orientation::Deg180
        ]
    );
}

#[test]
fn test_rotation_keeps_animating_while_paused() {
    let fired = Rc::new(Cell::new(0u32));
    let counter = fired.clone();

    let mut game = walls_loop();
    game.on_rotation_complete(Box::new(move |_| counter.set(counter.get() + 1)));
    game.start(0);
    game.rotate_world(RotationDirection::Clockwise, 0);
    game.pause();

    pump(&mut game, 400);
    pump(&mut game, ROTATION_DURATION_MS + 10);
    assert_eq!(fired.get(), 1);
    assert_eq!(game.world().unwrap().display_angle, 90.0);
    // The loop itself stayed paused.
    assert_eq!(game.frame_count(), 0);
}

#[test]
fn test_rotation_without_world_is_refused() {
    let mut game = GameLoop::new(SimConfig::default());
    assert!(!game.rotate_world(RotationDirection::Clockwise, 0));
    assert!(!game.enter_section(0, 0));
}
