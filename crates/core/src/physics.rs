//! Physics integrator.
//!
//! Every operation takes the player and world explicitly; the engine itself
//! only carries immutable tuning. Grounding is re-derived from absolute
//! position on every call, so a bad frame cannot leave stale contact state
//! behind.
//!
//! # Step Order
//!
//! [`PhysicsEngine::step`] runs the fixed per-tick sequence:
//!
//! 1. [`apply_gravity`](PhysicsEngine::apply_gravity): `v += g * strength * dt`
//! 2. [`update_position`](PhysicsEngine::update_position): `p += v * dt`
//! 3. [`check_ground_collision`](PhysicsEngine::check_ground_collision)
//!
//! Velocity is updated before position, which makes the pair a semi-implicit
//! Euler step.

use tracing::{debug, trace};

use crate::config::SimConfig;
use crate::entities::{GameWorld, Obstacle, Player};
use crate::math::{sanitize_dt, Aabb, Vec3};
use crate::types::{AirActionKind, GroundMode};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsEngine {
    config: SimConfig,
}

impl PhysicsEngine {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// `velocity += gravity_direction * gravity_strength * dt`
    pub fn apply_gravity(&self, player: &mut Player, world: &GameWorld, dt: f32) {
        let dt = sanitize_dt(dt);
        player.velocity += world.gravity_direction * (self.config.gravity_strength * dt);
    }

    /// `position += velocity * dt`
    pub fn update_position(&self, player: &mut Player, dt: f32) {
        let dt = sanitize_dt(dt);
        player.position += player.velocity * dt;
    }

    /// Gravity, integration, then ground resolution.
    pub fn step(&self, player: &mut Player, world: &GameWorld, dt: f32) {
        self.apply_gravity(player, world, dt);
        self.update_position(player, dt);
        self.check_ground_collision(player, world);
        trace!(
            y = player.position.y,
            vy = player.velocity.y,
            grounded = player.is_grounded,
            "physics step"
        );
    }

    /// Impulse opposite gravity. Only from the ground.
    pub fn jump(&self, player: &mut Player, world: &GameWorld) -> bool {
        if !player.is_grounded {
            return false;
        }

        player.velocity -= world.gravity_direction * self.config.jump_force;
        player.is_grounded = false;
        player.has_used_double_jump = false;
        player.is_jumping = true;
        debug!(vy = player.velocity.y, "jump");
        true
    }

    /// Second mid-air impulse.
    ///
    /// Overwrites (not adds to) every velocity component that gravity acts on.
    /// Always refused when the air action is [`AirActionKind::GravitySwitch`].
    pub fn double_jump(&self, player: &mut Player, world: &GameWorld) -> bool {
        if self.config.air_action != AirActionKind::DoubleJump {
            return false;
        }
        if player.is_grounded
            || !player.is_jumping
            || !player.can_double_jump
            || player.has_used_double_jump
        {
            return false;
        }

        let g = world.gravity_direction;
        let force = self.config.double_jump_force;
        if g.x != 0.0 {
            player.velocity.x = -g.x * force;
        }
        if g.y != 0.0 {
            player.velocity.y = -g.y * force;
        }
        if g.z != 0.0 {
            player.velocity.z = -g.z * force;
        }
        player.has_used_double_jump = true;
        debug!(vy = player.velocity.y, "double jump");
        true
    }

    /// Flip to the other side of the center line.
    ///
    /// Grounded players only. The player is moved (not animated) so that it sits
    /// flush against the opposite face of the line, with vertical velocity zeroed.
    /// Not available in [`GroundMode::Walls`], where gravity follows rotation.
    pub fn gravity_switch(&self, player: &mut Player, world: &mut GameWorld) -> bool {
        if self.config.ground_mode != GroundMode::CenterLine || !player.is_grounded {
            return false;
        }

        player.is_on_top = !player.is_on_top;
        let line = world.center_line_y;
        if player.is_on_top {
            world.gravity_direction = Vec3::new(0.0, 1.0, 0.0);
            player.position.y = line - self.config.player_size;
        } else {
            world.gravity_direction = Vec3::new(0.0, -1.0, 0.0);
            player.position.y = line;
        }
        player.velocity.y = 0.0;
        debug!(on_top = player.is_on_top, y = player.position.y, "gravity switch");
        true
    }

    /// Resolve the player against the ground for the configured mode.
    ///
    /// Sets `is_grounded` from scratch each call. A transition from airborne to
    /// grounded counts as a fresh landing and re-arms the double jump.
    pub fn check_ground_collision(&self, player: &mut Player, world: &GameWorld) {
        let was_grounded = player.is_grounded;
        let grounded = match self.config.ground_mode {
            GroundMode::CenterLine => self.resolve_center_line(player, world),
            GroundMode::Walls => self.resolve_walls(player, world),
        };

        player.is_grounded = grounded;
        if grounded {
            player.is_jumping = false;
            if !was_grounded {
                player.has_used_double_jump = false;
                debug!(x = player.position.x, y = player.position.y, "landed");
            }
        }
    }

    /// First obstacle (in slice order) whose box overlaps the player's box.
    ///
    /// Both boxes are centered on their entity's position. On the center line
    /// the player's `position` is otherwise the sprite's top-left corner (ground
    /// resolution and rendering use it that way), so the hitbox sits half a
    /// sprite up and to the left of what is drawn.
    pub fn check_obstacle_collision<'a>(
        &self,
        player: &Player,
        obstacles: &'a [Obstacle],
    ) -> Option<&'a Obstacle> {
        let player_box = Aabb::from_center(player.position, Vec3::splat(self.config.player_size));
        obstacles.iter().find(|o| player_box.overlaps(&o.bounds()))
    }

    fn resolve_center_line(&self, player: &mut Player, world: &GameWorld) -> bool {
        let line = world.center_line_y;
        let size = self.config.player_size;

        if player.is_on_top {
            // Falling down (+y) onto the top face; the leading edge is the sprite's bottom.
            if player.velocity.y >= 0.0 && player.position.y + size >= line {
                player.position.y = line - size;
                player.velocity.y = 0.0;
                return true;
            }
        } else if player.velocity.y <= 0.0 && player.position.y <= line {
            // Falling up (-y) onto the bottom face; the leading edge is the sprite's top.
            player.position.y = line;
            player.velocity.y = 0.0;
            return true;
        }

        false
    }

    fn resolve_walls(&self, player: &mut Player, world: &GameWorld) -> bool {
        let g = world.gravity_direction;
        let far = self.config.world_size - self.config.player_size;

        if g.y < 0.0 {
            resolve_min_wall(&mut player.position.y, &mut player.velocity.y)
        } else if g.y > 0.0 {
            resolve_max_wall(&mut player.position.y, &mut player.velocity.y, far)
        } else if g.x < 0.0 {
            resolve_min_wall(&mut player.position.x, &mut player.velocity.x)
        } else if g.x > 0.0 {
            resolve_max_wall(&mut player.position.x, &mut player.velocity.x, far)
        } else {
            false
        }
    }
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

fn resolve_min_wall(pos: &mut f32, vel: &mut f32) -> bool {
    if *pos <= 0.0 {
        *pos = 0.0;
        *vel = vel.max(0.0);
        true
    } else {
        false
    }
}

fn resolve_max_wall(pos: &mut f32, vel: &mut f32, limit: f32) -> bool {
    if *pos >= limit {
        *pos = limit;
        *vel = vel.min(0.0);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObstacleKind, Orientation, PLAYER_SIZE};

    fn engine(air: AirActionKind) -> PhysicsEngine {
        PhysicsEngine::new(SimConfig::new().with_air_action(air))
    }

    fn airborne_player(world: &GameWorld) -> Player {
        let mut p = Player::on_line(world.center_line_y, PLAYER_SIZE);
        p.position.y -= 50.0;
        p.is_grounded = false;
        p
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let physics = PhysicsEngine::default();
        let world = GameWorld::new();
        let mut p = airborne_player(&world);
        let before = p;

        physics.apply_gravity(&mut p, &world, 0.0);
        physics.update_position(&mut p, 0.0);
        assert_eq!(p, before);
    }

    #[test]
    fn negative_and_nan_dt_are_ignored() {
        let physics = PhysicsEngine::default();
        let world = GameWorld::new();
        let mut p = airborne_player(&world);
        let before = p;

        physics.apply_gravity(&mut p, &world, -0.5);
        physics.update_position(&mut p, f32::NAN);
        assert_eq!(p, before);
    }

    #[test]
    fn gravity_then_position_is_semi_implicit_euler() {
        let physics = PhysicsEngine::default();
        let world = GameWorld::new();
        let mut p = airborne_player(&world);
        p.velocity = Vec3::new(0.0, -10.0, 0.0);
        let dt = 0.5;

        let expected_v = p.velocity + world.gravity_direction * 800.0 * dt;
        let expected_p = p.position + expected_v * dt;

        physics.apply_gravity(&mut p, &world, dt);
        physics.update_position(&mut p, dt);
        assert_eq!(p.velocity, expected_v);
        assert_eq!(p.position, expected_p);
    }

    #[test]
    fn jump_requires_ground() {
        let physics = PhysicsEngine::default();
        let world = GameWorld::new();
        let mut p = Player::new();

        assert!(physics.jump(&mut p, &world));
        assert_eq!(p.velocity.y, -300.0);
        assert!(!p.is_grounded);
        assert!(!physics.jump(&mut p, &world));
    }

    #[test]
    fn double_jump_overwrites_gravity_axis_once() {
        let physics = engine(AirActionKind::DoubleJump);
        let world = GameWorld::new();
        let mut p = Player::new();

        assert!(!physics.double_jump(&mut p, &world), "grounded");
        assert!(physics.jump(&mut p, &world));
        p.velocity.y = 120.0;
        p.velocity.x = 7.0;

        assert!(physics.double_jump(&mut p, &world));
        assert_eq!(p.velocity.y, -300.0);
        assert_eq!(p.velocity.x, 7.0);
        assert!(p.has_used_double_jump);
        assert!(!physics.double_jump(&mut p, &world));
    }

    #[test]
    fn double_jump_needs_a_prior_jump() {
        let physics = engine(AirActionKind::DoubleJump);
        let world = GameWorld::new();
        let mut p = airborne_player(&world);
        assert!(!physics.double_jump(&mut p, &world));
    }

    #[test]
    fn double_jump_disabled_in_gravity_switch_mode() {
        let physics = engine(AirActionKind::GravitySwitch);
        let world = GameWorld::new();
        let mut p = Player::new();
        assert!(physics.jump(&mut p, &world));
        assert!(!physics.double_jump(&mut p, &world));
        assert!(!p.has_used_double_jump);
    }

    #[test]
    fn landing_on_top_clamps_and_rearms_double_jump() {
        let physics = engine(AirActionKind::DoubleJump);
        let world = GameWorld::with_center_line(100.0);
        let mut p = Player::on_line(100.0, PLAYER_SIZE);
        assert!(physics.jump(&mut p, &world));
        assert!(physics.double_jump(&mut p, &world));

        p.position.y = 75.0;
        p.velocity.y = 50.0;
        physics.check_ground_collision(&mut p, &world);

        assert!(p.is_grounded);
        assert_eq!(p.position.y, 100.0 - PLAYER_SIZE);
        assert_eq!(p.velocity.y, 0.0);
        assert!(!p.has_used_double_jump);
        assert!(!p.is_jumping);
    }

    #[test]
    fn rising_player_is_not_grounded() {
        let physics = PhysicsEngine::default();
        let world = GameWorld::with_center_line(100.0);
        let mut p = Player::on_line(100.0, PLAYER_SIZE);
        p.velocity.y = -10.0;
        physics.check_ground_collision(&mut p, &world);
        assert!(!p.is_grounded);
    }

    #[test]
    fn landing_from_below_clamps_to_line() {
        let physics = PhysicsEngine::default();
        let world = GameWorld::with_center_line(100.0);
        let mut p = Player::at(Vec3::new(100.0, 96.0, 0.0));
        p.is_on_top = false;
        p.velocity.y = -40.0;

        physics.check_ground_collision(&mut p, &world);
        assert!(p.is_grounded);
        assert_eq!(p.position.y, 100.0);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn ground_check_is_idempotent() {
        let physics = PhysicsEngine::default();
        let world = GameWorld::with_center_line(100.0);
        let mut p = Player::at(Vec3::new(100.0, 80.0, 0.0));
        p.velocity.y = 30.0;

        physics.check_ground_collision(&mut p, &world);
        let first = p;
        physics.check_ground_collision(&mut p, &world);
        assert_eq!(p.is_grounded, first.is_grounded);
        assert_eq!(p, first);
    }

    #[test]
    fn gravity_switch_teleports_below_line() {
        let physics = PhysicsEngine::default();
        let mut world = GameWorld::with_center_line(100.0);
        let mut p = Player::on_line(100.0, PLAYER_SIZE);
        p.velocity.y = 12.0;

        assert!(physics.gravity_switch(&mut p, &mut world));
        assert!(!p.is_on_top);
        assert_eq!(world.gravity_direction.y, -1.0);
        assert_eq!(p.position.y, 100.0);
        assert_eq!(p.velocity.y, 0.0);
        assert!(p.is_grounded);

        assert!(physics.gravity_switch(&mut p, &mut world));
        assert!(p.is_on_top);
        assert_eq!(world.gravity_direction.y, 1.0);
        assert_eq!(p.position.y, 100.0 - PLAYER_SIZE);
    }

    #[test]
    fn gravity_switch_refused_in_air_and_in_wall_mode() {
        let physics = PhysicsEngine::default();
        let mut world = GameWorld::new();
        let mut p = airborne_player(&world);
        assert!(!physics.gravity_switch(&mut p, &mut world));

        let walls = PhysicsEngine::new(SimConfig::new().with_ground_mode(GroundMode::Walls));
        let mut grounded = Player::new();
        assert!(!walls.gravity_switch(&mut grounded, &mut world));
    }

    #[test]
    fn wall_mode_follows_gravity_direction() {
        let physics = PhysicsEngine::new(SimConfig::new().with_ground_mode(GroundMode::Walls));

        let floor = GameWorld::rotated(Orientation::Deg0);
        let mut p = Player::at(Vec3::new(50.0, -4.0, 0.0));
        p.velocity = Vec3::new(5.0, -20.0, 0.0);
        physics.check_ground_collision(&mut p, &floor);
        assert!(p.is_grounded);
        assert_eq!(p.position.y, 0.0);
        assert_eq!(p.velocity, Vec3::new(5.0, 0.0, 0.0));

        let right = GameWorld::rotated(Orientation::Deg90);
        let mut p = Player::at(Vec3::new(390.0, 50.0, 0.0));
        p.velocity.x = 20.0;
        physics.check_ground_collision(&mut p, &right);
        assert!(p.is_grounded);
        assert_eq!(p.position.x, 400.0 - PLAYER_SIZE);
        assert_eq!(p.velocity.x, 0.0);

        let mut floating = Player::at(Vec3::new(200.0, 200.0, 0.0));
        physics.check_ground_collision(&mut floating, &right);
        assert!(!floating.is_grounded);
    }

    #[test]
    fn jump_in_wall_mode_pushes_away_from_floor() {
        let physics = PhysicsEngine::new(SimConfig::new().with_ground_mode(GroundMode::Walls));
        let world = GameWorld::rotated(Orientation::Deg270);
        let mut p = Player::at(Vec3::new(0.0, 100.0, 0.0));
        physics.check_ground_collision(&mut p, &world);
        assert!(p.is_grounded);

        assert!(physics.jump(&mut p, &world));
        assert_eq!(p.velocity.x, 300.0);
    }

    #[test]
    fn obstacle_overlap_and_miss() {
        let physics = PhysicsEngine::default();
        let p = Player::at(Vec3::new(100.0, 100.0, 0.0));
        let hit = Obstacle::new(
            7,
            Vec3::new(100.0, 100.0, 0.0),
            Vec3::splat(20.0),
            ObstacleKind::Block,
        );
        let miss = Obstacle {
            position: Vec3::new(200.0, 200.0, 0.0),
            ..hit
        };

        assert_eq!(physics.check_obstacle_collision(&p, &[hit]).map(|o| o.id), Some(7));
        assert!(physics.check_obstacle_collision(&p, &[miss]).is_none());
    }

    #[test]
    fn obstacle_first_match_wins() {
        let physics = PhysicsEngine::default();
        let p = Player::at(Vec3::new(100.0, 100.0, 0.0));
        let small =
            |id, x, y, kind| Obstacle::new(id, Vec3::new(x, y, 0.0), Vec3::splat(10.0), kind);
        let a = small(1, 500.0, 0.0, ObstacleKind::Saw);
        let b = small(2, 105.0, 100.0, ObstacleKind::Spike);
        let c = small(3, 95.0, 100.0, ObstacleKind::Block);

        let obstacles = [a, b, c];
        let found = physics.check_obstacle_collision(&p, &obstacles);
        assert_eq!(found.map(|o| o.id), Some(2));
    }

    #[test]
    fn obstacle_hitbox_is_centered_on_player_position() {
        let physics = PhysicsEngine::default();
        // Resting on the line: sprite covers x 100..132, y 168..200.
        let p = Player::new();

        // Up and left of the sprite, inside the centered box (84..116, 152..184).
        let above_left = Obstacle::new(
            1,
            Vec3::new(80.0, 150.0, 0.0),
            Vec3::splat(10.0),
            ObstacleKind::Spike,
        );
        assert!(physics.check_obstacle_collision(&p, &[above_left]).is_some());

        // Inside the drawn sprite's lower-right corner, outside the centered box.
        let lower_right = Obstacle {
            position: Vec3::new(128.0, 196.0, 0.0),
            ..above_left
        };
        assert!(physics.check_obstacle_collision(&p, &[lower_right]).is_none());
    }
}
