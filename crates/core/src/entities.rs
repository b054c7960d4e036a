//! Simulation entities: the player, the world, and obstacles.

use serde::Serialize;

use crate::math::{rotate_z_90, Aabb, Vec3};
use crate::types::{ObstacleKind, Orientation, CENTER_LINE_Y, MAX_HP, PLAYER_SIZE, PLAYER_START_X};

/// The runner.
///
/// `position` is the top-left corner of the sprite in center-line mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub is_grounded: bool,
    /// Which side of the center line the player rests on
    pub is_on_top: bool,
    pub can_double_jump: bool,
    pub has_used_double_jump: bool,
    /// Airborne because of a successful jump (cleared on landing)
    pub is_jumping: bool,
    pub hp: u32,
    pub max_hp: u32,
}

impl Player {
    /// Player standing on top of the center line at `PLAYER_START_X`.
    pub fn new() -> Self {
        Self::on_line(CENTER_LINE_Y, PLAYER_SIZE)
    }

    /// Player resting on top of a line at `center_line_y`.
    pub fn on_line(center_line_y: f32, size: f32) -> Self {
        Self {
            position: Vec3::new(PLAYER_START_X, center_line_y - size, 0.0),
            velocity: Vec3::ZERO,
            is_grounded: true,
            is_on_top: true,
            can_double_jump: true,
            has_used_double_jump: false,
            is_jumping: false,
            hp: MAX_HP,
            max_hp: MAX_HP,
        }
    }

    /// Player at an arbitrary position, airborne until the first ground check.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            is_grounded: false,
            ..Self::new()
        }
    }

    pub fn with_max_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = max_hp.max(1);
        self.hp = self.max_hp;
        self
    }

    pub fn is_airborne(&self) -> bool {
        !self.is_grounded
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtract hit points, saturating at 0. Returns true if this emptied them.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.hp > 0;
        self.hp = self.hp.saturating_sub(amount);
        was_alive && self.hp == 0
    }

    /// Add hit points, capped at `max_hp`.
    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Gravity vector for a world orientation.
///
/// 0° points down the y axis (`(0, -1, 0)`), each clockwise quarter turn
/// applies [`rotate_z_90`].
pub fn gravity_for(orientation: Orientation) -> Vec3 {
    let mut g = Vec3::new(0.0, -1.0, 0.0);
    for _ in 0..orientation.quarter_turns() {
        g = rotate_z_90(g);
    }
    g
}

/// World state that physics reads and the rotation animator writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameWorld {
    /// Always a cardinal unit vector
    pub gravity_direction: Vec3,
    pub center_line_y: f32,
    /// Logical orientation; set when a rotation starts
    pub rotation: Orientation,
    /// Angle shown on screen, eased towards `rotation` while animating
    pub display_angle: f32,
    pub current_section: u32,
}

impl GameWorld {
    /// Center-line world with gravity pulling down (screen `+y`) onto the line.
    ///
    /// `rotation` stays `Deg0` here: the orientation table in [`gravity_for`]
    /// is y-up and only applies to the four-wall world, which never shares a
    /// world with the center line.
    pub fn new() -> Self {
        Self::with_center_line(CENTER_LINE_Y)
    }

    pub fn with_center_line(center_line_y: f32) -> Self {
        Self {
            gravity_direction: Vec3::new(0.0, 1.0, 0.0),
            center_line_y,
            rotation: Orientation::Deg0,
            display_angle: 0.0,
            current_section: 0,
        }
    }

    /// Four-wall world whose gravity follows `orientation`.
    pub fn rotated(orientation: Orientation) -> Self {
        Self {
            gravity_direction: gravity_for(orientation),
            rotation: orientation,
            display_angle: orientation.degrees() as f32,
            ..Self::new()
        }
    }
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Something the player can run into. Placed by an external spawner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    pub id: u32,
    /// Center of the obstacle
    pub position: Vec3,
    pub size: Vec3,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(id: u32, position: Vec3, size: Vec3, kind: ObstacleKind) -> Self {
        Self {
            id,
            position,
            size,
            kind,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_rests_on_line() {
        let p = Player::new();
        assert!(p.is_grounded);
        assert!(p.is_on_top);
        assert_eq!(p.position.y + PLAYER_SIZE, CENTER_LINE_Y);
        assert_eq!(p.hp, MAX_HP);
    }

    #[test]
    fn damage_saturates_and_reports_death_once() {
        let mut p = Player::new().with_max_hp(30);
        assert!(!p.apply_damage(20));
        assert!(p.apply_damage(20));
        assert_eq!(p.hp, 0);
        assert!(!p.apply_damage(5));
        assert!(!p.is_alive());
    }

    #[test]
    fn heal_caps_at_max() {
        let mut p = Player::new();
        p.apply_damage(10);
        p.heal(50);
        assert_eq!(p.hp, p.max_hp);
    }

    #[test]
    fn with_max_hp_rejects_zero() {
        let p = Player::new().with_max_hp(0);
        assert_eq!(p.max_hp, 1);
        assert_eq!(p.hp, 1);
    }

    #[test]
    fn gravity_table_is_cardinal() {
        assert_eq!(gravity_for(Orientation::Deg0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(gravity_for(Orientation::Deg90), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(gravity_for(Orientation::Deg180), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(gravity_for(Orientation::Deg270), Vec3::new(-1.0, 0.0, 0.0));
    }
}
