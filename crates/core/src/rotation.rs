//! World rotation animator.
//!
//! A rotation changes physics and visuals on different clocks:
//!
//! - **Physics**: `world.rotation` and `world.gravity_direction` jump to the
//!   target orientation the moment the rotation starts. Gravity is looked up
//!   from [`gravity_for`], never interpolated.
//! - **Visuals**: `world.display_angle` eases from the old angle to the new one
//!   over `rotation_duration_ms`, one step per host frame.
//!
//! Only one rotation can be in flight; requests made while rotating are refused.

use std::fmt;

use tracing::debug;

use crate::entities::{gravity_for, GameWorld};
use crate::math::{ease_in_out_quad, lerp};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::types::{Orientation, RotationDirection, SECTION_ROTATION_PATTERN};

/// Direction scripted for a section index (`[cw, cw, ccw, cw]`, repeating).
pub fn section_direction(section: u32) -> RotationDirection {
    SECTION_ROTATION_PATTERN[section as usize % SECTION_ROTATION_PATTERN.len()]
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveRotation {
    start_ms: u64,
    from_angle: f32,
    to_angle: f32,
    target: Orientation,
}

pub struct WorldRotator {
    duration_ms: u64,
    active: Option<ActiveRotation>,
    frame: Option<FrameHandle>,
    on_complete: Option<Box<dyn FnMut(&GameWorld)>>,
}

impl WorldRotator {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms: duration_ms.max(1),
            active: None,
            frame: None,
            on_complete: None,
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.active.is_some()
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Orientation being animated towards, if any.
    pub fn target(&self) -> Option<Orientation> {
        self.active.map(|a| a.target)
    }

    /// Frame this rotator is waiting on.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    /// Linear progress in `[0, 1]` at `now_ms`, if rotating.
    pub fn progress(&self, now_ms: u64) -> Option<f32> {
        self.active.map(|a| self.progress_of(&a, now_ms))
    }

    /// Called once each time a rotation finishes.
    pub fn on_rotation_complete(&mut self, callback: Box<dyn FnMut(&GameWorld)>) {
        self.on_complete = Some(callback);
    }

    /// Start a quarter turn.
    ///
    /// Returns false (and changes nothing) if a rotation is already running.
    pub fn rotate_world<S: FrameScheduler + ?Sized>(
        &mut self,
        world: &mut GameWorld,
        direction: RotationDirection,
        now_ms: u64,
        scheduler: &mut S,
    ) -> bool {
        if self.is_rotating() {
            debug!(?direction, "rotation refused: already rotating");
            return false;
        }

        let target = world.rotation.rotated(direction);
        let from_angle = world.display_angle;
        self.active = Some(ActiveRotation {
            start_ms: now_ms,
            from_angle,
            to_angle: from_angle + direction.signed_degrees() as f32,
            target,
        });

        world.rotation = target;
        world.gravity_direction = gravity_for(target);
        self.frame = Some(scheduler.request_frame());
        debug!(
            ?direction,
            target = target.degrees(),
            gravity = ?world.gravity_direction,
            "rotation started"
        );
        true
    }

    /// Rotate in the direction scripted for `section`.
    pub fn trigger_rotation_at_section<S: FrameScheduler + ?Sized>(
        &mut self,
        world: &mut GameWorld,
        section: u32,
        now_ms: u64,
        scheduler: &mut S,
    ) -> bool {
        self.rotate_world(world, section_direction(section), now_ms, scheduler)
    }

    /// Deliver a frame. Returns true if `handle` belonged to this rotator.
    ///
    /// Eases `display_angle`; on the final frame snaps it to the target,
    /// clears the rotating flag, and fires the completion callback. Otherwise
    /// requests the next frame.
    pub fn on_frame<S: FrameScheduler + ?Sized>(
        &mut self,
        handle: FrameHandle,
        world: &mut GameWorld,
        now_ms: u64,
        scheduler: &mut S,
    ) -> bool {
        if self.frame != Some(handle) {
            return false;
        }
        self.frame = None;

        let Some(active) = self.active else {
            return true;
        };

        let progress = self.progress_of(&active, now_ms);
        if progress >= 1.0 {
            world.display_angle = active.target.degrees() as f32;
            self.active = None;
            debug!(angle = world.display_angle, "rotation complete");
            if let Some(callback) = self.on_complete.as_mut() {
                callback(world);
            }
        } else {
            let eased = ease_in_out_quad(progress);
            world.display_angle = lerp(active.from_angle, active.to_angle, eased);
            self.frame = Some(scheduler.request_frame());
        }
        true
    }

    /// Drop any in-flight animation, snapping the visual angle to the target.
    pub fn cancel<S: FrameScheduler + ?Sized>(&mut self, world: &mut GameWorld, scheduler: &mut S) {
        if let Some(handle) = self.frame.take() {
            scheduler.cancel_frame(handle);
        }
        if let Some(active) = self.active.take() {
            world.display_angle = active.target.degrees() as f32;
        }
    }

    fn progress_of(&self, active: &ActiveRotation, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(active.start_ms);
        (elapsed as f32 / self.duration_ms as f32).clamp(0.0, 1.0)
    }
}

impl fmt::Debug for WorldRotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldRotator")
            .field("duration_ms", &self.duration_ms)
            .field("active", &self.active)
            .field("frame", &self.frame)
            .field("has_on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::math::Vec3;
    use crate::scheduler::FrameQueue;

    fn drive(rotator: &mut WorldRotator, world: &mut GameWorld, q: &mut FrameQueue, now_ms: u64) {
        for handle in q.take_ready() {
            rotator.on_frame(handle, world, now_ms, q);
        }
    }

    #[test]
    fn gravity_changes_at_start_angle_animates() {
        let mut q = FrameQueue::new();
        let mut world = GameWorld::rotated(Orientation::Deg0);
        let mut r = WorldRotator::new(1000);

        assert!(r.rotate_world(&mut world, RotationDirection::Clockwise, 0, &mut q));
        assert_eq!(world.gravity_direction, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(world.rotation, Orientation::Deg90);
        assert_eq!(world.display_angle, 0.0);

        drive(&mut r, &mut world, &mut q, 250);
        assert_eq!(world.display_angle, 90.0 * 0.125);
        assert!(r.is_rotating());

        drive(&mut r, &mut world, &mut q, 500);
        assert_eq!(world.display_angle, 45.0);

        drive(&mut r, &mut world, &mut q, 1000);
        assert_eq!(world.display_angle, 90.0);
        assert!(!r.is_rotating());
        assert!(q.is_empty());
    }

    #[test]
    fn second_rotation_is_refused_while_running() {
        let mut q = FrameQueue::new();
        let mut world = GameWorld::rotated(Orientation::Deg0);
        let mut r = WorldRotator::new(1000);

        assert!(r.rotate_world(&mut world, RotationDirection::Clockwise, 0, &mut q));
        assert!(!r.rotate_world(&mut world, RotationDirection::CounterClockwise, 10, &mut q));
        assert_eq!(world.rotation, Orientation::Deg90);
        assert_eq!(q.pending().len(), 1);
    }

    #[test]
    fn counter_clockwise_wraps_to_270() {
        let mut q = FrameQueue::new();
        let mut world = GameWorld::rotated(Orientation::Deg0);
        let mut r = WorldRotator::new(100);

        assert!(r.rotate_world(&mut world, RotationDirection::CounterClockwise, 0, &mut q));
        assert_eq!(world.rotation, Orientation::Deg270);
        assert_eq!(world.gravity_direction, Vec3::new(-1.0, 0.0, 0.0));

        drive(&mut r, &mut world, &mut q, 50);
        assert_eq!(world.display_angle, -45.0);
        drive(&mut r, &mut world, &mut q, 100);
        assert_eq!(world.display_angle, 270.0);
    }

    #[test]
    fn completion_callback_fires_once() {
        let mut q = FrameQueue::new();
        let mut world = GameWorld::rotated(Orientation::Deg0);
        let mut r = WorldRotator::new(100);
        let fired = Rc::new(Cell::new(0u32));
        let seen = fired.clone();
        r.on_rotation_complete(Box::new(move |_| seen.set(seen.get() + 1)));

        r.rotate_world(&mut world, RotationDirection::Clockwise, 0, &mut q);
        drive(&mut r, &mut world, &mut q, 40);
        assert_eq!(fired.get(), 0);
        drive(&mut r, &mut world, &mut q, 500);
        assert_eq!(fired.get(), 1);
        drive(&mut r, &mut world, &mut q, 600);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn foreign_handles_are_ignored() {
        let mut q = FrameQueue::new();
        let mut world = GameWorld::rotated(Orientation::Deg0);
        let mut r = WorldRotator::new(100);
        let other = q.request_frame();
        r.rotate_world(&mut world, RotationDirection::Clockwise, 0, &mut q);
        assert!(!r.on_frame(other, &mut world, 50, &mut q));
    }

    #[test]
    fn section_pattern_repeats() {
        assert_eq!(section_direction(0), RotationDirection::Clockwise);
        assert_eq!(section_direction(1), RotationDirection::Clockwise);
        assert_eq!(section_direction(2), RotationDirection::CounterClockwise);
        assert_eq!(section_direction(3), RotationDirection::Clockwise);
        assert_eq!(section_direction(6), RotationDirection::CounterClockwise);
    }

    #[test]
    fn cancel_snaps_to_target() {
        let mut q = FrameQueue::new();
        let mut world = GameWorld::rotated(Orientation::Deg0);
        let mut r = WorldRotator::new(1000);
        r.rotate_world(&mut world, RotationDirection::Clockwise, 0, &mut q);
        r.cancel(&mut world, &mut q);
        assert!(!r.is_rotating());
        assert!(q.is_empty());
        assert_eq!(world.display_angle, 90.0);
    }
}
