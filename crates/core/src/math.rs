//! Vector and rotation helpers shared by physics and the rotation animator.
//!
//! `Vec3` is re-exported from glam. Quarter-turn rotations are done by
//! swapping components so they stay exact (no trig round-off), which keeps
//! gravity vectors on the cardinal axes.

pub use glam::Vec3;
use tracing::warn;

/// `(x, y, z) → (-z, y, x)`
pub fn rotate_y_90(v: Vec3) -> Vec3 {
    Vec3::new(-v.z, v.y, v.x)
}

/// `(x, y, z) → (z, y, -x)`
pub fn rotate_y_neg_90(v: Vec3) -> Vec3 {
    Vec3::new(v.z, v.y, -v.x)
}

/// `(x, y, z) → (-y, x, z)`
pub fn rotate_z_90(v: Vec3) -> Vec3 {
    Vec3::new(-v.y, v.x, v.z)
}

/// `(x, y, z) → (y, -x, z)`
pub fn rotate_z_neg_90(v: Vec3) -> Vec3 {
    Vec3::new(v.y, -v.x, v.z)
}

/// Unit vector, or zero for a zero-length input
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Quadratic ease-in-out on `[0, 1]`.
///
/// `2p²` for the first half, `1 - (-2p + 2)² / 2` for the second. The input is
/// clamped, so `ease_in_out_quad(1.5) == 1.0`.
pub fn ease_in_out_quad(p: f32) -> f32 {
    let p = clamp(p, 0.0, 1.0);
    if p < 0.5 {
        2.0 * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(2) / 2.0
    }
}

/// Time steps must be finite and non-negative; anything else becomes 0.
pub fn sanitize_dt(dt: f32) -> f32 {
    if !dt.is_finite() {
        warn!(dt, "non-finite time step clamped to 0");
        return 0.0;
    }
    dt.max(0.0)
}

/// Axis-aligned box given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box of `size` centered on `center` (half-extents on each side)
    pub fn from_center(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box of `size` whose min corner is `corner`
    pub fn from_corner(corner: Vec3, size: Vec3) -> Self {
        Self {
            min: corner,
            max: corner + size,
        }
    }

    /// Strict overlap on all three axes. Boxes that only share a face do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}
