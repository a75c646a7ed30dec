//! Stateless motion model shared by every celebration effect.
//!
//! Bodies never move in place. A renderer asks for a [`Pose`] at some elapsed
//! time and gets the same answer for the same inputs, so frames can be sampled
//! out of order or repeated without drift.

/// Where a body is and how it looks at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    /// Degrees.
    pub rotation: f32,
    pub opacity: f32,
    pub scale: f32,
    /// The body has left the scene and will not come back.
    pub expired: bool,
}

impl Pose {
    /// A body that exists but has not appeared yet.
    pub const fn pending(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            opacity: 0.0,
            scale: 0.0,
            expired: false,
        }
    }
}

/// Time-parameterised motion of an immutable body.
pub trait Kinematics {
    /// Pose after `elapsed_ms` of an effect that lasts `total_ms` in total.
    fn pose_at(&self, elapsed_ms: f32, total_ms: f32) -> Pose;
}

/// Integer-millisecond entry point used by the lifecycle controller and renderers.
pub fn position_at<B: Kinematics + ?Sized>(body: &B, elapsed_ms: u64, total_ms: u64) -> Pose {
    body.pose_at(elapsed_ms as f32, total_ms as f32)
}

/// Fraction of the effect that has played, in `[0, 1]`.
///
/// A zero-length effect is already over.
pub fn progress(elapsed_ms: f32, total_ms: f32) -> f32 {
    if total_ms <= 0.0 {
        1.0
    } else {
        (elapsed_ms / total_ms).clamp(0.0, 1.0)
    }
}

/// Linear fade from 1 to 0 over `[start, 1]` of progress.
pub fn fade_out(progress: f32, start: f32) -> f32 {
    if progress < start {
        1.0
    } else {
        ((1.0 - progress) / (1.0 - start)).clamp(0.0, 1.0)
    }
}
