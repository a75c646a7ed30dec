use super::{Shape, random_color, uniform};
use crate::kind::Rgb;
use crate::kinematics::{Kinematics, Pose, fade_out, progress};
use crate::population::Viewport;

pub const PIECE_COUNT: usize = 50;

// Pieces start just above the visible area
const SPAWN_Y: f32 = -20.0;
// Pieces are gone once they fall this far past the bottom edge
const EXPIRY_MARGIN: f32 = 100.0;
/// Velocity is expressed in pixels per 10 ms.
pub const VELOCITY_SCALE: f32 = 0.1;
const SPIN_DEGREES: f32 = 720.0;
const FADE_START: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    /// Initial rotation in degrees.
    pub rotation: f32,
    pub color: Rgb,
    pub shape: Shape,
    pub expire_y: f32,
}

pub fn spawn(rng: &mut fastrand::Rng, viewport: Viewport) -> Vec<ConfettiPiece> {
    (0..PIECE_COUNT as u32)
        .map(|id| ConfettiPiece {
            id,
            x: uniform(rng, 0.0, viewport.width),
            y: SPAWN_Y,
            vx: uniform(rng, -2.0, 2.0),
            vy: uniform(rng, 2.0, 5.0),
            size: uniform(rng, 4.0, 10.0),
            rotation: uniform(rng, 0.0, 360.0),
            color: random_color(rng),
            shape: if rng.bool() { Shape::Circle } else { Shape::Square },
            expire_y: viewport.height + EXPIRY_MARGIN,
        })
        .collect()
}

impl Kinematics for ConfettiPiece {
    fn pose_at(&self, elapsed_ms: f32, total_ms: f32) -> Pose {
        let t = elapsed_ms.clamp(0.0, total_ms.max(0.0)) * VELOCITY_SCALE;
        let p = progress(elapsed_ms, total_ms);

        let x = self.x + self.vx * t;
        let y = self.y + self.vy * t;
        let opacity = fade_out(p, FADE_START);

        // Swell to 1.2 at the midpoint, then shrink to 0.8
        let scale = if p < 0.5 {
            1.0 + 0.4 * p
        } else {
            1.2 - 0.8 * (p - 0.5)
        };

        Pose {
            x,
            y,
            rotation: self.rotation + SPIN_DEGREES * p,
            opacity,
            scale,
            expired: y > self.expire_y || opacity <= 0.0,
        }
    }
}
