use super::{random_color, uniform};
use crate::kind::Rgb;
use crate::kinematics::{Kinematics, Pose, progress};
use crate::population::Viewport;
use std::f32::consts::TAU;

pub const BALLOON_COUNT: usize = 15;

// Balloons start below the bottom edge and float past the top
const SPAWN_BELOW: f32 = 50.0;
const EXIT_Y: f32 = -100.0;
const GROW_FRACTION: f32 = 0.1;
const WOBBLE_DEGREES: f32 = 10.0;
const SWAY_MIN: f32 = 20.0;
const SWAY_RANGE: f32 = 60.0;
/// String length relative to balloon size.
pub const STRING_RATIO: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Balloon {
    pub id: u32,
    /// Center of the balloon.
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgb,
    /// Horizontal sway amplitude, fixed per balloon.
    pub sway: f32,
}

/// Sway amplitude for a balloon, derived from its identity so it is stable
/// across frames and across runs.
pub fn sway_amplitude(id: u32) -> f32 {
    SWAY_MIN + SWAY_RANGE * (id as f32 + 1.0).sin().abs()
}

pub fn spawn(rng: &mut fastrand::Rng, viewport: Viewport) -> Vec<Balloon> {
    (0..BALLOON_COUNT as u32)
        .map(|id| Balloon {
            id,
            x: uniform(rng, 0.0, viewport.width),
            y: viewport.height + SPAWN_BELOW,
            size: uniform(rng, 40.0, 70.0),
            color: random_color(rng),
            sway: sway_amplitude(id),
        })
        .collect()
}

impl Balloon {
    /// How far the balloon and its string reach below the center.
    pub fn reach_below(&self) -> f32 {
        self.size * (0.5 + STRING_RATIO)
    }
}

impl Kinematics for Balloon {
    fn pose_at(&self, elapsed_ms: f32, total_ms: f32) -> Pose {
        let p = progress(elapsed_ms, total_ms);
        let y = self.y + (EXIT_Y - self.y) * p;
        let x = self.x + self.sway * (TAU * p + self.id as f32).sin();

        Pose {
            x,
            y,
            rotation: WOBBLE_DEGREES * (TAU * p).sin(),
            opacity: 1.0,
            scale: (p / GROW_FRACTION).min(1.0),
            expired: y + self.reach_below() < 0.0,
        }
    }
}
