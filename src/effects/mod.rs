use crate::kind::{PALETTE, Rgb};

pub mod balloons;
pub mod confetti;
pub mod fireworks;

/// How a sampled body should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Spark,
    Balloon,
}

/// Uniform sample in `[lo, hi)`.
pub(crate) fn uniform(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.f32() * (hi - lo)
}

pub(crate) fn random_color(rng: &mut fastrand::Rng) -> Rgb {
    PALETTE[rng.usize(0..PALETTE.len())]
}
