use crate::effects::balloons::Balloon;
use crate::effects::confetti::ConfettiPiece;
use crate::effects::fireworks::FireworkCluster;
use crate::effects::Shape;
use crate::error::{EffectError, Result};
use crate::kind::{EffectKind, Rgb};
use crate::kinematics::{Kinematics, Pose};

/// Drawing area in viewport pixels, read once when a population is generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Rejects zero, negative and non-finite dimensions.
    pub fn validate(self) -> Result<Self> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if usable(self.width) && usable(self.height) {
            Ok(self)
        } else {
            Err(EffectError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// The immutable initial conditions of one effect instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Population {
    Confetti(Vec<ConfettiPiece>),
    Fireworks(Vec<FireworkCluster>),
    Balloons(Vec<Balloon>),
}

/// One body sampled at a point in time, ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub id: u32,
    pub pose: Pose,
    pub size: f32,
    pub color: Rgb,
    pub shape: Shape,
}

impl Sprite {
    /// Whether the sprite contributes anything to the frame.
    pub fn is_visible(&self) -> bool {
        !self.pose.expired && self.pose.opacity > 0.0 && self.pose.scale > 0.0
    }
}

impl Population {
    pub fn kind(&self) -> EffectKind {
        match self {
            Population::Confetti(_) => EffectKind::Confetti,
            Population::Fireworks(_) => EffectKind::Fireworks,
            Population::Balloons(_) => EffectKind::Balloons,
        }
    }

    /// Number of individually simulated points (firework sparks count one by one).
    pub fn point_count(&self) -> usize {
        match self {
            Population::Confetti(pieces) => pieces.len(),
            Population::Fireworks(clusters) => clusters.iter().map(|c| c.sparks.len()).sum(),
            Population::Balloons(balloons) => balloons.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Samples every simulated point at `elapsed_ms` into an effect lasting `total_ms`.
    pub fn sample(&self, elapsed_ms: u64, total_ms: u64) -> Vec<Sprite> {
        let elapsed = elapsed_ms as f32;
        let total = total_ms as f32;
        let mut sprites = Vec::with_capacity(self.point_count());

        match self {
            Population::Confetti(pieces) => {
                sprites.extend(pieces.iter().map(|piece| Sprite {
                    id: piece.id,
                    pose: piece.pose_at(elapsed, total),
                    size: piece.size,
                    color: piece.color,
                    shape: piece.shape,
                }));
            }
            Population::Fireworks(clusters) => {
                for cluster in clusters {
                    sprites.extend(cluster.sparks.iter().map(|spark| Sprite {
                        id: spark.id,
                        pose: spark.pose_at(elapsed, total),
                        size: 1.0,
                        color: spark.color,
                        shape: Shape::Spark,
                    }));
                }
            }
            Population::Balloons(balloons) => {
                sprites.extend(balloons.iter().map(|balloon| Sprite {
                    id: balloon.id,
                    pose: balloon.pose_at(elapsed, total),
                    size: balloon.size,
                    color: balloon.color,
                    shape: Shape::Balloon,
                }));
            }
        }

        sprites
    }
}
