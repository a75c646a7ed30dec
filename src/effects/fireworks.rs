use super::{random_color, uniform};
use crate::kind::Rgb;
use crate::kinematics::{Kinematics, Pose};
use crate::population::Viewport;

pub const CLUSTER_COUNT: usize = 3;
pub const SPARKS_PER_CLUSTER: usize = 20;
/// Delay between consecutive cluster launches.
pub const LAUNCH_INTERVAL_MS: u64 = 500;
/// Every spark lives this long after its cluster bursts, whatever the effect duration.
pub const SPARK_LIFETIME_MS: f32 = 2000.0;
pub const VELOCITY_SCALE: f32 = 0.025;

// Clusters burst inside the middle band of the screen
const BAND_TOP: f32 = 0.2;
const BAND_HEIGHT: f32 = 0.6;

/// One spark of a radial burst. Carries its cluster's origin and launch time so
/// it can be sampled on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub launch_offset_ms: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FireworkCluster {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    pub launch_offset_ms: u64,
    pub sparks: Vec<Spark>,
}

impl FireworkCluster {
    /// Ring burst: sparks evenly spaced around the circle with random speed.
    fn burst(id: u32, x: f32, y: f32, color: Rgb, launch_offset_ms: u64, rng: &mut fastrand::Rng) -> Self {
        let sparks = (0..SPARKS_PER_CLUSTER)
            .map(|i| {
                let angle = (i as f32 / SPARKS_PER_CLUSTER as f32) * std::f32::consts::PI * 2.0;
                let speed = uniform(rng, 2.0, 6.0);
                Spark {
                    id: id * SPARKS_PER_CLUSTER as u32 + i as u32,
                    x,
                    y,
                    vx: angle.cos() * speed,
                    vy: angle.sin() * speed,
                    color,
                    launch_offset_ms: launch_offset_ms as f32,
                }
            })
            .collect();

        Self {
            id,
            x,
            y,
            color,
            launch_offset_ms,
            sparks,
        }
    }
}

pub fn spawn(rng: &mut fastrand::Rng, viewport: Viewport) -> Vec<FireworkCluster> {
    (0..CLUSTER_COUNT as u32)
        .map(|id| {
            let x = uniform(rng, 0.0, viewport.width);
            let y = viewport.height * BAND_TOP + rng.f32() * viewport.height * BAND_HEIGHT;
            let color = random_color(rng);
            FireworkCluster::burst(id, x, y, color, u64::from(id) * LAUNCH_INTERVAL_MS, rng)
        })
        .collect()
}

impl Kinematics for Spark {
    fn pose_at(&self, elapsed_ms: f32, total_ms: f32) -> Pose {
        let local = elapsed_ms - self.launch_offset_ms;
        if local < 0.0 {
            return Pose::pending(self.x, self.y);
        }

        let life = (local / SPARK_LIFETIME_MS).min(1.0);
        let t = local.min(SPARK_LIFETIME_MS) * VELOCITY_SCALE;

        // Hold for the first half of the lifetime, then fade and shrink to half size
        let (opacity, scale) = if life < 0.5 {
            (1.0, 1.0)
        } else {
            ((1.0 - life) * 2.0, 1.0 - (life - 0.5))
        };

        // Sparks still in the air when the effect retires are cut off with it
        let effect_over = elapsed_ms >= total_ms;

        Pose {
            x: self.x + self.vx * t,
            y: self.y + self.vy * t,
            rotation: 0.0,
            opacity: if effect_over { 0.0 } else { opacity },
            scale,
            expired: life >= 1.0 || effect_over,
        }
    }
}
