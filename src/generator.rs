use crate::effects::{balloons, confetti, fireworks};
use crate::error::Result;
use crate::kind::EffectKind;
use crate::population::{Population, Viewport};
use tracing::trace;

/// Builds the initial population for an effect.
///
/// Owns its random source so tests can pin the output with a seed instead of
/// depending on process-wide randomness.
#[derive(Debug, Clone)]
pub struct EffectGenerator {
    rng: fastrand::Rng,
}

impl Default for EffectGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectGenerator {
    /// Generator seeded from the system entropy source.
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed))
    }

    pub fn from_rng(rng: fastrand::Rng) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self, kind: EffectKind, viewport: Viewport) -> Result<Population> {
        let viewport = viewport.validate()?;
        let population = match kind {
            EffectKind::Confetti => Population::Confetti(confetti::spawn(&mut self.rng, viewport)),
            EffectKind::Fireworks => Population::Fireworks(fireworks::spawn(&mut self.rng, viewport)),
            EffectKind::Balloons => Population::Balloons(balloons::spawn(&mut self.rng, viewport)),
        };
        trace!(
            "generated {} points of {} for {}x{}",
            population.point_count(),
            kind,
            viewport.width,
            viewport.height
        );
        Ok(population)
    }

    /// Same as [`generate`](Self::generate) but takes the effect name as text.
    pub fn generate_named(&mut self, name: &str, viewport: Viewport) -> Result<Population> {
        let kind = name.parse::<EffectKind>()?;
        self.generate(kind, viewport)
    }
}
