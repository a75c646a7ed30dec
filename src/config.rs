use crate::dispatcher::CelebrationPolicy;
use crate::generator::EffectGenerator;
use crate::kind::Rgb;

/// Duration used when a caller does not ask for one.
pub const DEFAULT_DURATION_MS: i64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CelebrationConfig {
    pub default_duration_ms: i64,
    /// Fixed seed for reproducible populations; entropy-seeded when `None`.
    pub seed: Option<u64>,
    pub policy: CelebrationPolicy,
    /// Background the reference renderer blends faded bodies into.
    pub background: Rgb,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_DURATION_MS,
            seed: None,
            policy: CelebrationPolicy::default(),
            background: (0, 0, 0),
        }
    }
}

impl CelebrationConfig {
    pub fn generator(&self) -> EffectGenerator {
        match self.seed {
            Some(seed) => EffectGenerator::with_seed(seed),
            None => EffectGenerator::new(),
        }
    }
}

/// Parses `RRGGBB`, with or without a leading `#`.
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
