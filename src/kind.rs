use crate::error::EffectError;
use std::fmt;
use std::str::FromStr;

pub type Rgb = (u8, u8, u8);

/// Shared palette for every celebration effect.
pub const PALETTE: [Rgb; 12] = [
    (0xFF, 0x6B, 0x6B), // coral
    (0x4E, 0xCD, 0xC4), // turquoise
    (0x45, 0xB7, 0xD1), // sky blue
    (0x96, 0xCE, 0xB4), // sage
    (0xFF, 0xEA, 0xA7), // cream
    (0xDD, 0xA0, 0xDD), // plum
    (0xFF, 0xD7, 0x00), // gold
    (0xFF, 0x69, 0xB4), // hot pink
    (0x00, 0xCE, 0xD1), // dark turquoise
    (0x98, 0xFB, 0x98), // pale green
    (0xF0, 0xE6, 0x8C), // khaki
    (0xFF, 0x7F, 0x50), // coral orange
];

/// The celebration visuals the engine can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectKind {
    #[default]
    Confetti,
    Fireworks,
    Balloons,
}

impl EffectKind {
    /// Fixed order used by rotating celebrations.
    pub const ROTATION: [EffectKind; 3] = [
        EffectKind::Confetti,
        EffectKind::Fireworks,
        EffectKind::Balloons,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            EffectKind::Confetti => "confetti",
            EffectKind::Fireworks => "fireworks",
            EffectKind::Balloons => "balloons",
        }
    }

    /// Number of simulated points a freshly generated population of this kind holds.
    pub const fn point_count(self) -> usize {
        match self {
            EffectKind::Confetti => 50,
            EffectKind::Fireworks => 3 * 20,
            EffectKind::Balloons => 15,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confetti" => Ok(EffectKind::Confetti),
            "fireworks" => Ok(EffectKind::Fireworks),
            "balloons" => Ok(EffectKind::Balloons),
            _ => Err(EffectError::InvalidEffectKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!("confetti".parse::<EffectKind>(), Ok(EffectKind::Confetti));
        assert_eq!(" Fireworks ".parse::<EffectKind>(), Ok(EffectKind::Fireworks));
        assert_eq!("BALLOONS".parse::<EffectKind>(), Ok(EffectKind::Balloons));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "sparkles".parse::<EffectKind>(),
            Err(EffectError::InvalidEffectKind("sparkles".to_string()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in EffectKind::ROTATION {
            assert_eq!(kind.to_string().parse::<EffectKind>(), Ok(kind));
        }
    }

    #[test]
    fn point_counts() {
        assert_eq!(EffectKind::Confetti.point_count(), 50);
        assert_eq!(EffectKind::Fireworks.point_count(), 60);
        assert_eq!(EffectKind::Balloons.point_count(), 15);
    }
}
