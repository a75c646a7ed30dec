use crate::config::DEFAULT_DURATION_MS;
use crate::dispatcher::CelebrationRequest;
use crate::kind::EffectKind;

/// Turns a level-style "fire" flag into one request per rising edge.
///
/// The most recent effect hint is remembered, so a later edge without a hint
/// replays the same effect. Before any hint has been seen it is confetti.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireSignal {
    level: bool,
    hint: EffectKind,
}

impl FireSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &mut self,
        level: bool,
        hint: Option<EffectKind>,
        duration_ms: Option<i64>,
    ) -> Option<CelebrationRequest> {
        let rising = level && !self.level;
        self.level = level;
        if !rising {
            return None;
        }

        if let Some(kind) = hint {
            self.hint = kind;
        }
        Some(CelebrationRequest {
            kind: self.hint,
            duration_ms: duration_ms.unwrap_or(DEFAULT_DURATION_MS),
        })
    }

    pub fn hint(&self) -> EffectKind {
        self.hint
    }
}
