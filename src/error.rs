use thiserror::Error;

/// Reasons a celebration can be rejected.
///
/// Every variant is recoverable: a rejected trigger leaves the controller in the
/// state it was in before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    /// The requested effect name does not match any known effect.
    #[error("unknown effect kind {0:?} (expected confetti, fireworks or balloons)")]
    InvalidEffectKind(String),

    /// The viewport has a zero, negative or non-finite dimension.
    #[error("invalid viewport {width}x{height}: both dimensions must be positive")]
    InvalidViewport { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, EffectError>;
