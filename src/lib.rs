//! Short-lived celebration effects: confetti, fireworks and balloons.
//!
//! A [`CelebrationDispatcher`] turns application events into effects, an
//! [`EffectLifecycleController`] plays one effect at a time on a pollable timer,
//! and renderers sample [`Sprite`]s from the live population every frame.
//!
//! ```no_run
//! use celebrate::{CelebrationConfig, CelebrationDispatcher, Viewport};
//!
//! let mut dispatcher = CelebrationDispatcher::new(
//!     &CelebrationConfig::default(),
//!     Viewport::new(1280.0, 720.0),
//! );
//! dispatcher.celebrate_goal_completion(0).unwrap();
//! let sprites = dispatcher.frame(16);
//! dispatcher.poll(3000);
//! # let _ = sprites;
//! ```

pub mod config;
pub mod dispatcher;
pub mod effects;
pub mod error;
pub mod generator;
pub mod kind;
pub mod kinematics;
pub mod lifecycle;
pub mod population;
pub mod render;
pub mod signal;

pub use config::{CelebrationConfig, DEFAULT_DURATION_MS};
pub use dispatcher::{
    CelebrationDispatcher, CelebrationEvent, CelebrationPolicy, CelebrationRequest, RotationCursor,
};
pub use error::EffectError;
pub use generator::EffectGenerator;
pub use kind::{EffectKind, PALETTE, Rgb};
pub use kinematics::{Kinematics, Pose, position_at};
pub use lifecycle::{ActiveEffect, ActiveEffectState, EffectLifecycleController, TriggerId};
pub use population::{Population, Sprite, Viewport};
pub use signal::FireSignal;
