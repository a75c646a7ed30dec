//! Maps application events to effects and keeps the rotation order.

use crate::config::CelebrationConfig;
use crate::error::Result;
use crate::kind::EffectKind;
use crate::lifecycle::{EffectLifecycleController, TriggerId};
use crate::population::{Sprite, Viewport};
use std::collections::HashMap;
use tracing::debug;

/// Application events that deserve a celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CelebrationEvent {
    GoalCompletion,
    ChallengeCompletion,
    SpecialAchievement,
}

impl CelebrationEvent {
    pub const ALL: [CelebrationEvent; 3] = [
        CelebrationEvent::GoalCompletion,
        CelebrationEvent::ChallengeCompletion,
        CelebrationEvent::SpecialAchievement,
    ];
}

/// Which effect each event plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CelebrationPolicy {
    table: HashMap<CelebrationEvent, EffectKind>,
}

impl Default for CelebrationPolicy {
    fn default() -> Self {
        Self {
            table: HashMap::from([
                (CelebrationEvent::GoalCompletion, EffectKind::Confetti),
                (CelebrationEvent::ChallengeCompletion, EffectKind::Fireworks),
                (CelebrationEvent::SpecialAchievement, EffectKind::Balloons),
            ]),
        }
    }
}

impl CelebrationPolicy {
    pub fn with(mut self, event: CelebrationEvent, kind: EffectKind) -> Self {
        self.table.insert(event, kind);
        self
    }

    pub fn kind_for(&self, event: CelebrationEvent) -> EffectKind {
        self.table.get(&event).copied().unwrap_or_default()
    }
}

/// One request to play an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CelebrationRequest {
    pub kind: EffectKind,
    pub duration_ms: i64,
}

/// Position in [`EffectKind::ROTATION`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationCursor {
    index: usize,
}

impl RotationCursor {
    pub fn current(self) -> EffectKind {
        EffectKind::ROTATION[self.index]
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % EffectKind::ROTATION.len();
    }
}

pub struct CelebrationDispatcher {
    controller: EffectLifecycleController,
    policy: CelebrationPolicy,
    cursor: RotationCursor,
    // Rotating trigger still waiting to finish naturally
    pending_rotation: Option<TriggerId>,
    default_duration_ms: i64,
}

impl CelebrationDispatcher {
    pub fn new(config: &CelebrationConfig, viewport: Viewport) -> Self {
        Self::with_controller(
            EffectLifecycleController::new(config.generator(), viewport),
            config,
        )
    }

    pub fn with_controller(controller: EffectLifecycleController, config: &CelebrationConfig) -> Self {
        Self {
            controller,
            policy: config.policy.clone(),
            cursor: RotationCursor::default(),
            pending_rotation: None,
            default_duration_ms: config.default_duration_ms,
        }
    }

    /// Plays `kind`, or confetti when no kind is given.
    pub fn celebrate(&mut self, kind: Option<EffectKind>, now_ms: u64) -> Result<TriggerId> {
        self.celebrate_for(kind.unwrap_or_default(), self.default_duration_ms, now_ms)
    }

    pub fn celebrate_for(&mut self, kind: EffectKind, duration_ms: i64, now_ms: u64) -> Result<TriggerId> {
        let trigger = self.controller.trigger(kind, duration_ms, now_ms)?;
        // Whatever rotation was in flight has just been superseded
        self.pending_rotation = None;
        Ok(trigger)
    }

    /// Plays the effect named by `name`. Unknown names leave the current effect alone.
    pub fn celebrate_named(&mut self, name: &str, now_ms: u64) -> Result<TriggerId> {
        let kind = name.parse::<EffectKind>()?;
        self.celebrate(Some(kind), now_ms)
    }

    pub fn submit(&mut self, request: CelebrationRequest, now_ms: u64) -> Result<TriggerId> {
        self.celebrate_for(request.kind, request.duration_ms, now_ms)
    }

    pub fn celebrate_event(&mut self, event: CelebrationEvent, now_ms: u64) -> Result<TriggerId> {
        let kind = self.policy.kind_for(event);
        debug!("{:?} celebrates with {}", event, kind);
        self.celebrate(Some(kind), now_ms)
    }

    pub fn celebrate_goal_completion(&mut self, now_ms: u64) -> Result<TriggerId> {
        self.celebrate_event(CelebrationEvent::GoalCompletion, now_ms)
    }

    pub fn celebrate_challenge_completion(&mut self, now_ms: u64) -> Result<TriggerId> {
        self.celebrate_event(CelebrationEvent::ChallengeCompletion, now_ms)
    }

    pub fn celebrate_special_achievement(&mut self, now_ms: u64) -> Result<TriggerId> {
        self.celebrate_event(CelebrationEvent::SpecialAchievement, now_ms)
    }

    /// Plays the cursor's current effect. The cursor moves on only once that
    /// effect finishes by itself.
    pub fn celebrate_rotating(&mut self, now_ms: u64) -> Result<TriggerId> {
        let kind = self.cursor.current();
        let trigger = self.controller.trigger(kind, self.default_duration_ms, now_ms)?;
        self.pending_rotation = Some(trigger);
        self.settle_rotation();
        Ok(trigger)
    }

    /// Drives the completion timer. Returns whether an effect finished.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let finished = self.controller.poll(now_ms);
        self.settle_rotation();
        finished
    }

    /// Finishes the running effect now, as if its timer had fired.
    pub fn complete(&mut self) -> bool {
        let finished = self.controller.complete();
        self.settle_rotation();
        finished
    }

    pub fn cancel(&mut self) -> bool {
        self.pending_rotation = None;
        self.controller.cancel()
    }

    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.controller.on_complete(callback);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.controller.set_viewport(viewport);
    }

    pub fn frame(&self, now_ms: u64) -> Vec<Sprite> {
        self.controller.frame(now_ms)
    }

    pub fn controller(&self) -> &EffectLifecycleController {
        &self.controller
    }

    pub fn policy(&self) -> &CelebrationPolicy {
        &self.policy
    }

    pub fn rotation(&self) -> RotationCursor {
        self.cursor
    }

    fn settle_rotation(&mut self) {
        if let Some(pending) = self.pending_rotation {
            if self.controller.last_completed() == Some(pending) {
                self.cursor.advance();
                self.pending_rotation = None;
                debug!("rotation advanced to {}", self.cursor.current());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EffectError;
    use std::cell::Cell;
    use std::rc::Rc;

    fn dispatcher() -> CelebrationDispatcher {
        let config = CelebrationConfig {
            seed: Some(8),
            ..Default::default()
        };
        CelebrationDispatcher::new(&config, Viewport::new(1024.0, 768.0))
    }

    fn active_kind(d: &CelebrationDispatcher) -> Option<EffectKind> {
        d.controller().active().map(|effect| effect.kind)
    }

    #[test]
    fn default_kind_is_confetti() {
        let mut d = dispatcher();
        d.celebrate(None, 0).unwrap();
        assert_eq!(active_kind(&d), Some(EffectKind::Confetti));
        assert_eq!(d.controller().active().unwrap().duration_ms, 3000);
    }

    #[test]
    fn events_follow_the_policy() {
        let mut d = dispatcher();
        d.celebrate_goal_completion(0).unwrap();
        assert_eq!(active_kind(&d), Some(EffectKind::Confetti));
        d.celebrate_challenge_completion(0).unwrap();
        assert_eq!(active_kind(&d), Some(EffectKind::Fireworks));
        d.celebrate_special_achievement(0).unwrap();
        assert_eq!(active_kind(&d), Some(EffectKind::Balloons));
    }

    #[test]
    fn policy_can_be_replaced() {
        let config = CelebrationConfig {
            seed: Some(1),
            policy: CelebrationPolicy::default()
                .with(CelebrationEvent::GoalCompletion, EffectKind::Balloons),
            ..Default::default()
        };
        let mut d = CelebrationDispatcher::new(&config, Viewport::new(640.0, 480.0));
        d.celebrate_goal_completion(0).unwrap();
        assert_eq!(active_kind(&d), Some(EffectKind::Balloons));
        assert_eq!(
            d.policy().kind_for(CelebrationEvent::ChallengeCompletion),
            EffectKind::Fireworks
        );
    }

    #[test]
    fn unknown_name_keeps_current_effect() {
        let mut d = dispatcher();
        d.celebrate(Some(EffectKind::Balloons), 0).unwrap();
        let err = d.celebrate_named("glitter", 10).unwrap_err();
        assert_eq!(err, EffectError::InvalidEffectKind("glitter".into()));
        assert_eq!(active_kind(&d), Some(EffectKind::Balloons));
    }

    #[test]
    fn rotation_cycles_after_each_completion() {
        let mut d = dispatcher();
        let mut seen = Vec::new();
        let mut now = 0;
        for _ in 0..4 {
            d.celebrate_rotating(now).unwrap();
            seen.push(active_kind(&d).unwrap());
            now += 3000;
            assert!(d.poll(now));
        }
        assert_eq!(
            seen,
            [
                EffectKind::Confetti,
                EffectKind::Fireworks,
                EffectKind::Balloons,
                EffectKind::Confetti
            ]
        );
    }

    #[test]
    fn retriggered_rotation_advances_once() {
        let mut d = dispatcher();
        d.celebrate_rotating(0).unwrap();
        d.celebrate_rotating(100).unwrap();
        assert_eq!(active_kind(&d), Some(EffectKind::Confetti));
        assert!(d.poll(3100));
        assert_eq!(d.rotation().current(), EffectKind::Fireworks);
        assert!(!d.poll(9000));
        assert_eq!(d.rotation().current(), EffectKind::Fireworks);
    }

    #[test]
    fn cancelled_rotation_does_not_advance() {
        let mut d = dispatcher();
        d.celebrate_rotating(0).unwrap();
        assert!(d.cancel());
        assert!(!d.poll(5000));
        assert_eq!(d.rotation().current(), EffectKind::Confetti);
    }

    #[test]
    fn superseded_rotation_does_not_advance() {
        let mut d = dispatcher();
        d.celebrate_rotating(0).unwrap();
        d.celebrate(Some(EffectKind::Balloons), 500).unwrap();
        assert!(d.poll(3500));
        assert_eq!(d.rotation().current(), EffectKind::Confetti);
    }

    #[test]
    fn zero_duration_rotation_advances_immediately() {
        let config = CelebrationConfig {
            seed: Some(2),
            default_duration_ms: 0,
            ..Default::default()
        };
        let mut d = CelebrationDispatcher::new(&config, Viewport::new(640.0, 480.0));
        d.celebrate_rotating(0).unwrap();
        assert!(!d.controller().is_active());
        assert_eq!(d.rotation().current(), EffectKind::Fireworks);
    }

    #[test]
    fn independent_dispatchers_rotate_independently() {
        let mut a = dispatcher();
        let b = dispatcher();
        a.celebrate_rotating(0).unwrap();
        a.poll(3000);
        assert_eq!(a.rotation().current(), EffectKind::Fireworks);
        assert_eq!(b.rotation().current(), EffectKind::Confetti);
    }

    #[test]
    fn completion_callback_is_forwarded() {
        let mut d = dispatcher();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        d.on_complete(move || seen.set(seen.get() + 1));

        d.submit(
            CelebrationRequest {
                kind: EffectKind::Fireworks,
                duration_ms: 2000,
            },
            0,
        )
        .unwrap();
        assert!(d.complete());
        assert_eq!(count.get(), 1);
    }
}
