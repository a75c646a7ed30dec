//! Idle/Active state machine that plays one celebration at a time.
//!
//! Time is passed in as milliseconds on a caller-chosen monotonic clock. The
//! controller never sleeps. It arms a deadline, and whatever event loop owns it
//! calls [`EffectLifecycleController::poll`] to let the deadline fire.

use crate::error::Result;
use crate::generator::EffectGenerator;
use crate::kind::EffectKind;
use crate::population::{Population, Sprite, Viewport};
use tracing::debug;

/// Identifies one accepted trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub trigger: TriggerId,
    pub kind: EffectKind,
    pub started_at_ms: u64,
    pub duration_ms: u64,
    pub population: Population,
}

impl ActiveEffect {
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveEffectState {
    #[default]
    Idle,
    Active(ActiveEffect),
}

/// One-shot deadline for the running effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CompletionTimer {
    due_at_ms: Option<u64>,
}

impl CompletionTimer {
    fn arm(&mut self, due_at_ms: u64) {
        self.due_at_ms = Some(due_at_ms);
    }

    fn disarm(&mut self) {
        self.due_at_ms = None;
    }

    fn is_due(&self, now_ms: u64) -> bool {
        self.due_at_ms.is_some_and(|due| now_ms >= due)
    }
}

pub struct EffectLifecycleController {
    generator: EffectGenerator,
    viewport: Viewport,
    state: ActiveEffectState,
    timer: CompletionTimer,
    on_complete: Option<Box<dyn FnMut()>>,
    next_trigger: u64,
    last_completed: Option<TriggerId>,
}

impl EffectLifecycleController {
    pub fn new(generator: EffectGenerator, viewport: Viewport) -> Self {
        Self {
            generator,
            viewport,
            state: ActiveEffectState::Idle,
            timer: CompletionTimer::default(),
            on_complete: None,
            next_trigger: 0,
            last_completed: None,
        }
    }

    /// Registers the callback run each time an effect finishes on its own.
    ///
    /// Cancelled or superseded effects do not run it.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Dimensions used by the next trigger. Bodies already in flight keep theirs.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Starts `kind` for `duration_ms`, replacing anything already playing.
    ///
    /// The new population is generated before the state changes, so a rejected
    /// trigger leaves the previous effect untouched. A non-positive duration
    /// plays nothing and completes immediately.
    pub fn trigger(&mut self, kind: EffectKind, duration_ms: i64, now_ms: u64) -> Result<TriggerId> {
        let population = self.generator.generate(kind, self.viewport)?;
        let duration_ms = u64::try_from(duration_ms).unwrap_or(0);

        let trigger = TriggerId(self.next_trigger);
        self.next_trigger += 1;

        if let ActiveEffectState::Active(previous) = &self.state {
            debug!(
                "{} ({:?}) superseded by {} ({:?})",
                previous.kind, previous.trigger, kind, trigger
            );
        }

        self.state = ActiveEffectState::Active(ActiveEffect {
            trigger,
            kind,
            started_at_ms: now_ms,
            duration_ms,
            population,
        });
        self.timer.arm(now_ms.saturating_add(duration_ms));
        debug!("{} started for {}ms ({:?})", kind, duration_ms, trigger);

        if duration_ms == 0 {
            self.complete();
        }

        Ok(trigger)
    }

    /// Fires the completion timer if it is due. Returns whether an effect finished.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.timer.is_due(now_ms) {
            self.complete()
        } else {
            false
        }
    }

    /// Ends the running effect as a natural completion and runs the callback.
    ///
    /// Returns `false` when nothing was playing.
    pub fn complete(&mut self) -> bool {
        let ActiveEffectState::Active(effect) = std::mem::take(&mut self.state) else {
            return false;
        };
        self.timer.disarm();
        self.last_completed = Some(effect.trigger);
        debug!("{} completed ({:?})", effect.kind, effect.trigger);

        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
        true
    }

    /// Drops the running effect without running the completion callback.
    pub fn cancel(&mut self) -> bool {
        let ActiveEffectState::Active(effect) = std::mem::take(&mut self.state) else {
            return false;
        };
        self.timer.disarm();
        debug!("{} cancelled ({:?})", effect.kind, effect.trigger);
        true
    }

    pub fn state(&self) -> &ActiveEffectState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ActiveEffectState::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveEffect> {
        match &self.state {
            ActiveEffectState::Active(effect) => Some(effect),
            ActiveEffectState::Idle => None,
        }
    }

    pub fn population(&self) -> Option<&Population> {
        self.active().map(|effect| &effect.population)
    }

    /// When the armed timer wants to be polled, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timer.due_at_ms
    }

    /// Most recent trigger that finished naturally.
    pub fn last_completed(&self) -> Option<TriggerId> {
        self.last_completed
    }

    /// Samples the live population at `now_ms`. Empty while idle.
    pub fn frame(&self, now_ms: u64) -> Vec<Sprite> {
        match self.active() {
            Some(effect) => effect
                .population
                .sample(effect.elapsed_ms(now_ms), effect.duration_ms),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EffectError;
    use std::cell::Cell;
    use std::rc::Rc;

    fn controller() -> EffectLifecycleController {
        EffectLifecycleController::new(EffectGenerator::with_seed(17), Viewport::new(800.0, 600.0))
    }

    fn counting(controller: &mut EffectLifecycleController) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        controller.on_complete(move || seen.set(seen.get() + 1));
        count
    }

    #[test]
    fn starts_idle() {
        let c = controller();
        assert!(!c.is_active());
        assert!(c.population().is_none());
        assert!(c.next_deadline().is_none());
        assert!(c.frame(0).is_empty());
    }

    #[test]
    fn trigger_then_natural_completion() {
        let mut c = controller();
        let done = counting(&mut c);

        c.trigger(EffectKind::Confetti, 3000, 1000).unwrap();
        assert!(c.is_active());
        assert_eq!(c.next_deadline(), Some(4000));
        assert_eq!(c.population().map(Population::point_count), Some(50));

        assert!(!c.poll(3999));
        assert!(c.is_active());
        assert_eq!(done.get(), 0);

        assert!(c.poll(4000));
        assert!(!c.is_active());
        assert!(c.population().is_none());
        assert_eq!(done.get(), 1);

        // Timer is one-shot
        assert!(!c.poll(10_000));
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn cancel_skips_callback() {
        let mut c = controller();
        let done = counting(&mut c);

        c.trigger(EffectKind::Balloons, 3000, 0).unwrap();
        assert!(c.cancel());
        assert!(!c.is_active());
        assert!(c.next_deadline().is_none());
        assert!(!c.poll(5000));
        assert_eq!(done.get(), 0);
        assert!(!c.cancel());
    }

    #[test]
    fn retrigger_replaces_population() {
        let mut c = controller();
        let done = counting(&mut c);

        let first = c.trigger(EffectKind::Confetti, 3000, 0).unwrap();
        let second = c.trigger(EffectKind::Fireworks, 2000, 1000).unwrap();
        assert_ne!(first, second);

        let active = c.active().unwrap();
        assert_eq!(active.kind, EffectKind::Fireworks);
        assert_eq!(active.trigger, second);
        assert_eq!(active.started_at_ms, 1000);
        assert_eq!(active.population.point_count(), 60);
        assert_eq!(c.next_deadline(), Some(3000));

        // The first effect's deadline is gone with it
        assert!(!c.poll(2999));
        assert!(c.poll(3000));
        assert_eq!(done.get(), 1);
        assert_eq!(c.last_completed(), Some(second));
    }

    #[test]
    fn rejected_trigger_keeps_previous_effect() {
        let mut c = controller();
        c.trigger(EffectKind::Balloons, 3000, 0).unwrap();
        let before = c.state().clone();

        c.set_viewport(Viewport::new(-1.0, 600.0));
        let err = c.trigger(EffectKind::Confetti, 3000, 10).unwrap_err();
        assert!(matches!(err, EffectError::InvalidViewport { .. }));
        assert_eq!(c.state(), &before);
        assert_eq!(c.next_deadline(), Some(3000));
    }

    #[test]
    fn rejected_trigger_from_idle_stays_idle() {
        let mut c = EffectLifecycleController::new(
            EffectGenerator::with_seed(1),
            Viewport::new(0.0, 0.0),
        );
        assert!(c.trigger(EffectKind::Confetti, 3000, 0).is_err());
        assert!(!c.is_active());
    }

    #[test]
    fn non_positive_duration_completes_immediately() {
        let mut c = controller();
        let done = counting(&mut c);

        let id = c.trigger(EffectKind::Confetti, 0, 50).unwrap();
        assert!(!c.is_active());
        assert_eq!(done.get(), 1);
        assert_eq!(c.last_completed(), Some(id));

        c.trigger(EffectKind::Fireworks, -250, 60).unwrap();
        assert!(!c.is_active());
        assert_eq!(done.get(), 2);
    }

    #[test]
    fn explicit_complete_runs_callback_once() {
        let mut c = controller();
        let done = counting(&mut c);
        c.trigger(EffectKind::Confetti, 3000, 0).unwrap();
        assert!(c.complete());
        assert!(!c.complete());
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn viewport_change_does_not_reflow_live_bodies() {
        let mut c = controller();
        c.trigger(EffectKind::Balloons, 3000, 0).unwrap();
        let before = c.population().cloned();
        c.set_viewport(Viewport::new(100.0, 100.0));
        assert_eq!(c.population().cloned(), before);
        assert_eq!(c.viewport(), Viewport::new(100.0, 100.0));
    }

    #[test]
    fn frame_tracks_elapsed_time() {
        let mut c = controller();
        c.trigger(EffectKind::Confetti, 3000, 1000).unwrap();
        let frame = c.frame(2500);
        assert_eq!(frame.len(), 50);
        assert!(frame.iter().all(|s| (s.pose.opacity - 1.0).abs() < 1e-6));
        assert!(frame.iter().all(|s| s.pose.y > -20.0));
    }
}
