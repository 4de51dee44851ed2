//! Animated y-domain and frame scheduling
//!
//! [`AnimatedDomain`] eases a numeric domain toward whatever target it was last
//! given, sampled once per frame. [`FrameLoop`] keeps at most one frame
//! callback in flight on top of a platform [`FrameScheduler`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::chartkit::{Easing, ease_cubic_out};

/// Two domains closer than this on both ends are the same domain
pub const DOMAIN_EPSILON: f64 = 1e-6;

pub fn domains_close(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() <= DOMAIN_EPSILON && (a.1 - b.1).abs() <= DOMAIN_EPSILON
}

// ============================================================================
// STRATEGY PATTERN: Frame Scheduler
// ============================================================================

/// Platform hook that delivers a callback on the next frame
pub trait FrameScheduler {
    /// Ask for one frame callback
    fn request_frame(&mut self);

    /// Drop the pending callback, if any
    fn cancel_frame(&mut self);

    fn is_pending(&self) -> bool;

    /// The pending callback has fired
    fn frame_delivered(&mut self);
}

/// Single-flight wrapper: scheduling always cancels the previous request first
pub struct FrameLoop {
    scheduler: Box<dyn FrameScheduler>,
}

impl FrameLoop {
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self { scheduler }
    }

    pub fn schedule(&mut self) {
        self.scheduler.cancel_frame();
        self.scheduler.request_frame();
    }

    pub fn cancel(&mut self) {
        if self.scheduler.is_pending() {
            tracing::trace!("cancelling pending frame");
            self.scheduler.cancel_frame();
        }
    }

    pub fn delivered(&mut self) {
        self.scheduler.frame_delivered();
    }

    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }
}

/// Frame counters shared between a [`ManualScheduler`] and its clones
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManualFrames {
    pub requested: usize,
    pub cancelled: usize,
    pub pending: bool,
}

/// Scheduler driven by hand, for native tests and headless use
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    frames: Rc<RefCell<ManualFrames>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> ManualFrames {
        *self.frames.borrow()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        let mut frames = self.frames.borrow_mut();
        frames.requested += 1;
        frames.pending = true;
    }

    fn cancel_frame(&mut self) {
        let mut frames = self.frames.borrow_mut();
        if frames.pending {
            frames.cancelled += 1;
            frames.pending = false;
        }
    }

    fn is_pending(&self) -> bool {
        self.frames.borrow().pending
    }

    fn frame_delivered(&mut self) {
        self.frames.borrow_mut().pending = false;
    }
}

// ============================================================================
// ANIMATED DOMAIN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    from: (f64, f64),
    to: (f64, f64),
    started_at: f64,
}

/// A numeric domain that eases toward its latest target
#[derive(Debug, Clone)]
pub struct AnimatedDomain {
    current: Option<(f64, f64)>,
    target: Option<(f64, f64)>,
    transition: Option<Transition>,
    duration_ms: f64,
    enabled: bool,
    easing: Easing,
}

impl Default for AnimatedDomain {
    fn default() -> Self {
        Self::new(400.0)
    }
}

impl AnimatedDomain {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            current: None,
            target: None,
            transition: None,
            duration_ms,
            enabled: true,
            easing: ease_cubic_out,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn set_duration(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms.max(0.0);
    }

    /// Disabling snaps any running transition to its target
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.finish();
        }
    }

    pub fn current(&self) -> Option<(f64, f64)> {
        self.current
    }

    pub fn target(&self) -> Option<(f64, f64)> {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Feed a new target. Returns true when a transition started.
    pub fn set_target(&mut self, target: Option<(f64, f64)>, now: f64) -> bool {
        let Some(target) = target else {
            self.clear();
            return false;
        };

        let Some(current) = self.current else {
            self.snap_to(target);
            return false;
        };

        // same destination as the running transition: keep going
        if self.transition.is_some() && self.target.is_some_and(|t| domains_close(t, target)) {
            return false;
        }

        if !self.enabled || self.duration_ms <= 0.0 || domains_close(current, target) {
            self.snap_to(target);
            return false;
        }

        self.start(current, target, now);
        true
    }

    /// Restart from an explicit domain toward the current target
    pub fn restart_from(&mut self, from: (f64, f64), now: f64) {
        match self.target {
            Some(target) if self.enabled && self.duration_ms > 0.0 && !domains_close(from, target) => {
                self.current = Some(from);
                self.start(from, target, now);
            }
            Some(target) => self.snap_to(target),
            None => self.snap_to(from),
        }
    }

    /// Jump straight to `target`, dropping any transition
    pub fn snap_to(&mut self, target: (f64, f64)) {
        self.current = Some(target);
        self.target = Some(target);
        self.transition = None;
    }

    /// Forget everything (no data, no derivable domain)
    pub fn clear(&mut self) {
        self.current = None;
        self.target = None;
        self.transition = None;
    }

    /// Sample the transition at `now`. Returns true while still animating.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };

        let t = ((now - transition.started_at) / self.duration_ms).clamp(0.0, 1.0);
        if t >= 1.0 {
            self.finish();
            return false;
        }

        let k = (self.easing)(t);
        let (from, to) = (transition.from, transition.to);
        self.current = Some((from.0 + (to.0 - from.0) * k, from.1 + (to.1 - from.1) * k));
        tracing::trace!(progress = t, "y-domain frame");
        true
    }

    fn start(&mut self, from: (f64, f64), to: (f64, f64), now: f64) {
        tracing::debug!(?from, ?to, duration_ms = self.duration_ms, "y-domain transition started");
        self.target = Some(to);
        self.transition = Some(Transition {
            from,
            to,
            started_at: now,
        });
    }

    fn finish(&mut self) {
        if let Some(transition) = self.transition.take() {
            self.current = Some(transition.to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_target_snaps() {
        let mut domain = AnimatedDomain::new(400.0);
        assert!(!domain.set_target(Some((0.0, 10.0)), 0.0));
        assert_eq!(domain.current(), Some((0.0, 10.0)));
        assert!(!domain.is_animating());
    }

    #[test]
    fn test_eases_toward_new_target() {
        let mut domain = AnimatedDomain::new(400.0);
        domain.set_target(Some((0.0, 10.0)), 0.0);
        assert!(domain.set_target(Some((0.0, 20.0)), 100.0));

        assert!(domain.tick(300.0));
        let (_, hi) = domain.current().unwrap();
        // cubic-out passes the halfway mark early
        assert!(hi > 15.0 && hi < 20.0);

        assert!(!domain.tick(500.0));
        assert_eq!(domain.current(), Some((0.0, 20.0)));
    }

    #[test]
    fn test_retarget_restarts_from_interpolated_value() {
        let mut domain = AnimatedDomain::new(400.0).with_easing(crate::chartkit::ease_linear);
        domain.set_target(Some((0.0, 10.0)), 0.0);
        domain.set_target(Some((0.0, 20.0)), 0.0);
        domain.tick(200.0);
        assert_eq!(domain.current(), Some((0.0, 15.0)));

        assert!(domain.set_target(Some((0.0, 5.0)), 200.0));
        domain.tick(200.0);
        // no jump back to the old target
        assert_eq!(domain.current(), Some((0.0, 15.0)));
        domain.tick(400.0);
        assert_eq!(domain.current(), Some((0.0, 10.0)));
    }

    #[test]
    fn test_same_target_does_not_restart() {
        let mut domain = AnimatedDomain::new(400.0);
        domain.set_target(Some((0.0, 10.0)), 0.0);
        assert!(domain.set_target(Some((0.0, 20.0)), 0.0));
        assert!(!domain.set_target(Some((0.0, 20.0 + 1e-9)), 200.0));
        assert!(!domain.tick(400.0));
    }

    #[test]
    fn test_convergence_after_many_retargets() {
        let mut domain = AnimatedDomain::new(400.0);
        domain.set_target(Some((0.0, 1.0)), 0.0);
        let mut now = 0.0;
        for i in 1..20 {
            now += 37.0;
            domain.set_target(Some((i as f64, 10.0 * i as f64)), now);
            domain.tick(now + 16.0);
        }
        domain.tick(now + 400.0);
        let (lo, hi) = domain.current().unwrap();
        assert!((lo - 19.0).abs() < DOMAIN_EPSILON);
        assert!((hi - 190.0).abs() < DOMAIN_EPSILON);
    }

    #[test]
    fn test_disabled_or_zero_duration_is_synchronous() {
        let mut domain = AnimatedDomain::new(0.0);
        domain.set_target(Some((0.0, 10.0)), 0.0);
        assert!(!domain.set_target(Some((0.0, 20.0)), 0.0));
        assert_eq!(domain.current(), Some((0.0, 20.0)));

        let mut domain = AnimatedDomain::new(400.0);
        domain.set_enabled(false);
        domain.set_target(Some((0.0, 10.0)), 0.0);
        domain.set_target(Some((5.0, 20.0)), 0.0);
        assert_eq!(domain.current(), Some((5.0, 20.0)));
    }

    #[test]
    fn test_absent_target_clears() {
        let mut domain = AnimatedDomain::new(400.0);
        domain.set_target(Some((0.0, 10.0)), 0.0);
        domain.set_target(Some((0.0, 20.0)), 0.0);
        domain.set_target(None, 10.0);
        assert_eq!(domain.current(), None);
        assert!(!domain.is_animating());
    }

    #[test]
    fn test_restart_from_explicit_domain() {
        let mut domain = AnimatedDomain::new(400.0).with_easing(crate::chartkit::ease_linear);
        domain.set_target(Some((0.0, 10.0)), 0.0);
        domain.restart_from((0.0, 30.0), 0.0);
        assert!(domain.is_animating());
        domain.tick(200.0);
        assert_eq!(domain.current(), Some((0.0, 20.0)));
    }

    #[test]
    fn test_frame_loop_single_flight() {
        let scheduler = ManualScheduler::new();
        let mut frames = FrameLoop::new(Box::new(scheduler.clone()));

        frames.schedule();
        frames.schedule();
        assert_eq!(
            scheduler.frames(),
            ManualFrames { requested: 2, cancelled: 1, pending: true }
        );

        frames.delivered();
        frames.cancel();
        assert_eq!(scheduler.frames().cancelled, 1);
        assert!(!frames.is_pending());
    }
}
