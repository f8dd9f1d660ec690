//! Runtime context
//!
//! One [`Runtime`] per process replaces global scheduler state: it owns the
//! frame clock, the task scheduler, the tween driver and the easing
//! registry, and is passed by reference to whatever needs them.
//!
//! The host calls [`Runtime::frame`] once per rendered frame. Tasks are
//! ticked before tweens, both with the same scaled delta.

use crate::clock::{FrameClock, FrameTick, MonotonicTime, Tickable, TimeSource};
use crate::config::RuntimeConfig;
use crate::driver::TweenDriver;
use crate::easing::{EaseRegistry, Easing};
use crate::error::Result;
use crate::scheduler::TaskScheduler;
use crate::target::SharedTarget;
use crate::tween::Tween;
use std::cell::RefCell;

pub struct Runtime {
    clock: RefCell<FrameClock>,
    time: Box<dyn TimeSource>,
    scheduler: TaskScheduler,
    tweens: TweenDriver,
    eases: RefCell<EaseRegistry>,
}

impl Runtime {
    /// Create a runtime reading wall-clock time
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        Self::with_time_source(config, MonotonicTime::new())
    }

    /// Create a runtime reading time from `time`
    pub fn with_time_source(config: RuntimeConfig, time: impl TimeSource + 'static) -> Result<Self> {
        config.validate()?;

        let mut clock = FrameClock::new();
        clock.set_time_scale(config.time_scale);

        tracing::debug!(
            "Runtime: created (time_scale={}, frame_interval={}ms, catch_up={:?})",
            config.time_scale,
            config.frame_interval_ms,
            config.catch_up
        );

        Ok(Self {
            clock: RefCell::new(clock),
            time: Box::new(time),
            scheduler: TaskScheduler::with_policy(config.catch_up, config.frame_interval_ms),
            tweens: TweenDriver::new(),
            eases: RefCell::new(EaseRegistry::new()),
        })
    }

    /// Start delivering frames. Idempotent.
    pub fn start(&self) {
        let now = self.time.now_ms();
        self.clock.borrow_mut().start(now);
    }

    /// Stop delivering frames; tasks and tweens keep their progress
    pub fn stop(&self) {
        self.clock.borrow_mut().stop();
    }

    pub fn is_running(&self) -> bool {
        self.clock.borrow().is_running()
    }

    pub fn set_time_scale(&self, scale: f64) {
        self.clock.borrow_mut().set_time_scale(scale);
    }

    pub fn time_scale(&self) -> f64 {
        self.clock.borrow().time_scale()
    }

    pub fn frame_index(&self) -> u64 {
        self.clock.borrow().frame_index()
    }

    /// Host frame callback.
    ///
    /// Returns whether the host should request another frame.
    pub fn frame(&self) -> bool {
        let now = self.time.now_ms();
        self.frame_at(now);
        self.is_running()
    }

    /// Deliver a frame stamped `now_ms`. Returns `None` while stopped.
    pub fn frame_at(&self, now_ms: f64) -> Option<FrameTick> {
        let tick = self.clock.borrow_mut().tick(now_ms)?;

        tracing::trace!(
            "Runtime: frame {} dt={:.3}ms (raw {:.3}ms)",
            tick.frame_index,
            tick.dt_ms,
            tick.raw_dt_ms
        );

        self.scheduler.tick(tick.dt_ms);
        self.tweens.tick(tick.dt_ms);
        Some(tick)
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    pub fn tweens(&self) -> &TweenDriver {
        &self.tweens
    }

    /// Create a tween that is driven by this runtime once started
    pub fn tween(&self, target: SharedTarget) -> Tween {
        self.tweens.tween(target)
    }

    /// Register a named easing curve
    pub fn register_ease<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(f32) -> f32 + 'static,
    {
        self.eases.borrow_mut().register(name, f);
    }

    /// Look up a named easing, falling back to linear
    pub fn ease(&self, name: &str) -> Easing {
        self.eases.borrow().resolve(name)
    }

    /// Sorted names of every registered easing
    pub fn ease_names(&self) -> Vec<String> {
        self.eases
            .borrow()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("clock", &*self.clock.borrow())
            .field("tasks", &self.scheduler.len())
            .field("tweens", &self.tweens.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTime;
    use crate::error::ConfigError;
    use crate::target::{Node, Props};
    use std::cell::Cell;
    use std::rc::Rc;

    fn manual_runtime() -> (Runtime, ManualTime) {
        let time = ManualTime::new();
        let runtime = Runtime::with_time_source(RuntimeConfig::default(), time.clone()).unwrap();
        (runtime, time)
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RuntimeConfig {
            time_scale: f64::NAN,
            ..RuntimeConfig::default()
        };
        assert!(matches!(
            Runtime::new(config),
            Err(ConfigError::InvalidTimeScale(_))
        ));
    }

    #[test]
    fn test_frames_are_ignored_until_started() {
        let (runtime, time) = manual_runtime();
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        runtime.scheduler().once(0.0, move || f.set(true));

        time.advance(16.0);
        assert!(!runtime.frame());
        assert!(!fired.get());

        runtime.start();
        time.advance(16.0);
        assert!(runtime.frame());
        assert!(fired.get());
    }

    #[test]
    fn test_time_scale_applies_to_tasks_and_tweens() {
        let (runtime, time) = manual_runtime();
        let node = Node::new().shared();
        runtime
            .tween(node.clone())
            .to(Props::new().x(100.0), 100.0, Easing::Linear)
            .start();
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        runtime.scheduler().once(50.0, move || f.set(f.get() + 1));

        runtime.start();
        runtime.set_time_scale(0.5);
        time.advance(100.0);
        let tick = runtime.frame_at(time.now_ms()).unwrap();
        assert_eq!(tick.dt_ms, 50.0);
        assert_eq!(fired.get(), 1);
        assert_eq!(node.borrow().transform().x, 50.0);

        runtime.set_time_scale(0.0);
        time.advance(100.0);
        runtime.frame();
        assert_eq!(node.borrow().transform().x, 50.0);
    }

    #[test]
    fn test_tasks_tick_before_tweens() {
        let (runtime, time) = manual_runtime();
        let node = Node::new().shared();
        let tween = runtime
            .tween(node.clone())
            .to(Props::new().x(10.0), 16.0, Easing::Linear);

        let seen = Rc::new(Cell::new(-1.0f32));
        let s = Rc::clone(&seen);
        let n = node.clone();
        runtime
            .scheduler()
            .once(16.0, move || s.set(n.borrow().transform().x));
        tween.start();

        runtime.start();
        time.advance(16.0);
        runtime.frame();
        // The task observed the node before the tween advanced it
        assert_eq!(seen.get(), 0.0);
        assert_eq!(node.borrow().transform().x, 10.0);
    }

    #[test]
    fn test_stop_keeps_progress() {
        let (runtime, time) = manual_runtime();
        let task = runtime.scheduler().once(100.0, || {});
        runtime.start();
        time.advance(40.0);
        runtime.frame();

        runtime.stop();
        time.advance(1000.0);
        runtime.frame();
        assert_eq!(runtime.scheduler().elapsed(task), Some(40.0));

        // Restarting does not count the stopped gap
        runtime.start();
        time.advance(10.0);
        runtime.frame();
        assert_eq!(runtime.scheduler().elapsed(task), Some(50.0));
    }

    #[test]
    fn test_custom_ease_registration() {
        let (runtime, _) = manual_runtime();
        runtime.register_ease("step", |t| if t < 0.5 { 0.0 } else { 1.0 });
        assert_eq!(runtime.ease("step").apply(0.4), 0.0);
        assert_eq!(runtime.ease("step").apply(0.6), 1.0);
        assert_eq!(runtime.ease("missing").apply(0.3), 0.3);
        assert!(runtime.ease_names().iter().any(|n| n == "step"));
    }
}
