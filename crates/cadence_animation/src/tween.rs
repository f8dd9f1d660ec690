//! Tween timelines
//!
//! A [`Tween`] is an ordered queue of steps bound to one target:
//! interpolations (absolute or relative), delays, callbacks and parallel
//! groups of other tweens. The whole queue can loop via
//! [`repeat`](Tween::repeat).
//!
//! Execution is an explicit state machine advanced by frame deltas. Nothing
//! here owns a loop: a [`TweenDriver`](crate::driver::TweenDriver) advances
//! started tweens every frame, a parallel step advances its members, and
//! tests may call [`Tween::advance`] directly.
//!
//! # Example
//!
//! ```ignore
//! let node = Node::new().shared();
//! let done = driver
//!     .tween(node.clone())
//!     .to(Props::new().scale(1.0).opacity(1.0), 250.0, Easing::OutQuad)
//!     .delay(1000.0)
//!     .call(|| tracing::info!("shown"))
//!     .start();
//! ```

use crate::completion::{completion, Completion, Outcome, Resolver};
use crate::driver::{DriverHandle, TweenKey};
use crate::easing::{Easing, SpringParams};
use crate::target::{Props, Property, SharedTarget};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Conventional duration for `to`/`by` steps, in milliseconds
pub const DEFAULT_DURATION_MS: f64 = 300.0;

/// Conventional duration for elastic, bounce and spring steps, in milliseconds
pub const DEFAULT_PHYSICS_DURATION_MS: f64 = 600.0;

/// Callback fired by a `call` step
pub type Action = Box<dyn FnMut()>;

struct Interpolate {
    props: Props,
    duration_ms: f64,
    easing: Easing,
    relative: bool,
}

enum Step {
    Interpolate(Interpolate),
    Delay { duration_ms: f64 },
    Invoke(Rc<RefCell<Action>>),
    Parallel(Vec<Tween>),
}

/// One property being interpolated by the in-flight step
struct Track {
    property: Property,
    from: f32,
    to: f32,
}

/// Progress of the step currently in flight
enum InFlight {
    None,
    Interpolating {
        tracks: SmallVec<[Track; 4]>,
        elapsed: f64,
    },
    Waiting {
        elapsed: f64,
    },
    Parallel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Running(usize),
    Stopped,
    Completed,
}

/// Observable state of a tween
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenState {
    /// Never started
    Idle,
    /// Executing the step at this index
    Running(usize),
    /// Started but paused on the step at this index
    Paused(usize),
    /// Stopped; no step will make progress again
    Stopped,
    /// Every pass ran to the end
    Completed,
}

/// What [`TweenInner::step`] asks the caller to do next
enum Next {
    /// Nothing more this frame
    Yield,
    /// Look at the state machine again
    Continue,
    /// Run a callback without holding the tween borrow
    Invoke(Rc<RefCell<Action>>),
    /// Advance the members of the parallel step at `index`
    Parallel {
        index: usize,
        members: Vec<Tween>,
        begin: bool,
    },
    /// The last pass ended
    Finished(Option<Resolver<Outcome>>),
}

struct TweenInner {
    target: SharedTarget,
    steps: Vec<Step>,
    /// Extra passes over the queue; negative loops forever
    repeat: i32,
    phase: Phase,
    paused: bool,
    in_flight: InFlight,
    passes_done: u32,
    /// Whether the current pass has consumed any time
    timed_pass: bool,
    resolver: Option<Resolver<Outcome>>,
    driver: Option<DriverHandle>,
    driver_key: Option<TweenKey>,
}

/// A timeline of animation steps bound to one target
///
/// Cloning yields another handle to the same timeline.
#[derive(Clone)]
pub struct Tween {
    inner: Rc<RefCell<TweenInner>>,
}

impl Tween {
    /// Create an unbound tween.
    ///
    /// Unbound tweens are advanced by whoever owns them: a parallel step of
    /// another tween, or explicit [`advance`](Self::advance) calls. Use
    /// [`TweenDriver::tween`](crate::driver::TweenDriver::tween) for a tween
    /// that is ticked by the frame clock once started.
    pub fn new(target: SharedTarget) -> Self {
        Self::with_driver(target, None)
    }

    pub(crate) fn with_driver(target: SharedTarget, driver: Option<DriverHandle>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TweenInner {
                target,
                steps: Vec::new(),
                repeat: 0,
                phase: Phase::Idle,
                paused: false,
                in_flight: InFlight::None,
                passes_done: 0,
                timed_pass: false,
                resolver: None,
                driver,
                driver_key: None,
            })),
        }
    }

    fn push(self, step: Step) -> Self {
        self.inner.borrow_mut().steps.push(step);
        self
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Interpolate to absolute values
    pub fn to(self, props: Props, duration_ms: f64, easing: Easing) -> Self {
        self.push(Step::Interpolate(Interpolate {
            props,
            duration_ms,
            easing,
            relative: false,
        }))
    }

    /// Interpolate by deltas added to the values found when the step starts
    pub fn by(self, props: Props, duration_ms: f64, easing: Easing) -> Self {
        self.push(Step::Interpolate(Interpolate {
            props,
            duration_ms,
            easing,
            relative: true,
        }))
    }

    pub fn elastic_to(self, props: Props, duration_ms: f64, amplitude: f32, period: f32) -> Self {
        self.to(props, duration_ms, Easing::Elastic { amplitude, period })
    }

    pub fn bounce_to(self, props: Props, duration_ms: f64) -> Self {
        self.to(props, duration_ms, Easing::Bounce)
    }

    pub fn spring_to(self, props: Props, duration_ms: f64, params: SpringParams) -> Self {
        self.to(props, duration_ms, Easing::Spring(params))
    }

    /// Wait without touching the target
    pub fn delay(self, duration_ms: f64) -> Self {
        self.push(Step::Delay { duration_ms })
    }

    /// Fire `action` and continue immediately
    pub fn call<F>(self, action: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let action: Action = Box::new(action);
        self.push(Step::Invoke(Rc::new(RefCell::new(action))))
    }

    /// Run `members` concurrently; the step ends when all of them have settled.
    ///
    /// Members are advanced by this tween, so they should not also be started
    /// on a driver. A tween must not be its own member.
    pub fn parallel<I>(self, members: I) -> Self
    where
        I: IntoIterator<Item = Tween>,
    {
        self.push(Step::Parallel(members.into_iter().collect()))
    }

    /// Run the whole queue `count` extra times (`-1` for unbounded)
    pub fn repeat(self, count: i32) -> Self {
        self.inner.borrow_mut().repeat = count;
        self
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Start from the first step.
    ///
    /// Leading instantaneous steps run before this returns and the first
    /// interpolation captures its starting values immediately. Restarting a
    /// running tween settles the previous completion as [`Outcome::Stopped`];
    /// a stopped tween settles at once with the same outcome.
    pub fn start(&self) -> Completion<Outcome> {
        let (resolver, done) = completion();
        if !self.reset(Some(resolver)) {
            return done;
        }
        tracing::debug!("Tween: start ({} steps)", self.step_count());
        self.register();
        self.advance(0.0);
        done
    }

    /// Start as a parallel member: no completion, no driver
    fn begin(&self) {
        if self.reset(None) {
            self.advance(0.0);
        }
    }

    /// Rewind to step 0. Returns `false` if the tween is stopped.
    fn reset(&self, resolver: Option<Resolver<Outcome>>) -> bool {
        let previous = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == Phase::Stopped {
                drop(inner);
                if let Some(resolver) = resolver {
                    resolver.resolve(Outcome::Stopped);
                }
                return false;
            }
            inner.phase = Phase::Running(0);
            inner.in_flight = InFlight::None;
            inner.passes_done = 0;
            inner.timed_pass = false;
            match resolver {
                Some(resolver) => inner.resolver.replace(resolver),
                None => None,
            }
        };
        if let Some(previous) = previous {
            previous.resolve(Outcome::Stopped);
        }
        true
    }

    fn register(&self) {
        let driver = {
            let inner = self.inner.borrow();
            if inner.driver_key.is_some() {
                return;
            }
            inner.driver.clone()
        };
        let Some(driver) = driver.and_then(|d| d.upgrade()) else {
            return;
        };
        let key = driver.insert(self.clone());
        self.inner.borrow_mut().driver_key = Some(key);
    }

    pub(crate) fn clear_driver_key(&self) {
        self.inner.borrow_mut().driver_key = None;
    }

    /// Freeze the step in flight; elapsed progress is kept
    pub fn pause(&self) {
        let mut inner = self.inner.borrow_mut();
        if !inner.paused {
            tracing::debug!("Tween: pause");
            inner.paused = true;
        }
    }

    pub fn resume(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.paused {
            tracing::debug!("Tween: resume");
            inner.paused = false;
        }
    }

    /// Abort without running the remaining steps or passes.
    ///
    /// Permanent: later `start` calls settle immediately as stopped. Members
    /// of an in-flight parallel step are stopped too.
    pub fn stop(&self) {
        let (resolver, members) = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == Phase::Stopped {
                return;
            }
            let members = match (inner.phase, &inner.in_flight) {
                (Phase::Running(index), InFlight::Parallel) => match inner.steps.get(index) {
                    Some(Step::Parallel(members)) => members.clone(),
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            };
            tracing::debug!("Tween: stop");
            inner.phase = Phase::Stopped;
            inner.in_flight = InFlight::None;
            (inner.resolver.take(), members)
        };

        for member in &members {
            member.stop();
        }
        if let Some(resolver) = resolver {
            resolver.resolve(Outcome::Stopped);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> TweenState {
        let inner = self.inner.borrow();
        match inner.phase {
            Phase::Idle => TweenState::Idle,
            Phase::Running(index) if inner.paused => TweenState::Paused(index),
            Phase::Running(index) => TweenState::Running(index),
            Phase::Stopped => TweenState::Stopped,
            Phase::Completed => TweenState::Completed,
        }
    }

    /// Stopped or completed
    pub fn is_settled(&self) -> bool {
        matches!(
            self.inner.borrow().phase,
            Phase::Stopped | Phase::Completed
        )
    }

    pub fn is_paused(&self) -> bool {
        self.inner.borrow().paused
    }

    pub fn step_count(&self) -> usize {
        self.inner.borrow().steps.len()
    }

    pub fn repeat_count(&self) -> i32 {
        self.inner.borrow().repeat
    }

    pub fn target(&self) -> SharedTarget {
        Rc::clone(&self.inner.borrow().target)
    }

    // =========================================================================
    // Ticking
    // =========================================================================

    /// Advance by `dt_ms` and return the time this tween did not use.
    ///
    /// Time left over when a step finishes flows into the following steps.
    /// A settled tween hands back whatever was not consumed; one still in
    /// flight returns `0.0`. Callbacks and parallel members run without this
    /// tween borrowed, so they may pause, stop or restart it.
    pub fn advance(&self, dt_ms: f64) -> f64 {
        let mut dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

        loop {
            let next = self.inner.borrow_mut().step(&mut dt);
            match next {
                Next::Yield => return if self.is_settled() { dt } else { 0.0 },
                Next::Continue => {}
                Next::Invoke(action) => {
                    // Skipped if the same callback is already running up the stack
                    if let Ok(mut action) = action.try_borrow_mut() {
                        (&mut **action)();
                    }
                }
                Next::Parallel {
                    index,
                    members,
                    begin,
                } => {
                    if begin {
                        for member in &members {
                            member.begin();
                        }
                    }
                    // The step ends when its slowest member does
                    let mut leftover = dt;
                    for member in &members {
                        leftover = leftover.min(member.advance(dt));
                    }

                    let all_settled = members.iter().all(Tween::is_settled);
                    let mut inner = self.inner.borrow_mut();
                    if !all_settled {
                        inner.timed_pass = true;
                        return 0.0;
                    }
                    inner.complete_parallel(index, begin);
                    dt = leftover;
                }
                Next::Finished(resolver) => {
                    tracing::debug!("Tween: finished");
                    if let Some(resolver) = resolver {
                        resolver.resolve(Outcome::Finished);
                    }
                    return dt;
                }
            }
        }
    }
}

impl TweenInner {
    fn step(&mut self, dt: &mut f64) -> Next {
        let index = match self.phase {
            Phase::Running(index) if !self.paused => index,
            _ => return Next::Yield,
        };

        if index >= self.steps.len() {
            return self.end_pass();
        }

        match &self.steps[index] {
            Step::Interpolate(step) => {
                if !matches!(self.in_flight, InFlight::Interpolating { .. }) {
                    self.in_flight = InFlight::Interpolating {
                        tracks: capture(&self.target, step),
                        elapsed: 0.0,
                    };
                }
                let InFlight::Interpolating { tracks, elapsed } = &mut self.in_flight else {
                    return Next::Yield;
                };

                let finished = consume(elapsed, step.duration_ms, dt);
                let ratio = if step.duration_ms > 0.0 {
                    (*elapsed / step.duration_ms).min(1.0) as f32
                } else {
                    1.0
                };
                apply(&self.target, tracks, &step.easing, ratio);

                if step.duration_ms > 0.0 {
                    self.timed_pass = true;
                }
                if !finished {
                    return Next::Yield;
                }
                self.in_flight = InFlight::None;
                self.phase = Phase::Running(index + 1);
                Next::Continue
            }
            Step::Delay { duration_ms } => {
                let duration_ms = *duration_ms;
                if !matches!(self.in_flight, InFlight::Waiting { .. }) {
                    self.in_flight = InFlight::Waiting { elapsed: 0.0 };
                }
                let InFlight::Waiting { elapsed } = &mut self.in_flight else {
                    return Next::Yield;
                };

                let finished = consume(elapsed, duration_ms, dt);
                if duration_ms > 0.0 {
                    self.timed_pass = true;
                }
                if !finished {
                    return Next::Yield;
                }
                self.in_flight = InFlight::None;
                self.phase = Phase::Running(index + 1);
                Next::Continue
            }
            Step::Invoke(action) => {
                let action = Rc::clone(action);
                self.phase = Phase::Running(index + 1);
                Next::Invoke(action)
            }
            Step::Parallel(members) => {
                let members = members.clone();
                let begin = !matches!(self.in_flight, InFlight::Parallel);
                self.in_flight = InFlight::Parallel;
                Next::Parallel {
                    index,
                    members,
                    begin,
                }
            }
        }
    }

    /// Wrap around to the next pass, or finish
    fn end_pass(&mut self) -> Next {
        self.passes_done = self.passes_done.saturating_add(1);
        let unbounded = self.repeat < 0;

        if !unbounded && self.passes_done > self.repeat as u32 {
            self.phase = Phase::Completed;
            self.in_flight = InFlight::None;
            return Next::Finished(self.resolver.take());
        }

        let instantaneous = !self.timed_pass;
        self.phase = Phase::Running(0);
        self.in_flight = InFlight::None;
        self.timed_pass = false;

        // An endless queue that takes no time runs one pass per frame
        if unbounded && instantaneous {
            Next::Yield
        } else {
            Next::Continue
        }
    }

    fn complete_parallel(&mut self, index: usize, began_this_frame: bool) {
        if self.phase != Phase::Running(index) || !matches!(self.in_flight, InFlight::Parallel) {
            return;
        }
        if !began_this_frame {
            self.timed_pass = true;
        }
        self.in_flight = InFlight::None;
        self.phase = Phase::Running(index + 1);
    }
}

/// Add `dt` to a step's elapsed time. Returns whether the step is done,
/// leaving any unused time in `dt`.
fn consume(elapsed: &mut f64, duration_ms: f64, dt: &mut f64) -> bool {
    if duration_ms <= 0.0 {
        return true;
    }
    *elapsed += *dt;
    if *elapsed < duration_ms {
        *dt = 0.0;
        false
    } else {
        *dt = *elapsed - duration_ms;
        true
    }
}

/// Read starting values and resolve end values for an interpolation
fn capture(target: &SharedTarget, step: &Interpolate) -> SmallVec<[Track; 4]> {
    let target = target.borrow();
    step.props
        .iter()
        .map(|(property, value)| {
            let from = target.get(property);
            let to = if step.relative { from + value } else { value };
            Track {
                property: property.clone(),
                from,
                to,
            }
        })
        .collect()
}

fn apply(target: &SharedTarget, tracks: &[Track], easing: &Easing, ratio: f32) {
    let shaped = easing.apply(ratio.clamp(0.0, 1.0));
    let mut target = target.borrow_mut();
    for track in tracks {
        let value = track.from + (track.to - track.from) * shaped;
        target.set(&track.property, value);
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Tween")
            .field("steps", &inner.steps.len())
            .field("repeat", &inner.repeat)
            .field("phase", &inner.phase)
            .field("paused", &inner.paused)
            .finish()
    }
}
