//! Tween driver
//!
//! Keeps every started tween alive and advances it once per frame until it
//! settles.

use crate::clock::Tickable;
use crate::target::SharedTarget;
use crate::tween::Tween;
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    pub struct TweenKey;
}

struct DriverInner {
    active: SlotMap<TweenKey, Tween>,
}

/// Advances started tweens from the frame loop
#[derive(Clone)]
pub struct TweenDriver {
    inner: Rc<RefCell<DriverInner>>,
}

impl TweenDriver {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DriverInner {
                active: SlotMap::with_key(),
            })),
        }
    }

    /// Create a tween that registers here when started
    pub fn tween(&self, target: SharedTarget) -> Tween {
        Tween::with_driver(target, Some(self.handle()))
    }

    pub(crate) fn handle(&self) -> DriverHandle {
        DriverHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub(crate) fn insert(&self, tween: Tween) -> TweenKey {
        self.inner.borrow_mut().active.insert(tween)
    }

    /// Number of tweens currently being driven
    pub fn len(&self) -> usize {
        self.inner.borrow().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().active.is_empty()
    }

    /// Stop every driven tween
    pub fn stop_all(&self) {
        let active: Vec<Tween> = self.inner.borrow().active.values().cloned().collect();
        for tween in &active {
            tween.stop();
        }
        self.sweep();
    }

    /// Advance every driven tween by `dt_ms` and drop the ones that settled
    pub fn update(&self, dt_ms: f64) {
        let active: Vec<Tween> = self.inner.borrow().active.values().cloned().collect();
        for tween in &active {
            tween.advance(dt_ms);
        }
        self.sweep();
    }

    fn sweep(&self) {
        let removed: Vec<Tween> = {
            let mut inner = self.inner.borrow_mut();
            let settled: Vec<TweenKey> = inner
                .active
                .iter()
                .filter(|(_, tween)| tween.is_settled())
                .map(|(key, _)| key)
                .collect();
            settled
                .into_iter()
                .filter_map(|key| inner.active.remove(key))
                .collect()
        };

        if !removed.is_empty() {
            tracing::trace!("TweenDriver: released {} settled tweens", removed.len());
        }
        // Dropped outside the borrow; tween steps may own arbitrary closures
        for tween in removed {
            tween.clear_driver_key();
        }
    }
}

impl Default for TweenDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Tickable for TweenDriver {
    fn tick(&self, dt_ms: f64) {
        self.update(dt_ms);
    }
}

/// Weak reference held by bound tweens
#[derive(Clone)]
pub(crate) struct DriverHandle {
    inner: Weak<RefCell<DriverInner>>,
}

impl DriverHandle {
    pub fn upgrade(&self) -> Option<TweenDriver> {
        self.inner.upgrade().map(|inner| TweenDriver { inner })
    }
}
