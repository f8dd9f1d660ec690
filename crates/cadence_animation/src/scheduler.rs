//! Task scheduler
//!
//! Owns the live set of [`Task`]s and advances them every frame. Callbacks
//! run with no internal borrow held, so a callback may schedule, remove or
//! clear tasks on the same scheduler while it is ticking.
//!
//! # Tick order
//!
//! Tasks are visited in reverse insertion order (most recently added first).
//! The set of ids is snapshotted when the tick begins: a task scheduled from
//! a callback is first advanced on the next tick, and a task removed from a
//! callback is skipped even if it was already due.

use crate::clock::Tickable;
use crate::completion::{completion, Completion};
use crate::task::{CatchUp, Firing, Task, TaskCallback, TaskId, DEFAULT_GROUP};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Default period of [`TaskScheduler::frame`] tasks, in milliseconds
pub const FRAME_INTERVAL_MS: f64 = 16.0;

struct SchedulerInner {
    tasks: IndexMap<TaskId, Task>,
    paused_groups: FxHashSet<String>,
    next_id: u64,
    catch_up: CatchUp,
    frame_interval_ms: f64,
}

/// The scheduler that fires timed callbacks
///
/// Cloning is cheap and yields another owner of the same task set.
#[derive(Clone)]
pub struct TaskScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::with_policy(CatchUp::default(), FRAME_INTERVAL_MS)
    }

    /// Create a scheduler with an explicit catch-up policy and frame period
    pub fn with_policy(catch_up: CatchUp, frame_interval_ms: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                tasks: IndexMap::new(),
                paused_groups: FxHashSet::default(),
                next_id: 1,
                catch_up,
                frame_interval_ms,
            })),
        }
    }

    /// Get a weak handle for passing to collaborators and callbacks
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn catch_up(&self) -> CatchUp {
        self.inner.borrow().catch_up
    }

    pub fn set_catch_up(&self, catch_up: CatchUp) {
        self.inner.borrow_mut().catch_up = catch_up;
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.inner.borrow().frame_interval_ms
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Fire `callback` once after `delay_ms`
    pub fn once<F>(&self, delay_ms: f64, callback: F) -> TaskId
    where
        F: FnMut() + 'static,
    {
        self.once_in(DEFAULT_GROUP, delay_ms, callback)
    }

    /// Fire `callback` every `period_ms`, `repeat` times (`-1` for unbounded)
    pub fn interval<F>(&self, period_ms: f64, repeat: i32, callback: F) -> TaskId
    where
        F: FnMut() + 'static,
    {
        self.interval_in(DEFAULT_GROUP, period_ms, repeat, callback)
    }

    /// Fire `callback` once per frame period, `repeat` times (`-1` for unbounded)
    pub fn frame<F>(&self, repeat: i32, callback: F) -> TaskId
    where
        F: FnMut() + 'static,
    {
        self.frame_in(DEFAULT_GROUP, repeat, callback)
    }

    /// A completion that settles once `delay_ms` has elapsed
    pub fn wait(&self, delay_ms: f64) -> Completion<()> {
        let (resolver, done) = completion();
        self.once(delay_ms, move || {
            resolver.resolve(());
        });
        done
    }

    fn once_in<F>(&self, group: &str, delay_ms: f64, callback: F) -> TaskId
    where
        F: FnMut() + 'static,
    {
        let delay_ms = if delay_ms.is_finite() {
            delay_ms.max(0.0)
        } else {
            0.0
        };
        self.add(group, delay_ms, 0.0, 0, Box::new(callback))
    }

    fn interval_in<F>(&self, group: &str, period_ms: f64, repeat: i32, callback: F) -> TaskId
    where
        F: FnMut() + 'static,
    {
        if repeat == 0 {
            // Nothing to fire; hand out an id that is never live
            let mut inner = self.inner.borrow_mut();
            let id = TaskId(inner.next_id);
            inner.next_id += 1;
            tracing::debug!("TaskScheduler: {} has repeat 0, not scheduled", id);
            return id;
        }

        let period_ms = if period_ms.is_finite() && period_ms > 0.0 {
            period_ms
        } else {
            let fallback = self.frame_interval_ms();
            tracing::warn!(
                "TaskScheduler: invalid period {}ms, using frame interval {}ms",
                period_ms,
                fallback
            );
            fallback
        };
        self.add(group, 0.0, period_ms, repeat, Box::new(callback))
    }

    fn frame_in<F>(&self, group: &str, repeat: i32, callback: F) -> TaskId
    where
        F: FnMut() + 'static,
    {
        let period = self.frame_interval_ms();
        self.interval_in(group, period, repeat, callback)
    }

    fn add(
        &self,
        group: &str,
        delay: f64,
        interval: f64,
        repeat: i32,
        callback: TaskCallback,
    ) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let id = TaskId(inner.next_id);
        inner.next_id += 1;

        tracing::trace!(
            "TaskScheduler: add {} (group={}, delay={}ms, interval={}ms, repeat={})",
            id,
            group,
            delay,
            interval,
            repeat
        );
        inner.tasks.insert(
            id,
            Task::new(id, delay, interval, repeat, group.to_string(), callback),
        );
        id
    }

    /// Scope operations to a named group
    pub fn group(&self, name: impl Into<String>) -> GroupScope<'_> {
        GroupScope {
            scheduler: self,
            name: name.into(),
        }
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Remove a task. Returns whether it was live; absent ids are a no-op.
    pub fn remove(&self, id: TaskId) -> bool {
        let removed = self.inner.borrow_mut().tasks.shift_remove(&id);
        if removed.is_some() {
            tracing::trace!("TaskScheduler: remove {}", id);
        }
        removed.is_some()
    }

    /// Remove every task in `group`. Returns how many were removed.
    pub fn clear_group(&self, group: &str) -> usize {
        let removed: Vec<Task> = {
            let mut inner = self.inner.borrow_mut();
            let all = std::mem::take(&mut inner.tasks);
            let mut removed = Vec::new();
            for (id, task) in all {
                if task.group == group {
                    removed.push(task);
                } else {
                    inner.tasks.insert(id, task);
                }
            }
            removed
        };
        if !removed.is_empty() {
            tracing::debug!(
                "TaskScheduler: cleared {} tasks in group {}",
                removed.len(),
                group
            );
        }
        // Callbacks are dropped here, outside the borrow
        removed.len()
    }

    /// Skip every task in `group` until [`resume_group`](Self::resume_group).
    ///
    /// Paused tasks keep their elapsed time; time spent paused is never
    /// counted towards them.
    pub fn pause_group(&self, group: &str) {
        if self.inner.borrow_mut().paused_groups.insert(group.to_string()) {
            tracing::debug!("TaskScheduler: pause group {}", group);
        }
    }

    pub fn resume_group(&self, group: &str) {
        if self.inner.borrow_mut().paused_groups.remove(group) {
            tracing::debug!("TaskScheduler: resume group {}", group);
        }
    }

    pub fn is_group_paused(&self, group: &str) -> bool {
        self.inner.borrow().paused_groups.contains(group)
    }

    /// Drop every task. Paused groups and policy are kept.
    pub fn clear_all(&self) {
        let tasks = std::mem::take(&mut self.inner.borrow_mut().tasks);
        if !tasks.is_empty() {
            tracing::debug!("TaskScheduler: cleared all {} tasks", tasks.len());
        }
    }

    /// Stop or restart a single task without removing it.
    ///
    /// Returns `false` if the task is not live.
    pub fn set_task_running(&self, id: TaskId, running: bool) -> bool {
        match self.inner.borrow_mut().tasks.get_mut(&id) {
            Some(task) => {
                task.running = running;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn contains(&self, id: TaskId) -> bool {
        self.inner.borrow().tasks.contains_key(&id)
    }

    /// Number of live tasks
    pub fn len(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().tasks.is_empty()
    }

    /// Accumulated time of a live task
    pub fn elapsed(&self, id: TaskId) -> Option<f64> {
        self.inner.borrow().tasks.get(&id).map(|t| t.elapsed)
    }

    /// Remaining repetitions of a live task (`-1` for unbounded)
    pub fn remaining_repeats(&self, id: TaskId) -> Option<i32> {
        self.inner.borrow().tasks.get(&id).map(|t| t.repeat)
    }

    // =========================================================================
    // Ticking
    // =========================================================================

    /// Advance every live task that is not in a paused group
    pub fn update(&self, dt_ms: f64) {
        let ids: Vec<TaskId> = self.inner.borrow().tasks.keys().rev().copied().collect();

        for id in ids {
            let firing = {
                let mut guard = self.inner.borrow_mut();
                let inner = &mut *guard;
                let catch_up = inner.catch_up;
                let Some(task) = inner.tasks.get_mut(&id) else {
                    continue;
                };
                if inner.paused_groups.contains(&task.group) {
                    continue;
                }
                task.advance(dt_ms, catch_up)
            };

            if firing.fires > 0 {
                self.fire(id, firing);
            }
        }
    }

    fn fire(&self, id: TaskId, firing: Firing) {
        for n in 1..=firing.fires {
            let callback = self
                .inner
                .borrow_mut()
                .tasks
                .get_mut(&id)
                .and_then(|task| task.callback.take());
            // Gone, or already executing further up the stack
            let Some(mut callback) = callback else {
                return;
            };

            tracing::trace!("TaskScheduler: fire {}", id);
            callback();

            let mut inner = self.inner.borrow_mut();
            if !inner.tasks.contains_key(&id) {
                return;
            }
            if n == firing.fires && firing.done {
                inner.tasks.shift_remove(&id);
                tracing::trace!("TaskScheduler: {} finished", id);
                return;
            }
            if let Some(task) = inner.tasks.get_mut(&id) {
                task.callback = Some(callback);
            }
        }
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Tickable for TaskScheduler {
    fn tick(&self, dt_ms: f64) {
        self.update(dt_ms);
    }
}

/// Operations bound to one task group
pub struct GroupScope<'a> {
    scheduler: &'a TaskScheduler,
    name: String,
}

impl GroupScope<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn once<F>(&self, delay_ms: f64, callback: F) -> TaskId
    where
        F: FnMut() + 'static,
    {
        self.scheduler.once_in(&self.name, delay_ms, callback)
    }

    pub fn interval<F>(&self, period_ms: f64, repeat: i32, callback: F) -> TaskId
    where
        F: FnMut() + 'static,
    {
        self.scheduler
            .interval_in(&self.name, period_ms, repeat, callback)
    }

    pub fn frame<F>(&self, repeat: i32, callback: F) -> TaskId
    where
        F: FnMut() + 'static,
    {
        self.scheduler.frame_in(&self.name, repeat, callback)
    }

    pub fn pause(&self) {
        self.scheduler.pause_group(&self.name);
    }

    pub fn resume(&self) {
        self.scheduler.resume_group(&self.name);
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_group_paused(&self.name)
    }

    pub fn clear(&self) -> usize {
        self.scheduler.clear_group(&self.name)
    }
}

/// A weak handle to the task scheduler
///
/// Held by collaborators and captured by callbacks. It won't keep the
/// scheduler alive; once the scheduler is dropped every operation is a no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Get a strong scheduler, if it is still alive
    pub fn upgrade(&self) -> Option<TaskScheduler> {
        self.inner.upgrade().map(|inner| TaskScheduler { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn once<F>(&self, delay_ms: f64, callback: F) -> Option<TaskId>
    where
        F: FnMut() + 'static,
    {
        self.upgrade().map(|s| s.once(delay_ms, callback))
    }

    pub fn interval<F>(&self, period_ms: f64, repeat: i32, callback: F) -> Option<TaskId>
    where
        F: FnMut() + 'static,
    {
        self.upgrade().map(|s| s.interval(period_ms, repeat, callback))
    }

    pub fn wait(&self, delay_ms: f64) -> Option<Completion<()>> {
        self.upgrade().map(|s| s.wait(delay_ms))
    }

    pub fn remove(&self, id: TaskId) -> bool {
        self.upgrade().map(|s| s.remove(id)).unwrap_or(false)
    }

    pub fn clear_group(&self, group: &str) -> usize {
        self.upgrade().map(|s| s.clear_group(group)).unwrap_or(0)
    }

    pub fn pause_group(&self, group: &str) {
        if let Some(s) = self.upgrade() {
            s.pause_group(group);
        }
    }

    pub fn resume_group(&self, group: &str) {
        if let Some(s) = self.upgrade() {
            s.resume_group(group);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::test_util::poll_once;
    use std::cell::Cell;
    use std::task::Poll;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn test_once_fires_exactly_once() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        let id = scheduler.once(100.0, cb);

        scheduler.update(50.0);
        assert_eq!(count.get(), 0);
        assert!(scheduler.contains(id));

        scheduler.update(50.0);
        assert_eq!(count.get(), 1);
        assert!(!scheduler.contains(id));

        scheduler.update(1000.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_interval_with_repeat_fires_n_times() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        let id = scheduler.interval(10.0, 3, cb);

        for _ in 0..2 {
            scheduler.update(10.0);
        }
        assert_eq!(count.get(), 2);
        assert!(scheduler.contains(id));
        assert_eq!(scheduler.remaining_repeats(id), Some(1));

        scheduler.update(10.0);
        assert_eq!(count.get(), 3);
        assert!(!scheduler.contains(id));

        for _ in 0..10 {
            scheduler.update(10.0);
        }
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_unbounded_interval_keeps_firing() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        let id = scheduler.interval(10.0, -1, cb);

        for _ in 0..500 {
            scheduler.update(10.0);
        }
        assert_eq!(count.get(), 500);
        assert!(scheduler.remove(id));
        scheduler.update(10.0);
        assert_eq!(count.get(), 500);
    }

    #[test]
    fn test_frame_uses_frame_interval() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        scheduler.frame(-1, cb);

        scheduler.update(15.0);
        assert_eq!(count.get(), 0);
        scheduler.update(1.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_zero_period_falls_back_to_frame_interval() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        scheduler.interval(0.0, -1, cb);

        scheduler.update(8.0);
        assert_eq!(count.get(), 0);
        scheduler.update(8.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_zero_repeat_schedules_nothing() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        let id = scheduler.interval(10.0, 0, cb);
        assert!(!scheduler.contains(id));
        scheduler.update(100.0);
        assert_eq!(count.get(), 0);

        // Ids stay unique even for tasks that were never live
        let next = scheduler.once(0.0, || {});
        assert!(next > id);
    }

    #[test]
    fn test_ids_increase() {
        let scheduler = TaskScheduler::new();
        let a = scheduler.once(0.0, || {});
        scheduler.remove(a);
        let b = scheduler.once(0.0, || {});
        assert!(b > a);
    }

    #[test]
    fn test_reverse_insertion_order() {
        let scheduler = TaskScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let order = Rc::clone(&order);
            scheduler.once(0.0, move || order.borrow_mut().push(n));
        }
        scheduler.update(0.0);
        assert_eq!(*order.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn test_remove_before_due_prevents_firing() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        let id = scheduler.once(10.0, cb);
        scheduler.remove(id);
        scheduler.update(100.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_idempotent_removal() {
        let scheduler = TaskScheduler::new();
        let id = scheduler.once(10.0, || {});
        assert!(scheduler.remove(id));
        assert!(!scheduler.remove(id));
        assert_eq!(scheduler.clear_group("missing"), 0);
        scheduler.clear_all();
        scheduler.clear_all();
        scheduler.resume_group("never-paused");
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_callback_removes_itself() {
        let scheduler = TaskScheduler::new();
        let handle = scheduler.handle();
        let count = Rc::new(Cell::new(0));
        let id_cell = Rc::new(Cell::new(None));

        let c = Rc::clone(&count);
        let ids = Rc::clone(&id_cell);
        let id = scheduler.interval(10.0, -1, move || {
            c.set(c.get() + 1);
            if c.get() == 3 {
                if let Some(id) = ids.get() {
                    handle.remove(id);
                }
            }
        });
        id_cell.set(Some(id));

        for _ in 0..10 {
            scheduler.update(10.0);
        }
        assert_eq!(count.get(), 3);
        assert!(!scheduler.contains(id));
    }

    #[test]
    fn test_callback_cancels_task_due_later_in_same_tick() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        // Added first, so visited last
        let victim = scheduler.once(0.0, cb);

        let handle = scheduler.handle();
        scheduler.once(0.0, move || {
            handle.remove(victim);
        });

        scheduler.update(16.0);
        assert_eq!(count.get(), 0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_callback_clears_all_mid_drain() {
        let scheduler = TaskScheduler::with_policy(CatchUp::DrainAll, FRAME_INTERVAL_MS);
        let handle = scheduler.handle();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        scheduler.interval(10.0, -1, move || {
            c.set(c.get() + 1);
            if let Some(s) = handle.upgrade() {
                s.clear_all();
            }
        });

        // Five intervals are due but the first firing clears the set
        scheduler.update(50.0);
        assert_eq!(count.get(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_task_added_from_callback_waits_for_next_tick() {
        let scheduler = TaskScheduler::new();
        let handle = scheduler.handle();
        let (count, cb) = counter();
        let cb = RefCell::new(Some(cb));
        scheduler.once(0.0, move || {
            if let Some(cb) = cb.borrow_mut().take() {
                handle.once(0.0, cb);
            }
        });

        scheduler.update(16.0);
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.len(), 1);
        scheduler.update(16.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_pause_group_preserves_elapsed() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        let id = scheduler.group("game").interval(100.0, -1, cb);

        scheduler.update(60.0);
        scheduler.pause_group("game");
        for _ in 0..20 {
            scheduler.update(100.0);
        }
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.elapsed(id), Some(60.0));

        scheduler.resume_group("game");
        scheduler.update(30.0);
        assert_eq!(count.get(), 0);
        scheduler.update(10.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_pause_group_only_affects_that_group() {
        let scheduler = TaskScheduler::new();
        let (ui, ui_cb) = counter();
        let (game, game_cb) = counter();
        scheduler.group("ui").interval(10.0, -1, ui_cb);
        scheduler.group("game").interval(10.0, -1, game_cb);

        scheduler.group("game").pause();
        scheduler.update(10.0);
        assert_eq!(ui.get(), 1);
        assert_eq!(game.get(), 0);
    }

    #[test]
    fn test_clear_group() {
        let scheduler = TaskScheduler::new();
        let keep = scheduler.once(10.0, || {});
        scheduler.group("ui").interval(10.0, -1, || {});
        scheduler.group("ui").once(10.0, || {});

        assert_eq!(scheduler.clear_group("ui"), 2);
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.contains(keep));
    }

    #[test]
    fn test_clear_all_keeps_paused_groups() {
        let scheduler = TaskScheduler::new();
        scheduler.pause_group("game");
        scheduler.once(10.0, || {});
        scheduler.clear_all();
        assert!(scheduler.is_empty());
        assert!(scheduler.is_group_paused("game"));
    }

    #[test]
    fn test_stopped_task_never_advances() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        let id = scheduler.interval(10.0, -1, cb);

        assert!(scheduler.set_task_running(id, false));
        scheduler.update(100.0);
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.elapsed(id), Some(0.0));

        scheduler.set_task_running(id, true);
        scheduler.update(10.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_single_fire_vs_drain_all() {
        for (policy, expected) in [(CatchUp::SingleFire, 1), (CatchUp::DrainAll, 5)] {
            let scheduler = TaskScheduler::with_policy(policy, FRAME_INTERVAL_MS);
            let (count, cb) = counter();
            scheduler.interval(10.0, -1, cb);
            scheduler.update(50.0);
            assert_eq!(count.get(), expected, "{:?}", policy);
        }
    }

    #[test]
    fn test_single_fire_skips_backlog_after_stall() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        let id = scheduler.interval(100.0, -1, cb);

        scheduler.update(1000.0);
        assert_eq!(count.get(), 1);

        // The nine missed periods are not replayed on later frames
        for _ in 0..10 {
            scheduler.update(16.0);
        }
        assert_eq!(count.get(), 2);
        assert_eq!(scheduler.elapsed(id), Some(60.0));
    }

    #[test]
    fn test_drain_all_replays_backlog_after_stall() {
        let scheduler = TaskScheduler::with_policy(CatchUp::DrainAll, FRAME_INTERVAL_MS);
        let (count, cb) = counter();
        let id = scheduler.interval(100.0, -1, cb);

        scheduler.update(1000.0);
        assert_eq!(count.get(), 10);
        for _ in 0..10 {
            scheduler.update(16.0);
        }
        assert_eq!(count.get(), 11);
        assert_eq!(scheduler.elapsed(id), Some(60.0));
    }

    #[test]
    fn test_switching_policy_applies_to_live_tasks() {
        let scheduler = TaskScheduler::new();
        let (count, cb) = counter();
        scheduler.interval(10.0, -1, cb);

        scheduler.set_catch_up(CatchUp::DrainAll);
        assert_eq!(scheduler.catch_up(), CatchUp::DrainAll);
        scheduler.update(30.0);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_wait_resolves_once() {
        let scheduler = TaskScheduler::new();
        let done = scheduler.wait(100.0);

        let (poll, _) = poll_once(done.clone());
        assert!(poll.is_pending());

        scheduler.update(100.0);
        assert!(done.is_settled());
        let (poll, _) = poll_once(done.clone());
        assert_eq!(poll, Poll::Ready(()));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let scheduler = TaskScheduler::new();
            scheduler.handle()
        };

        assert!(!handle.is_alive());
        assert!(handle.once(10.0, || {}).is_none());
        assert!(handle.wait(10.0).is_none());
        assert!(!handle.remove(TaskId(1)));
    }
}
