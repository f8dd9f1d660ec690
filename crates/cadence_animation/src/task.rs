//! Schedulable tasks
//!
//! A [`Task`] is one-shot (`interval == 0`) or repeating. Time accumulates in
//! `elapsed`; after each repeat firing one interval is subtracted rather than
//! resetting to zero, so the remainder carries over and periods do not drift.
//! Under [`CatchUp::SingleFire`] any whole intervals still pending after the
//! one firing are dropped, leaving less than one interval of remainder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group used when a task is scheduled without one
pub const DEFAULT_GROUP: &str = "default";

/// Callback invoked when a task fires
pub type TaskCallback = Box<dyn FnMut()>;

/// Handle to a scheduled task.
///
/// Ids increase monotonically and are never reused by the scheduler that
/// issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// What a repeating task does when one frame delta spans several intervals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchUp {
    /// Fire at most once per tick; intervals missed during a stall are
    /// dropped and only the sub-interval remainder is kept, so the phase
    /// survives but the skipped firings never happen.
    #[default]
    SingleFire,
    /// Fire once for every whole interval that elapsed
    DrainAll,
}

/// Result of advancing a task by one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Firing {
    /// Number of callback invocations due this tick
    pub fires: u32,
    /// The task is finished after its last due invocation
    pub done: bool,
}

pub(crate) struct Task {
    pub id: TaskId,
    pub delay: f64,
    /// `0` means one-shot
    pub interval: f64,
    /// Remaining repetitions, `-1` for unbounded
    pub repeat: i32,
    pub elapsed: f64,
    pub group: String,
    /// A task that is not running never advances
    pub running: bool,
    /// Taken out while the callback executes
    pub callback: Option<TaskCallback>,
}

impl Task {
    pub fn new(
        id: TaskId,
        delay: f64,
        interval: f64,
        repeat: i32,
        group: String,
        callback: TaskCallback,
    ) -> Self {
        Self {
            id,
            delay,
            interval,
            repeat: if repeat < 0 { -1 } else { repeat },
            elapsed: 0.0,
            group,
            running: true,
            callback: Some(callback),
        }
    }

    /// Accumulate `dt` and work out how many firings are due.
    ///
    /// Repeat counts are consumed here, before the callbacks run; a task
    /// whose count reaches exactly zero fires once more and is then done.
    pub fn advance(&mut self, dt: f64, catch_up: CatchUp) -> Firing {
        if !self.running {
            return Firing::default();
        }

        self.elapsed += dt;
        if self.elapsed < self.delay {
            return Firing::default();
        }

        if self.interval == 0.0 {
            return Firing {
                fires: 1,
                done: true,
            };
        }

        let mut firing = Firing::default();
        while self.elapsed >= self.delay + self.interval {
            self.elapsed -= self.interval;
            firing.fires += 1;

            if self.repeat > 0 {
                self.repeat -= 1;
                if self.repeat == 0 {
                    firing.done = true;
                    break;
                }
            }

            if catch_up == CatchUp::SingleFire {
                let over = self.elapsed - self.delay;
                if over >= self.interval {
                    self.elapsed = self.delay + over % self.interval;
                }
                break;
            }
        }
        firing
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("delay", &self.delay)
            .field("interval", &self.interval)
            .field("repeat", &self.repeat)
            .field("elapsed", &self.elapsed)
            .field("group", &self.group)
            .field("running", &self.running)
            .finish()
    }
}
