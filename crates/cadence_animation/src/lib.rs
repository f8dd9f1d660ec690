//! Cadence Scheduling Core
//!
//! Cooperative, single-threaded timing for frame-driven applications.
//!
//! # Features
//!
//! - **Frame Clock**: Host frame callbacks become scaled delta times
//! - **Task Scheduler**: One-shot, interval and per-frame tasks in named groups
//! - **Tween Timelines**: Step queues with delays, callbacks, parallel branches and repeats
//! - **Easing**: Built-in curves plus a registry for custom ones
//!
//! Everything is driven from a single [`Runtime`], which the host ticks once
//! per rendered frame. Nothing here spawns threads or sleeps.

pub mod clock;
pub mod completion;
pub mod config;
pub mod driver;
pub mod easing;
pub mod error;
pub mod runtime;
pub mod scheduler;
pub mod target;
pub mod task;
pub mod tween;

pub use clock::{FrameClock, FrameTick, ManualTime, MonotonicTime, Tickable, TimeSource};
pub use completion::{completion, Completion, Outcome, Resolver};
pub use config::RuntimeConfig;
pub use driver::{TweenDriver, TweenKey};
pub use easing::{EaseRegistry, Easing, SpringParams};
pub use error::ConfigError;
pub use runtime::Runtime;
pub use scheduler::{GroupScope, SchedulerHandle, TaskScheduler, FRAME_INTERVAL_MS};
pub use target::{AnimatableTarget, Node, Props, Property, SharedTarget, Transform};
pub use task::{CatchUp, TaskId, DEFAULT_GROUP};
pub use tween::{Tween, TweenState, DEFAULT_DURATION_MS, DEFAULT_PHYSICS_DURATION_MS};
