//! Frame clock
//!
//! Turns host frame callbacks into scaled delta times. The clock does not
//! own a loop: the host calls [`FrameClock::tick`] once per rendered frame
//! (the way a `requestAnimationFrame` callback would) and keeps doing so for
//! as long as [`FrameClock::is_running`] reports `true`.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic millisecond time source
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time measured from construction
#[derive(Clone, Copy, Debug)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced time, shared between clones.
///
/// Used for deterministic tests and offline stepping.
#[derive(Clone, Debug, Default)]
pub struct ManualTime {
    now: Rc<Cell<f64>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl TimeSource for ManualTime {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// A single frame delivered by the clock
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Host timestamp of this frame
    pub now_ms: f64,
    /// Unscaled time since the previous frame
    pub raw_dt_ms: f64,
    /// Time since the previous frame multiplied by the time scale
    pub dt_ms: f64,
    /// Monotonically increasing frame counter
    pub frame_index: u64,
}

/// Something advanced by the frame delta
pub trait Tickable {
    fn tick(&self, dt_ms: f64);
}

/// Start/stop lifecycle plus a global time-scale multiplier
#[derive(Debug)]
pub struct FrameClock {
    running: bool,
    time_scale: f64,
    last_time: f64,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            running: false,
            time_scale: 1.0,
            last_time: 0.0,
            frame_index: 0,
        }
    }

    /// Start ticking from `now_ms`.
    ///
    /// Returns `false` (and changes nothing) if the clock is already running.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.running {
            return false;
        }
        tracing::debug!("FrameClock: start at {:.3}ms", now_ms);
        self.running = true;
        self.last_time = now_ms;
        true
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!("FrameClock: stop after {} frames", self.frame_index);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the multiplier applied to every subsequent delta.
    ///
    /// `0` freezes consumers while frames keep arriving. Negative or
    /// non-finite values are ignored.
    pub fn set_time_scale(&mut self, scale: f64) {
        if !scale.is_finite() || scale < 0.0 {
            tracing::warn!("FrameClock: ignoring invalid time scale {}", scale);
            return;
        }
        self.time_scale = scale;
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advance to `now_ms`.
    ///
    /// Returns `None` while stopped. A timestamp older than the previous one
    /// yields a zero delta rather than running time backwards.
    pub fn tick(&mut self, now_ms: f64) -> Option<FrameTick> {
        if !self.running {
            return None;
        }

        let raw_dt_ms = (now_ms - self.last_time).max(0.0);
        self.last_time = now_ms;
        self.frame_index += 1;

        Some(FrameTick {
            now_ms,
            raw_dt_ms,
            dt_ms: raw_dt_ms * self.time_scale,
            frame_index: self.frame_index,
        })
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_clock_does_not_tick() {
        let mut clock = FrameClock::new();
        assert!(!clock.is_running());
        assert!(clock.tick(16.0).is_none());
    }

    #[test]
    fn test_tick_computes_delta() {
        let mut clock = FrameClock::new();
        clock.start(100.0);

        let tick = clock.tick(116.0).unwrap();
        assert_eq!(tick.dt_ms, 16.0);
        assert_eq!(tick.frame_index, 1);

        let tick = clock.tick(150.0).unwrap();
        assert_eq!(tick.dt_ms, 34.0);
        assert_eq!(tick.frame_index, 2);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut clock = FrameClock::new();
        assert!(clock.start(0.0));
        // A second start must not re-baseline the last timestamp
        assert!(!clock.start(50.0));
        assert_eq!(clock.tick(60.0).unwrap().dt_ms, 60.0);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = FrameClock::new();
        clock.start(0.0);

        clock.set_time_scale(2.0);
        let tick = clock.tick(10.0).unwrap();
        assert_eq!(tick.raw_dt_ms, 10.0);
        assert_eq!(tick.dt_ms, 20.0);

        // Zero freezes deltas but frames keep coming
        clock.set_time_scale(0.0);
        let tick = clock.tick(20.0).unwrap();
        assert_eq!(tick.dt_ms, 0.0);
        assert!(clock.is_running());
    }

    #[test]
    fn test_invalid_time_scale_is_ignored() {
        let mut clock = FrameClock::new();
        clock.set_time_scale(0.5);
        clock.set_time_scale(-1.0);
        clock.set_time_scale(f64::NAN);
        assert_eq!(clock.time_scale(), 0.5);
    }

    #[test]
    fn test_backwards_timestamp_clamps_to_zero() {
        let mut clock = FrameClock::new();
        clock.start(100.0);
        assert_eq!(clock.tick(90.0).unwrap().dt_ms, 0.0);
        assert_eq!(clock.tick(100.0).unwrap().dt_ms, 10.0);
    }

    #[test]
    fn test_manual_time_is_shared() {
        let time = ManualTime::new();
        let other = time.clone();
        time.advance(25.0);
        assert_eq!(other.now_ms(), 25.0);
        other.set(5.0);
        assert_eq!(time.now_ms(), 5.0);
    }
}
