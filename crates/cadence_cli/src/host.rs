//! Frame host
//!
//! Stands in for a display's frame callback: a single-threaded tokio
//! runtime ticks the [`Runtime`] at a fixed rate while a demo future, spawned
//! on the same thread, awaits completions produced by those ticks.

use anyhow::{Context, Result};
use cadence_animation::Runtime;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;
use tokio::time::MissedTickBehavior;

/// Drive `runtime` at `fps` until the future built by `demo` completes
pub fn run<F, Fut>(runtime: Rc<Runtime>, fps: u32, demo: F) -> Result<()>
where
    F: FnOnce(Rc<Runtime>) -> Fut,
    Fut: Future<Output = Result<()>> + 'static,
{
    let tokio_runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to build tokio runtime")?;

    let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
    let local = LocalSet::new();

    local.block_on(&tokio_runtime, async move {
        runtime.start();
        tracing::debug!("Host: running at {} fps", fps);

        let demo = tokio::task::spawn_local(demo(Rc::clone(&runtime)));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut frames = 0u64;
        while !demo.is_finished() {
            ticker.tick().await;
            if !runtime.frame() {
                break;
            }
            frames += 1;
        }

        runtime.stop();
        tracing::debug!("Host: stopped after {} frames", frames);

        if !demo.is_finished() {
            demo.abort();
            anyhow::bail!("Runtime stopped before the demo finished");
        }
        demo.await.context("Demo task failed")?
    })
}
