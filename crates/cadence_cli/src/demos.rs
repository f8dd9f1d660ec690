//! Demo scenarios run by the CLI

use anyhow::Result;
use cadence_animation::{
    completion, AnimatableTarget, Easing, Node, Outcome, Property, Props, Runtime, TaskId,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Count down from `from`, printing once per second
pub async fn countdown(runtime: Rc<Runtime>, from: u32) -> Result<()> {
    println!("{}", from);
    if from == 0 {
        return Ok(());
    }

    let (resolver, done) = completion::<()>();
    let remaining = Rc::new(Cell::new(from));
    let own_id: Rc<Cell<Option<TaskId>>> = Rc::new(Cell::new(None));

    let scheduler = runtime.scheduler().handle();
    let id_slot = Rc::clone(&own_id);
    let repeat = i32::try_from(from).unwrap_or(i32::MAX);
    let id = runtime.scheduler().interval(1000.0, repeat, move || {
        let left = remaining.get().saturating_sub(1);
        remaining.set(left);
        println!("{}", left);
        if left == 0 {
            if let Some(id) = id_slot.get() {
                scheduler.remove(id);
            }
            resolver.resolve(());
        }
    });
    own_id.set(Some(id));

    done.await;
    Ok(())
}

fn print_node(label: &str, node: &Rc<RefCell<Node>>) {
    let node = node.borrow();
    println!(
        "{:<8} transform: {}  opacity: {:.3}",
        label,
        node.transform_css(),
        node.opacity()
    );
}

/// Open a popup node, hold it for a second, then close it
pub async fn popup(runtime: Rc<Runtime>) -> Result<()> {
    let node = Node::new().shared();
    {
        let mut n = node.borrow_mut();
        n.set(&Property::Scale, 0.7);
        n.set(&Property::Opacity, 0.0);
    }
    print_node("closed", &node);

    let open = runtime.tween(node.clone()).parallel([
        runtime
            .tween(node.clone())
            .to(Props::new().scale(1.0), 250.0, Easing::OutBack),
        runtime
            .tween(node.clone())
            .to(Props::new().opacity(1.0), 250.0, Easing::Linear),
    ]);
    let outcome = open.start().await;
    print_node("opened", &node);
    tracing::debug!("Popup open: {:?}", outcome);

    runtime.scheduler().wait(1000.0).await;
    print_node("held", &node);

    let outcome = runtime
        .tween(node.clone())
        .to(Props::new().scale(0.7).opacity(0.0), 250.0, runtime.ease("outQuad"))
        .start()
        .await;
    print_node("closed", &node);

    if outcome != Outcome::Finished {
        anyhow::bail!("Popup close animation was interrupted");
    }
    Ok(())
}

/// A sound channel whose volume can be animated
#[derive(Debug)]
pub struct AudioChannel {
    volume: f32,
}

impl AudioChannel {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl AnimatableTarget for AudioChannel {
    fn get(&self, property: &Property) -> f32 {
        match property {
            Property::Attr(name) if name == "volume" => self.volume,
            _ => 0.0,
        }
    }

    fn set(&mut self, property: &Property, value: f32) {
        match property {
            Property::Attr(name) if name == "volume" => self.volume = value.clamp(0.0, 1.0),
            other => tracing::trace!("AudioChannel: ignoring {}", other),
        }
    }
}

/// Fade a channel's volume, reporting it every 100ms
pub async fn fade(runtime: Rc<Runtime>, from: f32, to: f32, duration_ms: f64) -> Result<()> {
    let channel = Rc::new(RefCell::new(AudioChannel::new(from)));

    let reporter = Rc::clone(&channel);
    let meter = runtime.scheduler().group("meter");
    meter.interval(100.0, -1, move || {
        println!("volume {:.3}", reporter.borrow().volume());
    });

    let outcome = runtime
        .tween(channel.clone())
        .to(Props::new().attr("volume", to), duration_ms, Easing::Linear)
        .start()
        .await;

    meter.clear();
    println!("volume {:.3} ({:?})", channel.borrow().volume(), outcome);
    Ok(())
}

pub fn list_eases(runtime: &Runtime) {
    for name in runtime.ease_names() {
        println!("{}", name);
    }
}

/// Print `samples + 1` evenly spaced values of the named curve
pub fn sample_ease(runtime: &Runtime, name: &str, samples: u32) -> Result<()> {
    if !runtime.ease_names().iter().any(|n| n == name) {
        anyhow::bail!(
            "Unknown easing '{}'. Known: {}",
            name,
            runtime.ease_names().join(", ")
        );
    }

    let easing = runtime.ease(name);
    let samples = samples.max(1);
    for i in 0..=samples {
        let t = i as f32 / samples as f32;
        println!("{:.3}\t{:.5}", t, easing.apply(t));
    }
    Ok(())
}
