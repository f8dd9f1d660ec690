//! Cadence CLI
//!
//! Runs the scheduling core against a real-time frame host:
//! - `countdown`: a repeating one-second task
//! - `popup`: open, hold and close a node with parallel tweens
//! - `fade`: a volume fade on a custom target
//! - `ease`: sample a named easing curve

mod config;
mod demos;
mod host;

use anyhow::Result;
use cadence_animation::Runtime;
use clap::{Parser, Subcommand};
use config::CadenceConfig;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Frame-driven task scheduling and tween demos
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Frame-driven task scheduling and tween demos")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./cadence.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Frames per second delivered by the host
    #[arg(long, global = true)]
    fps: Option<u32>,

    /// Global time scale applied to every frame delta
    #[arg(long, global = true)]
    time_scale: Option<f64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count down once per second
    Countdown {
        /// Starting count
        #[arg(long, default_value = "10")]
        from: u32,
    },

    /// Open a popup, hold it for a second, then close it
    Popup,

    /// Fade a volume level over time
    Fade {
        #[arg(long, default_value = "1.0")]
        from: f32,
        #[arg(long, default_value = "0.0")]
        to: f32,
        /// Fade duration in milliseconds
        #[arg(long, default_value_t = cadence_animation::DEFAULT_DURATION_MS)]
        duration: f64,
    },

    /// Print sampled values of an easing curve
    Ease {
        /// Easing name (see --list)
        #[arg(required_unless_present = "list")]
        name: Option<String>,
        /// Number of samples between 0 and 1
        #[arg(long, default_value = "10")]
        samples: u32,
        /// List registered easing names
        #[arg(long)]
        list: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CadenceConfig::load(cli.config.as_deref())?;

    init_logging(&config.host.log, cli.verbose);

    if let Some(fps) = cli.fps {
        config.host.fps = fps.max(1);
    }
    if let Some(scale) = cli.time_scale {
        config.runtime.time_scale = scale;
    }

    let runtime = Rc::new(Runtime::new(config.runtime)?);
    tracing::debug!("{:?}", runtime);

    match cli.command {
        Command::Countdown { from } => {
            host::run(runtime, config.host.fps, move |rt| demos::countdown(rt, from))
        }
        Command::Popup => host::run(runtime, config.host.fps, demos::popup),
        Command::Fade { from, to, duration } => host::run(runtime, config.host.fps, move |rt| {
            demos::fade(rt, from, to, duration)
        }),
        Command::Ease {
            name,
            samples,
            list,
        } => {
            if list {
                demos::list_eases(&runtime);
                Ok(())
            } else {
                demos::sample_ease(&runtime, name.as_deref().unwrap_or("linear"), samples)
            }
        }
    }
}

fn init_logging(default_filter: &str, verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
