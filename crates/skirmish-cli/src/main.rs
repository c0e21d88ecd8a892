//! Skirmish CLI - headless driver for the goal scheduler.
//!
//! - `skirmish run` - play a posture against the sandbox world
//! - `skirmish postures` - list available postures
//! - `skirmish describe` - dump a posture's goal pool
//! - `skirmish init` - write a default config

mod config;
mod sandbox;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use skirmish_core::{Scheduler, SchedulerConfig, TickOutcome};
use skirmish_tools::{TraceEvent, TraceLog, TraceSink};

use crate::config::{PostureChoice, SkirmishConfig, CONFIG_PATH};
use crate::sandbox::Sandbox;

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Strategy-game opponent goal scheduler", version)]
struct Cli {
    /// Project root directory
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a posture against the sandbox world
    Run {
        /// Posture name (built-in or from config)
        #[arg(long, default_value = "early-game")]
        posture: String,

        /// Number of sandbox frames to simulate
        #[arg(long, default_value_t = 600)]
        frames: u64,

        /// Override the scheduler tick interval
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Sleep between frames instead of running as fast as possible
        #[arg(long)]
        realtime: bool,

        /// Write the decision trace as JSON
        #[arg(long)]
        trace_out: Option<PathBuf>,
    },

    /// List available postures
    Postures,

    /// Print the goal pool a posture installs
    Describe {
        #[arg(long)]
        posture: String,
    },

    /// Write a default config file
    Init,
}

#[derive(Clone, Default)]
struct SharedTrace(Rc<RefCell<TraceLog>>);

impl TraceSink for SharedTrace {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let project_root = match cli.project {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Some(Commands::Run {
            posture,
            frames,
            interval_ms,
            realtime,
            trace_out,
        }) => {
            let mut config = SkirmishConfig::load_from_project(&project_root)?;
            if let Some(ms) = interval_ms {
                config.scheduler = SchedulerConfig {
                    tick_interval_ms: ms,
                };
            }
            let choice = config.resolve_posture(&posture)?;
            run_posture(&config, &choice, frames, realtime, trace_out.as_deref()).await
        }
        Some(Commands::Postures) => {
            let config = SkirmishConfig::load_from_project(&project_root)?;
            for name in config.posture_names() {
                println!("{name}");
            }
            Ok(())
        }
        Some(Commands::Describe { posture }) => {
            let config = SkirmishConfig::load_from_project(&project_root)?;
            let choice = config.resolve_posture(&posture)?;
            let mut scheduler: Scheduler<Sandbox> = Scheduler::new(config.scheduler);
            choice.install(&mut scheduler);
            println!("{}", scheduler.describe_all());
            Ok(())
        }
        Some(Commands::Init) => init_project(&project_root),
        None => {
            println!("Skirmish - strategy-game opponent goal scheduler");
            println!();
            println!("Usage: skirmish <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run        Play a posture against the sandbox world");
            println!("  postures   List available postures");
            println!("  describe   Print the goal pool a posture installs");
            println!("  init       Write a default config file");
            println!();
            println!("Run 'skirmish --help' for more information.");
            Ok(())
        }
    }
}

async fn run_posture(
    config: &SkirmishConfig,
    choice: &PostureChoice,
    frames: u64,
    realtime: bool,
    trace_out: Option<&Path>,
) -> Result<()> {
    tracing::info!(
        posture = choice.name(),
        frames,
        interval_ms = config.scheduler.tick_interval_ms,
        "Starting sandbox run"
    );

    let trace = SharedTrace::default();
    let mut world = Sandbox::new(config.sandbox.clone());
    let mut scheduler = Scheduler::new(config.scheduler).with_trace_sink(Box::new(trace.clone()));
    choice.install(&mut scheduler);

    let frame = Duration::from_millis(config.sandbox.frame_ms.max(1));
    let mut now = Duration::ZERO;
    for _ in 0..frames {
        if let TickOutcome::Executed { id, outcome } = scheduler.tick(now, &mut world) {
            let name = scheduler.get(id).map(|g| g.name().to_string());
            tracing::debug!(
                frame = world.frame(),
                goal = name.as_deref().unwrap_or("?"),
                ?outcome,
                "decision"
            );
        }
        world.step();
        now += frame;
        if realtime {
            tokio::time::sleep(frame).await;
        }
    }

    println!("Posture:     {}", choice.name());
    println!("Frames:      {}", world.frame());
    println!("Decisions:   {}", scheduler.ticks_fired());
    println!("Commands:    {}", scheduler.executions());
    println!("Goals left:  {}", scheduler.active_count());
    println!("Gold:        {}", world.treasury().gold);
    println!("Structures:");
    for (kind, count) in world.structures() {
        println!("  {kind:<14} {count}");
    }
    println!("Units:");
    for (unit, count) in world.units() {
        println!("  {unit:<14} {count}");
    }

    if let Some(path) = trace_out {
        let json = serde_json::to_string_pretty(&*trace.0.borrow())?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write trace to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Trace written");
    }

    Ok(())
}

fn init_project(project_root: &Path) -> Result<()> {
    let config_path = project_root.join(CONFIG_PATH);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_yaml::to_string(&SkirmishConfig::default())?;
    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Initialized {}", config_path.display());
    Ok(())
}
