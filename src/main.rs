use handswipe::action::{Action, ActionMapper};
use handswipe::config::Config;
use handswipe::gesture::{Axis, SelectionPolicy, SwipeDetector};
use handswipe::keys::{DryRunEmitter, KeyEmitter, KeyScheme};
use handswipe::pipeline::{Pipeline, StopReason};
use handswipe::source::JsonLinesSource;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "handswipe", version, about = "Scroll feeds with hand swipes")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,

    /// Config file (default: ./config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Track swipes from a landmark stream (default)
    Run(RunArgs),
    /// Send NEXT/PREVIOUS from the keyboard, no tracker needed
    TestKeys(Overrides),
    /// Print the effective configuration
    Config(Overrides),
}

#[derive(Args)]
struct RunArgs {
    /// JSON-lines landmark stream; "-" or omitted reads stdin
    #[arg(long, short)]
    input: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

/// Command-line values that take precedence over the config file
#[derive(Args)]
struct Overrides {
    #[arg(long)]
    min_displacement: Option<f64>,
    #[arg(long)]
    max_duration: Option<f64>,
    #[arg(long)]
    cooldown: Option<f64>,
    #[arg(long, value_enum)]
    axis: Option<Axis>,
    /// Reject diagonal swipes beyond this cross/along travel ratio
    #[arg(long)]
    max_off_axis_ratio: Option<f64>,
    #[arg(long, value_enum)]
    policy: Option<SelectionPolicy>,
    #[arg(long)]
    min_confidence: Option<f64>,
    /// Hand skeleton point used as the tracked position
    #[arg(long)]
    landmark_index: Option<usize>,
    #[arg(long, value_enum)]
    keys: Option<KeyScheme>,
    /// Forward swipes go to the previous item
    #[arg(long)]
    invert: bool,
    /// Log key presses instead of sending them
    #[arg(long)]
    dry_run: bool,
}

impl Overrides {
    fn apply(&self, config: &mut Config) {
        let g = &mut config.gesture;
        if let Some(v) = self.min_displacement {
            g.min_displacement = v;
        }
        if let Some(v) = self.max_duration {
            g.max_duration = v;
        }
        if let Some(v) = self.cooldown {
            g.cooldown = v;
        }
        if let Some(v) = self.axis {
            g.axis = v;
        }
        if self.max_off_axis_ratio.is_some() {
            g.max_off_axis_ratio = self.max_off_axis_ratio;
        }

        let s = &mut config.sampler;
        if let Some(v) = self.policy {
            s.policy = v;
        }
        if let Some(v) = self.min_confidence {
            s.min_confidence = v;
        }
        if let Some(v) = self.landmark_index {
            s.landmark_index = v;
        }

        let k = &mut config.keys;
        if let Some(v) = self.keys {
            k.scheme = v;
        }
        k.invert |= self.invert;
        k.dry_run |= self.dry_run;
    }
}

#[hotpath::main]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "handswipe=debug"
    } else {
        "handswipe=info"
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        None => run(cli.run, config),
        Some(Command::Run(args)) => run(args, config),
        Some(Command::TestKeys(overrides)) => {
            overrides.apply(&mut config);
            test_keys(&config)
        }
        Some(Command::Config(overrides)) => {
            overrides.apply(&mut config);
            print!("{}", config.to_toml()?);
            config.validate()?;
            Ok(())
        }
    }
}

fn run(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    args.overrides.apply(&mut config);
    config.validate()?;
    let gesture = config.gesture_config()?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

    let landmark_index = config.sampler.landmark_index;
    let mut source = match &args.input {
        Some(path) if path.as_os_str() != "-" => JsonLinesSource::open(path, landmark_index)
            .with_context(|| format!("opening landmark input {}", path.display()))?,
        _ => JsonLinesSource::stdin(landmark_index),
    };

    let mapper = ActionMapper::new(
        config.keys.polarity(),
        config.keys.scheme,
        build_emitter(config.keys.dry_run)?,
    );
    let mut pipeline = Pipeline::new(config.motion_sampler()?, SwipeDetector::new(gesture), mapper);

    let gesture = pipeline.detector().config();
    let mapper = pipeline.mapper();
    info!(
        "tracking {} swipes (min {:.2}, within {:.2}s, cooldown {:.2}s), keys: {} ({:?}), hand: {:?}",
        gesture.axis(),
        gesture.min_displacement(),
        gesture.max_duration(),
        gesture.cooldown(),
        mapper.scheme(),
        mapper.polarity(),
        config.sampler.policy
    );
    eprintln!("Waiting for landmark frames... Press Ctrl+C to stop.\n");

    let reason = pipeline.run(&mut source, &running);
    if reason == StopReason::SourceClosed {
        info!("landmark stream ended");
    }

    eprintln!("\n{}", pipeline.stats().summary());
    Ok(())
}

fn build_emitter(dry_run: bool) -> anyhow::Result<Box<dyn KeyEmitter>> {
    if dry_run {
        return Ok(Box::new(DryRunEmitter));
    }

    #[cfg(feature = "keys")]
    {
        let emitter = handswipe::keys::EnigoEmitter::new()?;
        Ok(Box::new(emitter))
    }
    #[cfg(not(feature = "keys"))]
    {
        tracing::warn!("built without the `keys` feature, key presses will only be logged");
        Ok(Box::new(DryRunEmitter))
    }
}

fn test_keys(config: &Config) -> anyhow::Result<()> {
    config.validate()?;
    let mut mapper = ActionMapper::new(
        config.keys.polarity(),
        config.keys.scheme,
        build_emitter(config.keys.dry_run)?,
    );

    println!("Key test using the '{}' layout", config.keys.scheme);
    println!("  n / j  send NEXT");
    println!("  p / k  send PREVIOUS");
    println!("  q      quit\n");

    loop {
        let key = read_key()?;
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            break;
        }
        let action = match key.code {
            KeyCode::Char('n') | KeyCode::Char('j') => Action::Next,
            KeyCode::Char('p') | KeyCode::Char('k') => Action::Previous,
            KeyCode::Char('q') | KeyCode::Esc => break,
            _ => {
                println!("Unknown key. Use n/p/q");
                continue;
            }
        };
        let dispatch = mapper.send(action);
        if dispatch.delivered {
            println!("Sent {}", action);
        }
    }

    println!("Key test ended.");
    Ok(())
}

/// Block for a single key press; raw mode is held only while waiting.
fn read_key() -> anyhow::Result<KeyEvent> {
    terminal::enable_raw_mode()?;
    let key = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(key),
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    terminal::disable_raw_mode()?;
    Ok(key?)
}
