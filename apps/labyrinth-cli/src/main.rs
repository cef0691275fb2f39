use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use labyrinth_common::{GameSettings, RenderMode};
use labyrinth_input::MoverStatus;
use labyrinth_kernel::Maze;
use labyrinth_persist::{SaveRecord, SaveStore};
use labyrinth_render::{FrameBuffer, FrameTimer};
use labyrinth_session::{Session, load_textures};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

/// Frames kept for the rolling timing report.
const TIMER_WINDOW: usize = 240;

#[derive(Parser)]
#[command(name = "labyrinth", about = "Procedural maze generator and software raycaster")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML settings file; missing keys take their defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding named save slots
    #[arg(long, global = true, default_value = "saves")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Pan {
    Left,
    Right,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and effective settings
    Info,
    /// Generate a maze and print it as ASCII
    Generate {
        /// Cells per side (overrides the config)
        #[arg(short, long)]
        size: Option<usize>,
        /// RNG seed; omit for an OS-seeded maze
        #[arg(long)]
        seed: Option<u64>,
        /// Write a save record at the spawn pose
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Run ticks headlessly and write the last frame as PNG
    Render {
        /// Number of ticks to run
        #[arg(short, long, default_value = "1")]
        ticks: u64,
        /// RNG seed for a new maze
        #[arg(long)]
        seed: Option<u64>,
        /// Resume from a save record instead of generating
        #[arg(long, conflicts_with = "resume")]
        load: Option<PathBuf>,
        /// Resume from a named slot in the save store
        #[arg(long)]
        resume: Option<String>,
        /// Hold the forward intent on every tick
        #[arg(long)]
        forward: bool,
        /// Hold a pan intent on every tick
        #[arg(long, value_enum)]
        pan: Option<Pan>,
        /// Render mode (overrides the config)
        #[arg(long)]
        mode: Option<RenderMode>,
        /// Worker threads or chunk count (overrides the config)
        #[arg(long)]
        threads: Option<usize>,
        /// PNG output path
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
        /// Write a save record after the last tick
        #[arg(long)]
        save: Option<PathBuf>,
        /// Also store the final pose under this slot name
        #[arg(long)]
        slot: Option<String>,
    },
    /// List or remove named save slots
    Saves {
        /// Slot to delete
        #[arg(long)]
        remove: Option<String>,
    },
    /// Time every render mode on one maze and check their frames agree
    Bench {
        /// Frames per mode
        #[arg(short, long, default_value = "60")]
        frames: usize,
        /// RNG seed for the maze
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<GameSettings> {
    match path {
        Some(path) => GameSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(GameSettings::default()),
    }
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut settings = load_settings(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("labyrinth v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "screen: {}x{}, fov {}, brightness {}",
                settings.width, settings.height, settings.fov, settings.brightness
            );
            println!("render: {} x{}", settings.render_mode, settings.threads);
            println!(
                "maze: {0}x{0} cells, move {1}, rotate {2}, grace {3} ticks",
                settings.grid_size, settings.move_speed, settings.rot_speed, settings.grace_frames
            );
            match &settings.texture_dir {
                Some(dir) => println!("textures: {}", dir.display()),
                None => println!("textures: builtin"),
            }
        }
        Commands::Generate { size, seed, save } => {
            if let Some(size) = size {
                settings.grid_size = size;
            }
            settings.validate()?;
            let textures = load_textures(&settings)?;
            let maze = Maze::generate(
                settings.grid_size,
                settings.grid_size,
                textures.wall_count(),
                rng(seed),
            )?;
            print!("{}", maze.dense());
            println!(
                "entry={:?} exit={:?} solvable={}",
                maze.entry(),
                maze.exit(),
                maze.is_solvable()
            );
            if let Some(path) = save {
                let record = SaveRecord::capture(&maze, &maze.spawn_view(settings.fov))?;
                record.write_json(&path)?;
                println!("saved to {}", path.display());
            }
        }
        Commands::Render {
            ticks,
            seed,
            load,
            resume,
            forward,
            pan,
            mode,
            threads,
            output,
            save,
            slot,
        } => {
            if let Some(mode) = mode {
                settings.render_mode = mode;
            }
            if let Some(threads) = threads {
                settings.threads = threads;
            }
            let record = match (&load, &resume) {
                (Some(path), _) => Some(
                    SaveRecord::read_json(path)
                        .with_context(|| format!("reading save {}", path.display()))?,
                ),
                (None, Some(name)) => Some(SaveStore::open(&cli.store)?.load(name)?),
                (None, None) => None,
            };
            let mut session = match &record {
                Some(record) => Session::restore(settings, record)?,
                None => Session::new_game_with_rng(settings, rng(seed))?,
            };

            let intents = session.intents();
            if forward {
                intents.move_forward();
            }
            match pan {
                Some(Pan::Left) => intents.pan_left(),
                Some(Pan::Right) => intents.pan_right(),
                None => {}
            }

            let mut timer = FrameTimer::new(TIMER_WINDOW);
            let mut last: Option<(MoverStatus, FrameBuffer)> = None;
            for _ in 0..ticks.max(1) {
                let tick = timer.time(|| session.tick())?;
                last = Some((tick.status, tick.frame));
            }
            let Some((status, frame)) = last else {
                anyhow::bail!("no frame rendered");
            };
            frame.save_png(&output)?;
            println!(
                "{} ticks in {} mode, avg {:?}/frame, status {:?}, exit hits {}",
                session.ticks(),
                session.render_mode(),
                timer.average(),
                status,
                session.exit_signal().hits()
            );
            println!("frame written to {}", output.display());

            if save.is_some() || slot.is_some() {
                let record = session.save()?;
                if let Some(path) = save {
                    record.write_json(&path)?;
                    println!("saved to {}", path.display());
                }
                if let Some(name) = slot {
                    let path = SaveStore::open(&cli.store)?.save(&name, &record)?;
                    println!("slot {name:?} saved to {}", path.display());
                }
            }
        }
        Commands::Saves { remove } => {
            let store = SaveStore::open(&cli.store)?;
            if let Some(name) = remove {
                store.remove(&name)?;
                tracing::info!(slot = %name, "slot removed");
            }
            let slots = store.slots()?;
            if slots.is_empty() {
                println!("no saves in {}", store.root().display());
            }
            for name in slots {
                println!("{name}");
            }
        }
        Commands::Bench { frames, seed } => {
            let frames = frames.max(1);
            println!("=== Render mode bench: {frames} frames, seed {seed} ===");
            let mut reference: Option<FrameBuffer> = None;
            for mode in RenderMode::ALL {
                let candidate = GameSettings {
                    render_mode: mode,
                    ..settings.clone()
                };
                let mut session = match Session::new_game_with_rng(candidate, StdRng::seed_from_u64(seed)) {
                    Ok(session) => session,
                    Err(err) => {
                        println!("  {mode}: skipped ({err})");
                        continue;
                    }
                };
                session.intents().pan_right();

                let mut timer = FrameTimer::new(frames.min(TIMER_WINDOW));
                let mut last = None;
                for _ in 0..frames {
                    last = Some(timer.time(|| session.tick())?.frame);
                }
                let matches = match (&reference, &last) {
                    (Some(expected), Some(frame)) => {
                        if expected == frame { "identical" } else { "MISMATCH" }
                    }
                    _ => "reference",
                };
                if reference.is_none() {
                    reference = last;
                }
                println!(
                    "  {mode}: avg {:?}, min {:?}, max {:?}, {:.1} fps, {matches}",
                    timer.average(),
                    timer.min(),
                    timer.max(),
                    timer.fps()
                );
            }
        }
    }

    Ok(())
}
