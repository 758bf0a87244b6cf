// crates/editor/src/main.rs
//! Headless level runner: loads a level, drives it with scripted input for a
//! number of frames and logs what happened. `--watch` reloads the level
//! whenever the file changes.

mod hot_reload;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use engine_core::logging::init_logging;
use engine_core::render::{RecordingSurface, RenderStats};
use engine_core::{EngineConfig, EngineError, EngineLoop};
use engine_shared::{Button, InputState};
use tracing::{error, info, warn};

use crate::hot_reload::LevelWatcher;

const USAGE: &str = "usage: editor [LEVEL.json] [--frames N] [--config CONFIG.json] [--watch] [--verbose]";
const DEFAULT_LEVEL: &str = "assets/levels/demo.json";
const DEFAULT_FRAMES: u64 = 600;

struct Options {
    level: PathBuf,
    config: Option<PathBuf>,
    frames: u64,
    watch: bool,
    verbose: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options {
        level: PathBuf::from(DEFAULT_LEVEL),
        config: None,
        frames: DEFAULT_FRAMES,
        watch: false,
        verbose: false,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => {
                let value = args.next().ok_or("--frames needs a value")?;
                options.frames = value.parse().map_err(|_| format!("bad frame count '{value}'"))?;
            }
            "--config" => {
                options.config = Some(args.next().ok_or("--config needs a path")?.into());
            }
            "--watch" => options.watch = true,
            "--verbose" | "-v" => options.verbose = true,
            flag if flag.starts_with('-') => return Err(format!("unknown flag '{flag}'")),
            path => options.level = PathBuf::from(path),
        }
    }
    Ok(options)
}

/// Run right the whole time, jump every second and a half, attack every
/// three quarters of a second.
fn scripted_input(frame: u64) -> InputState {
    let mut input = InputState::default().with(Button::Right);
    if frame % 90 < 6 {
        input.set(Button::Jump, true);
    }
    if frame % 45 == 20 {
        input.set(Button::Attack, true);
    }
    input
}

fn run(options: &Options) -> Result<(), EngineError> {
    let config = match &options.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let mut engine_loop = EngineLoop::from_config(&config);
    let mut sim = game_plugin::new_simulation(config);

    let spawned = sim.load_level_file(&options.level)?;
    info!(level = %options.level.display(), spawned, "level ready");

    let watcher = if options.watch {
        match LevelWatcher::new(&options.level) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                warn!(%err, "file watching unavailable, running without it");
                None
            }
        }
    } else {
        None
    };

    let mut surface = RecordingSurface::new();
    let mut totals = RenderStats::default();
    let mut steps_run = 0u64;

    for frame in 0..options.frames {
        if watcher.as_ref().is_some_and(LevelWatcher::poll_changed) {
            match sim.load_level_file(&options.level) {
                Ok(spawned) => info!(spawned, "level reloaded"),
                Err(err) => warn!(%err, "reload failed, keeping the running level"),
            }
        }

        // Watch mode runs on the wall clock; otherwise one fixed step per frame.
        let frame_dt = if watcher.is_some() {
            std::thread::sleep(Duration::from_secs_f32(engine_loop.sim_dt()));
            engine_loop.tick_timer()
        } else {
            engine_loop.sim_dt()
        };

        let input = scripted_input(frame);
        let steps = engine_loop.update_simulation(frame_dt, |dt| {
            sim.step(dt, input);
        });
        steps_run += u64::from(steps);
        if steps == 0 {
            continue;
        }

        surface.clear();
        let stats = sim.render(&mut surface);
        totals.drawn += stats.drawn;
        totals.failed += stats.failed;
        totals.dropped += stats.dropped;
        totals.placeholders = totals.placeholders.max(stats.placeholders);
    }

    let player = sim.objects.player().and_then(|p| sim.objects.get(p));
    info!(
        frames = options.frames,
        steps = steps_run,
        score = sim.systems.score,
        active = sim.objects.active_count(),
        sleeping = sim.objects.inactive_count(),
        player_x = player.map_or(f32::NAN, |p| p.position.x),
        player_life = player.map_or(0, |p| p.life),
        drawn = totals.drawn,
        failed = totals.failed,
        dropped = totals.dropped,
        "run finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{msg}\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    init_logging(options.verbose);

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "editor failed");
            ExitCode::FAILURE
        }
    }
}
