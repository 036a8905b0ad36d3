//! Sky Hop - headless runner
//!
//! Plays runs with the demo autopilot at a fixed frame rate and prints a
//! summary per run. The browser build drives the game through `web::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use serde::Serialize;
    use sky_hop::consts::SIM_DT;
    use sky_hop::{FrameInput, Game, Phase, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "sky-hop")]
    #[command(about = "Run Sky Hop headless with the demo autopilot")]
    struct Cli {
        /// Session seed (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of runs to play
        #[arg(long, default_value_t = 1)]
        runs: u32,
        /// Abandon a run after this many seconds of game time
        #[arg(long, default_value_t = 120.0)]
        max_seconds: f32,
        /// Tuning JSON file (defaults when omitted)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Simulated render frame rate
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
        fps: u32,
        /// Print summaries as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        run: u32,
        seed: u64,
        score: u32,
        platforms_hit: u32,
        seconds: f32,
        dropped_generations: u32,
        /// False when the run hit `--max-seconds` and was abandoned
        fell: bool,
        high_score: u32,
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    fn play_run(game: &mut Game, run: u32, fps: u32, max_seconds: f32) -> Result<RunSummary> {
        game.update(0.0, &FrameInput { confirm: true, ..Default::default() });
        if game.phase() != Phase::Playing {
            bail!("run {} did not start", run);
        }

        let dt = 1.0 / fps as f32;
        let max_ticks = (max_seconds / SIM_DT) as u64;
        let input = FrameInput {
            autopilot: true,
            ..Default::default()
        };

        while game.phase() == Phase::Playing && game.state().time_ticks < max_ticks {
            game.update(dt, &input);
        }

        let state = game.state();
        let mut summary = RunSummary {
            run,
            seed: state.seed,
            score: state.score,
            platforms_hit: state.player.platforms_hit,
            seconds: state.time_ticks as f32 * SIM_DT,
            dropped_generations: state.dropped_generations,
            fell: game.phase() == Phase::GameOver,
            high_score: 0,
        };

        // Back to the menu: confirm on game over, escape on timeout
        let leave = if summary.fell {
            FrameInput { confirm: true, ..Default::default() }
        } else {
            log::info!("Run {} reached the {}s limit", run, max_seconds);
            FrameInput { escape: true, ..Default::default() }
        };
        game.update(0.0, &leave);
        summary.high_score = game.high_score();

        Ok(summary)
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        let seed = cli.seed.unwrap_or_else(clock_seed);
        log::info!("Sky Hop (native) starting with seed: {}", seed);

        let mut game = Game::with_tuning(seed, tuning).context("invalid tuning")?;
        let mut summaries = Vec::with_capacity(cli.runs as usize);
        for run in 1..=cli.runs {
            let summary = play_run(&mut game, run, cli.fps, cli.max_seconds)?;
            if !cli.json {
                println!(
                    "run {:>3}  seed {:>20}  score {:>6}  platforms {:>4}  {:>7.2}s  dropped {:>3}  {}",
                    summary.run,
                    summary.seed,
                    summary.score,
                    summary.platforms_hit,
                    summary.seconds,
                    summary.dropped_generations,
                    if summary.fell { "fell" } else { "timeout" },
                );
            }
            summaries.push(summary);
        }

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        } else {
            println!("high score: {}", game.high_score());
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
