//! Braket entry point
//!
//! Native builds run a headless autopilot match and print the result.
//! The browser build is driven from JavaScript through `braket::wasm`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow};
    use clap::Parser;

    use braket::renderer::{Renderer, TextRenderer};
    use braket::settings::MatchConfig;
    use braket::sim::{Clock, FixedStep, GameEvent, MatchState, SystemClock, autopilot};

    #[derive(Parser)]
    #[command(name = "braket")]
    #[command(about = "Run a headless Braket match with autopilot paddles")]
    struct Args {
        /// JSON match config (missing keys use defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for the launch RNG (enables random launch directions)
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many ticks even if balls remain
        #[arg(long, default_value_t = 100_000)]
        max_ticks: u64,

        /// Print a text frame every N ticks (0 disables)
        #[arg(long, default_value_t = 0)]
        render_every: u64,

        /// Pace ticks against the wall clock instead of running flat out
        #[arg(long)]
        realtime: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let mut config = match &args.config {
            Some(path) => MatchConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => MatchConfig::default(),
        };
        if let Some(seed) = args.seed {
            config.seed = seed;
            config.random_launch = true;
        }
        if args.max_ticks == 0 {
            return Err(anyhow!("max_ticks must be > 0"));
        }

        let mut state = MatchState::new(config).context("building match")?;
        let mut renderer = TextRenderer::new(80, 30);
        log::info!("Braket (native) starting...");

        if args.realtime {
            let clock = SystemClock::default();
            let mut step = FixedStep::from_config(&state.config);
            let frame = std::time::Duration::from_secs_f64(step.dt());
            while !state.is_over() && state.time_ticks < args.max_ticks {
                steer(&mut state);
                let before = state.time_ticks;
                step.pump(&clock, &mut state);
                report(&state, &mut renderer, &args, before);
                std::thread::sleep(frame);
            }
            log::debug!("Realtime run finished at {:.2}s", clock.now());
        } else {
            while !state.is_over() && state.time_ticks < args.max_ticks {
                steer(&mut state);
                let before = state.time_ticks;
                state.advance();
                report(&state, &mut renderer, &args, before);
            }
        }

        if !state.is_over() {
            log::warn!("Tick limit {} reached with balls in play", args.max_ticks);
        }
        // Idempotent once the match is already over
        let summary = state.end().clone();
        println!("{summary}");
        println!(
            "({} ticks, {} blocks left)",
            summary.ticks,
            state.blocks.len()
        );
        Ok(())
    }

    /// Queue one autopilot step per player
    fn steer(state: &mut MatchState) {
        let ids: Vec<_> = state.players.iter().map(|p| p.id).collect();
        for id in ids {
            if let Some(direction) = autopilot(state, id) {
                // Ids come from the match itself
                let _ = state.queue_move(id, direction);
            }
        }
    }

    fn report(state: &MatchState, renderer: &mut TextRenderer, args: &Args, before: u64) {
        for event in &state.events {
            if let GameEvent::BlockDestroyed { block, award, .. } = event {
                log::info!("Tick {}: block {} destroyed, {:?}", state.time_ticks, block, award);
            }
        }
        if args.render_every > 0 {
            let every = args.render_every;
            if (before / every) != (state.time_ticks / every) {
                renderer.draw(state);
                println!("{}", renderer.frame());
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is braket::wasm::wasm_main, this is just to satisfy the compiler
}
