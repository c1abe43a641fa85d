#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Forest Survival experience.

mod config;
mod logging;
mod scene;

use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use forest_survival_core::{GameState, MovementPolicy, SeededRandom};
use forest_survival_rendering::{Color, FrameSimulationBreakdown, Presentation, RenderingBackend};
use forest_survival_rendering_macroquad::MacroquadBackend;
use forest_survival_system_session::Session;

/// Survive the forest for as long as you can.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default game configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for the forest layout and enemy spawns; random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Collision policy applied to player movement.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    AxisClamp,
    FenceRollback,
}

impl From<PolicyArg> for MovementPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::AxisClamp => Self::AxisClamp,
            PolicyArg::FenceRollback => Self::FenceRollback,
        }
    }
}

/// Entry point for the Forest Survival command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut game_config = config::load(args.config.as_deref())?;
    if let Some(policy) = args.policy {
        game_config.movement = policy.into();
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("starting with seed {seed} and {:?} movement", game_config.movement);

    let viewport = game_config.viewport;
    let mut session = Session::new(game_config, Box::new(SeededRandom::from_seed(seed)))
        .context("failed to start the session")?;
    let initial_scene = scene::initial(&session).context("failed to build the first scene")?;

    let presentation = Presentation::new(
        "Forest Survival",
        (viewport.width as u32, viewport.height as u32),
        Color::from_rgb_u8(0x3a, 0x2e, 0x1f),
        initial_scene,
    );

    let mut game_over_logged = false;
    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |dt, input, current| {
            let simulation_start = Instant::now();
            match session.step(dt, &scene::input_state(&input)) {
                Ok(report) => {
                    if report.state == GameState::Over && !game_over_logged {
                        log::info!("game over");
                        game_over_logged = true;
                    }
                }
                Err(error) => log::error!("frame failed: {error}"),
            }
            let simulation = simulation_start.elapsed();

            let population_start = Instant::now();
            if let Err(error) = scene::populate(current, &session) {
                log::error!("failed to refresh the scene: {error}");
            }

            FrameSimulationBreakdown {
                simulation,
                scene_population: population_start.elapsed(),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_flag_accepts_kebab_case_names() {
        let args = Args::try_parse_from(["forest-survival", "--policy", "fence-rollback"])
            .expect("valid arguments");

        assert_eq!(args.policy, Some(PolicyArg::FenceRollback));
        assert_eq!(
            MovementPolicy::from(PolicyArg::FenceRollback),
            MovementPolicy::FenceRollback
        );
    }

    #[test]
    fn defaults_leave_everything_unset() {
        let args = Args::try_parse_from(["forest-survival"]).expect("valid arguments");

        assert!(args.config.is_none());
        assert!(args.seed.is_none());
        assert!(args.policy.is_none());
        assert!(!args.vsync && !args.show_fps && !args.verbose);
    }

    #[test]
    fn seed_and_config_are_parsed() {
        let args = Args::try_parse_from([
            "forest-survival",
            "--seed",
            "42",
            "--config",
            "forest.toml",
            "-v",
        ])
        .expect("valid arguments");

        assert_eq!(args.seed, Some(42));
        assert_eq!(args.config, Some(PathBuf::from("forest.toml")));
        assert!(args.verbose);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(Args::try_parse_from(["forest-survival", "--policy", "teleport"]).is_err());
    }
}
