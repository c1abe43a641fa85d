#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestration for a Forest Survival session.
//!
//! A [`Session`] owns the world and every system. Each call to
//! [`Session::step`] runs one frame: pause handling, rotation, movement,
//! steering with enemy contact, obstacle contact and finally the host timers.

use std::time::Duration;

use forest_survival_core::{
    heading_between, Command, ConfigError, Event, GameConfig, GameState, InputState,
    RandomSource,
};
use forest_survival_system_flocking::Steering;
use forest_survival_system_forest::ForestGenerator;
use forest_survival_system_movement::Movement;
use forest_survival_system_spawning::{Config as SpawnConfig, Spawning};
use forest_survival_world::{self as world, query, StoreError, World};
use thiserror::Error;

/// Failures raised while building or stepping a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration was rejected before the world was built.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A component the frame depends on was missing from the world.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Lifecycle state after the frame.
    pub state: GameState,
    /// Every event the world broadcast during the frame, in order.
    pub events: Vec<Event>,
    /// Whether the simulation chain continues, i.e. the session is running.
    pub continue_running: bool,
}

/// Owns the world, the systems and the random source of one game.
pub struct Session {
    config: GameConfig,
    world: World,
    random: Box<dyn RandomSource>,
    movement: Movement,
    steering: Steering,
    spawning: Spawning,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("world", &self.world)
            .field("spawning", &self.spawning)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Builds the world with the player at its start and the forest planted.
    pub fn new(
        config: GameConfig,
        mut random: Box<dyn RandomSource>,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let mut world = World::new(&config);
        let origin = config.player.start_center();
        let mut commands = Vec::new();
        ForestGenerator::new(config.forest).plant(origin, origin, random.as_mut(), &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        log::info!("{}", query::welcome_banner(&world));

        Ok(Self {
            movement: Movement::new(config.movement, config.arena, config.viewport),
            steering: Steering::new(),
            spawning: Spawning::new(SpawnConfig::new(config.spawner, config.enemy, config.arena)),
            config,
            world,
            random,
        })
    }

    /// Configuration the session was built from.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GameState {
        query::game_state(&self.world)
    }

    /// Runs one frame of `dt` host time with the provided input.
    pub fn step(&mut self, dt: Duration, input: &InputState) -> Result<StepReport, SessionError> {
        let mut events = Vec::new();
        if self.state() == GameState::Over {
            return Ok(self.report(events));
        }

        if input.pause_toggle {
            let state = match self.state() {
                GameState::Running => GameState::Paused,
                _ => GameState::Running,
            };
            self.submit(vec![Command::SetGameState { state }], &mut events);
        }

        if self.state() == GameState::Running {
            self.simulate(input, &mut events)?;
        }

        if self.state() != GameState::Over {
            self.advance_timers(dt, &mut events)?;
        }

        Ok(self.report(events))
    }

    fn simulate(
        &mut self,
        input: &InputState,
        events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        let mut commands = Vec::new();
        if let Some(pointer) = input.pointer {
            let radians = heading_between(self.config.viewport.center(), pointer);
            commands.push(Command::FacePlayer { radians });
        }
        let player = query::player(&self.world)?;
        self.movement.handle(input, &player, &mut commands);
        self.submit(commands, events);

        let player = query::player(&self.world)?;
        let enemies = query::enemy_view(&self.world)?;
        let mut commands = Vec::new();
        self.steering.handle(&enemies, &player, &mut commands);
        self.submit(commands, events);
        if self.state() == GameState::Over {
            return Ok(());
        }

        let player = query::player(&self.world)?;
        let mut commands = Vec::new();
        self.movement
            .handle_contacts(&player, query::obstacles(&self.world), &mut commands);
        self.submit(commands, events);
        Ok(())
    }

    fn advance_timers(
        &mut self,
        dt: Duration,
        events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        let mut tick_events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut tick_events);

        let enemies = query::enemy_view(&self.world)?;
        let mut commands = Vec::new();
        self.spawning
            .handle(&tick_events, &enemies, self.random.as_mut(), &mut commands);
        events.append(&mut tick_events);
        self.submit(commands, events);
        Ok(())
    }

    /// Applies commands in order, stopping as soon as the game is over.
    fn submit(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            if self.state() == GameState::Over {
                break;
            }
            world::apply(&mut self.world, command, events);
        }
    }

    fn report(&self, events: Vec<Event>) -> StepReport {
        let state = self.state();
        StepReport {
            state,
            events,
            continue_running: state == GameState::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use forest_survival_core::{Position, ScriptedRandom, ScreenPoint};

    const FRAME: Duration = Duration::from_millis(16);

    /// A constant draw of 0.99 rejects every tree and always picks the right edge.
    fn empty_forest_session() -> Session {
        Session::new(GameConfig::default(), Box::new(ScriptedRandom::constant(0.99)))
            .expect("valid configuration")
    }

    fn holding_right() -> InputState {
        InputState {
            right: true,
            ..InputState::default()
        }
    }

    fn player_position(session: &Session) -> Position {
        query::player(session.world()).expect("player").position
    }

    #[test]
    fn pointer_sets_rotation_without_moving() {
        let mut session = empty_forest_session();
        let start = player_position(&session);
        let input = InputState {
            pointer: Some(ScreenPoint::new(450.0, 320.0)),
            ..InputState::default()
        };

        let report = session.step(FRAME, &input).expect("step");

        let player = query::player(session.world()).expect("player");
        assert_relative_eq!(player.facing, 20.0_f32.atan2(50.0));
        assert_eq!(player.position, start);
        assert!(report.continue_running);
        assert!(!report
            .events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. })));
    }

    #[test]
    fn paused_session_does_not_move_until_resumed() {
        let mut session = empty_forest_session();
        let start = player_position(&session);

        let paused = session
            .step(
                FRAME,
                &InputState {
                    pause_toggle: true,
                    ..holding_right()
                },
            )
            .expect("step");
        assert_eq!(paused.state, GameState::Paused);
        assert!(!paused.continue_running);

        let _ = session.step(FRAME, &holding_right()).expect("step");
        assert_eq!(player_position(&session), start);

        let resumed = session
            .step(
                FRAME,
                &InputState {
                    pause_toggle: true,
                    ..holding_right()
                },
            )
            .expect("step");
        assert_eq!(resumed.state, GameState::Running);
        assert_eq!(player_position(&session), start.offset(2.0, 0.0));
    }

    #[test]
    fn timers_keep_running_while_paused() {
        let mut session = empty_forest_session();
        let _ = session
            .step(
                FRAME,
                &InputState {
                    pause_toggle: true,
                    ..InputState::default()
                },
            )
            .expect("step");

        let report = session
            .step(Duration::from_millis(3_000), &InputState::default())
            .expect("step");

        assert!(report
            .events
            .iter()
            .any(|event| matches!(event, Event::EnemySpawned { .. })));
        assert_eq!(session.state(), GameState::Paused);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut config = GameConfig::default();
        config.spawner.interval_ms = 0;

        let error = Session::new(config, Box::new(ScriptedRandom::constant(0.5)))
            .expect_err("zero interval must be rejected");
        assert!(matches!(error, SessionError::Config(ConfigError::ZeroInterval)));
    }

    #[test]
    fn infinite_forest_is_rejected_before_planting() {
        let mut config = GameConfig::default();
        config.forest.map_size = f32::INFINITY;

        let error = Session::new(config, Box::new(ScriptedRandom::constant(0.5)))
            .expect_err("infinite map must be rejected");
        assert!(matches!(
            error,
            SessionError::Config(ConfigError::NonFinite {
                field: "forest.map_size",
                ..
            })
        ));
    }
}
