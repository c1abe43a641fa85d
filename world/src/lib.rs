#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Forest Survival.

mod forest;
mod overlay;
mod pool;
mod store;

use std::time::Duration;

use forest_survival_core::{
    ArenaConfig, Command, Component, DamageSource, EntityId, Event, Facing, GameConfig,
    GameState, Health, ObstacleId, Position, RejectionReason, Tint, TreeSeed, Velocity, Viewport,
    WELCOME_BANNER,
};

use forest::ObstacleField;
use overlay::DamageOverlay;
use pool::EnemyPool;
use store::EntityStore;

pub use pool::PoolError;
pub use store::StoreError;

const PLAYER_TINT: Tint = Tint::from_rgb(0x80, 0x80, 0x80);

/// Represents the authoritative Forest Survival world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    arena: ArenaConfig,
    viewport: Viewport,
    store: EntityStore,
    player: EntityId,
    pool: EnemyPool,
    forest: ObstacleField,
    overlay: DamageOverlay,
    state: GameState,
    elapsed: Duration,
}

impl World {
    /// Creates a world holding the player at its configured start and no obstacles.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let mut store = EntityStore::default();
        let player = store.spawn_with(&[
            Component::Position(config.player.start),
            Component::Size(config.player.footprint()),
            Component::Velocity(Velocity {
                speed: config.player.speed,
            }),
            Component::Health(Health::new(config.player.health)),
            Component::Facing(Facing::default()),
            Component::Tint(PLAYER_TINT),
        ]);

        Self {
            banner: WELCOME_BANNER,
            arena: config.arena,
            viewport: config.viewport,
            store,
            player,
            pool: EnemyPool::new(config.pool),
            forest: ObstacleField::default(),
            overlay: DamageOverlay::new(&config.overlay),
            state: GameState::Running,
            elapsed: Duration::ZERO,
        }
    }

    fn plant_forest(
        &mut self,
        trees: &[TreeSeed],
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        let count = self.forest.plant(trees)?;
        log::debug!("planted {count} trees");
        out_events.push(Event::ForestPlanted { count });
        Ok(())
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });
        if self.overlay.advance(dt) {
            out_events.push(Event::OverlayCleared);
        }
    }

    fn move_player(
        &mut self,
        to: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        let position = self.store.get_mut::<Position>(self.player)?;
        let from = *position;
        *position = to;
        out_events.push(Event::PlayerMoved { from, to });
        Ok(())
    }

    fn face_player(
        &mut self,
        radians: f32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        let facing = self.store.get_mut::<Facing>(self.player)?;
        if facing.radians != radians {
            facing.radians = radians;
            out_events.push(Event::PlayerTurned { radians });
        }
        Ok(())
    }

    fn strike_obstacle(
        &mut self,
        obstacle: ObstacleId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        let tree = self.forest.get_mut(obstacle)?;
        if tree.collided {
            return Ok(());
        }
        tree.collided = true;
        let damage = tree.impact_damage();
        log::debug!("player struck tree {} for {damage}", obstacle.get());
        out_events.push(Event::ObstacleStruck { obstacle });

        let opacity = self.overlay.show();
        out_events.push(Event::OverlayShown { opacity });

        self.damage_player(damage, DamageSource::Obstacle(obstacle), out_events)
    }

    fn release_obstacle(
        &mut self,
        obstacle: ObstacleId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        let tree = self.forest.get_mut(obstacle)?;
        if tree.collided {
            tree.collided = false;
            out_events.push(Event::ObstacleReleased { obstacle });
        }
        Ok(())
    }

    fn damage_player(
        &mut self,
        amount: f32,
        source: DamageSource,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        let health = self.store.get_mut::<Health>(self.player)?;
        let remaining = health.take(amount);
        let depleted = health.is_depleted();
        out_events.push(Event::PlayerDamaged {
            amount,
            remaining,
            source,
        });

        if depleted {
            log::info!("player health depleted");
            self.enter_state(GameState::Over, out_events);
        }
        Ok(())
    }

    fn move_enemy(
        &mut self,
        enemy: EntityId,
        to: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        if !self.pool.is_active(enemy) {
            return Err(RejectionReason::InactiveEnemy(enemy));
        }
        let position = self.store.get_mut::<Position>(enemy)?;
        let from = *position;
        *position = to;
        out_events.push(Event::EnemyMoved { enemy, from, to });
        Ok(())
    }

    fn set_state(
        &mut self,
        state: GameState,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        if self.state == GameState::Over {
            return Err(RejectionReason::GameOver);
        }
        self.enter_state(state, out_events);
        Ok(())
    }

    fn enter_state(&mut self, state: GameState, out_events: &mut Vec<Event>) {
        if self.state == state {
            return;
        }
        log::info!("game state {:?} -> {:?}", self.state, state);
        self.state = state;
        out_events.push(Event::GameStateChanged { state });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands the world cannot honour are reported through
/// [`Event::CommandRejected`] and leave the state untouched.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::Tick { dt } => {
            world.tick(dt, out_events);
            Ok(())
        }
        _ if world.state == GameState::Over => Err(RejectionReason::GameOver),
        Command::PlantForest { trees } => world.plant_forest(&trees, out_events),
        Command::MovePlayer { to } => world.move_player(to, out_events),
        Command::FacePlayer { radians } => world.face_player(radians, out_events),
        Command::StrikeObstacle { obstacle } => world.strike_obstacle(obstacle, out_events),
        Command::ReleaseObstacle { obstacle } => world.release_obstacle(obstacle, out_events),
        Command::DamagePlayer { amount, source } => {
            world.damage_player(amount, source, out_events)
        }
        Command::MoveEnemy { enemy, to } => world.move_enemy(enemy, to, out_events),
        Command::SpawnEnemy { spawn } => world
            .pool
            .acquire(&mut world.store, &spawn)
            .map(|(enemy, reused)| {
                out_events.push(Event::EnemySpawned {
                    enemy,
                    position: spawn.position,
                    reused,
                });
            })
            .map_err(RejectionReason::from),
        Command::ReleaseEnemy { enemy } => world
            .pool
            .release(enemy)
            .map(|()| out_events.push(Event::EnemyReleased { enemy }))
            .map_err(RejectionReason::from),
        Command::SetGameState { state } => world.set_state(state, out_events),
    };

    if let Err(reason) = outcome {
        log::warn!("command rejected: {reason:?}");
        out_events.push(Event::CommandRejected { reason });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use forest_survival_core::{
        ArenaConfig, Camera, Damage, EnemySnapshot, EnemyView, Facing, Flocking, GameState,
        Health, Obstacle, PlayerSnapshot, Position, Size, Spacing, Tint, Velocity, Viewport,
    };

    use super::{StoreError, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports the lifecycle state of the session.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Provides the bounds of the playable area.
    #[must_use]
    pub fn arena(world: &World) -> &ArenaConfig {
        &world.arena
    }

    /// Provides the dimensions of the drawing surface.
    #[must_use]
    pub fn viewport(world: &World) -> Viewport {
        world.viewport
    }

    /// Total host time advanced through ticks.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Provides read-only access to the planted trees in planting order.
    #[must_use]
    pub fn obstacles(world: &World) -> &[Obstacle] {
        world.forest.as_slice()
    }

    /// Opacity of the damage overlay; zero while hidden.
    #[must_use]
    pub fn overlay_opacity(world: &World) -> f32 {
        world.overlay.opacity()
    }

    /// Captures the player's components.
    pub fn player(world: &World) -> Result<PlayerSnapshot, StoreError> {
        let id = world.player;
        Ok(PlayerSnapshot {
            id,
            position: world.store.get::<Position>(id)?,
            size: world.store.get::<Size>(id)?,
            speed: world.store.get::<Velocity>(id)?.speed,
            health: world.store.get::<Health>(id)?.value,
            facing: world.store.get::<Facing>(id)?.radians,
        })
    }

    /// Camera that centres the player in the viewport.
    pub fn camera(world: &World) -> Result<Camera, StoreError> {
        let player = player(world)?;
        Ok(Camera::follow(player.footprint(), world.viewport))
    }

    /// Captures a read-only view of every pooled enemy.
    pub fn enemy_view(world: &World) -> Result<EnemyView, StoreError> {
        let store = &world.store;
        let snapshots = world
            .pool
            .iter()
            .map(|(id, active)| {
                Ok(EnemySnapshot {
                    id,
                    active,
                    position: store.get::<Position>(id)?,
                    size: store.get::<Size>(id)?,
                    speed: store.get::<Velocity>(id)?.speed,
                    damage: store.get::<Damage>(id)?.value,
                    tint: store.get::<Tint>(id)?,
                    spacing: store
                        .has::<Spacing>(id)
                        .then(|| store.get::<Spacing>(id))
                        .transpose()?,
                    flocking: store
                        .has::<Flocking>(id)
                        .then(|| store.get::<Flocking>(id))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        Ok(EnemyView::from_snapshots(snapshots))
    }
}
