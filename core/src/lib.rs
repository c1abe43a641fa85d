#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Forest Survival engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! to react to deterministically. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

mod components;
mod config;
mod random;
mod spatial;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use components::{
    Component, ComponentKind, Damage, Facing, Flocking, Health, Position, Size, Spacing, Tint,
    Velocity,
};
pub use config::{
    ArenaConfig, ConfigError, EnemyConfig, ForestConfig, GameConfig, MovementPolicy,
    OverlayConfig, PlayerConfig, PoolResetPolicy, SpawnerConfig,
};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use spatial::{heading_between, Camera, Rect, ScreenPoint, Viewport};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Forest Survival.";

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Simulation steps run every frame.
    #[default]
    Running,
    /// Frame steps are suspended until the pause toggle is pressed again.
    Paused,
    /// Health ran out; no further steps run.
    Over,
}

/// Unique identifier assigned to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Shades of green trees are painted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeShade {
    /// `#228B22`.
    ForestGreen,
    /// `#008000`.
    Green,
    /// `#006400`.
    DarkGreen,
    /// `#32CD32`.
    LimeGreen,
    /// `#3CB371`.
    MediumSeaGreen,
    /// `#2E8B57`.
    SeaGreen,
}

impl TreeShade {
    /// Palette in the order random picks index into.
    pub const PALETTE: [TreeShade; 6] = [
        Self::ForestGreen,
        Self::Green,
        Self::DarkGreen,
        Self::LimeGreen,
        Self::MediumSeaGreen,
        Self::SeaGreen,
    ];

    /// Byte RGB value of the shade.
    #[must_use]
    pub const fn tint(self) -> Tint {
        match self {
            Self::ForestGreen => Tint::from_rgb(0x22, 0x8b, 0x22),
            Self::Green => Tint::from_rgb(0x00, 0x80, 0x00),
            Self::DarkGreen => Tint::from_rgb(0x00, 0x64, 0x00),
            Self::LimeGreen => Tint::from_rgb(0x32, 0xcd, 0x32),
            Self::MediumSeaGreen => Tint::from_rgb(0x3c, 0xb3, 0x71),
            Self::SeaGreen => Tint::from_rgb(0x2e, 0x8b, 0x57),
        }
    }
}

/// Tree accepted by the generator but not yet planted in the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeSeed {
    /// Top-left corner of the tree's square footprint.
    pub position: Position,
    /// Side of the square footprint.
    pub size: f32,
    /// Fill colour.
    pub shade: TreeShade,
}

/// Static obstacle planted in the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Identifier assigned in planting order.
    pub id: ObstacleId,
    /// Top-left corner of the square footprint.
    pub position: Position,
    /// Side of the square footprint.
    pub size: f32,
    /// Fill colour.
    pub shade: TreeShade,
    /// Latch set while the player is in contact, cleared on separation.
    pub collided: bool,
}

impl Obstacle {
    /// World-space footprint of the obstacle.
    #[must_use]
    pub fn footprint(&self) -> Rect {
        Rect::from_footprint(self.position, Size::square(self.size))
    }

    /// Health removed from the player when contact begins.
    #[must_use]
    pub fn impact_damage(&self) -> f32 {
        self.size / 10.0
    }
}

/// Full component set for a freshly spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Top-left corner of the footprint.
    pub position: Position,
    /// Footprint.
    pub size: Size,
    /// Pursuit speed.
    pub velocity: Velocity,
    /// Fill colour.
    pub tint: Tint,
    /// Contact damage per frame.
    pub damage: Damage,
    /// Spawn-time separation.
    pub spacing: Spacing,
    /// Steering weights.
    pub flocking: Flocking,
}

/// What removed health from the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Contact with a tree began.
    Obstacle(ObstacleId),
    /// An enemy overlapped the player during a frame.
    Enemy(EntityId),
}

/// Reasons the world refuses a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The entity does not exist.
    UnknownEntity(EntityId),
    /// The entity lacks a component the command requires.
    MissingComponent {
        /// Entity targeted by the command.
        entity: EntityId,
        /// Component that was expected.
        kind: ComponentKind,
    },
    /// The obstacle does not exist.
    UnknownObstacle(ObstacleId),
    /// The enemy is not currently active.
    InactiveEnemy(EntityId),
    /// The forest was already planted; membership is immutable.
    ForestAlreadyPlanted,
    /// The session is over; gameplay mutations are refused.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Plants the generated obstacle field. Accepted once per world.
    PlantForest {
        /// Trees in generation order.
        trees: Vec<TreeSeed>,
    },
    /// Advances the host clock by the provided delta time.
    Tick {
        /// Duration that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves the player to a resolved position.
    MovePlayer {
        /// Destination of the player's footprint.
        to: Position,
    },
    /// Turns the player to face the pointer.
    FacePlayer {
        /// Heading in radians.
        radians: f32,
    },
    /// Registers the start of contact between the player and a tree.
    StrikeObstacle {
        /// Tree the player ran into.
        obstacle: ObstacleId,
    },
    /// Clears a tree's contact latch after the player separated from it.
    ReleaseObstacle {
        /// Tree the player left.
        obstacle: ObstacleId,
    },
    /// Removes health from the player.
    DamagePlayer {
        /// Hit points to remove.
        amount: f32,
        /// Cause of the damage.
        source: DamageSource,
    },
    /// Places a steered enemy at its new position.
    MoveEnemy {
        /// Enemy to move.
        enemy: EntityId,
        /// Destination of the enemy's footprint.
        to: Position,
    },
    /// Asks the pool for an enemy at the provided spawn.
    SpawnEnemy {
        /// Components for the enemy.
        spawn: EnemySpawn,
    },
    /// Returns an enemy to the pool.
    ReleaseEnemy {
        /// Enemy to deactivate.
        enemy: EntityId,
    },
    /// Requests a lifecycle transition.
    SetGameState {
        /// State to enter.
        state: GameState,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the host clock advanced.
    TimeAdvanced {
        /// Duration that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the obstacle field was planted.
    ForestPlanted {
        /// Number of trees planted.
        count: usize,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: Position,
        /// Position after the move.
        to: Position,
    },
    /// Confirms that the player's heading changed.
    PlayerTurned {
        /// New heading in radians.
        radians: f32,
    },
    /// Announces that the player struck a tree and latched it.
    ObstacleStruck {
        /// Tree that was struck.
        obstacle: ObstacleId,
    },
    /// Announces that a tree's latch was cleared.
    ObstacleReleased {
        /// Tree that was released.
        obstacle: ObstacleId,
    },
    /// Reports that the player lost health.
    PlayerDamaged {
        /// Hit points removed.
        amount: f32,
        /// Hit points left after the damage.
        remaining: f32,
        /// Cause of the damage.
        source: DamageSource,
    },
    /// Confirms that an enemy was activated by the pool.
    EnemySpawned {
        /// Identifier of the enemy.
        enemy: EntityId,
        /// Position the enemy occupies.
        position: Position,
        /// Whether an inactive slot was reused.
        reused: bool,
    },
    /// Confirms that a steered enemy moved.
    EnemyMoved {
        /// Identifier of the enemy.
        enemy: EntityId,
        /// Position before the move.
        from: Position,
        /// Position after the move.
        to: Position,
    },
    /// Confirms that an enemy returned to the pool.
    EnemyReleased {
        /// Identifier of the enemy.
        enemy: EntityId,
    },
    /// The damage overlay became visible.
    OverlayShown {
        /// Opacity of the overlay.
        opacity: f32,
    },
    /// The damage overlay timer expired.
    OverlayCleared,
    /// The session entered a new lifecycle state.
    GameStateChanged {
        /// State that became active.
        state: GameState,
    },
    /// Reports that a command was refused.
    CommandRejected {
        /// Specific reason the command failed.
        reason: RejectionReason,
    },
}

/// Directional keys and pointer observed for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    /// Up (`W` or arrow) is held.
    pub up: bool,
    /// Left (`A` or arrow) is held.
    pub left: bool,
    /// Down (`S` or arrow) is held.
    pub down: bool,
    /// Right (`D` or arrow) is held.
    pub right: bool,
    /// The pause key was pressed on this frame.
    pub pause_toggle: bool,
    /// Pointer location on the drawing surface, if known.
    pub pointer: Option<ScreenPoint>,
}

impl InputState {
    /// Reports whether any directional key is held.
    #[must_use]
    pub const fn any_direction(&self) -> bool {
        self.up || self.left || self.down || self.right
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Identifier of the player entity.
    pub id: EntityId,
    /// Top-left corner of the footprint.
    pub position: Position,
    /// Footprint.
    pub size: Size,
    /// Movement speed.
    pub speed: f32,
    /// Remaining hit points.
    pub health: f32,
    /// Heading in radians.
    pub facing: f32,
}

impl PlayerSnapshot {
    /// World-space footprint.
    #[must_use]
    pub fn footprint(&self) -> Rect {
        Rect::from_footprint(self.position, self.size)
    }
}

/// Immutable representation of a pooled enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EntityId,
    /// Whether the pool currently lends the slot out.
    pub active: bool,
    /// Top-left corner of the footprint.
    pub position: Position,
    /// Footprint.
    pub size: Size,
    /// Pursuit speed.
    pub speed: f32,
    /// Contact damage per frame.
    pub damage: f32,
    /// Fill colour.
    pub tint: Tint,
    /// Spawn-time separation, when the enemy carries one.
    pub spacing: Option<Spacing>,
    /// Steering weights, when the enemy flocks.
    pub flocking: Option<Flocking>,
}

impl EnemySnapshot {
    /// World-space footprint.
    #[must_use]
    pub fn footprint(&self) -> Rect {
        Rect::from_footprint(self.position, self.size)
    }
}

/// Read-only snapshot describing every pooled enemy.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over every pooled enemy in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the enemies currently lent out by the pool.
    pub fn active(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.active)
    }

    /// Number of pooled enemies, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tree_seed_round_trips_through_bincode() {
        assert_round_trip(&TreeSeed {
            position: Position::new(120.0, 40.0),
            size: 42.0,
            shade: TreeShade::SeaGreen,
        });
    }

    #[test]
    fn rejection_reason_round_trips_through_bincode() {
        assert_round_trip(&RejectionReason::MissingComponent {
            entity: EntityId::new(3),
            kind: ComponentKind::Flocking,
        });
    }

    #[test]
    fn obstacle_impact_is_a_tenth_of_its_size() {
        let obstacle = Obstacle {
            id: ObstacleId::new(0),
            position: Position::default(),
            size: 45.0,
            shade: TreeShade::Green,
            collided: false,
        };
        assert!((obstacle.impact_damage() - 4.5).abs() < f32::EPSILON);
    }

    #[test]
    fn palette_tints_are_distinct() {
        let mut tints: Vec<Tint> = TreeShade::PALETTE.iter().map(|shade| shade.tint()).collect();
        tints.sort_by_key(|tint| (tint.red(), tint.green(), tint.blue()));
        tints.dedup();
        assert_eq!(tints.len(), TreeShade::PALETTE.len());
    }

    #[test]
    fn enemy_view_orders_snapshots_and_filters_active() {
        let template = EnemySnapshot {
            id: EntityId::new(5),
            active: true,
            position: Position::default(),
            size: Size::square(20.0),
            speed: 1.0,
            damage: 1.0,
            tint: Tint::from_rgb(0, 0, 0),
            spacing: None,
            flocking: None,
        };
        let view = EnemyView::from_snapshots(vec![
            template,
            EnemySnapshot {
                id: EntityId::new(2),
                active: false,
                ..template
            },
        ]);

        let ids: Vec<u32> = view.iter().map(|enemy| enemy.id.get()).collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(view.active().count(), 1);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn any_direction_reflects_held_keys() {
        assert!(!InputState::default().any_direction());
        assert!(InputState {
            left: true,
            ..InputState::default()
        }
        .any_direction());
    }
}
