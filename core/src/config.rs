//! Tunable parameters for a game session.
//!
//! Every section implements [`Default`] with the standard game values, so a
//! partial TOML file only needs to name what it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Flocking, Position, Size, Viewport};

/// Complete configuration for a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playable area and its fence.
    pub arena: ArenaConfig,
    /// Player start and movement.
    pub player: PlayerConfig,
    /// Obstacle field generation.
    pub forest: ForestConfig,
    /// Template for spawned enemies.
    pub enemy: EnemyConfig,
    /// Batch spawner cadence.
    pub spawner: SpawnerConfig,
    /// Damage overlay timing.
    pub overlay: OverlayConfig,
    /// How tentative player moves are resolved against the arena edges.
    pub movement: MovementPolicy,
    /// Which components the enemy pool refreshes when reusing a slot.
    pub pool: PoolResetPolicy,
    /// Drawing surface the camera centres the player in.
    pub viewport: Viewport,
}

impl GameConfig {
    /// Rejects configurations the simulation cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_finite()?;
        if self.arena.width <= 0.0 || self.arena.height <= 0.0 {
            return Err(ConfigError::EmptyArena {
                width: self.arena.width,
                height: self.arena.height,
            });
        }
        if self.player.size <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "player.size",
                value: self.player.size,
            });
        }
        if self.enemy.size <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "enemy.size",
                value: self.enemy.size,
            });
        }
        if self.forest.tree_spacing <= 0.0 || self.forest.density_factor <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "forest.tree_spacing",
                value: self.forest.tree_spacing * self.forest.density_factor,
            });
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "viewport",
                value: self.viewport.width.min(self.viewport.height),
            });
        }
        let per_axis = self.forest.candidates_per_axis();
        if per_axis > ForestConfig::MAX_CANDIDATES_PER_AXIS as f32 {
            return Err(ConfigError::DenseForest {
                per_axis,
                limit: ForestConfig::MAX_CANDIDATES_PER_AXIS,
            });
        }
        if self.forest.min_tree_size > self.forest.max_tree_size {
            return Err(ConfigError::InvertedRange {
                field: "forest tree size",
                low: self.forest.min_tree_size,
                high: self.forest.max_tree_size,
            });
        }
        if self.spawner.min_batch > self.spawner.max_batch {
            return Err(ConfigError::InvertedRange {
                field: "spawner batch",
                low: self.spawner.min_batch,
                high: self.spawner.max_batch,
            });
        }
        if self.spawner.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    fn check_finite(&self) -> Result<(), ConfigError> {
        let flocking = self.enemy.flocking;
        let fields = [
            ("arena.width", self.arena.width),
            ("arena.height", self.arena.height),
            ("arena.fence_thickness", self.arena.fence_thickness),
            ("player.start.x", self.player.start.x),
            ("player.start.y", self.player.start.y),
            ("player.size", self.player.size),
            ("player.speed", self.player.speed),
            ("player.health", self.player.health),
            ("forest.map_size", self.forest.map_size),
            ("forest.tree_spacing", self.forest.tree_spacing),
            ("forest.density_factor", self.forest.density_factor),
            ("forest.safe_distance", self.forest.safe_distance),
            ("enemy.size", self.enemy.size),
            ("enemy.speed", self.enemy.speed),
            ("enemy.damage", self.enemy.damage),
            ("enemy.spacing", self.enemy.spacing),
            ("enemy.flocking.separation_weight", flocking.separation_weight),
            ("enemy.flocking.alignment_weight", flocking.alignment_weight),
            ("enemy.flocking.cohesion_weight", flocking.cohesion_weight),
            ("enemy.flocking.perception_radius", flocking.perception_radius),
            ("overlay.opacity", self.overlay.opacity),
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
        ];
        if let Some((field, value)) = fields.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFinite {
                field,
                value: f64::from(value),
            });
        }
        if !self.forest.acceptance_probability.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "forest.acceptance_probability",
                value: self.forest.acceptance_probability,
            });
        }
        Ok(())
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The arena has no area.
    #[error("arena must have a positive area (received {width}x{height})")]
    EmptyArena {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// A dimension that must be positive is not.
    #[error("{field} must be positive (received {value})")]
    NonPositive {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A range has its bounds swapped.
    #[error("{field} range is inverted ({low} > {high})")]
    InvertedRange {
        /// Name of the offending range.
        field: &'static str,
        /// Configured lower bound.
        low: u32,
        /// Configured upper bound.
        high: u32,
    },
    /// The spawner would fire infinitely often.
    #[error("spawner interval must be non-zero")]
    ZeroInterval,
    /// A numeric field is NaN or infinite.
    #[error("{field} must be finite (received {value})")]
    NonFinite {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f64,
    },
    /// The forest grid would scan too many candidates along one axis.
    #[error("forest grid has {per_axis} candidates per axis, more than {limit}")]
    DenseForest {
        /// `map_size / step` for the configured forest.
        per_axis: f32,
        /// Largest accepted count.
        limit: u32,
    },
}

/// Bounds of the playable area, anchored at the world origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Horizontal extent in world units.
    pub width: f32,
    /// Vertical extent in world units.
    pub height: f32,
    /// Thickness of the fence drawn along every edge.
    pub fence_thickness: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            fence_thickness: 4.0,
        }
    }
}

/// Player start conditions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Top-left corner of the player's footprint at start.
    pub start: Position,
    /// Side of the square footprint.
    pub size: f32,
    /// Distance moved per frame along each held axis.
    pub speed: f32,
    /// Starting hit points.
    pub health: f32,
}

impl PlayerConfig {
    /// Square footprint of the player.
    #[must_use]
    pub const fn footprint(&self) -> Size {
        Size::square(self.size)
    }

    /// Centre of the player's footprint at start.
    #[must_use]
    pub fn start_center(&self) -> Position {
        self.start.offset(self.size * 0.5, self.size * 0.5)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Position::new(385.0, 285.0),
            size: 30.0,
            speed: 2.0,
            health: 100.0,
        }
    }
}

/// Obstacle field generation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Extent of the square area scanned for candidates.
    pub map_size: f32,
    /// Smallest tree side, inclusive.
    pub min_tree_size: u32,
    /// Largest tree side, inclusive.
    pub max_tree_size: u32,
    /// Base distance between grid candidates.
    pub tree_spacing: f32,
    /// Multiplier applied to `tree_spacing` to obtain the scan step.
    pub density_factor: f32,
    /// Scan `[-map_size/2, map_size/2)` instead of `[0, map_size)`.
    pub centered: bool,
    /// Candidates at or within this distance of a reference point are rejected.
    pub safe_distance: f32,
    /// Probability that an eligible candidate becomes a tree.
    pub acceptance_probability: f64,
}

impl ForestConfig {
    /// Upper bound on grid candidates scanned along either axis.
    pub const MAX_CANDIDATES_PER_AXIS: u32 = 4_096;

    /// Distance between neighbouring grid candidates.
    #[must_use]
    pub fn step(&self) -> f32 {
        self.tree_spacing * self.density_factor
    }

    /// Number of grid candidates along one axis, `map_size / step`.
    #[must_use]
    pub fn candidates_per_axis(&self) -> f32 {
        self.map_size / self.step()
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            map_size: 1000.0,
            min_tree_size: 30,
            max_tree_size: 60,
            tree_spacing: 40.0,
            density_factor: 1.0,
            centered: false,
            safe_distance: 100.0,
            acceptance_probability: 0.5,
        }
    }
}

/// Template applied to enemies created by the spawner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Side of the square footprint.
    pub size: f32,
    /// Pursuit speed per frame.
    pub speed: f32,
    /// Health removed from the player per frame of contact.
    pub damage: f32,
    /// Extra gap demanded from neighbours at spawn time.
    pub spacing: f32,
    /// Steering weights.
    pub flocking: Flocking,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            speed: 1.5,
            damage: 0.5,
            spacing: 5.0,
            flocking: Flocking::default(),
        }
    }
}

/// Cadence of the batch spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Time between batches in milliseconds.
    pub interval_ms: u64,
    /// Spawning stops for good once this much time has elapsed.
    pub window_ms: u64,
    /// Smallest batch, inclusive.
    pub min_batch: u32,
    /// Largest batch, inclusive.
    pub max_batch: u32,
    /// Re-rolls allowed per enemy before it is skipped.
    pub max_placement_attempts: u32,
}

impl SpawnerConfig {
    /// Time between batches.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Time after which spawning stops permanently.
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3_000,
            window_ms: 30_000,
            min_batch: 10,
            max_batch: 20,
            max_placement_attempts: 64,
        }
    }
}

/// Red flash shown when the player strikes a tree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Opacity of the flash while visible.
    pub opacity: f32,
    /// How long the flash stays visible, in milliseconds.
    pub duration_ms: u64,
}

impl OverlayConfig {
    /// How long the flash stays visible.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            opacity: 0.3,
            duration_ms: 500,
        }
    }
}

/// Resolution applied to a tentative player move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPolicy {
    /// Accept each axis independently if the footprint stays inside the arena.
    #[default]
    AxisClamp,
    /// Roll the whole move back if the footprint enters the fence band.
    FenceRollback,
}

/// Components refreshed when the enemy pool reuses an inactive slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolResetPolicy {
    /// Overwrite only the position; every other component keeps its old value.
    #[default]
    PositionOnly,
    /// Overwrite every spawn component.
    Full,
}
