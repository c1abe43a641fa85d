#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Time-gated spawning system responsible for emitting enemy batches.

use std::time::Duration;

use forest_survival_core::{
    ArenaConfig, Command, Damage, EnemyConfig, EnemySpawn, EnemyView, Event, Position,
    RandomSource, Size, Spacing, SpawnerConfig, Tint, Velocity,
};

const ENEMY_TINTS: [Tint; 4] = [
    Tint::from_rgb(0x8b, 0x00, 0x00),
    Tint::from_rgb(0xb2, 0x22, 0x22),
    Tint::from_rgb(0x80, 0x00, 0x80),
    Tint::from_rgb(0x4b, 0x00, 0x82),
];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawner: SpawnerConfig,
    enemy: EnemyConfig,
    arena: ArenaConfig,
}

impl Config {
    /// Creates a new configuration from the spawner cadence, enemy template and arena.
    #[must_use]
    pub const fn new(spawner: SpawnerConfig, enemy: EnemyConfig, arena: ArenaConfig) -> Self {
        Self {
            spawner,
            enemy,
            arena,
        }
    }
}

/// Pure system that emits enemy batches at arena edges on a fixed cadence.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    elapsed: Duration,
    next_boundary: Duration,
    batches_fired: u32,
    finished: bool,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let interval = config.spawner.interval();
        Self {
            config,
            elapsed: Duration::ZERO,
            next_boundary: interval,
            batches_fired: 0,
            finished: interval.is_zero(),
        }
    }

    /// Consumes time events and the current enemies to emit spawn commands.
    pub fn handle<R>(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        random: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        if self.finished {
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.elapsed = self.elapsed.saturating_add(*dt);
            }
        }

        let batches = self.resolve_batches();
        let mut placed = Vec::new();
        for _ in 0..batches {
            self.spawn_batch(enemies, &mut placed, random, out);
        }
    }

    /// Number of batches emitted so far.
    #[must_use]
    pub const fn batches_fired(&self) -> u32 {
        self.batches_fired
    }

    /// Reports whether the spawn window has closed for good.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    fn resolve_batches(&mut self) -> u32 {
        let interval = self.config.spawner.interval();
        let window = self.config.spawner.window();

        let mut batches = 0;
        while !self.finished && self.elapsed >= self.next_boundary {
            if self.next_boundary >= window {
                self.finished = true;
                log::info!(
                    "spawn window closed after {} batches",
                    self.batches_fired + batches
                );
                break;
            }
            batches += 1;
            self.next_boundary = self.next_boundary.saturating_add(interval);
        }
        batches
    }

    /// Appends one batch to `out`. `placed` holds picks not yet visible in `enemies`.
    fn spawn_batch<R>(
        &mut self,
        enemies: &EnemyView,
        placed: &mut Vec<Position>,
        random: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        let SpawnerConfig {
            min_batch,
            max_batch,
            max_placement_attempts,
            ..
        } = self.config.spawner;
        let enemy = self.config.enemy;
        let arena = self.config.arena;

        let count = random.int_inclusive(min_batch, max_batch);
        let x = if random.chance(0.5) {
            0.0
        } else {
            arena.width - enemy.size
        };
        let gap = enemy.size + enemy.spacing;

        let mut spawned = 0_u32;
        let mut skipped = 0_u32;
        for _ in 0..count {
            let candidate = (0..max_placement_attempts.max(1))
                .map(|_| Position::new(x, random.uniform(0.0, arena.height - enemy.size)))
                .find(|candidate| {
                    let occupied = enemies
                        .active()
                        .filter(|other| other.spacing.is_some())
                        .map(|other| other.position);
                    !occupied
                        .chain(placed.iter().copied())
                        .any(|other| conflicts(*candidate, other, gap))
                });

            let Some(position) = candidate else {
                skipped += 1;
                continue;
            };
            placed.push(position);
            spawned += 1;

            let tint = ENEMY_TINTS[random.index(ENEMY_TINTS.len())];
            out.push(Command::SpawnEnemy {
                spawn: EnemySpawn {
                    position,
                    size: Size::square(enemy.size),
                    velocity: Velocity { speed: enemy.speed },
                    tint,
                    damage: Damage {
                        value: enemy.damage,
                    },
                    spacing: Spacing {
                        value: enemy.spacing,
                    },
                    flocking: enemy.flocking,
                },
            });
        }

        self.batches_fired += 1;
        log::debug!(
            "batch {} spawned {spawned} enemies at x = {x}",
            self.batches_fired
        );
        if skipped > 0 {
            log::warn!("could not place {skipped} enemies in batch {}", self.batches_fired);
        }
    }
}

/// Axis-wise spacing test: both axes must be closer than `gap` to conflict.
fn conflicts(candidate: Position, other: Position, gap: f32) -> bool {
    (candidate.x - other.x).abs() < gap && (candidate.y - other.y).abs() < gap
}
