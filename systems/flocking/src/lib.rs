#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flocking steering for pursuing enemies.
//!
//! Every active enemy carrying steering weights blends separation, alignment
//! and cohesion with its neighbours into a pursuit of the player. All enemies
//! read the same snapshot, so the result does not depend on update order.
//! Enemies that end the step overlapping the player damage it on every frame.

use forest_survival_core::{
    Command, DamageSource, EnemySnapshot, EnemyView, PlayerSnapshot, Position, Rect,
};
use glam::Vec2;

/// Pure system that steers flocking enemies towards the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct Steering;

impl Steering {
    /// Creates the steering system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits a move for every steered enemy and damage for every enemy touching the player.
    pub fn handle(&self, enemies: &EnemyView, player: &PlayerSnapshot, out: &mut Vec<Command>) {
        let target = player.footprint().center();
        let player_box = player.footprint();
        let mut contacts = 0_usize;

        for enemy in enemies.active().filter(|enemy| enemy.flocking.is_some()) {
            let step = self.displacement(enemy, enemies, target);
            let moved = enemy.position.offset(step.x, step.y);
            if moved != enemy.position {
                out.push(Command::MoveEnemy {
                    enemy: enemy.id,
                    to: moved,
                });
            }

            if Rect::from_footprint(moved, enemy.size).overlaps(&player_box) {
                contacts += 1;
                out.push(Command::DamagePlayer {
                    amount: enemy.damage,
                    source: DamageSource::Enemy(enemy.id),
                });
            }
        }

        if contacts > 0 {
            log::trace!("{contacts} enemies touching the player");
        }
    }

    /// Displacement the enemy applies this frame, or zero when it does not flock.
    #[must_use]
    pub fn displacement(
        &self,
        enemy: &EnemySnapshot,
        enemies: &EnemyView,
        target: Position,
    ) -> Vec2 {
        let Some(weights) = enemy.flocking else {
            return Vec2::ZERO;
        };
        let center = center_of(enemy);

        let mut separation = Vec2::ZERO;
        let mut alignment = Vec2::ZERO;
        let mut cohesion = Vec2::ZERO;
        let mut neighbours = 0_u32;

        for other in enemies
            .active()
            .filter(|other| other.id != enemy.id && other.flocking.is_some())
        {
            let other_center = center_of(other);
            if center.distance(other_center) >= weights.perception_radius {
                continue;
            }
            separation += (center - other_center).normalize_or_zero();
            alignment += Vec2::splat(other.speed);
            cohesion += other_center;
            neighbours += 1;
        }

        if neighbours > 0 {
            let count = neighbours as f32;
            separation /= count;
            alignment /= count;
            cohesion = (cohesion / count - center) * weights.cohesion_weight;
        }

        let pursuit = (Vec2::new(target.x, target.y) - center).normalize_or_zero() * enemy.speed;

        pursuit
            + separation * weights.separation_weight
            + alignment * weights.alignment_weight
            + cohesion
    }
}

fn center_of(enemy: &EnemySnapshot) -> Vec2 {
    let center = enemy.footprint().center();
    Vec2::new(center.x, center.y)
}
