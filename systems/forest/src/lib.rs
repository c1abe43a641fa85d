#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural obstacle field generation.
//!
//! Candidates are laid out on a regular grid. Each candidate draws its size,
//! then its shade, then a coin flip, and is kept only when the flip succeeds
//! and it lies far enough from both reference points.

use forest_survival_core::{
    Command, ForestConfig, Position, RandomSource, TreeSeed, TreeShade,
};

/// Pure system that scatters trees over the arena.
#[derive(Clone, Copy, Debug)]
pub struct ForestGenerator {
    config: ForestConfig,
}

impl ForestGenerator {
    /// Creates a generator for the provided configuration.
    #[must_use]
    pub const fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Produces the accepted trees in scan order, x outer and y inner.
    ///
    /// `origin` is the player's spawn point and `current` the point the player
    /// occupies when the field is generated.
    pub fn generate<R>(&self, origin: Position, current: Position, random: &mut R) -> Vec<TreeSeed>
    where
        R: RandomSource + ?Sized,
    {
        let step = self.config.step();
        if step.is_nan() || step <= 0.0 {
            log::warn!("forest step {step} is not positive; generating an empty field");
            return Vec::new();
        }
        let per_axis = self.config.candidates_per_axis();
        if per_axis.is_nan() || per_axis > ForestConfig::MAX_CANDIDATES_PER_AXIS as f32 {
            log::warn!(
                "forest of {} at step {step} exceeds the candidate limit; generating an empty field",
                self.config.map_size
            );
            return Vec::new();
        }

        let (start, end) = if self.config.centered {
            let half = self.config.map_size * 0.5;
            (-half, half)
        } else {
            (0.0, self.config.map_size)
        };

        let mut trees = Vec::new();
        let mut column = 0_u32;
        loop {
            let x = start + step * column as f32;
            if x >= end {
                break;
            }
            let mut row = 0_u32;
            loop {
                let y = start + step * row as f32;
                if y >= end {
                    break;
                }
                if let Some(tree) = self.candidate(Position::new(x, y), origin, current, random) {
                    trees.push(tree);
                }
                row += 1;
            }
            column += 1;
        }

        log::debug!("generated {} trees", trees.len());
        trees
    }

    /// Generates the field and queues the command that plants it.
    pub fn plant<R>(
        &self,
        origin: Position,
        current: Position,
        random: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        let trees = self.generate(origin, current, random);
        out.push(Command::PlantForest { trees });
    }

    fn candidate<R>(
        &self,
        position: Position,
        origin: Position,
        current: Position,
        random: &mut R,
    ) -> Option<TreeSeed>
    where
        R: RandomSource + ?Sized,
    {
        let size = random.int_inclusive(self.config.min_tree_size, self.config.max_tree_size);
        let shade = TreeShade::PALETTE[random.index(TreeShade::PALETTE.len())];
        let accepted = random.chance(self.config.acceptance_probability);

        let safe = self.config.safe_distance;
        if accepted && position.distance_to(origin) > safe && position.distance_to(current) > safe
        {
            Some(TreeSeed {
                position,
                size: size as f32,
                shade,
            })
        } else {
            None
        }
    }
}
