//! Obstacle field planted once at startup.

use forest_survival_core::{Obstacle, ObstacleId, RejectionReason, TreeSeed};

#[derive(Debug, Default)]
pub(crate) struct ObstacleField {
    obstacles: Vec<Obstacle>,
    planted: bool,
}

impl ObstacleField {
    /// Plants the trees with ascending identifiers. Membership is fixed afterwards.
    pub(crate) fn plant(&mut self, trees: &[TreeSeed]) -> Result<usize, RejectionReason> {
        if self.planted {
            return Err(RejectionReason::ForestAlreadyPlanted);
        }
        self.obstacles = trees
            .iter()
            .enumerate()
            .map(|(index, seed)| Obstacle {
                id: ObstacleId::new(index as u32),
                position: seed.position,
                size: seed.size,
                shade: seed.shade,
                collided: false,
            })
            .collect();
        self.planted = true;
        Ok(self.obstacles.len())
    }

    pub(crate) fn get_mut(&mut self, id: ObstacleId) -> Result<&mut Obstacle, RejectionReason> {
        self.obstacles
            .get_mut(id.get() as usize)
            .ok_or(RejectionReason::UnknownObstacle(id))
    }

    pub(crate) fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }
}
