//! Enemy pool that recycles inactive entities instead of allocating new ones.

use forest_survival_core::{
    Component, Damage, EnemySpawn, EntityId, Flocking, PoolResetPolicy, RejectionReason,
    Spacing, Tint, Velocity,
};
use thiserror::Error;

use crate::store::{EntityStore, StoreError};

/// Failures raised when returning an enemy to the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The entity was never lent out by the pool.
    #[error("entity {} is not pooled", .0.get())]
    NotPooled(EntityId),
    /// The entity is already waiting for reuse.
    #[error("entity {} is already inactive", .0.get())]
    AlreadyInactive(EntityId),
}

impl From<PoolError> for RejectionReason {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::NotPooled(entity) => RejectionReason::UnknownEntity(entity),
            PoolError::AlreadyInactive(entity) => RejectionReason::InactiveEnemy(entity),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    entity: EntityId,
    active: bool,
}

/// Growing list of pooled enemies in allocation order.
#[derive(Debug)]
pub(crate) struct EnemyPool {
    slots: Vec<Slot>,
    policy: PoolResetPolicy,
}

impl EnemyPool {
    pub(crate) fn new(policy: PoolResetPolicy) -> Self {
        Self {
            slots: Vec::new(),
            policy,
        }
    }

    /// Lends out an enemy placed at `spawn.position`.
    ///
    /// Returns the entity and whether an inactive slot was reused.
    pub(crate) fn acquire(
        &mut self,
        store: &mut EntityStore,
        spawn: &EnemySpawn,
    ) -> Result<(EntityId, bool), StoreError> {
        if let Some(slot) = self.slots.iter_mut().find(|slot| !slot.active) {
            match self.policy {
                PoolResetPolicy::PositionOnly => {
                    store.insert(slot.entity, Component::Position(spawn.position))?;
                }
                PoolResetPolicy::Full => {
                    for component in bundle(spawn) {
                        store.insert(slot.entity, component)?;
                    }
                }
            }
            slot.active = true;
            return Ok((slot.entity, true));
        }

        let entity = store.spawn_with(&bundle(spawn));
        self.slots.push(Slot {
            entity,
            active: true,
        });
        Ok((entity, false))
    }

    /// Marks an active enemy as available for reuse.
    pub(crate) fn release(&mut self, entity: EntityId) -> Result<(), PoolError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.entity == entity)
            .ok_or(PoolError::NotPooled(entity))?;
        if !slot.active {
            return Err(PoolError::AlreadyInactive(entity));
        }
        slot.active = false;
        Ok(())
    }

    /// Reports whether the entity is pooled and currently lent out.
    pub(crate) fn is_active(&self, entity: EntityId) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.entity == entity && slot.active)
    }

    /// Iterates pooled entities with their activity flag in allocation order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (EntityId, bool)> + '_ {
        self.slots.iter().map(|slot| (slot.entity, slot.active))
    }
}

fn bundle(spawn: &EnemySpawn) -> [Component; 7] {
    let EnemySpawn {
        position,
        size,
        velocity,
        tint,
        damage,
        spacing,
        flocking,
    } = *spawn;
    [
        Component::Position(position),
        Component::Size(size),
        Component::Velocity(velocity),
        Component::Tint(tint),
        Component::Damage(damage),
        Component::Spacing(spacing),
        Component::Flocking(flocking),
    ]
}
