//! Typed component columns keyed by entity index.

use forest_survival_core::{
    Component, ComponentKind, Damage, EntityId, Facing, Flocking, Health, Position,
    RejectionReason, Size, Spacing, Tint, Velocity,
};
use thiserror::Error;

/// Failures raised when reading components from the entity store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The identifier was never allocated by this store.
    #[error("entity {} does not exist", .0.get())]
    UnknownEntity(EntityId),
    /// The entity exists but lacks a component the caller requires.
    #[error("entity {} has no {kind:?} component", .entity.get())]
    MissingComponent {
        /// Entity that was queried.
        entity: EntityId,
        /// Component that was expected.
        kind: ComponentKind,
    },
}

impl From<StoreError> for RejectionReason {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::UnknownEntity(entity) => RejectionReason::UnknownEntity(entity),
            StoreError::MissingComponent { entity, kind } => {
                RejectionReason::MissingComponent { entity, kind }
            }
        }
    }
}

/// Dense column holding at most one value per entity.
#[derive(Debug)]
pub(crate) struct Column<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for Column<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Column<T> {
    fn grow_to(&mut self, len: usize) {
        while self.slots.len() < len {
            self.slots.push(None);
        }
    }

    fn slot(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    fn set(&mut self, index: usize, value: T) {
        self.grow_to(index + 1);
        self.slots[index] = Some(value);
    }
}

/// Component record that owns a column in the store.
pub(crate) trait Stored: Copy {
    /// Kind reported when the component is missing.
    const KIND: ComponentKind;

    fn column(store: &EntityStore) -> &Column<Self>;

    fn column_mut(store: &mut EntityStore) -> &mut Column<Self>;
}

macro_rules! stored {
    ($record:ty, $kind:ident, $field:ident) => {
        impl Stored for $record {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn column(store: &EntityStore) -> &Column<Self> {
                &store.$field
            }

            fn column_mut(store: &mut EntityStore) -> &mut Column<Self> {
                &mut store.$field
            }
        }
    };
}

stored!(Position, Position, positions);
stored!(Size, Size, sizes);
stored!(Velocity, Velocity, velocities);
stored!(Health, Health, healths);
stored!(Damage, Damage, damages);
stored!(Spacing, Spacing, spacings);
stored!(Flocking, Flocking, flockings);
stored!(Tint, Tint, tints);
stored!(Facing, Facing, facings);

/// Entity registry with one typed column per component kind.
#[derive(Debug, Default)]
pub(crate) struct EntityStore {
    len: usize,
    positions: Column<Position>,
    sizes: Column<Size>,
    velocities: Column<Velocity>,
    healths: Column<Health>,
    damages: Column<Damage>,
    spacings: Column<Spacing>,
    flockings: Column<Flocking>,
    tints: Column<Tint>,
    facings: Column<Facing>,
}

impl EntityStore {
    /// Allocates a fresh entity with no components.
    pub(crate) fn spawn(&mut self) -> EntityId {
        let id = EntityId::new(self.len as u32);
        self.len += 1;
        id
    }

    /// Allocates an entity carrying every component in `bundle`.
    ///
    /// Later values replace earlier ones of the same kind.
    pub(crate) fn spawn_with(&mut self, bundle: &[Component]) -> EntityId {
        let id = self.spawn();
        for component in bundle {
            self.write(id.get() as usize, *component);
        }
        id
    }

    /// Attaches or replaces a component on an existing entity.
    pub(crate) fn insert(&mut self, entity: EntityId, component: Component) -> Result<(), StoreError> {
        let index = self.index_of(entity)?;
        self.write(index, component);
        Ok(())
    }

    /// Reports whether the entity carries a component of type `T`.
    pub(crate) fn has<T: Stored>(&self, entity: EntityId) -> bool {
        T::column(self).slot(entity.get() as usize).is_some()
    }

    /// Reads a required component, failing if it is absent.
    pub(crate) fn get<T: Stored>(&self, entity: EntityId) -> Result<T, StoreError> {
        let index = self.index_of(entity)?;
        T::column(self)
            .slot(index)
            .copied()
            .ok_or(StoreError::MissingComponent {
                entity,
                kind: T::KIND,
            })
    }

    /// Borrows a required component mutably, failing if it is absent.
    pub(crate) fn get_mut<T: Stored>(&mut self, entity: EntityId) -> Result<&mut T, StoreError> {
        let index = self.index_of(entity)?;
        T::column_mut(self)
            .slot_mut(index)
            .ok_or(StoreError::MissingComponent {
                entity,
                kind: T::KIND,
            })
    }

    fn index_of(&self, entity: EntityId) -> Result<usize, StoreError> {
        let index = entity.get() as usize;
        if index < self.len {
            Ok(index)
        } else {
            Err(StoreError::UnknownEntity(entity))
        }
    }

    fn write(&mut self, index: usize, component: Component) {
        match component {
            Component::Position(value) => self.positions.set(index, value),
            Component::Size(value) => self.sizes.set(index, value),
            Component::Velocity(value) => self.velocities.set(index, value),
            Component::Health(value) => self.healths.set(index, value),
            Component::Damage(value) => self.damages.set(index, value),
            Component::Spacing(value) => self.spacings.set(index, value),
            Component::Flocking(value) => self.flockings.set(index, value),
            Component::Tint(value) => self.tints.set(index, value),
            Component::Facing(value) => self.facings.set(index, value),
        }
    }
}
