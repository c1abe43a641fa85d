//! Plain value records attached to entities.
//!
//! Each record is a small `Copy` value. The [`Component`] sum type wraps one
//! record per [`ComponentKind`] so heterogeneous bundles can be handed to the
//! world in a single command.

use serde::{Deserialize, Serialize};

/// World-space location of the top-left corner of an entity's footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate in world units.
    pub x: f32,
    /// Vertical coordinate in world units, growing downwards.
    pub y: f32,
}

impl Position {
    /// Creates a new position from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the position translated by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned footprint of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent in world units.
    pub width: f32,
    /// Vertical extent in world units.
    pub height: f32,
}

impl Size {
    /// Creates a new footprint from explicit dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Creates a square footprint.
    #[must_use]
    pub const fn square(side: f32) -> Self {
        Self::new(side, side)
    }
}

/// Scalar movement speed. Direction is derived every frame and never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Distance travelled per frame along each held axis.
    pub speed: f32,
}

/// Remaining hit points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Current value. Saturates at zero when damaged.
    pub value: f32,
}

impl Health {
    /// Hit points every fresh entity starts with.
    pub const DEFAULT: f32 = 100.0;

    /// Creates a health record with the provided value.
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Self { value }
    }

    /// Subtracts `amount`, saturating at zero, and returns the new value.
    pub fn take(&mut self, amount: f32) -> f32 {
        self.value = (self.value - amount.max(0.0)).max(0.0);
        self.value
    }

    /// Reports whether the health has run out.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.value <= 0.0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

/// Flat amount subtracted from a victim's health per contact frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Damage {
    /// Hit points removed per frame of contact.
    pub value: f32,
}

/// Extra separation an entity demands from its neighbours at spawn time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    /// Gap added to the footprint when testing spawn candidates.
    pub value: f32,
}

/// Steering weights. Presence of this component enables flocking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flocking {
    /// Weight applied to the averaged separation vector.
    pub separation_weight: f32,
    /// Weight applied to the averaged alignment vector.
    pub alignment_weight: f32,
    /// Weight applied to the vector towards the neighbourhood centre.
    pub cohesion_weight: f32,
    /// Centre-to-centre radius within which other flockers count as neighbours.
    pub perception_radius: f32,
}

impl Default for Flocking {
    fn default() -> Self {
        Self {
            separation_weight: 1.5,
            alignment_weight: 0.1,
            cohesion_weight: 0.05,
            perception_radius: 60.0,
        }
    }
}

/// Fill colour of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint {
    red: u8,
    green: u8,
    blue: u8,
}

impl Tint {
    /// Creates a tint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the tint.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the tint.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the tint.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Heading the entity faces, in radians measured from the positive x axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Facing {
    /// Angle in radians, as produced by `atan2`.
    pub radians: f32,
}

/// Discriminant naming each component kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    /// [`Position`] records.
    Position,
    /// [`Size`] records.
    Size,
    /// [`Velocity`] records.
    Velocity,
    /// [`Health`] records.
    Health,
    /// [`Damage`] records.
    Damage,
    /// [`Spacing`] records.
    Spacing,
    /// [`Flocking`] records.
    Flocking,
    /// [`Tint`] records.
    Tint,
    /// [`Facing`] records.
    Facing,
}

/// Tagged union holding exactly one component value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Component {
    /// Wraps a [`Position`].
    Position(Position),
    /// Wraps a [`Size`].
    Size(Size),
    /// Wraps a [`Velocity`].
    Velocity(Velocity),
    /// Wraps a [`Health`].
    Health(Health),
    /// Wraps a [`Damage`].
    Damage(Damage),
    /// Wraps a [`Spacing`].
    Spacing(Spacing),
    /// Wraps a [`Flocking`].
    Flocking(Flocking),
    /// Wraps a [`Tint`].
    Tint(Tint),
    /// Wraps a [`Facing`].
    Facing(Facing),
}

impl Component {
    /// Kind of the wrapped value.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Position(_) => ComponentKind::Position,
            Self::Size(_) => ComponentKind::Size,
            Self::Velocity(_) => ComponentKind::Velocity,
            Self::Health(_) => ComponentKind::Health,
            Self::Damage(_) => ComponentKind::Damage,
            Self::Spacing(_) => ComponentKind::Spacing,
            Self::Flocking(_) => ComponentKind::Flocking,
            Self::Tint(_) => ComponentKind::Tint,
            Self::Facing(_) => ComponentKind::Facing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn health_saturates_at_zero() {
        let mut health = Health::default();
        assert_relative_eq!(health.take(30.0), 70.0);
        assert_relative_eq!(health.take(500.0), 0.0);
        assert!(health.is_depleted());
    }

    #[test]
    fn negative_damage_never_heals() {
        let mut health = Health::new(40.0);
        assert_relative_eq!(health.take(-10.0), 40.0);
    }

    #[test]
    fn component_reports_its_kind() {
        let wrapped = Component::Spacing(Spacing { value: 4.0 });
        assert_eq!(wrapped.kind(), ComponentKind::Spacing);
        assert_eq!(
            Component::Facing(Facing::default()).kind(),
            ComponentKind::Facing
        );
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Position::new(1.0, 1.0);
        let b = Position::new(4.0, 5.0);
        assert_relative_eq!(a.distance_to(b), 5.0);
        assert_relative_eq!(b.distance_to(a), 5.0);
    }
}
