/// Component definitions for the simulation layer.
///
/// Agent kinematics are fixed-point so every tick is reproducible.

use bevy::prelude::*;
use crate::game::fixed_math::FixedVec2;

/// Logical position of an entity in world units.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SimPosition(pub FixedVec2);

/// Logical velocity of an entity in world units per second.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SimVelocity(pub FixedVec2);

/// Facing angle in radians, derived from the velocity for renderers.
/// Left unchanged while the entity is at rest.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SimHeading(pub f32);
